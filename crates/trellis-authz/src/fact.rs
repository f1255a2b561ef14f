//! The normalized fact record handed to the policy engine.

use std::fmt;

use time::OffsetDateTime;
use trellis_core::AccessType;

use crate::error::{AuthzError, AuthzResult};

/// One request's attributes, assembled immediately before the policy check.
///
/// Built per request, never persisted, discarded after the decision. The
/// `action` field mirrors the access type's string form for engines that key
/// on action names.
#[derive(Debug, Clone)]
pub struct AuthorizationFact {
    /// Authenticated principal. Always present; a request with no identity
    /// never produces a fact.
    pub user: String,
    /// Group the principal belongs to, when the session layer provides one.
    pub user_group: Option<String>,
    /// Read or write intent of the query.
    pub access_type: AccessType,
    /// String form of `access_type`.
    pub action: String,
    /// When the decision was requested.
    pub access_time: OffsetDateTime,
    /// String form of the caller's network address, if the transport knows it.
    pub client_address: Option<String>,
    /// Logical resource (graph) name, `None` when resolution failed; the
    /// policy engine decides how to treat an unknown resource.
    pub resource: Option<String>,
}

impl AuthorizationFact {
    /// Assembles a fact for the current request.
    ///
    /// # Errors
    ///
    /// Returns [`AuthzError::MissingIdentity`] when `user` is absent or
    /// empty, rather than building a fact with an undefined subject.
    pub fn build(
        user: Option<&str>,
        is_write: bool,
        resource: Option<String>,
        client_address: Option<String>,
    ) -> AuthzResult<Self> {
        let user = match user {
            Some(user) if !user.is_empty() => user.to_owned(),
            _ => return Err(AuthzError::MissingIdentity),
        };
        let access_type = if is_write {
            AccessType::Write
        } else {
            AccessType::Read
        };
        Ok(Self {
            user,
            user_group: None,
            access_type,
            action: access_type.as_str().to_owned(),
            access_time: OffsetDateTime::now_utc(),
            client_address,
            resource,
        })
    }

    /// Sets the principal's group.
    #[must_use]
    pub fn with_user_group(mut self, user_group: impl Into<String>) -> Self {
        self.user_group = Some(user_group.into());
        self
    }

    /// The resource name, or `"unknown"` when unresolved.
    #[must_use]
    pub fn resource_or_unknown(&self) -> &str {
        self.resource.as_deref().unwrap_or("unknown")
    }
}

impl fmt::Display for AuthorizationFact {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "AuthorizationFact{{user={}, accessType={}, resource={}, clientAddress={}}}",
            self.user,
            self.access_type,
            self.resource_or_unknown(),
            self.client_address.as_deref().unwrap_or("unknown"),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_read_fact() {
        let fact = AuthorizationFact::build(
            Some("alice"),
            false,
            Some("graph1".to_owned()),
            Some("10.0.0.7".to_owned()),
        )
        .unwrap();
        assert_eq!(fact.user, "alice");
        assert_eq!(fact.access_type, AccessType::Read);
        assert_eq!(fact.action, "READ");
        assert_eq!(fact.resource.as_deref(), Some("graph1"));
        assert_eq!(fact.client_address.as_deref(), Some("10.0.0.7"));
    }

    #[test]
    fn test_action_mirrors_access_type() {
        let fact = AuthorizationFact::build(Some("alice"), true, None, None).unwrap();
        assert_eq!(fact.access_type, AccessType::Write);
        assert_eq!(fact.action, fact.access_type.as_str());
    }

    #[test]
    fn test_missing_identity_rejected() {
        assert!(matches!(
            AuthorizationFact::build(None, false, None, None),
            Err(AuthzError::MissingIdentity)
        ));
        assert!(matches!(
            AuthorizationFact::build(Some(""), false, None, None),
            Err(AuthzError::MissingIdentity)
        ));
    }

    #[test]
    fn test_unresolved_resource_displays_unknown() {
        let fact = AuthorizationFact::build(Some("alice"), false, None, None).unwrap();
        assert_eq!(fact.resource_or_unknown(), "unknown");
        assert!(fact.to_string().contains("resource=unknown"));
    }
}
