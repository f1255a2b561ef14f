//! Policy engine boundary and decision enforcement.

use async_trait::async_trait;

use crate::audit;
use crate::error::{AuthzError, AuthzResult};
use crate::fact::AuthorizationFact;

/// Error raised by a policy engine implementation.
#[derive(Debug, thiserror::Error)]
#[error("{message}")]
pub struct PolicyError {
    /// What the engine reported.
    pub message: String,
}

impl PolicyError {
    /// Creates a new policy error.
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// The pluggable access-control policy.
///
/// Implementations are called concurrently from many workers and must not
/// mutate the fact. The decision is synchronous and idempotent; no retry
/// semantics are defined at this boundary.
#[async_trait]
pub trait Authorizer: Send + Sync {
    /// Renders the allow/deny decision for `fact`.
    async fn is_access_allowed(&self, fact: &AuthorizationFact) -> Result<bool, PolicyError>;
}

/// Consults the policy engine and converts a refusal into a typed failure.
///
/// Every rendered decision is recorded on the audit trail. An engine failure
/// fails closed: the caller must not forward the request, and the failure is
/// surfaced as [`AuthzError::PolicyEngine`], never as an ordinary denial.
///
/// # Errors
///
/// [`AuthzError::Denied`] when the engine refuses, [`AuthzError::PolicyEngine`]
/// when the engine itself fails.
pub async fn enforce(authorizer: &dyn Authorizer, fact: &AuthorizationFact) -> AuthzResult<()> {
    let allowed = match authorizer.is_access_allowed(fact).await {
        Ok(allowed) => allowed,
        Err(error) => {
            audit::engine_failure(fact, &error);
            return Err(AuthzError::policy_engine(error.to_string()));
        }
    };

    audit::decision(fact, allowed);

    if allowed {
        Ok(())
    } else {
        Err(AuthzError::denied(format!(
            "Action [{}] not allowed for user [{}] on resource [{}]",
            fact.access_type,
            fact.user,
            fact.resource_or_unknown(),
        )))
    }
}
