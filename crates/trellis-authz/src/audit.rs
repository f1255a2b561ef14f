//! Audit trail for authorization decisions.
//!
//! Every rendered decision, allow and deny alike, is emitted on
//! [`AUDIT_TARGET`] so operators can route the trail to its own sink,
//! separate from debug and error logging. Requests rejected before a
//! decision (malformed input) never appear here.

use crate::authorizer::PolicyError;
use crate::fact::AuthorizationFact;

/// Tracing target carrying the audit trail.
pub const AUDIT_TARGET: &str = "trellis::audit";

/// Records a rendered allow/deny decision.
pub(crate) fn decision(fact: &AuthorizationFact, allowed: bool) {
    if allowed {
        tracing::info!(
            target: AUDIT_TARGET,
            user = %fact.user,
            access = %fact.access_type,
            resource = fact.resource_or_unknown(),
            client = fact.client_address.as_deref().unwrap_or("unknown"),
            "access allowed"
        );
    } else {
        tracing::warn!(
            target: AUDIT_TARGET,
            user = %fact.user,
            access = %fact.access_type,
            resource = fact.resource_or_unknown(),
            client = fact.client_address.as_deref().unwrap_or("unknown"),
            "access denied"
        );
    }
}

/// Records a policy-engine failure; no decision was rendered.
pub(crate) fn engine_failure(fact: &AuthorizationFact, error: &PolicyError) {
    tracing::error!(
        target: AUDIT_TARGET,
        user = %fact.user,
        access = %fact.access_type,
        resource = fact.resource_or_unknown(),
        error = %error,
        "policy engine failed, failing closed"
    );
}
