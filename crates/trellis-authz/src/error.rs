//! Gateway error taxonomy.
//!
//! Each variant maps to one recovery path in the adapters: malformed input
//! and suppressed compile failures stay local, denials become protocol
//! rejections, policy-engine failures fail closed, protocol violations end
//! the connection.

/// Errors raised while authorizing an inbound message.
#[derive(Debug, thiserror::Error)]
pub enum AuthzError {
    /// The request body could not be parsed or a required field is missing.
    ///
    /// A client error; the policy engine is never consulted.
    #[error("Malformed request: {message}")]
    MalformedRequest {
        /// What was wrong with the request.
        message: String,
    },

    /// The query text failed to compile or evaluate.
    #[error("Query compilation failed: {message}")]
    Compile {
        /// The underlying script failure.
        message: String,
    },

    /// The policy engine refused the request.
    #[error("{message}")]
    Denied {
        /// The denial message, in the canonical `Action [..] not allowed` form.
        message: String,
    },

    /// The policy engine itself failed.
    ///
    /// Fail closed: the request is not forwarded, and the failure is never
    /// reported as an ordinary denial.
    #[error("Policy engine failure: {message}")]
    PolicyEngine {
        /// What the engine reported.
        message: String,
    },

    /// The message was not of the type this adapter processes.
    ///
    /// Fatal for the connection.
    #[error("Protocol violation: {message}")]
    ProtocolViolation {
        /// What arrived instead.
        message: String,
    },

    /// The connection carries no authenticated user.
    #[error("No authenticated user on connection")]
    MissingIdentity,
}

impl AuthzError {
    /// Creates a new `MalformedRequest` error.
    #[must_use]
    pub fn malformed_request(message: impl Into<String>) -> Self {
        Self::MalformedRequest {
            message: message.into(),
        }
    }

    /// Creates a new `Compile` error.
    #[must_use]
    pub fn compile(message: impl Into<String>) -> Self {
        Self::Compile {
            message: message.into(),
        }
    }

    /// Creates a new `Denied` error.
    #[must_use]
    pub fn denied(message: impl Into<String>) -> Self {
        Self::Denied {
            message: message.into(),
        }
    }

    /// Creates a new `PolicyEngine` error.
    #[must_use]
    pub fn policy_engine(message: impl Into<String>) -> Self {
        Self::PolicyEngine {
            message: message.into(),
        }
    }

    /// Creates a new `ProtocolViolation` error.
    #[must_use]
    pub fn protocol_violation(message: impl Into<String>) -> Self {
        Self::ProtocolViolation {
            message: message.into(),
        }
    }

    /// Returns `true` if this is an explicit policy refusal.
    #[must_use]
    pub fn is_denial(&self) -> bool {
        matches!(self, Self::Denied { .. })
    }
}

/// Type alias for gateway results.
pub type AuthzResult<T> = Result<T, AuthzError>;
