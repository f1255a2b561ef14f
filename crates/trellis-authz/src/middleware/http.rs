//! Authorization filter for the HTTP endpoint.
//!
//! HTTP callers submit query text in a JSON body; they are identified only
//! by alias text, never by an explicit alias map, so the alias always passes
//! through the resolver. A body without a query field is a client error and
//! never reaches the policy engine. Denials answer 403 with no body and
//! close the connection after flush.

use std::sync::Arc;

use bytes::Bytes;
use http::{Request, Response, StatusCode};
use trellis_core::message::tokens;

use crate::classify::has_write_step;
use crate::error::{AuthzError, AuthzResult};
use crate::gateway::{AuthorizationGateway, InspectedQuery};
use crate::middleware::ConnectionContext;
use crate::script::CompileErrorPolicy;

/// What the transport should do with the request.
#[derive(Debug)]
pub enum HttpVerdict {
    /// Pass the original request downstream unchanged.
    Forward,
    /// Short-circuit with this response.
    Respond {
        /// The response to flush.
        response: Response<Bytes>,
        /// Whether the connection must close after the flush.
        close: bool,
    },
}

/// Pass-through authorization filter for buffered HTTP requests.
pub struct HttpAuthorizationFilter {
    gateway: Arc<AuthorizationGateway>,
    compile_errors: CompileErrorPolicy,
}

impl HttpAuthorizationFilter {
    /// Creates a filter over the gateway. Script failures are suppressed on
    /// this protocol unless reconfigured.
    #[must_use]
    pub fn new(gateway: Arc<AuthorizationGateway>) -> Self {
        Self {
            gateway,
            compile_errors: CompileErrorPolicy::Suppress,
        }
    }

    /// Overrides the compile-error policy.
    #[must_use]
    pub fn with_compile_error_policy(mut self, policy: CompileErrorPolicy) -> Self {
        self.compile_errors = policy;
        self
    }

    /// Authorizes one buffered request.
    pub async fn handle(&self, ctx: &dyn ConnectionContext, request: &Request<Bytes>) -> HttpVerdict {
        match self.process(ctx, request).await {
            Ok(verdict) => verdict,
            Err(error) => rejection(&error),
        }
    }

    async fn process(
        &self,
        ctx: &dyn ConnectionContext,
        request: &Request<Bytes>,
    ) -> AuthzResult<HttpVerdict> {
        let query = extract_query(request.body())?;
        tracing::debug!(%query, "authorizing http query");

        let inspection = self.gateway.inspect_query(&query, self.compile_errors)?;
        let bytecode = match inspection.result {
            InspectedQuery::Scalar => return Ok(HttpVerdict::Forward),
            InspectedQuery::Traversal(sequence) => Some(sequence),
            InspectedQuery::Indeterminate => None,
        };

        self.gateway
            .authorize(
                ctx.authenticated_user().as_deref(),
                has_write_step(bytecode.as_ref()),
                Some(&inspection.alias),
                ctx.client_address(),
            )
            .await?;
        Ok(HttpVerdict::Forward)
    }
}

fn extract_query(body: &Bytes) -> AuthzResult<String> {
    let body: serde_json::Value = serde_json::from_slice(body)
        .map_err(|e| AuthzError::malformed_request(format!("body could not be parsed: {e}")))?;
    body.get(tokens::ARGS_GREMLIN)
        .and_then(serde_json::Value::as_str)
        .map(str::to_owned)
        .ok_or_else(|| AuthzError::malformed_request("no gremlin script supplied"))
}

fn empty_response(status: StatusCode) -> Response<Bytes> {
    let mut response = Response::new(Bytes::new());
    *response.status_mut() = status;
    response
}

fn rejection(error: &AuthzError) -> HttpVerdict {
    let (status, close) = match error {
        AuthzError::Denied { .. } => {
            tracing::info!("returning 403");
            (StatusCode::FORBIDDEN, true)
        }
        AuthzError::MalformedRequest { .. } | AuthzError::Compile { .. } => {
            (StatusCode::BAD_REQUEST, false)
        }
        AuthzError::MissingIdentity => (StatusCode::UNAUTHORIZED, false),
        // fail closed and end the connection
        AuthzError::PolicyEngine { .. } | AuthzError::ProtocolViolation { .. } => {
            (StatusCode::INTERNAL_SERVER_ERROR, true)
        }
    };
    HttpVerdict::Respond {
        response: empty_response(status),
        close,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_query() {
        let body = Bytes::from(r#"{"gremlin": "g.V()"}"#);
        assert_eq!(extract_query(&body).unwrap(), "g.V()");
    }

    #[test]
    fn test_extract_query_missing_field() {
        let err = extract_query(&Bytes::from(r#"{"language": "gremlin-groovy"}"#)).unwrap_err();
        assert!(matches!(err, AuthzError::MalformedRequest { .. }));
    }

    #[test]
    fn test_extract_query_unparsable_body() {
        let err = extract_query(&Bytes::from_static(b"{not json")).unwrap_err();
        assert!(matches!(err, AuthzError::MalformedRequest { .. }));
    }

    #[test]
    fn test_denial_closes_connection() {
        let HttpVerdict::Respond { response, close } = rejection(&AuthzError::denied("no")) else {
            panic!("expected a response");
        };
        assert_eq!(response.status(), StatusCode::FORBIDDEN);
        assert!(response.body().is_empty());
        assert!(close);
    }

    #[test]
    fn test_malformed_is_client_error_without_close() {
        let HttpVerdict::Respond { response, close } =
            rejection(&AuthzError::malformed_request("no script"))
        else {
            panic!("expected a response");
        };
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert!(!close);
    }
}
