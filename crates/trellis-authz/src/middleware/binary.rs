//! Authorization filter for the binary request/response protocol.
//!
//! Inbound requests carry either query text (`eval`) or a pre-built
//! operation sequence (`bytecode`). Any other op kind cannot be inspected
//! and is conservatively treated as a write. Denials answer with a FORBIDDEN
//! response correlated to the request; the session stays open for further
//! requests. A frame that is not a request message is a protocol violation
//! and ends the connection.

use std::sync::Arc;

use trellis_core::message::{InboundMessage, RequestMessage, ResponseMessage, tokens};
use trellis_core::{Bytecode, ResponseStatusCode};

use crate::classify::has_write_step;
use crate::error::{AuthzError, AuthzResult};
use crate::gateway::{AuthorizationGateway, InspectedQuery};
use crate::middleware::ConnectionContext;
use crate::script::CompileErrorPolicy;

/// What the transport should do with the message.
#[derive(Debug, PartialEq)]
pub enum Verdict {
    /// Pass the original message downstream unchanged.
    Forward,
    /// Reply with this response and keep the session open.
    Reject(ResponseMessage),
    /// Reply if a response is present, then close the connection.
    Terminate(Option<ResponseMessage>),
}

/// Pass-through authorization filter for the binary protocol.
pub struct BinaryAuthorizationFilter {
    gateway: Arc<AuthorizationGateway>,
    compile_errors: CompileErrorPolicy,
}

impl BinaryAuthorizationFilter {
    /// Creates a filter over the gateway. Script failures propagate on this
    /// protocol unless reconfigured.
    #[must_use]
    pub fn new(gateway: Arc<AuthorizationGateway>) -> Self {
        Self {
            gateway,
            compile_errors: CompileErrorPolicy::Propagate,
        }
    }

    /// Overrides the compile-error policy.
    #[must_use]
    pub fn with_compile_error_policy(mut self, policy: CompileErrorPolicy) -> Self {
        self.compile_errors = policy;
        self
    }

    /// Authorizes one inbound frame.
    pub async fn handle(&self, ctx: &dyn ConnectionContext, message: &InboundMessage) -> Verdict {
        let request = match message {
            InboundMessage::Request(request) => request,
            InboundMessage::Foreign(type_name) => {
                tracing::warn!(
                    %type_name,
                    "binary filter only processes request messages - channel closing"
                );
                return Verdict::Terminate(None);
            }
        };

        match self.process(ctx, request).await {
            Ok(verdict) => verdict,
            Err(error) => rejection(request, &error),
        }
    }

    async fn process(
        &self,
        ctx: &dyn ConnectionContext,
        request: &RequestMessage,
    ) -> AuthzResult<Verdict> {
        let mut forced_write = false;
        let mut bytecode = None;
        let mut alias = None;

        match request.op.as_str() {
            tokens::OPS_EVAL => {
                let query = request
                    .string_arg(tokens::ARGS_GREMLIN)
                    .ok_or_else(|| AuthzError::malformed_request("no gremlin script supplied"))?;
                let inspection = self.gateway.inspect_query(query, self.compile_errors)?;
                match inspection.result {
                    InspectedQuery::Scalar => return Ok(Verdict::Forward),
                    InspectedQuery::Traversal(sequence) => bytecode = Some(sequence),
                    InspectedQuery::Indeterminate => {}
                }
                alias = Some(inspection.alias);
            }
            tokens::OPS_BYTECODE => {
                let payload = request
                    .arg(tokens::ARGS_GREMLIN)
                    .ok_or_else(|| AuthzError::malformed_request("no bytecode supplied"))?;
                bytecode = Some(decode_bytecode(payload)?);
                alias = sole_alias(request);
            }
            op => {
                tracing::warn!(op, "op not supported, considering it a write request");
                forced_write = true;
            }
        }

        let write = forced_write || has_write_step(bytecode.as_ref());
        self.gateway
            .authorize(
                ctx.authenticated_user().as_deref(),
                write,
                alias.as_deref(),
                ctx.client_address(),
            )
            .await?;
        Ok(Verdict::Forward)
    }
}

/// Decodes the bytecode argument: a structured operation sequence, or its
/// serialized string form.
fn decode_bytecode(payload: &serde_json::Value) -> AuthzResult<Bytecode> {
    let decoded = match payload {
        serde_json::Value::String(serialized) => serde_json::from_str(serialized)
            .map_err(|e| AuthzError::malformed_request(format!("undecodable bytecode: {e}"))),
        structured => Bytecode::from_json(structured.clone())
            .map_err(|e| AuthzError::malformed_request(e.to_string())),
    }?;
    Ok(decoded)
}

/// A single alias-map entry names the target; anything else stays unresolved
/// and falls through to the alias lookup.
fn sole_alias(request: &RequestMessage) -> Option<String> {
    let aliases = request.arg(tokens::ARGS_ALIASES)?.as_object()?;
    if aliases.len() != 1 {
        return None;
    }
    aliases
        .values()
        .next()
        .and_then(serde_json::Value::as_str)
        .map(str::to_owned)
}

fn rejection(request: &RequestMessage, error: &AuthzError) -> Verdict {
    match error {
        AuthzError::Denied { .. } => {
            tracing::info!(request_id = %request.request_id, "returning 403");
            Verdict::Reject(
                ResponseMessage::build(request)
                    .code(ResponseStatusCode::Forbidden)
                    .status_message(error.to_string())
                    .create(),
            )
        }
        AuthzError::MalformedRequest { .. } => Verdict::Reject(
            ResponseMessage::build(request)
                .code(ResponseStatusCode::MalformedRequest)
                .status_message(error.to_string())
                .create(),
        ),
        AuthzError::MissingIdentity => Verdict::Reject(
            ResponseMessage::build(request)
                .code(ResponseStatusCode::Unauthorized)
                .status_message(error.to_string())
                .create(),
        ),
        AuthzError::Compile { .. } => Verdict::Reject(
            ResponseMessage::build(request)
                .code(ResponseStatusCode::ServerError)
                .status_message(error.to_string())
                .create(),
        ),
        // fail closed and end the session
        AuthzError::PolicyEngine { .. } | AuthzError::ProtocolViolation { .. } => {
            Verdict::Terminate(Some(
                ResponseMessage::build(request)
                    .code(ResponseStatusCode::ServerError)
                    .status_message(error.to_string())
                    .create(),
            ))
        }
    }
}
