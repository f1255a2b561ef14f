//! Binary protocol request and response messages.
//!
//! The request/response protocol frames every client operation as a
//! [`RequestMessage`] carrying an op kind tag plus a bag of named arguments,
//! and every server reply as a [`ResponseMessage`] correlated to the request
//! it answers. The transport codec owns encoding; these are the decoded
//! value types shared by the pipeline.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::CoreError;

/// Well-known op kind and argument names of the binary protocol.
pub mod tokens {
    /// Submit raw query text for evaluation.
    pub const OPS_EVAL: &str = "eval";
    /// Submit a pre-built operation sequence.
    pub const OPS_BYTECODE: &str = "bytecode";
    /// Argument carrying the query text or the operation sequence.
    pub const ARGS_GREMLIN: &str = "gremlin";
    /// Argument mapping alias names to configured traversal sources.
    pub const ARGS_ALIASES: &str = "aliases";
}

/// A decoded client request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RequestMessage {
    /// Correlation id, echoed back on every response to this request.
    #[serde(rename = "requestId")]
    pub request_id: Uuid,
    /// Op kind tag, e.g. [`tokens::OPS_EVAL`].
    pub op: String,
    /// Named arguments for the op.
    #[serde(default)]
    pub args: HashMap<String, serde_json::Value>,
}

impl RequestMessage {
    /// Creates a request with a fresh correlation id and no arguments.
    #[must_use]
    pub fn new(op: impl Into<String>) -> Self {
        Self {
            request_id: Uuid::new_v4(),
            op: op.into(),
            args: HashMap::new(),
        }
    }

    /// Builder-style argument insertion.
    #[must_use]
    pub fn with_arg(mut self, key: impl Into<String>, value: serde_json::Value) -> Self {
        self.args.insert(key.into(), value);
        self
    }

    /// Looks up an argument by name.
    #[must_use]
    pub fn arg(&self, key: &str) -> Option<&serde_json::Value> {
        self.args.get(key)
    }

    /// Looks up an argument and narrows it to a string.
    #[must_use]
    pub fn string_arg(&self, key: &str) -> Option<&str> {
        self.args.get(key).and_then(serde_json::Value::as_str)
    }
}

/// Status codes carried by binary protocol responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "u16", try_from = "u16")]
pub enum ResponseStatusCode {
    /// The request completed.
    Success,
    /// The request lacked valid credentials.
    Unauthorized,
    /// The request was understood but refused.
    Forbidden,
    /// The request could not be parsed or was missing required arguments.
    MalformedRequest,
    /// The server failed while processing the request.
    ServerError,
}

impl ResponseStatusCode {
    /// Numeric wire form of the code.
    #[must_use]
    pub fn as_u16(self) -> u16 {
        match self {
            Self::Success => 200,
            Self::Unauthorized => 401,
            Self::Forbidden => 403,
            Self::MalformedRequest => 498,
            Self::ServerError => 500,
        }
    }
}

impl From<ResponseStatusCode> for u16 {
    fn from(code: ResponseStatusCode) -> Self {
        code.as_u16()
    }
}

impl TryFrom<u16> for ResponseStatusCode {
    type Error = CoreError;

    fn try_from(code: u16) -> Result<Self, Self::Error> {
        match code {
            200 => Ok(Self::Success),
            401 => Ok(Self::Unauthorized),
            403 => Ok(Self::Forbidden),
            498 => Ok(Self::MalformedRequest),
            500 => Ok(Self::ServerError),
            other => Err(CoreError::InvalidStatusCode(other)),
        }
    }
}

/// Status portion of a response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResponseStatus {
    /// Outcome code.
    pub code: ResponseStatusCode,
    /// Human-readable status message; empty on success.
    #[serde(default)]
    pub message: String,
}

/// A server reply correlated to one request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResponseMessage {
    /// Correlation id of the request this answers.
    #[serde(rename = "requestId")]
    pub request_id: Uuid,
    /// Outcome of the request.
    pub status: ResponseStatus,
}

impl ResponseMessage {
    /// Starts building a response correlated to `request`.
    #[must_use]
    pub fn build(request: &RequestMessage) -> ResponseMessageBuilder {
        ResponseMessageBuilder {
            request_id: request.request_id,
            code: ResponseStatusCode::Success,
            message: String::new(),
        }
    }
}

/// Builder for [`ResponseMessage`].
#[derive(Debug)]
pub struct ResponseMessageBuilder {
    request_id: Uuid,
    code: ResponseStatusCode,
    message: String,
}

impl ResponseMessageBuilder {
    /// Sets the outcome code.
    #[must_use]
    pub fn code(mut self, code: ResponseStatusCode) -> Self {
        self.code = code;
        self
    }

    /// Sets the human-readable status message.
    #[must_use]
    pub fn status_message(mut self, message: impl Into<String>) -> Self {
        self.message = message.into();
        self
    }

    /// Finalizes the response.
    #[must_use]
    pub fn create(self) -> ResponseMessage {
        ResponseMessage {
            request_id: self.request_id,
            status: ResponseStatus {
                code: self.code,
                message: self.message,
            },
        }
    }
}

/// A frame handed to the gateway by the binary transport.
///
/// Codecs decode well-formed frames into [`RequestMessage`]; anything else is
/// delivered as [`InboundMessage::Foreign`] with a short description of what
/// arrived, so pipeline stages can report the protocol violation.
#[derive(Debug, Clone, PartialEq)]
pub enum InboundMessage {
    /// A decoded request.
    Request(RequestMessage),
    /// A frame that is not a request message.
    Foreign(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_response_correlates_to_request() {
        let request = RequestMessage::new(tokens::OPS_EVAL);
        let response = ResponseMessage::build(&request)
            .code(ResponseStatusCode::Forbidden)
            .status_message("no")
            .create();
        assert_eq!(response.request_id, request.request_id);
        assert_eq!(response.status.code, ResponseStatusCode::Forbidden);
        assert_eq!(response.status.message, "no");
    }

    #[test]
    fn test_status_code_wire_values() {
        assert_eq!(ResponseStatusCode::Success.as_u16(), 200);
        assert_eq!(ResponseStatusCode::Unauthorized.as_u16(), 401);
        assert_eq!(ResponseStatusCode::Forbidden.as_u16(), 403);
        assert_eq!(ResponseStatusCode::MalformedRequest.as_u16(), 498);
        assert_eq!(ResponseStatusCode::ServerError.as_u16(), 500);
        assert_eq!(ResponseStatusCode::try_from(403).unwrap(), ResponseStatusCode::Forbidden);
        assert!(ResponseStatusCode::try_from(418).is_err());
    }

    #[test]
    fn test_string_arg_narrowing() {
        let request = RequestMessage::new(tokens::OPS_EVAL)
            .with_arg(tokens::ARGS_GREMLIN, "g.V()".into())
            .with_arg("batchSize", 64.into());
        assert_eq!(request.string_arg(tokens::ARGS_GREMLIN), Some("g.V()"));
        assert_eq!(request.string_arg("batchSize"), None);
        assert_eq!(request.string_arg("absent"), None);
    }

    #[test]
    fn test_request_serde_shape() {
        let request = RequestMessage::new(tokens::OPS_BYTECODE);
        let value = serde_json::to_value(&request).unwrap();
        assert!(value.get("requestId").is_some());
        let decoded: RequestMessage = serde_json::from_value(value).unwrap();
        assert_eq!(decoded, request);
    }
}
