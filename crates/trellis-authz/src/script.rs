//! Query compiler boundary.
//!
//! The scripting engine that turns query text into a traversal lives outside
//! this crate. The gateway drives it through [`QueryCompiler`] and matches on
//! the tagged [`EvalOutcome`] instead of inspecting runtime types.

use trellis_core::Bytecode;

use crate::bindings::ExecutionBindings;

/// Fallback alias for query text with no leading source segment.
pub const DEFAULT_ALIAS: &str = "defaultgraph";

/// What evaluating a compiled query produced.
#[derive(Debug, Clone, PartialEq)]
pub enum EvalOutcome {
    /// A primitive number or string; there is no traversal to authorize.
    Scalar(serde_json::Value),
    /// A traversal handle, with its operation sequence extracted.
    Traversal(Bytecode),
    /// Some other result type, named for logging.
    Unrecognized(String),
}

/// Errors raised by the scripting engine.
#[derive(Debug, thiserror::Error)]
pub enum ScriptError {
    /// The script called a method unknown to the evaluation bindings.
    ///
    /// Coerced by the gateway to "unresolvable as a traversal" instead of
    /// aborting the request.
    #[error("Missing method: {message}")]
    MissingMethod {
        /// The method reference that failed.
        message: String,
    },

    /// The script text failed to compile.
    #[error("Compilation failed: {message}")]
    Compilation {
        /// What the compiler reported.
        message: String,
    },

    /// The compiled script failed during evaluation.
    #[error("Evaluation failed: {message}")]
    Evaluation {
        /// What the evaluator reported.
        message: String,
    },
}

impl ScriptError {
    /// Creates a new `MissingMethod` error.
    #[must_use]
    pub fn missing_method(message: impl Into<String>) -> Self {
        Self::MissingMethod {
            message: message.into(),
        }
    }

    /// Creates a new `Compilation` error.
    #[must_use]
    pub fn compilation(message: impl Into<String>) -> Self {
        Self::Compilation {
            message: message.into(),
        }
    }

    /// Creates a new `Evaluation` error.
    #[must_use]
    pub fn evaluation(message: impl Into<String>) -> Self {
        Self::Evaluation {
            message: message.into(),
        }
    }

    /// Returns `true` for missing-method failures.
    #[must_use]
    pub fn is_missing_method(&self) -> bool {
        matches!(self, Self::MissingMethod { .. })
    }
}

/// A compiled query, ready to evaluate against bindings.
pub trait CompiledQuery: Send {
    /// Evaluates the query against the given alias bindings.
    fn evaluate(&self, bindings: &ExecutionBindings) -> Result<EvalOutcome, ScriptError>;
}

/// The scripting engine boundary.
///
/// Implementations may be slow; calls run synchronously on the worker
/// processing the message.
pub trait QueryCompiler: Send + Sync {
    /// Compiles query text.
    fn compile(&self, text: &str) -> Result<Box<dyn CompiledQuery>, ScriptError>;
}

/// Per-adapter handling of compile failures that are not missing-method.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompileErrorPolicy {
    /// Treat the failure as "no operation sequence"; the request defaults to
    /// a read and still goes through the policy check.
    Suppress,
    /// Surface the failure to the caller.
    Propagate,
}

/// Extracts the traversal-source alias from query text.
///
/// The alias is the text up to the first `.`; text with no delimiter uses
/// [`DEFAULT_ALIAS`].
#[must_use]
pub fn traversal_alias(query: &str) -> &str {
    match query.find('.') {
        Some(index) => &query[..index],
        None => DEFAULT_ALIAS,
    }
}

/// Strips one trailing `;` and one trailing `.next()` call.
///
/// A terminal step would execute the traversal instead of returning its
/// handle; without the handle there is no operation sequence to inspect.
#[must_use]
pub fn strip_terminal_step(query: &str) -> &str {
    let mut query = query.trim();
    if let Some(stripped) = query.strip_suffix(';') {
        query = stripped.trim_end();
    }
    if let Some(stripped) = query.strip_suffix(".next()") {
        query = stripped;
    }
    query
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_alias_is_leading_segment() {
        assert_eq!(traversal_alias("g.V().has('name','x')"), "g");
        assert_eq!(traversal_alias("social.addV('person')"), "social");
    }

    #[test]
    fn test_alias_defaults_without_delimiter() {
        assert_eq!(traversal_alias("42"), DEFAULT_ALIAS);
        assert_eq!(traversal_alias(""), DEFAULT_ALIAS);
    }

    #[test]
    fn test_strip_terminal_step() {
        assert_eq!(strip_terminal_step("g.V().next()"), "g.V()");
        assert_eq!(strip_terminal_step("g.V().next();"), "g.V()");
        assert_eq!(strip_terminal_step("  g.V() ; "), "g.V()");
        assert_eq!(strip_terminal_step("g.V()"), "g.V()");
        // only a trailing terminal step is stripped
        assert_eq!(strip_terminal_step("g.next().V()"), "g.next().V()");
    }

    #[test]
    fn test_missing_method_classification() {
        assert!(ScriptError::missing_method("nope()").is_missing_method());
        assert!(!ScriptError::compilation("bad syntax").is_missing_method());
        assert!(!ScriptError::evaluation("boom").is_missing_method());
    }
}
