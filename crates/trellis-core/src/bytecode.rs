//! Structured operation sequences.
//!
//! A [`Bytecode`] value is the already-parsed form of a traversal: an ordered
//! list of [`Instruction`]s, each naming a step operator and carrying its
//! arguments. The gateway only ever inspects operator names; arguments are
//! opaque JSON values owned by whoever produced the sequence.

use serde::{Deserialize, Serialize};

use crate::error::{CoreError, Result};

/// Canonical step operator names of the traversal language.
pub mod symbols {
    /// Adds a vertex to the graph.
    pub const ADD_V: &str = "addV";
    /// Adds an edge to the graph.
    pub const ADD_E: &str = "addE";
    /// Removes the current traverser's elements from the graph.
    pub const DROP: &str = "drop";
    /// Writes a property onto an element.
    pub const PROPERTY: &str = "property";
    /// Starts a traversal over vertices.
    pub const V: &str = "V";
    /// Starts a traversal over edges.
    pub const E: &str = "E";
    /// Filters by property predicate.
    pub const HAS: &str = "has";
    /// Projects property values.
    pub const VALUES: &str = "values";
}

/// One step of an operation sequence: an operator name plus its arguments.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Instruction {
    /// Step operator name, case-sensitive.
    pub operator: String,
    /// Step arguments, opaque to the gateway.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub args: Vec<serde_json::Value>,
}

impl Instruction {
    /// Creates an instruction with no arguments.
    #[must_use]
    pub fn new(operator: impl Into<String>) -> Self {
        Self {
            operator: operator.into(),
            args: Vec::new(),
        }
    }

    /// Creates an instruction with the given arguments.
    #[must_use]
    pub fn with_args(operator: impl Into<String>, args: Vec<serde_json::Value>) -> Self {
        Self {
            operator: operator.into(),
            args,
        }
    }
}

/// An ordered operation sequence extracted from a traversal.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Bytecode {
    /// Step instructions in traversal order.
    #[serde(default)]
    pub steps: Vec<Instruction>,
}

impl Bytecode {
    /// Creates an empty sequence.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a step instruction.
    pub fn push(&mut self, instruction: Instruction) {
        self.steps.push(instruction);
    }

    /// Builder-style variant of [`Bytecode::push`].
    #[must_use]
    pub fn with_step(mut self, instruction: Instruction) -> Self {
        self.steps.push(instruction);
        self
    }

    /// Returns `true` if the sequence carries no instructions.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Number of instructions in the sequence.
    #[must_use]
    pub fn len(&self) -> usize {
        self.steps.len()
    }

    /// Decodes a sequence from its serialized JSON form.
    pub fn from_json(value: serde_json::Value) -> Result<Self> {
        serde_json::from_value(value)
            .map_err(|e| CoreError::invalid_bytecode(format!("not an operation sequence: {e}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_push_preserves_order() {
        let mut bytecode = Bytecode::new();
        bytecode.push(Instruction::new(symbols::V));
        bytecode.push(Instruction::new(symbols::HAS));
        assert_eq!(bytecode.len(), 2);
        assert_eq!(bytecode.steps[0].operator, "V");
        assert_eq!(bytecode.steps[1].operator, "has");
    }

    #[test]
    fn test_from_json_roundtrip() {
        let bytecode = Bytecode::new()
            .with_step(Instruction::new(symbols::ADD_V))
            .with_step(Instruction::with_args(
                symbols::PROPERTY,
                vec!["name".into(), "x".into()],
            ));
        let value = serde_json::to_value(&bytecode).unwrap();
        let decoded = Bytecode::from_json(value).unwrap();
        assert_eq!(decoded, bytecode);
    }

    #[test]
    fn test_from_json_rejects_garbage() {
        let err = Bytecode::from_json(serde_json::json!([1, 2, 3])).unwrap_err();
        assert!(matches!(err, CoreError::InvalidBytecode(_)));
    }

    #[test]
    fn test_missing_args_default_to_empty() {
        let decoded =
            Bytecode::from_json(serde_json::json!({ "steps": [{ "operator": "drop" }] })).unwrap();
        assert_eq!(decoded.steps[0].operator, "drop");
        assert!(decoded.steps[0].args.is_empty());
    }
}
