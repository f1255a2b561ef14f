//! Write-step classification of operation sequences.

use trellis_core::AccessType;
use trellis_core::bytecode::{Bytecode, symbols};

/// Step operators that mutate the graph.
const WRITE_STEPS: [&str; 4] = [
    symbols::ADD_V,
    symbols::ADD_E,
    symbols::DROP,
    symbols::PROPERTY,
];

/// Returns `true` if any instruction's operator is a mutating step.
///
/// Case-sensitive, short-circuits on the first match. A missing or empty
/// sequence carries no mutation evidence and returns `false`.
#[must_use]
pub fn has_write_step(bytecode: Option<&Bytecode>) -> bool {
    bytecode.is_some_and(|bytecode| {
        bytecode
            .steps
            .iter()
            .any(|instruction| WRITE_STEPS.contains(&instruction.operator.as_str()))
    })
}

/// Classifies a sequence as read or write intent.
#[must_use]
pub fn classify(bytecode: Option<&Bytecode>) -> AccessType {
    if has_write_step(bytecode) {
        AccessType::Write
    } else {
        AccessType::Read
    }
}
