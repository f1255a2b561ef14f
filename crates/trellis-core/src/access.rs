//! Read/write access classification shared across the gateway.

use std::fmt;

use serde::{Deserialize, Serialize};

/// The kind of access a query requests from a graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum AccessType {
    /// The query only inspects the graph.
    Read,
    /// The query contains at least one mutating step.
    Write,
}

impl AccessType {
    /// The canonical wire form of the access type.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Read => "READ",
            Self::Write => "WRITE",
        }
    }

    /// Returns `true` for [`AccessType::Write`].
    #[must_use]
    pub fn is_write(self) -> bool {
        matches!(self, Self::Write)
    }
}

impl fmt::Display for AccessType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_canonical_form() {
        assert_eq!(AccessType::Read.as_str(), "READ");
        assert_eq!(AccessType::Write.as_str(), "WRITE");
        assert_eq!(AccessType::Write.to_string(), "WRITE");
    }

    #[test]
    fn test_is_write() {
        assert!(AccessType::Write.is_write());
        assert!(!AccessType::Read.is_write());
    }

    #[test]
    fn test_serde_uppercase() {
        assert_eq!(serde_json::to_string(&AccessType::Read).unwrap(), "\"READ\"");
        let parsed: AccessType = serde_json::from_str("\"WRITE\"").unwrap();
        assert_eq!(parsed, AccessType::Write);
    }
}
