//! Storage identity derivation.
//!
//! Two configured graphs (or a graph and a traversal source) point at the
//! same physical store exactly when their derived [`StorageIdentity`] values
//! are equal. The identity is the join key for alias-to-graph resolution and
//! nothing else; it is never used to open a connection.

use crate::backend::{BackendConfig, keys};

/// Backend families that address their store by hostname.
const HOSTNAME_BACKENDS: [&str; 5] = [
    "hbase",
    "cql",
    "cassandra",
    "cassandrathrift",
    "embeddedcassandra",
];

/// The identity of the physical store behind a backend configuration.
///
/// Equality covers all three fields, absent fields included. Derivation is
/// deterministic and total: every configuration yields an identity, with
/// fields left unpopulated when the backend family does not declare them.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct StorageIdentity {
    backend_type: Option<String>,
    path: Option<String>,
    instance: Option<String>,
}

impl StorageIdentity {
    /// Derives the identity from a backend configuration snapshot.
    #[must_use]
    pub fn from_config(config: &BackendConfig) -> Self {
        let backend_type = config.get(keys::STORAGE_BACKEND);

        let path = match backend_type {
            Some(backend) if HOSTNAME_BACKENDS.contains(&backend) => {
                config.get(keys::STORAGE_HOSTNAME)
            }
            Some("berkeleyje") => config.get(keys::STORAGE_DIRECTORY),
            _ => None,
        };

        let instance = match backend_type {
            Some("hbase") => config.get(keys::STORAGE_HBASE_TABLE),
            Some("cql") => config.get(keys::STORAGE_CQL_KEYSPACE),
            Some("cassandra" | "cassandrathrift") => config.get(keys::STORAGE_CASSANDRA_KEYSPACE),
            _ => None,
        };

        Self {
            backend_type: backend_type.map(str::to_owned),
            path: path.map(str::to_owned),
            instance: instance.map(str::to_owned),
        }
    }

    /// The configured backend family, if declared.
    #[must_use]
    pub fn backend_type(&self) -> Option<&str> {
        self.backend_type.as_deref()
    }

    /// Host list or directory, depending on the backend family.
    #[must_use]
    pub fn path(&self) -> Option<&str> {
        self.path.as_deref()
    }

    /// Table or keyspace, depending on the backend family.
    #[must_use]
    pub fn instance(&self) -> Option<&str> {
        self.instance.as_deref()
    }
}
