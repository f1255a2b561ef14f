//! Storage backend configuration snapshots.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Well-known backend setting keys.
pub mod keys {
    /// Backend family, e.g. `cql` or `berkeleyje`.
    pub const STORAGE_BACKEND: &str = "storage.backend";
    /// Host list for server-backed stores.
    pub const STORAGE_HOSTNAME: &str = "storage.hostname";
    /// Data directory for file-backed stores.
    pub const STORAGE_DIRECTORY: &str = "storage.directory";
    /// Table name for HBase-backed stores.
    pub const STORAGE_HBASE_TABLE: &str = "storage.hbase.table";
    /// Keyspace for classic Cassandra drivers.
    pub const STORAGE_CASSANDRA_KEYSPACE: &str = "storage.cassandra.keyspace";
    /// Keyspace for the CQL driver.
    pub const STORAGE_CQL_KEYSPACE: &str = "storage.cql.keyspace";
}

/// An immutable snapshot of one graph's storage settings.
///
/// Settings are flat dotted keys as they appear in graph property files. The
/// snapshot is taken when the configuration provider loads; the gateway never
/// writes through it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BackendConfig {
    settings: BTreeMap<String, String>,
}

impl BackendConfig {
    /// Creates an empty snapshot.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style setting insertion.
    #[must_use]
    pub fn with_setting(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.settings.insert(key.into(), value.into());
        self
    }

    /// Looks up a setting by key.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.settings.get(key).map(String::as_str)
    }

    /// Returns `true` if no settings are present.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.settings.is_empty()
    }
}
