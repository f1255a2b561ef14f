//! Graph and traversal-source registry boundary.
//!
//! The gateway resolves resources against whatever component owns graph
//! configuration at runtime. [`GraphRegistry`] is that boundary: it
//! enumerates configured traversal-source aliases and graph names, each with
//! the backend snapshot its storage identity derives from.
//!
//! [`StaticRegistry`] is the file-backed implementation used by fixed
//! deployments and tests: graphs and sources are declared once in TOML and
//! never change.

use indexmap::IndexMap;
use serde::Deserialize;

use crate::backend::BackendConfig;
use crate::error::ConfigError;

/// Read-only view of configured graphs and traversal sources.
///
/// Enumeration order is the provider's declaration order; alias-to-graph
/// joins resolve identity collisions last-write-wins in that order.
pub trait GraphRegistry: Send + Sync {
    /// Configured traversal-source aliases, in declaration order.
    fn traversal_source_names(&self) -> Vec<String>;

    /// Configured graph (resource) names, in declaration order.
    fn graph_names(&self) -> Vec<String>;

    /// Backend snapshot the alias's storage identity derives from.
    fn traversal_source_config(&self, alias: &str) -> Option<BackendConfig>;

    /// Backend snapshot the graph's storage identity derives from.
    fn graph_config(&self, name: &str) -> Option<BackendConfig>;
}

/// Serialized form of a static registry.
///
/// ```toml
/// [graphs.graph1]
/// "storage.backend" = "cql"
/// "storage.hostname" = "db1"
/// "storage.cql.keyspace" = "ks1"
///
/// [traversal-sources]
/// g = "graph1"
/// ```
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct RegistrySettings {
    /// Graph name to backend settings.
    #[serde(default)]
    pub graphs: IndexMap<String, BackendConfig>,
    /// Traversal-source alias to the graph it was created over.
    #[serde(default)]
    pub traversal_sources: IndexMap<String, String>,
}

/// A registry fixed at load time.
#[derive(Debug, Clone, Default)]
pub struct StaticRegistry {
    graphs: IndexMap<String, BackendConfig>,
    traversal_sources: IndexMap<String, String>,
}

impl StaticRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a registry from parsed settings.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::UnknownGraph`] if a traversal source references
    /// a graph that is not declared.
    pub fn from_settings(settings: RegistrySettings) -> Result<Self, ConfigError> {
        for (alias, graph) in &settings.traversal_sources {
            if !settings.graphs.contains_key(graph) {
                return Err(ConfigError::UnknownGraph {
                    alias: alias.clone(),
                    graph: graph.clone(),
                });
            }
        }
        Ok(Self {
            graphs: settings.graphs,
            traversal_sources: settings.traversal_sources,
        })
    }

    /// Parses a registry from TOML text.
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        let settings: RegistrySettings = toml::from_str(text)?;
        Self::from_settings(settings)
    }

    /// Loads a registry from a TOML file.
    pub fn from_file(path: impl AsRef<std::path::Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)?;
        let registry = Self::from_toml_str(&text)?;
        tracing::debug!(
            path = %path.display(),
            graphs = registry.graphs.len(),
            sources = registry.traversal_sources.len(),
            "loaded graph registry"
        );
        Ok(registry)
    }

    /// Declares a graph.
    pub fn add_graph(&mut self, name: impl Into<String>, config: BackendConfig) {
        self.graphs.insert(name.into(), config);
    }

    /// Declares a traversal source over an already-declared graph.
    pub fn add_traversal_source(
        &mut self,
        alias: impl Into<String>,
        graph: impl Into<String>,
    ) -> Result<(), ConfigError> {
        let alias = alias.into();
        let graph = graph.into();
        if !self.graphs.contains_key(&graph) {
            return Err(ConfigError::UnknownGraph { alias, graph });
        }
        self.traversal_sources.insert(alias, graph);
        Ok(())
    }
}

impl GraphRegistry for StaticRegistry {
    fn traversal_source_names(&self) -> Vec<String> {
        self.traversal_sources.keys().cloned().collect()
    }

    fn graph_names(&self) -> Vec<String> {
        self.graphs.keys().cloned().collect()
    }

    fn traversal_source_config(&self, alias: &str) -> Option<BackendConfig> {
        let graph = self.traversal_sources.get(alias)?;
        self.graphs.get(graph).cloned()
    }

    fn graph_config(&self, name: &str) -> Option<BackendConfig> {
        self.graphs.get(name).cloned()
    }
}
