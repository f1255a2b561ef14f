//! Traversal-source alias to graph-name mapping.
//!
//! Queries name a traversal-source alias; policies govern graph names. The
//! mapping between them is derived once per process by joining the two sides
//! of the registry on [`StorageIdentity`]: aliases and graphs that resolve to
//! the same physical store belong together.
//!
//! Once populated (non-empty), the mapping is immutable for the life of the
//! process. Later registry changes are not observed; see the staleness note
//! in DESIGN.md.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use arc_swap::ArcSwap;
use trellis_config::{GraphRegistry, StorageIdentity};

/// Process-wide alias → graph-name cache.
///
/// Reads are lock-free. Population takes a serializing lock around the
/// check-populate-check sequence so the registry is enumerated at most once;
/// callers that lose the race observe the winner's fully built map.
pub struct TraversalMapping {
    mapping: ArcSwap<HashMap<String, String>>,
    populate_lock: Mutex<()>,
}

impl TraversalMapping {
    /// Creates an empty, unpopulated mapping.
    #[must_use]
    pub fn new() -> Self {
        Self {
            mapping: ArcSwap::from_pointee(HashMap::new()),
            populate_lock: Mutex::new(()),
        }
    }

    /// Builds the alias → graph mapping from the registry.
    ///
    /// No-op when already populated. Identity collisions (two graphs over
    /// the same store) collapse last-write-wins in the registry's graph
    /// enumeration order.
    pub fn populate_once(&self, registry: &dyn GraphRegistry) {
        if !self.mapping.load().is_empty() {
            return;
        }

        let _guard = match self.populate_lock.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        if !self.mapping.load().is_empty() {
            // lost the race; the winner's map is already visible
            return;
        }

        let mut identity_to_alias: HashMap<StorageIdentity, String> = HashMap::new();
        for alias in registry.traversal_source_names() {
            let Some(config) = registry.traversal_source_config(&alias) else {
                tracing::warn!(%alias, "traversal source has no backend configuration, skipping");
                continue;
            };
            identity_to_alias.insert(StorageIdentity::from_config(&config), alias);
        }

        let mut mapping = HashMap::new();
        for graph in registry.graph_names() {
            let Some(config) = registry.graph_config(&graph) else {
                continue;
            };
            let identity = StorageIdentity::from_config(&config);
            if let Some(alias) = identity_to_alias.get(&identity) {
                if let Some(previous) = mapping.insert(alias.clone(), graph.clone()) {
                    tracing::warn!(
                        %alias,
                        %previous,
                        %graph,
                        "graphs share a storage identity, keeping the later one"
                    );
                }
            }
        }

        tracing::debug!(entries = mapping.len(), "populated traversal mapping");
        self.mapping.store(Arc::new(mapping));
    }

    /// Resolves an alias to its graph name.
    ///
    /// Unpopulated mapping ⇒ `None`; the caller proceeds with an unresolved
    /// resource. Exactly one entry ⇒ that graph for any alias, since a
    /// single-graph deployment needs no disambiguation. Otherwise a direct
    /// lookup.
    #[must_use]
    pub fn resolve(&self, alias: &str) -> Option<String> {
        let mapping = self.mapping.load();
        if mapping.is_empty() {
            None
        } else if mapping.len() == 1 {
            mapping.values().next().cloned()
        } else {
            mapping.get(alias).cloned()
        }
    }

    /// Returns `true` once a non-empty mapping is in place.
    #[must_use]
    pub fn is_populated(&self) -> bool {
        !self.mapping.load().is_empty()
    }
}

impl Default for TraversalMapping {
    fn default() -> Self {
        Self::new()
    }
}
