//! Per-alias execution bindings for textual query evaluation.

use std::sync::Arc;

use dashmap::DashMap;
use trellis_core::TraversalSource;

/// Name → handle bindings a textual query is evaluated against.
///
/// Each bindings instance exposes exactly one detached [`TraversalSource`]
/// under its alias name, so a query starting with that alias compiles and
/// evaluates without touching real storage. A scripting convenience, not a
/// live connection.
#[derive(Debug)]
pub struct ExecutionBindings {
    alias: String,
    source: TraversalSource,
}

impl ExecutionBindings {
    fn new(alias: &str) -> Self {
        Self {
            alias: alias.to_owned(),
            source: TraversalSource::detached(alias),
        }
    }

    /// The alias these bindings were created for.
    #[must_use]
    pub fn alias(&self) -> &str {
        &self.alias
    }

    /// Looks up the handle bound under `name`.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&TraversalSource> {
        (name == self.alias).then_some(&self.source)
    }
}

/// Process-wide cache of [`ExecutionBindings`], one per alias.
///
/// Lazily populated and never evicted. The optimistic read serves the hot
/// path without writer contention; a miss falls into the shard's entry lock,
/// which re-checks before constructing, so each alias is built exactly once
/// under concurrent first access.
#[derive(Debug, Default)]
pub struct BindingCache {
    bindings: DashMap<String, Arc<ExecutionBindings>>,
}

impl BindingCache {
    /// Creates an empty cache.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the bindings for `alias`, constructing them on first request.
    #[must_use]
    pub fn bindings_for(&self, alias: &str) -> Arc<ExecutionBindings> {
        if let Some(existing) = self.bindings.get(alias) {
            return Arc::clone(&existing);
        }
        self.bindings
            .entry(alias.to_owned())
            .or_insert_with(|| Arc::new(ExecutionBindings::new(alias)))
            .clone()
    }

    /// Number of aliases with cached bindings.
    #[must_use]
    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    /// Returns `true` if no bindings have been constructed yet.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Barrier;

    use super::*;

    #[test]
    fn test_bindings_expose_alias_handle() {
        let cache = BindingCache::new();
        let bindings = cache.bindings_for("g");
        assert_eq!(bindings.alias(), "g");
        assert_eq!(bindings.get("g").map(TraversalSource::alias), Some("g"));
        assert!(bindings.get("h").is_none());
    }

    #[test]
    fn test_repeat_requests_share_one_instance() {
        let cache = BindingCache::new();
        let first = cache.bindings_for("g");
        let second = cache.bindings_for("g");
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(cache.len(), 1);

        let other = cache.bindings_for("h");
        assert!(!Arc::ptr_eq(&first, &other));
        assert_eq!(cache.len(), 2);
    }

    #[test]
    fn test_concurrent_first_access_constructs_once() {
        const WORKERS: usize = 16;

        let cache = BindingCache::new();
        let barrier = Barrier::new(WORKERS);

        let handles: Vec<Arc<ExecutionBindings>> = std::thread::scope(|scope| {
            let workers: Vec<_> = (0..WORKERS)
                .map(|_| {
                    scope.spawn(|| {
                        barrier.wait();
                        cache.bindings_for("g")
                    })
                })
                .collect();
            workers.into_iter().map(|w| w.join().unwrap()).collect()
        });

        assert_eq!(cache.len(), 1);
        for handle in &handles[1..] {
            assert!(Arc::ptr_eq(&handles[0], handle));
        }
    }
}
