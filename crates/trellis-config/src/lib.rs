//! Graph and storage backend configuration for the Trellis server.
//!
//! This crate owns the configuration side of resource resolution:
//!
//! - [`BackendConfig`] — a key/value snapshot of one graph's storage settings
//! - [`StorageIdentity`] — the derived identity of the physical backing store,
//!   used to join traversal-source aliases to graph names
//! - [`GraphRegistry`] — the provider boundary enumerating configured aliases
//!   and graphs, with a static TOML-loadable implementation

pub mod backend;
pub mod error;
pub mod identity;
pub mod registry;

pub use backend::BackendConfig;
pub use error::ConfigError;
pub use identity::StorageIdentity;
pub use registry::{GraphRegistry, RegistrySettings, StaticRegistry};
