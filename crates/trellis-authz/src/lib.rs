//! # trellis-authz
//!
//! Query authorization gateway for the Trellis graph traversal server.
//!
//! Every inbound query, textual or pre-serialized, is classified as read or
//! write, mapped to the graph it targets, and checked against the pluggable
//! access-control policy before it may reach the execution engine.
//!
//! ## Modules
//!
//! - [`classify`] - Read/write classification of operation sequences
//! - [`mapping`] - Traversal-source alias to graph-name resolution
//! - [`bindings`] - Per-alias execution bindings for textual queries
//! - [`fact`] - The normalized fact record handed to the policy engine
//! - [`authorizer`] - Policy engine boundary and decision enforcement
//! - [`script`] - Query compiler boundary
//! - [`gateway`] - The shared authorization flow
//! - [`middleware`] - Protocol adapters for the binary and HTTP pipelines
//! - [`audit`] - Audit trail of rendered decisions

pub mod audit;
pub mod authorizer;
pub mod bindings;
pub mod classify;
pub mod error;
pub mod fact;
pub mod gateway;
pub mod mapping;
pub mod middleware;
pub mod script;

pub use audit::AUDIT_TARGET;
pub use authorizer::{Authorizer, PolicyError, enforce};
pub use bindings::{BindingCache, ExecutionBindings};
pub use classify::{classify, has_write_step};
pub use error::{AuthzError, AuthzResult};
pub use fact::AuthorizationFact;
pub use gateway::{AuthorizationGateway, InspectedQuery, QueryInspection};
pub use mapping::TraversalMapping;
pub use middleware::{
    BinaryAuthorizationFilter, ConnectionContext, HttpAuthorizationFilter, HttpVerdict, Verdict,
};
pub use script::{
    CompileErrorPolicy, CompiledQuery, DEFAULT_ALIAS, EvalOutcome, QueryCompiler, ScriptError,
};
