//! Shared fixtures for the adapter scenarios.

use std::net::SocketAddr;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use trellis_authz::bindings::ExecutionBindings;
use trellis_authz::{
    AuthorizationFact, AuthorizationGateway, Authorizer, CompiledQuery, EvalOutcome, PolicyError,
    QueryCompiler, ScriptError, TraversalMapping,
};
use trellis_config::backend::keys;
use trellis_config::{BackendConfig, StaticRegistry};
use trellis_core::bytecode::{Bytecode, Instruction};

/// How the recording authorizer decides.
#[derive(Debug, Clone, Copy)]
pub enum Mode {
    AllowAll,
    DenyWrites,
    Fail,
}

/// Authorizer fixture that records every fact it is consulted with.
pub struct RecordingAuthorizer {
    mode: Mode,
    pub seen: Mutex<Vec<AuthorizationFact>>,
}

impl RecordingAuthorizer {
    pub fn new(mode: Mode) -> Self {
        Self {
            mode,
            seen: Mutex::new(Vec::new()),
        }
    }

    pub fn decisions(&self) -> Vec<AuthorizationFact> {
        self.seen.lock().unwrap().clone()
    }
}

#[async_trait]
impl Authorizer for RecordingAuthorizer {
    async fn is_access_allowed(&self, fact: &AuthorizationFact) -> Result<bool, PolicyError> {
        self.seen.lock().unwrap().push(fact.clone());
        match self.mode {
            Mode::AllowAll => Ok(true),
            Mode::DenyWrites => Ok(!fact.access_type.is_write()),
            Mode::Fail => Err(PolicyError::new("policy backend unreachable")),
        }
    }
}

/// A minimal method-chain evaluator standing in for the scripting engine.
///
/// Number literals and quoted strings evaluate to scalars. A dotted chain
/// whose head is bound in the bindings becomes a traversal whose operators
/// are the chained method names; an unbound head is a missing method. The
/// literal `boom` anywhere in the text fails evaluation outright.
pub struct ChainCompiler;

struct ChainQuery {
    text: String,
}

impl CompiledQuery for ChainQuery {
    fn evaluate(&self, bindings: &ExecutionBindings) -> Result<EvalOutcome, ScriptError> {
        let text = self.text.trim();

        if text.contains("boom") {
            return Err(ScriptError::evaluation("boom"));
        }
        if text.parse::<f64>().is_ok() {
            return Ok(EvalOutcome::Scalar(serde_json::json!(text)));
        }
        if text.len() >= 2 && text.starts_with('\'') && text.ends_with('\'') {
            return Ok(EvalOutcome::Scalar(serde_json::json!(
                text.trim_matches('\'')
            )));
        }

        let Some((head, chain)) = text.split_once('.') else {
            return Err(ScriptError::missing_method(format!("{text}()")));
        };
        if bindings.get(head).is_none() {
            return Err(ScriptError::missing_method(format!("{head} is not bound")));
        }

        let mut bytecode = Bytecode::new();
        for segment in chain.split('.') {
            let operator = segment
                .split_once('(')
                .map_or(segment, |(operator, _)| operator);
            if operator.is_empty() {
                return Err(ScriptError::compilation(format!("bad segment: {segment}")));
            }
            bytecode.push(Instruction::new(operator));
        }
        Ok(EvalOutcome::Traversal(bytecode))
    }
}

impl QueryCompiler for ChainCompiler {
    fn compile(&self, text: &str) -> Result<Box<dyn CompiledQuery>, ScriptError> {
        Ok(Box::new(ChainQuery {
            text: text.to_owned(),
        }))
    }
}

/// Connection fixture with a fixed user and address.
pub struct StaticContext {
    pub user: Option<String>,
    pub address: Option<SocketAddr>,
}

impl StaticContext {
    pub fn authenticated(user: &str) -> Self {
        Self {
            user: Some(user.to_owned()),
            address: Some("10.1.2.3:52100".parse().unwrap()),
        }
    }

    pub fn anonymous() -> Self {
        Self {
            user: None,
            address: None,
        }
    }
}

impl trellis_authz::ConnectionContext for StaticContext {
    fn authenticated_user(&self) -> Option<String> {
        self.user.clone()
    }

    fn client_address(&self) -> Option<SocketAddr> {
        self.address
    }
}

fn cql_graph(host: &str, keyspace: &str) -> BackendConfig {
    BackendConfig::new()
        .with_setting(keys::STORAGE_BACKEND, "cql")
        .with_setting(keys::STORAGE_HOSTNAME, host)
        .with_setting(keys::STORAGE_CQL_KEYSPACE, keyspace)
}

/// One graph (`graph1`) reachable through alias `g`.
pub fn single_graph_mapping() -> Arc<TraversalMapping> {
    let mut registry = StaticRegistry::new();
    registry.add_graph("graph1", cql_graph("db1", "ks1"));
    registry.add_traversal_source("g", "graph1").unwrap();
    let mapping = Arc::new(TraversalMapping::new());
    mapping.populate_once(&registry);
    mapping
}

/// Builds a gateway over the chain compiler and a recording authorizer.
pub fn gateway(authorizer: Arc<RecordingAuthorizer>) -> Arc<AuthorizationGateway> {
    Arc::new(AuthorizationGateway::new(
        authorizer,
        Arc::new(ChainCompiler),
        single_graph_mapping(),
    ))
}
