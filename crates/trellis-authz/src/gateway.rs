//! Shared authorization flow behind both protocol adapters.
//!
//! The gateway owns the collaborators and caches the adapters share: the
//! policy engine, the query compiler, the alias → graph mapping, and the
//! per-alias execution bindings. Adapters reduce their protocol's message to
//! (user, write intent, alias, address) and delegate here.

use std::net::SocketAddr;
use std::sync::Arc;

use trellis_core::Bytecode;

use crate::authorizer::{Authorizer, enforce};
use crate::bindings::BindingCache;
use crate::error::{AuthzError, AuthzResult};
use crate::fact::AuthorizationFact;
use crate::mapping::TraversalMapping;
use crate::script::{
    CompileErrorPolicy, EvalOutcome, QueryCompiler, strip_terminal_step, traversal_alias,
};

/// What the gateway learned about a textual query.
#[derive(Debug, PartialEq)]
pub struct QueryInspection {
    /// Alias extracted from the text's leading segment.
    pub alias: String,
    /// Evaluation result, reduced to what authorization needs.
    pub result: InspectedQuery,
}

/// Evaluation result, reduced to what authorization needs.
#[derive(Debug, PartialEq)]
pub enum InspectedQuery {
    /// The text evaluated to a primitive; there is nothing to authorize.
    Scalar,
    /// The text evaluated to a traversal with this operation sequence.
    Traversal(Bytecode),
    /// No operation sequence could be recovered; classified as a read.
    Indeterminate,
}

/// The authorization core shared by the protocol adapters.
pub struct AuthorizationGateway {
    authorizer: Arc<dyn Authorizer>,
    compiler: Arc<dyn QueryCompiler>,
    mapping: Arc<TraversalMapping>,
    bindings: BindingCache,
}

impl AuthorizationGateway {
    /// Creates a gateway over the given collaborators.
    #[must_use]
    pub fn new(
        authorizer: Arc<dyn Authorizer>,
        compiler: Arc<dyn QueryCompiler>,
        mapping: Arc<TraversalMapping>,
    ) -> Self {
        Self {
            authorizer,
            compiler,
            mapping,
            bindings: BindingCache::new(),
        }
    }

    /// The alias → graph mapping this gateway resolves against.
    #[must_use]
    pub fn mapping(&self) -> &TraversalMapping {
        &self.mapping
    }

    /// The per-alias execution bindings cache.
    #[must_use]
    pub fn bindings(&self) -> &BindingCache {
        &self.bindings
    }

    /// Compiles and evaluates query text to find its operation sequence.
    ///
    /// Missing-method failures never abort the request: the text is simply
    /// unresolvable as a traversal. Other script failures follow `policy`.
    ///
    /// # Errors
    ///
    /// [`AuthzError::Compile`] when the script fails and `policy` is
    /// [`CompileErrorPolicy::Propagate`].
    pub fn inspect_query(
        &self,
        query: &str,
        policy: CompileErrorPolicy,
    ) -> AuthzResult<QueryInspection> {
        let alias = traversal_alias(query).to_owned();
        let bindings = self.bindings.bindings_for(&alias);
        let text = strip_terminal_step(query);

        let outcome = self
            .compiler
            .compile(text)
            .and_then(|compiled| compiled.evaluate(&bindings));

        let result = match outcome {
            Ok(EvalOutcome::Scalar(_)) => InspectedQuery::Scalar,
            Ok(EvalOutcome::Traversal(bytecode)) => InspectedQuery::Traversal(bytecode),
            Ok(EvalOutcome::Unrecognized(type_name)) => {
                tracing::warn!(query, %type_name, "unrecognised traversal query");
                InspectedQuery::Indeterminate
            }
            Err(error) if error.is_missing_method() => {
                tracing::warn!(query, %error, "query does not resolve to a traversal");
                InspectedQuery::Indeterminate
            }
            Err(error) => match policy {
                CompileErrorPolicy::Suppress => {
                    tracing::warn!(query, %error, "suppressing script failure");
                    InspectedQuery::Indeterminate
                }
                CompileErrorPolicy::Propagate => {
                    return Err(AuthzError::compile(error.to_string()));
                }
            },
        };

        Ok(QueryInspection { alias, result })
    }

    /// Builds the fact for this request and enforces the policy decision.
    ///
    /// The alias is passed through the resolver; an unresolvable alias
    /// reaches the policy engine as an unknown resource.
    ///
    /// # Errors
    ///
    /// [`AuthzError::MissingIdentity`] without an authenticated user,
    /// [`AuthzError::Denied`] on refusal, [`AuthzError::PolicyEngine`] when
    /// the engine fails.
    pub async fn authorize(
        &self,
        user: Option<&str>,
        has_write_step: bool,
        alias: Option<&str>,
        client_address: Option<SocketAddr>,
    ) -> AuthzResult<()> {
        let resource = self.mapping.resolve(alias.unwrap_or_default());
        let fact = AuthorizationFact::build(
            user,
            has_write_step,
            resource,
            client_address.map(|address| address.ip().to_string()),
        )?;
        enforce(self.authorizer.as_ref(), &fact).await
    }
}
