//! One-time establishment of the environment name.
//!
//! The name is either configured explicitly or inferred from the raw value of
//! a well-known stage source passed through an [`EnvMatcher`]. Inference runs
//! lazily on first demand, and every caller that arrives while it is running
//! joins the same lookup. A failed lookup is reported to every waiter and
//! then forgotten, so a later call starts a fresh attempt.

use std::fmt;
use std::sync::{Arc, Mutex, PoisonError};

use futures::future::{BoxFuture, FutureExt, Shared};
use serde_json::Value;

use super::matcher::EnvMatcher;
use crate::diagnostics::{Diagnostic, DiagnosticKind, Reporter};
use crate::error::ResolutionError;
use crate::sources::VariableResolver;

/// Source spec looked up to infer the environment name.
pub const STAGE_SOURCE: &str = "opt:stage";

/// How the environment name is established.
#[derive(Debug, Clone)]
pub enum EnvironmentSetup {
    /// Use this name; no lookup happens.
    Explicit(String),
    /// Look up [`STAGE_SOURCE`] and map the raw value through the matcher.
    Inferred(EnvMatcher),
}

impl Default for EnvironmentSetup {
    fn default() -> Self {
        Self::Inferred(EnvMatcher::new())
    }
}

/// How an established environment name was determined.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EnvironmentSource {
    /// Configured explicitly.
    Explicit,
    /// Inferred from the raw stage value.
    Inferred { raw: String },
}

impl fmt::Display for EnvironmentSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Explicit => write!(f, "explicit env setting"),
            Self::Inferred { raw } => write!(f, "inferred from ${{{}}} = '{}'", STAGE_SOURCE, raw),
        }
    }
}

/// An established environment name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedEnvironment {
    /// The canonical environment name.
    pub name: String,
    /// How the name was determined.
    pub source: EnvironmentSource,
}

type PendingBootstrap = Shared<BoxFuture<'static, Result<ResolvedEnvironment, ResolutionError>>>;

enum BootstrapState {
    Unset,
    Pending(PendingBootstrap),
    Ready(ResolvedEnvironment),
}

/// Lazily established, process-wide environment name.
pub struct EnvironmentCell {
    setup: EnvironmentSetup,
    state: Mutex<BootstrapState>,
}

impl EnvironmentCell {
    /// Create an empty cell.
    pub fn new(setup: EnvironmentSetup) -> Self {
        Self {
            setup,
            state: Mutex::new(BootstrapState::Unset),
        }
    }

    /// The established environment, if any.
    pub fn get(&self) -> Option<ResolvedEnvironment> {
        match &*self.lock() {
            BootstrapState::Ready(env) => Some(env.clone()),
            _ => None,
        }
    }

    /// Establish the environment, or join the attempt already in flight.
    pub async fn get_or_init(
        &self,
        resolver: &Arc<dyn VariableResolver>,
        reporter: &dyn Reporter,
    ) -> Result<ResolvedEnvironment, ResolutionError> {
        let pending = {
            let mut state = self.lock();
            match &*state {
                BootstrapState::Ready(env) => return Ok(env.clone()),
                BootstrapState::Pending(pending) => pending.clone(),
                BootstrapState::Unset => match &self.setup {
                    EnvironmentSetup::Explicit(name) => {
                        let env = ResolvedEnvironment {
                            name: name.clone(),
                            source: EnvironmentSource::Explicit,
                        };
                        tracing::debug!(env = %env.name, "environment set explicitly");
                        *state = BootstrapState::Ready(env.clone());
                        return Ok(env);
                    }
                    EnvironmentSetup::Inferred(matcher) => {
                        let pending = infer(Arc::clone(resolver), matcher.clone())
                            .boxed()
                            .shared();
                        *state = BootstrapState::Pending(pending.clone());
                        pending
                    }
                },
            }
        };

        let result = pending.clone().await;

        {
            let mut state = self.lock();
            let current = matches!(&*state, BootstrapState::Pending(p) if p.ptr_eq(&pending));
            if current {
                *state = match &result {
                    Ok(env) => {
                        tracing::debug!(env = %env.name, source = %env.source, "environment established");
                        BootstrapState::Ready(env.clone())
                    }
                    Err(_) => BootstrapState::Unset,
                };
            }
        }

        if let Err(err) = &result {
            reporter.report(&Diagnostic::new(
                DiagnosticKind::BootstrapFailed,
                STAGE_SOURCE,
                err,
            ));
        }
        result
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, BootstrapState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

async fn infer(
    resolver: Arc<dyn VariableResolver>,
    matcher: EnvMatcher,
) -> Result<ResolvedEnvironment, ResolutionError> {
    let failure = |message: String| ResolutionError::EnvironmentBootstrapFailure {
        source_spec: STAGE_SOURCE.to_string(),
        message,
    };

    let value = resolver
        .resolve(STAGE_SOURCE)
        .await
        .map_err(|e| failure(format!("{:#}", e)))?;

    let raw = match value {
        Value::String(s) => s,
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Null => return Err(failure("stage source returned no value".to_string())),
        other => {
            return Err(failure(format!(
                "stage source returned a non-scalar value: {}",
                other
            )))
        }
    };

    Ok(ResolvedEnvironment {
        name: matcher.infer(&raw).to_string(),
        source: EnvironmentSource::Inferred { raw },
    })
}
