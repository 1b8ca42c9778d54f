//! Deduplicating resolution scheduler.
//!
//! Each configuration key moves through
//! `not-started -> in-flight -> resolved | failed`, exactly once. The first
//! request for any key opens a one-shot bulk pass that starts every declared
//! key; later requests join the in-flight computation or read the cached
//! outcome. Failed outcomes are cached too and replayed without retrying.

use std::collections::HashMap;
use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use futures::future::{join_all, BoxFuture, FutureExt, Shared};
use serde_json::Value;

use super::declarations::Declarations;
use super::expander::expand;
use super::selector::select;
use crate::config::EasyEnvConfig;
use crate::diagnostics::{Diagnostic, DiagnosticKind, Reporter};
use crate::environment::{
    EnvironmentCell, EnvironmentSetup, EnvironmentSource, ResolvedEnvironment,
};
use crate::error::{ResolutionError, Result};
use crate::sources::VariableResolver;

type SharedResolution = Shared<BoxFuture<'static, std::result::Result<Value, ResolutionError>>>;

enum Outcome {
    InFlight(SharedResolution),
    Resolved(Value),
    Failed(ResolutionError),
}

/// Observable state of one configuration key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResolutionStatus {
    /// No computation has been started.
    NotStarted,
    /// A computation is running; requests join it.
    InFlight,
    /// The key resolved; requests return the cached value.
    Resolved,
    /// The key failed; requests return the cached error.
    Failed,
}

impl fmt::Display for ResolutionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::NotStarted => "not started",
            Self::InFlight => "in flight",
            Self::Resolved => "resolved",
            Self::Failed => "failed",
        };
        f.write_str(label)
    }
}

/// Gate that opens for exactly one caller.
#[derive(Debug, Default)]
struct OneShotGate(AtomicBool);

impl OneShotGate {
    /// Returns `true` for the first caller only.
    fn open(&self) -> bool {
        !self.0.swap(true, Ordering::AcqRel)
    }

    fn is_open(&self) -> bool {
        self.0.load(Ordering::Acquire)
    }
}

struct EngineInner {
    declarations: Declarations,
    environment: EnvironmentCell,
    resolver: Arc<dyn VariableResolver>,
    reporter: Arc<dyn Reporter>,
    outcomes: Mutex<HashMap<String, Outcome>>,
    bulk_pass: OneShotGate,
}

enum Joined {
    Ready(std::result::Result<Value, ResolutionError>),
    Pending(SharedResolution),
}

/// Resolves configuration keys on demand, computing each key at most once.
///
/// Cloning is cheap; clones share one cache.
///
/// Computations run as tokio tasks, so the engine must be used from within a
/// tokio runtime.
///
/// # Example
///
/// ```
/// use easyenv::diagnostics::SilentReporter;
/// use easyenv::environment::EnvironmentSetup;
/// use easyenv::resolution::{Declarations, PerEnvironmentValues, RawValue, ResolutionEngine};
/// use easyenv::sources::StaticSource;
/// use serde_json::json;
/// use std::sync::Arc;
///
/// let declarations = Declarations::new().with_key(
///     "apiKeys",
///     PerEnvironmentValues::new()
///         .with_value("prod", RawValue::from(json!(["ssm:apiKey"])))
///         .with_value("default", RawValue::from(json!(["dev-key"]))),
/// );
/// let source = StaticSource::new().with_value("ssm:apiKey", json!("k-123"));
/// let engine = ResolutionEngine::new(
///     declarations,
///     EnvironmentSetup::Explicit("prod".into()),
///     Arc::new(source),
///     Arc::new(SilentReporter),
/// );
///
/// let runtime = tokio::runtime::Runtime::new().unwrap();
/// let value = runtime.block_on(engine.request_key("apiKeys")).unwrap();
/// assert_eq!(value, json!(["k-123"]));
/// ```
#[derive(Clone)]
pub struct ResolutionEngine {
    inner: Arc<EngineInner>,
}

impl ResolutionEngine {
    /// Create an engine over a fixed resolution map.
    pub fn new(
        declarations: Declarations,
        setup: EnvironmentSetup,
        resolver: Arc<dyn VariableResolver>,
        reporter: Arc<dyn Reporter>,
    ) -> Self {
        Self {
            inner: Arc::new(EngineInner {
                declarations,
                environment: EnvironmentCell::new(setup),
                resolver,
                reporter,
                outcomes: Mutex::new(HashMap::new()),
                bulk_pass: OneShotGate::default(),
            }),
        }
    }

    /// Create an engine from a loaded configuration.
    ///
    /// # Errors
    ///
    /// Returns `InvalidMatcher` for an env matcher that does not compile and
    /// `ConfigValidationError` for a malformed resolution entry.
    pub fn from_config(
        config: &EasyEnvConfig,
        resolver: Arc<dyn VariableResolver>,
        reporter: Arc<dyn Reporter>,
    ) -> Result<Self> {
        let declarations = Declarations::from_map(&config.env_resolutions)?;
        let setup = config.environment_setup()?;
        Ok(Self::new(declarations, setup, resolver, reporter))
    }

    /// The declared resolution map.
    pub fn declarations(&self) -> &Declarations {
        &self.inner.declarations
    }

    /// Establish the environment name, joining any bootstrap in flight.
    pub async fn environment(&self) -> std::result::Result<ResolvedEnvironment, ResolutionError> {
        self.inner
            .environment
            .get_or_init(&self.inner.resolver, self.inner.reporter.as_ref())
            .await
    }

    /// How the environment name was established, once it has been.
    pub fn environment_source(&self) -> Option<EnvironmentSource> {
        self.inner.environment.get().map(|env| env.source)
    }

    /// Resolve one configuration key.
    ///
    /// The first request (for any key) starts the computation of every
    /// declared key. A key already in flight is joined rather than started
    /// again; a settled key returns its cached value or error immediately.
    pub async fn request_key(&self, key: &str) -> std::result::Result<Value, ResolutionError> {
        let env = self.environment().await?;

        if self.inner.bulk_pass.open() {
            tracing::debug!(
                env = %env.name,
                keys = self.inner.declarations.len(),
                "starting bulk pass"
            );
            self.inner.start_all(&env.name);
        }

        if !self.inner.declarations.contains(key) {
            let err = ResolutionError::UnknownKey {
                key: key.to_string(),
            };
            self.inner
                .reporter
                .report(&Diagnostic::new(DiagnosticKind::UnknownKey, key, &err));
            return Err(err);
        }

        let result = match self.inner.join(key, &env.name) {
            Joined::Ready(result) => result,
            Joined::Pending(pending) => pending.await,
        };

        result.map_err(|err| {
            self.inner
                .reporter
                .report(&Diagnostic::new(DiagnosticKind::KeyFailed, key, &err));
            err
        })
    }

    /// Request every declared key concurrently.
    ///
    /// Results are returned in declaration order.
    pub async fn resolve_all(&self) -> Vec<(String, std::result::Result<Value, ResolutionError>)> {
        let keys: Vec<String> = self.inner.declarations.keys().map(str::to_string).collect();
        let results = join_all(keys.iter().map(|key| self.request_key(key))).await;
        keys.into_iter().zip(results).collect()
    }

    /// Current state of `key`. Undeclared keys report `NotStarted`.
    pub fn status(&self, key: &str) -> ResolutionStatus {
        match self.inner.lock().get(key) {
            None => ResolutionStatus::NotStarted,
            Some(Outcome::InFlight(_)) => ResolutionStatus::InFlight,
            Some(Outcome::Resolved(_)) => ResolutionStatus::Resolved,
            Some(Outcome::Failed(_)) => ResolutionStatus::Failed,
        }
    }

    /// Resolved keys and values in declaration order. Failed and unsettled
    /// keys are skipped.
    pub fn resolved(&self) -> Vec<(String, Value)> {
        let outcomes = self.inner.lock();
        self.inner
            .declarations
            .keys()
            .filter_map(|key| match outcomes.get(key) {
                Some(Outcome::Resolved(value)) => Some((key.to_string(), value.clone())),
                _ => None,
            })
            .collect()
    }

    /// Whether the one-time bulk pass has been triggered.
    pub fn bulk_pass_started(&self) -> bool {
        self.inner.bulk_pass.is_open()
    }
}

impl EngineInner {
    fn lock(&self) -> MutexGuard<'_, HashMap<String, Outcome>> {
        self.outcomes.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn start_all(self: &Arc<Self>, env: &str) {
        let mut outcomes = self.lock();
        for key in self.declarations.keys() {
            if !outcomes.contains_key(key) {
                let pending = self.spawn(key, env);
                outcomes.insert(key.to_string(), Outcome::InFlight(pending));
            }
        }
    }

    /// Check-and-start under one lock, so a key is never started twice.
    fn join(self: &Arc<Self>, key: &str, env: &str) -> Joined {
        let mut outcomes = self.lock();
        match outcomes.get(key) {
            Some(Outcome::Resolved(value)) => Joined::Ready(Ok(value.clone())),
            Some(Outcome::Failed(err)) => Joined::Ready(Err(err.clone())),
            Some(Outcome::InFlight(pending)) => Joined::Pending(pending.clone()),
            None => {
                let pending = self.spawn(key, env);
                outcomes.insert(key.to_string(), Outcome::InFlight(pending.clone()));
                Joined::Pending(pending)
            }
        }
    }

    fn spawn(self: &Arc<Self>, key: &str, env: &str) -> SharedResolution {
        tracing::debug!(key, env, "starting resolution");

        let inner = Arc::clone(self);
        let task_key = key.to_string();
        let env = env.to_string();
        let task = tokio::spawn(async move {
            let result = inner.compute(&task_key, &env).await;
            inner.settle(&task_key, &result);
            result
        });

        let inner = Arc::clone(self);
        let key = key.to_string();
        async move {
            match task.await {
                Ok(result) => result,
                Err(e) => {
                    // The task died before settling; record the abort in its place.
                    let result = Err(ResolutionError::ComputationAborted {
                        key: key.clone(),
                        message: e.to_string(),
                    });
                    inner.settle(&key, &result);
                    result
                }
            }
        }
        .boxed()
        .shared()
    }

    async fn compute(
        self: &Arc<Self>,
        key: &str,
        env: &str,
    ) -> std::result::Result<Value, ResolutionError> {
        let values =
            self.declarations
                .get(key)
                .ok_or_else(|| ResolutionError::UnknownKey {
                    key: key.to_string(),
                })?;
        let raw = select(key, values, env)?;

        let inner = Arc::clone(self);
        let resolve = move |marker: String| {
            let inner = Arc::clone(&inner);
            async move { inner.resolve_marker(marker).await }
        };
        expand(raw, &resolve).await
    }

    async fn resolve_marker(&self, marker: String) -> std::result::Result<Value, ResolutionError> {
        tracing::debug!(marker = %marker, "looking up marker");
        self.resolver.resolve(&marker).await.map_err(|e| {
            let message = format!("{:#}", e);
            self.reporter.report(&Diagnostic::new(
                DiagnosticKind::MarkerFailed,
                marker.as_str(),
                &message,
            ));
            ResolutionError::UpstreamLookupFailure {
                source_spec: marker,
                message,
            }
        })
    }

    fn settle(&self, key: &str, result: &std::result::Result<Value, ResolutionError>) {
        let outcome = match result {
            Ok(value) => {
                tracing::debug!(key, "resolved");
                Outcome::Resolved(value.clone())
            }
            Err(err) => {
                tracing::warn!(key, kind = err.kind(), "resolution failed: {}", err);
                Outcome::Failed(err.clone())
            }
        };
        self.lock().insert(key.to_string(), outcome);
    }
}
