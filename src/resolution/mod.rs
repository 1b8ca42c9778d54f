//! Key resolution: select a raw value per environment, expand its deferred
//! markers, and cache the outcome per key.
//!
//! - [`value`] - Raw declared values and deferred markers
//! - [`selector`] - Per-environment value selection with `default` fallback
//! - [`expander`] - Concurrent, structure-preserving expansion
//! - [`declarations`] - The declared resolution map
//! - [`engine`] - Deduplicating scheduler over all of the above

pub mod declarations;
pub mod engine;
pub mod expander;
pub mod selector;
pub mod value;

pub use declarations::Declarations;
pub use engine::{ResolutionEngine, ResolutionStatus};
pub use expander::expand;
pub use selector::{select, PerEnvironmentValues, DEFAULT_ENVIRONMENT};
pub use value::{RawValue, MARKER_DELIMITER};
