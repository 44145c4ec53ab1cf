//! Error types
//!
//! Pool exhaustion is an expected runtime condition and is absorbed by the
//! tick pipeline. Everything else here indicates a configuration or
//! collaborator problem.

use thiserror::Error;

use crate::sim::EntityKind;

/// Entity pool errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PoolError {
    /// Every slot is active; the spawn request is dropped
    #[error("entity pool exhausted ({capacity} slots in use)")]
    Exhausted { capacity: usize },

    /// No template is registered for the requested kind
    #[error("no template loaded for entity kind {0:?}")]
    InvalidKind(EntityKind),
}

/// Tuning (configuration) errors
#[derive(Error, Debug)]
pub enum TuningError {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Parse error
    #[error("Parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// A value is outside its accepted range
    #[error("Invalid tuning value `{field}`: {reason}")]
    Invalid { field: &'static str, reason: String },
}

/// Errors raised while loading templates from the presenter
#[derive(Error, Debug)]
pub enum LoadError {
    /// The tuning handed to `load` failed validation
    #[error("invalid tuning: {0}")]
    Tuning(#[from] TuningError),

    #[error("failed to load template for {kind:?}: {reason}")]
    Template { kind: EntityKind, reason: String },
}
