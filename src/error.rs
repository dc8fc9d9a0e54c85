//! Error taxonomy
//!
//! The simulation has no recoverable runtime failures; everything here is a
//! configuration or authoring mistake caught at construction time.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum SimError {
    #[error("unknown player mode `{0}`")]
    UnknownMode(String),
    #[error("speed index {index} out of range (table has {len} entries)")]
    SpeedIndexOutOfRange { index: usize, len: usize },
    #[error("level registry is empty")]
    EmptyRegistry,
    #[error("level `{name}` has invalid length {length}")]
    InvalidLevelLength { name: String, length: f32 },
    #[error("`{field}` must be finite and {rule}, got {value}")]
    InvalidTiming {
        field: &'static str,
        rule: &'static str,
        value: f64,
    },
    #[error("invalid settings: {0}")]
    Settings(#[from] serde_json::Error),
    #[error(transparent)]
    Io(#[from] std::io::Error),
}
