//! Error type shared by every stage of the aerodynamic analysis.

use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, AeroError>;

#[derive(Debug, Error)]
pub enum AeroError {
    /// A geometry attribute needed by one of the drag or lift models is absent.
    #[error("component '{component}' is missing required geometry attribute '{attribute}'")]
    MissingGeometry {
        component: String,
        attribute: &'static str,
    },

    #[error("vehicle has no component tagged '{0}'")]
    UnknownComponent(String),

    #[error("flight state batch must contain at least one row")]
    EmptyBatch,

    #[error("flight state field '{field}' was never set")]
    MissingField { field: &'static str },

    #[error("flight state field '{field}' has {found} rows, expected {expected}")]
    LengthMismatch {
        field: &'static str,
        expected: usize,
        found: usize,
    },

    #[error("invalid value {value} for '{field}' at row {row}")]
    InvalidValue {
        field: &'static str,
        row: usize,
        value: f64,
    },

    #[error("invalid parameter '{name}': {reason}")]
    InvalidParameter { name: &'static str, reason: String },

    #[error("analysis must be initialized before evaluation")]
    NotInitialized,

    #[error("vortex lattice system for wing '{0}' is singular")]
    Singular(String),

    #[error("failed to access {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

impl AeroError {
    pub(crate) fn missing(component: &str, attribute: &'static str) -> Self {
        AeroError::MissingGeometry {
            component: component.to_string(),
            attribute,
        }
    }
}
