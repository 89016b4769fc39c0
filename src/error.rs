//! Error types for preflight operations

use thiserror::Error;

/// Errors raised while loading an artifact
#[derive(Debug, Error)]
pub enum ArtifactError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse artifact: {0}")]
    Json(#[from] serde_json::Error),
}

/// Errors reported by a script backend
#[derive(Debug, Error)]
pub enum BackendError {
    #[error("Invalid hex string: {0}")]
    InvalidHex(String),

    #[error("Artifact has no program source")]
    MissingSource,

    #[error("Unsupported argument for type `{ty}`: {reason}")]
    Unsupported { ty: String, reason: String },

    #[error("`{entry}` expects {expected} arguments, got {got}")]
    Arity {
        entry: String,
        expected: usize,
        got: usize,
    },

    #[error("Unknown entry `{0}`")]
    UnknownEntry(String),

    #[error("Failed to compile contract: {0}")]
    Compile(String),

    #[error("Failed to encode call: {0}")]
    Encode(String),
}

/// Errors that can occur while building contract parameters
#[derive(Debug, Error)]
pub enum BuildError {
    #[error("Invalid bytes for `{entry}.{param}`: {source}")]
    InvalidBytes {
        entry: String,
        param: String,
        #[source]
        source: BackendError,
    },

    #[error("Value for `{entry}.{param}` is not an integer: {value}")]
    InvalidInt {
        entry: String,
        param: String,
        value: serde_json::Value,
    },

    #[error("`{entry}.{param}` declares {length} array elements")]
    ArrayTooLong {
        entry: String,
        param: String,
        length: usize,
    },

    #[error("Function entry without a name")]
    MissingName,

    #[error("Backend error: {0}")]
    Backend(#[from] BackendError),
}

/// Errors that can occur during offline verification
#[derive(Debug, Error)]
pub enum VerifyError {
    #[error("Method `{0}` is not a public function of the contract")]
    UnknownMethod(String),

    #[error("Build error: {0}")]
    Build(#[from] BuildError),

    #[error("Backend error: {0}")]
    Backend(#[from] BackendError),
}
