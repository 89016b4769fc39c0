//! Preflight - offline argument coercion and call verification for contracts
//!
//! This crate takes a contract artifact (an ABI-like JSON description) and a
//! map of loosely-typed parameter values, coerces every constructor and
//! method argument to the type the ABI declares, builds a contract instance,
//! and verifies a method's unlocking script locally, without broadcasting.
//!
//! Compilation, call encoding and script interpretation belong to a
//! [`ScriptBackend`]. Enable the `simplicity` feature for a backend built on
//! the `SimplicityHL` compiler, or implement the trait for your own toolchain.
//!
//! # Example
//!
//! ```ignore
//! use preflight::{offline_verify, Artifact, DataMap};
//! use serde_json::json;
//!
//! // Load the artifact and describe the call
//! let artifact = Artifact::from_file("token.json")?;
//! let data = DataMap::new()
//!     .with("constructor", "owner", json!("02ab..."))
//!     .with("transfer", "amount", json!(10));
//!
//! // Build the instance, encode the call and interpret it
//! let result = offline_verify(&backend, &artifact, &data, "transfer", Some(&tx))?;
//! assert!(result.success);
//! ```
//!
//! # Configuration
//!
//! Fixed-size array arguments are truncated, coerced and padded by default.
//! Load a [`BuilderConfig`] to switch to truncation only:
//!
//! ```ignore
//! use preflight::{BuilderConfig, OfflineVerifier};
//!
//! let config = BuilderConfig::from_file("preflight.toml")?;
//! let verifier = OfflineVerifier::new(backend).config(config);
//! ```

pub mod artifact;
pub mod backend;
pub mod builder;
pub mod config;
pub mod data;
pub mod error;
#[cfg(feature = "simplicity")]
pub mod simplicity;
pub mod value;
pub mod verifier;

#[cfg(test)]
mod mock_backend;
#[cfg(test)]
mod test_fixtures;

// Re-export core types
pub use artifact::{AbiEntry, AbiEntryType, AbiType, Artifact, ParamEntry, CONSTRUCTOR};
pub use backend::{ScriptBackend, VerifyResult};
pub use builder::{
    build_offline_instance, build_offline_instance_with, build_params, OfflineInstance, ParamsMap,
};
pub use config::{ArrayCoercion, BuilderConfig};
pub use data::DataMap;
pub use error::{ArtifactError, BackendError, BuildError, VerifyError};
pub use value::Arg;
pub use verifier::{offline_verify, OfflineVerifier};

#[cfg(feature = "config")]
pub use config::ConfigError;

#[cfg(feature = "simplicity")]
pub use simplicity::SimplicityBackend;

// Re-export commonly used external types
pub use num_bigint::BigInt;
pub use serde_json;
