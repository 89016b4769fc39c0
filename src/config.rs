//! Configuration for the parameter builder
//!
//! The builder works with [`BuilderConfig::default`]; a TOML file can
//! override it when the `config` feature is enabled.
//!
//! # Example Configuration File (preflight.toml)
//!
//! ```toml
//! [builder]
//! array_coercion = "truncate"
//! ```

use serde::{Deserialize, Serialize};
#[cfg(feature = "config")]
use std::path::Path;
#[cfg(feature = "config")]
use thiserror::Error;

/// How fixed-size array arguments are shaped
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ArrayCoercion {
    /// Truncate to the declared length, coerce each element, pad with defaults
    #[default]
    Coerce,
    /// Truncate to the declared length and leave elements untouched
    Truncate,
}

impl std::fmt::Display for ArrayCoercion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Coerce => write!(f, "coerce"),
            Self::Truncate => write!(f, "truncate"),
        }
    }
}

/// Parameter builder settings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct BuilderConfig {
    #[serde(default)]
    pub array_coercion: ArrayCoercion,
}

/// Configuration file wrapper (for TOML structure)
#[cfg(feature = "config")]
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
struct ConfigFile {
    #[serde(default)]
    builder: BuilderConfig,
}

impl BuilderConfig {
    /// Set the array coercion mode
    #[must_use]
    pub const fn with_array_coercion(mut self, mode: ArrayCoercion) -> Self {
        self.array_coercion = mode;
        self
    }

    /// Configuration that only truncates arrays
    #[must_use]
    pub const fn truncating() -> Self {
        Self {
            array_coercion: ArrayCoercion::Truncate,
        }
    }
}

#[cfg(feature = "config")]
impl BuilderConfig {
    /// Load configuration from a TOML file
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_toml(&contents)
    }

    /// Parse configuration from TOML string
    ///
    /// # Errors
    ///
    /// Returns an error if the TOML is invalid.
    pub fn from_toml(toml_str: &str) -> Result<Self, ConfigError> {
        let file: ConfigFile = toml::from_str(toml_str)?;
        Ok(file.builder)
    }

    /// Serialize configuration to TOML string
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        let file = ConfigFile { builder: *self };
        Ok(toml::to_string_pretty(&file)?)
    }

    /// Save configuration to a file
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be written.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<(), ConfigError> {
        let toml_str = self.to_toml()?;
        std::fs::write(path, toml_str)?;
        Ok(())
    }
}

/// Configuration errors
#[cfg(feature = "config")]
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Serialize error: {0}")]
    Serialize(#[from] toml::ser::Error),
}
