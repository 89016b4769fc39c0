//! Contract artifacts and ABI type strings

use crate::error::ArtifactError;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::OnceLock;

/// Identifier used for the constructor entry in data and parameter maps
pub const CONSTRUCTOR: &str = "constructor";

/// Kind of an ABI entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AbiEntryType {
    Constructor,
    Function,
}

/// A typed parameter of an ABI entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParamEntry {
    pub name: String,
    #[serde(rename = "type")]
    pub ty: String,
}

impl ParamEntry {
    /// Create a parameter declaration
    pub fn new(name: &str, ty: &str) -> Self {
        Self {
            name: name.to_string(),
            ty: ty.to_string(),
        }
    }
}

/// One constructor or function declaration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AbiEntry {
    #[serde(rename = "type")]
    pub kind: AbiEntryType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub index: Option<u32>,
    #[serde(default)]
    pub params: Vec<ParamEntry>,
}

impl AbiEntry {
    /// Key of this entry in data and parameter maps
    ///
    /// `"constructor"` for the constructor, the declared name for functions.
    /// Returns `None` for a function without a name.
    #[must_use]
    pub fn identifier(&self) -> Option<&str> {
        match self.kind {
            AbiEntryType::Constructor => Some(CONSTRUCTOR),
            AbiEntryType::Function => self.name.as_deref(),
        }
    }

    /// Whether this entry is a callable public function
    #[must_use]
    pub fn is_function(&self) -> bool {
        self.kind == AbiEntryType::Function
    }
}

/// Machine-readable description of a contract's constructor and functions
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Artifact {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<u32>,
    #[serde(default)]
    pub contract: String,
    pub abi: Vec<AbiEntry>,
    /// Program source for backends that compile the contract themselves
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
    /// Compiled locking script template
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hex: Option<String>,
}

impl Artifact {
    /// Parse an artifact from a JSON string
    ///
    /// # Examples
    ///
    /// ```
    /// use preflight::Artifact;
    ///
    /// let artifact = Artifact::from_json(r#"{
    ///     "contract": "Counter",
    ///     "abi": [
    ///         { "type": "constructor", "params": [{ "name": "count", "type": "int" }] },
    ///         { "type": "function", "name": "increment", "params": [] }
    ///     ]
    /// }"#).unwrap();
    /// assert_eq!(artifact.contract, "Counter");
    /// assert!(artifact.function("increment").is_some());
    /// ```
    ///
    /// # Errors
    ///
    /// Returns an error if the JSON does not describe an artifact.
    pub fn from_json(json: &str) -> Result<Self, ArtifactError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Build an artifact from an already parsed JSON value
    ///
    /// # Errors
    ///
    /// Returns an error if the value does not describe an artifact.
    pub fn from_value(value: serde_json::Value) -> Result<Self, ArtifactError> {
        Ok(serde_json::from_value(value)?)
    }

    /// Load an artifact from a JSON file
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ArtifactError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_json(&contents)
    }

    /// The constructor entry, if declared
    #[must_use]
    pub fn constructor(&self) -> Option<&AbiEntry> {
        self.abi
            .iter()
            .find(|entry| entry.kind == AbiEntryType::Constructor)
    }

    /// The public function with the given name, if declared
    #[must_use]
    pub fn function(&self, name: &str) -> Option<&AbiEntry> {
        self.abi
            .iter()
            .find(|entry| entry.is_function() && entry.name.as_deref() == Some(name))
    }

    /// Names of all declared public functions, in declaration order
    pub fn function_names(&self) -> impl Iterator<Item = &str> {
        self.abi
            .iter()
            .filter(|entry| entry.is_function())
            .filter_map(|entry| entry.name.as_deref())
    }
}

/// Largest array length an artifact may declare
pub const MAX_ARRAY_LENGTH: usize = 4096;

/// A type string split into element type and declared array length
///
/// Scalars have `length == 0`. Lengths beyond `usize` saturate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AbiType {
    pub elem: String,
    pub length: usize,
}

impl AbiType {
    /// Parse `"<letters>[<digits>]"`; anything else is a scalar
    ///
    /// # Examples
    ///
    /// ```
    /// use preflight::artifact::AbiType;
    ///
    /// let ty = AbiType::parse("int[3]");
    /// assert_eq!(ty.elem, "int");
    /// assert_eq!(ty.length, 3);
    ///
    /// let scalar = AbiType::parse("PubKey");
    /// assert_eq!(scalar.length, 0);
    /// ```
    ///
    /// # Panics
    ///
    /// Panics if the built-in pattern fails to compile (it is a constant).
    #[must_use]
    pub fn parse(abi_type: &str) -> Self {
        static ARRAY_TYPE: OnceLock<Regex> = OnceLock::new();
        let pattern = ARRAY_TYPE
            .get_or_init(|| Regex::new(r"([a-zA-Z]+)\[(\d+)\]").expect("valid pattern"));

        match pattern.captures(abi_type) {
            Some(caps) => Self {
                elem: caps[1].to_string(),
                length: caps[2].parse().unwrap_or(usize::MAX),
            },
            None => Self {
                elem: abi_type.to_string(),
                length: 0,
            },
        }
    }

    /// Whether this is a fixed-size array type
    #[must_use]
    pub const fn is_array(&self) -> bool {
        self.length > 0
    }
}
