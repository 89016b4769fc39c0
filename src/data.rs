//! Loosely-typed parameter data supplied by the caller

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;

/// Raw values for one ABI entry, keyed by parameter name
pub type EntryData = Map<String, Value>;

/// Raw parameter values keyed by entry identifier and parameter name
///
/// An entry or parameter missing from the map means "use the default".
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DataMap {
    entries: BTreeMap<String, EntryData>,
}

impl DataMap {
    /// Create an empty data map
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the raw value of one parameter
    ///
    /// # Examples
    ///
    /// ```
    /// use preflight::DataMap;
    /// use serde_json::json;
    ///
    /// let data = DataMap::new()
    ///     .with("constructor", "owner", json!("00ff"))
    ///     .with("transfer", "amount", json!(10));
    /// assert_eq!(data.param("transfer", "amount"), Some(&json!(10)));
    /// ```
    #[must_use]
    pub fn with(mut self, entry: &str, param: &str, value: Value) -> Self {
        self.insert(entry, param, value);
        self
    }

    /// Register an entry without supplying any parameter
    ///
    /// Every declared parameter of that entry then takes its default.
    #[must_use]
    pub fn with_entry(mut self, entry: &str) -> Self {
        self.entries.entry(entry.to_string()).or_default();
        self
    }

    /// Set the raw value of one parameter in place
    pub fn insert(&mut self, entry: &str, param: &str, value: Value) {
        self.entries
            .entry(entry.to_string())
            .or_default()
            .insert(param.to_string(), value);
    }

    /// Parse a data map from a JSON object of objects
    ///
    /// # Errors
    ///
    /// Returns an error if the JSON is not an object whose values are objects.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Raw values for an entry, if supplied
    #[must_use]
    pub fn entry(&self, entry: &str) -> Option<&EntryData> {
        self.entries.get(entry)
    }

    /// Raw value for one parameter, if supplied
    #[must_use]
    pub fn param(&self, entry: &str, param: &str) -> Option<&Value> {
        self.entry(entry).and_then(|data| data.get(param))
    }

    /// Whether no entry was supplied
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl From<BTreeMap<String, EntryData>> for DataMap {
    fn from(entries: BTreeMap<String, EntryData>) -> Self {
        Self { entries }
    }
}
