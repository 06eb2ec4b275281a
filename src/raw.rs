//! Caller-supplied mail host declarations, before validation

use crate::error::{FieldError, FieldErrorKind, Result, ValidationErrors};
use crate::validate::describe;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::path::Path;

/// One element of a declaration file: a host, or why it is not one.
pub type Entry = std::result::Result<RawMailHost, ValidationErrors>;

/// An unvalidated mail host declaration.
///
/// Parameters are kept as loose JSON values so that the validator can
/// report wrong types per field instead of failing on the first one.
/// A `null` parameter is treated as absent.
///
/// # Examples
///
/// ```
/// use mailhost_config::RawMailHost;
///
/// let raw = RawMailHost::from_json(r#"{"name": "mx1", "listen_port": 25}"#).unwrap();
/// assert_eq!(raw.name, "mx1");
/// assert_eq!(raw.get("listen_port"), Some(&serde_json::json!(25)));
/// assert_eq!(raw, RawMailHost::new("mx1").with("listen_port", 25));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawMailHost {
    pub name: String,
    #[serde(flatten)]
    pub params: Map<String, Value>,
}

impl RawMailHost {
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            params: Map::new(),
        }
    }

    /// Set a parameter, replacing any previous value.
    #[must_use]
    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.params.insert(key.into(), value.into());
        self
    }

    /// The value of a parameter, with `null` treated as absent.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.params.get(key).filter(|v| !v.is_null())
    }

    /// Parse a single declaration from a JSON object.
    ///
    /// # Errors
    ///
    /// Returns an error if `json` is not an object with a string `name`.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Parse either one declaration or an array of them.
    ///
    /// Elements are taken one by one: an element that is not an object
    /// with a string `name` becomes a failed [`Entry`] labelled
    /// `entry <n>`, and the others are still returned.
    ///
    /// # Errors
    ///
    /// Returns an error only if `json` is not valid JSON.
    pub fn many_from_json(json: &str) -> Result<Vec<Entry>> {
        Self::entries(json, "entry")
    }

    /// Read every declaration from a JSON file.
    ///
    /// Failed entries are labelled `<path> entry <n>`.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or is not valid JSON.
    pub fn load(path: impl AsRef<Path>) -> Result<Vec<Entry>> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)?;
        Self::entries(&json, &format!("{} entry", path.display()))
    }

    fn entries(json: &str, label: &str) -> Result<Vec<Entry>> {
        let values = match serde_json::from_str(json)? {
            Value::Array(values) => values,
            value => vec![value],
        };

        Ok(values
            .into_iter()
            .enumerate()
            .map(|(i, value)| {
                Self::from_value(value).map_err(|error| {
                    ValidationErrors::new(format!("{label} {}", i + 1), vec![error])
                })
            })
            .collect())
    }

    fn from_value(value: Value) -> std::result::Result<Self, FieldError> {
        let mut params = match value {
            Value::Object(params) => params,
            other => {
                return Err(FieldError::new(
                    "declaration",
                    FieldErrorKind::WrongType {
                        expected: "an object",
                        found: describe(&other),
                    },
                ));
            }
        };

        match params.remove("name") {
            Some(Value::String(name)) => Ok(Self { name, params }),
            None | Some(Value::Null) => Err(FieldError::new("name", FieldErrorKind::Missing)),
            Some(other) => Err(FieldError::new(
                "name",
                FieldErrorKind::WrongType {
                    expected: "a string",
                    found: describe(&other),
                },
            )),
        }
    }
}
