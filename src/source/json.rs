//! JSON configuration files.
//!
//! The document is one object. Keys are flag names; values are strings,
//! numbers, booleans or arrays of those. An array sets the flag once per
//! element.

use super::file::LazyFile;
use super::{FlagSource, Lookup, Source};
use crate::error::{Error, Result};
use serde_json::{Map, Value};
use std::path::{Path, PathBuf};

/// A source backed by a JSON file.
#[derive(Debug)]
pub struct JsonFileSource {
    file: LazyFile<Map<String, Value>>,
}

impl JsonFileSource {
    /// Read settings from `path`.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            file: LazyFile::fixed(path),
        }
    }

    /// Read settings from the file named by the value of flag `flag`.
    pub fn from_flag(flag: impl Into<String>) -> Self {
        Self {
            file: LazyFile::from_flag(flag),
        }
    }

    pub fn path(&self) -> Option<&Path> {
        self.file.path()
    }
}

impl Source for JsonFileSource {
    fn get(&mut self, key: &str) -> Result<Lookup> {
        let name = self.name();
        let settings = self.file.load(&name, |path, text| {
            serde_json::from_str(text).map_err(|cause| Error::Json {
                path: path.to_path_buf(),
                cause,
            })
        })?;
        let Some(value) = settings.get(key) else {
            return Ok(Lookup::NotFound);
        };
        let values = flag_values(value).map_err(|kind| Error::UnsupportedValue {
            location: self.file.loc(key),
            kind,
        })?;
        Ok(Lookup::Found(values))
    }

    fn name(&self) -> String {
        structured_name("JSON", self.file.flag(), self.file.path())
    }

    fn loc(&self, key: &str) -> String {
        self.file.loc(key)
    }

    fn as_flag_source(&mut self) -> Option<&mut dyn FlagSource> {
        if self.file.flag().is_some() {
            Some(self)
        } else {
            None
        }
    }
}

impl FlagSource for JsonFileSource {
    fn flag_needed(&self) -> &str {
        self.file.flag().unwrap_or_default()
    }

    fn with_flag_value(&mut self, value: &str) -> Result<()> {
        let name = self.name();
        self.file.set_path(value, &name)
    }
}

/// `JSON configuration file "app.json"` or
/// `JSON configuration file defined by "config" flag`.
pub(crate) fn structured_name(format: &str, flag: Option<&str>, path: Option<&Path>) -> String {
    match flag {
        Some(flag) => format!("{} configuration file defined by {:?} flag", format, flag),
        None => format!(
            "{} configuration file {:?}",
            format,
            path.map(|p| p.display().to_string()).unwrap_or_default()
        ),
    }
}

/// Stringify a config value into the strings to set on a flag.
///
/// On failure returns the kind of the offending value.
pub(crate) fn flag_values(value: &Value) -> std::result::Result<Vec<String>, &'static str> {
    match value {
        Value::Array(items) => items
            .iter()
            .map(|item| match item {
                Value::Array(_) => Err("nested array"),
                other => scalar(other),
            })
            .collect(),
        other => scalar(other).map(|s| vec![s]),
    }
}

fn scalar(value: &Value) -> std::result::Result<String, &'static str> {
    match value {
        Value::String(s) => Ok(s.clone()),
        // Keeps the number as written in the file.
        Value::Number(n) => Ok(n.to_string()),
        Value::Bool(b) => Ok(b.to_string()),
        Value::Null => Err("null"),
        Value::Array(_) => Err("array"),
        Value::Object(_) => Err("object"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::TempDir;

    fn source_with(content: &str) -> (TempDir, JsonFileSource) {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("app.json");
        std::fs::write(&path, content).unwrap();
        (temp, JsonFileSource::new(path))
    }

    fn found(values: &[&str]) -> Lookup {
        Lookup::Found(values.iter().map(|s| s.to_string()).collect())
    }

    #[test]
    fn test_flag_values() {
        assert_eq!(flag_values(&json!("30s")).unwrap(), ["30s"]);
        assert_eq!(flag_values(&json!(true)).unwrap(), ["true"]);
        assert_eq!(flag_values(&json!(false)).unwrap(), ["false"]);
        assert_eq!(flag_values(&json!(["a", 1, true])).unwrap(), ["a", "1", "true"]);
        assert!(flag_values(&json!([])).unwrap().is_empty());
        assert_eq!(flag_values(&json!(null)), Err("null"));
        assert_eq!(flag_values(&json!({"a": 1})), Err("object"));
        assert_eq!(flag_values(&json!([["a"]])), Err("nested array"));
        assert_eq!(flag_values(&json!([null])), Err("null"));
    }

    #[test]
    fn test_get_scalars_and_arrays() {
        let (_temp, mut source) =
            source_with(r#"{"refresh":"30s","debug":true,"tags":["a","b"],"port":8080}"#);
        assert_eq!(source.get("refresh").unwrap(), found(&["30s"]));
        assert_eq!(source.get("debug").unwrap(), found(&["true"]));
        assert_eq!(source.get("tags").unwrap(), found(&["a", "b"]));
        assert_eq!(source.get("port").unwrap(), found(&["8080"]));
        assert_eq!(source.get("missing").unwrap(), Lookup::NotFound);
    }

    #[test]
    fn test_numbers_keep_their_text() {
        let (_temp, mut source) = source_with(
            r#"{"ratio":0.1,"big":123456789012345678901234567890,"exp":1e3,"neg":-7}"#,
        );
        assert_eq!(source.get("ratio").unwrap(), found(&["0.1"]));
        assert_eq!(
            source.get("big").unwrap(),
            found(&["123456789012345678901234567890"])
        );
        assert_eq!(source.get("exp").unwrap(), found(&["1e3"]));
        assert_eq!(source.get("neg").unwrap(), found(&["-7"]));
    }

    #[test]
    fn test_null_and_object_values_fail() {
        let (_temp, mut source) = source_with(r#"{"a":null,"b":{"c":1}}"#);
        let err = source.get("a").unwrap_err();
        assert!(matches!(err, Error::UnsupportedValue { kind: "null", .. }));
        assert!(err.to_string().contains("key \"a\""));
        assert!(matches!(
            source.get("b"),
            Err(Error::UnsupportedValue { kind: "object", .. })
        ));
    }

    #[test]
    fn test_malformed_document_fails() {
        let (_temp, mut source) = source_with("{\"a\": ");
        assert!(matches!(source.get("a"), Err(Error::Json { .. })));

        let (_temp, mut source) = source_with("[1, 2]");
        assert!(matches!(source.get("a"), Err(Error::Json { .. })));
    }

    #[test]
    fn test_names() {
        let source = JsonFileSource::new("app.json");
        assert_eq!(source.name(), "JSON configuration file \"app.json\"");
        assert_eq!(source.loc("port"), "app.json, key \"port\"");

        let source = JsonFileSource::from_flag("settings");
        assert_eq!(
            source.name(),
            "JSON configuration file defined by \"settings\" flag"
        );
        assert_eq!(source.flag_needed(), "settings");
    }

    #[test]
    fn test_fixed_file_takes_no_flag_value() {
        let mut source = JsonFileSource::new("a.json");
        assert!(source.as_flag_source().is_none());

        let err = source.with_flag_value("b.json").unwrap_err();
        assert!(matches!(err, Error::FixedFileName { .. }));
        assert_eq!(source.path(), Some(Path::new("a.json")));
    }
}
