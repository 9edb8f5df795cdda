//! YAML configuration files.
//!
//! Same shape as the JSON source: a top-level mapping whose values are
//! scalars or sequences of scalars. Unquoted numbers are read as numbers and
//! written back in canonical form (`0.10` becomes `0.1`); quote a value to
//! keep its exact text.

use super::file::LazyFile;
use super::json::{flag_values, structured_name};
use super::{FlagSource, Lookup, Source};
use crate::error::{Error, Result};
use serde_json::{Map, Value};
use std::path::{Path, PathBuf};

/// A source backed by a YAML file.
#[derive(Debug)]
pub struct YamlFileSource {
    file: LazyFile<Map<String, Value>>,
}

impl YamlFileSource {
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

impl Source for YamlFileSource {
    fn get(&mut self, key: &str) -> Result<Lookup> {
        let name = self.name();
        let settings = self.file.load(&name, |path, text| {
            serde_yaml::from_str(text).map_err(|cause| Error::Yaml {
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
        structured_name("YAML", self.file.flag(), self.file.path())
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

impl FlagSource for YamlFileSource {
    fn flag_needed(&self) -> &str {
        self.file.flag().unwrap_or_default()
    }

    fn with_flag_value(&mut self, value: &str) -> Result<()> {
        let name = self.name();
        self.file.set_path(value, &name)
    }
}
