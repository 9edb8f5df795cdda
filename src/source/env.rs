//! Environment variables.
//!
//! Flag `listen-addr` with prefix `my_program` is read from
//! `MY_PROGRAM_LISTEN_ADDR`. Comma-separated values set the flag once per
//! part.

use super::{Lookup, Source, split_values};
use crate::error::{Error, Result};
use std::collections::HashMap;
use std::env::VarError;

/// A source backed by environment variables.
#[derive(Debug, Clone, Default)]
pub struct EnvSource {
    prefix: String,
    /// Fixed variables to read instead of the process environment.
    vars: Option<HashMap<String, String>>,
}

impl EnvSource {
    /// Read from the process environment. An empty prefix reads bare names.
    pub fn new(prefix: &str) -> Self {
        Self {
            prefix: normalize_prefix(prefix),
            vars: None,
        }
    }

    /// Read from `vars` instead of the process environment.
    pub fn with_vars<I, K, V>(prefix: &str, vars: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            prefix: normalize_prefix(prefix),
            vars: Some(
                vars.into_iter()
                    .map(|(k, v)| (k.into(), v.into()))
                    .collect(),
            ),
        }
    }

    /// The prefix as applied, including its trailing underscore.
    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// The variable name consulted for `key`.
    pub fn var_name(&self, key: &str) -> String {
        format!("{}{}", self.prefix, key.to_uppercase()).replace(['-', '.', '/'], "_")
    }

    fn lookup(&self, var: &str) -> Result<Option<String>> {
        match &self.vars {
            Some(vars) => Ok(vars.get(var).cloned()),
            None => match std::env::var(var) {
                Ok(value) => Ok(Some(value)),
                Err(VarError::NotPresent) => Ok(None),
                Err(VarError::NotUnicode(_)) => Err(Error::NotUnicode {
                    var: var.to_string(),
                }),
            },
        }
    }
}

fn normalize_prefix(prefix: &str) -> String {
    if prefix.is_empty() {
        String::new()
    } else {
        format!("{}_", prefix.to_uppercase())
    }
}

impl Source for EnvSource {
    fn get(&mut self, key: &str) -> Result<Lookup> {
        let var = self.var_name(key);
        Ok(match self.lookup(&var)? {
            Some(value) => Lookup::Found(split_values(&value)),
            None => Lookup::NotFound,
        })
    }

    fn name(&self) -> String {
        if self.prefix.is_empty() {
            "environment variables".to_string()
        } else {
            format!("environment variables with the prefix {:?}", self.prefix)
        }
    }

    fn loc(&self, key: &str) -> String {
        self.var_name(key)
    }
}
