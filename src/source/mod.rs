//! Configuration sources.
//!
//! A source answers "what values does key `k` have?" for one backing store.
//! The resolver asks sources in the order the caller supplied them; that
//! order is the precedence.
//!
//! ## Built-in sources
//! - [`EnvSource`] - process environment, `PREFIX_KEY` naming
//! - [`PlainFileSource`] - `key value,value # comment` lines
//! - [`JsonFileSource`] - a JSON object of scalars and scalar arrays
//! - [`YamlFileSource`] - a YAML mapping of scalars and scalar sequences
//!
//! The file sources can take their path from another flag (see
//! [`FlagSource`]), e.g. a `-config` flag naming the file to read.

mod env;
mod file;
mod json;
mod plain;
mod yaml;

pub use env::EnvSource;
pub use json::JsonFileSource;
pub use plain::PlainFileSource;
pub use yaml::YamlFileSource;

use crate::error::Result;

/// Outcome of looking a key up in a source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Lookup {
    /// The key is present. Each string is applied to the flag in order.
    Found(Vec<String>),
    /// The key is absent from this source; try the next one.
    NotFound,
}

impl Lookup {
    pub fn is_found(&self) -> bool {
        matches!(self, Lookup::Found(_))
    }
}

/// A source of configuration values.
pub trait Source {
    /// Look up all values for `key`.
    ///
    /// Backing data is loaded on the first call and kept for later ones.
    fn get(&mut self, key: &str) -> Result<Lookup>;

    /// Name of the source, for usage output and diagnostics.
    fn name(&self) -> String;

    /// Where within this source the value for `key` lives.
    fn loc(&self, key: &str) -> String;

    /// The flag-driven view of this source, if it has one.
    fn as_flag_source(&mut self) -> Option<&mut dyn FlagSource> {
        None
    }
}

/// A source that configures itself from the value of another flag.
///
/// The file sources implement this for both flavors, but only the
/// flag-driven one is returned by [`Source::as_flag_source`]. On a fixed
/// file `flag_needed` is empty and `with_flag_value` fails.
pub trait FlagSource: Source {
    /// The flag whose value configures this source.
    fn flag_needed(&self) -> &str;

    /// Provide the needed flag's value. Called once, before any `get`.
    fn with_flag_value(&mut self, value: &str) -> Result<()>;
}

impl<S: Source + ?Sized> Source for Box<S> {
    fn get(&mut self, key: &str) -> Result<Lookup> {
        (**self).get(key)
    }

    fn name(&self) -> String {
        (**self).name()
    }

    fn loc(&self, key: &str) -> String {
        (**self).loc(key)
    }

    fn as_flag_source(&mut self) -> Option<&mut dyn FlagSource> {
        (**self).as_flag_source()
    }
}

/// Split a comma-separated value into its parts.
///
/// Parts are kept as written; the resolver trims them before use.
pub(crate) fn split_values(value: &str) -> Vec<String> {
    value.split(',').map(str::to_string).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_values() {
        assert_eq!(split_values("a,b,c"), ["a", "b", "c"]);
        assert_eq!(split_values("solo"), ["solo"]);
        assert_eq!(split_values("a, b"), ["a", " b"]);
        assert_eq!(split_values(""), [""]);
    }

    #[test]
    fn test_lookup_is_found() {
        assert!(Lookup::Found(vec![]).is_found());
        assert!(!Lookup::NotFound.is_found());
    }
}
