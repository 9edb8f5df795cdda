//! Typed flag values.
//!
//! A [`Value`] owns the current value of one flag and knows how to replace it
//! from a string. Each built-in value exposes its inner Rust value through
//! [`Value::as_any`] so [`super::FlagSet::get`] can hand it back typed.

use super::duration::{format_duration, parse_duration};
use std::any::Any;
use std::fmt;
use std::str::FromStr;
use std::time::Duration;

/// The dynamic value behind a flag.
///
/// `Display` must render the current value as a string that `set` accepts.
pub trait Value: fmt::Display {
    /// Replace (or, for repeatable values, extend) the value from a string.
    fn set(&mut self, raw: &str) -> Result<(), String>;

    /// Argument name shown in usage output, e.g. `string` or `duration`.
    fn type_name(&self) -> &'static str {
        "value"
    }

    /// Boolean flags may be given on the command line without a value.
    fn is_bool_flag(&self) -> bool {
        false
    }

    /// The inner typed value, for [`super::FlagSet::get`].
    fn as_any(&self) -> &dyn Any;
}

/// Parse a boolean the way command-line users expect.
pub fn parse_bool(raw: &str) -> Result<bool, String> {
    match raw {
        "1" | "t" | "T" | "TRUE" | "true" | "True" => Ok(true),
        "0" | "f" | "F" | "FALSE" | "false" | "False" => Ok(false),
        _ => Err("parse error".to_string()),
    }
}

/// A boolean flag value.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BoolValue(pub bool);

impl Value for BoolValue {
    fn set(&mut self, raw: &str) -> Result<(), String> {
        self.0 = parse_bool(raw)?;
        Ok(())
    }

    fn type_name(&self) -> &'static str {
        ""
    }

    fn is_bool_flag(&self) -> bool {
        true
    }

    fn as_any(&self) -> &dyn Any {
        &self.0
    }
}

impl fmt::Display for BoolValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A single value parsed with `FromStr`: strings, integers and floats.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Scalar<T> {
    value: T,
    type_name: &'static str,
}

impl<T> Scalar<T> {
    pub fn new(value: T, type_name: &'static str) -> Self {
        Self { value, type_name }
    }
}

impl<T> Value for Scalar<T>
where
    T: FromStr + fmt::Display + 'static,
    T::Err: fmt::Display,
{
    fn set(&mut self, raw: &str) -> Result<(), String> {
        self.value = raw.parse().map_err(|err: T::Err| err.to_string())?;
        Ok(())
    }

    fn type_name(&self) -> &'static str {
        self.type_name
    }

    fn as_any(&self) -> &dyn Any {
        &self.value
    }
}

impl<T: fmt::Display> fmt::Display for Scalar<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.value)
    }
}

/// A duration flag value, written as `30s`, `1h30m`, `250ms`.
///
/// Displays in `humantime` form, e.g. `1m 30s`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DurationValue(pub Duration);

impl Value for DurationValue {
    fn set(&mut self, raw: &str) -> Result<(), String> {
        self.0 = parse_duration(raw)?;
        Ok(())
    }

    fn type_name(&self) -> &'static str {
        "duration"
    }

    fn as_any(&self) -> &dyn Any {
        &self.0
    }
}

impl fmt::Display for DurationValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&format_duration(self.0))
    }
}

/// A repeatable string flag. Every `set` appends one entry; the first one
/// discards the declared default entries.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListValue {
    items: Vec<String>,
    touched: bool,
}

impl ListValue {
    pub fn new(defaults: Vec<String>) -> Self {
        Self {
            items: defaults,
            touched: false,
        }
    }

    pub fn items(&self) -> &[String] {
        &self.items
    }
}

impl Value for ListValue {
    fn set(&mut self, raw: &str) -> Result<(), String> {
        if !self.touched {
            self.items.clear();
            self.touched = true;
        }
        self.items.push(raw.to_string());
        Ok(())
    }

    fn type_name(&self) -> &'static str {
        "list"
    }

    fn as_any(&self) -> &dyn Any {
        &self.items
    }
}

impl fmt::Display for ListValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.items.join(","))
    }
}
