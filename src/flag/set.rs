//! The flag set: declaration, command-line parsing and usage output.

use super::value::{BoolValue, DurationValue, ListValue, Scalar, Value};
use super::FlagError;
use std::collections::{BTreeMap, BTreeSet};
use std::ffi::OsString;
use std::fmt;
use std::io::{self, Write};
use std::time::Duration;

/// What [`FlagSet::parse`] does after reporting a failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ErrorHandling {
    /// Return the error to the caller.
    #[default]
    ContinueOnError,
    /// Exit the process: status 0 for `-h`/`-help`, 2 otherwise.
    ExitOnError,
}

/// Custom usage printer installed with [`FlagSet::set_usage`].
pub type Usage = Box<dyn Fn(&FlagSet, &mut dyn Write) -> io::Result<()>>;

/// A single declared flag.
pub struct Flag {
    name: String,
    usage: String,
    default: String,
    value: Box<dyn Value>,
}

impl Flag {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn usage(&self) -> &str {
        &self.usage
    }

    /// The declared default, as a string.
    pub fn default_value(&self) -> &str {
        &self.default
    }

    pub fn value(&self) -> &dyn Value {
        self.value.as_ref()
    }

    /// Argument name and usage text for the defaults listing.
    ///
    /// A word in backquotes inside the usage text names the argument:
    /// ``"load `file` at startup"`` prints as `-name file`.
    pub fn unquote_usage(&self) -> (String, String) {
        if let Some(start) = self.usage.find('`')
            && let Some(len) = self.usage[start + 1..].find('`')
        {
            let end = start + 1 + len;
            let name = self.usage[start + 1..end].to_string();
            let usage = format!(
                "{}{}{}",
                &self.usage[..start],
                name,
                &self.usage[end + 1..]
            );
            return (name, usage);
        }
        (self.value.type_name().to_string(), self.usage.clone())
    }

    fn has_zero_default(&self) -> bool {
        matches!(self.default.as_str(), "" | "0" | "false" | "0s")
    }
}

impl fmt::Debug for Flag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Flag")
            .field("name", &self.name)
            .field("default", &self.default)
            .field("value", &self.value.to_string())
            .finish()
    }
}

/// A set of named, typed flags.
///
/// Flags are enumerated in lexical name order. Values are read back with
/// [`FlagSet::get`].
pub struct FlagSet {
    name: String,
    error_handling: ErrorHandling,
    flags: BTreeMap<String, Flag>,
    explicit: BTreeSet<String>,
    args: Vec<String>,
    parsed: bool,
    usage: Option<Usage>,
    output: Option<Box<dyn Write>>,
}

impl FlagSet {
    /// Create an empty flag set. The name appears in the usage header.
    pub fn new(name: impl Into<String>, error_handling: ErrorHandling) -> Self {
        Self {
            name: name.into(),
            error_handling,
            flags: BTreeMap::new(),
            explicit: BTreeSet::new(),
            args: Vec::new(),
            parsed: false,
            usage: None,
            output: None,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn error_handling(&self) -> ErrorHandling {
        self.error_handling
    }

    /// Declare a flag backed by a custom [`Value`].
    ///
    /// The value's current string form becomes the default.
    ///
    /// # Panics
    ///
    /// Panics if a flag with the same name was already declared.
    pub fn var(&mut self, name: &str, value: Box<dyn Value>, usage: &str) -> &mut Self {
        assert!(
            !self.flags.contains_key(name),
            "{}flag redefined: {}",
            if self.name.is_empty() {
                String::new()
            } else {
                format!("{} ", self.name)
            },
            name
        );
        let flag = Flag {
            name: name.to_string(),
            usage: usage.to_string(),
            default: value.to_string(),
            value,
        };
        self.flags.insert(name.to_string(), flag);
        self
    }

    pub fn bool(&mut self, name: &str, default: bool, usage: &str) -> &mut Self {
        self.var(name, Box::new(BoolValue(default)), usage)
    }

    pub fn string(&mut self, name: &str, default: &str, usage: &str) -> &mut Self {
        self.var(name, Box::new(Scalar::new(default.to_string(), "string")), usage)
    }

    pub fn int(&mut self, name: &str, default: i64, usage: &str) -> &mut Self {
        self.var(name, Box::new(Scalar::new(default, "int")), usage)
    }

    pub fn uint(&mut self, name: &str, default: u64, usage: &str) -> &mut Self {
        self.var(name, Box::new(Scalar::new(default, "uint")), usage)
    }

    pub fn float(&mut self, name: &str, default: f64, usage: &str) -> &mut Self {
        self.var(name, Box::new(Scalar::new(default, "float")), usage)
    }

    pub fn duration(&mut self, name: &str, default: Duration, usage: &str) -> &mut Self {
        self.var(name, Box::new(DurationValue(default)), usage)
    }

    /// Declare a repeatable string flag: `-tag a -tag b` collects both.
    pub fn list(&mut self, name: &str, default: &[&str], usage: &str) -> &mut Self {
        let defaults = default.iter().map(|s| s.to_string()).collect();
        self.var(name, Box::new(ListValue::new(defaults)), usage)
    }

    pub fn lookup(&self, name: &str) -> Option<&Flag> {
        self.flags.get(name)
    }

    /// Read a flag's current value as `T`.
    ///
    /// `T` is the inner type of the value: `bool`, `String`, `i64`, `u64`,
    /// `f64`, `Duration` or `Vec<String>` for the built-in declarations.
    /// Returns `None` if the flag does not exist or holds another type.
    pub fn get<T: Clone + 'static>(&self, name: &str) -> Option<T> {
        self.flags
            .get(name)?
            .value
            .as_any()
            .downcast_ref::<T>()
            .cloned()
    }

    /// All declared flags, in lexical name order.
    pub fn flags(&self) -> impl Iterator<Item = &Flag> {
        self.flags.values()
    }

    /// Flags that have been set by [`FlagSet::parse`] or [`FlagSet::set`].
    pub fn explicit(&self) -> impl Iterator<Item = &Flag> {
        self.explicit.iter().filter_map(|name| self.flags.get(name))
    }

    pub fn is_set(&self, name: &str) -> bool {
        self.explicit.contains(name)
    }

    /// Set a flag from its string form and mark it as set.
    pub fn set(&mut self, name: &str, raw: &str) -> Result<(), FlagError> {
        let flag = self
            .flags
            .get_mut(name)
            .ok_or_else(|| FlagError::NoSuchFlag(name.to_string()))?;
        flag.value
            .set(raw)
            .map_err(|reason| FlagError::InvalidValue {
                flag: name.to_string(),
                value: raw.to_string(),
                reason,
            })?;
        self.explicit.insert(name.to_string());
        Ok(())
    }

    /// Whether [`FlagSet::parse`] has been called.
    pub fn parsed(&self) -> bool {
        self.parsed
    }

    /// Arguments left over after the flags.
    pub fn args(&self) -> &[String] {
        &self.args
    }

    /// Parse flags from `args`, which must not include the program name.
    ///
    /// Parsing stops at the first non-flag argument or after `--`. Failures
    /// are reported on the output stream together with the usage text, and
    /// then handled according to the set's [`ErrorHandling`].
    pub fn parse<I, S>(&mut self, args: I) -> Result<(), FlagError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.parsed = true;
        let mut args: Vec<String> = args.into_iter().map(Into::into).collect();
        args.reverse();

        let outcome = loop {
            match self.parse_one(&mut args) {
                Ok(true) => continue,
                Ok(false) => break Ok(()),
                Err(err) => break Err(err),
            }
        };
        args.reverse();
        self.args = args;

        match outcome {
            Ok(()) => Ok(()),
            Err(err) => self.fail(err),
        }
    }

    /// Like [`FlagSet::parse`], for arguments as the OS hands them over.
    ///
    /// An argument that is not valid Unicode fails the parse with
    /// [`FlagError::NotUnicode`] before any flag is set.
    pub fn parse_os<I, S>(&mut self, args: I) -> Result<(), FlagError>
    where
        I: IntoIterator<Item = S>,
        S: Into<OsString>,
    {
        let mut converted = Vec::new();
        for arg in args {
            match arg.into().into_string() {
                Ok(arg) => converted.push(arg),
                Err(arg) => {
                    self.parsed = true;
                    return self.fail(FlagError::NotUnicode(arg.to_string_lossy().into_owned()));
                }
            }
        }
        self.parse(converted)
    }

    /// Report a parse failure, then apply the error handling mode.
    fn fail(&mut self, err: FlagError) -> Result<(), FlagError> {
        if !matches!(err, FlagError::Help) {
            // The usage text follows; a broken output stream has nowhere to go.
            let _ = self.with_output(|_, out| writeln!(out, "{}", err));
        }
        let _ = self.print_usage();

        match self.error_handling {
            ErrorHandling::ContinueOnError => Err(err),
            ErrorHandling::ExitOnError => {
                let code = if matches!(err, FlagError::Help) { 0 } else { 2 };
                std::process::exit(code)
            }
        }
    }

    /// Parse one flag off the end of the reversed `args`.
    fn parse_one(&mut self, args: &mut Vec<String>) -> Result<bool, FlagError> {
        let Some(arg) = args.last() else {
            return Ok(false);
        };
        if arg.len() < 2 || !arg.starts_with('-') {
            return Ok(false);
        }
        let arg = arg.clone();
        let mut minuses = 1;
        if arg.as_bytes()[1] == b'-' {
            minuses = 2;
            if arg.len() == 2 {
                args.pop();
                return Ok(false);
            }
        }
        let body = &arg[minuses..];
        if body.is_empty() || body.starts_with('-') || body.starts_with('=') {
            return Err(FlagError::Syntax(arg));
        }
        args.pop();

        let (name, inline) = match body.split_once('=') {
            Some((name, value)) => (name, Some(value.to_string())),
            None => (body, None),
        };

        let Some(flag) = self.flags.get(name) else {
            if name == "help" || name == "h" {
                return Err(FlagError::Help);
            }
            return Err(FlagError::Undefined(name.to_string()));
        };

        let value = if flag.value.is_bool_flag() {
            inline.unwrap_or_else(|| "true".to_string())
        } else {
            match inline.or_else(|| args.pop()) {
                Some(value) => value,
                None => return Err(FlagError::MissingArgument(name.to_string())),
            }
        };

        self.set(name, &value)?;
        Ok(true)
    }

    /// Replace the usage printer.
    pub fn set_usage(&mut self, usage: Usage) {
        self.usage = Some(usage);
    }

    /// Redirect usage and error output (stderr by default).
    pub fn set_output(&mut self, output: Box<dyn Write>) {
        self.output = Some(output);
    }

    /// Run the usage printer on the output stream.
    pub fn print_usage(&mut self) -> io::Result<()> {
        let usage = self.usage.take();
        let result = self.with_output(|set, out| match &usage {
            Some(usage) => usage(set, out),
            None => set.write_usage(out),
        });
        self.usage = usage;
        result
    }

    fn with_output<F>(&mut self, write: F) -> io::Result<()>
    where
        F: FnOnce(&FlagSet, &mut dyn Write) -> io::Result<()>,
    {
        match self.output.take() {
            Some(mut out) => {
                let result = write(self, out.as_mut()).and_then(|_| out.flush());
                self.output = Some(out);
                result
            }
            None => write(self, &mut io::stderr().lock()),
        }
    }

    /// The default usage text: a header followed by [`FlagSet::write_defaults`].
    pub fn write_usage(&self, out: &mut dyn Write) -> io::Result<()> {
        if self.name.is_empty() {
            writeln!(out, "Usage:")?;
        } else {
            writeln!(out, "Usage of {}:", self.name)?;
        }
        self.write_defaults(out)
    }

    /// One entry per flag with its argument name, usage and default.
    pub fn write_defaults(&self, out: &mut dyn Write) -> io::Result<()> {
        for flag in self.flags() {
            let mut line = format!("  -{}", flag.name);
            let (arg_name, usage) = flag.unquote_usage();
            if !arg_name.is_empty() {
                line.push(' ');
                line.push_str(&arg_name);
            }
            if line.len() <= 4 {
                line.push('\t');
            } else {
                line.push_str("\n    \t");
            }
            line.push_str(&usage.replace('\n', "\n    \t"));
            if !flag.has_zero_default() {
                if flag.value.type_name() == "string" {
                    line.push_str(&format!(" (default {:?})", flag.default));
                } else {
                    line.push_str(&format!(" (default {})", flag.default));
                }
            }
            writeln!(out, "{}", line)?;
        }
        Ok(())
    }
}

impl fmt::Debug for FlagSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FlagSet")
            .field("name", &self.name)
            .field("error_handling", &self.error_handling)
            .field("flags", &self.flags)
            .field("explicit", &self.explicit)
            .field("args", &self.args)
            .finish()
    }
}
