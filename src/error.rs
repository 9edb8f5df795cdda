//! Structured error types for flag resolution.

use crate::flag::FlagError;
use std::path::PathBuf;

/// Errors returned while resolving flags from their sources.
///
/// Every variant is fatal to the resolution pass. A key that is simply
/// absent from a source is not an error; see [`crate::source::Lookup`].
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The command line could not be parsed (including `-h`/`-help`).
    #[error(transparent)]
    Parse(#[from] FlagError),

    /// A flag-driven source needs a flag that was never declared.
    #[error("flag source {source_name} needs flag {flag:?}, but it is not defined")]
    FlagNotDefined { source_name: String, flag: String },

    /// A flag-driven source rejected the value of its flag.
    #[error("cannot initialize source {source_name} with value from flag {flag:?}: {cause}")]
    SourceInit {
        source_name: String,
        flag: String,
        #[source]
        cause: Box<Error>,
    },

    /// A value found in a source could not be applied to its flag.
    #[error("error setting flag {flag:?} from {location}: {cause}")]
    SetFlag {
        flag: String,
        location: String,
        #[source]
        cause: FlagError,
    },

    /// A flag-driven source was handed an empty file name.
    #[error("{source_name} given an empty file name")]
    EmptyFileName { source_name: String },

    /// A source with a fixed file was handed a flag value.
    #[error("{source_name} has a fixed file name and takes no flag value")]
    FixedFileName { source_name: String },

    /// A flag-driven source was queried before it received its flag value.
    #[error("{source_name} was queried before its file name was provided")]
    NotInitialized { source_name: String },

    /// A source failed to load earlier; the failure is sticky.
    #[error("{source_name} failed to load: {reason}")]
    LoadFailed { source_name: String, reason: String },

    /// A configuration file could not be read.
    #[error("cannot read configuration file {}: {cause}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        cause: std::io::Error,
    },

    /// A JSON configuration file is malformed or not an object.
    #[error("error parsing JSON config {}: {cause}", .path.display())]
    Json {
        path: PathBuf,
        #[source]
        cause: serde_json::Error,
    },

    /// A YAML configuration file is malformed or not a mapping.
    #[error("error parsing YAML config {}: {cause}", .path.display())]
    Yaml {
        path: PathBuf,
        #[source]
        cause: serde_yaml::Error,
    },

    /// A structured config value has a type that cannot become a flag value.
    #[error("could not convert {kind} at {location} to a flag value")]
    UnsupportedValue { location: String, kind: &'static str },

    /// An environment variable is set but does not hold valid UTF-8.
    #[error("environment variable {var} is not valid unicode")]
    NotUnicode { var: String },
}

impl Error {
    /// Whether this error comes from `-h`/`-help` rather than a real failure.
    pub fn is_help(&self) -> bool {
        matches!(self, Error::Parse(FlagError::Help))
    }
}

/// Result type for resolution operations.
pub type Result<T> = std::result::Result<T, Error>;
