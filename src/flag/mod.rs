//! Command-line flags.
//!
//! A small flag engine in the style most Unix tools share: single or double
//! dash, `-name=value` or `-name value`, boolean flags without a value, and
//! parsing that stops at the first positional argument or `--`.
//!
//! ```
//! use flagsource::flag::{ErrorHandling, FlagSet};
//!
//! let mut fs = FlagSet::new("server", ErrorHandling::ContinueOnError);
//! fs.bool("debug", false, "enable debug output")
//!     .uint("port", 8080, "port to listen on");
//! fs.parse(["-debug", "-port", "9000"]).unwrap();
//!
//! assert_eq!(fs.get::<bool>("debug"), Some(true));
//! assert_eq!(fs.get::<u64>("port"), Some(9000));
//! ```

mod duration;
mod set;
mod value;

pub use duration::{format_duration, parse_duration};
pub use set::{ErrorHandling, Flag, FlagSet, Usage};
pub use value::{BoolValue, DurationValue, ListValue, Scalar, Value, parse_bool};

/// Errors from parsing arguments or setting flag values.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FlagError {
    /// `-h` or `-help` was given and no such flag is declared.
    #[error("flag: help requested")]
    Help,

    #[error("bad flag syntax: {0}")]
    Syntax(String),

    #[error("flag provided but not defined: -{0}")]
    Undefined(String),

    #[error("flag needs an argument: -{0}")]
    MissingArgument(String),

    #[error("invalid value {value:?} for flag -{flag}: {reason}")]
    InvalidValue {
        flag: String,
        value: String,
        reason: String,
    },

    #[error("no such flag -{0}")]
    NoSuchFlag(String),

    /// A process argument is not valid Unicode. Holds a lossy rendering.
    #[error("argument {0:?} is not valid unicode")]
    NotUnicode(String),
}
