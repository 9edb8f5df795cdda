//! Layered flag resolution.
//!
//! Declare flags on a [`flag::FlagSet`], then resolve them from the command
//! line and an ordered list of [`source::Source`]s. The command line always
//! wins; every other flag takes its value from the first source that has it,
//! and flags nobody sets keep their defaults.
//!
//! ```no_run
//! use flagsource::flag::{ErrorHandling, FlagSet};
//! use flagsource::source::{EnvSource, JsonFileSource, PlainFileSource};
//! use flagsource::Resolver;
//! use std::time::Duration;
//!
//! let mut fs = FlagSet::new("my-program", ErrorHandling::ExitOnError);
//! fs.string("config", "my-program.conf", "plain config `file`")
//!     .string("listen-addr", ":8080", "address to listen on")
//!     .duration("refresh", Duration::from_secs(30), "refresh interval")
//!     .bool("debug", false, "enable debug output");
//!
//! Resolver::new()
//!     .with_source(EnvSource::new("my_program"))
//!     .with_source(PlainFileSource::from_flag("config"))
//!     .with_source(JsonFileSource::new("/etc/my-program.json"))
//!     .resolve(&mut fs)?;
//!
//! let refresh: Duration = fs.get("refresh").unwrap();
//! # let _ = refresh;
//! # Ok::<(), flagsource::Error>(())
//! ```

pub mod error;
pub mod flag;
pub mod resolve;
pub mod source;

pub use error::{Error, Result};
pub use resolve::{Resolver, resolve, resolve_args};
