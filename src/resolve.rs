//! Flag resolution across sources.
//!
//! Resolution is one pass:
//! 1. Parse the command line. Flags given there are final.
//! 2. Hand flag-driven sources the value of the flag they need.
//! 3. For every other flag, ask the sources in order; the first one that
//!    has the key supplies the value.
//!
//! Flags no source knows keep their defaults.

use crate::error::{Error, Result};
use crate::flag::FlagSet;
use crate::source::{Lookup, Source};
use std::collections::HashSet;
use std::ffi::OsString;
use std::io::{self, Write};
use tracing::{debug, trace};

/// An ordered list of sources, highest priority first.
///
/// ```no_run
/// use flagsource::flag::{ErrorHandling, FlagSet};
/// use flagsource::source::{EnvSource, PlainFileSource};
/// use flagsource::Resolver;
///
/// let mut fs = FlagSet::new("server", ErrorHandling::ExitOnError);
/// fs.string("config", "/etc/server.conf", "`file` to read settings from")
///     .string("listen-addr", ":8080", "address to listen on");
///
/// Resolver::new()
///     .with_source(EnvSource::new("server"))
///     .with_source(PlainFileSource::from_flag("config"))
///     .resolve(&mut fs)?;
/// # Ok::<(), flagsource::Error>(())
/// ```
#[derive(Default)]
pub struct Resolver {
    sources: Vec<Box<dyn Source>>,
}

impl Resolver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a source below those already added.
    pub fn with_source(mut self, source: impl Source + 'static) -> Self {
        self.sources.push(Box::new(source));
        self
    }

    /// Append a source in place.
    pub fn push(&mut self, source: Box<dyn Source>) {
        self.sources.push(source);
    }

    /// Source names in priority order.
    pub fn source_names(&self) -> Vec<String> {
        self.sources.iter().map(|s| s.name()).collect()
    }

    /// Resolve `fs` from the process arguments (without the program name).
    pub fn resolve(&mut self, fs: &mut FlagSet) -> Result<()> {
        resolve(fs, &mut self.sources)
    }

    /// Resolve `fs` from `args` (without the program name) and the sources.
    pub fn resolve_args<I, S>(&mut self, args: I, fs: &mut FlagSet) -> Result<()>
    where
        I: IntoIterator<Item = S>,
        S: Into<OsString>,
    {
        resolve_args(args, fs, &mut self.sources)
    }
}

impl std::fmt::Debug for Resolver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Resolver")
            .field("sources", &self.source_names())
            .finish()
    }
}

/// Resolve `fs` from the process arguments and `sources`, in priority order.
pub fn resolve(fs: &mut FlagSet, sources: &mut [Box<dyn Source>]) -> Result<()> {
    resolve_args(std::env::args_os().skip(1), fs, sources)
}

/// Resolve `fs` from `args` and `sources`, in priority order.
///
/// Command-line flags always win. Every other flag takes its value from the
/// first source that has it; a source returning several values sets the flag
/// once per value. The first error aborts resolution. Values already applied
/// to a flag before the failing one stay applied. An argument that is not
/// valid Unicode is a parse error.
pub fn resolve_args<I, S>(args: I, fs: &mut FlagSet, sources: &mut [Box<dyn Source>]) -> Result<()>
where
    I: IntoIterator<Item = S>,
    S: Into<OsString>,
{
    let names: Vec<String> = sources.iter().map(|s| s.name()).collect();
    fs.set_usage(Box::new(move |set: &FlagSet, out: &mut dyn Write| {
        write_usage(set, &names, out)
    }));

    fs.parse_os(args)?;

    let mut found: HashSet<String> = fs.explicit().map(|f| f.name().to_string()).collect();

    for source in sources.iter_mut() {
        let source_name = source.name();
        let Some(flag_source) = source.as_flag_source() else {
            continue;
        };
        let needed = flag_source.flag_needed().to_string();
        let Some(flag) = fs.lookup(&needed) else {
            return Err(Error::FlagNotDefined {
                source_name,
                flag: needed,
            });
        };
        let mut value = flag.value().to_string();
        if value.is_empty() {
            value = flag.default_value().to_string();
        }
        debug!(source = %source_name, flag = %needed, value = %value, "initializing flag source");
        flag_source
            .with_flag_value(&value)
            .map_err(|cause| Error::SourceInit {
                source_name,
                flag: needed,
                cause: Box::new(cause),
            })?;
    }

    let flag_names: Vec<String> = fs.flags().map(|f| f.name().to_string()).collect();
    for name in flag_names {
        if found.contains(&name) {
            continue;
        }
        for source in sources.iter_mut() {
            let values = match source.get(&name)? {
                Lookup::Found(values) if !values.is_empty() => values,
                _ => {
                    trace!(flag = %name, source = %source.name(), "not found in source");
                    continue;
                }
            };
            for value in &values {
                fs.set(&name, value.trim()).map_err(|cause| Error::SetFlag {
                    flag: name.clone(),
                    location: source.loc(&name),
                    cause,
                })?;
            }
            debug!(flag = %name, source = %source.name(), "resolved flag from source");
            found.insert(name.clone());
            break;
        }
    }

    Ok(())
}

/// Normal usage followed by the list of configuration sources.
fn write_usage(fs: &FlagSet, source_names: &[String], out: &mut dyn Write) -> io::Result<()> {
    fs.write_usage(out)?;
    if !source_names.is_empty() {
        writeln!(out, "\nAdditional configuration sources:")?;
        for name in source_names {
            writeln!(out, "\t- {}", name)?;
        }
    }
    Ok(())
}
