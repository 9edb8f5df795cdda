//! Resolve a server's settings from the command line, the environment, a
//! plain config file and a JSON settings file, then print them.
//!
//! ```text
//! MY_PROGRAM_PORT=9000 cargo run --example server -- -config server.conf
//! RUST_LOG=flagsource=debug cargo run --example server
//! ```

use anyhow::{Context, Result};
use flagsource::Resolver;
use flagsource::flag::{ErrorHandling, FlagSet};
use flagsource::source::{EnvSource, JsonFileSource, PlainFileSource};
use serde::Serialize;
use std::time::Duration;
use tracing::info;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

#[derive(Debug, Serialize)]
struct Settings {
    listen_addr: String,
    port: u64,
    debug: bool,
    refresh_secs: f64,
    tags: Vec<String>,
}

impl Settings {
    fn from_flags(fs: &FlagSet) -> Result<Self> {
        Ok(Self {
            listen_addr: fs.get("listen-addr").context("listen-addr not declared")?,
            port: fs.get("port").context("port not declared")?,
            debug: fs.get("debug").context("debug not declared")?,
            refresh_secs: fs
                .get::<Duration>("refresh")
                .context("refresh not declared")?
                .as_secs_f64(),
            tags: fs.get("tags").context("tags not declared")?,
        })
    }
}

fn main() -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let mut fs = FlagSet::new("server", ErrorHandling::ExitOnError);
    fs.string("config", "server.conf", "plain configuration `file`")
        .string("settings-json", "server.json", "JSON settings `file`")
        .string("listen-addr", "127.0.0.1", "`address` to listen on")
        .uint("port", 8080, "port to listen on")
        .bool("debug", false, "enable debug output")
        .duration("refresh", Duration::from_secs(30), "how often to reload state")
        .list("tags", &[], "comma-separated `tags` to report");

    Resolver::new()
        .with_source(EnvSource::new("my_program"))
        .with_source(PlainFileSource::from_flag("config"))
        .with_source(JsonFileSource::from_flag("settings-json"))
        .resolve(&mut fs)?;

    let settings = Settings::from_flags(&fs)?;
    info!(addr = %settings.listen_addr, port = settings.port, "settings resolved");
    println!("{}", serde_json::to_string_pretty(&settings)?);
    Ok(())
}
