//! Plain configuration files.
//!
//! One setting per line:
//!
//! ```text
//! # comment lines and blank lines are skipped
//! listen-addr 127.0.0.1:9000
//! tags a,b,c          # trailing comments are stripped
//! debug               # a key alone means "true"
//! ```

use super::file::LazyFile;
use super::{FlagSource, Lookup, Source, split_values};
use crate::error::Result;
use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// A source backed by a plain configuration file.
#[derive(Debug)]
pub struct PlainFileSource {
    file: LazyFile<HashMap<String, Vec<String>>>,
}

impl PlainFileSource {
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

    /// The file this source reads, once known.
    pub fn path(&self) -> Option<&Path> {
        self.file.path()
    }
}

impl Source for PlainFileSource {
    fn get(&mut self, key: &str) -> Result<Lookup> {
        let name = self.name();
        let settings = self.file.load(&name, |_, text| Ok(parse_plain(text)))?;
        Ok(match settings.get(key) {
            Some(values) => Lookup::Found(values.clone()),
            None => Lookup::NotFound,
        })
    }

    fn name(&self) -> String {
        match self.file.flag() {
            Some(flag) => format!("configuration file defined by {:?} flag", flag),
            None => format!(
                "configuration file {:?}",
                self.file
                    .path()
                    .map(|p| p.display().to_string())
                    .unwrap_or_default()
            ),
        }
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

impl FlagSource for PlainFileSource {
    fn flag_needed(&self) -> &str {
        self.file.flag().unwrap_or_default()
    }

    fn with_flag_value(&mut self, value: &str) -> Result<()> {
        let name = self.name();
        self.file.set_path(value, &name)
    }
}

/// Parse plain configuration text into key → values.
///
/// Keys are stored as written, so a `--debug` line does not configure the
/// `debug` flag. A later line for the same key replaces an earlier one.
pub(crate) fn parse_plain(text: &str) -> HashMap<String, Vec<String>> {
    let mut settings = HashMap::new();
    for line in text.lines() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        let (key, rest) = match line.find(char::is_whitespace) {
            Some(index) => line.split_at(index),
            None => (line, ""),
        };
        let value = strip_comment(rest).trim();
        let value = if value.is_empty() { "true" } else { value };
        settings.insert(key.to_string(), split_values(value));
    }
    settings
}

/// Cut an inline comment: a `#` that follows whitespace.
fn strip_comment(rest: &str) -> &str {
    let mut prev_space = false;
    for (index, c) in rest.char_indices() {
        if c == '#' && prev_space {
            return &rest[..index];
        }
        prev_space = c.is_whitespace();
    }
    rest
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_parse_lines() {
        let settings = parse_plain(
            "# leading comment\n\
             \n\
             debug\n\
             refresh 30s # override\n\
             tags a,b,c\n\
             \tlisten-addr   127.0.0.1:9000  \n",
        );
        assert_eq!(settings["debug"], ["true"]);
        assert_eq!(settings["refresh"], ["30s"]);
        assert_eq!(settings["tags"], ["a", "b", "c"]);
        assert_eq!(settings["listen-addr"], ["127.0.0.1:9000"]);
        assert_eq!(settings.len(), 4);
    }

    #[test]
    fn test_parse_hyphens_and_comments() {
        let settings = parse_plain("--verbose\n-level 3\nquiet #off\nurl http://x/#frag\n");
        assert_eq!(settings["--verbose"], ["true"]);
        assert_eq!(settings["-level"], ["3"]);
        assert!(!settings.contains_key("verbose"));
        assert!(!settings.contains_key("level"));
        assert_eq!(settings["quiet"], ["true"]);
        assert_eq!(settings["url"], ["http://x/#frag"]);
    }

    #[test]
    fn test_later_line_wins() {
        let settings = parse_plain("port 1\nport 2\n");
        assert_eq!(settings["port"], ["2"]);
    }

    #[test]
    fn test_get_from_file() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("app.conf");
        std::fs::write(&path, "port 8080\n").unwrap();

        let mut source = PlainFileSource::new(&path);
        assert!(source.as_flag_source().is_none());
        assert_eq!(
            source.get("port").unwrap(),
            Lookup::Found(vec!["8080".to_string()])
        );
        assert_eq!(source.get("host").unwrap(), Lookup::NotFound);
        assert_eq!(
            source.name(),
            format!("configuration file {:?}", path.display().to_string())
        );
        assert_eq!(
            source.loc("port"),
            format!("{}, key \"port\"", path.display())
        );
    }

    #[test]
    fn test_hyphenated_key_is_not_the_flag() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("app.conf");
        std::fs::write(&path, "--port 1\n").unwrap();

        let mut source = PlainFileSource::new(&path);
        assert_eq!(source.get("port").unwrap(), Lookup::NotFound);
        assert_eq!(
            source.get("--port").unwrap(),
            Lookup::Found(vec!["1".to_string()])
        );
    }

    #[test]
    fn test_missing_file_is_an_error() {
        let temp = TempDir::new().unwrap();
        let mut source = PlainFileSource::new(temp.path().join("nope.conf"));
        assert!(source.get("port").is_err());
    }

    #[test]
    fn test_flag_driven() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("app.conf");
        std::fs::write(&path, "debug\n").unwrap();

        let mut source = PlainFileSource::from_flag("config");
        assert_eq!(source.name(), "configuration file defined by \"config\" flag");

        let flag_source = source.as_flag_source().unwrap();
        assert_eq!(flag_source.flag_needed(), "config");
        assert!(flag_source.with_flag_value("").is_err());
        flag_source
            .with_flag_value(path.to_str().unwrap())
            .unwrap();

        assert_eq!(
            source.get("debug").unwrap(),
            Lookup::Found(vec!["true".to_string()])
        );
    }
}
