//! Lazy loading shared by the file-backed sources.

use crate::error::{Error, Result};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Where a file-backed source gets its path.
#[derive(Debug, Clone)]
pub(crate) enum FilePath {
    /// Given at construction.
    Fixed(PathBuf),
    /// Taken from a flag's value during resolution.
    FromFlag { flag: String, path: Option<PathBuf> },
}

/// Load state of a file-backed source. Moves out of `Pending` once.
#[derive(Debug)]
enum LoadState<T> {
    Pending,
    Ready(T),
    Failed(String),
}

/// A path plus the data parsed from it, loaded on first use.
#[derive(Debug)]
pub(crate) struct LazyFile<T> {
    path: FilePath,
    state: LoadState<T>,
}

impl<T> LazyFile<T> {
    pub(crate) fn fixed(path: impl Into<PathBuf>) -> Self {
        Self {
            path: FilePath::Fixed(path.into()),
            state: LoadState::Pending,
        }
    }

    pub(crate) fn from_flag(flag: impl Into<String>) -> Self {
        Self {
            path: FilePath::FromFlag {
                flag: flag.into(),
                path: None,
            },
            state: LoadState::Pending,
        }
    }

    pub(crate) fn path(&self) -> Option<&Path> {
        match &self.path {
            FilePath::Fixed(path) => Some(path),
            FilePath::FromFlag { path, .. } => path.as_deref(),
        }
    }

    /// The flag this file's path comes from, if any.
    pub(crate) fn flag(&self) -> Option<&str> {
        match &self.path {
            FilePath::Fixed(_) => None,
            FilePath::FromFlag { flag, .. } => Some(flag),
        }
    }

    /// `path, key "name"`, for error messages.
    pub(crate) fn loc(&self, key: &str) -> String {
        let path = self
            .path()
            .map(|p| p.display().to_string())
            .unwrap_or_default();
        format!("{}, key {:?}", path, key)
    }

    /// Take the path from the flag's value. Empty values are rejected, as is
    /// any value for a file fixed at construction.
    pub(crate) fn set_path(&mut self, value: &str, source_name: &str) -> Result<()> {
        let FilePath::FromFlag { path, .. } = &mut self.path else {
            return Err(Error::FixedFileName {
                source_name: source_name.to_string(),
            });
        };
        if value.is_empty() {
            return Err(Error::EmptyFileName {
                source_name: source_name.to_string(),
            });
        }
        *path = Some(PathBuf::from(value));
        Ok(())
    }

    /// Read and parse the file on first call; later calls reuse the result.
    ///
    /// A failed load is remembered and reported again without touching the
    /// file system.
    pub(crate) fn load<F>(&mut self, source_name: &str, parse: F) -> Result<&T>
    where
        F: FnOnce(&Path, &str) -> Result<T>,
    {
        if let LoadState::Pending = self.state {
            let path = self
                .path()
                .ok_or_else(|| Error::NotInitialized {
                    source_name: source_name.to_string(),
                })?
                .to_path_buf();
            let parsed = std::fs::read_to_string(&path)
                .map_err(|cause| Error::Read {
                    path: path.clone(),
                    cause,
                })
                .and_then(|text| parse(&path, &text));
            match parsed {
                Ok(data) => {
                    debug!(source = %source_name, path = %path.display(), "loaded configuration file");
                    self.state = LoadState::Ready(data);
                }
                Err(err) => {
                    self.state = LoadState::Failed(err.to_string());
                    return Err(err);
                }
            }
        }

        match &self.state {
            LoadState::Ready(data) => Ok(data),
            LoadState::Failed(reason) => Err(Error::LoadFailed {
                source_name: source_name.to_string(),
                reason: reason.clone(),
            }),
            LoadState::Pending => Err(Error::NotInitialized {
                source_name: source_name.to_string(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn count_lines(_: &Path, text: &str) -> Result<usize> {
        Ok(text.lines().count())
    }

    #[test]
    fn test_fixed_loads_once() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("app.conf");
        std::fs::write(&path, "a\nb\n").unwrap();

        let mut file = LazyFile::fixed(&path);
        assert_eq!(*file.load("test", count_lines).unwrap(), 2);

        // Cached: the file changing on disk is not observed.
        std::fs::write(&path, "a\nb\nc\n").unwrap();
        assert_eq!(*file.load("test", count_lines).unwrap(), 2);
    }

    #[test]
    fn test_failure_is_sticky() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("missing.conf");

        let mut file: LazyFile<usize> = LazyFile::fixed(&path);
        assert!(matches!(file.load("test", count_lines), Err(Error::Read { .. })));

        std::fs::write(&path, "a\n").unwrap();
        assert!(matches!(
            file.load("test", count_lines),
            Err(Error::LoadFailed { .. })
        ));
    }

    #[test]
    fn test_from_flag_requires_path() {
        let mut file: LazyFile<usize> = LazyFile::from_flag("config");
        assert_eq!(file.flag(), Some("config"));
        assert!(matches!(
            file.load("test", count_lines),
            Err(Error::NotInitialized { .. })
        ));
        assert!(matches!(
            file.set_path("", "test"),
            Err(Error::EmptyFileName { .. })
        ));

        file.set_path("app.conf", "test").unwrap();
        assert_eq!(file.path(), Some(Path::new("app.conf")));
        assert_eq!(file.loc("port"), "app.conf, key \"port\"");
    }

    #[test]
    fn test_fixed_path_rejects_flag_value() {
        let mut file: LazyFile<usize> = LazyFile::fixed("a.json");
        assert!(matches!(
            file.set_path("b.json", "test"),
            Err(Error::FixedFileName { .. })
        ));
        assert_eq!(file.path(), Some(Path::new("a.json")));
    }
}
