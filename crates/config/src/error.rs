//! Error types for configuration loading and validation.

use std::path::{Path, PathBuf};

use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
/// Errors produced while loading, parsing, or validating a configuration.
pub enum Error {
    #[error("{message}")]
    /// I/O or filesystem read error.
    Read {
        /// Optional path associated with the read error.
        path: Option<PathBuf>,
        /// Human-readable error message.
        message: String,
    },
    #[error("{message}")]
    /// RON syntax or shape error. The message carries the RON position.
    Parse {
        /// Optional path associated with the parse error.
        path: Option<PathBuf>,
        /// Human-readable error message.
        message: String,
    },
    #[error("{message}")]
    /// A value parsed but is not acceptable.
    Validation {
        /// Human-readable error message.
        message: String,
    },
}

impl Error {
    /// Render a human-friendly error message including the path when known.
    pub fn pretty(&self) -> String {
        match self {
            Self::Read { path, message } => match path {
                Some(p) => format!("Read error at {}: {}", p.display(), message),
                None => format!("Read error: {}", message),
            },
            Self::Parse { path, message } => match path {
                Some(p) => format!("Config parse error at {}\n{}", p.display(), message),
                None => format!("Config parse error\n{}", message),
            },
            Self::Validation { message } => format!("Config validation error\n{}", message),
        }
    }

    /// Access the optional path attached to this error.
    pub fn path(&self) -> Option<&Path> {
        match self {
            Self::Read { path, .. } | Self::Parse { path, .. } => path.as_deref(),
            Self::Validation { .. } => None,
        }
    }

    /// Attach `path` to a parse error produced from in-memory text.
    pub(crate) fn at_path(self, p: &Path) -> Self {
        match self {
            Self::Parse { path: None, message } => Self::Parse {
                path: Some(p.to_path_buf()),
                message,
            },
            other => other,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pretty_includes_path() {
        let e = Error::Read {
            path: Some(PathBuf::from("/tmp/focus.ron")),
            message: "not found".into(),
        };
        assert_eq!(e.pretty(), "Read error at /tmp/focus.ron: not found");
        assert_eq!(e.path(), Some(Path::new("/tmp/focus.ron")));
    }

    #[test]
    fn at_path_only_fills_missing_paths() {
        let e = Error::Parse {
            path: None,
            message: "bad".into(),
        }
        .at_path(Path::new("a.ron"));
        assert_eq!(e.path(), Some(Path::new("a.ron")));
        let v = Error::Validation {
            message: "x".into(),
        }
        .at_path(Path::new("a.ron"));
        assert_eq!(v.path(), None);
    }
}
