//! Error types for the index crate.
//!
//! Every failure while building the catalog is fatal: the builder stops at the
//! first [`IndexError`] it sees and no partial catalog is produced.

use std::path::PathBuf;

use miette::Diagnostic;
use thiserror::Error;
use zrpm_config::error::ConfigError;
use zrpm_utils::error::FileSystemError;

#[derive(Error, Diagnostic, Debug)]
pub enum IndexError {
    #[error("Error while {action}: {source}")]
    #[diagnostic(code(zrpm_index::io))]
    Io {
        action: String,
        source: std::io::Error,
    },

    #[error(transparent)]
    #[diagnostic(transparent)]
    FileSystem(#[from] FileSystemError),

    #[error("{}:{line}: {reason}", .path.display())]
    #[diagnostic(
        code(zrpm_index::parse),
        help("The medium metadata may be corrupted, try running `urpmi.update -a`")
    )]
    Parse {
        path: PathBuf,
        line: usize,
        reason: String,
    },

    #[error("Can't split package file name '{0}'")]
    #[diagnostic(
        code(zrpm_index::file_name),
        help("Package file names must look like `name-version-release-distro.arch`")
    )]
    FileName(String),

    #[error("{}:{line}: invalid package size '{value}'", .path.display())]
    #[diagnostic(code(zrpm_index::invalid_size))]
    InvalidSize {
        path: PathBuf,
        line: usize,
        value: String,
    },

    #[error("Can't decode attribute stream {}: {source}", .path.display())]
    #[diagnostic(
        code(zrpm_index::xml),
        help("The medium metadata may be corrupted, try running `urpmi.update -a`")
    )]
    Xml {
        path: PathBuf,
        source: serde_xml_rs::Error,
    },

    #[error("Can't query installed packages: {0}")]
    #[diagnostic(
        code(zrpm_index::probe),
        help("Check that `rpm_command` points at a working rpm binary")
    )]
    Probe(String),

    #[error("Invalid search pattern: {0}")]
    #[diagnostic(code(zrpm_index::pattern))]
    Pattern(#[from] regex::Error),

    #[error("Join handle error: {0}")]
    #[diagnostic(code(zrpm_index::join))]
    Join(String),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Config(#[from] ConfigError),
}

pub type Result<T> = std::result::Result<T, IndexError>;

/// Extension trait for adding context to I/O errors.
pub trait ErrorContext<T> {
    /// Adds context to an error, describing what action was being performed.
    fn with_context<C>(self, context: C) -> Result<T>
    where
        C: FnOnce() -> String;
}

impl<T> ErrorContext<T> for std::io::Result<T> {
    fn with_context<C>(self, context: C) -> Result<T>
    where
        C: FnOnce() -> String,
    {
        self.map_err(|err| {
            IndexError::Io {
                action: context(),
                source: err,
            }
        })
    }
}

impl From<tokio::task::JoinError> for IndexError {
    fn from(err: tokio::task::JoinError) -> Self {
        Self::Join(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use std::io;

    use super::*;

    #[test]
    fn test_error_display() {
        let err = IndexError::Parse {
            path: PathBuf::from("/media/Main/synthesis.hdlist.cz"),
            line: 12,
            reason: "too few fields in info line".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "/media/Main/synthesis.hdlist.cz:12: too few fields in info line"
        );

        let err = IndexError::FileName("broken.rpm".to_string());
        assert_eq!(err.to_string(), "Can't split package file name 'broken.rpm'");
    }

    #[test]
    fn test_error_context() {
        let result: io::Result<()> = Err(io::Error::other("boom"));
        let err = result
            .with_context(|| "reading summary stream".to_string())
            .unwrap_err();

        assert!(matches!(err, IndexError::Io { .. }));
        assert_eq!(err.to_string(), "Error while reading summary stream: boom");
    }
}
