use miette::Diagnostic;
use thiserror::Error;
use zrpm_config::error::ConfigError;
use zrpm_index::IndexError;
use zrpm_utils::error::{PathError, UtilsError};

#[derive(Error, Diagnostic, Debug)]
pub enum ZrpmError {
    #[error(transparent)]
    #[diagnostic(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Index(#[from] IndexError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Utils(#[from] UtilsError),

    #[error("Error while {action}: {source}")]
    #[diagnostic(code(zrpm::io))]
    IoError {
        action: String,
        source: std::io::Error,
    },

    #[error("`{command}` failed with {status}")]
    #[diagnostic(code(zrpm::command_failed))]
    CommandFailed {
        command: String,
        status: std::process::ExitStatus,
    },

    #[error("TOML serialization error: {0}")]
    #[diagnostic(code(zrpm::toml))]
    Toml(#[from] toml::ser::Error),
}

impl From<PathError> for ZrpmError {
    fn from(err: PathError) -> Self {
        Self::Utils(UtilsError::Path(err))
    }
}

pub type ZrpmResult<T> = std::result::Result<T, ZrpmError>;

pub trait ErrorContext<T> {
    fn with_context<C>(self, context: C) -> ZrpmResult<T>
    where
        C: FnOnce() -> String;
}

impl<T> ErrorContext<T> for std::io::Result<T> {
    fn with_context<C>(self, context: C) -> ZrpmResult<T>
    where
        C: FnOnce() -> String,
    {
        self.map_err(|err| {
            ZrpmError::IoError {
                action: context(),
                source: err,
            }
        })
    }
}
