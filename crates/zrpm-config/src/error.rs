use std::path::PathBuf;

use miette::Diagnostic;
use thiserror::Error;
use zrpm_utils::error::{FileSystemError, PathError, SystemError, UtilsError};

#[derive(Error, Diagnostic, Debug)]
pub enum ConfigError {
    #[error("TOML serialization error: {0}")]
    #[diagnostic(
        code(zrpm_config::toml_serialize),
        help("Check your configuration structure for invalid values")
    )]
    TomlSerError(#[from] toml::ser::Error),

    #[error("TOML deserialization error: {0}")]
    #[diagnostic(
        code(zrpm_config::toml_deserialize),
        help("Check your config.toml syntax and structure")
    )]
    TomlDeError(#[from] toml::de::Error),

    #[error("Configuration file already exists: {}", .0.display())]
    #[diagnostic(
        code(zrpm_config::already_exists),
        help("Remove the existing config file or use a different location")
    )]
    ConfigAlreadyExists(PathBuf),

    #[error("Invalid architecture in configuration: {0:?}")]
    #[diagnostic(
        code(zrpm_config::invalid_arch),
        help("Architectures must be non-empty names such as `noarch` or `x86_64`")
    )]
    InvalidArch(String),

    #[error("Configuration field `{0}` must not be empty")]
    #[diagnostic(code(zrpm_config::empty_command))]
    EmptyCommand(&'static str),

    #[error("Incorrect media line '{0}' in urpmi.cfg")]
    #[diagnostic(
        code(zrpm_config::invalid_media_line),
        help("Each medium must be declared as `<name> <url> {{ ... }}`")
    )]
    InvalidMediaLine(String),

    #[error("Can't read media configuration {}", .path.display())]
    #[diagnostic(
        code(zrpm_config::media_config),
        help("Check that urpmi is configured, or point `urpmi_config` at the right file")
    )]
    MediaConfigRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("IO error: {0}")]
    #[diagnostic(code(zrpm_config::io))]
    IoError(#[from] std::io::Error),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Utils(#[from] UtilsError),

    #[error("Failed to parse TOML: {0}")]
    #[diagnostic(code(zrpm_config::toml))]
    Toml(#[from] toml_edit::TomlError),

    #[error("Encountered unexpected TOML item: {0}")]
    #[diagnostic(code(zrpm_config::unexpected_toml_item))]
    UnexpectedTomlItem(String),
}

impl From<PathError> for ConfigError {
    fn from(err: PathError) -> Self {
        Self::Utils(UtilsError::Path(err))
    }
}

impl From<FileSystemError> for ConfigError {
    fn from(err: FileSystemError) -> Self {
        Self::Utils(UtilsError::FileSystem(err))
    }
}

impl From<SystemError> for ConfigError {
    fn from(err: SystemError) -> Self {
        Self::Utils(UtilsError::System(err))
    }
}

pub type Result<T> = std::result::Result<T, ConfigError>;
