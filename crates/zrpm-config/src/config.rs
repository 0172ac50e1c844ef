use std::{
    fs,
    path::{Path, PathBuf},
};

use documented::{Documented, DocumentedFields};
use serde::{Deserialize, Serialize};
use toml_edit::DocumentMut;
use tracing::{debug, info, warn};
use zrpm_utils::{
    fs::ensure_dir_exists,
    path::{resolve_path, xdg_config_home},
    system::machine_arch,
};

use crate::{
    annotations::annotate_toml_table,
    display::DisplaySettings,
    error::{ConfigError, Result},
};

pub const DEFAULT_URPMI_CONFIG: &str = "/etc/urpmi/urpmi.cfg";
pub const DEFAULT_MEDIA_DIR: &str = "/var/lib/urpmi";
pub const DEFAULT_RPM_COMMAND: &str = "rpm";
pub const DEFAULT_ESCALATION_COMMAND: &str = "sudo";

/// Application's configuration
#[derive(Clone, Debug, Deserialize, Serialize, Documented, DocumentedFields)]
pub struct Config {
    /// Path to the urpmi media configuration file.
    /// Default: /etc/urpmi/urpmi.cfg
    pub urpmi_config: Option<String>,

    /// Directory holding the synced metadata of every medium.
    /// Default: /var/lib/urpmi
    pub media_dir: Option<String>,

    /// Architectures searched when none are given on the command line.
    /// Default: ["noarch", <machine architecture>]
    pub arch: Option<Vec<String>>,

    /// Command used to list the installed packages.
    /// Default: "rpm"
    pub rpm_command: Option<String>,

    /// Command used to gain root privileges for urpmi actions.
    /// Default: "sudo"
    pub escalation_command: Option<String>,

    /// Show every version of a package instead of only the newest one.
    /// Default: false
    pub show_duplicates: Option<bool>,

    /// Output settings
    pub display: Option<DisplaySettings>,
}

/// Location of the configuration file: `$ZRPM_CONFIG`, or
/// `$XDG_CONFIG_HOME/zrpm/config.toml`.
pub fn config_path() -> PathBuf {
    match std::env::var("ZRPM_CONFIG") {
        Ok(path_str) => PathBuf::from(path_str),
        Err(_) => xdg_config_home().join("zrpm").join("config.toml"),
    }
}

fn default_arch() -> Vec<String> {
    let machine = machine_arch().unwrap_or_else(|err| {
        warn!("Can't get machine architecture: {err}");
        std::env::consts::ARCH.to_string()
    });
    vec!["noarch".to_string(), machine]
}

impl Config {
    pub fn default_config() -> Self {
        Self {
            urpmi_config: Some(DEFAULT_URPMI_CONFIG.to_string()),
            media_dir: Some(DEFAULT_MEDIA_DIR.to_string()),
            arch: Some(default_arch()),
            rpm_command: Some(DEFAULT_RPM_COMMAND.to_string()),
            escalation_command: Some(DEFAULT_ESCALATION_COMMAND.to_string()),
            show_duplicates: Some(false),
            display: Some(DisplaySettings {
                color: Some(true),
                highlight: Some(true),
            }),
        }
    }

    /// Loads the configuration from `path`.
    /// If the file does not exist, the default configuration is used.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();

        let mut config = match fs::read_to_string(path) {
            Ok(content) => {
                debug!(path = %path.display(), "loading configuration");
                toml::from_str(&content)?
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!(path = %path.display(), "configuration not found, using defaults");
                Self::default_config()
            }
            Err(err) => return Err(ConfigError::IoError(err)),
        };

        config.resolve()?;

        Ok(config)
    }

    pub fn resolve(&mut self) -> Result<()> {
        self.urpmi_config
            .get_or_insert_with(|| DEFAULT_URPMI_CONFIG.to_string());
        self.media_dir
            .get_or_insert_with(|| DEFAULT_MEDIA_DIR.to_string());
        self.rpm_command
            .get_or_insert_with(|| DEFAULT_RPM_COMMAND.to_string());
        self.escalation_command
            .get_or_insert_with(|| DEFAULT_ESCALATION_COMMAND.to_string());
        self.show_duplicates.get_or_insert(false);
        self.display.get_or_insert_with(DisplaySettings::default);

        let arch = self.arch.get_or_insert_with(default_arch);
        if let Some(bad) = arch.iter().find(|a| a.trim().is_empty() || a.contains(',')) {
            return Err(ConfigError::InvalidArch(bad.clone()));
        }

        if self.rpm_command.as_deref().is_some_and(|c| c.trim().is_empty()) {
            return Err(ConfigError::EmptyCommand("rpm_command"));
        }
        if self
            .escalation_command
            .as_deref()
            .is_some_and(|c| c.trim().is_empty())
        {
            return Err(ConfigError::EmptyCommand("escalation_command"));
        }

        Ok(())
    }

    pub fn get_urpmi_config_path(&self) -> Result<PathBuf> {
        if let Ok(env_path) = std::env::var("ZRPM_URPMI_CONFIG") {
            return Ok(resolve_path(&env_path)?);
        }
        Ok(resolve_path(
            self.urpmi_config.as_deref().unwrap_or(DEFAULT_URPMI_CONFIG),
        )?)
    }

    pub fn get_media_dir(&self) -> Result<PathBuf> {
        if let Ok(env_path) = std::env::var("ZRPM_MEDIA_DIR") {
            return Ok(resolve_path(&env_path)?);
        }
        Ok(resolve_path(
            self.media_dir.as_deref().unwrap_or(DEFAULT_MEDIA_DIR),
        )?)
    }

    pub fn arch(&self) -> Vec<String> {
        self.arch.clone().unwrap_or_else(default_arch)
    }

    pub fn rpm_command(&self) -> &str {
        self.rpm_command.as_deref().unwrap_or(DEFAULT_RPM_COMMAND)
    }

    pub fn escalation_command(&self) -> &str {
        self.escalation_command
            .as_deref()
            .unwrap_or(DEFAULT_ESCALATION_COMMAND)
    }

    pub fn show_duplicates(&self) -> bool {
        self.show_duplicates.unwrap_or(false)
    }

    pub fn display(&self) -> DisplaySettings {
        self.display.clone().unwrap_or_default()
    }

    pub fn to_annotated_document(&self) -> Result<DocumentMut> {
        let toml_string = toml::to_string_pretty(self)?;
        let mut doc = toml_string.parse::<DocumentMut>()?;

        annotate_toml_table::<Config>(doc.as_table_mut(), true)?;

        if let Some(display_table) = doc.get_mut("display").and_then(|d| d.as_table_mut()) {
            annotate_toml_table::<DisplaySettings>(display_table, false)?;
        }

        Ok(doc)
    }
}

/// Writes the documented default configuration to `path`.
///
/// Refuses to overwrite an existing file.
pub fn generate_default_config<P: AsRef<Path>>(path: P) -> Result<()> {
    let path = path.as_ref();

    if path.exists() {
        return Err(ConfigError::ConfigAlreadyExists(path.to_path_buf()));
    }

    let annotated_doc = Config::default_config().to_annotated_document()?;

    if let Some(parent) = path.parent() {
        ensure_dir_exists(parent)?;
    }

    fs::write(path, annotated_doc.to_string())?;
    info!(
        "Default configuration file generated with documentation at: {}",
        path.display()
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use serial_test::serial;
    use tempfile::tempdir;

    use super::*;
    use crate::test_utils::with_env;

    #[test]
    fn test_default_config_creation() {
        let config = Config::default_config();

        assert_eq!(config.urpmi_config.as_deref(), Some(DEFAULT_URPMI_CONFIG));
        assert_eq!(config.media_dir.as_deref(), Some(DEFAULT_MEDIA_DIR));
        assert_eq!(config.rpm_command(), "rpm");
        assert_eq!(config.escalation_command(), "sudo");
        assert!(!config.show_duplicates());

        let arch = config.arch();
        assert_eq!(arch.len(), 2);
        assert_eq!(arch[0], "noarch");
    }

    #[test]
    fn test_load_missing_file_uses_defaults() {
        let dir = tempdir().unwrap();
        let config = Config::load(dir.path().join("config.toml")).unwrap();

        assert_eq!(config.rpm_command(), "rpm");
        assert!(config.display().color());
    }

    #[test]
    fn test_load_partial_file_fills_defaults() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(
            &path,
            "arch = [\"x86_64\"]\nshow_duplicates = true\n\n[display]\ncolor = false\n",
        )
        .unwrap();

        let config = Config::load(&path).unwrap();
        assert_eq!(config.arch(), vec!["x86_64".to_string()]);
        assert!(config.show_duplicates());
        assert!(!config.display().color());
        assert!(config.display().highlight());
        assert_eq!(config.media_dir.as_deref(), Some(DEFAULT_MEDIA_DIR));
    }

    #[test]
    fn test_load_malformed_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "arch = [").unwrap();

        assert!(matches!(
            Config::load(&path),
            Err(ConfigError::TomlDeError(_))
        ));
    }

    #[test]
    fn test_resolve_rejects_empty_arch() {
        let mut config = Config::default_config();
        config.arch = Some(vec!["x86_64".to_string(), " ".to_string()]);

        assert!(matches!(
            config.resolve(),
            Err(ConfigError::InvalidArch(_))
        ));
    }

    #[test]
    fn test_resolve_rejects_empty_command() {
        let mut config = Config::default_config();
        config.rpm_command = Some(String::new());

        assert!(matches!(
            config.resolve(),
            Err(ConfigError::EmptyCommand("rpm_command"))
        ));
    }

    #[test]
    #[serial]
    fn test_media_dir_env_override() {
        with_env(vec![("ZRPM_MEDIA_DIR", "/custom/media")], || {
            let config = Config::default_config();
            assert_eq!(
                config.get_media_dir().unwrap(),
                PathBuf::from("/custom/media")
            );
        });
    }

    #[test]
    #[serial]
    fn test_urpmi_config_env_override() {
        with_env(vec![("ZRPM_URPMI_CONFIG", "/custom/urpmi.cfg")], || {
            let config = Config::default_config();
            assert_eq!(
                config.get_urpmi_config_path().unwrap(),
                PathBuf::from("/custom/urpmi.cfg")
            );
        });
    }

    #[test]
    #[serial]
    fn test_config_path_env_override() {
        with_env(vec![("ZRPM_CONFIG", "/tmp/zrpm.toml")], || {
            assert_eq!(config_path(), PathBuf::from("/tmp/zrpm.toml"));
        });
    }

    #[test]
    fn test_config_serialization() {
        let config = Config::default_config();
        let serialized = toml::to_string(&config).unwrap();

        let deserialized: Config = toml::from_str(&serialized).unwrap();
        assert_eq!(deserialized.arch(), config.arch());
    }

    #[test]
    fn test_generate_default_config() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("zrpm").join("config.toml");

        generate_default_config(&path).unwrap();
        let content = fs::read_to_string(&path).unwrap();
        assert!(content.contains("urpmi_config"));

        let loaded = Config::load(&path).unwrap();
        assert_eq!(loaded.rpm_command(), "rpm");

        assert!(matches!(
            generate_default_config(&path),
            Err(ConfigError::ConfigAlreadyExists(_))
        ));
    }
}
