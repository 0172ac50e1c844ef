use std::{
    fs,
    path::{Path, PathBuf},
    time::SystemTime,
};

use tracing::{debug, trace};
use zrpm_utils::fs::modified_time;

use crate::{
    config::Config,
    error::{ConfigError, Result},
};

/// Compact per-medium package summary, gzip compressed.
pub const SUMMARY_FILE: &str = "synthesis.hdlist.cz";

/// Verbose per-medium package attributes, lzma compressed XML.
pub const ATTRIBUTE_FILE: &str = "info.xml.lzma";

/// Checksum list rewritten by `urpmi.update` on every sync.
pub const MD5SUM_FILE: &str = "MD5SUM";

/// A urpmi medium that provides packages.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Repository {
    /// Unique name of the medium.
    pub name: String,

    /// Where urpmi fetches the medium from.
    pub url: String,

    /// Media marked `ignore` are skipped when building the catalog.
    pub ignore: bool,

    /// Local directory with the synced metadata.
    pub dir: PathBuf,

    /// Last time the medium metadata was synced.
    pub last_update: Option<SystemTime>,
}

impl Repository {
    pub fn new<P: AsRef<Path>>(name: &str, url: &str, media_dir: P) -> Self {
        Self {
            name: name.to_string(),
            url: url.to_string(),
            ignore: false,
            dir: media_dir.as_ref().join(name),
            last_update: None,
        }
    }

    pub fn is_active(&self) -> bool {
        !self.ignore
    }

    pub fn summary_path(&self) -> PathBuf {
        self.dir.join(SUMMARY_FILE)
    }

    pub fn attribute_path(&self) -> PathBuf {
        self.dir.join(ATTRIBUTE_FILE)
    }
}

/// Parses the content of `urpmi.cfg`.
///
/// The file is a sequence of `head { body }` blocks. The last
/// whitespace-separated token of the head is the medium URL, the rest is its
/// name (with `\` escapes removed). A body containing the `ignore` keyword
/// disables the medium. Blocks with an empty head hold global options and are
/// skipped.
pub fn parse_media_config<P: AsRef<Path>>(content: &str, media_dir: P) -> Result<Vec<Repository>> {
    let media_dir = media_dir.as_ref();
    let mut repositories = Vec::new();
    let mut rest = content;

    while let Some(open) = rest.find('{') {
        let head = rest[..open].trim();
        let after_open = &rest[open + 1..];
        let (body, next) = match after_open.find('}') {
            Some(close) => (&after_open[..close], &after_open[close + 1..]),
            None => (after_open, ""),
        };
        rest = next;

        if head.is_empty() {
            continue;
        }

        let split = head
            .rfind(char::is_whitespace)
            .ok_or_else(|| ConfigError::InvalidMediaLine(head.to_string()))?;

        let name = head[..split].replace('\\', "");
        let name = name.trim();
        let url = head[split..].trim();

        if name.is_empty() {
            return Err(ConfigError::InvalidMediaLine(head.to_string()));
        }

        let mut repo = Repository::new(name, url, media_dir);
        repo.ignore = body.split_whitespace().any(|word| word == "ignore");
        if repo.is_active() {
            repo.last_update = modified_time(repo.dir.join(MD5SUM_FILE));
        }

        trace!(
            name = repo.name,
            url = repo.url,
            ignore = repo.ignore,
            "found medium"
        );
        repositories.push(repo);
    }

    if !rest.trim().is_empty() {
        return Err(ConfigError::InvalidMediaLine(rest.trim().to_string()));
    }

    Ok(repositories)
}

/// Reads every medium declared in the urpmi configuration.
pub fn load_repositories(config: &Config) -> Result<Vec<Repository>> {
    let path = config.get_urpmi_config_path()?;
    let media_dir = config.get_media_dir()?;

    let content = fs::read_to_string(&path).map_err(|err| {
        ConfigError::MediaConfigRead {
            path: path.clone(),
            source: err,
        }
    })?;

    let repositories = parse_media_config(&content, &media_dir)?;
    debug!(
        path = %path.display(),
        count = repositories.len(),
        "loaded media configuration"
    );
    Ok(repositories)
}

/// Returns the media that are not marked `ignore`.
pub fn active_repositories(repositories: &[Repository]) -> Vec<Repository> {
    repositories
        .iter()
        .filter(|repo| repo.is_active())
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use serial_test::serial;
    use tempfile::tempdir;

    use super::*;

    const URPMI_CFG: &str = r#"{
  downloader: wget
  verify-rpm: 1
}

Main http://abf-downloads.rosalinux.ru/rosa2014.1/repository/x86_64/main/release {
  key-ids: bf81de15
}

Main\ Updates http://abf-downloads.rosalinux.ru/rosa2014.1/repository/x86_64/main/updates {
  key-ids: bf81de15
  update
}

Contrib	http://abf-downloads.rosalinux.ru/rosa2014.1/repository/x86_64/contrib/release {
  ignore
  key-ids: bf81de15
}
"#;

    #[test]
    fn test_parse_media_config() {
        let repos = parse_media_config(URPMI_CFG, "/var/lib/urpmi").unwrap();

        assert_eq!(repos.len(), 3);

        assert_eq!(repos[0].name, "Main");
        assert_eq!(
            repos[0].url,
            "http://abf-downloads.rosalinux.ru/rosa2014.1/repository/x86_64/main/release"
        );
        assert!(!repos[0].ignore);
        assert_eq!(repos[0].dir, PathBuf::from("/var/lib/urpmi/Main"));

        assert_eq!(repos[1].name, "Main Updates");
        assert!(!repos[1].ignore);

        assert_eq!(repos[2].name, "Contrib");
        assert!(repos[2].ignore);
    }

    #[test]
    fn test_stream_paths() {
        let repo = Repository::new("Main", "http://example.com", "/var/lib/urpmi");
        assert_eq!(
            repo.summary_path(),
            PathBuf::from("/var/lib/urpmi/Main/synthesis.hdlist.cz")
        );
        assert_eq!(
            repo.attribute_path(),
            PathBuf::from("/var/lib/urpmi/Main/info.xml.lzma")
        );
    }

    #[test]
    fn test_ignore_keyword_must_be_a_word() {
        let cfg = "Main http://example.com {\n  key-ids: ignored-key\n}\n";
        let repos = parse_media_config(cfg, "/media").unwrap();
        assert!(!repos[0].ignore);
    }

    #[test]
    fn test_media_line_without_url() {
        let cfg = "Main {\n}\n";
        assert!(matches!(
            parse_media_config(cfg, "/media"),
            Err(ConfigError::InvalidMediaLine(_))
        ));
    }

    #[test]
    fn test_trailing_garbage() {
        let cfg = "Main http://example.com {\n}\nstray text";
        assert!(matches!(
            parse_media_config(cfg, "/media"),
            Err(ConfigError::InvalidMediaLine(_))
        ));
    }

    #[test]
    fn test_empty_config() {
        assert!(parse_media_config("", "/media").unwrap().is_empty());
        assert!(parse_media_config("\n  \n", "/media").unwrap().is_empty());
    }

    #[test]
    fn test_last_update_from_md5sum() {
        let dir = tempdir().unwrap();
        fs::create_dir_all(dir.path().join("Main")).unwrap();
        fs::write(dir.path().join("Main").join(MD5SUM_FILE), "x  info.xml.lzma\n").unwrap();

        let cfg = "Main http://example.com {\n}\nOld http://example.com/old {\n ignore\n}\n";
        let repos = parse_media_config(cfg, dir.path()).unwrap();

        assert!(repos[0].last_update.is_some());
        assert!(repos[1].last_update.is_none());
    }

    #[test]
    fn test_active_repositories() {
        let repos = parse_media_config(URPMI_CFG, "/var/lib/urpmi").unwrap();
        let active = active_repositories(&repos);

        assert_eq!(active.len(), 2);
        assert!(active.iter().all(Repository::is_active));
    }

    #[test]
    #[serial]
    fn test_load_repositories_missing_file() {
        let dir = tempdir().unwrap();
        let mut config = Config::default_config();
        config.urpmi_config = Some(dir.path().join("urpmi.cfg").display().to_string());

        assert!(matches!(
            load_repositories(&config),
            Err(ConfigError::MediaConfigRead { .. })
        ));
    }
}
