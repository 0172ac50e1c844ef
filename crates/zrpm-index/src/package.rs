//! Package records produced by the stream readers and the catalog entry they
//! are joined into.

use std::cmp::Ordering;

use crate::{
    error::{IndexError, Result},
    version,
};

/// One package variant as listed in a medium's summary stream.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SummaryRecord {
    pub file_name: String,
    pub name: String,
    pub version: String,
    pub arch: String,
    pub disttag: String,
    pub distepoch: String,
    pub summary: String,
    /// Size of the installed file set.
    pub installed_size: u64,
    /// Size of the compressed package.
    pub package_size: u64,
    pub group: String,
    pub repository: String,
}

/// Verbose package attributes from a medium's attribute stream, keyed by
/// file name.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct AttributeRecord {
    pub file_name: String,
    pub source_rpm: String,
    pub url: String,
    pub license: String,
    pub description: String,
    pub disttag: String,
    pub distepoch: String,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PackageState {
    NotInstalled,
    Installed,
    /// An older version is installed.
    Upgradable,
}

/// A catalog entry.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Package {
    pub name: String,
    pub version: String,
    pub arch: String,
    pub file_name: String,
    pub summary: String,
    pub description: String,
    pub license: String,
    pub url: String,
    pub source_rpm: String,
    pub group: String,
    pub package_size: u64,
    pub installed_size: u64,
    pub repository: String,
    /// Empty when the package is not installed.
    pub installed_version: String,
    pub disttag: String,
    pub distepoch: String,
}

impl Package {
    /// Copies the verbose attributes into this entry.
    ///
    /// Distribution tag and epoch are taken from the attribute record only when
    /// the summary stream left them empty.
    pub fn apply_attributes(&mut self, attr: &AttributeRecord) {
        self.source_rpm.clone_from(&attr.source_rpm);
        self.url.clone_from(&attr.url);
        self.license.clone_from(&attr.license);
        self.description.clone_from(&attr.description);

        if self.disttag.is_empty() {
            self.disttag.clone_from(&attr.disttag);
        }
        if self.distepoch.is_empty() {
            self.distepoch.clone_from(&attr.distepoch);
        }
    }

    pub fn is_installed(&self) -> bool {
        !self.installed_version.is_empty()
    }

    pub fn state(&self) -> PackageState {
        if !self.is_installed() {
            return PackageState::NotInstalled;
        }

        match version::compare(&self.installed_version, &self.version) {
            Ordering::Less => PackageState::Upgradable,
            _ => PackageState::Installed,
        }
    }
}

impl From<SummaryRecord> for Package {
    fn from(record: SummaryRecord) -> Self {
        Self {
            name: record.name,
            version: record.version,
            arch: record.arch,
            file_name: record.file_name,
            summary: record.summary,
            group: record.group,
            package_size: record.package_size,
            installed_size: record.installed_size,
            repository: record.repository,
            disttag: record.disttag,
            distepoch: record.distepoch,
            ..Default::default()
        }
    }
}

/// Splits a package file name into name, version and architecture.
///
/// The file name is split on `-`. The last segment carries the architecture
/// after its final `.`, the two segments before it form the version, and
/// everything in front is the name.
///
/// # Example
///
/// ```
/// use zrpm_index::package::split_file_name;
///
/// let (name, version, arch) =
///     split_file_name("libvo-amrwbenc0-0.1.2-1-rosa2014.1.i586").unwrap();
/// assert_eq!(name, "libvo-amrwbenc0");
/// assert_eq!(version, "0.1.2-1");
/// assert_eq!(arch, "i586");
/// ```
pub fn split_file_name(file_name: &str) -> Result<(String, String, String)> {
    let items: Vec<&str> = file_name.split('-').collect();
    let n = items.len();
    if n < 4 {
        return Err(IndexError::FileName(file_name.to_string()));
    }

    let last = items[n - 1];
    let arch = match last.rfind('.') {
        Some(pos) => &last[pos + 1..],
        None => last,
    };

    let version = format!("{}-{}", items[n - 3], items[n - 2]);
    let name = items[..n - 3].join("-");

    Ok((name, version, arch.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_file_name() {
        let (name, version, arch) =
            split_file_name("boomaga-0.7.1-1-rosa2014.1.x86_64").unwrap();
        assert_eq!(name, "boomaga");
        assert_eq!(version, "0.7.1-1");
        assert_eq!(arch, "x86_64");

        let (name, version, arch) =
            split_file_name("lib64qt5-base5-devel-5.3.2-3-rosa2014.1.noarch").unwrap();
        assert_eq!(name, "lib64qt5-base5-devel");
        assert_eq!(version, "5.3.2-3");
        assert_eq!(arch, "noarch");
    }

    #[test]
    fn test_split_file_name_reconstructs_prefix() {
        let file_name = "perl-Text-CSV-1.32-2-rosa2014.1.noarch";
        let (name, version, arch) = split_file_name(file_name).unwrap();

        assert!(file_name.starts_with(&format!("{name}-{version}-")));
        assert!(file_name.ends_with(&format!(".{arch}")));
    }

    #[test]
    fn test_split_file_name_too_short() {
        assert!(matches!(
            split_file_name("boomaga-0.7.1.x86_64"),
            Err(IndexError::FileName(_))
        ));
        assert!(matches!(split_file_name(""), Err(IndexError::FileName(_))));
    }

    #[test]
    fn test_package_state() {
        let mut pkg = Package {
            name: "boomaga".to_string(),
            version: "0.7.1-1".to_string(),
            ..Default::default()
        };
        assert_eq!(pkg.state(), PackageState::NotInstalled);

        pkg.installed_version = "0.7.1-1".to_string();
        assert_eq!(pkg.state(), PackageState::Installed);

        pkg.installed_version = "0.6.0-1".to_string();
        assert_eq!(pkg.state(), PackageState::Upgradable);

        pkg.installed_version = "0.8.0-1".to_string();
        assert_eq!(pkg.state(), PackageState::Installed);
    }

    #[test]
    fn test_apply_attributes() {
        let mut pkg = Package::from(SummaryRecord {
            file_name: "boomaga-0.7.1-1-rosa2014.1.x86_64".to_string(),
            disttag: "rosa".to_string(),
            ..Default::default()
        });

        pkg.apply_attributes(&AttributeRecord {
            file_name: pkg.file_name.clone(),
            source_rpm: "boomaga-0.7.1-1.src.rpm".to_string(),
            url: "http://boomaga.github.io".to_string(),
            license: "GPLv2+".to_string(),
            description: "Virtual printer".to_string(),
            disttag: "other".to_string(),
            distepoch: "2014.1".to_string(),
        });

        assert_eq!(pkg.source_rpm, "boomaga-0.7.1-1.src.rpm");
        assert_eq!(pkg.license, "GPLv2+");
        assert_eq!(pkg.disttag, "rosa");
        assert_eq!(pkg.distepoch, "2014.1");
    }
}
