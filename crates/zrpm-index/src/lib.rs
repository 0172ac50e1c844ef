//! In-memory package catalog for urpmi media.
//!
//! The catalog is rebuilt on every invocation from the metadata that
//! `urpmi.update` keeps for each medium:
//!
//! - the summary stream (`synthesis.hdlist.cz`) lists every package variant
//!   with its summary, group and sizes;
//! - the attribute stream (`info.xml.lzma`) adds license, URL, source package
//!   and description, keyed by file name within the medium.
//!
//! Both streams of every active medium are read concurrently, joined by medium
//! and file name, and merged with the installed package versions reported by rpm.
//!
//! # Example
//!
//! ```no_run
//! use zrpm_config::{config::Config, repository::load_repositories};
//! use zrpm_index::{IndexBuilder, RpmProbe};
//!
//! async fn find_boomaga(config: &Config) -> zrpm_index::Result<()> {
//!     let repositories = load_repositories(config)?;
//!     let catalog = IndexBuilder::new(repositories)
//!         .with_probe(RpmProbe::new(config.rpm_command()))
//!         .build()
//!         .await?;
//!
//!     let archs = config.arch();
//!     for pkg in catalog.search(&["boomaga"], archs.as_slice(), true)? {
//!         println!("{} {} {}", pkg.name, pkg.version, pkg.arch);
//!     }
//!     Ok(())
//! }
//! ```

pub mod builder;
pub mod catalog;
pub mod error;
pub mod info;
pub mod installed;
pub mod package;
pub mod query;
pub mod synthesis;
pub mod version;

pub use builder::IndexBuilder;
pub use catalog::Catalog;
pub use error::{ErrorContext, IndexError, Result};
pub use installed::{InstalledProbe, NoProbe, RpmProbe, StaticProbe};
pub use package::{AttributeRecord, Package, PackageState, SummaryRecord};
pub use query::{ArchFilter, NameMatcher, Search};
