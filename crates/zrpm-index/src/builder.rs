//! Concurrent catalog construction.
//!
//! Every active medium gets one summary reader and one attribute reader
//! running on the blocking pool. Readers send records into two channels, each
//! drained by a single consumer task that owns its accumulator. The installed
//! set probe runs alongside. Once every task has finished, the records are
//! joined into the [`Catalog`].

use std::{
    collections::{HashMap, HashSet},
    sync::Arc,
};

use tokio::{
    sync::mpsc::{self, Receiver, Sender},
    task::JoinHandle,
};
use tracing::{debug, trace};
use zrpm_config::repository::{active_repositories, Repository};

use crate::{
    catalog::Catalog,
    error::{IndexError, Result},
    info::read_attribute_stream,
    installed::{InstalledProbe, NoProbe},
    package::{AttributeRecord, Package, SummaryRecord},
    synthesis::SummaryReader,
};

const CHANNEL_CAPACITY: usize = 1024;

/// Attribute records by medium name, then by file name.
type AttributeIndex = HashMap<String, HashMap<String, AttributeRecord>>;

pub struct IndexBuilder {
    repositories: Vec<Repository>,
    probe: Arc<dyn InstalledProbe>,
}

impl IndexBuilder {
    /// Creates a builder for `repositories`. Ignored media are skipped.
    pub fn new(repositories: Vec<Repository>) -> Self {
        Self {
            repositories,
            probe: Arc::new(NoProbe),
        }
    }

    /// Sets the source of installed package versions.
    pub fn with_probe<P: InstalledProbe + 'static>(mut self, probe: P) -> Self {
        self.probe = Arc::new(probe);
        self
    }

    /// Reads every active medium and builds the catalog.
    ///
    /// The first error from any reader or from the probe aborts the build.
    pub async fn build(self) -> Result<Catalog> {
        let active = active_repositories(&self.repositories);
        debug!(
            configured = self.repositories.len(),
            active = active.len(),
            "building catalog"
        );

        let (summary_tx, summary_rx) = mpsc::channel(CHANNEL_CAPACITY);
        let (attribute_tx, attribute_rx) = mpsc::channel(CHANNEL_CAPACITY);

        let summary_consumer = tokio::spawn(collect_packages(summary_rx));
        let attribute_consumer = tokio::spawn(collect_attributes(attribute_rx));

        let probe = Arc::clone(&self.probe);
        let probe_task = tokio::task::spawn_blocking(move || probe.installed());

        let mut producers: Vec<(JoinHandle<Result<usize>>, String)> = Vec::new();
        for repo in &active {
            trace!(repo = repo.name, "scheduling medium readers");

            let summary_repo = repo.clone();
            let tx = summary_tx.clone();
            producers.push((
                tokio::task::spawn_blocking(move || send_summary(&summary_repo, tx)),
                repo.name.clone(),
            ));

            let attribute_repo = repo.clone();
            let tx = attribute_tx.clone();
            producers.push((
                tokio::task::spawn_blocking(move || send_attributes(&attribute_repo, tx)),
                repo.name.clone(),
            ));
        }

        // Consumers stop once the last producer drops its sender.
        drop(summary_tx);
        drop(attribute_tx);

        for (task, repo_name) in producers {
            let count = task.await??;
            trace!(repo = repo_name, records = count, "medium stream read");
        }

        let packages = summary_consumer.await?;
        let attributes = attribute_consumer.await?;
        let installed = probe_task.await??;

        let rank: HashMap<&str, usize> = active
            .iter()
            .enumerate()
            .map(|(i, repo)| (repo.name.as_str(), i))
            .collect();

        let catalog = join(packages, &attributes, &installed, &rank);
        debug!(
            packages = catalog.len(),
            attributes = attributes.values().map(HashMap::len).sum::<usize>(),
            installed = installed.len(),
            "catalog built"
        );

        Ok(catalog)
    }
}

fn send_summary(repo: &Repository, tx: Sender<SummaryRecord>) -> Result<usize> {
    let path = repo.summary_path();
    let Some(reader) = SummaryReader::open(&path, &repo.name)? else {
        return Ok(0);
    };

    let mut count = 0;
    for record in reader {
        tx.blocking_send(record?)
            .map_err(|_| IndexError::Join("summary consumer stopped".to_string()))?;
        count += 1;
    }

    debug!(repo = repo.name, records = count, "summary stream parsed");
    Ok(count)
}

fn send_attributes(repo: &Repository, tx: Sender<(String, AttributeRecord)>) -> Result<usize> {
    let records = read_attribute_stream(repo.attribute_path())?;
    let count = records.len();

    for record in records {
        tx.blocking_send((repo.name.clone(), record))
            .map_err(|_| IndexError::Join("attribute consumer stopped".to_string()))?;
    }

    debug!(repo = repo.name, records = count, "attribute stream parsed");
    Ok(count)
}

async fn collect_packages(mut rx: Receiver<SummaryRecord>) -> Vec<Package> {
    let mut packages = Vec::new();
    while let Some(record) = rx.recv().await {
        packages.push(Package::from(record));
    }
    packages
}

async fn collect_attributes(mut rx: Receiver<(String, AttributeRecord)>) -> AttributeIndex {
    let mut attributes = AttributeIndex::new();
    while let Some((repository, record)) = rx.recv().await {
        attributes
            .entry(repository)
            .or_default()
            .insert(record.file_name.clone(), record);
    }
    attributes
}

/// Sorts the packages by name and enriches them with attributes and installed
/// versions.
///
/// A file name listed by several media is kept once, from the medium that comes
/// first in `rank`. Attributes are only taken from the package's own medium.
fn join(
    mut packages: Vec<Package>,
    attributes: &AttributeIndex,
    installed: &HashMap<String, String>,
    rank: &HashMap<&str, usize>,
) -> Catalog {
    packages.sort_by(|a, b| {
        a.name.cmp(&b.name).then_with(|| {
            let ra = rank.get(a.repository.as_str()).copied().unwrap_or(usize::MAX);
            let rb = rank.get(b.repository.as_str()).copied().unwrap_or(usize::MAX);
            ra.cmp(&rb)
        })
    });

    let mut seen = HashSet::new();
    packages.retain(|pkg| seen.insert(pkg.file_name.clone()));

    for pkg in &mut packages {
        let attr = attributes
            .get(&pkg.repository)
            .and_then(|records| records.get(&pkg.file_name));
        if let Some(attr) = attr {
            pkg.apply_attributes(attr);
        }
        if let Some(version) = installed.get(&pkg.name) {
            pkg.installed_version.clone_from(version);
        }
    }

    Catalog::new(packages)
}
