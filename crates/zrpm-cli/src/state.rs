use std::sync::Arc;

use tokio::sync::OnceCell as AsyncOnceCell;
use tracing::{debug, trace};
use zrpm_config::{
    config::Config,
    repository::{load_repositories, Repository},
};
use zrpm_index::{Catalog, IndexBuilder, RpmProbe};

use crate::{
    error::{ZrpmError, ZrpmResult},
    utils::Theme,
};

#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: Config,
    theme: Theme,
    catalog: AsyncOnceCell<Catalog>,
}

impl AppState {
    pub fn new(config: Config, theme: Theme) -> Self {
        trace!("creating new AppState");

        Self {
            inner: Arc::new(AppStateInner {
                config,
                theme,
                catalog: AsyncOnceCell::new(),
            }),
        }
    }

    pub fn config(&self) -> &Config {
        &self.inner.config
    }

    pub fn theme(&self) -> &Theme {
        &self.inner.theme
    }

    pub fn repositories(&self) -> ZrpmResult<Vec<Repository>> {
        Ok(load_repositories(self.config())?)
    }

    /// Builds the catalog on first use.
    pub async fn catalog(&self) -> ZrpmResult<&Catalog> {
        self.inner
            .catalog
            .get_or_try_init(|| async {
                let repositories = self.repositories()?;
                debug!(count = repositories.len(), "building catalog");

                let catalog = IndexBuilder::new(repositories)
                    .with_probe(RpmProbe::new(self.config().rpm_command()))
                    .build()
                    .await?;
                Ok::<_, ZrpmError>(catalog)
            })
            .await
    }

    /// Architectures to search: the `--arch` list, every architecture in the
    /// catalog for `all`, or the configured defaults.
    pub async fn resolve_arch(&self, arch: Option<&str>) -> ZrpmResult<Vec<String>> {
        match arch {
            Some(list) if is_all(list) => {
                Ok(self.catalog().await?.architectures().into_iter().collect())
            }
            Some(list) => Ok(split_arch(list)),
            None => Ok(self.config().arch()),
        }
    }
}

fn split_arch(list: &str) -> Vec<String> {
    list.split(',')
        .map(str::trim)
        .filter(|a| !a.is_empty())
        .map(String::from)
        .collect()
}

fn is_all(list: &str) -> bool {
    split_arch(list).iter().any(|a| a.eq_ignore_ascii_case("all"))
}
