use std::collections::BTreeSet;

use crate::{
    error::Result,
    package::Package,
    query::{ArchFilter, NameMatcher, Search},
};

/// The immutable, name-sorted package catalog.
#[derive(Clone, Debug, Default)]
pub struct Catalog {
    packages: Vec<Package>,
}

impl Catalog {
    /// Creates a catalog, ordering `packages` by name. The sort is stable.
    pub fn new(mut packages: Vec<Package>) -> Self {
        packages.sort_by(|a, b| a.name.cmp(&b.name));
        Self { packages }
    }

    pub fn len(&self) -> usize {
        self.packages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.packages.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Package> {
        self.packages.iter()
    }

    /// Every architecture present in the catalog.
    pub fn architectures(&self) -> BTreeSet<String> {
        self.packages.iter().map(|p| p.arch.clone()).collect()
    }

    /// Searches the catalog.
    ///
    /// A package is returned when its architecture is in `archs` and its name
    /// matches any of `names` (see [`NameMatcher`]). With `latest_only`, only
    /// the newest version of each name is returned.
    ///
    /// # Example
    ///
    /// ```
    /// use zrpm_index::{Catalog, Package};
    ///
    /// let catalog = Catalog::new(vec![Package {
    ///     name: "boomaga".into(),
    ///     version: "0.7.1-1".into(),
    ///     arch: "x86_64".into(),
    ///     ..Default::default()
    /// }]);
    ///
    /// let found: Vec<_> = catalog.search(&["BOOM"], &["x86_64"], true).unwrap().collect();
    /// assert_eq!(found.len(), 1);
    /// ```
    pub fn search<N, A>(&self, names: &[N], archs: &[A], latest_only: bool) -> Result<Search<'_>>
    where
        N: AsRef<str>,
        A: AsRef<str>,
    {
        Ok(Search::new(
            &self.packages,
            NameMatcher::new(names)?,
            ArchFilter::new(archs),
            latest_only,
        ))
    }
}
