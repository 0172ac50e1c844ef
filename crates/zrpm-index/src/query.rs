//! Search evaluation over a name-sorted catalog.

use std::{cmp::Ordering, collections::VecDeque, mem, slice};

use regex::Regex;

use crate::{error::Result, package::Package, version};

/// Case-insensitive glob matching on package names.
///
/// Each pattern is implicitly wrapped in `*`, so `qt` matches `libqt5-base`.
/// `*` matches any run of characters and `?` a single one. An empty pattern
/// matches nothing.
#[derive(Clone, Debug)]
pub struct NameMatcher {
    patterns: Vec<Regex>,
}

fn glob_to_regex(pattern: &str) -> String {
    let mut expr = String::from("(?s)^.*");
    let mut literal = String::new();

    for c in pattern.to_lowercase().chars() {
        match c {
            '*' | '?' => {
                expr.push_str(&regex::escape(&literal));
                literal.clear();
                expr.push_str(if c == '*' { ".*" } else { "." });
            }
            _ => literal.push(c),
        }
    }
    expr.push_str(&regex::escape(&literal));
    expr.push_str(".*$");
    expr
}

impl NameMatcher {
    pub fn new<S: AsRef<str>>(patterns: &[S]) -> Result<Self> {
        let patterns = patterns
            .iter()
            .map(|p| p.as_ref())
            .filter(|p| !p.is_empty())
            .map(|p| Regex::new(&glob_to_regex(p)))
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(Self { patterns })
    }

    pub fn matches(&self, name: &str) -> bool {
        if self.patterns.is_empty() {
            return false;
        }
        let name = name.to_lowercase();
        self.patterns.iter().any(|re| re.is_match(&name))
    }
}

/// Case-insensitive architecture set. An empty set matches nothing.
#[derive(Clone, Debug, Default)]
pub struct ArchFilter {
    archs: Vec<String>,
}

impl ArchFilter {
    pub fn new<S: AsRef<str>>(archs: &[S]) -> Self {
        Self {
            archs: archs.iter().map(|a| a.as_ref().to_lowercase()).collect(),
        }
    }

    pub fn matches(&self, arch: &str) -> bool {
        let arch = arch.to_lowercase();
        self.archs.iter().any(|a| *a == arch)
    }
}

/// Lazily evaluated search results.
///
/// Candidates of the same name form a run. Each run is ordered newest version
/// first (architecture ascending on ties) and, in latest-only mode, reduced to
/// its first element. Runs are only finalized when the next name starts, so
/// stopping early does no work past the current run.
pub struct Search<'a> {
    packages: slice::Iter<'a, Package>,
    names: NameMatcher,
    archs: ArchFilter,
    latest_only: bool,
    run: Vec<&'a Package>,
    ready: VecDeque<&'a Package>,
}

impl<'a> Search<'a> {
    /// `packages` must be sorted by name.
    pub fn new(
        packages: &'a [Package],
        names: NameMatcher,
        archs: ArchFilter,
        latest_only: bool,
    ) -> Self {
        Self {
            packages: packages.iter(),
            names,
            archs,
            latest_only,
            run: Vec::new(),
            ready: VecDeque::new(),
        }
    }

    fn is_candidate(&self, pkg: &Package) -> bool {
        self.archs.matches(&pkg.arch) && self.names.matches(&pkg.name)
    }

    fn finalize_run(&mut self) {
        let mut run = mem::take(&mut self.run);
        run.sort_by(|a, b| newest_first(a, b));
        if self.latest_only {
            run.truncate(1);
        }
        self.ready.extend(run);
    }
}

fn newest_first(a: &Package, b: &Package) -> Ordering {
    version::compare(&b.version, &a.version).then_with(|| a.arch.cmp(&b.arch))
}

impl<'a> Iterator for Search<'a> {
    type Item = &'a Package;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(pkg) = self.ready.pop_front() {
                return Some(pkg);
            }

            match self.packages.next() {
                Some(pkg) => {
                    if !self.is_candidate(pkg) {
                        continue;
                    }
                    if self.run.last().is_some_and(|last| last.name != pkg.name) {
                        self.finalize_run();
                    }
                    self.run.push(pkg);
                }
                None if self.run.is_empty() => return None,
                None => self.finalize_run(),
            }
        }
    }
}
