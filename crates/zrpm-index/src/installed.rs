//! Installed package probe.

use std::{cmp::Ordering, collections::HashMap, process::Command};

use tracing::debug;

use crate::{
    error::{IndexError, Result},
    version,
};

const QUERY_FORMAT: &str = "%{NAME}\t%{VERSION}-%{RELEASE}\n";

/// Source of the installed package set, as a name to version mapping.
pub trait InstalledProbe: Send + Sync {
    fn installed(&self) -> Result<HashMap<String, String>>;
}

/// Queries the rpm database.
#[derive(Clone, Debug)]
pub struct RpmProbe {
    command: String,
}

impl RpmProbe {
    pub fn new(command: impl Into<String>) -> Self {
        Self {
            command: command.into(),
        }
    }
}

impl InstalledProbe for RpmProbe {
    fn installed(&self) -> Result<HashMap<String, String>> {
        debug!(command = self.command, "querying installed packages");

        let output = Command::new(&self.command)
            .args(["-q", "-a", "--qf", QUERY_FORMAT])
            .output()
            .map_err(|err| IndexError::Probe(format!("can't run {}: {err}", self.command)))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(IndexError::Probe(format!(
                "{} exited with {}: {}",
                self.command,
                output.status,
                stderr.trim()
            )));
        }

        let installed = parse_installed(&String::from_utf8_lossy(&output.stdout))?;
        debug!(count = installed.len(), "installed packages found");
        Ok(installed)
    }
}

/// A fixed installed set.
#[derive(Clone, Debug, Default)]
pub struct StaticProbe(pub HashMap<String, String>);

impl InstalledProbe for StaticProbe {
    fn installed(&self) -> Result<HashMap<String, String>> {
        Ok(self.0.clone())
    }
}

/// Reports nothing installed.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoProbe;

impl InstalledProbe for NoProbe {
    fn installed(&self) -> Result<HashMap<String, String>> {
        Ok(HashMap::new())
    }
}

/// Parses `name\tversion` lines. When a name occurs more than once, the newest
/// version wins.
pub fn parse_installed(output: &str) -> Result<HashMap<String, String>> {
    let mut installed: HashMap<String, String> = HashMap::new();

    for line in output.lines().filter(|l| !l.trim().is_empty()) {
        let (name, version) = line
            .split_once('\t')
            .ok_or_else(|| IndexError::Probe(format!("malformed rpm output line '{line}'")))?;

        match installed.get(name) {
            Some(current) if version::compare(current, version) != Ordering::Less => {}
            _ => {
                installed.insert(name.to_string(), version.to_string());
            }
        }
    }

    Ok(installed)
}
