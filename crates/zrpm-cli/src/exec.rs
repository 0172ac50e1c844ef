use std::process::Command;

use tracing::debug;

use crate::{
    error::{ErrorContext, ZrpmError, ZrpmResult},
    state::AppState,
};

/// An external urpmi tool invocation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Invocation {
    pub program: String,
    pub args: Vec<String>,
}

impl Invocation {
    pub fn new(program: &str, args: &[&str], extra: &[String]) -> Self {
        Self {
            program: program.to_string(),
            args: args
                .iter()
                .map(|a| a.to_string())
                .chain(extra.iter().cloned())
                .collect(),
        }
    }

    /// Runs the invocation through `escalation` unless already root.
    pub fn escalated(self, escalation: &str, is_root: bool) -> Self {
        if is_root {
            return self;
        }

        let mut args = Vec::with_capacity(self.args.len() + 1);
        args.push(self.program);
        args.extend(self.args);
        Self {
            program: escalation.to_string(),
            args,
        }
    }

    pub fn command_line(&self) -> String {
        std::iter::once(self.program.as_str())
            .chain(self.args.iter().map(String::as_str))
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// Runs the tool attached to the terminal and waits for it to finish.
    pub fn run(&self) -> ZrpmResult<()> {
        let command_line = self.command_line();
        debug!(command = command_line, "executing");

        let status = Command::new(&self.program)
            .args(&self.args)
            .status()
            .with_context(|| format!("executing {command_line}"))?;

        if !status.success() {
            return Err(ZrpmError::CommandFailed {
                command: command_line,
                status,
            });
        }
        Ok(())
    }
}

fn privileged(state: &AppState, program: &str, args: &[&str], extra: &[String]) -> Invocation {
    Invocation::new(program, args, extra).escalated(
        state.config().escalation_command(),
        nix::unistd::geteuid().is_root(),
    )
}

pub fn install(state: &AppState, packages: &[String]) -> ZrpmResult<()> {
    privileged(state, "urpmi", &[], packages).run()
}

pub fn remove(state: &AppState, packages: &[String]) -> ZrpmResult<()> {
    privileged(state, "urpme", &[], packages).run()
}

pub fn update(state: &AppState) -> ZrpmResult<()> {
    privileged(state, "urpmi.update", &["-a"], &[]).run()
}

pub fn upgrade(state: &AppState) -> ZrpmResult<()> {
    privileged(state, "urpmi", &["--auto-select"], &[]).run()
}

pub fn download(packages: &[String]) -> ZrpmResult<()> {
    Invocation::new("urpm-downloader", &["--binary"], packages).run()
}

pub fn source(packages: &[String]) -> ZrpmResult<()> {
    Invocation::new("urpm-downloader", &["--source"], packages).run()
}

pub fn files(packages: &[String]) -> ZrpmResult<()> {
    Invocation::new("urpmf", &["-f"], packages).run()
}
