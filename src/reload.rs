//! Post-upload Pi-hole reload.
//!
//! pihole-FTL only picks up list changes after `pihole restartdns reload`.
//! When Pi-hole runs in a container the same command is run through
//! `docker exec`.

use std::process::{Command, Stdio};

use tracing::info;

use crate::error::{Error, Result};

const PIHOLE_RELOAD: [&str; 3] = ["pihole", "restartdns", "reload"];

/// The command used to reload Pi-hole's lists.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReloadCommand {
    argv: Vec<String>,
}

impl ReloadCommand {
    /// `pihole restartdns reload` on this host.
    #[must_use]
    pub fn host() -> Self {
        Self {
            argv: PIHOLE_RELOAD.iter().map(|s| (*s).to_string()).collect(),
        }
    }

    /// `docker exec <container> pihole restartdns reload`.
    #[must_use]
    pub fn docker(container: &str) -> Self {
        let mut argv = vec!["docker".to_string(), "exec".to_string(), container.to_string()];
        argv.extend(PIHOLE_RELOAD.iter().map(|s| (*s).to_string()));
        Self { argv }
    }

    #[must_use]
    pub fn argv(&self) -> &[String] {
        &self.argv
    }

    /// Run the command, discarding its stdout.
    ///
    /// # Errors
    ///
    /// Returns `ReloadFailed` if the command cannot be spawned or exits
    /// unsuccessfully.
    pub fn run(&self) -> Result<()> {
        let (program, args) = self
            .argv
            .split_first()
            .ok_or_else(|| Error::InvalidArgument("empty reload command".to_string()))?;

        info!(command = %self, "reloading Pi-hole");

        let status = Command::new(program)
            .args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .status()
            .map_err(|e| Error::ReloadFailed {
                command: self.to_string(),
                reason: e.to_string(),
            })?;

        if !status.success() {
            return Err(Error::ReloadFailed {
                command: self.to_string(),
                reason: format!("exited with {status}"),
            });
        }

        Ok(())
    }
}

impl std::fmt::Display for ReloadCommand {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.argv.join(" "))
    }
}
