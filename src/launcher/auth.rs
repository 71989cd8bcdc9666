//! Privilege elevation

use crate::error::LauncherError;
use async_trait::async_trait;
use std::path::PathBuf;
use std::process::Stdio;
use tracing::{debug, info};

/// How granted privileges are applied to script invocations
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Grant {
    /// No elevation requested
    Unprivileged,
    /// The launcher already runs as root
    AlreadyPrivileged,
    /// Cached sudo credentials; invocations run through `sudo -n`
    Sudo,
}

impl Grant {
    pub fn command_prefix(self) -> &'static [&'static str] {
        match self {
            Grant::Unprivileged | Grant::AlreadyPrivileged => &[],
            Grant::Sudo => &["sudo", "-n", "--"],
        }
    }
}

/// Requests elevated privileges for an app. Denial is `PermissionDenied`.
#[async_trait]
pub trait Authenticator: Send + Sync {
    async fn authenticate(&self, app_name: &str) -> Result<Grant, LauncherError>;
}

/// Elevation through `sudo -v`, which prompts on the controlling terminal
pub struct SudoAuthenticator {
    sudo: PathBuf,
}

impl SudoAuthenticator {
    pub fn new() -> Self {
        Self {
            sudo: PathBuf::from("sudo"),
        }
    }
}

impl Default for SudoAuthenticator {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Authenticator for SudoAuthenticator {
    async fn authenticate(&self, app_name: &str) -> Result<Grant, LauncherError> {
        // SAFETY: geteuid has no preconditions and cannot fail
        if unsafe { libc::geteuid() } == 0 {
            debug!("Already running as root");
            return Ok(Grant::AlreadyPrivileged);
        }

        info!(app = app_name, "Requesting administrator privileges");
        let status = tokio::process::Command::new(&self.sudo)
            .arg("-v")
            .arg("-p")
            .arg(format!("{} requires administrator privileges. Password: ", app_name))
            .stdin(Stdio::inherit())
            .stdout(Stdio::null())
            .status()
            .await;

        match status {
            Ok(status) if status.success() => Ok(Grant::Sudo),
            Ok(status) => {
                debug!(%status, "Elevation refused");
                Err(LauncherError::PermissionDenied)
            }
            Err(e) => {
                debug!(error = %e, "Unable to run sudo");
                Err(LauncherError::PermissionDenied)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_only_sudo_grants_prefix_commands() {
        assert!(Grant::Unprivileged.command_prefix().is_empty());
        assert!(Grant::AlreadyPrivileged.command_prefix().is_empty());
        assert_eq!(Grant::Sudo.command_prefix(), &["sudo", "-n", "--"]);
    }

    #[tokio::test]
    async fn test_missing_sudo_is_denial() {
        let auth = SudoAuthenticator {
            sudo: PathBuf::from("/nonexistent/sudo"),
        };
        // root short-circuits before sudo is consulted
        if unsafe { libc::geteuid() } == 0 {
            assert_eq!(auth.authenticate("App").await.unwrap(), Grant::AlreadyPrivileged);
        } else {
            assert!(matches!(
                auth.authenticate("App").await,
                Err(LauncherError::PermissionDenied)
            ));
        }
    }
}
