//! Launcher lifecycle as an explicit transition table.
//!
//! ```text
//! Init -> ConfigLoaded -> [AuthenticationPending] -> InterpreterResolved -> Running -> Terminated
//!                                                          ^                  |
//!                                                          +-- RemainRunning -+
//! ```

use crate::error::LauncherError;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LaunchState {
    Init,
    ConfigLoaded,
    AuthenticationPending,
    InterpreterResolved,
    Running,
    Terminated,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LaunchEvent {
    SettingsLoaded,
    AuthenticationRequired,
    AuthenticationGranted,
    AuthenticationDenied,
    InterpreterReady,
    JobStarted,
    JobFinished { remain_running: bool },
    Quit,
    Failed,
}

impl fmt::Display for LaunchState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

impl fmt::Display for LaunchEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

/// Next state for `event` in `state`, or `InvalidTransition`
pub fn transition(state: LaunchState, event: LaunchEvent) -> Result<LaunchState, LauncherError> {
    use LaunchEvent as E;
    use LaunchState as S;

    let next = match (state, event) {
        (S::Init, E::SettingsLoaded) => S::ConfigLoaded,

        (S::ConfigLoaded, E::AuthenticationRequired) => S::AuthenticationPending,
        (S::ConfigLoaded, E::InterpreterReady) => S::InterpreterResolved,
        (S::AuthenticationPending, E::AuthenticationGranted) => S::InterpreterResolved,
        (S::AuthenticationPending, E::AuthenticationDenied) => S::Terminated,

        (S::InterpreterResolved, E::JobStarted) => S::Running,
        (S::Running, E::JobFinished { remain_running: true }) => S::InterpreterResolved,
        (S::Running, E::JobFinished { remain_running: false }) => S::Terminated,

        (S::Terminated, _) => {
            return Err(LauncherError::InvalidTransition {
                from: state.to_string(),
                event: event.to_string(),
            })
        }
        (_, E::Quit) | (_, E::Failed) => S::Terminated,

        _ => {
            return Err(LauncherError::InvalidTransition {
                from: state.to_string(),
                event: event.to_string(),
            })
        }
    };
    Ok(next)
}
