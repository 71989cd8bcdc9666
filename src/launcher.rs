//! Launcher Runtime
//!
//! The program copied into every bundle as `Contents/MacOS/<Name>`. It reads the
//! bundle's AppSettings.plist, resolves the interpreter, optionally elevates, and
//! runs the bundled script once per launch or drop event, one at a time.

mod auth;
mod events;
mod frontend;
mod interpreter;
mod job;
mod process;
mod runtime;
mod settings;
mod state;

pub use auth::{Authenticator, Grant, SudoAuthenticator};
pub use events::{parse_event_line, EventSource, ScriptedEvents, StdinEvents};
pub use frontend::{
    frontend_for, Frontend, OutputStream, Passthrough, ProgressBar, Sink, StatusMenu, TextWindow,
    WebView,
};
pub use interpreter::{resolve_interpreter, Invocation};
pub use job::{launch_arguments, DropFilter, JobRequest};
pub use process::{run_script, ExitOutcome};
pub use runtime::{quit_on_signals, LaunchReport, Launcher};
pub use settings::AppSettings;
pub use state::{transition, LaunchEvent, LaunchState};
