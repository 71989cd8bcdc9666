//! scriptexec Launcher Binary
//!
//! Copied into every bundle as `Contents/MacOS/<Name>`. Finds its bundle from its
//! own path, then runs the bundled script through the launcher runtime. Exits with
//! the script's exit code, or 1 when the launcher itself fails.

use anyhow::{anyhow, Context};
use platypus::bundle::BundleLayout;
use platypus::launcher::{quit_on_signals, Launcher, StdinEvents, SudoAuthenticator};
use platypus::logging::{init_logging, LoggingConfig};
use std::path::PathBuf;
use std::process;
use tracing::{error, info};

fn main() {
    let code = match run() {
        Ok(code) => code,
        Err(e) => {
            eprintln!("scriptexec: {:#}", e);
            1
        }
    };
    process::exit(code);
}

fn run() -> anyhow::Result<i32> {
    init_logging(&launcher_logging()).context("Failed to initialize logging")?;

    let layout = locate_bundle()?;
    info!(bundle = %layout.root().display(), "Launcher starting");

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .context("Failed to start async runtime")?;

    let result = runtime.block_on(serve(layout));
    // a pending stdin read must not hold up exit
    runtime.shutdown_background();
    result
}

async fn serve(layout: BundleLayout) -> anyhow::Result<i32> {
    let quit = quit_on_signals().context("Failed to install signal handlers")?;
    let launcher = Launcher::new(layout, Box::new(SudoAuthenticator::new()), quit);
    let launch_args: Vec<String> = std::env::args().skip(1).collect();

    match launcher
        .run(launch_args, Box::new(StdinEvents::new()), Box::new(std::io::stdout()))
        .await
    {
        Ok(report) => {
            info!(
                exit_code = report.exit_code,
                jobs = report.jobs_run,
                "Launcher finished"
            );
            Ok(report.exit_code)
        }
        // already presented through the frontend
        Err(e) => {
            error!(error = %e, "Launcher failed");
            Ok(1)
        }
    }
}

/// Diagnostics stay out of the script's output unless asked for
fn launcher_logging() -> LoggingConfig {
    LoggingConfig {
        level: "warn".to_string(),
        color: false,
        ..LoggingConfig::default()
    }
}

/// The enclosing bundle. The invoked path wins over the resolved executable so a
/// symlinked development launcher still finds the bundle it was started from.
fn locate_bundle() -> anyhow::Result<BundleLayout> {
    let mut candidates = Vec::new();
    if let Some(arg0) = std::env::args_os().next().map(PathBuf::from) {
        if arg0.components().count() > 1 {
            let cwd = std::env::current_dir().context("Failed to read working directory")?;
            candidates.push(cwd.join(arg0));
        }
    }
    let exe = std::env::current_exe().context("Failed to locate launcher executable")?;
    candidates.push(exe.clone());

    candidates
        .iter()
        .find_map(|path| BundleLayout::from_executable(path))
        .ok_or_else(|| {
            anyhow!(
                "{} is not inside an application bundle (expected <App>.app/Contents/MacOS/)",
                exe.display()
            )
        })
}
