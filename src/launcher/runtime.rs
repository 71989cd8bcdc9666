//! The launcher event loop

use super::auth::{Authenticator, Grant};
use super::events::EventSource;
use super::frontend::{frontend_for, Frontend, Sink, TextWindow};
use super::interpreter::{resolve_interpreter, Invocation};
use super::job::{launch_arguments, DropFilter, JobRequest};
use super::process::run_script;
use super::settings::AppSettings;
use super::state::{transition, LaunchEvent, LaunchState};
use crate::bundle::BundleLayout;
use crate::error::LauncherError;
use tokio::signal::unix::{signal, SignalKind};
use tokio::sync::mpsc::error::TrySendError;
use tokio::sync::{mpsc, watch};
use tracing::{debug, error, info, warn};

/// Most jobs that may wait behind a running script. Drops arriving while the queue
/// is full are turned away.
pub const MAX_QUEUED_JOBS: usize = 256;

/// Summary of a finished launcher session
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LaunchReport {
    /// Exit code for the launcher process
    pub exit_code: i32,
    pub jobs_run: usize,
    pub final_state: LaunchState,
}

/// A quit flag raised by SIGINT, SIGTERM or SIGHUP
pub fn quit_on_signals() -> Result<watch::Receiver<bool>, LauncherError> {
    let (tx, rx) = watch::channel(false);
    let mut interrupt = signal(SignalKind::interrupt())?;
    let mut terminate = signal(SignalKind::terminate())?;
    let mut hangup = signal(SignalKind::hangup())?;
    tokio::spawn(async move {
        tokio::select! {
            _ = interrupt.recv() => {}
            _ = terminate.recv() => {}
            _ = hangup.recv() => {}
        }
        info!("Quit requested");
        let _ = tx.send(true);
    });
    Ok(rx)
}

async fn quit_requested(quit: &mut watch::Receiver<bool>) {
    loop {
        if *quit.borrow_and_update() {
            return;
        }
        if quit.changed().await.is_err() && !*quit.borrow() {
            std::future::pending::<()>().await;
        }
    }
}

/// Forward events into the job queue until the source closes or the queue is gone.
/// Returns how many events were dropped because the queue was full.
async fn pump_events(mut events: Box<dyn EventSource>, queue: mpsc::Sender<JobRequest>) -> usize {
    let mut rejected = 0;
    while let Some(event) = events.next_event().await {
        match queue.try_send(event) {
            Ok(()) => {}
            Err(TrySendError::Full(job)) => {
                rejected += 1;
                warn!(?job, capacity = MAX_QUEUED_JOBS, "Job queue full, dropping event");
            }
            Err(TrySendError::Closed(_)) => break,
        }
    }
    rejected
}

pub struct Launcher {
    layout: BundleLayout,
    authenticator: Box<dyn Authenticator>,
    quit: watch::Receiver<bool>,
    state: LaunchState,
}

impl Launcher {
    pub fn new(
        layout: BundleLayout,
        authenticator: Box<dyn Authenticator>,
        quit: watch::Receiver<bool>,
    ) -> Self {
        Self {
            layout,
            authenticator,
            quit,
            state: LaunchState::Init,
        }
    }

    pub fn state(&self) -> LaunchState {
        self.state
    }

    fn advance(&mut self, event: LaunchEvent) -> Result<(), LauncherError> {
        let next = transition(self.state, event)?;
        debug!(from = %self.state, %event, to = %next, "Launcher transition");
        self.state = next;
        Ok(())
    }

    fn fail(&mut self, frontend: &mut dyn Frontend, err: &LauncherError) {
        error!(error = %err, "Launcher failed");
        if self.state != LaunchState::Terminated {
            if let Err(e) = self.advance(LaunchEvent::Failed) {
                warn!(error = %e, "Unexpected launcher state");
            }
        }
        if let Err(e) = frontend.present_error(err) {
            warn!(error = %e, "Unable to present error");
        }
    }

    /// Run the app: load settings, authenticate, then serve jobs until done.
    ///
    /// `launch_args` are the process arguments (the first job). Later jobs come from
    /// `events` while RemainRunning is set.
    pub async fn run(
        mut self,
        launch_args: Vec<String>,
        events: Box<dyn EventSource>,
        sink: Sink,
    ) -> Result<LaunchReport, LauncherError> {
        let settings = match AppSettings::load(&self.layout.app_settings()) {
            Ok(settings) => settings,
            Err(err) => {
                self.fail(&mut TextWindow::new(sink), &err);
                return Err(err);
            }
        };
        self.advance(LaunchEvent::SettingsLoaded)?;
        info!(
            app = %settings.name,
            interface = %settings.interface_type,
            remain_running = settings.remain_running,
            "Loaded app settings"
        );

        let mut frontend = frontend_for(&settings, sink);
        match self
            .serve(&settings, frontend.as_mut(), launch_args, events)
            .await
        {
            Ok(report) => Ok(report),
            Err(err) => {
                self.fail(frontend.as_mut(), &err);
                Err(err)
            }
        }
    }

    /// Authenticate when the app asks for privileges. `None` when quit was requested
    /// while the prompt was open.
    async fn authorize(&mut self, settings: &AppSettings) -> Result<Option<Grant>, LauncherError> {
        if !settings.authentication {
            return Ok(Some(Grant::Unprivileged));
        }
        self.advance(LaunchEvent::AuthenticationRequired)?;
        let outcome = tokio::select! {
            biased;
            _ = quit_requested(&mut self.quit) => None,
            outcome = self.authenticator.authenticate(&settings.name) => Some(outcome),
        };
        match outcome {
            Some(Ok(grant)) => {
                self.advance(LaunchEvent::AuthenticationGranted)?;
                Ok(Some(grant))
            }
            Some(Err(err)) => {
                self.advance(LaunchEvent::AuthenticationDenied)?;
                Err(err)
            }
            None => {
                info!("Quit during authentication");
                self.advance(LaunchEvent::Quit)?;
                Ok(None)
            }
        }
    }

    async fn serve(
        &mut self,
        settings: &AppSettings,
        frontend: &mut dyn Frontend,
        launch_args: Vec<String>,
        mut events: Box<dyn EventSource>,
    ) -> Result<LaunchReport, LauncherError> {
        let Some(grant) = self.authorize(settings).await? else {
            return Ok(self.report(0, 0));
        };

        let interpreter = resolve_interpreter(&settings.interpreter_path)?;
        let script = self.layout.script();
        if !script.is_file() {
            return Err(LauncherError::Spawn(format!(
                "bundled script missing at {}",
                script.display()
            )));
        }
        let invocation = Invocation::new(settings, interpreter, &self.layout);
        if !settings.authentication {
            self.advance(LaunchEvent::InterpreterReady)?;
        }

        let launch_args = launch_arguments(launch_args);
        let first = if launch_args.is_empty() && settings.prompt_for_file_on_launch {
            let prompted = tokio::select! {
                biased;
                _ = quit_requested(&mut self.quit) => None,
                files = events.prompt_for_files() => Some(files),
            };
            let Some(files) = prompted else {
                info!("Quit during file prompt");
                self.advance(LaunchEvent::Quit)?;
                return Ok(self.report(0, 0));
            };
            if files.is_empty() {
                info!("File prompt cancelled");
                self.advance(LaunchEvent::Quit)?;
                return Ok(self.report(0, 0));
            }
            JobRequest::Launch(
                files
                    .iter()
                    .map(|p| p.to_string_lossy().into_owned())
                    .collect(),
            )
        } else {
            JobRequest::Launch(launch_args)
        };

        // the queue closes once every sender is gone
        let (tx, mut rx) = mpsc::channel::<JobRequest>(MAX_QUEUED_JOBS);
        let _ = tx.try_send(first);
        if settings.remain_running {
            tokio::spawn(pump_events(events, tx.clone()));
        }
        drop(tx);

        let filter = DropFilter::from_settings(settings);
        let cwd = self.layout.resources();
        let mut jobs_run = 0;

        loop {
            let next = tokio::select! {
                biased;
                _ = quit_requested(&mut self.quit) => None,
                job = rx.recv() => job,
            };
            let Some(job) = next else {
                debug!("No more events");
                self.advance(LaunchEvent::Quit)?;
                return Ok(self.report(0, jobs_run));
            };
            let Some(forwarded) = job.forwarded_args(&filter) else {
                warn!(?job, "Ignoring unacceptable drop");
                continue;
            };

            let argv = invocation.argv(grant, &forwarded);
            self.advance(LaunchEvent::JobStarted)?;
            frontend.job_started(&argv)?;
            info!(job = jobs_run + 1, forwarded = forwarded.len(), "Running script");

            let outcome = run_script(&argv, &cwd, frontend, &mut self.quit).await?;
            frontend.job_finished(outcome)?;
            jobs_run += 1;
            info!(exit_code = outcome.exit_code(), "Script exited");

            if *self.quit.borrow() {
                self.advance(LaunchEvent::Quit)?;
                return Ok(self.report(outcome.exit_code(), jobs_run));
            }
            self.advance(LaunchEvent::JobFinished {
                remain_running: settings.remain_running,
            })?;
            if !settings.remain_running {
                return Ok(self.report(outcome.exit_code(), jobs_run));
            }
        }
    }

    fn report(&self, exit_code: i32, jobs_run: usize) -> LaunchReport {
        LaunchReport {
            exit_code,
            jobs_run,
            final_state: self.state,
        }
    }
}
