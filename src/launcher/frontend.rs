//! Interface frontends
//!
//! Every frontend renders to a byte sink (the launcher's stdout when run headless).
//! They differ in what they keep and when they draw: the text window streams,
//! the status menu and web view redraw once a run completes.

use super::process::ExitOutcome;
use super::settings::AppSettings;
use crate::error::LauncherError;
use crate::profile::InterfaceType;
use std::io::Write;
use tracing::{debug, info};

pub type Sink = Box<dyn Write + Send>;

/// Which child stream a line came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputStream {
    Stdout,
    Stderr,
}

pub trait Frontend: Send {
    fn interface(&self) -> InterfaceType;

    fn job_started(&mut self, argv: &[String]) -> std::io::Result<()>;

    fn output_line(&mut self, stream: OutputStream, line: &str) -> std::io::Result<()>;

    fn job_finished(&mut self, outcome: ExitOutcome) -> std::io::Result<()>;

    /// Show a fatal launcher error
    fn present_error(&mut self, err: &LauncherError) -> std::io::Result<()>;
}

/// Build the frontend for the configured interface type
pub fn frontend_for(settings: &AppSettings, sink: Sink) -> Box<dyn Frontend> {
    match settings.interface_type {
        InterfaceType::TextWindow => Box::new(TextWindow::new(sink)),
        InterfaceType::ProgressBar => Box::new(ProgressBar::new(sink)),
        InterfaceType::StatusMenu => Box::new(StatusMenu::new(sink, settings.status_title())),
        InterfaceType::WebView => Box::new(WebView::new(sink)),
        kind @ (InterfaceType::Droppable | InterfaceType::None) => {
            Box::new(Passthrough::new(kind, sink))
        }
    }
}

fn write_error(sink: &mut Sink, err: &LauncherError) -> std::io::Result<()> {
    writeln!(sink, "Error: {}", err)?;
    sink.flush()
}

/// Streams output as it arrives and keeps the scrollback
pub struct TextWindow {
    sink: Sink,
    scrollback: Vec<String>,
}

impl TextWindow {
    pub fn new(sink: Sink) -> Self {
        Self {
            sink,
            scrollback: Vec::new(),
        }
    }

    pub fn scrollback(&self) -> &[String] {
        &self.scrollback
    }
}

impl Frontend for TextWindow {
    fn interface(&self) -> InterfaceType {
        InterfaceType::TextWindow
    }

    fn job_started(&mut self, _argv: &[String]) -> std::io::Result<()> {
        Ok(())
    }

    fn output_line(&mut self, _stream: OutputStream, line: &str) -> std::io::Result<()> {
        self.scrollback.push(line.to_string());
        writeln!(self.sink, "{}", line)?;
        self.sink.flush()
    }

    fn job_finished(&mut self, outcome: ExitOutcome) -> std::io::Result<()> {
        debug!(?outcome, lines = self.scrollback.len(), "Text window run finished");
        Ok(())
    }

    fn present_error(&mut self, err: &LauncherError) -> std::io::Result<()> {
        write_error(&mut self.sink, err)
    }
}

const PROGRESS_PREFIX: &str = "PROGRESS:";
const DETAILS_SHOW: &str = "DETAILS:SHOW";
const DETAILS_HIDE: &str = "DETAILS:HIDE";

/// Indeterminate progress until the script reports `PROGRESS:<n>`; the last output
/// line is the status message
pub struct ProgressBar {
    sink: Sink,
    progress: Option<u8>,
    message: String,
    details: Vec<String>,
    details_visible: bool,
}

impl ProgressBar {
    pub fn new(sink: Sink) -> Self {
        Self {
            sink,
            progress: None,
            message: String::new(),
            details: Vec::new(),
            details_visible: true,
        }
    }

    pub fn progress(&self) -> Option<u8> {
        self.progress
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn details(&self) -> &[String] {
        &self.details
    }
}

impl Frontend for ProgressBar {
    fn interface(&self) -> InterfaceType {
        InterfaceType::ProgressBar
    }

    fn job_started(&mut self, _argv: &[String]) -> std::io::Result<()> {
        self.progress = None;
        self.message.clear();
        Ok(())
    }

    fn output_line(&mut self, _stream: OutputStream, line: &str) -> std::io::Result<()> {
        if let Some(value) = line.strip_prefix(PROGRESS_PREFIX) {
            if let Ok(percent) = value.trim().parse::<u8>() {
                self.progress = Some(percent.min(100));
                return Ok(());
            }
        }
        match line {
            DETAILS_SHOW => self.details_visible = true,
            DETAILS_HIDE => self.details_visible = false,
            _ => {
                self.message = line.to_string();
                self.details.push(line.to_string());
                if self.details_visible {
                    writeln!(self.sink, "{}", line)?;
                    self.sink.flush()?;
                }
            }
        }
        Ok(())
    }

    fn job_finished(&mut self, outcome: ExitOutcome) -> std::io::Result<()> {
        self.progress = Some(100);
        debug!(?outcome, message = %self.message, "Progress bar run finished");
        Ok(())
    }

    fn present_error(&mut self, err: &LauncherError) -> std::io::Result<()> {
        write_error(&mut self.sink, err)
    }
}

/// Menu-bar item; each run's output lines become the menu
pub struct StatusMenu {
    sink: Sink,
    title: String,
    items: Vec<String>,
}

impl StatusMenu {
    pub fn new(sink: Sink, title: &str) -> Self {
        Self {
            sink,
            title: title.to_string(),
            items: Vec::new(),
        }
    }

    pub fn items(&self) -> &[String] {
        &self.items
    }
}

impl Frontend for StatusMenu {
    fn interface(&self) -> InterfaceType {
        InterfaceType::StatusMenu
    }

    fn job_started(&mut self, _argv: &[String]) -> std::io::Result<()> {
        self.items.clear();
        Ok(())
    }

    fn output_line(&mut self, stream: OutputStream, line: &str) -> std::io::Result<()> {
        if stream == OutputStream::Stdout {
            self.items.push(line.to_string());
        }
        Ok(())
    }

    fn job_finished(&mut self, _outcome: ExitOutcome) -> std::io::Result<()> {
        info!(title = %self.title, items = self.items.len(), "Refreshing status menu");
        for item in &self.items {
            writeln!(self.sink, "{}", item)?;
        }
        self.sink.flush()
    }

    fn present_error(&mut self, err: &LauncherError) -> std::io::Result<()> {
        write_error(&mut self.sink, err)
    }
}

/// Accumulates output as an HTML document, rendered when the run ends
pub struct WebView {
    sink: Sink,
    document: String,
}

impl WebView {
    pub fn new(sink: Sink) -> Self {
        Self {
            sink,
            document: String::new(),
        }
    }
}

impl Frontend for WebView {
    fn interface(&self) -> InterfaceType {
        InterfaceType::WebView
    }

    fn job_started(&mut self, _argv: &[String]) -> std::io::Result<()> {
        self.document.clear();
        Ok(())
    }

    fn output_line(&mut self, stream: OutputStream, line: &str) -> std::io::Result<()> {
        if stream == OutputStream::Stdout {
            self.document.push_str(line);
            self.document.push('\n');
        }
        Ok(())
    }

    fn job_finished(&mut self, _outcome: ExitOutcome) -> std::io::Result<()> {
        self.sink.write_all(self.document.as_bytes())?;
        self.sink.flush()
    }

    fn present_error(&mut self, err: &LauncherError) -> std::io::Result<()> {
        write_error(&mut self.sink, err)
    }
}

/// Droppable and None: no window, output passes straight through
pub struct Passthrough {
    kind: InterfaceType,
    sink: Sink,
}

impl Passthrough {
    pub fn new(kind: InterfaceType, sink: Sink) -> Self {
        Self { kind, sink }
    }
}

impl Frontend for Passthrough {
    fn interface(&self) -> InterfaceType {
        self.kind
    }

    fn job_started(&mut self, _argv: &[String]) -> std::io::Result<()> {
        Ok(())
    }

    fn output_line(&mut self, _stream: OutputStream, line: &str) -> std::io::Result<()> {
        writeln!(self.sink, "{}", line)?;
        self.sink.flush()
    }

    fn job_finished(&mut self, _outcome: ExitOutcome) -> std::io::Result<()> {
        Ok(())
    }

    fn present_error(&mut self, err: &LauncherError) -> std::io::Result<()> {
        write_error(&mut self.sink, err)
    }
}
