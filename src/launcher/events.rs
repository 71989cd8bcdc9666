//! Sources of launch, drop and quit events

use super::job::JobRequest;
use async_trait::async_trait;
use std::collections::VecDeque;
use std::path::{Path, PathBuf};
use tokio::io::{AsyncBufReadExt, BufReader, Lines, Stdin};

/// Delivers events to a running app. `None` means the user closed the app.
#[async_trait]
pub trait EventSource: Send {
    async fn next_event(&mut self) -> Option<JobRequest>;

    /// Ask the user for files to open. Empty means the prompt was cancelled.
    async fn prompt_for_files(&mut self) -> Vec<PathBuf>;
}

/// Headless events from stdin, one per line. An existing path is a file drop,
/// anything else is a text drop. EOF closes the app.
pub struct StdinEvents {
    lines: Lines<BufReader<Stdin>>,
}

impl StdinEvents {
    pub fn new() -> Self {
        Self {
            lines: BufReader::new(tokio::io::stdin()).lines(),
        }
    }
}

impl Default for StdinEvents {
    fn default() -> Self {
        Self::new()
    }
}

/// Interpret one line of headless input
pub fn parse_event_line(line: &str) -> Option<JobRequest> {
    if line.is_empty() {
        return None;
    }
    let path = Path::new(line);
    if path.is_absolute() && path.exists() {
        Some(JobRequest::DropFiles(vec![path.to_path_buf()]))
    } else {
        Some(JobRequest::DropText(line.to_string()))
    }
}

#[async_trait]
impl EventSource for StdinEvents {
    async fn next_event(&mut self) -> Option<JobRequest> {
        loop {
            match self.lines.next_line().await {
                Ok(Some(line)) => {
                    if let Some(event) = parse_event_line(&line) {
                        return Some(event);
                    }
                }
                Ok(None) | Err(_) => return None,
            }
        }
    }

    async fn prompt_for_files(&mut self) -> Vec<PathBuf> {
        match self.lines.next_line().await {
            Ok(Some(line)) if !line.trim().is_empty() => vec![PathBuf::from(line.trim())],
            _ => Vec::new(),
        }
    }
}

/// A fixed sequence of events, for embedding and tests
#[derive(Debug, Default)]
pub struct ScriptedEvents {
    events: VecDeque<JobRequest>,
    prompt_answer: Vec<PathBuf>,
}

impl ScriptedEvents {
    pub fn new(events: impl IntoIterator<Item = JobRequest>) -> Self {
        Self {
            events: events.into_iter().collect(),
            prompt_answer: Vec::new(),
        }
    }

    pub fn with_prompt_answer(mut self, files: Vec<PathBuf>) -> Self {
        self.prompt_answer = files;
        self
    }
}

#[async_trait]
impl EventSource for ScriptedEvents {
    async fn next_event(&mut self) -> Option<JobRequest> {
        self.events.pop_front()
    }

    async fn prompt_for_files(&mut self) -> Vec<PathBuf> {
        std::mem::take(&mut self.prompt_answer)
    }
}
