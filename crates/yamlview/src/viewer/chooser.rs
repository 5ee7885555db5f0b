//! Seams between the viewer and its front-end.
//!
//! The viewer never talks to a dialog or a message box directly. It asks a
//! [`FileChooser`] for paths and reports through a [`MessageSink`], so the
//! same logic drives the terminal shell, a GUI, or a test.

use std::collections::VecDeque;
use std::path::{Path, PathBuf};

/// Asks the user for a file.
pub trait FileChooser {
    /// Asks for an existing file to open, starting in `directory`.
    ///
    /// Returns `None` if the user cancels.
    fn open_file_name(&mut self, title: &str, directory: &Path) -> Option<PathBuf>;

    /// Asks for a file to save to, starting in `directory`.
    ///
    /// Returns `None` if the user cancels.
    fn save_file_name(&mut self, title: &str, directory: &Path) -> Option<PathBuf>;
}

/// Shows messages to the user.
pub trait MessageSink {
    /// Reports a failed operation.
    fn show_error(&mut self, title: &str, message: &str);

    /// Reports something worth knowing that is not a failure.
    fn show_info(&mut self, title: &str, message: &str);
}

/// A chooser that answers from a queue of prepared responses.
///
/// Each request pops the next response; `None` entries, and an empty
/// queue, act as a cancelled dialog. Requests are recorded.
#[derive(Debug, Default)]
pub struct ScriptedChooser {
    responses: VecDeque<Option<PathBuf>>,
    requests: Vec<(String, PathBuf)>,
}

impl ScriptedChooser {
    /// Creates a chooser that gives `responses` in order.
    pub fn new<I>(responses: I) -> Self
    where
        I: IntoIterator<Item = Option<PathBuf>>,
    {
        Self {
            responses: responses.into_iter().collect(),
            requests: Vec::new(),
        }
    }

    /// Queues another response.
    pub fn push(&mut self, response: Option<PathBuf>) {
        self.responses.push_back(response);
    }

    /// Title and starting directory of every request so far.
    pub fn requests(&self) -> &[(String, PathBuf)] {
        &self.requests
    }

    fn next(&mut self, title: &str, directory: &Path) -> Option<PathBuf> {
        self.requests
            .push((title.to_string(), directory.to_path_buf()));
        self.responses.pop_front().flatten()
    }
}

impl FileChooser for ScriptedChooser {
    fn open_file_name(&mut self, title: &str, directory: &Path) -> Option<PathBuf> {
        self.next(title, directory)
    }

    fn save_file_name(&mut self, title: &str, directory: &Path) -> Option<PathBuf> {
        self.next(title, directory)
    }
}

/// Severity of a recorded message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageLevel {
    /// From [`MessageSink::show_error`].
    Error,
    /// From [`MessageSink::show_info`].
    Info,
}

/// A message recorded by [`MessageLog`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    /// Error or info.
    pub level: MessageLevel,
    /// Dialog title.
    pub title: String,
    /// Dialog text.
    pub text: String,
}

/// A sink that keeps every message.
#[derive(Debug, Default)]
pub struct MessageLog {
    messages: Vec<Message>,
}

impl MessageLog {
    /// Creates an empty log.
    pub fn new() -> Self {
        Self::default()
    }

    /// All messages in arrival order.
    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    /// Only the errors.
    pub fn errors(&self) -> impl Iterator<Item = &Message> {
        self.messages
            .iter()
            .filter(|m| m.level == MessageLevel::Error)
    }

    /// Forgets everything recorded so far.
    pub fn clear(&mut self) {
        self.messages.clear();
    }

    fn record(&mut self, level: MessageLevel, title: &str, text: &str) {
        self.messages.push(Message {
            level,
            title: title.to_string(),
            text: text.to_string(),
        });
    }
}

impl MessageSink for MessageLog {
    fn show_error(&mut self, title: &str, message: &str) {
        self.record(MessageLevel::Error, title, message);
    }

    fn show_info(&mut self, title: &str, message: &str) {
        self.record(MessageLevel::Info, title, message);
    }
}
