//! Line-oriented terminal front-end.
//!
//! The terminal plays the part of the tree widget, the menu and the dialogs:
//!
//! ```text
//! > ls
//! a: 1
//! b
//! └── …
//! > expand b
//! b
//! └── c: 2
//! > set b/c 3
//! b/c: 3
//! > save out.yaml
//! Saved: wrote out.yaml
//! ```
//!
//! Rows are addressed by their labels joined with `/`. An empty path is the
//! whole document. A backslash escapes the next character, so a label
//! containing `/` can still be named: `set urls/http:\/\/host 1`. In the
//! path of `set` and `rename`, `\ ` stands for a space.
//!
//! Input, output, the file chooser and the message sink share one
//! [`Console`], so prompts and replies appear in order on the same stream.

use std::cell::RefCell;
use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};
use std::rc::Rc;

use thiserror::Error;
use yamlview_core::logging::targets;

use super::{Action, FileChooser, MessageSink, Viewer};
use crate::model::{NodeId, TreeDebug};

const PROMPT: &str = "> ";

const HELP: &str = "\
commands:
  ls [PATH]            show the tree, or the rows under PATH
  expand PATH          build the rows under PATH
  expand-all [PATH]    build every row under PATH
  set PATH VALUE       change the value of a scalar row
  rename PATH LABEL    change the label of a row
  open [FILE]          open a document
  save [FILE]          save the tree as YAML
  reload               load the open document again
  help                 show this text
  quit                 leave
PATH is a list of labels separated by `/`, e.g. servers/0/name.
Use `\\/` for a `/` inside a label and `\\ ` for a space in the PATH of
set or rename, e.g. set urls/http:\\/\\/host 1.";

/// Input and output streams of an interactive session.
pub struct Console<R, W> {
    input: R,
    output: W,
}

/// A console shared by the terminal, its chooser and its message sink.
pub type SharedConsole<R, W> = Rc<RefCell<Console<R, W>>>;

impl<R: BufRead, W: Write> Console<R, W> {
    /// Creates a console over the given streams.
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    /// Creates a console ready to be shared.
    pub fn shared(input: R, output: W) -> SharedConsole<R, W> {
        Rc::new(RefCell::new(Self::new(input, output)))
    }

    /// Reads one line without its line ending. `None` at end of input.
    pub fn read_line(&mut self) -> io::Result<Option<String>> {
        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        let trimmed = line.trim_end_matches(['\n', '\r']).len();
        line.truncate(trimmed);
        Ok(Some(line))
    }

    /// Writes `text` without a newline, then reads a line.
    pub fn prompt(&mut self, text: &str) -> io::Result<Option<String>> {
        self.output.write_all(text.as_bytes())?;
        self.output.flush()?;
        self.read_line()
    }

    /// Writes `text` followed by a newline.
    pub fn write_line(&mut self, text: &str) -> io::Result<()> {
        writeln!(self.output, "{}", text)
    }

    /// The output stream.
    pub fn output(&self) -> &W {
        &self.output
    }
}

/// Asks for file names on the console.
///
/// Relative answers are resolved against the starting directory; an empty
/// answer cancels.
pub struct ConsoleChooser<R, W> {
    console: SharedConsole<R, W>,
}

impl<R: BufRead, W: Write> ConsoleChooser<R, W> {
    /// Creates a chooser on a shared console.
    pub fn new(console: SharedConsole<R, W>) -> Self {
        Self { console }
    }

    fn ask(&mut self, title: &str, directory: &Path) -> Option<PathBuf> {
        let question = format!("{} [{}]: ", title, directory.display());
        let answer = match self.console.borrow_mut().prompt(&question) {
            Ok(answer) => answer?,
            Err(err) => {
                tracing::warn!(target: targets::VIEWER, %err, "cannot read file name");
                return None;
            }
        };
        let answer = answer.trim();
        if answer.is_empty() {
            return None;
        }
        Some(directory.join(answer))
    }
}

impl<R: BufRead, W: Write> FileChooser for ConsoleChooser<R, W> {
    fn open_file_name(&mut self, title: &str, directory: &Path) -> Option<PathBuf> {
        self.ask(title, directory)
    }

    fn save_file_name(&mut self, title: &str, directory: &Path) -> Option<PathBuf> {
        self.ask(title, directory)
    }
}

/// Prints messages on the console.
pub struct ConsoleMessages<R, W> {
    console: SharedConsole<R, W>,
}

impl<R: BufRead, W: Write> ConsoleMessages<R, W> {
    /// Creates a sink on a shared console.
    pub fn new(console: SharedConsole<R, W>) -> Self {
        Self { console }
    }

    fn print(&mut self, line: &str) {
        if let Err(err) = self.console.borrow_mut().write_line(line) {
            tracing::warn!(target: targets::VIEWER, %err, "cannot print message");
        }
    }
}

impl<R: BufRead, W: Write> MessageSink for ConsoleMessages<R, W> {
    fn show_error(&mut self, title: &str, message: &str) {
        self.print(&format!("error: {}: {}", title, message));
    }

    fn show_info(&mut self, title: &str, message: &str) {
        self.print(&format!("{}: {}", title, message));
    }
}

/// A parsed terminal command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Print the tree under a path.
    List(Vec<String>),
    /// Populate one row.
    Expand(Vec<String>),
    /// Populate everything under a path.
    ExpandAll(Vec<String>),
    /// Change a scalar's text.
    Set {
        /// The row to change.
        path: Vec<String>,
        /// Its new text.
        value: String,
    },
    /// Change a row's label.
    Rename {
        /// The row to change.
        path: Vec<String>,
        /// Its new label.
        label: String,
    },
    /// Open a file, asking for one if none is given.
    Open(Option<PathBuf>),
    /// Save to a file, asking for one if none is given.
    Save(Option<PathBuf>),
    /// Reload the open file.
    Reload,
    /// Print the command list.
    Help,
    /// Leave.
    Quit,
}

/// A line that is not a valid command.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CommandError {
    /// The first word is not a command.
    #[error("unknown command `{0}`; type `help` for a list")]
    Unknown(String),
    /// A required argument is missing.
    #[error("`{command}` needs {argument}")]
    MissingArgument {
        /// The command as typed.
        command: &'static str,
        /// What was expected.
        argument: &'static str,
    },
}

impl Command {
    /// Parses one input line. Blank lines yield `Ok(None)`.
    ///
    /// Action shortcuts such as `F5` are accepted as commands.
    pub fn parse(line: &str) -> Result<Option<Command>, CommandError> {
        let line = line.trim();
        if line.is_empty() {
            return Ok(None);
        }

        if let Some(action) = Action::from_shortcut(line) {
            return Ok(Some(match action {
                Action::Open => Command::Open(None),
                Action::Save => Command::Save(None),
                Action::Reload => Command::Reload,
                Action::Quit => Command::Quit,
            }));
        }

        let (word, rest) = split_word(line);
        let command = match word.to_ascii_lowercase().as_str() {
            "ls" | "list" => Command::List(parse_path(rest)),
            "expand" => {
                if rest.is_empty() {
                    return Err(CommandError::MissingArgument {
                        command: "expand",
                        argument: "a path",
                    });
                }
                Command::Expand(parse_path(rest))
            }
            "expand-all" => Command::ExpandAll(parse_path(rest)),
            "set" => {
                let (path, value) = split_path(rest);
                if path.is_empty() {
                    return Err(CommandError::MissingArgument {
                        command: "set",
                        argument: "a path and a value",
                    });
                }
                Command::Set {
                    path: parse_path(path),
                    value: value.to_string(),
                }
            }
            "rename" => {
                let (path, label) = split_path(rest);
                if path.is_empty() || label.is_empty() {
                    return Err(CommandError::MissingArgument {
                        command: "rename",
                        argument: "a path and a new label",
                    });
                }
                Command::Rename {
                    path: parse_path(path),
                    label: label.to_string(),
                }
            }
            "open" => Command::Open(optional_path(rest)),
            "save" => Command::Save(optional_path(rest)),
            "reload" => Command::Reload,
            "help" | "?" => Command::Help,
            "quit" | "exit" | "q" => Command::Quit,
            other => return Err(CommandError::Unknown(other.to_string())),
        };
        Ok(Some(command))
    }
}

fn split_word(text: &str) -> (&str, &str) {
    match text.split_once(char::is_whitespace) {
        Some((word, rest)) => (word, rest.trim()),
        None => (text, ""),
    }
}

/// Splits off a path argument, honouring `\ ` inside it.
fn split_path(text: &str) -> (&str, &str) {
    let mut escaped = false;
    for (at, c) in text.char_indices() {
        match c {
            _ if escaped => escaped = false,
            '\\' => escaped = true,
            c if c.is_whitespace() => return (&text[..at], text[at..].trim()),
            _ => {}
        }
    }
    (text, "")
}

/// Splits a path into labels on `/`. A backslash makes the next character
/// part of the label, so `a\/b` is the single label `a/b`.
fn parse_path(text: &str) -> Vec<String> {
    let mut labels = Vec::new();
    let mut label = String::new();
    let mut chars = text.chars();
    while let Some(c) = chars.next() {
        match c {
            '\\' => label.push(chars.next().unwrap_or('\\')),
            '/' => {
                if !label.is_empty() {
                    labels.push(std::mem::take(&mut label));
                }
            }
            c => label.push(c),
        }
    }
    if !label.is_empty() {
        labels.push(label);
    }
    labels
}

fn optional_path(text: &str) -> Option<PathBuf> {
    (!text.is_empty()).then(|| PathBuf::from(text))
}

fn display_path(path: &[String]) -> String {
    if path.is_empty() {
        return "/".to_string();
    }
    path.iter()
        .map(|label| label.replace('\\', "\\\\").replace('/', "\\/"))
        .collect::<Vec<_>>()
        .join("/")
}

/// The interactive loop.
pub struct Terminal<R, W> {
    console: SharedConsole<R, W>,
    tree: TreeDebug,
}

impl<R: BufRead, W: Write> Terminal<R, W> {
    /// Creates a terminal on a shared console.
    pub fn new(console: SharedConsole<R, W>, tree: TreeDebug) -> Self {
        Self { console, tree }
    }

    /// Reads and runs commands until `quit` or end of input.
    pub fn run<C: FileChooser, M: MessageSink>(&mut self, viewer: &mut Viewer<C, M>) -> io::Result<()> {
        if viewer.document().is_open() {
            self.show(viewer, &[])?;
        } else {
            self.write_line("no document open; type `open FILE` or `help`")?;
        }

        loop {
            let line = self.console.borrow_mut().prompt(PROMPT)?;
            let Some(line) = line else {
                break;
            };
            match Command::parse(&line) {
                Ok(None) => {}
                Ok(Some(command)) => {
                    if !self.execute(viewer, command)? {
                        break;
                    }
                }
                Err(err) => self.write_line(&err.to_string())?,
            }
        }
        Ok(())
    }

    /// Runs one command. Returns `false` when the session should end.
    pub fn execute<C: FileChooser, M: MessageSink>(
        &mut self,
        viewer: &mut Viewer<C, M>,
        command: Command,
    ) -> io::Result<bool> {
        tracing::trace!(target: targets::VIEWER, ?command, "terminal command");
        match command {
            Command::List(path) => self.show(viewer, &path)?,
            Command::Expand(path) => {
                if let Some(node) = self.resolve(viewer, &path)? {
                    if viewer.expand_node(node) {
                        self.show(viewer, &path)?;
                    }
                }
            }
            Command::ExpandAll(path) => {
                if let Some(node) = self.resolve(viewer, &path)? {
                    if let Some(count) = viewer.expand_all(node) {
                        self.write_line(&format!("expanded {} node(s)", count))?;
                    }
                }
            }
            Command::Set { path, value } => {
                if let Some(node) = self.resolve(viewer, &path)? {
                    if viewer.document().model().set_value(node, value.as_str()) {
                        self.write_line(&format!("{}: {}", display_path(&path), value))?;
                    } else {
                        self.write_line(&format!("`{}` has no value to set", display_path(&path)))?;
                    }
                }
            }
            Command::Rename { path, label } => {
                if let Some(node) = self.resolve(viewer, &path)? {
                    if !viewer.document().model().set_label(node, label.as_str()) {
                        self.write_line(&format!("`{}` cannot be renamed", display_path(&path)))?;
                    }
                }
            }
            Command::Open(file) => {
                let opened = match file {
                    Some(file) => viewer.open_path(&file),
                    None => viewer.file_open(),
                };
                if opened {
                    self.show(viewer, &[])?;
                }
            }
            Command::Save(Some(file)) => {
                viewer.save_path(&file);
            }
            Command::Save(None) => {
                viewer.trigger(Action::Save);
            }
            Command::Reload => {
                if viewer.document().is_open() {
                    viewer.trigger(Action::Reload);
                    self.show(viewer, &[])?;
                } else {
                    self.write_line("no document open")?;
                }
            }
            Command::Help => {
                self.write_line(HELP)?;
                for action in Action::ALL {
                    self.write_line(&format!("  {:<20} {}", action.to_string(), action.tooltip()))?;
                }
            }
            Command::Quit => return Ok(viewer.trigger(Action::Quit)),
        }
        Ok(true)
    }

    fn resolve<C: FileChooser, M: MessageSink>(
        &mut self,
        viewer: &Viewer<C, M>,
        path: &[String],
    ) -> io::Result<Option<NodeId>> {
        let node = viewer.document().model().node_at_path(path);
        if node.is_none() {
            self.write_line(&format!("no such row: {}", display_path(path)))?;
        }
        Ok(node)
    }

    fn show<C: FileChooser, M: MessageSink>(
        &mut self,
        viewer: &Viewer<C, M>,
        path: &[String],
    ) -> io::Result<()> {
        let Some(node) = self.resolve(viewer, path)? else {
            return Ok(());
        };
        let model = viewer.document().model();

        let text = if node == model.root() {
            let rows = self.tree.format_all(model);
            match model.node(node).and_then(|n| n.value().map(str::to_string)) {
                // A scalar document has no rows, only a value.
                Some(value) if rows.is_empty() => format!("{}\n", value),
                _ if rows.is_empty() => "(empty)\n".to_string(),
                _ => rows,
            }
        } else {
            match model.index_of(node) {
                Some(index) => self.tree.format_subtree(model, &index),
                None => String::new(),
            }
        };
        self.write_text(&text)
    }

    fn write_line(&mut self, text: &str) -> io::Result<()> {
        self.console.borrow_mut().write_line(text)
    }

    fn write_text(&mut self, text: &str) -> io::Result<()> {
        let mut console = self.console.borrow_mut();
        console.output.write_all(text.as_bytes())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::{DocumentController, ExpansionPolicy};
    use crate::file::Preferences;
    use crate::model::TreeFormatOptions;
    use std::fs;
    use std::io::Cursor;

    type In = Cursor<Vec<u8>>;
    type TestConsole = SharedConsole<In, Vec<u8>>;
    type TestViewer = Viewer<ConsoleChooser<In, Vec<u8>>, ConsoleMessages<In, Vec<u8>>>;

    fn session(input: &str, dir: &Path) -> (TestViewer, TestConsole) {
        let console = Console::shared(Cursor::new(input.as_bytes().to_vec()), Vec::new());
        let mut preferences = Preferences::default();
        preferences.directory = dir.to_path_buf();
        let viewer = Viewer::new(
            DocumentController::new(ExpansionPolicy::RootOnly),
            preferences,
            ConsoleChooser::new(console.clone()),
            ConsoleMessages::new(console.clone()),
        );
        (viewer, console)
    }

    fn output(console: &TestConsole) -> String {
        String::from_utf8(console.borrow().output().clone()).unwrap()
    }

    fn run(viewer: &mut TestViewer, console: &TestConsole) {
        let options = TreeFormatOptions::ascii();
        Terminal::new(console.clone(), TreeDebug::with_options(options))
            .run(viewer)
            .unwrap();
    }

    #[test]
    fn test_parse_commands() {
        assert_eq!(Command::parse("   "), Ok(None));
        assert_eq!(Command::parse("ls"), Ok(Some(Command::List(vec![]))));
        assert_eq!(
            Command::parse("expand servers/0"),
            Ok(Some(Command::Expand(vec!["servers".into(), "0".into()])))
        );
        assert_eq!(
            Command::parse("set a/b hello world"),
            Ok(Some(Command::Set {
                path: vec!["a".into(), "b".into()],
                value: "hello world".into()
            }))
        );
        assert_eq!(Command::parse("F5"), Ok(Some(Command::Reload)));
        assert_eq!(Command::parse("open"), Ok(Some(Command::Open(None))));
        assert_eq!(
            Command::parse("save out.yaml"),
            Ok(Some(Command::Save(Some(PathBuf::from("out.yaml")))))
        );
    }

    #[test]
    fn test_parse_escaped_paths() {
        assert_eq!(
            Command::parse(r"ls urls/http:\/\/host"),
            Ok(Some(Command::List(vec!["urls".into(), "http://host".into()])))
        );
        assert_eq!(
            Command::parse(r"set my\ key/a\\b two words"),
            Ok(Some(Command::Set {
                path: vec!["my key".into(), r"a\b".into()],
                value: "two words".into()
            }))
        );
        assert_eq!(
            Command::parse(r"rename a\/b c/d"),
            Ok(Some(Command::Rename {
                path: vec!["a/b".into()],
                label: "c/d".into()
            }))
        );
        assert_eq!(
            display_path(&["urls".into(), "http://host".into(), r"a\b".into()]),
            r"urls/http:\/\/host/a\\b"
        );
    }

    #[test]
    fn test_parse_errors() {
        assert_eq!(
            Command::parse("frobnicate"),
            Err(CommandError::Unknown("frobnicate".into()))
        );
        assert!(matches!(
            Command::parse("expand"),
            Err(CommandError::MissingArgument { command: "expand", .. })
        ));
        assert!(Command::parse("rename a").is_err());
    }

    #[test]
    fn test_session_expand_edit_save() {
        let dir = tempfile::tempdir().unwrap();
        let source = dir.path().join("in.yaml");
        fs::write(&source, "a: 1\nb: {c: 2}\n").unwrap();
        let target = dir.path().join("out.yaml");

        let script = format!(
            "open {}\nexpand b\nset b/c 3\nrename a alpha\nsave {}\nquit\n",
            source.display(),
            target.display()
        );
        let (mut viewer, console) = session(&script, dir.path());
        run(&mut viewer, &console);

        let out = output(&console);
        assert!(out.contains("a: 1\nb\n`-- \u{2026}\n"));
        assert!(out.contains("b\n`-- c: 2\n"));
        assert!(out.contains("b/c: 3\n"));
        assert!(out.contains("Saved: wrote"));
        assert_eq!(fs::read_to_string(&target).unwrap(), "alpha: 1\nb:\n  c: 3\n");
    }

    #[test]
    fn test_open_through_chooser() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("doc.yaml"), "k: v\n").unwrap();

        let (mut viewer, console) = session("open\ndoc.yaml\nquit\n", dir.path());
        run(&mut viewer, &console);

        let out = output(&console);
        assert!(out.contains(&format!("Open file [{}]: ", dir.path().display())));
        assert!(out.contains("k: v\n"));
        let expected = dir.path().join("doc.yaml");
        assert_eq!(viewer.document().current_path(), Some(expected.as_path()));
    }

    #[test]
    fn test_errors_are_printed() {
        let dir = tempfile::tempdir().unwrap();
        let (mut viewer, console) = session("open missing.yaml\nls nope\nbogus\n", dir.path());
        run(&mut viewer, &console);

        let out = output(&console);
        assert!(out.contains("error: Open failed: cannot read document: file not found"));
        assert!(out.contains("no such row: nope"));
        assert!(out.contains("unknown command `bogus`"));
    }

    #[test]
    fn test_scalar_document() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("scalar.yaml");
        fs::write(&path, "hello\n").unwrap();

        let (mut viewer, console) = session("ls\n", dir.path());
        viewer.open_path(&path);
        run(&mut viewer, &console);

        assert!(output(&console).starts_with("hello\n"));
    }

    #[test]
    fn test_labels_with_slashes_and_spaces() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("urls.yaml");
        fs::write(&path, "urls:\n  http://host: 1\n  my key: 2\n").unwrap();
        let target = dir.path().join("out.yaml");

        let script = format!(
            "expand urls\nset urls/http:\\/\\/host 5\nset urls/my\\ key 6\nsave {}\nquit\n",
            target.display()
        );
        let (mut viewer, console) = session(&script, dir.path());
        viewer.open_path(&path);
        run(&mut viewer, &console);

        let out = output(&console);
        assert!(out.contains("urls/http:\\/\\/host: 5\n"));
        assert!(out.contains("urls/my key: 6\n"));

        let saved = crate::file::yaml::parse(&fs::read_to_string(&target).unwrap()).unwrap();
        let urls = saved.get("urls").unwrap();
        assert_eq!(urls.get("http://host"), Some(&crate::file::yaml::YamlValue::scalar("5")));
        assert_eq!(urls.get("my key"), Some(&crate::file::yaml::YamlValue::scalar("6")));
    }
}
