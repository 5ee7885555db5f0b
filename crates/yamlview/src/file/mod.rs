//! File I/O for documents and preferences.
//!
//! # Reading and Writing
//!
//! ```ignore
//! use yamlview::file::{read_text, atomic_write};
//!
//! let text = read_text("document.yaml")?;
//!
//! // Atomic write: the target is replaced only once everything is on disk
//! atomic_write("document.yaml", |w| w.write_str(&text))?;
//! ```
//!
//! # YAML
//!
//! The [`yaml`] submodule converts between YAML text and
//! [`YamlValue`](yaml::YamlValue).
//!
//! # Preferences
//!
//! [`Preferences`] persists the last directory used by the file chooser.
//!
//! # Error Handling
//!
//! I/O operations return [`FileResult<T>`], an alias for
//! `Result<T, FileError>`. [`FileError::kind`] tells the common failure
//! cases apart:
//!
//! ```ignore
//! match read_text("missing.yaml") {
//!     Ok(text) => println!("{text}"),
//!     Err(e) if e.is_not_found() => println!("no such file"),
//!     Err(e) => println!("error: {e}"),
//! }
//! ```

mod error;
mod operations;
mod preferences;
mod writer;
pub mod yaml;

pub use error::{FileError, FileErrorKind, FileResult};
pub use operations::{atomic_write, read_text};
pub use preferences::{PREFERENCES_FILE, Preferences};
pub use writer::AtomicWriter;
