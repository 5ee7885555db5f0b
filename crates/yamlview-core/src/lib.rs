//! Core systems for yamlview.
//!
//! This crate provides the foundational components shared by the viewer:
//!
//! - **Signal/Slot System**: Type-safe change notification between the tree
//!   model and whatever view is attached to it
//! - **Logging**: `tracing` targets, span names and subscriber setup
//!
//! # Signal/Slot Example
//!
//! ```
//! use yamlview_core::Signal;
//!
//! let rows_inserted = Signal::<(usize, usize)>::new();
//!
//! let conn_id = rows_inserted.connect(|(first, last)| {
//!     println!("rows {}..={} inserted", first, last);
//! });
//!
//! rows_inserted.emit((0, 2));
//! rows_inserted.disconnect(conn_id);
//! ```

pub mod logging;
pub mod signal;

pub use logging::PerfSpan;
pub use signal::{ConnectionId, Signal};
