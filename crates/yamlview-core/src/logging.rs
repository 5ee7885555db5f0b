//! Logging facilities for yamlview.
//!
//! yamlview uses the `tracing` crate for instrumentation. Library code only
//! emits events; the binary installs a subscriber with [`init`]:
//!
//! ```ignore
//! fn main() {
//!     yamlview_core::logging::init();
//!     // ...
//! }
//! ```
//!
//! The filter is read from `RUST_LOG` and defaults to [`DEFAULT_FILTER`].
//! Every subsystem logs under one of the [`targets`], so a single directive
//! such as `RUST_LOG=yamlview::model=trace` isolates lazy population.

use tracing_subscriber::EnvFilter;

/// Filter used when `RUST_LOG` is unset or invalid.
pub const DEFAULT_FILTER: &str = "warn";

/// Span names used throughout yamlview for tracing.
pub mod span_names {
    /// Document load span.
    pub const LOAD: &str = "yamlview::load";
    /// Document save span.
    pub const SAVE: &str = "yamlview::save";
    /// Node population span.
    pub const POPULATE: &str = "yamlview::populate";
}

/// Target names for log filtering.
pub mod targets {
    /// Core framework target.
    pub const CORE: &str = "yamlview_core";
    /// Signal/slot system target.
    pub const SIGNAL: &str = "yamlview_core::signal";
    /// Lazy tree model target.
    pub const MODEL: &str = "yamlview::model";
    /// YAML codec and file I/O target.
    pub const FILE: &str = "yamlview::file";
    /// Document controller target.
    pub const DOCUMENT: &str = "yamlview::document";
    /// Viewer shell target.
    pub const VIEWER: &str = "yamlview::viewer";
    /// Preferences target.
    pub const PREFERENCES: &str = "yamlview::preferences";
}

/// Install the global `tracing` subscriber.
///
/// Logs go to stderr so they never interleave with tree output on stdout.
/// Calling this more than once is harmless; later calls are ignored.
pub fn init() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));
    let installed = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(true)
        .try_init()
        .is_ok();
    if installed {
        crate::yamlview_debug!("tracing subscriber installed");
    }
}

/// A guard that keeps a tracing span entered until dropped.
///
/// This is useful for tracking the duration of load and save operations.
#[derive(Debug)]
pub struct PerfSpan {
    #[allow(dead_code)]
    span: tracing::span::EnteredSpan,
}

impl PerfSpan {
    /// Create a new performance span.
    pub fn new(name: &'static str) -> Self {
        let span = tracing::info_span!(target: "yamlview::perf", "perf", operation = name);
        crate::yamlview_trace!(operation = name, "perf span entered");
        Self {
            span: span.entered(),
        }
    }
}

/// Macros for common tracing patterns with consistent target naming.
#[macro_export]
macro_rules! yamlview_trace {
    ($($arg:tt)*) => {
        tracing::trace!(target: $crate::logging::targets::CORE, $($arg)*)
    };
}

#[macro_export]
macro_rules! yamlview_debug {
    ($($arg:tt)*) => {
        tracing::debug!(target: $crate::logging::targets::CORE, $($arg)*)
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_is_idempotent() {
        init();
        init();
        yamlview_debug!("logging initialized twice without panicking");
    }

    #[test]
    fn test_perf_span() {
        let _span = PerfSpan::new(span_names::LOAD);
        yamlview_trace!("inside perf span");
    }

    #[test]
    fn test_targets_are_namespaced() {
        for target in [targets::MODEL, targets::FILE, targets::DOCUMENT, targets::VIEWER] {
            assert!(target.starts_with("yamlview::"));
        }
    }
}
