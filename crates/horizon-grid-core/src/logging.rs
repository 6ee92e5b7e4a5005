//! Logging and debugging facilities for Horizon Grid.
//!
//! This module provides:
//! - Target and span names for filtering the `tracing` output of each subsystem
//! - Formatting options shared by the grid debug dumps
//! - Performance tracing hooks for profiling render passes
//!
//! # Tracing Integration
//!
//! Horizon Grid uses the `tracing` crate for instrumentation and never
//! installs a subscriber itself. To see logs, install one in your application:
//!
//! ```ignore
//! fn main() {
//!     tracing_subscriber::fmt()
//!         .with_env_filter("horizon_grid=debug")
//!         .init();
//! }
//! ```
//!
//! Cells that have neither a template nor a registered formatter are reported
//! at `warn` level on [`targets::FORMAT`].

/// Span names used throughout Horizon Grid for tracing.
pub mod span_names {
    /// A full header + rows render pass.
    pub const RENDER: &str = "horizon_grid::render";
    /// Column reconciliation after a model change.
    pub const COLUMNS: &str = "horizon_grid::columns";
    /// Row reconciliation after a data source publish.
    pub const ROWS: &str = "horizon_grid::rows";
}

/// Target names for log filtering.
///
/// Use these with `tracing` directives to filter logs by subsystem.
pub mod targets {
    /// Core crate target.
    pub const CORE: &str = "horizon_grid_core";
    /// Signal/slot system target.
    pub const SIGNAL: &str = "horizon_grid_core::signal";
    /// Column/row model target.
    pub const MODEL: &str = "horizon_grid::model";
    /// Default configuration registry target.
    pub const DEFAULTS: &str = "horizon_grid::defaults";
    /// Reconciliation engine target.
    pub const DIFFER: &str = "horizon_grid::differ";
    /// Cell formatter resolution target.
    pub const FORMAT: &str = "horizon_grid::format";
    /// Paginated data source target.
    pub const DATA_SOURCE: &str = "horizon_grid::data_source";
    /// Headless view target.
    pub const VIEW: &str = "horizon_grid::view";
    /// Performance spans target.
    pub const PERF: &str = "horizon_grid::perf";
}

/// Style options for tree visualization.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum TreeStyle {
    /// ASCII characters for tree branches.
    Ascii,
    /// Unicode box-drawing characters.
    #[default]
    Unicode,
    /// Compact single-line representation.
    Compact,
}

impl TreeStyle {
    /// Branch prefix for an entry, depending on whether it is the last sibling.
    pub fn branch(self, is_last: bool) -> &'static str {
        match (self, is_last) {
            (Self::Ascii, false) => "|-- ",
            (Self::Ascii, true) => "`-- ",
            (Self::Unicode, false) => "├── ",
            (Self::Unicode, true) => "└── ",
            (Self::Compact, _) => "",
        }
    }

    /// Continuation prefix drawn below an entry for its children.
    pub fn continuation(self, is_last: bool) -> &'static str {
        match (self, is_last) {
            (Self::Ascii, false) => "|   ",
            (Self::Unicode, false) => "│   ",
            (Self::Ascii | Self::Unicode, true) => "    ",
            (Self::Compact, _) => "",
        }
    }
}

/// Configuration for tree-shaped debug output.
#[derive(Debug, Clone)]
pub struct TreeFormatOptions {
    /// The style of tree visualization.
    pub style: TreeStyle,
    /// Whether to show CSS classes of cells.
    pub show_classes: bool,
    /// Whether to show which formatter or template resolved each cell.
    pub show_sources: bool,
    /// Whether to show the detail region of expanded rows.
    pub show_detail: bool,
    /// Maximum number of data rows to print (None for unlimited).
    pub max_rows: Option<usize>,
}

impl Default for TreeFormatOptions {
    fn default() -> Self {
        Self {
            style: TreeStyle::default(),
            show_classes: true,
            show_sources: false,
            show_detail: true,
            max_rows: None,
        }
    }
}

impl TreeFormatOptions {
    /// Create options for detailed debugging output.
    pub fn detailed() -> Self {
        Self {
            show_sources: true,
            ..Default::default()
        }
    }

    /// Create options for minimal output.
    pub fn minimal() -> Self {
        Self {
            show_classes: false,
            show_sources: false,
            show_detail: false,
            ..Default::default()
        }
    }
}

/// A guard that keeps a tracing span entered until dropped.
///
/// This is useful for tracking the duration of operations.
#[derive(Debug)]
pub struct PerfSpan {
    #[allow(dead_code)]
    span: tracing::span::EnteredSpan,
}

impl PerfSpan {
    /// Create a new performance span.
    ///
    /// The span will be active until the guard is dropped.
    pub fn new(name: &'static str) -> Self {
        let span = tracing::info_span!(target: targets::PERF, "perf", operation = name);
        Self {
            span: span.entered(),
        }
    }
}

/// Macros for common tracing patterns.
///
/// These are just wrappers around the `tracing` crate macros with consistent
/// target naming.
#[macro_export]
macro_rules! grid_trace {
    ($($arg:tt)*) => {
        tracing::trace!(target: $crate::logging::targets::CORE, $($arg)*)
    };
}

#[macro_export]
macro_rules! grid_debug {
    ($($arg:tt)*) => {
        tracing::debug!(target: $crate::logging::targets::CORE, $($arg)*)
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tree_style_prefixes() {
        assert_eq!(TreeStyle::Ascii.branch(false), "|-- ");
        assert_eq!(TreeStyle::Unicode.branch(true), "└── ");
        assert_eq!(TreeStyle::Compact.continuation(false), "");
    }

    #[test]
    fn test_minimal_options() {
        let options = TreeFormatOptions::minimal();
        assert!(!options.show_classes);
        assert!(!options.show_detail);
        assert_eq!(options.style, TreeStyle::Unicode);
    }

    #[test]
    fn test_perf_span() {
        let _ = tracing_subscriber::fmt().with_test_writer().try_init();
        let _span = PerfSpan::new("test_operation");
        grid_trace!("inside perf span");
    }

    #[test]
    fn test_perf_span_uses_perf_target() {
        let subscriber = tracing_subscriber::fmt().with_test_writer().finish();
        tracing::subscriber::with_default(subscriber, || {
            let perf = PerfSpan::new("render");
            let target = perf.span.metadata().map(|metadata| metadata.target());
            assert_eq!(target, Some(targets::PERF));
        });
    }
}
