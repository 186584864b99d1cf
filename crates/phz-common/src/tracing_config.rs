//! Tracing configuration for debugging solver decisions.
//!
//! Supports three output formats controlled by `PHZ_LOG_FORMAT`:
//!
//! - `text` (default): Standard `tracing-subscriber` flat output
//! - `tree`: Hierarchical indented output via `tracing-tree`
//! - `json`: One JSON object per span/event
//!
//! ## Quick start
//!
//! ```bash
//! # Every subtype decision, indented
//! PHZ_LOG=phz_solver=trace PHZ_LOG_FORMAT=tree cargo bench
//!
//! # Structured relation query events only
//! PHZ_LOG=phz::query_json=trace PHZ_LOG_FORMAT=json cargo test
//! ```
//!
//! The subscriber is only initialised when `PHZ_LOG` (or `RUST_LOG`) is set,
//! so there is zero overhead in normal use.

use tracing_subscriber::prelude::*;
use tracing_subscriber::{EnvFilter, Registry, fmt};

/// Tracing output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    /// Standard flat text lines (default).
    Text,
    /// Hierarchical indented tree via `tracing-tree`.
    Tree,
    /// Newline-delimited JSON objects.
    Json,
}

impl LogFormat {
    /// Parse a format name; unknown names fall back to [`LogFormat::Text`].
    pub fn parse(value: &str) -> Self {
        match value.trim().to_lowercase().as_str() {
            "tree" => Self::Tree,
            "json" => Self::Json,
            _ => Self::Text,
        }
    }

    fn from_env() -> Self {
        Self::parse(&std::env::var("PHZ_LOG_FORMAT").unwrap_or_default())
    }
}

/// Build an `EnvFilter` from `PHZ_LOG`, falling back to `RUST_LOG`.
fn build_filter() -> EnvFilter {
    if let Ok(val) = std::env::var("PHZ_LOG") {
        EnvFilter::builder().parse_lossy(val)
    } else {
        EnvFilter::from_default_env()
    }
}

/// Initialise the global tracing subscriber.
///
/// Does nothing when neither `PHZ_LOG` nor `RUST_LOG` is set. Calling it more
/// than once is harmless: later calls lose the race to install the global
/// subscriber and are ignored.
///
/// All output goes to stderr.
pub fn init_tracing() {
    let has_phz_log = std::env::var("PHZ_LOG").is_ok();
    let has_rust_log = std::env::var("RUST_LOG").is_ok();
    if !has_phz_log && !has_rust_log {
        return;
    }

    let filter = build_filter();

    // try_init: tests and benches may call this from several entry points.
    let _ = match LogFormat::from_env() {
        LogFormat::Tree => {
            let tree_layer = tracing_tree::HierarchicalLayer::default()
                .with_indent_amount(2)
                .with_indent_lines(true)
                .with_targets(true)
                .with_writer(std::io::stderr);

            Registry::default().with(filter).with(tree_layer).try_init()
        }
        LogFormat::Json => {
            let json_layer = fmt::layer().json().with_writer(std::io::stderr);

            Registry::default().with(filter).with(json_layer).try_init()
        }
        LogFormat::Text => {
            let text_layer = fmt::layer().with_writer(std::io::stderr);

            Registry::default().with(filter).with(text_layer).try_init()
        }
    };
}
