//! Structured query tracing for relation entry points.
//!
//! Events use target `phz::query_json` and are intended to be consumed with:
//! `PHZ_LOG=phz::query_json=trace PHZ_LOG_FORMAT=json`.
//!
//! Environment:
//! - `PHZ_QUERY_RUN_ID`: optional run identifier attached to every event.

use crate::types::TypeId;
use std::sync::OnceLock;
use std::sync::atomic::{AtomicU64, Ordering};
use tracing::{Level, trace};

static NEXT_QUERY_ID: AtomicU64 = AtomicU64::new(1);
static QUERY_RUN_ID: OnceLock<String> = OnceLock::new();

#[inline]
pub(crate) fn enabled() -> bool {
    tracing::enabled!(target: "phz::query_json", Level::TRACE)
}

#[inline]
pub(crate) fn next_query_id() -> u64 {
    NEXT_QUERY_ID.fetch_add(1, Ordering::Relaxed)
}

#[inline]
fn run_id() -> &'static str {
    QUERY_RUN_ID
        .get_or_init(|| std::env::var("PHZ_QUERY_RUN_ID").unwrap_or_else(|_| "default".to_string()))
        .as_str()
}

#[inline]
pub(crate) fn relation_start(
    query_id: u64,
    op: &'static str,
    source: TypeId,
    target: TypeId,
    flags: u8,
) {
    trace!(
        target: "phz::query_json",
        event = "query",
        phase = "start",
        run_id = run_id(),
        query_id,
        op,
        source_type_id = source.0,
        target_type_id = target.0,
        flags
    );
}

#[inline]
pub(crate) fn relation_end(query_id: u64, op: &'static str, result: bool, cache_hit: bool) {
    trace!(
        target: "phz::query_json",
        event = "query",
        phase = "end",
        run_id = run_id(),
        query_id,
        op,
        result,
        cache_hit
    );
}
