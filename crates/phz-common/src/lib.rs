//! Common types and utilities for the phz PHP type system.
//!
//! This crate provides foundational types used across all phz crates:
//! - String interning (`Atom`, `ShardedInterner`)
//! - Limits and thresholds shared by the solver
//! - Opt-in tracing subscriber configuration

// String interning for class names, template names and string literals
pub mod interner;
pub use interner::{Atom, ShardedInterner};

// Centralized limits and thresholds
pub mod limits;

// Tracing subscriber setup (PHZ_LOG / PHZ_LOG_FORMAT)
pub mod tracing_config;
