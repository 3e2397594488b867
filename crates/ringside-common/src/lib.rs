//! # Ringside Common
//!
//! Shared data model and pure unlock evaluation for Ringside.
//!
//! This crate provides the foundational types used across all Ringside
//! subsystems:
//! - Catalog types (brands, styles, stats, wrestlers, moves)
//! - Completion maps (per-category item-id to completed-flag state)
//! - Declarative unlock rule tables (items, predicates, chapters)
//! - The unlock evaluator (pure gating functions)
//! - Prelude for convenient imports
//!
//! Nothing here performs I/O; persistence and session concerns live in
//! `ringside-core`.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(clippy::unwrap_used)]

pub mod completion;
pub mod rules;
pub mod types;
pub mod unlock;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::completion::*;
    pub use crate::rules::*;
    pub use crate::types::*;
    pub use crate::unlock::*;
}

pub use prelude::*;
