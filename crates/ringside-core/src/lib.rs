//! # Ringside Core
//!
//! Catalog, progress persistence, and session sync for Ringside.
//!
//! This crate provides the service layer over `ringside-common`:
//! - Static wrestler/move catalog with search and rankings
//! - Built-in guide rule tables for every game mode
//! - Per-category guide trackers driven by the unlock evaluator
//! - Dual-tier (local file / remote record) progress persistence
//! - Custom wrestler roster with remote mirroring
//! - Session coordination with login reconciliation
//! - Matchup advice with offline fallbacks
//! - Application configuration

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(clippy::unwrap_used)]

pub mod advice;
pub mod catalog;
pub mod config;
pub mod custom;
pub mod error;
pub mod guides;
pub mod progress;
pub mod remote;
pub mod session;
pub mod store;
pub mod tracker;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::advice::*;
    pub use crate::catalog::*;
    pub use crate::config::*;
    pub use crate::custom::*;
    pub use crate::error::*;
    pub use crate::guides::*;
    pub use crate::progress::*;
    pub use crate::remote::*;
    pub use crate::session::*;
    pub use crate::store::*;
    pub use crate::tracker::*;
}

pub use prelude::*;
