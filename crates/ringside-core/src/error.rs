//! Error types for Ringside services.

use thiserror::Error;

use crate::advice::AdviceError;
use crate::remote::RemoteError;
use crate::session::AuthError;
use crate::store::StoreError;
use crate::tracker::GuideError;

/// Top-level error type aggregating every service-level failure.
///
/// Most remote failures never reach this type: the progress and custom
/// roster stores degrade to the local tier instead of propagating. What
/// remains is what a caller can actually act on.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Local tier failure.
    #[error("storage error: {0}")]
    Store(#[from] StoreError),

    /// Remote tier failure, for the awaited push/pull entry points.
    #[error("remote error: {0}")]
    Remote(#[from] RemoteError),

    /// Identity provider failure.
    #[error("authentication error: {0}")]
    Auth(#[from] AuthError),

    /// Advice generator failure.
    #[error("advice error: {0}")]
    Advice(#[from] AdviceError),

    /// Checklist toggle refused or malformed guide reference.
    #[error("guide error: {0}")]
    Guide(#[from] GuideError),

    /// IO errors outside the local tier (configuration files).
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for Ringside operations.
pub type CoreResult<T> = Result<T, CoreError>;
