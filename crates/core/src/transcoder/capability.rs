//! Platform capability queries.
//!
//! Whether transcoding is available at all is platform state external to
//! this crate. It is injected as a trait rather than read from a hidden
//! global so tests can substitute it.

use thiserror::Error;

/// Errors from the platform capability query.
#[derive(Debug, Error)]
pub enum CapabilityError {
    /// The caller lacks permission to query or use the capability.
    #[error("permission denied while querying transcoder capability")]
    PermissionDenied,

    /// The query itself failed.
    #[error("capability query failed: {0}")]
    Unavailable(String),
}

/// Answers whether the platform can transcode at all.
///
/// Every public session entry point consults this before doing anything
/// else.
pub trait CapabilityProvider: Send + Sync {
    fn transcoder_available(&self) -> Result<bool, CapabilityError>;
}

/// Capability provider for platforms where transcoding is always present.
pub struct AlwaysAvailable;

impl CapabilityProvider for AlwaysAvailable {
    fn transcoder_available(&self) -> Result<bool, CapabilityError> {
        Ok(true)
    }
}
