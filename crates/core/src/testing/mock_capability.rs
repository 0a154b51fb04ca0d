//! Mock platform capability provider for testing.

use crate::transcoder::{CapabilityError, CapabilityProvider};

enum Mode {
    Available,
    Unavailable,
    Denied,
    Failing(String),
}

/// Mock implementation of [`CapabilityProvider`] with a fixed answer.
pub struct MockCapability {
    mode: Mode,
}

impl MockCapability {
    /// Transcoding is available.
    pub fn available() -> Self {
        Self {
            mode: Mode::Available,
        }
    }

    /// The platform reports the capability as absent.
    pub fn unavailable() -> Self {
        Self {
            mode: Mode::Unavailable,
        }
    }

    /// The query fails with a permission error.
    pub fn denied() -> Self {
        Self { mode: Mode::Denied }
    }

    /// The query fails for an unspecified reason.
    pub fn failing(reason: impl Into<String>) -> Self {
        Self {
            mode: Mode::Failing(reason.into()),
        }
    }
}

impl CapabilityProvider for MockCapability {
    fn transcoder_available(&self) -> Result<bool, CapabilityError> {
        match &self.mode {
            Mode::Available => Ok(true),
            Mode::Unavailable => Ok(false),
            Mode::Denied => Err(CapabilityError::PermissionDenied),
            Mode::Failing(reason) => Err(CapabilityError::Unavailable(reason.clone())),
        }
    }
}
