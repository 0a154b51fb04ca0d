//! Error types for the transcoder module.

use thiserror::Error;
use tracing::debug;

use super::engine::EngineError;

/// Errors surfaced by the transcoding session.
///
/// Callers only ever see this taxonomy; engine-native codes are translated
/// through the single [`From<EngineError>`] impl below.
#[derive(Debug, Error)]
pub enum TranscodeError {
    /// Empty or out-of-range input, or the engine reports a malformed request.
    #[error("invalid parameter: {reason}")]
    InvalidParameter { reason: String },

    /// The engine failed to allocate resources.
    #[error("out of memory")]
    OutOfMemory,

    /// Engine-level failure not attributable to bad parameters.
    #[error("invalid operation: {reason}")]
    InvalidOperation { reason: String },

    /// A transcode is already in flight on this session.
    #[error("transcoding is already running")]
    Busy,

    /// The engine rejects the requested codec/format combination.
    #[error("requested format is not supported")]
    NotSupportedFormat,

    /// The platform denied access to the transcoding capability.
    #[error("permission denied")]
    PermissionDenied,

    /// Transcoding is not available on this platform.
    #[error("transcoding is not supported")]
    NotSupported,
}

impl TranscodeError {
    /// Creates a new invalid parameter error.
    pub fn invalid_parameter(reason: impl Into<String>) -> Self {
        Self::InvalidParameter {
            reason: reason.into(),
        }
    }

    /// Creates a new invalid operation error.
    pub fn invalid_operation(reason: impl Into<String>) -> Self {
        Self::InvalidOperation {
            reason: reason.into(),
        }
    }
}

impl From<EngineError> for TranscodeError {
    fn from(error: EngineError) -> Self {
        debug!(%error, "translating engine error");
        match error {
            EngineError::InvalidArgument(reason) => Self::InvalidParameter { reason },
            EngineError::NotSupportedFormat(_) => Self::NotSupportedFormat,
            EngineError::OutOfMemory => Self::OutOfMemory,
            EngineError::Internal(reason) => Self::InvalidOperation { reason },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_engine_error_translation() {
        let err: TranscodeError = EngineError::InvalidArgument("bad fps".to_string()).into();
        assert!(matches!(err, TranscodeError::InvalidParameter { .. }));

        let err: TranscodeError = EngineError::NotSupportedFormat("vp9".to_string()).into();
        assert!(matches!(err, TranscodeError::NotSupportedFormat));

        let err: TranscodeError = EngineError::OutOfMemory.into();
        assert!(matches!(err, TranscodeError::OutOfMemory));

        let err: TranscodeError = EngineError::Internal("pipeline stall".to_string()).into();
        assert!(matches!(err, TranscodeError::InvalidOperation { .. }));
    }

    #[test]
    fn test_error_display() {
        let err = TranscodeError::invalid_parameter("width below minimum");
        assert_eq!(err.to_string(), "invalid parameter: width below minimum");
        assert_eq!(
            TranscodeError::Busy.to_string(),
            "transcoding is already running"
        );
    }
}
