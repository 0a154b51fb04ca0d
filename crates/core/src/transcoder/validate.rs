//! Parameter range checks.
//!
//! All checks are pure: a failing check produces an invalid-parameter
//! error and never mutates session state. A value of 0 consistently means
//! "use the source's value" (or "to end of stream" for duration).

use tracing::warn;

use super::error::TranscodeError;

/// Minimum output width in pixels.
pub const MIN_WIDTH: i32 = 128;
/// Minimum output height in pixels.
pub const MIN_HEIGHT: i32 = 96;
/// Minimum transcode duration in milliseconds.
pub const MIN_DURATION_MS: i64 = 1000;
/// Minimum output frame rate.
pub const MIN_FPS: i32 = 5;
/// Maximum output frame rate.
pub const MAX_FPS: i32 = 30;

/// Checks an output resolution. Each dimension is either 0 (keep the
/// source dimension) or at least the fixed minimum.
pub fn resolution(width: i32, height: i32) -> Result<(), TranscodeError> {
    if width < 0 || (width > 0 && width < MIN_WIDTH) {
        warn!(width, "invalid width");
        return Err(TranscodeError::invalid_parameter(format!(
            "width must be 0 or at least {MIN_WIDTH}, got {width}"
        )));
    }
    if height < 0 || (height > 0 && height < MIN_HEIGHT) {
        warn!(height, "invalid height");
        return Err(TranscodeError::invalid_parameter(format!(
            "height must be 0 or at least {MIN_HEIGHT}, got {height}"
        )));
    }
    Ok(())
}

/// Checks a transcode duration in milliseconds. 0 means "to end of
/// stream".
pub fn duration(duration_ms: i64) -> Result<(), TranscodeError> {
    if duration_ms < 0 || (duration_ms > 0 && duration_ms < MIN_DURATION_MS) {
        warn!(duration_ms, "invalid duration");
        return Err(TranscodeError::invalid_parameter(format!(
            "duration must be 0 or at least {MIN_DURATION_MS} ms, got {duration_ms}"
        )));
    }
    Ok(())
}

/// Checks an output frame rate. 0 means "use the source fps".
pub fn fps(fps: i32) -> Result<(), TranscodeError> {
    if fps < 0 || (fps > 0 && fps < MIN_FPS) || fps > MAX_FPS {
        warn!(fps, "invalid fps");
        return Err(TranscodeError::invalid_parameter(format!(
            "fps must be 0 or in [{MIN_FPS}, {MAX_FPS}], got {fps}"
        )));
    }
    Ok(())
}
