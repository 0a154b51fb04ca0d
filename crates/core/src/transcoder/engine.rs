//! Trait definitions for the underlying transcoding engine.
//!
//! The engine is an external collaborator: it owns the actual
//! decode-encode-mux pipeline and runs jobs on its own task. The session
//! only talks to it through these traits, so tests can substitute the
//! mock implementation in [`crate::testing`].

use async_trait::async_trait;
use thiserror::Error;

use super::types::{AudioCodec, FileFormat, TranscodeSpec, VideoCodec};

/// Errors in the engine's native error space.
///
/// These never reach callers directly; the session translates them through
/// its own error taxonomy at a single point.
#[derive(Debug, Error)]
pub enum EngineError {
    /// The engine considers the request malformed.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// The engine rejects the requested codec/format combination.
    #[error("format not supported: {0}")]
    NotSupportedFormat(String),

    /// The engine failed to allocate resources.
    #[error("out of memory")]
    OutOfMemory,

    /// Any other engine-level failure.
    #[error("engine failure: {0}")]
    Internal(String),
}

/// The four fields the engine binds at preparation time.
///
/// Changing any of them after a handle exists requires tearing the handle
/// down and preparing a new one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineBinding {
    pub input_path: String,
    pub file_format: FileFormat,
    pub video_codec: VideoCodec,
    pub audio_codec: AudioCodec,
}

/// Position/duration attributes of a prepared pipeline.
#[derive(Debug, Clone, Copy, Default)]
pub struct EngineAttrs {
    pub position_ms: u64,
    pub duration_ms: u64,
}

/// Progress notification adapter handed to the engine.
///
/// Invoked from the engine's own task with (position, duration) in
/// milliseconds.
pub type EngineProgressFn = Box<dyn Fn(u64, u64) + Send + Sync>;

/// Completion notification adapter handed to the engine.
///
/// Invoked exactly once from the engine's own task when the job finishes,
/// successfully or not. Not invoked for cancelled jobs.
pub type EngineCompletionFn = Box<dyn FnOnce(Result<(), EngineError>) + Send>;

/// Factory and capability surface of the transcoding engine.
#[async_trait]
pub trait TranscodeEngine: Send + Sync {
    /// Creates a fresh, unprepared pipeline handle.
    async fn create(&self) -> Result<Box<dyn EngineHandle>, EngineError>;

    /// Enumerates supported container formats as engine-native codes.
    ///
    /// The engine owns the iteration; a `false` return from `visit` stops
    /// the loop early.
    fn foreach_supported_file_format(
        &self,
        visit: &mut dyn FnMut(i32) -> bool,
    ) -> Result<(), EngineError>;

    /// Enumerates supported video encoders as engine-native codes.
    fn foreach_supported_video_encoder(
        &self,
        visit: &mut dyn FnMut(i32) -> bool,
    ) -> Result<(), EngineError>;

    /// Enumerates supported audio encoders as engine-native codes.
    fn foreach_supported_audio_encoder(
        &self,
        visit: &mut dyn FnMut(i32) -> bool,
    ) -> Result<(), EngineError>;
}

/// A prepared transcoding pipeline.
///
/// Bound to one [`EngineBinding`] for its whole lifetime and owned
/// exclusively by one session.
#[async_trait]
pub trait EngineHandle: Send + Sync {
    /// Binds the pipeline to an input path, container format and codecs.
    ///
    /// May probe the source stream, which is why the session defers it
    /// until the first transcoding attempt.
    async fn prepare(&mut self, binding: &EngineBinding) -> Result<(), EngineError>;

    /// Whether a job is currently running on this pipeline.
    async fn is_busy(&self) -> Result<bool, EngineError>;

    /// Starts a transcoding job.
    ///
    /// Returns as soon as the engine accepts the job; progress and
    /// completion arrive later through the adapters.
    async fn transcode(
        &mut self,
        spec: TranscodeSpec,
        on_progress: EngineProgressFn,
        on_completed: EngineCompletionFn,
    ) -> Result<(), EngineError>;

    /// Requests cancellation of the running job.
    ///
    /// Succeeds once the engine acknowledges the request, not once all
    /// resources are unwound.
    async fn cancel(&mut self) -> Result<(), EngineError>;

    /// Current position/duration attributes of the pipeline.
    async fn attrs(&self) -> Result<EngineAttrs, EngineError>;

    /// Tears the pipeline down.
    async fn destroy(&mut self) -> Result<(), EngineError>;
}
