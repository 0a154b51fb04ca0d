//! The transcoding session.
//!
//! A session is the caller-visible job object: configure it field by
//! field, start the job, poll or get notified about progress, cancel, and
//! tear it down. It owns at most one prepared engine handle and at most
//! one active callback context, and it enforces the state machine between
//! them: no configuration changes while a transcode is in flight, and no
//! second attempt while one is outstanding.

use std::sync::Arc;

use tracing::{debug, warn};

use super::bridge::{self, AttemptSlot, CallbackContext, CompletedCallback, ProgressCallback};
use super::capability::{CapabilityError, CapabilityProvider};
use super::config::SessionConfig;
use super::engine::{EngineBinding, TranscodeEngine};
use super::error::TranscodeError;
use super::handle::HandleSlot;
use super::types::{
    AudioCodec, FileFormat, SeekMode, TranscodeProgress, TranscodeSpec, VideoCodec,
};
use super::validate;

/// A configurable field of the session.
///
/// The engine binds path/format/codecs at preparation time, so mutating
/// one of those invalidates a live handle. Resolution, fps and seek
/// precision are passed per invocation and leave the handle alone. This
/// table is the single place that distinction lives.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ConfigField {
    InputPath,
    FileFormat,
    VideoCodec,
    AudioCodec,
    Resolution,
    Fps,
    AccurateMode,
}

impl ConfigField {
    fn invalidates_handle(self) -> bool {
        match self {
            Self::InputPath | Self::FileFormat | Self::VideoCodec | Self::AudioCodec => true,
            Self::Resolution | Self::Fps | Self::AccurateMode => false,
        }
    }
}

/// A transcoding session over an engine.
///
/// Designed for single-owner use: all mutating operations take
/// `&mut self`, and sharing across threads is the caller's concern. The
/// engine delivers progress/completion notifications from its own task.
pub struct TranscodeSession {
    engine: Arc<dyn TranscodeEngine>,
    capability: Arc<dyn CapabilityProvider>,
    input_path: Option<String>,
    accurate_mode: bool,
    video_codec: VideoCodec,
    audio_codec: AudioCodec,
    file_format: FileFormat,
    width: i32,
    height: i32,
    fps: i32,
    handle: HandleSlot,
    attempt: AttemptSlot,
}

impl TranscodeSession {
    /// Creates an empty session with default configuration.
    pub fn new(engine: Arc<dyn TranscodeEngine>, capability: Arc<dyn CapabilityProvider>) -> Self {
        // The default config always passes validation.
        Self::with_config(engine, capability, SessionConfig::default())
            .expect("default session config is valid")
    }

    /// Creates a session seeded from a [`SessionConfig`].
    pub fn with_config(
        engine: Arc<dyn TranscodeEngine>,
        capability: Arc<dyn CapabilityProvider>,
        config: SessionConfig,
    ) -> Result<Self, TranscodeError> {
        validate::resolution(config.width, config.height)?;
        validate::fps(config.fps)?;

        Ok(Self {
            engine,
            capability,
            input_path: None,
            accurate_mode: config.accurate_mode,
            video_codec: config.video_codec,
            audio_codec: config.audio_codec,
            file_format: config.file_format,
            width: config.width,
            height: config.height,
            fps: config.fps,
            handle: HandleSlot::new(),
            attempt: AttemptSlot::new(),
        })
    }

    fn check_capability(&self) -> Result<(), TranscodeError> {
        match self.capability.transcoder_available() {
            Ok(true) => Ok(()),
            Ok(false) => {
                warn!("transcoding capability is not available");
                Err(TranscodeError::NotSupported)
            }
            Err(CapabilityError::PermissionDenied) => Err(TranscodeError::PermissionDenied),
            Err(e) => {
                warn!(%e, "transcoder capability query failed");
                Err(TranscodeError::NotSupported)
            }
        }
    }

    /// Guards a field mutation: rejects with [`TranscodeError::Busy`] if a
    /// transcode is in flight, and tears down the live handle when the
    /// field is baked into engine preparation. No mutation happens on
    /// failure.
    async fn guard_update(&mut self, field: ConfigField) -> Result<(), TranscodeError> {
        if !field.invalidates_handle() {
            return Ok(());
        }
        if self.handle.is_busy().await? {
            warn!(?field, "rejecting configuration change while transcoding");
            return Err(TranscodeError::Busy);
        }
        self.handle.invalidate().await
    }

    /// Sets the input file path.
    pub async fn set_file_path(&mut self, file_path: &str) -> Result<(), TranscodeError> {
        self.check_capability()?;
        if file_path.is_empty() {
            warn!("rejecting empty input path");
            return Err(TranscodeError::invalid_parameter("input path is empty"));
        }
        self.guard_update(ConfigField::InputPath).await?;
        debug!(file_path, "input path set");
        self.input_path = Some(file_path.to_string());
        Ok(())
    }

    /// Returns the input file path, if one has been set.
    pub fn file_path(&self) -> Result<Option<&str>, TranscodeError> {
        self.check_capability()?;
        Ok(self.input_path.as_deref())
    }

    /// Enables or disables frame-exact seeking for the start offset.
    pub fn set_accurate_mode(&mut self, accurate_mode: bool) -> Result<(), TranscodeError> {
        self.check_capability()?;
        self.accurate_mode = accurate_mode;
        Ok(())
    }

    /// Returns whether frame-exact seeking is enabled.
    pub fn accurate_mode(&self) -> Result<bool, TranscodeError> {
        self.check_capability()?;
        Ok(self.accurate_mode)
    }

    /// Sets the target video codec.
    pub async fn set_video_codec(&mut self, codec: VideoCodec) -> Result<(), TranscodeError> {
        self.check_capability()?;
        self.guard_update(ConfigField::VideoCodec).await?;
        debug!(?codec, "video codec set");
        self.video_codec = codec;
        Ok(())
    }

    /// Returns the target video codec.
    pub fn video_codec(&self) -> Result<VideoCodec, TranscodeError> {
        self.check_capability()?;
        Ok(self.video_codec)
    }

    /// Sets the target audio codec.
    pub async fn set_audio_codec(&mut self, codec: AudioCodec) -> Result<(), TranscodeError> {
        self.check_capability()?;
        self.guard_update(ConfigField::AudioCodec).await?;
        debug!(?codec, "audio codec set");
        self.audio_codec = codec;
        Ok(())
    }

    /// Returns the target audio codec.
    pub fn audio_codec(&self) -> Result<AudioCodec, TranscodeError> {
        self.check_capability()?;
        Ok(self.audio_codec)
    }

    /// Sets the output container format.
    pub async fn set_file_format(&mut self, format: FileFormat) -> Result<(), TranscodeError> {
        self.check_capability()?;
        self.guard_update(ConfigField::FileFormat).await?;
        debug!(?format, "file format set");
        self.file_format = format;
        Ok(())
    }

    /// Returns the output container format.
    pub fn file_format(&self) -> Result<FileFormat, TranscodeError> {
        self.check_capability()?;
        Ok(self.file_format)
    }

    /// Sets the output resolution. Either dimension may be 0 to keep the
    /// source dimension. Not baked into the engine handle.
    pub fn set_resolution(&mut self, width: i32, height: i32) -> Result<(), TranscodeError> {
        self.check_capability()?;
        validate::resolution(width, height)?;
        self.width = width;
        self.height = height;
        Ok(())
    }

    /// Returns the output resolution as (width, height).
    pub fn resolution(&self) -> Result<(i32, i32), TranscodeError> {
        self.check_capability()?;
        Ok((self.width, self.height))
    }

    /// Sets the output frame rate. 0 keeps the source fps. Not baked into
    /// the engine handle.
    pub fn set_fps(&mut self, fps: i32) -> Result<(), TranscodeError> {
        self.check_capability()?;
        validate::fps(fps)?;
        self.fps = fps;
        Ok(())
    }

    /// Returns the output frame rate.
    pub fn fps(&self) -> Result<i32, TranscodeError> {
        self.check_capability()?;
        Ok(self.fps)
    }

    /// Starts a transcoding job.
    ///
    /// Creates and prepares the engine handle on demand if none exists.
    /// Returns as soon as the engine accepts the job; `completed` is
    /// invoked exactly once from the engine's notification path, unless
    /// the attempt is cancelled first. `progress` is optional.
    pub async fn start(
        &mut self,
        start_ms: u64,
        duration_ms: i64,
        out_path: &str,
        progress: Option<ProgressCallback>,
        completed: CompletedCallback,
    ) -> Result<(), TranscodeError> {
        self.check_capability()?;
        validate::duration(duration_ms)?;
        if out_path.is_empty() {
            warn!("rejecting empty output path");
            return Err(TranscodeError::invalid_parameter("output path is empty"));
        }
        let input_path = match self.input_path.as_deref() {
            Some(path) if !path.is_empty() => path.to_string(),
            _ => {
                warn!("rejecting start without an input path");
                return Err(TranscodeError::invalid_parameter("input path is not set"));
            }
        };

        if !self.handle.exists() {
            let binding = EngineBinding {
                input_path,
                file_format: self.file_format,
                video_codec: self.video_codec,
                audio_codec: self.audio_codec,
            };
            self.handle.ensure(self.engine.as_ref(), &binding).await?;
            if !self.handle.exists() {
                // The engine reported success but produced nothing.
                return Err(TranscodeError::invalid_operation(
                    "engine reported success without producing a handle",
                ));
            }
        } else if self.handle.is_busy().await? {
            warn!("rejecting start while transcoding");
            return Err(TranscodeError::Busy);
        }

        debug!(
            width = self.width,
            height = self.height,
            fps = self.fps,
            start_ms,
            duration_ms,
            out_path,
            accurate = self.accurate_mode,
            "starting transcode"
        );

        // Safe to overwrite: the busy check above proved nothing is
        // outstanding.
        self.attempt.arm(CallbackContext::new(progress, completed));

        let spec = TranscodeSpec {
            width: self.width,
            height: self.height,
            fps: self.fps,
            start_ms,
            duration_ms: duration_ms as u64,
            seek_mode: if self.accurate_mode {
                SeekMode::Accurate
            } else {
                SeekMode::Nearest
            },
            out_path: out_path.to_string(),
        };
        let on_progress = self.attempt.progress_adapter();
        let on_completed = self.attempt.completion_adapter();

        let Some(handle) = self.handle.get_mut() else {
            self.attempt.abort();
            return Err(TranscodeError::invalid_operation("engine handle vanished"));
        };
        if let Err(e) = handle.transcode(spec, on_progress, on_completed).await {
            // The adapters will never fire; release the context here.
            self.attempt.abort();
            return Err(e.into());
        }
        Ok(())
    }

    /// Cancels the running transcode.
    ///
    /// Requires a live engine handle; a session that never started has
    /// nothing to cancel. The completion callback is not invoked for a
    /// cancelled attempt, even if the engine had already queued the
    /// notification.
    pub async fn cancel(&mut self) -> Result<(), TranscodeError> {
        self.check_capability()?;
        let Some(handle) = self.handle.get_mut() else {
            warn!("rejecting cancel without an engine handle");
            return Err(TranscodeError::invalid_parameter(
                "no transcoding attempt to cancel",
            ));
        };
        handle.cancel().await.map_err(|e| {
            TranscodeError::invalid_operation(format!("engine cancel failed: {e}"))
        })?;
        if self.attempt.abort() {
            debug!("active callback context released on cancel");
        }
        Ok(())
    }

    /// Returns the current position/duration of the running transcode.
    pub async fn progress(&self) -> Result<TranscodeProgress, TranscodeError> {
        self.check_capability()?;
        let Some(handle) = self.handle.get() else {
            return Err(TranscodeError::invalid_parameter(
                "no transcoding attempt in progress",
            ));
        };
        let attrs = handle.attrs().await.map_err(|e| {
            TranscodeError::invalid_operation(format!("engine attribute query failed: {e}"))
        })?;
        Ok(TranscodeProgress {
            position_ms: attrs.position_ms,
            duration_ms: attrs.duration_ms,
        })
    }

    /// Calls `callback` for each container format the engine supports.
    /// Returning `false` from the callback stops the enumeration.
    pub fn foreach_supported_file_format<F>(&self, mut callback: F) -> Result<(), TranscodeError>
    where
        F: FnMut(FileFormat) -> bool,
    {
        self.check_capability()?;
        let mut adapter = bridge::enumeration_adapter::<FileFormat, _>(&mut callback);
        self.engine
            .foreach_supported_file_format(&mut adapter)
            .map_err(TranscodeError::from)
    }

    /// Calls `callback` for each video codec the engine supports.
    /// Returning `false` from the callback stops the enumeration.
    pub fn foreach_supported_video_codec<F>(&self, mut callback: F) -> Result<(), TranscodeError>
    where
        F: FnMut(VideoCodec) -> bool,
    {
        self.check_capability()?;
        let mut adapter = bridge::enumeration_adapter::<VideoCodec, _>(&mut callback);
        self.engine
            .foreach_supported_video_encoder(&mut adapter)
            .map_err(TranscodeError::from)
    }

    /// Calls `callback` for each audio codec the engine supports.
    /// Returning `false` from the callback stops the enumeration.
    pub fn foreach_supported_audio_codec<F>(&self, mut callback: F) -> Result<(), TranscodeError>
    where
        F: FnMut(AudioCodec) -> bool,
    {
        self.check_capability()?;
        let mut adapter = bridge::enumeration_adapter::<AudioCodec, _>(&mut callback);
        self.engine
            .foreach_supported_audio_encoder(&mut adapter)
            .map_err(TranscodeError::from)
    }

    /// Tears the session down: destroys the engine handle and releases
    /// any active callback context without delivering it.
    ///
    /// Consuming `self` makes use-after-destroy unrepresentable. A handle
    /// destroy failure is reported, but the callback context is released
    /// regardless. Deliberately not gated on the capability provider, so
    /// teardown always works.
    pub async fn destroy(mut self) -> Result<(), TranscodeError> {
        debug!("destroying session");
        if self.attempt.abort() {
            debug!("active callback context released on teardown");
        }
        self.handle.invalidate().await
    }
}
