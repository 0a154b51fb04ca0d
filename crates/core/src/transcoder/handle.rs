//! Engine handle lifecycle management.
//!
//! Preparation is expensive (the engine may probe the source stream), so
//! the handle is created lazily on the first transcoding attempt. Any
//! mutation of the prepare-time fields after a handle exists must tear it
//! down first: stale prepared state would silently transcode with the old
//! parameters.

use tracing::{debug, error, warn};

use super::engine::{EngineBinding, EngineHandle, TranscodeEngine};
use super::error::TranscodeError;

/// Owns the at-most-one engine handle of a session.
#[derive(Default)]
pub(crate) struct HandleSlot {
    handle: Option<Box<dyn EngineHandle>>,
}

impl HandleSlot {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn exists(&self) -> bool {
        self.handle.is_some()
    }

    pub fn get(&self) -> Option<&dyn EngineHandle> {
        self.handle.as_deref()
    }

    pub fn get_mut(&mut self) -> Option<&mut Box<dyn EngineHandle>> {
        self.handle.as_mut()
    }

    /// Creates and prepares a handle if none exists.
    ///
    /// Creation and preparation can fail independently; a handle that was
    /// created but failed to prepare is destroyed before the error is
    /// returned, so no half-initialized handle is ever kept.
    pub async fn ensure(
        &mut self,
        engine: &dyn TranscodeEngine,
        binding: &EngineBinding,
    ) -> Result<(), TranscodeError> {
        if self.handle.is_some() {
            return Ok(());
        }

        let mut handle = engine.create().await?;
        if let Err(prepare_err) = handle.prepare(binding).await {
            if let Err(destroy_err) = handle.destroy().await {
                warn!(%destroy_err, "failed to destroy handle after prepare failure");
            }
            return Err(prepare_err.into());
        }

        debug!(
            path = %binding.input_path,
            format = ?binding.file_format,
            video_codec = ?binding.video_codec,
            audio_codec = ?binding.audio_codec,
            "engine handle prepared"
        );
        self.handle = Some(handle);
        Ok(())
    }

    /// Destroys the current handle if present and clears the slot.
    ///
    /// The slot is cleared even when destroy fails: a handle the engine
    /// refused to tear down must not be reachable for reuse.
    pub async fn invalidate(&mut self) -> Result<(), TranscodeError> {
        let Some(mut handle) = self.handle.take() else {
            return Ok(());
        };

        if let Err(e) = handle.destroy().await {
            error!(%e, "engine handle destroy failed");
            return Err(TranscodeError::invalid_operation(format!(
                "engine handle destroy failed: {e}"
            )));
        }

        debug!("engine handle destroyed");
        Ok(())
    }

    /// Whether a transcode is running. Reports "not busy" without engine
    /// interaction when no handle exists.
    pub async fn is_busy(&self) -> Result<bool, TranscodeError> {
        match &self.handle {
            Some(handle) => handle.is_busy().await.map_err(|e| {
                TranscodeError::invalid_operation(format!("engine busy query failed: {e}"))
            }),
            None => Ok(false),
        }
    }
}
