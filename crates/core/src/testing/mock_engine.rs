//! Mock transcoding engine for testing.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};

use async_trait::async_trait;

use crate::transcoder::{
    EngineAttrs, EngineBinding, EngineCompletionFn, EngineError, EngineHandle, EngineProgressFn,
    TranscodeEngine, TranscodeSpec,
};

/// The adapters the engine captured for the currently accepted job.
struct ActiveJob {
    on_progress: EngineProgressFn,
    on_completed: EngineCompletionFn,
}

#[derive(Default)]
struct Shared {
    busy: AtomicBool,
    creates: AtomicUsize,
    destroys: AtomicUsize,
    cancels: AtomicUsize,
    enumeration_visits: AtomicUsize,
    bindings: Mutex<Vec<EngineBinding>>,
    specs: Mutex<Vec<TranscodeSpec>>,
    active: Mutex<Option<ActiveJob>>,
    attrs: Mutex<EngineAttrs>,
    next_create_error: Mutex<Option<EngineError>>,
    next_prepare_error: Mutex<Option<EngineError>>,
    next_transcode_error: Mutex<Option<EngineError>>,
    next_cancel_error: Mutex<Option<EngineError>>,
    next_is_busy_error: Mutex<Option<EngineError>>,
    next_destroy_error: Mutex<Option<EngineError>>,
    next_attrs_error: Mutex<Option<EngineError>>,
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

/// Mock implementation of [`TranscodeEngine`].
///
/// Provides controllable behavior for testing:
/// - Records prepare bindings, transcode specs and lifecycle calls
/// - Injects errors into the next engine operation
/// - Scripts the busy flag and the position/duration attributes
/// - Lets the test fire progress/completion notifications manually,
///   standing in for the engine's own task
///
/// # Example
///
/// ```rust,ignore
/// use vidtrans_core::testing::MockEngine;
///
/// let engine = Arc::new(MockEngine::new());
/// let mut session = TranscodeSession::new(engine.clone(), capability);
///
/// session.set_file_path("/media/in.mp4").await?;
/// session.start(0, 0, "/media/out.mp4", None, completed).await?;
///
/// // Drive the asynchronous notification path from the test.
/// engine.fire_progress(1000, 5000);
/// engine.fire_completion(Ok(()));
/// ```
#[derive(Default)]
pub struct MockEngine {
    shared: Arc<Shared>,
    supported_formats: Vec<i32>,
    supported_video: Vec<i32>,
    supported_audio: Vec<i32>,
}

impl MockEngine {
    /// Creates a mock engine supporting every code in the public enums.
    pub fn new() -> Self {
        Self {
            shared: Arc::new(Shared::default()),
            supported_formats: vec![0, 1],
            supported_video: vec![0, 1, 2, 3],
            supported_audio: vec![0, 1, 2],
        }
    }

    /// Creates a mock engine advertising the given raw type codes.
    pub fn with_supported(formats: Vec<i32>, video: Vec<i32>, audio: Vec<i32>) -> Self {
        Self {
            shared: Arc::new(Shared::default()),
            supported_formats: formats,
            supported_video: video,
            supported_audio: audio,
        }
    }

    /// Scripts the busy flag returned by `is_busy`.
    pub fn set_busy(&self, busy: bool) {
        self.shared.busy.store(busy, Ordering::SeqCst);
    }

    /// Scripts the position/duration attributes.
    pub fn set_attrs(&self, position_ms: u64, duration_ms: u64) {
        *lock(&self.shared.attrs) = EngineAttrs {
            position_ms,
            duration_ms,
        };
    }

    pub fn fail_next_create(&self, error: EngineError) {
        *lock(&self.shared.next_create_error) = Some(error);
    }

    pub fn fail_next_prepare(&self, error: EngineError) {
        *lock(&self.shared.next_prepare_error) = Some(error);
    }

    pub fn fail_next_transcode(&self, error: EngineError) {
        *lock(&self.shared.next_transcode_error) = Some(error);
    }

    pub fn fail_next_cancel(&self, error: EngineError) {
        *lock(&self.shared.next_cancel_error) = Some(error);
    }

    pub fn fail_next_is_busy(&self, error: EngineError) {
        *lock(&self.shared.next_is_busy_error) = Some(error);
    }

    pub fn fail_next_destroy(&self, error: EngineError) {
        *lock(&self.shared.next_destroy_error) = Some(error);
    }

    pub fn fail_next_attrs(&self, error: EngineError) {
        *lock(&self.shared.next_attrs_error) = Some(error);
    }

    /// Fires a progress notification into the captured adapter, as the
    /// engine's own task would.
    pub fn fire_progress(&self, position_ms: u64, duration_ms: u64) {
        let guard = lock(&self.shared.active);
        if let Some(job) = guard.as_ref() {
            (job.on_progress)(position_ms, duration_ms);
        }
    }

    /// Fires the completion notification into the captured adapter and
    /// marks the job finished. No-op if no job was accepted.
    pub fn fire_completion(&self, result: Result<(), EngineError>) {
        let job = lock(&self.shared.active).take();
        if let Some(job) = job {
            self.shared.busy.store(false, Ordering::SeqCst);
            (job.on_completed)(result);
        }
    }

    pub fn create_count(&self) -> usize {
        self.shared.creates.load(Ordering::SeqCst)
    }

    pub fn destroy_count(&self) -> usize {
        self.shared.destroys.load(Ordering::SeqCst)
    }

    pub fn cancel_count(&self) -> usize {
        self.shared.cancels.load(Ordering::SeqCst)
    }

    /// Bindings recorded by `prepare`, oldest first.
    pub fn recorded_bindings(&self) -> Vec<EngineBinding> {
        lock(&self.shared.bindings).clone()
    }

    /// Specs recorded by `transcode`, oldest first.
    pub fn recorded_specs(&self) -> Vec<TranscodeSpec> {
        lock(&self.shared.specs).clone()
    }

    /// How many codes the most recent enumeration visited before the
    /// adapter stopped it.
    pub fn last_enumeration_visits(&self) -> usize {
        self.shared.enumeration_visits.load(Ordering::SeqCst)
    }

    fn enumerate(
        &self,
        codes: &[i32],
        visit: &mut dyn FnMut(i32) -> bool,
    ) -> Result<(), EngineError> {
        self.shared.enumeration_visits.store(0, Ordering::SeqCst);
        for &code in codes {
            self.shared.enumeration_visits.fetch_add(1, Ordering::SeqCst);
            if !visit(code) {
                break;
            }
        }
        Ok(())
    }
}

#[async_trait]
impl TranscodeEngine for MockEngine {
    async fn create(&self) -> Result<Box<dyn EngineHandle>, EngineError> {
        if let Some(error) = lock(&self.shared.next_create_error).take() {
            return Err(error);
        }
        self.shared.creates.fetch_add(1, Ordering::SeqCst);
        Ok(Box::new(MockHandle {
            shared: self.shared.clone(),
        }))
    }

    fn foreach_supported_file_format(
        &self,
        visit: &mut dyn FnMut(i32) -> bool,
    ) -> Result<(), EngineError> {
        self.enumerate(&self.supported_formats, visit)
    }

    fn foreach_supported_video_encoder(
        &self,
        visit: &mut dyn FnMut(i32) -> bool,
    ) -> Result<(), EngineError> {
        self.enumerate(&self.supported_video, visit)
    }

    fn foreach_supported_audio_encoder(
        &self,
        visit: &mut dyn FnMut(i32) -> bool,
    ) -> Result<(), EngineError> {
        self.enumerate(&self.supported_audio, visit)
    }
}

/// Handle produced by [`MockEngine::create`], sharing the engine's
/// scripted state.
struct MockHandle {
    shared: Arc<Shared>,
}

#[async_trait]
impl EngineHandle for MockHandle {
    async fn prepare(&mut self, binding: &EngineBinding) -> Result<(), EngineError> {
        if let Some(error) = lock(&self.shared.next_prepare_error).take() {
            return Err(error);
        }
        lock(&self.shared.bindings).push(binding.clone());
        Ok(())
    }

    async fn is_busy(&self) -> Result<bool, EngineError> {
        if let Some(error) = lock(&self.shared.next_is_busy_error).take() {
            return Err(error);
        }
        Ok(self.shared.busy.load(Ordering::SeqCst))
    }

    async fn transcode(
        &mut self,
        spec: TranscodeSpec,
        on_progress: EngineProgressFn,
        on_completed: EngineCompletionFn,
    ) -> Result<(), EngineError> {
        if let Some(error) = lock(&self.shared.next_transcode_error).take() {
            return Err(error);
        }
        lock(&self.shared.specs).push(spec);
        *lock(&self.shared.active) = Some(ActiveJob {
            on_progress,
            on_completed,
        });
        self.shared.busy.store(true, Ordering::SeqCst);
        Ok(())
    }

    async fn cancel(&mut self) -> Result<(), EngineError> {
        if let Some(error) = lock(&self.shared.next_cancel_error).take() {
            return Err(error);
        }
        self.shared.cancels.fetch_add(1, Ordering::SeqCst);
        self.shared.busy.store(false, Ordering::SeqCst);
        // The adapters stay captured: a notification that was already
        // queued can still be fired by the test after cancel.
        Ok(())
    }

    async fn attrs(&self) -> Result<EngineAttrs, EngineError> {
        if let Some(error) = lock(&self.shared.next_attrs_error).take() {
            return Err(error);
        }
        Ok(*lock(&self.shared.attrs))
    }

    async fn destroy(&mut self) -> Result<(), EngineError> {
        if let Some(error) = lock(&self.shared.next_destroy_error).take() {
            return Err(error);
        }
        self.shared.destroys.fetch_add(1, Ordering::SeqCst);
        self.shared.busy.store(false, Ordering::SeqCst);
        *lock(&self.shared.active) = None;
        Ok(())
    }
}
