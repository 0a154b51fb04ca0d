//! Callback bridge between the engine's notification path and the caller.
//!
//! The engine invokes progress/completion notifications from its own task.
//! The per-attempt callbacks live in a one-shot slot shared between the
//! session (which arms and aborts it) and the adapters handed to the
//! engine (which fire it). The slot guarantees the callbacks live for
//! exactly one transcoding attempt: released on completion delivery, on
//! cancel, or on session teardown, and never reused.

use std::sync::{Arc, Mutex, MutexGuard};

use tracing::{debug, warn};

use super::engine::{EngineCompletionFn, EngineError, EngineProgressFn};
use super::error::TranscodeError;

/// Progress callback supplied by the caller. Receives (position, duration)
/// in milliseconds.
pub type ProgressCallback = Box<dyn Fn(u64, u64) + Send + Sync + 'static>;

/// Completion callback supplied by the caller. Invoked at most once, with
/// the translated outcome of the attempt.
pub type CompletedCallback = Box<dyn FnOnce(Result<(), TranscodeError>) + Send + 'static>;

/// The caller's callbacks for one transcoding attempt.
pub struct CallbackContext {
    progress: Option<ProgressCallback>,
    completed: CompletedCallback,
}

impl CallbackContext {
    pub fn new(progress: Option<ProgressCallback>, completed: CompletedCallback) -> Self {
        Self {
            progress,
            completed,
        }
    }
}

/// One-shot owner of the active [`CallbackContext`].
///
/// Cloned into the adapters handed to the engine; whichever release path
/// runs first (completion, cancel, teardown) takes the context out, so the
/// other paths find the slot empty and do nothing.
#[derive(Clone, Default)]
pub struct AttemptSlot {
    inner: Arc<Mutex<Option<CallbackContext>>>,
}

impl AttemptSlot {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, Option<CallbackContext>> {
        self.inner
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Stores a fresh context. Only called after the busy check proved no
    /// attempt is outstanding.
    pub(crate) fn arm(&self, ctx: CallbackContext) {
        *self.lock() = Some(ctx);
    }

    /// Whether an attempt currently owns this slot.
    pub(crate) fn is_armed(&self) -> bool {
        self.lock().is_some()
    }

    /// Releases the context without invoking anything. Used by cancel and
    /// teardown; the completion callback is never delivered for an aborted
    /// attempt.
    pub(crate) fn abort(&self) -> bool {
        self.lock().take().is_some()
    }

    /// Forwards a progress notification to the caller, if a progress
    /// callback was supplied. Does not consume the context.
    pub(crate) fn on_progress(&self, position_ms: u64, duration_ms: u64) {
        let guard = self.lock();
        if let Some(cb) = guard.as_ref().and_then(|ctx| ctx.progress.as_ref()) {
            cb(position_ms, duration_ms);
        }
    }

    /// Delivers the completion notification and releases the context.
    ///
    /// This is the single normal-path release point. A completion arriving
    /// after cancel or teardown finds the slot empty and is suppressed.
    pub(crate) fn complete(&self, status: Result<(), EngineError>) {
        match self.lock().take() {
            Some(ctx) => (ctx.completed)(status.map_err(TranscodeError::from)),
            None => debug!("completion arrived after cancel or teardown, suppressed"),
        }
    }

    /// Builds the untyped progress adapter handed to the engine.
    pub(crate) fn progress_adapter(&self) -> EngineProgressFn {
        let slot = self.clone();
        Box::new(move |position_ms, duration_ms| slot.on_progress(position_ms, duration_ms))
    }

    /// Builds the untyped completion adapter handed to the engine.
    pub(crate) fn completion_adapter(&self) -> EngineCompletionFn {
        let slot = self.clone();
        Box::new(move |status| slot.complete(status))
    }
}

/// Wraps a typed enumeration callback in the untyped form the engine's
/// "foreach supported type" primitives take.
///
/// The engine owns the iteration: the caller's `false` propagates through
/// the adapter's return value to stop the loop. Codes the typed space
/// cannot represent are skipped, continuing the loop.
pub(crate) fn enumeration_adapter<T, F>(callback: &mut F) -> impl FnMut(i32) -> bool + '_
where
    T: TryFrom<i32>,
    F: FnMut(T) -> bool,
{
    move |code| match T::try_from(code) {
        Ok(value) => callback(value),
        Err(_) => {
            warn!(code, "engine reported an unknown type code, skipping");
            true
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transcoder::types::{FileFormat, VideoCodec};
    use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};

    fn counting_context(
        progress_hits: Arc<AtomicU64>,
        completions: Arc<AtomicUsize>,
    ) -> CallbackContext {
        CallbackContext::new(
            Some(Box::new(move |pos, _dur| {
                progress_hits.store(pos, Ordering::SeqCst);
            })),
            Box::new(move |_result| {
                completions.fetch_add(1, Ordering::SeqCst);
            }),
        )
    }

    #[test]
    fn test_progress_forwards_without_consuming() {
        let hits = Arc::new(AtomicU64::new(0));
        let completions = Arc::new(AtomicUsize::new(0));
        let slot = AttemptSlot::new();
        slot.arm(counting_context(hits.clone(), completions.clone()));

        slot.on_progress(1500, 5000);
        assert_eq!(hits.load(Ordering::SeqCst), 1500);
        assert!(slot.is_armed());

        slot.on_progress(2500, 5000);
        assert_eq!(hits.load(Ordering::SeqCst), 2500);
    }

    #[test]
    fn test_progress_is_optional() {
        let completions = Arc::new(AtomicUsize::new(0));
        let done = completions.clone();
        let slot = AttemptSlot::new();
        slot.arm(CallbackContext::new(
            None,
            Box::new(move |_| {
                done.fetch_add(1, Ordering::SeqCst);
            }),
        ));

        // No progress callback supplied: notification is a no-op.
        slot.on_progress(100, 200);
        assert!(slot.is_armed());
    }

    #[test]
    fn test_completion_releases_context() {
        let hits = Arc::new(AtomicU64::new(0));
        let completions = Arc::new(AtomicUsize::new(0));
        let slot = AttemptSlot::new();
        slot.arm(counting_context(hits, completions.clone()));

        slot.complete(Ok(()));
        assert_eq!(completions.load(Ordering::SeqCst), 1);
        assert!(!slot.is_armed());

        // A second completion finds the slot empty.
        slot.complete(Ok(()));
        assert_eq!(completions.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_completion_translates_engine_error() {
        let seen = Arc::new(Mutex::new(None));
        let sink = seen.clone();
        let slot = AttemptSlot::new();
        slot.arm(CallbackContext::new(
            None,
            Box::new(move |result| {
                *sink.lock().unwrap() = Some(result);
            }),
        ));

        slot.complete(Err(EngineError::InvalidArgument("bad spec".to_string())));

        let result = seen.lock().unwrap().take().unwrap();
        assert!(matches!(
            result,
            Err(TranscodeError::InvalidParameter { .. })
        ));
    }

    #[test]
    fn test_abort_suppresses_completion() {
        let hits = Arc::new(AtomicU64::new(0));
        let completions = Arc::new(AtomicUsize::new(0));
        let slot = AttemptSlot::new();
        slot.arm(counting_context(hits, completions.clone()));

        assert!(slot.abort());
        slot.complete(Ok(()));
        assert_eq!(completions.load(Ordering::SeqCst), 0);
        assert!(!slot.abort());
    }

    #[test]
    fn test_adapters_share_the_slot() {
        let hits = Arc::new(AtomicU64::new(0));
        let completions = Arc::new(AtomicUsize::new(0));
        let slot = AttemptSlot::new();
        slot.arm(counting_context(hits.clone(), completions.clone()));

        let on_progress = slot.progress_adapter();
        let on_completed = slot.completion_adapter();

        on_progress(42, 100);
        assert_eq!(hits.load(Ordering::SeqCst), 42);

        on_completed(Ok(()));
        assert_eq!(completions.load(Ordering::SeqCst), 1);
        assert!(!slot.is_armed());
    }

    #[test]
    fn test_enumeration_adapter_converts_and_propagates_stop() {
        let mut seen = Vec::new();
        let mut callback = |format: FileFormat| {
            seen.push(format);
            // Stop after the first entry.
            false
        };
        let mut adapter = enumeration_adapter::<FileFormat, _>(&mut callback);

        assert!(!adapter(0));
        drop(adapter);
        assert_eq!(seen, vec![FileFormat::ThreeGp]);
    }

    #[test]
    fn test_enumeration_adapter_skips_unknown_codes() {
        let mut seen = Vec::new();
        let mut callback = |codec: VideoCodec| {
            seen.push(codec);
            true
        };
        let mut adapter = enumeration_adapter::<VideoCodec, _>(&mut callback);

        // Unknown codes continue the loop without reaching the caller.
        assert!(adapter(99));
        assert!(adapter(2));
        drop(adapter);
        assert_eq!(seen, vec![VideoCodec::H264]);
    }
}
