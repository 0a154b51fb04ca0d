//! Session facade over a native video-transcoding engine.
//!
//! This module provides [`TranscodeSession`], a configurable transcoding
//! job object layered over an engine implementing [`TranscodeEngine`].
//! The session validates parameters, enforces legal state transitions,
//! manages the prepared engine handle's lifetime, and bridges the
//! engine's asynchronous progress/completion notifications back to the
//! caller.
//!
//! # Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use vidtrans_core::transcoder::{
//!     AudioCodec, FileFormat, TranscodeSession, VideoCodec,
//! };
//!
//! let mut session = TranscodeSession::new(engine, capability);
//!
//! session.set_file_path("/media/in.mp4").await?;
//! session.set_file_format(FileFormat::Mp4).await?;
//! session.set_video_codec(VideoCodec::H264).await?;
//! session.set_audio_codec(AudioCodec::Aac).await?;
//! session.set_resolution(320, 240)?;
//! session.set_fps(15)?;
//!
//! session
//!     .start(
//!         0,
//!         5000,
//!         "/media/out.mp4",
//!         Some(Box::new(|position, duration| {
//!             println!("{position}/{duration} ms");
//!         })),
//!         Box::new(|result| {
//!             println!("finished: {result:?}");
//!         }),
//!     )
//!     .await?;
//!
//! // ... later ...
//! session.cancel().await?;
//! session.destroy().await?;
//! ```

mod bridge;
mod capability;
mod config;
mod engine;
mod error;
mod handle;
mod session;
mod types;
mod validate;

pub use bridge::{CallbackContext, CompletedCallback, ProgressCallback};
pub use capability::{AlwaysAvailable, CapabilityError, CapabilityProvider};
pub use config::SessionConfig;
pub use engine::{
    EngineAttrs, EngineBinding, EngineCompletionFn, EngineError, EngineHandle, EngineProgressFn,
    TranscodeEngine,
};
pub use error::TranscodeError;
pub use session::TranscodeSession;
pub use types::{
    AudioCodec, FileFormat, SeekMode, TranscodeProgress, TranscodeSpec, UnknownTypeCode,
    VideoCodec,
};
pub use validate::{MAX_FPS, MIN_DURATION_MS, MIN_FPS, MIN_HEIGHT, MIN_WIDTH};
