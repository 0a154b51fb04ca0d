//! Testing utilities and mock implementations.
//!
//! Mock implementations of the session's external collaborators, so the
//! state machine can be exercised without a real transcoding engine.
//!
//! # Example
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use vidtrans_core::testing::{MockCapability, MockEngine};
//! use vidtrans_core::transcoder::TranscodeSession;
//!
//! let engine = Arc::new(MockEngine::new());
//! let mut session =
//!     TranscodeSession::new(engine.clone(), Arc::new(MockCapability::available()));
//!
//! // Configure, start, then drive the notifications from the test.
//! engine.fire_completion(Ok(()));
//! ```

mod mock_capability;
mod mock_engine;

pub use mock_capability::MockCapability;
pub use mock_engine::MockEngine;
