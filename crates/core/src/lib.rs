pub mod testing;
pub mod transcoder;

pub use transcoder::{
    AudioCodec, CapabilityProvider, FileFormat, SessionConfig, TranscodeEngine, TranscodeError,
    TranscodeProgress, TranscodeSession, VideoCodec,
};
