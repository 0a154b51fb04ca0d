//! Configuration seed for new sessions.

use serde::{Deserialize, Serialize};

use super::types::{AudioCodec, FileFormat, VideoCodec};

/// Initial field values for a [`super::TranscodeSession`].
///
/// Width, height and fps of 0 keep the source's values. The defaults
/// match a freshly created session.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionConfig {
    /// Target video codec.
    #[serde(default = "default_video_codec")]
    pub video_codec: VideoCodec,

    /// Target audio codec.
    #[serde(default = "default_audio_codec")]
    pub audio_codec: AudioCodec,

    /// Output container format.
    #[serde(default = "default_file_format")]
    pub file_format: FileFormat,

    /// Output width in pixels.
    #[serde(default)]
    pub width: i32,

    /// Output height in pixels.
    #[serde(default)]
    pub height: i32,

    /// Output frame rate.
    #[serde(default)]
    pub fps: i32,

    /// Frame-exact seeking for the start offset.
    #[serde(default)]
    pub accurate_mode: bool,
}

fn default_video_codec() -> VideoCodec {
    VideoCodec::Mpeg4
}

fn default_audio_codec() -> AudioCodec {
    AudioCodec::Aac
}

fn default_file_format() -> FileFormat {
    FileFormat::ThreeGp
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            video_codec: default_video_codec(),
            audio_codec: default_audio_codec(),
            file_format: default_file_format(),
            width: 0,
            height: 0,
            fps: 0,
            accurate_mode: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = SessionConfig::default();
        assert_eq!(config.video_codec, VideoCodec::Mpeg4);
        assert_eq!(config.audio_codec, AudioCodec::Aac);
        assert_eq!(config.file_format, FileFormat::ThreeGp);
        assert_eq!((config.width, config.height, config.fps), (0, 0, 0));
        assert!(!config.accurate_mode);
    }

    #[test]
    fn test_partial_deserialization_uses_defaults() {
        let config: SessionConfig =
            serde_json::from_str(r#"{"video_codec": "h264", "fps": 30}"#).unwrap();
        assert_eq!(config.video_codec, VideoCodec::H264);
        assert_eq!(config.fps, 30);
        assert_eq!(config.audio_codec, AudioCodec::Aac);
        assert_eq!(config.file_format, FileFormat::ThreeGp);
    }

    #[test]
    fn test_config_round_trip() {
        let config = SessionConfig {
            video_codec: VideoCodec::H264,
            audio_codec: AudioCodec::Aac,
            file_format: FileFormat::Mp4,
            width: 320,
            height: 240,
            fps: 15,
            accurate_mode: true,
        };
        let json = serde_json::to_string(&config).unwrap();
        let parsed: SessionConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.file_format, config.file_format);
        assert_eq!(parsed.width, config.width);
        assert!(parsed.accurate_mode);
    }
}
