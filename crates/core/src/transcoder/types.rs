//! Types for the transcoder module.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Target video codec for a transcoding job.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VideoCodec {
    /// MPEG-4 Part 2
    Mpeg4,
    /// H.263
    H263,
    /// H.264 / AVC
    H264,
    /// Leave the video track as-is (no video transcoding)
    None,
}

impl VideoCodec {
    /// Returns the engine-native code for this codec.
    pub fn as_code(self) -> i32 {
        match self {
            Self::Mpeg4 => 0,
            Self::H263 => 1,
            Self::H264 => 2,
            Self::None => 3,
        }
    }
}

impl TryFrom<i32> for VideoCodec {
    type Error = UnknownTypeCode;

    fn try_from(code: i32) -> Result<Self, Self::Error> {
        match code {
            0 => Ok(Self::Mpeg4),
            1 => Ok(Self::H263),
            2 => Ok(Self::H264),
            3 => Ok(Self::None),
            _ => Err(UnknownTypeCode { code }),
        }
    }
}

/// Target audio codec for a transcoding job.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AudioCodec {
    /// Advanced Audio Coding
    Aac,
    /// AMR narrow-band
    AmrNb,
    /// Leave the audio track as-is (no audio transcoding)
    None,
}

impl AudioCodec {
    /// Returns the engine-native code for this codec.
    pub fn as_code(self) -> i32 {
        match self {
            Self::Aac => 0,
            Self::AmrNb => 1,
            Self::None => 2,
        }
    }
}

impl TryFrom<i32> for AudioCodec {
    type Error = UnknownTypeCode;

    fn try_from(code: i32) -> Result<Self, Self::Error> {
        match code {
            0 => Ok(Self::Aac),
            1 => Ok(Self::AmrNb),
            2 => Ok(Self::None),
            _ => Err(UnknownTypeCode { code }),
        }
    }
}

/// Output container format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FileFormat {
    /// 3GPP (.3gp)
    ThreeGp,
    /// MPEG-4 Part 14 (.mp4)
    Mp4,
}

impl FileFormat {
    /// Returns the engine-native code for this format.
    pub fn as_code(self) -> i32 {
        match self {
            Self::ThreeGp => 0,
            Self::Mp4 => 1,
        }
    }

    /// Returns the file extension for this container.
    pub fn extension(self) -> &'static str {
        match self {
            Self::ThreeGp => "3gp",
            Self::Mp4 => "mp4",
        }
    }
}

impl TryFrom<i32> for FileFormat {
    type Error = UnknownTypeCode;

    fn try_from(code: i32) -> Result<Self, Self::Error> {
        match code {
            0 => Ok(Self::ThreeGp),
            1 => Ok(Self::Mp4),
            _ => Err(UnknownTypeCode { code }),
        }
    }
}

/// Seek precision used when the job starts at a non-zero offset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SeekMode {
    /// Frame-exact decode-and-seek.
    Accurate,
    /// Seek to the nearest preceding keyframe.
    Nearest,
}

/// An engine-native type code that has no counterpart in the public enums.
#[derive(Debug, Clone, Copy, Error)]
#[error("unknown engine type code: {code}")]
pub struct UnknownTypeCode {
    pub code: i32,
}

/// Per-invocation parameters handed to the engine when a transcode starts.
///
/// Resolution, fps and seek mode are consumed here rather than baked into
/// the prepared engine handle.
#[derive(Debug, Clone)]
pub struct TranscodeSpec {
    /// Output width in pixels, 0 keeps the source width.
    pub width: i32,
    /// Output height in pixels, 0 keeps the source height.
    pub height: i32,
    /// Output frame rate, 0 keeps the source fps.
    pub fps: i32,
    /// Start offset in milliseconds.
    pub start_ms: u64,
    /// Duration in milliseconds, 0 transcodes to the end of the stream.
    pub duration_ms: u64,
    /// Seek precision for the start offset.
    pub seek_mode: SeekMode,
    /// Output file path.
    pub out_path: String,
}

/// A snapshot of how far a running transcode has progressed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TranscodeProgress {
    /// Current position in milliseconds.
    pub position_ms: u64,
    /// Total duration in milliseconds.
    pub duration_ms: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_video_codec_codes_round_trip() {
        for codec in [
            VideoCodec::Mpeg4,
            VideoCodec::H263,
            VideoCodec::H264,
            VideoCodec::None,
        ] {
            assert_eq!(VideoCodec::try_from(codec.as_code()).unwrap(), codec);
        }
    }

    #[test]
    fn test_video_codec_rejects_out_of_range() {
        assert!(VideoCodec::try_from(-1).is_err());
        assert!(VideoCodec::try_from(4).is_err());
    }

    #[test]
    fn test_audio_codec_codes_round_trip() {
        for codec in [AudioCodec::Aac, AudioCodec::AmrNb, AudioCodec::None] {
            assert_eq!(AudioCodec::try_from(codec.as_code()).unwrap(), codec);
        }
        assert!(AudioCodec::try_from(3).is_err());
    }

    #[test]
    fn test_file_format_codes() {
        assert_eq!(FileFormat::try_from(0).unwrap(), FileFormat::ThreeGp);
        assert_eq!(FileFormat::try_from(1).unwrap(), FileFormat::Mp4);
        // The upper sentinel is an exclusive bound, never valid itself.
        assert!(FileFormat::try_from(2).is_err());
        assert!(FileFormat::try_from(-1).is_err());
    }

    #[test]
    fn test_file_format_extension() {
        assert_eq!(FileFormat::ThreeGp.extension(), "3gp");
        assert_eq!(FileFormat::Mp4.extension(), "mp4");
    }

    #[test]
    fn test_enum_serialization() {
        let json = serde_json::to_string(&VideoCodec::H264).unwrap();
        assert_eq!(json, "\"h264\"");
        let parsed: FileFormat = serde_json::from_str("\"mp4\"").unwrap();
        assert_eq!(parsed, FileFormat::Mp4);
    }
}
