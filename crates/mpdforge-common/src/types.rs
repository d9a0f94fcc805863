//! Stream descriptor and delivery type definitions.
//!
//! A [`StreamDescriptor`] is produced by a service-specific extractor and
//! consumed read-only by the manifest generators. Numeric fields are signed
//! on purpose: unknown values are encoded as [`UNKNOWN`] and out-of-range
//! values are rejected when the manifest is built, not when the descriptor
//! is deserialized.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::Error;

/// Sentinel for numeric descriptor fields whose value is not known.
pub const UNKNOWN: i64 = -1;

/// What a representation carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StreamKind {
    /// Audio only.
    Audio,
    /// Muxed video and audio.
    Video,
    /// Video without an audio track.
    VideoOnly,
}

impl fmt::Display for StreamKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Audio => write!(f, "audio"),
            Self::Video => write!(f, "video"),
            Self::VideoOnly => write!(f, "video_only"),
        }
    }
}

/// Role of an audio track relative to the original content.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AudioTrackType {
    /// The original language track.
    Original,
    /// A dubbed translation.
    Dubbed,
    /// An audio description track.
    Descriptive,
    /// Any other secondary track.
    Secondary,
}

impl fmt::Display for AudioTrackType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Original => write!(f, "original"),
            Self::Dubbed => write!(f, "dubbed"),
            Self::Descriptive => write!(f, "descriptive"),
            Self::Secondary => write!(f, "secondary"),
        }
    }
}

/// How the platform serves a stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeliveryType {
    /// A single file fetched with byte-range requests.
    Progressive,
    /// On-the-fly sequence-numbered segments.
    Otf,
    /// An ended livestream still served through sequence numbers.
    Live,
}

impl DeliveryType {
    /// Whether segments are addressed by sequence number (`&sq=`).
    pub fn is_sequence_based(self) -> bool {
        matches!(self, Self::Otf | Self::Live)
    }
}

impl fmt::Display for DeliveryType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Progressive => write!(f, "progressive"),
            Self::Otf => write!(f, "otf"),
            Self::Live => write!(f, "live"),
        }
    }
}

impl FromStr for DeliveryType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "progressive" => Ok(Self::Progressive),
            "otf" => Ok(Self::Otf),
            "live" | "post-live" | "post_live_dvr" => Ok(Self::Live),
            other => Err(Error::validation(format!("unknown delivery type: {other}"))),
        }
    }
}

/// Technical metadata of one representation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StreamDescriptor {
    /// Representation identifier (itag); must be > 0.
    pub id: i32,
    /// Audio, video or video-only.
    pub kind: StreamKind,
    /// Codec string, e.g. `avc1.64001F` or `opus`.
    pub codec: String,
    /// Container mime type, e.g. `video/mp4`.
    pub mime_type: String,
    /// Bitrate in bits per second.
    pub bitrate: i32,
    /// Frame width in pixels, 0 when unknown.
    #[serde(default)]
    pub width: i32,
    /// Frame height in pixels, 0 when unknown. Written to the manifest as is.
    #[serde(default)]
    pub height: i32,
    /// Frames per second, [`UNKNOWN`] when not applicable.
    #[serde(default = "unknown_i32")]
    pub fps: i32,
    /// Audio sample rate in Hz, [`UNKNOWN`] when not applicable.
    #[serde(default = "unknown_i32")]
    pub sample_rate: i32,
    /// Number of audio channels, [`UNKNOWN`] when not applicable.
    #[serde(default = "unknown_i32")]
    pub audio_channels: i32,
    /// Language tag of an audio track (e.g. `en`).
    #[serde(default)]
    pub language: Option<String>,
    /// Audio track role; `None` maps to `main`.
    #[serde(default)]
    pub track_type: Option<AudioTrackType>,
    /// First byte of the `sidx` index box. Progressive streams only.
    #[serde(default)]
    pub index_start: i64,
    /// Last byte of the index, inclusive.
    #[serde(default)]
    pub index_end: i64,
    /// First byte of the initialization segment.
    #[serde(default)]
    pub init_start: i64,
    /// Last byte of the initialization segment, inclusive.
    #[serde(default)]
    pub init_end: i64,
    /// Approximate duration in milliseconds, [`UNKNOWN`] if not known.
    #[serde(default = "unknown_i64")]
    pub approx_duration_ms: i64,
}

fn unknown_i32() -> i32 {
    UNKNOWN as i32
}

fn unknown_i64() -> i64 {
    UNKNOWN
}

impl StreamDescriptor {
    /// Create a descriptor with every optional field unknown.
    pub fn new(
        id: i32,
        kind: StreamKind,
        mime_type: impl Into<String>,
        codec: impl Into<String>,
        bitrate: i32,
    ) -> Self {
        Self {
            id,
            kind,
            codec: codec.into(),
            mime_type: mime_type.into(),
            bitrate,
            width: 0,
            height: 0,
            fps: unknown_i32(),
            sample_rate: unknown_i32(),
            audio_channels: unknown_i32(),
            language: None,
            track_type: None,
            index_start: 0,
            index_end: 0,
            init_start: 0,
            init_end: 0,
            approx_duration_ms: UNKNOWN,
        }
    }

    /// Shorthand for an audio descriptor.
    pub fn audio(
        id: i32,
        mime_type: impl Into<String>,
        codec: impl Into<String>,
        bitrate: i32,
    ) -> Self {
        Self::new(id, StreamKind::Audio, mime_type, codec, bitrate)
    }

    /// Shorthand for a video-only descriptor.
    pub fn video_only(
        id: i32,
        mime_type: impl Into<String>,
        codec: impl Into<String>,
        bitrate: i32,
    ) -> Self {
        Self::new(id, StreamKind::VideoOnly, mime_type, codec, bitrate)
    }

    /// Set the frame size in pixels.
    pub fn with_resolution(mut self, width: i32, height: i32) -> Self {
        self.width = width;
        self.height = height;
        self
    }

    /// Set the frame rate.
    pub fn with_fps(mut self, fps: i32) -> Self {
        self.fps = fps;
        self
    }

    /// Set the audio sample rate in Hz.
    pub fn with_sample_rate(mut self, sample_rate: i32) -> Self {
        self.sample_rate = sample_rate;
        self
    }

    /// Set the audio channel count.
    pub fn with_audio_channels(mut self, audio_channels: i32) -> Self {
        self.audio_channels = audio_channels;
        self
    }

    /// Set the audio language tag.
    pub fn with_language(mut self, language: impl Into<String>) -> Self {
        self.language = Some(language.into());
        self
    }

    /// Set the audio track role.
    pub fn with_track_type(mut self, track_type: AudioTrackType) -> Self {
        self.track_type = Some(track_type);
        self
    }

    /// Set the `sidx` index byte range (inclusive).
    pub fn with_index_range(mut self, start: i64, end: i64) -> Self {
        self.index_start = start;
        self.index_end = end;
        self
    }

    /// Set the initialization segment byte range (inclusive).
    pub fn with_init_range(mut self, start: i64, end: i64) -> Self {
        self.init_start = start;
        self.init_end = end;
        self
    }

    /// Set the approximate duration; pass [`UNKNOWN`] to clear it.
    pub fn with_approx_duration_ms(mut self, approx_duration_ms: i64) -> Self {
        self.approx_duration_ms = approx_duration_ms;
        self
    }

    pub fn is_audio(&self) -> bool {
        self.kind == StreamKind::Audio
    }

    pub fn is_video(&self) -> bool {
        matches!(self.kind, StreamKind::Video | StreamKind::VideoOnly)
    }

    /// Approximate duration, or `None` when it is the [`UNKNOWN`] sentinel.
    pub fn approx_duration(&self) -> Option<i64> {
        (self.approx_duration_ms != UNKNOWN).then_some(self.approx_duration_ms)
    }
}
