//! Typed DASH manifest tree.
//!
//! Only the subset of MPD needed for a single audio or video representation
//! is modelled. Each element owns exactly the children it may contain, so a
//! document cannot be assembled with the wrong nesting.

use std::fmt;

pub const MPD: &str = "MPD";
pub const PERIOD: &str = "Period";
pub const ADAPTATION_SET: &str = "AdaptationSet";
pub const ROLE: &str = "Role";
pub const REPRESENTATION: &str = "Representation";
pub const AUDIO_CHANNEL_CONFIGURATION: &str = "AudioChannelConfiguration";
pub const SEGMENT_TEMPLATE: &str = "SegmentTemplate";
pub const SEGMENT_TIMELINE: &str = "SegmentTimeline";
pub const SEGMENT: &str = "S";
pub const BASE_URL: &str = "BaseURL";
pub const SEGMENT_BASE: &str = "SegmentBase";
pub const INITIALIZATION: &str = "Initialization";

pub const XSI_NAMESPACE: &str = "http://www.w3.org/2001/XMLSchema-instance";
pub const MPD_NAMESPACE: &str = "urn:mpeg:DASH:schema:MPD:2011";
pub const MPD_SCHEMA_LOCATION: &str = "urn:mpeg:DASH:schema:MPD:2011 DASH-MPD.xsd";
pub const MIN_BUFFER_TIME: &str = "PT1.500S";
pub const PROFILE_FULL: &str = "urn:mpeg:dash:profile:full:2011";
pub const ROLE_SCHEME: &str = "urn:mpeg:DASH:role:2011";
pub const AUDIO_CHANNEL_CONFIGURATION_SCHEME: &str =
    "urn:mpeg:dash:23003:3:audio_channel_configuration:2011";

/// Root of a static, single-period manifest.
#[derive(Debug, Clone, PartialEq)]
pub struct Mpd {
    /// Presentation duration in milliseconds.
    pub media_presentation_duration_ms: i64,
    pub period: Period,
}

impl Mpd {
    /// The (single) representation of the document.
    pub fn representation(&self) -> &Representation {
        &self.period.adaptation_set.representation
    }

    pub fn representation_mut(&mut self) -> &mut Representation {
        &mut self.period.adaptation_set.representation
    }

    /// Attach segment addressing to the representation, replacing any
    /// previous addressing.
    pub fn with_addressing(mut self, addressing: SegmentAddressing) -> Self {
        self.representation_mut().addressing = Some(addressing);
        self
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Period {
    pub adaptation_set: AdaptationSet,
}

#[derive(Debug, Clone, PartialEq)]
pub struct AdaptationSet {
    pub mime_type: String,
    /// Only set for audio tracks with a known language.
    pub lang: Option<String>,
    pub role: Role,
    pub representation: Representation,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Role {
    pub value: RoleValue,
}

/// `value` of a `Role` element in the `urn:mpeg:DASH:role:2011` scheme.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoleValue {
    Main,
    Dub,
    Description,
    Alternate,
}

impl RoleValue {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Main => "main",
            Self::Dub => "dub",
            Self::Description => "description",
            Self::Alternate => "alternate",
        }
    }
}

impl fmt::Display for RoleValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Representation {
    pub id: u32,
    pub codecs: String,
    /// Bits per second.
    pub bandwidth: u32,
    pub media: MediaAttributes,
    pub addressing: Option<SegmentAddressing>,
}

/// Kind-specific attributes and children of a representation.
#[derive(Debug, Clone, PartialEq)]
pub enum MediaAttributes {
    /// `height` is written even when it is not positive.
    Video {
        width: Option<u32>,
        height: i32,
        frame_rate: Option<u32>,
    },
    Audio {
        sampling_rate: Option<u32>,
        channel_configuration: AudioChannelConfiguration,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AudioChannelConfiguration {
    pub channels: u32,
}

/// How the segments of a representation are located.
#[derive(Debug, Clone, PartialEq)]
pub enum SegmentAddressing {
    /// A single file with an index (progressive delivery).
    Base {
        base_url: String,
        segment_base: SegmentBase,
    },
    /// Numbered segments (OTF and post-live DVR delivery).
    Template(SegmentTemplate),
}

/// Inclusive byte range, rendered as `start-end`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ByteRange {
    pub start: u64,
    pub end: u64,
}

impl fmt::Display for ByteRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.start, self.end)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SegmentBase {
    pub index_range: ByteRange,
    pub initialization: Initialization,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Initialization {
    pub range: ByteRange,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SegmentTemplate {
    pub start_number: u32,
    pub timescale: u32,
    /// Absent for post-live DVR streams, which have no init segment.
    pub initialization: Option<String>,
    pub media: String,
    pub timeline: SegmentTimeline,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SegmentTimeline {
    pub segments: Vec<TimelineSegment>,
}

/// An `S` element: `repeat + 1` consecutive segments of `duration`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimelineSegment {
    pub duration: u64,
    pub repeat: Option<u64>,
}

impl TimelineSegment {
    /// A segment run; a zero repeat count is stored as absent.
    pub fn new(duration: u64, repeat: u64) -> Self {
        Self {
            duration,
            repeat: (repeat > 0).then_some(repeat),
        }
    }
}
