//! mpdforge-mpd: typed DASH manifest tree, skeleton builder and XML writer.
//!
//! # Modules
//!
//! - [`document`] - The manifest element tree (MPD subset for one representation)
//! - [`builder`] - Skeleton assembly and segment addressing from a stream descriptor
//! - [`writer`] - Serialization of a tree to an XML string

pub mod builder;
pub mod document;
pub mod writer;

// Re-export commonly used items at the crate root.
pub use builder::{build_skeleton, role_value, segment_base, segment_template, SQ_0};
pub use document::{
    Mpd, RoleValue, SegmentAddressing, SegmentBase, SegmentTemplate, SegmentTimeline,
    TimelineSegment,
};
pub use writer::{format_duration, write_mpd};
