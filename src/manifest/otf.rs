//! Manifests for OTF (on-the-fly) streams.
//!
//! The first sequence of an OTF stream carries a `Segment-Durations-Ms` line
//! listing the duration of every segment; it becomes the segment timeline.

use mpdforge_common::{DeliveryType, Result, StreamDescriptor};
use mpdforge_mpd::{build_skeleton, segment_template, SegmentAddressing};
use mpdforge_probe::{initialize, ClientProfile, Downloader};

use super::segments::{parse_segment_durations, timeline, total_duration_ms};
use super::{cached, ensure_ok, fallback_duration_ms, serialize_and_cache};
use crate::cache::ManifestCache;

/// Generate the manifest of an OTF stream.
///
/// The presentation duration is the sum of the segment durations; if that
/// sum overflows, `duration_seconds_fallback` seconds are used instead.
pub fn from_otf_streaming_url<D: Downloader + ?Sized>(
    downloader: &D,
    profile: &ClientProfile,
    cache: &ManifestCache,
    otf_base_streaming_url: &str,
    descriptor: &StreamDescriptor,
    duration_seconds_fallback: i64,
) -> Result<String> {
    let delivery = DeliveryType::Otf;
    if let Some(manifest) = cached(cache, otf_base_streaming_url, delivery) {
        return Ok(manifest);
    }

    let init = initialize(downloader, profile, otf_base_streaming_url, delivery)?;
    ensure_ok(&init.response)?;

    let runs = parse_segment_durations(&init.response.body)?;
    let duration_ms = total_duration_ms(&runs).unwrap_or_else(|| {
        tracing::warn!(
            fallback_secs = duration_seconds_fallback,
            "Segment durations overflow, using fallback duration"
        );
        fallback_duration_ms(duration_seconds_fallback)
    });

    let template = segment_template(&init.base_url, delivery, timeline(&runs))?;
    let mpd = build_skeleton(descriptor, duration_ms)?
        .with_addressing(SegmentAddressing::Template(template));

    serialize_and_cache(cache, otf_base_streaming_url, &mpd, delivery)
}
