//! Manifests for progressive streams, addressed by byte ranges of one file.
//!
//! No request is made: everything comes from the descriptor.

use mpdforge_common::{DeliveryType, Error, Result, StreamDescriptor};
use mpdforge_mpd::document::MPD;
use mpdforge_mpd::{build_skeleton, segment_base, SegmentAddressing};

use super::{cached, fallback_duration_ms, serialize_and_cache};
use crate::cache::ManifestCache;

/// Generate the manifest of a progressive stream.
///
/// The descriptor's approximate duration is used when known, otherwise a
/// positive `duration_seconds_fallback`.
pub fn from_progressive_streaming_url(
    cache: &ManifestCache,
    progressive_streaming_base_url: &str,
    descriptor: &StreamDescriptor,
    duration_seconds_fallback: i64,
) -> Result<String> {
    let url = progressive_streaming_base_url;
    let delivery = DeliveryType::Progressive;
    if let Some(manifest) = cached(cache, url, delivery) {
        return Ok(manifest);
    }

    let duration_ms = match descriptor.approx_duration() {
        Some(duration_ms) => duration_ms,
        None if duration_seconds_fallback > 0 => fallback_duration_ms(duration_seconds_fallback),
        None => {
            return Err(Error::invalid_field(
                MPD,
                "the duration of the stream could not be determined and \
                 durationSecondsFallback is <= 0",
            ))
        }
    };

    let addressing = SegmentAddressing::Base {
        base_url: url.to_string(),
        segment_base: segment_base(descriptor)?,
    };
    let mpd = build_skeleton(descriptor, duration_ms)?.with_addressing(addressing);

    serialize_and_cache(cache, url, &mpd, delivery)
}
