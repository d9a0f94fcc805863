//! Manifests for ended livestreams still served through the DVR window.
//!
//! The first sequence answers with `X-Head-Time-Millis` (stream length) and
//! `X-Head-Seqnum` (last sequence number) headers. Segments are assumed to
//! all last the target duration.

use mpdforge_common::{DeliveryType, Error, Result, StreamDescriptor};
use mpdforge_mpd::document::SEGMENT_TEMPLATE;
use mpdforge_mpd::{
    build_skeleton, segment_template, SegmentAddressing, SegmentTimeline, TimelineSegment,
};
use mpdforge_probe::{initialize, ClientProfile, Downloader, Response};

use super::{cached, ensure_ok, serialize_and_cache};
use crate::cache::ManifestCache;

pub const X_HEAD_TIME_MILLIS: &str = "X-Head-Time-Millis";
pub const X_HEAD_SEQNUM: &str = "X-Head-Seqnum";

/// Generate the manifest of a post-live DVR stream.
///
/// `target_duration_sec` must be positive. An unparsable `X-Head-Time-Millis`
/// is replaced by `duration_seconds_fallback` as is, without conversion to
/// milliseconds.
pub fn from_post_live_stream_dvr_streaming_url<D: Downloader + ?Sized>(
    downloader: &D,
    profile: &ClientProfile,
    cache: &ManifestCache,
    post_live_stream_dvr_streaming_url: &str,
    descriptor: &StreamDescriptor,
    target_duration_sec: i32,
    duration_seconds_fallback: i64,
) -> Result<String> {
    if target_duration_sec <= 0 {
        return Err(Error::invalid_field(
            SEGMENT_TEMPLATE,
            format!("targetDurationSec value is <= 0: {target_duration_sec}"),
        ));
    }

    let url = post_live_stream_dvr_streaming_url;
    let delivery = DeliveryType::Live;
    if let Some(manifest) = cached(cache, url, delivery) {
        return Ok(manifest);
    }

    let init = initialize(downloader, profile, url, delivery)?;
    ensure_ok(&init.response)?;

    let duration_ms = stream_duration_ms(&init.response, duration_seconds_fallback)?;
    let segment_count = segment_count(&init.response)?;

    let segment_ms = u64::from(target_duration_sec.unsigned_abs()) * 1000;
    let timeline = SegmentTimeline {
        segments: vec![TimelineSegment::new(segment_ms, segment_count)],
    };
    let template = segment_template(&init.base_url, delivery, timeline)?;
    let mpd = build_skeleton(descriptor, duration_ms)?
        .with_addressing(SegmentAddressing::Template(template));

    serialize_and_cache(cache, url, &mpd, delivery)
}

fn stream_duration_ms(response: &Response, duration_seconds_fallback: i64) -> Result<i64> {
    let raw = response.header(X_HEAD_TIME_MILLIS).ok_or(Error::MissingHeader {
        header: X_HEAD_TIME_MILLIS,
    })?;

    Ok(raw.trim().parse::<i64>().unwrap_or_else(|_| {
        tracing::warn!(
            value = raw,
            fallback = duration_seconds_fallback,
            "Unparsable stream duration header, using fallback"
        );
        duration_seconds_fallback
    }))
}

fn segment_count(response: &Response) -> Result<u64> {
    let raw = response
        .header(X_HEAD_SEQNUM)
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .ok_or(Error::MissingHeader {
            header: X_HEAD_SEQNUM,
        })?;

    raw.parse::<u64>()
        .map_err(|e| Error::parse("segment count", format!("{X_HEAD_SEQNUM} {raw:?}: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    fn response() -> Response {
        Response::new(200, "", "https://h/v?id=1&sq=0&rn=0")
    }

    #[test]
    fn duration_header_parses() {
        let resp = response().with_header(X_HEAD_TIME_MILLIS, "600000");
        assert_eq!(stream_duration_ms(&resp, 42).unwrap(), 600_000);
    }

    #[test]
    fn unparsable_duration_uses_literal_fallback() {
        let resp = response().with_header(X_HEAD_TIME_MILLIS, "soon");
        assert_eq!(stream_duration_ms(&resp, 42).unwrap(), 42);
    }

    #[test]
    fn duration_header_is_required() {
        assert_matches!(
            stream_duration_ms(&response(), 42),
            Err(Error::MissingHeader {
                header: X_HEAD_TIME_MILLIS
            })
        );
    }

    #[test]
    fn seqnum_rules() {
        let resp = response().with_header(X_HEAD_SEQNUM, "120");
        assert_eq!(segment_count(&resp).unwrap(), 120);

        let resp = response().with_header(X_HEAD_SEQNUM, "");
        assert_matches!(segment_count(&resp), Err(Error::MissingHeader { .. }));

        let resp = response().with_header(X_HEAD_SEQNUM, "12a");
        assert_matches!(
            segment_count(&resp),
            Err(Error::Parse {
                what: "segment count",
                ..
            })
        );

        assert_matches!(segment_count(&response()), Err(Error::MissingHeader { .. }));
    }
}
