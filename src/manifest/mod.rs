//! DASH manifest generators, one per delivery type.
//!
//! Every generator follows the same flow: look the URL up in its cache, gather
//! the timing metadata (probing the stream when the delivery type needs it),
//! build the document, serialize it and cache the result under the URL the
//! caller supplied.

pub mod otf;
pub mod post_live;
pub mod progressive;
pub mod segments;

pub use otf::from_otf_streaming_url;
pub use post_live::from_post_live_stream_dvr_streaming_url;
pub use progressive::from_progressive_streaming_url;

use mpdforge_common::{DeliveryType, Error, Result};
use mpdforge_mpd::{write_mpd, Mpd};
use mpdforge_probe::Response;

use crate::cache::ManifestCache;

fn cached(cache: &ManifestCache, url: &str, delivery: DeliveryType) -> Option<String> {
    let hit = cache.get(url);
    tracing::debug!(%delivery, hit = hit.is_some(), "Manifest cache lookup");
    hit
}

fn ensure_ok(response: &Response) -> Result<()> {
    if response.status != 200 {
        return Err(Error::HttpStatus {
            status: response.status,
        });
    }
    Ok(())
}

fn fallback_duration_ms(duration_seconds_fallback: i64) -> i64 {
    duration_seconds_fallback.saturating_mul(1000)
}

fn serialize_and_cache(
    cache: &ManifestCache,
    url: &str,
    mpd: &Mpd,
    delivery: DeliveryType,
) -> Result<String> {
    let manifest = write_mpd(mpd)?;
    cache.put(url, manifest.clone());

    tracing::info!(
        %delivery,
        id = mpd.representation().id,
        duration_ms = mpd.media_presentation_duration_ms,
        bytes = manifest.len(),
        "Generated DASH manifest"
    );
    Ok(manifest)
}
