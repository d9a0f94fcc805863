//! Manifest skeleton assembly from a [`StreamDescriptor`].
//!
//! [`build_skeleton`] produces the part of the document shared by every
//! delivery type. The segment addressing is added afterwards with
//! [`segment_template`] or [`segment_base`]. Each step validates the
//! descriptor fields it needs and fails on the first invalid one.

use mpdforge_common::{AudioTrackType, DeliveryType, Error, Result, StreamDescriptor};

use crate::document::*;

/// Query parameter selecting the first (initialization) sequence.
pub const SQ_0: &str = "&sq=0";
/// Query parameter template for numbered segments.
pub const SQ_NUMBER: &str = "&sq=$Number$";
pub const TIMESCALE_MS: u32 = 1000;

/// Build MPD, Period, AdaptationSet, Role, Representation and, for audio,
/// AudioChannelConfiguration.
pub fn build_skeleton(descriptor: &StreamDescriptor, duration_ms: i64) -> Result<Mpd> {
    let (mime_type, lang) = adaptation_set_attributes(descriptor)?;
    let role = Role {
        value: role_value(descriptor.track_type),
    };
    let representation = representation(descriptor)?;

    tracing::trace!(
        id = representation.id,
        kind = %descriptor.kind,
        duration_ms,
        "Built manifest skeleton"
    );

    Ok(Mpd {
        media_presentation_duration_ms: duration_ms,
        period: Period {
            adaptation_set: AdaptationSet {
                mime_type,
                lang,
                role,
                representation,
            },
        },
    })
}

fn adaptation_set_attributes(descriptor: &StreamDescriptor) -> Result<(String, Option<String>)> {
    if descriptor.mime_type.is_empty() {
        return Err(Error::invalid_field(
            ADAPTATION_SET,
            "the mime type of the stream is empty",
        ));
    }

    let lang = if descriptor.is_audio() {
        descriptor
            .language
            .as_deref()
            .filter(|lang| !lang.is_empty())
            .map(str::to_string)
    } else {
        None
    };

    Ok((descriptor.mime_type.clone(), lang))
}

/// Map an audio track type to its DASH role.
pub fn role_value(track_type: Option<AudioTrackType>) -> RoleValue {
    match track_type {
        None | Some(AudioTrackType::Original) => RoleValue::Main,
        Some(AudioTrackType::Dubbed) => RoleValue::Dub,
        Some(AudioTrackType::Descriptive) => RoleValue::Description,
        Some(AudioTrackType::Secondary) => RoleValue::Alternate,
    }
}

fn representation(descriptor: &StreamDescriptor) -> Result<Representation> {
    if descriptor.id <= 0 {
        return Err(Error::invalid_field(
            REPRESENTATION,
            format!("the id of the stream is <= 0: {}", descriptor.id),
        ));
    }
    if descriptor.codec.is_empty() {
        return Err(Error::invalid_field(
            REPRESENTATION,
            "the codec of the stream is empty",
        ));
    }
    if descriptor.bitrate <= 0 {
        return Err(Error::invalid_field(
            REPRESENTATION,
            format!("the bitrate of the stream is <= 0: {}", descriptor.bitrate),
        ));
    }

    let media = if descriptor.is_audio() {
        MediaAttributes::Audio {
            sampling_rate: positive(descriptor.sample_rate),
            channel_configuration: audio_channel_configuration(descriptor)?,
        }
    } else {
        let width = positive(descriptor.width);
        if width.is_none() && descriptor.height <= 0 {
            return Err(Error::invalid_field(
                REPRESENTATION,
                "both width and height of the stream are <= 0",
            ));
        }
        MediaAttributes::Video {
            width,
            height: descriptor.height,
            frame_rate: positive(descriptor.fps),
        }
    };

    Ok(Representation {
        id: descriptor.id as u32,
        codecs: descriptor.codec.clone(),
        bandwidth: descriptor.bitrate as u32,
        media,
        addressing: None,
    })
}

fn audio_channel_configuration(descriptor: &StreamDescriptor) -> Result<AudioChannelConfiguration> {
    match positive(descriptor.audio_channels) {
        Some(channels) => Ok(AudioChannelConfiguration { channels }),
        None => Err(Error::invalid_field(
            AUDIO_CHANNEL_CONFIGURATION,
            format!(
                "the number of audio channels is <= 0: {}",
                descriptor.audio_channels
            ),
        )),
    }
}

fn positive(value: i32) -> Option<u32> {
    (value > 0).then_some(value as u32)
}

/// Segment template for sequence-based delivery.
///
/// OTF streams start at segment 1 and have an initialization segment at
/// `sq=0`; post-live DVR streams start at 0 and have none.
pub fn segment_template(
    base_url: &str,
    delivery: DeliveryType,
    timeline: SegmentTimeline,
) -> Result<SegmentTemplate> {
    let (start_number, initialization) = match delivery {
        DeliveryType::Otf => (1, Some(format!("{base_url}{SQ_0}"))),
        DeliveryType::Live => (0, None),
        DeliveryType::Progressive => {
            return Err(Error::invalid_field(
                SEGMENT_TEMPLATE,
                format!("invalid delivery type: {delivery}"),
            ))
        }
    };

    Ok(SegmentTemplate {
        start_number,
        timescale: TIMESCALE_MS,
        initialization,
        media: format!("{base_url}{SQ_NUMBER}"),
        timeline,
    })
}

/// `SegmentBase` with its `Initialization` child, from the descriptor's
/// index and init byte ranges.
pub fn segment_base(descriptor: &StreamDescriptor) -> Result<SegmentBase> {
    let index_range = byte_range(descriptor.index_start, descriptor.index_end).ok_or_else(|| {
        Error::invalid_field(
            SEGMENT_BASE,
            format!(
                "indexStart or indexEnd are < 0: {}-{}",
                descriptor.index_start, descriptor.index_end
            ),
        )
    })?;
    let init_range = byte_range(descriptor.init_start, descriptor.init_end).ok_or_else(|| {
        Error::invalid_field(
            INITIALIZATION,
            format!(
                "initStart and/or initEnd are/is < 0: {}-{}",
                descriptor.init_start, descriptor.init_end
            ),
        )
    })?;

    Ok(SegmentBase {
        index_range,
        initialization: Initialization { range: init_range },
    })
}

fn byte_range(start: i64, end: i64) -> Option<ByteRange> {
    if start < 0 || end < 0 {
        return None;
    }
    Some(ByteRange {
        start: start as u64,
        end: end as u64,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use mpdforge_common::StreamKind;

    fn video() -> StreamDescriptor {
        StreamDescriptor::video_only(137, "video/mp4", "avc1.640028", 4_000_000)
            .with_resolution(1920, 1080)
            .with_fps(30)
    }

    fn audio() -> StreamDescriptor {
        StreamDescriptor::audio(140, "audio/mp4", "mp4a.40.2", 130_000)
            .with_sample_rate(44_100)
            .with_audio_channels(2)
            .with_language("en")
    }

    fn invalid_element(result: Result<Mpd>) -> &'static str {
        match result {
            Err(Error::InvalidField { element, .. }) => element,
            other => panic!("expected InvalidField, got {other:?}"),
        }
    }

    #[test]
    fn video_skeleton() {
        let mpd = build_skeleton(&video(), 1000).unwrap();
        let set = &mpd.period.adaptation_set;
        assert_eq!(set.mime_type, "video/mp4");
        assert_eq!(set.lang, None);
        assert_eq!(set.role.value, RoleValue::Main);
        let rep = mpd.representation();
        assert_eq!(rep.id, 137);
        assert_eq!(rep.bandwidth, 4_000_000);
        assert_eq!(
            rep.media,
            MediaAttributes::Video {
                width: Some(1920),
                height: 1080,
                frame_rate: Some(30),
            }
        );
        assert!(rep.addressing.is_none());
    }

    #[test]
    fn audio_skeleton() {
        let mpd = build_skeleton(&audio(), 1000).unwrap();
        assert_eq!(mpd.period.adaptation_set.lang.as_deref(), Some("en"));
        assert_eq!(
            mpd.representation().media,
            MediaAttributes::Audio {
                sampling_rate: Some(44_100),
                channel_configuration: AudioChannelConfiguration { channels: 2 },
            }
        );
    }

    #[test]
    fn empty_language_is_omitted() {
        let mpd = build_skeleton(&audio().with_language(""), 1000).unwrap();
        assert_eq!(mpd.period.adaptation_set.lang, None);
    }

    #[test]
    fn language_ignored_for_video() {
        let mut d = video();
        d.language = Some("en".to_string());
        let mpd = build_skeleton(&d, 1000).unwrap();
        assert_eq!(mpd.period.adaptation_set.lang, None);
    }

    #[test]
    fn role_mapping() {
        assert_eq!(role_value(None), RoleValue::Main);
        assert_eq!(role_value(Some(AudioTrackType::Original)), RoleValue::Main);
        assert_eq!(role_value(Some(AudioTrackType::Dubbed)), RoleValue::Dub);
        assert_eq!(
            role_value(Some(AudioTrackType::Descriptive)),
            RoleValue::Description
        );
        assert_eq!(
            role_value(Some(AudioTrackType::Secondary)),
            RoleValue::Alternate
        );
    }

    #[test]
    fn rejects_empty_mime_type() {
        let mut d = video();
        d.mime_type.clear();
        assert_eq!(invalid_element(build_skeleton(&d, 0)), ADAPTATION_SET);
    }

    #[test]
    fn rejects_non_positive_id() {
        let mut d = video();
        d.id = 0;
        assert_eq!(invalid_element(build_skeleton(&d, 0)), REPRESENTATION);
    }

    #[test]
    fn rejects_empty_codec() {
        let mut d = audio();
        d.codec.clear();
        assert_eq!(invalid_element(build_skeleton(&d, 0)), REPRESENTATION);
    }

    #[test]
    fn rejects_non_positive_bitrate() {
        let mut d = audio();
        d.bitrate = -1;
        assert_eq!(invalid_element(build_skeleton(&d, 0)), REPRESENTATION);
    }

    #[test]
    fn rejects_video_without_dimensions() {
        let d = video().with_resolution(0, 0);
        assert_eq!(invalid_element(build_skeleton(&d, 0)), REPRESENTATION);

        let muxed = StreamDescriptor::new(18, StreamKind::Video, "video/mp4", "avc1", 500_000);
        assert_eq!(invalid_element(build_skeleton(&muxed, 0)), REPRESENTATION);
    }

    #[test]
    fn accepts_video_with_width_only() {
        let d = video().with_resolution(640, 0);
        let mpd = build_skeleton(&d, 0).unwrap();
        assert!(matches!(
            mpd.representation().media,
            MediaAttributes::Video {
                width: Some(640),
                height: 0,
                ..
            }
        ));

        let xml = crate::writer::write_mpd(&mpd).unwrap();
        assert!(xml.contains(r#"width="640" height="0" frameRate="30""#));
    }

    #[test]
    fn rejects_audio_without_channels() {
        let d = audio().with_audio_channels(0);
        assert_eq!(
            invalid_element(build_skeleton(&d, 0)),
            AUDIO_CHANNEL_CONFIGURATION
        );
    }

    #[test]
    fn mime_type_checked_before_representation() {
        let mut d = audio();
        d.mime_type.clear();
        d.id = -5;
        assert_eq!(invalid_element(build_skeleton(&d, 0)), ADAPTATION_SET);
    }

    #[test]
    fn otf_template() {
        let t = segment_template("https://h/v?a=1", DeliveryType::Otf, SegmentTimeline::default())
            .unwrap();
        assert_eq!(t.start_number, 1);
        assert_eq!(t.timescale, 1000);
        assert_eq!(t.initialization.as_deref(), Some("https://h/v?a=1&sq=0"));
        assert_eq!(t.media, "https://h/v?a=1&sq=$Number$");
    }

    #[test]
    fn live_template() {
        let t = segment_template("u", DeliveryType::Live, SegmentTimeline::default()).unwrap();
        assert_eq!(t.start_number, 0);
        assert_eq!(t.initialization, None);
        assert_eq!(t.media, "u&sq=$Number$");
    }

    #[test]
    fn progressive_template_rejected() {
        let err = segment_template("u", DeliveryType::Progressive, SegmentTimeline::default())
            .unwrap_err();
        assert!(matches!(
            err,
            Error::InvalidField {
                element: SEGMENT_TEMPLATE,
                ..
            }
        ));
    }

    #[test]
    fn segment_base_ranges() {
        let d = audio().with_index_range(632, 1135).with_init_range(0, 631);
        let base = segment_base(&d).unwrap();
        assert_eq!(base.index_range.to_string(), "632-1135");
        assert_eq!(base.initialization.range.to_string(), "0-631");
    }

    #[test]
    fn segment_base_rejects_negative_ranges() {
        let d = audio().with_index_range(-1, 10).with_init_range(0, 5);
        assert!(matches!(
            segment_base(&d),
            Err(Error::InvalidField {
                element: SEGMENT_BASE,
                ..
            })
        ));

        let d = audio().with_index_range(0, 10).with_init_range(0, -1);
        assert!(matches!(
            segment_base(&d),
            Err(Error::InvalidField {
                element: INITIALIZATION,
                ..
            })
        ));
    }
}
