//! XML serialization of a manifest tree.

use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::Writer;

use mpdforge_common::{Error, Result};

use crate::document::*;

/// Format a millisecond duration as an ISO-8601 `PT<seconds>S` value with
/// millisecond precision (e.g. `600000` -> `PT600.000S`).
pub fn format_duration(duration_ms: i64) -> String {
    format!("PT{:.3}S", duration_ms as f64 / 1000.0)
}

struct XmlWriter {
    inner: Writer<Vec<u8>>,
}

impl XmlWriter {
    fn new() -> Result<Self> {
        let mut w = Self {
            inner: Writer::new(Vec::new()),
        };
        w.write(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), Some("no"))))?;
        Ok(w)
    }

    fn write(&mut self, event: Event<'_>) -> Result<()> {
        self.inner
            .write_event(event)
            .map_err(|e| Error::serialization(format!("XML write error: {e}")))
    }

    fn element<'a>(name: &'a str, attrs: &[(&str, String)]) -> BytesStart<'a> {
        let mut element = BytesStart::new(name);
        for (key, value) in attrs {
            element.push_attribute((*key, value.as_str()));
        }
        element
    }

    fn open(&mut self, name: &str, attrs: &[(&str, String)]) -> Result<()> {
        self.write(Event::Start(Self::element(name, attrs)))
    }

    fn empty(&mut self, name: &str, attrs: &[(&str, String)]) -> Result<()> {
        self.write(Event::Empty(Self::element(name, attrs)))
    }

    fn text(&mut self, name: &str, text: &str) -> Result<()> {
        self.open(name, &[])?;
        self.write(Event::Text(BytesText::new(text)))?;
        self.close(name)
    }

    fn close(&mut self, name: &str) -> Result<()> {
        self.write(Event::End(BytesEnd::new(name)))
    }

    fn finish(self) -> Result<String> {
        String::from_utf8(self.inner.into_inner())
            .map_err(|e| Error::serialization(format!("UTF-8 error: {e}")))
    }
}

/// Serialize a manifest to a UTF-8 XML document string.
///
/// The output is unindented and starts with the XML declaration. Attribute
/// values and text are escaped, so URLs containing `&` are safe to embed.
pub fn write_mpd(mpd: &Mpd) -> Result<String> {
    let mut w = XmlWriter::new()?;

    w.open(
        MPD,
        &[
            ("xmlns:xsi", XSI_NAMESPACE.to_string()),
            ("xmlns", MPD_NAMESPACE.to_string()),
            ("xsi:schemaLocation", MPD_SCHEMA_LOCATION.to_string()),
            ("minBufferTime", MIN_BUFFER_TIME.to_string()),
            ("profiles", PROFILE_FULL.to_string()),
            ("type", "static".to_string()),
            (
                "mediaPresentationDuration",
                format_duration(mpd.media_presentation_duration_ms),
            ),
        ],
    )?;
    w.open(PERIOD, &[])?;
    write_adaptation_set(&mut w, &mpd.period.adaptation_set)?;
    w.close(PERIOD)?;
    w.close(MPD)?;

    w.finish()
}

fn write_adaptation_set(w: &mut XmlWriter, set: &AdaptationSet) -> Result<()> {
    let mut attrs = vec![("id", "0".to_string())];
    if let Some(ref lang) = set.lang {
        attrs.push(("lang", lang.clone()));
    }
    attrs.push(("mimeType", set.mime_type.clone()));
    attrs.push(("subsegmentAlignment", "true".to_string()));

    w.open(ADAPTATION_SET, &attrs)?;
    w.empty(
        ROLE,
        &[
            ("schemeIdUri", ROLE_SCHEME.to_string()),
            ("value", set.role.value.to_string()),
        ],
    )?;
    write_representation(w, &set.representation)?;
    w.close(ADAPTATION_SET)
}

fn write_representation(w: &mut XmlWriter, rep: &Representation) -> Result<()> {
    let mut attrs = vec![
        ("id", rep.id.to_string()),
        ("codecs", rep.codecs.clone()),
        ("startWithSAP", "1".to_string()),
        ("maxPlayoutRate", "1".to_string()),
        ("bandwidth", rep.bandwidth.to_string()),
    ];

    match rep.media {
        MediaAttributes::Video {
            width,
            height,
            frame_rate,
        } => {
            if let Some(width) = width {
                attrs.push(("width", width.to_string()));
            }
            attrs.push(("height", height.to_string()));
            if let Some(frame_rate) = frame_rate {
                attrs.push(("frameRate", frame_rate.to_string()));
            }
        }
        MediaAttributes::Audio { sampling_rate, .. } => {
            if let Some(rate) = sampling_rate {
                attrs.push(("audioSamplingRate", rate.to_string()));
            }
        }
    }

    w.open(REPRESENTATION, &attrs)?;

    if let MediaAttributes::Audio {
        channel_configuration,
        ..
    } = rep.media
    {
        w.empty(
            AUDIO_CHANNEL_CONFIGURATION,
            &[
                ("schemeIdUri", AUDIO_CHANNEL_CONFIGURATION_SCHEME.to_string()),
                ("value", channel_configuration.channels.to_string()),
            ],
        )?;
    }

    match rep.addressing {
        Some(SegmentAddressing::Base {
            ref base_url,
            ref segment_base,
        }) => {
            w.text(BASE_URL, base_url)?;
            w.open(
                SEGMENT_BASE,
                &[("indexRange", segment_base.index_range.to_string())],
            )?;
            w.empty(
                INITIALIZATION,
                &[("range", segment_base.initialization.range.to_string())],
            )?;
            w.close(SEGMENT_BASE)?;
        }
        Some(SegmentAddressing::Template(ref template)) => write_segment_template(w, template)?,
        None => {}
    }

    w.close(REPRESENTATION)
}

fn write_segment_template(w: &mut XmlWriter, template: &SegmentTemplate) -> Result<()> {
    let mut attrs = vec![
        ("startNumber", template.start_number.to_string()),
        ("timescale", template.timescale.to_string()),
    ];
    if let Some(ref init) = template.initialization {
        attrs.push(("initialization", init.clone()));
    }
    attrs.push(("media", template.media.clone()));

    w.open(SEGMENT_TEMPLATE, &attrs)?;
    w.open(SEGMENT_TIMELINE, &[])?;
    for segment in &template.timeline.segments {
        let mut s_attrs = vec![("d", segment.duration.to_string())];
        if let Some(repeat) = segment.repeat {
            s_attrs.push(("r", repeat.to_string()));
        }
        w.empty(SEGMENT, &s_attrs)?;
    }
    w.close(SEGMENT_TIMELINE)?;
    w.close(SEGMENT_TEMPLATE)
}
