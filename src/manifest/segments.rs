//! Parsing of the `Segment-Durations-Ms` line OTF streams return in the body
//! of their first sequence.
//!
//! The line is a comma-separated list of runs: `<d>` is one segment of `d`
//! milliseconds, `<d>(r=<n>)` is `n + 1` of them.

use mpdforge_common::{Error, Result};
use mpdforge_mpd::{SegmentTimeline, TimelineSegment};

pub const SEGMENT_DURATIONS_MARKER: &str = "Segment-Durations-Ms: ";

const WHAT: &str = "segment durations";

/// One run of equally long segments.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SegmentRun {
    /// Duration of each segment in milliseconds.
    pub duration_ms: u64,
    /// Number of additional repetitions.
    pub repeat: u64,
}

impl SegmentRun {
    /// Total duration of the run, `None` on overflow.
    pub fn total_ms(&self) -> Option<u64> {
        self.repeat
            .checked_add(1)
            .and_then(|count| self.duration_ms.checked_mul(count))
    }
}

/// Extract and parse the segment runs from an initialization body.
pub fn parse_segment_durations(body: &str) -> Result<Vec<SegmentRun>> {
    let start = body
        .find(SEGMENT_DURATIONS_MARKER)
        .ok_or_else(|| Error::parse(WHAT, "no Segment-Durations-Ms line in the response body"))?;
    let rest = &body[start + SEGMENT_DURATIONS_MARKER.len()..];
    let line = rest.lines().next().unwrap_or_default();

    let mut tokens: Vec<&str> = line.split(',').map(str::trim).collect();
    if tokens.last().is_some_and(|t| t.is_empty()) {
        tokens.pop();
    }
    if tokens.is_empty() {
        return Err(Error::parse(WHAT, "the Segment-Durations-Ms line is empty"));
    }

    tokens.into_iter().map(parse_run).collect()
}

fn parse_run(token: &str) -> Result<SegmentRun> {
    let (duration, repeat) = match token.split_once("(r=") {
        Some((duration, tail)) => {
            let repeat = tail
                .strip_suffix(')')
                .ok_or_else(|| Error::parse(WHAT, format!("unterminated repeat in {token:?}")))?;
            (duration, Some(repeat))
        }
        None => (token, None),
    };

    let duration_ms = duration
        .parse::<u64>()
        .map_err(|e| Error::parse(WHAT, format!("{token:?}: {e}")))?;
    let repeat = match repeat {
        Some(repeat) => repeat
            .parse::<u64>()
            .map_err(|e| Error::parse(WHAT, format!("{token:?}: {e}")))?,
        None => 0,
    };

    Ok(SegmentRun {
        duration_ms,
        repeat,
    })
}

/// Sum of every run, `None` if it does not fit the manifest's duration type.
pub fn total_duration_ms(runs: &[SegmentRun]) -> Option<i64> {
    runs.iter()
        .try_fold(0u64, |sum, run| sum.checked_add(run.total_ms()?))
        .and_then(|total| i64::try_from(total).ok())
}

/// One `S` element per run.
pub fn timeline(runs: &[SegmentRun]) -> SegmentTimeline {
    SegmentTimeline {
        segments: runs
            .iter()
            .map(|run| TimelineSegment::new(run.duration_ms, run.repeat))
            .collect(),
    }
}
