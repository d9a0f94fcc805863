//! Shared test harness for integration tests.
//!
//! Provides [`ScriptedDownloader`], an in-memory [`Downloader`] replaying
//! canned responses in order and recording every request it receives.

#![allow(dead_code)]

use std::collections::VecDeque;

use mpdforge::{Downloader, Error, Headers, Response, Result, StreamDescriptor};
use parking_lot::Mutex;

#[derive(Debug, Clone)]
pub struct Request {
    pub method: &'static str,
    pub url: String,
    pub headers: Headers,
}

pub struct ScriptedDownloader {
    responses: Mutex<VecDeque<Response>>,
    requests: Mutex<Vec<Request>>,
}

impl ScriptedDownloader {
    pub fn new(responses: Vec<Response>) -> Self {
        Self {
            responses: Mutex::new(responses.into()),
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn empty() -> Self {
        Self::new(Vec::new())
    }

    pub fn request_count(&self) -> usize {
        self.requests.lock().len()
    }

    pub fn requests(&self) -> Vec<Request> {
        self.requests.lock().clone()
    }

    fn respond(&self, method: &'static str, url: &str, headers: &Headers) -> Result<Response> {
        self.requests.lock().push(Request {
            method,
            url: url.to_string(),
            headers: headers.clone(),
        });
        self.responses
            .lock()
            .pop_front()
            .ok_or_else(|| Error::transport("scripted downloader", "no response left"))
    }
}

impl Downloader for ScriptedDownloader {
    fn get(&self, url: &str, headers: &Headers) -> Result<Response> {
        self.respond("GET", url, headers)
    }

    fn post(&self, url: &str, headers: &Headers, _body: &[u8]) -> Result<Response> {
        self.respond("POST", url, headers)
    }
}

/// OTF first-sequence response carrying the given duration line.
pub fn otf_response(latest_url: &str, durations: &str) -> Response {
    Response::new(
        200,
        format!("Segment-Durations-Ms: {durations}\r\nSegment-Count: 5\r\n"),
        latest_url,
    )
    .with_header("Content-Type", "video/mp4")
}

/// Post-live first-sequence response with the two timing headers.
pub fn live_response(latest_url: &str, time_millis: &str, seqnum: &str) -> Response {
    Response::new(200, "", latest_url)
        .with_header("Content-Type", "video/mp4")
        .with_header("X-Head-Time-Millis", time_millis)
        .with_header("X-Head-Seqnum", seqnum)
}

pub fn video_descriptor() -> StreamDescriptor {
    StreamDescriptor::video_only(137, "video/mp4", "avc1.640028", 4_500_000)
        .with_resolution(1920, 1080)
        .with_fps(30)
}

pub fn audio_descriptor() -> StreamDescriptor {
    StreamDescriptor::audio(140, "audio/mp4", "mp4a.40.2", 130_000)
        .with_sample_rate(44_100)
        .with_audio_channels(2)
}

/// Number of non-overlapping occurrences of `needle`.
pub fn count(haystack: &str, needle: &str) -> usize {
    haystack.matches(needle).count()
}
