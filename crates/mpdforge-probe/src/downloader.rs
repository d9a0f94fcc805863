//! The HTTP capability consumed by the probe.
//!
//! Implementations perform blocking requests and report the final URL after
//! any transport-level redirects. Timeouts are the implementation's concern.

use std::collections::BTreeMap;

use mpdforge_common::Result;

/// Request headers as ordered name/value pairs.
pub type Headers = Vec<(String, String)>;

/// Blocking HTTP client used to probe streaming URLs.
pub trait Downloader: Send + Sync {
    /// Perform a `GET` request.
    fn get(&self, url: &str, headers: &Headers) -> Result<Response>;

    /// Perform a `POST` request with the given body.
    fn post(&self, url: &str, headers: &Headers, body: &[u8]) -> Result<Response>;
}

impl<D: Downloader + ?Sized> Downloader for &D {
    fn get(&self, url: &str, headers: &Headers) -> Result<Response> {
        (**self).get(url, headers)
    }

    fn post(&self, url: &str, headers: &Headers, body: &[u8]) -> Result<Response> {
        (**self).post(url, headers, body)
    }
}

/// A completed HTTP exchange.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Response {
    pub status: u16,
    headers: BTreeMap<String, Vec<String>>,
    pub body: String,
    /// URL of the last request made, after transport redirects.
    pub latest_url: String,
}

impl Response {
    pub fn new(status: u16, body: impl Into<String>, latest_url: impl Into<String>) -> Self {
        Self {
            status,
            headers: BTreeMap::new(),
            body: body.into(),
            latest_url: latest_url.into(),
        }
    }

    /// Append a header value. Names are stored lowercase.
    pub fn with_header(mut self, name: &str, value: impl Into<String>) -> Self {
        self.push_header(name, value);
        self
    }

    pub fn push_header(&mut self, name: &str, value: impl Into<String>) {
        self.headers
            .entry(name.to_ascii_lowercase())
            .or_default()
            .push(value.into());
    }

    /// First value of a header, matched case-insensitively.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .get(&name.to_ascii_lowercase())
            .and_then(|values| values.first())
            .map(String::as_str)
    }

    /// All values of a header, matched case-insensitively.
    pub fn header_values(&self, name: &str) -> &[String] {
        self.headers
            .get(&name.to_ascii_lowercase())
            .map(Vec::as_slice)
            .unwrap_or_default()
    }
}
