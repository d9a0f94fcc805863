//! Blocking `reqwest` implementation of the probe's HTTP capability.

use mpdforge_common::{Error, Result};
use mpdforge_probe::{Downloader, Headers, Response};
use reqwest::blocking::{Client, RequestBuilder};
use std::time::Duration;

use crate::config::HttpConfig;

/// HTTP client backed by `reqwest::blocking`.
///
/// Transport-level redirects are followed by reqwest; the URL that finally
/// answered is reported as the response's latest URL.
#[derive(Debug, Clone)]
pub struct ReqwestDownloader {
    client: Client,
}

impl ReqwestDownloader {
    pub fn new(config: &HttpConfig) -> Self {
        let mut builder = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .connect_timeout(Duration::from_secs(config.connect_timeout_secs));
        if let Some(ref user_agent) = config.user_agent {
            builder = builder.user_agent(user_agent.clone());
        }

        let client = builder.build().unwrap_or_else(|e| {
            tracing::warn!("Failed to build HTTP client with timeouts: {}", e);
            Client::new()
        });

        Self { client }
    }

    /// Wrap an already configured client.
    pub fn with_client(client: Client) -> Self {
        Self { client }
    }

    fn execute(&self, method: &str, url: &str, request: RequestBuilder) -> Result<Response> {
        tracing::trace!(method, url, "Sending request");

        let resp = request
            .send()
            .map_err(|e| Error::transport(format!("{method} {url} failed"), e))?;

        let mut response = Response::new(resp.status().as_u16(), String::new(), resp.url().as_str());
        for (name, value) in resp.headers() {
            match value.to_str() {
                Ok(value) => response.push_header(name.as_str(), value),
                Err(_) => tracing::debug!(header = %name, "Skipping non-ASCII header value"),
            }
        }

        response.body = resp
            .text()
            .map_err(|e| Error::transport(format!("Failed to read the body of {url}"), e))?;

        tracing::debug!(
            method,
            status = response.status,
            latest_url = %response.latest_url,
            "Received response"
        );
        Ok(response)
    }
}

fn apply_headers(mut request: RequestBuilder, headers: &Headers) -> RequestBuilder {
    for (name, value) in headers {
        request = request.header(name.as_str(), value.as_str());
    }
    request
}

impl Downloader for ReqwestDownloader {
    fn get(&self, url: &str, headers: &Headers) -> Result<Response> {
        let request = apply_headers(self.client.get(url), headers);
        self.execute("GET", url, request)
    }

    fn post(&self, url: &str, headers: &Headers, body: &[u8]) -> Result<Response> {
        let request = apply_headers(self.client.post(url), headers).body(body.to_vec());
        self.execute("POST", url, request)
    }
}
