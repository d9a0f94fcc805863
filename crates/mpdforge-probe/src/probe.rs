//! Initialization probing of streaming URLs.
//!
//! Before a sequence-based manifest can be generated, the first sequence of
//! the stream is requested: its body or headers carry the timing metadata,
//! and the URL that finally answered is the base URL segments are fetched
//! from. HTML5 clients may answer with a `text/plain` body holding the next
//! URL instead of the media, which is followed up to
//! [`MAXIMUM_REDIRECT_COUNT`] requests.

use mpdforge_common::{DeliveryType, Error, Result};

use crate::client::{ClientFamily, ClientProfile};
use crate::downloader::{Downloader, Headers, Response};

/// Upper bound on requests made while following body redirects.
pub const MAXIMUM_REDIRECT_COUNT: u32 = 20;

pub const SQ_0: &str = "&sq=0";
pub const RN_0: &str = "&rn=0";
pub const ALR_YES: &str = "&alr=yes";

const CONTENT_TYPE: &str = "Content-Type";
const TEXT_PLAIN: &str = "text/plain";

/// The terminal probe response and the base URL it resolved to.
#[derive(Debug, Clone)]
pub struct Initialization {
    pub response: Response,
    /// Latest URL of the response without the probe-only parameters.
    pub base_url: String,
}

/// Append the probe parameters a request for `delivery` needs.
///
/// HTML5 clients get `&alr=yes` so redirects come back as `text/plain`
/// bodies; sequence-based deliveries ask for `&sq=0`; every probe is marked
/// as the first request with `&rn=0`.
pub fn probe_url(base_url: &str, family: ClientFamily, delivery: DeliveryType) -> String {
    let mut url = String::with_capacity(base_url.len() + 24);
    url.push_str(base_url);
    if family == ClientFamily::Html5 {
        url.push_str(ALR_YES);
    }
    if delivery.is_sequence_based() {
        url.push_str(SQ_0);
    }
    url.push_str(RN_0);
    url
}

/// Remove every probe-only parameter from a URL.
///
/// This is a plain substring removal, so longer values sharing the prefix
/// are mangled too: `&sq=05` leaves a stray `5` and `&rn=01` a stray `1`.
pub fn strip_probe_params(url: &str) -> String {
    url.replace(SQ_0, "").replace(RN_0, "").replace(ALR_YES, "")
}

/// Probe `base_url` and resolve the base URL segments should be requested
/// from.
pub fn initialize<D: Downloader + ?Sized>(
    downloader: &D,
    profile: &ClientProfile,
    base_url: &str,
    delivery: DeliveryType,
) -> Result<Initialization> {
    let response = initialization_response(downloader, profile, base_url, delivery)?;
    let resolved = strip_probe_params(&response.latest_url);

    tracing::debug!(
        status = response.status,
        %delivery,
        resolved = %resolved,
        "Resolved initialization response"
    );

    Ok(Initialization {
        response,
        base_url: resolved,
    })
}

/// Fetch the initialization response with the strategy the URL's client
/// family requires.
pub fn initialization_response<D: Downloader + ?Sized>(
    downloader: &D,
    profile: &ClientProfile,
    base_url: &str,
    delivery: DeliveryType,
) -> Result<Response> {
    let family = ClientFamily::detect(base_url);
    let url = probe_url(base_url, family, delivery);

    tracing::debug!(client = family.name(), %delivery, "Probing streaming URL");

    match family {
        ClientFamily::Html5 => {
            follow_body_redirects(downloader, &url, &profile.client_info_headers())
        }
        ClientFamily::Android | ClientFamily::Ios => downloader
            .post(&url, &profile.mobile_headers(family), b"")
            .map_err(|e| {
                with_context(
                    e,
                    format!("Could not get the {} streaming URL response", family.name()),
                )
            }),
        ClientFamily::Other => downloader
            .get(&url, &Headers::new())
            .map_err(|e| with_context(e, "Could not get the streaming URL response")),
    }
}

/// Follow `text/plain` body redirects of an HTML5 streaming URL.
///
/// Every response must be a 200 with a `Content-Type` header. The first
/// response that is not `text/plain` is returned.
pub fn follow_body_redirects<D: Downloader + ?Sized>(
    downloader: &D,
    url: &str,
    headers: &Headers,
) -> Result<Response> {
    let mut next_url = url.to_string();

    for attempt in 1..=MAXIMUM_REDIRECT_COUNT {
        let response = downloader.get(&next_url, headers).map_err(|e| {
            with_context(e, "Could not get the streaming URL response of a HTML5 client")
        })?;

        if response.status != 200 {
            return Err(Error::HttpStatus {
                status: response.status,
            });
        }

        let content_type = response
            .header(CONTENT_TYPE)
            .ok_or(Error::MissingHeader {
                header: CONTENT_TYPE,
            })?;

        if content_type != TEXT_PLAIN {
            tracing::trace!(attempt, content_type, "Reached terminal streaming response");
            return Ok(response);
        }

        tracing::trace!(attempt, "Following text/plain redirect");
        next_url = response.body.trim().to_string();
    }

    tracing::warn!(
        limit = MAXIMUM_REDIRECT_COUNT,
        "Giving up on HTML5 streaming URL redirects"
    );
    Err(Error::TooManyRedirects {
        limit: MAXIMUM_REDIRECT_COUNT,
    })
}

fn with_context(err: Error, context: impl Into<String>) -> Error {
    match err {
        Error::Transport { source, .. } => Error::Transport {
            context: context.into(),
            source,
        },
        other => other,
    }
}
