//! mpdforge-probe: initialization probing of streaming URLs.
//!
//! This crate knows how to talk to the platform's streaming servers before a
//! manifest exists:
//!
//! - [`downloader`] - The blocking HTTP capability ([`Downloader`]) and its [`Response`]
//! - [`client`] - Client family detection and per-client request headers
//! - [`probe`] - First-sequence probing, body-redirect resolution and base URL cleanup
//!
//! No HTTP client is bundled; callers supply a [`Downloader`].

pub mod client;
pub mod downloader;
pub mod probe;

pub use client::{ClientFamily, ClientProfile};
pub use downloader::{Downloader, Headers, Response};
pub use probe::{initialize, Initialization, MAXIMUM_REDIRECT_COUNT};
