//! Mpdforge - on-demand DASH manifest synthesis
//!
//! Generates MPEG-DASH manifests for streams the platform serves without one:
//! OTF streams, ended livestreams in their DVR window and progressive files.
//! The HTTP side is abstracted behind [`mpdforge_probe::Downloader`]; a
//! blocking reqwest implementation lives in [`http`].

pub mod cache;
pub mod config;
pub mod creators;
pub mod http;
pub mod manifest;

pub use cache::ManifestCache;
pub use creators::ManifestCreators;
pub use http::ReqwestDownloader;

pub use mpdforge_common::{
    AudioTrackType, DeliveryType, Error, Result, StreamDescriptor, StreamKind,
};
pub use mpdforge_probe::{ClientProfile, Downloader, Headers, Response};
