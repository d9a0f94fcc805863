//! Mpdforge-Common: shared types and errors.
//!
//! This crate provides the vocabulary used across mpdforge:
//!
//! - **Stream descriptors**: the per-representation technical metadata
//!   ([`StreamDescriptor`]) a manifest is generated from
//! - **Delivery types**: how a stream is served ([`DeliveryType`])
//! - **Error Handling**: the manifest creation error and result alias
//!
//! # Examples
//!
//! ```
//! use mpdforge_common::{AudioTrackType, DeliveryType, StreamDescriptor};
//!
//! let audio = StreamDescriptor::audio(140, "audio/mp4", "mp4a.40.2", 130_000)
//!     .with_sample_rate(44_100)
//!     .with_audio_channels(2)
//!     .with_track_type(AudioTrackType::Original);
//!
//! assert!(audio.is_audio());
//! assert!(DeliveryType::Otf.is_sequence_based());
//! ```

pub mod error;
pub mod types;

pub use error::{Error, Result};
pub use types::*;
