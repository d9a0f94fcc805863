//! Session context tying the generators to their caches.

use mpdforge_common::{DeliveryType, Result, StreamDescriptor};
use mpdforge_probe::{ClientProfile, Downloader};

use crate::cache::ManifestCache;
use crate::config::{CacheConfig, Config};
use crate::manifest;

/// Owns the HTTP capability, the client profile and one cache per delivery
/// type. Share it by reference across threads.
pub struct ManifestCreators<D> {
    downloader: D,
    profile: ClientProfile,
    otf_cache: ManifestCache,
    post_live_cache: ManifestCache,
    progressive_cache: ManifestCache,
}

impl<D: Downloader> ManifestCreators<D> {
    /// Create a context with default client profile and unbounded caches.
    pub fn new(downloader: D) -> Self {
        Self {
            downloader,
            profile: ClientProfile::default(),
            otf_cache: ManifestCache::new(),
            post_live_cache: ManifestCache::new(),
            progressive_cache: ManifestCache::new(),
        }
    }

    /// Create a context configured from `[clients]` and `[cache]`.
    pub fn from_config(downloader: D, config: &Config) -> Result<Self> {
        Self::new(downloader)
            .with_profile(config.clients.clone())
            .with_cache_limits(&config.cache)
    }

    pub fn with_profile(mut self, profile: ClientProfile) -> Self {
        self.profile = profile;
        self
    }

    /// Apply the same limits to every cache.
    pub fn with_cache_limits(self, cache: &CacheConfig) -> Result<Self> {
        for c in self.caches() {
            c.set_clear_factor(cache.clear_factor)?;
            if let Some(max_entries) = cache.max_entries {
                c.set_maximum_size(max_entries)?;
            }
        }
        Ok(self)
    }

    pub fn profile(&self) -> &ClientProfile {
        &self.profile
    }

    pub fn otf_cache(&self) -> &ManifestCache {
        &self.otf_cache
    }

    pub fn post_live_cache(&self) -> &ManifestCache {
        &self.post_live_cache
    }

    pub fn progressive_cache(&self) -> &ManifestCache {
        &self.progressive_cache
    }

    /// The cache used for `delivery`.
    pub fn cache(&self, delivery: DeliveryType) -> &ManifestCache {
        match delivery {
            DeliveryType::Otf => &self.otf_cache,
            DeliveryType::Live => &self.post_live_cache,
            DeliveryType::Progressive => &self.progressive_cache,
        }
    }

    fn caches(&self) -> [&ManifestCache; 3] {
        [
            &self.otf_cache,
            &self.post_live_cache,
            &self.progressive_cache,
        ]
    }

    pub fn from_otf_streaming_url(
        &self,
        otf_base_streaming_url: &str,
        descriptor: &StreamDescriptor,
        duration_seconds_fallback: i64,
    ) -> Result<String> {
        manifest::from_otf_streaming_url(
            &self.downloader,
            &self.profile,
            &self.otf_cache,
            otf_base_streaming_url,
            descriptor,
            duration_seconds_fallback,
        )
    }

    pub fn from_post_live_stream_dvr_streaming_url(
        &self,
        post_live_stream_dvr_streaming_url: &str,
        descriptor: &StreamDescriptor,
        target_duration_sec: i32,
        duration_seconds_fallback: i64,
    ) -> Result<String> {
        manifest::from_post_live_stream_dvr_streaming_url(
            &self.downloader,
            &self.profile,
            &self.post_live_cache,
            post_live_stream_dvr_streaming_url,
            descriptor,
            target_duration_sec,
            duration_seconds_fallback,
        )
    }

    pub fn from_progressive_streaming_url(
        &self,
        progressive_streaming_base_url: &str,
        descriptor: &StreamDescriptor,
        duration_seconds_fallback: i64,
    ) -> Result<String> {
        manifest::from_progressive_streaming_url(
            &self.progressive_cache,
            progressive_streaming_base_url,
            descriptor,
            duration_seconds_fallback,
        )
    }

    /// Generate a manifest for any delivery type.
    ///
    /// `target_duration_sec` is only read for [`DeliveryType::Live`], where a
    /// missing value is rejected like a non-positive one.
    pub fn generate(
        &self,
        delivery: DeliveryType,
        base_url: &str,
        descriptor: &StreamDescriptor,
        duration_seconds_fallback: i64,
        target_duration_sec: Option<i32>,
    ) -> Result<String> {
        match delivery {
            DeliveryType::Otf => {
                self.from_otf_streaming_url(base_url, descriptor, duration_seconds_fallback)
            }
            DeliveryType::Live => self.from_post_live_stream_dvr_streaming_url(
                base_url,
                descriptor,
                target_duration_sec.unwrap_or(0),
                duration_seconds_fallback,
            ),
            DeliveryType::Progressive => {
                self.from_progressive_streaming_url(base_url, descriptor, duration_seconds_fallback)
            }
        }
    }
}
