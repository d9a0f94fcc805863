//! Streaming client families and the request headers they need.
//!
//! The platform embeds the requesting client in the streaming URL (`&c=...`).
//! Each family expects different request shapes when the URL is probed.

use serde::{Deserialize, Serialize};

use crate::downloader::Headers;

const C_WEB: &str = "&c=WEB";
const C_TVHTML5_SIMPLY_EMBEDDED_PLAYER: &str = "&c=TVHTML5_SIMPLY_EMBEDDED_PLAYER";
const C_ANDROID: &str = "&c=ANDROID";
const C_IOS: &str = "&c=IOS";

const YOUTUBE_ORIGIN: &str = "https://www.youtube.com";
const IOS_DEVICE_MODEL: &str = "iPhone15,4";

/// Client family a streaming URL was issued for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClientFamily {
    /// Desktop web or TV HTML5 embedded player.
    Html5,
    Android,
    Ios,
    /// Any other client; probed with a plain `GET`.
    Other,
}

impl ClientFamily {
    /// Detect the client family from a streaming URL.
    pub fn detect(url: &str) -> Self {
        if url.contains(C_WEB) || url.contains(C_TVHTML5_SIMPLY_EMBEDDED_PLAYER) {
            Self::Html5
        } else if url.contains(C_ANDROID) {
            Self::Android
        } else if url.contains(C_IOS) {
            Self::Ios
        } else {
            Self::Other
        }
    }

    pub fn is_mobile(self) -> bool {
        matches!(self, Self::Android | Self::Ios)
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::Html5 => "HTML5",
            Self::Android => "ANDROID",
            Self::Ios => "IOS",
            Self::Other => "other",
        }
    }
}

/// Versions and locale the spoofed clients identify themselves with.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientProfile {
    /// `X-YouTube-Client-Version` sent by HTML5 probes.
    pub web_client_version: String,
    pub android_client_version: String,
    pub ios_client_version: String,
    /// Country code embedded in mobile user agents.
    pub country_code: String,
}

impl Default for ClientProfile {
    fn default() -> Self {
        Self {
            web_client_version: "2.20231208.01.00".to_string(),
            android_client_version: "18.48.37".to_string(),
            ios_client_version: "18.48.3".to_string(),
            country_code: "US".to_string(),
        }
    }
}

impl ClientProfile {
    /// User agent of the Android app, spoofing an Android 14 device.
    pub fn android_user_agent(&self) -> String {
        format!(
            "com.google.android.youtube/{} (Linux; U; Android 14; {}) gzip",
            self.android_client_version, self.country_code
        )
    }

    /// User agent of the iOS app, spoofing an iPhone 15 on iOS 17.1.2.
    pub fn ios_user_agent(&self) -> String {
        format!(
            "com.google.ios.youtube/{}({}; U; CPU iOS 17_1_2 like Mac OS X; {})",
            self.ios_client_version, IOS_DEVICE_MODEL, self.country_code
        )
    }

    /// `Origin`, `Referer` and client identification headers of the web client.
    pub fn client_info_headers(&self) -> Headers {
        vec![
            ("Origin".to_string(), YOUTUBE_ORIGIN.to_string()),
            ("Referer".to_string(), YOUTUBE_ORIGIN.to_string()),
            ("X-YouTube-Client-Name".to_string(), "1".to_string()),
            (
                "X-YouTube-Client-Version".to_string(),
                self.web_client_version.clone(),
            ),
        ]
    }

    /// Headers for the single `POST` a mobile client probe makes.
    pub fn mobile_headers(&self, family: ClientFamily) -> Headers {
        let user_agent = match family {
            ClientFamily::Ios => self.ios_user_agent(),
            _ => self.android_user_agent(),
        };
        vec![("User-Agent".to_string(), user_agent)]
    }
}
