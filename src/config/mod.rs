mod types;

pub use types::*;

use anyhow::{Context, Result};
use std::path::Path;

/// Load configuration from a TOML file
pub fn load_config(path: &Path) -> Result<Config> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {:?}", path))?;

    let config: Config = toml::from_str(&content)
        .with_context(|| format!("Failed to parse config file: {:?}", path))?;

    validate_config(&config)?;

    Ok(config)
}

/// Load config from default locations or return default config
pub fn load_config_or_default(custom_path: Option<&Path>) -> Result<Config> {
    if let Some(path) = custom_path {
        return load_config(path);
    }

    let default_paths = [
        "./mpdforge.toml",
        "./config.toml",
        "~/.config/mpdforge/config.toml",
    ];

    for path_str in default_paths {
        let path = shellexpand::tilde(path_str);
        let path = Path::new(path.as_ref());
        if path.exists() {
            tracing::debug!("Using config file {:?}", path);
            return load_config(path);
        }
    }

    Ok(Config::default())
}

/// Validate configuration
pub fn validate_config(config: &Config) -> Result<()> {
    if config.http.timeout_secs == 0 {
        anyhow::bail!("HTTP timeout cannot be 0");
    }
    if config.http.connect_timeout_secs == 0 {
        anyhow::bail!("HTTP connect timeout cannot be 0");
    }

    if config.cache.max_entries == Some(0) {
        anyhow::bail!("Cache max_entries cannot be 0");
    }
    let factor = config.cache.clear_factor;
    if !(factor > 0.0 && factor < 1.0) {
        anyhow::bail!("Cache clear_factor must be between 0 and 1 (exclusive), got {factor}");
    }

    if config.clients.country_code.is_empty() {
        tracing::warn!("Client country code is empty");
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_config(content: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    #[test]
    fn empty_file_uses_defaults() {
        let file = write_config("");
        let config = load_config(file.path()).unwrap();
        assert_eq!(config.http.timeout_secs, 30);
        assert_eq!(config.http.connect_timeout_secs, 10);
        assert_eq!(config.cache.max_entries, None);
        assert_eq!(config.cache.clear_factor, 0.75);
        assert_eq!(config.clients, mpdforge_probe::ClientProfile::default());
    }

    #[test]
    fn sections_override_defaults() {
        let file = write_config(
            r#"
[http]
timeout_secs = 5

[cache]
max_entries = 100
clear_factor = 0.5

[clients]
country_code = "DE"
"#,
        );
        let config = load_config(file.path()).unwrap();
        assert_eq!(config.http.timeout_secs, 5);
        assert_eq!(config.http.connect_timeout_secs, 10);
        assert_eq!(config.cache.max_entries, Some(100));
        assert_eq!(config.cache.clear_factor, 0.5);
        assert_eq!(config.clients.country_code, "DE");
        assert_eq!(config.clients.android_client_version, "18.48.37");
    }

    #[test]
    fn rejects_invalid_values() {
        for content in [
            "[http]\ntimeout_secs = 0\n",
            "[http]\nconnect_timeout_secs = 0\n",
            "[cache]\nmax_entries = 0\n",
            "[cache]\nclear_factor = 1.0\n",
            "[cache]\nclear_factor = 0.0\n",
        ] {
            let file = write_config(content);
            assert!(load_config(file.path()).is_err(), "{content}");
        }
    }

    #[test]
    fn parse_errors_name_the_file() {
        let file = write_config("[http\n");
        let err = load_config(file.path()).unwrap_err();
        assert!(err.to_string().contains("Failed to parse config file"));
    }

    #[test]
    fn missing_explicit_path_fails() {
        assert!(load_config_or_default(Some(Path::new("/nonexistent/mpdforge.toml"))).is_err());
    }
}
