// config
use once_cell::sync::Lazy;
use std::collections::HashMap;
use std::env;
use std::time::Duration;
use tracing::{info, warn};

pub static CONFIG: Lazy<ConfigManager> =
    Lazy::new(|| ConfigManager::from_lookup(|key| env::var(key).ok()));

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum MODE {
    DEV,
    PROD,
}

pub struct ConfigManager {
    values: HashMap<String, String>,
}

impl ConfigManager {
    /// Builds the settings table; `lookup` stands in for the process environment.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut values: HashMap<String, String> = HashMap::new();
        let mode = match lookup("MODE") {
            Some(mode) if mode.to_lowercase() == "prod" => MODE::PROD,
            _ => MODE::DEV,
        };

        values.insert("HOST".to_string(), "0.0.0.0".to_string());
        values.insert("PORT".to_string(), "3000".to_string());
        values.insert("YTDLP_PATH".to_string(), "yt-dlp".to_string());
        values.insert("EXTRACTOR_TIMEOUT_SECS".to_string(), "60".to_string());
        values.insert("UPSTREAM_CONNECT_TIMEOUT_SECS".to_string(), "15".to_string());
        match mode {
            MODE::DEV => {
                values.insert("STATIC_DIR".to_string(), String::new());
            }
            MODE::PROD => {
                values.insert("STATIC_DIR".to_string(), "dist".to_string());
            }
        }

        for key in [
            "HOST",
            "PORT",
            "YTDLP_PATH",
            "EXTRACTOR_TIMEOUT_SECS",
            "UPSTREAM_CONNECT_TIMEOUT_SECS",
            "STATIC_DIR",
        ] {
            if let Some(value) = lookup(key) {
                values.insert(key.to_string(), value);
            }
        }

        // Log which keys are set, not their values
        let configured: Vec<&str> = values
            .iter()
            .filter(|(_, v)| !v.is_empty())
            .map(|(k, _)| k.as_str())
            .collect();
        info!("Config ({:?} mode) configured: {:?}", mode, configured);

        ConfigManager { values }
    }

    pub fn get(&self, key: &str) -> String {
        self.values.get(key).cloned().unwrap_or_default()
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.get("HOST"), self.get("PORT"))
    }

    pub fn extractor_timeout(&self) -> Duration {
        Duration::from_secs(self.get_u64("EXTRACTOR_TIMEOUT_SECS", 60))
    }

    pub fn upstream_connect_timeout(&self) -> Duration {
        Duration::from_secs(self.get_u64("UPSTREAM_CONNECT_TIMEOUT_SECS", 15))
    }

    /// `None` when static serving is disabled.
    pub fn static_dir(&self) -> Option<String> {
        let dir = self.get("STATIC_DIR");
        if dir.trim().is_empty() { None } else { Some(dir) }
    }

    fn get_u64(&self, key: &str, default: u64) -> u64 {
        let raw = self.get(key);
        match raw.trim().parse::<u64>() {
            Ok(v) => v,
            Err(_) => {
                warn!("{} has invalid value {:?}, using {}", key, raw, default);
                default
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config_from(pairs: &[(&str, &str)]) -> ConfigManager {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        ConfigManager::from_lookup(move |key| map.get(key).cloned())
    }

    #[test]
    fn dev_defaults() {
        let config = config_from(&[]);
        assert_eq!(config.bind_addr(), "0.0.0.0:3000");
        assert_eq!(config.get("YTDLP_PATH"), "yt-dlp");
        assert_eq!(config.extractor_timeout(), Duration::from_secs(60));
        assert_eq!(config.static_dir(), None);
    }

    #[test]
    fn prod_serves_dist_by_default() {
        let config = config_from(&[("MODE", "PROD")]);
        assert_eq!(config.static_dir(), Some("dist".to_string()));
    }

    #[test]
    fn environment_overrides_defaults() {
        let config = config_from(&[
            ("PORT", "8080"),
            ("HOST", "127.0.0.1"),
            ("UPSTREAM_CONNECT_TIMEOUT_SECS", "3"),
            ("STATIC_DIR", "public"),
        ]);
        assert_eq!(config.bind_addr(), "127.0.0.1:8080");
        assert_eq!(config.upstream_connect_timeout(), Duration::from_secs(3));
        assert_eq!(config.static_dir(), Some("public".to_string()));
    }

    #[test]
    fn invalid_timeout_falls_back() {
        let config = config_from(&[("EXTRACTOR_TIMEOUT_SECS", "soon")]);
        assert_eq!(config.extractor_timeout(), Duration::from_secs(60));
    }
}
