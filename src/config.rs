// File: ./src/config.rs
// Handles configuration loading, saving, and defaults.
use crate::context::AppContext;
use crate::source::FeedFormat;
use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

fn default_grace_days() -> u32 {
    0
}
fn default_undated_window_days() -> u32 {
    3
}
fn default_recruitment_window_days() -> u32 {
    7
}

#[derive(Deserialize, Serialize, Clone, Debug)]
pub struct Config {
    /// The feed endpoint (a published sheet or equivalent tabular export).
    pub feed_url: String,

    /// Wire shape of the feed; `auto` sniffs the payload.
    #[serde(default)]
    pub feed_format: FeedFormat,

    /// Extra whole days a dated event stays listed past its end.
    #[serde(default = "default_grace_days")]
    pub grace_days: u32,

    /// Listing window for events that carry no date, from their creation
    /// stamp. Events with neither date nor stamp are never listed.
    #[serde(default = "default_undated_window_days")]
    pub undated_event_window_days: u32,

    /// Listing window for recruitments without an explicit deadline.
    #[serde(default = "default_recruitment_window_days")]
    pub recruitment_window_days: u32,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            feed_url: String::new(),
            feed_format: FeedFormat::Auto,
            // Match the serde defaults
            grace_days: 0,
            undated_event_window_days: 3,
            recruitment_window_days: 7,
        }
    }
}

impl Config {
    /// Load the configuration from disk using an explicit context.
    /// Returns a contextualized error if reading or parsing fails.
    pub fn load(ctx: &dyn AppContext) -> Result<Self> {
        let path = ctx.get_config_file_path()?;

        if !path.exists() {
            return Err(anyhow::anyhow!("Config file not found"));
        }

        let contents = fs::read_to_string(&path).map_err(|e| {
            anyhow::anyhow!("Failed to read config file '{}': {}", path.display(), e)
        })?;

        let config: Config = toml::from_str(&contents).map_err(|e| {
            anyhow::anyhow!("Failed to parse config file '{}': {}", path.display(), e)
        })?;

        Ok(config)
    }

    /// Save configuration using an explicit context.
    pub fn save(&self, ctx: &dyn AppContext) -> Result<()> {
        let path = ctx.get_config_file_path()?;
        let toml_str = toml::to_string_pretty(self)?;
        atomic_write(&path, toml_str)?;
        Ok(())
    }
}

/// Write via a temp file and rename so a crash never leaves a half-written
/// config behind.
fn atomic_write<P: AsRef<Path>, C: AsRef<[u8]>>(path: P, contents: C) -> Result<()> {
    let path = path.as_ref();
    let tmp_path = path.with_extension("tmp");
    fs::write(&tmp_path, contents)?;
    fs::rename(tmp_path, path)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::TestContext;

    #[test]
    fn save_and_reload_round_trip() {
        let ctx = TestContext::new();
        let mut config = Config::default();
        config.feed_url = "https://example.org/feed".to_string();
        config.grace_days = 1;
        config.save(&ctx).unwrap();

        let loaded = Config::load(&ctx).unwrap();
        assert_eq!(loaded.feed_url, "https://example.org/feed");
        assert_eq!(loaded.grace_days, 1);
        assert_eq!(loaded.recruitment_window_days, 7);
    }

    #[test]
    fn missing_file_is_an_explicit_error() {
        let ctx = TestContext::new();
        let err = Config::load(&ctx).unwrap_err();
        assert!(err.to_string().contains("not found"));
    }

    #[test]
    fn partial_toml_fills_defaults() {
        let ctx = TestContext::new();
        let path = ctx.get_config_file_path().unwrap();
        fs::write(&path, "feed_url = \"https://example.org/feed\"\n").unwrap();

        let loaded = Config::load(&ctx).unwrap();
        assert_eq!(loaded.feed_format, FeedFormat::Auto);
        assert_eq!(loaded.undated_event_window_days, 3);
    }
}
