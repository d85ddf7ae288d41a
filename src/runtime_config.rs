// =============================================================================
// Runtime Configuration: service settings with atomic save
// =============================================================================
//
// Indicator parameters are fixed constants next to their calculators; only
// service-level knobs live here.
//
// Persistence uses an atomic tmp + rename pattern to prevent corruption on
// crash. All fields carry `#[serde(default)]` so that adding new fields
// never breaks loading an older config file.
// =============================================================================

use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::game::ScoringAnchor;

pub const DEFAULT_CONFIG_PATH: &str = "trendcast_config.json";

fn default_bind_addr() -> String {
    "0.0.0.0:3001".to_string()
}

fn default_symbols() -> Vec<String> {
    ["AAPL", "GOOGL", "MSFT", "AMZN", "TSLA", "META", "NFLX", "NVDA"]
        .iter()
        .map(|s| s.to_string())
        .collect()
}

fn default_max_sessions() -> usize {
    1000
}

/// Top-level configuration for the Trendcast service.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameConfig {
    /// Address the HTTP API listens on.
    #[serde(default = "default_bind_addr")]
    pub bind_addr: String,

    /// Symbols the presentation layer may draw rounds from.
    #[serde(default = "default_symbols")]
    pub symbols: Vec<String>,

    /// Live sessions kept in memory; the oldest is evicted beyond this.
    #[serde(default = "default_max_sessions")]
    pub max_sessions: usize,

    /// Score the final close-to-close move of the history instead of the
    /// last visible close against the revealed one.
    #[serde(default)]
    pub score_final_move: bool,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            bind_addr: default_bind_addr(),
            symbols: default_symbols(),
            max_sessions: default_max_sessions(),
            score_final_move: false,
        }
    }
}

impl GameConfig {
    pub fn scoring_anchor(&self) -> ScoringAnchor {
        if self.score_final_move {
            ScoringAnchor::FinalMove
        } else {
            ScoringAnchor::RevealPoint
        }
    }

    /// Load configuration from a JSON file at `path`.
    ///
    /// If the file does not exist, returns an error so the caller can fall
    /// back to defaults with a warning.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();

        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config from {}", path.display()))?;

        let config: Self = serde_json::from_str(&content)
            .with_context(|| format!("failed to parse config from {}", path.display()))?;

        info!(
            path = %path.display(),
            symbols = ?config.symbols,
            bind_addr = %config.bind_addr,
            "config loaded"
        );

        Ok(config)
    }

    /// Persist the configuration to `path` using an atomic write
    /// (write to `.tmp`, then rename).
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();

        let content =
            serde_json::to_string_pretty(self).context("failed to serialise config to JSON")?;

        let tmp_path = path.with_extension("json.tmp");

        std::fs::write(&tmp_path, &content)
            .with_context(|| format!("failed to write tmp config to {}", tmp_path.display()))?;

        std::fs::rename(&tmp_path, path)
            .with_context(|| format!("failed to rename tmp config to {}", path.display()))?;

        info!(path = %path.display(), "config saved (atomic)");
        Ok(())
    }
}
