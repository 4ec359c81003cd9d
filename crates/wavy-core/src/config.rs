//! Player configuration.

use crate::error::Result;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// What `play` does for a song that is already playing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReplayPolicy {
    /// Re-use the song's existing tracks and record the requested layers.
    #[default]
    Merge,
    /// Log a warning and leave the song untouched.
    WarnAndIgnore,
}

/// Configuration for a `Player`.
///
/// Every field has a default, so a partial TOML document is valid:
///
/// ```toml
/// loop_lookahead = 0.5
/// replay_policy = "warn_and_ignore"
/// output_group = "Music"
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayerConfig {
    /// Seconds before the loop point at which the next cycle is scheduled (default: 1.0)
    pub loop_lookahead: f64,
    /// Initial global volume scale (default: 1.0)
    pub volume_scale: f32,
    /// Behaviour of `play` on an already-playing song (default: merge)
    pub replay_policy: ReplayPolicy,
    /// Tracks constructed when the player is built (default: 0)
    pub prewarm_tracks: usize,
    /// Output routing group passed to the device for every new voice (default: none)
    pub output_group: Option<String>,
}

impl Default for PlayerConfig {
    fn default() -> Self {
        Self {
            loop_lookahead: 1.0,
            volume_scale: 1.0,
            replay_policy: ReplayPolicy::Merge,
            prewarm_tracks: 0,
            output_group: None,
        }
    }
}

impl PlayerConfig {
    /// Parse a TOML document.
    pub fn from_toml_str(text: &str) -> Result<Self> {
        let config: Self = toml::from_str(text)?;
        Ok(config.sanitized())
    }

    /// Read and parse a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_toml_str(&text)
    }

    /// Lookahead clamped to a usable value.
    pub fn lookahead(&self) -> f64 {
        if self.loop_lookahead.is_finite() {
            self.loop_lookahead.max(0.0)
        } else {
            1.0
        }
    }

    fn sanitized(mut self) -> Self {
        self.loop_lookahead = self.lookahead();
        if !self.volume_scale.is_finite() {
            self.volume_scale = 1.0;
        }
        self
    }
}
