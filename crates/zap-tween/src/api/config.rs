//! Configuration bundles for tweens, sequences and the manager.
//!
//! All bundles deserialize from JSON with every field optional.

use serde::{Deserialize, Serialize};

use crate::api::types::LoopType;
use crate::core::error::Result;
use crate::extensions::easing::{EaseShape, Easing};
use crate::extensions::overwrite::OverwriteConfig;

/// Settings shared by tweens and sequences.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlaybackConfig {
    /// Group id (non-unique).
    pub id: Option<String>,
    /// Integer group id (non-unique).
    pub int_id: Option<i32>,
    /// Number of loops; negative means infinite.
    pub loops: i32,
    pub loop_type: LoopType,
    /// Multiplier applied to incoming time deltas.
    pub time_scale: f32,
    /// Kill and drop the component once it completes.
    pub auto_kill: bool,
    pub enabled: bool,
    pub paused: bool,
}

impl Default for PlaybackConfig {
    fn default() -> Self {
        Self {
            id: None,
            int_id: None,
            loops: 1,
            loop_type: LoopType::Restart,
            time_scale: 1.0,
            auto_kill: true,
            enabled: true,
            paused: false,
        }
    }
}

/// Tween construction settings.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct TweenConfig {
    #[serde(flatten)]
    pub playback: PlaybackConfig,
    /// Seconds to wait before the first loop starts.
    pub delay: f32,
    pub easing: Easing,
    pub ease_shape: EaseShape,
    /// Animate from the configured values to the current ones.
    pub is_from: bool,
    /// Interpret the duration argument as a speed (units per second).
    pub speed_based: bool,
}

impl TweenConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse from a JSON string.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    // -- Builder methods --

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.playback.id = Some(id.into());
        self
    }

    pub fn with_int_id(mut self, int_id: i32) -> Self {
        self.playback.int_id = Some(int_id);
        self
    }

    pub fn with_loops(mut self, loops: i32, loop_type: LoopType) -> Self {
        self.playback.loops = loops;
        self.playback.loop_type = loop_type;
        self
    }

    pub fn with_delay(mut self, delay: f32) -> Self {
        self.delay = delay;
        self
    }

    pub fn with_easing(mut self, easing: Easing) -> Self {
        self.easing = easing;
        self
    }

    pub fn with_ease_shape(mut self, shape: EaseShape) -> Self {
        self.ease_shape = shape;
        self
    }

    pub fn with_time_scale(mut self, time_scale: f32) -> Self {
        self.playback.time_scale = time_scale;
        self
    }

    pub fn keep_on_complete(mut self) -> Self {
        self.playback.auto_kill = false;
        self
    }

    pub fn paused(mut self) -> Self {
        self.playback.paused = true;
        self
    }

    pub fn from(mut self) -> Self {
        self.is_from = true;
        self
    }

    pub fn speed_based(mut self) -> Self {
        self.speed_based = true;
        self
    }
}

/// Sequence construction settings. Sequences are always created paused.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SequenceConfig {
    #[serde(flatten)]
    pub playback: PlaybackConfig,
}

impl SequenceConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse from a JSON string.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.playback.id = Some(id.into());
        self
    }

    pub fn with_loops(mut self, loops: i32, loop_type: LoopType) -> Self {
        self.playback.loops = loops;
        self.playback.loop_type = loop_type;
        self
    }

    pub fn keep_on_complete(mut self) -> Self {
        self.playback.auto_kill = false;
        self
    }
}

/// Registry settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ManagerConfig {
    /// Global multiplier applied on top of each component's own time scale.
    pub time_scale: f32,
    pub overwrite: OverwriteConfig,
}

impl Default for ManagerConfig {
    fn default() -> Self {
        Self {
            time_scale: 1.0,
            overwrite: OverwriteConfig::default(),
        }
    }
}

impl ManagerConfig {
    /// Parse from a JSON string.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::error::TweenError;

    #[test]
    fn defaults_play_once_and_auto_kill() {
        let config = TweenConfig::default();
        assert_eq!(config.playback.loops, 1);
        assert!(config.playback.auto_kill);
        assert!(!config.playback.paused);
        assert_eq!(config.playback.time_scale, 1.0);
    }

    #[test]
    fn parse_partial_tween_config() {
        let json = r#"{
            "id": "intro",
            "loops": -1,
            "loop_type": "yoyo",
            "delay": 0.25,
            "easing": "back_out",
            "ease_shape": { "overshoot": 3.0 }
        }"#;
        let config = TweenConfig::from_json(json).unwrap();
        assert_eq!(config.playback.id.as_deref(), Some("intro"));
        assert_eq!(config.playback.loops, -1);
        assert_eq!(config.playback.loop_type, LoopType::Yoyo);
        assert_eq!(config.easing, Easing::BackOut);
        assert_eq!(config.ease_shape.overshoot, 3.0);
        assert_eq!(config.ease_shape.period, 0.0);
        assert!(config.playback.auto_kill);
    }

    #[test]
    fn bad_json_is_a_config_error() {
        let err = SequenceConfig::from_json("{ \"loops\": \"many\" }").unwrap_err();
        assert!(matches!(err, TweenError::Config(_)));
    }

    #[test]
    fn manager_config_enables_overwrite() {
        let config = ManagerConfig::from_json(r#"{ "overwrite": { "enabled": true } }"#).unwrap();
        assert!(config.overwrite.enabled);
        assert_eq!(config.time_scale, 1.0);
    }
}
