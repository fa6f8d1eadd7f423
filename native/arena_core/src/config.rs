//! Path: native/arena_core/src/config.rs
//! Summary: シミュレーション設定（SimConfig）と JSON ロード・検証

use crate::constants::*;
use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

/// 設定のロード・検証で起きるエラー
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse config: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("invalid configuration: {0}")]
    Invalid(&'static str),
}

/// 経験的に調整された値はすべてここに集約する（ハードな不変条件ではない）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    pub map_width:               f32,
    pub map_height:              f32,
    pub grid_cell_size:          f32,
    pub lod_near_distance:       f32,
    pub lod_near_cadence:        u32,
    pub lod_far_cadence:         u32,
    pub contact_radius_factor:   f32,
    pub contact_push_force:      f32,
    pub player_invuln_frames:    u32,
    pub explosion_damage_window: u32,
    pub explosion_fade_frames:   u32,
    pub explosion_max_targets:   usize,
    pub max_particles:           usize,
    pub max_floating_texts:      usize,
    pub max_frame_events:        usize,
    pub skill_failsafe_frames:   u32,
    /// NaN 検出時にエンティティを戻す座標
    pub safe_position:           (f32, f32),
    pub frame_budget_ms:         f64,
    pub rng_seed:                u64,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            map_width:               MAP_WIDTH,
            map_height:              MAP_HEIGHT,
            grid_cell_size:          GRID_CELL_SIZE,
            lod_near_distance:       LOD_NEAR_DISTANCE,
            lod_near_cadence:        LOD_NEAR_CADENCE,
            lod_far_cadence:         LOD_FAR_CADENCE,
            contact_radius_factor:   CONTACT_RADIUS_FACTOR,
            contact_push_force:      CONTACT_PUSH_FORCE,
            player_invuln_frames:    PLAYER_INVULN_FRAMES,
            explosion_damage_window: EXPLOSION_DAMAGE_WINDOW,
            explosion_fade_frames:   EXPLOSION_FADE_FRAMES,
            explosion_max_targets:   EXPLOSION_MAX_TARGETS,
            max_particles:           MAX_PARTICLES,
            max_floating_texts:      MAX_FLOATING_TEXTS,
            max_frame_events:        MAX_FRAME_EVENTS,
            skill_failsafe_frames:   SKILL_FAILSAFE_FRAMES,
            safe_position:           (MAP_WIDTH / 2.0, MAP_HEIGHT / 2.0),
            frame_budget_ms:         FRAME_BUDGET_MS,
            rng_seed:                SIM_RNG_SEED,
        }
    }
}

impl SimConfig {
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json_str(&text)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.map_width > 0.0 && self.map_height > 0.0) {
            return Err(ConfigError::Invalid("map size must be positive"));
        }
        if !(self.grid_cell_size > 0.0) {
            return Err(ConfigError::Invalid("grid_cell_size must be positive"));
        }
        // 3x3 クエリで接触判定を取りこぼさないための下限
        if self.grid_cell_size < ENEMY_MAX_RADIUS + PLAYER_RADIUS {
            return Err(ConfigError::Invalid("grid_cell_size is smaller than the contact reach"));
        }
        if self.lod_near_cadence == 0 || self.lod_far_cadence == 0 {
            return Err(ConfigError::Invalid("LOD cadences must be at least 1"));
        }
        if self.explosion_damage_window == 0 {
            return Err(ConfigError::Invalid("explosion_damage_window must be at least 1"));
        }
        if self.explosion_max_targets == 0 {
            return Err(ConfigError::Invalid("explosion_max_targets must be at least 1"));
        }
        let (sx, sy) = self.safe_position;
        if !sx.is_finite() || !sy.is_finite() {
            return Err(ConfigError::Invalid("safe_position must be finite"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        assert!(SimConfig::default().validate().is_ok());
        assert_eq!(SimConfig::default().grid_cell_size, 400.0);
        assert_eq!(SimConfig::default().lod_far_cadence, 15);
    }

    #[test]
    fn partial_json_falls_back_to_defaults() {
        let config = SimConfig::from_json_str(r#"{ "lod_near_cadence": 4 }"#).unwrap();
        assert_eq!(config.lod_near_cadence, 4);
        assert_eq!(config.lod_far_cadence, LOD_FAR_CADENCE);
        assert_eq!(config.explosion_max_targets, EXPLOSION_MAX_TARGETS);
    }

    #[test]
    fn zero_cadence_is_rejected() {
        let err = SimConfig::from_json_str(r#"{ "lod_far_cadence": 0 }"#).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }

    #[test]
    fn malformed_json_is_a_parse_error() {
        let err = SimConfig::from_json_str("{ not json").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }
}
