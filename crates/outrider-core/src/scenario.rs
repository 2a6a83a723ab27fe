//! Scenario configuration: wave definitions, tuning and arena geometry.
//!
//! Loaded once from JSON and passed to the simulation as immutable data.

use std::path::Path;

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::constants::DEFAULT_GROUND_Y;
use crate::enums::{EnemyArchetype, SpawnMode, SpawnSide};
use crate::error::ConfigError;
use crate::tuning::Tuning;
use crate::types::Aabb;

/// One spawn batch inside a wave.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpawnRequest {
    pub archetype: EnemyArchetype,
    pub count: u32,
    /// Seconds between consecutive spawns of this batch.
    pub spawn_interval: f32,
    pub side: SpawnSide,
    pub mode: SpawnMode,

    // --- Offscreen ---
    /// Extra world-space push beyond the viewport edge.
    pub offscreen_margin_x: f32,
    pub min_y_viewport: f32,
    pub max_y_viewport: f32,
    pub min_above_player_y: f32,
    pub max_below_top_world: f32,
    /// Depth lane relative to the player.
    pub z_offset: f32,
    pub z_random_range: f32,

    // --- FixedWorld ---
    pub fixed_world_position: Vec3,
    pub use_player_z: bool,
}

impl Default for SpawnRequest {
    fn default() -> Self {
        Self {
            archetype: EnemyArchetype::Drone,
            count: 1,
            spawn_interval: 0.5,
            side: SpawnSide::Random,
            mode: SpawnMode::Offscreen,
            offscreen_margin_x: 2.0,
            min_y_viewport: 0.55,
            max_y_viewport: 0.95,
            min_above_player_y: 0.0,
            max_below_top_world: 0.0,
            z_offset: 0.0,
            z_random_range: 0.0,
            fixed_world_position: Vec3::ZERO,
            use_player_z: true,
        }
    }
}

impl SpawnRequest {
    pub fn new(archetype: EnemyArchetype, count: u32) -> Self {
        Self {
            archetype,
            count,
            ..Default::default()
        }
    }

    pub fn from_side(mut self, side: SpawnSide) -> Self {
        self.side = side;
        self
    }

    pub fn every(mut self, interval: f32) -> Self {
        self.spawn_interval = interval;
        self
    }

    pub fn fixed_at(mut self, position: Vec3) -> Self {
        self.mode = SpawnMode::FixedWorld;
        self.fixed_world_position = position;
        self
    }
}

/// An ordered set of concurrent spawn batches.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WaveDefinition {
    pub start_delay: f32,
    /// Uniform jitter in `[-jitter, +jitter]` added to the start delay.
    pub start_delay_jitter: f32,
    pub enemies: Vec<SpawnRequest>,
}

impl WaveDefinition {
    pub fn new(start_delay: f32, enemies: Vec<SpawnRequest>) -> Self {
        Self {
            start_delay,
            start_delay_jitter: 0.0,
            enemies,
        }
    }

    pub fn total_enemies(&self) -> u32 {
        self.enemies.iter().map(|e| e.count).sum()
    }
}

/// Static environment geometry that projectiles and crashing enemies hit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ArenaConfig {
    pub ground_y: f32,
    pub obstacles: Vec<Aabb>,
}

impl Default for ArenaConfig {
    fn default() -> Self {
        Self {
            ground_y: DEFAULT_GROUND_Y,
            obstacles: Vec::new(),
        }
    }
}

/// A complete encounter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScenarioConfig {
    pub name: String,
    pub waves: Vec<WaveDefinition>,
    pub tuning: Tuning,
    pub arena: ArenaConfig,
    /// End the level this many seconds after it starts, if set.
    pub auto_end_after_secs: Option<f32>,
    /// End the level as soon as every wave is cleared.
    pub end_level_when_waves_complete: bool,
}

impl Default for ScenarioConfig {
    fn default() -> Self {
        Self {
            name: String::new(),
            waves: Vec::new(),
            tuning: Tuning::default(),
            arena: ArenaConfig::default(),
            auto_end_after_secs: None,
            end_level_when_waves_complete: true,
        }
    }
}

impl ScenarioConfig {
    pub fn new(name: impl Into<String>, waves: Vec<WaveDefinition>) -> Self {
        Self {
            name: name.into(),
            waves,
            ..Default::default()
        }
    }

    /// Parse and validate a scenario from JSON text.
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: ScenarioConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a scenario file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json_str(&text)
    }

    pub fn to_json_pretty(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn total_enemies(&self) -> u32 {
        self.waves.iter().map(WaveDefinition::total_enemies).sum()
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        for (wi, wave) in self.waves.iter().enumerate() {
            if !wave.start_delay.is_finite() || !wave.start_delay_jitter.is_finite() {
                return Err(ConfigError::invalid(format!("wave {wi}: start delay must be finite")));
            }
            if wave.start_delay_jitter < 0.0 {
                return Err(ConfigError::invalid(format!(
                    "wave {wi}: start_delay_jitter must be non-negative"
                )));
            }
            for (bi, batch) in wave.enemies.iter().enumerate() {
                let at = format!("wave {wi} batch {bi}");
                if batch.count == 0 {
                    return Err(ConfigError::invalid(format!("{at}: count must be at least 1")));
                }
                if !(batch.spawn_interval >= 0.0) {
                    return Err(ConfigError::invalid(format!(
                        "{at}: spawn_interval must be non-negative"
                    )));
                }
                let band = 0.0..=1.0;
                if !band.contains(&batch.min_y_viewport) || !band.contains(&batch.max_y_viewport) {
                    return Err(ConfigError::invalid(format!(
                        "{at}: viewport Y band must lie within [0, 1]"
                    )));
                }
                if batch.min_y_viewport > batch.max_y_viewport {
                    return Err(ConfigError::invalid(format!(
                        "{at}: min_y_viewport exceeds max_y_viewport"
                    )));
                }
                if batch.z_random_range < 0.0 || batch.offscreen_margin_x < 0.0 {
                    return Err(ConfigError::invalid(format!(
                        "{at}: margins and ranges must be non-negative"
                    )));
                }
            }
        }
        if let Some(secs) = self.auto_end_after_secs {
            if !(secs > 0.0) {
                return Err(ConfigError::invalid("auto_end_after_secs must be positive"));
            }
        }
        self.tuning.check().map_err(ConfigError::Invalid)
    }
}
