//! Built-in scenarios: hardcoded wave schedules for quick runs and tests.
//!
//! Scenario files loaded through `ScenarioConfig::load` take the same shape.

use std::fmt;
use std::str::FromStr;

use glam::Vec3;

use outrider_core::enums::{EnemyArchetype, SpawnSide};
use outrider_core::scenario::{ScenarioConfig, SpawnRequest, WaveDefinition};
use outrider_core::ConfigError;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ScenarioId {
    #[default]
    Patrol,
    Armor,
    Siege,
}

impl ScenarioId {
    pub const ALL: [ScenarioId; 3] = [ScenarioId::Patrol, ScenarioId::Armor, ScenarioId::Siege];

    pub fn name(self) -> &'static str {
        match self {
            ScenarioId::Patrol => "patrol",
            ScenarioId::Armor => "armor",
            ScenarioId::Siege => "siege",
        }
    }
}

impl fmt::Display for ScenarioId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ScenarioId {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ScenarioId::ALL
            .into_iter()
            .find(|id| id.name().eq_ignore_ascii_case(s))
            .ok_or_else(|| ConfigError::invalid(format!("unknown scenario '{s}'")))
    }
}

/// Build the full configuration for a built-in scenario.
pub fn build_scenario(id: ScenarioId) -> ScenarioConfig {
    match id {
        ScenarioId::Patrol => build_patrol(),
        ScenarioId::Armor => build_armor(),
        ScenarioId::Siege => build_siege(),
    }
}

/// Patrol: air only. 3 waves, 9 enemies.
fn build_patrol() -> ScenarioConfig {
    let waves = vec![
        // Wave 1: drones trickling in from either side
        WaveDefinition::new(1.0, vec![SpawnRequest::new(EnemyArchetype::Drone, 3).every(1.5)]),
        // Wave 2: a pair of jets on a bombing run from the right
        WaveDefinition {
            start_delay: 2.0,
            start_delay_jitter: 0.5,
            enemies: vec![SpawnRequest::new(EnemyArchetype::Jet, 2)
                .from_side(SpawnSide::Right)
                .every(2.0)],
        },
        // Wave 3: drones covering a jet
        WaveDefinition::new(
            2.0,
            vec![
                SpawnRequest::new(EnemyArchetype::Drone, 3).every(1.0),
                SpawnRequest::new(EnemyArchetype::Jet, 1).from_side(SpawnSide::Left),
            ],
        ),
    ];
    ScenarioConfig::new("patrol", waves)
}

/// Armor: ground pressure. 3 waves, 8 enemies.
fn build_armor() -> ScenarioConfig {
    let tanks = |count| {
        let mut request = SpawnRequest::new(EnemyArchetype::Tank, count)
            .from_side(SpawnSide::Left)
            .every(3.0);
        // Tanks roll in on the ground lane.
        request.min_y_viewport = 0.0;
        request.max_y_viewport = 0.0;
        request.min_above_player_y = 0.0;
        request
    };
    let waves = vec![
        WaveDefinition::new(1.0, vec![tanks(2)]),
        WaveDefinition::new(
            3.0,
            vec![tanks(2), SpawnRequest::new(EnemyArchetype::Drone, 1).from_side(SpawnSide::Right)],
        ),
        WaveDefinition::new(
            3.0,
            vec![tanks(1), SpawnRequest::new(EnemyArchetype::Jet, 2).every(2.5)],
        ),
    ];
    ScenarioConfig::new("armor", waves)
}

/// Siege: mixed waves closing on a mini-boss that drops onto the field.
fn build_siege() -> ScenarioConfig {
    let waves = vec![
        WaveDefinition::new(
            1.0,
            vec![
                SpawnRequest::new(EnemyArchetype::Drone, 2).every(1.0),
                SpawnRequest::new(EnemyArchetype::Jet, 1).from_side(SpawnSide::Right),
            ],
        ),
        WaveDefinition::new(
            2.0,
            vec![SpawnRequest::new(EnemyArchetype::MiniBoss, 1)
                .from_side(SpawnSide::Right)
                .fixed_at(Vec3::new(16.0, 14.0, 0.0))],
        ),
    ];
    let mut config = ScenarioConfig::new("siege", waves);
    config.auto_end_after_secs = Some(300.0);
    config
}
