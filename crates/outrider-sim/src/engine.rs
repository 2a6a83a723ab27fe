//! Simulation engine: the headless core of a level.
//!
//! `SimulationEngine` owns the hecs ECS world and the session's event bus,
//! runs the level director and all systems at a fixed tick, and produces
//! `SimSnapshot`s. No rendering or host dependency, enabling deterministic
//! testing.

use glam::Vec3;
use hecs::{Entity, World};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use outrider_core::constants::DT;
use outrider_core::damage::{DamageInfo, DamageOutcome, Damageable};
use outrider_core::enums::{EnemyArchetype, LevelPhase, Side};
use outrider_core::events::{EventKind, GameEvent};
use outrider_core::scenario::ScenarioConfig;
use outrider_core::services::{CameraProjection, EffectRequest, EffectSink};
use outrider_core::state::SimSnapshot;
use outrider_core::types::{EntityRef, SimTime};
use outrider_core::EventBus;
use outrider_enemy_ai::{Enemy, EnemyCommand, SpawnContext, TickContext};

use crate::camera::PerspectiveCamera;
use crate::components::{entity_of, entity_ref, HitProxy, Player};
use crate::level::LevelDirector;
use crate::scenario::{build_scenario, ScenarioId};
use crate::spatial::WorldSnapshot;
use crate::stats::{EventLog, StatsRecorder};
use crate::systems;
use crate::systems::enemies::{EnemyTickInputs, WorldSpawner};
use crate::systems::snapshot::SnapshotInputs;

/// Configuration for starting a new simulation.
pub struct SimConfig {
    /// RNG seed for determinism. Same seed = same simulation.
    pub seed: u64,
    pub scenario: ScenarioConfig,
    pub camera: PerspectiveCamera,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self::builtin(ScenarioId::Patrol)
    }
}

impl SimConfig {
    /// Seed 42 with a built-in scenario.
    pub fn builtin(id: ScenarioId) -> Self {
        Self {
            seed: 42,
            scenario: build_scenario(id),
            camera: PerspectiveCamera::default(),
        }
    }
}

/// The simulation engine. Owns the ECS world and all sim state.
pub struct SimulationEngine {
    world: World,
    time: SimTime,
    rng: ChaCha8Rng,
    bus: EventBus,
    camera: PerspectiveCamera,
    scenario: ScenarioConfig,
    director: LevelDirector,
    stats: StatsRecorder,
    event_log: EventLog,
    spatial: WorldSnapshot,
    player: Option<Entity>,
    commands: Vec<EnemyCommand>,
    effects: Vec<EffectRequest>,
    effect_sink: Option<Box<dyn EffectSink>>,
    despawn_buffer: Vec<Entity>,
}

impl SimulationEngine {
    /// Create a new simulation engine with the given config.
    pub fn new(config: SimConfig) -> Self {
        let mut bus = EventBus::new();
        let mut event_log = EventLog::new();
        event_log.attach(&mut bus);
        let mut stats = StatsRecorder::new();
        stats.attach(&mut bus);

        Self {
            world: World::new(),
            time: SimTime::default(),
            rng: ChaCha8Rng::seed_from_u64(config.seed),
            bus,
            camera: config.camera,
            director: LevelDirector::new(&config.scenario),
            scenario: config.scenario,
            stats,
            event_log,
            spatial: WorldSnapshot::new(),
            player: None,
            commands: Vec::new(),
            effects: Vec::new(),
            effect_sink: None,
            despawn_buffer: Vec::new(),
        }
    }

    /// Publish the level start signals and begin the wave sequence.
    pub fn start_level(&mut self) {
        self.director.start(&mut self.bus, &mut self.rng);
    }

    /// Stop the waves and publish `LevelEnd`. No-op unless running.
    pub fn end_level(&mut self) {
        self.director.end_level(&mut self.bus);
    }

    /// Advance the simulation by one tick and return the resulting snapshot.
    pub fn tick(&mut self) -> SimSnapshot {
        if self.director.phase() == LevelPhase::Running {
            self.run_systems();
            self.time.advance();
        } else {
            // Reactions to damage applied between ticks.
            self.apply_commands();
        }

        let effects = std::mem::take(&mut self.effects);
        if let Some(sink) = self.effect_sink.as_mut() {
            for request in &effects {
                sink.play(*request);
            }
        }

        systems::snapshot::build_snapshot(
            &self.world,
            SnapshotInputs {
                time: self.time,
                level: self.director.phase(),
                scenario: Some(self.scenario.name.clone()),
                waves: self.director.waves().view(),
                environment_speed: self.environment_speed(),
                effects,
                events: self.event_log.drain(),
                stats: self.stats.stats(),
            },
        )
    }

    /// Place the player, creating it on first use.
    pub fn set_player_position(&mut self, position: Vec3) {
        if let Some(entity) = self.player {
            if let Ok(mut player) = self.world.get::<&mut Player>(entity) {
                *player = Player::at(position);
                return;
            }
        }
        self.player = Some(self.world.spawn((Player::at(position),)));
    }

    /// Remove the player. Enemies fall back to plain forward motion.
    pub fn remove_player(&mut self) {
        if let Some(entity) = self.player.take() {
            let _ = self.world.despawn(entity);
        }
    }

    pub fn player_position(&self) -> Option<Vec3> {
        let entity = self.player?;
        self.world.get::<&Player>(entity).ok().map(|p| p.position())
    }

    /// Spawn one enemy directly, outside any wave.
    pub fn spawn_enemy(&mut self, archetype: EnemyArchetype, position: Vec3, side: Side) -> EntityRef {
        let player = self.player_position();
        let entity = self.world.spawn(());
        let id = entity_ref(entity);
        let mut enemy = Enemy::new(id, archetype, &self.scenario.tuning);
        let mut ctx = TickContext {
            dt: DT,
            now: self.time.elapsed_secs,
            player,
            camera: Some(&self.camera as &dyn CameraProjection),
            spatial: &self.spatial,
            bus: &mut self.bus,
            rng: &mut self.rng,
            tuning: &self.scenario.tuning,
            commands: &mut self.commands,
        };
        enemy.on_spawned(&SpawnContext { position, side }, &mut ctx);
        if self.world.insert_one(entity, enemy).is_err() {
            log::error!("entity {id:?} vanished before enemy setup");
        }
        self.stats.note_spawned(1);
        id
    }

    /// Add a collider that forwards damage to `owner`. `None` when `owner`
    /// is not a live enemy.
    pub fn attach_hit_proxy(&mut self, owner: EntityRef, offset: Vec3, half_extents: Vec3) -> Option<EntityRef> {
        let owner = entity_of(owner).filter(|&e| self.world.get::<&Enemy>(e).is_ok())?;
        let proxy = self.world.spawn((HitProxy {
            owner,
            offset,
            half_extents,
        },));
        Some(entity_ref(proxy))
    }

    /// Damage an enemy, or the enemy behind a hit proxy. Effects and shots
    /// the reaction produces are applied on the next tick.
    pub fn apply_damage(&mut self, target: EntityRef, info: DamageInfo) -> DamageOutcome {
        let Some(entity) = entity_of(target) else {
            return DamageOutcome::Ignored;
        };
        let owner = match self.world.get::<&HitProxy>(entity) {
            Ok(proxy) => proxy.owner,
            Err(_) => entity,
        };
        let player = self.player_position();

        let Ok(mut enemy) = self.world.get::<&mut Enemy>(owner) else {
            log::debug!("damage to {target:?} ignored: not an enemy");
            return DamageOutcome::Ignored;
        };
        let mut ctx = TickContext {
            dt: DT,
            now: self.time.elapsed_secs,
            player,
            camera: Some(&self.camera as &dyn CameraProjection),
            spatial: &self.spatial,
            bus: &mut self.bus,
            rng: &mut self.rng,
            tuning: &self.scenario.tuning,
            commands: &mut self.commands,
        };
        enemy.take_damage(&info, &mut ctx)
    }

    /// Receive every effect request as it is flushed each tick.
    pub fn set_effect_sink(&mut self, sink: Box<dyn EffectSink>) {
        self.effect_sink = Some(sink);
    }

    /// Session teardown: drop every handler and sticky value on the bus.
    pub fn shutdown(&mut self) {
        self.director.shutdown(&mut self.bus);
        self.stats.detach(&mut self.bus);
        self.event_log.detach(&mut self.bus);
        self.bus.reset_all();
    }

    pub fn bus_mut(&mut self) -> &mut EventBus {
        &mut self.bus
    }

    pub fn camera_mut(&mut self) -> &mut PerspectiveCamera {
        &mut self.camera
    }

    /// Get a read-only reference to the ECS world.
    pub fn world(&self) -> &World {
        &self.world
    }

    /// Get the current simulation time.
    pub fn time(&self) -> SimTime {
        self.time
    }

    pub fn level_phase(&self) -> LevelPhase {
        self.director.phase()
    }

    pub fn scenario(&self) -> &ScenarioConfig {
        &self.scenario
    }

    /// Last published environment scroll speed, 0 before any.
    pub fn environment_speed(&self) -> f32 {
        match self.bus.last_sticky(EventKind::EnvironmentSpeedChanged) {
            Some(GameEvent::EnvironmentSpeedChanged { speed }) => *speed,
            _ => 0.0,
        }
    }

    /// Run all systems in order.
    fn run_systems(&mut self) {
        let now = self.time.elapsed_secs;
        let player = self.player_position();
        let camera = Some(&self.camera as &dyn CameraProjection);

        // 1. Level director and wave orchestrator (spawns run on_spawned)
        self.spatial = WorldSnapshot::capture(&self.world, &self.scenario.arena);
        let mut spawner = WorldSpawner {
            world: &mut self.world,
            camera,
            spatial: &self.spatial,
            tuning: &self.scenario.tuning,
            commands: &mut self.commands,
            player,
            now,
            spawned: 0,
        };
        self.director.tick(DT, &mut self.bus, &mut self.rng, &mut spawner);
        let spawned = spawner.spawned;
        self.stats.note_spawned(spawned);

        // 2. Enemy behaviour against a snapshot that includes this tick's spawns
        if spawned > 0 {
            self.spatial = WorldSnapshot::capture(&self.world, &self.scenario.arena);
        }
        let inputs = EnemyTickInputs {
            dt: DT,
            now,
            player,
            camera,
            spatial: &self.spatial,
            tuning: &self.scenario.tuning,
        };
        systems::enemies::run(
            &mut self.world,
            &inputs,
            &mut self.bus,
            &mut self.rng,
            &mut self.commands,
        );

        // 3. Projectiles
        systems::projectiles::run(
            &mut self.world,
            &self.spatial,
            &mut self.bus,
            &mut self.effects,
            &self.scenario.tuning.projectiles,
            DT,
        );

        // 4. Commands emitted by enemies this tick
        self.apply_commands();

        // 5. Cleanup
        systems::cleanup::run(&mut self.world, &mut self.despawn_buffer);
        self.stats
            .set_waves_completed(self.director.waves().waves_completed());
    }

    fn apply_commands(&mut self) {
        for command in std::mem::take(&mut self.commands) {
            match command {
                EnemyCommand::Fire(spec) => {
                    systems::projectiles::launch(&mut self.world, &spec, &self.scenario.tuning.projectiles);
                }
                EnemyCommand::Effect(request) => self.effects.push(request),
            }
        }
    }
}
