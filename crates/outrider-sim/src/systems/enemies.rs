//! Enemy spawning and per-tick behaviour updates.

use glam::Vec3;
use hecs::World;
use rand::Rng;
use rand_chacha::ChaCha8Rng;

use outrider_core::constants::DT;
use outrider_core::enums::SpawnSide;
use outrider_core::scenario::SpawnRequest;
use outrider_core::services::CameraProjection;
use outrider_core::tuning::Tuning;
use outrider_core::types::EntityRef;
use outrider_core::EventBus;
use outrider_enemy_ai::{Enemy, EnemyCommand, SpawnContext, TickContext};

use crate::components::entity_ref;
use crate::spatial::WorldSnapshot;
use crate::systems::spawn_resolver;
use crate::systems::wave_orchestrator::Spawner;

/// Spawns wave enemies straight into the world.
///
/// Placement is resolved and `on_spawned` has run before the call returns,
/// so a new enemy takes part in the same tick's behaviour update.
pub struct WorldSpawner<'a> {
    pub world: &'a mut World,
    pub camera: Option<&'a dyn CameraProjection>,
    pub spatial: &'a WorldSnapshot,
    pub tuning: &'a Tuning,
    pub commands: &'a mut Vec<EnemyCommand>,
    pub player: Option<Vec3>,
    pub now: f32,
    /// Enemies created through this spawner.
    pub spawned: u32,
}

impl Spawner for WorldSpawner<'_> {
    fn spawn(
        &mut self,
        wave: usize,
        request: &SpawnRequest,
        rng: &mut ChaCha8Rng,
        bus: &mut EventBus,
    ) -> Option<EntityRef> {
        let (Some(player), Some(camera)) = (self.player, self.camera) else {
            log::warn!(
                "wave {wave}: skipping {:?} spawn, no player or camera",
                request.archetype
            );
            return None;
        };

        let side = match request.side {
            SpawnSide::Random => request.side.resolve(rng.gen::<f32>()),
            fixed => fixed.resolve(0.0),
        };
        let position = spawn_resolver::resolve(request, camera, player, side, rng);

        let entity = self.world.spawn(());
        let id = entity_ref(entity);
        let mut enemy = Enemy::new(id, request.archetype, self.tuning);
        let mut ctx = TickContext {
            dt: DT,
            now: self.now,
            player: self.player,
            camera: self.camera,
            spatial: self.spatial,
            bus,
            rng,
            tuning: self.tuning,
            commands: &mut *self.commands,
        };
        enemy.on_spawned(&SpawnContext { position, side }, &mut ctx);

        if self.world.insert_one(entity, enemy).is_err() {
            log::error!("wave {wave}: spawned entity vanished before setup");
            return None;
        }
        self.spawned += 1;
        Some(id)
    }
}

/// Everything the behaviour update reads besides the world.
pub struct EnemyTickInputs<'a> {
    pub dt: f32,
    pub now: f32,
    pub player: Option<Vec3>,
    pub camera: Option<&'a dyn CameraProjection>,
    pub spatial: &'a WorldSnapshot,
    pub tuning: &'a Tuning,
}

/// Tick every live enemy once. Commands they emit are buffered for the
/// engine to apply after projectiles move.
pub fn run(
    world: &mut World,
    inputs: &EnemyTickInputs<'_>,
    bus: &mut EventBus,
    rng: &mut ChaCha8Rng,
    commands: &mut Vec<EnemyCommand>,
) {
    for (_entity, enemy) in world.query_mut::<&mut Enemy>() {
        if enemy.should_remove() {
            continue;
        }
        let mut ctx = TickContext {
            dt: inputs.dt,
            now: inputs.now,
            player: inputs.player,
            camera: inputs.camera,
            spatial: inputs.spatial,
            bus: &mut *bus,
            rng: &mut *rng,
            tuning: inputs.tuning,
            commands: &mut *commands,
        };
        enemy.tick(&mut ctx);
    }
}
