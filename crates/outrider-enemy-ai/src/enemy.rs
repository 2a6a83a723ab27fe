//! The closed set of enemy behaviours behind one type.

use glam::Vec3;

use outrider_core::damage::{DamageInfo, DamageOutcome, Damageable};
use outrider_core::enums::{EnemyArchetype, LifecyclePhase};
use outrider_core::state::EnemyView;
use outrider_core::tuning::Tuning;
use outrider_core::types::EntityRef;

use crate::archetypes::{Drone, DroneState, Jet, JetState, MiniBoss, MiniBossState, Tank, TankState};
use crate::body::EnemyBody;
use crate::context::{SpawnContext, TickContext};

#[derive(Debug, Clone)]
pub enum Behavior {
    Drone(Drone),
    Jet(Jet),
    Tank(Tank),
    MiniBoss(MiniBoss),
}

/// One enemy: shared body state plus its archetype's state machine.
#[derive(Debug, Clone)]
pub struct Enemy {
    pub body: EnemyBody,
    pub behavior: Behavior,
}

impl Enemy {
    pub fn new(id: EntityRef, archetype: EnemyArchetype, tuning: &Tuning) -> Self {
        let behavior = match archetype {
            EnemyArchetype::Drone => Behavior::Drone(Drone::new(&tuning.drone)),
            EnemyArchetype::Jet => Behavior::Jet(Jet::new(&tuning.jet)),
            EnemyArchetype::Tank => Behavior::Tank(Tank::new(&tuning.tank)),
            EnemyArchetype::MiniBoss => Behavior::MiniBoss(MiniBoss::new(&tuning.miniboss)),
        };
        let body = EnemyBody::new(
            id,
            archetype,
            Vec3::ZERO,
            tuning.half_extents(archetype),
            tuning.max_hp(archetype),
        );
        Self { body, behavior }
    }

    pub fn id(&self) -> EntityRef {
        self.body.id
    }

    pub fn archetype(&self) -> EnemyArchetype {
        self.body.archetype
    }

    /// Place the enemy and reset every piece of per-spawn state. Runs before
    /// the first tick.
    pub fn on_spawned(&mut self, spawn: &SpawnContext, ctx: &mut TickContext<'_>) {
        self.body.reset(spawn.position, spawn.side, ctx.now);
        let body = &mut self.body;
        match &mut self.behavior {
            Behavior::Drone(b) => b.on_spawned(body, ctx),
            Behavior::Jet(b) => b.on_spawned(body, ctx),
            Behavior::Tank(b) => b.on_spawned(body, ctx),
            Behavior::MiniBoss(b) => b.on_spawned(body, ctx),
        }
        log::debug!(
            "{:?} {:?} spawned at {} ({:?})",
            self.body.archetype,
            self.body.id,
            self.body.position,
            self.body.side
        );
    }

    pub fn tick(&mut self, ctx: &mut TickContext<'_>) {
        if self.body.removal_requested() {
            return;
        }
        let body = &mut self.body;
        match &mut self.behavior {
            Behavior::Drone(b) => b.tick(body, ctx),
            Behavior::Jet(b) => b.tick(body, ctx),
            Behavior::Tank(b) => b.tick(body, ctx),
            Behavior::MiniBoss(b) => b.tick(body, ctx),
        }
    }

    /// Ready to leave the world.
    pub fn should_remove(&self) -> bool {
        self.body.removal_requested()
    }

    pub fn is_terminal(&self) -> bool {
        self.body.health.is_depleted() || self.body.removal_requested()
    }

    pub fn lifecycle_phase(&self) -> LifecyclePhase {
        if self.is_terminal() {
            LifecyclePhase::Destroying
        } else if self.body.lifecycle.has_entered() {
            LifecyclePhase::OnScreen
        } else {
            LifecyclePhase::NotEntered
        }
    }

    pub fn state_name(&self) -> &'static str {
        match &self.behavior {
            Behavior::Drone(b) => match b.state {
                DroneState::EnterCruise => "EnterCruise",
                DroneState::MoveToHover => "MoveToHover",
                DroneState::FiringLoop => "FiringLoop",
                DroneState::Destroying => "Destroying",
            },
            Behavior::Jet(b) => match b.state {
                JetState::EnterCruise => "EnterCruise",
                JetState::Dive => "Dive",
                JetState::Climb => "Climb",
                JetState::Exit => "Exit",
                JetState::Destroying => "Destroying",
            },
            Behavior::Tank(b) => match b.state {
                TankState::EnterCruise => "EnterCruise",
                TankState::EngageStop => "EngageStop",
                TankState::FiringLoop => "FiringLoop",
                TankState::Destroyed => "Destroyed",
            },
            Behavior::MiniBoss(b) => match b.state {
                MiniBossState::Approach => "Approach",
                MiniBossState::Entering { .. } => "Entering",
                MiniBossState::Engaged => "Engaged",
                MiniBossState::Dying => "Dying",
            },
        }
    }

    pub fn aim_degrees(&self) -> Option<f32> {
        match &self.behavior {
            Behavior::Drone(b) => b.aim_degrees(),
            Behavior::Jet(_) => None,
            Behavior::Tank(b) => Some(b.aim_degrees()),
            Behavior::MiniBoss(b) => Some(b.aim_degrees()),
        }
    }

    pub fn visual_offset(&self) -> Vec3 {
        match &self.behavior {
            Behavior::Tank(b) => b.visual_offset(),
            _ => Vec3::ZERO,
        }
    }

    pub fn view(&self) -> EnemyView {
        EnemyView {
            id: self.body.id,
            archetype: self.body.archetype,
            position: self.body.position,
            rotation: self.body.rotation,
            side: self.body.side,
            lifecycle: self.lifecycle_phase(),
            state: self.state_name().to_string(),
            hp: self.body.health.current().max(0),
            max_hp: self.body.health.max(),
            aim_degrees: self.aim_degrees(),
            visual_offset: self.visual_offset(),
        }
    }
}

impl<'a> Damageable<TickContext<'a>> for Enemy {
    /// Apply damage. Hit points only go down; the kill reaction runs once.
    fn take_damage(&mut self, info: &DamageInfo, ctx: &mut TickContext<'a>) -> DamageOutcome {
        if self.body.removal_requested() {
            return DamageOutcome::Ignored;
        }
        let outcome = self.body.health.apply(info.amount);
        let body = &mut self.body;
        match outcome {
            DamageOutcome::Ignored => {}
            DamageOutcome::Damaged { remaining } => {
                log::debug!("{:?} {:?} hit for {} ({} left)", body.archetype, body.id, info.amount, remaining);
                if let Behavior::MiniBoss(b) = &mut self.behavior {
                    b.on_damaged(body, ctx);
                }
            }
            DamageOutcome::Killed => match &mut self.behavior {
                Behavior::Drone(b) => b.on_killed(body, ctx),
                Behavior::Jet(b) => b.on_killed(body, ctx),
                Behavior::Tank(b) => b.on_killed(body, ctx),
                Behavior::MiniBoss(b) => b.on_killed(body, ctx),
            },
        }
        outcome
    }
}
