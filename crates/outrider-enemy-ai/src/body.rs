//! State shared by every archetype: placement, hit points, lifecycle and the
//! destroyed-notification latch.

use glam::{Quat, Vec3};

use outrider_core::damage::DamageOutcome;
use outrider_core::enums::{DestroyCause, EnemyArchetype, Side};
use outrider_core::events::GameEvent;
use outrider_core::types::{Aabb, EntityRef};
use outrider_core::EventBus;

use crate::lifecycle::ScreenLifecycle;

/// Monotonic hit points. Once depleted, further damage is ignored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Health {
    current: i32,
    max: i32,
    depleted: bool,
}

impl Health {
    pub fn new(max: i32) -> Self {
        let max = max.max(1);
        Self {
            current: max,
            max,
            depleted: false,
        }
    }

    pub fn current(&self) -> i32 {
        self.current
    }

    pub fn max(&self) -> i32 {
        self.max
    }

    pub fn is_depleted(&self) -> bool {
        self.depleted
    }

    /// Remaining fraction in [0, 1].
    pub fn fraction(&self) -> f32 {
        (self.current.max(0) as f32) / (self.max as f32)
    }

    pub fn apply(&mut self, amount: i32) -> DamageOutcome {
        if self.depleted || amount <= 0 {
            return DamageOutcome::Ignored;
        }
        self.current -= amount;
        if self.current <= 0 {
            self.depleted = true;
            DamageOutcome::Killed
        } else {
            DamageOutcome::Damaged {
                remaining: self.current,
            }
        }
    }
}

#[derive(Debug, Clone)]
pub struct EnemyBody {
    pub id: EntityRef,
    pub archetype: EnemyArchetype,
    pub position: Vec3,
    pub rotation: Quat,
    pub half_extents: Vec3,
    pub side: Side,
    pub health: Health,
    pub lifecycle: ScreenLifecycle,
    destroyed_announced: bool,
    removal_requested: bool,
}

impl EnemyBody {
    pub fn new(
        id: EntityRef,
        archetype: EnemyArchetype,
        position: Vec3,
        half_extents: Vec3,
        max_hp: i32,
    ) -> Self {
        Self {
            id,
            archetype,
            position,
            rotation: Quat::IDENTITY,
            half_extents,
            side: Side::Left,
            health: Health::new(max_hp),
            lifecycle: ScreenLifecycle::default(),
            destroyed_announced: false,
            removal_requested: false,
        }
    }

    /// Reset for a fresh spawn (also used when an instance is reused).
    pub fn reset(&mut self, position: Vec3, side: Side, now: f32) {
        self.position = position;
        self.side = side;
        self.rotation = facing(side);
        self.health = Health::new(self.health.max());
        self.lifecycle.init(now);
        self.destroyed_announced = false;
        self.removal_requested = false;
    }

    pub fn bounds(&self) -> Aabb {
        Aabb::new(self.position, self.half_extents)
    }

    /// Advance along the travel direction of the spawn side.
    pub fn move_forward_x(&mut self, speed: f32, dt: f32) {
        self.position.x += self.side.direction() * speed * dt;
    }

    /// Publish `EnemyDestroyed` unless already published. Returns whether it
    /// was published by this call.
    pub fn announce_destroyed(&mut self, bus: &mut EventBus, cause: DestroyCause) -> bool {
        if self.destroyed_announced {
            return false;
        }
        self.destroyed_announced = true;
        bus.publish(GameEvent::EnemyDestroyed {
            enemy: self.id,
            archetype: self.archetype,
            cause,
        });
        true
    }

    pub fn destroyed_announced(&self) -> bool {
        self.destroyed_announced
    }

    pub fn request_removal(&mut self) {
        self.removal_requested = true;
    }

    pub fn removal_requested(&self) -> bool {
        self.removal_requested
    }
}

/// Root orientation facing the travel direction: +X from the left, -X from the right.
pub fn facing(side: Side) -> Quat {
    match side {
        Side::Left => Quat::IDENTITY,
        Side::Right => Quat::from_rotation_y(std::f32::consts::PI),
    }
}
