//! ECS components owned by the simulation world.
//!
//! Enemies carry their full behaviour state as one `Enemy` component (from
//! outrider-enemy-ai). Everything else is plain data.

use glam::Vec3;
use hecs::Entity;

use outrider_core::enums::ProjectileKind;
use outrider_core::types::{Aabb, EntityRef};

/// Half size of the player's collision box.
pub const PLAYER_HALF_EXTENTS: Vec3 = Vec3::new(1.5, 1.0, 1.0);

/// Marker for the player vehicle. Its `Aabb` is the player collider.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Player {
    pub bounds: Aabb,
}

impl Player {
    pub fn at(position: Vec3) -> Self {
        Self {
            bounds: Aabb::new(position, PLAYER_HALF_EXTENTS),
        }
    }

    pub fn position(&self) -> Vec3 {
        self.bounds.center
    }
}

/// Secondary collider that forwards damage to its owning enemy.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HitProxy {
    pub owner: Entity,
    /// Offset of the proxy center from the owner's position.
    pub offset: Vec3,
    pub half_extents: Vec3,
}

/// Enemy projectile in flight.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Projectile {
    pub kind: ProjectileKind,
    pub position: Vec3,
    pub velocity: Vec3,
    /// Downward acceleration (shells only).
    pub gravity: f32,
    pub damage: i32,
    pub radius: f32,
    pub age: f32,
    pub lifetime: f32,
    pub shooter: EntityRef,
    /// Set once the projectile hit something or expired.
    pub spent: bool,
}

/// Map a hecs entity to the identity used across crate boundaries.
pub fn entity_ref(entity: Entity) -> EntityRef {
    EntityRef(entity.to_bits().get())
}

/// Inverse of [`entity_ref`]. `None` for identities hecs never issued.
pub fn entity_of(id: EntityRef) -> Option<Entity> {
    Entity::from_bits(id.0)
}
