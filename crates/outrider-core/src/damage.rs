//! Damage payloads and the polymorphic damage contract.

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::types::EntityRef;

/// One application of damage.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DamageInfo {
    pub amount: i32,
    /// World-space impact point.
    pub hit_point: Vec3,
    pub hit_normal: Vec3,
    /// Bullet, rocket, or whatever dealt the damage.
    pub source: Option<EntityRef>,
}

impl DamageInfo {
    /// Damage with no impact geometry, for scripted or legacy callers.
    pub fn amount(amount: i32) -> Self {
        Self {
            amount,
            hit_point: Vec3::ZERO,
            hit_normal: Vec3::ZERO,
            source: None,
        }
    }

    pub fn at(amount: i32, hit_point: Vec3, hit_normal: Vec3, source: Option<EntityRef>) -> Self {
        Self {
            amount,
            hit_point,
            hit_normal,
            source,
        }
    }
}

/// Result of a damage application.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DamageOutcome {
    /// Target was already terminal, or the amount was not positive.
    Ignored,
    /// Hit points dropped but the target survives.
    Damaged { remaining: i32 },
    /// This hit took the target to zero; it is now terminal.
    Killed,
}

/// Anything that can receive damage: enemy hulls, hit proxies, players.
///
/// `Ctx` is whatever the implementor needs to react (bus, command buffer).
pub trait Damageable<Ctx: ?Sized> {
    fn take_damage(&mut self, info: &DamageInfo, ctx: &mut Ctx) -> DamageOutcome;
}
