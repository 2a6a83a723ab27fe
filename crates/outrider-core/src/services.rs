//! Contracts for the external collaborators the core consumes.
//!
//! The core never assumes a rendering or collision backend; the simulation
//! crate (or a host engine) supplies implementations.

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::enums::{EffectKind, EnemyArchetype, Layer};
use crate::types::{Aabb, EntityRef, Ray};

/// Camera projection service.
pub trait CameraProjection {
    /// Project a world point to viewport space: x/y in [0, 1] when visible,
    /// z = depth in front of the camera (negative when behind).
    fn world_to_viewport(&self, world: Vec3) -> Vec3;

    /// Ray from the camera through viewport point (x, y).
    fn viewport_ray(&self, viewport_x: f32, viewport_y: f32) -> Ray;

    fn position(&self) -> Vec3;

    /// Unit forward vector.
    fn forward(&self) -> Vec3;
}

/// A collider reported by a spatial query.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ColliderInfo {
    /// Owning entity. Hit proxies report the enemy they forward to.
    pub entity: EntityRef,
    pub layer: Layer,
    /// Set when the collider belongs to an enemy (or an enemy's hit proxy).
    pub archetype: Option<EnemyArchetype>,
    pub bounds: Aabb,
    /// Non-solid (trigger) collider.
    pub is_trigger: bool,
}

impl ColliderInfo {
    pub fn closest_point(&self, point: Vec3) -> Vec3 {
        self.bounds.closest_point(point)
    }
}

/// First surface hit by a cast.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CastHit {
    pub point: Vec3,
    pub normal: Vec3,
    pub distance: f32,
    pub collider: ColliderInfo,
}

/// Read-only spatial queries against the shared world, valid for one tick.
pub trait SpatialQuery {
    /// Whether colliders of `layer` are known to the backend at all.
    /// A missing layer is a configuration error; callers degrade.
    fn has_layer(&self, layer: Layer) -> bool;

    /// Colliders of `layer` overlapping the sphere.
    fn overlap_sphere(
        &self,
        center: Vec3,
        radius: f32,
        layer: Layer,
        include_triggers: bool,
    ) -> Vec<ColliderInfo>;

    /// Sweep a sphere along `direction` and report the first hit.
    /// Colliders already overlapping the sphere at `origin` are not reported.
    fn sphere_cast(
        &self,
        origin: Vec3,
        radius: f32,
        direction: Vec3,
        max_distance: f32,
        layers: &[Layer],
        include_triggers: bool,
    ) -> Option<CastHit>;

    /// Zero-radius [`sphere_cast`](Self::sphere_cast).
    fn raycast(
        &self,
        ray: &Ray,
        max_distance: f32,
        layers: &[Layer],
        include_triggers: bool,
    ) -> Option<CastHit> {
        self.sphere_cast(ray.origin, 0.0, ray.direction, max_distance, layers, include_triggers)
    }
}

/// Fire-and-forget effect request.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EffectRequest {
    pub kind: EffectKind,
    pub position: Vec3,
    /// Follow this entity while alive.
    pub parent: Option<EntityRef>,
    /// Seconds; `None` means the effect decides.
    pub lifetime: Option<f32>,
}

impl EffectRequest {
    pub fn at(kind: EffectKind, position: Vec3) -> Self {
        Self {
            kind,
            position,
            parent: None,
            lifetime: None,
        }
    }

    pub fn attached(kind: EffectKind, position: Vec3, parent: EntityRef) -> Self {
        Self {
            kind,
            position,
            parent: Some(parent),
            lifetime: None,
        }
    }

    pub fn with_lifetime(mut self, secs: f32) -> Self {
        self.lifetime = Some(secs);
        self
    }
}

/// Visual/audio effect spawner.
pub trait EffectSink {
    fn play(&mut self, request: EffectRequest);
}

/// Sink that discards every request.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullEffects;

impl EffectSink for NullEffects {
    fn play(&mut self, _request: EffectRequest) {}
}

impl EffectSink for Vec<EffectRequest> {
    fn play(&mut self, request: EffectRequest) {
        self.push(request);
    }
}
