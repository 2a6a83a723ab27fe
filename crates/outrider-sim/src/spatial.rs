//! Per-tick collision snapshot backing the `SpatialQuery` service.
//!
//! Rebuilt from the ECS world once per tick and read-only afterwards, so
//! every enemy sees the same world state regardless of update order.
//! Colliders are axis-aligned boxes; sphere casts inflate them by the radius.

use glam::Vec3;
use hecs::World;

use outrider_core::enums::Layer;
use outrider_core::scenario::ArenaConfig;
use outrider_core::services::{CastHit, ColliderInfo, SpatialQuery};
use outrider_core::types::{Aabb, EntityRef, Ray};
use outrider_enemy_ai::Enemy;

use crate::components::{entity_ref, HitProxy, Player};

/// Identity reported for static environment geometry.
pub const ENVIRONMENT: EntityRef = EntityRef(0);

/// Depth of the ground slab below the ground surface.
const GROUND_THICKNESS: f32 = 50.0;
const GROUND_HALF_SPAN: f32 = 10_000.0;

#[derive(Debug, Clone)]
pub struct WorldSnapshot {
    colliders: Vec<ColliderInfo>,
    layers: Vec<Layer>,
}

impl Default for WorldSnapshot {
    fn default() -> Self {
        Self {
            colliders: Vec::new(),
            layers: vec![Layer::Enemy, Layer::Environment, Layer::Player],
        }
    }
}

impl WorldSnapshot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot restricted to `layers`; queries on other layers find nothing
    /// and `has_layer` reports them missing.
    pub fn with_layers(layers: &[Layer]) -> Self {
        Self {
            colliders: Vec::new(),
            layers: layers.to_vec(),
        }
    }

    /// Ground slab plus obstacles.
    pub fn add_arena(&mut self, arena: &ArenaConfig) {
        let ground = Aabb::new(
            Vec3::new(0.0, arena.ground_y - GROUND_THICKNESS * 0.5, 0.0),
            Vec3::new(GROUND_HALF_SPAN, GROUND_THICKNESS * 0.5, GROUND_HALF_SPAN),
        );
        self.push(ColliderInfo {
            entity: ENVIRONMENT,
            layer: Layer::Environment,
            archetype: None,
            bounds: ground,
            is_trigger: false,
        });
        for obstacle in &arena.obstacles {
            self.push(ColliderInfo {
                entity: ENVIRONMENT,
                layer: Layer::Environment,
                archetype: None,
                bounds: *obstacle,
                is_trigger: false,
            });
        }
    }

    /// Capture arena, enemies, hit proxies and the player.
    pub fn capture(world: &World, arena: &ArenaConfig) -> Self {
        let mut snapshot = Self::new();
        snapshot.add_arena(arena);

        for (entity, enemy) in world.query::<&Enemy>().iter() {
            if enemy.should_remove() {
                continue;
            }
            snapshot.push(ColliderInfo {
                entity: entity_ref(entity),
                layer: Layer::Enemy,
                archetype: Some(enemy.archetype()),
                bounds: enemy.body.bounds(),
                is_trigger: false,
            });
        }

        for (_entity, proxy) in world.query::<&HitProxy>().iter() {
            let Ok(owner) = world.get::<&Enemy>(proxy.owner) else {
                continue;
            };
            if owner.should_remove() {
                continue;
            }
            snapshot.push(ColliderInfo {
                entity: entity_ref(proxy.owner),
                layer: Layer::Enemy,
                archetype: Some(owner.archetype()),
                bounds: Aabb::new(owner.body.position + proxy.offset, proxy.half_extents),
                is_trigger: true,
            });
        }

        for (entity, player) in world.query::<&Player>().iter() {
            snapshot.push(ColliderInfo {
                entity: entity_ref(entity),
                layer: Layer::Player,
                archetype: None,
                bounds: player.bounds,
                is_trigger: false,
            });
        }

        snapshot
    }

    pub fn push(&mut self, collider: ColliderInfo) {
        if self.layers.contains(&collider.layer) {
            self.colliders.push(collider);
        }
    }

    pub fn len(&self) -> usize {
        self.colliders.len()
    }

    pub fn is_empty(&self) -> bool {
        self.colliders.is_empty()
    }
}

impl SpatialQuery for WorldSnapshot {
    fn has_layer(&self, layer: Layer) -> bool {
        self.layers.contains(&layer)
    }

    fn overlap_sphere(
        &self,
        center: Vec3,
        radius: f32,
        layer: Layer,
        include_triggers: bool,
    ) -> Vec<ColliderInfo> {
        self.colliders
            .iter()
            .filter(|c| c.layer == layer && (include_triggers || !c.is_trigger))
            .filter(|c| c.closest_point(center).distance_squared(center) <= radius * radius)
            .copied()
            .collect()
    }

    fn sphere_cast(
        &self,
        origin: Vec3,
        radius: f32,
        direction: Vec3,
        max_distance: f32,
        layers: &[Layer],
        include_triggers: bool,
    ) -> Option<CastHit> {
        let ray = Ray::new(origin, direction);
        if ray.direction == Vec3::ZERO {
            return None;
        }
        let radius = radius.max(0.0);

        let mut best: Option<CastHit> = None;
        for collider in &self.colliders {
            if !layers.contains(&collider.layer) || (collider.is_trigger && !include_triggers) {
                continue;
            }
            // Already touching at the start: not reported.
            if collider.closest_point(origin).distance(origin) <= radius {
                continue;
            }
            let Some((distance, normal)) =
                collider.bounds.expanded(radius).ray_hit(&ray, max_distance)
            else {
                continue;
            };
            if best.as_ref().is_some_and(|b| b.distance <= distance) {
                continue;
            }
            best = Some(CastHit {
                point: collider.closest_point(ray.point_at(distance)),
                normal,
                distance,
                collider: *collider,
            });
        }
        best
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn arena() -> ArenaConfig {
        ArenaConfig {
            ground_y: 0.0,
            obstacles: vec![Aabb::new(Vec3::new(10.0, 2.0, 0.0), Vec3::new(1.0, 2.0, 1.0))],
        }
    }

    #[test]
    fn ray_down_hits_ground_surface() {
        let mut s = WorldSnapshot::new();
        s.add_arena(&arena());
        let hit = s
            .raycast(&Ray::new(Vec3::new(0.0, 5.0, 0.0), Vec3::NEG_Y), 20.0, &[Layer::Environment], false)
            .expect("ground below");
        assert!((hit.distance - 5.0).abs() < 1e-4);
        assert!(hit.point.y.abs() < 1e-4);
        assert_eq!(hit.collider.entity, ENVIRONMENT);
    }

    #[test]
    fn sphere_cast_reports_nearest_and_skips_overlap() {
        let mut s = WorldSnapshot::new();
        s.add_arena(&arena());
        let hit = s
            .sphere_cast(Vec3::new(0.0, 2.0, 0.0), 0.5, Vec3::X, 20.0, &[Layer::Environment], false)
            .expect("obstacle ahead");
        assert!((hit.distance - 8.5).abs() < 1e-4);
        assert!((hit.point.x - 9.0).abs() < 1e-4);
        assert_eq!(hit.normal, Vec3::NEG_X);

        // Starting inside the obstacle: ignored, and the ground is overlapped too.
        let inside = s.sphere_cast(Vec3::new(10.0, 0.2, 0.0), 0.5, Vec3::X, 5.0, &[Layer::Environment], false);
        assert!(inside.is_none());
    }

    #[test]
    fn triggers_filtered_unless_requested() {
        let mut s = WorldSnapshot::new();
        s.push(ColliderInfo {
            entity: EntityRef(5),
            layer: Layer::Enemy,
            archetype: None,
            bounds: Aabb::new(Vec3::new(3.0, 0.0, 0.0), Vec3::splat(0.5)),
            is_trigger: true,
        });
        assert!(s.overlap_sphere(Vec3::ZERO, 3.0, Layer::Enemy, false).is_empty());
        assert_eq!(s.overlap_sphere(Vec3::ZERO, 3.0, Layer::Enemy, true).len(), 1);
    }

    #[test]
    fn restricted_layers_report_missing() {
        let mut s = WorldSnapshot::with_layers(&[Layer::Enemy]);
        s.add_arena(&arena());
        assert!(!s.has_layer(Layer::Environment));
        assert!(s.is_empty());
    }
}
