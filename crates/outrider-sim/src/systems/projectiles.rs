//! Enemy projectiles: launch, flight and hit resolution.
//!
//! Bullets and bombs fly straight on their launch lane. Shells are
//! integrated by hand under gravity and ray-tested between steps so fast
//! shells cannot tunnel through thin geometry.

use glam::Vec3;
use hecs::{Entity, World};

use outrider_core::enums::{EffectKind, Layer, ProjectileKind};
use outrider_core::services::{CastHit, EffectRequest, SpatialQuery};
use outrider_core::tuning::ProjectileTuning;
use outrider_core::{EventBus, GameEvent};
use outrider_enemy_ai::ProjectileSpec;

use crate::components::Projectile;

/// Shortest lifetime a straight shot may be given.
const MIN_STRAIGHT_LIFETIME: f32 = 0.05;

const HIT_LAYERS: [Layer; 2] = [Layer::Player, Layer::Environment];

/// Spawn a projectile entity from an enemy's fire request.
pub fn launch(world: &mut World, spec: &ProjectileSpec, tuning: &ProjectileTuning) -> Entity {
    let projectile = match spec.kind {
        ProjectileKind::Bullet | ProjectileKind::Bomb => {
            let t = if spec.kind == ProjectileKind::Bullet {
                &tuning.bullet
            } else {
                &tuning.bomb
            };
            Projectile {
                kind: spec.kind,
                position: spec.origin,
                velocity: Vec3::new(spec.velocity.x, spec.velocity.y, 0.0),
                gravity: 0.0,
                damage: t.damage,
                radius: t.radius.max(0.0),
                age: 0.0,
                lifetime: t.lifetime_secs.max(MIN_STRAIGHT_LIFETIME),
                shooter: spec.shooter,
                spent: false,
            }
        }
        ProjectileKind::Shell => Projectile {
            kind: ProjectileKind::Shell,
            position: spec.origin,
            velocity: Vec3::new(spec.velocity.x, spec.velocity.y, 0.0),
            gravity: spec.gravity,
            damage: tuning.shell.damage,
            radius: 0.0,
            age: 0.0,
            lifetime: tuning.shell.lifetime_secs,
            shooter: spec.shooter,
            spent: false,
        },
    };
    world.spawn((projectile,))
}

/// Move every projectile one step and resolve hits.
pub fn run(
    world: &mut World,
    spatial: &dyn SpatialQuery,
    bus: &mut EventBus,
    effects: &mut Vec<EffectRequest>,
    tuning: &ProjectileTuning,
    dt: f32,
) {
    for (_entity, projectile) in world.query_mut::<&mut Projectile>() {
        if projectile.spent {
            continue;
        }
        projectile.age += dt;
        if projectile.age >= projectile.lifetime {
            projectile.spent = true;
            continue;
        }

        if projectile.kind == ProjectileKind::Shell {
            projectile.velocity.y -= projectile.gravity * dt;
        }
        let from = projectile.position;
        let step = projectile.velocity * dt;
        let distance = step.length();

        let hit = if distance > 0.0 {
            spatial
                .sphere_cast(from, projectile.radius, step, distance, &HIT_LAYERS, false)
                .filter(|h| h.collider.entity != projectile.shooter)
        } else {
            None
        };

        match hit {
            Some(hit) => {
                projectile.position = hit.point;
                projectile.spent = true;
                resolve_hit(projectile, &hit, bus, effects, tuning);
            }
            None => projectile.position = from + step,
        }
    }
}

fn resolve_hit(
    projectile: &Projectile,
    hit: &CastHit,
    bus: &mut EventBus,
    effects: &mut Vec<EffectRequest>,
    tuning: &ProjectileTuning,
) {
    let on_player = hit.collider.layer == Layer::Player;
    if on_player {
        bus.publish(GameEvent::PlayerHit {
            damage: projectile.damage,
            hit_point: hit.point,
        });
    }

    let effect = match projectile.kind {
        ProjectileKind::Bomb => EffectRequest::at(EffectKind::Explosion, hit.point),
        ProjectileKind::Bullet if !on_player => {
            // Impact sits on the top surface of whatever was struck.
            let surface = Vec3::new(hit.point.x, hit.collider.bounds.max().y, hit.point.z);
            EffectRequest::at(EffectKind::Impact, surface).with_lifetime(tuning.impact_effect_lifetime)
        }
        ProjectileKind::Bullet | ProjectileKind::Shell => {
            EffectRequest::at(EffectKind::Impact, hit.point).with_lifetime(tuning.impact_effect_lifetime)
        }
    };
    effects.push(effect);

    log::debug!("{:?} hit {:?} at {}", projectile.kind, hit.collider.layer, hit.point);
}

/// Projectiles still in flight.
pub fn live(world: &World) -> Vec<(Entity, Projectile)> {
    world
        .query::<&Projectile>()
        .iter()
        .filter(|(_, p)| !p.spent)
        .map(|(e, p)| (e, *p))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::spatial::WorldSnapshot;
    use outrider_core::scenario::ArenaConfig;
    use outrider_core::services::ColliderInfo;
    use outrider_core::types::{Aabb, EntityRef};

    fn spec(kind: ProjectileKind, origin: Vec3, velocity: Vec3, gravity: f32) -> ProjectileSpec {
        ProjectileSpec {
            kind,
            origin,
            velocity,
            gravity,
            shooter: EntityRef(9),
        }
    }

    fn ground() -> WorldSnapshot {
        let mut s = WorldSnapshot::new();
        s.add_arena(&ArenaConfig::default());
        s
    }

    #[test]
    fn straight_shots_fly_flat_on_their_lane() {
        let mut world = World::new();
        let tuning = ProjectileTuning::default();
        let e = launch(
            &mut world,
            &spec(ProjectileKind::Bullet, Vec3::new(0.0, 5.0, 2.0), Vec3::new(10.0, 0.0, 3.0), 0.0),
            &tuning,
        );
        let mut bus = EventBus::new();
        let mut effects = Vec::new();
        run(&mut world, &ground(), &mut bus, &mut effects, &tuning, 0.1);

        let p = *world.get::<&Projectile>(e).expect("projectile");
        assert!((p.position.x - 1.0).abs() < 1e-5);
        assert_eq!(p.position.z, 2.0);
        assert!(effects.is_empty());
    }

    #[test]
    fn bullet_expires_without_effect() {
        let mut world = World::new();
        let mut tuning = ProjectileTuning::default();
        tuning.bullet.lifetime_secs = 0.0;
        let e = launch(
            &mut world,
            &spec(ProjectileKind::Bullet, Vec3::new(0.0, 5.0, 0.0), Vec3::X, 0.0),
            &tuning,
        );
        let mut bus = EventBus::new();
        let mut effects = Vec::new();
        for _ in 0..4 {
            run(&mut world, &ground(), &mut bus, &mut effects, &tuning, 1.0 / 60.0);
        }
        assert!(world.get::<&Projectile>(e).expect("projectile").spent);
        assert!(effects.is_empty());
    }

    #[test]
    fn shell_hitting_ground_leaves_impact() {
        let mut world = World::new();
        let tuning = ProjectileTuning::default();
        launch(
            &mut world,
            &spec(ProjectileKind::Shell, Vec3::new(0.0, 1.0, 0.0), Vec3::new(5.0, 0.0, 0.0), 20.0),
            &tuning,
        );
        let mut bus = EventBus::new();
        let mut effects = Vec::new();
        for _ in 0..60 {
            run(&mut world, &ground(), &mut bus, &mut effects, &tuning, 1.0 / 60.0);
        }
        assert_eq!(effects.len(), 1);
        assert_eq!(effects[0].kind, EffectKind::Impact);
        assert!(effects[0].position.y.abs() < 1e-4);
        assert_eq!(bus.stats().published, 0);
    }

    #[test]
    fn bomb_on_player_publishes_hit_and_explodes() {
        let mut world = World::new();
        let tuning = ProjectileTuning::default();
        launch(
            &mut world,
            &spec(ProjectileKind::Bomb, Vec3::new(0.0, 6.0, 0.0), Vec3::new(0.0, -12.0, 0.0), 0.0),
            &tuning,
        );
        let mut spatial = ground();
        spatial.push(ColliderInfo {
            entity: EntityRef(1),
            layer: Layer::Player,
            archetype: None,
            bounds: Aabb::new(Vec3::new(0.0, 1.0, 0.0), Vec3::ONE),
            is_trigger: false,
        });
        let mut bus = EventBus::new();
        let hits = std::rc::Rc::new(std::cell::RefCell::new(Vec::new()));
        let sink = std::rc::Rc::clone(&hits);
        bus.subscribe(outrider_core::EventKind::PlayerHit, move |e| sink.borrow_mut().push(e.clone()));
        let mut effects = Vec::new();
        for _ in 0..60 {
            run(&mut world, &spatial, &mut bus, &mut effects, &tuning, 1.0 / 60.0);
        }

        let hits = hits.borrow();
        assert_eq!(hits.len(), 1);
        match &hits[0] {
            GameEvent::PlayerHit { damage, hit_point } => {
                assert_eq!(*damage, tuning.bomb.damage);
                assert!((hit_point.y - 2.0).abs() < 1e-4);
            }
            other => panic!("unexpected {other:?}"),
        }
        assert_eq!(effects.len(), 1);
        assert_eq!(effects[0].kind, EffectKind::Explosion);
    }
}
