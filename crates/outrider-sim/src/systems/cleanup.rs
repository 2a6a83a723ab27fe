//! Cleanup system: removes finished enemies, spent projectiles and hit
//! proxies whose owner is gone.

use hecs::{Entity, World};

use outrider_enemy_ai::Enemy;

use crate::components::{HitProxy, Projectile};

/// Despawn everything that is done. Uses a caller-owned buffer to avoid
/// per-tick allocation. Returns the number of enemies removed.
pub fn run(world: &mut World, despawn_buffer: &mut Vec<Entity>) -> usize {
    despawn_buffer.clear();

    for (entity, enemy) in world.query_mut::<&Enemy>() {
        if enemy.should_remove() {
            despawn_buffer.push(entity);
        }
    }
    let enemies = despawn_buffer.len();

    for (entity, projectile) in world.query_mut::<&Projectile>() {
        if projectile.spent {
            despawn_buffer.push(entity);
        }
    }

    // Proxies are removed with their owner.
    let removed_owners: Vec<Entity> = despawn_buffer[..enemies].to_vec();
    for (entity, proxy) in world.query::<&HitProxy>().iter() {
        let owner_gone = removed_owners.contains(&proxy.owner) || !world.contains(proxy.owner);
        if owner_gone {
            despawn_buffer.push(entity);
        }
    }

    for entity in despawn_buffer.drain(..) {
        let _ = world.despawn(entity);
    }
    enemies
}

#[cfg(test)]
mod tests {
    use glam::Vec3;

    use super::*;
    use outrider_core::enums::{EnemyArchetype, ProjectileKind};
    use outrider_core::tuning::Tuning;
    use outrider_core::types::EntityRef;

    use crate::components::entity_ref;

    fn enemy(world: &mut World) -> Entity {
        let e = world.spawn(());
        let enemy = Enemy::new(entity_ref(e), EnemyArchetype::Tank, &Tuning::default());
        world.insert_one(e, enemy).expect("insert");
        e
    }

    #[test]
    fn removes_requested_enemies_with_their_proxies() {
        let mut world = World::new();
        let keep = enemy(&mut world);
        let gone = enemy(&mut world);
        world
            .get::<&mut Enemy>(gone)
            .expect("enemy")
            .body
            .request_removal();
        let proxy = world.spawn((HitProxy {
            owner: gone,
            offset: Vec3::Y,
            half_extents: Vec3::ONE,
        },));

        let mut buffer = Vec::new();
        assert_eq!(run(&mut world, &mut buffer), 1);
        assert!(world.contains(keep));
        assert!(!world.contains(gone));
        assert!(!world.contains(proxy));
    }

    #[test]
    fn removes_spent_projectiles_only() {
        let mut world = World::new();
        let make = |spent| Projectile {
            kind: ProjectileKind::Bullet,
            position: Vec3::ZERO,
            velocity: Vec3::X,
            gravity: 0.0,
            damage: 1,
            radius: 0.1,
            age: 0.0,
            lifetime: 1.0,
            shooter: EntityRef(1),
            spent,
        };
        let flying = world.spawn((make(false),));
        let spent = world.spawn((make(true),));

        let mut buffer = Vec::new();
        assert_eq!(run(&mut world, &mut buffer), 0);
        assert!(world.contains(flying));
        assert!(!world.contains(spent));
    }
}
