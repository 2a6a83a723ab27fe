//! Tests for the simulation engine, wave flow, and damage routing.

use glam::Vec3;

use outrider_core::damage::{DamageInfo, DamageOutcome};
use outrider_core::enums::*;
use outrider_core::events::{EventKind, GameEvent};
use outrider_core::scenario::{ScenarioConfig, SpawnRequest, WaveDefinition};
use outrider_core::state::SimSnapshot;
use outrider_core::types::EntityRef;

use crate::engine::{SimConfig, SimulationEngine};
use crate::scenario::ScenarioId;

fn engine_with(waves: Vec<WaveDefinition>) -> SimulationEngine {
    let mut engine = SimulationEngine::new(SimConfig {
        scenario: ScenarioConfig::new("test", waves),
        ..Default::default()
    });
    engine.set_player_position(Vec3::ZERO);
    engine
}

fn tanks(count: u32) -> WaveDefinition {
    WaveDefinition::new(0.0, vec![SpawnRequest::new(EnemyArchetype::Tank, count).every(0.0)])
}

fn ids(snapshot: &SimSnapshot) -> Vec<EntityRef> {
    snapshot.enemies.iter().map(|e| e.id).collect()
}

fn count(events: &[GameEvent], kind: EventKind) -> usize {
    events.iter().filter(|e| e.kind() == kind).count()
}

// ---- Determinism ----

#[test]
fn test_determinism_same_seed() {
    let mut engine_a = SimulationEngine::new(SimConfig {
        seed: 12345,
        ..Default::default()
    });
    let mut engine_b = SimulationEngine::new(SimConfig {
        seed: 12345,
        ..Default::default()
    });
    for engine in [&mut engine_a, &mut engine_b] {
        engine.set_player_position(Vec3::ZERO);
        engine.start_level();
    }

    for _ in 0..600 {
        let json_a = serde_json::to_string(&engine_a.tick()).unwrap();
        let json_b = serde_json::to_string(&engine_b.tick()).unwrap();
        assert_eq!(json_a, json_b, "Snapshots diverged with same seed");
    }
}

#[test]
fn test_determinism_different_seeds() {
    let mut engine_a = SimulationEngine::new(SimConfig {
        seed: 111,
        ..Default::default()
    });
    let mut engine_b = SimulationEngine::new(SimConfig {
        seed: 222,
        ..Default::default()
    });
    for engine in [&mut engine_a, &mut engine_b] {
        engine.set_player_position(Vec3::ZERO);
        engine.start_level();
    }

    // Spawn side and height are drawn per seed once the first wave starts.
    let mut diverged = false;
    for _ in 0..300 {
        let json_a = serde_json::to_string(&engine_a.tick()).unwrap();
        let json_b = serde_json::to_string(&engine_b.tick()).unwrap();
        if json_a != json_b {
            diverged = true;
            break;
        }
    }
    assert!(diverged, "Different seeds should produce divergent output");
}

// ---- Level flow ----

#[test]
fn test_level_start_signals_reach_first_snapshot() {
    let mut engine = engine_with(vec![tanks(1)]);
    let idle = engine.tick();
    assert_eq!(idle.level, LevelPhase::Idle);
    assert_eq!(idle.time.tick, 0);

    engine.start_level();
    let snap = engine.tick();
    assert_eq!(snap.level, LevelPhase::Running);
    assert_eq!(
        snap.events[..3],
        [
            GameEvent::EnvironmentSpeedChanged { speed: 10.0 },
            GameEvent::TankSpeedChanged { speed: 0.0 },
            GameEvent::LevelStart,
        ]
    );
    assert_eq!(snap.environment_speed, 10.0);
    assert_eq!(snap.time.tick, 1);
}

#[test]
fn test_second_wave_waits_for_first_to_clear() {
    let mut engine = engine_with(vec![tanks(3), tanks(2)]);
    engine.start_level();

    let mut events = Vec::new();
    let mut snap = engine.tick();
    for _ in 0..60 {
        events.extend(snap.events.drain(..));
        snap = engine.tick();
    }
    let first_wave = ids(&snap);
    assert_eq!(first_wave.len(), 3);
    assert_eq!(snap.waves.current_wave, Some(0));
    assert_eq!(snap.waves.alive, 3);

    // Two of three down: wave 2 still held back.
    for id in &first_wave[..2] {
        assert_eq!(engine.apply_damage(*id, DamageInfo::amount(100)), DamageOutcome::Killed);
    }
    for _ in 0..30 {
        snap = engine.tick();
        events.extend(snap.events.drain(..));
    }
    assert_eq!(ids(&snap), vec![first_wave[2]]);
    assert_eq!(snap.waves.current_wave, Some(0));

    engine.apply_damage(first_wave[2], DamageInfo::amount(100));
    for _ in 0..10 {
        snap = engine.tick();
        events.extend(snap.events.drain(..));
    }
    let second_wave = ids(&snap);
    assert_eq!(second_wave.len(), 2);
    assert!(second_wave.iter().all(|id| !first_wave.contains(id)));
    assert_eq!(snap.waves.current_wave, Some(1));
    assert_eq!(count(&events, EventKind::AllWavesCompleted), 0);

    for id in &second_wave {
        engine.apply_damage(*id, DamageInfo::amount(100));
    }
    for _ in 0..10 {
        snap = engine.tick();
        events.extend(snap.events.drain(..));
    }
    assert_eq!(count(&events, EventKind::AllWavesCompleted), 1);
    assert_eq!(count(&events, EventKind::LevelEnd), 1);
    assert_eq!(snap.level, LevelPhase::Ended);
    assert_eq!(snap.waves.phase, WavePhase::Completed);
    assert_eq!(snap.stats.enemies_spawned, 5);
    assert_eq!(snap.stats.enemies_killed, 5);
    assert_eq!(snap.stats.waves_completed, 2);
}

#[test]
fn test_enemies_outside_the_waves_do_not_advance_them() {
    let mut engine = engine_with(vec![tanks(1), tanks(1)]);
    engine.start_level();
    let mut snap = engine.tick();
    for _ in 0..5 {
        snap = engine.tick();
    }
    let wave_tank = ids(&snap);
    assert_eq!(wave_tank.len(), 1);

    let extra = engine.spawn_enemy(EnemyArchetype::Tank, Vec3::new(5.0, 0.5, 0.0), Side::Right);
    assert_eq!(engine.apply_damage(extra, DamageInfo::amount(100)), DamageOutcome::Killed);
    for _ in 0..5 {
        snap = engine.tick();
    }
    assert_eq!(snap.waves.current_wave, Some(0));
    assert_eq!(snap.waves.alive, 1);
    assert_eq!(ids(&snap), wave_tank);

    engine.apply_damage(wave_tank[0], DamageInfo::amount(100));
    for _ in 0..5 {
        snap = engine.tick();
    }
    assert_eq!(snap.waves.current_wave, Some(1));
    assert_eq!(snap.enemies.len(), 1);
    assert_ne!(ids(&snap), wave_tank);
}

#[test]
fn test_end_level_reconciles_alive_and_keeps_entities() {
    let mut engine = engine_with(vec![tanks(3)]);
    engine.start_level();
    for _ in 0..5 {
        engine.tick();
    }
    engine.end_level();
    engine.end_level();

    let snap = engine.tick();
    assert_eq!(snap.level, LevelPhase::Ended);
    assert_eq!(snap.waves.phase, WavePhase::Stopped);
    assert_eq!(snap.waves.alive, 0);
    assert_eq!(snap.enemies.len(), 3);
    assert_eq!(count(&snap.events, EventKind::LevelEnd), 1);
}

#[test]
fn test_spawns_skipped_without_player() {
    let mut engine = SimulationEngine::new(SimConfig::builtin(ScenarioId::Patrol));
    engine.start_level();

    let mut last = engine.tick();
    for _ in 0..1200 {
        last = engine.tick();
        assert!(last.enemies.is_empty());
    }
    assert_eq!(last.stats.enemies_spawned, 0);
    assert_eq!(last.level, LevelPhase::Ended);
}

// ---- Damage routing ----

#[test]
fn test_hit_proxy_forwards_damage_to_owner() {
    let mut engine = engine_with(Vec::new());
    let tank = engine.spawn_enemy(EnemyArchetype::Tank, Vec3::new(-5.0, 0.5, 0.0), Side::Left);
    let proxy = engine
        .attach_hit_proxy(tank, Vec3::new(0.0, 1.0, 0.0), Vec3::splat(0.5))
        .expect("tank is a live enemy");

    assert_eq!(
        engine.apply_damage(proxy, DamageInfo::amount(2)),
        DamageOutcome::Damaged { remaining: 3 }
    );
    let snap = engine.tick();
    assert_eq!(snap.enemies[0].hp, 3);

    assert_eq!(engine.apply_damage(proxy, DamageInfo::amount(10)), DamageOutcome::Killed);
    assert_eq!(engine.apply_damage(tank, DamageInfo::amount(10)), DamageOutcome::Ignored);
    assert_eq!(engine.apply_damage(proxy, DamageInfo::amount(10)), DamageOutcome::Ignored);

    let snap = engine.tick();
    assert_eq!(count(&snap.events, EventKind::EnemyDestroyed), 1);
    assert!(snap.effects.iter().any(|e| e.kind == EffectKind::BigExplosion));
    assert!(snap.enemies.is_empty());
}

#[test]
fn test_proxy_needs_live_enemy_owner() {
    let mut engine = engine_with(Vec::new());
    assert!(engine
        .attach_hit_proxy(EntityRef(u64::MAX), Vec3::ZERO, Vec3::ONE)
        .is_none());
    assert_eq!(
        engine.apply_damage(EntityRef(12345), DamageInfo::amount(1)),
        DamageOutcome::Ignored
    );
}

#[test]
fn test_shutdown_clears_bus() {
    let mut engine = engine_with(vec![tanks(1)]);
    engine.start_level();
    engine.tick();
    engine.shutdown();
    assert_eq!(engine.bus_mut().handler_count(EventKind::EnemyDestroyed), 0);
    assert_eq!(engine.bus_mut().handler_count(EventKind::AllWavesCompleted), 0);
    assert_eq!(engine.environment_speed(), 0.0);
}
