#[cfg(test)]
mod tests {
    use glam::Vec3;

    use crate::enums::*;
    use crate::error::ConfigError;
    use crate::events::{EventKind, GameEvent};
    use crate::scenario::{ScenarioConfig, SpawnRequest, WaveDefinition};
    use crate::state::SimSnapshot;
    use crate::tuning::Tuning;
    use crate::types::{Aabb, EntityRef, Ray, SimTime};

    #[test]
    fn test_sim_time_advance() {
        let mut time = SimTime::default();
        for _ in 0..60 {
            time.advance();
        }
        assert_eq!(time.tick, 60);
        assert!((time.elapsed_secs - 1.0).abs() < 1e-4);
    }

    #[test]
    fn test_spawn_side_resolution() {
        assert_eq!(SpawnSide::Left.resolve(0.9), Side::Left);
        assert_eq!(SpawnSide::Right.resolve(0.1), Side::Right);
        assert_eq!(SpawnSide::Random.resolve(0.2), Side::Left);
        assert_eq!(SpawnSide::Random.resolve(0.7), Side::Right);
    }

    #[test]
    fn test_side_direction() {
        // Entering from the left means travelling toward +X.
        assert_eq!(Side::Left.direction(), 1.0);
        assert_eq!(Side::Right.direction(), -1.0);
        assert_eq!(Side::Left.outward(), -1.0);
    }

    #[test]
    fn test_only_speed_events_are_sticky() {
        let sticky: Vec<EventKind> = EventKind::ALL
            .iter()
            .copied()
            .filter(|k| k.is_sticky())
            .collect();
        assert_eq!(
            sticky,
            vec![EventKind::EnvironmentSpeedChanged, EventKind::TankSpeedChanged]
        );
    }

    #[test]
    fn test_game_event_json_is_tagged() {
        let event = GameEvent::EnemyDestroyed {
            enemy: EntityRef(7),
            archetype: EnemyArchetype::Tank,
            cause: DestroyCause::Killed,
        };
        let json = serde_json::to_string(&event).unwrap();
        assert!(json.contains("\"type\":\"EnemyDestroyed\""));
        let back: GameEvent = serde_json::from_str(&json).unwrap();
        assert_eq!(back, event);
        assert_eq!(back.kind(), EventKind::EnemyDestroyed);
    }

    #[test]
    fn test_aabb_ray_hit_from_outside() {
        let aabb = Aabb::new(Vec3::new(5.0, 0.0, 0.0), Vec3::splat(1.0));
        let ray = Ray::new(Vec3::ZERO, Vec3::X);
        let (distance, normal) = aabb.ray_hit(&ray, 100.0).unwrap();
        assert!((distance - 4.0).abs() < 1e-5);
        assert_eq!(normal, Vec3::new(-1.0, 0.0, 0.0));
    }

    #[test]
    fn test_aabb_ray_miss_and_range() {
        let aabb = Aabb::new(Vec3::new(5.0, 0.0, 0.0), Vec3::splat(1.0));
        let up = Ray::new(Vec3::ZERO, Vec3::Y);
        assert!(aabb.ray_hit(&up, 100.0).is_none());
        let short = Ray::new(Vec3::ZERO, Vec3::X);
        assert!(aabb.ray_hit(&short, 3.0).is_none());
    }

    #[test]
    fn test_aabb_closest_point_and_corners() {
        let aabb = Aabb::new(Vec3::ZERO, Vec3::new(2.0, 1.0, 1.0));
        assert_eq!(
            aabb.closest_point(Vec3::new(10.0, 0.5, 0.0)),
            Vec3::new(2.0, 0.5, 0.0)
        );
        let corners = aabb.face_corners();
        assert!(corners.iter().all(|c| c.z == 0.0));
        assert!(corners.contains(&Vec3::new(-2.0, 1.0, 0.0)));
    }

    #[test]
    fn test_spawn_request_defaults() {
        let req: SpawnRequest = serde_json::from_str(r#"{"archetype":"Jet"}"#).unwrap();
        assert_eq!(req.archetype, EnemyArchetype::Jet);
        assert_eq!(req.count, 1);
        assert_eq!(req.spawn_interval, 0.5);
        assert_eq!(req.side, SpawnSide::Random);
        assert_eq!(req.mode, SpawnMode::Offscreen);
        assert_eq!(req.offscreen_margin_x, 2.0);
        assert_eq!(req.min_y_viewport, 0.55);
        assert_eq!(req.max_y_viewport, 0.95);
        assert!(req.use_player_z);
    }

    #[test]
    fn test_scenario_from_json_minimal() {
        let json = r#"{
            "name": "two drones",
            "waves": [
                { "start_delay": 1.0, "enemies": [ { "archetype": "Drone", "count": 2, "side": "Left" } ] }
            ],
            "tuning": { "drone": { "cruise_speed": 9.0 } }
        }"#;
        let scenario = ScenarioConfig::from_json_str(json).unwrap();
        assert_eq!(scenario.waves.len(), 1);
        assert_eq!(scenario.total_enemies(), 2);
        assert_eq!(scenario.tuning.drone.cruise_speed, 9.0);
        // Untouched fields keep their defaults.
        assert_eq!(scenario.tuning.drone.engage_distance, 30.0);
        assert_eq!(scenario.tuning.tank.muzzle_speed, 18.0);
        assert!(scenario.end_level_when_waves_complete);
    }

    #[test]
    fn test_scenario_rejects_zero_count() {
        let scenario = ScenarioConfig::new(
            "bad",
            vec![WaveDefinition::new(0.0, vec![SpawnRequest::new(EnemyArchetype::Drone, 0)])],
        );
        assert!(matches!(scenario.validate(), Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn test_scenario_rejects_inverted_band() {
        let mut req = SpawnRequest::new(EnemyArchetype::Jet, 1);
        req.min_y_viewport = 0.9;
        req.max_y_viewport = 0.4;
        let scenario = ScenarioConfig::new("bad", vec![WaveDefinition::new(0.0, vec![req])]);
        let err = scenario.validate().unwrap_err();
        assert!(err.to_string().contains("min_y_viewport"));
    }

    #[test]
    fn test_scenario_rejects_bad_tuning() {
        let mut scenario = ScenarioConfig::new("bad", Vec::new());
        scenario.tuning.tank.disengage_distance = 5.0;
        assert!(scenario.validate().is_err());
    }

    #[test]
    fn test_scenario_parse_error() {
        let err = ScenarioConfig::from_json_str("{ not json").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn test_scenario_load_missing_file() {
        let err = ScenarioConfig::load("/definitely/not/here.json").unwrap_err();
        assert!(matches!(err, ConfigError::Io(_)));
    }

    #[test]
    fn test_default_tuning_is_valid() {
        assert!(Tuning::default().check().is_ok());
        assert_eq!(Tuning::default().max_hp(EnemyArchetype::Drone), 3);
    }

    #[test]
    fn test_snapshot_serializes() {
        let snapshot = SimSnapshot::default();
        let json = serde_json::to_string(&snapshot).unwrap();
        assert!(json.contains("\"level\":\"Idle\""));
        let back: SimSnapshot = serde_json::from_str(&json).unwrap();
        assert_eq!(back.time.tick, 0);
    }
}
