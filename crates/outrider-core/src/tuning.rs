//! Per-archetype tuning parameters.
//!
//! Every struct deserializes with `#[serde(default)]`, so scenario files only
//! need to name the values they override. Defaults are the shipped game's
//! balance values. Tuning is immutable once a level starts.

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::enums::EnemyArchetype;

/// Hover drone: cruises in, holds a hover slot beside the player, fires bullets.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DroneTuning {
    pub max_hp: i32,
    pub half_extents: Vec3,
    pub lock_z_to_player: bool,

    pub cruise_speed: f32,
    /// Horizontal distance to the player at which the drone starts engaging.
    pub engage_distance: f32,
    /// Side distance of the hover slot (sign comes from the spawn side).
    pub hover_offset_x: f32,
    pub hover_snap_speed: f32,

    pub min_distance_to_player_x: f32,
    pub min_above_player_y: f32,
    pub lane_y_offset: f32,

    pub clamp_x_to_screen: bool,
    pub screen_x_margin: f32,

    pub avoid_radius: f32,
    pub avoid_strength: f32,
    /// Hard minimum separation; closer neighbours push 2.5x harder.
    pub min_separation: f32,
    pub max_avoid_offset: f32,
    pub avoid_smooth_time: f32,
    /// Enemy colliders are often triggers; ignoring them disables avoidance.
    pub include_trigger_enemies: bool,

    pub aim_turn_speed: f32,
    pub prepare_to_fire_secs: f32,
    pub fire_interval_secs: f32,
    pub fire_interval_jitter: f32,

    pub hover_arrive_distance: f32,
    /// Time box for MoveToHover; firing starts even if the slot is unreachable.
    pub max_move_to_hover_secs: f32,

    /// Fail-safe: a crashing drone explodes after this long regardless.
    pub explode_after_secs: f32,
    pub crash_x_speed_range: [f32; 2],
    pub crash_down_speed_range: [f32; 2],
    pub crash_z_speed_range: [f32; 2],
    pub crash_acceleration: Vec3,
    pub crash_hit_radius: f32,
    pub crash_surface_offset: f32,
    pub explode_on_env_hit: bool,
}

impl Default for DroneTuning {
    fn default() -> Self {
        Self {
            max_hp: 3,
            half_extents: Vec3::new(0.6, 0.4, 0.6),
            lock_z_to_player: true,
            cruise_speed: 6.0,
            engage_distance: 30.0,
            hover_offset_x: 12.0,
            hover_snap_speed: 6.0,
            min_distance_to_player_x: 20.0,
            min_above_player_y: 10.0,
            lane_y_offset: 2.0,
            clamp_x_to_screen: true,
            screen_x_margin: 0.8,
            avoid_radius: 4.5,
            avoid_strength: 5.0,
            min_separation: 3.0,
            max_avoid_offset: 2.2,
            avoid_smooth_time: 0.25,
            include_trigger_enemies: true,
            aim_turn_speed: 10.0,
            prepare_to_fire_secs: 0.35,
            fire_interval_secs: 3.5,
            fire_interval_jitter: 0.5,
            hover_arrive_distance: 1.25,
            max_move_to_hover_secs: 1.2,
            explode_after_secs: 5.0,
            crash_x_speed_range: [1.5, 4.0],
            crash_down_speed_range: [2.5, 6.5],
            crash_z_speed_range: [3.0, 10.0],
            crash_acceleration: Vec3::new(0.0, 6.0, 12.0),
            crash_hit_radius: 0.55,
            crash_surface_offset: 0.03,
            explode_on_env_hit: true,
        }
    }
}

/// Dive-bombing jet.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct JetTuning {
    pub max_hp: i32,
    pub half_extents: Vec3,

    pub cruise_speed: f32,
    /// Extra forward speed at the bottom of the dive.
    pub dive_boost: f32,
    pub dive_depth: f32,
    pub dive_duration: f32,
    pub climb_duration: f32,

    pub trigger_distance: f32,
    pub horizontal_trigger_only: bool,
    /// Dive progress in [0, 1] at which the bomb is released.
    pub drop_at_dive_progress: f32,

    /// Roll angle (degrees) at full dive.
    pub dive_tilt_angle: f32,
    pub rotation_smooth: f32,

    pub explode_fail_safe_secs: f32,
    /// Only explode on environment contact while crashing.
    pub require_destroying_to_explode: bool,
    pub crash_initial_z_speed: f32,
    pub crash_z_acceleration: f32,
    pub crash_initial_down_speed: f32,
    pub crash_down_acceleration: f32,
    /// Zero means "keep the current forward speed".
    pub crash_initial_x_speed: f32,
    pub crash_x_acceleration: f32,
    pub crash_x_random_drift: f32,
    pub crash_hit_radius: f32,

    pub pitch_approach_speed: f32,
    pub target_pitch_angle: f32,
    pub pitch_wobble_amplitude: f32,
    pub pitch_wobble_frequency: f32,
    pub roll_wobble_amplitude: f32,
    pub roll_wobble_frequency: f32,
    pub yaw_wobble_amplitude: f32,
    pub yaw_wobble_frequency: f32,
}

impl Default for JetTuning {
    fn default() -> Self {
        Self {
            max_hp: 2,
            half_extents: Vec3::new(1.2, 0.4, 0.6),
            cruise_speed: 10.0,
            dive_boost: 6.0,
            dive_depth: 1.8,
            dive_duration: 0.6,
            climb_duration: 0.7,
            trigger_distance: 6.5,
            horizontal_trigger_only: true,
            drop_at_dive_progress: 0.45,
            dive_tilt_angle: 25.0,
            rotation_smooth: 14.0,
            explode_fail_safe_secs: 6.0,
            require_destroying_to_explode: true,
            crash_initial_z_speed: 15.0,
            crash_z_acceleration: 60.0,
            crash_initial_down_speed: 10.0,
            crash_down_acceleration: 40.0,
            crash_initial_x_speed: 0.0,
            crash_x_acceleration: 0.0,
            crash_x_random_drift: 0.0,
            crash_hit_radius: 0.5,
            pitch_approach_speed: 2.5,
            target_pitch_angle: 85.0,
            pitch_wobble_amplitude: 18.0,
            pitch_wobble_frequency: 6.0,
            roll_wobble_amplitude: 12.0,
            roll_wobble_frequency: 3.0,
            yaw_wobble_amplitude: 8.0,
            yaw_wobble_frequency: 4.2,
        }
    }
}

/// Ground tank with a ballistic cannon.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TankTuning {
    pub max_hp: i32,
    pub half_extents: Vec3,

    pub cruise_speed: f32,
    pub engage_distance: f32,
    /// Re-chase once the player is farther than this (hysteresis above engage).
    pub disengage_distance: f32,

    pub clamp_engage_x_to_screen: bool,
    pub screen_x_margin: f32,

    pub cannon_turn_speed: f32,
    /// Apex point height above the higher endpoint.
    pub apex_extra_height: f32,
    /// Apex stays this far below the top screen edge.
    pub top_screen_margin: f32,

    pub prepare_to_fire_secs: f32,
    pub fire_interval_secs: f32,
    pub fire_interval_jitter: f32,
    pub muzzle_speed: f32,
    pub gravity: f32,
    /// Muzzle offset from the hull center.
    pub muzzle_offset: Vec3,

    pub shake_duration: f32,
    pub shake_magnitude: f32,

    /// Stop all updates while the environment scroll is paused.
    pub respond_to_env_pause: bool,

    pub front_probe_distance: f32,
    pub front_probe_radius: f32,
    /// Extra gap on top of both hulls' half widths.
    pub min_spacing_x: f32,
    pub front_probe_up: f32,
}

impl Default for TankTuning {
    fn default() -> Self {
        Self {
            max_hp: 5,
            half_extents: Vec3::new(1.5, 0.8, 1.0),
            cruise_speed: 6.0,
            engage_distance: 14.0,
            disengage_distance: 17.0,
            clamp_engage_x_to_screen: true,
            screen_x_margin: 0.8,
            cannon_turn_speed: 8.0,
            apex_extra_height: 6.0,
            top_screen_margin: 1.2,
            prepare_to_fire_secs: 0.55,
            fire_interval_secs: 2.5,
            fire_interval_jitter: 0.35,
            muzzle_speed: 18.0,
            gravity: 20.0,
            muzzle_offset: Vec3::new(0.0, 0.9, 0.0),
            shake_duration: 0.12,
            shake_magnitude: 0.08,
            respond_to_env_pause: true,
            front_probe_distance: 8.0,
            front_probe_radius: 1.2,
            min_spacing_x: 6.0,
            front_probe_up: 1.2,
        }
    }
}

/// Stationary turret boss that halts scrolling while alive.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MiniBossTuning {
    pub max_hp: i32,
    pub half_extents: Vec3,

    pub pause_env_on_enter: bool,
    pub resume_env_on_death: bool,
    pub disable_despawn_once_entered: bool,

    /// Inset applied to the viewport when checking whether any corner is visible.
    pub viewport_margin: f32,
    pub enter_event_delay_secs: f32,

    pub turret_turn_speed: f32,
    pub prepare_to_fire_secs: f32,
    pub fire_interval_secs: f32,
    pub fire_interval_jitter: f32,
    pub second_shot_delay: f32,
    /// Offsets of the two muzzles from the hull center.
    pub muzzle_offsets: [Vec3; 2],

    pub shake_duration: f32,
    pub shake_angle: f32,

    /// Delay between death and removal.
    pub destroy_after_secs: f32,

    pub snap_down_to_env: bool,
    pub fall_speed: f32,
    pub ground_ray_distance: f32,
    pub ground_surface_offset: f32,
}

impl Default for MiniBossTuning {
    fn default() -> Self {
        Self {
            max_hp: 30,
            half_extents: Vec3::new(2.5, 2.0, 1.5),
            pause_env_on_enter: true,
            resume_env_on_death: true,
            disable_despawn_once_entered: true,
            viewport_margin: 0.02,
            enter_event_delay_secs: 0.25,
            turret_turn_speed: 10.0,
            prepare_to_fire_secs: 0.6,
            fire_interval_secs: 2.0,
            fire_interval_jitter: 0.25,
            second_shot_delay: 0.08,
            muzzle_offsets: [Vec3::new(0.0, 2.4, -0.3), Vec3::new(0.0, 2.4, 0.3)],
            shake_duration: 0.12,
            shake_angle: 2.5,
            destroy_after_secs: 0.1,
            snap_down_to_env: true,
            fall_speed: 18.0,
            ground_ray_distance: 50.0,
            ground_surface_offset: 0.02,
        }
    }
}

/// Straight-flying projectile (bullet or bomb).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StraightShotTuning {
    pub speed: f32,
    pub damage: i32,
    pub lifetime_secs: f32,
    pub radius: f32,
    /// Aim once at spawn instead of homing every tick.
    pub lock_direction_on_spawn: bool,
}

/// Manually integrated ballistic shell.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ShellTuning {
    pub damage: i32,
    pub lifetime_secs: f32,
}

impl Default for ShellTuning {
    fn default() -> Self {
        Self {
            damage: 1,
            lifetime_secs: 6.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProjectileTuning {
    pub bullet: StraightShotTuning,
    pub bomb: StraightShotTuning,
    pub shell: ShellTuning,
    pub impact_effect_lifetime: f32,
}

impl Default for StraightShotTuning {
    fn default() -> Self {
        Self {
            speed: 60.0,
            damage: 1,
            lifetime_secs: 3.0,
            radius: 0.15,
            lock_direction_on_spawn: true,
        }
    }
}

impl Default for ProjectileTuning {
    fn default() -> Self {
        Self {
            bullet: StraightShotTuning::default(),
            bomb: StraightShotTuning {
                speed: 12.0,
                damage: 5,
                lifetime_secs: 6.0,
                radius: 0.3,
                lock_direction_on_spawn: true,
            },
            shell: ShellTuning::default(),
            impact_effect_lifetime: 2.0,
        }
    }
}

/// All tuning for one scenario.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    pub drone: DroneTuning,
    pub jet: JetTuning,
    pub tank: TankTuning,
    pub miniboss: MiniBossTuning,
    pub projectiles: ProjectileTuning,
}

impl Tuning {
    pub fn max_hp(&self, archetype: EnemyArchetype) -> i32 {
        match archetype {
            EnemyArchetype::Drone => self.drone.max_hp,
            EnemyArchetype::Jet => self.jet.max_hp,
            EnemyArchetype::Tank => self.tank.max_hp,
            EnemyArchetype::MiniBoss => self.miniboss.max_hp,
        }
    }

    pub fn half_extents(&self, archetype: EnemyArchetype) -> Vec3 {
        match archetype {
            EnemyArchetype::Drone => self.drone.half_extents,
            EnemyArchetype::Jet => self.jet.half_extents,
            EnemyArchetype::Tank => self.tank.half_extents,
            EnemyArchetype::MiniBoss => self.miniboss.half_extents,
        }
    }

    /// Describe the first out-of-range value, if any.
    pub fn check(&self) -> Result<(), String> {
        for archetype in [
            EnemyArchetype::Drone,
            EnemyArchetype::Jet,
            EnemyArchetype::Tank,
            EnemyArchetype::MiniBoss,
        ] {
            if self.max_hp(archetype) <= 0 {
                return Err(format!("{archetype:?} max_hp must be positive"));
            }
            if self.half_extents(archetype).min_element() <= 0.0 {
                return Err(format!("{archetype:?} half_extents must be positive"));
            }
        }
        let d = &self.drone;
        if d.min_separation > d.avoid_radius {
            return Err("drone min_separation must not exceed avoid_radius".into());
        }
        if d.fire_interval_secs < 0.0 || d.prepare_to_fire_secs < 0.0 {
            return Err("drone fire timings must be non-negative".into());
        }
        let j = &self.jet;
        if !(0.0..=1.0).contains(&j.drop_at_dive_progress) {
            return Err("jet drop_at_dive_progress must be within [0, 1]".into());
        }
        let t = &self.tank;
        if t.disengage_distance < t.engage_distance {
            return Err("tank disengage_distance must be at least engage_distance".into());
        }
        if t.muzzle_speed <= 0.0 || t.gravity <= 0.0 {
            return Err("tank muzzle_speed and gravity must be positive".into());
        }
        let m = &self.miniboss;
        if !(0.0..=0.2).contains(&m.viewport_margin) {
            return Err("miniboss viewport_margin must be within [0, 0.2]".into());
        }
        Ok(())
    }
}
