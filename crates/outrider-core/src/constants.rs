//! Simulation constants and fixed tuning parameters.

/// Simulation tick rate (Hz).
pub const TICK_RATE: u32 = 60;

/// Seconds per tick.
pub const DT: f32 = 1.0 / TICK_RATE as f32;

/// Speeds below this magnitude count as stopped.
pub const SPEED_EPSILON: f32 = 0.0001;

// --- Viewport ---

/// Viewport X just past the left edge used for offscreen spawns.
pub const SPAWN_VIEWPORT_LEFT_X: f32 = -0.1;

/// Viewport X just past the right edge used for offscreen spawns.
pub const SPAWN_VIEWPORT_RIGHT_X: f32 = 1.1;

/// Margin beyond each viewport edge before an entered entity is despawned.
pub const DESPAWN_VIEWPORT_MARGIN: f32 = 0.1;

/// Seconds an entity may stay unseen after spawning before lifecycle checks apply.
pub const ENTER_GRACE_SECS: f32 = 1.0;

/// Distance ahead of the camera used when a viewport ray misses the depth plane.
pub const DEGENERATE_RAY_FALLBACK_DISTANCE: f32 = 20.0;

// --- Level ---

/// Environment scroll speed published when a level starts.
pub const LEVEL_ENVIRONMENT_SPEED: f32 = 10.0;

/// Ground surface height of the default arena.
pub const DEFAULT_GROUND_Y: f32 = 0.0;

// --- Ballistics ---

/// Shortest flight time the ballistic solver will plan for (seconds).
pub const BALLISTIC_MIN_FLIGHT_TIME: f32 = 0.25;

/// Smallest horizontal displacement used for flight-time estimation.
pub const BALLISTIC_MIN_DX: f32 = 0.2;

// --- Avoidance ---

/// Repulsion multiplier applied inside the hard separation distance.
pub const HARD_SEPARATION_BOOST: f32 = 2.5;
