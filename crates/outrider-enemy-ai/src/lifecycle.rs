//! Screen lifecycle: tracks whether an enemy has entered view and decides
//! when an enemy that has left the screen should be removed.

use glam::Vec3;

use outrider_core::constants::{DESPAWN_VIEWPORT_MARGIN, ENTER_GRACE_SECS};
use outrider_core::projection::viewport_contains;
use outrider_core::services::CameraProjection;

/// Result of one lifecycle check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LifecycleVerdict {
    Keep,
    /// Entered, then left past the outer margin. Reported once.
    Despawn,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ScreenLifecycle {
    spawn_time: f32,
    has_entered: bool,
    initialized: bool,
    despawned: bool,
    /// Latch set by behaviours once committed to an on-screen engagement.
    pub disable_despawn: bool,
    pub grace_secs: f32,
}

impl Default for ScreenLifecycle {
    fn default() -> Self {
        Self {
            spawn_time: 0.0,
            has_entered: false,
            initialized: false,
            despawned: false,
            disable_despawn: false,
            grace_secs: ENTER_GRACE_SECS,
        }
    }
}

impl ScreenLifecycle {
    pub fn init(&mut self, now: f32) {
        self.spawn_time = now;
        self.has_entered = false;
        self.despawned = false;
        self.disable_despawn = false;
        self.initialized = true;
    }

    pub fn has_entered(&self) -> bool {
        self.has_entered
    }

    pub fn is_despawned(&self) -> bool {
        self.despawned
    }

    /// Project `position` and update entry state. Returns `Despawn` the first
    /// time an entered enemy is found beyond the expanded viewport.
    pub fn tick(
        &mut self,
        position: Vec3,
        camera: Option<&dyn CameraProjection>,
        now: f32,
    ) -> LifecycleVerdict {
        if !self.initialized {
            self.init(now);
        }
        if self.despawned {
            return LifecycleVerdict::Keep;
        }
        let Some(camera) = camera else {
            return LifecycleVerdict::Keep;
        };

        let v = camera.world_to_viewport(position);
        if viewport_contains(v, 0.0) {
            self.has_entered = true;
        }

        if self.disable_despawn {
            return LifecycleVerdict::Keep;
        }

        // Spawned unseen: give it time to fly in.
        if !self.has_entered && now - self.spawn_time < self.grace_secs {
            return LifecycleVerdict::Keep;
        }
        if !self.has_entered {
            return LifecycleVerdict::Keep;
        }

        let m = DESPAWN_VIEWPORT_MARGIN;
        let offscreen = v.x < -m || v.x > 1.0 + m || v.y < -m || v.y > 1.0 + m;
        if offscreen {
            self.despawned = true;
            return LifecycleVerdict::Despawn;
        }
        LifecycleVerdict::Keep
    }
}
