//! Level flow: start signals, wave sequencing, and level end.

use std::cell::Cell;
use std::rc::Rc;

use rand_chacha::ChaCha8Rng;

use outrider_core::constants::LEVEL_ENVIRONMENT_SPEED;
use outrider_core::enums::LevelPhase;
use outrider_core::scenario::{ScenarioConfig, WaveDefinition};
use outrider_core::{EventBus, EventKind, GameEvent, SubscriptionId};
use outrider_enemy_ai::timers::Countdown;

use crate::systems::wave_orchestrator::{Spawner, WaveOrchestrator};

/// Owns the wave orchestrator and publishes level start/end.
pub struct LevelDirector {
    phase: LevelPhase,
    waves: WaveOrchestrator,
    definitions: Vec<WaveDefinition>,
    auto_end_after: Option<f32>,
    auto_end: Countdown,
    end_when_waves_complete: bool,
    waves_done: Rc<Cell<bool>>,
    subscription: Option<SubscriptionId>,
}

impl LevelDirector {
    pub fn new(scenario: &ScenarioConfig) -> Self {
        Self {
            phase: LevelPhase::Idle,
            waves: WaveOrchestrator::new(),
            definitions: scenario.waves.clone(),
            auto_end_after: scenario.auto_end_after_secs,
            auto_end: Countdown::default(),
            end_when_waves_complete: scenario.end_level_when_waves_complete,
            waves_done: Rc::new(Cell::new(false)),
            subscription: None,
        }
    }

    /// Start the level. Speed signals are always re-published; the rest
    /// only happens when the level is not already running.
    pub fn start(&mut self, bus: &mut EventBus, rng: &mut ChaCha8Rng) {
        bus.publish(GameEvent::EnvironmentSpeedChanged {
            speed: LEVEL_ENVIRONMENT_SPEED,
        });
        bus.publish(GameEvent::TankSpeedChanged { speed: 0.0 });

        if self.phase == LevelPhase::Running {
            return;
        }
        self.phase = LevelPhase::Running;
        log::info!("level started ({} waves)", self.definitions.len());
        bus.publish(GameEvent::LevelStart);

        if self.subscription.is_none() {
            let done = Rc::clone(&self.waves_done);
            self.subscription = Some(bus.subscribe(EventKind::AllWavesCompleted, move |_| done.set(true)));
        }
        self.waves_done.set(false);
        self.waves.start(&self.definitions, bus, rng);

        match self.auto_end_after {
            Some(secs) => self.auto_end.arm(secs),
            None => self.auto_end.cancel(),
        }
    }

    /// Advance waves and check the end conditions.
    pub fn tick(&mut self, dt: f32, bus: &mut EventBus, rng: &mut ChaCha8Rng, spawner: &mut dyn Spawner) {
        if self.phase != LevelPhase::Running {
            return;
        }
        self.waves.tick(dt, rng, bus, spawner);

        if self.waves_done.replace(false) && self.end_when_waves_complete {
            self.end_level(bus);
            return;
        }
        if self.auto_end.tick(dt) {
            log::info!("level time limit reached");
            self.end_level(bus);
        }
    }

    /// End a running level: stop the waves and publish `LevelEnd` once.
    pub fn end_level(&mut self, bus: &mut EventBus) {
        if self.phase != LevelPhase::Running {
            return;
        }
        self.phase = LevelPhase::Ended;
        self.auto_end.cancel();
        self.waves.stop(bus);
        log::info!("level ended");
        bus.publish(GameEvent::LevelEnd);
    }

    /// Drop every subscription this director holds.
    pub fn shutdown(&mut self, bus: &mut EventBus) {
        self.waves.stop(bus);
        if let Some(id) = self.subscription.take() {
            bus.unsubscribe(EventKind::AllWavesCompleted, id);
        }
    }

    pub fn phase(&self) -> LevelPhase {
        self.phase
    }

    pub fn waves(&self) -> &WaveOrchestrator {
        &self.waves
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;

    use rand::SeedableRng;

    use super::*;
    use outrider_core::enums::EnemyArchetype;
    use outrider_core::scenario::SpawnRequest;
    use outrider_core::types::EntityRef;

    struct Always;

    impl Spawner for Always {
        fn spawn(
            &mut self,
            _wave: usize,
            _request: &SpawnRequest,
            _rng: &mut ChaCha8Rng,
            _bus: &mut EventBus,
        ) -> Option<EntityRef> {
            Some(EntityRef(1))
        }
    }

    fn record_all(bus: &mut EventBus) -> Rc<RefCell<Vec<GameEvent>>> {
        let log = Rc::new(RefCell::new(Vec::new()));
        for kind in EventKind::ALL {
            let sink = Rc::clone(&log);
            bus.subscribe(kind, move |e| sink.borrow_mut().push(e.clone()));
        }
        log
    }

    #[test]
    fn start_publishes_speeds_then_level_start() {
        let mut bus = EventBus::new();
        let log = record_all(&mut bus);
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let scenario = ScenarioConfig::new(
            "t",
            vec![WaveDefinition::new(5.0, vec![SpawnRequest::new(EnemyArchetype::Drone, 1)])],
        );
        let mut director = LevelDirector::new(&scenario);
        director.start(&mut bus, &mut rng);
        director.start(&mut bus, &mut rng);

        assert_eq!(
            *log.borrow(),
            vec![
                GameEvent::EnvironmentSpeedChanged { speed: 10.0 },
                GameEvent::TankSpeedChanged { speed: 0.0 },
                GameEvent::LevelStart,
                GameEvent::EnvironmentSpeedChanged { speed: 10.0 },
                GameEvent::TankSpeedChanged { speed: 0.0 },
            ]
        );
        assert_eq!(director.phase(), LevelPhase::Running);
    }

    #[test]
    fn empty_level_ends_when_waves_complete() {
        let mut bus = EventBus::new();
        let log = record_all(&mut bus);
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let mut director = LevelDirector::new(&ScenarioConfig::new("empty", Vec::new()));
        director.start(&mut bus, &mut rng);
        director.tick(0.1, &mut bus, &mut rng, &mut Always);

        assert_eq!(director.phase(), LevelPhase::Ended);
        let log = log.borrow();
        assert_eq!(log.iter().filter(|e| **e == GameEvent::AllWavesCompleted).count(), 1);
        assert_eq!(log.last(), Some(&GameEvent::LevelEnd));
    }

    #[test]
    fn auto_end_fires_once() {
        let mut bus = EventBus::new();
        let log = record_all(&mut bus);
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let mut scenario = ScenarioConfig::new(
            "timed",
            vec![WaveDefinition::new(0.0, vec![SpawnRequest::new(EnemyArchetype::Tank, 1)])],
        );
        scenario.auto_end_after_secs = Some(0.5);
        let mut director = LevelDirector::new(&scenario);
        director.start(&mut bus, &mut rng);
        for _ in 0..20 {
            director.tick(0.1, &mut bus, &mut rng, &mut Always);
        }
        director.end_level(&mut bus);

        assert_eq!(director.phase(), LevelPhase::Ended);
        assert_eq!(director.waves().alive(), 0);
        let ends = log.borrow().iter().filter(|e| **e == GameEvent::LevelEnd).count();
        assert_eq!(ends, 1);
    }
}
