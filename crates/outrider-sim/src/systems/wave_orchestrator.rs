//! Wave sequencing: start delay, concurrent spawn batches, wait for clear.
//!
//! The sequence is a resumable state machine advanced once per tick. Each
//! batch of a wave is an independent cursor emitting one enemy per
//! `spawn_interval`. The next wave starts only after every batch finished
//! and every enemy the orchestrator spawned has been reported by an
//! `EnemyDestroyed` event. Enemies created outside the sequence never
//! count towards a wave.

use std::cell::RefCell;
use std::rc::Rc;

use rand_chacha::ChaCha8Rng;

use outrider_core::enums::WavePhase;
use outrider_core::scenario::{SpawnRequest, WaveDefinition};
use outrider_core::state::WaveView;
use outrider_core::types::EntityRef;
use outrider_core::{EventBus, EventKind, GameEvent, SubscriptionId};
use outrider_enemy_ai::random;

/// Creates enemies on behalf of the orchestrator.
pub trait Spawner {
    /// Spawn one enemy for `request` and return its id. `None` when the
    /// spawn was skipped; skipped spawns are not counted as alive.
    fn spawn(
        &mut self,
        wave: usize,
        request: &SpawnRequest,
        rng: &mut ChaCha8Rng,
        bus: &mut EventBus,
    ) -> Option<EntityRef>;
}

#[derive(Debug, Clone)]
struct BatchCursor {
    request: SpawnRequest,
    remaining: u32,
    wait: f32,
}

impl BatchCursor {
    /// `wait` at or below zero spawns on the first step; a negative value
    /// is time already spent past the wave's start delay.
    fn new(request: &SpawnRequest, wait: f32) -> Self {
        Self {
            request: request.clone(),
            remaining: request.count,
            wait,
        }
    }

    fn is_done(&self) -> bool {
        self.remaining == 0
    }
}

pub struct WaveOrchestrator {
    waves: Vec<WaveDefinition>,
    phase: WavePhase,
    current: usize,
    delay_left: f32,
    batches: Vec<BatchCursor>,
    alive: Rc<RefCell<Vec<EntityRef>>>,
    subscription: Option<SubscriptionId>,
    waves_completed: u32,
    completion_published: bool,
}

impl Default for WaveOrchestrator {
    fn default() -> Self {
        Self::new()
    }
}

impl WaveOrchestrator {
    pub fn new() -> Self {
        Self {
            waves: Vec::new(),
            phase: WavePhase::Idle,
            current: 0,
            delay_left: 0.0,
            batches: Vec::new(),
            alive: Rc::new(RefCell::new(Vec::new())),
            subscription: None,
            waves_completed: 0,
            completion_published: false,
        }
    }

    /// Begin sequencing `waves`. A running sequence is stopped first.
    pub fn start(&mut self, waves: &[WaveDefinition], bus: &mut EventBus, rng: &mut ChaCha8Rng) {
        self.stop(bus);

        self.waves = waves.to_vec();
        self.waves_completed = 0;
        self.completion_published = false;

        let alive = Rc::clone(&self.alive);
        self.subscription = Some(bus.subscribe(EventKind::EnemyDestroyed, move |event| {
            if let GameEvent::EnemyDestroyed { enemy, .. } = event {
                let mut alive = alive.borrow_mut();
                if let Some(i) = alive.iter().position(|id| id == enemy) {
                    alive.swap_remove(i);
                }
            }
        }));

        log::info!("wave sequence started ({} waves)", self.waves.len());
        if self.waves.is_empty() {
            self.finish(bus);
        } else {
            self.begin_wave(0, rng);
        }
    }

    /// Cancel pending batches and reconcile the alive count to zero.
    /// Entities already spawned stay in the world. Idempotent.
    pub fn stop(&mut self, bus: &mut EventBus) {
        if let Some(id) = self.subscription.take() {
            bus.unsubscribe(EventKind::EnemyDestroyed, id);
        }
        self.batches.clear();
        self.alive.borrow_mut().clear();
        if matches!(self.phase, WavePhase::Delay | WavePhase::Spawning | WavePhase::AwaitClear) {
            log::info!("wave sequence stopped during wave {}", self.current);
            self.phase = WavePhase::Stopped;
        }
    }

    /// Advance the sequence by `dt`, spawning through `spawner`.
    pub fn tick(
        &mut self,
        dt: f32,
        rng: &mut ChaCha8Rng,
        bus: &mut EventBus,
        spawner: &mut dyn Spawner,
    ) {
        loop {
            match self.phase {
                WavePhase::Idle | WavePhase::Completed | WavePhase::Stopped => return,
                WavePhase::Delay => {
                    if self.delay_left > 0.0 {
                        self.delay_left -= dt;
                        if self.delay_left > 0.0 {
                            return;
                        }
                    }
                    let overshoot = self.delay_left.min(0.0);
                    self.batches = self.waves[self.current]
                        .enemies
                        .iter()
                        .map(|request| BatchCursor::new(request, overshoot))
                        .collect();
                    self.phase = WavePhase::Spawning;
                    log::debug!("wave {} spawning {} batches", self.current, self.batches.len());
                }
                WavePhase::Spawning => {
                    self.step_batches(dt, rng, bus, spawner);
                    if !self.batches.iter().all(BatchCursor::is_done) {
                        return;
                    }
                    self.batches.clear();
                    self.phase = WavePhase::AwaitClear;
                }
                WavePhase::AwaitClear => {
                    if !self.alive.borrow().is_empty() {
                        return;
                    }
                    self.waves_completed += 1;
                    log::info!("wave {} cleared", self.current);
                    let next = self.current + 1;
                    if next < self.waves.len() {
                        self.begin_wave(next, rng);
                    } else {
                        self.finish(bus);
                    }
                }
            }
        }
    }

    fn begin_wave(&mut self, index: usize, rng: &mut ChaCha8Rng) {
        let wave = &self.waves[index];
        self.current = index;
        self.delay_left = wave.start_delay.max(0.0) + random::symmetric(rng, wave.start_delay_jitter);
        self.phase = WavePhase::Delay;
        log::info!("wave {index} begins in {:.2}s", self.delay_left.max(0.0));
    }

    fn step_batches(
        &mut self,
        dt: f32,
        rng: &mut ChaCha8Rng,
        bus: &mut EventBus,
        spawner: &mut dyn Spawner,
    ) {
        for batch in &mut self.batches {
            if batch.is_done() {
                continue;
            }
            if batch.wait > 0.0 {
                batch.wait -= dt;
                if batch.wait > 0.0 {
                    continue;
                }
            }
            if let Some(id) = spawner.spawn(self.current, &batch.request, rng, bus) {
                self.alive.borrow_mut().push(id);
            }
            batch.remaining -= 1;
            batch.wait += batch.request.spawn_interval.max(0.0);
        }
    }

    fn finish(&mut self, bus: &mut EventBus) {
        self.phase = WavePhase::Completed;
        if !self.completion_published {
            self.completion_published = true;
            log::info!("all waves completed");
            bus.publish(GameEvent::AllWavesCompleted);
        }
    }

    pub fn alive(&self) -> u32 {
        self.alive.borrow().len() as u32
    }

    pub fn phase(&self) -> WavePhase {
        self.phase
    }

    pub fn current_wave(&self) -> Option<usize> {
        match self.phase {
            WavePhase::Delay | WavePhase::Spawning | WavePhase::AwaitClear => Some(self.current),
            _ => None,
        }
    }

    pub fn total_waves(&self) -> usize {
        self.waves.len()
    }

    pub fn waves_completed(&self) -> u32 {
        self.waves_completed
    }

    pub fn is_subscribed(&self) -> bool {
        self.subscription.is_some()
    }

    pub fn view(&self) -> WaveView {
        WaveView {
            phase: self.phase,
            current_wave: self.current_wave(),
            total_waves: self.waves.len(),
            alive: self.alive(),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;

    use rand::SeedableRng;

    use super::*;
    use outrider_core::enums::{DestroyCause, EnemyArchetype};

    /// Hands out ids 100, 101, ... in spawn order.
    #[derive(Default)]
    struct Recorder {
        spawned: Vec<(usize, EnemyArchetype)>,
        refuse: bool,
    }

    impl Spawner for Recorder {
        fn spawn(
            &mut self,
            wave: usize,
            request: &SpawnRequest,
            _rng: &mut ChaCha8Rng,
            _bus: &mut EventBus,
        ) -> Option<EntityRef> {
            if self.refuse {
                return None;
            }
            self.spawned.push((wave, request.archetype));
            Some(EntityRef(99 + self.spawned.len() as u64))
        }
    }

    fn destroy_id(bus: &mut EventBus, id: u64) {
        bus.publish(GameEvent::EnemyDestroyed {
            enemy: EntityRef(id),
            archetype: EnemyArchetype::Drone,
            cause: DestroyCause::Killed,
        });
    }

    fn destroy(bus: &mut EventBus, n: u64) {
        for i in 0..n {
            destroy_id(bus, 100 + i);
        }
    }

    fn run(orch: &mut WaveOrchestrator, bus: &mut EventBus, rng: &mut ChaCha8Rng, spawner: &mut Recorder, ticks: u32) {
        for _ in 0..ticks {
            orch.tick(0.1, rng, bus, spawner);
        }
    }

    #[test]
    fn interval_spaces_spawns_within_a_batch() {
        let mut bus = EventBus::new();
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let mut orch = WaveOrchestrator::new();
        let mut spawner = Recorder::default();
        let wave = WaveDefinition::new(0.0, vec![SpawnRequest::new(EnemyArchetype::Jet, 3).every(0.25)]);
        orch.start(&[wave], &mut bus, &mut rng);

        orch.tick(0.1, &mut rng, &mut bus, &mut spawner);
        assert_eq!(spawner.spawned.len(), 1);
        run(&mut orch, &mut bus, &mut rng, &mut spawner, 2);
        assert_eq!(spawner.spawned.len(), 1);
        run(&mut orch, &mut bus, &mut rng, &mut spawner, 1);
        assert_eq!(spawner.spawned.len(), 2);
        run(&mut orch, &mut bus, &mut rng, &mut spawner, 3);
        assert_eq!(spawner.spawned.len(), 3);
        assert_eq!(orch.phase(), WavePhase::AwaitClear);
        assert_eq!(orch.alive(), 3);
    }

    #[test]
    fn start_delay_holds_first_spawn() {
        let mut bus = EventBus::new();
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let mut orch = WaveOrchestrator::new();
        let mut spawner = Recorder::default();
        let wave = WaveDefinition::new(1.0, vec![SpawnRequest::new(EnemyArchetype::Drone, 1)]);
        orch.start(&[wave], &mut bus, &mut rng);

        run(&mut orch, &mut bus, &mut rng, &mut spawner, 5);
        assert!(spawner.spawned.is_empty());
        assert_eq!(orch.phase(), WavePhase::Delay);
        run(&mut orch, &mut bus, &mut rng, &mut spawner, 6);
        assert_eq!(spawner.spawned.len(), 1);
    }

    #[test]
    fn batches_in_a_wave_spawn_concurrently() {
        let mut bus = EventBus::new();
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let mut orch = WaveOrchestrator::new();
        let mut spawner = Recorder::default();
        let wave = WaveDefinition::new(
            0.0,
            vec![
                SpawnRequest::new(EnemyArchetype::Drone, 2).every(10.0),
                SpawnRequest::new(EnemyArchetype::Tank, 2).every(10.0),
            ],
        );
        orch.start(&[wave], &mut bus, &mut rng);
        orch.tick(0.1, &mut rng, &mut bus, &mut spawner);
        assert_eq!(
            spawner.spawned,
            vec![(0, EnemyArchetype::Drone), (0, EnemyArchetype::Tank)]
        );
    }

    #[test]
    fn skipped_spawns_are_not_counted() {
        let mut bus = EventBus::new();
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let mut orch = WaveOrchestrator::new();
        let mut spawner = Recorder {
            refuse: true,
            ..Default::default()
        };
        let wave = WaveDefinition::new(0.0, vec![SpawnRequest::new(EnemyArchetype::Drone, 2).every(0.0)]);
        orch.start(&[wave], &mut bus, &mut rng);
        run(&mut orch, &mut bus, &mut rng, &mut spawner, 3);
        assert_eq!(orch.alive(), 0);
        assert_eq!(orch.phase(), WavePhase::Completed);
    }

    #[test]
    fn alive_counter_floors_at_zero() {
        let mut bus = EventBus::new();
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let mut orch = WaveOrchestrator::new();
        let mut spawner = Recorder::default();
        let wave = WaveDefinition::new(0.0, vec![SpawnRequest::new(EnemyArchetype::Drone, 1)]);
        orch.start(&[wave.clone(), wave], &mut bus, &mut rng);
        orch.tick(0.1, &mut rng, &mut bus, &mut spawner);
        destroy(&mut bus, 4);
        assert_eq!(orch.alive(), 0);
    }

    #[test]
    fn empty_sequence_completes_immediately() {
        let mut bus = EventBus::new();
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let done = Rc::new(RefCell::new(0));
        let sink = Rc::clone(&done);
        bus.subscribe(EventKind::AllWavesCompleted, move |_| *sink.borrow_mut() += 1);

        let mut orch = WaveOrchestrator::new();
        orch.start(&[], &mut bus, &mut rng);
        orch.tick(0.1, &mut rng, &mut bus, &mut Recorder::default());
        assert_eq!(*done.borrow(), 1);
        assert_eq!(orch.phase(), WavePhase::Completed);
    }

    #[test]
    fn stop_is_idempotent_and_unsubscribes() {
        let mut bus = EventBus::new();
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let mut orch = WaveOrchestrator::new();
        let mut spawner = Recorder::default();
        let wave = WaveDefinition::new(0.0, vec![SpawnRequest::new(EnemyArchetype::Drone, 5).every(1.0)]);
        orch.start(&[wave], &mut bus, &mut rng);
        orch.tick(0.1, &mut rng, &mut bus, &mut spawner);
        assert_eq!(orch.alive(), 1);
        assert_eq!(bus.handler_count(EventKind::EnemyDestroyed), 1);

        orch.stop(&mut bus);
        orch.stop(&mut bus);
        assert_eq!(orch.phase(), WavePhase::Stopped);
        assert_eq!(orch.alive(), 0);
        assert_eq!(bus.handler_count(EventKind::EnemyDestroyed), 0);

        run(&mut orch, &mut bus, &mut rng, &mut spawner, 30);
        assert_eq!(spawner.spawned.len(), 1);
    }

    #[test]
    fn unrelated_destructions_do_not_clear_a_wave() {
        let mut bus = EventBus::new();
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let mut orch = WaveOrchestrator::new();
        let mut spawner = Recorder::default();
        let wave = WaveDefinition::new(0.0, vec![SpawnRequest::new(EnemyArchetype::Tank, 1)]);
        orch.start(&[wave.clone(), wave], &mut bus, &mut rng);
        orch.tick(0.1, &mut rng, &mut bus, &mut spawner);
        assert_eq!(orch.alive(), 1);

        destroy_id(&mut bus, 7);
        destroy_id(&mut bus, 7);
        run(&mut orch, &mut bus, &mut rng, &mut spawner, 5);
        assert_eq!(orch.alive(), 1);
        assert_eq!(orch.current_wave(), Some(0));
        assert_eq!(spawner.spawned.len(), 1);

        destroy_id(&mut bus, 100);
        run(&mut orch, &mut bus, &mut rng, &mut spawner, 2);
        assert_eq!(orch.current_wave(), Some(1));
        assert_eq!(spawner.spawned.len(), 2);
    }

    #[test]
    fn spawn_cadence_carries_leftover_time() {
        let mut bus = EventBus::new();
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let mut orch = WaveOrchestrator::new();
        let mut spawner = Recorder::default();
        // 0.3s interval at 0.25s steps: spawns at 0, 0.5 (overshoot 0.2), 0.75.
        let wave = WaveDefinition::new(0.0, vec![SpawnRequest::new(EnemyArchetype::Jet, 3).every(0.3)]);
        orch.start(&[wave], &mut bus, &mut rng);

        let mut counts = Vec::new();
        for _ in 0..4 {
            orch.tick(0.25, &mut rng, &mut bus, &mut spawner);
            counts.push(spawner.spawned.len());
        }
        assert_eq!(counts, vec![1, 1, 2, 3]);
    }

    #[test]
    fn start_delay_overshoot_counts_towards_first_interval() {
        let mut bus = EventBus::new();
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let mut orch = WaveOrchestrator::new();
        let mut spawner = Recorder::default();
        // Delay ends at 0.3s, inside the second 0.25s step; the next spawn
        // is due at 0.6s, inside the third.
        let wave = WaveDefinition::new(0.3, vec![SpawnRequest::new(EnemyArchetype::Drone, 2).every(0.3)]);
        orch.start(&[wave], &mut bus, &mut rng);

        let mut counts = Vec::new();
        for _ in 0..3 {
            orch.tick(0.25, &mut rng, &mut bus, &mut spawner);
            counts.push(spawner.spawned.len());
        }
        assert_eq!(counts, vec![0, 1, 2]);
    }
}
