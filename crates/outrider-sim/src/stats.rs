//! Session bookkeeping fed by bus subscriptions.

use std::cell::RefCell;
use std::rc::Rc;

use outrider_core::enums::DestroyCause;
use outrider_core::state::SessionStats;
use outrider_core::{EventBus, EventKind, GameEvent, SubscriptionId};

/// Accumulates `SessionStats` from `EnemyDestroyed` and `PlayerHit`.
///
/// Spawn and wave counts are not visible on the bus; the engine reports
/// them directly.
#[derive(Default)]
pub struct StatsRecorder {
    stats: Rc<RefCell<SessionStats>>,
    subscriptions: Vec<(EventKind, SubscriptionId)>,
}

impl StatsRecorder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn attach(&mut self, bus: &mut EventBus) {
        self.detach(bus);

        let stats = Rc::clone(&self.stats);
        let id = bus.subscribe(EventKind::EnemyDestroyed, move |event| {
            if let GameEvent::EnemyDestroyed { cause, .. } = event {
                let mut s = stats.borrow_mut();
                match cause {
                    DestroyCause::Killed => s.enemies_killed += 1,
                    DestroyCause::Despawned => s.enemies_despawned += 1,
                }
            }
        });
        self.subscriptions.push((EventKind::EnemyDestroyed, id));

        let stats = Rc::clone(&self.stats);
        let id = bus.subscribe(EventKind::PlayerHit, move |event| {
            if let GameEvent::PlayerHit { damage, .. } = event {
                let mut s = stats.borrow_mut();
                s.player_hits += 1;
                s.player_damage += damage;
            }
        });
        self.subscriptions.push((EventKind::PlayerHit, id));
    }

    pub fn detach(&mut self, bus: &mut EventBus) {
        for (kind, id) in self.subscriptions.drain(..) {
            bus.unsubscribe(kind, id);
        }
    }

    pub fn note_spawned(&self, count: u32) {
        self.stats.borrow_mut().enemies_spawned += count;
    }

    pub fn set_waves_completed(&self, waves: u32) {
        self.stats.borrow_mut().waves_completed = waves;
    }

    pub fn reset(&self) {
        *self.stats.borrow_mut() = SessionStats::default();
    }

    pub fn stats(&self) -> SessionStats {
        *self.stats.borrow()
    }
}

/// Records every published event, in order, until drained.
#[derive(Default)]
pub struct EventLog {
    events: Rc<RefCell<Vec<GameEvent>>>,
    subscriptions: Vec<(EventKind, SubscriptionId)>,
}

impl EventLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn attach(&mut self, bus: &mut EventBus) {
        self.detach(bus);
        for kind in EventKind::ALL {
            let events = Rc::clone(&self.events);
            let id = bus.subscribe(kind, move |event| events.borrow_mut().push(event.clone()));
            self.subscriptions.push((kind, id));
        }
    }

    pub fn detach(&mut self, bus: &mut EventBus) {
        for (kind, id) in self.subscriptions.drain(..) {
            bus.unsubscribe(kind, id);
        }
    }

    pub fn drain(&self) -> Vec<GameEvent> {
        std::mem::take(&mut *self.events.borrow_mut())
    }
}

#[cfg(test)]
mod tests {
    use glam::Vec3;

    use super::*;
    use outrider_core::enums::EnemyArchetype;
    use outrider_core::types::EntityRef;

    #[test]
    fn counts_destroy_causes_and_player_damage() {
        let mut bus = EventBus::new();
        let mut stats = StatsRecorder::new();
        stats.attach(&mut bus);

        for cause in [DestroyCause::Killed, DestroyCause::Killed, DestroyCause::Despawned] {
            bus.publish(GameEvent::EnemyDestroyed {
                enemy: EntityRef(1),
                archetype: EnemyArchetype::Jet,
                cause,
            });
        }
        bus.publish(GameEvent::PlayerHit {
            damage: 5,
            hit_point: Vec3::ZERO,
        });

        let s = stats.stats();
        assert_eq!(s.enemies_killed, 2);
        assert_eq!(s.enemies_despawned, 1);
        assert_eq!(s.player_hits, 1);
        assert_eq!(s.player_damage, 5);

        stats.detach(&mut bus);
        bus.publish(GameEvent::PlayerHit {
            damage: 1,
            hit_point: Vec3::ZERO,
        });
        assert_eq!(stats.stats().player_hits, 1);
    }

    #[test]
    fn event_log_keeps_publish_order() {
        let mut bus = EventBus::new();
        let mut log = EventLog::new();
        log.attach(&mut bus);
        bus.publish(GameEvent::LevelStart);
        bus.publish(GameEvent::EnvironmentSpeedChanged { speed: 10.0 });
        bus.publish(GameEvent::LevelEnd);

        let events = log.drain();
        assert_eq!(
            events,
            vec![
                GameEvent::LevelStart,
                GameEvent::EnvironmentSpeedChanged { speed: 10.0 },
                GameEvent::LevelEnd
            ]
        );
        assert!(log.drain().is_empty());
    }
}
