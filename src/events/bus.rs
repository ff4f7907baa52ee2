//! Fight log: timestamped combat events
//!
//! Combat code emits into the current frame's batch. `log_combat_events`
//! drains that batch once per frame, and drained events stay in the fight
//! history that the simulator replays into a `FightResult`.

use bevy::prelude::*;

use super::types::CombatEvent;

/// A combat event stamped with fight time
#[derive(Debug, Clone)]
pub struct BusEvent {
    /// Milliseconds of scaled time since the fight started
    pub time_ms: u32,
    pub event: CombatEvent,
}

#[derive(Resource, Debug, Default)]
pub struct EventBus {
    frame: Vec<BusEvent>,
    history: Vec<BusEvent>,
    clock_ms: u32,
}

impl EventBus {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stamp events emitted from now on with this fight time
    pub fn update_time(&mut self, elapsed_secs: f32) {
        self.clock_ms = (elapsed_secs.max(0.0) * 1000.0).round() as u32;
    }

    pub fn emit(&mut self, event: CombatEvent) {
        self.frame.push(BusEvent {
            time_ms: self.clock_ms,
            event,
        });
    }

    /// Take this frame's events. They are kept in the history as well.
    pub fn drain(&mut self) -> Vec<BusEvent> {
        let batch = std::mem::take(&mut self.frame);
        self.history.extend_from_slice(&batch);
        batch
    }

    /// Every drained event of the fight, oldest first
    pub fn processed(&self) -> &[BusEvent] {
        &self.history
    }

    /// Events emitted since the last drain
    pub fn pending_count(&self) -> usize {
        self.frame.len()
    }
}

/// Keep the bus clock on scaled time, so hit-stop freezes timestamps too
pub fn update_event_bus_time(mut bus: ResMut<EventBus>, time: Res<Time>) {
    bus.update_time(time.elapsed_secs());
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::boss::BossStateKind;

    #[test]
    fn test_events_carry_fight_time() {
        let mut bus = EventBus::new();
        bus.update_time(1.5);
        bus.emit(CombatEvent::BossDamaged { health: 2 });
        bus.update_time(2.25);
        bus.emit(CombatEvent::BossDefeated);

        let batch = bus.drain();
        let times: Vec<u32> = batch.iter().map(|e| e.time_ms).collect();
        assert_eq!(times, vec![1500, 2250]);
    }

    #[test]
    fn test_history_grows_across_drains() {
        let mut bus = EventBus::new();
        bus.emit(CombatEvent::BallConsumed);
        assert_eq!(bus.pending_count(), 1);
        assert_eq!(bus.drain().len(), 1);
        assert_eq!(bus.pending_count(), 0);

        bus.emit(CombatEvent::BossStateChanged {
            from: Some(BossStateKind::Idle),
            to: BossStateKind::Staggered,
        });
        assert_eq!(bus.drain().len(), 1);

        let history = bus.processed();
        assert_eq!(history.len(), 2);
        assert!(matches!(history[0].event, CombatEvent::BallConsumed));
        assert!(matches!(
            history[1].event,
            CombatEvent::BossStateChanged {
                to: BossStateKind::Staggered,
                ..
            }
        ));
    }

    #[test]
    fn test_undrained_events_are_not_history() {
        let mut bus = EventBus::new();
        bus.emit(CombatEvent::PlayerDefeated);
        assert!(bus.processed().is_empty());
    }
}
