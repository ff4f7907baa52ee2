//! Push-based boss state machine
//!
//! Each state decides its own successor by returning a request from
//! `enter`, `tick` or `on_ball_contact`. The machine owns one instance per
//! state kind, built up front, and performs Exit -> assign -> Enter as a
//! single transition.

use std::collections::HashMap;

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use super::stats::BossStats;
use crate::ball::BallOwner;
use crate::events::{CombatEvent, EventBus};
use crate::tuning::BossTuning;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BossStateKind {
    Idle,
    Attacking,
    Staggered,
}

/// Somewhere to put the balls the boss throws
pub trait BallSpawner {
    fn spawn_ball(&mut self, position: Vec3);
}

/// Spawn requests collected for a later system to turn into entities
impl BallSpawner for Vec<Vec3> {
    fn spawn_ball(&mut self, position: Vec3) {
        self.push(position);
    }
}

/// Everything a state may touch while it runs
pub struct BossContext<'a> {
    pub stats: &'a mut BossStats,
    pub tuning: &'a BossTuning,
    pub spawner: &'a mut dyn BallSpawner,
    pub events: &'a mut EventBus,
    pub position: Vec3,
}

/// A ball touching the boss trigger
#[derive(Debug, Clone, Copy)]
pub struct BallContact {
    pub perfect_hit: bool,
    pub owner: BallOwner,
}

impl BallContact {
    /// Only a perfect strike the player still owns can stagger the boss
    pub fn can_stagger(&self) -> bool {
        self.perfect_hit && self.owner == BallOwner::Player
    }
}

pub trait BossState: Send + Sync {
    fn kind(&self) -> BossStateKind;

    fn enter(&mut self, _ctx: &mut BossContext) -> Option<BossStateKind> {
        None
    }

    fn tick(&mut self, _ctx: &mut BossContext, _dt: f32) -> Option<BossStateKind> {
        None
    }

    fn exit(&mut self, _ctx: &mut BossContext) {}

    fn on_ball_contact(
        &mut self,
        _ctx: &mut BossContext,
        _contact: BallContact,
    ) -> Option<BossStateKind> {
        None
    }
}

#[derive(Component, Default)]
pub struct StateMachine {
    states: HashMap<BossStateKind, Box<dyn BossState>>,
    current: Option<BossStateKind>,
    in_transition: bool,
}

impl StateMachine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Machine with the standard Idle/Attacking/Staggered states registered
    pub fn standard() -> Self {
        let mut machine = Self::new();
        machine.register(Box::new(super::states::IdleState::default()));
        machine.register(Box::new(super::states::AttackingState::default()));
        machine.register(Box::new(super::states::StaggeredState::default()));
        machine
    }

    pub fn register(&mut self, state: Box<dyn BossState>) {
        self.states.insert(state.kind(), state);
    }

    pub fn current(&self) -> Option<BossStateKind> {
        self.current
    }

    pub fn is_in_transition(&self) -> bool {
        self.in_transition
    }

    /// Enter the initial Idle state
    pub fn start(&mut self, ctx: &mut BossContext) {
        self.change_state(BossStateKind::Idle, ctx);
    }

    /// Switch to `target`, then follow any successor the new state requests
    /// from its `enter`. Returns true if at least one transition happened.
    pub fn change_state(&mut self, target: BossStateKind, ctx: &mut BossContext) -> bool {
        if self.in_transition {
            warn!("Ignoring change to {:?} during a transition", target);
            return false;
        }

        let mut changed = false;
        let mut next = Some(target);
        // Enough hops for every state to be entered once per call
        let mut hops_left = self.states.len() + 1;

        while let Some(kind) = next.take() {
            if hops_left == 0 {
                warn!("Boss state chain did not settle, stopping at {:?}", self.current);
                break;
            }
            hops_left -= 1;

            if !self.states.contains_key(&kind) {
                warn!("Boss state {:?} is not registered", kind);
                break;
            }
            if self.current == Some(kind) {
                break;
            }

            self.in_transition = true;
            let from = self.current;
            if let Some(old) = from.and_then(|k| self.states.get_mut(&k)) {
                old.exit(ctx);
            }
            self.current = Some(kind);
            debug!("Boss {:?} -> {:?}", from, kind);
            ctx.events.emit(CombatEvent::BossStateChanged { from, to: kind });

            next = self.states.get_mut(&kind).and_then(|state| state.enter(ctx));
            self.in_transition = false;
            changed = true;
        }

        changed
    }

    /// Advance the active state by `dt` seconds of scaled time
    pub fn tick(&mut self, ctx: &mut BossContext, dt: f32) {
        if self.in_transition || ctx.stats.is_defeated() {
            return;
        }
        let Some(kind) = self.current else {
            return;
        };
        let request = self
            .states
            .get_mut(&kind)
            .and_then(|state| state.tick(ctx, dt));
        if let Some(next) = request {
            self.change_state(next, ctx);
        }
    }

    /// Offer a ball contact to the active state.
    /// Returns true if the ball was used up (it staggered the boss).
    pub fn handle_ball_contact(&mut self, ctx: &mut BossContext, contact: BallContact) -> bool {
        if self.in_transition || ctx.stats.is_defeated() {
            return false;
        }
        let Some(kind) = self.current else {
            return false;
        };
        let request = self
            .states
            .get_mut(&kind)
            .and_then(|state| state.on_ball_contact(ctx, contact));
        match request {
            Some(BossStateKind::Staggered) => {
                let staggered = self.change_state(BossStateKind::Staggered, ctx);
                if staggered {
                    ctx.events.emit(CombatEvent::BallConsumed);
                }
                staggered
            }
            Some(other) => {
                self.change_state(other, ctx);
                false
            }
            None => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use super::*;

    type Log = Arc<Mutex<Vec<String>>>;

    /// State that records its calls and optionally chains to another state
    struct Recorder {
        kind: BossStateKind,
        log: Log,
        on_enter: Option<BossStateKind>,
    }

    impl BossState for Recorder {
        fn kind(&self) -> BossStateKind {
            self.kind
        }

        fn enter(&mut self, _ctx: &mut BossContext) -> Option<BossStateKind> {
            self.log.lock().unwrap().push(format!("enter {:?}", self.kind));
            self.on_enter
        }

        fn exit(&mut self, _ctx: &mut BossContext) {
            self.log.lock().unwrap().push(format!("exit {:?}", self.kind));
        }
    }

    fn recorder(kind: BossStateKind, log: &Log, on_enter: Option<BossStateKind>) -> Box<Recorder> {
        Box::new(Recorder {
            kind,
            log: log.clone(),
            on_enter,
        })
    }

    struct Fixture {
        stats: BossStats,
        tuning: BossTuning,
        spawned: Vec<Vec3>,
        events: EventBus,
    }

    impl Fixture {
        fn new() -> Self {
            Self {
                stats: BossStats::new(3),
                tuning: BossTuning::default(),
                spawned: Vec::new(),
                events: EventBus::new(),
            }
        }

        fn ctx(&mut self) -> BossContext<'_> {
            BossContext {
                stats: &mut self.stats,
                tuning: &self.tuning,
                spawner: &mut self.spawned,
                events: &mut self.events,
                position: Vec3::ZERO,
            }
        }
    }

    #[test]
    fn test_exit_runs_before_enter() {
        let log: Log = Default::default();
        let mut machine = StateMachine::new();
        machine.register(recorder(BossStateKind::Idle, &log, None));
        machine.register(recorder(BossStateKind::Staggered, &log, None));

        let mut fx = Fixture::new();
        machine.start(&mut fx.ctx());
        machine.change_state(BossStateKind::Staggered, &mut fx.ctx());

        assert_eq!(
            *log.lock().unwrap(),
            vec!["enter Idle", "exit Idle", "enter Staggered"]
        );
        assert_eq!(machine.current(), Some(BossStateKind::Staggered));
        assert!(!machine.is_in_transition());
    }

    #[test]
    fn test_same_state_is_noop() {
        let log: Log = Default::default();
        let mut machine = StateMachine::new();
        machine.register(recorder(BossStateKind::Idle, &log, None));

        let mut fx = Fixture::new();
        machine.start(&mut fx.ctx());
        assert!(!machine.change_state(BossStateKind::Idle, &mut fx.ctx()));
        assert_eq!(log.lock().unwrap().len(), 1);
    }

    #[test]
    fn test_unregistered_state_is_noop() {
        let log: Log = Default::default();
        let mut machine = StateMachine::new();
        machine.register(recorder(BossStateKind::Idle, &log, None));

        let mut fx = Fixture::new();
        machine.start(&mut fx.ctx());
        assert!(!machine.change_state(BossStateKind::Attacking, &mut fx.ctx()));
        assert_eq!(machine.current(), Some(BossStateKind::Idle));
    }

    #[test]
    fn test_enter_request_chains() {
        let log: Log = Default::default();
        let mut machine = StateMachine::new();
        machine.register(recorder(BossStateKind::Idle, &log, None));
        machine.register(recorder(
            BossStateKind::Attacking,
            &log,
            Some(BossStateKind::Idle),
        ));

        let mut fx = Fixture::new();
        machine.start(&mut fx.ctx());
        machine.change_state(BossStateKind::Attacking, &mut fx.ctx());

        assert_eq!(machine.current(), Some(BossStateKind::Idle));
        assert_eq!(
            *log.lock().unwrap(),
            vec![
                "enter Idle",
                "exit Idle",
                "enter Attacking",
                "exit Attacking",
                "enter Idle"
            ]
        );
    }

    #[test]
    fn test_cyclic_chain_terminates() {
        let log: Log = Default::default();
        let mut machine = StateMachine::new();
        machine.register(recorder(
            BossStateKind::Idle,
            &log,
            Some(BossStateKind::Attacking),
        ));
        machine.register(recorder(
            BossStateKind::Attacking,
            &log,
            Some(BossStateKind::Idle),
        ));

        let mut fx = Fixture::new();
        machine.start(&mut fx.ctx());
        assert!(machine.current().is_some());
        assert!(!machine.is_in_transition());
    }

    #[test]
    fn test_transitions_are_reported() {
        let mut machine = StateMachine::standard();
        let mut fx = Fixture::new();
        machine.start(&mut fx.ctx());

        let events = fx.events.drain();
        assert_eq!(events.len(), 1);
        assert!(matches!(
            events[0].event,
            CombatEvent::BossStateChanged {
                from: None,
                to: BossStateKind::Idle
            }
        ));
    }

    #[test]
    fn test_contact_requires_perfect_player_ball() {
        let contact = |perfect_hit, owner| BallContact { perfect_hit, owner };
        assert!(contact(true, BallOwner::Player).can_stagger());
        assert!(!contact(true, BallOwner::Boss).can_stagger());
        assert!(!contact(false, BallOwner::Player).can_stagger());
    }
}
