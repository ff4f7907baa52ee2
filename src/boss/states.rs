//! The three boss states

use bevy::prelude::*;

use super::state_machine::{BallContact, BossContext, BossState, BossStateKind};
use crate::events::CombatEvent;
use crate::tuning::AttackMode;

/// Waiting out the attack interval
#[derive(Default)]
pub struct IdleState {
    attack_timer: f32,
}

impl BossState for IdleState {
    fn kind(&self) -> BossStateKind {
        BossStateKind::Idle
    }

    fn enter(&mut self, ctx: &mut BossContext) -> Option<BossStateKind> {
        self.attack_timer = ctx.tuning.attack_interval;
        None
    }

    fn tick(&mut self, ctx: &mut BossContext, dt: f32) -> Option<BossStateKind> {
        self.attack_timer -= dt;
        if self.attack_timer <= 0.0 && ctx.stats.has_ball {
            Some(BossStateKind::Attacking)
        } else {
            None
        }
    }

    fn on_ball_contact(
        &mut self,
        _ctx: &mut BossContext,
        contact: BallContact,
    ) -> Option<BossStateKind> {
        contact.can_stagger().then_some(BossStateKind::Staggered)
    }
}

/// Throwing a ball
#[derive(Default)]
pub struct AttackingState {
    hold_timer: f32,
}

impl BossState for AttackingState {
    fn kind(&self) -> BossStateKind {
        BossStateKind::Attacking
    }

    fn enter(&mut self, ctx: &mut BossContext) -> Option<BossStateKind> {
        let position = ctx.position + ctx.tuning.spawn_offset;
        ctx.spawner.spawn_ball(position);
        ctx.stats.has_ball = false;
        ctx.events.emit(CombatEvent::BallSpawned { position });

        match ctx.tuning.attack_mode {
            AttackMode::Instant => Some(BossStateKind::Idle),
            AttackMode::Held { duration } => {
                self.hold_timer = duration;
                None
            }
        }
    }

    fn tick(&mut self, _ctx: &mut BossContext, dt: f32) -> Option<BossStateKind> {
        self.hold_timer -= dt;
        (self.hold_timer <= 0.0).then_some(BossStateKind::Idle)
    }
}

/// Knocked off balance and open to damage
#[derive(Default)]
pub struct StaggeredState {
    recover_timer: f32,
}

impl BossState for StaggeredState {
    fn kind(&self) -> BossStateKind {
        BossStateKind::Staggered
    }

    fn enter(&mut self, ctx: &mut BossContext) -> Option<BossStateKind> {
        let defeated = ctx.stats.damage(ctx.tuning.stagger_damage);
        ctx.events.emit(CombatEvent::BossDamaged {
            health: ctx.stats.health,
        });
        if defeated {
            info!("Boss defeated");
            ctx.events.emit(CombatEvent::BossDefeated);
        }
        self.recover_timer = ctx.tuning.stagger_duration;
        None
    }

    fn tick(&mut self, ctx: &mut BossContext, dt: f32) -> Option<BossStateKind> {
        self.recover_timer -= dt;
        if self.recover_timer <= 0.0 {
            ctx.stats.has_ball = true;
            Some(BossStateKind::Idle)
        } else {
            None
        }
    }
}
