//! Which point a flying ball bends toward

use bevy::prelude::*;

use super::components::BallOwner;

/// Point to curve toward; `homing` applies the perfect-hit curve factor
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CurveTarget {
    pub point: Vec3,
    pub homing: bool,
}

/// What a policy gets to look at
#[derive(Debug, Clone, Copy, Default)]
pub struct TargetContext {
    pub perfect_hit: bool,
    pub owner: BallOwner,
    pub boss: Option<Vec3>,
    pub player: Option<Vec3>,
    pub bat: Option<Vec3>,
}

pub trait TargetPolicy: Send + Sync {
    fn resolve(&self, ctx: &TargetContext) -> Option<CurveTarget>;
}

/// Perfect hits home on the boss, everything else drifts toward the player
/// (or the bat when the player is gone)
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultTargetPolicy;

impl TargetPolicy for DefaultTargetPolicy {
    fn resolve(&self, ctx: &TargetContext) -> Option<CurveTarget> {
        if ctx.perfect_hit {
            if let Some(boss) = ctx.boss {
                return Some(CurveTarget {
                    point: boss,
                    homing: true,
                });
            }
        }
        ctx.player.or(ctx.bat).map(|point| CurveTarget {
            point,
            homing: false,
        })
    }
}

/// The policy every ball uses
#[derive(Resource)]
pub struct ActiveTargetPolicy(pub Box<dyn TargetPolicy>);

impl Default for ActiveTargetPolicy {
    fn default() -> Self {
        Self(Box::new(DefaultTargetPolicy))
    }
}

impl ActiveTargetPolicy {
    pub fn resolve(&self, ctx: &TargetContext) -> Option<CurveTarget> {
        self.0.resolve(ctx)
    }
}
