//! Impact feedback: hit-stop, screen shake, sparks and score popups
//!
//! Hit-stop and shake run on real time so they keep going while virtual time
//! is paused. Sparks and popups are short-lived entities.

use bevy::prelude::*;
use rand::Rng;

use crate::constants::SCREEN_SHAKE_PEAK;

/// Seeded randomness for anything cosmetic or gameplay-random
#[derive(Resource)]
pub struct CombatRng(pub rand::rngs::StdRng);

impl CombatRng {
    pub fn seeded(seed: u64) -> Self {
        use rand::SeedableRng;
        Self(rand::rngs::StdRng::seed_from_u64(seed))
    }
}

/// Brief full pause after a hard impact
#[derive(Resource, Debug, Default)]
pub struct HitStop {
    remaining: f32,
}

impl HitStop {
    pub fn is_active(&self) -> bool {
        self.remaining > 0.0
    }

    /// Start (or extend) the pause
    pub fn begin(&mut self, duration: f32) {
        self.remaining = self.remaining.max(duration);
    }

    /// Count down real time. Returns true on the frame the pause ends.
    pub fn tick(&mut self, real_dt: f32) -> bool {
        if !self.is_active() {
            return false;
        }
        self.remaining -= real_dt;
        if self.remaining <= 0.0 {
            self.remaining = 0.0;
            true
        } else {
            false
        }
    }
}

/// Camera shake: offset a renderer adds to the camera position
#[derive(Resource, Debug, Default)]
pub struct ScreenShake {
    magnitude: f32,
    duration: f32,
    elapsed: f32,
    pub offset: Vec3,
}

impl ScreenShake {
    pub fn start(&mut self, magnitude: f32, duration: f32) {
        self.magnitude = magnitude;
        self.duration = duration;
        self.elapsed = 0.0;
    }

    pub fn is_active(&self) -> bool {
        self.duration > 0.0 && self.elapsed < self.duration
    }

    /// Rises to full magnitude at the peak, then fades to zero
    pub fn strength(&self) -> f32 {
        if !self.is_active() {
            return 0.0;
        }
        let t = self.elapsed / self.duration;
        if t < SCREEN_SHAKE_PEAK {
            self.magnitude * t / SCREEN_SHAKE_PEAK
        } else {
            self.magnitude * (1.0 - t) / (1.0 - SCREEN_SHAKE_PEAK)
        }
    }

    pub fn tick(&mut self, real_dt: f32, rng: &mut impl Rng) {
        if !self.is_active() {
            self.offset = Vec3::ZERO;
            return;
        }
        self.elapsed += real_dt;
        self.offset = random_in_unit_sphere(rng) * self.strength();
    }
}

fn random_in_unit_sphere(rng: &mut impl Rng) -> Vec3 {
    loop {
        let p = Vec3::new(
            rng.gen_range(-1.0..=1.0),
            rng.gen_range(-1.0..=1.0),
            rng.gen_range(-1.0..=1.0),
        );
        if p.length_squared() <= 1.0 {
            return p;
        }
    }
}

/// Despawn after this many seconds of scaled time
#[derive(Component, Debug)]
pub struct Lifetime(pub f32);

/// Impact spark, oriented along the contact normal
#[derive(Component, Debug)]
pub struct Spark {
    pub variant: u8,
    pub normal: Vec3,
}

/// Floating points indicator at a contact point
#[derive(Component, Debug)]
pub struct ScorePopup {
    pub points: u32,
}

/// Pause virtual time while a hit-stop runs
pub fn update_hit_stop(
    mut hit_stop: ResMut<HitStop>,
    real: Res<Time<Real>>,
    mut virtual_time: ResMut<Time<Virtual>>,
) {
    if hit_stop.is_active() && !virtual_time.is_paused() {
        virtual_time.pause();
    }
    if hit_stop.tick(real.delta_secs()) {
        virtual_time.unpause();
    }
}

pub fn update_screen_shake(
    mut shake: ResMut<ScreenShake>,
    real: Res<Time<Real>>,
    mut rng: ResMut<CombatRng>,
) {
    shake.tick(real.delta_secs(), &mut rng.0);
}

pub fn expire_lifetimes(
    mut commands: Commands,
    time: Res<Time>,
    mut query: Query<(Entity, &mut Lifetime)>,
) {
    for (entity, mut lifetime) in &mut query {
        lifetime.0 -= time.delta_secs();
        if lifetime.0 <= 0.0 {
            commands.entity(entity).despawn();
        }
    }
}
