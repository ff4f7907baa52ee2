//! Fight results, rebuilt from the combat event log

use serde::{Deserialize, Serialize};

use crate::boss::BossStateKind;
use crate::events::{BusEvent, CombatEvent, FightOutcome, Surface};
use crate::player::HitClass;
use crate::tuning::CombatTuning;

/// Bat swings that connected, by class
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct StrikeCounts {
    pub perfect: u32,
    pub normal: u32,
    pub close_range: u32,
}

impl StrikeCounts {
    pub fn total(&self) -> u32 {
        self.perfect + self.normal + self.close_range
    }
}

/// Result of a single fight
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FightResult {
    /// RNG seed the fight ran with
    pub seed: u64,
    pub outcome: FightOutcome,
    /// Scaled seconds
    pub duration: f32,
    pub boss_health: i32,
    pub player_health: i32,
    pub staggers: u32,
    pub score: u32,
    pub strikes: StrikeCounts,
    pub player_damage_taken: u32,
    pub balls_spawned: u32,
    /// Wall and boss-body bounces
    pub collisions: u32,
    pub boss_collisions: u32,
    pub hit_stops: u32,
}

impl FightResult {
    /// Replay the event log into a summary. A log without a FightEnded event
    /// is reported as a time-out at the last event's timestamp.
    pub fn from_events(seed: u64, events: &[BusEvent], tuning: &CombatTuning) -> Self {
        let mut result = Self {
            seed,
            outcome: FightOutcome::TimeLimit,
            duration: events.last().map_or(0.0, |e| e.time_ms as f32 / 1000.0),
            boss_health: tuning.boss.health,
            player_health: tuning.player.health,
            staggers: 0,
            score: 0,
            strikes: StrikeCounts::default(),
            player_damage_taken: 0,
            balls_spawned: 0,
            collisions: 0,
            boss_collisions: 0,
            hit_stops: 0,
        };

        for bus_event in events {
            match &bus_event.event {
                CombatEvent::BallSpawned { .. } => result.balls_spawned += 1,
                CombatEvent::BallStruck { class, .. } => match class {
                    HitClass::Perfect => result.strikes.perfect += 1,
                    HitClass::Normal => result.strikes.normal += 1,
                    HitClass::CloseRange => result.strikes.close_range += 1,
                    HitClass::Rejected => {}
                },
                CombatEvent::BallCollided { surface, .. } => {
                    result.collisions += 1;
                    if *surface == Surface::Boss {
                        result.boss_collisions += 1;
                    }
                }
                CombatEvent::PointsAwarded { total, .. } => result.score = *total,
                CombatEvent::HitStopStarted { .. } => result.hit_stops += 1,
                CombatEvent::BossStateChanged {
                    to: BossStateKind::Staggered,
                    ..
                } => result.staggers += 1,
                CombatEvent::BossDamaged { health } => result.boss_health = *health,
                CombatEvent::PlayerDamaged { health } => {
                    result.player_damage_taken += 1;
                    result.player_health = *health;
                }
                CombatEvent::FightEnded { outcome, duration } => {
                    result.outcome = *outcome;
                    result.duration = *duration;
                }
                _ => {}
            }
        }

        result
    }

    pub fn player_won(&self) -> bool {
        self.outcome == FightOutcome::BossDefeated
    }
}

/// Aggregate over a batch of fights
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BatchSummary {
    pub fights: u32,
    pub wins: u32,
    pub losses: u32,
    pub timeouts: u32,
    pub win_rate: f32,
    pub avg_duration: f32,
    pub avg_score: f32,
    pub avg_staggers: f32,
    pub avg_player_damage: f32,
    /// Share of connected swings that were perfect
    pub perfect_rate: f32,
    pub high_score: u32,
}

impl BatchSummary {
    pub fn from_results(results: &[FightResult]) -> Self {
        if results.is_empty() {
            return Self::default();
        }

        let n = results.len() as f32;
        let count = |outcome: FightOutcome| results.iter().filter(|r| r.outcome == outcome).count() as u32;
        let wins = count(FightOutcome::BossDefeated);

        let strikes: u32 = results.iter().map(|r| r.strikes.total()).sum();
        let perfect: u32 = results.iter().map(|r| r.strikes.perfect).sum();

        Self {
            fights: results.len() as u32,
            wins,
            losses: count(FightOutcome::PlayerDefeated),
            timeouts: count(FightOutcome::TimeLimit),
            win_rate: wins as f32 / n,
            avg_duration: results.iter().map(|r| r.duration).sum::<f32>() / n,
            avg_score: results.iter().map(|r| r.score as f32).sum::<f32>() / n,
            avg_staggers: results.iter().map(|r| r.staggers as f32).sum::<f32>() / n,
            avg_player_damage: results.iter().map(|r| r.player_damage_taken as f32).sum::<f32>() / n,
            perfect_rate: if strikes > 0 {
                perfect as f32 / strikes as f32
            } else {
                0.0
            },
            high_score: results.iter().map(|r| r.score).max().unwrap_or(0),
        }
    }

    /// Print summary to stdout
    pub fn print(&self) {
        println!("\n===== Fight Summary =====");
        println!("Fights:         {}", self.fights);
        println!(
            "Outcomes:       {} won / {} lost / {} timed out",
            self.wins, self.losses, self.timeouts
        );
        println!("Win rate:       {:.1}%", self.win_rate * 100.0);
        println!("Avg duration:   {:.1}s", self.avg_duration);
        println!("Avg staggers:   {:.2}", self.avg_staggers);
        println!("Avg damage:     {:.2}", self.avg_player_damage);
        println!("Perfect rate:   {:.1}%", self.perfect_rate * 100.0);
        println!("Avg score:      {:.0}", self.avg_score);
        println!("High score:     {}", self.high_score);
    }
}
