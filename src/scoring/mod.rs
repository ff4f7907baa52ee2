//! Scoring module - points from fast impacts and the session high score

use bevy::prelude::*;

/// Where awarded points go
pub trait ScoreSink {
    /// Add points, returning the new total
    fn add_points(&mut self, points: u32) -> u32;
}

/// Score resource with an in-memory high score
#[derive(Resource, Default, Debug)]
pub struct Score {
    pub score: u32,
    pub high_score: u32,
}

impl Score {
    /// Start a new fight; the high score survives
    pub fn reset(&mut self) {
        self.score = 0;
    }
}

impl ScoreSink for Score {
    fn add_points(&mut self, points: u32) -> u32 {
        self.score += points;
        if self.score > self.high_score {
            self.high_score = self.score;
        }
        self.score
    }
}
