//! Pass-through scoring of obstacle pairs.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::bird::BirdBody;
use crate::obstacle::ObstacleField;

/// Number of obstacle pairs the bird has fully cleared.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Scoreboard {
    score: u32,
}

impl Scoreboard {
    /// Create an empty scoreboard.
    pub fn new() -> Self {
        Self::default()
    }

    /// Pairs cleared so far.
    pub fn score(&self) -> u32 {
        self.score
    }

    /// Set the score back to zero.
    pub fn reset(&mut self) {
        self.score = 0;
    }

    /// Award one point for every uncounted pair now entirely behind the bird.
    ///
    /// Only the UP member of each pair is inspected and marked. The scan ends
    /// at the first pair still entirely ahead of the bird. Returns the number
    /// of points awarded by this call.
    pub fn register_pass(&mut self, bird: &BirdBody, field: &mut ObstacleField) -> u32 {
        let mut awarded = 0;
        for obstacle in field.obstacles_mut().iter_mut().step_by(2) {
            if !obstacle.counted && bird.trailing_edge() > obstacle.right() {
                obstacle.counted = true;
                self.score += 1;
                awarded += 1;
                debug!(score = self.score, "obstacle pair cleared");
            } else if bird.leading_edge() < obstacle.x {
                break;
            }
        }
        awarded
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GameConfig;

    fn setup() -> (BirdBody, ObstacleField) {
        let config = GameConfig::default();
        (BirdBody::new(&config), ObstacleField::new(&config))
    }

    #[test]
    fn pair_behind_bird_scores_once() {
        let (bird, mut field) = setup();
        // Right edge 84 < trailing edge 85.
        field.push_pair(-56.0, 300.0, 500.0);

        let mut board = Scoreboard::new();
        assert_eq!(board.register_pass(&bird, &mut field), 1);
        assert_eq!(board.register_pass(&bird, &mut field), 0);
        assert_eq!(board.score(), 1);
        assert!(field.obstacles()[0].counted);
        assert!(!field.obstacles()[1].counted);
    }

    #[test]
    fn trailing_edges_level_is_not_yet_passed() {
        let (bird, mut field) = setup();
        // Right edge exactly 85.
        field.push_pair(-55.0, 300.0, 500.0);
        let mut board = Scoreboard::new();
        assert_eq!(board.register_pass(&bird, &mut field), 0);
    }

    #[test]
    fn several_pairs_in_one_call() {
        let (bird, mut field) = setup();
        field.push_pair(-120.0, 300.0, 500.0);
        field.push_pair(-100.0, 300.0, 500.0);
        field.push_pair(-60.0, 300.0, 500.0);
        field.push_pair(400.0, 300.0, 500.0);

        let mut board = Scoreboard::new();
        assert_eq!(board.register_pass(&bird, &mut field), 3);
        assert_eq!(board.score(), 3);
    }

    #[test]
    fn overlapping_pair_neither_scores_nor_stops_scan() {
        let (bird, mut field) = setup();
        field.push_pair(100.0, 300.0, 500.0);
        let mut board = Scoreboard::new();
        assert_eq!(board.register_pass(&bird, &mut field), 0);
        assert!(!field.obstacles()[0].counted);
    }

    #[test]
    fn reset_zeroes_score() {
        let (bird, mut field) = setup();
        field.push_pair(-120.0, 300.0, 500.0);
        let mut board = Scoreboard::new();
        board.register_pass(&bird, &mut field);
        board.reset();
        assert_eq!(board.score(), 0);
    }
}
