//! Bird-vs-obstacle and bird-vs-ground tests.
//!
//! Overlap is a plain AABB test on the bird's outer box, except on one side:
//! the obstacle's left boundary is pushed right by the tube mouth inset, so
//! the bird can graze the wider rim of an oncoming tube without crashing.
//! Edges that touch count as contact.

use serde::{Deserialize, Serialize};

use crate::bird::BirdBody;
use crate::config::ObstacleConfig;
use crate::obstacle::Obstacle;

/// What ended a flight.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CrashCause {
    /// The bird overlapped an obstacle.
    Pipe,
    /// The bird reached the ground.
    Ground,
}

/// Overlap tests parameterized by the tube mouth inset.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CollisionDetector {
    mouth_inset: f64,
}

impl CollisionDetector {
    /// Create a detector with an explicit mouth inset in pixels.
    pub fn new(mouth_inset: f64) -> Self {
        Self { mouth_inset }
    }

    /// Create a detector using the configured mouth inset.
    pub fn from_config(config: &ObstacleConfig) -> Self {
        Self::new(config.mouth_inset)
    }

    /// Pixels the collidable left edge sits right of the drawn one.
    pub fn mouth_inset(&self) -> f64 {
        self.mouth_inset
    }

    /// Whether the bird's box overlaps `obstacle`'s collidable body.
    pub fn overlaps_bird(&self, bird: &BirdBody, obstacle: &Obstacle) -> bool {
        let clear = bird.trailing_edge() > obstacle.right()
            || bird.leading_edge() < obstacle.x + self.mouth_inset
            || bird.top() > obstacle.bottom()
            || bird.bottom() < obstacle.y;
        !clear
    }

    /// Whether the bird rests on (or below) its current ceiling.
    pub fn hits_ground(&self, bird: &BirdBody) -> bool {
        bird.y() >= bird.y_ceil()
    }

    /// Index of the first obstacle, in spawn order, that overlaps the bird.
    ///
    /// Stops at the first obstacle lying entirely ahead of the bird; every
    /// later obstacle is further right.
    pub fn first_overlap(&self, bird: &BirdBody, obstacles: &[Obstacle]) -> Option<usize> {
        for (index, obstacle) in obstacles.iter().enumerate() {
            if self.overlaps_bird(bird, obstacle) {
                return Some(index);
            }
            if bird.leading_edge() < obstacle.x {
                break;
            }
        }
        None
    }

    /// Full crash check for a flight tick: obstacles first, then the ground.
    pub fn detect_crash(&self, bird: &BirdBody, obstacles: &[Obstacle]) -> Option<CrashCause> {
        if self.first_overlap(bird, obstacles).is_some() {
            Some(CrashCause::Pipe)
        } else if self.hits_ground(bird) {
            Some(CrashCause::Ground)
        } else {
            None
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
