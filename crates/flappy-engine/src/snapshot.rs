//! Render-facing view of a session after a tick.
//!
//! A [`SessionSnapshot`] is plain owned data: the host can keep it, diff it
//! or send it to another thread without touching the session again.

use flappy_core::bird::{flap_frame, RESTING_FRAME};
use flappy_core::collision::CrashCause;
use flappy_core::config::GameConfig;
use flappy_core::obstacle::{Obstacle, ObstacleKind};
use serde::{Deserialize, Serialize};

use crate::events::GameEvent;
use crate::phase::Phase;
use crate::session::SessionState;

/// Where to draw the bird and which wing sprite to use.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BirdView {
    /// Center x.
    pub x: f64,
    /// Center y.
    pub y: f64,
    /// Sprite row: 0 (wings up), 1 (mid) or 2 (down).
    pub flap_frame: u8,
    /// The result screen covers the bird.
    pub visible: bool,
}

/// One obstacle rectangle.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ObstacleView {
    pub kind: ObstacleKind,
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl From<&Obstacle> for ObstacleView {
    fn from(obstacle: &Obstacle) -> Self {
        Self {
            kind: obstacle.kind,
            x: obstacle.x,
            y: obstacle.y,
            width: obstacle.width,
            height: obstacle.height,
        }
    }
}

/// Everything a renderer needs for one frame.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionSnapshot {
    /// Ticks executed so far.
    pub tick: u64,
    pub phase: Phase,
    pub bird: BirdView,
    /// Obstacles in spawn order (UP, DOWN, UP, DOWN, ...).
    pub obstacles: Vec<ObstacleView>,
    pub score: u32,
    /// Horizontal ground texture offset in pixels, in `[0, scroll distance)`.
    pub ground_offset: f64,
    pub crash_cause: Option<CrashCause>,
    /// Events raised by the tick that produced this snapshot, in order.
    pub events: Vec<GameEvent>,
}

impl SessionSnapshot {
    /// Build the render view of `state`, carrying `events`.
    pub(crate) fn capture(config: &GameConfig, state: &SessionState, events: &[GameEvent]) -> Self {
        let flap_frame = if state.phase.animates_wings() {
            flap_frame(state.wing_clock_ms, config.flap_frame_ms)
        } else {
            RESTING_FRAME
        };

        Self {
            tick: state.tick_counter,
            phase: state.phase,
            bird: BirdView {
                x: state.bird.x(),
                y: state.bird.y(),
                flap_frame,
                visible: state.phase != Phase::Result,
            },
            obstacles: state.field.obstacles().iter().map(ObstacleView::from).collect(),
            score: state.scoreboard.score(),
            ground_offset: ground_offset(config, state.clock_ms),
            crash_cause: state.crash_cause,
            events: events.to_vec(),
        }
    }

    /// Whether any event of the tick matches `predicate`.
    pub fn has_event(&self, predicate: impl Fn(&GameEvent) -> bool) -> bool {
        self.events.iter().any(predicate)
    }
}

/// Ground texture offset after `clock_ms` milliseconds of session time.
pub fn ground_offset(config: &GameConfig, clock_ms: f64) -> f64 {
    let period = config.ground_scroll_period_ms;
    clock_ms.rem_euclid(period) / period * config.ground_scroll_distance
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ground_offset_wraps_every_period() {
        let config = GameConfig::default();
        assert_eq!(ground_offset(&config, 0.0), 0.0);
        assert_eq!(ground_offset(&config, 150.0), 30.0);
        assert_eq!(ground_offset(&config, 300.0), 0.0);
        assert_eq!(ground_offset(&config, 1_125.0), 45.0);
    }
}
