//! Flappy Core -- physics, obstacles, collisions and scoring for a one-button
//! flying game.
//!
//! This crate holds the pure simulation pieces. It has no notion of phases,
//! input or time sources; `flappy-engine` sequences these pieces into a game
//! session. Everything here is plain owned data advanced by explicit `dt`
//! values, so identical inputs and RNG seeds give identical results.
//!
//! # Quick Start
//!
//! ```
//! use flappy_core::prelude::*;
//! use rand::SeedableRng;
//!
//! let config = GameConfig::default();
//! config.validate().unwrap();
//!
//! let mut bird = BirdBody::new(&config);
//! let mut field = ObstacleField::new(&config);
//! let detector = CollisionDetector::from_config(&config.obstacles);
//! let mut board = Scoreboard::new();
//! let mut rng = rand::rngs::StdRng::seed_from_u64(1);
//!
//! field.spawn_pair_if_due(0.0, &mut rng);
//! for _ in 0..10 {
//!     bird.integrate(1.0 / 60.0);
//!     field.advance(1.0 / 60.0);
//!     board.register_pass(&bird, &mut field);
//! }
//! assert_eq!(field.pair_count(), 1);
//! assert_eq!(detector.detect_crash(&bird, field.obstacles()), None);
//! ```

#![deny(unsafe_code)]

pub mod bird;
pub mod collision;
pub mod config;
pub mod geometry;
pub mod obstacle;
pub mod scoreboard;

/// Whether `dt` is a usable time step: finite and not negative.
///
/// Every stepping operation treats any other value as a no-op.
pub fn is_valid_step(dt: f64) -> bool {
    dt >= 0.0 && dt.is_finite()
}

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

/// Configuration rejected by [`GameConfig::validate`](config::GameConfig::validate).
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// A value is NaN or infinite.
    #[error("`{field}` must be finite, got {value}")]
    NonFinite { field: &'static str, value: f64 },

    /// A dimension, speed or period is zero or negative.
    #[error("`{field}` must be positive, got {value}")]
    NotPositive { field: &'static str, value: f64 },

    /// A length that may be zero is negative.
    #[error("`{field}` must not be negative, got {value}")]
    Negative { field: &'static str, value: f64 },

    /// The lower end of a range exceeds the upper end.
    #[error("`{field}` range is inverted: min {min} > max {max}")]
    InvertedRange {
        field: &'static str,
        min: f64,
        max: f64,
    },

    /// The flap velocity would not move the bird up.
    #[error("bird.flap_velocity must be negative (upward), got {value}")]
    FlapNotUpward { value: f64 },

    /// The bird is taller than the band between the top of the field and the ground.
    #[error("bird height {bird_height} does not fit the {band} px flight band")]
    BirdDoesNotFit { bird_height: f64, band: f64 },

    /// The tallest bottom obstacle plus the widest gap exceed the field height.
    #[error(
        "obstacle ranges allow a negative top obstacle height ({worst_case}) in a {field_height} px field"
    )]
    NegativeTopHeight { field_height: f64, worst_case: f64 },

    /// The restart affordance lies partly outside the logical canvas.
    #[error("restart button {button:?} lies outside the {canvas_width}x{canvas_height} canvas")]
    RestartButtonOutsideCanvas {
        button: geometry::Rect,
        canvas_width: f64,
        canvas_height: f64,
    },

    /// The configuration document is not valid JSON for [`GameConfig`](config::GameConfig).
    #[error("failed to parse configuration: {0}")]
    Parse(#[from] serde_json::Error),
}

// ---------------------------------------------------------------------------
// Prelude
// ---------------------------------------------------------------------------

/// Convenience re-exports for common usage.
pub mod prelude {
    pub use crate::bird::{flap_frame, BirdBody, RESTING_FRAME};
    pub use crate::collision::{CollisionDetector, CrashCause};
    pub use crate::config::{BirdConfig, GameConfig, ObstacleConfig};
    pub use crate::geometry::Rect;
    pub use crate::obstacle::{Obstacle, ObstacleField, ObstacleKind};
    pub use crate::scoreboard::Scoreboard;
    pub use crate::ConfigError;
}

// ---------------------------------------------------------------------------
// Integration Tests
// ---------------------------------------------------------------------------
