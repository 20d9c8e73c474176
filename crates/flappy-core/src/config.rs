//! Session configuration and eager validation.
//!
//! A [`GameConfig`] is checked once, when a session is constructed. Anything
//! that would let the simulation leave its documented envelope (inverted
//! ranges, non-finite numbers, a bird taller than the playable band, obstacle
//! ranges that can produce a negative top obstacle height) is rejected here
//! with a [`ConfigError`], never discovered mid-game.
//!
//! Defaults reproduce the classic 700x1280 portrait layout:
//!
//! ```
//! use flappy_core::config::GameConfig;
//!
//! let config = GameConfig::default();
//! config.validate().unwrap();
//! assert_eq!(config.bird_start_y(), 640.0);
//! assert_eq!(config.bird_ceil(), 970.0);
//! ```

use serde::{Deserialize, Serialize};

use crate::geometry::Rect;
use crate::ConfigError;

// ---------------------------------------------------------------------------
// BirdConfig
// ---------------------------------------------------------------------------

/// Bird body dimensions and kinematic constants.
///
/// Velocities are in px/s and accelerations in px/s^2. The y axis points
/// down, so a negative velocity moves the bird up.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BirdConfig {
    /// Full width of the bird's bounding box.
    pub width: f64,
    /// Full height of the bird's bounding box.
    pub height: f64,
    /// Vertical velocity at reset.
    pub initial_velocity: f64,
    /// Velocity a flap overwrites the current velocity with. Must be negative.
    pub flap_velocity: f64,
    /// Downward acceleration during flight.
    pub gravity: f64,
    /// Gravity multiplier applied when the bird crashes.
    pub crash_gravity_factor: f64,
    /// Multiple of `flap_velocity` the bird is kicked with when it crashes.
    pub crash_flap_factor: f64,
}

impl Default for BirdConfig {
    fn default() -> Self {
        Self {
            width: 85.0,
            height: 60.0,
            initial_velocity: 0.0,
            flap_velocity: -700.0,
            gravity: 1400.0,
            crash_gravity_factor: 3.0,
            crash_flap_factor: 2.0,
        }
    }
}

// ---------------------------------------------------------------------------
// ObstacleConfig
// ---------------------------------------------------------------------------

/// Obstacle geometry, motion and spawn cadence.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ObstacleConfig {
    /// Width of every obstacle.
    pub width: f64,
    /// Leftward speed in px/s, shared by every obstacle of a field.
    pub speed: f64,
    /// Minimum height of the bottom (DOWN) obstacle.
    pub min_height: f64,
    /// Maximum height of the bottom (DOWN) obstacle.
    pub max_height: f64,
    /// Minimum vertical gap between the two obstacles of a pair.
    pub min_gap: f64,
    /// Maximum vertical gap between the two obstacles of a pair.
    pub max_gap: f64,
    /// Time between two pair spawns, in milliseconds.
    pub spawn_interval_ms: f64,
    /// Distance from an obstacle's left edge to its collidable body.
    ///
    /// The drawn tube mouth is wider than the tube, so the bird may clip the
    /// rim by this many pixels without crashing.
    pub mouth_inset: f64,
}

impl Default for ObstacleConfig {
    fn default() -> Self {
        Self {
            width: 140.0,
            speed: 150.0,
            min_height: 380.0,
            max_height: 700.0,
            min_gap: 280.0,
            max_gap: 380.0,
            spawn_interval_ms: 4000.0,
            mouth_inset: 7.0,
        }
    }
}

// ---------------------------------------------------------------------------
// GameConfig
// ---------------------------------------------------------------------------

/// Complete configuration of a game session.
///
/// All lengths are in logical pixels of the playing field. Missing fields in
/// a JSON document fall back to [`GameConfig::default`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Width of the playing field. New obstacle pairs appear at this x.
    pub field_width: f64,
    /// Height of the playing field, ground band included.
    pub field_height: f64,
    /// Height of the ground band at the bottom of the field.
    pub ground_height: f64,
    /// Bird body parameters.
    pub bird: BirdConfig,
    /// Obstacle parameters.
    pub obstacles: ObstacleConfig,
    /// Duration of one wing animation frame, in milliseconds.
    pub flap_frame_ms: f64,
    /// Time the ground texture takes to scroll one full period, in milliseconds.
    pub ground_scroll_period_ms: f64,
    /// Distance the ground texture scrolls per period.
    pub ground_scroll_distance: f64,
    /// Width of the logical canvas that pointer coordinates are normalized to.
    pub canvas_width: f64,
    /// Height of the logical canvas that pointer coordinates are normalized to.
    pub canvas_height: f64,
    /// Restart affordance on the result screen, in logical canvas coordinates.
    pub restart_button: Rect,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            field_width: 700.0,
            field_height: 1280.0,
            ground_height: 280.0,
            bird: BirdConfig::default(),
            obstacles: ObstacleConfig::default(),
            flap_frame_ms: 100.0,
            ground_scroll_period_ms: 300.0,
            ground_scroll_distance: 60.0,
            canvas_width: 720.0,
            canvas_height: 1280.0,
            restart_button: Rect::new(228.0, 700.0, 264.0, 150.0),
        }
    }
}

impl GameConfig {
    /// Parse a JSON document and validate the result.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Parse`] for malformed JSON and any other
    /// [`ConfigError`] variant the parsed values violate.
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Horizontal position of the bird's center. Fixed for a whole session.
    pub fn bird_start_x(&self) -> f64 {
        1.5 * self.bird.width
    }

    /// Vertical position of the bird's center at reset (mid-field).
    pub fn bird_start_y(&self) -> f64 {
        self.field_height / 2.0
    }

    /// Smallest y the bird's center may take (top of the field).
    pub fn bird_floor(&self) -> f64 {
        self.bird.height / 2.0
    }

    /// Largest y the bird's center may take in flight (resting on the ground).
    pub fn bird_ceil(&self) -> f64 {
        self.field_height - self.ground_height - self.bird.height / 2.0
    }

    /// Largest y the bird's center may take once crashed (bottom of the field).
    pub fn crash_floor(&self) -> f64 {
        self.field_height + self.bird.height / 2.0
    }

    /// Check every invariant the simulation relies on.
    ///
    /// # Errors
    ///
    /// Returns the first violated constraint.
    pub fn validate(&self) -> Result<(), ConfigError> {
        require_positive("field_width", self.field_width)?;
        require_positive("field_height", self.field_height)?;
        require_non_negative("ground_height", self.ground_height)?;

        let bird = &self.bird;
        require_positive("bird.width", bird.width)?;
        require_positive("bird.height", bird.height)?;
        require_finite("bird.initial_velocity", bird.initial_velocity)?;
        require_finite("bird.flap_velocity", bird.flap_velocity)?;
        require_positive("bird.gravity", bird.gravity)?;
        require_positive("bird.crash_gravity_factor", bird.crash_gravity_factor)?;
        require_positive("bird.crash_flap_factor", bird.crash_flap_factor)?;
        if bird.flap_velocity >= 0.0 {
            return Err(ConfigError::FlapNotUpward {
                value: bird.flap_velocity,
            });
        }
        let band = self.field_height - self.ground_height;
        if bird.height > band {
            return Err(ConfigError::BirdDoesNotFit {
                bird_height: bird.height,
                band,
            });
        }

        let obst = &self.obstacles;
        require_positive("obstacles.width", obst.width)?;
        require_positive("obstacles.speed", obst.speed)?;
        require_non_negative("obstacles.min_height", obst.min_height)?;
        require_non_negative("obstacles.max_height", obst.max_height)?;
        require_non_negative("obstacles.min_gap", obst.min_gap)?;
        require_non_negative("obstacles.max_gap", obst.max_gap)?;
        require_positive("obstacles.spawn_interval_ms", obst.spawn_interval_ms)?;
        require_non_negative("obstacles.mouth_inset", obst.mouth_inset)?;
        require_ordered("obstacles.height", obst.min_height, obst.max_height)?;
        require_ordered("obstacles.gap", obst.min_gap, obst.max_gap)?;
        if obst.mouth_inset > obst.width {
            return Err(ConfigError::InvertedRange {
                field: "obstacles.mouth_inset",
                min: obst.mouth_inset,
                max: obst.width,
            });
        }
        let worst_top = self.field_height - obst.max_height - obst.max_gap;
        if worst_top < 0.0 {
            return Err(ConfigError::NegativeTopHeight {
                field_height: self.field_height,
                worst_case: worst_top,
            });
        }

        require_positive("flap_frame_ms", self.flap_frame_ms)?;
        require_positive("ground_scroll_period_ms", self.ground_scroll_period_ms)?;
        require_non_negative("ground_scroll_distance", self.ground_scroll_distance)?;
        require_positive("canvas_width", self.canvas_width)?;
        require_positive("canvas_height", self.canvas_height)?;

        let button = &self.restart_button;
        require_non_negative("restart_button.x", button.x)?;
        require_non_negative("restart_button.y", button.y)?;
        require_positive("restart_button.width", button.width)?;
        require_positive("restart_button.height", button.height)?;
        if button.right() > self.canvas_width || button.bottom() > self.canvas_height {
            return Err(ConfigError::RestartButtonOutsideCanvas {
                button: button.clone(),
                canvas_width: self.canvas_width,
                canvas_height: self.canvas_height,
            });
        }

        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Validation helpers
// ---------------------------------------------------------------------------

fn require_finite(field: &'static str, value: f64) -> Result<(), ConfigError> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(ConfigError::NonFinite { field, value })
    }
}

fn require_positive(field: &'static str, value: f64) -> Result<(), ConfigError> {
    require_finite(field, value)?;
    if value > 0.0 {
        Ok(())
    } else {
        Err(ConfigError::NotPositive { field, value })
    }
}

fn require_non_negative(field: &'static str, value: f64) -> Result<(), ConfigError> {
    require_finite(field, value)?;
    if value >= 0.0 {
        Ok(())
    } else {
        Err(ConfigError::Negative { field, value })
    }
}

fn require_ordered(field: &'static str, min: f64, max: f64) -> Result<(), ConfigError> {
    if min <= max {
        Ok(())
    } else {
        Err(ConfigError::InvertedRange { field, min, max })
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
