//! Vertical kinematics of the bird.
//!
//! The bird never moves horizontally; its center `x` is fixed for the whole
//! session. Each tick [`BirdBody::integrate`] advances `y` and `v` under a
//! constant acceleration and then clamps `y` into `[y_floor, y_ceil]`. Hitting
//! either bound zeroes the velocity, so the bird rests against the top of the
//! field or the ground instead of bouncing.
//!
//! Crashing is a one-way switch: [`BirdBody::crash_boost`] lowers the ceiling
//! to the bottom of the field, triples gravity and kicks the bird upward, which
//! produces the short hop-then-plunge fall of the crash animation.
//!
//! ```
//! use flappy_core::bird::BirdBody;
//! use flappy_core::config::GameConfig;
//!
//! let mut bird = BirdBody::new(&GameConfig::default());
//! bird.integrate(0.5); // first step after reset only arms the integrator
//! assert_eq!(bird.y(), 640.0);
//!
//! bird.flap();
//! bird.integrate(0.1);
//! assert!(bird.y() < 640.0);
//! ```

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::config::GameConfig;
use crate::geometry::Rect;
use crate::is_valid_step;

/// Kinematic state of the bird.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BirdBody {
    x: f64,
    y: f64,
    /// Vertical velocity in px/s, positive is downward.
    v: f64,
    /// Vertical acceleration in px/s^2.
    a: f64,
    fly_velocity: f64,
    half_width: f64,
    half_height: f64,
    y_floor: f64,
    y_ceil: f64,
    /// Ceiling that replaces `y_ceil` once crashed.
    crash_floor: f64,
    crash_gravity_factor: f64,
    crash_flap_factor: f64,
    /// False until the first [`integrate`](Self::integrate) after reset.
    armed: bool,
    boosted: bool,
}

impl BirdBody {
    /// Create a bird at its reset position: mid-field, at rest.
    pub fn new(config: &GameConfig) -> Self {
        let bird = &config.bird;
        Self {
            x: config.bird_start_x(),
            y: config.bird_start_y(),
            v: bird.initial_velocity,
            a: bird.gravity,
            fly_velocity: bird.flap_velocity,
            half_width: bird.width / 2.0,
            half_height: bird.height / 2.0,
            y_floor: config.bird_floor(),
            y_ceil: config.bird_ceil(),
            crash_floor: config.crash_floor(),
            crash_gravity_factor: bird.crash_gravity_factor,
            crash_flap_factor: bird.crash_flap_factor,
            armed: false,
            boosted: false,
        }
    }

    /// Advance by `dt` seconds using the constant-acceleration update, then clamp.
    ///
    /// The first call after construction consumes no time: whatever elapsed
    /// before the bird was put in motion does not belong to its flight.
    /// A negative or non-finite `dt` leaves the bird untouched, arming included.
    pub fn integrate(&mut self, dt: f64) {
        if !is_valid_step(dt) {
            warn!(dt, "ignoring bird step with invalid dt");
            return;
        }
        let dt = if self.armed {
            dt
        } else {
            self.armed = true;
            0.0
        };

        self.y += self.v * dt + 0.5 * self.a * dt * dt;
        self.v += self.a * dt;

        if self.y < self.y_floor {
            self.y = self.y_floor;
            self.v = 0.0;
        } else if self.y > self.y_ceil {
            self.y = self.y_ceil;
            self.v = 0.0;
        }
    }

    /// Overwrite the vertical velocity with the flap velocity.
    pub fn flap(&mut self) {
        self.v = self.fly_velocity;
    }

    /// Switch to crash physics. Only the first call has an effect.
    pub fn crash_boost(&mut self) {
        if self.boosted {
            return;
        }
        self.boosted = true;
        self.y_ceil = self.crash_floor;
        self.v = self.fly_velocity * self.crash_flap_factor;
        self.a *= self.crash_gravity_factor;
    }

    // -- accessors ----------------------------------------------------------

    /// Center x. Fixed for the whole session.
    pub fn x(&self) -> f64 {
        self.x
    }

    /// Center y.
    pub fn y(&self) -> f64 {
        self.y
    }

    /// Vertical velocity in px/s; negative is upward.
    pub fn velocity(&self) -> f64 {
        self.v
    }

    /// Vertical acceleration in px/s², tripled after a crash.
    pub fn acceleration(&self) -> f64 {
        self.a
    }

    /// Velocity a flap sets.
    pub fn fly_velocity(&self) -> f64 {
        self.fly_velocity
    }

    /// Half of the bird's width.
    pub fn half_width(&self) -> f64 {
        self.half_width
    }

    /// Half of the bird's height.
    pub fn half_height(&self) -> f64 {
        self.half_height
    }

    /// Smallest y the center may take.
    pub fn y_floor(&self) -> f64 {
        self.y_floor
    }

    /// Largest y the center may take; moves down after a crash.
    pub fn y_ceil(&self) -> f64 {
        self.y_ceil
    }

    /// Whether crash physics are active.
    pub fn is_boosted(&self) -> bool {
        self.boosted
    }

    /// Left edge of the bounding box (the side already past an obstacle).
    pub fn trailing_edge(&self) -> f64 {
        self.x - self.half_width
    }

    /// Right edge of the bounding box (the side facing oncoming obstacles).
    pub fn leading_edge(&self) -> f64 {
        self.x + self.half_width
    }

    /// Top edge of the bird's box.
    pub fn top(&self) -> f64 {
        self.y - self.half_height
    }

    /// Bottom edge of the bird's box.
    pub fn bottom(&self) -> f64 {
        self.y + self.half_height
    }

    /// Outer bounding box.
    pub fn bounds(&self) -> Rect {
        Rect::new(
            self.trailing_edge(),
            self.top(),
            2.0 * self.half_width,
            2.0 * self.half_height,
        )
    }
}

/// Wing animation frame for `elapsed_ms` of animation time.
///
/// Four steps per cycle (up, mid, down, mid); the second mid reuses sprite
/// row 1, so the result is always 0, 1 or 2.
pub fn flap_frame(elapsed_ms: f64, frame_ms: f64) -> u8 {
    let step = (elapsed_ms / frame_ms).floor().rem_euclid(4.0) as u8;
    if step == 3 {
        1
    } else {
        step
    }
}

/// Sprite row shown while the wings are still (crash and result screens).
pub const RESTING_FRAME: u8 = 1;

#[cfg(test)]
mod tests {
    use super::*;

    fn armed_bird() -> BirdBody {
        let mut bird = BirdBody::new(&GameConfig::default());
        bird.integrate(0.0);
        bird
    }

    #[test]
    fn reset_state() {
        let bird = BirdBody::new(&GameConfig::default());
        assert_eq!(bird.x(), 127.5);
        assert_eq!(bird.y(), 640.0);
        assert_eq!(bird.velocity(), 0.0);
        assert_eq!(bird.acceleration(), 1400.0);
        assert!(!bird.is_boosted());
    }

    #[test]
    fn first_integrate_ignores_stale_time() {
        let mut bird = BirdBody::new(&GameConfig::default());
        bird.integrate(30.0);
        assert_eq!(bird.y(), 640.0);
        assert_eq!(bird.velocity(), 0.0);
    }

    #[test]
    fn invalid_dt_changes_nothing() {
        let mut bird = armed_bird();
        bird.integrate(0.2);
        let before = bird.clone();
        bird.integrate(-0.1);
        bird.integrate(f64::NAN);
        bird.integrate(f64::INFINITY);
        assert_eq!(bird, before);

        // An unarmed bird stays unarmed: the next valid step still consumes no time.
        let mut fresh = BirdBody::new(&GameConfig::default());
        fresh.integrate(-0.1);
        fresh.integrate(0.5);
        assert_eq!(fresh.y(), 640.0);
    }

    #[test]
    fn constant_acceleration_step() {
        let mut bird = armed_bird();
        bird.integrate(0.1);
        // 0.5 * 1400 * 0.01 = 7
        assert!((bird.y() - 647.0).abs() < 1e-9);
        assert!((bird.velocity() - 140.0).abs() < 1e-9);
    }

    #[test]
    fn flap_overwrites_velocity() {
        let mut bird = armed_bird();
        bird.integrate(0.3);
        assert!(bird.velocity() > 0.0);
        bird.flap();
        bird.flap();
        assert_eq!(bird.velocity(), -700.0);
    }

    #[test]
    fn clamps_to_ground_and_zeroes_velocity() {
        let mut bird = armed_bird();
        bird.integrate(5.0);
        assert_eq!(bird.y(), 970.0);
        assert_eq!(bird.velocity(), 0.0);
    }

    #[test]
    fn clamps_to_top_and_zeroes_velocity() {
        let mut bird = armed_bird();
        for _ in 0..20 {
            bird.flap();
            bird.integrate(0.1);
        }
        assert_eq!(bird.y(), 30.0);
        assert_eq!(bird.velocity(), 0.0);
    }

    #[test]
    fn crash_boost_is_one_way_and_applied_once() {
        let mut bird = armed_bird();
        bird.crash_boost();
        assert_eq!(bird.y_ceil(), 1310.0);
        assert_eq!(bird.acceleration(), 4200.0);
        assert_eq!(bird.velocity(), -1400.0);

        bird.integrate(0.1);
        bird.crash_boost();
        assert_eq!(bird.acceleration(), 4200.0);
        assert_ne!(bird.velocity(), -1400.0);
    }

    #[test]
    fn boosted_bird_falls_below_flight_ceiling() {
        let mut bird = armed_bird();
        bird.integrate(5.0);
        assert_eq!(bird.y(), 970.0);
        bird.crash_boost();
        for _ in 0..200 {
            bird.integrate(1.0 / 60.0);
        }
        assert_eq!(bird.y(), 1310.0);
    }

    #[test]
    fn edges_and_bounds() {
        let bird = BirdBody::new(&GameConfig::default());
        assert_eq!(bird.trailing_edge(), 85.0);
        assert_eq!(bird.leading_edge(), 170.0);
        assert_eq!(bird.top(), 610.0);
        assert_eq!(bird.bottom(), 670.0);
        assert_eq!(bird.bounds(), Rect::new(85.0, 610.0, 85.0, 60.0));
    }

    #[test]
    fn flap_frame_cycle() {
        let frames: Vec<u8> = (0..8).map(|i| flap_frame(i as f64 * 100.0, 100.0)).collect();
        assert_eq!(frames, vec![0, 1, 2, 1, 0, 1, 2, 1]);
        assert_eq!(flap_frame(99.9, 100.0), 0);
    }
}
