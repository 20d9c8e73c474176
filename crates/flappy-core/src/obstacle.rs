//! Obstacle pairs: spawning, scrolling and retirement.
//!
//! The [`ObstacleField`] keeps obstacles in spawn order. Pairs are always
//! appended together (UP at an even index, DOWN right after it) at the right
//! edge of the field, and every obstacle of a field moves at the same speed,
//! so spawn order is also left-to-right order. The collision scan, the score
//! scan and [`ObstacleField::evict_offscreen`] all rely on that ordering to
//! stop early.
//!
//! Spawning is driven by an accumulated timer rather than absolute
//! timestamps: a long gap between ticks yields at most one new pair.

use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::config::{GameConfig, ObstacleConfig};
use crate::is_valid_step;

// ---------------------------------------------------------------------------
// Obstacle
// ---------------------------------------------------------------------------

/// Which half of a pair an obstacle is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ObstacleKind {
    /// Hangs from the top of the field.
    Up,
    /// Rises from the bottom of the field.
    Down,
}

/// A single axis-aligned obstacle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Obstacle {
    pub kind: ObstacleKind,
    /// Left edge.
    pub x: f64,
    /// Top edge.
    pub y: f64,
    pub width: f64,
    pub height: f64,
    /// Leftward speed in px/s.
    pub speed_x: f64,
    /// Whether this obstacle's pair has already been scored. Only the UP
    /// member of a pair is ever marked.
    pub counted: bool,
}

impl Obstacle {
    /// Right edge (`x + width`).
    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    /// Bottom edge (`y + height`).
    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }

    /// Whether the obstacle has fully left the field on the left.
    pub fn is_out_of_view(&self) -> bool {
        self.x + self.width < 0.0
    }
}

// ---------------------------------------------------------------------------
// ObstacleField
// ---------------------------------------------------------------------------

/// Ordered collection of obstacle pairs plus the spawn timer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ObstacleField {
    obstacles: Vec<Obstacle>,
    config: ObstacleConfig,
    field_width: f64,
    field_height: f64,
    /// Milliseconds accumulated since the last spawn. `None` while armed: the
    /// next spawn check fires immediately.
    since_last_spawn_ms: Option<f64>,
    pairs_spawned: u64,
}

impl ObstacleField {
    /// Create an empty, armed field.
    pub fn new(config: &GameConfig) -> Self {
        Self {
            obstacles: Vec::new(),
            config: config.obstacles.clone(),
            field_width: config.field_width,
            field_height: config.field_height,
            since_last_spawn_ms: None,
            pairs_spawned: 0,
        }
    }

    /// Add `elapsed_ms` to the spawn timer and spawn a random pair if the
    /// interval has been exceeded (or the field is armed).
    ///
    /// Returns whether a pair was spawned. A negative or non-finite
    /// `elapsed_ms` is ignored, even by an armed field.
    pub fn spawn_pair_if_due<R: Rng + ?Sized>(&mut self, elapsed_ms: f64, rng: &mut R) -> bool {
        if !is_valid_step(elapsed_ms) {
            warn!(elapsed_ms, "ignoring spawn check with invalid elapsed time");
            return false;
        }
        let due = match self.since_last_spawn_ms.as_mut() {
            None => true,
            Some(since) => {
                *since += elapsed_ms;
                *since > self.config.spawn_interval_ms
            }
        };
        if due {
            self.spawn_pair(rng);
        }
        due
    }

    /// Spawn a random pair at the right edge of the field and restart the timer.
    pub fn spawn_pair<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        let bottom_height = rng.gen_range(self.config.min_height..=self.config.max_height);
        let gap = rng.gen_range(self.config.min_gap..=self.config.max_gap);
        let top_height = self.field_height - bottom_height - gap;
        self.push_pair(self.field_width, top_height, bottom_height);
        self.since_last_spawn_ms = Some(0.0);
        debug!(
            top_height,
            bottom_height,
            gap,
            pairs_spawned = self.pairs_spawned,
            "spawned obstacle pair"
        );
    }

    /// Append a pair at `x` with explicit heights.
    ///
    /// `x` must not be left of the newest pair already in the field.
    pub fn push_pair(&mut self, x: f64, top_height: f64, bottom_height: f64) {
        debug_assert!(
            self.obstacles.last().map_or(true, |last| last.x <= x),
            "obstacle pairs must be appended in x order"
        );
        let width = self.config.width;
        let speed_x = self.config.speed;
        self.obstacles.push(Obstacle {
            kind: ObstacleKind::Up,
            x,
            y: 0.0,
            width,
            height: top_height,
            speed_x,
            counted: false,
        });
        self.obstacles.push(Obstacle {
            kind: ObstacleKind::Down,
            x,
            y: self.field_height - bottom_height,
            width,
            height: bottom_height,
            speed_x,
            counted: false,
        });
        self.pairs_spawned += 1;
    }

    /// Move every obstacle left by its speed times `dt` seconds.
    ///
    /// A negative or non-finite `dt` is ignored, so obstacles never move right.
    pub fn advance(&mut self, dt: f64) {
        if !is_valid_step(dt) {
            warn!(dt, "ignoring obstacle step with invalid dt");
            return;
        }
        for obstacle in &mut self.obstacles {
            obstacle.x -= obstacle.speed_x * dt;
        }
    }

    /// Drop the leading run of obstacles that have left the field.
    ///
    /// Returns how many obstacles were removed.
    pub fn evict_offscreen(&mut self) -> usize {
        let gone = self
            .obstacles
            .iter()
            .position(|o| !o.is_out_of_view())
            .unwrap_or(self.obstacles.len());
        self.obstacles.drain(..gone);
        gone
    }

    // -- accessors ----------------------------------------------------------

    /// Obstacles in spawn order (UP, DOWN, UP, DOWN, ...).
    pub fn obstacles(&self) -> &[Obstacle] {
        &self.obstacles
    }

    /// Mutable access for marking pairs as counted.
    pub(crate) fn obstacles_mut(&mut self) -> &mut [Obstacle] {
        &mut self.obstacles
    }

    /// Number of obstacles (twice the pair count).
    pub fn len(&self) -> usize {
        self.obstacles.len()
    }

    /// Whether the field holds no obstacles.
    pub fn is_empty(&self) -> bool {
        self.obstacles.is_empty()
    }

    /// Number of pairs currently in the field.
    pub fn pair_count(&self) -> usize {
        self.obstacles.len() / 2
    }

    /// Total pairs added since the field was created, evicted ones included.
    pub fn pairs_spawned(&self) -> u64 {
        self.pairs_spawned
    }

    /// Whether the next spawn check fires regardless of elapsed time.
    pub fn is_armed(&self) -> bool {
        self.since_last_spawn_ms.is_none()
    }

    /// Obstacle parameters this field was built with.
    pub fn config(&self) -> &ObstacleConfig {
        &self.config
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    fn field() -> ObstacleField {
        ObstacleField::new(&GameConfig::default())
    }

    #[test]
    fn armed_field_spawns_on_first_check() {
        let mut field = field();
        let mut rng = Pcg32::seed_from_u64(7);
        assert!(field.is_armed());
        assert!(field.spawn_pair_if_due(0.0, &mut rng));
        assert_eq!(field.len(), 2);
        assert!(!field.is_armed());
    }

    #[test]
    fn spawned_pair_shape() {
        let mut field = field();
        let mut rng = Pcg32::seed_from_u64(42);
        field.spawn_pair(&mut rng);

        let up = &field.obstacles()[0];
        let down = &field.obstacles()[1];
        assert_eq!(up.kind, ObstacleKind::Up);
        assert_eq!(down.kind, ObstacleKind::Down);
        assert_eq!(up.x, 700.0);
        assert_eq!(down.x, 700.0);
        assert_eq!(up.y, 0.0);
        assert_eq!(down.bottom(), 1280.0);
        assert!((380.0..=700.0).contains(&down.height));

        let gap = down.y - up.bottom();
        assert!((280.0..=380.0).contains(&gap), "gap {gap}");
        assert!((up.height + gap + down.height - 1280.0).abs() < 1e-9);
        assert!(up.height >= 0.0);
    }

    #[test]
    fn spawn_requires_strictly_more_than_interval() {
        let mut field = field();
        let mut rng = Pcg32::seed_from_u64(1);
        field.spawn_pair_if_due(0.0, &mut rng);

        assert!(!field.spawn_pair_if_due(2000.0, &mut rng));
        assert!(!field.spawn_pair_if_due(2000.0, &mut rng));
        assert!(field.spawn_pair_if_due(0.5, &mut rng));
        assert_eq!(field.pair_count(), 2);
    }

    #[test]
    fn long_pause_spawns_only_once() {
        let mut field = field();
        let mut rng = Pcg32::seed_from_u64(1);
        field.spawn_pair_if_due(0.0, &mut rng);
        assert!(field.spawn_pair_if_due(60_000.0, &mut rng));
        assert!(!field.spawn_pair_if_due(16.0, &mut rng));
        assert_eq!(field.pairs_spawned(), 2);
    }

    #[test]
    fn advance_moves_left_by_speed() {
        let mut field = field();
        field.push_pair(700.0, 300.0, 500.0);
        field.advance(0.5);
        assert!(field.obstacles().iter().all(|o| o.x == 625.0));
    }

    #[test]
    fn invalid_dt_leaves_field_unchanged() {
        let mut field = field();
        let mut rng = Pcg32::seed_from_u64(3);

        // An armed field does not spawn on an invalid elapsed time.
        assert!(!field.spawn_pair_if_due(-16.0, &mut rng));
        assert!(field.is_armed());
        assert!(field.is_empty());

        field.spawn_pair_if_due(0.0, &mut rng);
        field.advance(1.0);
        let before = field.clone();
        field.advance(-0.5);
        field.advance(f64::NAN);
        assert!(!field.spawn_pair_if_due(-5_000.0, &mut rng));
        assert!(!field.spawn_pair_if_due(f64::INFINITY, &mut rng));
        assert_eq!(field, before);

        // The timer was not wound back: 4000 ms more still spawns on the strict boundary.
        assert!(!field.spawn_pair_if_due(4_000.0, &mut rng));
        assert!(field.spawn_pair_if_due(0.5, &mut rng));
    }

    #[test]
    fn eviction_boundary() {
        let mut field = field();
        field.push_pair(-140.01, 300.0, 500.0);
        field.push_pair(-139.99, 300.0, 500.0);
        assert_eq!(field.evict_offscreen(), 2);
        assert_eq!(field.len(), 2);
        assert!((field.obstacles()[0].right() - 0.01).abs() < 1e-9);
    }

    #[test]
    fn eviction_stops_at_first_visible() {
        let mut field = field();
        field.push_pair(-10.0, 300.0, 500.0);
        field.push_pair(400.0, 300.0, 500.0);
        assert_eq!(field.evict_offscreen(), 0);
        assert_eq!(field.len(), 4);
    }

    #[test]
    fn same_seed_same_pairs() {
        let mut a = field();
        let mut b = field();
        let mut rng_a = Pcg32::seed_from_u64(99);
        let mut rng_b = Pcg32::seed_from_u64(99);
        for _ in 0..5 {
            a.spawn_pair(&mut rng_a);
            b.spawn_pair(&mut rng_b);
        }
        assert_eq!(a, b);
    }
}
