//! Property tests for bird kinematics, obstacle motion and scoring.
//!
//! These tests use `proptest` to generate random step sequences and verify
//! that the clamp, flap, eviction and scoring invariants hold after each step.

use flappy_core::prelude::*;
use proptest::prelude::*;
use rand::SeedableRng;
use rand_pcg::Pcg32;

/// One step applied to a bird.
#[derive(Debug, Clone)]
enum BirdOp {
    Integrate(f64),
    Flap,
    CrashBoost,
}

/// Non-negative time steps, from zero up to a quarter second.
fn dt_strategy() -> impl Strategy<Value = f64> {
    (0u32..=250u32).prop_map(|ms| ms as f64 / 1000.0)
}

fn bird_op_strategy() -> impl Strategy<Value = BirdOp> {
    prop_oneof![
        8 => dt_strategy().prop_map(BirdOp::Integrate),
        3 => Just(BirdOp::Flap),
        1 => Just(BirdOp::CrashBoost),
    ]
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(2_000))]

    #[test]
    fn bird_stays_within_bounds(ops in prop::collection::vec(bird_op_strategy(), 1..200)) {
        let config = GameConfig::default();
        let mut bird = BirdBody::new(&config);

        for op in ops {
            match op {
                BirdOp::Integrate(dt) => bird.integrate(dt),
                BirdOp::Flap => bird.flap(),
                BirdOp::CrashBoost => bird.crash_boost(),
            }

            // Invariant: the center never leaves [y_floor, y_ceil].
            prop_assert!(bird.y() >= bird.y_floor());
            prop_assert!(bird.y() <= bird.y_ceil());

            // Invariant: before the crash the ceiling is the ground line,
            // after it the bottom of the field.
            if bird.is_boosted() {
                prop_assert_eq!(bird.y_ceil(), config.crash_floor());
            } else {
                prop_assert_eq!(bird.y_ceil(), config.bird_ceil());
            }
        }
    }

    #[test]
    fn repeated_flaps_never_accumulate(
        warmup in prop::collection::vec(dt_strategy(), 0..30),
        flaps in 1usize..10,
    ) {
        let mut bird = BirdBody::new(&GameConfig::default());
        for dt in warmup {
            bird.integrate(dt);
        }
        for _ in 0..flaps {
            bird.flap();
        }
        prop_assert_eq!(bird.velocity(), -700.0);
    }

    #[test]
    fn eviction_leaves_no_offscreen_obstacles(
        seed in any::<u64>(),
        steps in prop::collection::vec(dt_strategy(), 1..300),
    ) {
        let config = GameConfig::default();
        let mut field = ObstacleField::new(&config);
        let mut rng = Pcg32::seed_from_u64(seed);

        for dt in steps {
            field.advance(dt);
            field.evict_offscreen();
            field.spawn_pair_if_due(dt * 1000.0, &mut rng);

            prop_assert!(field.obstacles().iter().all(|o| !o.is_out_of_view()));
            prop_assert_eq!(field.len() % 2, 0);

            // Pairs share x and stay in left-to-right order.
            for pair in field.obstacles().chunks(2) {
                prop_assert_eq!(pair[0].kind, ObstacleKind::Up);
                prop_assert_eq!(pair[1].kind, ObstacleKind::Down);
                prop_assert_eq!(pair[0].x, pair[1].x);
            }
            for w in field.obstacles().windows(2) {
                prop_assert!(w[0].x <= w[1].x);
            }
        }
    }

    #[test]
    fn score_is_monotonic_and_bounded_by_pairs(
        seed in any::<u64>(),
        steps in prop::collection::vec(dt_strategy(), 1..300),
    ) {
        let config = GameConfig::default();
        let bird = BirdBody::new(&config);
        let mut field = ObstacleField::new(&config);
        let mut board = Scoreboard::new();
        let mut rng = Pcg32::seed_from_u64(seed);
        let mut previous = 0;

        for dt in steps {
            field.advance(dt);
            field.evict_offscreen();
            field.spawn_pair_if_due(dt * 1000.0, &mut rng);
            let awarded = board.register_pass(&bird, &mut field);

            prop_assert_eq!(board.score(), previous + awarded);
            prop_assert!(u64::from(board.score()) <= field.pairs_spawned());
            previous = board.score();
        }
    }
}
