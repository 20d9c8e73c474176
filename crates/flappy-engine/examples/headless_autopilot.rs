//! Headless autopilot -- plays a few rounds without a window.
//!
//! The autopilot flaps whenever the bird sinks below the middle of the next
//! gap, taps the restart button on the result screen and prints one line per
//! finished round.
//!
//! Run with:
//!
//! ```sh
//! cargo run --example headless_autopilot -- [config.json] [seed] [rounds]
//! RUST_LOG=flappy_engine=info cargo run --example headless_autopilot
//! ```

use flappy_engine::prelude::*;

const STEP: f64 = 1.0 / 60.0;

/// Give up on a round after ten simulated minutes.
const MAX_TICKS_PER_ROUND: u64 = 60 * 60 * 10;

/// Center of the gap the bird has to fly through next.
fn target_y(session: &GameSession) -> f64 {
    let bird = session.bird();
    session
        .field()
        .obstacles()
        .chunks(2)
        .find(|pair| pair[0].right() >= bird.trailing_edge())
        .map(|pair| (pair[0].bottom() + pair[1].y) / 2.0)
        .unwrap_or_else(|| session.config().bird_start_y())
}

fn steer(session: &mut GameSession) {
    match session.phase() {
        Phase::Ready => session.on_start_input(),
        Phase::Playing => {
            let bird = session.bird();
            if bird.y() > target_y(session) + 20.0 && bird.velocity() > 0.0 {
                session.on_flap_input();
            }
        }
        Phase::Crashing => {}
        Phase::Result => {
            let button = &session.config().restart_button;
            let (x, y) = (button.x + button.width / 2.0, button.y + button.height / 2.0);
            session.on_restart_input(x, y);
        }
    }
}

fn main() -> Result<(), anyhow::Error> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .init();

    let mut args = std::env::args().skip(1);
    let config = match args.next() {
        Some(path) if path != "-" => {
            let json = std::fs::read_to_string(&path)
                .map_err(|e| anyhow::anyhow!("failed to read config {path}: {e}"))?;
            GameConfig::from_json_str(&json)?
        }
        _ => GameConfig::default(),
    };
    let seed: u64 = args.next().map(|s| s.parse()).transpose()?.unwrap_or(42);
    let rounds: u32 = args.next().map(|s| s.parse()).transpose()?.unwrap_or(3);

    let mut session = GameSession::new(config, seed)?;
    let mut round = 0;
    let mut ticks_this_round = 0;

    while round < rounds {
        steer(&mut session);
        let snapshot = session.tick(STEP);
        ticks_this_round += 1;

        for event in &snapshot.events {
            if let GameEvent::Crashed { cause, score } = event {
                round += 1;
                println!(
                    "round {round}: score {score}, hit the {} after {:.1}s",
                    match cause {
                        CrashCause::Pipe => "pipe",
                        CrashCause::Ground => "ground",
                    },
                    ticks_this_round as f64 * STEP
                );
                ticks_this_round = 0;
            }
        }

        if ticks_this_round >= MAX_TICKS_PER_ROUND {
            round += 1;
            println!(
                "round {round}: still flying after {MAX_TICKS_PER_ROUND} ticks, score {}",
                snapshot.score
            );
            session.reset();
            ticks_this_round = 0;
        }
    }

    println!("final state hash {}", session.state_hash());
    Ok(())
}
