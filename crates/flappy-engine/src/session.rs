//! The game session: phase machine, tick driver and input latch.
//!
//! A [`GameSession`] owns every piece of simulation state for one player:
//! the bird, the obstacle field, the scoreboard, the seeded RNG and the
//! clocks. It advances only when the host calls [`GameSession::tick`] with
//! the elapsed time, so the same seed, inputs and `dt` sequence always
//! produce the same run.
//!
//! Each tick:
//!
//! 1. Advances the session clocks by `dt`.
//! 2. Drains the input queue in arrival order. Each input is applied only if
//!    the *current* phase accepts it; a `Start` followed by a `Flap` in the
//!    same batch therefore starts the flight and flaps.
//! 3. Runs the step for the current phase:
//!    - `Playing`: integrate the bird, scroll and evict obstacles, spawn a pair
//!      if due, score passed pairs, then check for a pipe or ground crash.
//!    - `Crashing`: integrate the bird under crash physics until it lands.
//!    - `Ready` and `Result`: nothing moves.
//! 4. Increments the tick counter and returns a [`SessionSnapshot`].
//!
//! # Example
//!
//! ```
//! use flappy_engine::prelude::*;
//!
//! let mut session = GameSession::new(GameConfig::default(), 7).unwrap();
//! assert_eq!(session.phase(), Phase::Ready);
//!
//! session.on_start_input();
//! let snapshot = session.tick(1.0 / 60.0);
//! assert_eq!(snapshot.phase, Phase::Playing);
//! // The first pair enters the field as soon as the flight starts.
//! assert_eq!(snapshot.obstacles.len(), 2);
//! ```

use flappy_core::bird::BirdBody;
use flappy_core::collision::{CollisionDetector, CrashCause};
use flappy_core::config::GameConfig;
use flappy_core::obstacle::ObstacleField;
use flappy_core::scoreboard::Scoreboard;
use flappy_core::{is_valid_step, ConfigError};
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, trace, warn};

use crate::events::GameEvent;
use crate::input::{InputQueue, SessionInput};
use crate::phase::Phase;
use crate::snapshot::SessionSnapshot;

// ---------------------------------------------------------------------------
// SessionState
// ---------------------------------------------------------------------------

/// Everything that evolves while a session runs.
///
/// This is the part of a session captured by checkpoints; the configuration
/// and pending inputs are stored next to it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionState {
    pub(crate) phase: Phase,
    pub(crate) bird: BirdBody,
    pub(crate) field: ObstacleField,
    pub(crate) scoreboard: Scoreboard,
    pub(crate) rng: Pcg32,
    /// Milliseconds since the session was created. Never reset; drives the
    /// ground scroll.
    pub(crate) clock_ms: f64,
    /// Milliseconds since the last world reset; drives the wing animation.
    pub(crate) wing_clock_ms: f64,
    pub(crate) tick_counter: u64,
    pub(crate) crash_cause: Option<CrashCause>,
}

impl SessionState {
    fn new(config: &GameConfig, seed: u64) -> Self {
        Self {
            phase: Phase::Ready,
            bird: BirdBody::new(config),
            field: ObstacleField::new(config),
            scoreboard: Scoreboard::new(),
            rng: Pcg32::seed_from_u64(seed),
            clock_ms: 0.0,
            wing_clock_ms: 0.0,
            tick_counter: 0,
            crash_cause: None,
        }
    }

    /// Current phase.
    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Number of ticks executed with a valid `dt`.
    pub fn tick_counter(&self) -> u64 {
        self.tick_counter
    }

    /// Current score.
    pub fn score(&self) -> u32 {
        self.scoreboard.score()
    }
}

// ---------------------------------------------------------------------------
// GameSession
// ---------------------------------------------------------------------------

/// One player's game, from the ready screen through any number of flights.
#[derive(Debug, Clone)]
pub struct GameSession {
    config: GameConfig,
    detector: CollisionDetector,
    state: SessionState,
    inputs: InputQueue,
    last_events: Vec<GameEvent>,
}

impl GameSession {
    /// Create a session in the `Ready` phase.
    ///
    /// `seed` initializes the RNG that picks obstacle heights and gaps.
    ///
    /// # Errors
    ///
    /// Returns the first constraint `config` violates.
    pub fn new(config: GameConfig, seed: u64) -> Result<Self, ConfigError> {
        config.validate()?;
        let state = SessionState::new(&config, seed);
        info!(seed, "game session created");
        Ok(Self {
            detector: CollisionDetector::from_config(&config.obstacles),
            config,
            state,
            inputs: InputQueue::new(),
            last_events: Vec::new(),
        })
    }

    // -- input --------------------------------------------------------------

    /// Latch an input for the next tick.
    pub fn push_input(&mut self, input: SessionInput) {
        self.inputs.push(input);
    }

    /// Latch a flap. Ignored unless the session is `Playing` when applied.
    pub fn on_flap_input(&mut self) {
        self.push_input(SessionInput::Flap);
    }

    /// Latch a start tap. Ignored unless the session is `Ready` when applied.
    pub fn on_start_input(&mut self) {
        self.push_input(SessionInput::Start);
    }

    /// Latch a result-screen tap at logical canvas coordinates.
    ///
    /// Restarts only if the session is in `Result` when applied and the point
    /// lies strictly inside the restart button.
    pub fn on_restart_input(&mut self, x: f64, y: f64) {
        self.push_input(SessionInput::Restart { x, y });
    }

    // -- stepping -----------------------------------------------------------

    /// Advance the session by `dt` seconds and return what the host should draw.
    ///
    /// A negative or non-finite `dt` leaves the session untouched: the clocks,
    /// the tick counter and the pending inputs are all kept as they were.
    pub fn tick(&mut self, dt: f64) -> SessionSnapshot {
        self.last_events.clear();

        if !is_valid_step(dt) {
            warn!(dt, tick = self.state.tick_counter, "ignoring tick with invalid dt");
            return self.snapshot();
        }

        let dt_ms = dt * 1000.0;
        self.state.clock_ms += dt_ms;
        self.state.wing_clock_ms += dt_ms;

        for input in self.inputs.take() {
            self.apply_input(input);
        }

        match self.state.phase {
            Phase::Ready | Phase::Result => {}
            Phase::Playing => self.step_playing(dt),
            Phase::Crashing => self.step_crashing(dt),
        }

        self.state.tick_counter += 1;
        for event in &self.last_events {
            trace!(tick = self.state.tick_counter, event = event.kind(), "game event");
        }
        trace!(
            tick = self.state.tick_counter,
            phase = ?self.state.phase,
            dt,
            events = self.last_events.len(),
            "tick complete"
        );
        self.snapshot()
    }

    /// Return to the ready screen with a fresh world.
    ///
    /// Pending inputs are discarded. The RNG and the session clock carry on.
    pub fn reset(&mut self) {
        self.inputs.clear();
        self.reset_world();
        if self.state.phase != Phase::Ready {
            self.enter(Phase::Ready);
        }
    }

    /// Render view of the current state, carrying the events of the last tick.
    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot::capture(&self.config, &self.state, &self.last_events)
    }

    fn apply_input(&mut self, input: SessionInput) {
        if !self.state.phase.accepts(&input) {
            trace!(?input, phase = ?self.state.phase, "input ignored in this phase");
            return;
        }
        match input {
            SessionInput::Start => {
                self.reset_world();
                self.enter(Phase::Playing);
            }
            SessionInput::Flap => {
                self.state.bird.flap();
                self.last_events.push(GameEvent::Flapped);
            }
            SessionInput::Restart { x, y } => {
                if self.config.restart_button.contains_strict(x, y) {
                    self.reset_world();
                    self.enter(Phase::Ready);
                } else {
                    debug!(x, y, "restart tap outside the button");
                }
            }
        }
    }

    fn step_playing(&mut self, dt: f64) {
        let state = &mut self.state;
        state.bird.integrate(dt);

        state.field.advance(dt);
        state.field.evict_offscreen();
        if state.field.spawn_pair_if_due(dt * 1000.0, &mut state.rng) {
            self.last_events.push(GameEvent::PairSpawned {
                pairs_spawned: state.field.pairs_spawned(),
            });
        }

        let before = state.scoreboard.score();
        state.scoreboard.register_pass(&state.bird, &mut state.field);
        for score in before + 1..=state.scoreboard.score() {
            self.last_events.push(GameEvent::PairPassed { score });
        }

        if let Some(cause) = self
            .detector
            .detect_crash(&state.bird, state.field.obstacles())
        {
            let score = state.scoreboard.score();
            state.bird.crash_boost();
            state.crash_cause = Some(cause);
            debug!(?cause, score, y = state.bird.y(), "bird crashed");
            self.last_events.push(GameEvent::Crashed { cause, score });
            self.enter(Phase::Crashing);
        }
    }

    fn step_crashing(&mut self, dt: f64) {
        self.state.bird.integrate(dt);
        if self.detector.hits_ground(&self.state.bird) {
            self.enter(Phase::Result);
        }
    }

    /// Fresh bird, empty armed field, zero score.
    fn reset_world(&mut self) {
        let state = &mut self.state;
        state.bird = BirdBody::new(&self.config);
        state.field = ObstacleField::new(&self.config);
        state.scoreboard.reset();
        state.wing_clock_ms = 0.0;
        state.crash_cause = None;
    }

    fn enter(&mut self, to: Phase) {
        let from = self.state.phase;
        self.state.phase = to;
        info!(%from, %to, score = self.state.scoreboard.score(), "phase changed");
        self.last_events.push(GameEvent::PhaseChanged { from, to });
    }

    // -- accessors ----------------------------------------------------------

    /// The validated configuration this session runs with.
    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    /// Current phase.
    pub fn phase(&self) -> Phase {
        self.state.phase
    }

    /// The bird.
    pub fn bird(&self) -> &BirdBody {
        &self.state.bird
    }

    /// Obstacles currently in the field, plus the spawn timer.
    pub fn field(&self) -> &ObstacleField {
        &self.state.field
    }

    /// Pairs cleared in the current flight.
    pub fn score(&self) -> u32 {
        self.state.scoreboard.score()
    }

    /// Number of ticks executed with a valid `dt`.
    pub fn tick_count(&self) -> u64 {
        self.state.tick_counter
    }

    /// Milliseconds of simulated time since the session was created.
    pub fn clock_ms(&self) -> f64 {
        self.state.clock_ms
    }

    /// What ended the current flight, while `Crashing` or `Result`.
    pub fn crash_cause(&self) -> Option<CrashCause> {
        self.state.crash_cause
    }

    /// Inputs waiting for the next tick, oldest first.
    pub fn pending_inputs(&self) -> &[SessionInput] {
        self.inputs.pending()
    }

    /// Events raised by the last tick.
    pub fn last_events(&self) -> &[GameEvent] {
        &self.last_events
    }

    /// The checkpointable part of the session.
    pub fn state(&self) -> &SessionState {
        &self.state
    }

    // -- checkpoint plumbing ------------------------------------------------

    /// Swap in restored parts; the caller has validated them.
    pub(crate) fn replace_parts(
        &mut self,
        config: GameConfig,
        state: SessionState,
        pending: &[SessionInput],
    ) {
        self.detector = CollisionDetector::from_config(&config.obstacles);
        self.config = config;
        self.state = state;
        self.inputs.replace(pending);
        self.last_events.clear();
    }

    /// Overwrite the pending inputs with a recorded frame's.
    pub(crate) fn replace_pending_inputs(&mut self, pending: &[SessionInput]) {
        self.inputs.replace(pending);
    }
}
