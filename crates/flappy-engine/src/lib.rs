//! Flappy Engine -- game session driver with phases, latched input,
//! checkpoints and deterministic replay.
//!
//! This crate builds on [`flappy_core`] to sequence the bird, the obstacle
//! field, collisions and scoring into a playable session. The host owns the
//! clock: it calls [`GameSession::tick`](session::GameSession::tick) with the
//! elapsed seconds and draws the returned
//! [`SessionSnapshot`](snapshot::SessionSnapshot).
//!
//! # Quick Start
//!
//! ```
//! use flappy_engine::prelude::*;
//!
//! let mut session = GameSession::new(GameConfig::default(), 42).unwrap();
//! session.on_start_input();
//!
//! // Without flapping the bird drops onto the ground within a second.
//! let mut snapshot = session.tick(1.0 / 60.0);
//! while snapshot.phase == Phase::Playing {
//!     snapshot = session.tick(1.0 / 60.0);
//! }
//! assert_eq!(snapshot.phase, Phase::Crashing);
//! assert_eq!(snapshot.crash_cause, Some(CrashCause::Ground));
//! ```

#![deny(unsafe_code)]

pub mod checkpoint;
pub mod events;
pub mod input;
pub mod phase;
pub mod replay;
pub mod session;
pub mod snapshot;

// ---------------------------------------------------------------------------
// Re-exports
// ---------------------------------------------------------------------------

/// Re-export the core crate for convenience.
pub use flappy_core;

// ---------------------------------------------------------------------------
// Prelude
// ---------------------------------------------------------------------------

/// Convenience re-exports for common engine usage.
pub mod prelude {
    pub use flappy_core::prelude::*;

    pub use crate::checkpoint::SessionCheckpoint;
    pub use crate::events::GameEvent;
    pub use crate::input::{normalize_pointer, InputQueue, SessionInput};
    pub use crate::phase::Phase;
    pub use crate::replay::{
        replay, ReplayDivergence, ReplayEntry, ReplayLog, ReplayRecorder, ReplayResult,
    };
    pub use crate::session::{GameSession, SessionState};
    pub use crate::snapshot::{BirdView, ObstacleView, SessionSnapshot};
}
