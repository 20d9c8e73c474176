//! Notable things that happened during a tick.
//!
//! Each [`GameSession::tick`](crate::session::GameSession::tick) collects the
//! events it produced, in the order they happened, and hands them out with
//! the render snapshot. Hosts use them for sound effects and analytics; the
//! simulation itself never reads them back.

use flappy_core::collision::CrashCause;
use serde::{Deserialize, Serialize};

use crate::phase::Phase;

/// Something a host may want to react to.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    /// The session moved from one phase to another.
    PhaseChanged { from: Phase, to: Phase },
    /// A flap input was applied.
    Flapped,
    /// A new obstacle pair entered the field.
    PairSpawned { pairs_spawned: u64 },
    /// The bird cleared a pair; `score` is the new total.
    PairPassed { score: u32 },
    /// The flight ended.
    Crashed { cause: CrashCause, score: u32 },
}

impl GameEvent {
    /// Short name used in log lines.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::PhaseChanged { .. } => "phase_changed",
            Self::Flapped => "flapped",
            Self::PairSpawned { .. } => "pair_spawned",
            Self::PairPassed { .. } => "pair_passed",
            Self::Crashed { .. } => "crashed",
        }
    }
}
