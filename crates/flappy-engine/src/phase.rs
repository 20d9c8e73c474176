//! The four session phases and which inputs each one reacts to.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::input::SessionInput;

/// Phase of a game session.
///
/// Phases cycle `Ready -> Playing -> Crashing -> Result -> Ready`; there is
/// no terminal phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Phase {
    /// Bird hovers mid-field, waiting for a start tap.
    Ready,
    /// Bird flies under gravity, obstacles scroll, taps flap.
    Playing,
    /// Bird plunges under boosted gravity; obstacles and score are frozen.
    Crashing,
    /// Everything is frozen until the restart button is tapped.
    Result,
}

impl Phase {
    /// Lowercase name used in logs.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Ready => "ready",
            Self::Playing => "playing",
            Self::Crashing => "crashing",
            Self::Result => "result",
        }
    }

    /// Whether `input` is meaningful in this phase. Anything else is dropped.
    pub fn accepts(&self, input: &SessionInput) -> bool {
        matches!(
            (self, input),
            (Self::Ready, SessionInput::Start)
                | (Self::Playing, SessionInput::Flap)
                | (Self::Result, SessionInput::Restart { .. })
        )
    }

    /// Whether the wings animate in this phase.
    pub fn animates_wings(&self) -> bool {
        matches!(self, Self::Ready | Self::Playing)
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
