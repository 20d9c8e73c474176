//! Session checkpoints with BLAKE3 hashing.
//!
//! A [`SessionCheckpoint`] holds everything needed to resume a session
//! exactly: the configuration, the full [`SessionState`] (RNG included) and
//! the inputs still waiting for the next tick. Its `hash` is a BLAKE3 digest
//! of those three, serialized as JSON, so two sessions in the same state
//! always report the same hash.
//!
//! ```
//! use flappy_engine::prelude::*;
//!
//! let mut session = GameSession::new(GameConfig::default(), 3).unwrap();
//! session.on_start_input();
//! for _ in 0..30 {
//!     session.tick(1.0 / 60.0);
//! }
//!
//! let checkpoint = session.capture_checkpoint();
//! assert_eq!(checkpoint.hash.len(), 64);
//!
//! for _ in 0..30 {
//!     session.tick(1.0 / 60.0);
//! }
//! session.restore_from_checkpoint(&checkpoint).unwrap();
//! assert_eq!(session.tick_count(), 30);
//! assert_eq!(session.state_hash(), checkpoint.hash);
//! ```
//!
//! The events of the last tick are not part of a checkpoint; a restored
//! session reports none until it ticks again.

use flappy_core::config::GameConfig;
use serde::{Deserialize, Serialize};

use crate::input::SessionInput;
use crate::session::{GameSession, SessionState};

// ---------------------------------------------------------------------------
// SessionCheckpoint
// ---------------------------------------------------------------------------

/// A serializable copy of a session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionCheckpoint {
    pub config: GameConfig,
    pub state: SessionState,
    /// Inputs latched but not yet applied, oldest first.
    pub pending_inputs: Vec<SessionInput>,
    /// BLAKE3 hex digest (64 lowercase hex chars) of the fields above.
    pub hash: String,
}

impl SessionCheckpoint {
    /// Tick counter at the time of capture.
    pub fn tick(&self) -> u64 {
        self.state.tick_counter()
    }
}

// ---------------------------------------------------------------------------
// Hashing helpers
// ---------------------------------------------------------------------------

fn compute_hash(
    config: &GameConfig,
    state: &SessionState,
    pending_inputs: &[SessionInput],
) -> String {
    #[derive(Serialize)]
    struct HashableSession<'a> {
        config: &'a GameConfig,
        state: &'a SessionState,
        pending_inputs: &'a [SessionInput],
    }

    let hashable = HashableSession {
        config,
        state,
        pending_inputs,
    };

    let json_bytes = serde_json::to_vec(&hashable)
        .expect("session state should always be JSON-serializable");

    blake3::hash(&json_bytes).to_hex().to_string()
}

// ---------------------------------------------------------------------------
// GameSession checkpoint methods
// ---------------------------------------------------------------------------

impl GameSession {
    /// Capture the complete session state.
    pub fn capture_checkpoint(&self) -> SessionCheckpoint {
        let config = self.config().clone();
        let state = self.state().clone();
        let pending_inputs = self.pending_inputs().to_vec();
        let hash = compute_hash(&config, &state, &pending_inputs);

        SessionCheckpoint {
            config,
            state,
            pending_inputs,
            hash,
        }
    }

    /// Build a new session from a checkpoint.
    ///
    /// # Errors
    ///
    /// Same conditions as [`restore_from_checkpoint`](Self::restore_from_checkpoint).
    pub fn from_checkpoint(checkpoint: &SessionCheckpoint) -> Result<Self, anyhow::Error> {
        let mut session = GameSession::new(checkpoint.config.clone(), 0)
            .map_err(|e| anyhow::anyhow!("checkpoint carries an invalid config: {e}"))?;
        session.restore_from_checkpoint(checkpoint)?;
        Ok(session)
    }

    /// Overwrite this session with the contents of `checkpoint`.
    ///
    /// The configuration and the hash are verified first; on error the
    /// session is left unmodified.
    ///
    /// # Errors
    ///
    /// Returns an error if the checkpoint's configuration is invalid or its
    /// hash does not match its contents.
    pub fn restore_from_checkpoint(
        &mut self,
        checkpoint: &SessionCheckpoint,
    ) -> Result<(), anyhow::Error> {
        checkpoint
            .config
            .validate()
            .map_err(|e| anyhow::anyhow!("checkpoint carries an invalid config: {e}"))?;

        let expected_hash = compute_hash(
            &checkpoint.config,
            &checkpoint.state,
            &checkpoint.pending_inputs,
        );
        if expected_hash != checkpoint.hash {
            return Err(anyhow::anyhow!(
                "checkpoint hash mismatch: recorded {} but recomputed {}. \
                 The checkpoint may be corrupted or tampered with.",
                checkpoint.hash,
                expected_hash
            ));
        }

        self.replace_parts(
            checkpoint.config.clone(),
            checkpoint.state.clone(),
            &checkpoint.pending_inputs,
        );
        tracing::debug!(tick = checkpoint.tick(), "session restored from checkpoint");
        Ok(())
    }

    /// BLAKE3 hex digest of the current session, as a checkpoint would record it.
    pub fn state_hash(&self) -> String {
        compute_hash(self.config(), self.state(), self.pending_inputs())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hash_is_stable_across_captures() {
        let session = GameSession::new(GameConfig::default(), 1).unwrap();
        assert_eq!(session.capture_checkpoint().hash, session.state_hash());
    }

    #[test]
    fn pending_inputs_change_the_hash() {
        let mut session = GameSession::new(GameConfig::default(), 1).unwrap();
        let before = session.state_hash();
        session.on_flap_input();
        assert_ne!(session.state_hash(), before);
    }

    #[test]
    fn tampered_checkpoint_is_rejected_without_mutation() {
        let mut session = GameSession::new(GameConfig::default(), 1).unwrap();
        let mut checkpoint = session.capture_checkpoint();
        checkpoint.state.tick_counter = 999;

        session.tick(0.1);
        let hash_before = session.state_hash();
        let err = session.restore_from_checkpoint(&checkpoint).unwrap_err();
        assert!(err.to_string().contains("hash mismatch"));
        assert_eq!(session.state_hash(), hash_before);
    }

    #[test]
    fn invalid_config_is_rejected() {
        let session = GameSession::new(GameConfig::default(), 1).unwrap();
        let mut checkpoint = session.capture_checkpoint();
        checkpoint.config.field_width = -1.0;
        checkpoint.hash = compute_hash(
            &checkpoint.config,
            &checkpoint.state,
            &checkpoint.pending_inputs,
        );

        let err = GameSession::from_checkpoint(&checkpoint).unwrap_err();
        assert!(err.to_string().contains("invalid config"));
    }
}
