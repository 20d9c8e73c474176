//! Deterministic replay with per-frame input recording and hash checkpoints.
//!
//! A session is fully determined by its starting checkpoint and the sequence
//! of `(dt, inputs)` pairs fed to it. The [`ReplayRecorder`] captures that
//! sequence, plus periodic state hashes, into a [`ReplayLog`]. [`replay`]
//! feeds the log back into a session and reports the first frame whose state
//! hash differs from the recording.
//!
//! # Recording
//!
//! ```
//! use flappy_engine::prelude::*;
//! use flappy_engine::replay::{replay, ReplayRecorder};
//!
//! let mut session = GameSession::new(GameConfig::default(), 9).unwrap();
//! let mut recorder = ReplayRecorder::new(session.capture_checkpoint(), 10);
//!
//! session.on_start_input();
//! for frame in 0..120 {
//!     if frame % 20 == 0 {
//!         session.on_flap_input();
//!     }
//!     recorder.record_session_tick(&mut session, 1.0 / 60.0);
//! }
//! let log = recorder.finish();
//!
//! // Replay on a different session: it is overwritten by the log's checkpoint.
//! let mut other = GameSession::new(GameConfig::default(), 1234).unwrap();
//! let result = replay(&mut other, &log).unwrap();
//! assert!(result.completed);
//! assert!(result.first_divergence.is_none());
//! assert_eq!(other.state_hash(), session.state_hash());
//! ```

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::checkpoint::SessionCheckpoint;
use crate::input::SessionInput;
use crate::session::GameSession;
use crate::snapshot::SessionSnapshot;

// ---------------------------------------------------------------------------
// ReplayLog
// ---------------------------------------------------------------------------

/// A recorded run: starting checkpoint plus one frame entry per tick call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReplayLog {
    /// Replay begins by restoring this checkpoint.
    pub initial_checkpoint: SessionCheckpoint,
    /// Number of frames recorded. Frames are numbered `0..total_frames`.
    pub total_frames: u64,
    pub entries: Vec<ReplayEntry>,
}

/// A single entry in a [`ReplayLog`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ReplayEntry {
    /// The `dt` passed to `tick` and the inputs pending just before it.
    Frame {
        frame: u64,
        dt: f64,
        inputs: Vec<SessionInput>,
    },
    /// State hash taken before the frame's tick, with its inputs pending.
    Checkpoint { frame: u64, state_hash: String },
}

// ---------------------------------------------------------------------------
// ReplayResult
// ---------------------------------------------------------------------------

/// The outcome of [`replay`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReplayResult {
    /// Whether every frame was replayed without a hash mismatch.
    pub completed: bool,
    pub frames_replayed: u64,
    /// The first checkpoint whose hash did not match, if any.
    pub first_divergence: Option<ReplayDivergence>,
}

/// Where a replay stopped matching its recording.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReplayDivergence {
    pub frame: u64,
    pub expected_hash: String,
    pub actual_hash: String,
}

// ---------------------------------------------------------------------------
// ReplayRecorder
// ---------------------------------------------------------------------------

/// Builds a [`ReplayLog`] one frame at a time.
pub struct ReplayRecorder {
    log: ReplayLog,
    /// A checkpoint is kept every `checkpoint_interval` frames. Zero keeps
    /// one whenever a hash is supplied.
    checkpoint_interval: u64,
    next_frame: u64,
}

impl ReplayRecorder {
    /// Start a log from `initial_checkpoint`, keeping a hash every
    /// `checkpoint_interval` frames (0 keeps every supplied hash).
    pub fn new(initial_checkpoint: SessionCheckpoint, checkpoint_interval: u64) -> Self {
        Self {
            log: ReplayLog {
                initial_checkpoint,
                total_frames: 0,
                entries: Vec::new(),
            },
            checkpoint_interval,
            next_frame: 0,
        }
    }

    /// Record one frame. Call this **before** ticking the session.
    ///
    /// `inputs` are the session's pending inputs and `state_hash` (if any) its
    /// current [`state_hash`](GameSession::state_hash).
    pub fn record_tick(&mut self, dt: f64, inputs: &[SessionInput], state_hash: Option<String>) {
        let frame = self.next_frame;
        self.next_frame += 1;

        if let Some(state_hash) = state_hash {
            let should_checkpoint =
                self.checkpoint_interval == 0 || frame % self.checkpoint_interval == 0;
            if should_checkpoint {
                self.log.entries.push(ReplayEntry::Checkpoint { frame, state_hash });
            }
        }

        self.log.entries.push(ReplayEntry::Frame {
            frame,
            dt,
            inputs: inputs.to_vec(),
        });
    }

    /// Record the session's pending inputs and hash, then tick it.
    pub fn record_session_tick(&mut self, session: &mut GameSession, dt: f64) -> SessionSnapshot {
        let wants_hash =
            self.checkpoint_interval == 0 || self.next_frame % self.checkpoint_interval == 0;
        let hash = wants_hash.then(|| session.state_hash());
        self.record_tick(dt, session.pending_inputs(), hash);
        session.tick(dt)
    }

    /// Frames recorded so far.
    pub fn frames_recorded(&self) -> u64 {
        self.next_frame
    }

    /// Consume the recorder and return the completed log.
    pub fn finish(mut self) -> ReplayLog {
        self.log.total_frames = self.next_frame;
        self.log
    }
}

// ---------------------------------------------------------------------------
// replay()
// ---------------------------------------------------------------------------

/// Replay `log` on `session`, verifying every recorded checkpoint.
///
/// The log is validated before the session is touched. Then the initial
/// checkpoint is restored and, for each frame, the recorded inputs replace
/// the pending inputs, the checkpoint hash (if any) is compared and the
/// session is ticked with the recorded `dt`. Replay stops at the first
/// mismatch.
///
/// # Errors
///
/// Returns an error if the log has duplicate or missing frames, entries past
/// `total_frames`, or an initial checkpoint that fails to restore. In all of
/// these cases `session` is left unmodified.
pub fn replay(session: &mut GameSession, log: &ReplayLog) -> Result<ReplayResult, anyhow::Error> {
    let mut frames: BTreeMap<u64, (f64, &[SessionInput])> = BTreeMap::new();
    let mut checkpoints: BTreeMap<u64, &str> = BTreeMap::new();

    for entry in &log.entries {
        match entry {
            ReplayEntry::Frame { frame, dt, inputs } => {
                if *frame >= log.total_frames {
                    return Err(anyhow::anyhow!(
                        "replay log has a Frame entry at {frame} past total_frames ({})",
                        log.total_frames
                    ));
                }
                if frames.insert(*frame, (*dt, inputs.as_slice())).is_some() {
                    return Err(anyhow::anyhow!(
                        "replay log contains duplicate Frame entry at frame {frame}"
                    ));
                }
            }
            ReplayEntry::Checkpoint { frame, state_hash } => {
                if *frame >= log.total_frames {
                    return Err(anyhow::anyhow!(
                        "replay log has a Checkpoint entry at {frame} past total_frames ({})",
                        log.total_frames
                    ));
                }
                if checkpoints.insert(*frame, state_hash.as_str()).is_some() {
                    return Err(anyhow::anyhow!(
                        "replay log contains duplicate Checkpoint entry at frame {frame}"
                    ));
                }
            }
        }
    }

    // Frames are unique and in range, so a short count means a gap.
    if (frames.len() as u64) != log.total_frames {
        let missing = (0..log.total_frames)
            .find(|frame| !frames.contains_key(frame))
            .unwrap_or(log.total_frames);
        return Err(anyhow::anyhow!("replay log is missing Frame entry {missing}"));
    }

    session
        .restore_from_checkpoint(&log.initial_checkpoint)
        .map_err(|e| anyhow::anyhow!("failed to restore initial checkpoint for replay: {e}"))?;

    let mut frames_replayed: u64 = 0;
    for (frame, (dt, inputs)) in frames {
        session.replace_pending_inputs(inputs);

        if let Some(expected_hash) = checkpoints.get(&frame) {
            let actual_hash = session.state_hash();
            if actual_hash != *expected_hash {
                tracing::warn!(frame, "replay diverged from recording");
                return Ok(ReplayResult {
                    completed: false,
                    frames_replayed,
                    first_divergence: Some(ReplayDivergence {
                        frame,
                        expected_hash: expected_hash.to_string(),
                        actual_hash,
                    }),
                });
            }
        }

        session.tick(dt);
        frames_replayed += 1;
    }

    Ok(ReplayResult {
        completed: true,
        frames_replayed,
        first_divergence: None,
    })
}
