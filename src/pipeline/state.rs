//! Run-phase state machine for the match-analysis pipeline.
//!
//! [`RunPhase`] tracks where a run currently is; the pipeline reports
//! transitions through its `on_phase` callback and the UI renders the
//! matching status line.

// ---------------------------------------------------------------------------
// RunPhase
// ---------------------------------------------------------------------------

/// Phases of one match-analysis run.
///
/// The transitions are:
///
/// ```text
/// Idle ──run──▶ Persisting ──▶ Uploading ──▶ WaitingRemote ──▶ Analyzing ──▶ Done
/// any phase ──error──▶ Error
/// Error / Done ──next run──▶ Persisting
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunPhase {
    /// No run in progress.
    Idle,

    /// Clip bytes are being staged to the local temporary file.
    Persisting,

    /// The staged file is being uploaded to the Files API.
    Uploading,

    /// Waiting for the remote handle to leave `PROCESSING` (bounded poll).
    WaitingRemote,

    /// The multimodal inference call is running.
    Analyzing,

    /// The analysis text is ready.
    Done,

    /// The run failed; the pipeline returns to `Persisting` on the next run.
    Error,
}

impl RunPhase {
    /// Returns `true` while a run is actively executing.
    ///
    /// The UI uses this to disable the run button while busy.
    pub fn is_busy(&self) -> bool {
        matches!(
            self,
            RunPhase::Persisting
                | RunPhase::Uploading
                | RunPhase::WaitingRemote
                | RunPhase::Analyzing
        )
    }

    /// A short human-readable label suitable for the status line.
    pub fn label(&self) -> &'static str {
        match self {
            RunPhase::Idle => "Idle",
            RunPhase::Persisting => "Preparing clip",
            RunPhase::Uploading => "Uploading",
            RunPhase::WaitingRemote => "Processing remotely",
            RunPhase::Analyzing => "Analyzing",
            RunPhase::Done => "Done",
            RunPhase::Error => "Error",
        }
    }
}

impl Default for RunPhase {
    fn default() -> Self {
        RunPhase::Idle
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
