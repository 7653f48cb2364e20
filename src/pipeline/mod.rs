//! Match-analysis pipeline module.
//!
//! This module provides:
//! * [`MatchPipeline`] — orchestrates one clip run: local staging, upload,
//!   bounded processing poll, multimodal inference.
//! * [`UploadedClip`] / [`ClipKind`] — validated clip input.
//! * [`TempClip`] — uniquely named, RAII-cleaned local staging file.
//! * [`AnalysisResult`] — the run's explicit return value.
//! * [`RunPhase`] — phase reporting for the UI.
//! * [`PipelineError`] — the closed failure taxonomy of a run.

pub mod clip;
pub mod runner;
pub mod state;

// ---------------------------------------------------------------------------
// Public re-exports
// ---------------------------------------------------------------------------

pub use clip::{ClipKind, TempClip, UploadedClip};
pub use runner::{AnalysisResult, MatchPipeline, PipelineError};
pub use state::RunPhase;
