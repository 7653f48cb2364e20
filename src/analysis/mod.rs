//! Analysis module — prompts and the pitch-text surface.
//!
//! This module provides:
//! * [`FocusArea`] — closed vocabulary of tactical aspects for match runs.
//! * [`PitchAnalyzer`] — one-call text analysis with input validation.
//! * [`pitch_prompt`] / [`match_analysis_prompt`] — prompt builders.
//! * [`TACTICAL_ANALYST_INSTRUCTION`] — fixed system persona for match runs.

pub mod focus;
pub mod pitch;
pub mod prompt;

// ---------------------------------------------------------------------------
// Public re-exports
// ---------------------------------------------------------------------------

pub use focus::FocusArea;
pub use pitch::{PitchAnalyzer, PitchError};
pub use prompt::{match_analysis_prompt, pitch_prompt, TACTICAL_ANALYST_INSTRUCTION};
