//! Pitch Vision — Gemini-backed pitch feedback and match-clip analysis.
//!
//! Two analysis surfaces share one Gemini client:
//!
//! * **Pitch** ([`analysis::PitchAnalyzer`]) — free-text idea, one text
//!   generation call, feedback rendered verbatim.
//! * **Match** ([`pipeline::MatchPipeline`]) — local clip staged to a scoped
//!   temp file, uploaded through the Files API, polled (bounded) until the
//!   remote handle leaves `PROCESSING`, then analysed with one multimodal
//!   call steered by the selected [`analysis::FocusArea`]s.
//!
//! The [`app`] module hosts the egui front end; [`config`] holds TOML
//! settings and the `GEMINI_API_KEY` credential resolution.

pub mod analysis;
pub mod app;
pub mod config;
pub mod gemini;
pub mod pipeline;
