//! Pitch-text analyzer — the synchronous single-call surface.
//!
//! Validates the input, issues exactly one generation call, and returns the
//! model's feedback text verbatim.  No polling, no intermediate state, no
//! retries: any client failure is surfaced directly to the caller.

use std::sync::Arc;

use thiserror::Error;

use crate::analysis::prompt::pitch_prompt;
use crate::gemini::{GeminiClient, GeminiError, GenerateRequest};

// ---------------------------------------------------------------------------
// PitchError
// ---------------------------------------------------------------------------

/// Errors that can occur while analysing a pitch idea.
#[derive(Debug, Error)]
pub enum PitchError {
    /// Input text was empty or whitespace-only; no API call was made.
    #[error("pitch idea is empty")]
    EmptyIdea,

    /// The Gemini call failed.
    #[error(transparent)]
    Client(#[from] GeminiError),
}

// ---------------------------------------------------------------------------
// PitchAnalyzer
// ---------------------------------------------------------------------------

/// Turns a free-text pitch idea into professional feedback with one Gemini
/// call.
pub struct PitchAnalyzer {
    client: Arc<dyn GeminiClient>,
}

impl PitchAnalyzer {
    pub fn new(client: Arc<dyn GeminiClient>) -> Self {
        Self { client }
    }

    /// Analyse a pitch idea.
    ///
    /// For non-empty input exactly one inference call is issued; for empty
    /// input [`PitchError::EmptyIdea`] is returned without touching the
    /// network.
    pub async fn analyze(&self, idea: &str) -> Result<String, PitchError> {
        if idea.trim().is_empty() {
            return Err(PitchError::EmptyIdea);
        }

        let request = GenerateRequest::from_text(pitch_prompt(idea.trim()));
        let feedback = self.client.generate(request).await?;

        log::debug!("pitch analysis complete ({} chars)", feedback.len());
        Ok(feedback)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
