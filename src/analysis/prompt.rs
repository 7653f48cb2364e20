//! Prompt construction for both analysis surfaces.
//!
//! Two prompt shapes exist:
//! * **Pitch** (`pitch_prompt`) — a single flat prompt embedding the user's
//!   idea, sent without a system instruction.
//! * **Match** (`match_analysis_prompt` + [`TACTICAL_ANALYST_INSTRUCTION`])
//!   — a user instruction listing the selected focus areas, paired with the
//!   fixed analyst persona as the system instruction and the uploaded clip
//!   as the first content part.

use crate::analysis::focus::FocusArea;

// ---------------------------------------------------------------------------
// System instruction (match surface)
// ---------------------------------------------------------------------------

/// Fixed persona for the match-analysis model.
pub const TACTICAL_ANALYST_INSTRUCTION: &str = "\
You are a professional football tactical analyst.
Task: Watch the supplied match clip and produce a written tactical analysis.

Rules:
1. Ground every observation in something visible in the clip.
2. Describe patterns (shape, movement, transitions), not isolated events.
3. Note both strengths and exploitable weaknesses for the team in focus.
4. Use standard coaching terminology.
5. Structure the analysis with short headed sections and bullet points.";

// ---------------------------------------------------------------------------
// Prompt builders
// ---------------------------------------------------------------------------

/// Build the pitch-feedback prompt around the raw idea text.
pub fn pitch_prompt(idea: &str) -> String {
    format!(
        "Analyze the following pitch and provide feedback on its strengths, \
         weaknesses, and potential: {idea}"
    )
}

/// Build the user instruction for a match-analysis run.
///
/// Selected areas are listed in declaration order regardless of selection
/// order, and duplicates collapse.  An empty selection asks for a general
/// all-aspects analysis instead of failing.
pub fn match_analysis_prompt(focus: &[FocusArea]) -> String {
    let selected: Vec<&'static str> = FocusArea::ALL
        .iter()
        .filter(|area| focus.contains(area))
        .map(|area| area.label())
        .collect();

    if selected.is_empty() {
        "Analyze this match clip and provide a full tactical breakdown \
         covering all aspects of play."
            .to_string()
    } else {
        format!(
            "Analyze this match clip with particular attention to the \
             following areas: {}.",
            selected.join(", ")
        )
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pitch_prompt_embeds_the_idea() {
        let prompt = pitch_prompt("organic dog treats by subscription");
        assert!(prompt.contains("organic dog treats by subscription"));
        assert!(prompt.contains("strengths"));
        assert!(prompt.contains("weaknesses"));
        assert!(prompt.contains("potential"));
    }

    #[test]
    fn match_prompt_lists_selected_areas() {
        let prompt = match_analysis_prompt(&[FocusArea::SpaceCreation]);
        assert!(prompt.contains("Space Creation"));
        assert!(!prompt.contains("Pressing Traps"));
    }

    #[test]
    fn match_prompt_order_is_independent_of_selection_order() {
        let a = match_analysis_prompt(&[FocusArea::SpaceCreation, FocusArea::PressingTraps]);
        let b = match_analysis_prompt(&[FocusArea::PressingTraps, FocusArea::SpaceCreation]);
        assert_eq!(a, b);
        assert!(a.contains("Pressing Traps, Space Creation"));
    }

    #[test]
    fn match_prompt_collapses_duplicates() {
        let prompt =
            match_analysis_prompt(&[FocusArea::CounterAttacking, FocusArea::CounterAttacking]);
        assert_eq!(prompt.matches("Counter-Attacking").count(), 1);
    }

    #[test]
    fn empty_selection_asks_for_general_analysis() {
        let prompt = match_analysis_prompt(&[]);
        assert!(prompt.contains("all aspects"));
    }

    #[test]
    fn analyst_instruction_sets_the_persona() {
        assert!(TACTICAL_ANALYST_INSTRUCTION.contains("tactical analyst"));
        assert!(TACTICAL_ANALYST_INSTRUCTION.contains("match clip"));
    }
}
