//! Transition engine for the funnel.
//!
//! This module maps (state, intent) to the next state:
//! - Decision branches to the catalog or the diagnostic quiz
//! - Catalog selection is guarded before intake
//! - Quiz answers accumulate until the terminal question yields a recommendation
//!
//! The engine is pure. It reads the content and the current state and
//! returns a new state or an error; the caller decides whether to adopt it.

use crate::{Error, FunnelContent, FunnelState, Intent, QuizStep, Result, Screen};

/// Compute the state that follows `state` when `intent` is applied
///
/// ## Transitions
///
/// | Screen         | Intent               | Next           |
/// |----------------|----------------------|----------------|
/// | Decision       | ChooseKnown          | Catalog        |
/// | Decision       | ChooseUnknown        | Quiz (reset)   |
/// | Catalog        | SelectMedication(id) | Catalog        |
/// | Catalog        | ConfirmSelection     | Intake (guarded) |
/// | Catalog        | Back                 | Decision       |
/// | Quiz           | Answer(option)       | Quiz or Recommendation |
/// | Recommendation | AcceptProtocol       | Intake         |
/// | Recommendation | ExploreAll           | Catalog        |
///
/// Anything else, including every intent on Intake, is `IntentNotAllowed`.
pub fn transition(
    content: &FunnelContent,
    state: &FunnelState,
    intent: &Intent,
) -> Result<FunnelState> {
    let mut next = state.clone();

    match (state.screen, intent) {
        (Screen::Decision, Intent::ChooseKnown) => {
            next.screen = Screen::Catalog;
        }

        (Screen::Decision, Intent::ChooseUnknown) => {
            next.screen = Screen::Quiz;
            next.quiz_index = 0;
            next.answers.clear();
        }

        (Screen::Catalog, Intent::SelectMedication(id)) => {
            if !content.catalog.contains(id) {
                return Err(Error::UnknownMedication(id.clone()));
            }
            next.selected_medication_id = Some(id.clone());
        }

        (Screen::Catalog, Intent::ConfirmSelection) => {
            if !state.has_selection() {
                tracing::info!("Confirm rejected: no medication selected");
                return Err(Error::GuardRejected);
            }
            next.screen = Screen::Intake;
        }

        (Screen::Catalog, Intent::Back) => {
            next.screen = Screen::Decision;
        }

        (Screen::Quiz, Intent::Answer(option_id)) => {
            answer_question(content, &mut next, option_id)?;
        }

        (Screen::Recommendation, Intent::AcceptProtocol) => {
            next.screen = Screen::Intake;
        }

        (Screen::Recommendation, Intent::ExploreAll) => {
            next.screen = Screen::Catalog;
        }

        (screen, intent) => {
            return Err(Error::IntentNotAllowed {
                screen,
                intent: intent.clone(),
            });
        }
    }

    tracing::debug!("Transition {} --{}--> {}", state.screen, intent, next.screen);
    Ok(next)
}

/// Record an answer to the active question and advance the quiz
fn answer_question(content: &FunnelContent, next: &mut FunnelState, option_id: &str) -> Result<()> {
    let step = content.quiz.step(next.quiz_index).ok_or_else(|| {
        Error::ContentValidation(format!(
            "Quiz index {} is past the last question ({} questions)",
            next.quiz_index,
            content.quiz.len()
        ))
    })?;

    let question = step.question();
    let option = question
        .option(option_id)
        .ok_or_else(|| Error::InvalidOption {
            question_id: question.id.clone(),
            option_id: option_id.to_string(),
        })?;

    let recommended = option.recommended_medication_id.clone();
    next.answers.push(recommended.clone());

    match step {
        QuizStep::Intermediate { next_index, .. } => {
            next.quiz_index = next_index;
        }
        QuizStep::Terminal { .. } => {
            tracing::info!(
                "Quiz complete after {} answers, recommending {}",
                next.answers.len(),
                recommended
            );
            next.selected_medication_id = Some(recommended);
            next.screen = Screen::Recommendation;
        }
    }

    Ok(())
}
