//! Core domain types for the protocol funnel.
//!
//! This module defines the fundamental types used throughout the system:
//! - Medication records and the categorized catalog
//! - Diagnostic quiz questions and options
//! - Screens, funnel state, and user intents

use serde::{Deserialize, Serialize};

// ============================================================================
// Catalog Types
// ============================================================================

/// A selectable medication (e.g., "NAD+ Injection")
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct MedicationRecord {
    pub id: String,
    pub name: String,
    pub tag: String,
    pub description: String,
}

/// A named group of medications, shown as one section of the catalog
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct Category {
    pub name: String,
    pub medications: Vec<MedicationRecord>,
}

/// Ordered mapping from category name to its medications
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct Catalog {
    pub categories: Vec<Category>,
}

// ============================================================================
// Quiz Types
// ============================================================================

/// One answer to a quiz question, carrying the medication it points toward
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct QuizOption {
    pub id: String,
    pub label: String,
    pub sublabel: String,
    pub recommended_medication_id: String,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct QuizQuestion {
    pub id: String,
    pub title: String,
    pub prompt: String,
    pub options: Vec<QuizOption>,
}

/// Fixed, ordered diagnostic questionnaire
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct QuizSequence {
    pub questions: Vec<QuizQuestion>,
}

/// Position of a question within the sequence.
///
/// The engine branches on this rather than on index arithmetic: answering an
/// `Intermediate` question advances to `next_index`, answering the `Terminal`
/// one produces the recommendation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum QuizStep<'a> {
    Intermediate {
        question: &'a QuizQuestion,
        next_index: usize,
    },
    Terminal {
        question: &'a QuizQuestion,
    },
}

impl<'a> QuizStep<'a> {
    pub fn question(&self) -> &'a QuizQuestion {
        match self {
            QuizStep::Intermediate { question, .. } => question,
            QuizStep::Terminal { question } => question,
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, QuizStep::Terminal { .. })
    }
}

/// Catalog and quiz bundled together; the unit that is loaded and validated
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct FunnelContent {
    pub catalog: Catalog,
    pub quiz: QuizSequence,
}

// ============================================================================
// Funnel State Types
// ============================================================================

/// Screen the funnel is currently showing
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "snake_case")]
pub enum Screen {
    #[default]
    Decision,
    Catalog,
    Quiz,
    Recommendation,
    Intake,
}

/// Mutable per-session state, replaced wholesale by the transition engine
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct FunnelState {
    pub screen: Screen,
    /// Only meaningful while `screen == Screen::Quiz`
    pub quiz_index: usize,
    pub selected_medication_id: Option<String>,
    /// Recommended medication ids of the options answered so far
    pub answers: Vec<String>,
}

/// A discrete user action requesting a state change
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(tag = "type", content = "id", rename_all = "snake_case")]
pub enum Intent {
    ChooseKnown,
    ChooseUnknown,
    SelectMedication(String),
    ConfirmSelection,
    Back,
    Answer(String),
    AcceptProtocol,
    ExploreAll,
}
