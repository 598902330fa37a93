//! Default catalog of medications and the diagnostic quiz.
//!
//! This module provides the built-in content for the funnel, plus the
//! lookups and load-time validation the engine relies on.

use crate::types::*;
use once_cell::sync::Lazy;
use std::collections::HashSet;
use std::sync::Arc;

/// Cached default content - built once and shared by every session
static DEFAULT_CONTENT: Lazy<Arc<FunnelContent>> =
    Lazy::new(|| Arc::new(build_default_content_internal()));

/// Get a shared handle to the cached default content
pub fn get_default_content() -> Arc<FunnelContent> {
    Arc::clone(&DEFAULT_CONTENT)
}

/// Builds the default catalog and quiz
///
/// **Note**: For production use, prefer `get_default_content()` which returns a
/// shared handle. This function is retained for testing and custom content.
pub fn build_default_content() -> FunnelContent {
    build_default_content_internal()
}

fn med(id: &str, name: &str, tag: &str, description: &str) -> MedicationRecord {
    MedicationRecord {
        id: id.into(),
        name: name.into(),
        tag: tag.into(),
        description: description.into(),
    }
}

fn opt(id: &str, label: &str, sublabel: &str, rec: &str) -> QuizOption {
    QuizOption {
        id: id.into(),
        label: label.into(),
        sublabel: sublabel.into(),
        recommended_medication_id: rec.into(),
    }
}

fn build_default_content_internal() -> FunnelContent {
    // ========================================================================
    // Catalog
    // ========================================================================

    let longevity = Category {
        name: "Longevity".into(),
        medications: vec![
            med("nad_inj", "NAD+ Injection", "Cellular Fuel",
                "Direct mitochondrial support for cognitive clarity."),
            med("nad_nasal", "NAD+ Nasal", "Rapid Uptake",
                "Immediate neuro-optimization via nasal mucosa."),
            med("nad_oral", "NAD+ Next-Gen Oral", "Bio-Available",
                "Sublingual dropper for sustained daily energy."),
            med("sermorelin", "Sermorelin Injection", "GH Secretagogue",
                "Stimulate natural growth hormone production."),
            med("b12_mic", "B12 MIC Injection", "Metabolic",
                "Fat-burning lipotropics and B12 for energy."),
        ],
    };

    let testosterone = Category {
        name: "Testosterone".into(),
        medications: vec![
            med("trt_inj", "Injectable TRT", "Gold Standard",
                "Clinical precision for energy and muscle recovery."),
            med("trt_oral", "Oral TRT", "Non-Invasive",
                "Daily oral administration for hormone optimization."),
            med("enclo", "Enclomiphene", "Fertility Safe",
                "Boost natural T while preserving spermatogenesis."),
        ],
    };

    let menopause = Category {
        name: "Menopause (HRT)".into(),
        medications: vec![
            med("est_pill", "Estradiol Pill", "Systemic",
                "Foundational estrogen replacement therapy."),
            med("prog", "Progesterone", "Balance",
                "Essential for sleep quality and uterine health."),
            med("est_patch", "Estradiol Patch", "Steady State",
                "Consistent transdermal delivery."),
            med("est_cream", "Estradiol Cream", "Targeted",
                "Absorbs through skin for localized optimization."),
            med("non_h_parox", "Paroxetine Pill", "Non-Hormonal",
                "Symptom relief for those avoiding hormones."),
        ],
    };

    // ========================================================================
    // Diagnostic quiz
    // ========================================================================

    let questions = vec![
        QuizQuestion {
            id: "lifestyle".into(),
            title: "Biological Friction".into(),
            prompt: "Where do you feel the most 'drag' in your daily life?".into(),
            options: vec![
                opt("physical", "Physical Recovery", "Muscles feel sore longer than usual", "sermorelin"),
                opt("mental", "Cognitive Fog", "Processing speed is down midday", "nad_inj"),
                opt("drive", "Diminished Drive", "Low motivation and low libido", "trt_inj"),
            ],
        },
        QuizQuestion {
            id: "goal".into(),
            title: "Target Output".into(),
            prompt: "What is your primary optimization target?".into(),
            options: vec![
                opt("longevity", "Lifespan & Cellular Health", "Focusing on the long-term", "nad_inj"),
                opt("strength", "Peak Physical Force", "Muscle density and power", "trt_inj"),
                opt("wellbeing", "Hormonal Equilibrium", "Emotional and physical balance", "est_pill"),
            ],
        },
        QuizQuestion {
            id: "activity".into(),
            title: "Exercise Load".into(),
            prompt: "Describe your current physical training intensity:".into(),
            options: vec![
                opt("heavy", "High Intensity", "4-6 days of heavy lifting/cardio", "trt_inj"),
                opt("moderate", "Moderate Active", "Maintenance movement", "sermorelin"),
                opt("low", "Sedentary / Recovery", "Focusing on base health", "b12_mic"),
            ],
        },
    ];

    FunnelContent {
        catalog: Catalog {
            categories: vec![longevity, testosterone, menopause],
        },
        quiz: QuizSequence { questions },
    }
}

impl Catalog {
    /// All medications across categories, in catalog order
    pub fn medications(&self) -> impl Iterator<Item = &MedicationRecord> {
        self.categories.iter().flat_map(|c| c.medications.iter())
    }

    pub fn find(&self, id: &str) -> Option<&MedicationRecord> {
        self.medications().find(|m| m.id == id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.find(id).is_some()
    }

    /// Name of the category holding the medication
    pub fn category_of(&self, id: &str) -> Option<&str> {
        self.categories
            .iter()
            .find(|c| c.medications.iter().any(|m| m.id == id))
            .map(|c| c.name.as_str())
    }

    /// Total number of medications
    pub fn len(&self) -> usize {
        self.categories.iter().map(|c| c.medications.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl QuizQuestion {
    pub fn option(&self, option_id: &str) -> Option<&QuizOption> {
        self.options.iter().find(|o| o.id == option_id)
    }
}

impl QuizSequence {
    pub fn len(&self) -> usize {
        self.questions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }

    pub fn question(&self, index: usize) -> Option<&QuizQuestion> {
        self.questions.get(index)
    }

    /// Tagged position of the question at `index`, or `None` past the end
    pub fn step(&self, index: usize) -> Option<QuizStep<'_>> {
        let question = self.questions.get(index)?;
        let next_index = index + 1;
        if next_index < self.questions.len() {
            Some(QuizStep::Intermediate {
                question,
                next_index,
            })
        } else {
            Some(QuizStep::Terminal { question })
        }
    }

    /// Iterate over every question in order, tagged
    pub fn steps(&self) -> impl Iterator<Item = QuizStep<'_>> {
        (0..self.len()).filter_map(move |i| self.step(i))
    }
}

impl FunnelContent {
    /// Validate content integrity
    ///
    /// Returns a list of validation errors (empty if valid)
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();

        if self.catalog.is_empty() {
            errors.push("Catalog has no medications".to_string());
        }

        let mut med_ids = HashSet::new();
        for category in &self.catalog.categories {
            if category.medications.is_empty() {
                errors.push(format!("Category '{}' has no medications", category.name));
            }
            for med in &category.medications {
                if !med_ids.insert(med.id.as_str()) {
                    errors.push(format!(
                        "Medication id '{}' appears more than once (category '{}')",
                        med.id, category.name
                    ));
                }
            }
        }

        if self.quiz.is_empty() {
            errors.push("Quiz has no questions".to_string());
        }

        let mut question_ids = HashSet::new();
        for question in &self.quiz.questions {
            if !question_ids.insert(question.id.as_str()) {
                errors.push(format!("Question id '{}' appears more than once", question.id));
            }

            if question.options.is_empty() {
                errors.push(format!("Question '{}' has no options", question.id));
            }

            let mut option_ids = HashSet::new();
            for option in &question.options {
                if !option_ids.insert(option.id.as_str()) {
                    errors.push(format!(
                        "Question '{}': option id '{}' appears more than once",
                        question.id, option.id
                    ));
                }
                if !med_ids.contains(option.recommended_medication_id.as_str()) {
                    errors.push(format!(
                        "Question '{}': option '{}' recommends unknown medication '{}'",
                        question.id, option.id, option.recommended_medication_id
                    ));
                }
            }
        }

        errors
    }
}
