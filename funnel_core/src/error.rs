//! Error types for the funnel_core library.

use crate::{Intent, Screen};
use std::io;
use uuid::Uuid;

/// Result type alias using our Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Core error type for funnel_core operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The answered option does not belong to the active question
    #[error("Option '{option_id}' is not part of question '{question_id}'")]
    InvalidOption {
        question_id: String,
        option_id: String,
    },

    /// Selection was confirmed before any medication was picked
    #[error("No medication selected; pick one before confirming")]
    GuardRejected,

    /// Selected medication id is not in the catalog
    #[error("Unknown medication: {0}")]
    UnknownMedication(String),

    /// The intent has no transition from the current screen
    #[error("Intent '{intent}' is not allowed on the {screen:?} screen")]
    IntentNotAllowed { screen: Screen, intent: Intent },

    /// No session is registered under this id
    #[error("Unknown session: {0}")]
    UnknownSession(Uuid),

    /// Catalog/quiz content failed validation
    #[error("Content validation error: {0}")]
    ContentValidation(String),

    /// Intent text could not be parsed
    #[error("Parse error: {0}")]
    Parse(String),

    /// IO error occurred
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// JSON serialization/deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// TOML parsing error
    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),

    /// Configuration validation error
    #[error("Configuration error: {0}")]
    Config(String),
}

impl Error {
    /// True for rejections the user can recover from by picking another action
    pub fn is_rejection(&self) -> bool {
        matches!(
            self,
            Error::InvalidOption { .. }
                | Error::GuardRejected
                | Error::UnknownMedication(_)
                | Error::IntentNotAllowed { .. }
        )
    }
}
