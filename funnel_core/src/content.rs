//! Loading funnel content from disk.
//!
//! A content file is TOML with the same shape as the embedded content:
//! `[[catalog.categories]]` with nested `medications`, and
//! `[[quiz.questions]]` with nested `options`.

use crate::{Error, FunnelContent, Result};
use std::path::Path;

impl FunnelContent {
    /// Load and validate content from a TOML file
    pub fn load_from(path: &Path) -> Result<Self> {
        Self::read_from(path)?.validated()
    }

    /// Parse content from a TOML file without validating it
    pub fn read_from(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        let content: FunnelContent = toml::from_str(&contents)?;
        tracing::info!(
            "Read content from {:?} ({} medications, {} questions)",
            path,
            content.catalog.len(),
            content.quiz.len()
        );
        Ok(content)
    }

    /// Pass the content through if it validates, otherwise fail with every problem found
    pub fn validated(self) -> Result<Self> {
        let errors = self.validate();
        if errors.is_empty() {
            return Ok(self);
        }
        for error in &errors {
            tracing::error!("Content validation: {}", error);
        }
        Err(Error::ContentValidation(errors.join("; ")))
    }

    /// Serialize content to TOML, in the format `load_from` reads
    pub fn to_toml_string(&self) -> Result<String> {
        toml::to_string_pretty(self)
            .map_err(|e| Error::Config(format!("Failed to serialize content: {}", e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::build_default_content;

    #[test]
    fn test_default_content_survives_file_roundtrip() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("content.toml");

        let content = build_default_content();
        std::fs::write(&path, content.to_toml_string().unwrap()).unwrap();

        let loaded = FunnelContent::load_from(&path).unwrap();
        assert_eq!(loaded, content);
    }

    #[test]
    fn test_load_handwritten_content() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("content.toml");
        std::fs::write(
            &path,
            r#"
[[catalog.categories]]
name = "Sleep"

[[catalog.categories.medications]]
id = "mag"
name = "Magnesium"
tag = "Mineral"
description = "Evening support."

[[quiz.questions]]
id = "rest"
title = "Rest"
prompt = "How do you sleep?"

[[quiz.questions.options]]
id = "poorly"
label = "Poorly"
sublabel = "Often awake"
recommended_medication_id = "mag"
"#,
        )
        .unwrap();

        let content = FunnelContent::load_from(&path).unwrap();
        assert_eq!(content.catalog.len(), 1);
        assert_eq!(content.quiz.len(), 1);
        assert!(content.quiz.step(0).unwrap().is_terminal());
    }

    #[test]
    fn test_load_rejects_dangling_recommendation() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("content.toml");

        let mut content = build_default_content();
        content.catalog.categories.retain(|c| c.name != "Testosterone");
        std::fs::write(&path, content.to_toml_string().unwrap()).unwrap();

        let err = FunnelContent::load_from(&path).unwrap_err();
        match err {
            Error::ContentValidation(msg) => assert!(msg.contains("trt_inj")),
            other => panic!("Expected ContentValidation, got {:?}", other),
        }
    }

    #[test]
    fn test_read_from_skips_validation() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("content.toml");

        let mut content = build_default_content();
        content.quiz.questions[0].options[0].recommended_medication_id = "gone".into();
        std::fs::write(&path, content.to_toml_string().unwrap()).unwrap();

        let read = FunnelContent::read_from(&path).unwrap();
        assert_eq!(read.validate().len(), 1);
        assert!(FunnelContent::load_from(&path).is_err());
    }

    #[test]
    fn test_load_missing_file_is_io_error() {
        let temp_dir = tempfile::tempdir().unwrap();
        let result = FunnelContent::load_from(&temp_dir.path().join("missing.toml"));
        assert!(matches!(result, Err(Error::Io(_))));
    }

    #[test]
    fn test_load_malformed_toml() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("content.toml");
        std::fs::write(&path, "[[catalog.categories]\nname = ").unwrap();
        assert!(matches!(FunnelContent::load_from(&path), Err(Error::Toml(_))));
    }
}
