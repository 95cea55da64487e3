//! Prompt types for the askstack backend.
//!
//! This module defines the domain entities for prompt composition.

use serde::{Deserialize, Serialize};

/// One retrieved Q&A source offered to the LLM as grounding material.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PromptSource {
    /// Question text of the source record
    pub question: String,

    /// Answer text of the source record
    pub answer: String,

    /// Topic tags
    #[serde(default)]
    pub tags: Vec<String>,

    /// Vote score
    #[serde(default)]
    pub score: i64,
}

impl PromptSource {
    /// Create a source with empty tags and a zero score.
    pub fn new(question: impl Into<String>, answer: impl Into<String>) -> Self {
        Self {
            question: question.into(),
            answer: answer.into(),
            tags: Vec::new(),
            score: 0,
        }
    }

    /// Set the topic tags.
    pub fn with_tags(mut self, tags: Vec<String>) -> Self {
        self.tags = tags;
        self
    }

    /// Set the vote score.
    pub fn with_score(mut self, score: i64) -> Self {
        self.score = score;
        self
    }
}

/// A fully built prompt ready for LLM execution.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BuiltPrompt {
    /// System message (optional)
    pub system: Option<String>,

    /// User message (required)
    pub user: String,

    /// Metadata about the built prompt
    pub metadata: BuiltPromptMetadata,
}

/// Metadata about a built prompt.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BuiltPromptMetadata {
    /// How many sources were rendered into the prompt
    #[serde(rename = "sourceCount")]
    pub source_count: usize,

    /// Whether the prompt asks the model to answer without sources
    #[serde(rename = "lowConfidence")]
    pub low_confidence: bool,
}

impl BuiltPrompt {
    /// Create a new built prompt.
    pub fn new(
        system: Option<String>,
        user: String,
        source_count: usize,
        low_confidence: bool,
    ) -> Self {
        Self {
            system,
            user,
            metadata: BuiltPromptMetadata {
                source_count,
                low_confidence,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prompt_source_builders() {
        let source = PromptSource::new("How do I split a string?", "Use split().")
            .with_tags(vec!["python".to_string()])
            .with_score(7);

        assert_eq!(source.question, "How do I split a string?");
        assert_eq!(source.tags, vec!["python".to_string()]);
        assert_eq!(source.score, 7);
    }

    #[test]
    fn test_built_prompt_creation() {
        let built = BuiltPrompt::new(
            Some("System message".to_string()),
            "User message".to_string(),
            2,
            false,
        );

        assert_eq!(built.system, Some("System message".to_string()));
        assert_eq!(built.user, "User message");
        assert_eq!(built.metadata.source_count, 2);
        assert!(!built.metadata.low_confidence);
    }
}
