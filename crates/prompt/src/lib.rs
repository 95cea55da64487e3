//! Prompt composition for the askstack backend.
//!
//! This crate renders retrieved Q&A sources and the user's question into
//! an LLM-ready prompt:
//! - Handlebars template rendering (plain text, no HTML escaping)
//! - Numbered source blocks the model can cite
//! - A low-confidence variant when retrieval found nothing

pub mod builder;
pub mod types;

// Re-export main types
pub use builder::build_ask_prompt;
pub use types::{BuiltPrompt, BuiltPromptMetadata, PromptSource};
