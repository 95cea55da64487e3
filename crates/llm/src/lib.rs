//! LLM integration crate for the askstack backend.
//!
//! This crate provides a provider-agnostic abstraction for sending
//! retrieval-augmented prompts to Large Language Models.
//!
//! # Providers
//! - **Gemini**: Google generateContent API (default)
//! - Future: local runtimes, other hosted APIs
//!
//! # Example
//! ```no_run
//! use askstack_llm::{LlmClient, LlmRequest, providers::GeminiClient};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let client = GeminiClient::new("api-key");
//! let request = LlmRequest::new("What is a borrow checker?", "gemini-pro");
//! let response = client.complete(&request).await?;
//! println!("{}", response.content);
//! # Ok(())
//! # }
//! ```

pub mod client;
pub mod factory;
pub mod providers;

// Re-export main types
pub use client::{LlmClient, LlmRequest, LlmResponse, LlmUsage};
pub use factory::create_client;
pub use providers::GeminiClient;
