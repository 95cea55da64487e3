//! LLM provider factory.
//!
//! This module creates LLM clients from application configuration. It
//! resolves the provider name, checks that required secrets are present,
//! and hands back the matching client implementation.

use crate::client::LlmClient;
use crate::providers::GeminiClient;
use askstack_core::{AppError, AppResult};
use std::sync::Arc;

/// Create an LLM client based on the provider name.
///
/// # Arguments
/// * `provider` - Provider identifier (currently "gemini")
/// * `endpoint` - Optional custom endpoint URL
/// * `api_key` - Optional API key (for providers that require it)
///
/// # Errors
/// Returns error if the provider is unknown or a required API key is
/// missing.
pub fn create_client(
    provider: &str,
    endpoint: Option<&str>,
    api_key: Option<&str>,
) -> AppResult<Arc<dyn LlmClient>> {
    match provider.to_lowercase().as_str() {
        "gemini" => {
            let api_key = api_key.ok_or_else(|| {
                AppError::Config(
                    "Gemini provider requires an API key (set GEMINI_API_KEY)".to_string(),
                )
            })?;
            let client = match endpoint {
                Some(endpoint) => GeminiClient::with_endpoint(api_key, endpoint),
                None => GeminiClient::new(api_key),
            };
            Ok(Arc::new(client))
        }
        _ => Err(AppError::Config(format!(
            "Unknown LLM provider: {}",
            provider
        ))),
    }
}
