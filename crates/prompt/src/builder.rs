//! Prompt builder for rendering the ask template with retrieved sources.

use crate::types::{BuiltPrompt, PromptSource};
use askstack_core::{AppError, AppResult};
use handlebars::Handlebars;
use std::collections::HashMap;

/// Template for a retrieval-augmented question.
const ASK_TEMPLATE: &str = "Question: {{question}}\n\nSources:\n{{sources}}";

/// System prompt used when retrieval found sources.
const ANSWER_SYSTEM_PROMPT: &str = "You are a question answering assistant for a \
developer Q&A knowledge base. Answer the question using the numbered sources when \
they are relevant, and name the sources you relied on.";

/// System prompt used when retrieval came back empty.
const LOW_CONFIDENCE_SYSTEM_PROMPT: &str = "You are a question answering assistant \
for a developer Q&A knowledge base. No sources matched this question; answer from \
general knowledge and state that no matching sources were found.";

/// Build the prompt for a retrieval-augmented question.
///
/// Sources are rendered as numbered blocks so the model can cite them. An
/// empty source list switches to a low-confidence system prompt instead of
/// failing, matching the degraded-answer behavior of the HTTP layer.
///
/// # Example
/// ```
/// use askstack_prompt::{build_ask_prompt, PromptSource};
///
/// # fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let sources = vec![PromptSource::new("How to use Python lists", "Use append.")];
/// let built = build_ask_prompt("python lists", &sources)?;
/// println!("User prompt: {}", built.user);
/// # Ok(())
/// # }
/// ```
pub fn build_ask_prompt(question: &str, sources: &[PromptSource]) -> AppResult<BuiltPrompt> {
    tracing::debug!(sources = sources.len(), "Building ask prompt");

    let mut variables = HashMap::new();
    variables.insert("question".to_string(), question.to_string());
    variables.insert("sources".to_string(), format_sources(sources));

    let user = render_template(ASK_TEMPLATE, &variables)?;

    let low_confidence = sources.is_empty();
    let system = if low_confidence {
        LOW_CONFIDENCE_SYSTEM_PROMPT
    } else {
        ANSWER_SYSTEM_PROMPT
    };

    Ok(BuiltPrompt::new(
        Some(system.to_string()),
        user,
        sources.len(),
        low_confidence,
    ))
}

/// Render a Handlebars template with variables.
fn render_template(template: &str, variables: &HashMap<String, String>) -> AppResult<String> {
    let mut handlebars = Handlebars::new();

    // Disable HTML escaping for plain text
    handlebars.register_escape_fn(handlebars::no_escape);

    handlebars
        .register_template_string("prompt", template)
        .map_err(|e| AppError::Prompt(format!("Failed to register template: {}", e)))?;

    let rendered = handlebars
        .render("prompt", &variables)
        .map_err(|e| AppError::Prompt(format!("Failed to render template: {}", e)))?;

    Ok(rendered)
}

/// Render sources as numbered blocks, one blank line apart.
fn format_sources(sources: &[PromptSource]) -> String {
    if sources.is_empty() {
        return "(no matching sources)".to_string();
    }

    sources
        .iter()
        .enumerate()
        .map(|(index, source)| format_source(index, source))
        .collect::<Vec<_>>()
        .join("\n\n")
}

fn format_source(index: usize, source: &PromptSource) -> String {
    let mut block = format!(
        "[Source {}] {} (score {})",
        index + 1,
        source.question,
        source.score
    );
    if !source.tags.is_empty() {
        block.push_str(&format!(" [tags: {}]", source.tags.join(", ")));
    }
    block.push('\n');
    block.push_str(&source.answer);
    block
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_sources() -> Vec<PromptSource> {
        vec![
            PromptSource::new("How to use Python lists", "Use append and extend.")
                .with_tags(vec!["python".to_string()])
                .with_score(5),
            PromptSource::new("Kubernetes basics", "Start with pods."),
        ]
    }

    #[test]
    fn test_render_simple_template() {
        let mut vars = HashMap::new();
        vars.insert("question".to_string(), "Hello, world!".to_string());

        let result = render_template("Question: {{question}}", &vars);
        assert!(result.is_ok());
        assert_eq!(result.unwrap(), "Question: Hello, world!");
    }

    #[test]
    fn test_render_template_missing_variable() {
        let vars = HashMap::new();
        let result = render_template("Question: {{missing}}", &vars);
        // Handlebars renders missing variables as empty string
        assert!(result.is_ok());
    }

    #[test]
    fn test_ask_prompt_numbers_each_source() {
        let built = build_ask_prompt("python", &sample_sources()).unwrap();

        assert!(built.user.starts_with("Question: python"));
        assert!(built.user.contains("[Source 1] How to use Python lists (score 5) [tags: python]"));
        assert!(built.user.contains("Use append and extend."));
        assert!(built.user.contains("[Source 2] Kubernetes basics (score 0)"));
        assert_eq!(built.metadata.source_count, 2);
        assert!(!built.metadata.low_confidence);
        assert_eq!(built.system.as_deref(), Some(ANSWER_SYSTEM_PROMPT));
    }

    #[test]
    fn test_empty_sources_build_a_low_confidence_prompt() {
        let built = build_ask_prompt("python", &[]).unwrap();

        assert!(built.user.contains("(no matching sources)"));
        assert!(built.metadata.low_confidence);
        assert_eq!(built.system.as_deref(), Some(LOW_CONFIDENCE_SYSTEM_PROMPT));
    }

    #[test]
    fn test_markup_in_answers_is_not_escaped() {
        let sources = vec![PromptSource::new(
            "How to print HTML",
            "Wrap it in <pre> & escape entities.",
        )];

        let built = build_ask_prompt("html", &sources).unwrap();
        assert!(
            built.user.contains("Wrap it in <pre> & escape entities."),
            "prompt text must stay raw: {}",
            built.user
        );
    }
}
