//! askstack - retrieval-augmented Q&A backend.
//!
//! Answers questions over HTTP by streaming a Q&A corpus, ranking the
//! matches, and prompting an LLM with the ranked sources. Scanning and
//! ranking live in `askstack-retrieval`, provider clients in
//! `askstack-llm`, and prompt assembly in `askstack-prompt`.

pub mod api;
