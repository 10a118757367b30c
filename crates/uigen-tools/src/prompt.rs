//! System prompt for the generation agent.

/// Instructions sent to the language model alongside the editing tools.
///
/// # Examples
///
/// ```
/// assert!(uigen_tools::GENERATION_PROMPT.contains("/App.jsx"));
/// ```
pub const GENERATION_PROMPT: &str = include_str!("../prompts/generation.md");
