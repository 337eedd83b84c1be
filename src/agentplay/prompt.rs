//! Prompt helpers shared by the conversation launchers.

use log::debug;

use crate::render::{InteractionSink, SinkError};

/// Question shown when a launcher has no prompt baked in.
pub const DEFAULT_INPUT_PROMPT: &str = "Input user prompt. Submit prompt via (Meta|Esc)+Enter.";

/// `false` for prompts made only of spaces, `\r`, `\n`, `\t`, form feeds and vertical tabs.
///
/// ```rust
/// use agentplay::prompt::is_non_empty_prompt;
///
/// assert!(is_non_empty_prompt("review my code"));
/// assert!(!is_non_empty_prompt("\n\t  \r\n"));
/// assert!(!is_non_empty_prompt(""));
/// ```
pub fn is_non_empty_prompt(prompt: &str) -> bool {
    !prompt
        .chars()
        .all(|c| matches!(c, ' ' | '\r' | '\n' | '\t' | '\x0c' | '\x0b'))
}

/// Use `prompt` if it has content, otherwise ask the human through `sink`.
pub async fn initial_prompt(
    prompt: &str,
    sink: &dyn InteractionSink,
) -> Result<String, SinkError> {
    if is_non_empty_prompt(prompt) {
        return Ok(prompt.to_string());
    }
    debug!("no initial prompt provided, asking for input");
    sink.input(DEFAULT_INPUT_PROMPT).await
}
