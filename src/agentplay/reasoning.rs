//! Reasoning block markers.
//!
//! Reasoning models (DeepSeek R1 and friends served through an OpenAI-compatible proxy)
//! return their chain of thought in a separate `reasoning_content` field. Before a reply is
//! handed to the rest of the conversation the two channels are folded into a single string,
//! with the reasoning wrapped between an open and a close marker:
//!
//! ```text
//! ~~~Reasoning:
//! <reasoning>~~~Finished reasoning
//!
//! <answer>
//! ```
//!
//! [`crate::segmenter`] recognises the same markers and turns the wrapped region back into
//! a [`SegmentKind::Reasoning`](crate::segmenter::SegmentKind::Reasoning) segment.
//!
//! # Example
//!
//! ```rust
//! use agentplay::reasoning::ReasoningMarkers;
//! use agentplay::segmenter::{parse_content_blocks, SegmentKind};
//!
//! let markers = ReasoningMarkers::default();
//! let reply = markers.format_reply(Some("compare both options\n"), "Option B.");
//!
//! let segments = parse_content_blocks(&reply);
//! assert_eq!(segments[0].kind, SegmentKind::Reasoning);
//! assert_eq!(segments[0].content, "compare both options");
//! assert_eq!(segments[1].content, "\n\nOption B.");
//! ```

use serde::{Deserialize, Serialize};

/// Default literal opening a reasoning block.
pub const DEFAULT_OPEN_MARKER: &str = "~~~Reasoning:";

/// Default literal closing a reasoning block.
pub const DEFAULT_CLOSE_MARKER: &str = "~~~Finished reasoning";

/// The literal pair that brackets a reasoning block.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReasoningMarkers {
    /// Literal that opens the block.
    pub open: String,
    /// Literal that closes the block.
    pub close: String,
}

impl Default for ReasoningMarkers {
    fn default() -> Self {
        Self {
            open: DEFAULT_OPEN_MARKER.to_string(),
            close: DEFAULT_CLOSE_MARKER.to_string(),
        }
    }
}

impl ReasoningMarkers {
    /// Create a marker pair from arbitrary literals.
    pub fn new(open: impl Into<String>, close: impl Into<String>) -> Self {
        Self {
            open: open.into(),
            close: close.into(),
        }
    }

    /// Wrap `reasoning` between the markers.
    ///
    /// The reasoning text is inserted verbatim; callers that want the close marker on
    /// its own line should keep the trailing newline the provider usually sends.
    pub fn wrap(&self, reasoning: &str) -> String {
        format!("{}\n{}{}\n\n", self.open, reasoning, self.close)
    }

    /// Fold an optional reasoning channel into the reply content.
    ///
    /// Returns `content` unchanged when `reasoning` is `None` or empty.
    pub fn format_reply(&self, reasoning: Option<&str>, content: &str) -> String {
        match reasoning {
            Some(r) if !r.is_empty() => {
                let mut reply = self.wrap(r);
                reply.push_str(content);
                reply
            }
            _ => content.to_string(),
        }
    }
}
