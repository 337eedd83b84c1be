//! Turning segmented replies into output.
//!
//! The crate does not draw anything itself. A host application (a terminal front-end, a
//! test harness, a log shipper) implements [`InteractionSink`] and hands it to a
//! [`ReplyRenderer`] when it sets up its agents. The renderer segments each reply and
//! forwards [`RenderBlock`]s to the sink in order:
//!
//! - [`SegmentKind::Text`] becomes [`RenderBlock::Plain`]
//! - [`SegmentKind::Code`] becomes [`RenderBlock::Highlighted`], labelled by language
//! - [`SegmentKind::Reasoning`] becomes a [`RenderBlock::Panel`] titled `"Reasoning"`
//!
//! # Example
//!
//! ```rust
//! use std::sync::Arc;
//! use agentplay::render::{BufferSink, RenderBlock, ReplyRenderer};
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let sink = Arc::new(BufferSink::new());
//! let renderer = ReplyRenderer::new(sink.clone());
//!
//! renderer.render("Run this:\n```sh\nls -la\n```").await;
//!
//! let printed = sink.printed().await;
//! assert_eq!(printed[0], RenderBlock::Plain("Run this:\n".into()));
//! assert_eq!(
//!     printed[1],
//!     RenderBlock::Highlighted { language: "bash".into(), code: "ls -la".into() }
//! );
//! # Ok(())
//! # }
//! ```

use std::collections::VecDeque;
use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use log::debug;
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;

use crate::segmenter::{Segment, SegmentKind, Segmenter};

/// Title given to reasoning panels.
pub const REASONING_TITLE: &str = "Reasoning";

/// A unit of output handed to an [`InteractionSink`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RenderBlock {
    /// Text printed as-is.
    Plain(String),
    /// Code to syntax-highlight.
    Highlighted {
        /// Canonical language name used to pick a highlighter.
        language: String,
        /// Code body without fences.
        code: String,
    },
    /// Boxed content set apart from the answer.
    Panel {
        /// Panel title.
        title: String,
        /// Panel body.
        body: String,
    },
}

/// Map segments to render blocks, keeping their order.
///
/// Text segments that are empty or only whitespace are skipped since they have nothing
/// to show between two boxed blocks.
pub fn create_renderable_blocks(segments: &[Segment]) -> Vec<RenderBlock> {
    segments
        .iter()
        .filter_map(|segment| match &segment.kind {
            SegmentKind::Text if segment.content.trim().is_empty() => None,
            SegmentKind::Text => Some(RenderBlock::Plain(segment.content.clone())),
            SegmentKind::Code { language } => Some(RenderBlock::Highlighted {
                language: language.clone(),
                code: segment.content.clone(),
            }),
            SegmentKind::Reasoning => Some(RenderBlock::Panel {
                title: REASONING_TITLE.to_string(),
                body: segment.content.clone(),
            }),
        })
        .collect()
}

/// Errors an [`InteractionSink`] can report.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SinkError {
    /// No more input is available (EOF, closed channel, empty queue).
    InputClosed,
    /// The underlying terminal or stream failed.
    Io(String),
    /// The sink refused the request.
    Rejected(String),
}

impl fmt::Display for SinkError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SinkError::InputClosed => write!(f, "Input closed"),
            SinkError::Io(msg) => write!(f, "IO error: {}", msg),
            SinkError::Rejected(msg) => write!(f, "Rejected: {}", msg),
        }
    }
}

impl std::error::Error for SinkError {}

impl From<std::io::Error> for SinkError {
    fn from(e: std::io::Error) -> Self {
        SinkError::Io(e.to_string())
    }
}

/// Output and input hooks supplied by the host application.
///
/// Implementations are shared behind `Arc<dyn InteractionSink>`, so they must be
/// `Send + Sync`; use interior mutability for any state they keep.
#[async_trait]
pub trait InteractionSink: Send + Sync {
    /// Display one block.
    async fn print(&self, block: &RenderBlock);

    /// Ask the human for input.
    async fn input(&self, prompt: &str) -> Result<String, SinkError>;

    /// Deliver a message to another participant. The default drops it.
    async fn send(&self, _recipient: &str, _message: &str) -> Result<(), SinkError> {
        Ok(())
    }
}

/// Segments replies and prints them through an [`InteractionSink`].
pub struct ReplyRenderer {
    sink: Arc<dyn InteractionSink>,
    segmenter: Segmenter,
}

impl ReplyRenderer {
    /// Renderer using the default reasoning markers.
    pub fn new(sink: Arc<dyn InteractionSink>) -> Self {
        Self {
            sink,
            segmenter: Segmenter::default(),
        }
    }

    pub fn with_segmenter(mut self, segmenter: Segmenter) -> Self {
        self.segmenter = segmenter;
        self
    }

    pub fn sink(&self) -> &Arc<dyn InteractionSink> {
        &self.sink
    }

    /// Render one reply and return the number of blocks printed.
    ///
    /// Replies with neither code nor reasoning skip segmentation and are printed as a
    /// single plain block.
    pub async fn render(&self, reply: &str) -> usize {
        if !self.segmenter.has_code_snippet(reply) && !self.segmenter.has_reasoning_block(reply) {
            self.sink.print(&RenderBlock::Plain(reply.to_string())).await;
            return 1;
        }

        let segments = self.segmenter.parse(reply);
        let blocks = create_renderable_blocks(&segments);
        debug!(
            "rendering {} blocks from {} segments",
            blocks.len(),
            segments.len()
        );
        for block in &blocks {
            self.sink.print(block).await;
        }
        blocks.len()
    }
}

/// In-memory [`InteractionSink`].
///
/// Records every printed block and sent message, and answers `input` from a queue of
/// canned replies (returning [`SinkError::InputClosed`] once the queue is empty).
#[derive(Default)]
pub struct BufferSink {
    printed: Mutex<Vec<RenderBlock>>,
    inputs: Mutex<VecDeque<String>>,
    prompts: Mutex<Vec<String>>,
    sent: Mutex<Vec<(String, String)>>,
}

impl BufferSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sink whose `input` calls return `replies` in order.
    pub fn with_inputs<I, S>(replies: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            inputs: Mutex::new(replies.into_iter().map(Into::into).collect()),
            ..Self::default()
        }
    }

    pub async fn printed(&self) -> Vec<RenderBlock> {
        self.printed.lock().await.clone()
    }

    /// Prompts passed to `input`, in call order.
    pub async fn prompts(&self) -> Vec<String> {
        self.prompts.lock().await.clone()
    }

    /// `(recipient, message)` pairs passed to `send`.
    pub async fn sent(&self) -> Vec<(String, String)> {
        self.sent.lock().await.clone()
    }
}

#[async_trait]
impl InteractionSink for BufferSink {
    async fn print(&self, block: &RenderBlock) {
        self.printed.lock().await.push(block.clone());
    }

    async fn input(&self, prompt: &str) -> Result<String, SinkError> {
        self.prompts.lock().await.push(prompt.to_string());
        self.inputs
            .lock()
            .await
            .pop_front()
            .ok_or(SinkError::InputClosed)
    }

    async fn send(&self, recipient: &str, message: &str) -> Result<(), SinkError> {
        self.sent
            .lock()
            .await
            .push((recipient.to_string(), message.to_string()));
        Ok(())
    }
}
