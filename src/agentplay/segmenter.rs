//! Content segmentation for agent replies.
//!
//! An LLM reply is a single string that mixes prose, fenced code blocks and (for reasoning
//! models) a delimited chain-of-thought region. [`parse_content_blocks`] splits such a string
//! into an ordered list of typed [`Segment`]s so a terminal renderer can highlight code,
//! box the reasoning and print the rest as-is.
//!
//! The segmentation is a partition of the input: segments are sorted by start offset, never
//! overlap, and their ranges cover every character of the input exactly once. Offsets are
//! counted in characters, not bytes.
//!
//! # Matching rules
//!
//! 1. Reasoning blocks are found first: the shortest span from the open marker to the next
//!    close marker, newlines included.
//! 2. Fenced code blocks are found next: ` ``` ` immediately followed by a label from the
//!    alias table in [`crate::language`], the shortest body, and a closing ` ``` `. A fence
//!    that overlaps an already accepted block is dropped.
//! 3. Everything between accepted blocks becomes a [`SegmentKind::Text`] segment, and the
//!    remainder after the last block is always emitted, even when empty.
//!
//! Unknown labels and unterminated fences or markers never match, so they stay inside
//! the surrounding text.
//!
//! # Example
//!
//! ```rust
//! use agentplay::segmenter::{parse_content_blocks, SegmentKind};
//!
//! let segments = parse_content_blocks("before\n```python\nprint(1)\n```\nafter");
//!
//! assert_eq!(segments.len(), 3);
//! assert_eq!(segments[0].content, "before\n");
//! assert_eq!(segments[1].kind, SegmentKind::Code { language: "python".into() });
//! assert_eq!(segments[1].content, "print(1)");
//! assert_eq!(segments[2].content, "\nafter");
//! ```

use std::ops::Range;

use log::debug;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::language::{alias_alternation, normalize_language};
use crate::reasoning::ReasoningMarkers;

/// Segmenter using the default reasoning markers, shared by the free functions.
static DEFAULT_SEGMENTER: Lazy<Segmenter> = Lazy::new(|| {
    Segmenter::new(SegmenterConfig::default()).expect("default segmenter patterns are valid")
});

/// What a [`Segment`] holds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SegmentKind {
    /// Plain text, rendered verbatim.
    Text,
    /// A fenced code block with its normalized language name.
    Code {
        /// Canonical language, e.g. `"python"` for a ` ```py ` fence.
        language: String,
    },
    /// A reasoning block.
    Reasoning,
}

/// One typed slice of a parsed reply.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Segment {
    /// What this slice is.
    pub kind: SegmentKind,
    /// Half-open character range into the original string, markers and fences included.
    pub range: Range<usize>,
    /// Payload to render.
    ///
    /// For code, the fenced body without one leading and one trailing newline. For
    /// reasoning, the text between the markers with surrounding whitespace trimmed. For
    /// text, the raw span.
    pub content: String,
}

impl Segment {
    pub fn is_text(&self) -> bool {
        matches!(self.kind, SegmentKind::Text)
    }

    pub fn is_code(&self) -> bool {
        matches!(self.kind, SegmentKind::Code { .. })
    }

    pub fn is_reasoning(&self) -> bool {
        matches!(self.kind, SegmentKind::Reasoning)
    }

    /// Language of a code segment, `None` for everything else.
    pub fn language(&self) -> Option<&str> {
        match &self.kind {
            SegmentKind::Code { language } => Some(language),
            _ => None,
        }
    }

    /// Number of input characters covered by this segment.
    pub fn len(&self) -> usize {
        self.range.end - self.range.start
    }

    pub fn is_empty(&self) -> bool {
        self.range.start == self.range.end
    }
}

/// Pattern configuration for a [`Segmenter`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SegmenterConfig {
    /// Literals bracketing a reasoning block.
    pub markers: ReasoningMarkers,
}

impl SegmenterConfig {
    pub fn with_markers(mut self, markers: ReasoningMarkers) -> Self {
        self.markers = markers;
        self
    }
}

/// Errors raised while building a [`Segmenter`].
#[derive(Debug)]
pub enum SegmenterError {
    /// One of the reasoning markers is the empty string.
    EmptyMarker,
    /// The compiled pattern was rejected, typically for exceeding the regex size limit.
    Pattern(regex::Error),
}

impl std::fmt::Display for SegmenterError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SegmenterError::EmptyMarker => write!(f, "Reasoning markers must not be empty"),
            SegmenterError::Pattern(e) => write!(f, "Invalid segmenter pattern: {}", e),
        }
    }
}

impl std::error::Error for SegmenterError {}

impl From<regex::Error> for SegmenterError {
    fn from(e: regex::Error) -> Self {
        SegmenterError::Pattern(e)
    }
}

/// Compiled matcher for reasoning blocks and code fences.
///
/// Building one compiles two regexes; keep it around and reuse it. The type is immutable
/// and `Sync`, so a single instance can serve every thread that renders replies.
#[derive(Debug, Clone)]
pub struct Segmenter {
    config: SegmenterConfig,
    reasoning: Regex,
    code: Regex,
}

/// A non-text block accepted during scanning, in byte offsets.
struct Block {
    bytes: Range<usize>,
    kind: SegmentKind,
    content: String,
}

impl Default for Segmenter {
    fn default() -> Self {
        DEFAULT_SEGMENTER.clone()
    }
}

impl Segmenter {
    pub fn new(config: SegmenterConfig) -> Result<Self, SegmenterError> {
        let markers = &config.markers;
        if markers.open.is_empty() || markers.close.is_empty() {
            return Err(SegmenterError::EmptyMarker);
        }

        let reasoning = Regex::new(&format!(
            "(?s){}(.*?){}",
            regex::escape(&markers.open),
            regex::escape(&markers.close)
        ))?;
        let code = Regex::new(&format!(r"(?is)```({})\b(.*?)```", alias_alternation()))?;

        Ok(Self {
            config,
            reasoning,
            code,
        })
    }

    pub fn config(&self) -> &SegmenterConfig {
        &self.config
    }

    /// Split `text` into ordered, non-overlapping segments covering the whole input.
    ///
    /// Never fails: markup that does not match is returned as text.
    pub fn parse(&self, text: &str) -> Vec<Segment> {
        let mut blocks: Vec<Block> = Vec::new();

        for caps in self.reasoning.captures_iter(text) {
            let (Some(whole), Some(body)) = (caps.get(0), caps.get(1)) else {
                continue;
            };
            blocks.push(Block {
                bytes: whole.range(),
                kind: SegmentKind::Reasoning,
                content: body.as_str().trim().to_string(),
            });
        }
        let reasoning_count = blocks.len();

        let mut pos = 0;
        while pos <= text.len() {
            let Some(caps) = self.code.captures_at(text, pos) else {
                break;
            };
            let (Some(whole), Some(label), Some(body)) = (caps.get(0), caps.get(1), caps.get(2))
            else {
                break;
            };
            let span = whole.range();

            if let Some(claimed) = blocks.iter().find(|b| overlaps(&b.bytes, &span)) {
                // A fence opened inside a claimed block resumes after that block; one opened
                // before it is dropped whole, closing backticks included.
                pos = if claimed.bytes.contains(&span.start) {
                    claimed.bytes.end
                } else {
                    span.end
                };
                continue;
            }

            if let Some(language) = normalize_language(label.as_str()) {
                blocks.push(Block {
                    bytes: span.clone(),
                    kind: SegmentKind::Code {
                        language: language.to_string(),
                    },
                    content: strip_fence_newlines(body.as_str()).to_string(),
                });
            }
            pos = span.end;
        }

        debug!(
            "segmented {} bytes: {} reasoning, {} code blocks",
            text.len(),
            reasoning_count,
            blocks.len() - reasoning_count
        );

        blocks.sort_by_key(|b| b.bytes.start);
        fill_gaps(text, blocks)
    }

    /// Whether `text` looks like it holds code: an indented line after a newline (four
    /// spaces or a tab), or a fence this segmenter would accept.
    ///
    /// This over-approximates; a `false` guarantees [`Segmenter::parse`] finds no code.
    pub fn has_code_snippet(&self, text: &str) -> bool {
        has_indented_line(text) || self.code.is_match(text)
    }

    /// Whether `text` contains a complete reasoning block.
    pub fn has_reasoning_block(&self, text: &str) -> bool {
        self.reasoning.is_match(text)
    }
}

/// Split `text` with the default reasoning markers. See [`Segmenter::parse`].
pub fn parse_content_blocks(text: &str) -> Vec<Segment> {
    DEFAULT_SEGMENTER.parse(text)
}

/// See [`Segmenter::has_code_snippet`].
pub fn has_code_snippet(text: &str) -> bool {
    DEFAULT_SEGMENTER.has_code_snippet(text)
}

/// Shared segmenter with the default configuration.
pub fn default_segmenter() -> &'static Segmenter {
    &DEFAULT_SEGMENTER
}

/// `[a, b)` and `[c, d)` overlap iff `max(a, c) < min(b, d)`; touching spans do not.
fn overlaps(a: &Range<usize>, b: &Range<usize>) -> bool {
    a.start.max(b.start) < a.end.min(b.end)
}

/// Drop one leading and one trailing line break, `\r\n` or `\n`.
fn strip_fence_newlines(body: &str) -> &str {
    let body = body
        .strip_prefix("\r\n")
        .or_else(|| body.strip_prefix('\n'))
        .unwrap_or(body);
    body.strip_suffix("\r\n")
        .or_else(|| body.strip_suffix('\n'))
        .unwrap_or(body)
}

fn has_indented_line(text: &str) -> bool {
    match text.find('\n') {
        Some(i) => {
            let rest = &text[i + 1..];
            rest.contains("    ") || rest.contains('\t')
        }
        None => false,
    }
}

/// Converts increasing byte offsets into character offsets without rescanning the prefix.
struct CharCursor<'a> {
    text: &'a str,
    byte: usize,
    chars: usize,
}

impl<'a> CharCursor<'a> {
    fn new(text: &'a str) -> Self {
        Self {
            text,
            byte: 0,
            chars: 0,
        }
    }

    fn advance_to(&mut self, byte: usize) -> usize {
        if byte > self.byte {
            self.chars += self.text[self.byte..byte].chars().count();
            self.byte = byte;
        }
        self.chars
    }

    fn range(&mut self, bytes: &Range<usize>) -> Range<usize> {
        let start = self.advance_to(bytes.start);
        let end = self.advance_to(bytes.end);
        start..end
    }
}

/// Interleave sorted blocks with text segments for the gaps and the tail.
fn fill_gaps(text: &str, blocks: Vec<Block>) -> Vec<Segment> {
    let mut segments = Vec::with_capacity(blocks.len() * 2 + 1);
    let mut cursor = CharCursor::new(text);
    let mut pos = 0;

    for block in blocks {
        if block.bytes.start > pos {
            let gap = pos..block.bytes.start;
            segments.push(Segment {
                kind: SegmentKind::Text,
                range: cursor.range(&gap),
                content: text[gap].to_string(),
            });
        }
        segments.push(Segment {
            kind: block.kind,
            range: cursor.range(&block.bytes),
            content: block.content,
        });
        pos = block.bytes.end;
    }

    let tail = pos..text.len();
    segments.push(Segment {
        kind: SegmentKind::Text,
        range: cursor.range(&tail),
        content: text[tail].to_string(),
    });
    segments
}
