// src/agentplay/mod.rs

pub mod config;
pub mod language;
pub mod persona;
pub mod prompt;
pub mod reasoning;
pub mod render;
pub mod segmenter;

// Let's explicitly export the segmenter entry points so callers can write
// agentplay::parse_content_blocks instead of agentplay::segmenter::parse_content_blocks
pub use segmenter::{has_code_snippet, parse_content_blocks, Segment, SegmentKind, Segmenter};
