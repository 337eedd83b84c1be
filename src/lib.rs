//! # agentplay
//!
//! agentplay collects the pieces a terminal playground for multi-agent LLM conversations
//! needs around an external orchestration framework: typed agent personas, model
//! configuration, and, at its core, a segmenter that turns raw agent replies into
//! renderable blocks.
//!
//! The crate provides:
//!
//! * **Reply segmentation**: [`segmenter::parse_content_blocks`] splits a reply into an
//!   ordered, exhaustive list of text, code and reasoning [`Segment`]s
//! * **Rendering hooks**: [`render::ReplyRenderer`] forwards segmented replies to an
//!   [`render::InteractionSink`] supplied by the host application
//! * **Reasoning markers**: [`reasoning::ReasoningMarkers`] folds a reasoning model's
//!   chain of thought into the reply so the segmenter can box it later
//! * **Personas**: [`persona::PersonaRegistry`] builds agent configurations by name
//! * **Model configuration**: [`config::ModelCatalog`] and [`config::LlmConfig`]
//!
//! Running the conversation itself (turn-taking, group chat, tool calls, API clients) is
//! left to the orchestration framework the personas are handed to.
//!
//! ## Segmenting a reply
//!
//! ```rust
//! use agentplay::{parse_content_blocks, SegmentKind};
//!
//! let reply = "~~~Reasoning:\nthinking...\n~~~Finished reasoning\nDone.";
//! let segments = parse_content_blocks(reply);
//!
//! assert_eq!(segments.len(), 2);
//! assert_eq!(segments[0].kind, SegmentKind::Reasoning);
//! assert_eq!(segments[0].content, "thinking...");
//! assert_eq!(segments[1].content, "\nDone.");
//! ```
//!
//! ## Rendering through a sink
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use async_trait::async_trait;
//! use agentplay::render::{InteractionSink, RenderBlock, ReplyRenderer, SinkError};
//!
//! struct Stdout;
//!
//! #[async_trait]
//! impl InteractionSink for Stdout {
//!     async fn print(&self, block: &RenderBlock) {
//!         match block {
//!             RenderBlock::Plain(text) => print!("{}", text),
//!             RenderBlock::Highlighted { language, code } => println!("[{}]\n{}", language, code),
//!             RenderBlock::Panel { title, body } => println!("== {} ==\n{}", title, body),
//!         }
//!     }
//!
//!     async fn input(&self, _prompt: &str) -> Result<String, SinkError> {
//!         Err(SinkError::InputClosed)
//!     }
//! }
//!
//! #[tokio::main]
//! async fn main() {
//!     agentplay::init_logger();
//!     let renderer = ReplyRenderer::new(Arc::new(Stdout));
//!     renderer.render("Try:\n```py\nprint('hi')\n```").await;
//! }
//! ```
//!
//! ## Building personas
//!
//! ```rust
//! use agentplay::config::ModelCatalog;
//! use agentplay::persona::PersonaRegistry;
//!
//! let catalog = ModelCatalog::from_env();
//! catalog.warn_missing_api_keys();
//!
//! let registry = PersonaRegistry::with_builtins();
//! let coder = registry.create("codellama_coder", &catalog).unwrap();
//! assert_eq!(coder.llm.config_list[0].model, "ollama/codellama");
//! ```

use std::sync::Once;

static INIT_LOGGER: Once = Once::new();

/// Initialise the global [`env_logger`] subscriber exactly once.
///
/// Applications embedding agentplay can opt in to `RUST_LOG` driven diagnostics without
/// choosing a logging backend upfront.
///
/// ```rust
/// agentplay::init_logger();
/// log::info!("Logger is ready");
/// ```
pub fn init_logger() {
    INIT_LOGGER.call_once(|| {
        env_logger::init();
    });
}

// Import the top-level `agentplay` module.
pub mod agentplay;

// Re-exporting key items for easier external access.
pub use agentplay::config;
pub use agentplay::config::{LlmConfig, ModelCatalog, ModelEntry};
pub use agentplay::language;
pub use agentplay::persona;
pub use agentplay::persona::{Persona, PersonaRegistry};
pub use agentplay::prompt;
pub use agentplay::reasoning;
pub use agentplay::reasoning::ReasoningMarkers;
pub use agentplay::render;
pub use agentplay::render::{InteractionSink, RenderBlock, ReplyRenderer};
pub use agentplay::segmenter;
pub use agentplay::segmenter::{
    has_code_snippet, parse_content_blocks, Segment, SegmentKind, Segmenter, SegmenterConfig,
};
