use std::io::{self, IsTerminal, Read, Write};
use std::sync::Arc;

use async_trait::async_trait;

use agentplay::config::{load_env, ModelCatalog};
use agentplay::persona::PersonaRegistry;
use agentplay::reasoning::ReasoningMarkers;
use agentplay::render::{InteractionSink, RenderBlock, ReplyRenderer, SinkError};

// Run from the root folder of the repo as follows:
// echo 'Try:\n```py\nprint(1)\n```' | RUST_LOG=debug cargo run --example render_reply
// Without piped input a canned reply from a reasoning model is rendered.

struct TerminalSink;

impl TerminalSink {
    fn write_block(block: &RenderBlock) -> io::Result<()> {
        let mut out = io::stdout().lock();
        match block {
            RenderBlock::Plain(text) => write!(out, "{}", text)?,
            RenderBlock::Highlighted { language, code } => {
                writeln!(out, "\n\x1b[36m── {} ──\x1b[0m\n{}\n\x1b[36m────\x1b[0m", language, code)?
            }
            RenderBlock::Panel { title, body } => {
                writeln!(out, "\x1b[33m┌ {}\x1b[0m", title)?;
                for line in body.lines() {
                    writeln!(out, "\x1b[33m│\x1b[0m {}", line)?;
                }
                writeln!(out, "\x1b[33m└\x1b[0m")?;
            }
        }
        out.flush()
    }
}

#[async_trait]
impl InteractionSink for TerminalSink {
    async fn print(&self, block: &RenderBlock) {
        if let Err(e) = Self::write_block(block) {
            log::error!("Failed to write block to stdout: {}", e);
        }
    }

    async fn input(&self, prompt: &str) -> Result<String, SinkError> {
        println!("{}", prompt);
        let mut line = String::new();
        let read = io::stdin().read_line(&mut line)?;
        if read == 0 {
            return Err(SinkError::InputClosed);
        }
        Ok(line)
    }
}

fn canned_reply() -> String {
    ReasoningMarkers::default().format_reply(
        Some("The user wants to list files. A one-liner is enough.\n"),
        "Use `ls`:\n```sh\nls -la\n```\nOr from Python:\n```py\nimport os\nprint(os.listdir('.'))\n```\n",
    )
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    agentplay::init_logger();
    load_env(None)?;

    let catalog = ModelCatalog::from_env();
    catalog.warn_missing_api_keys();
    let registry = PersonaRegistry::with_builtins();
    println!("Available personas: {}\n", registry.names().join(", "));

    let mut piped = String::new();
    if !io::stdin().is_terminal() {
        io::stdin().read_to_string(&mut piped)?;
    }
    let reply = if piped.trim().is_empty() {
        canned_reply()
    } else {
        piped.replace("\\n", "\n")
    };

    let renderer = ReplyRenderer::new(Arc::new(TerminalSink));
    let blocks = renderer.render(&reply).await;
    println!("\n({} blocks)", blocks);
    Ok(())
}
