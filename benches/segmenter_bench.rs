//! Benchmark to measure the cost of segmenting agent replies.
//!
//! Compares a full parse against the `has_code_snippet` shortcut the renderer takes for
//! replies without markup, and shows both are negligible next to an LLM round-trip.
//!
//! Run with: cargo bench --bench segmenter_bench

use std::time::Instant;

use agentplay::segmenter::{has_code_snippet, parse_content_blocks};

fn mixed_reply(i: usize) -> String {
    format!(
        "~~~Reasoning:\nThe user wants a helper, variant {i}. Keep it short.\n~~~Finished reasoning\n\n\
         Here is the helper:\n```python\ndef helper_{i}(xs):\n    return [x * 2 for x in xs]\n```\n\
         And the shell command to run it:\n```sh\npython -c 'import helper; print(helper.helper_{i}([1, 2]))'\n```\n\
         Let me know if you need a TypeScript version.",
    )
}

fn plain_reply(i: usize) -> String {
    format!(
        "Reply {i} - a conversational answer without any code, the kind of message most agents send \
         when they are discussing a plan, asking a clarifying question or summarising a result."
    )
}

fn main() {
    let mixed: Vec<String> = (0..20).map(mixed_reply).collect();
    let plain: Vec<String> = (0..20).map(plain_reply).collect();

    println!("Segmenter Benchmark");
    println!("===================\n");
    println!(
        "Mixed replies: {} ({} bytes)",
        mixed.len(),
        mixed.iter().map(String::len).sum::<usize>()
    );
    println!(
        "Plain replies: {} ({} bytes)\n",
        plain.len(),
        plain.iter().map(String::len).sum::<usize>()
    );

    let iterations = 10_000;

    let start = Instant::now();
    let mut segments = 0;
    for _ in 0..iterations {
        for reply in &mixed {
            segments += parse_content_blocks(reply).len();
        }
    }
    let mixed_duration = start.elapsed();

    println!("Full parse of mixed replies:");
    println!("  {} iterations, {} segments", iterations, segments);
    println!("  Total time: {:?}", mixed_duration);
    println!(
        "  Per reply: {:.2}µs",
        mixed_duration.as_micros() as f64 / (iterations * mixed.len()) as f64
    );

    let start = Instant::now();
    let mut flagged = 0;
    for _ in 0..iterations {
        for reply in &plain {
            if has_code_snippet(reply) {
                flagged += 1;
            }
        }
    }
    let shortcut_duration = start.elapsed();

    println!("\nShortcut check on plain replies:");
    println!("  {} iterations, {} flagged", iterations, flagged);
    println!("  Total time: {:?}", shortcut_duration);
    println!(
        "  Per reply: {:.2}µs",
        shortcut_duration.as_micros() as f64 / (iterations * plain.len()) as f64
    );

    println!("\n\nContext:");
    println!("========");
    println!("LLM processing: ~1,000,000µs+ (1+ seconds)");
    println!(
        "Segmentation as % of a reply: {:.4}%",
        (mixed_duration.as_micros() as f64 / (iterations * mixed.len()) as f64) / 1_000_000.0
            * 100.0
    );
}
