use agentplay::segmenter::{has_code_snippet, parse_content_blocks, Segment, SegmentKind};

fn code(language: &str) -> SegmentKind {
    SegmentKind::Code {
        language: language.to_string(),
    }
}

/// Checks ordering, non-overlap and full coverage of `text`.
fn assert_partition(text: &str, segments: &[Segment]) {
    assert!(!segments.is_empty());
    assert_eq!(segments[0].range.start, 0);
    for pair in segments.windows(2) {
        assert!(pair[0].range.start < pair[1].range.start, "{:?}", segments);
        assert_eq!(pair[0].range.end, pair[1].range.start, "{:?}", segments);
    }
    assert_eq!(segments.last().unwrap().range.end, text.chars().count());
    let covered: usize = segments.iter().map(Segment::len).sum();
    assert_eq!(covered, text.chars().count());
}

#[test]
fn test_plain_text_is_a_single_segment() {
    let segments = parse_content_blocks("hello world");
    assert_eq!(segments.len(), 1);
    assert_eq!(segments[0].kind, SegmentKind::Text);
    assert_eq!(segments[0].content, "hello world");
    assert_eq!(segments[0].range, 0..11);
}

#[test]
fn test_python_fence_between_text() {
    let text = "before\n```python\nprint(1)\n```\nafter";
    let segments = parse_content_blocks(text);

    assert_eq!(segments.len(), 3);
    assert_eq!(segments[0].kind, SegmentKind::Text);
    assert_eq!(segments[0].content, "before\n");
    assert_eq!(segments[1].kind, code("python"));
    assert_eq!(segments[1].content, "print(1)");
    assert_eq!(segments[2].kind, SegmentKind::Text);
    assert_eq!(segments[2].content, "\nafter");
    assert_partition(text, &segments);
}

#[test]
fn test_reasoning_then_text() {
    let text = "~~~Reasoning:\nthinking...\n~~~Finished reasoning\nDone.";
    let segments = parse_content_blocks(text);

    assert_eq!(segments.len(), 2);
    assert_eq!(segments[0].kind, SegmentKind::Reasoning);
    assert_eq!(segments[0].content, "thinking...");
    assert_eq!(segments[0].range, 0..47);
    assert_eq!(segments[1].kind, SegmentKind::Text);
    assert_eq!(segments[1].content, "\nDone.");
    assert_partition(text, &segments);
}

#[test]
fn test_back_to_back_fences() {
    let text = "```js\nconsole.log(1);\n```\n```sh\necho hi\n```";
    let segments = parse_content_blocks(text);

    assert_eq!(segments.len(), 4);
    assert_eq!(segments[0].kind, code("javascript"));
    assert_eq!(segments[0].content, "console.log(1);");
    assert_eq!(segments[1].kind, SegmentKind::Text);
    assert_eq!(segments[1].content, "\n");
    assert_eq!(segments[2].kind, code("bash"));
    assert_eq!(segments[2].content, "echo hi");
    assert_eq!(segments[3].kind, SegmentKind::Text);
    assert!(segments[3].content.is_empty());
    assert_partition(text, &segments);
}

#[test]
fn test_adjacent_fences_without_gap() {
    let text = "```ts\nlet a = 1;\n``````py\nb = 2\n```";
    let segments = parse_content_blocks(text);

    assert_eq!(segments.len(), 3);
    assert_eq!(segments[0].kind, code("typescript"));
    assert_eq!(segments[1].kind, code("python"));
    assert_eq!(segments[0].range.end, segments[1].range.start);
    assert_partition(text, &segments);
}

#[test]
fn test_empty_input() {
    let segments = parse_content_blocks("");
    assert_eq!(segments.len(), 1);
    assert_eq!(segments[0].kind, SegmentKind::Text);
    assert_eq!(segments[0].content, "");
    assert_eq!(segments[0].range, 0..0);
}

#[test]
fn test_language_aliases_are_normalized() {
    for (label, language) in [
        ("py", "python"),
        ("Python", "python"),
        ("js", "javascript"),
        ("ts", "typescript"),
        ("sh", "bash"),
        ("shell", "bash"),
        ("BASH", "bash"),
    ] {
        let text = format!("```{}\nx\n```", label);
        let segments = parse_content_blocks(&text);
        assert_eq!(segments[0].language(), Some(language), "label {}", label);
    }
}

#[test]
fn test_unknown_fence_stays_in_text() {
    let text = "See:\n```rust\nfn main() {}\n```\nok";
    let segments = parse_content_blocks(text);

    assert_eq!(segments.len(), 1);
    assert_eq!(segments[0].kind, SegmentKind::Text);
    assert_eq!(segments[0].content, text);
}

#[test]
fn test_unterminated_fence_stays_in_text() {
    let text = "start\n```python\nprint('never closed')";
    let segments = parse_content_blocks(text);
    assert_eq!(segments.len(), 1);
    assert_eq!(segments[0].content, text);
}

#[test]
fn test_unterminated_reasoning_stays_in_text() {
    let text = "~~~Reasoning:\nstill going";
    let segments = parse_content_blocks(text);
    assert_eq!(segments.len(), 1);
    assert!(segments[0].is_text());
}

#[test]
fn test_reasoning_wins_over_overlapping_fence() {
    let text = "~~~Reasoning:\nX ```python\ny\n~~~Finished reasoning\n```\ntail";
    let segments = parse_content_blocks(text);

    assert_eq!(segments.len(), 2);
    assert_eq!(segments[0].kind, SegmentKind::Reasoning);
    assert_eq!(segments[0].content, "X ```python\ny");
    assert_eq!(segments[1].kind, SegmentKind::Text);
    assert_eq!(segments[1].content, "\n```\ntail");
    assert_partition(text, &segments);
}

#[test]
fn test_fence_overlapping_reasoning_is_dropped_whole() {
    let text = "```py\nA ~~~Reasoning:\nR~~~Finished reasoning ```sh\nB\n```";
    let segments = parse_content_blocks(text);

    assert_eq!(segments.len(), 3);
    assert_eq!(segments[0].kind, SegmentKind::Text);
    assert_eq!(segments[0].range, 0..8);
    assert_eq!(segments[1].kind, SegmentKind::Reasoning);
    assert_eq!(segments[1].range, 8..44);
    assert_eq!(segments[1].content, "R");
    assert_eq!(segments[2].kind, SegmentKind::Text);
    assert_eq!(segments[2].content, " ```sh\nB\n```");
    assert!(segments.iter().all(|s| !s.is_code()));
    assert_partition(text, &segments);
}

#[test]
fn test_crlf_fence_body_is_trimmed() {
    let text = "Run:\r\n```py\r\nx = 1\r\n```\r\n";
    let segments = parse_content_blocks(text);

    assert_eq!(segments.len(), 3);
    assert_eq!(segments[1].kind, code("python"));
    assert_eq!(segments[1].content, "x = 1");
    assert_eq!(segments[2].content, "\r\n");
    assert_partition(text, &segments);
}

#[test]
fn test_fence_inside_reasoning_is_not_extracted() {
    let text = "~~~Reasoning:\n```py\nx = 1\n```\n~~~Finished reasoning\nanswer";
    let segments = parse_content_blocks(text);

    assert_eq!(segments.len(), 2);
    assert!(segments[0].is_reasoning());
    assert_eq!(segments[0].content, "```py\nx = 1\n```");
    assert!(segments.iter().all(|s| !s.is_code()));
}

#[test]
fn test_multiple_reasoning_blocks_are_non_greedy() {
    let text = "~~~Reasoning:\na\n~~~Finished reasoning\nmid\n~~~Reasoning:\nb\n~~~Finished reasoning";
    let segments = parse_content_blocks(text);

    let kinds: Vec<_> = segments.iter().map(|s| s.kind.clone()).collect();
    assert_eq!(
        kinds,
        vec![
            SegmentKind::Reasoning,
            SegmentKind::Text,
            SegmentKind::Reasoning,
            SegmentKind::Text
        ]
    );
    assert_eq!(segments[0].content, "a");
    assert_eq!(segments[1].content, "\nmid\n");
    assert_eq!(segments[2].content, "b");
    assert_partition(text, &segments);
}

#[test]
fn test_code_keeps_inner_blank_lines() {
    let text = "```py\n\nx = 1\n\n```";
    let segments = parse_content_blocks(text);
    assert_eq!(segments[0].content, "\nx = 1\n");
}

#[test]
fn test_segments_serialize_to_json() {
    let segments = parse_content_blocks("a\n```sh\nls\n```");
    let json = serde_json::to_value(&segments).unwrap();

    assert_eq!(json[0]["kind"]["type"], "text");
    assert_eq!(json[1]["kind"]["type"], "code");
    assert_eq!(json[1]["kind"]["language"], "bash");
    assert_eq!(json[1]["range"]["start"], 2);

    let back: Vec<Segment> = serde_json::from_value(json).unwrap();
    assert_eq!(back, segments);
}

#[test]
fn test_has_code_snippet() {
    assert!(has_code_snippet("```py\nx\n```"));
    assert!(has_code_snippet("intro\n    indented line"));
    assert!(has_code_snippet("intro\n\tindented"));
    assert!(!has_code_snippet("hello world"));
    assert!(!has_code_snippet("```rust\nfn x() {}\n```"));
}

mod properties {
    use super::*;
    use proptest::prelude::*;

    /// Fragments that exercise fences, markers and multi-byte characters.
    fn fragment() -> impl Strategy<Value = String> {
        prop_oneof![
            "[a-z \n]{0,8}",
            Just("```".to_string()),
            Just("```py\n".to_string()),
            Just("```js".to_string()),
            Just("```rust\n".to_string()),
            Just("~~~Reasoning:".to_string()),
            Just("~~~Finished reasoning".to_string()),
            Just("\n    ".to_string()),
            Just("é✓π".to_string()),
        ]
    }

    fn reply() -> impl Strategy<Value = String> {
        prop::collection::vec(fragment(), 0..12).prop_map(|parts| parts.concat())
    }

    proptest! {
        #[test]
        fn segments_partition_the_input(text in reply()) {
            let segments = parse_content_blocks(&text);
            prop_assert!(!segments.is_empty());
            prop_assert_eq!(segments[0].range.start, 0);
            for pair in segments.windows(2) {
                prop_assert!(pair[0].range.start < pair[1].range.start);
                prop_assert!(pair[0].range.end <= pair[1].range.start);
                prop_assert_eq!(pair[0].range.end, pair[1].range.start);
            }
            let covered: usize = segments.iter().map(Segment::len).sum();
            prop_assert_eq!(covered, text.chars().count());
        }

        #[test]
        fn text_segments_are_raw_slices(text in reply()) {
            let chars: Vec<char> = text.chars().collect();
            for segment in parse_content_blocks(&text).iter().filter(|s| s.is_text()) {
                let slice: String = chars[segment.range.clone()].iter().collect();
                prop_assert_eq!(&slice, &segment.content);
            }
        }

        #[test]
        fn plain_text_is_returned_whole(text in "[a-zA-Z0-9 .,!?\n]{0,64}") {
            let segments = parse_content_blocks(&text);
            prop_assert_eq!(segments.len(), 1);
            prop_assert_eq!(&segments[0].content, &text);
            prop_assert_eq!(segments[0].range.clone(), 0..text.chars().count());
        }

        #[test]
        fn no_code_snippet_means_no_code_segments(text in reply()) {
            if !has_code_snippet(&text) {
                prop_assert!(parse_content_blocks(&text).iter().all(|s| !s.is_code()));
            }
        }
    }
}
