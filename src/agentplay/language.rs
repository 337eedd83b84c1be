//! Fence label aliases.
//!
//! Only the labels listed here turn a fenced block into a code segment. Anything else
//! (` ```rust `, ` ```text `, a bare ` ``` `) is left alone and renders as plain text.

/// Every fence label the segmenter recognises, longest spelling first so that a
/// regex alternation built from this list prefers `javascript` over `js`.
pub const KNOWN_ALIASES: &[&str] = &[
    "javascript",
    "typescript",
    "python",
    "shell",
    "bash",
    "js",
    "ts",
    "py",
    "sh",
];

/// Map a fence label to its canonical language name.
///
/// Matching is case-insensitive. Returns `None` for labels outside the alias table.
///
/// ```rust
/// use agentplay::language::normalize_language;
///
/// assert_eq!(normalize_language("py"), Some("python"));
/// assert_eq!(normalize_language("Shell"), Some("bash"));
/// assert_eq!(normalize_language("rust"), None);
/// ```
pub fn normalize_language(label: &str) -> Option<&'static str> {
    match label.to_ascii_lowercase().as_str() {
        "javascript" | "js" => Some("javascript"),
        "typescript" | "ts" => Some("typescript"),
        "python" | "py" => Some("python"),
        "bash" | "sh" | "shell" => Some("bash"),
        _ => None,
    }
}

/// Regex alternation group matching any known alias, e.g. `(?:javascript|typescript|...)`.
pub(crate) fn alias_alternation() -> String {
    format!("(?:{})", KNOWN_ALIASES.join("|"))
}
