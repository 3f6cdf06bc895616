use std::sync::OnceLock;

use regex::{Captures, Regex};

fn line_endings() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\r\n|\r").expect("valid line-ending pattern"))
}

fn excess_newlines() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\n{3,}").expect("valid newline pattern"))
}

fn whitespace_runs() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\s{2,}").expect("valid whitespace pattern"))
}

/// Canonicalizes whitespace in extracted document text.
///
/// - `\r\n` and `\r` become `\n`
/// - three or more consecutive newlines become a paragraph break (`\n\n`)
/// - any other run of 2+ whitespace characters becomes a single space,
///   unless the run carries a paragraph break, which is kept as `\n\n`
/// - leading/trailing whitespace is trimmed
///
/// Total and idempotent: `normalize(&normalize(x)) == normalize(x)`.
pub fn normalize(text: &str) -> String {
    let text = line_endings().replace_all(text, "\n");
    let text = excess_newlines().replace_all(&text, "\n\n");
    let text = whitespace_runs().replace_all(&text, |caps: &Captures| {
        let run = &caps[0];
        if run.matches('\n').count() >= 2 {
            "\n\n"
        } else {
            " "
        }
    });
    text.trim().to_string()
}
