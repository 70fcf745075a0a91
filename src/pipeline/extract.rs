//! Reply extraction: isolate the JSON object inside a chatty model reply.
//!
//! Models asked for "JSON only" still tend to wrap it in a fenced code block,
//! prefix it with "Here are your questions:", or append a closing remark. This
//! stage peels those layers off with two cheap, deterministic steps:
//!
//! 1. Remove every code-fence delimiter, with or without a language tag.
//! 2. Take the span from the first `{` to the last `}` inclusive.
//!
//! When no such span exists the trimmed text is returned as-is and the JSON
//! parser downstream reports the failure. No further guessing happens here.

use once_cell::sync::Lazy;
use regex::Regex;

static RE_FENCE: Lazy<Regex> = Lazy::new(|| Regex::new(r"```[A-Za-z0-9_+-]*").unwrap());

/// Best-effort extraction of a JSON object from `raw`.
pub fn extract_json_payload(raw: &str) -> String {
    let unfenced = strip_code_fences(raw);
    let trimmed = unfenced.trim();

    match (trimmed.find('{'), trimmed.rfind('}')) {
        (Some(open), Some(close)) if close > open => trimmed[open..=close].to_string(),
        _ => trimmed.to_string(),
    }
}

fn strip_code_fences(input: &str) -> String {
    RE_FENCE.replace_all(input, "").into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_preamble_and_json_fence() {
        let raw = "Here is the answer:\n```json\n{\"questions\":[]}\n```";
        assert_eq!(extract_json_payload(raw), "{\"questions\":[]}");
    }

    #[test]
    fn strips_bare_fence() {
        let raw = "```\n{\"questions\": [1]}\n```\n";
        assert_eq!(extract_json_payload(raw), "{\"questions\": [1]}");
    }

    #[test]
    fn keeps_plain_json_untouched() {
        let raw = "  {\"questions\":[{\"marks\":2}]}  ";
        assert_eq!(extract_json_payload(raw), "{\"questions\":[{\"marks\":2}]}");
    }

    #[test]
    fn drops_postamble() {
        let raw = "{\"a\":{\"b\":1}}\n\nLet me know if you need more!";
        assert_eq!(extract_json_payload(raw), "{\"a\":{\"b\":1}}");
    }

    #[test]
    fn no_braces_returns_trimmed_text() {
        assert_eq!(extract_json_payload("  sorry, I can't  "), "sorry, I can't");
    }

    #[test]
    fn close_before_open_returns_trimmed_text() {
        assert_eq!(extract_json_payload(" } oops { "), "} oops {");
    }

    #[test]
    fn fence_inside_answer_text_is_removed_too() {
        let raw = "```json\n{\"q\": \"use ```rust code\"}\n```";
        assert_eq!(extract_json_payload(raw), "{\"q\": \"use  code\"}");
    }
}
