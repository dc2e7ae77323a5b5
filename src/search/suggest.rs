//! # Suggestion payloads
//!
//! The suggestion service is an undocumented third-party endpoint, so the
//! parser accepts the shapes it has been seen to produce and ignores every
//! field it does not use:
//!
//! ```text
//! {"q":"rust","p":false,"s":["rust 教程","rustdesk"]}       JSON object
//! ["rust",["rust 教程","rustdesk"]]                         OpenSearch array
//! window.baidu.sug({q:"rust",p:false,s:["rust 教程"]});     JSONP, bare keys
//! ```
//!
//! Anything else yields an empty list.

use serde_json::Value;

/// Upper bound on the number of suggestions kept from one response.
pub const MAX_SUGGESTIONS: usize = 6;

/// Extract up to [`MAX_SUGGESTIONS`] non-blank suggestions from `body`.
pub fn parse_suggestions(body: &str) -> Vec<String> {
    let body = body.trim();
    let inner = unwrap_jsonp(body).unwrap_or(body);

    let items = match serde_json::from_str::<Value>(inner) {
        Ok(value) => from_value(&value),
        Err(_) => bare_key_array(inner, "s"),
    };

    items
        .into_iter()
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .take(MAX_SUGGESTIONS)
        .collect()
}

/// Strip a `callback( ... );` wrapper.
fn unwrap_jsonp(body: &str) -> Option<&str> {
    if body.starts_with('{') || body.starts_with('[') {
        return None;
    }
    let open = body.find('(')?;
    let close = body.rfind(')')?;
    (open < close).then(|| body[open + 1..close].trim())
}

fn from_value(value: &Value) -> Vec<String> {
    match value {
        Value::Object(map) => map.get("s").map(strings).unwrap_or_default(),
        Value::Array(items) => items.get(1).map(strings).unwrap_or_default(),
        _ => Vec::new(),
    }
}

fn strings(value: &Value) -> Vec<String> {
    value
        .as_array()
        .map(|items| {
            items
                .iter()
                .filter_map(Value::as_str)
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default()
}

/// Find `key:[...]` in a JavaScript object literal and parse the array.
fn bare_key_array(source: &str, key: &str) -> Vec<String> {
    let candidates = [format!("{key}:["), format!("\"{key}\":[")];
    for needle in &candidates {
        let mut from = 0;
        while let Some(pos) = source[from..].find(needle.as_str()) {
            let at = from + pos;
            // A preceding identifier character means we matched the tail of
            // a longer key.
            let boundary = source[..at]
                .chars()
                .next_back()
                .is_none_or(|c| !(c.is_alphanumeric() || c == '_'));
            let start = at + needle.len() - 1;
            if boundary {
                if let Some(end) = matching_bracket(&source[start..]) {
                    let array = &source[start..start + end + 1];
                    if let Ok(items) = serde_json::from_str::<Vec<String>>(array) {
                        return items;
                    }
                }
            }
            from = start;
        }
    }
    Vec::new()
}

/// Byte offset of the `]` closing the `[` at the start of `source`.
fn matching_bracket(source: &str) -> Option<usize> {
    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;
    for (i, c) in source.char_indices() {
        if in_string {
            match c {
                _ if escaped => escaped = false,
                '\\' => escaped = true,
                '"' => in_string = false,
                _ => {}
            }
            continue;
        }
        match c {
            '"' => in_string = true,
            '[' => depth += 1,
            ']' => {
                depth = depth.checked_sub(1)?;
                if depth == 0 {
                    return Some(i);
                }
            }
            _ => {}
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_json_object() {
        let body = r#"{"q":"rust","p":false,"s":["rust 教程","rustdesk"]}"#;
        assert_eq!(parse_suggestions(body), vec!["rust 教程", "rustdesk"]);
    }

    #[test]
    fn test_opensearch_array() {
        let body = r#"["rust",["rust book","rust lang"]]"#;
        assert_eq!(parse_suggestions(body), vec!["rust book", "rust lang"]);
    }

    #[test]
    fn test_jsonp_with_bare_keys() {
        let body = r#"window.baidu.sug({q:"知",p:false,s:["知乎","知网","知行合一"]});"#;
        assert_eq!(parse_suggestions(body), vec!["知乎", "知网", "知行合一"]);
    }

    #[test]
    fn test_jsonp_with_quoted_keys() {
        let body = r#"cb_123({"q":"a","s":["ab","ac"]})"#;
        assert_eq!(parse_suggestions(body), vec!["ab", "ac"]);
    }

    #[test]
    fn test_truncates_to_six() {
        let body = r#"{"s":["1","2","3","4","5","6","7","8"]}"#;
        assert_eq!(parse_suggestions(body).len(), MAX_SUGGESTIONS);
    }

    #[test]
    fn test_brackets_inside_strings() {
        let body = r#"sug({q:"x",s:["a]b","c[d"]})"#;
        assert_eq!(parse_suggestions(body), vec!["a]b", "c[d"]);
    }

    #[test]
    fn test_key_boundary() {
        let body = r#"sug({ids:["nope"],s:["yes"]})"#;
        assert_eq!(parse_suggestions(body), vec!["yes"]);
    }

    #[test]
    fn test_drops_blank_and_non_string_entries() {
        let body = r#"{"s":["  ", 3, null, "ok"]}"#;
        assert_eq!(parse_suggestions(body), vec!["ok"]);
    }

    #[test]
    fn test_malformed_payloads_yield_nothing() {
        assert!(parse_suggestions("").is_empty());
        assert!(parse_suggestions("<html>oops</html>").is_empty());
        assert!(parse_suggestions(r#"{"s":"not an array"}"#).is_empty());
        assert!(parse_suggestions(r#"sug({q:"x",s:[unterminated"#).is_empty());
        assert!(parse_suggestions("null").is_empty());
    }
}
