//! Extract a JSON object from free-form model output.
//!
//! Models wrap JSON in Markdown fences or chatter around it. Parsing never
//! fails from the caller's point of view: unparseable text yields the
//! supplied fallback and a `true` flag.

use serde::de::DeserializeOwned;

/// Return the span from the first `{` to the last `}` in `text`.
///
/// Returns `None` when no such span exists.
pub fn extract_json(text: &str) -> Option<&str> {
    let start = text.find('{')?;
    let end = text.rfind('}')?;
    if end < start {
        return None;
    }
    Some(&text[start..=end])
}

/// Deserialize the JSON object in `text`, or return `fallback`.
///
/// The second element is `true` when the fallback was used.
pub fn parse_or_fallback<T: DeserializeOwned>(text: &str, fallback: T) -> (T, bool) {
    let Some(json) = extract_json(text) else {
        tracing::warn!(reply_len = text.len(), "AI reply contained no JSON object, using fallback");
        return (fallback, true);
    };
    match serde_json::from_str::<T>(json) {
        Ok(value) => (value, false),
        Err(e) => {
            tracing::warn!(error = %e, "AI reply did not match expected shape, using fallback");
            (fallback, true)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Debug, Deserialize, PartialEq)]
    struct Sample {
        name: String,
    }

    fn fallback() -> Sample {
        Sample {
            name: "fallback".into(),
        }
    }

    #[test]
    fn extracts_from_code_fence() {
        let text = "```json\n{\"name\": \"apple\"}\n```";
        assert_eq!(extract_json(text), Some("{\"name\": \"apple\"}"));
    }

    #[test]
    fn extracts_nested_object() {
        let text = "Sure! {\"a\": {\"b\": 1}} Hope that helps.";
        assert_eq!(extract_json(text), Some("{\"a\": {\"b\": 1}}"));
    }

    #[test]
    fn no_braces_is_none() {
        assert_eq!(extract_json("no json here"), None);
        assert_eq!(extract_json("} backwards {"), None);
    }

    #[test]
    fn parses_valid_reply() {
        let (value, used_fallback) = parse_or_fallback("{\"name\":\"pear\"}", fallback());
        assert_eq!(value.name, "pear");
        assert!(!used_fallback);
    }

    #[test]
    fn malformed_reply_uses_fallback() {
        let (value, used_fallback) = parse_or_fallback("{\"name\": }", fallback());
        assert_eq!(value, fallback());
        assert!(used_fallback);
    }

    #[test]
    fn wrong_shape_uses_fallback() {
        let (value, used_fallback) = parse_or_fallback("{\"title\": \"x\"}", fallback());
        assert_eq!(value.name, "fallback");
        assert!(used_fallback);
    }
}
