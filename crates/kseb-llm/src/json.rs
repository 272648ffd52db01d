//! Helpers for prompts that ask the model for JSON.

use serde::de::DeserializeOwned;

/// Remove markdown code fences (```` ```json ```` / ```` ``` ````) around a reply.
pub fn strip_code_fences(reply: &str) -> String {
    reply
        .trim()
        .replace("```json", "")
        .replace("```", "")
        .trim()
        .to_string()
}

/// Parse a model reply as JSON after stripping code fences.
pub fn parse_json_reply<T: DeserializeOwned>(reply: &str) -> Result<T, serde_json::Error> {
    serde_json::from_str(&strip_code_fences(reply))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::Value;

    #[test]
    fn test_strip_fences() {
        assert_eq!(strip_code_fences("```json\n{\"a\":1}\n```"), "{\"a\":1}");
        assert_eq!(strip_code_fences("  {\"a\":1} "), "{\"a\":1}");
    }

    #[test]
    fn test_parse_reply() {
        let value: Value = parse_json_reply("```\n{\"title\": \"x\"}\n```").unwrap();
        assert_eq!(value["title"], "x");
        assert!(parse_json_reply::<Value>("not json").is_err());
    }
}
