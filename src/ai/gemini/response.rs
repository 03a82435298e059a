use crate::{Error, Result};
use serde_json::Value;

const EMPTY_RESPONSE: &str = "empty or incomplete response from the model";

/// Pull the answer text out of a parsed `generateContent` body.
///
/// Reads `candidates[0].content.parts[0].text`. When that is missing or
/// empty, the remote `error.message` is surfaced if present, otherwise a
/// generic message. Each level is looked up on its own, so a null or
/// wrongly typed level is absent rather than an error.
pub fn extract_answer(body: &Value) -> Result<String> {
    let first = body
        .get("candidates")
        .and_then(Value::as_array)
        .and_then(|candidates| candidates.first());

    if let Some(reason) = first
        .and_then(|c| c.get("finishReason"))
        .and_then(Value::as_str)
    {
        tracing::debug!("Gemini finish reason: {}", reason);
    }

    let text = first
        .and_then(|c| c.get("content"))
        .and_then(|content| content.get("parts"))
        .and_then(Value::as_array)
        .and_then(|parts| parts.first())
        .and_then(|part| part.get("text"))
        .and_then(Value::as_str)
        .filter(|text| !text.is_empty());

    if let Some(text) = text {
        return Ok(text.to_string());
    }

    let message = body
        .get("error")
        .and_then(|e| e.get("message"))
        .and_then(Value::as_str)
        .unwrap_or(EMPTY_RESPONSE);
    Err(Error::MalformedResponse(message.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_extracts_first_text_part() {
        let body = json!({"candidates":[{"content":{"parts":[{"text":"Hello"}]}}]});
        assert_eq!(extract_answer(&body).unwrap(), "Hello");
    }

    #[test]
    fn test_empty_candidates_is_generic_failure() {
        let err = extract_answer(&json!({"candidates": []})).unwrap_err();
        assert!(matches!(err, Error::MalformedResponse(_)));
        assert!(err.to_string().contains("empty or incomplete"));
    }

    #[test]
    fn test_missing_candidates_key_is_generic_failure() {
        let err = extract_answer(&json!({})).unwrap_err();
        assert!(err.to_string().contains("empty or incomplete"));
    }

    #[test]
    fn test_remote_error_message_is_surfaced() {
        let err = extract_answer(&json!({"error": {"message": "quota exceeded"}})).unwrap_err();
        assert!(matches!(err, Error::MalformedResponse(_)));
        assert!(err.to_string().contains("quota exceeded"));
    }

    #[test]
    fn test_missing_intermediate_levels_are_absent() {
        for body in [
            json!({"candidates": [{}]}),
            json!({"candidates": [{"content": {}}]}),
            json!({"candidates": [{"content": {"parts": []}}]}),
            json!({"candidates": [{"content": {"parts": [{}]}}]}),
            json!({"candidates": [{"content": null}]}),
        ] {
            let err = extract_answer(&body).unwrap_err();
            assert!(err.to_string().contains("empty or incomplete"), "{}", body);
        }
    }

    #[test]
    fn test_empty_text_is_treated_as_absent() {
        let body = json!({
            "candidates": [{"content": {"parts": [{"text": ""}]}}],
            "error": {"message": "blocked"}
        });
        let err = extract_answer(&body).unwrap_err();
        assert!(err.to_string().contains("blocked"));
    }

    #[test]
    fn test_unexpected_shape_does_not_panic() {
        let err = extract_answer(&json!({"candidates": "nope"})).unwrap_err();
        assert!(matches!(err, Error::MalformedResponse(_)));
        let err = extract_answer(&json!([1, 2, 3])).unwrap_err();
        assert!(matches!(err, Error::MalformedResponse(_)));
    }

    #[test]
    fn test_null_levels_keep_remote_error_message() {
        for body in [
            json!({"candidates": null, "error": {"message": "quota exceeded"}}),
            json!({
                "candidates": [{"content": {"parts": null}}],
                "error": {"message": "quota exceeded"}
            }),
            json!({"candidates": 7, "error": {"message": "quota exceeded"}}),
        ] {
            let err = extract_answer(&body).unwrap_err();
            assert!(err.to_string().contains("quota exceeded"), "{}", body);
        }
    }

    #[test]
    fn test_non_string_error_message_is_generic_failure() {
        let err = extract_answer(&json!({"error": {"message": 42}})).unwrap_err();
        assert!(err.to_string().contains("empty or incomplete"));
    }

    #[test]
    fn test_safety_stop_without_text_is_generic_failure() {
        let body = json!({"candidates": [{"finishReason": "SAFETY"}]});
        let err = extract_answer(&body).unwrap_err();
        assert!(err.to_string().contains("empty or incomplete"));
    }
}
