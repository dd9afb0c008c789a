//! Body sniffing and re-serialization.
//!
//! Bodies on both legs are classified by their declared content type:
//! anything mentioning `application/json` is parsed as JSON, everything
//! else is kept as text.

use serde_json::Value;

const JSON_MEDIA_TYPE: &str = "application/json";

/// Returns true when the content type declares a JSON body.
pub fn declares_json(content_type: Option<&str>) -> bool {
    content_type.is_some_and(|ct| ct.contains(JSON_MEDIA_TYPE))
}

/// Truthiness of a parsed JSON value: `null`, `false`, zero and `""` are falsy.
pub fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|n| n != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

/// A body classified by its declared content type.
#[derive(Debug, Clone, PartialEq)]
pub enum Payload {
    Json(Value),
    Text(String),
}

impl Payload {
    /// Classify an inbound body. A declared-JSON body that does not parse is an error.
    pub fn parse_strict(content_type: Option<&str>, bytes: &[u8]) -> Result<Self, serde_json::Error> {
        if declares_json(content_type) {
            serde_json::from_slice(bytes).map(Payload::Json)
        } else {
            Ok(Payload::Text(decode_text(bytes)))
        }
    }

    /// Classify an upstream body. A declared-JSON body that does not parse falls back to text.
    pub fn parse_lenient(content_type: Option<&str>, bytes: &[u8]) -> Self {
        match Self::parse_strict(content_type, bytes) {
            Ok(payload) => payload,
            Err(e) => {
                tracing::warn!(error = %e, "Declared JSON body did not parse, passing through as text");
                Payload::Text(decode_text(bytes))
            }
        }
    }

    /// True when the payload carries nothing worth sending: empty text or a falsy JSON value.
    pub fn is_falsy(&self) -> bool {
        match self {
            Payload::Json(value) => !is_truthy(value),
            Payload::Text(text) => text.is_empty(),
        }
    }

    /// JSON text of this payload. Text payloads become JSON strings.
    pub fn to_json_text(&self) -> String {
        match self {
            Payload::Json(value) => value.to_string(),
            Payload::Text(text) => Value::String(text.clone()).to_string(),
        }
    }

    /// Body text for the client: text and JSON strings verbatim, other JSON re-serialized.
    pub fn into_body_text(self) -> String {
        match self {
            Payload::Json(Value::String(text)) => text,
            Payload::Json(value) => value.to_string(),
            Payload::Text(text) => text,
        }
    }
}

fn decode_text(bytes: &[u8]) -> String {
    String::from_utf8_lossy(bytes).into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn json_detection_is_substring_match() {
        assert!(declares_json(Some("application/json")));
        assert!(declares_json(Some("application/json; charset=utf-8")));
        assert!(!declares_json(Some("text/plain")));
        assert!(!declares_json(None));
    }

    #[test]
    fn strict_parse_rejects_malformed_json() {
        let err = Payload::parse_strict(Some("application/json"), b"{bad").unwrap_err();
        let expected = serde_json::from_str::<Value>("{bad").unwrap_err();
        assert_eq!(err.to_string(), expected.to_string());
    }

    #[test]
    fn strict_parse_keeps_non_json_as_text() {
        let payload = Payload::parse_strict(Some("text/plain"), b"{bad").unwrap();
        assert_eq!(payload, Payload::Text("{bad".into()));
    }

    #[test]
    fn lenient_parse_falls_back_to_text() {
        let payload = Payload::parse_lenient(Some("application/json"), b"<html>oops</html>");
        assert_eq!(payload, Payload::Text("<html>oops</html>".into()));
    }

    #[test]
    fn json_text_of_text_payload_is_quoted() {
        assert_eq!(Payload::Text("hi \"there\"".into()).to_json_text(), r#""hi \"there\"""#);
        assert_eq!(Payload::Json(json!({"u": "a"})).to_json_text(), r#"{"u":"a"}"#);
    }

    #[test]
    fn reserialization_keeps_key_order() {
        let payload = Payload::parse_strict(Some("application/json"), br#"{ "z": 1, "a": [true, null] }"#).unwrap();
        assert_eq!(payload.into_body_text(), r#"{"z":1,"a":[true,null]}"#);
    }

    #[test]
    fn falsy_payloads() {
        assert!(Payload::Text(String::new()).is_falsy());
        assert!(!Payload::Text(" ".into()).is_falsy());
        for value in [json!(null), json!(false), json!(0), json!(0.0), json!(-0.0), json!("")] {
            assert!(Payload::Json(value.clone()).is_falsy(), "{value}");
        }
        for value in [json!(true), json!(1), json!(-0.5), json!("0"), json!([]), json!({})] {
            assert!(!Payload::Json(value.clone()).is_falsy(), "{value}");
        }
    }

    #[test]
    fn json_string_reaches_client_unquoted() {
        let payload = Payload::parse_strict(Some("application/json"), br#""hello""#).unwrap();
        assert_eq!(payload.into_body_text(), "hello");
    }
}
