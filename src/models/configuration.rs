//! Uploader configuration intake.
//!
//! Values arrive as query-string pairs, each one a JSON document. Parsing is
//! all-or-nothing: a single bad value discards everything parsed so far.
//! A key must be a plain name given once. Repeated keys and bracketed keys
//! (`a[b]`, `a[]`) would be lists or maps rather than one JSON document, so
//! they are rejected like an unparseable value.

use serde_json::{Map, Value};

use crate::errors::AppError;

/// Parse every pair in request order.
pub fn parse_configuration(pairs: Vec<(String, String)>) -> Result<Map<String, Value>, AppError> {
    let mut config = Map::with_capacity(pairs.len());

    for (key, raw) in pairs {
        if config.contains_key(&key) || is_bracketed(&key) {
            tracing::warn!(key = %key, "configuration key is repeated or nested");
            return Err(AppError::ConfigParse { key });
        }
        let value: Value = serde_json::from_str(&raw).map_err(|e| {
            tracing::warn!(key = %key, value = %raw, "configuration value rejected: {}", e);
            AppError::ConfigParse { key: key.clone() }
        })?;
        config.insert(key, value);
    }

    Ok(config)
}

fn is_bracketed(key: &str) -> bool {
    key.find('[')
        .map_or(false, |open| key[open..].contains(']'))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn pairs(items: &[(&str, &str)]) -> Vec<(String, String)> {
        items
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_parses_structured_values() {
        let config = parse_configuration(pairs(&[
            ("a", "1"),
            ("name", "\"magic\""),
            ("opts", r#"{"public": true, "tags": ["x"]}"#),
            ("missing", "null"),
        ]))
        .unwrap();

        assert_eq!(config["a"], json!(1));
        assert_eq!(config["name"], json!("magic"));
        assert_eq!(config["opts"], json!({"public": true, "tags": ["x"]}));
        assert_eq!(config["missing"], Value::Null);
    }

    #[test]
    fn test_one_bad_value_rejects_everything() {
        let err = parse_configuration(pairs(&[("a", "1"), ("b", "not-json"), ("c", "2")]))
            .unwrap_err();
        match err {
            AppError::ConfigParse { key } => assert_eq!(key, "b"),
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_bare_string_is_not_json() {
        assert!(parse_configuration(pairs(&[("name", "magic")])).is_err());
        assert!(parse_configuration(pairs(&[("empty", "")])).is_err());
    }

    #[test]
    fn test_repeated_key_is_rejected() {
        match parse_configuration(pairs(&[("a", "1"), ("a", "2")])) {
            Err(AppError::ConfigParse { key }) => assert_eq!(key, "a"),
            other => panic!("unexpected result: {:?}", other),
        }
        assert!(parse_configuration(pairs(&[("a", "1"), ("b", "2"), ("a", "1")])).is_err());
    }

    #[test]
    fn test_bracketed_key_is_rejected() {
        assert!(parse_configuration(pairs(&[("a[b]", "1")])).is_err());
        assert!(parse_configuration(pairs(&[("a[]", "1")])).is_err());
        assert!(parse_configuration(pairs(&[("ok", "1"), ("x[0]", "2")])).is_err());
        // A lone bracket is just part of the name.
        assert!(parse_configuration(pairs(&[("a[", "1")])).is_ok());
        assert!(parse_configuration(pairs(&[("a]", "1")])).is_ok());
    }

    #[test]
    fn test_empty_query_is_accepted() {
        assert!(parse_configuration(Vec::new()).unwrap().is_empty());
    }
}
