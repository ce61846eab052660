//! Tests for input sanitization modules

mod query_tests {
    use super::super::query::{encode_query, parse_query};
    use serde_json::json;

    #[test]
    fn test_parse_query() {
        let parsed = parse_query("name=Ann&city=New%20York&empty=").unwrap();
        assert_eq!(
            parsed,
            json!({"name": "Ann", "city": "New York", "empty": ""})
        );
    }

    #[test]
    fn test_repeated_keys_become_arrays() {
        let parsed = parse_query("tag=a&tag=b&tag=c&x=1").unwrap();
        assert_eq!(parsed, json!({"tag": ["a", "b", "c"], "x": "1"}));
    }

    #[test]
    fn test_encode_query() {
        let encoded = encode_query(&json!({"q": "a b&c", "tag": ["x", "y"]})).unwrap();
        assert_eq!(encoded, "q=a+b%26c&tag=x&tag=y");
    }

    #[test]
    fn test_encode_non_object_is_empty() {
        assert_eq!(encode_query(&json!("x")).unwrap(), "");
    }

    #[test]
    fn test_parse_then_encode_keeps_repeated_keys() {
        let raw = "tag=a&tag=b";
        assert_eq!(encode_query(&parse_query(raw).unwrap()).unwrap(), raw);
    }
}

mod middleware_tests {
    use super::super::middleware::{is_json_content, replace_query};
    use axum::http::{header, HeaderMap, HeaderValue, Uri};

    fn headers_with_content_type(value: &'static str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(header::CONTENT_TYPE, HeaderValue::from_static(value));
        headers
    }

    #[test]
    fn test_json_content_detection() {
        assert!(is_json_content(&headers_with_content_type("application/json")));
        assert!(is_json_content(&headers_with_content_type(
            "application/json; charset=utf-8"
        )));
        assert!(is_json_content(&headers_with_content_type(
            "application/merge-patch+json"
        )));
        assert!(!is_json_content(&headers_with_content_type("text/plain")));
        assert!(!is_json_content(&HeaderMap::new()));
    }

    #[test]
    fn test_replace_query() {
        let uri: Uri = "http://localhost:8080/v1/echo?q=%3Cb%3E".parse().unwrap();

        let replaced = replace_query(&uri, "q=b").unwrap();
        assert_eq!(replaced.to_string(), "http://localhost:8080/v1/echo?q=b");

        let cleared = replace_query(&uri, "").unwrap();
        assert_eq!(cleared.to_string(), "http://localhost:8080/v1/echo");
    }

    #[test]
    fn test_replace_query_on_relative_uri() {
        let uri: Uri = "/v1/echo?x=1".parse().unwrap();
        assert_eq!(replace_query(&uri, "x=2").unwrap(), "/v1/echo?x=2");
    }
}

mod config_tests {
    use super::super::config::InputSanitizationConfig;

    #[test]
    fn test_config_defaults() {
        let config = InputSanitizationConfig::default();

        assert_eq!(config.max_body_bytes, 2 * 1024 * 1024);
        assert!(config.sanitize_body);
        assert!(config.sanitize_query);
        assert!(config.sanitize_path_params);
    }

    #[test]
    fn test_config_builder() {
        let config = InputSanitizationConfig::new()
            .with_max_body_bytes(1024)
            .with_body_sanitization(false)
            .with_query_sanitization(false)
            .with_path_param_sanitization(false);

        assert_eq!(config.max_body_bytes, 1024);
        assert!(!config.sanitize_body);
        assert!(!config.sanitize_query);
        assert!(!config.sanitize_path_params);
    }
}
