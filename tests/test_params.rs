use fweb::http::params::MultiParameterParser;

#[test]
fn test_content_type_with_boundary() {
    let mut content_type = MultiParameterParser::new();
    content_type.load("multipart/form-data; boundary=XYZ");

    assert_eq!(content_type.tokens(), ["multipart/form-data"]);
    assert_eq!(content_type.param("boundary"), Some("XYZ"));
    assert_eq!(content_type.params().len(), 1);
}

#[test]
fn test_keys_are_lower_cased() {
    let mut content_type = MultiParameterParser::new();
    content_type.load("text/html; Charset=UTF-8");

    assert_eq!(content_type.params().get("charset").map(String::as_str), Some("UTF-8"));
    assert_eq!(content_type.param("CHARSET"), Some("UTF-8"));
}

#[test]
fn test_later_parameter_overwrites() {
    let mut params = MultiParameterParser::new();
    params.load("a=1; A=2");
    params.load("a=3");

    assert_eq!(params.param("a"), Some("3"));
}

#[test]
fn test_value_split_at_first_equals() {
    let mut params = MultiParameterParser::new();
    params.load("multipart/mixed; boundary=a=b");

    assert_eq!(params.param("boundary"), Some("a=b"));
}

#[test]
fn test_bare_tokens_deduplicate_in_order() {
    let mut params = MultiParameterParser::new();
    params.load("x; y; x");

    assert_eq!(params.tokens(), ["x", "y"]);
}

#[test]
fn test_bare_tokens_kept_when_not_unique() {
    let mut params = MultiParameterParser::new().unique(false);
    params.load("x; y; x");

    assert_eq!(params.tokens(), ["x", "y", "x"]);
}

#[test]
fn test_fold_case_applies_to_tokens_only() {
    let mut params = MultiParameterParser::new().fold_case(true);
    params.load("Text/HTML; charset=UTF-8");

    assert!(params.has_token("text/html"));
    assert_eq!(params.param("charset"), Some("UTF-8"));
}

#[test]
fn test_quoted_value_with_separator_is_split() {
    let mut disposition = MultiParameterParser::new();
    disposition.load("form-data; name=\"a; b\"");

    assert_eq!(disposition.param("name"), Some("\"a"));
    assert_eq!(disposition.tokens(), ["form-data", "b\""]);
}

#[test]
fn test_unquoted_param() {
    let mut disposition = MultiParameterParser::new();
    disposition.load("form-data; name=\"field\"; filename=plain.txt");

    assert_eq!(disposition.param("name"), Some("\"field\""));
    assert_eq!(disposition.param_unquoted("name"), Some("field"));
    assert_eq!(disposition.param_unquoted("filename"), Some("plain.txt"));
}

#[test]
fn test_empty_value_is_noop() {
    let mut params = MultiParameterParser::new();
    params.load("");

    assert!(params.is_empty());
}
