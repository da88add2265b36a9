use super::*;
use time::macros::datetime;

#[test]
fn decode_frame_splits_meta_and_body() {
    let frame = decode_frame("12:00|Hi");
    assert_eq!(frame.meta, "12:00");
    assert_eq!(frame.body.as_deref(), Some("Hi"));
    assert_eq!(frame.extra_fields, 0);
    assert!(!frame.is_malformed());
}

#[test]
fn decode_frame_keeps_only_first_two_fields() {
    let frame = decode_frame("12:00|a|b|c");
    assert_eq!(frame.meta, "12:00");
    assert_eq!(frame.body_text(), "a");
    assert_eq!(frame.extra_fields, 2);
}

#[test]
fn decode_frame_without_delimiter_has_no_body() {
    let frame = decode_frame("just text");
    assert_eq!(frame.meta, "just text");
    assert_eq!(frame.body, None);
    assert_eq!(frame.body_text(), "");
    assert!(frame.is_malformed());
}

#[test]
fn decode_frame_empty_payload_is_single_empty_field() {
    let frame = decode_frame("");
    assert_eq!(frame.meta, "");
    assert!(frame.is_malformed());
}

#[test]
fn decode_frame_allows_empty_fields() {
    let frame = decode_frame("|");
    assert_eq!(frame.meta, "");
    assert_eq!(frame.body.as_deref(), Some(""));
    assert!(!frame.is_malformed());
}

#[test]
fn decode_frame_strict_rejects_missing_delimiter() {
    let err = decode_frame_strict("no delimiter").expect_err("should fail");
    assert!(matches!(err, CodecError::MissingDelimiter));
}

#[test]
fn decode_frame_strict_accepts_well_formed_payload() {
    let frame = decode_frame_strict("#ff0000|red text").expect("should decode");
    assert_eq!(frame, ChatFrame::new("#ff0000", "red text"));
}

#[test]
fn encode_frame_joins_with_delimiter() {
    assert_eq!(encode_frame("12:00", "Hi"), "12:00|Hi");
}

#[test]
fn encode_frame_does_not_escape_delimiter_in_body() {
    let encoded = encode_frame("12:00", "a|b");
    assert_eq!(encoded, "12:00|a|b");

    let decoded = decode_frame(&encoded);
    assert_eq!(decoded.body_text(), "a");
    assert_eq!(decoded.extra_fields, 1);
}

#[test]
fn timestamp_uses_server_layout() {
    let at = datetime!(2024-03-09 07:05:00 UTC);
    assert_eq!(timestamp(at).expect("format"), "2024-03-09 07:05:00");
}

#[test]
fn encode_timestamped_prefixes_current_time() {
    let encoded = encode_timestamped("hello").expect("format");
    let frame = decode_frame(&encoded);
    assert_eq!(frame.body_text(), "hello");
    assert_eq!(frame.meta.len(), "2024-03-09 07:05:00".len());
}

#[test]
fn chat_frame_serializes_with_field_names() {
    let json = serde_json::to_value(ChatFrame::new("12:00", "Hi")).expect("serialize");
    assert_eq!(json, serde_json::json!({"meta": "12:00", "body": "Hi", "extra_fields": 0}));
}
