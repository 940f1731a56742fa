use coderzhub::tools::{
    ToolError, base64_convert, image_tools, json_format, jwt_decode, uuid_gen, whitespace,
};
use image::ImageFormat;
use std::collections::HashSet;
use std::io::Cursor;

// --- UUID Generator ---

#[test]
fn generated_uuids_are_version_4_with_rfc_variant() {
    let id = uuid_gen::generate();
    assert_eq!(id.get_version_num(), 4);
    assert_eq!(id.get_variant(), uuid::Variant::RFC4122);
}

#[test]
fn generated_uuids_do_not_collide_in_a_small_batch() {
    let batch = uuid_gen::generate_many(100);
    assert_eq!(batch.len(), 100);

    let distinct: HashSet<_> = batch.iter().collect();
    assert_eq!(distinct.len(), 100);
}

// --- JSON Formatter ---

#[test]
fn formatting_valid_json_round_trips_to_an_equal_value() {
    let input = r#"{"b":[1,2,{"c":null}],"a":"x","n":1.5,"t":true}"#;

    let pretty = json_format::format(input).unwrap();
    // 2-space indentation.
    assert!(pretty.contains("\n  \"b\""));

    let original: serde_json::Value = serde_json::from_str(input).unwrap();
    let reparsed: serde_json::Value = serde_json::from_str(&pretty).unwrap();
    assert_eq!(original, reparsed);
}

#[test]
fn formatting_invalid_json_is_an_error_not_a_panic() {
    // Unquoted keys: the classic paste from a JS object literal.
    let err = json_format::format("{a:1}").unwrap_err();
    assert!(matches!(err, ToolError::InvalidJson(_)));

    assert!(json_format::format("").is_err());
    assert!(json_format::format("{\"a\":").is_err());
}

// --- Base64 Converter ---

#[test]
fn base64_round_trips_arbitrary_text() {
    for input in ["hello", "", "caffé ☕", "line\nbreaks\tand spaces"] {
        let encoded = base64_convert::encode(input);
        assert_eq!(base64_convert::decode(&encoded).unwrap(), input);
    }
}

#[test]
fn decoding_non_base64_input_is_an_error() {
    assert!(matches!(
        base64_convert::decode("@@@").unwrap_err(),
        ToolError::InvalidBase64
    ));
}

#[test]
fn decoding_base64_of_non_text_bytes_is_an_error() {
    // Valid Base64, but the decoded bytes are not valid UTF-8.
    assert!(matches!(
        base64_convert::decode("/w==").unwrap_err(),
        ToolError::NotText
    ));
}

// --- JWT Decoder ---

// The sample token the tool page documents (HS256, "Jon Doe").
const DEMO_TOKEN: &str = "eyJhbGciOiJIUzI1NiIsInR5cCI6IkpXVCJ9.\
eyJzdWIiOiIxMjM0NTY3ODkwIiwibmFtZSI6IkpvbiBEb2UiLCJpYXQiOjE1MTYyMzkwMjJ9.\
SflKxwRJSMeKKF2QT4fwpMeJf36POk6yJV_adQssw5c";

#[test]
fn decoding_a_well_formed_token_exposes_header_and_payload() {
    let decoded = jwt_decode::decode(DEMO_TOKEN).unwrap();
    assert!(decoded.header.contains("\"alg\": \"HS256\""));
    assert!(decoded.payload.contains("\"name\": \"Jon Doe\""));
}

#[test]
fn tokens_without_exactly_three_segments_are_a_format_error() {
    assert!(matches!(
        jwt_decode::decode("onlyone").unwrap_err(),
        ToolError::MalformedToken
    ));
    assert!(matches!(
        jwt_decode::decode("two.segments").unwrap_err(),
        ToolError::MalformedToken
    ));
    assert!(matches!(
        jwt_decode::decode("a.b.c.d").unwrap_err(),
        ToolError::MalformedToken
    ));
}

#[test]
fn an_undecodable_segment_is_an_error_with_no_partial_output() {
    // Right shape, but the payload segment is not base64url JSON.
    let parts: Vec<&str> = DEMO_TOKEN.split('.').collect();
    let broken = format!("{}.!!notbase64!!.{}", parts[0], parts[2]);

    assert!(matches!(
        jwt_decode::decode(&broken).unwrap_err(),
        ToolError::InvalidSegment("payload")
    ));
}

// --- Space Remover ---

#[test]
fn strip_removes_every_whitespace_run() {
    let result = whitespace::strip("  a b\tc\n d \r\n e  ");
    assert_eq!(result.output, "abcde");
    assert_eq!(result.removed, 12);
}

#[test]
fn strip_is_a_no_op_on_text_without_whitespace() {
    let result = whitespace::strip("already-clean");
    assert_eq!(result.output, "already-clean");
    assert_eq!(result.removed, 0);
}

// --- Image Tools ---

/// A small in-memory PNG to feed the codecs.
fn sample_png() -> Vec<u8> {
    let img = image::RgbImage::from_fn(16, 16, |x, y| {
        image::Rgb([(x * 16) as u8, (y * 16) as u8, 128])
    });
    let mut buf = Cursor::new(Vec::new());
    image::DynamicImage::ImageRgb8(img)
        .write_to(&mut buf, ImageFormat::Png)
        .unwrap();
    buf.into_inner()
}

#[test]
fn compression_produces_a_decodable_jpeg_and_reports_both_sizes() {
    let png = sample_png();

    let compressed = image_tools::compress(&png, 70).unwrap();
    assert_eq!(compressed.original_len, png.len());
    assert_eq!(compressed.compressed_len, compressed.data.len());

    let reloaded = image::load_from_memory(&compressed.data).unwrap();
    assert_eq!(reloaded.width(), 16);
    assert_eq!(reloaded.height(), 16);
    assert_eq!(
        image::guess_format(&compressed.data).unwrap(),
        ImageFormat::Jpeg
    );
}

#[test]
fn compression_rejects_out_of_range_quality() {
    let png = sample_png();
    assert!(matches!(
        image_tools::compress(&png, 0).unwrap_err(),
        ToolError::InvalidQuality(0)
    ));
    assert!(matches!(
        image_tools::compress(&png, 101).unwrap_err(),
        ToolError::InvalidQuality(101)
    ));
}

#[test]
fn compression_rejects_non_image_input() {
    assert!(matches!(
        image_tools::compress(b"definitely not pixels", 70).unwrap_err(),
        ToolError::UnreadableImage(_)
    ));
}

#[test]
fn conversion_reaches_every_supported_target_format() {
    let png = sample_png();

    for (target, expected) in [
        (image_tools::TargetFormat::Jpeg, ImageFormat::Jpeg),
        (image_tools::TargetFormat::Png, ImageFormat::Png),
        (image_tools::TargetFormat::WebP, ImageFormat::WebP),
    ] {
        let converted = image_tools::convert(&png, target).unwrap();
        assert_eq!(image::guess_format(&converted).unwrap(), expected);

        let reloaded = image::load_from_memory(&converted).unwrap();
        assert_eq!((reloaded.width(), reloaded.height()), (16, 16));
    }
}

#[test]
fn conversion_rejects_non_image_input() {
    assert!(matches!(
        image_tools::convert(b"nope", image_tools::TargetFormat::Png).unwrap_err(),
        ToolError::UnreadableImage(_)
    ));
}

#[test]
fn target_formats_parse_from_user_input() {
    assert_eq!(
        "webp".parse::<image_tools::TargetFormat>().unwrap(),
        image_tools::TargetFormat::WebP
    );
    assert_eq!(
        "JPEG".parse::<image_tools::TargetFormat>().unwrap(),
        image_tools::TargetFormat::Jpeg
    );
    assert!("tiff".parse::<image_tools::TargetFormat>().is_err());
}
