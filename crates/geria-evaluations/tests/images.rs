use geria_evaluations::error::EvaluationError;
use geria_evaluations::images::{is_inline, parse_data_url};

#[test]
fn parses_png_data_url() {
    let image = parse_data_url("data:image/png;base64,iVBORw0KGgo=").unwrap();
    assert_eq!(image.content_type, "image/png");
    assert_eq!(image.extension, "png");
    assert_eq!(image.bytes, vec![0x89, b'P', b'N', b'G', 0x0d, 0x0a, 0x1a, 0x0a]);
}

#[test]
fn media_type_match_is_case_insensitive() {
    let image = parse_data_url("data:IMAGE/JPEG;base64,/9j/4A==").unwrap();
    assert_eq!(image.content_type, "image/jpeg");
    assert_eq!(image.extension, "jpg");
}

#[test]
fn rejects_malformed_payloads() {
    for url in [
        "data:image/png,raw",
        "data:application/pdf;base64,AAAA",
        "data:image/png;base64,@@@",
        "data:image/png;base64,",
        "data:image/png;base64",
    ] {
        assert!(
            matches!(parse_data_url(url), Err(EvaluationError::BadRequest(_))),
            "{url} should be rejected"
        );
    }
}

#[test]
fn stored_references_are_not_inline() {
    assert!(!is_inline("images/3f2a.png"));
    assert!(is_inline("data:image/gif;base64,R0lG"));
}
