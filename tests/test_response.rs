use wicket::http::response::{StatusCode, default_headers};

#[test]
fn test_status_code_as_u16() {
    assert_eq!(StatusCode::Ok.as_u16(), 200);
    assert_eq!(StatusCode::BadRequest.as_u16(), 400);
    assert_eq!(StatusCode::InternalServerError.as_u16(), 500);
}

#[test]
fn test_status_code_reason_phrase() {
    assert_eq!(StatusCode::Ok.reason_phrase(), "OK");
    assert_eq!(StatusCode::BadRequest.reason_phrase(), "Bad Request");
    assert_eq!(
        StatusCode::InternalServerError.reason_phrase(),
        "Internal Server Error"
    );
}

#[test]
fn test_status_code_from_u16() {
    assert_eq!(StatusCode::from_u16(200), Some(StatusCode::Ok));
    assert_eq!(StatusCode::from_u16(400), Some(StatusCode::BadRequest));
    assert_eq!(StatusCode::from_u16(500), Some(StatusCode::InternalServerError));
    assert_eq!(StatusCode::from_u16(404), None);
    assert_eq!(StatusCode::from_u16(0), None);
}

#[test]
fn test_default_headers() {
    let headers = default_headers(27);

    assert_eq!(headers.get("Content-Length"), Some("27"));
    assert_eq!(headers.get("Connection"), Some("close"));
    assert_eq!(headers.get("Content-Type"), Some("text/plain"));
    assert_eq!(headers.len(), 3);
}

#[test]
fn test_default_headers_empty_body() {
    let headers = default_headers(0);

    assert_eq!(headers.get("content-length"), Some("0"));
}
