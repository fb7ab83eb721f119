use wicket::http::headers::HeaderMap;
use wicket::http::parser::parse_header_line;
use wicket::http::response::{StatusCode, default_headers};
use wicket::http::writer::{ResponseWriter, WriterError, WriterState};

#[tokio::test]
async fn test_write_status_line() {
    let mut writer = ResponseWriter::new(Vec::new());
    writer.write_status_line(StatusCode::Ok).await.unwrap();

    assert_eq!(writer.into_inner(), b"HTTP/1.1 200 OK\r\n");
}

#[tokio::test]
async fn test_write_status_line_advances_state() {
    let mut writer = ResponseWriter::new(Vec::new());
    assert_eq!(writer.state(), WriterState::StatusLine);

    writer.write_status_line(StatusCode::BadRequest).await.unwrap();
    assert_eq!(writer.state(), WriterState::Headers);
}

#[tokio::test]
async fn test_write_full_plain_response() {
    let mut writer = ResponseWriter::new(Vec::new());
    let mut headers = HeaderMap::new();
    headers.set("Content-Length", "5");

    writer.write_status_line(StatusCode::Ok).await.unwrap();
    writer.write_headers(&headers).await.unwrap();
    writer.write_body(b"hello").await.unwrap();

    let wire = writer.into_inner();
    assert_eq!(
        wire,
        b"HTTP/1.1 200 OK\r\ncontent-length: 5\r\n\r\nhello"
    );
}

#[tokio::test]
async fn test_write_body_streams_across_calls() {
    let mut writer = ResponseWriter::new(Vec::new());
    writer.write_status_line(StatusCode::Ok).await.unwrap();
    writer.write_headers(&HeaderMap::new()).await.unwrap();

    let n1 = writer.write_body(b"hel").await.unwrap();
    let n2 = writer.write_body(b"lo").await.unwrap();

    assert_eq!((n1, n2), (3, 2));
    assert_eq!(writer.state(), WriterState::Body);
    assert!(writer.into_inner().ends_with(b"\r\n\r\nhello"));
}

#[tokio::test]
async fn test_headers_before_status_line_rejected() {
    let mut writer = ResponseWriter::new(Vec::new());
    let result = writer.write_headers(&HeaderMap::new()).await;

    assert!(matches!(result, Err(WriterError::OutOfOrder { .. })));
    assert_eq!(writer.state(), WriterState::StatusLine);
    assert!(writer.into_inner().is_empty());
}

#[tokio::test]
async fn test_body_before_headers_rejected() {
    let mut writer = ResponseWriter::new(Vec::new());
    writer.write_status_line(StatusCode::Ok).await.unwrap();
    let result = writer.write_body(b"early").await;

    assert!(matches!(result, Err(WriterError::OutOfOrder { .. })));
    assert_eq!(writer.into_inner(), b"HTTP/1.1 200 OK\r\n");
}

#[tokio::test]
async fn test_second_status_line_rejected() {
    let mut writer = ResponseWriter::new(Vec::new());
    writer.write_status_line(StatusCode::Ok).await.unwrap();
    let result = writer.write_status_line(StatusCode::Ok).await;

    assert!(matches!(result, Err(WriterError::OutOfOrder { .. })));
}

#[tokio::test]
async fn test_write_chunked_body_framing() {
    let mut writer = ResponseWriter::new(Vec::new());
    writer.write_status_line(StatusCode::Ok).await.unwrap();
    writer.write_headers(&HeaderMap::new()).await.unwrap();

    writer.write_chunked_body(b"hello").await.unwrap();
    writer.write_chunked_body(b" world!!!!!!!!!!!").await.unwrap();
    writer.write_chunked_body_done().await.unwrap();
    writer.write_trailers(&HeaderMap::new()).await.unwrap();

    let wire = writer.into_inner();
    let tail = &wire[b"HTTP/1.1 200 OK\r\n\r\n".len()..];
    assert_eq!(
        tail,
        b"5\r\nhello\r\n11\r\n world!!!!!!!!!!!\r\n0\r\n\r\n"
    );
}

#[tokio::test]
async fn test_empty_chunk_writes_nothing() {
    let mut writer = ResponseWriter::new(Vec::new());
    writer.write_status_line(StatusCode::Ok).await.unwrap();
    writer.write_headers(&HeaderMap::new()).await.unwrap();

    let n = writer.write_chunked_body(b"").await.unwrap();

    assert_eq!(n, 0);
    assert_eq!(writer.into_inner(), b"HTTP/1.1 200 OK\r\n\r\n");
}

#[tokio::test]
async fn test_trailers_after_chunked_done() {
    let mut writer = ResponseWriter::new(Vec::new());
    writer.write_status_line(StatusCode::Ok).await.unwrap();
    writer.write_headers(&HeaderMap::new()).await.unwrap();
    writer.write_chunked_body_done().await.unwrap();

    let mut trailers = HeaderMap::new();
    trailers.set("X-Checksum", "abc");
    writer.write_trailers(&trailers).await.unwrap();

    assert!(writer.into_inner().ends_with(b"0\r\nx-checksum: abc\r\n\r\n"));
}

#[tokio::test]
async fn test_trailers_legal_from_body_state() {
    // A plain response may close with an explicit empty trailer block.
    let mut writer = ResponseWriter::new(Vec::new());
    writer.write_status_line(StatusCode::Ok).await.unwrap();
    writer.write_headers(&HeaderMap::new()).await.unwrap();
    writer.write_trailers(&HeaderMap::new()).await.unwrap();

    assert_eq!(writer.state(), WriterState::Trailers);
}

#[tokio::test]
async fn test_trailers_before_body_rejected() {
    let mut writer = ResponseWriter::new(Vec::new());
    writer.write_status_line(StatusCode::Ok).await.unwrap();
    let result = writer.write_trailers(&HeaderMap::new()).await;

    assert!(matches!(result, Err(WriterError::OutOfOrder { .. })));
}

#[tokio::test]
async fn test_chunked_after_done_rejected() {
    let mut writer = ResponseWriter::new(Vec::new());
    writer.write_status_line(StatusCode::Ok).await.unwrap();
    writer.write_headers(&HeaderMap::new()).await.unwrap();
    writer.write_chunked_body_done().await.unwrap();

    let result = writer.write_chunked_body(b"late").await;
    assert!(matches!(result, Err(WriterError::OutOfOrder { .. })));
}

#[tokio::test]
async fn test_written_headers_reparse_to_same_map() {
    let mut headers = default_headers(42);
    headers.set("X-Request-Id", "7");

    let mut writer = ResponseWriter::new(Vec::new());
    writer.write_status_line(StatusCode::Ok).await.unwrap();
    writer.write_headers(&headers).await.unwrap();

    let wire = writer.into_inner();
    let block = &wire[b"HTTP/1.1 200 OK\r\n".len()..];

    let mut reparsed = HeaderMap::new();
    let mut offset = 0;
    loop {
        let parsed = parse_header_line(&block[offset..], &mut reparsed).unwrap();
        offset += parsed.consumed;
        if parsed.done {
            break;
        }
    }

    assert_eq!(offset, block.len());
    assert_eq!(reparsed, headers);
}
