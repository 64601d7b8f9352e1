use ecoscore::config::Config;
use ecoscore::extractor::extract;
use ecoscore::fetcher::{Charset, FetchError, HttpFetcher, USER_AGENT};
use wiremock::{
    Mock, MockServer, ResponseTemplate,
    matchers::{header, method, path},
};

fn fetcher() -> HttpFetcher {
    HttpFetcher::new(&Config::default()).unwrap()
}

#[tokio::test]
async fn test_fetch_success() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/dp/B000TEST"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_bytes(
                    "<html><head><title>Test</title></head><body>Hello World</body></html>"
                        .as_bytes(),
                )
                .insert_header("Content-Type", "text/html; charset=utf-8"),
        )
        .mount(&mock_server)
        .await;

    let url = format!("{}/dp/B000TEST", mock_server.uri());
    let result = fetcher().fetch(&url).await.unwrap();

    assert!(result.status.is_success());
    assert!(result.body_utf8.contains("Hello World"));
    assert_eq!(result.url_final.as_str(), url);
    assert_eq!(result.charset, Charset::Utf8);
}

#[tokio::test]
async fn test_fetch_identifies_as_crawler() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/dp/B000TEST"))
        .and(header("user-agent", USER_AGENT))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string("<html><body>server-rendered</body></html>")
                .insert_header("Content-Type", "text/html"),
        )
        .expect(1)
        .mount(&mock_server)
        .await;

    let url = format!("{}/dp/B000TEST", mock_server.uri());
    let result = fetcher().fetch(&url).await.unwrap();

    assert!(result.body_utf8.contains("server-rendered"));
}

#[tokio::test]
async fn test_fetch_404() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/notfound"))
        .respond_with(ResponseTemplate::new(404).set_body_string("<html>gone</html>"))
        .mount(&mock_server)
        .await;

    let url = format!("{}/notfound", mock_server.uri());
    let result = fetcher().fetch(&url).await;

    match result {
        Err(err @ FetchError::Http { .. }) => {
            assert_eq!(err.status().map(|s| s.as_u16()), Some(404));
        }
        _ => panic!("Expected HTTP 404 error"),
    }
}

#[tokio::test]
async fn test_fetch_503_robot_check() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/dp/B000TEST"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&mock_server)
        .await;

    let url = format!("{}/dp/B000TEST", mock_server.uri());
    let result = fetcher().fetch(&url).await;

    match result {
        Err(FetchError::Http { status }) => assert_eq!(status.as_u16(), 503),
        _ => panic!("Expected HTTP 503 error"),
    }
}

#[tokio::test]
async fn test_fetch_redirect() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/gp/product/B000TEST"))
        .respond_with(ResponseTemplate::new(301).insert_header("location", "/dp/B000TEST"))
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/dp/B000TEST"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_bytes("<html><body>Final page</body></html>".as_bytes())
                .insert_header("Content-Type", "text/html"),
        )
        .mount(&mock_server)
        .await;

    let url = format!("{}/gp/product/B000TEST", mock_server.uri());
    let result = fetcher().fetch(&url).await.unwrap();

    assert!(result.body_utf8.contains("Final page"));
    assert!(result.url_final.as_str().ends_with("/dp/B000TEST"));
}

#[tokio::test]
async fn test_fetch_gzip_compression() {
    use flate2::Compression;
    use flate2::write::GzEncoder;
    use std::io::Write;

    let uncompressed = r#"<html><body><span id="productTitle">Compressed</span></body></html>"#;

    let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(uncompressed.as_bytes()).unwrap();
    let compressed_data = encoder.finish().unwrap();

    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/gzipped"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_bytes(compressed_data)
                .insert_header("Content-Type", "text/html; charset=utf-8")
                .insert_header("Content-Encoding", "gzip"),
        )
        .mount(&mock_server)
        .await;

    let url = format!("{}/gzipped", mock_server.uri());
    let result = fetcher().fetch(&url).await.unwrap();

    assert_eq!(result.body_utf8, uncompressed);
}

#[tokio::test]
async fn test_fetch_latin1_page() {
    let mock_server = MockServer::start().await;

    let mut body = b"<html><body><span id=\"productTitle\">Bamb".to_vec();
    body.push(0xfa); // u-acute in windows-1252
    body.extend_from_slice(b" cutlery</span></body></html>");

    Mock::given(method("GET"))
        .and(path("/latin1"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_bytes(body)
                .insert_header("Content-Type", "text/html; charset=iso-8859-1"),
        )
        .mount(&mock_server)
        .await;

    let url = format!("{}/latin1", mock_server.uri());
    let result = fetcher().fetch(&url).await.unwrap();

    assert!(result.body_utf8.contains("Bambú cutlery"));
    assert_eq!(result.charset, Charset::Windows1252);
}

#[tokio::test]
async fn test_fetch_stray_byte_is_replaced() {
    let mock_server = MockServer::start().await;

    // Declared UTF-8, but "café" is encoded in windows-1252
    let body = b"<html><body><span id=\"productTitle\">Bamboo Brush</span><p>caf\xe9</p></body></html>".to_vec();

    Mock::given(method("GET"))
        .and(path("/dp/B000TEST"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_bytes(body)
                .insert_header("Content-Type", "text/html; charset=utf-8"),
        )
        .mount(&mock_server)
        .await;

    let url = format!("{}/dp/B000TEST", mock_server.uri());
    let result = fetcher().fetch(&url).await.unwrap();

    assert_eq!(result.charset, Charset::Utf8);
    assert!(result.body_utf8.contains("caf\u{fffd}"));
    assert_eq!(extract(&result.body_utf8).title, "Bamboo Brush");
}

#[tokio::test]
async fn test_fetch_body_too_large() {
    let mock_server = MockServer::start().await;
    let limited = HttpFetcher::new(&Config::default().with_max_body_bytes(1024)).unwrap();

    Mock::given(method("GET"))
        .and(path("/large"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string("x".repeat(4096))
                .insert_header("Content-Type", "text/html"),
        )
        .mount(&mock_server)
        .await;

    let url = format!("{}/large", mock_server.uri());
    let result = limited.fetch(&url).await;

    match result {
        Err(FetchError::BodyTooLarge(size)) => assert_eq!(size, 4096),
        _ => panic!("Expected BodyTooLarge error"),
    }
}

#[tokio::test]
async fn test_fetch_invalid_url() {
    let result = fetcher().fetch("not-a-valid-url").await;

    match result {
        Err(FetchError::InvalidUrl(_)) => {}
        _ => panic!("Expected InvalidUrl error"),
    }
}
