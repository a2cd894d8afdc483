//! End-to-end tests against a running server.

use std::io::Write;
use std::time::Duration;

use lang_redirect::config::load_config;
use reqwest::header::{ACCEPT_LANGUAGE, LOCATION, VARY};
use reqwest::StatusCode;

mod common;

#[tokio::test]
async fn test_redirects_to_highest_weighted_language() {
    let server = common::start_server(common::test_config()).await;
    let client = common::client();

    let res = client
        .get(server.url("/"))
        .header(ACCEPT_LANGUAGE, "en;q=0.8,de;q=0.9")
        .send()
        .await
        .expect("server unreachable");

    assert_eq!(res.status(), StatusCode::FOUND);
    assert_eq!(res.headers()[LOCATION], "https://example.org/de/");
    assert_eq!(res.headers()[VARY], "accept-language");
    assert!(res.bytes().await.unwrap().is_empty());

    server.shutdown.trigger();
}

#[tokio::test]
async fn test_browser_style_header() {
    let server = common::start_server(common::test_config()).await;
    let client = common::client();

    let res = client
        .get(server.url("/"))
        .header(ACCEPT_LANGUAGE, "ja-JP,ja;q=0.9,en-US;q=0.8,en;q=0.7")
        .send()
        .await
        .unwrap();
    assert_eq!(res.headers()[LOCATION], "/ja/index.html");

    server.shutdown.trigger();
}

#[tokio::test]
async fn test_missing_and_unsupported_headers_fall_back() {
    let server = common::start_server(common::test_config()).await;
    let client = common::client();

    let res = client.get(server.url("/")).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::FOUND);
    assert_eq!(res.headers()[LOCATION], "https://example.org/en/");

    for header in ["fr-CA", "xx;q=2", "*", ";;;"] {
        let res = client
            .get(server.url("/"))
            .header(ACCEPT_LANGUAGE, header)
            .send()
            .await
            .unwrap();
        assert_eq!(
            res.headers()[LOCATION],
            "https://example.org/en/",
            "header {header:?} should fall back"
        );
    }

    server.shutdown.trigger();
}

#[tokio::test]
async fn test_site_map_update_applies_without_restart() {
    let server = common::start_server(common::test_config()).await;
    let client = common::client();

    let mut next = common::test_config();
    next.sites.insert("fr".into(), "https://example.org/fr/".into());
    server.updates.send(next).unwrap();
    tokio::time::sleep(Duration::from_millis(100)).await;

    let res = client
        .get(server.url("/"))
        .header(ACCEPT_LANGUAGE, "fr-CA")
        .send()
        .await
        .unwrap();
    assert_eq!(res.headers()[LOCATION], "https://example.org/fr/");

    let health: serde_json::Value = client
        .get(server.url("/health"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(health["languages"], serde_json::json!(["de", "en", "fr", "ja"]));

    server.shutdown.trigger();
}

#[tokio::test]
async fn test_graceful_shutdown_stops_server() {
    let server = common::start_server(common::test_config()).await;
    let url = server.url("/");

    server.shutdown.trigger();
    let result = tokio::time::timeout(Duration::from_secs(5), server.handle)
        .await
        .expect("server did not stop");
    assert!(result.unwrap().is_ok());

    let err = common::client().get(url).send().await;
    assert!(err.is_err(), "server still accepting after shutdown");
}

#[tokio::test]
async fn test_server_from_config_file() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    write!(
        file,
        r#"
        [listener]
        bind_address = "127.0.0.1:0"

        [observability]
        metrics_enabled = false

        [sites]
        en = "en/index.html"
        de = "de/index.html"
        "#
    )
    .unwrap();

    let config = load_config(file.path()).unwrap();
    let server = common::start_server(config).await;

    let res = common::client()
        .get(server.url("/"))
        .header(ACCEPT_LANGUAGE, "de-CH, en;q=0.5")
        .send()
        .await
        .unwrap();
    assert_eq!(res.headers()[LOCATION], "de/index.html");

    server.shutdown.trigger();
}
