//! Integration tests for the WISO translator
//!
//! These tests drive the resolver and the batch translation against mocked
//! translation endpoints, exercising the whole remote-then-fallback flow.

use std::sync::Arc;
use std::time::Duration;
use tempfile::TempDir;
use tokio_util::sync::CancellationToken;
use wiremock::{
    matchers::{header, method, path, query_param},
    Mock, MockServer, ResponseTemplate,
};

use wiso_translator::{
    batch::{self, BatchOptions},
    dictionary::Dictionary,
    files,
    provider::{ProviderEndpoint, RequestSettings, DEFAULT_USER_AGENT},
    resolver::FallbackDelay,
    Resolver, TranslationSource,
};

// ==================== Test Helpers ====================

/// Endpoint template pointing at the mock server, distinguished by `client`
fn mock_endpoint(server: &MockServer, client: &str) -> ProviderEndpoint {
    ProviderEndpoint::new(format!(
        "{}/translate_a/single?client={}&sl={{sl}}&tl={{tl}}&dt=t&q={{q}}",
        server.uri(),
        client
    ))
    .expect("valid template")
}

/// Endpoint nothing listens on, so every request is a transport error
fn unreachable_endpoint() -> ProviderEndpoint {
    ProviderEndpoint::new(
        "http://127.0.0.1:1/translate_a/single?client=gtx&sl={sl}&tl={tl}&dt=t&q={q}",
    )
    .expect("valid template")
}

fn test_resolver(endpoints: Vec<ProviderEndpoint>) -> Resolver {
    Resolver::new(reqwest::Client::new(), endpoints)
        .with_settings(RequestSettings {
            timeout: Duration::from_secs(2),
            ..RequestSettings::default()
        })
        .with_fallback_delay(FallbackDelay::none())
}

/// A response body in the nested-array shape the endpoints return
fn segments_body(segments: &[&str]) -> String {
    let segments: Vec<serde_json::Value> = segments
        .iter()
        .map(|s| serde_json::json!([s, "source", null, null, 10]))
        .collect();
    serde_json::json!([segments, null, "en"]).to_string()
}

// ==================== Remote Tier Tests ====================

#[tokio::test]
async fn test_second_endpoint_wins_after_transport_error() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/translate_a/single"))
        .and(query_param("client", "dict-chrome-ex"))
        .and(query_param("q", "Good morning. How are you?"))
        .and(header("User-Agent", DEFAULT_USER_AGENT))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(segments_body(&["Buenos días. ", "¿Cómo estás?"])),
        )
        .expect(1)
        .mount(&mock_server)
        .await;

    // Third endpoint must never be reached
    Mock::given(method("GET"))
        .and(query_param("client", "webapp"))
        .respond_with(ResponseTemplate::new(200).set_body_string(segments_body(&["nope"])))
        .expect(0)
        .mount(&mock_server)
        .await;

    let resolver = test_resolver(vec![
        unreachable_endpoint(),
        mock_endpoint(&mock_server, "dict-chrome-ex"),
        mock_endpoint(&mock_server, "webapp"),
    ]);

    let result = resolver
        .resolve("Good morning. How are you?", "auto", "es")
        .await;

    assert_eq!(result.text, "Buenos días. ¿Cómo estás?");
    assert_eq!(result.source, TranslationSource::Remote);
}

#[tokio::test]
async fn test_every_endpoint_tried_once_before_fallback() {
    let mock_server = MockServer::start().await;

    for client in ["gtx", "dict-chrome-ex", "webapp"] {
        Mock::given(method("GET"))
            .and(query_param("client", client))
            .respond_with(ResponseTemplate::new(500).set_body_string("Internal error"))
            .expect(1)
            .mount(&mock_server)
            .await;
    }

    let resolver = test_resolver(vec![
        mock_endpoint(&mock_server, "gtx"),
        mock_endpoint(&mock_server, "dict-chrome-ex"),
        mock_endpoint(&mock_server, "webapp"),
    ]);

    let result = resolver.resolve("Hello", "en", "es").await;

    assert_eq!(result.text, "hola");
    assert_eq!(result.source, TranslationSource::Fallback);
}

#[tokio::test]
async fn test_structurally_invalid_response_is_skipped() {
    let mock_server = MockServer::start().await;

    // Valid JSON, wrong shape: first segment has no text
    Mock::given(method("GET"))
        .and(query_param("client", "gtx"))
        .respond_with(
            ResponseTemplate::new(200).set_body_string(r#"[[[null,"hello"]],null,"en"]"#),
        )
        .expect(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(query_param("client", "webapp"))
        .respond_with(ResponseTemplate::new(200).set_body_string(segments_body(&["Bonjour"])))
        .expect(1)
        .mount(&mock_server)
        .await;

    let resolver = test_resolver(vec![
        mock_endpoint(&mock_server, "gtx"),
        mock_endpoint(&mock_server, "webapp"),
    ]);

    let result = resolver.resolve("hello", "en", "fr").await;
    assert_eq!(result.text, "Bonjour");
    assert!(result.is_remote());
}

// ==================== Fallback Tier Tests ====================

#[tokio::test]
async fn test_fallback_exact_match() {
    let resolver = test_resolver(vec![unreachable_endpoint()]);
    let result = resolver.resolve("Hello", "en", "es").await;
    assert_eq!(result.text, "hola");
}

#[tokio::test]
async fn test_fallback_word_substitution() {
    let resolver = test_resolver(vec![unreachable_endpoint()]);
    let result = resolver
        .resolve("The weather is so beautiful today", "en", "es")
        .await;
    assert_eq!(result.text, "The weather is so hermoso hoy");
}

#[tokio::test]
async fn test_fallback_word_boundaries() {
    let dictionary = Dictionary::new()
        .with_language("es", [("the", "el"), ("today", "hoy")])
        .expect("valid dictionary");
    let resolver =
        test_resolver(vec![unreachable_endpoint()]).with_dictionary(Arc::new(dictionary));

    let result = resolver.resolve("The tether broke today", "en", "es").await;
    assert_eq!(result.text, "el tether broke hoy");
}

#[tokio::test]
async fn test_fallback_marker() {
    let resolver = test_resolver(vec![unreachable_endpoint()]);
    let result = resolver.resolve("xyzzy plugh", "en", "ja").await;
    assert_eq!(result.text, "[JA] xyzzy plugh");
    assert_eq!(result.source, TranslationSource::Fallback);
}

#[tokio::test]
async fn test_fallback_unknown_language() {
    let resolver = test_resolver(vec![unreachable_endpoint()]);
    let result = resolver.resolve("hello", "en", "xx").await;
    assert_eq!(result.text, "[XX] hello");
}

#[tokio::test(start_paused = true)]
async fn test_fallback_delay_is_applied() {
    let resolver = test_resolver(Vec::new()).with_fallback_delay(FallbackDelay::new(
        Duration::from_millis(40),
        Duration::from_millis(60),
    ));

    let started = tokio::time::Instant::now();
    let result = resolver.resolve("goodbye", "en", "de").await;

    assert_eq!(result.text, "auf Wiedersehen");
    let elapsed = started.elapsed();
    assert!(elapsed >= Duration::from_millis(40), "elapsed {:?}", elapsed);
    assert!(elapsed <= Duration::from_millis(61), "elapsed {:?}", elapsed);
}

// ==================== Batch Tests ====================

#[tokio::test]
async fn test_batch_preserves_order_and_blank_lines() {
    let resolver = test_resolver(vec![unreachable_endpoint()]);

    let result = batch::translate_lines(
        &resolver,
        &["hello", "", "thank you"],
        "en",
        "es",
        &BatchOptions::unpaced(),
        &CancellationToken::new(),
    )
    .await
    .expect("batch should complete");

    assert_eq!(result, vec!["hola", "", "gracias"]);
}

#[tokio::test]
async fn test_batch_translates_each_line_remotely() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(query_param("q", "first line"))
        .respond_with(
            ResponseTemplate::new(200).set_body_string(segments_body(&["primera línea"])),
        )
        .expect(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(query_param("q", "second line"))
        .respond_with(
            ResponseTemplate::new(200).set_body_string(segments_body(&["segunda línea"])),
        )
        .expect(1)
        .mount(&mock_server)
        .await;

    let resolver = test_resolver(vec![mock_endpoint(&mock_server, "gtx")]);
    let result = batch::translate_document(
        &resolver,
        "first line\n\n  second line  ",
        "en",
        "es",
        &BatchOptions::unpaced(),
        &CancellationToken::new(),
    )
    .await
    .expect("batch should complete");

    assert_eq!(result, "primera línea\n\nsegunda línea");
}

// ==================== File Workflow Tests ====================

#[tokio::test]
async fn test_file_translation_workflow() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let input = temp_dir.path().join("greetings.txt");
    std::fs::write(&input, "Good morning\nplease\n\nxyzzy\n").expect("write");

    let resolver = test_resolver(Vec::new());
    let content = files::read_source(&input).expect("read");
    let translated = batch::translate_document(
        &resolver,
        &content,
        "auto",
        "es",
        &BatchOptions::unpaced(),
        &CancellationToken::new(),
    )
    .await
    .expect("batch should complete");

    let output = files::translated_path(&input);
    files::write_translation(&output, &translated).expect("write translation");

    assert!(output.ends_with("greetings_translated.txt"));
    assert_eq!(
        std::fs::read_to_string(&output).expect("read output"),
        "buenos días\npor favor\n\n[ES] xyzzy\n"
    );
}
