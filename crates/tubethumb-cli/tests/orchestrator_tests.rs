//! Orchestrator flows against a mock CDN and in-memory stores.

use std::io::Cursor;
use std::sync::Arc;
use std::time::Duration;

use image::{DynamicImage, Rgb, RgbImage};
use serde_json::json;
use tokio_test::{assert_err, assert_ok};
use tubethumb_ai::{AnalysisClient, AnalysisConfig};
use tubethumb_cli::{AnalysisOutcome, AppConfig, AppError, Orchestrator, INVALID_URL_MESSAGE};
use tubethumb_history::{HistoryStore, KeyValueStore, MemoryKvStore, HISTORY_KEY};
use tubethumb_media::{
    DeliveryOutcome, FetcherConfig, ImageFetchConverter, ImageFetcher, MemorySink, VariantAvailability,
};
use tubethumb_models::{AppState, ImageFormat, VariantKey};
use wiremock::matchers::{method, path, path_regex};
use wiremock::{Mock, MockServer, ResponseTemplate};

const RICK: &str = "https://www.youtube.com/watch?v=dQw4w9WgXcQ";

fn sample_jpeg() -> Vec<u8> {
    let img = RgbImage::from_fn(12, 9, |x, y| Rgb([(x * 20) as u8, (y * 20) as u8, 64]));
    let mut out = Cursor::new(Vec::new());
    DynamicImage::ImageRgb8(img)
        .write_to(&mut out, image::ImageOutputFormat::Jpeg(90))
        .unwrap();
    out.into_inner()
}

struct Harness {
    app: Orchestrator,
    sink: Arc<MemorySink>,
    store: Arc<MemoryKvStore>,
}

async fn harness(cdn: &MockServer, analysis: Option<AnalysisClient>) -> Harness {
    harness_with(cdn, analysis, AppConfig::default().without_delay()).await
}

async fn harness_with(cdn: &MockServer, analysis: Option<AnalysisClient>, mut config: AppConfig) -> Harness {
    config.cdn_base = cdn.uri();

    let sink = Arc::new(MemorySink::new());
    let store = Arc::new(MemoryKvStore::new());
    let media = ImageFetchConverter::new(ImageFetcher::new(FetcherConfig::default()).unwrap(), sink.clone());
    let history = HistoryStore::load(store.clone(), config.history_capacity).await;

    Harness {
        app: Orchestrator::new(config, media, analysis, history),
        sink,
        store,
    }
}

#[tokio::test]
async fn test_lookup_builds_record_and_history() {
    let cdn = MockServer::start().await;
    let mut h = harness(&cdn, None).await;

    let record = assert_ok!(h.app.lookup(RICK, |_| {}).await).clone();

    assert_eq!(h.app.status(), AppState::Ready);
    assert_eq!(record.id.as_str(), "dQw4w9WgXcQ");
    assert_eq!(record.original_url, RICK);
    assert_eq!(
        record.thumbnails.best().unwrap().url,
        format!("{}/vi/dQw4w9WgXcQ/maxresdefault.jpg", cdn.uri())
    );
    assert_eq!(h.app.history().len(), 1);
    assert!(h.store.get(HISTORY_KEY).await.unwrap().is_some());
}

#[tokio::test]
async fn test_invalid_url_only_sets_error_message() {
    let cdn = MockServer::start().await;
    let mut h = harness(&cdn, None).await;

    h.app.lookup(RICK, |_| {}).await.unwrap();
    let before = h.app.current().cloned();
    assert_eq!(h.app.status(), AppState::Ready);

    let err = assert_err!(h.app.lookup("not a url", |_| {}).await);
    assert!(matches!(err, AppError::InvalidUrl(_)));
    assert_eq!(err.to_string(), INVALID_URL_MESSAGE);

    assert_eq!(h.app.status(), AppState::Ready);
    assert_eq!(h.app.error_message(), Some(INVALID_URL_MESSAGE));
    assert_eq!(h.app.current().cloned(), before);
    assert_eq!(h.app.history().len(), 1);

    // The next valid lookup clears the message.
    h.app.lookup("https://youtu.be/9bZkp7q19f0", |_| {}).await.unwrap();
    assert_eq!(h.app.error_message(), None);
}

#[tokio::test]
async fn test_invalid_url_from_idle_stays_idle() {
    let cdn = MockServer::start().await;
    let mut h = harness(&cdn, None).await;

    assert!(h.app.lookup("https://example.com/nothing", |_| {}).await.is_err());

    assert_eq!(h.app.status(), AppState::Idle);
    assert!(h.app.current().is_none());
    assert!(h.app.history().is_empty());
}

#[tokio::test]
async fn test_progress_is_monotonic_and_settles_at_100() {
    let cdn = MockServer::start().await;
    let mut config = AppConfig::default();
    config.lookup_delay = Duration::from_millis(120);
    config.progress_tick = Duration::from_millis(20);
    let mut h = harness_with(&cdn, None, config).await;

    let mut reports = Vec::new();
    h.app.lookup(RICK, |p| reports.push(p)).await.unwrap();

    assert!(reports.len() >= 3, "expected several progress reports, got {:?}", reports);
    assert_eq!(reports.last().copied(), Some(100.0));
    assert!(reports.windows(2).all(|w| w[0] <= w[1]));
    assert!(reports[..reports.len() - 1].iter().all(|p| *p <= 90.0));
}

#[tokio::test]
async fn test_repeat_lookup_moves_entry_to_front() {
    let cdn = MockServer::start().await;
    let mut h = harness(&cdn, None).await;

    h.app.lookup(RICK, |_| {}).await.unwrap();
    h.app.lookup("https://youtu.be/9bZkp7q19f0", |_| {}).await.unwrap();
    h.app.lookup("https://youtu.be/dQw4w9WgXcQ?t=10", |_| {}).await.unwrap();

    let ids: Vec<&str> = h.app.history().iter().map(|r| r.id.as_str()).collect();
    assert_eq!(ids, vec!["dQw4w9WgXcQ", "9bZkp7q19f0"]);
    assert_eq!(h.app.history()[0].original_url, "https://youtu.be/dQw4w9WgXcQ?t=10");
}

#[tokio::test]
async fn test_download_converts_to_png() {
    let cdn = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/vi/dQw4w9WgXcQ/hqdefault.jpg"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(sample_jpeg()))
        .mount(&cdn)
        .await;
    let mut h = harness(&cdn, None).await;

    h.app.lookup(RICK, |_| {}).await.unwrap();
    let outcome = h.app.download(VariantKey::Hq, ImageFormat::Png).await.unwrap();

    assert!(outcome.is_saved());
    let saved = h.sink.saved();
    assert_eq!(saved[0].0, "thumbnail-hq.png");
    assert_eq!(&saved[0].1[..4], &[0x89, b'P', b'N', b'G']);
}

#[tokio::test]
async fn test_download_of_missing_maxres_opens_source() {
    let cdn = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&cdn)
        .await;
    let mut h = harness(&cdn, None).await;

    h.app.lookup(RICK, |_| {}).await.unwrap();
    let outcome = h.app.download(VariantKey::MaxRes, ImageFormat::Jpg).await.unwrap();

    assert!(matches!(outcome, DeliveryOutcome::OpenedExternally { .. }));
    assert_eq!(h.sink.opened().len(), 1);
    assert_eq!(h.app.status(), AppState::Ready);
}

#[tokio::test]
async fn test_operations_need_a_current_record() {
    let cdn = MockServer::start().await;
    let h = harness(&cdn, None).await;

    assert!(matches!(
        h.app.download(VariantKey::Sd, ImageFormat::Original).await,
        Err(AppError::NoCurrentRecord)
    ));
    assert!(matches!(h.app.analyze().await, Err(AppError::NoCurrentRecord)));
}

#[tokio::test]
async fn test_analyze_without_key_is_disabled() {
    let cdn = MockServer::start().await;
    let mut h = harness(&cdn, None).await;

    h.app.lookup(RICK, |_| {}).await.unwrap();
    assert!(!h.app.analysis_enabled());
    assert_eq!(h.app.analyze().await.unwrap(), AnalysisOutcome::Disabled);
}

#[tokio::test]
async fn test_analyze_sends_best_variant() {
    let cdn = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/vi/dQw4w9WgXcQ/maxresdefault.jpg"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("content-type", "image/jpeg")
                .set_body_bytes(sample_jpeg()),
        )
        .mount(&cdn)
        .await;

    let gemini = MockServer::start().await;
    let text = json!({
        "score": 91,
        "strengths": ["a"],
        "weaknesses": ["b"],
        "suggestions": ["c"],
        "summary": "Great."
    })
    .to_string();
    Mock::given(method("POST"))
        .and(path_regex(r"^/v1beta/models/.+:generateContent$"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "candidates": [{ "content": { "parts": [{ "text": text }] } }]
        })))
        .expect(1)
        .mount(&gemini)
        .await;

    let client = AnalysisClient::new(AnalysisConfig::new("k").with_base_url(gemini.uri())).unwrap();
    let mut h = harness(&cdn, Some(client)).await;

    h.app.lookup(RICK, |_| {}).await.unwrap();
    match h.app.analyze().await.unwrap() {
        AnalysisOutcome::Completed(result) => assert_eq!(result.score, 91),
        other => panic!("expected analysis, got {:?}", other),
    }
}

#[tokio::test]
async fn test_analysis_failure_leaves_lookup_intact() {
    let cdn = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(sample_jpeg()))
        .mount(&cdn)
        .await;

    let gemini = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&gemini)
        .await;

    let client = AnalysisClient::new(AnalysisConfig::new("k").with_base_url(gemini.uri())).unwrap();
    let mut h = harness(&cdn, Some(client)).await;

    h.app.lookup(RICK, |_| {}).await.unwrap();
    assert!(matches!(h.app.analyze().await, Err(AppError::Ai(_))));
    assert_eq!(h.app.status(), AppState::Ready);
    assert!(h.app.current().is_some());
}

#[tokio::test]
async fn test_probe_variants_reports_missing_maxres() {
    let cdn = MockServer::start().await;
    Mock::given(method("HEAD"))
        .and(path("/vi/dQw4w9WgXcQ/maxresdefault.jpg"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&cdn)
        .await;
    Mock::given(method("HEAD"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&cdn)
        .await;
    let mut h = harness(&cdn, None).await;

    h.app.lookup(RICK, |_| {}).await.unwrap();
    let probes = h.app.probe_variants().await.unwrap();

    assert_eq!(probes.len(), 5);
    assert_eq!(probes[0], (VariantKey::MaxRes, VariantAvailability::Unavailable(404)));
    assert!(probes[1..].iter().all(|(_, a)| a.is_available()));
}

#[tokio::test]
async fn test_reselect_and_clear_history() {
    let cdn = MockServer::start().await;
    let mut h = harness(&cdn, None).await;

    h.app.lookup(RICK, |_| {}).await.unwrap();
    h.app.lookup("https://youtu.be/9bZkp7q19f0", |_| {}).await.unwrap();

    let record = h.app.reselect(1, |_| {}).await.unwrap();
    assert_eq!(record.id.as_str(), "dQw4w9WgXcQ");
    assert_eq!(h.app.history()[0].id.as_str(), "dQw4w9WgXcQ");

    assert!(matches!(h.app.reselect(7, |_| {}).await, Err(AppError::HistoryIndex(7))));

    h.app.clear_history().await;
    assert!(h.app.history().is_empty());
    assert!(h.store.get(HISTORY_KEY).await.unwrap().is_none());
}

#[tokio::test]
async fn test_reset_returns_to_idle() {
    let cdn = MockServer::start().await;
    let mut h = harness(&cdn, None).await;

    h.app.lookup(RICK, |_| {}).await.unwrap();
    h.app.reset();

    assert_eq!(h.app.status(), AppState::Idle);
    assert!(h.app.current().is_none());
    assert_eq!(h.app.history().len(), 1);
}
