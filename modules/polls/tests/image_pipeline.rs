//! Image ingestion against a mocked compression service and image host.

use std::sync::Arc;
use std::time::Duration;

use httpmock::prelude::*;
use modkit::TracedClient;
use serde_json::json;
use url::Url;

use polls::domain::ports::{ImageError, ImageIngestor};
use polls::infra::images::{build_ingestor, ImagePipeline, PassthroughOptimizer, TinifyOptimizer};
use polls::PollsConfig;

fn tinify_pipeline(server: &MockServer, client: TracedClient) -> ImagePipeline {
    let base = Url::parse(&server.base_url()).unwrap();
    let optimizer = TinifyOptimizer::new(client.clone(), base, "test-key".into());
    ImagePipeline::new(client, Arc::new(optimizer))
}

#[tokio::test]
async fn inline_image_is_shrunk_and_downloaded() {
    let server = MockServer::start();
    let shrink = server.mock(|when, then| {
        when.method(POST)
            .path("/shrink")
            .header("authorization", "Basic YXBpOnRlc3Qta2V5")
            .body("original image bytes");
        then.status(201)
            .json_body(json!({"output": {"url": server.url("/output/abc")}}));
    });
    let download = server.mock(|when, then| {
        when.method(GET).path("/output/abc");
        then.status(200).body("tiny");
    });

    let pipeline = tinify_pipeline(&server, TracedClient::default());
    let image = pipeline
        .ingest("data:image/png;base64,b3JpZ2luYWwgaW1hZ2UgYnl0ZXM=")
        .await
        .unwrap();

    shrink.assert();
    download.assert();
    assert_eq!(image.encoded, "dGlueQ==");
    assert_eq!(image.original_size, 20);
    assert_eq!(image.optimized_size, 4);
}

#[tokio::test]
async fn remote_image_is_fetched() {
    let server = MockServer::start();
    let fetch = server.mock(|when, then| {
        when.method(GET).path("/cat.png");
        then.status(200).body("hello");
    });

    let pipeline = ImagePipeline::new(TracedClient::default(), Arc::new(PassthroughOptimizer));
    let image = pipeline.ingest(&server.url("/cat.png")).await.unwrap();

    fetch.assert();
    assert_eq!(image.encoded, "aGVsbG8=");
    assert_eq!(image.original_size, 5);
}

#[tokio::test]
async fn missing_remote_image_is_a_fetch_failure() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/gone.png");
        then.status(404);
    });

    let pipeline = ImagePipeline::new(TracedClient::default(), Arc::new(PassthroughOptimizer));
    let err = pipeline.ingest(&server.url("/gone.png")).await.unwrap_err();
    assert!(matches!(err, ImageError::FetchFailed(_)));
}

#[tokio::test]
async fn optimizer_error_status_aborts() {
    let server = MockServer::start();
    let shrink = server.mock(|when, then| {
        when.method(POST).path("/shrink");
        then.status(500);
    });

    let pipeline = tinify_pipeline(&server, TracedClient::default());
    let err = pipeline.ingest("aGVsbG8=").await.unwrap_err();

    shrink.assert();
    assert!(matches!(err, ImageError::OptimizationFailed(_)));
}

#[tokio::test]
async fn slow_optimizer_times_out() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(POST).path("/shrink");
        then.status(201).delay(Duration::from_millis(500));
    });

    let client = TracedClient::with_timeout(Duration::from_millis(50)).unwrap();
    let pipeline = tinify_pipeline(&server, client);
    let err = pipeline.ingest("aGVsbG8=").await.unwrap_err();
    assert!(matches!(err, ImageError::OptimizationFailed(_)));
}

#[tokio::test]
async fn oversized_remote_image_is_a_fetch_failure() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/huge.png");
        then.status(200).body(vec![0u8; 64]);
    });

    let pipeline = ImagePipeline::new(TracedClient::default(), Arc::new(PassthroughOptimizer))
        .with_max_bytes(16);
    let err = pipeline.ingest(&server.url("/huge.png")).await.unwrap_err();
    assert!(matches!(err, ImageError::FetchFailed(_)));

    let roomy = ImagePipeline::new(TracedClient::default(), Arc::new(PassthroughOptimizer))
        .with_max_bytes(64);
    let image = roomy.ingest(&server.url("/huge.png")).await.unwrap();
    assert_eq!(image.original_size, 64);
}

#[tokio::test]
async fn oversized_optimizer_output_is_rejected() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(POST).path("/shrink");
        then.status(201)
            .json_body(json!({"output": {"url": server.url("/output/big")}}));
    });
    server.mock(|when, then| {
        when.method(GET).path("/output/big");
        then.status(200).body(vec![1u8; 64]);
    });

    let base = Url::parse(&server.base_url()).unwrap();
    let client = TracedClient::default();
    let optimizer = TinifyOptimizer::new(client.clone(), base, "test-key".into()).with_max_bytes(16);
    let pipeline = ImagePipeline::new(client, Arc::new(optimizer));

    let err = pipeline.ingest("aGVsbG8=").await.unwrap_err();
    assert!(matches!(err, ImageError::OptimizationFailed(_)));
}

#[tokio::test]
async fn bad_payloads_are_rejected_before_any_call() {
    let pipeline = ImagePipeline::new(TracedClient::default(), Arc::new(PassthroughOptimizer));

    assert_eq!(pipeline.ingest("  ").await.unwrap_err(), ImageError::Empty);
    assert_eq!(
        pipeline.ingest("data:image/png;base64,").await.unwrap_err(),
        ImageError::Empty
    );
    assert!(matches!(
        pipeline.ingest("%%%").await.unwrap_err(),
        ImageError::InvalidPayload(_)
    ));
}

#[tokio::test]
async fn ingestor_without_key_stores_images_unchanged() {
    let cfg = PollsConfig::default();
    let ingestor = build_ingestor(&cfg).unwrap();

    let image = ingestor.ingest("aGVsbG8=").await.unwrap();
    assert_eq!(image.encoded, "aGVsbG8=");
    assert_eq!(image.original_size, image.optimized_size);
}

#[tokio::test]
async fn ingestor_with_bad_base_url_fails_to_build() {
    let cfg = PollsConfig {
        optimizer_api_key: "k".into(),
        optimizer_base_url: "not a url".into(),
        ..Default::default()
    };
    assert!(build_ingestor(&cfg).is_err());
}
