//! End-to-end tests for the single-image pipeline.

mod common;

use std::time::Duration;

use common::*;
use image::ImageFormat;
use lector_core::mock::MockRecognizer;
use lector_core::{PipelineConfig, RawImageSource, RecognitionOptions};

#[tokio::test]
async fn recognizes_base64_png() {
    let outcome = mock_pipeline()
        .run(
            RawImageSource::base64(white_png_base64(10, 10)),
            &RecognitionOptions::default(),
        )
        .await;

    let data = outcome.data().expect("success outcome");
    assert_eq!((data.width, data.height), (10, 10));
    assert_eq!(data.content, "");
}

#[tokio::test]
async fn recognizes_inline_jpeg_bytes() {
    let bytes = white_image(12, 8, ImageFormat::Jpeg);
    let outcome = mock_pipeline()
        .run(RawImageSource::bytes(bytes), &RecognitionOptions::default())
        .await;

    let data = outcome.data().expect("success outcome");
    assert_eq!((data.width, data.height), (12, 8));
}

#[tokio::test]
async fn fetches_allow_listed_url() {
    let addr = spawn_image_server().await;
    let pipeline = pipeline_with(
        &loopback_config(),
        std::sync::Arc::new(MockRecognizer::with_text("hello")),
    );

    let outcome = pipeline
        .run(
            RawImageSource::url(format!("http://{addr}/white.png")),
            &RecognitionOptions::default(),
        )
        .await;

    let data = outcome.data().expect("success outcome");
    assert_eq!((data.width, data.height), (10, 10));
    assert_eq!(data.content, "hello");
}

#[tokio::test]
async fn follows_redirects_within_allow_list() {
    let addr = spawn_image_server().await;
    let outcome = mock_pipeline()
        .run(
            RawImageSource::url(format!("http://{addr}/redirect-local")),
            &RecognitionOptions::default(),
        )
        .await;

    assert!(outcome.is_success(), "{outcome:?}");
}

#[tokio::test]
async fn rejects_redirect_outside_allow_list() {
    let addr = spawn_image_server().await;
    let outcome = mock_pipeline()
        .run(
            RawImageSource::url(format!("http://{addr}/redirect-away")),
            &RecognitionOptions::default(),
        )
        .await;

    assert_eq!(outcome.error(), Some("Domain not allowed"));
}

#[tokio::test]
async fn rejects_host_outside_allow_list() {
    let outcome = mock_pipeline()
        .run(
            RawImageSource::url("https://evil.example/x.png"),
            &RecognitionOptions::default(),
        )
        .await;

    assert_eq!(outcome.error(), Some("Domain not allowed"));
}

#[tokio::test]
async fn reports_remote_status() {
    let addr = spawn_image_server().await;
    let outcome = mock_pipeline()
        .run(
            RawImageSource::url(format!("http://{addr}/missing.png")),
            &RecognitionOptions::default(),
        )
        .await;

    assert_eq!(outcome.error(), Some("HTTP error! status: 404"));
}

#[tokio::test]
async fn rejects_oversized_remote_image() {
    let addr = spawn_image_server().await;
    let config = PipelineConfig {
        max_image_size: 64,
        ..loopback_config()
    };
    let pipeline = pipeline_with(&config, std::sync::Arc::new(MockRecognizer::default()));

    let outcome = pipeline
        .run(
            RawImageSource::url(format!("http://{addr}/large.png")),
            &RecognitionOptions::default(),
        )
        .await;

    assert_eq!(outcome.error(), Some("Image exceeds maximum size"));
}

#[tokio::test]
async fn unreachable_host_fails_to_fetch() {
    // Bind and drop a listener to get a port nothing listens on.
    let port = {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        listener.local_addr().unwrap().port()
    };
    let config = PipelineConfig {
        fetch_timeout: Duration::from_secs(2),
        ..loopback_config()
    };
    let pipeline = pipeline_with(&config, std::sync::Arc::new(MockRecognizer::default()));

    let outcome = pipeline
        .run(
            RawImageSource::url(format!("http://127.0.0.1:{port}/white.png")),
            &RecognitionOptions::default(),
        )
        .await;

    assert_eq!(outcome.error(), Some("Failed to fetch image"));
}

#[tokio::test]
async fn rejects_undecodable_bytes() {
    let outcome = mock_pipeline()
        .run(
            RawImageSource::bytes(b"plain text".to_vec()),
            &RecognitionOptions::default(),
        )
        .await;

    assert_eq!(outcome.error(), Some("Failed to process image"));
}

#[tokio::test]
async fn rejects_empty_source() {
    let outcome = mock_pipeline()
        .run(RawImageSource::default(), &RecognitionOptions::default())
        .await;

    assert_eq!(outcome.error(), Some("Invalid image source"));
}
