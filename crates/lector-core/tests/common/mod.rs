#![allow(dead_code)]

use std::io::Cursor;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use axum::Router;
use axum::http::{StatusCode, header};
use axum::response::{IntoResponse, Redirect};
use axum::routing::get;
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use image::{ImageFormat, Rgb, RgbImage};
use lector_core::mock::MockRecognizer;
use lector_core::{PipelineConfig, RequestPipeline, TextRecognizer};
use tokio::net::TcpListener;

/// Encodes a solid white image.
pub fn white_image(width: u32, height: u32, format: ImageFormat) -> Vec<u8> {
    let image = RgbImage::from_pixel(width, height, Rgb([255, 255, 255]));
    let mut output = Cursor::new(Vec::new());
    image.write_to(&mut output, format).unwrap();
    output.into_inner()
}

pub fn white_png(width: u32, height: u32) -> Vec<u8> {
    white_image(width, height, ImageFormat::Png)
}

pub fn white_png_base64(width: u32, height: u32) -> String {
    STANDARD.encode(white_png(width, height))
}

/// Pipeline configuration that allows fetching from the loopback test server.
pub fn loopback_config() -> PipelineConfig {
    PipelineConfig {
        allowed_domains: vec!["127.0.0.1".into()],
        fetch_timeout: Duration::from_secs(5),
        ..Default::default()
    }
}

pub fn pipeline_with(config: &PipelineConfig, engine: Arc<dyn TextRecognizer>) -> RequestPipeline {
    RequestPipeline::from_config(config, engine).unwrap()
}

pub fn mock_pipeline() -> RequestPipeline {
    pipeline_with(&loopback_config(), Arc::new(MockRecognizer::default()))
}

/// Starts an image server on an ephemeral loopback port.
///
/// Routes:
/// - `/white.png` serves a 10x10 white PNG
/// - `/large.png` serves a 200x200 white PNG
/// - `/missing.png` answers 404
/// - `/redirect-local` redirects to `/white.png` on the same host
/// - `/redirect-away` redirects to `localhost`, which is not allow-listed
pub async fn spawn_image_server() -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    let app = Router::new()
        .route("/white.png", get(|| async { png_response(white_png(10, 10)) }))
        .route("/large.png", get(|| async { png_response(white_png(200, 200)) }))
        .route(
            "/missing.png",
            get(|| async { (StatusCode::NOT_FOUND, "not found") }),
        )
        .route(
            "/redirect-local",
            get(|| async { Redirect::temporary("/white.png") }),
        )
        .route(
            "/redirect-away",
            get(move || async move {
                Redirect::temporary(&format!("http://localhost:{}/white.png", addr.port()))
            }),
        );

    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    addr
}

fn png_response(body: Vec<u8>) -> impl IntoResponse {
    ([(header::CONTENT_TYPE, "image/png")], body)
}
