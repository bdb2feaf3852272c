//! Shared test harness for integration tests.
//!
//! Provides [`TestHarness`], which wires an [`App`] to a wiremock server
//! standing in for the transcoding service and to a [`HeadlessBackend`]
//! whose recorded events the tests inspect.

#![allow(dead_code)]

use std::path::PathBuf;
use std::sync::Arc;

use hlsdeck::api::Identity;
use hlsdeck::app::App;
use hlsdeck::config::Config;
use hlsdeck_player::{HeadlessBackend, PlayerController};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

pub const TOKEN: &str = "test-token";

pub struct TestHarness {
    pub app: App,
    pub backend: Arc<HeadlessBackend>,
    pub server: MockServer,
}

impl TestHarness {
    /// Harness with a signed-in identity.
    pub async fn new() -> Self {
        Self::with_identity(identity()).await
    }

    pub async fn with_identity(identity: Option<Identity>) -> Self {
        Self::with_backend(HeadlessBackend::new(), identity).await
    }

    pub async fn with_backend(backend: HeadlessBackend, identity: Option<Identity>) -> Self {
        let server = MockServer::start().await;

        let mut config = Config::default();
        config.api.base_url = server.uri();
        config.api.timeout_secs = 5;

        let backend = Arc::new(backend);
        let player = PlayerController::load(backend.clone())
            .await
            .expect("headless backend should load");

        Self {
            app: App::new(&config, player, identity),
            backend,
            server,
        }
    }

    /// Serve `videos` from the listing endpoint. Each item is
    /// `(folder, urls)`.
    pub async fn mount_catalog(&self, videos: &[(&str, &[&str])]) {
        let videos: Vec<_> = videos
            .iter()
            .map(|(folder, urls)| serde_json::json!({"folder": folder, "url": urls}))
            .collect();
        Mock::given(method("GET"))
            .and(path("/api/v1/videos/"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(serde_json::json!({"success": true, "videos": videos})),
            )
            .mount(&self.server)
            .await;
    }

    pub async fn mount_delete_ok(&self, id: &str) {
        Mock::given(method("GET"))
            .and(path(format!("/api/v1/videos/delete/{}", id)))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(serde_json::json!({"success": true})),
            )
            .mount(&self.server)
            .await;
    }

    pub async fn mount_upload(&self, body: serde_json::Value) {
        Mock::given(method("POST"))
            .and(path("/api/v1/videos/hls-upload"))
            .respond_with(ResponseTemplate::new(200).set_body_json(body))
            .mount(&self.server)
            .await;
    }
}

/// Upload response body carrying a source with 360p and 720p variants.
pub fn upload_success(video_id: &str) -> serde_json::Value {
    serde_json::json!({
        "success": true,
        "data": {
            "masterUrl": format!("https://cdn.test/{video_id}/master.m3u8"),
            "variantUrls": {
                "360p": format!("https://cdn.test/{video_id}/360p.m3u8"),
                "720p": format!("https://cdn.test/{video_id}/720p.m3u8"),
            },
            "videoId": video_id,
            "videoPath": format!("uploads/{video_id}"),
        }
    })
}

/// Write a small file named `name` into `dir`.
pub fn write_file(dir: &tempfile::TempDir, name: &str) -> PathBuf {
    let path = dir.path().join(name);
    std::fs::write(&path, b"not really a video").expect("failed to write test file");
    path
}

pub fn identity() -> Option<Identity> {
    Identity::new(TOKEN)
}
