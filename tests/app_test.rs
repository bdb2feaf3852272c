//! App-level integration tests
//!
//! Drive the upload, catalog, developer and playback flows through [`App`]
//! against a mocked transcoding service and a headless player.

mod common;

use assert_matches::assert_matches;
use common::{upload_success, write_file, TestHarness};
use hlsdeck::app::NoticeKind;
use hlsdeck_common::{Error, SourceOrigin};
use hlsdeck_player::{HeadlessBackend, MediaSource, PlayerEvent};

fn set_sources(events: &[PlayerEvent]) -> Vec<String> {
    events
        .iter()
        .filter_map(|e| match e {
            PlayerEvent::SetSource(MediaSource { url, .. }) => Some(url.clone()),
            _ => None,
        })
        .collect()
}

#[tokio::test]
async fn test_upload_then_play() {
    let h = TestHarness::new().await;
    h.mount_upload(upload_success("abc")).await;

    let dir = tempfile::tempdir().unwrap();
    h.app.select_file(&write_file(&dir, "clip.mp4")).unwrap();

    let source = h.app.upload().await.unwrap();
    assert_eq!(source.video_id, "abc");
    assert!(h.app.upload_workflow().selected().is_none());

    let notice = h.app.notice().unwrap();
    assert_eq!(notice.kind, NoticeKind::Success);
    assert_eq!(notice.message, "Video uploaded and processed successfully!");

    assert_eq!(h.app.origin(), Some(SourceOrigin::Uploaded));
    let status = h.app.status().await.unwrap();
    assert_eq!(status.source, source);
    assert_eq!(status.quality, "Auto");
    assert_eq!(
        set_sources(&h.backend.events()),
        vec!["https://cdn.test/abc/master.m3u8"]
    );
}

#[tokio::test]
async fn test_upload_survives_player_failure() {
    let h = TestHarness::with_backend(HeadlessBackend::failing_ready(), common::identity()).await;
    h.mount_upload(upload_success("abc")).await;

    let dir = tempfile::tempdir().unwrap();
    h.app.select_file(&write_file(&dir, "clip.mp4")).unwrap();

    let source = h.app.upload().await.unwrap();
    assert_eq!(source.video_id, "abc");
    assert!(h.app.upload_workflow().selected().is_none());
    assert!(h.app.status().await.is_none());

    let notice = h.app.notice().unwrap();
    assert!(notice.is_error());
    assert!(notice.message.contains("abc"));
    assert!(notice.message.contains("stream could not be loaded"));
}

#[tokio::test]
async fn test_upload_without_identity_keeps_selection() {
    let h = TestHarness::with_identity(None).await;

    let dir = tempfile::tempdir().unwrap();
    h.app.select_file(&write_file(&dir, "clip.mov")).unwrap();

    let err = h.app.upload().await.unwrap_err();
    assert_matches!(err, Error::AuthRequired);
    assert!(h.app.upload_workflow().selected().is_some());
    assert_eq!(h.app.notice().unwrap().message, "Please sign in to continue");
    assert_eq!(h.backend.created(), 0);
}

#[tokio::test]
async fn test_rejected_file_sets_error_notice() {
    let h = TestHarness::new().await;

    let dir = tempfile::tempdir().unwrap();
    let err = h.app.select_file(&write_file(&dir, "notes.txt")).unwrap_err();
    assert_matches!(err, Error::LocalValidation(_));

    let notice = h.app.notice().unwrap();
    assert!(notice.is_error());
    assert_eq!(notice.message, "Please select a valid video file");
}

#[tokio::test]
async fn test_server_rejection_message_reaches_notice() {
    let h = TestHarness::new().await;
    h.mount_upload(serde_json::json!({"success": false, "message": "Unsupported codec"}))
        .await;

    let dir = tempfile::tempdir().unwrap();
    h.app.select_file(&write_file(&dir, "clip.mp4")).unwrap();

    let err = h.app.upload().await.unwrap_err();
    assert_matches!(err, Error::ServerRejected(_));
    assert_eq!(h.app.notice().unwrap().message, "Unsupported codec");
    assert!(h.app.status().await.is_none());
}

#[tokio::test]
async fn test_play_catalog_entry() {
    let h = TestHarness::new().await;
    h.mount_catalog(&[(
        "a",
        &["a/index-360p.m3u8", "a/master.m3u8", "a/index-720p.m3u8", "a/thumb.jpg"],
    )])
    .await;

    assert_eq!(h.app.refresh_catalog().await.unwrap(), 1);
    h.app.play_entry("a").await.unwrap();

    assert_eq!(h.app.origin(), Some(SourceOrigin::Catalog));
    assert_eq!(h.app.notice().unwrap().message, "Playing a");

    let source = h.app.active_source().await.unwrap();
    assert_eq!(source.master_url, "a/master.m3u8");
    let labels: Vec<&str> = source.variant_urls.labels().map(|l| l.as_str()).collect();
    assert_eq!(labels, vec!["360p", "720p"]);

    let player = h.app.player().await;
    let options: Vec<&str> = player
        .selector()
        .unwrap()
        .options()
        .iter()
        .map(|o| o.label.as_str())
        .collect();
    assert_eq!(options, vec!["Auto", "360p", "720p"]);
}

#[tokio::test]
async fn test_entry_without_playlist_does_not_play() {
    let h = TestHarness::new().await;
    h.mount_catalog(&[("a", &["a/thumb.jpg"])]).await;
    h.app.refresh_catalog().await.unwrap();

    let err = h.app.play_entry("a").await.unwrap_err();
    assert_matches!(err, Error::NotFoundInCatalog(ref id) if id == "a");
    assert_eq!(h.app.notice().unwrap().message, "No playable stream found for a");
    assert!(h.app.status().await.is_none());
    assert_eq!(h.backend.created(), 0);
}

#[tokio::test]
async fn test_refresh_requires_identity() {
    let h = TestHarness::with_identity(None).await;

    let err = h.app.refresh_catalog().await.unwrap_err();
    assert_matches!(err, Error::AuthRequired);
    assert!(h.app.catalog().is_empty());
}

#[tokio::test]
async fn test_deleting_active_video_stops_playback() {
    let h = TestHarness::new().await;
    h.mount_catalog(&[("a", &["a/master.m3u8"]), ("b", &["b/master.m3u8"])])
        .await;
    h.mount_delete_ok("a").await;

    h.app.refresh_catalog().await.unwrap();
    h.app.play_entry("a").await.unwrap();
    assert_eq!(h.backend.live(), 1);

    h.app.delete_entry("a").await.unwrap();

    assert!(h.app.status().await.is_none());
    assert_eq!(h.app.origin(), None);
    assert_eq!(h.backend.live(), 0);
    assert_eq!(h.app.notice().unwrap().message, "Video deleted successfully");
    assert!(h.app.catalog().get("a").is_none());
    assert!(h.app.catalog().get("b").is_some());
}

#[tokio::test]
async fn test_deleting_other_video_keeps_playback() {
    let h = TestHarness::new().await;
    h.mount_catalog(&[("a", &["a/master.m3u8"]), ("b", &["b/master.m3u8"])])
        .await;
    h.mount_delete_ok("b").await;

    h.app.refresh_catalog().await.unwrap();
    let session = h.app.play_entry("a").await.unwrap();

    h.app.delete_entry("b").await.unwrap();

    let status = h.app.status().await.unwrap();
    assert_eq!(status.session_id, session);
    assert_eq!(status.source.video_id, "a");
    assert_eq!(h.backend.live(), 1);
}

#[tokio::test]
async fn test_pasted_invalid_json_never_reaches_player() {
    let h = TestHarness::new().await;
    h.app.open_dev_panel();

    let err = h.app.load_pasted("{\"success\": tru").await.unwrap_err();
    assert_matches!(err, Error::LocalValidation(_));
    assert_eq!(h.app.notice().unwrap().message, "Invalid JSON format");
    assert!(h.app.is_dev_panel_open());
    assert_eq!(h.backend.created(), 0);

    let err = h
        .app
        .load_pasted(r#"{"success": true, "data": {"videoId": "x"}}"#)
        .await
        .unwrap_err();
    assert_matches!(err, Error::LocalValidation(_));
    assert_eq!(h.app.notice().unwrap().message, "Invalid response format");
    assert_eq!(h.backend.created(), 0);
}

#[tokio::test]
async fn test_pasted_response_plays_and_closes_panel() {
    let h = TestHarness::new().await;
    h.app.open_dev_panel();

    let text = upload_success("pasted").to_string();
    h.app.load_pasted(&text).await.unwrap();

    assert!(!h.app.is_dev_panel_open());
    assert_eq!(h.app.origin(), Some(SourceOrigin::Pasted));
    assert_eq!(h.app.notice().unwrap().message, "Response loaded successfully!");
    assert_eq!(h.app.active_source().await.unwrap().video_id, "pasted");
}

#[tokio::test]
async fn test_switch_quality_keeps_position_and_play_state() {
    let h = TestHarness::new().await;
    h.app.load_sample().await.unwrap();
    assert_eq!(h.app.notice().unwrap().message, "Test video loaded successfully!");

    {
        let mut player = h.app.player().await;
        player.play().unwrap();
        player.seek(42.0).unwrap();
    }

    assert_eq!(h.app.switch_quality("720p").await.unwrap(), "720p");

    let status = h.app.status().await.unwrap();
    assert_eq!(status.quality, "720p");
    assert!((status.position - 42.0).abs() < 1e-9);
    assert!(!status.paused);

    let sources = set_sources(&h.backend.events());
    assert_eq!(sources.len(), 2);
    assert!(sources[1].ends_with("tears-of-steel-720p.ism/.m3u8"));

    assert_eq!(h.app.switch_quality("auto").await.unwrap(), "Auto");
    let status = h.app.status().await.unwrap();
    assert_eq!(status.source.master_url, sources[0]);
}

#[tokio::test]
async fn test_unknown_quality_leaves_stream_alone() {
    let h = TestHarness::new().await;
    h.app.load_sample().await.unwrap();

    let err = h.app.switch_quality("4k").await.unwrap_err();
    assert_matches!(err, Error::LocalValidation(_));
    assert_eq!(set_sources(&h.backend.events()).len(), 1);
    assert_eq!(h.app.status().await.unwrap().quality, "Auto");
}

#[tokio::test]
async fn test_new_source_replaces_previous_session() {
    let h = TestHarness::new().await;

    let first = h.app.load_sample().await.unwrap();
    let second = h
        .app
        .load_pasted(&upload_success("next").to_string())
        .await
        .unwrap();

    assert_ne!(first, second);
    assert_eq!(h.backend.created(), 2);
    assert_eq!(h.backend.live(), 1);
    assert_eq!(h.app.origin(), Some(SourceOrigin::Pasted));
}

#[tokio::test]
async fn test_player_failure_clears_session() {
    let h = TestHarness::with_backend(HeadlessBackend::failing_ready(), common::identity()).await;

    let err = h.app.load_sample().await.unwrap_err();
    assert_matches!(err, Error::Player(_));
    assert!(h.app.status().await.is_none());
    assert_eq!(h.app.origin(), None);
    assert_eq!(h.backend.live(), 0);
    assert!(h.app.notice().unwrap().is_error());
}

#[tokio::test]
async fn test_notice_holds_only_latest_outcome() {
    let h = TestHarness::new().await;

    h.app.load_pasted("").await.unwrap_err();
    assert!(h.app.notice().unwrap().is_error());

    h.app.load_sample().await.unwrap();
    let notice = h.app.notice().unwrap();
    assert_eq!(notice.kind, NoticeKind::Success);

    h.app.clear_video().await;
    assert!(h.app.notice().is_none());
    assert!(h.app.status().await.is_none());
}
