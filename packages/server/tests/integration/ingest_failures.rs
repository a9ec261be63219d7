use std::sync::Arc;

use common::storage::ObjectStore;
use gallery_server::services::GalleryError;
use gallery_server::services::image::UploadedFile;

use crate::common::{FlakyStore, TestApp, jpeg_bytes, routes};

async fn spawn_with_failing_derivatives() -> TestApp {
    TestApp::spawn_with_store(|root| async move {
        Arc::new(FlakyStore::new(root).await.failing_puts("gallery/compressed"))
            as Arc<dyn ObjectStore>
    })
    .await
}

#[tokio::test]
async fn failed_derivative_write_removes_the_original() {
    let app = spawn_with_failing_derivatives().await;
    let token = app.admin_token().await;

    let res = app
        .upload_image(
            Some(("storm.jpg", jpeg_bytes(800, 600), "image/jpeg")),
            Some("weather"),
            &token,
        )
        .await;

    assert_eq!(res.status, 500);
    assert_eq!(res.body["code"], "STORAGE_WRITE_FAILED");
    assert_eq!(res.body["message"], "An unexpected error occurred");
    assert!(!app.object_path("gallery/images/storm.jpg").exists());
    assert_eq!(app.stored_object_count(), 0);

    let list = app.get_without_token(routes::IMAGES).await;
    assert!(list.body["images"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn failed_metadata_write_removes_both_objects() {
    let app = TestApp::spawn().await;
    let token = app.admin_token().await;
    app.break_image_inserts().await;

    let res = app
        .upload_image(
            Some(("fog.jpg", jpeg_bytes(640, 480), "image/jpeg")),
            Some("weather"),
            &token,
        )
        .await;

    assert_eq!(res.status, 500);
    assert_eq!(res.body["code"], "METADATA_WRITE_FAILED");
    assert_eq!(app.stored_object_count(), 0);
}

#[tokio::test]
async fn failed_cleanup_is_reported_alongside_the_metadata_error() {
    let app = TestApp::spawn_with_store(|root| async move {
        Arc::new(FlakyStore::new(root).await.failing_deletes("gallery/", usize::MAX))
            as Arc<dyn ObjectStore>
    })
    .await;
    app.break_image_inserts().await;

    let upload = UploadedFile {
        name: "hail.jpg".to_string(),
        bytes: jpeg_bytes(320, 240),
        content_type: Some("image/jpeg".to_string()),
    };
    let err = app
        .gallery
        .ingest_image(Some(upload), Some("weather".to_string()))
        .await
        .expect_err("insert should fail");

    match err {
        GalleryError::MetadataWriteFailed { compensation, .. } => {
            assert_eq!(compensation.len(), 2);
        }
        other => panic!("expected MetadataWriteFailed, got {other:?}"),
    }
    // Nothing could be cleaned up.
    assert_eq!(app.stored_object_count(), 2);
}

#[tokio::test]
async fn upload_succeeds_again_after_a_failed_attempt() {
    let app = TestApp::spawn().await;
    let token = app.admin_token().await;
    app.break_image_inserts().await;

    let failed = app
        .upload_image(
            Some(("retry.jpg", jpeg_bytes(64, 64), "image/jpeg")),
            Some("misc"),
            &token,
        )
        .await;
    assert_eq!(failed.status, 500);

    app.drop_trigger("fail_image_insert").await;

    let res = app
        .upload_image(
            Some(("retry.jpg", jpeg_bytes(64, 64), "image/jpeg")),
            Some("misc"),
            &token,
        )
        .await;
    assert_eq!(res.status, 201, "{}", res.text);
    assert_eq!(app.stored_object_count(), 2);
}
