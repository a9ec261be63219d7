use image::GenericImageView;

use crate::common::{TestApp, jpeg_bytes, routes};

mod upload {
    use super::*;

    #[tokio::test]
    async fn admin_can_upload_a_jpeg() {
        let app = TestApp::spawn().await;
        let token = app.admin_token().await;

        let res = app
            .upload_image(
                Some(("sunset.jpg", jpeg_bytes(1200, 800), "image/jpeg")),
                Some("  Landscapes "),
                &token,
            )
            .await;

        assert_eq!(res.status, 201, "{}", res.text);
        assert_eq!(res.body["filename"], "sunset.jpg");
        assert_eq!(res.body["category"], "landscapes");
        assert_eq!(res.body["image_url"], "/media/gallery/images/sunset.jpg");
        assert_eq!(
            res.body["compressed_image_url"],
            "/media/gallery/compressed/comp_sunset.jpg"
        );
        assert!(app.object_path("gallery/images/sunset.jpg").is_file());
        assert!(app.object_path("gallery/compressed/comp_sunset.jpg").is_file());
    }

    #[tokio::test]
    async fn stored_original_is_byte_identical() {
        let app = TestApp::spawn().await;
        let token = app.admin_token().await;
        let original = jpeg_bytes(320, 240);

        let res = app
            .upload_image(
                Some(("harbour.jpg", original.clone(), "image/jpeg")),
                Some("cities"),
                &token,
            )
            .await;
        assert_eq!(res.status, 201, "{}", res.text);

        let (status, served) = app.get_bytes("/media/gallery/images/harbour.jpg").await;
        assert_eq!(status, 200);
        assert_eq!(served, original);
    }

    #[tokio::test]
    async fn derivative_fits_the_default_box() {
        let app = TestApp::spawn().await;
        let token = app.admin_token().await;

        let res = app
            .upload_image(
                Some(("panorama.jpg", jpeg_bytes(1800, 900), "image/jpeg")),
                Some("landscapes"),
                &token,
            )
            .await;
        assert_eq!(res.status, 201, "{}", res.text);

        let url = res.body["compressed_image_url"].as_str().unwrap().to_string();
        let (status, bytes) = app.get_bytes(&url).await;
        assert_eq!(status, 200);

        let derivative = image::load_from_memory(&bytes).expect("derivative should decode");
        assert_eq!(derivative.dimensions(), (600, 300));
    }

    #[tokio::test]
    async fn small_images_are_not_upscaled() {
        let app = TestApp::spawn().await;
        let token = app.admin_token().await;

        let res = app
            .upload_image(
                Some(("thumb.jpg", jpeg_bytes(200, 150), "image/jpeg")),
                Some("misc"),
                &token,
            )
            .await;
        assert_eq!(res.status, 201, "{}", res.text);

        let bytes = std::fs::read(app.object_path("gallery/compressed/comp_thumb.jpg")).unwrap();
        let derivative = image::load_from_memory(&bytes).unwrap();
        assert_eq!(derivative.dimensions(), (200, 150));
    }

    #[tokio::test]
    async fn missing_file_is_rejected() {
        let app = TestApp::spawn().await;
        let token = app.admin_token().await;

        let res = app.upload_image(None, Some("landscapes"), &token).await;

        assert_eq!(res.status, 400);
        assert_eq!(res.body["code"], "MISSING_FILE");
    }

    #[tokio::test]
    async fn missing_category_is_rejected() {
        let app = TestApp::spawn().await;
        let token = app.admin_token().await;

        let res = app
            .upload_image(Some(("a.jpg", jpeg_bytes(10, 10), "image/jpeg")), None, &token)
            .await;
        assert_eq!(res.status, 400);
        assert_eq!(res.body["code"], "MISSING_CATEGORY");

        let blank = app
            .upload_image(
                Some(("a.jpg", jpeg_bytes(10, 10), "image/jpeg")),
                Some("   "),
                &token,
            )
            .await;
        assert_eq!(blank.status, 400);
        assert_eq!(blank.body["code"], "MISSING_CATEGORY");
        assert_eq!(app.stored_object_count(), 0);
    }

    #[tokio::test]
    async fn non_jpeg_is_rejected() {
        let app = TestApp::spawn().await;
        let token = app.admin_token().await;

        let res = app
            .upload_image(
                Some(("diagram.png", b"\x89PNG\r\n\x1a\n".to_vec(), "image/png")),
                Some("diagrams"),
                &token,
            )
            .await;

        assert_eq!(res.status, 400);
        assert_eq!(res.body["code"], "INVALID_FORMAT");
        assert_eq!(app.stored_object_count(), 0);
    }

    #[tokio::test]
    async fn undecodable_jpeg_is_unprocessable() {
        let app = TestApp::spawn().await;
        let token = app.admin_token().await;

        let res = app
            .upload_image(
                Some(("broken.jpg", b"definitely not a jpeg".to_vec(), "image/jpeg")),
                Some("misc"),
                &token,
            )
            .await;

        assert_eq!(res.status, 422);
        assert_eq!(res.body["code"], "PROCESSING_FAILED");
        assert_eq!(app.stored_object_count(), 0);
    }

    #[tokio::test]
    async fn hidden_filename_is_rejected() {
        let app = TestApp::spawn().await;
        let token = app.admin_token().await;

        let res = app
            .upload_image(
                Some((".secret.jpg", jpeg_bytes(10, 10), "image/jpeg")),
                Some("misc"),
                &token,
            )
            .await;

        assert_eq!(res.status, 400);
        assert_eq!(res.body["code"], "INVALID_FILENAME");
    }

    #[tokio::test]
    async fn duplicate_filename_is_a_conflict() {
        let app = TestApp::spawn().await;
        let token = app.admin_token().await;
        app.create_image(&token, "cat.jpg", "animals").await;

        let res = app
            .upload_image(
                Some(("cat.jpg", jpeg_bytes(80, 60), "image/jpeg")),
                Some("pets"),
                &token,
            )
            .await;

        assert_eq!(res.status, 409);
        assert_eq!(res.body["code"], "DUPLICATE_FILENAME");
        assert_eq!(app.stored_object_count(), 2);

        // The first upload is untouched.
        let list = app.get_without_token(routes::IMAGES).await;
        let images = list.body["images"].as_array().unwrap();
        assert_eq!(images.len(), 1);
        assert_eq!(images[0]["category"], "animals");
    }

    #[tokio::test]
    async fn regular_user_cannot_upload() {
        let app = TestApp::spawn().await;
        let token = app
            .create_authenticated_user("viewer@example.com", "securepass")
            .await;

        let res = app
            .upload_image(
                Some(("cat.jpg", jpeg_bytes(10, 10), "image/jpeg")),
                Some("animals"),
                &token,
            )
            .await;

        assert_eq!(res.status, 403);
        assert_eq!(app.stored_object_count(), 0);
    }
}

mod listing {
    use super::*;

    #[tokio::test]
    async fn images_are_listed_newest_first_with_categories() {
        let app = TestApp::spawn().await;
        let token = app.admin_token().await;
        app.create_category(&token, "animals").await;
        app.create_image(&token, "first.jpg", "animals").await;
        app.create_image(&token, "second.jpg", "animals").await;

        let res = app.get_without_token(routes::IMAGES).await;

        assert_eq!(res.status, 200);
        let images = res.body["images"].as_array().unwrap();
        assert_eq!(images.len(), 2);
        assert_eq!(images[0]["filename"], "second.jpg");
        assert_eq!(images[1]["filename"], "first.jpg");

        let categories = res.body["categories"].as_array().unwrap();
        assert_eq!(categories.len(), 1);
        assert_eq!(categories[0]["title"], "animals");
    }

    #[tokio::test]
    async fn category_lookup_is_case_insensitive() {
        let app = TestApp::spawn().await;
        let token = app.admin_token().await;
        app.create_image(&token, "owl.jpg", "Birds").await;
        app.create_image(&token, "fox.jpg", "mammals").await;

        let res = app
            .get_without_token(&routes::images_in_category("BIRDS"))
            .await;

        assert_eq!(res.status, 200);
        let images = res.body["images"].as_array().unwrap();
        assert_eq!(images.len(), 1);
        assert_eq!(images[0]["filename"], "owl.jpg");
    }

    #[tokio::test]
    async fn unknown_category_yields_empty_list() {
        let app = TestApp::spawn().await;

        let res = app
            .get_without_token(&routes::images_in_category("nothing"))
            .await;

        assert_eq!(res.status, 200);
        assert!(res.body["images"].as_array().unwrap().is_empty());
    }

    #[tokio::test]
    async fn get_image_by_id() {
        let app = TestApp::spawn().await;
        let token = app.admin_token().await;
        let id = app.create_image(&token, "lake.jpg", "landscapes").await;

        let res = app.get_without_token(&routes::image(id)).await;

        assert_eq!(res.status, 200);
        assert_eq!(res.body["filename"], "lake.jpg");

        let missing = app.get_without_token(&routes::image(id + 100)).await;
        assert_eq!(missing.status, 404);
        assert_eq!(missing.body["code"], "NOT_FOUND");
    }

    #[tokio::test]
    async fn non_numeric_id_is_a_validation_error() {
        let app = TestApp::spawn().await;

        let res = app.get_without_token("/api/v1/images/abc").await;

        assert_eq!(res.status, 400);
        assert_eq!(res.body["code"], "VALIDATION_ERROR");
    }
}

mod deletion {
    use super::*;

    #[tokio::test]
    async fn delete_removes_objects_and_record() {
        let app = TestApp::spawn().await;
        let token = app.admin_token().await;
        let id = app.create_image(&token, "river.jpg", "landscapes").await;
        assert_eq!(app.stored_object_count(), 2);

        let res = app.delete_with_token(&routes::image(id), &token).await;

        assert_eq!(res.status, 200);
        assert_eq!(res.body["filename"], "river.jpg");
        assert_eq!(app.stored_object_count(), 0);

        let gone = app.get_without_token(&routes::image(id)).await;
        assert_eq!(gone.status, 404);
    }

    #[tokio::test]
    async fn deleted_filename_can_be_reused() {
        let app = TestApp::spawn().await;
        let token = app.admin_token().await;
        let id = app.create_image(&token, "reuse.jpg", "misc").await;
        app.delete_with_token(&routes::image(id), &token).await;

        let res = app
            .upload_image(
                Some(("reuse.jpg", jpeg_bytes(40, 40), "image/jpeg")),
                Some("misc"),
                &token,
            )
            .await;

        assert_eq!(res.status, 201, "{}", res.text);
    }

    #[tokio::test]
    async fn deleting_unknown_image_is_not_found() {
        let app = TestApp::spawn().await;
        let token = app.admin_token().await;

        let res = app.delete_with_token(&routes::image(999), &token).await;

        assert_eq!(res.status, 404);
        assert_eq!(res.body["code"], "NOT_FOUND");
    }

    #[tokio::test]
    async fn already_missing_object_does_not_block_delete() {
        let app = TestApp::spawn().await;
        let token = app.admin_token().await;
        let id = app.create_image(&token, "ghost.jpg", "misc").await;
        std::fs::remove_file(app.object_path("gallery/images/ghost.jpg")).unwrap();

        let res = app.delete_with_token(&routes::image(id), &token).await;

        assert_eq!(res.status, 200, "{}", res.text);
        assert_eq!(app.stored_object_count(), 0);

        let gone = app.get_without_token(&routes::image(id)).await;
        assert_eq!(gone.status, 404);
    }
}
