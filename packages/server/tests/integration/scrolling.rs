use serde_json::{Value, json};

use crate::common::{TestApp, routes};

fn filenames(entries: &Value) -> Vec<String> {
    entries
        .as_array()
        .unwrap()
        .iter()
        .map(|e| e["image"]["filename"].as_str().unwrap().to_string())
        .collect()
}

#[tokio::test]
async fn carousel_is_empty_initially() {
    let app = TestApp::spawn().await;

    let res = app.get_without_token(routes::SCROLLING_IMAGES).await;

    assert_eq!(res.status, 200);
    assert!(res.body.as_array().unwrap().is_empty());
}

#[tokio::test]
async fn replace_sets_the_order_given() {
    let app = TestApp::spawn().await;
    let token = app.admin_token().await;
    let a = app.create_image(&token, "a.jpg", "misc").await;
    let b = app.create_image(&token, "b.jpg", "misc").await;
    let c = app.create_image(&token, "c.jpg", "misc").await;

    let res = app
        .put_with_token(routes::SCROLLING_IMAGES, &json!({"image_ids": [c, a, b]}), &token)
        .await;
    assert_eq!(res.status, 200, "{}", res.text);
    assert_eq!(filenames(&res.body), vec!["c.jpg", "a.jpg", "b.jpg"]);

    let list = app.get_without_token(routes::SCROLLING_IMAGES).await;
    assert_eq!(filenames(&list.body), vec!["c.jpg", "a.jpg", "b.jpg"]);
    let orders: Vec<i64> = list
        .body
        .as_array()
        .unwrap()
        .iter()
        .map(|e| e["order"].as_i64().unwrap())
        .collect();
    assert_eq!(orders, vec![0, 1, 2]);
}

#[tokio::test]
async fn replace_discards_the_previous_carousel() {
    let app = TestApp::spawn().await;
    let token = app.admin_token().await;
    let a = app.create_image(&token, "a.jpg", "misc").await;
    let b = app.create_image(&token, "b.jpg", "misc").await;
    app.put_with_token(routes::SCROLLING_IMAGES, &json!({"image_ids": [a, b]}), &token)
        .await;

    let res = app
        .put_with_token(routes::SCROLLING_IMAGES, &json!({"image_ids": [b]}), &token)
        .await;
    assert_eq!(res.status, 200);

    let list = app.get_without_token(routes::SCROLLING_IMAGES).await;
    assert_eq!(filenames(&list.body), vec!["b.jpg"]);
    assert_eq!(list.body[0]["order"], 0);
}

#[tokio::test]
async fn empty_list_clears_the_carousel() {
    let app = TestApp::spawn().await;
    let token = app.admin_token().await;
    let a = app.create_image(&token, "a.jpg", "misc").await;
    app.put_with_token(routes::SCROLLING_IMAGES, &json!({"image_ids": [a]}), &token)
        .await;

    let res = app
        .put_with_token(routes::SCROLLING_IMAGES, &json!({"image_ids": []}), &token)
        .await;
    assert_eq!(res.status, 200);

    let list = app.get_without_token(routes::SCROLLING_IMAGES).await;
    assert!(list.body.as_array().unwrap().is_empty());
}

#[tokio::test]
async fn unknown_image_leaves_the_carousel_unchanged() {
    let app = TestApp::spawn().await;
    let token = app.admin_token().await;
    let a = app.create_image(&token, "a.jpg", "misc").await;
    let b = app.create_image(&token, "b.jpg", "misc").await;
    app.put_with_token(routes::SCROLLING_IMAGES, &json!({"image_ids": [a, b]}), &token)
        .await;

    let res = app
        .put_with_token(
            routes::SCROLLING_IMAGES,
            &json!({"image_ids": [b, 9999]}),
            &token,
        )
        .await;
    assert_eq!(res.status, 404);
    assert_eq!(res.body["code"], "NOT_FOUND");

    let list = app.get_without_token(routes::SCROLLING_IMAGES).await;
    assert_eq!(filenames(&list.body), vec!["a.jpg", "b.jpg"]);
}

#[tokio::test]
async fn an_image_may_appear_more_than_once() {
    let app = TestApp::spawn().await;
    let token = app.admin_token().await;
    let a = app.create_image(&token, "a.jpg", "misc").await;
    let b = app.create_image(&token, "b.jpg", "misc").await;

    let res = app
        .put_with_token(routes::SCROLLING_IMAGES, &json!({"image_ids": [a, b, a]}), &token)
        .await;
    assert_eq!(res.status, 200, "{}", res.text);
    assert_eq!(filenames(&res.body), vec!["a.jpg", "b.jpg", "a.jpg"]);

    let list = app.get_without_token(routes::SCROLLING_IMAGES).await;
    assert_eq!(filenames(&list.body), vec!["a.jpg", "b.jpg", "a.jpg"]);
    let orders: Vec<i64> = list
        .body
        .as_array()
        .unwrap()
        .iter()
        .map(|e| e["order"].as_i64().unwrap())
        .collect();
    assert_eq!(orders, vec![0, 1, 2]);
}

#[tokio::test]
async fn deleted_images_drop_out_of_the_carousel() {
    let app = TestApp::spawn().await;
    let token = app.admin_token().await;
    let a = app.create_image(&token, "a.jpg", "misc").await;
    let b = app.create_image(&token, "b.jpg", "misc").await;
    let c = app.create_image(&token, "c.jpg", "misc").await;
    app.put_with_token(routes::SCROLLING_IMAGES, &json!({"image_ids": [a, b, c]}), &token)
        .await;

    app.delete_with_token(&routes::image(b), &token).await;

    let list = app.get_without_token(routes::SCROLLING_IMAGES).await;
    assert_eq!(list.status, 200);
    assert_eq!(filenames(&list.body), vec!["a.jpg", "c.jpg"]);
    assert_eq!(list.body[1]["order"], 2);
}

#[tokio::test]
async fn regular_user_cannot_replace_the_carousel() {
    let app = TestApp::spawn().await;
    let token = app
        .create_authenticated_user("visitor@example.com", "securepass")
        .await;

    let res = app
        .put_with_token(routes::SCROLLING_IMAGES, &json!({"image_ids": []}), &token)
        .await;

    assert_eq!(res.status, 403);
}
