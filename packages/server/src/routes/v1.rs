use axum::{
    Router,
    routing::{delete, get, post, put},
};

use crate::config::AppConfig;
use crate::handlers;
use crate::state::AppState;

pub fn routes(config: &AppConfig) -> Router<AppState> {
    Router::new()
        .nest("/auth", auth_routes())
        .nest("/images", image_routes(config))
        .nest("/categories", category_routes())
        .nest("/scrolling-images", scrolling_routes())
        .nest("/blog", blog_routes())
}

fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/register", post(handlers::auth::register))
        .route("/login", post(handlers::auth::login))
        .route("/me", get(handlers::auth::me))
}

fn image_routes(config: &AppConfig) -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(handlers::image::list_images)
                .post(handlers::image::upload_image)
                .layer(handlers::image::image_upload_body_limit(
                    config.gallery.max_upload_size,
                )),
        )
        .route(
            "/{id}",
            get(handlers::image::get_image).delete(handlers::image::delete_image),
        )
        .route(
            "/category/{category}",
            get(handlers::image::list_images_by_category),
        )
}

fn category_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(handlers::category::list_categories).post(handlers::category::create_category),
        )
        .route("/{id}", delete(handlers::category::delete_category))
        .route("/{id}/preview", put(handlers::category::set_preview_image))
}

fn scrolling_routes() -> Router<AppState> {
    Router::new().route(
        "/",
        get(handlers::scrolling::list_scrolling_images)
            .put(handlers::scrolling::replace_scrolling_images),
    )
}

fn blog_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/posts",
            get(handlers::blog::list_posts).post(handlers::blog::create_post),
        )
        .route(
            "/posts/{id}",
            get(handlers::blog::get_post).delete(handlers::blog::delete_post),
        )
        .route(
            "/posts/{year}/{month}",
            get(handlers::blog::list_posts_by_month),
        )
}
