pub mod config;
pub mod database;
pub mod entity;
pub mod error;
pub mod extractors;
pub mod handlers;
pub mod models;
pub mod routes;
pub mod seed;
pub mod services;
pub mod state;
pub mod utils;

use tower_http::services::ServeDir;
use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};
use utoipa_scalar::{Scalar, Servable as ScalarServable};

use crate::state::AppState;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Gallery API",
        version = "1.0.0",
        description = "Image gallery, carousel and blog backend"
    ),
    paths(
        handlers::auth::register,
        handlers::auth::login,
        handlers::auth::me,
        handlers::image::list_images,
        handlers::image::list_images_by_category,
        handlers::image::get_image,
        handlers::image::upload_image,
        handlers::image::delete_image,
        handlers::category::list_categories,
        handlers::category::create_category,
        handlers::category::delete_category,
        handlers::category::set_preview_image,
        handlers::scrolling::list_scrolling_images,
        handlers::scrolling::replace_scrolling_images,
        handlers::blog::list_posts,
        handlers::blog::list_posts_by_month,
        handlers::blog::get_post,
        handlers::blog::create_post,
        handlers::blog::delete_post,
    ),
    tags(
        (name = "Auth", description = "Authentication and user management"),
        (name = "Images", description = "Image upload, lookup and deletion"),
        (name = "Categories", description = "Image categories and their preview images"),
        (name = "Scrolling Images", description = "The ordered front-page carousel"),
        (name = "Blog", description = "Blog posts browsable by month"),
    ),
    modifiers(&SecurityAddon),
)]
pub struct ApiDoc;

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi.components.get_or_insert_default();
        components.add_security_scheme(
            "jwt",
            SecurityScheme::Http(
                HttpBuilder::new()
                    .scheme(HttpAuthScheme::Bearer)
                    .bearer_format("JWT")
                    .build(),
            ),
        );
    }
}

/// Path component of a public base URL, if objects can be served from it.
///
/// `/media` and `http://host:3000/media/` both yield `/media`; a bare host
/// yields `None`.
pub fn mount_path(public_base_url: &str) -> Option<String> {
    let path = match public_base_url.split_once("://") {
        Some((_, rest)) => rest.find('/').map(|i| &rest[i..])?,
        None => public_base_url,
    };
    let path = path.trim_end_matches('/');
    if path.starts_with('/') && !path.is_empty() {
        Some(path.to_string())
    } else {
        None
    }
}

/// Build the application router.
pub fn build_router(state: AppState) -> axum::Router {
    let mut router = axum::Router::new().nest("/api", routes::api_routes(&state.config));

    if let Some((directory, public_base_url)) = state.config.storage.local_mount()
        && let Some(path) = mount_path(public_base_url)
    {
        router = router.nest_service(&path, ServeDir::new(directory));
    }

    router
        .with_state(state)
        .merge(Scalar::with_url("/scalar", ApiDoc::openapi()))
}
