use std::net::SocketAddr;
use std::time::Duration;

use anyhow::Context;
use axum::http::{HeaderValue, Method, header};
use tower_http::cors::{AllowOrigin, CorsLayer};
use tracing::{Level, info};

use gallery_server::config::{AppConfig, CorsConfig};
use gallery_server::services::GalleryService;
use gallery_server::state::AppState;
use gallery_server::{build_router, database, seed};

fn cors_layer(cors: &CorsConfig) -> CorsLayer {
    let origins: Vec<HeaderValue> = cors
        .allow_origins
        .iter()
        .filter_map(|o| o.parse().ok())
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE])
        .max_age(Duration::from_secs(cors.max_age))
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt().with_max_level(Level::INFO).init();

    let config = AppConfig::load().context("Failed to load configuration")?;

    let db = database::init_db(&config.database.url)
        .await
        .context("Failed to connect to database")?;

    if let Some(admin) = &config.auth.admin {
        seed::ensure_admin(&db, admin)
            .await
            .context("Failed to seed admin account")?;
    }

    let store = config
        .storage
        .connect(config.gallery.max_upload_size)
        .await
        .context("Failed to initialise object storage")?;

    let gallery = GalleryService::new(db.clone(), store, config.gallery.derivative);

    let addr: SocketAddr = format!("{}:{}", config.server.host, config.server.port)
        .parse()
        .context("Invalid server address")?;
    let cors = cors_layer(&config.server.cors);

    let state = AppState {
        db,
        config,
        gallery,
    };
    let app = build_router(state).layer(cors);

    info!("Server running at http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
