use common::{DerivativeSpec, StorageConfig};
use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;

#[derive(Debug, Deserialize, Clone)]
pub struct CorsConfig {
    pub allow_origins: Vec<String>,
    pub max_age: u64,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub cors: CorsConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DatabaseConfig {
    pub url: String,
}

/// Account seeded with admin rights at start-up.
#[derive(Debug, Deserialize, Clone)]
pub struct AdminAccountConfig {
    pub name: String,
    pub email: String,
    pub password: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct AuthConfig {
    pub jwt_secret: String,
    /// Token lifetime. Default: 24 hours.
    #[serde(default = "default_token_ttl_hours")]
    pub token_ttl_hours: i64,
    #[serde(default)]
    pub admin: Option<AdminAccountConfig>,
}

fn default_token_ttl_hours() -> i64 {
    24
}

#[derive(Debug, Deserialize, Clone)]
pub struct GalleryConfig {
    /// Maximum accepted upload size in bytes. Default: 20 MiB.
    #[serde(default = "default_max_upload_size")]
    pub max_upload_size: u64,
    #[serde(default)]
    pub derivative: DerivativeSpec,
}

fn default_max_upload_size() -> u64 {
    20 * 1024 * 1024
}

impl Default for GalleryConfig {
    fn default() -> Self {
        Self {
            max_upload_size: default_max_upload_size(),
            derivative: DerivativeSpec::default(),
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub auth: AuthConfig,
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub gallery: GalleryConfig,
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        let path =
            std::env::var("GALLERY_CONFIG").unwrap_or_else(|_| "config/config".to_string());

        let s = Config::builder()
            .set_default("server.host", "127.0.0.1")?
            .set_default("server.port", 3000)?
            .set_default("server.cors.allow_origins", Vec::<String>::new())?
            .set_default("server.cors.max_age", 3600)?
            .set_default("storage.backend", "filesystem")?
            // Load from config/config.toml
            .add_source(File::with_name(&path).required(false))
            // Override from environment (e.g., GALLERY__AUTH__JWT_SECRET)
            .add_source(Environment::with_prefix("GALLERY").separator("__"))
            .build()?;

        s.try_deserialize()
    }
}
