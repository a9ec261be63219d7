pub mod config;
pub mod derivative;
pub mod storage;

pub use config::StorageConfig;
pub use derivative::{DerivativeSpec, ProcessingError, generate_derivative};
