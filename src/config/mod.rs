pub mod env;
pub mod settings;

pub use settings::{AppConfig, ConfigError};
