//! Client-side store for video generation: configs, their generation
//! results, and background polling of results that are still rendering.

pub mod app;
pub mod common;
pub mod config;
pub mod infrastructure;
pub mod modules;
pub mod state;
pub mod workers;

pub use common::error::{StoreError, StoreResult};
pub use config::AppConfig;
pub use modules::video::VideoStore;
