pub mod dto;
pub mod model;
pub mod repository;
pub mod service;
pub mod store;

pub use model::{GenerationMode, ImageItem, ResultState, VideoConfig, VideoResult, VideoState};
pub use store::VideoStore;
