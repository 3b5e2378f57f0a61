use crate::config::settings::AppConfig;
use crate::modules::video::VideoStore;

#[derive(Clone)]
pub struct AppState {
    pub config: AppConfig,
    pub videos: VideoStore,
}

impl AppState {
    pub fn new(config: AppConfig, videos: VideoStore) -> Self {
        Self { config, videos }
    }
}
