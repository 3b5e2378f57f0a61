use crate::common::error::StoreResult;
use crate::config::settings::AppConfig;
use crate::infrastructure::http::client::ApiClient;
use crate::modules::video::VideoStore;
use crate::state::AppState;

pub fn create_app(config: AppConfig) -> StoreResult<AppState> {
    let api = ApiClient::new(&config)?;
    let videos = VideoStore::new(api, config.poll_interval);

    Ok(AppState::new(config, videos))
}
