use super::dto::{FullConfigUpdate, NewVideoConfig, VideoConfigPayload, VideoResultItem};
use super::model::{ResultState, VideoConfig, VideoResult, VideoState, now_timestamp};

/// State transitions applied to a [`VideoState`] once the backend has answered.
pub struct VideoService;

impl VideoService {
    /// Partial refresh: overwrite status fields of the listed results only.
    /// Blank paths and zero durations in the response keep the local value.
    pub fn merge_status_updates(state: &mut VideoState, items: &[VideoResultItem]) {
        for result in state.video_results.iter_mut() {
            let Some(update) = items.iter().find(|item| item.id == result.id) else {
                continue;
            };

            result.state = update.state;
            if let Some(path) = update.file_path.as_ref().filter(|p| !p.is_empty()) {
                result.file_path = path.clone();
            }
            if let Some(frame) = update.first_frame.as_ref().filter(|f| !f.is_empty()) {
                result.first_frame = frame.clone();
            }
            if let Some(duration) = update.duration.filter(|d| *d != 0.0) {
                result.duration = duration;
            }
        }
    }

    /// Full refresh: results belonging to the script's configs are replaced
    /// by `items`, appended in ascending id order.
    pub fn replace_script_results(state: &mut VideoState, script_id: i64, items: Vec<VideoResultItem>) {
        let script_config_ids: Vec<i64> = state
            .video_configs
            .iter()
            .filter(|c| c.script_id == script_id)
            .map(|c| c.id)
            .collect();

        state
            .video_results
            .retain(|r| !script_config_ids.contains(&r.config_id));

        let mut fresh: Vec<VideoResult> = items.into_iter().map(VideoResultItem::into_result).collect();
        fresh.sort_by_key(|r| r.id);
        state.video_results.extend(fresh);
    }

    /// Replaces the whole config list with what the backend returned.
    pub fn replace_configs(state: &mut VideoState, payloads: Vec<VideoConfigPayload>) {
        state.video_configs.clear();
        for payload in payloads {
            Self::push_config(state, payload.into());
        }
    }

    pub fn push_config(state: &mut VideoState, config: VideoConfig) {
        state.config_id_counter = state.config_id_counter.max(config.id);
        state.video_configs.push(config);
    }

    pub fn add_local_config(state: &mut VideoState, new: NewVideoConfig) -> VideoConfig {
        state.config_id_counter += 1;
        let config = VideoConfig {
            id: state.config_id_counter,
            script_id: new.script_id,
            project_id: new.project_id,
            model: new.model,
            ai_config_id: new.ai_config_id,
            manufacturer: new.manufacturer,
            mode: new.mode,
            start_frame: new.start_frame,
            end_frame: new.end_frame,
            images: new.images,
            resolution: new.resolution,
            duration: new.duration,
            prompt: new.prompt,
            selected_result_id: None,
            created_at: now_timestamp(),
        };
        state.video_configs.push(config.clone());
        config
    }

    /// Drops the config and every result generated from it.
    /// Returns `false` when the config was not present.
    pub fn remove_config(state: &mut VideoState, config_id: i64) -> bool {
        let Some(index) = state.video_configs.iter().position(|c| c.id == config_id) else {
            return false;
        };

        state.video_configs.remove(index);
        state.video_results.retain(|r| r.config_id != config_id);
        true
    }

    pub fn push_pending_result(state: &mut VideoState, result_id: i64, config: &VideoConfig) {
        state.video_results.push(VideoResult {
            id: result_id,
            config_id: config.id,
            state: ResultState::Generating,
            file_path: String::new(),
            first_frame: String::new(),
            duration: config.duration,
            prompt: config.prompt.clone(),
            created_at: now_timestamp(),
        });
    }

    pub fn select_result(state: &mut VideoState, config_id: i64, result_id: i64) -> bool {
        match state.video_configs.iter_mut().find(|c| c.id == config_id) {
            Some(config) => {
                config.selected_result_id = Some(result_id);
                true
            }
            None => false,
        }
    }

    pub fn update_config(state: &mut VideoState, config_id: i64, update: FullConfigUpdate) -> bool {
        let Some(config) = state.video_configs.iter_mut().find(|c| c.id == config_id) else {
            return false;
        };

        if let Some(prompt) = update.prompt {
            config.prompt = prompt;
        }
        if let Some(resolution) = update.resolution {
            config.resolution = resolution;
        }
        if let Some(duration) = update.duration {
            config.duration = duration;
        }
        if let Some(start_frame) = update.start_frame {
            config.start_frame = start_frame;
        }
        if let Some(end_frame) = update.end_frame {
            config.end_frame = end_frame;
        }
        if let Some(images) = update.images {
            config.images = images;
        }
        if let Some(mode) = update.mode {
            config.mode = mode;
        }
        true
    }
}
