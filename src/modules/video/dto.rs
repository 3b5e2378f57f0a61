use serde::{Deserialize, Serialize};

use super::model::{GenerationMode, ImageItem, ResultState, VideoConfig, VideoResult, now_timestamp};

// --- REQUESTS ---

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GetVideoRequest<'a> {
    pub script_id: i64,
    pub specify_ids: &'a [i64],
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GetVideoConfigsRequest {
    pub script_id: i64,
}

#[derive(Debug, Serialize)]
pub struct DeleteVideoConfigRequest {
    pub id: i64,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateVideoRequest {
    pub project_id: i64,
    pub script_id: i64,
    pub mode: GenerationMode,
    pub ai_config_id: Option<i64>,
    pub config_id: i64,
    pub resolution: String,
    pub file_path: Vec<String>,
    pub duration: f64,
    pub prompt: String,
}

impl GenerateVideoRequest {
    pub fn for_config(config: &VideoConfig) -> Self {
        Self {
            project_id: config.project_id,
            script_id: config.script_id,
            mode: config.mode,
            ai_config_id: config.ai_config_id,
            config_id: config.id,
            resolution: config.resolution.clone(),
            file_path: config.image_paths(),
            duration: config.duration,
            prompt: config.prompt.clone(),
        }
    }
}

// --- RESPONSES ---

#[derive(Debug, Deserialize)]
pub struct GenerateVideoResponse {
    #[serde(default)]
    pub id: Option<i64>,
}

/// Result row as returned by `/video/getVideo`. Older rows report `time`
/// instead of `duration`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VideoResultItem {
    pub id: i64,
    #[serde(default)]
    pub config_id: Option<i64>,
    pub state: ResultState,
    #[serde(default)]
    pub file_path: Option<String>,
    #[serde(default)]
    pub first_frame: Option<String>,
    #[serde(default)]
    pub duration: Option<f64>,
    #[serde(default)]
    pub time: Option<f64>,
    #[serde(default)]
    pub prompt: Option<String>,
}

impl VideoResultItem {
    pub fn into_result(self) -> VideoResult {
        let duration = non_zero(self.duration).or(non_zero(self.time)).unwrap_or(0.0);
        VideoResult {
            id: self.id,
            config_id: self.config_id.unwrap_or(0),
            state: self.state,
            file_path: self.file_path.unwrap_or_default(),
            first_frame: self.first_frame.unwrap_or_default(),
            duration,
            prompt: self.prompt.unwrap_or_default(),
            created_at: now_timestamp(),
        }
    }
}

/// Config as stored by the backend; optional fields fall back to local defaults.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VideoConfigPayload {
    pub id: i64,
    pub script_id: i64,
    pub project_id: i64,
    #[serde(default)]
    pub model: Option<String>,
    #[serde(default)]
    pub ai_config_id: Option<i64>,
    #[serde(default)]
    pub manufacturer: Option<String>,
    pub mode: GenerationMode,
    #[serde(default)]
    pub start_frame: Option<ImageItem>,
    #[serde(default)]
    pub end_frame: Option<ImageItem>,
    #[serde(default)]
    pub images: Option<Vec<ImageItem>>,
    #[serde(default)]
    pub resolution: Option<String>,
    #[serde(default)]
    pub duration: Option<f64>,
    #[serde(default)]
    pub prompt: Option<String>,
    #[serde(default)]
    pub selected_result_id: Option<i64>,
    #[serde(default)]
    pub created_at: Option<String>,
}

impl From<VideoConfigPayload> for VideoConfig {
    fn from(p: VideoConfigPayload) -> Self {
        Self {
            id: p.id,
            script_id: p.script_id,
            project_id: p.project_id,
            model: p.model.unwrap_or_default(),
            ai_config_id: p.ai_config_id,
            manufacturer: p.manufacturer.unwrap_or_default(),
            mode: p.mode,
            start_frame: p.start_frame,
            end_frame: p.end_frame,
            images: p.images.unwrap_or_default(),
            resolution: p.resolution.unwrap_or_default(),
            duration: p.duration.unwrap_or(0.0),
            prompt: p.prompt.unwrap_or_default(),
            selected_result_id: non_zero_id(p.selected_result_id),
            created_at: p
                .created_at
                .filter(|c| !c.is_empty())
                .unwrap_or_else(now_timestamp),
        }
    }
}

// --- LOCAL MUTATIONS ---

/// Fields the user fills in before a config exists anywhere.
#[derive(Debug, Clone)]
pub struct NewVideoConfig {
    pub script_id: i64,
    pub project_id: i64,
    pub model: String,
    pub ai_config_id: Option<i64>,
    pub manufacturer: String,
    pub mode: GenerationMode,
    pub start_frame: Option<ImageItem>,
    pub end_frame: Option<ImageItem>,
    pub images: Vec<ImageItem>,
    pub resolution: String,
    pub duration: f64,
    pub prompt: String,
}

#[derive(Debug, Clone, Default)]
pub struct ConfigUpdate {
    pub prompt: Option<String>,
    pub resolution: Option<String>,
    pub duration: Option<f64>,
}

/// `start_frame` / `end_frame`: `None` leaves the frame alone,
/// `Some(None)` clears it.
#[derive(Debug, Clone, Default)]
pub struct FullConfigUpdate {
    pub prompt: Option<String>,
    pub resolution: Option<String>,
    pub duration: Option<f64>,
    pub start_frame: Option<Option<ImageItem>>,
    pub end_frame: Option<Option<ImageItem>>,
    pub images: Option<Vec<ImageItem>>,
    pub mode: Option<GenerationMode>,
}

impl From<ConfigUpdate> for FullConfigUpdate {
    fn from(u: ConfigUpdate) -> Self {
        Self {
            prompt: u.prompt,
            resolution: u.resolution,
            duration: u.duration,
            ..Default::default()
        }
    }
}

fn non_zero(value: Option<f64>) -> Option<f64> {
    value.filter(|v| *v != 0.0)
}

fn non_zero_id(value: Option<i64>) -> Option<i64> {
    value.filter(|v| *v != 0)
}
