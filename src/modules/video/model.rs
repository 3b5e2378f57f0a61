use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use time::format_description::well_known::Rfc3339;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageItem {
    pub id: i64,
    pub file_path: String,
    #[serde(default)]
    pub prompt: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum GenerationMode {
    StartEnd,
    Multi,
    Single,
    Text,
}

/// Lifecycle of a generation attempt. Encoded on the wire as `0`, `1` or `-1`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "i8", into = "i8")]
pub enum ResultState {
    Generating,
    Succeeded,
    Failed,
}

impl TryFrom<i8> for ResultState {
    type Error = String;

    fn try_from(value: i8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(ResultState::Generating),
            1 => Ok(ResultState::Succeeded),
            -1 => Ok(ResultState::Failed),
            other => Err(format!("unknown result state {}", other)),
        }
    }
}

impl From<ResultState> for i8 {
    fn from(state: ResultState) -> Self {
        match state {
            ResultState::Generating => 0,
            ResultState::Succeeded => 1,
            ResultState::Failed => -1,
        }
    }
}

impl ResultState {
    pub fn is_pending(&self) -> bool {
        matches!(self, ResultState::Generating)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VideoConfig {
    pub id: i64,
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
    pub selected_result_id: Option<i64>,
    pub created_at: String,
}

impl VideoConfig {
    /// Image paths sent to the generator, chosen by mode.
    pub fn image_paths(&self) -> Vec<String> {
        match self.mode {
            GenerationMode::StartEnd => [&self.start_frame, &self.end_frame]
                .into_iter()
                .flatten()
                .map(|img| img.file_path.clone())
                .collect(),
            GenerationMode::Single => self
                .start_frame
                .iter()
                .map(|img| img.file_path.clone())
                .collect(),
            GenerationMode::Text => Vec::new(),
            GenerationMode::Multi => self.images.iter().map(|img| img.file_path.clone()).collect(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VideoResult {
    pub id: i64,
    pub config_id: i64,
    pub state: ResultState,
    pub file_path: String,
    pub first_frame: String,
    pub duration: f64,
    pub prompt: String,
    pub created_at: String,
}

/// Everything the store holds. Subscribers receive a fresh view after each change.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct VideoState {
    pub video_configs: Vec<VideoConfig>,
    pub video_results: Vec<VideoResult>,
    pub current_script_id: Option<i64>,
    pub current_project_id: Option<i64>,
    /// Highest config id seen so far; local configs are numbered past it.
    pub config_id_counter: i64,
}

impl VideoState {
    pub fn current_configs(&self) -> Vec<VideoConfig> {
        match self.current_script_id {
            Some(script_id) => self
                .video_configs
                .iter()
                .filter(|c| c.script_id == script_id)
                .cloned()
                .collect(),
            None => Vec::new(),
        }
    }

    pub fn pending_result_ids(&self) -> Vec<i64> {
        self.video_results
            .iter()
            .filter(|r| r.state.is_pending())
            .map(|r| r.id)
            .collect()
    }

    pub fn has_pending(&self) -> bool {
        self.video_results.iter().any(|r| r.state.is_pending())
    }

    pub fn config(&self, config_id: i64) -> Option<&VideoConfig> {
        self.video_configs.iter().find(|c| c.id == config_id)
    }

    pub fn results_by_config_id(&self, config_id: i64) -> Vec<VideoResult> {
        self.video_results
            .iter()
            .filter(|r| r.config_id == config_id)
            .cloned()
            .collect()
    }

    pub fn selected_result(&self, config_id: i64) -> Option<VideoResult> {
        let selected = self.config(config_id)?.selected_result_id?;
        self.video_results.iter().find(|r| r.id == selected).cloned()
    }
}

pub fn now_timestamp() -> String {
    OffsetDateTime::now_utc()
        .format(&Rfc3339)
        .unwrap_or_default()
}
