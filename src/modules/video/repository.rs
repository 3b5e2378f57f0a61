use super::dto::{
    DeleteVideoConfigRequest, GenerateVideoRequest, GenerateVideoResponse, GetVideoConfigsRequest,
    GetVideoRequest, VideoConfigPayload, VideoResultItem,
};
use crate::common::error::StoreResult;
use crate::infrastructure::http::client::ApiClient;

pub const GET_VIDEO_PATH: &str = "/video/getVideo";
pub const GET_VIDEO_CONFIGS_PATH: &str = "/video/getVideoConfigs";
pub const DELETE_VIDEO_CONFIG_PATH: &str = "/video/deleteVideoConfig";
pub const GENERATE_VIDEO_PATH: &str = "/video/generateVideo";

pub struct VideoRepository;

impl VideoRepository {
    /// Empty `specify_ids` asks for every result of the script.
    /// `None` when the backend answers without a result list.
    pub async fn get_videos(
        api: &ApiClient,
        script_id: i64,
        specify_ids: &[i64],
    ) -> StoreResult<Option<Vec<VideoResultItem>>> {
        api.post(
            GET_VIDEO_PATH,
            &GetVideoRequest {
                script_id,
                specify_ids,
            },
        )
        .await
    }

    /// `None` when the backend answers without a config list.
    pub async fn get_video_configs(
        api: &ApiClient,
        script_id: i64,
    ) -> StoreResult<Option<Vec<VideoConfigPayload>>> {
        api.post(GET_VIDEO_CONFIGS_PATH, &GetVideoConfigsRequest { script_id })
            .await
    }

    pub async fn delete_video_config(api: &ApiClient, id: i64) -> StoreResult<()> {
        api.post::<_, serde_json::Value>(DELETE_VIDEO_CONFIG_PATH, &DeleteVideoConfigRequest { id })
            .await?;
        Ok(())
    }

    /// Returns the id of the queued result, if the backend assigned one.
    pub async fn generate_video(
        api: &ApiClient,
        req: &GenerateVideoRequest,
    ) -> StoreResult<Option<i64>> {
        let resp = api
            .post::<_, GenerateVideoResponse>(GENERATE_VIDEO_PATH, req)
            .await?;

        Ok(resp.and_then(|r| r.id).filter(|id| *id != 0))
    }
}
