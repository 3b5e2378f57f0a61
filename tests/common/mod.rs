#![allow(dead_code)]

use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::post;
use axum::{Json, Router};
use serde_json::{Value, json};

use video_workbench::AppConfig;
use video_workbench::VideoStore;
use video_workbench::app;

pub const POLL_INTERVAL: Duration = Duration::from_millis(50);

#[derive(Default)]
pub struct BackendState {
    pub configs: Vec<Value>,
    pub results: Vec<Value>,
    pub next_result_id: i64,
    pub calls: Vec<(String, Value)>,
    pub fail_delete: bool,
    pub reject_configs: bool,
    /// Number of upcoming `getVideo` calls answered with a 503.
    pub failing_video_calls: usize,
    pub null_video_data: bool,
}

type Shared = Arc<Mutex<BackendState>>;

/// In-process stand-in for the video API, listening on an ephemeral port.
pub struct FakeBackend {
    pub state: Shared,
    pub base_url: String,
}

impl FakeBackend {
    pub async fn start() -> Self {
        let state: Shared = Arc::new(Mutex::new(BackendState {
            next_result_id: 100,
            ..Default::default()
        }));

        let router = Router::new()
            .route("/api/video/getVideo", post(get_video))
            .route("/api/video/getVideoConfigs", post(get_video_configs))
            .route("/api/video/deleteVideoConfig", post(delete_video_config))
            .route("/api/video/generateVideo", post(generate_video))
            .with_state(state.clone());

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, router).await.unwrap();
        });

        Self {
            state,
            base_url: format!("http://{}/api", addr),
        }
    }

    pub fn store(&self) -> VideoStore {
        let mut config = AppConfig::with_base_url(&self.base_url).unwrap();
        config.poll_interval = POLL_INTERVAL;
        config.request_timeout = Duration::from_secs(5);
        app::create_app(config).unwrap().videos
    }

    pub fn add_config(&self, id: i64, script_id: i64, mode: &str) {
        self.state.lock().unwrap().configs.push(json!({
            "id": id,
            "scriptId": script_id,
            "projectId": 1,
            "model": "kling-v2",
            "aiConfigId": 7,
            "manufacturer": "kuaishou",
            "mode": mode,
            "startFrame": {"id": 1, "filePath": "/frames/start.png", "prompt": ""},
            "endFrame": {"id": 2, "filePath": "/frames/end.png", "prompt": ""},
            "images": [
                {"id": 3, "filePath": "/frames/a.png", "prompt": ""},
                {"id": 4, "filePath": "/frames/b.png", "prompt": ""}
            ],
            "resolution": "720p",
            "duration": 5,
            "prompt": "a lighthouse at dusk",
            "selectedResultId": null
        }));
    }

    pub fn add_result(&self, id: i64, config_id: i64, script_id: i64, state: i8) {
        self.state.lock().unwrap().results.push(json!({
            "id": id,
            "configId": config_id,
            "scriptId": script_id,
            "state": state,
            "filePath": if state == 1 { "/videos/done.mp4" } else { "" },
            "firstFrame": "",
            "duration": 5
        }));
    }

    pub fn complete(&self, id: i64, file_path: &str) {
        let mut state = self.state.lock().unwrap();
        if let Some(result) = state.results.iter_mut().find(|r| r["id"] == id) {
            result["state"] = json!(1);
            result["filePath"] = json!(file_path);
            result["firstFrame"] = json!("/frames/first.png");
        }
    }

    pub fn calls_to(&self, path: &str) -> Vec<Value> {
        self.state
            .lock()
            .unwrap()
            .calls
            .iter()
            .filter(|(p, _)| p == path)
            .map(|(_, body)| body.clone())
            .collect()
    }
}

/// Re-checks `condition` until it holds or two seconds pass.
pub async fn eventually(condition: impl Fn() -> bool) -> bool {
    for _ in 0..100 {
        if condition() {
            return true;
        }
        tokio::time::sleep(Duration::from_millis(20)).await;
    }
    condition()
}

fn success(data: Value, message: &str) -> Value {
    json!({"status": "success", "message": message, "data": data})
}

fn failure(message: &str) -> Value {
    json!({"status": "error", "message": message, "data": null})
}

fn record(state: &Shared, path: &str, body: &Value) {
    state.lock().unwrap().calls.push((path.to_string(), body.clone()));
}

async fn get_video(State(state): State<Shared>, Json(body): Json<Value>) -> (StatusCode, Json<Value>) {
    record(&state, "getVideo", &body);

    let mut guard = state.lock().unwrap();
    if guard.failing_video_calls > 0 {
        guard.failing_video_calls -= 1;
        return (StatusCode::SERVICE_UNAVAILABLE, Json(failure("renderer busy")));
    }
    if guard.null_video_data {
        return (StatusCode::OK, Json(success(Value::Null, "ok")));
    }

    let script_id = body["scriptId"].as_i64().unwrap_or_default();
    let specify: Vec<i64> = body["specifyIds"]
        .as_array()
        .map(|ids| ids.iter().filter_map(Value::as_i64).collect())
        .unwrap_or_default();

    let rows: Vec<Value> = guard
        .results
        .iter()
        .filter(|r| {
            if specify.is_empty() {
                r["scriptId"] == script_id
            } else {
                r["id"].as_i64().is_some_and(|id| specify.contains(&id))
            }
        })
        .cloned()
        .collect();

    (StatusCode::OK, Json(success(json!(rows), "ok")))
}

async fn get_video_configs(State(state): State<Shared>, Json(body): Json<Value>) -> (StatusCode, Json<Value>) {
    record(&state, "getVideoConfigs", &body);

    let guard = state.lock().unwrap();
    if guard.reject_configs {
        return (
            StatusCode::OK,
            Json(json!({"status": "error", "message": "script is locked"})),
        );
    }

    let script_id = body["scriptId"].as_i64().unwrap_or_default();
    let rows: Vec<Value> = guard
        .configs
        .iter()
        .filter(|c| c["scriptId"] == script_id)
        .cloned()
        .collect();

    (StatusCode::OK, Json(success(json!(rows), "ok")))
}

async fn delete_video_config(
    State(state): State<Shared>,
    Json(body): Json<Value>,
) -> (StatusCode, Json<Value>) {
    record(&state, "deleteVideoConfig", &body);

    let mut guard = state.lock().unwrap();
    if guard.fail_delete {
        return (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(failure("delete failed")),
        );
    }

    let id = body["id"].as_i64().unwrap_or_default();
    guard.configs.retain(|c| c["id"] != id);
    guard.results.retain(|r| r["configId"] != id);
    (StatusCode::OK, Json(success(Value::Null, "deleted")))
}

async fn generate_video(State(state): State<Shared>, Json(body): Json<Value>) -> Json<Value> {
    record(&state, "generateVideo", &body);

    let mut guard = state.lock().unwrap();
    guard.next_result_id += 1;
    let id = guard.next_result_id;
    guard.results.push(json!({
        "id": id,
        "configId": body["configId"],
        "scriptId": body["scriptId"],
        "state": 0,
        "filePath": "",
        "firstFrame": "",
        "duration": body["duration"]
    }));

    Json(success(json!({ "id": id }), "queued"))
}
