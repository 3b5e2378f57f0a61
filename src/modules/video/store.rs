use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use tokio::sync::watch;
use tracing::{debug, error, info, warn};

use super::dto::{ConfigUpdate, FullConfigUpdate, GenerateVideoRequest, NewVideoConfig, VideoConfigPayload};
use super::model::{VideoConfig, VideoResult, VideoState};
use super::repository::VideoRepository;
use super::service::VideoService;
use crate::common::error::{StoreError, StoreResult};
use crate::infrastructure::http::client::ApiClient;
use crate::workers::poller::{self, PollerHandle};

/// Reactive container for a script's video configs and generation results.
///
/// Cloning is cheap and every clone shares the same state. Whenever the
/// result list changes the store starts or stops its background poller so
/// that it runs exactly while some result is still generating. Polling
/// operations spawn onto the ambient tokio runtime.
#[derive(Clone)]
pub struct VideoStore {
    inner: Arc<Inner>,
}

struct Inner {
    api: ApiClient,
    state: watch::Sender<VideoState>,
    poller: Mutex<Option<PollerHandle>>,
    generation: AtomicU64,
    poll_interval: Duration,
}

impl VideoStore {
    pub fn new(api: ApiClient, poll_interval: Duration) -> Self {
        Self {
            inner: Arc::new(Inner {
                api,
                state: watch::Sender::new(VideoState::default()),
                poller: Mutex::new(None),
                generation: AtomicU64::new(0),
                poll_interval,
            }),
        }
    }

    // --- VIEWS ---

    pub fn subscribe(&self) -> watch::Receiver<VideoState> {
        self.inner.state.subscribe()
    }

    pub fn snapshot(&self) -> VideoState {
        self.inner.state.borrow().clone()
    }

    pub fn video_configs(&self) -> Vec<VideoConfig> {
        self.inner.state.borrow().video_configs.clone()
    }

    pub fn video_results(&self) -> Vec<VideoResult> {
        self.inner.state.borrow().video_results.clone()
    }

    pub fn current_script_id(&self) -> Option<i64> {
        self.inner.state.borrow().current_script_id
    }

    pub fn current_project_id(&self) -> Option<i64> {
        self.inner.state.borrow().current_project_id
    }

    pub fn current_configs(&self) -> Vec<VideoConfig> {
        self.inner.state.borrow().current_configs()
    }

    pub fn pending_result_ids(&self) -> Vec<i64> {
        self.inner.state.borrow().pending_result_ids()
    }

    pub fn get_results_by_config_id(&self, config_id: i64) -> Vec<VideoResult> {
        self.inner.state.borrow().results_by_config_id(config_id)
    }

    pub fn get_selected_result(&self, config_id: i64) -> Option<VideoResult> {
        self.inner.state.borrow().selected_result(config_id)
    }

    // --- BACKEND SYNC ---

    /// Switches to `script_id` and loads its configs and results together.
    /// Both loads always run; the first failure is returned.
    pub async fn set_current_script(&self, script_id: i64, project_id: i64) -> StoreResult<()> {
        self.mutate(|state| {
            state.current_script_id = Some(script_id);
            state.current_project_id = Some(project_id);
        });

        let (configs, videos) = tokio::join!(
            self.fetch_video_configs(script_id),
            self.fetch_video_data(script_id, &[])
        );
        configs.and(videos)
    }

    /// Loads every result of the script when `specify_ids` is empty,
    /// otherwise refreshes the status of just those results. A reply without
    /// a result list leaves the state untouched.
    pub async fn fetch_video_data(&self, script_id: i64, specify_ids: &[i64]) -> StoreResult<()> {
        let items = VideoRepository::get_videos(&self.inner.api, script_id, specify_ids)
            .await
            .inspect_err(|e| error!("Failed to fetch video data for script {}: {}", script_id, e))?;

        let Some(items) = items else {
            warn!("Backend returned no result list for script {}", script_id);
            return Ok(());
        };

        if specify_ids.is_empty() {
            debug!("Loaded {} results for script {}", items.len(), script_id);
            self.mutate(|state| VideoService::replace_script_results(state, script_id, items));
        } else {
            if items.is_empty() {
                return Ok(());
            }
            self.mutate(|state| VideoService::merge_status_updates(state, &items));
        }

        self.reconcile_polling();
        Ok(())
    }

    pub async fn fetch_video_configs(&self, script_id: i64) -> StoreResult<()> {
        let payloads = VideoRepository::get_video_configs(&self.inner.api, script_id)
            .await
            .inspect_err(|e| error!("Failed to fetch video configs for script {}: {}", script_id, e))?;

        if let Some(payloads) = payloads {
            debug!("Loaded {} configs for script {}", payloads.len(), script_id);
            self.mutate(|state| VideoService::replace_configs(state, payloads));
        }
        Ok(())
    }

    /// Records a config the backend has just created.
    pub fn add_config_from_backend(&self, payload: VideoConfigPayload) -> VideoConfig {
        let config = VideoConfig::from(payload);
        self.mutate(|state| VideoService::push_config(state, config.clone()));
        config
    }

    /// Creates a config locally, numbered after the highest id seen so far.
    pub fn add_config(&self, new: NewVideoConfig) -> VideoConfig {
        self.mutate(|state| VideoService::add_local_config(state, new))
    }

    /// Deletes the config on the backend, then locally together with its results.
    pub async fn remove_config(&self, config_id: i64) -> StoreResult<()> {
        VideoRepository::delete_video_config(&self.inner.api, config_id)
            .await
            .inspect_err(|e| error!("Failed to delete video config {}: {}", config_id, e))?;

        if self.mutate(|state| VideoService::remove_config(state, config_id)) {
            info!("Removed video config {}", config_id);
            self.reconcile_polling();
        }
        Ok(())
    }

    /// Queues a generation for the config. Returns the id of the new pending
    /// result, or `None` if the backend did not assign one.
    pub async fn generate_video(&self, config_id: i64) -> StoreResult<Option<i64>> {
        let config = self
            .inner
            .state
            .borrow()
            .config(config_id)
            .cloned()
            .ok_or(StoreError::ConfigNotFound(config_id))?;

        let req = GenerateVideoRequest::for_config(&config);
        let result_id = VideoRepository::generate_video(&self.inner.api, &req)
            .await
            .inspect_err(|e| error!("Failed to generate video for config {}: {}", config_id, e))?;

        if let Some(result_id) = result_id {
            info!("🎬 Generation {} queued for config {}", result_id, config_id);
            self.mutate(|state| VideoService::push_pending_result(state, result_id, &config));
            self.start_polling(true);
        }

        Ok(result_id)
    }

    // --- LOCAL EDITS ---

    pub fn select_result(&self, config_id: i64, result_id: i64) {
        self.inner
            .state
            .send_if_modified(|state| VideoService::select_result(state, config_id, result_id));
    }

    pub fn update_config(&self, config_id: i64, update: ConfigUpdate) {
        self.update_config_full(config_id, update.into());
    }

    pub fn update_config_full(&self, config_id: i64, update: FullConfigUpdate) {
        self.inner
            .state
            .send_if_modified(|state| VideoService::update_config(state, config_id, update));
    }

    // --- POLLING ---

    /// Starts the poller if anything is pending. A running poller is kept
    /// unless `force` is set, in which case it is replaced.
    pub fn start_polling(&self, force: bool) {
        let mut slot = self.lock_poller();
        if slot.is_some() {
            if !force {
                return;
            }
            if let Some(handle) = slot.take() {
                handle.cancel();
            }
        }

        let has_pending = self.inner.state.borrow().has_pending();
        if !has_pending {
            return;
        }

        let generation = self.inner.generation.fetch_add(1, Ordering::Relaxed) + 1;
        debug!("Starting poller #{} every {:?}", generation, self.inner.poll_interval);
        *slot = Some(poller::spawn(self.clone(), generation, self.inner.poll_interval));
    }

    pub fn stop_polling(&self) {
        if let Some(handle) = self.lock_poller().take() {
            debug!("Stopping poller #{}", handle.generation());
            handle.cancel();
        }
    }

    /// Stops the poller only if it is still the one identified by `generation`.
    pub(crate) fn stop_polling_generation(&self, generation: u64) {
        let mut slot = self.lock_poller();
        if slot.as_ref().is_some_and(|h| h.generation() == generation) {
            if let Some(handle) = slot.take() {
                handle.cancel();
            }
        }
    }

    pub fn is_polling(&self) -> bool {
        self.lock_poller().is_some()
    }

    pub fn cleanup(&self) {
        self.stop_polling();
    }

    fn reconcile_polling(&self) {
        let has_pending = self.inner.state.borrow().has_pending();
        if has_pending {
            self.start_polling(false);
        } else {
            self.stop_polling();
        }
    }

    fn mutate<R>(&self, f: impl FnOnce(&mut VideoState) -> R) -> R {
        let mut output = None;
        self.inner.state.send_modify(|state| output = Some(f(state)));
        output.unwrap_or_else(|| unreachable!("send_modify always runs its closure"))
    }

    fn lock_poller(&self) -> MutexGuard<'_, Option<PollerHandle>> {
        self.inner.poller.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
