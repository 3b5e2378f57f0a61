use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior, interval_at};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::modules::video::VideoStore;

/// Live polling task owned by a [`VideoStore`].
pub struct PollerHandle {
    generation: u64,
    token: CancellationToken,
    task: JoinHandle<()>,
}

impl PollerHandle {
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Signals the task to exit. A fetch already in flight is allowed to finish.
    pub fn cancel(self) {
        self.token.cancel();
        drop(self.task);
    }
}

pub fn spawn(store: VideoStore, generation: u64, period: Duration) -> PollerHandle {
    let token = CancellationToken::new();
    let task = tokio::spawn(run(store, generation, period, token.clone()));

    PollerHandle {
        generation,
        token,
        task,
    }
}

async fn run(store: VideoStore, generation: u64, period: Duration, token: CancellationToken) {
    info!("🔄 Poller #{} started", generation);

    let mut ticker = interval_at(Instant::now() + period, period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        tokio::select! {
            _ = token.cancelled() => break,
            _ = ticker.tick() => {}
        }

        let pending = store.pending_result_ids();
        if pending.is_empty() {
            store.stop_polling_generation(generation);
            break;
        }

        let Some(script_id) = store.current_script_id() else {
            debug!("Poller #{} idle: no script selected", generation);
            continue;
        };

        debug!("Poller #{} refreshing {} pending results", generation, pending.len());
        if let Err(e) = store.fetch_video_data(script_id, &pending).await {
            warn!("Poller #{} refresh failed, retrying next tick: {}", generation, e);
        }
    }

    info!("Poller #{} stopped", generation);
}
