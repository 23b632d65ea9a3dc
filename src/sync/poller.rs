use super::refresh::{refresh_now, RefreshOrigin};
use super::view_state::ViewStore;
use crate::api::JukeboxApi;
use futures_util::future::{abortable, AbortHandle};
use futures_util::FutureExt;
use std::future::Future;
use std::rc::Rc;
use std::time::Duration;

#[cfg(not(target_arch = "wasm32"))]
async fn poll_delay(interval: Duration) {
    tokio::time::sleep(interval).await;
}

#[cfg(target_arch = "wasm32")]
async fn poll_delay(interval: Duration) {
    let ms = u32::try_from(interval.as_millis()).unwrap_or(u32::MAX);
    gloo_timers::future::TimeoutFuture::new(ms).await;
}

/// Re-reads the current song and queue on a fixed interval while the view is
/// mounted.
///
/// `start` hands back the loop future for the caller's executor; `stop` (or
/// dropping the poller) cancels it. The interval is measured from the end of
/// one tick to the start of the next, so ticks never overlap.
pub struct SyncPoller {
    interval: Duration,
    running: Option<AbortHandle>,
}

impl SyncPoller {
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            running: None,
        }
    }

    #[cfg(test)]
    pub fn is_running(&self) -> bool {
        self.running.is_some()
    }

    /// Idle -> Running. The returned future ticks once immediately, then once
    /// per interval. Returns `None` if the poller is already running.
    pub fn start<A, S>(&mut self, api: Rc<A>, store: S) -> Option<impl Future<Output = ()> + 'static>
    where
        A: JukeboxApi + 'static,
        S: ViewStore,
    {
        if self.running.is_some() {
            tracing::debug!("sync poller already running");
            return None;
        }

        let interval = self.interval;
        let (task, abort) = abortable(async move {
            loop {
                refresh_now(api.as_ref(), &store, RefreshOrigin::Poll).await;
                poll_delay(interval).await;
            }
        });

        tracing::info!(interval_ms = interval.as_millis() as u64, "sync poller started");
        self.running = Some(abort);
        Some(task.map(|_| ()))
    }

    /// Running -> Idle. Returns `false` if the poller was already idle.
    pub fn stop(&mut self) -> bool {
        let Some(abort) = self.running.take() else {
            return false;
        };
        abort.abort();
        tracing::info!("sync poller stopped");
        true
    }
}

impl Drop for SyncPoller {
    fn drop(&mut self) {
        self.stop();
    }
}
