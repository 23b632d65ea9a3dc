use super::view_state::{CommandKind, RefreshGuard, ViewState, ViewStore};
use crate::api::{ApiError, JukeboxApi};
use crate::diagnostics::{log_perf, perf_start};
use futures_util::future::join;

/// Who asked for a refresh; decides the wording of read failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefreshOrigin {
    Poll,
    Command(CommandKind),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReadTarget {
    CurrentSong,
    Queue,
}

impl ReadTarget {
    pub fn poll_failure_message(self) -> &'static str {
        match self {
            Self::CurrentSong => "Could not fetch current song.",
            Self::Queue => "Could not fetch queue.",
        }
    }
}

impl RefreshOrigin {
    pub fn failure_message(self, target: ReadTarget, error: &ApiError) -> String {
        match self {
            Self::Poll => target.poll_failure_message().to_string(),
            Self::Command(kind) => kind.failure_message(error),
        }
    }
}

/// A read that succeeds again retracts the banner its own earlier failure put
/// up. Command errors stay until the next command starts.
fn clear_recovered(state: &mut ViewState, target: ReadTarget) {
    if state.error.as_deref() == Some(target.poll_failure_message()) {
        state.error = None;
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RefreshReport {
    pub current_song_ok: bool,
    pub queue_ok: bool,
}

impl RefreshReport {
    pub fn is_complete(&self) -> bool {
        self.current_song_ok && self.queue_ok
    }
}

/// Reads the current song and the queue together.
///
/// Each read writes its own field as soon as it resolves; a failure only sets
/// the error banner and leaves the previously displayed value in place.
pub async fn refresh_now<A, S>(api: &A, store: &S, origin: RefreshOrigin) -> RefreshReport
where
    A: JukeboxApi,
    S: ViewStore,
{
    let _refreshing = RefreshGuard::enter(store);
    let started_at = perf_start();

    let current_song = async {
        match api.read_current_song().await {
            Ok(song) => {
                store.update(move |state| {
                    state.current_song = song;
                    clear_recovered(state, ReadTarget::CurrentSong);
                });
                true
            }
            Err(err) => {
                tracing::warn!(?origin, error = %err, "current song read failed");
                let message = origin.failure_message(ReadTarget::CurrentSong, &err);
                store.update(move |state| state.error = Some(message));
                false
            }
        }
    };

    let queue = async {
        match api.read_queue().await {
            Ok(queue) => {
                store.update(move |state| {
                    state.queue = queue;
                    clear_recovered(state, ReadTarget::Queue);
                });
                true
            }
            Err(err) => {
                tracing::warn!(?origin, error = %err, "queue read failed");
                let message = origin.failure_message(ReadTarget::Queue, &err);
                store.update(move |state| state.error = Some(message));
                false
            }
        }
    };

    let (current_song_ok, queue_ok) = join(current_song, queue).await;
    log_perf(
        "jukebox refresh",
        started_at,
        &format!("origin={origin:?} song_ok={current_song_ok} queue_ok={queue_ok}"),
    );

    RefreshReport {
        current_song_ok,
        queue_ok,
    }
}
