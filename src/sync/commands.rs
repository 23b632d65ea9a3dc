use super::refresh::{refresh_now, RefreshOrigin};
use super::view_state::{CommandKind, InFlight, ViewState, ViewStore};
use crate::api::{ApiError, JukeboxApi};
use std::future::Future;
use std::rc::Rc;

const BLANK_PROMPT_MESSAGE: &str = "Enter a song prompt first.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandOutcome {
    /// The same command was already in flight; nothing was sent.
    Ignored,
    /// Refused before any request was issued.
    Rejected,
    Completed,
    Failed,
}

/// Runs the user-triggered writes against the jukebox.
///
/// Every command claims its own in-flight flag, sends one write, and on
/// success forces a refresh of the current song and queue so the view does
/// not wait for the next poll.
pub struct CommandCoordinator<A, S> {
    api: Rc<A>,
    store: S,
}

impl<A, S: Clone> Clone for CommandCoordinator<A, S> {
    fn clone(&self) -> Self {
        Self {
            api: self.api.clone(),
            store: self.store.clone(),
        }
    }
}

impl<A, S> CommandCoordinator<A, S>
where
    A: JukeboxApi,
    S: ViewStore,
{
    pub fn new(api: Rc<A>, store: S) -> Self {
        Self { api, store }
    }

    pub async fn submit(&self, prompt: &str) -> CommandOutcome {
        let prompt = prompt.trim();
        if prompt.is_empty() {
            self.store
                .update(|state| state.error = Some(BLANK_PROMPT_MESSAGE.to_string()));
            return CommandOutcome::Rejected;
        }

        self.run(
            CommandKind::Submit,
            self.api.submit_prompt(prompt),
            |state, result| {
                tracing::info!(song = %result.song, author = %result.author, "prompt resolved");
                state.last_submission = Some(result);
            },
        )
        .await
    }

    pub async fn skip(&self) -> CommandOutcome {
        self.run(CommandKind::Skip, self.api.request_skip(), |_, result| {
            tracing::debug!(status = %result.status, "skip accepted");
        })
        .await
    }

    pub async fn pause(&self) -> CommandOutcome {
        self.run(CommandKind::Pause, self.api.toggle_pause(), |_, result| {
            tracing::debug!(status = %result.status, "pause toggle accepted");
        })
        .await
    }

    pub async fn toggle_clean_mode(&self) -> CommandOutcome {
        let enabled = !self
            .store
            .inspect(|state| state.clean_mode.unwrap_or(false))
            .unwrap_or(false);

        self.run(
            CommandKind::CleanMode,
            self.api.toggle_clean_mode(enabled),
            |state, result| state.clean_mode = Some(result.clean_mode),
        )
        .await
    }

    async fn run<T, W, F>(&self, kind: CommandKind, write: W, on_success: F) -> CommandOutcome
    where
        W: Future<Output = Result<T, ApiError>>,
        F: FnOnce(&mut ViewState, T),
    {
        let Some(_in_flight) = InFlight::acquire(&self.store, kind) else {
            tracing::debug!(command = kind.label(), "command already in flight; ignoring");
            return CommandOutcome::Ignored;
        };

        self.store.update(|state| {
            state.error = None;
            if kind == CommandKind::Submit {
                state.last_submission = None;
            }
        });
        tracing::info!(command = kind.label(), "sending command");

        let result = match write.await {
            Ok(result) => result,
            Err(err) => {
                tracing::warn!(command = kind.label(), error = %err, "command failed");
                let message = kind.failure_message(&err);
                self.store.update(move |state| state.error = Some(message));
                return CommandOutcome::Failed;
            }
        };
        self.store.update(|state| on_success(state, result));

        let report = refresh_now(self.api.as_ref(), &self.store, RefreshOrigin::Command(kind)).await;
        if report.is_complete() {
            CommandOutcome::Completed
        } else {
            CommandOutcome::Failed
        }
    }
}
