//! Scripted in-memory jukebox used by the sync tests.

use crate::api::*;
use std::cell::{Cell, RefCell};

pub fn song(name: &str) -> CurrentSong {
    CurrentSong {
        name: name.to_string(),
        author: Some("Miles Davis".to_string()),
        duration_seconds: Some(300),
        url: None,
        played_at: None,
        active: true,
        paused: false,
    }
}

pub fn entry(name: &str) -> QueueEntry {
    QueueEntry {
        name: name.to_string(),
        author: "Miles Davis".to_string(),
        duration_seconds: 300,
        ..QueueEntry::default()
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CallCounts {
    pub submit: usize,
    pub skip: usize,
    pub pause: usize,
    pub clean_mode: usize,
    pub current_song: usize,
    pub queue: usize,
}

pub struct FakeJukebox {
    current_song: RefCell<Result<Option<CurrentSong>, ApiError>>,
    queue: RefCell<Result<Vec<QueueEntry>, ApiError>>,
    write_failure: RefCell<Option<ApiError>>,
    clean_mode: Cell<bool>,
    calls: Cell<CallCounts>,
}

impl FakeJukebox {
    pub fn idle() -> Self {
        Self {
            current_song: RefCell::new(Ok(None)),
            queue: RefCell::new(Ok(Vec::new())),
            write_failure: RefCell::new(None),
            clean_mode: Cell::new(false),
            calls: Cell::new(CallCounts::default()),
        }
    }

    pub fn playing(current: CurrentSong, queue: Vec<QueueEntry>) -> Self {
        let fake = Self::idle();
        fake.set_current_song(Some(current));
        fake.set_queue(queue);
        fake
    }

    pub fn set_current_song(&self, song: Option<CurrentSong>) {
        *self.current_song.borrow_mut() = Ok(song);
    }

    pub fn set_queue(&self, queue: Vec<QueueEntry>) {
        *self.queue.borrow_mut() = Ok(queue);
    }

    pub fn fail_current_song(&self, error: ApiError) {
        *self.current_song.borrow_mut() = Err(error);
    }

    pub fn fail_queue(&self, error: ApiError) {
        *self.queue.borrow_mut() = Err(error);
    }

    /// Every write operation fails with `error` from now on.
    pub fn fail_writes(&self, error: ApiError) {
        *self.write_failure.borrow_mut() = Some(error);
    }

    pub fn calls(&self) -> CallCounts {
        self.calls.get()
    }

    fn count(&self, bump: impl FnOnce(&mut CallCounts)) {
        let mut calls = self.calls.get();
        bump(&mut calls);
        self.calls.set(calls);
    }

    // Writes suspend once so overlapping invocations can be observed.
    async fn write_gate(&self) -> Result<(), ApiError> {
        tokio::task::yield_now().await;
        match self.write_failure.borrow().clone() {
            Some(error) => Err(error),
            None => Ok(()),
        }
    }
}

impl JukeboxApi for FakeJukebox {
    async fn submit_prompt(&self, prompt: &str) -> Result<SubmissionResult, ApiError> {
        self.count(|calls| calls.submit += 1);
        self.write_gate().await?;
        let resolved = QueueEntry {
            name: "Autumn Leaves".to_string(),
            author: "Bill Evans".to_string(),
            duration_seconds: 318,
            search_prompt: Some(prompt.to_string()),
            ..QueueEntry::default()
        };
        if let Ok(queue) = self.queue.borrow_mut().as_mut() {
            queue.push(resolved.clone());
        }
        Ok(SubmissionResult {
            status: "ok".to_string(),
            song: resolved.name,
            author: resolved.author,
        })
    }

    async fn request_skip(&self) -> Result<CommandStatus, ApiError> {
        self.count(|calls| calls.skip += 1);
        self.write_gate().await?;
        let next = match self.queue.borrow_mut().as_mut() {
            Ok(queue) if !queue.is_empty() => Some(queue.remove(0)),
            _ => None,
        };
        self.set_current_song(next.map(|entry| CurrentSong {
            name: entry.name,
            author: Some(entry.author),
            duration_seconds: Some(entry.duration_seconds),
            url: entry.url,
            played_at: None,
            active: true,
            paused: false,
        }));
        Ok(CommandStatus {
            status: "skipped current song".to_string(),
        })
    }

    async fn toggle_pause(&self) -> Result<CommandStatus, ApiError> {
        self.count(|calls| calls.pause += 1);
        self.write_gate().await?;
        if let Ok(Some(song)) = self.current_song.borrow_mut().as_mut() {
            song.paused = !song.paused;
        }
        Ok(CommandStatus {
            status: "toggled pause/play".to_string(),
        })
    }

    async fn toggle_clean_mode(&self, enabled: bool) -> Result<CleanModeStatus, ApiError> {
        self.count(|calls| calls.clean_mode += 1);
        self.write_gate().await?;
        self.clean_mode.set(enabled);
        Ok(CleanModeStatus {
            status: "Toggled".to_string(),
            clean_mode: enabled,
        })
    }

    async fn read_current_song(&self) -> Result<Option<CurrentSong>, ApiError> {
        self.count(|calls| calls.current_song += 1);
        self.current_song.borrow().clone()
    }

    async fn read_queue(&self) -> Result<Vec<QueueEntry>, ApiError> {
        self.count(|calls| calls.queue += 1);
        self.queue.borrow().clone()
    }
}
