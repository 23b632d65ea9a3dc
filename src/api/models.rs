use chrono::NaiveDateTime;
use serde::Deserialize;

pub const DEFAULT_API_PORT: u16 = 8000;
pub const DEFAULT_POLL_INTERVAL_MS: u64 = 1000;
pub const MIN_POLL_INTERVAL_MS: u64 = 250;

/// Where the jukebox API lives and how often the view re-reads it.
#[derive(Debug, Clone, PartialEq)]
pub struct JukeboxConfig {
    pub host: String,
    pub port: u16,
    pub poll_interval_ms: u64,
}

impl Default for JukeboxConfig {
    fn default() -> Self {
        Self::new("localhost")
    }
}

impl JukeboxConfig {
    pub fn new(host: impl Into<String>) -> Self {
        let host = host.into();
        let host = host.trim().trim_end_matches('/');
        Self {
            host: if host.is_empty() {
                "localhost".to_string()
            } else {
                host.to_string()
            },
            port: DEFAULT_API_PORT,
            poll_interval_ms: DEFAULT_POLL_INTERVAL_MS,
        }
    }

    pub fn with_port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    pub fn with_poll_interval_ms(mut self, poll_interval_ms: u64) -> Self {
        self.poll_interval_ms = poll_interval_ms;
        self
    }

    /// Resolves the config for the page the client was served from.
    #[cfg(target_arch = "wasm32")]
    pub fn detect() -> Self {
        let hostname = web_sys::window()
            .and_then(|window| window.location().hostname().ok())
            .unwrap_or_default();
        Self::new(hostname)
    }

    /// Resolves the config from `JUKEBOX_HOST`, `JUKEBOX_PORT` and `JUKEBOX_POLL_MS`.
    #[cfg(not(target_arch = "wasm32"))]
    pub fn detect() -> Self {
        let host = std::env::var("JUKEBOX_HOST").unwrap_or_default();
        let mut config = Self::new(host);
        if let Some(port) = env_override::<u16>("JUKEBOX_PORT") {
            config = config.with_port(port);
        }
        if let Some(interval) = env_override::<u64>("JUKEBOX_POLL_MS") {
            config = config.with_poll_interval_ms(interval);
        }
        config
    }

    pub fn base_url(&self) -> String {
        format!("http://{}:{}", self.host, self.port)
    }

    pub fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.base_url(), path.trim_start_matches('/'))
    }

    pub fn poll_interval(&self) -> std::time::Duration {
        std::time::Duration::from_millis(self.poll_interval_ms.max(MIN_POLL_INTERVAL_MS))
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn env_override<T: std::str::FromStr>(key: &str) -> Option<T> {
    let raw = std::env::var(key).ok()?;
    match raw.trim().parse::<T>() {
        Ok(value) => Some(value),
        Err(_) => {
            tracing::warn!(key, value = %raw, "ignoring invalid config override");
            None
        }
    }
}

/// Server-reported playback state at the last successful read.
///
/// Only ever constructed with a name; "nothing playing" is `Option::None`.
/// Built by `current_song_from_json`, which owns the wire-format leniency.
#[derive(Debug, Clone, PartialEq)]
pub struct CurrentSong {
    pub name: String,
    pub author: Option<String>,
    pub duration_seconds: Option<u32>,
    pub url: Option<String>,
    pub played_at: Option<String>,
    pub active: bool,
    pub paused: bool,
}

impl CurrentSong {
    pub fn author_label(&self) -> &str {
        self.author.as_deref().unwrap_or("Unknown artist")
    }

    pub fn duration_label(&self) -> Option<String> {
        self.duration_seconds.map(format_duration)
    }

    /// The server writes `played_at` as a naive local ISO-8601 timestamp.
    pub fn played_at_time(&self) -> Option<NaiveDateTime> {
        let raw = self.played_at.as_deref()?.trim();
        NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f")
            .or_else(|_| NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S%.f"))
            .ok()
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct QueueEntry {
    pub name: String,
    pub author: String,
    pub duration_seconds: u32,
    pub url: Option<String>,
    pub search_prompt: Option<String>,
    pub active: Option<bool>,
}

/// What the server resolved a submitted prompt to.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct SubmissionResult {
    pub status: String,
    pub song: String,
    pub author: String,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct CommandStatus {
    pub status: String,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct CleanModeStatus {
    #[serde(default)]
    pub status: String,
    pub clean_mode: bool,
}

pub fn format_duration(seconds: u32) -> String {
    let mins = seconds / 60;
    let secs = seconds % 60;
    format!("{}:{:02}", mins, secs)
}

pub fn total_duration(entries: &[QueueEntry]) -> u32 {
    entries.iter().map(|entry| entry.duration_seconds).sum()
}
