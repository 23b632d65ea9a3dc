use crate::api::models::*;
use once_cell::sync::Lazy;
use serde::de::DeserializeOwned;
use serde::Serialize;
#[cfg(not(target_arch = "wasm32"))]
use std::time::Duration;
use thiserror::Error;

static HTTP_CLIENT: Lazy<reqwest::Client> = Lazy::new(reqwest::Client::new);

#[cfg(not(target_arch = "wasm32"))]
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

const REQUEST_SONG_PATH: &str = "request_song";
const SKIP_PATH: &str = "skip";
const PAUSE_TOGGLE_PATH: &str = "pauseToggle";
const CLEAN_MODE_PATH: &str = "toggle_clean_mode";
const CURRENT_SONG_PATH: &str = "currentlyPlayingSong";
const QUEUE_PATH: &str = "queue";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ApiError {
    #[error("request failed: {0}")]
    Transport(String),
    #[error("server returned HTTP {status}")]
    Status { status: u16 },
    #[error("unexpected response body: {0}")]
    Decode(String),
}

/// The remote jukebox operations the view depends on.
///
/// Every call issues exactly one request and never retries.
#[allow(async_fn_in_trait)]
pub trait JukeboxApi {
    async fn submit_prompt(&self, prompt: &str) -> Result<SubmissionResult, ApiError>;
    async fn request_skip(&self) -> Result<CommandStatus, ApiError>;
    async fn toggle_pause(&self) -> Result<CommandStatus, ApiError>;
    async fn toggle_clean_mode(&self, enabled: bool) -> Result<CleanModeStatus, ApiError>;
    async fn read_current_song(&self) -> Result<Option<CurrentSong>, ApiError>;
    async fn read_queue(&self) -> Result<Vec<QueueEntry>, ApiError>;
}

pub struct JukeboxClient {
    pub config: JukeboxConfig,
}

#[derive(Debug, Serialize)]
struct PromptRequest<'a> {
    prompt: &'a str,
}

// The server reuses the `prompt` field name for the clean mode flag.
#[derive(Debug, Serialize)]
struct CleanModeRequest {
    prompt: bool,
}

impl JukeboxClient {
    pub fn new(config: JukeboxConfig) -> Self {
        Self { config }
    }

    async fn send(
        &self,
        request: reqwest::RequestBuilder,
        path: &str,
    ) -> Result<serde_json::Value, ApiError> {
        #[cfg(not(target_arch = "wasm32"))]
        let request = request.timeout(REQUEST_TIMEOUT);

        let response = request
            .send()
            .await
            .map_err(|e| ApiError::Transport(e.to_string()))?;
        let status = response.status();
        if !status.is_success() {
            tracing::debug!(path, status = status.as_u16(), "jukebox request rejected");
            return Err(ApiError::Status {
                status: status.as_u16(),
            });
        }

        let body = response
            .text()
            .await
            .map_err(|e| ApiError::Transport(e.to_string()))?;
        parse_body(&body)
    }

    async fn get(&self, path: &str) -> Result<serde_json::Value, ApiError> {
        let url = self.config.endpoint(path);
        tracing::trace!(%url, "GET");
        self.send(HTTP_CLIENT.get(&url), path).await
    }

    async fn post<B: Serialize>(
        &self,
        path: &str,
        body: Option<&B>,
    ) -> Result<serde_json::Value, ApiError> {
        let url = self.config.endpoint(path);
        tracing::trace!(%url, "POST");
        let request = HTTP_CLIENT.post(&url);
        let request = match body {
            Some(body) => request.json(body),
            None => request.header(reqwest::header::CONTENT_TYPE, "application/json"),
        };
        self.send(request, path).await
    }
}

impl JukeboxApi for JukeboxClient {
    async fn submit_prompt(&self, prompt: &str) -> Result<SubmissionResult, ApiError> {
        let body = self
            .post(REQUEST_SONG_PATH, Some(&PromptRequest { prompt }))
            .await?;
        decode(body)
    }

    async fn request_skip(&self) -> Result<CommandStatus, ApiError> {
        let body = self.post::<()>(SKIP_PATH, None).await?;
        decode_status(body)
    }

    async fn toggle_pause(&self) -> Result<CommandStatus, ApiError> {
        let body = self.post::<()>(PAUSE_TOGGLE_PATH, None).await?;
        decode_status(body)
    }

    async fn toggle_clean_mode(&self, enabled: bool) -> Result<CleanModeStatus, ApiError> {
        let body = self
            .post(CLEAN_MODE_PATH, Some(&CleanModeRequest { prompt: enabled }))
            .await?;
        decode(body)
    }

    async fn read_current_song(&self) -> Result<Option<CurrentSong>, ApiError> {
        let body = self.get(CURRENT_SONG_PATH).await?;
        Ok(current_song_from_json(&body))
    }

    async fn read_queue(&self) -> Result<Vec<QueueEntry>, ApiError> {
        let body = self.get(QUEUE_PATH).await?;
        Ok(queue_from_json(&body))
    }
}

fn parse_body(body: &str) -> Result<serde_json::Value, ApiError> {
    if body.trim().is_empty() {
        return Ok(serde_json::Value::Null);
    }
    serde_json::from_str(body).map_err(|e| ApiError::Decode(e.to_string()))
}

fn decode<T: DeserializeOwned>(body: serde_json::Value) -> Result<T, ApiError> {
    serde_json::from_value(body).map_err(|e| ApiError::Decode(e.to_string()))
}

// Skip and pause only report a free-form status; a missing body is still success.
fn decode_status(body: serde_json::Value) -> Result<CommandStatus, ApiError> {
    if body.is_null() {
        return Ok(CommandStatus::default());
    }
    Ok(CommandStatus {
        status: json_pick_string(&body, &["status"]).unwrap_or_default(),
    })
}

/// Normalizes every "nothing playing" shape to `None`: a null body, a
/// non-object body, or an object whose name is null, missing or blank.
pub fn current_song_from_json(value: &serde_json::Value) -> Option<CurrentSong> {
    let name = json_pick_string(value, &["name"])?;
    Some(CurrentSong {
        name,
        author: json_pick_string(value, &["author"]),
        duration_seconds: json_pick_u32(value, &["duration", "duration_seconds"]),
        url: json_pick_string(value, &["url"]),
        played_at: json_pick_string(value, &["played_at", "playedAt"]),
        active: json_pick_bool(value, &["active"]).unwrap_or(true),
        paused: json_pick_bool(value, &["paused"]).unwrap_or(false),
    })
}

/// A body that is not a sequence reads as an empty queue.
pub fn queue_from_json(value: &serde_json::Value) -> Vec<QueueEntry> {
    let Some(items) = value.as_array() else {
        if !value.is_null() {
            tracing::warn!("queue response was not a list; treating it as empty");
        }
        return Vec::new();
    };

    items
        .iter()
        .filter_map(|item| {
            let name = json_pick_string(item, &["name"])?;
            Some(QueueEntry {
                name,
                author: json_pick_string(item, &["author"]).unwrap_or_default(),
                // Older servers misspell the key as `Duratio`.
                duration_seconds: json_pick_u32(item, &["duration", "Duratio"]).unwrap_or(0),
                url: json_pick_string(item, &["url"]),
                search_prompt: json_pick_string(item, &["search_prompt"]),
                active: json_pick_bool(item, &["active"]),
            })
        })
        .collect()
}

/// First non-null value under any of `keys`. The jukebox server writes an
/// absent field as `null`, so a null must fall through to the next alias
/// rather than hide it.
fn json_pick_value<'a>(
    value: &'a serde_json::Value,
    keys: &[&str],
) -> Option<&'a serde_json::Value> {
    let object = value.as_object()?;
    for key in keys {
        if let Some(found) = object.get(*key) {
            if !found.is_null() {
                return Some(found);
            }
        }
    }
    None
}

fn json_pick_string(value: &serde_json::Value, keys: &[&str]) -> Option<String> {
    let picked = json_pick_value(value, keys)?;
    match picked {
        serde_json::Value::String(text) => {
            let trimmed = text.trim();
            if trimmed.is_empty() {
                None
            } else {
                Some(trimmed.to_string())
            }
        }
        serde_json::Value::Number(number) => Some(number.to_string()),
        serde_json::Value::Bool(boolean) => Some(boolean.to_string()),
        _ => None,
    }
}

fn json_pick_u32(value: &serde_json::Value, keys: &[&str]) -> Option<u32> {
    let picked = json_pick_value(value, keys)?;
    match picked {
        serde_json::Value::Number(number) => {
            if let Some(unsigned) = number.as_u64() {
                return u32::try_from(unsigned).ok();
            }
            if let Some(signed) = number.as_i64() {
                return u32::try_from(signed.max(0) as u64).ok();
            }
            if let Some(float) = number.as_f64() {
                if float.is_finite() && float >= 0.0 {
                    return u32::try_from(float.round() as u64).ok();
                }
            }
            None
        }
        serde_json::Value::String(text) => text.trim().parse::<u32>().ok(),
        _ => None,
    }
}

fn json_pick_bool(value: &serde_json::Value, keys: &[&str]) -> Option<bool> {
    let picked = json_pick_value(value, keys)?;
    match picked {
        serde_json::Value::Bool(boolean) => Some(*boolean),
        serde_json::Value::String(text) => match text.trim().to_ascii_lowercase().as_str() {
            "1" | "true" | "yes" => Some(true),
            "0" | "false" | "no" => Some(false),
            _ => None,
        },
        serde_json::Value::Number(number) => {
            if let Some(unsigned) = number.as_u64() {
                Some(unsigned > 0)
            } else {
                number.as_i64().map(|signed| signed > 0)
            }
        }
        _ => None,
    }
}
