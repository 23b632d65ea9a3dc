use crate::api::models::{CurrentSong, SubmissionResult};
use crate::api::{JukeboxClient, JukeboxConfig};
use crate::components::{Glyph, Icon, QueuePanel};
use crate::sync::{CommandCoordinator, CommandKind, SyncPoller, ViewState};
use dioxus::prelude::*;
use std::cell::RefCell;
use std::rc::Rc;

type Coordinator = CommandCoordinator<JukeboxClient, Signal<ViewState>>;

pub(crate) fn now_playing_text(song: Option<&CurrentSong>) -> String {
    match song {
        None => "None".to_string(),
        Some(song) => match song.duration_label() {
            Some(duration) => format!("{} by {} ({duration})", song.name, song.author_label()),
            None => format!("{} by {}", song.name, song.author_label()),
        },
    }
}

fn button_label(busy: bool, idle: &'static str, working: &'static str) -> &'static str {
    if busy {
        working
    } else {
        idle
    }
}

/// The whole controller page. Owns the view state, the poller and the
/// command coordinator for as long as it is mounted.
#[component]
pub fn JukeboxView() -> Element {
    let config = use_hook(JukeboxConfig::detect);
    let view = use_signal(ViewState::default);
    let mut prompt = use_signal(String::new);
    let api = use_hook(|| Rc::new(JukeboxClient::new(config.clone())));
    let coordinator: Coordinator = use_hook(|| CommandCoordinator::new(api.clone(), view));
    let poller = use_hook(|| Rc::new(RefCell::new(SyncPoller::new(config.poll_interval()))));

    {
        let poller = poller.clone();
        let api = api.clone();
        use_hook(move || {
            if let Some(task) = poller.borrow_mut().start(api, view) {
                spawn(task);
            }
        });
    }
    {
        let poller = poller.clone();
        use_drop(move || {
            poller.borrow_mut().stop();
        });
    }

    let state = view();

    let on_submit = {
        let coordinator = coordinator.clone();
        move |evt: FormEvent| {
            evt.prevent_default();
            let coordinator = coordinator.clone();
            let text = prompt.peek().clone();
            spawn(async move {
                coordinator.submit(&text).await;
            });
        }
    };

    let on_skip = {
        let coordinator = coordinator.clone();
        move |_| {
            let coordinator = coordinator.clone();
            spawn(async move {
                coordinator.skip().await;
            });
        }
    };

    let on_pause = {
        let coordinator = coordinator.clone();
        move |_| {
            let coordinator = coordinator.clone();
            spawn(async move {
                coordinator.pause().await;
            });
        }
    };

    let on_clean_mode = {
        let coordinator = coordinator.clone();
        move |_| {
            let coordinator = coordinator.clone();
            spawn(async move {
                coordinator.toggle_clean_mode().await;
            });
        }
    };

    let can_pause = state.can_control_playback(CommandKind::Pause);
    let can_skip = state.can_control_playback(CommandKind::Skip);
    let pause_idle_label = if state.is_paused() { "Play" } else { "Pause / Play" };
    let submit_label = button_label(state.submitting, "Play Song!", "Loading...");
    let pause_label = button_label(state.pausing, pause_idle_label, "Pausing...");
    let skip_label = button_label(state.skipping, "Skip", "Skipping...");
    let clean_mode_label = match state.clean_mode {
        Some(true) => "Clean mode: on",
        Some(false) => "Clean mode: off",
        None => "Clean mode",
    };

    rsx! {
        div { class: "min-h-screen flex flex-col items-center justify-center font-sans px-4",
            h1 { class: "text-5xl sm:text-6xl font-bold mb-8", "Jukebox Controller" }

            NowPlaying { song: state.current_song.clone() }

            form { class: "w-full max-w-md flex flex-col items-center", onsubmit: on_submit,
                input {
                    r#type: "text",
                    value: "{prompt}",
                    placeholder: "Enter text",
                    class: "border rounded px-4 py-2 mb-4 w-full bg-zinc-900",
                    oninput: move |evt| prompt.set(evt.value()),
                }
                button {
                    r#type: "submit",
                    class: "px-6 py-2 rounded font-semibold text-lg shadow bg-blue-500 hover:bg-blue-600 disabled:bg-blue-300 disabled:cursor-not-allowed min-w-[140px]",
                    disabled: state.submitting,
                    if state.submitting {
                        Icon { glyph: Glyph::Loader, class: "w-5 h-5 inline mr-2".to_string() }
                    }
                    "{submit_label}"
                }
            }

            div { class: "flex gap-4 justify-center my-4 w-full",
                button {
                    r#type: "button",
                    class: "px-4 py-2 rounded font-semibold shadow bg-yellow-500 hover:bg-yellow-600 disabled:bg-zinc-500 disabled:cursor-not-allowed min-w-[110px] flex items-center justify-center gap-2",
                    disabled: !can_pause,
                    onclick: on_pause,
                    Icon {
                        glyph: if state.is_paused() { Glyph::Play } else { Glyph::Pause },
                        class: "w-4 h-4".to_string(),
                    }
                    "{pause_label}"
                }
                button {
                    r#type: "button",
                    class: "px-4 py-2 rounded font-semibold shadow bg-red-500 hover:bg-red-600 disabled:bg-zinc-500 disabled:cursor-not-allowed min-w-[110px] flex items-center justify-center gap-2",
                    disabled: !can_skip,
                    onclick: on_skip,
                    Icon { glyph: Glyph::Skip, class: "w-4 h-4".to_string() }
                    "{skip_label}"
                }
                button {
                    r#type: "button",
                    class: if state.clean_mode == Some(true) { "px-4 py-2 rounded font-semibold shadow bg-emerald-600 hover:bg-emerald-700 disabled:cursor-not-allowed flex items-center gap-2" } else { "px-4 py-2 rounded font-semibold shadow bg-zinc-700 hover:bg-zinc-600 disabled:cursor-not-allowed flex items-center gap-2" },
                    disabled: state.toggling_clean_mode,
                    onclick: on_clean_mode,
                    Icon { glyph: Glyph::Shield, class: "w-4 h-4".to_string() }
                    "{clean_mode_label}"
                }
            }

            if let Some(result) = state.last_submission.clone() {
                SubmissionPanel { result }
            }
            if let Some(message) = state.error.clone() {
                div { class: "mt-4 text-red-500", "{message}" }
            }

            QueuePanel { entries: state.queue.clone(), syncing: state.is_refreshing() }
        }
    }
}

#[component]
fn NowPlaying(#[props(!optional)] song: Option<CurrentSong>) -> Element {
    let Some(current) = song else {
        return rsx! {
            p { class: "text-lg mb-4", "Current Song: {now_playing_text(None)}" }
        };
    };

    let started = current
        .played_at_time()
        .map(|played_at| played_at.format("%H:%M").to_string());

    rsx! {
        p { class: "text-lg mb-4 flex flex-wrap items-center gap-2",
            "Current Song: "
            Icon { glyph: Glyph::Music, class: "w-4 h-4 text-zinc-400".to_string() }
            span { class: "font-semibold", "{current.name}" }
            " by "
            span { class: "italic", "{current.author_label()}" }
            if let Some(duration) = current.duration_label() {
                span { class: "text-zinc-400 text-xs", "({duration})" }
            }
            if current.paused {
                span { class: "text-yellow-400 text-xs uppercase", "paused" }
            }
            if let Some(started) = started {
                span { class: "text-zinc-500 text-xs", "since {started}" }
            }
            if let Some(url) = current.url.clone() {
                a {
                    href: "{url}",
                    target: "_blank",
                    rel: "noopener noreferrer",
                    class: "text-blue-300 underline ml-2 inline-flex items-center gap-1",
                    "Link"
                    Icon { glyph: Glyph::Link, class: "w-3 h-3".to_string() }
                }
            }
        }
    }
}

#[component]
fn SubmissionPanel(result: SubmissionResult) -> Element {
    rsx! {
        div { class: "mt-4 text-left",
            div { "Status: {result.status}" }
            div { "Song: {result.song}" }
            div { "Author: {result.author}" }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::jukebox::current_song_from_json;
    use serde_json::json;

    #[test]
    fn null_name_renders_as_none() {
        let song = current_song_from_json(&json!({
            "name": null,
            "author": "Bill Evans",
            "duration": 318,
            "active": false
        }));
        assert_eq!(now_playing_text(song.as_ref()), "None");
    }

    #[test]
    fn playing_song_renders_name_author_and_duration() {
        let song = current_song_from_json(&json!({
            "name": "Autumn Leaves",
            "author": "Bill Evans",
            "duration": 318
        }));
        assert_eq!(
            now_playing_text(song.as_ref()),
            "Autumn Leaves by Bill Evans (5:18)"
        );
    }

    #[test]
    fn busy_buttons_swap_their_label() {
        assert_eq!(button_label(true, "Skip", "Skipping..."), "Skipping...");
        assert_eq!(button_label(false, "Skip", "Skipping..."), "Skip");
    }
}
