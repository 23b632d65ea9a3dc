use crate::api::models::{format_duration, total_duration, QueueEntry};
use crate::components::{Glyph, Icon};
use dioxus::prelude::*;

pub(crate) const EMPTY_QUEUE_TEXT: &str = "Queue is empty";

pub(crate) fn queue_summary(entries: &[QueueEntry]) -> String {
    match entries.len() {
        0 => EMPTY_QUEUE_TEXT.to_string(),
        1 => format!("1 song • {}", format_duration(total_duration(entries))),
        count => format!("{count} songs • {}", format_duration(total_duration(entries))),
    }
}

/// Upcoming songs in playback order. Stale entries stay on screen when a read
/// fails; only a successful empty read shows the empty state.
#[component]
pub fn QueuePanel(entries: Vec<QueueEntry>, syncing: bool) -> Element {
    let summary = queue_summary(&entries);

    rsx! {
        section { class: "mt-8 w-full max-w-md bg-zinc-800/60 rounded-2xl border border-zinc-700/30 p-4",
            header { class: "flex items-center justify-between mb-2",
                h2 { class: "text-xl font-semibold flex items-center gap-2",
                    Icon { glyph: Glyph::Queue, class: "w-5 h-5".to_string() }
                    "Queue"
                    if syncing {
                        Icon { glyph: Glyph::Loader, class: "w-4 h-4 text-zinc-500".to_string() }
                    }
                }
                if !entries.is_empty() {
                    span { class: "text-sm text-zinc-400", "{summary}" }
                }
            }

            if entries.is_empty() {
                div { class: "text-zinc-400 text-center py-6", "{EMPTY_QUEUE_TEXT}" }
            } else {
                ul { class: "divide-y divide-zinc-800/50",
                    for (idx , entry) in entries.iter().enumerate() {
                        li {
                            key: "{idx}-{entry.name}",
                            class: "py-2 px-2 flex items-center justify-between gap-4",
                            div { class: "flex items-center gap-3 min-w-0",
                                span { class: "w-6 text-center text-sm text-zinc-500", "{idx + 1}" }
                                div { class: "min-w-0",
                                    p { class: "font-medium truncate", "{entry.name}" }
                                    p { class: "text-zinc-400 text-sm truncate", "{entry.author}" }
                                }
                            }
                            span { class: "text-zinc-500 text-xs font-mono",
                                "{format_duration(entry.duration_seconds)}"
                            }
                        }
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(name: &str, duration_seconds: u32) -> QueueEntry {
        QueueEntry {
            name: name.to_string(),
            duration_seconds,
            ..QueueEntry::default()
        }
    }

    #[test]
    fn empty_queue_has_its_own_text() {
        assert_eq!(queue_summary(&[]), "Queue is empty");
    }

    #[test]
    fn summary_counts_songs_and_total_time() {
        assert_eq!(queue_summary(&[entry("So What", 65)]), "1 song • 1:05");
        assert_eq!(
            queue_summary(&[entry("So What", 65), entry("All Blues", 60)]),
            "2 songs • 2:05"
        );
    }
}
