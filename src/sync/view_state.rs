use crate::api::{ApiError, CurrentSong, QueueEntry, SubmissionResult};
use dioxus::prelude::*;
use std::cell::RefCell;
use std::rc::Rc;

/// Everything the jukebox view renders. Created empty on mount; only the
/// poller and the command coordinator write to it.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ViewState {
    pub current_song: Option<CurrentSong>,
    pub queue: Vec<QueueEntry>,
    pub error: Option<String>,
    pub last_submission: Option<SubmissionResult>,
    /// Last mode the server reported; unknown until the first toggle.
    pub clean_mode: Option<bool>,
    pub submitting: bool,
    pub skipping: bool,
    pub pausing: bool,
    pub toggling_clean_mode: bool,
    pub refreshes_in_flight: u32,
}

impl ViewState {
    pub fn is_in_flight(&self, kind: CommandKind) -> bool {
        match kind {
            CommandKind::Submit => self.submitting,
            CommandKind::Skip => self.skipping,
            CommandKind::Pause => self.pausing,
            CommandKind::CleanMode => self.toggling_clean_mode,
        }
    }

    fn set_in_flight(&mut self, kind: CommandKind, value: bool) {
        let flag = match kind {
            CommandKind::Submit => &mut self.submitting,
            CommandKind::Skip => &mut self.skipping,
            CommandKind::Pause => &mut self.pausing,
            CommandKind::CleanMode => &mut self.toggling_clean_mode,
        };
        *flag = value;
    }

    pub fn is_refreshing(&self) -> bool {
        self.refreshes_in_flight > 0
    }

    pub fn is_paused(&self) -> bool {
        self.current_song.as_ref().is_some_and(|song| song.paused)
    }

    /// Skip and pause only make sense while something is playing.
    pub fn can_control_playback(&self, kind: CommandKind) -> bool {
        self.current_song.is_some() && !self.is_in_flight(kind)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CommandKind {
    Submit,
    Skip,
    Pause,
    CleanMode,
}

impl CommandKind {
    pub fn label(self) -> &'static str {
        match self {
            Self::Submit => "submit",
            Self::Skip => "skip",
            Self::Pause => "pause",
            Self::CleanMode => "clean_mode",
        }
    }

    pub fn failure_message(self, error: &ApiError) -> String {
        match self {
            Self::Submit => format!("Error contacting API: {error}"),
            Self::Skip => "Error skipping song.".to_string(),
            Self::Pause => "Error pausing song.".to_string(),
            Self::CleanMode => "Error toggling clean mode.".to_string(),
        }
    }
}

/// Shared handle to the live [`ViewState`].
///
/// Writes after the owning view is gone are dropped silently.
pub trait ViewStore: Clone + 'static {
    fn update<F: FnOnce(&mut ViewState)>(&self, update: F);
    fn inspect<R, F: FnOnce(&ViewState) -> R>(&self, inspect: F) -> Option<R>;
}

impl ViewStore for Signal<ViewState> {
    fn update<F: FnOnce(&mut ViewState)>(&self, update: F) {
        let mut signal = *self;
        match signal.try_write() {
            Ok(mut state) => update(&mut state),
            Err(err) => tracing::trace!(?err, "view state dropped; ignoring update"),
        };
    }

    fn inspect<R, F: FnOnce(&ViewState) -> R>(&self, inspect: F) -> Option<R> {
        self.try_peek().ok().map(|state| inspect(&state))
    }
}

impl ViewStore for Rc<RefCell<ViewState>> {
    fn update<F: FnOnce(&mut ViewState)>(&self, update: F) {
        match self.try_borrow_mut() {
            Ok(mut state) => update(&mut state),
            Err(err) => tracing::trace!(%err, "view state busy; ignoring update"),
        }
    }

    fn inspect<R, F: FnOnce(&ViewState) -> R>(&self, inspect: F) -> Option<R> {
        self.try_borrow().ok().map(|state| inspect(&state))
    }
}

/// Holds one command's in-flight flag; dropping it clears the flag.
pub struct InFlight<S: ViewStore> {
    store: S,
    kind: CommandKind,
}

impl<S: ViewStore> InFlight<S> {
    /// Returns `None` when the command is already in flight.
    pub fn acquire(store: &S, kind: CommandKind) -> Option<Self> {
        let mut claimed = false;
        store.update(|state| {
            if !state.is_in_flight(kind) {
                state.set_in_flight(kind, true);
                claimed = true;
            }
        });
        claimed.then(|| Self {
            store: store.clone(),
            kind,
        })
    }
}

impl<S: ViewStore> Drop for InFlight<S> {
    fn drop(&mut self) {
        let kind = self.kind;
        self.store.update(|state| state.set_in_flight(kind, false));
    }
}

/// Counts overlapping refreshes for the implicit "refreshing" flag.
pub(crate) struct RefreshGuard<S: ViewStore> {
    store: S,
}

impl<S: ViewStore> RefreshGuard<S> {
    pub(crate) fn enter(store: &S) -> Self {
        store.update(|state| state.refreshes_in_flight += 1);
        Self {
            store: store.clone(),
        }
    }
}

impl<S: ViewStore> Drop for RefreshGuard<S> {
    fn drop(&mut self) {
        self.store
            .update(|state| state.refreshes_in_flight = state.refreshes_in_flight.saturating_sub(1));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store() -> Rc<RefCell<ViewState>> {
        Rc::new(RefCell::new(ViewState::default()))
    }

    #[test]
    fn in_flight_is_exclusive_per_command() {
        let store = store();
        let skip = InFlight::acquire(&store, CommandKind::Skip).expect("first skip");
        assert!(InFlight::acquire(&store, CommandKind::Skip).is_none());

        let pause = InFlight::acquire(&store, CommandKind::Pause);
        assert!(pause.is_some());
        assert!(store.borrow().skipping);
        assert!(store.borrow().pausing);

        drop(skip);
        assert!(!store.borrow().skipping);
        assert!(InFlight::acquire(&store, CommandKind::Skip).is_some());
    }

    #[test]
    fn refresh_guard_counts_overlaps() {
        let store = store();
        let first = RefreshGuard::enter(&store);
        let second = RefreshGuard::enter(&store);
        assert_eq!(store.borrow().refreshes_in_flight, 2);
        drop(first);
        assert!(store.borrow().is_refreshing());
        drop(second);
        assert!(!store.borrow().is_refreshing());
    }

    #[test]
    fn playback_controls_need_a_song() {
        let mut state = ViewState::default();
        assert!(!state.can_control_playback(CommandKind::Skip));

        state.current_song = Some(CurrentSong {
            name: "So What".to_string(),
            author: Some("Miles Davis".to_string()),
            duration_seconds: Some(562),
            url: None,
            played_at: None,
            active: true,
            paused: false,
        });
        assert!(state.can_control_playback(CommandKind::Skip));

        state.skipping = true;
        assert!(!state.can_control_playback(CommandKind::Skip));
        assert!(state.can_control_playback(CommandKind::Pause));
    }

    #[test]
    fn failure_messages_are_command_specific() {
        let err = ApiError::Status { status: 500 };
        assert_eq!(CommandKind::Skip.failure_message(&err), "Error skipping song.");
        assert_eq!(CommandKind::Pause.failure_message(&err), "Error pausing song.");
        assert_eq!(
            CommandKind::Submit.failure_message(&err),
            "Error contacting API: server returned HTTP 500"
        );
    }

    type Slot = Rc<RefCell<Option<Signal<ViewState>>>>;

    fn mounted_view(slot: Slot) -> Element {
        let view = use_signal(ViewState::default);
        slot.borrow_mut().get_or_insert(view);
        rsx! {}
    }

    #[test]
    fn signal_store_ignores_writes_after_unmount() {
        let slot: Slot = Rc::default();
        let mut dom = VirtualDom::new_with_props(mounted_view, slot.clone());
        dom.rebuild_in_place();
        let view = slot.borrow().expect("view signal captured on mount");

        let skip = dom.in_runtime(|| {
            view.update(|state| state.error = Some("Could not fetch queue.".to_string()));
            InFlight::acquire(&view, CommandKind::Skip).expect("skip starts idle")
        });
        let mounted = dom.in_runtime(|| view.inspect(|state| (state.skipping, state.error.clone())));
        assert_eq!(mounted, Some((true, Some("Could not fetch queue.".to_string()))));

        drop(dom);

        view.update(|state| state.error = None);
        assert_eq!(view.inspect(|state| state.skipping), None);
        assert!(InFlight::acquire(&view, CommandKind::Pause).is_none());
        drop(skip);
    }
}
