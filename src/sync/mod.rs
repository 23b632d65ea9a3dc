//! Keeps the view in step with the jukebox server: a poller for reads and a
//! coordinator for user commands, both writing into one `ViewState`.

mod commands;
mod poller;
mod refresh;
mod view_state;

#[cfg(test)]
mod testing;

pub use commands::CommandCoordinator;
pub use poller::SyncPoller;
pub use view_state::{CommandKind, ViewState};
