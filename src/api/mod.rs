pub mod jukebox;
pub mod models;

pub use jukebox::{ApiError, JukeboxApi, JukeboxClient};
pub use models::*;
