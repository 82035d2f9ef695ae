pub mod backend;
pub mod config;
pub mod controller;
pub mod error;
pub mod interact;
pub mod model;
pub mod timecode;

// Re-export key types for easier access
pub use backend::{AudioBackend, RodioBackend};
pub use config::{PlayerConfig, DEFAULT_TITLE, DEFAULT_VOLUME};
pub use controller::PlayerController;
pub use error::{PlayerError, Result};
pub use interact::{click_fraction, BarBounds};
pub use model::{LoadState, PlayerState, StateChange};
pub use timecode::to_timecode;
