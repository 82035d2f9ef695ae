mod player_state;
mod state_change;

pub use player_state::{LoadState, PlayerState};
pub use state_change::StateChange;
