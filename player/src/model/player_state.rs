/// Loading status of the current track source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadState {
  Loading,
  Ready,
  Failed(String),
}

/// Read model of the player, consumed by the presentation layer.
#[derive(Debug, Clone)]
pub struct PlayerState {
  pub title: String,
  pub is_playing: bool,
  pub is_muted: bool,
  pub current_time: f64,
  pub duration: f64,
  pub volume: f32,
  pub load: LoadState,
}

impl PlayerState {
  pub fn new(title: impl Into<String>) -> Self {
    Self {
      title: title.into(),
      is_playing: false,
      is_muted: false,
      current_time: 0.0,
      duration: 0.0,
      volume: 0.0,
      load: LoadState::Loading,
    }
  }

  /// Timeline progress in [0, 1]. Zero until the duration is known.
  pub fn progress(&self) -> f64 {
    if self.duration > 0.0 {
      (self.current_time / self.duration).clamp(0.0, 1.0)
    } else {
      0.0
    }
  }
}
