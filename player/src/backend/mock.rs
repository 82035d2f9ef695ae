use mockall::mock;
use std::sync::mpsc::Sender;

use crate::backend::AudioBackend;
use crate::error::PlayerError;
use crate::model::StateChange;

mock! {
  pub Backend {}

  impl AudioBackend for Backend {
    fn load(&mut self, source: &str) -> Result<(), PlayerError>;

    fn play(&mut self) -> Result<(), PlayerError>;
    fn pause(&mut self) -> Result<(), PlayerError>;

    fn set_position(&mut self, seconds: u64) -> Result<(), PlayerError>;
    fn position(&self) -> f64;

    fn set_volume(&mut self, volume: f32) -> Result<(), PlayerError>;
    fn volume(&self) -> f32;

    fn set_muted(&mut self, muted: bool) -> Result<(), PlayerError>;
    fn muted(&self) -> bool;

    fn duration(&self) -> f64;

    fn subscribe(&mut self, tx: Sender<StateChange>);

    fn tick(&mut self);
  }
}

/// Builds a MockBackend with permissive defaults so tests only spell out the
/// expectations they care about.
pub struct MockBackendBuilder {
  duration: f64,
  volume: f32,
}

impl MockBackendBuilder {
  pub fn new() -> Self {
    Self {
      duration: 0.0,
      volume: 0.75,
    }
  }

  pub fn duration(mut self, duration: f64) -> Self {
    self.duration = duration;
    self
  }

  pub fn volume(mut self, volume: f32) -> Self {
    self.volume = volume;
    self
  }

  pub fn build(self) -> MockBackend {
    let mut backend = MockBackend::new();

    backend.expect_load().returning(|_| Ok(()));
    backend.expect_play().returning(|| Ok(()));
    backend.expect_pause().returning(|| Ok(()));
    backend.expect_set_position().returning(|_| Ok(()));
    backend.expect_position().return_const(0.0f64);
    backend.expect_set_volume().returning(|_| Ok(()));
    backend.expect_volume().return_const(self.volume);
    backend.expect_set_muted().returning(|_| Ok(()));
    backend.expect_muted().return_const(false);
    backend.expect_duration().return_const(self.duration);
    backend.expect_subscribe().returning(|_| ());
    backend.expect_tick().returning(|| ());

    backend
  }
}

impl Default for MockBackendBuilder {
  fn default() -> Self {
    Self::new()
  }
}
