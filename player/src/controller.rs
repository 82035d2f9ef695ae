use std::sync::mpsc::{self, Receiver};

use log::{debug, error, warn};

use crate::backend::AudioBackend;
use crate::config::PlayerConfig;
use crate::error::Result;
use crate::interact::{click_fraction, BarBounds};
use crate::model::{LoadState, PlayerState, StateChange};

/// Owns a playback backend exclusively and mirrors its observable state into
/// a [`PlayerState`] read model for the presentation layer.
///
/// All mutation happens inside direct method calls or [`process_events`];
/// notifications are applied in delivery order, never reordered or debounced.
///
/// [`process_events`]: PlayerController::process_events
pub struct PlayerController<B: AudioBackend> {
    backend: B,
    state: PlayerState,
    events: Receiver<StateChange>,
    initial_volume: f32,
}

impl<B: AudioBackend> PlayerController<B> {
    /// Subscribes to the backend, starts loading the configured source, and
    /// returns the controller.
    pub fn new(config: PlayerConfig, mut backend: B) -> Result<Self> {
        let (tx, rx) = mpsc::channel();
        backend.subscribe(tx);
        backend.load(&config.source)?;

        Ok(Self {
            backend,
            state: PlayerState::new(config.title),
            events: rx,
            initial_volume: config.initial_volume,
        })
    }

    /// The read model consumed by the presentation layer.
    pub fn state(&self) -> &PlayerState {
        &self.state
    }

    /// Flips the playing flag and issues the matching transport call. The
    /// start/pause request is always sent; the backend is idempotent about
    /// its current transport state.
    pub fn toggle_play(&mut self) -> Result<()> {
        if let LoadState::Failed(_) = self.state.load {
            warn!("ignoring toggle_play: track failed to load");
            return Ok(());
        }

        self.state.is_playing = !self.state.is_playing;
        if self.state.is_playing {
            self.backend.play()
        } else {
            self.backend.pause()
        }
    }

    /// Swaps the track source. The old subscription channel is dropped before
    /// the new source loads, so notifications from the previous resource can
    /// never reach this controller.
    pub fn set_track_source(&mut self, source: &str) -> Result<()> {
        debug!("switching source to {}", source);

        self.backend.pause()?;
        let (tx, rx) = mpsc::channel();
        self.backend.subscribe(tx);
        self.events = rx;

        self.state.is_playing = false;
        self.state.current_time = 0.0;
        self.state.duration = 0.0;
        self.state.load = LoadState::Loading;

        self.backend.load(source)
    }

    /// Applies a volume fraction, clamped to [0, 1]. The local field is not
    /// written here; it mirrors the backend's volume-changed notification.
    pub fn set_volume(&mut self, fraction: f32) -> Result<()> {
        self.backend.set_volume(fraction.clamp(0.0, 1.0))
    }

    /// Flips the mute flag. Independent of the playing flag: muting does not
    /// pause.
    pub fn toggle_mute(&mut self) -> Result<()> {
        self.state.is_muted = !self.state.is_muted;
        self.backend.set_muted(self.state.is_muted)
    }

    /// Seeks to `floor(fraction * duration)` seconds, fraction clamped to
    /// [0, 1]. Inert until metadata is known, and after a failed load.
    pub fn seek(&mut self, fraction: f64) -> Result<()> {
        if self.state.load != LoadState::Ready || self.state.duration <= 0.0 {
            return Ok(());
        }

        let seconds = (fraction.clamp(0.0, 1.0) * self.state.duration).floor() as u64;
        self.backend.set_position(seconds)
    }

    /// Seek callback for the presentation layer's timeline bar.
    pub fn seek_click(&mut self, pointer_x: f64, bar: BarBounds) -> Result<()> {
        self.seek(click_fraction(pointer_x, bar))
    }

    /// Volume callback for the presentation layer's volume bar.
    pub fn volume_click(&mut self, pointer_x: f64, bar: BarBounds) -> Result<()> {
        self.set_volume(click_fraction(pointer_x, bar) as f32)
    }

    /// Lets the backend synthesize pending notifications, then drains them.
    /// Call once per frame.
    pub fn tick(&mut self) -> Result<()> {
        self.backend.tick();
        self.process_events()
    }

    /// Drains the subscription channel, applying each notification in
    /// delivery order.
    pub fn process_events(&mut self) -> Result<()> {
        while let Ok(change) = self.events.try_recv() {
            self.apply(change)?;
        }
        Ok(())
    }

    fn apply(&mut self, change: StateChange) -> Result<()> {
        match change {
            StateChange::MetadataLoaded { duration } => {
                debug!("metadata loaded, duration {:.1}s", duration);
                self.state.duration = duration;
                self.state.load = LoadState::Ready;
                self.backend.set_volume(self.initial_volume)?;
            }
            StateChange::PlaybackEnded => {
                self.state.current_time = 0.0;
                self.state.is_playing = false;
            }
            StateChange::PositionChanged { seconds } => {
                self.state.current_time = seconds;
            }
            StateChange::VolumeChanged { volume } => {
                self.state.volume = volume;
            }
            StateChange::LoadFailed { message } => {
                error!("track load failed: {}", message);
                self.state.is_playing = false;
                self.state.load = LoadState::Failed(message);
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::mock::MockBackend;
    use mockall::predicate::eq;
    use mockall::Sequence;
    use std::sync::mpsc::Sender;
    use std::sync::{Arc, Mutex};

    type SharedSender = Arc<Mutex<Option<Sender<StateChange>>>>;

    /// A mock that captures each subscribed sender so tests can inject
    /// notifications, with load expected once per subscription.
    fn subscribed_mock(captured: &SharedSender) -> MockBackend {
        let mut backend = MockBackend::new();
        let slot = Arc::clone(captured);
        backend
            .expect_subscribe()
            .returning(move |tx| *slot.lock().unwrap() = Some(tx));
        backend.expect_load().returning(|_| Ok(()));
        backend
    }

    fn send(captured: &SharedSender, change: StateChange) {
        captured
            .lock()
            .unwrap()
            .as_ref()
            .expect("no sender captured")
            .send(change)
            .expect("receiver dropped");
    }

    fn ready_controller(
        captured: &SharedSender,
        backend: MockBackend,
        duration: f64,
    ) -> PlayerController<MockBackend> {
        let mut controller =
            PlayerController::new(PlayerConfig::default(), backend).expect("construction failed");
        send(captured, StateChange::MetadataLoaded { duration });
        controller.process_events().expect("event processing failed");
        controller
    }

    #[test]
    fn test_new_loads_configured_source() {
        let mut backend = MockBackend::new();
        backend.expect_subscribe().returning(|_| ());
        backend
            .expect_load()
            .withf(|source| source == "night-drive.ogg")
            .times(1)
            .returning(|_| Ok(()));

        let config = PlayerConfig::new()
            .with_title("Night Drive")
            .with_source("night-drive.ogg");
        let controller = PlayerController::new(config, backend).unwrap();

        assert_eq!(controller.state().title, "Night Drive");
        assert_eq!(controller.state().load, LoadState::Loading);
        assert!(!controller.state().is_playing);
    }

    #[test]
    fn test_toggle_play_twice_issues_play_then_pause() {
        let captured: SharedSender = Arc::new(Mutex::new(None));
        let mut backend = subscribed_mock(&captured);

        let mut seq = Sequence::new();
        backend
            .expect_play()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|| Ok(()));
        backend
            .expect_pause()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|| Ok(()));

        let mut controller =
            PlayerController::new(PlayerConfig::default(), backend).unwrap();

        controller.toggle_play().unwrap();
        assert!(controller.state().is_playing);

        controller.toggle_play().unwrap();
        assert!(!controller.state().is_playing);
    }

    #[test]
    fn test_toggle_mute_is_its_own_inverse() {
        let mut backend = MockBackend::new();
        backend.expect_subscribe().returning(|_| ());
        backend.expect_load().returning(|_| Ok(()));

        let mut seq = Sequence::new();
        backend
            .expect_set_muted()
            .with(eq(true))
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_| Ok(()));
        backend
            .expect_set_muted()
            .with(eq(false))
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_| Ok(()));

        let mut controller =
            PlayerController::new(PlayerConfig::default(), backend).unwrap();

        controller.toggle_mute().unwrap();
        assert!(controller.state().is_muted);

        controller.toggle_mute().unwrap();
        assert!(!controller.state().is_muted);
    }

    #[test]
    fn test_metadata_sets_duration_and_pushes_initial_volume() {
        let captured: SharedSender = Arc::new(Mutex::new(None));
        let mut backend = subscribed_mock(&captured);
        backend
            .expect_set_volume()
            .with(eq(0.75f32))
            .times(1)
            .returning(|_| Ok(()));

        let controller = ready_controller(&captured, backend, 200.0);

        assert_eq!(controller.state().duration, 200.0);
        assert_eq!(controller.state().load, LoadState::Ready);
    }

    #[test]
    fn test_seek_applies_floor_of_fraction_times_duration() {
        let captured: SharedSender = Arc::new(Mutex::new(None));
        let mut backend = subscribed_mock(&captured);
        backend.expect_set_volume().returning(|_| Ok(()));
        backend
            .expect_set_position()
            .with(eq(100u64))
            .times(1)
            .returning(|_| Ok(()));

        let mut controller = ready_controller(&captured, backend, 200.0);
        controller.seek(0.5).unwrap();
    }

    #[test]
    fn test_seek_truncates_fractional_seconds() {
        let captured: SharedSender = Arc::new(Mutex::new(None));
        let mut backend = subscribed_mock(&captured);
        backend.expect_set_volume().returning(|_| Ok(()));
        // 0.333 * 100 = 33.3, floored
        backend
            .expect_set_position()
            .with(eq(33u64))
            .times(1)
            .returning(|_| Ok(()));

        let mut controller = ready_controller(&captured, backend, 100.0);
        controller.seek(0.333).unwrap();
    }

    #[test]
    fn test_seek_clamps_out_of_range_fractions() {
        let captured: SharedSender = Arc::new(Mutex::new(None));
        let mut backend = subscribed_mock(&captured);
        backend.expect_set_volume().returning(|_| Ok(()));

        let mut seq = Sequence::new();
        backend
            .expect_set_position()
            .with(eq(200u64))
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_| Ok(()));
        backend
            .expect_set_position()
            .with(eq(0u64))
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_| Ok(()));

        let mut controller = ready_controller(&captured, backend, 200.0);
        controller.seek(1.5).unwrap();
        controller.seek(-0.5).unwrap();
    }

    #[test]
    fn test_seek_is_inert_before_metadata() {
        let captured: SharedSender = Arc::new(Mutex::new(None));
        let backend = subscribed_mock(&captured);
        // no expect_set_position: a backend call would panic the mock

        let mut controller =
            PlayerController::new(PlayerConfig::default(), backend).unwrap();
        controller.seek(0.5).unwrap();
    }

    #[test]
    fn test_set_volume_clamps_fraction() {
        let captured: SharedSender = Arc::new(Mutex::new(None));
        let mut backend = subscribed_mock(&captured);

        let mut seq = Sequence::new();
        backend
            .expect_set_volume()
            .with(eq(1.0f32))
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_| Ok(()));
        backend
            .expect_set_volume()
            .with(eq(0.0f32))
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_| Ok(()));

        let mut controller =
            PlayerController::new(PlayerConfig::default(), backend).unwrap();
        controller.set_volume(1.5).unwrap();
        controller.set_volume(-0.2).unwrap();
    }

    #[test]
    fn test_volume_notification_mirrors_exactly() {
        let captured: SharedSender = Arc::new(Mutex::new(None));
        let backend = subscribed_mock(&captured);

        let mut controller =
            PlayerController::new(PlayerConfig::default(), backend).unwrap();
        send(&captured, StateChange::VolumeChanged { volume: 0.62 });
        controller.process_events().unwrap();

        assert_eq!(controller.state().volume, 0.62);
    }

    #[test]
    fn test_playback_ended_resets_position_and_playing_flag() {
        let captured: SharedSender = Arc::new(Mutex::new(None));
        let mut backend = subscribed_mock(&captured);
        backend.expect_set_volume().returning(|_| Ok(()));
        backend.expect_play().returning(|| Ok(()));

        let mut controller = ready_controller(&captured, backend, 200.0);
        controller.toggle_play().unwrap();
        send(&captured, StateChange::PositionChanged { seconds: 199.5 });
        send(&captured, StateChange::PlaybackEnded);
        controller.process_events().unwrap();

        assert_eq!(controller.state().current_time, 0.0);
        assert!(!controller.state().is_playing);
    }

    #[test]
    fn test_load_failure_disables_time_controls() {
        let captured: SharedSender = Arc::new(Mutex::new(None));
        let backend = subscribed_mock(&captured);
        // neither set_position nor play may reach the backend after a failure

        let mut controller =
            PlayerController::new(PlayerConfig::default(), backend).unwrap();
        send(
            &captured,
            StateChange::LoadFailed {
                message: "decode error".into(),
            },
        );
        controller.process_events().unwrap();

        assert_eq!(
            controller.state().load,
            LoadState::Failed("decode error".into())
        );
        controller.seek(0.5).unwrap();
        controller.toggle_play().unwrap();
        assert!(!controller.state().is_playing);
    }

    #[test]
    fn test_source_swap_resets_state_and_detaches_old_channel() {
        let captured: SharedSender = Arc::new(Mutex::new(None));
        let mut backend = subscribed_mock(&captured);
        backend.expect_set_volume().returning(|_| Ok(()));
        backend.expect_pause().returning(|| Ok(()));

        let mut controller = ready_controller(&captured, backend, 200.0);
        send(&captured, StateChange::PositionChanged { seconds: 42.0 });
        controller.process_events().unwrap();
        let old_sender = captured.lock().unwrap().take().unwrap();

        controller.set_track_source("other-track.mp3").unwrap();

        assert!(!controller.state().is_playing);
        assert_eq!(controller.state().current_time, 0.0);
        assert_eq!(controller.state().duration, 0.0);
        assert_eq!(controller.state().load, LoadState::Loading);

        // the pre-swap channel is closed: nothing sent on it can arrive
        assert!(old_sender
            .send(StateChange::PositionChanged { seconds: 99.0 })
            .is_err());
        controller.process_events().unwrap();
        assert_eq!(controller.state().current_time, 0.0);
    }

    #[test]
    fn test_interaction_callbacks_route_through_bar_fraction() {
        let captured: SharedSender = Arc::new(Mutex::new(None));
        let mut backend = subscribed_mock(&captured);
        backend.expect_set_volume().returning(|_| Ok(()));
        backend
            .expect_set_position()
            .with(eq(100u64))
            .times(1)
            .returning(|_| Ok(()));

        let mut controller = ready_controller(&captured, backend, 200.0);
        // click dead center of a bar spanning x = 10..110
        controller
            .seek_click(60.0, BarBounds::new(10.0, 100.0))
            .unwrap();
    }
}
