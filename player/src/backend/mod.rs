mod rodio;

#[cfg(any(test, feature = "mock"))]
pub mod mock;

pub use self::rodio::RodioBackend;

use std::sync::mpsc::Sender;

use crate::error::Result;
use crate::model::StateChange;

/// The playback resource surface consumed by the controller: transport
/// control, position, volume, mute, and a notification subscription.
///
/// Load failures are reported through the subscription channel as
/// [`StateChange::LoadFailed`], the way a platform media element reports
/// them; `Err` from `load` is reserved for output-device failures.
pub trait AudioBackend {
    fn load(&mut self, source: &str) -> Result<()>;

    fn play(&mut self) -> Result<()>;
    fn pause(&mut self) -> Result<()>;

    fn set_position(&mut self, seconds: u64) -> Result<()>;
    fn position(&self) -> f64;

    fn set_volume(&mut self, volume: f32) -> Result<()>;
    fn volume(&self) -> f32;

    fn set_muted(&mut self, muted: bool) -> Result<()>;
    fn muted(&self) -> bool;

    fn duration(&self) -> f64;

    /// Register the channel notifications are delivered on. Replaces any
    /// previous sender, so a re-subscribed backend never delivers through a
    /// stale channel.
    fn subscribe(&mut self, tx: Sender<StateChange>);

    /// Drive periodic notifications (position updates, end-of-track). Called
    /// from the host's frame loop; backends with real event delivery may
    /// leave this a no-op.
    fn tick(&mut self) {}
}
