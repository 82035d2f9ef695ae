/// A notification emitted by the playback resource, delivered to the
/// controller over the subscription channel in platform order.
#[derive(Debug, Clone, PartialEq)]
pub enum StateChange {
  MetadataLoaded {
    duration: f64,
  },
  PlaybackEnded,
  PositionChanged {
    seconds: f64,
  },
  VolumeChanged {
    volume: f32,
  },
  LoadFailed {
    message: String,
  },
}
