use std::fs::File;
use std::io::BufReader;
use std::sync::mpsc::Sender;
use std::time::Duration;

use log::{debug, warn};
use rodio::{Decoder, OutputStream, OutputStreamHandle, Sink, Source};

use crate::backend::AudioBackend;
use crate::error::{PlayerError, Result};
use crate::model::StateChange;

/// Minimum position delta before a PositionChanged notification is emitted.
const POSITION_EPSILON: f64 = 0.25;

/// Local playback over a rodio sink.
///
/// rodio has no native notifications, so this backend synthesizes them: load
/// emits MetadataLoaded or LoadFailed synchronously, and `tick()` (driven by
/// the host's frame loop) emits the periodic position updates and detects
/// end-of-track. Mute is volume 0 on the sink with the logical level kept
/// aside, since sinks carry no mute flag.
pub struct RodioBackend {
    _stream: OutputStream,
    handle: OutputStreamHandle,
    sink: Option<Sink>,
    source_path: Option<String>,
    duration: f64,
    level: f32,
    muted: bool,
    last_position: f64,
    events: Option<Sender<StateChange>>,
}

impl RodioBackend {
    pub fn new() -> Result<Self> {
        let (stream, handle) = OutputStream::try_default()
            .map_err(|e| PlayerError::NoOutputDevice(e.to_string()))?;

        Ok(Self {
            _stream: stream,
            handle,
            sink: None,
            source_path: None,
            duration: 0.0,
            level: 1.0,
            muted: false,
            last_position: 0.0,
            events: None,
        })
    }

    fn emit(&self, change: StateChange) {
        if let Some(tx) = &self.events {
            // A dropped receiver means the controller re-subscribed; the
            // stale notification is intentionally lost.
            let _ = tx.send(change);
        }
    }

    fn effective_volume(&self) -> f32 {
        if self.muted {
            0.0
        } else {
            self.level
        }
    }

    /// Opens and decodes `path` into a fresh paused sink, returning the
    /// decoded duration in seconds (0.0 when the container reports none).
    fn open_sink(&mut self, path: &str) -> Result<f64> {
        let file = File::open(path).map_err(|e| PlayerError::LoadError {
            url: path.into(),
            message: e.to_string(),
        })?;
        let decoder = Decoder::new(BufReader::new(file)).map_err(|e| PlayerError::LoadError {
            url: path.into(),
            message: e.to_string(),
        })?;
        let duration = decoder
            .total_duration()
            .map(|d| d.as_secs_f64())
            .unwrap_or(0.0);

        let sink = Sink::try_new(&self.handle)
            .map_err(|e| PlayerError::BackendError(e.to_string()))?;
        sink.pause();
        sink.set_volume(self.effective_volume());
        sink.append(decoder);

        self.sink = Some(sink);
        Ok(duration)
    }
}

impl AudioBackend for RodioBackend {
    fn load(&mut self, source: &str) -> Result<()> {
        if let Some(sink) = self.sink.take() {
            sink.stop();
        }
        self.last_position = 0.0;
        self.source_path = Some(source.to_string());

        match self.open_sink(source) {
            Ok(duration) => {
                self.duration = duration;
                debug!("loaded {} ({:.1}s)", source, duration);
                self.emit(StateChange::MetadataLoaded { duration });
                Ok(())
            }
            Err(PlayerError::LoadError { url, message }) => {
                warn!("load failed for {}: {}", url, message);
                self.emit(StateChange::LoadFailed { message });
                Ok(())
            }
            Err(e) => Err(e),
        }
    }

    fn play(&mut self) -> Result<()> {
        if let Some(sink) = &self.sink {
            sink.play();
        }
        Ok(())
    }

    fn pause(&mut self) -> Result<()> {
        if let Some(sink) = &self.sink {
            sink.pause();
        }
        Ok(())
    }

    fn set_position(&mut self, seconds: u64) -> Result<()> {
        if let Some(sink) = &self.sink {
            sink.try_seek(Duration::from_secs(seconds))
                .map_err(|e| PlayerError::BackendError(format!("seek failed: {e}")))?;
            self.last_position = seconds as f64;
            self.emit(StateChange::PositionChanged {
                seconds: seconds as f64,
            });
        }
        Ok(())
    }

    fn position(&self) -> f64 {
        self.sink
            .as_ref()
            .map(|s| s.get_pos().as_secs_f64())
            .unwrap_or(0.0)
    }

    fn set_volume(&mut self, volume: f32) -> Result<()> {
        self.level = volume;
        if let Some(sink) = &self.sink {
            if !self.muted {
                sink.set_volume(volume);
            }
        }
        self.emit(StateChange::VolumeChanged { volume });
        Ok(())
    }

    fn volume(&self) -> f32 {
        self.level
    }

    fn set_muted(&mut self, muted: bool) -> Result<()> {
        self.muted = muted;
        if let Some(sink) = &self.sink {
            sink.set_volume(self.effective_volume());
        }
        Ok(())
    }

    fn muted(&self) -> bool {
        self.muted
    }

    fn duration(&self) -> f64 {
        self.duration
    }

    fn subscribe(&mut self, tx: Sender<StateChange>) {
        self.events = Some(tx);
    }

    fn tick(&mut self) {
        let Some(sink) = &self.sink else {
            return;
        };

        if sink.empty() {
            debug!("playback ended");
            self.emit(StateChange::PlaybackEnded);
            self.last_position = 0.0;
            // Rearm the sink so a later play() restarts from the top.
            if let Some(path) = self.source_path.clone() {
                if let Err(e) = self.open_sink(&path) {
                    warn!("failed to rearm {}: {}", path, e);
                    self.sink = None;
                }
            }
            return;
        }

        if sink.is_paused() {
            return;
        }

        let pos = sink.get_pos().as_secs_f64();
        if (pos - self.last_position).abs() >= POSITION_EPSILON {
            self.last_position = pos;
            self.emit(StateChange::PositionChanged { seconds: pos });
        }
    }
}
