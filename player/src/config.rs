/// Volume pushed to the backend once track metadata loads.
pub const DEFAULT_VOLUME: f32 = 0.75;

pub const DEFAULT_TITLE: &str = "Retro Shine";

/// Initial field values for a [`crate::PlayerController`].
#[derive(Debug, Clone)]
pub struct PlayerConfig {
    pub title: String,
    pub source: String,
    pub initial_volume: f32,
}

impl Default for PlayerConfig {
    fn default() -> Self {
        Self {
            title: DEFAULT_TITLE.into(),
            source: "retro-shine.mp3".into(),
            initial_volume: DEFAULT_VOLUME,
        }
    }
}

impl PlayerConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.source = source.into();
        self
    }

    pub fn with_initial_volume(mut self, volume: f32) -> Self {
        self.initial_volume = volume.clamp(0.0, 1.0);
        self
    }
}
