#[derive(Debug, thiserror::Error)]
pub enum PlayerError {
    #[error("Failed to load {url}: {message}")]
    LoadError { url: String, message: String },

    #[error("No audio output device available: {0}")]
    NoOutputDevice(String),

    #[error("Backend operation failed: {0}")]
    BackendError(String),
}

pub type Result<T> = std::result::Result<T, PlayerError>;
