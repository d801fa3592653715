#[derive(Debug, thiserror::Error)]
pub enum AudioError {
    #[error("microphone permission denied")]
    PermissionDenied,

    #[error("recording session not ready for {0}")]
    NotReady(&'static str),

    #[error("audio IO error: {0}")]
    Io(#[from] std::io::Error),
}
