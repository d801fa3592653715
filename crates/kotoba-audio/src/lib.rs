pub mod backend;
pub mod error;
pub mod session;

pub use backend::{AudioPlayer, AudioRecorder, CaptureHandle, FilePlayer, TempFileRecorder};
pub use error::AudioError;
pub use session::RecordingSession;
