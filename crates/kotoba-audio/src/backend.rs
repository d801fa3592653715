use std::path::PathBuf;

use tokio::sync::Mutex;

use crate::error::AudioError;

/// Finalized capture produced by a recorder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CaptureHandle {
    pub path: PathBuf,
}

/// Microphone capture backend. Implementations own the device; sessions own
/// the lifecycle. One capture may be in flight per recorder.
#[async_trait::async_trait]
pub trait AudioRecorder: Send + Sync {
    /// Ask the platform for microphone access.
    async fn request_permission(&self) -> Result<(), AudioError>;

    /// Begin capturing a new attempt.
    async fn begin_capture(&self) -> Result<(), AudioError>;

    /// Finalize the in-flight capture to a handle.
    async fn finish_capture(&self) -> Result<CaptureHandle, AudioError>;

    /// Abort the in-flight capture, releasing any partial resource.
    async fn abort_capture(&self) -> Result<(), AudioError>;

    /// Release a finalized capture.
    async fn discard(&self, capture: CaptureHandle) -> Result<(), AudioError>;
}

/// Playback backend for reviewing a capture.
#[async_trait::async_trait]
pub trait AudioPlayer: Send + Sync {
    async fn play(&self, capture: &CaptureHandle) -> Result<(), AudioError>;
}

/// File-backed recorder: each capture is a file under `dir`. Stands in for
/// real capture hardware, which lives outside this crate.
pub struct TempFileRecorder {
    dir: PathBuf,
    active: Mutex<Option<PathBuf>>,
}

impl TempFileRecorder {
    pub fn new(dir: PathBuf) -> Self {
        Self {
            dir,
            active: Mutex::new(None),
        }
    }
}

#[async_trait::async_trait]
impl AudioRecorder for TempFileRecorder {
    async fn request_permission(&self) -> Result<(), AudioError> {
        // File-backed captures need no device grant.
        Ok(())
    }

    async fn begin_capture(&self) -> Result<(), AudioError> {
        let mut active = self.active.lock().await;
        if active.is_some() {
            return Err(AudioError::NotReady("begin_capture"));
        }

        tokio::fs::create_dir_all(&self.dir).await?;
        let path = self.dir.join(format!("attempt-{}.wav", uuid::Uuid::new_v4()));
        tokio::fs::write(&path, &[]).await?;
        tracing::debug!(path = %path.display(), "capture started");
        *active = Some(path);
        Ok(())
    }

    async fn finish_capture(&self) -> Result<CaptureHandle, AudioError> {
        let mut active = self.active.lock().await;
        let path = active.take().ok_or(AudioError::NotReady("finish_capture"))?;
        Ok(CaptureHandle { path })
    }

    async fn abort_capture(&self) -> Result<(), AudioError> {
        let mut active = self.active.lock().await;
        if let Some(path) = active.take() {
            tokio::fs::remove_file(&path).await?;
            tracing::debug!(path = %path.display(), "capture aborted");
        }
        Ok(())
    }

    async fn discard(&self, capture: CaptureHandle) -> Result<(), AudioError> {
        tokio::fs::remove_file(&capture.path).await?;
        tracing::debug!(path = %capture.path.display(), "capture discarded");
        Ok(())
    }
}

/// Playback that verifies the capture file is readable. Actual audio output
/// is the host's concern.
pub struct FilePlayer;

#[async_trait::async_trait]
impl AudioPlayer for FilePlayer {
    async fn play(&self, capture: &CaptureHandle) -> Result<(), AudioError> {
        tokio::fs::metadata(&capture.path).await?;
        tracing::info!(path = %capture.path.display(), "playing capture");
        Ok(())
    }
}
