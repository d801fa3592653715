use std::sync::Arc;

use kotoba_types::RecordingState;

use crate::backend::{AudioPlayer, AudioRecorder, CaptureHandle};
use crate::error::AudioError;

/// Lifecycle of one spoken attempt: Idle -> Recording -> Reviewing -> Idle.
///
/// At most one capture is outstanding per session. `reset` always releases
/// the previous resource and is safe to call from any state, so callers
/// reset before every `start` to guarantee a stale capture from an earlier
/// prompt never leaks into a new one.
pub struct RecordingSession {
    state: RecordingState,
    capture: Option<CaptureHandle>,
    recorder: Arc<dyn AudioRecorder>,
    player: Arc<dyn AudioPlayer>,
}

impl RecordingSession {
    pub fn new(recorder: Arc<dyn AudioRecorder>, player: Arc<dyn AudioPlayer>) -> Self {
        Self {
            state: RecordingState::Idle,
            capture: None,
            recorder,
            player,
        }
    }

    pub fn state(&self) -> RecordingState {
        self.state
    }

    pub fn capture(&self) -> Option<&CaptureHandle> {
        self.capture.as_ref()
    }

    /// Idle -> Recording. A permission denial or capture failure leaves the
    /// session Idle.
    pub async fn start(&mut self) -> Result<(), AudioError> {
        if self.state != RecordingState::Idle {
            return Err(AudioError::NotReady("start"));
        }

        self.recorder.request_permission().await?;
        self.recorder.begin_capture().await?;
        self.state = RecordingState::Recording;
        Ok(())
    }

    /// Recording -> Reviewing. An IO failure drops the partial capture and
    /// returns the session to Idle before propagating.
    pub async fn stop(&mut self) -> Result<(), AudioError> {
        if self.state != RecordingState::Recording {
            return Err(AudioError::NotReady("stop"));
        }

        match self.recorder.finish_capture().await {
            Ok(capture) => {
                self.capture = Some(capture);
                self.state = RecordingState::Reviewing;
                Ok(())
            }
            Err(e) => {
                self.state = RecordingState::Idle;
                if let Err(cleanup) = self.recorder.abort_capture().await {
                    tracing::warn!("failed to abort capture after stop error: {cleanup}");
                }
                Err(e)
            }
        }
    }

    /// Replay the capture under review; no state change. An IO failure
    /// resets the session to Idle before propagating.
    pub async fn play(&mut self) -> Result<(), AudioError> {
        let RecordingState::Reviewing = self.state else {
            return Err(AudioError::NotReady("play"));
        };
        let Some(capture) = self.capture.as_ref() else {
            return Err(AudioError::NotReady("play"));
        };

        match self.player.play(capture).await {
            Ok(()) => Ok(()),
            Err(e) => {
                if let Err(cleanup) = self.reset().await {
                    tracing::warn!("cleanup failed while resetting after play error: {cleanup}");
                }
                Err(e)
            }
        }
    }

    /// Return to Idle, releasing any outstanding resource. Idempotent. The
    /// session lands in Idle even when cleanup fails; the error is returned
    /// so callers can surface it as a non-fatal warning.
    pub async fn reset(&mut self) -> Result<(), AudioError> {
        let mut cleanup = Ok(());

        if self.state == RecordingState::Recording {
            cleanup = self.recorder.abort_capture().await;
        }
        if let Some(capture) = self.capture.take() {
            let discarded = self.recorder.discard(capture).await;
            if cleanup.is_ok() {
                cleanup = discarded;
            }
        }

        self.state = RecordingState::Idle;
        cleanup
    }
}
