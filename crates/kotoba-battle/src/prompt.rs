use kotoba_audio::RecordingSession;
use kotoba_types::{RecordingState, Turn, VocabularyEntry};

/// One active flashcard challenge: a vocabulary entry, whether its answer
/// has been revealed, and the spoken-attempt session bound to it.
pub struct FlashcardPrompt {
    entry_index: usize,
    entry: VocabularyEntry,
    revealed_during: Option<Turn>,
    turn_at_creation: Turn,
    pub(crate) recording: RecordingSession,
}

impl FlashcardPrompt {
    pub fn new(
        entry_index: usize,
        entry: VocabularyEntry,
        turn_at_creation: Turn,
        recording: RecordingSession,
    ) -> Self {
        Self {
            entry_index,
            entry,
            revealed_during: None,
            turn_at_creation,
            recording,
        }
    }

    pub fn entry_index(&self) -> usize {
        self.entry_index
    }

    pub fn entry(&self) -> &VocabularyEntry {
        &self.entry
    }

    pub fn turn_at_creation(&self) -> Turn {
        self.turn_at_creation
    }

    pub fn revealed(&self) -> bool {
        self.revealed_during.is_some()
    }

    /// Which side incurred the reveal penalty, if any.
    pub fn revealed_during(&self) -> Option<Turn> {
        self.revealed_during
    }

    /// One-way disclosure of the target-language answer. Idempotent: only
    /// the first call records the penalized side.
    pub fn reveal(&mut self, during: Turn) -> bool {
        if self.revealed_during.is_some() {
            return false;
        }
        self.revealed_during = Some(during);
        true
    }

    /// A prompt may only be submitted while its recording is under review.
    pub fn is_submittable(&self) -> bool {
        self.recording.state() == RecordingState::Reviewing
    }

    pub fn recording(&self) -> &RecordingSession {
        &self.recording
    }
}
