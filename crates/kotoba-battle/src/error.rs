use kotoba_audio::AudioError;
use kotoba_deck::DeckError;

#[derive(Debug, thiserror::Error)]
pub enum BattleError {
    #[error("battle has already ended")]
    BattleEnded,

    #[error("no active prompt in slot {0}")]
    InvalidSlot(usize),

    #[error("an action is already resolving")]
    ActionInFlight,

    #[error("prompt {0} has no recording ready to submit")]
    NotReady(usize),

    #[error("no effect sequence is awaiting completion")]
    NoPendingEffects,

    #[error("no boss turn is awaiting launch")]
    NoBossTurn,

    #[error("the boss is not awaiting a defense")]
    NoDefenseWindow,

    #[error(transparent)]
    Audio(#[from] AudioError),

    #[error(transparent)]
    Deck(#[from] DeckError),
}
