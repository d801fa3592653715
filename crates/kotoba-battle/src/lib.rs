pub mod error;
pub mod prompt;
pub mod session;
pub mod turn;

pub use error::BattleError;
pub use prompt::FlashcardPrompt;
pub use session::{BattleOptions, BattleSession};
pub use turn::{ResolutionPhase, TurnController};
