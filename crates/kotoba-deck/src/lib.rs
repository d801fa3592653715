pub mod deck;
pub mod error;
pub mod loader;

pub use deck::VocabularyDeck;
pub use error::DeckError;
pub use loader::load_entries;
