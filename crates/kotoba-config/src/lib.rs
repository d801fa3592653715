use serde::{Deserialize, Serialize};

use self::audio::AudioConfig;
use self::battle::BattleConfig;
use self::deck::DeckConfig;

pub mod audio;
pub mod battle;
pub mod deck;

#[derive(Default, Serialize, Deserialize)]
pub struct Config {
    pub battle: BattleConfig,
    pub deck: DeckConfig,
    pub audio: AudioConfig,
}

impl Config {
    pub fn new() -> Self {
        Config {
            battle: BattleConfig::new(),
            deck: DeckConfig::new(),
            audio: AudioConfig::new(),
        }
    }
}
