use std::env;

use serde::{Deserialize, Serialize};

fn default_prompt_slots() -> usize {
    4
}

#[derive(Serialize, Deserialize, Clone)]
#[serde(default)]
pub struct DeckConfig {
    /// Number of flashcard prompts shown at once.
    #[serde(default = "default_prompt_slots")]
    pub prompt_slots: usize,
}

impl Default for DeckConfig {
    fn default() -> Self {
        Self {
            prompt_slots: default_prompt_slots(),
        }
    }
}

impl DeckConfig {
    pub fn new() -> Self {
        let prompt_slots = env::var("KOTOBA_PROMPT_SLOTS")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or_else(default_prompt_slots);

        Self { prompt_slots }
    }
}
