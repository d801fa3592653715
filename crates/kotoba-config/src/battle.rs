use std::env;

use serde::{Deserialize, Serialize};

fn default_attack_damage() -> i32 {
    20
}

fn default_defend_damage() -> i32 {
    8
}

fn default_boss_attack_damage() -> i32 {
    20
}

fn default_player_max_health() -> i32 {
    100
}

fn default_reveal_attack_multiplier() -> f32 {
    0.5
}

fn default_reveal_defend_multiplier() -> f32 {
    1.5
}

fn default_boss_intro_delay_ms() -> u64 {
    800
}

fn default_defense_timeout_ms() -> u64 {
    10_000
}

/// Damage policy and turn timing. The defaults preserve the design intent
/// that a mitigated defend (even penalized) loses less health than an
/// unanswered boss hit.
#[derive(Serialize, Deserialize, Clone)]
#[serde(default)]
pub struct BattleConfig {
    #[serde(default = "default_attack_damage")]
    pub attack_damage: i32,
    /// Health the player still loses on a successful defend.
    #[serde(default = "default_defend_damage")]
    pub defend_damage: i32,
    /// Unmitigated hit when the defense window expires.
    #[serde(default = "default_boss_attack_damage")]
    pub boss_attack_damage: i32,
    #[serde(default = "default_player_max_health")]
    pub player_max_health: i32,
    /// Applied to attack damage when the prompt was revealed on the player's turn.
    #[serde(default = "default_reveal_attack_multiplier")]
    pub reveal_attack_multiplier: f32,
    /// Applied to defend damage when the prompt was revealed on the boss's turn.
    #[serde(default = "default_reveal_defend_multiplier")]
    pub reveal_defend_multiplier: f32,
    /// Delay before a boss opening turn starts resolving.
    #[serde(default = "default_boss_intro_delay_ms")]
    pub boss_intro_delay_ms: u64,
    /// How long the player has to submit a defend once the boss projectile
    /// is in flight.
    #[serde(default = "default_defense_timeout_ms")]
    pub defense_timeout_ms: u64,
}

impl Default for BattleConfig {
    fn default() -> Self {
        Self {
            attack_damage: default_attack_damage(),
            defend_damage: default_defend_damage(),
            boss_attack_damage: default_boss_attack_damage(),
            player_max_health: default_player_max_health(),
            reveal_attack_multiplier: default_reveal_attack_multiplier(),
            reveal_defend_multiplier: default_reveal_defend_multiplier(),
            boss_intro_delay_ms: default_boss_intro_delay_ms(),
            defense_timeout_ms: default_defense_timeout_ms(),
        }
    }
}

impl BattleConfig {
    pub fn new() -> Self {
        let mut config = Self::default();

        if let Some(v) = env_i32("KOTOBA_ATTACK_DAMAGE") {
            config.attack_damage = v;
        }
        if let Some(v) = env_i32("KOTOBA_DEFEND_DAMAGE") {
            config.defend_damage = v;
        }
        if let Some(v) = env_i32("KOTOBA_BOSS_ATTACK_DAMAGE") {
            config.boss_attack_damage = v;
        }
        if let Some(v) = env::var("KOTOBA_DEFENSE_TIMEOUT_MS")
            .ok()
            .and_then(|v| v.parse().ok())
        {
            config.defense_timeout_ms = v;
        }

        config
    }
}

fn env_i32(key: &str) -> Option<i32> {
    env::var(key).ok().and_then(|v| v.parse().ok())
}
