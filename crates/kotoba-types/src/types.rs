use serde::{Deserialize, Serialize};

/// One vocabulary word for a boss encounter. Identity is the positional
/// index in the deck, not value equality.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VocabularyEntry {
    pub source_text: String,
    pub target_text: String,
    pub transliteration: String,
}

/// Equipment shown during a battle. Purely descriptive; the core never
/// inspects `visual_asset_ref`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BattleItem {
    pub name: String,
    pub visual_asset_ref: String,
    pub is_special: bool,
}

/// Which side is entitled to have its action resolved next.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Turn {
    Player,
    Boss,
}

impl Turn {
    pub fn other(self) -> Turn {
        match self {
            Turn::Player => Turn::Boss,
            Turn::Boss => Turn::Player,
        }
    }
}

/// An action is visually resolving; no new action may start while non-idle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AnimationPhase {
    #[default]
    Idle,
    PlayerAttacking,
    PlayerDefending,
    BossAttacking,
    BossProjectile,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RecordingState {
    #[default]
    Idle,
    Recording,
    Reviewing,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EffectTarget {
    Player,
    Boss,
}

/// Discrete visual/audio effect the host is asked to play. The host reports
/// one `EffectsCompleted` back per requested sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EffectKind {
    AttackProjectile,
    Shield,
    BossProjectile,
    DamageShake(EffectTarget),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordingCommand {
    Start,
    Stop,
    Reset,
    Play,
}

/// Host -> core commands. `slot` indexes the active prompt list.
#[derive(Debug, Clone)]
pub enum BattleCommand {
    SelectPrompt(usize),
    RevealAnswer(usize),
    Recording {
        slot: usize,
        command: RecordingCommand,
    },
    SubmitAction(usize),
    EffectsCompleted,
}

/// Core -> host events.
#[derive(Debug, Clone)]
pub enum BattleEvent {
    TurnChanged(Turn),
    HealthChanged {
        player: i32,
        boss: i32,
    },
    EffectRequested(EffectKind),
    PromptReplaced {
        slot: usize,
        entry: VocabularyEntry,
    },
    BattleEnded {
        winner: Turn,
    },
    Error {
        operation: String,
        slot: Option<usize>,
        message: String,
    },
    Warning {
        operation: String,
        message: String,
    },
}
