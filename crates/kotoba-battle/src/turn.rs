use kotoba_types::Turn;
use rand::Rng;

use crate::error::BattleError;

/// Whether a turn resolution is currently in flight. While `Resolving`, no
/// new submission is accepted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ResolutionPhase {
    #[default]
    Idle,
    Resolving,
}

/// Owns whose turn it is and the coarse battle phase.
pub struct TurnController {
    turn: Turn,
    phase: ResolutionPhase,
}

impl TurnController {
    /// Roll the opening turn uniformly between Player and Boss.
    pub fn opening(rng: &mut impl Rng) -> Self {
        let turn = if rng.random_bool(0.5) {
            Turn::Player
        } else {
            Turn::Boss
        };
        Self::with_turn(turn)
    }

    pub fn with_turn(turn: Turn) -> Self {
        Self {
            turn,
            phase: ResolutionPhase::Idle,
        }
    }

    pub fn turn(&self) -> Turn {
        self.turn
    }

    pub fn phase(&self) -> ResolutionPhase {
        self.phase
    }

    pub fn is_resolving(&self) -> bool {
        self.phase == ResolutionPhase::Resolving
    }

    /// Claim the single resolution-in-flight slot.
    pub fn begin_resolution(&mut self) -> Result<(), BattleError> {
        if self.is_resolving() {
            return Err(BattleError::ActionInFlight);
        }
        self.phase = ResolutionPhase::Resolving;
        Ok(())
    }

    pub fn finish_resolution(&mut self) {
        self.phase = ResolutionPhase::Idle;
    }

    pub fn hand_to(&mut self, side: Turn) {
        self.turn = side;
    }
}
