use std::sync::Arc;

use kotoba_audio::{AudioPlayer, AudioRecorder, RecordingSession};
use kotoba_config::battle::BattleConfig;
use kotoba_deck::VocabularyDeck;
use kotoba_types::{
    AnimationPhase, BattleEvent, BattleItem, EffectKind, EffectTarget, RecordingCommand, Turn,
    VocabularyEntry,
};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use tokio::time::{Duration, Instant};
use uuid::Uuid;

use crate::error::BattleError;
use crate::prompt::FlashcardPrompt;
use crate::turn::{ResolutionPhase, TurnController};

pub struct BattleOptions {
    pub boss_max_health: i32,
    pub attack_item: BattleItem,
    pub defense_item: BattleItem,
    /// Seed for the combat RNG; None rolls from OS entropy.
    pub seed: Option<u64>,
    /// Force the opening turn instead of rolling it. Used by tests and
    /// scripted encounters.
    pub opening_turn: Option<Turn>,
}

/// What the host's acknowledgement will resolve.
enum Pending {
    /// Boss attack animation; completion opens the defense window.
    BossVolley,
    /// A submitted player action (attack or defend).
    Action { slot: usize, kind: ActionKind },
    /// Unanswered boss hit after the defense window expired.
    Forfeit,
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum ActionKind {
    Attack,
    Defend,
}

/// One boss encounter. Mutated exclusively through the command operations;
/// every mutation that the host must see lands in the event outbox, drained
/// by the driving task after each call.
///
/// The session never proceeds past an `EffectRequested` without the host's
/// single `effects_completed` acknowledgement.
pub struct BattleSession {
    id: Uuid,
    config: BattleConfig,
    player_health: i32,
    boss_health: i32,
    boss_max_health: i32,
    turns: TurnController,
    animation: AnimationPhase,
    deck: VocabularyDeck,
    prompts: Vec<FlashcardPrompt>,
    attack_item: BattleItem,
    defense_item: BattleItem,
    recorder: Arc<dyn AudioRecorder>,
    audio_player: Arc<dyn AudioPlayer>,
    pending: Option<Pending>,
    /// Set when the turn lands on Boss; the driver launches the volley after
    /// the configured intro delay.
    awaiting_boss_launch: bool,
    /// Open while the boss projectile is inbound and a defend submission is
    /// expected.
    defense_deadline: Option<Instant>,
    winner: Option<Turn>,
    events: Vec<BattleEvent>,
}

impl BattleSession {
    pub fn start(
        config: BattleConfig,
        prompt_slots: usize,
        entries: Vec<VocabularyEntry>,
        options: BattleOptions,
        recorder: Arc<dyn AudioRecorder>,
        audio_player: Arc<dyn AudioPlayer>,
    ) -> Result<Self, BattleError> {
        let mut rng = match options.seed {
            Some(seed) => ChaCha8Rng::seed_from_u64(seed),
            None => ChaCha8Rng::from_os_rng(),
        };

        let turns = match options.opening_turn {
            Some(turn) => TurnController::with_turn(turn),
            None => TurnController::opening(&mut rng),
        };
        let opening = turns.turn();

        let mut deck = VocabularyDeck::new(entries, rng);
        let indices = deck.draw(prompt_slots)?;

        let prompts = indices
            .into_iter()
            .map(|index| {
                let entry = deck.entry(index).cloned().expect("drawn index in range");
                FlashcardPrompt::new(
                    index,
                    entry,
                    opening,
                    RecordingSession::new(recorder.clone(), audio_player.clone()),
                )
            })
            .collect();

        let mut session = Self {
            id: Uuid::new_v4(),
            player_health: config.player_max_health,
            boss_health: options.boss_max_health,
            boss_max_health: options.boss_max_health,
            config,
            turns,
            animation: AnimationPhase::Idle,
            deck,
            prompts,
            attack_item: options.attack_item,
            defense_item: options.defense_item,
            recorder,
            audio_player,
            pending: None,
            awaiting_boss_launch: opening == Turn::Boss,
            defense_deadline: None,
            winner: None,
            events: Vec::new(),
        };

        tracing::info!(
            id = %session.id,
            boss_health = session.boss_max_health,
            ?opening,
            "battle started"
        );
        session.emit(BattleEvent::HealthChanged {
            player: session.player_health,
            boss: session.boss_health,
        });
        session.emit(BattleEvent::TurnChanged(opening));
        Ok(session)
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn turn(&self) -> Turn {
        self.turns.turn()
    }

    pub fn phase(&self) -> ResolutionPhase {
        self.turns.phase()
    }

    pub fn animation(&self) -> AnimationPhase {
        self.animation
    }

    pub fn player_health(&self) -> i32 {
        self.player_health
    }

    pub fn boss_health(&self) -> i32 {
        self.boss_health
    }

    pub fn prompts(&self) -> &[FlashcardPrompt] {
        &self.prompts
    }

    pub fn attack_item(&self) -> &BattleItem {
        &self.attack_item
    }

    pub fn defense_item(&self) -> &BattleItem {
        &self.defense_item
    }

    pub fn winner(&self) -> Option<Turn> {
        self.winner
    }

    pub fn ended(&self) -> bool {
        self.winner.is_some()
    }

    /// True when the turn has landed on Boss and the volley has not been
    /// launched yet. The driver schedules `launch_boss_turn` after the
    /// configured intro delay.
    pub fn awaiting_boss_launch(&self) -> bool {
        self.awaiting_boss_launch
    }

    pub fn boss_intro_delay(&self) -> Duration {
        Duration::from_millis(self.config.boss_intro_delay_ms)
    }

    /// Deadline for the player's defend submission, while the defense window
    /// is open. The driver calls `forfeit_defense` when it passes.
    pub fn defense_deadline(&self) -> Option<Instant> {
        self.defense_deadline
    }

    /// Take everything the host must be told about since the last drain.
    pub fn drain_events(&mut self) -> Vec<BattleEvent> {
        std::mem::take(&mut self.events)
    }

    /// Open a prompt for the player, resetting its recording so a stale
    /// capture from an earlier prompt never leaks into this one.
    pub async fn select_prompt(&mut self, slot: usize) -> Result<(), BattleError> {
        self.ensure_live()?;
        let prompt = self.prompt_mut(slot)?;

        if let Err(cleanup) = prompt.recording.reset().await {
            self.warn("select_prompt", cleanup.to_string());
        }
        Ok(())
    }

    /// One-way disclosure of the prompt's answer. Records which side incurs
    /// the penalty; never advances turn or phase.
    pub fn reveal_answer(&mut self, slot: usize) -> Result<(), BattleError> {
        self.ensure_live()?;
        let during = self.turns.turn();
        let id = self.id;
        let prompt = self.prompt_mut(slot)?;

        if prompt.reveal(during) {
            tracing::debug!(id = %id, slot, ?during, "answer revealed");
        }
        Ok(())
    }

    /// Route a recording command to the prompt's session. `Start` always
    /// performs the reset-then-start sequence.
    pub async fn recording(
        &mut self,
        slot: usize,
        command: RecordingCommand,
    ) -> Result<(), BattleError> {
        self.ensure_live()?;
        if slot >= self.prompts.len() {
            return Err(BattleError::InvalidSlot(slot));
        }
        let prompt = &mut self.prompts[slot];

        match command {
            RecordingCommand::Start => {
                if let Err(cleanup) = prompt.recording.reset().await {
                    self.events.push(BattleEvent::Warning {
                        operation: "recording.reset".into(),
                        message: cleanup.to_string(),
                    });
                }
                self.prompts[slot].recording.start().await?;
            }
            RecordingCommand::Stop => prompt.recording.stop().await?,
            RecordingCommand::Play => prompt.recording.play().await?,
            RecordingCommand::Reset => {
                if let Err(cleanup) = prompt.recording.reset().await {
                    self.events.push(BattleEvent::Warning {
                        operation: "recording.reset".into(),
                        message: cleanup.to_string(),
                    });
                }
            }
        }
        Ok(())
    }

    /// Submit the prompt's recorded attempt as this turn's action. Valid
    /// only while no resolution is in flight and the recording is under
    /// review; on the boss's turn the defense window must be open.
    pub fn submit_action(&mut self, slot: usize) -> Result<(), BattleError> {
        self.ensure_live()?;
        if self.pending.is_some() || self.turns.is_resolving() {
            return Err(BattleError::ActionInFlight);
        }

        let kind = match self.turns.turn() {
            Turn::Player => ActionKind::Attack,
            Turn::Boss => {
                if self.defense_deadline.is_none() {
                    return Err(BattleError::NoDefenseWindow);
                }
                ActionKind::Defend
            }
        };

        let prompt = self.prompt_mut(slot)?;
        if !prompt.is_submittable() {
            return Err(BattleError::NotReady(slot));
        }

        self.turns.begin_resolution()?;
        self.defense_deadline = None;
        self.pending = Some(Pending::Action { slot, kind });

        match kind {
            ActionKind::Attack => {
                self.animation = AnimationPhase::PlayerAttacking;
                self.emit(BattleEvent::EffectRequested(EffectKind::AttackProjectile));
                self.emit(BattleEvent::EffectRequested(EffectKind::DamageShake(
                    EffectTarget::Boss,
                )));
            }
            ActionKind::Defend => {
                self.animation = AnimationPhase::PlayerDefending;
                self.emit(BattleEvent::EffectRequested(EffectKind::Shield));
                self.emit(BattleEvent::EffectRequested(EffectKind::DamageShake(
                    EffectTarget::Player,
                )));
            }
        }
        Ok(())
    }

    /// Begin the boss's attack animation. Driver-called, after the intro
    /// delay.
    pub fn launch_boss_turn(&mut self) -> Result<(), BattleError> {
        self.ensure_live()?;
        if !self.awaiting_boss_launch {
            return Err(BattleError::NoBossTurn);
        }

        self.awaiting_boss_launch = false;
        self.turns.begin_resolution()?;
        self.animation = AnimationPhase::BossAttacking;
        self.pending = Some(Pending::BossVolley);
        self.emit(BattleEvent::EffectRequested(EffectKind::BossProjectile));
        Ok(())
    }

    /// The defense window expired with no submission: the boss hit lands
    /// unmitigated. Driver-called when the deadline passes.
    pub fn forfeit_defense(&mut self) -> Result<(), BattleError> {
        self.ensure_live()?;
        if self.pending.is_some() || self.defense_deadline.is_none() {
            return Err(BattleError::NoDefenseWindow);
        }

        tracing::info!(id = %self.id, "defense window expired, boss hit lands unmitigated");
        self.defense_deadline = None;
        self.turns.begin_resolution()?;
        self.pending = Some(Pending::Forfeit);
        self.emit(BattleEvent::EffectRequested(EffectKind::DamageShake(
            EffectTarget::Player,
        )));
        Ok(())
    }

    /// The host's single acknowledgement that the requested effect sequence
    /// finished. Applies the pending resolution.
    pub async fn effects_completed(&mut self) -> Result<(), BattleError> {
        self.ensure_live()?;
        match self.pending.take() {
            None => Err(BattleError::NoPendingEffects),
            Some(Pending::BossVolley) => {
                // Projectile inbound; the player may now submit a defend.
                self.animation = AnimationPhase::BossProjectile;
                self.turns.finish_resolution();
                self.defense_deadline =
                    Some(Instant::now() + Duration::from_millis(self.config.defense_timeout_ms));
                Ok(())
            }
            Some(Pending::Forfeit) => {
                let damage = self.config.boss_attack_damage;
                self.player_health = (self.player_health - damage).clamp(0, self.config.player_max_health);
                self.emit(BattleEvent::HealthChanged {
                    player: self.player_health,
                    boss: self.boss_health,
                });
                self.finish_turn(Turn::Player);
                Ok(())
            }
            Some(Pending::Action { slot, kind }) => {
                self.resolve_action(slot, kind).await;
                Ok(())
            }
        }
    }

    async fn resolve_action(&mut self, slot: usize, kind: ActionKind) {
        let prompt = &self.prompts[slot];
        let next_turn = match kind {
            ActionKind::Attack => {
                let damage = self.scaled_damage(
                    self.config.attack_damage,
                    prompt.revealed_during() == Some(Turn::Player),
                    self.config.reveal_attack_multiplier,
                );
                self.boss_health = (self.boss_health - damage).clamp(0, self.boss_max_health);
                tracing::debug!(id = %self.id, slot, damage, boss_health = self.boss_health, "attack resolved");
                Turn::Boss
            }
            ActionKind::Defend => {
                let damage = self.scaled_damage(
                    self.config.defend_damage,
                    prompt.revealed_during() == Some(Turn::Boss),
                    self.config.reveal_defend_multiplier,
                );
                self.player_health =
                    (self.player_health - damage).clamp(0, self.config.player_max_health);
                tracing::debug!(id = %self.id, slot, damage, player_health = self.player_health, "defend resolved");
                Turn::Player
            }
        };

        self.refill_slot(slot, next_turn).await;
        self.emit(BattleEvent::HealthChanged {
            player: self.player_health,
            boss: self.boss_health,
        });
        self.finish_turn(next_turn);
    }

    /// Release the resolved prompt's capture and refill its slot from the
    /// deck. A refill failure is fatal only at construction; here the deck
    /// is known large enough, but an error is still surfaced.
    async fn refill_slot(&mut self, slot: usize, upcoming_turn: Turn) {
        if let Err(cleanup) = self.prompts[slot].recording.reset().await {
            self.warn("submit_action", cleanup.to_string());
        }

        let current = self.prompts[slot].entry_index();
        match self.deck.replace(current) {
            Ok(fresh) => {
                let entry = self.deck.entry(fresh).cloned().expect("drawn index in range");
                self.prompts[slot] = FlashcardPrompt::new(
                    fresh,
                    entry.clone(),
                    upcoming_turn,
                    RecordingSession::new(self.recorder.clone(), self.audio_player.clone()),
                );
                self.emit(BattleEvent::PromptReplaced { slot, entry });
            }
            Err(e) => self.emit(BattleEvent::Error {
                operation: "deck.replace".into(),
                slot: Some(slot),
                message: e.to_string(),
            }),
        }
    }

    /// Terminal check, then either end the battle or hand the turn over.
    fn finish_turn(&mut self, next_turn: Turn) {
        self.animation = AnimationPhase::Idle;
        self.turns.finish_resolution();

        if self.boss_health == 0 {
            self.end(Turn::Player);
            return;
        }
        if self.player_health == 0 {
            self.end(Turn::Boss);
            return;
        }

        self.turns.hand_to(next_turn);
        self.emit(BattleEvent::TurnChanged(next_turn));
        if next_turn == Turn::Boss {
            self.awaiting_boss_launch = true;
        }
    }

    fn end(&mut self, winner: Turn) {
        tracing::info!(id = %self.id, ?winner, "battle ended");
        self.winner = Some(winner);
        self.awaiting_boss_launch = false;
        self.defense_deadline = None;
        self.emit(BattleEvent::BattleEnded { winner });
    }

    fn scaled_damage(&self, base: i32, penalized: bool, multiplier: f32) -> i32 {
        if penalized {
            (base as f32 * multiplier).round() as i32
        } else {
            base
        }
    }

    fn ensure_live(&self) -> Result<(), BattleError> {
        if self.ended() {
            return Err(BattleError::BattleEnded);
        }
        Ok(())
    }

    fn prompt_mut(&mut self, slot: usize) -> Result<&mut FlashcardPrompt, BattleError> {
        self.prompts
            .get_mut(slot)
            .ok_or(BattleError::InvalidSlot(slot))
    }

    fn emit(&mut self, event: BattleEvent) {
        self.events.push(event);
    }

    fn warn(&mut self, operation: &str, message: String) {
        tracing::warn!(id = %self.id, operation, message, "non-fatal cleanup failure");
        self.events.push(BattleEvent::Warning {
            operation: operation.into(),
            message,
        });
    }
}
