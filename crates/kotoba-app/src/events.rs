use std::sync::Arc;

use kanal::{AsyncReceiver, AsyncSender};
use kotoba_audio::{FilePlayer, TempFileRecorder};
use kotoba_battle::{BattleOptions, BattleSession};
use kotoba_types::{BattleCommand, BattleEvent, VocabularyEntry};
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;

use crate::state::AppState;

/// The resolution driver: owns one BattleSession and serializes every
/// mutation through it. Host commands arrive on `host_rx`; everything the
/// host must see leaves on `event_tx`. The scheduled wakes (boss launch
/// after the intro delay, defense-window expiry) are the only self-initiated
/// transitions.
pub async fn battle_loop(
    state: Arc<AppState>,
    host_rx: AsyncReceiver<BattleCommand>,
    event_tx: AsyncSender<BattleEvent>,
    entries: Vec<VocabularyEntry>,
    options: BattleOptions,
    cancel: CancellationToken,
) -> anyhow::Result<()> {
    let (battle_config, prompt_slots, capture_dir) = {
        let config = state.config.read().await;
        (
            config.battle.clone(),
            config.deck.prompt_slots,
            config.audio.capture_dir.clone(),
        )
    };

    let recorder = Arc::new(TempFileRecorder::new(capture_dir));
    let mut session = BattleSession::start(
        battle_config,
        prompt_slots,
        entries,
        options,
        recorder,
        Arc::new(FilePlayer),
    )?;

    forward_events(&mut session, &event_tx).await?;

    // Armed when the turn lands on Boss; fires launch_boss_turn.
    let mut boss_launch_at: Option<Instant> = None;

    loop {
        if session.awaiting_boss_launch() {
            boss_launch_at
                .get_or_insert_with(|| Instant::now() + session.boss_intro_delay());
        } else {
            boss_launch_at = None;
        }
        let wake = boss_launch_at.or(session.defense_deadline());

        tokio::select! {
            _ = cancel.cancelled() => {
                tracing::info!(id = %session.id(), "battle loop stopping");
                return Ok(());
            }
            command = host_rx.recv() => {
                handle_command(&mut session, command?, &event_tx).await?;
            }
            _ = tokio::time::sleep_until(wake.unwrap_or_else(Instant::now)), if wake.is_some() => {
                let result = if boss_launch_at.take().is_some() {
                    session.launch_boss_turn()
                } else {
                    session.forfeit_defense()
                };
                if let Err(e) = result {
                    tracing::warn!(id = %session.id(), "scheduled wake rejected: {e}");
                }
                forward_events(&mut session, &event_tx).await?;
            }
        }

        if session.ended() {
            tracing::info!(id = %session.id(), winner = ?session.winner(), "battle over, loop exiting");
            return Ok(());
        }
    }
}

async fn handle_command(
    session: &mut BattleSession,
    command: BattleCommand,
    event_tx: &AsyncSender<BattleEvent>,
) -> anyhow::Result<()> {
    tracing::debug!(id = %session.id(), ?command, "handling command");

    let (operation, slot, result) = match command {
        BattleCommand::SelectPrompt(slot) => {
            ("select_prompt", Some(slot), session.select_prompt(slot).await)
        }
        BattleCommand::RevealAnswer(slot) => {
            ("reveal_answer", Some(slot), session.reveal_answer(slot))
        }
        BattleCommand::Recording { slot, command } => {
            ("recording", Some(slot), session.recording(slot, command).await)
        }
        BattleCommand::SubmitAction(slot) => {
            ("submit_action", Some(slot), session.submit_action(slot))
        }
        BattleCommand::EffectsCompleted => {
            ("effects_completed", None, session.effects_completed().await)
        }
    };

    if let Err(e) = result {
        tracing::warn!(id = %session.id(), operation, ?slot, "command rejected: {e}");
        event_tx
            .send(BattleEvent::Error {
                operation: operation.into(),
                slot,
                message: e.to_string(),
            })
            .await?;
    }

    forward_events(session, event_tx).await
}

async fn forward_events(
    session: &mut BattleSession,
    event_tx: &AsyncSender<BattleEvent>,
) -> anyhow::Result<()> {
    for event in session.drain_events() {
        event_tx.send(event).await?;
    }
    Ok(())
}
