use kanal::{AsyncReceiver, AsyncSender};
use kotoba_types::{BattleCommand, BattleEvent, EffectKind};

/// Headless stand-in for the presentation layer: logs every event and
/// acknowledges effect sequences so the battle can progress without a
/// renderer. Every sequence the core emits ends in either a DamageShake or
/// the boss projectile, so those are the ack points.
pub async fn host_loop(
    event_rx: AsyncReceiver<BattleEvent>,
    command_tx: AsyncSender<BattleCommand>,
) -> anyhow::Result<()> {
    while let Ok(event) = event_rx.recv().await {
        match &event {
            BattleEvent::EffectRequested(kind) => {
                tracing::info!(?kind, "effect requested");
                if matches!(kind, EffectKind::DamageShake(_) | EffectKind::BossProjectile) {
                    command_tx.send(BattleCommand::EffectsCompleted).await?;
                }
            }
            BattleEvent::HealthChanged { player, boss } => {
                tracing::info!(player, boss, "health changed");
            }
            BattleEvent::TurnChanged(turn) => tracing::info!(?turn, "turn changed"),
            BattleEvent::PromptReplaced { slot, entry } => {
                tracing::info!(slot, source = %entry.source_text, "prompt replaced");
            }
            BattleEvent::BattleEnded { winner } => {
                tracing::info!(?winner, "battle ended");
                break;
            }
            BattleEvent::Error {
                operation,
                slot,
                message,
            } => {
                tracing::warn!(operation, ?slot, message, "core rejected a command");
            }
            BattleEvent::Warning { operation, message } => {
                tracing::warn!(operation, message, "core warning");
            }
        }
    }

    Ok(())
}
