use std::sync::Arc;
use std::time::Duration;

use kanal::{AsyncReceiver, AsyncSender};
use kotoba_battle::BattleOptions;
use kotoba_config::Config;
use kotoba_config::battle::BattleConfig;
use kotoba_types::{
    BattleCommand, BattleEvent, BattleItem, EffectKind, EffectTarget, RecordingCommand, Turn,
    VocabularyEntry,
};
use tokio::task::JoinHandle;
use tokio::time::timeout;
use tokio_util::sync::CancellationToken;

use crate::events::battle_loop;
use crate::state::AppState;

fn entries() -> Vec<VocabularyEntry> {
    (0..8)
        .map(|n| VocabularyEntry {
            source_text: format!("word {n}"),
            target_text: format!("言葉{n}"),
            transliteration: format!("kotoba{n}"),
        })
        .collect()
}

fn item(name: &str) -> BattleItem {
    BattleItem {
        name: name.to_string(),
        visual_asset_ref: format!("items/{name}.png"),
        is_special: false,
    }
}

fn options(opening: Turn) -> BattleOptions {
    BattleOptions {
        boss_max_health: 100,
        attack_item: item("katana"),
        defense_item: item("shield"),
        seed: Some(7),
        opening_turn: Some(opening),
    }
}

struct Harness {
    commands: AsyncSender<BattleCommand>,
    events: AsyncReceiver<BattleEvent>,
    cancel: CancellationToken,
    handle: JoinHandle<anyhow::Result<()>>,
}

fn spawn_loop(battle: BattleConfig, opening: Turn) -> Harness {
    let mut config = Config::default();
    config.battle = battle;
    let state = Arc::new(AppState::new(config));

    let (command_tx, command_rx) = kanal::bounded_async(64);
    let (event_tx, event_rx) = kanal::bounded_async(256);
    let cancel = CancellationToken::new();

    let handle = tokio::spawn(battle_loop(
        state,
        command_rx,
        event_tx,
        entries(),
        options(opening),
        cancel.child_token(),
    ));

    Harness {
        commands: command_tx,
        events: event_rx,
        cancel,
        handle,
    }
}

/// Fast timers so boss launches and forfeits happen within test timeouts.
fn fast_battle_config() -> BattleConfig {
    let mut battle = BattleConfig::default();
    battle.boss_intro_delay_ms = 10;
    battle.defense_timeout_ms = 100;
    battle
}

async fn next_event(events: &AsyncReceiver<BattleEvent>) -> BattleEvent {
    timeout(Duration::from_secs(2), events.recv())
        .await
        .expect("timed out waiting for event")
        .expect("event channel closed")
}

/// Skip events until one matches.
async fn wait_for(
    events: &AsyncReceiver<BattleEvent>,
    pred: impl Fn(&BattleEvent) -> bool,
) -> BattleEvent {
    loop {
        let event = next_event(events).await;
        if pred(&event) {
            return event;
        }
    }
}

#[tokio::test]
async fn full_round_trip_over_channels() {
    let harness = spawn_loop(fast_battle_config(), Turn::Player);
    let commands = &harness.commands;
    let events = &harness.events;

    // Opening state reaches the host.
    wait_for(events, |e| {
        matches!(
            e,
            BattleEvent::HealthChanged {
                player: 100,
                boss: 100
            }
        )
    })
    .await;
    wait_for(events, |e| matches!(e, BattleEvent::TurnChanged(Turn::Player))).await;

    // Record an attempt on slot 0 and submit the attack.
    commands
        .send(BattleCommand::Recording {
            slot: 0,
            command: RecordingCommand::Start,
        })
        .await
        .unwrap();
    commands
        .send(BattleCommand::Recording {
            slot: 0,
            command: RecordingCommand::Stop,
        })
        .await
        .unwrap();
    commands.send(BattleCommand::SubmitAction(0)).await.unwrap();

    wait_for(events, |e| {
        matches!(
            e,
            BattleEvent::EffectRequested(EffectKind::AttackProjectile)
        )
    })
    .await;
    wait_for(events, |e| {
        matches!(
            e,
            BattleEvent::EffectRequested(EffectKind::DamageShake(EffectTarget::Boss))
        )
    })
    .await;

    commands.send(BattleCommand::EffectsCompleted).await.unwrap();

    wait_for(events, |e| {
        matches!(
            e,
            BattleEvent::HealthChanged {
                player: 100,
                boss: 80
            }
        )
    })
    .await;
    wait_for(events, |e| matches!(e, BattleEvent::PromptReplaced { slot: 0, .. })).await;
    wait_for(events, |e| matches!(e, BattleEvent::TurnChanged(Turn::Boss))).await;

    // Boss volley launches after the intro delay.
    wait_for(events, |e| {
        matches!(e, BattleEvent::EffectRequested(EffectKind::BossProjectile))
    })
    .await;
    commands.send(BattleCommand::EffectsCompleted).await.unwrap();

    // No defend submission: the window expires and the hit lands in full.
    wait_for(events, |e| {
        matches!(
            e,
            BattleEvent::EffectRequested(EffectKind::DamageShake(EffectTarget::Player))
        )
    })
    .await;
    commands.send(BattleCommand::EffectsCompleted).await.unwrap();

    wait_for(events, |e| {
        matches!(
            e,
            BattleEvent::HealthChanged {
                player: 80,
                boss: 80
            }
        )
    })
    .await;
    wait_for(events, |e| matches!(e, BattleEvent::TurnChanged(Turn::Player))).await;

    harness.cancel.cancel();
    timeout(Duration::from_secs(2), harness.handle)
        .await
        .expect("loop did not stop on cancel")
        .unwrap()
        .unwrap();
}

#[tokio::test]
async fn rejected_command_becomes_error_event() {
    let harness = spawn_loop(BattleConfig::default(), Turn::Player);

    harness
        .commands
        .send(BattleCommand::SubmitAction(9))
        .await
        .unwrap();

    let event = wait_for(&harness.events, |e| matches!(e, BattleEvent::Error { .. })).await;
    match event {
        BattleEvent::Error {
            operation, slot, ..
        } => {
            assert_eq!(operation, "submit_action");
            assert_eq!(slot, Some(9));
        }
        _ => unreachable!(),
    }

    harness.cancel.cancel();
}

#[tokio::test]
async fn battle_end_terminates_the_loop() {
    let mut battle = fast_battle_config();
    battle.attack_damage = 100; // one hit ends it
    let harness = spawn_loop(battle, Turn::Player);
    let commands = &harness.commands;

    commands
        .send(BattleCommand::Recording {
            slot: 0,
            command: RecordingCommand::Start,
        })
        .await
        .unwrap();
    commands
        .send(BattleCommand::Recording {
            slot: 0,
            command: RecordingCommand::Stop,
        })
        .await
        .unwrap();
    commands.send(BattleCommand::SubmitAction(0)).await.unwrap();
    commands.send(BattleCommand::EffectsCompleted).await.unwrap();

    wait_for(&harness.events, |e| {
        matches!(
            e,
            BattleEvent::BattleEnded {
                winner: Turn::Player
            }
        )
    })
    .await;

    timeout(Duration::from_secs(2), harness.handle)
        .await
        .expect("loop did not exit after the battle ended")
        .unwrap()
        .unwrap();
}

#[tokio::test]
async fn cancellation_stops_an_idle_loop() {
    let harness = spawn_loop(BattleConfig::default(), Turn::Player);

    harness.cancel.cancel();
    timeout(Duration::from_secs(2), harness.handle)
        .await
        .expect("loop ignored cancellation")
        .unwrap()
        .unwrap();
}
