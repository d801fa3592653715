use std::sync::Arc;

use kanal::{AsyncReceiver, AsyncSender};
use kotoba_battle::BattleOptions;
use kotoba_types::{BattleCommand, BattleEvent, VocabularyEntry};
use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;

use crate::events::battle_loop;
use crate::host::host_loop;
use crate::state::AppState;

/// Centralized channel management
pub struct ChannelSet {
    pub app_to_host: (AsyncSender<BattleEvent>, AsyncReceiver<BattleEvent>),
    pub host_to_app: (AsyncSender<BattleCommand>, AsyncReceiver<BattleCommand>),
}

impl ChannelSet {
    pub fn new() -> Self {
        Self {
            app_to_host: kanal::bounded_async(256), // effect/event burst capacity
            host_to_app: kanal::bounded_async(64),  // host interactions
        }
    }
}

/// Application controller for task spawning and lifecycle
pub struct AppController {
    channels: ChannelSet,
    state: Arc<AppState>,
    cancel_token: CancellationToken,
}

impl AppController {
    pub fn new(state: Arc<AppState>) -> Self {
        Self {
            channels: ChannelSet::new(),
            state,
            cancel_token: CancellationToken::new(),
        }
    }

    /// Channel ends for an embedding host (commands in, events out).
    pub fn host_handles(&self) -> (AsyncSender<BattleCommand>, AsyncReceiver<BattleEvent>) {
        (
            self.channels.host_to_app.0.clone(),
            self.channels.app_to_host.1.clone(),
        )
    }

    pub fn spawn_tasks(
        &self,
        entries: Vec<VocabularyEntry>,
        options: BattleOptions,
    ) -> JoinSet<anyhow::Result<()>> {
        let mut tasks = JoinSet::new();

        // Battle loop
        tasks.spawn(battle_loop(
            self.state.clone(),
            self.channels.host_to_app.1.clone(),
            self.channels.app_to_host.0.clone(),
            entries,
            options,
            self.cancel_token.child_token(),
        ));

        // Headless host: logs events and acknowledges effect sequences
        tasks.spawn(host_loop(
            self.channels.app_to_host.1.clone(),
            self.channels.host_to_app.0.clone(),
        ));

        tasks
    }

    pub fn shutdown(&self) {
        self.cancel_token.cancel();
    }
}
