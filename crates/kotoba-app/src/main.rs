use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use kotoba_battle::BattleOptions;
use kotoba_config::Config;
use kotoba_types::BattleItem;
use tokio::signal;
use tracing_subscriber::EnvFilter;

mod controller;
mod events;
mod host;
mod state;

#[cfg(test)]
mod tests;

use self::controller::AppController;
use self::state::AppState;

#[derive(Parser)]
#[command(about = "Vocabulary boss-battle runner")]
struct Args {
    /// JSON vocabulary file for the encounter
    #[arg(long)]
    vocab: PathBuf,

    #[arg(long, default_value_t = 100)]
    boss_health: i32,

    /// Seed for a deterministic battle
    #[arg(long)]
    seed: Option<u64>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_ansi(atty::is(atty::Stream::Stdout))
        .init();

    let args = Args::parse();
    let entries = kotoba_deck::load_entries(&args.vocab)?;

    let state = Arc::new(AppState::new(Config::new()));
    let controller = AppController::new(state);

    let options = BattleOptions {
        boss_max_health: args.boss_health,
        attack_item: BattleItem {
            name: "flame-spear".into(),
            visual_asset_ref: "items/flame_spear.png".into(),
            is_special: false,
        },
        defense_item: BattleItem {
            name: "oak-shield".into(),
            visual_asset_ref: "items/oak_shield.png".into(),
            is_special: false,
        },
        seed: args.seed,
        opening_turn: None,
    };

    let mut tasks = controller.spawn_tasks(entries, options);

    tokio::select! {
        _ = signal::ctrl_c() => {
            tracing::info!("Shutdown requested");
            controller.shutdown();
        }
        result = tasks.join_next() => {
            match result {
                Some(Ok(Ok(()))) => tracing::info!("task finished"),
                Some(Ok(Err(e))) => tracing::error!("task failed: {e}"),
                Some(Err(e)) => tracing::error!("task panicked: {e}"),
                None => {}
            }
            controller.shutdown();
        }
    }

    while let Some(result) = tasks.join_next().await {
        if let Ok(Err(e)) = result {
            tracing::error!("task failed during shutdown: {e}");
        }
    }

    Ok(())
}
