//! Terminal front-end for a single scenario battle.
//!
//! One side takes orders from stdin (or from the planner when
//! `TACTICS_AUTOPLAY` is set); the other is always planner-controlled.
//! Events are echoed as they are published.
mod config;
mod input;
mod presentation;

use anyhow::{Context, Result};
use tactics_content::ScenarioLoader;
use tactics_runtime::{
    BattleSession, IntentProvider, PlannerIntentProvider, RuntimeConfig, SubscriptionSet,
    TacticalPlanner, Topic,
};

use config::ClientConfig;
use input::StdinIntentProvider;
use presentation::{describe, render_board};

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let client_config = ClientConfig::from_env();
    let runtime_config = RuntimeConfig::from_env();

    let scenario = ScenarioLoader::load(&client_config.scenario).with_context(|| {
        format!("loading scenario {}", client_config.scenario.display())
    })?;
    let (state, ids) = scenario.deploy().context("deploying scenario units")?;
    tracing::info!(
        map = %scenario.map.name,
        units = ids.len(),
        "scenario loaded"
    );

    let provider: Box<dyn IntentProvider> = if runtime_config.autoplay_player {
        Box::new(PlannerIntentProvider::new(TacticalPlanner::new(
            runtime_config.battle.clone(),
        )))
    } else {
        Box::new(StdinIntentProvider::new())
    };

    let mut session = BattleSession::new(state, scenario.map.grid.clone(), runtime_config);

    let mut subscriptions = SubscriptionSet::new(session.bus());
    for topic in Topic::ALL {
        subscriptions.listen(topic, |event| println!("{}", describe(event)));
    }

    session.start();
    run_battle(&mut session, provider.as_ref(), client_config.max_rounds).await?;

    match session.state().defeated_side() {
        Some(loser) => println!("{} wins", loser.opponent()),
        None => println!("battle stopped in round {}", session.state().turn.round),
    }
    Ok(())
}

async fn run_battle(
    session: &mut BattleSession,
    provider: &dyn IntentProvider,
    max_rounds: u32,
) -> Result<()> {
    let ai_side = session.config().ai_side;

    while session.state().defeated_side().is_none() && session.state().turn.round < max_rounds {
        let side = session.state().turn.active_side;

        if side == ai_side {
            let mut turn = session.run_ai_turn()?;
            while turn.next().await.is_some() {}
            continue;
        }

        println!("{}", render_board(session.state(), session.map()));
        if !session.config().autoplay_player {
            println!("commands: move <unit> <x> <y> | attack <unit> <x> <y> | skip <unit> | undo | quit");
        }
        session.run_manual_turn(provider).await?;

        if session.state().defeated_side().is_none() && session.state().turn.active_side == side {
            tracing::info!("input closed, leaving the battle");
            break;
        }
    }

    println!("{}", render_board(session.state(), session.map()));
    Ok(())
}
