use std::process::ExitCode;

use pitlane_core::agent::Agent;
use pitlane_core::events::RaceEvent;
use pitlane_core::progress::LapNumber;
use pitlane_core::standings::{Movement, StandingsBoard};
use pitlane_core::GLOBAL_CONFIG;
use pitlane_server::session::{SessionController, SessionPlan};
use tokio::signal;
use tokio::sync::broadcast::{self, error::RecvError};
use tracing_subscriber::EnvFilter;

// Stands in for the leaderboard display: follows the event stream and logs
// every change in order.
async fn follow_leaderboard(mut events: broadcast::Receiver<RaceEvent>) {
    let mut agents: Vec<Agent> = Vec::new();
    let mut max_laps: LapNumber = 0;

    loop {
        let event = match events.recv().await {
            Ok(event) => event,
            Err(RecvError::Lagged(missed)) => {
                tracing::warn!(missed, "leaderboard fell behind");
                continue;
            }
            Err(RecvError::Closed) => return,
        };

        match event {
            RaceEvent::SessionStarted {
                agents: session_agents,
                max_laps: session_laps,
                ..
            } => {
                agents = session_agents;
                max_laps = session_laps;
            }
            RaceEvent::StandingsChanged {
                session_id,
                entries,
            } => {
                for entry in &entries {
                    let movement = match entry.movement() {
                        Movement::Gained(places) => format!("+{}", places),
                        Movement::Lost(places) => format!("-{}", places),
                        Movement::Held => String::new(),
                    };
                    tracing::debug!(
                        "P{} {} lap {}/{} {}",
                        entry.rank,
                        entry.agent_id,
                        entry.lap,
                        max_laps,
                        movement
                    );
                }

                let board = StandingsBoard::new(session_id, max_laps, &agents, &entries);
                match board.to_json() {
                    Ok(json) => tracing::info!(target: "leaderboard", "{}", json),
                    Err(e) => tracing::warn!("could not serialize standings: {}", e),
                }
            }
            RaceEvent::SessionEnded { .. } => return,
            _ => {}
        }
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let mode = GLOBAL_CONFIG.default_mode;
    let plan = match SessionPlan::for_mode(mode, &GLOBAL_CONFIG) {
        Ok(plan) => plan,
        Err(e) => {
            tracing::error!("could not prepare {:?} session: {}", mode, e);
            return ExitCode::FAILURE;
        }
    };

    let mut controller = SessionController::new(GLOBAL_CONFIG.event_buffer);
    let leaderboard = tokio::spawn(follow_leaderboard(controller.subscribe()));

    if let Err(e) = controller.start(plan).await {
        tracing::error!("session failed to start: {}", e);
        return ExitCode::FAILURE;
    }

    let interrupted = tokio::select! {
        _ = controller.wait_for_finish() => false,
        _ = signal::ctrl_c() => true,
    };
    if interrupted {
        tracing::info!("interrupted, stopping the session");
    }

    controller.reset().await;
    if let Err(e) = leaderboard.await {
        tracing::warn!("leaderboard task failed: {}", e);
    }

    ExitCode::SUCCESS
}
