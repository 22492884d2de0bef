use std::sync::Arc;

use pitlane_core::agent::Agent;
use pitlane_core::error::{InvalidTrackError, TrackLoadError};
use pitlane_core::events::{RaceEvent, SessionId, Uuid};
use pitlane_core::progress::LapNumber;
use pitlane_core::standings::StandingsEntry;
use pitlane_core::track::WaypointIndex;
use pitlane_core::AgentID;
use rand::rngs::StdRng;
use rand::SeedableRng;
use thiserror::Error;
use tokio::sync::{broadcast, mpsc, watch};
use tokio::task::JoinHandle;

use crate::aggregator::{ProgressAggregator, ProgressSnapshot, SequenceCounter};
use crate::ranking::RankingEngine;
use crate::simulator::{AgentSimulator, SimulatorOutcome};

use self::standings_loop::{SessionSink, StandingsConsumer};

pub use self::plan::SessionPlan;

mod plan;
mod standings_loop;

#[derive(Error, Debug)]
pub enum SessionError {
    #[error("invalid track: {0}")]
    InvalidTrack(#[from] InvalidTrackError),
    #[error(transparent)]
    Track(#[from] TrackLoadError),
    #[error("a session needs at least one lap")]
    InvalidLapCount,
    #[error("a session needs at least one agent")]
    EmptyRoster,
    #[error("agent id {0} is used more than once")]
    DuplicateAgent(AgentID),
    #[error("invalid speed model: {0}")]
    InvalidSpeedModel(&'static str),
    #[error("the segment ending at waypoint {index} could take longer than a timer can wait")]
    SegmentTooSlow { index: WaypointIndex },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SessionState {
    // no simulators exist
    Idle,
    // one generation of simulators owns the aggregator
    Running,
}

// One generation of agents and everything they write into. Dropped as a unit
// on reset so nothing carries over into the next session.
struct RunningSession {
    id: SessionId,
    agents: Vec<Agent>,
    max_laps: LapNumber,
    aggregator: Arc<ProgressAggregator>,
    cancel: watch::Sender<bool>,
    simulators: Vec<JoinHandle<SimulatorOutcome>>,
    outcomes: Vec<SimulatorOutcome>,
    consumer: Option<JoinHandle<()>>,
}

impl RunningSession {
    // Waits for every simulator task still outstanding. Safe to abandon part
    // way: a handle only leaves the list once its task has completed.
    async fn join_simulators(&mut self) {
        while let Some(handle) = self.simulators.last_mut() {
            let outcome = match handle.await {
                Ok(outcome) => outcome,
                Err(e) => {
                    tracing::warn!(session = %self.id, "simulator task failed: {}", e);
                    SimulatorOutcome::Cancelled
                }
            };
            self.simulators.pop();
            self.outcomes.push(outcome);
        }
    }

    async fn join_consumer(&mut self) {
        if let Some(consumer) = self.consumer.as_mut() {
            if let Err(e) = consumer.await {
                tracing::warn!(session = %self.id, "standings consumer failed: {}", e);
            }
            self.consumer = None;
        }
    }

    fn completed(&self) -> bool {
        self.simulators.is_empty()
            && self
                .outcomes
                .iter()
                .all(|outcome| *outcome == SimulatorOutcome::Finished)
    }
}

impl Drop for RunningSession {
    fn drop(&mut self) {
        // a controller dropped mid-race still stops its simulators
        self.cancel.send_replace(true);
    }
}

pub struct SessionController {
    running: Option<RunningSession>,
    events: broadcast::Sender<RaceEvent>,
    standings: Arc<watch::Sender<Vec<StandingsEntry>>>,
}

impl SessionController {
    pub fn new(event_buffer: usize) -> Self {
        let (events, _) = broadcast::channel(event_buffer.max(1));
        let (standings, _) = watch::channel(Vec::new());

        Self {
            running: None,
            events,
            standings: Arc::new(standings),
        }
    }

    pub fn state(&self) -> SessionState {
        match self.running {
            Some(_) => SessionState::Running,
            None => SessionState::Idle,
        }
    }

    pub fn is_running(&self) -> bool {
        self.running.is_some()
    }

    pub fn session_id(&self) -> Option<SessionId> {
        self.running.as_ref().map(|session| session.id)
    }

    pub fn active_agents(&self) -> &[Agent] {
        match &self.running {
            Some(session) => &session.agents,
            None => &[],
        }
    }

    pub fn max_laps(&self) -> Option<LapNumber> {
        self.running.as_ref().map(|session| session.max_laps)
    }

    pub fn progress_snapshot(&self) -> Option<ProgressSnapshot> {
        self.running
            .as_ref()
            .map(|session| session.aggregator.snapshot())
    }

    // latest published standings; only updates when the order changes
    pub fn standings(&self) -> watch::Receiver<Vec<StandingsEntry>> {
        self.standings.subscribe()
    }

    pub fn latest_standings(&self) -> Vec<StandingsEntry> {
        self.standings.borrow().clone()
    }

    pub fn subscribe(&self) -> broadcast::Receiver<RaceEvent> {
        self.events.subscribe()
    }

    // Starts a fresh session, tearing down any running one first. On error
    // the controller is left idle.
    pub async fn start(&mut self, plan: SessionPlan) -> Result<SessionId, SessionError> {
        self.reset().await;

        let track = Arc::new(plan.validate()?);
        let session_id = Uuid::new_v4();
        let agent_ids: Vec<AgentID> = plan.agents.iter().map(|agent| agent.id.clone()).collect();
        let aggregator = Arc::new(ProgressAggregator::new(
            &agent_ids,
            Arc::new(SequenceCounter::new()),
        ));
        let (cancel, cancel_rx) = watch::channel(false);
        let (notify, notifications) = mpsc::unbounded_channel();

        let _ = self.events.send(RaceEvent::SessionStarted {
            session_id,
            agents: plan.agents.clone(),
            max_laps: plan.max_laps,
        });

        let consumer = StandingsConsumer {
            session_id,
            agent_ids,
            aggregator: Arc::clone(&aggregator),
            engine: RankingEngine::new(),
            events: self.events.clone(),
            standings: Arc::clone(&self.standings),
        };
        let consumer = tokio::spawn(consumer.run(notifications));

        let simulators = plan
            .agents
            .iter()
            .enumerate()
            .map(|(grid_slot, agent)| {
                let rng = match plan.rng_seed {
                    Some(seed) => StdRng::seed_from_u64(seed.wrapping_add(grid_slot as u64)),
                    None => StdRng::from_entropy(),
                };
                let simulator = AgentSimulator::new(
                    agent.clone(),
                    Arc::clone(&track),
                    plan.max_laps,
                    plan.speed_model,
                    plan.time_scale,
                    rng,
                );
                let sink = SessionSink {
                    session_id,
                    track: Arc::clone(&track),
                    aggregator: Arc::clone(&aggregator),
                    notify: notify.clone(),
                    events: self.events.clone(),
                };
                let events = self.events.clone();
                let cancel = cancel_rx.clone();
                let agent_id = agent.id.clone();

                tokio::spawn(async move {
                    let outcome = simulator.run(sink, cancel).await;
                    if outcome == SimulatorOutcome::Finished {
                        tracing::info!(session = %session_id, agent = %agent_id, "finished");
                        let _ = events.send(RaceEvent::AgentFinished {
                            session_id,
                            agent_id,
                        });
                    }
                    outcome
                })
            })
            .collect();

        tracing::info!(
            session = %session_id,
            agents = plan.agents.len(),
            max_laps = plan.max_laps,
            "session started"
        );

        self.running = Some(RunningSession {
            id: session_id,
            agents: plan.agents,
            max_laps: plan.max_laps,
            aggregator,
            cancel,
            simulators,
            outcomes: Vec::new(),
            consumer: Some(consumer),
        });

        Ok(session_id)
    }

    // Waits until every agent of the running session has finished its laps.
    // The session stays running so the final standings remain available.
    pub async fn wait_for_finish(&mut self) {
        if let Some(session) = self.running.as_mut() {
            session.join_simulators().await;
            session.join_consumer().await;
        }
    }

    // Cancels the running session and waits for all of its simulators to stop
    // before discarding its progress and standings.
    pub async fn reset(&mut self) {
        let mut session = match self.running.take() {
            Some(session) => session,
            None => return,
        };

        session.cancel.send_replace(true);
        session.join_simulators().await;
        session.join_consumer().await;

        let completed = session.completed();
        let session_id = session.id;
        let progress_events = session.aggregator.last_sequence();
        drop(session);

        self.standings.send_replace(Vec::new());
        let _ = self.events.send(RaceEvent::SessionEnded {
            session_id,
            completed,
        });
        tracing::info!(session = %session_id, completed, progress_events, "session ended");
    }
}
