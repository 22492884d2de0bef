use std::sync::Arc;
use std::time::Duration;

use pitlane_core::agent::Agent;
use pitlane_core::progress::LapNumber;
use pitlane_core::track::{Segment, Track, WaypointIndex};
use pitlane_core::AgentID;
use rand::rngs::StdRng;
use tokio::sync::watch;
use tokio::time;

pub use self::speed::{DurationRange, SpeedModel};

mod speed;

/// Receives an agent's progress as it happens. `emit` is called synchronously
/// the moment the agent arrives at a waypoint.
pub trait ProgressSink {
    fn emit(&mut self, agent_id: &AgentID, waypoint_index: WaypointIndex, lap: LapNumber);

    fn segment_started(
        &mut self,
        _agent_id: &AgentID,
        _segment: &Segment,
        _lap: LapNumber,
        _duration: Duration,
    ) {
    }
}

impl<F> ProgressSink for F
where
    F: FnMut(&AgentID, WaypointIndex, LapNumber),
{
    fn emit(&mut self, agent_id: &AgentID, waypoint_index: WaypointIndex, lap: LapNumber) {
        self(agent_id, waypoint_index, lap)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SimulatorOutcome {
    Finished,
    Cancelled,
}

pub struct AgentSimulator {
    agent: Agent,
    track: Arc<Track>,
    max_laps: LapNumber,
    speed_model: SpeedModel,
    time_scale: f64,
    rng: StdRng,
}

impl AgentSimulator {
    pub fn new(
        agent: Agent,
        track: Arc<Track>,
        max_laps: LapNumber,
        speed_model: SpeedModel,
        time_scale: f64,
        rng: StdRng,
    ) -> Self {
        Self {
            agent,
            track,
            max_laps,
            speed_model,
            time_scale,
            rng,
        }
    }

    fn segment_duration(&mut self, segment: &Segment) -> Duration {
        let secs = self.speed_model.segment_secs(segment, &mut self.rng) * self.time_scale;
        // sessions refuse plans whose slowest segment can't be a Duration
        Duration::try_from_secs_f64(secs).unwrap_or(Duration::MAX)
    }

    // Drives the agent round the track until it has completed `max_laps`
    // laps or `cancel` flips to true. Nothing is emitted once cancelled.
    pub async fn run<S: ProgressSink>(
        mut self,
        mut sink: S,
        mut cancel: watch::Receiver<bool>,
    ) -> SimulatorOutcome {
        if !pause(self.agent.start_delay, &mut cancel).await {
            return SimulatorOutcome::Cancelled;
        }

        let track = Arc::clone(&self.track);
        let mut lap: LapNumber = 1;

        loop {
            for segment in track.segments() {
                if is_cancelled(&cancel) {
                    return SimulatorOutcome::Cancelled;
                }

                let duration = self.segment_duration(&segment);
                sink.segment_started(&self.agent.id, &segment, lap, duration);

                if !pause(duration, &mut cancel).await || is_cancelled(&cancel) {
                    return SimulatorOutcome::Cancelled;
                }

                tracing::trace!(agent = %self.agent.id, waypoint = segment.to, lap, "arrived");
                sink.emit(&self.agent.id, segment.to, lap);
            }

            lap += 1;
            if lap > self.max_laps {
                return SimulatorOutcome::Finished;
            }
        }
    }
}

fn is_cancelled(cancel: &watch::Receiver<bool>) -> bool {
    *cancel.borrow()
}

// Sleeps for `duration`, waking early if cancelled. Returns false when the
// sleep was cut short.
async fn pause(duration: Duration, cancel: &mut watch::Receiver<bool>) -> bool {
    if is_cancelled(cancel) {
        return false;
    }

    tokio::select! {
        _ = time::sleep(duration) => true,
        _ = cancelled(cancel) => false,
    }
}

async fn cancelled(cancel: &mut watch::Receiver<bool>) {
    while !is_cancelled(cancel) {
        // the sender going away means the session is gone
        if cancel.changed().await.is_err() {
            return;
        }
    }
}
