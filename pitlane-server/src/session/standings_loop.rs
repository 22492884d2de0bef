use std::sync::Arc;
use std::time::Duration;

use pitlane_core::events::{RaceEvent, SessionId};
use pitlane_core::progress::LapNumber;
use pitlane_core::standings::StandingsEntry;
use pitlane_core::track::{Segment, Track, WaypointIndex};
use pitlane_core::AgentID;
use tokio::sync::{broadcast, mpsc, watch};

use crate::aggregator::ProgressAggregator;
use crate::ranking::{RankingEngine, StandingsOutcome};
use crate::simulator::ProgressSink;

// What each simulator writes into: records progress, then pokes the
// standings consumer.
pub(crate) struct SessionSink {
    pub session_id: SessionId,
    pub track: Arc<Track>,
    pub aggregator: Arc<ProgressAggregator>,
    pub notify: mpsc::UnboundedSender<()>,
    pub events: broadcast::Sender<RaceEvent>,
}

impl ProgressSink for SessionSink {
    fn emit(&mut self, agent_id: &AgentID, waypoint_index: WaypointIndex, lap: LapNumber) {
        match self.aggregator.record(agent_id, waypoint_index, lap) {
            Ok(record) => {
                // nobody listening is fine
                let _ = self.events.send(RaceEvent::WaypointReached {
                    session_id: self.session_id,
                    agent_id: agent_id.clone(),
                    waypoint_index,
                    lap,
                    sequence: record.sequence,
                });
                let _ = self.notify.send(());
            }
            Err(e) => tracing::warn!(session = %self.session_id, "dropping progress: {}", e),
        }
    }

    fn segment_started(
        &mut self,
        agent_id: &AgentID,
        segment: &Segment,
        lap: LapNumber,
        duration: Duration,
    ) {
        let (from, to) = match (
            self.track.waypoint_at(segment.from),
            self.track.waypoint_at(segment.to),
        ) {
            (Some(from), Some(to)) => (from.position, to.position),
            _ => return,
        };

        let _ = self.events.send(RaceEvent::SegmentStarted {
            session_id: self.session_id,
            agent_id: agent_id.clone(),
            lap,
            from: segment.from,
            to: segment.to,
            from_position: from,
            to_position: to,
            duration,
        });
    }
}

// The single place standings get computed for a session. Runs until every
// simulator (and so every notifier) is gone.
pub(crate) struct StandingsConsumer {
    pub session_id: SessionId,
    pub agent_ids: Vec<AgentID>,
    pub aggregator: Arc<ProgressAggregator>,
    pub engine: RankingEngine,
    pub events: broadcast::Sender<RaceEvent>,
    pub standings: Arc<watch::Sender<Vec<StandingsEntry>>>,
}

impl StandingsConsumer {
    pub(crate) async fn run(mut self, mut notifications: mpsc::UnboundedReceiver<()>) {
        // the starting grid
        self.refresh();

        while notifications.recv().await.is_some() {
            self.refresh();
        }

        tracing::debug!(session = %self.session_id, "standings consumer stopped");
    }

    fn refresh(&mut self) {
        let snapshot = self.aggregator.snapshot();

        match self.engine.compute_standings(&self.agent_ids, &snapshot) {
            StandingsOutcome::Changed(entries) => {
                tracing::debug!(
                    session = %self.session_id,
                    leader = ?entries.first().map(|entry| &entry.agent_id),
                    "standings changed"
                );
                self.standings.send_replace(entries.clone());
                let _ = self.events.send(RaceEvent::StandingsChanged {
                    session_id: self.session_id,
                    entries,
                });
            }
            StandingsOutcome::Unchanged => {}
        }
    }
}
