use std::time::Duration;

use glam::DVec2;
use serde::{Deserialize, Serialize};

pub use uuid::Uuid;

use crate::agent::Agent;
use crate::progress::{LapNumber, SequenceNumber};
use crate::standings::StandingsEntry;
use crate::track::WaypointIndex;
use crate::AgentID;

pub type SessionId = Uuid;

// Everything a display needs to follow a session. Each event is tagged with
// the session it came from so anything left over from a reset can be dropped.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub enum RaceEvent {
    SessionStarted {
        session_id: SessionId,
        agents: Vec<Agent>,
        max_laps: LapNumber,
    },
    // An agent left `from` and will reach `to` after `duration`; the display
    // interpolates the dot between the two positions.
    SegmentStarted {
        session_id: SessionId,
        agent_id: AgentID,
        lap: LapNumber,
        from: WaypointIndex,
        to: WaypointIndex,
        from_position: DVec2,
        to_position: DVec2,
        #[serde(with = "serde_millis")]
        duration: Duration,
    },
    WaypointReached {
        session_id: SessionId,
        agent_id: AgentID,
        waypoint_index: WaypointIndex,
        lap: LapNumber,
        sequence: SequenceNumber,
    },
    AgentFinished {
        session_id: SessionId,
        agent_id: AgentID,
    },
    StandingsChanged {
        session_id: SessionId,
        entries: Vec<StandingsEntry>,
    },
    SessionEnded {
        session_id: SessionId,
        completed: bool,
    },
}

impl RaceEvent {
    pub fn session_id(&self) -> SessionId {
        match self {
            RaceEvent::SessionStarted { session_id, .. }
            | RaceEvent::SegmentStarted { session_id, .. }
            | RaceEvent::WaypointReached { session_id, .. }
            | RaceEvent::AgentFinished { session_id, .. }
            | RaceEvent::StandingsChanged { session_id, .. }
            | RaceEvent::SessionEnded { session_id, .. } => *session_id,
        }
    }
}
