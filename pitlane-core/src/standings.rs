use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::agent::Agent;
use crate::events::SessionId;
use crate::progress::LapNumber;
use crate::track::WaypointIndex;
use crate::AgentID;

pub type Placement = u32;
pub type RankChange = i32;

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct StandingsEntry {
    pub agent_id: AgentID,
    pub rank: Placement,
    // previous rank minus current rank: positive means places gained
    pub rank_change: RankChange,
    pub lap: LapNumber,
    pub waypoint_index: WaypointIndex,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Movement {
    Gained(u32),
    Lost(u32),
    Held,
}

impl StandingsEntry {
    pub fn movement(&self) -> Movement {
        match self.rank_change {
            0 => Movement::Held,
            change if change > 0 => Movement::Gained(change.unsigned_abs()),
            change => Movement::Lost(change.unsigned_abs()),
        }
    }
}

// Two standings lists describe the same order if they rank the same agents
// identically; rank changes and progress details don't matter.
pub fn same_order(a: &[StandingsEntry], b: &[StandingsEntry]) -> bool {
    a.len() == b.len()
        && a
            .iter()
            .zip(b)
            .all(|(x, y)| x.agent_id == y.agent_id && x.rank == y.rank)
}

#[derive(Serialize, Clone, Debug, PartialEq)]
pub struct BoardRow {
    pub rank: Placement,
    pub agent_id: AgentID,
    pub display_name: String,
    pub display_color: String,
    pub lap: LapNumber,
    pub rank_change: RankChange,
}

/// Standings joined with agent metadata, ready for a leaderboard display.
#[derive(Serialize, Clone, Debug, PartialEq)]
pub struct StandingsBoard {
    pub session_id: SessionId,
    pub max_laps: LapNumber,
    pub rows: Vec<BoardRow>,
}

impl StandingsBoard {
    pub fn new(
        session_id: SessionId,
        max_laps: LapNumber,
        agents: &[Agent],
        entries: &[StandingsEntry],
    ) -> Self {
        let agents: HashMap<&str, &Agent> = agents
            .iter()
            .map(|agent| (agent.id.as_str(), agent))
            .collect();

        let rows = entries
            .iter()
            .map(|entry| {
                let agent = agents.get(entry.agent_id.as_str());
                BoardRow {
                    rank: entry.rank,
                    agent_id: entry.agent_id.clone(),
                    display_name: agent
                        .map(|a| a.display_name.clone())
                        .unwrap_or_else(|| entry.agent_id.clone()),
                    display_color: agent.map(|a| a.display_color.clone()).unwrap_or_default(),
                    lap: entry.lap,
                    rank_change: entry.rank_change,
                }
            })
            .collect();

        Self {
            session_id,
            max_laps,
            rows,
        }
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}
