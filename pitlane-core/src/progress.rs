use serde::{Deserialize, Serialize};

use crate::track::WaypointIndex;

pub type LapNumber = u32;
pub type SequenceNumber = u64;

/// Latest known position of one agent. `sequence` comes from a counter shared
/// by every agent in the session, so it totally orders all progress events.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
pub struct ProgressRecord {
    pub waypoint_index: WaypointIndex,
    pub lap: LapNumber,
    pub sequence: SequenceNumber,
}

impl ProgressRecord {
    // where every agent sits before it has reported anything
    pub fn baseline() -> Self {
        ProgressRecord {
            waypoint_index: 0,
            lap: 1,
            sequence: 0,
        }
    }
}

impl Default for ProgressRecord {
    fn default() -> Self {
        Self::baseline()
    }
}
