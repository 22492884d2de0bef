use std::cmp::Ordering;
use std::collections::HashMap;

use pitlane_core::progress::ProgressRecord;
use pitlane_core::standings::{same_order, Placement, RankChange, StandingsEntry};
use pitlane_core::AgentID;

use crate::aggregator::ProgressSnapshot;

// Less means `a` is running ahead of `b`: more laps, then further round the
// lap, then whoever got there first.
pub fn ranking_order(a: &ProgressRecord, b: &ProgressRecord) -> Ordering {
    if a.lap != b.lap {
        a.lap.cmp(&b.lap).reverse()
    } else if a.waypoint_index != b.waypoint_index {
        a.waypoint_index.cmp(&b.waypoint_index).reverse()
    } else {
        a.sequence.cmp(&b.sequence)
    }
}

struct Candidate<'a> {
    agent_id: &'a AgentID,
    record: ProgressRecord,
    grid_slot: usize,
}

impl Candidate<'_> {
    // Sequences are unique once recorded, but every agent that hasn't moved
    // yet shares sequence 0; grid order settles those.
    fn cmp_standing(&self, other: &Self) -> Ordering {
        ranking_order(&self.record, &other.record).then(self.grid_slot.cmp(&other.grid_slot))
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum StandingsOutcome {
    Changed(Vec<StandingsEntry>),
    Unchanged,
}

pub fn compute_standings(
    current_agent_ids: &[AgentID],
    snapshot: &ProgressSnapshot,
    previous: &[StandingsEntry],
) -> StandingsOutcome {
    let mut candidates: Vec<Candidate> = current_agent_ids
        .iter()
        .enumerate()
        .map(|(grid_slot, agent_id)| Candidate {
            agent_id,
            record: snapshot.record_or_baseline(agent_id),
            grid_slot,
        })
        .collect();
    candidates.sort_by(Candidate::cmp_standing);

    let previous_ranks: HashMap<&str, Placement> = previous
        .iter()
        .map(|entry| (entry.agent_id.as_str(), entry.rank))
        .collect();

    let standings: Vec<StandingsEntry> = candidates
        .into_iter()
        .enumerate()
        .map(|(position, candidate)| {
            let rank = position as Placement + 1;
            // first appearance never counts as a move
            let rank_change = previous_ranks
                .get(candidate.agent_id.as_str())
                .map_or(0, |&previous_rank| {
                    previous_rank as RankChange - rank as RankChange
                });

            StandingsEntry {
                agent_id: candidate.agent_id.clone(),
                rank,
                rank_change,
                lap: candidate.record.lap,
                waypoint_index: candidate.record.waypoint_index,
            }
        })
        .collect();

    if same_order(&standings, previous) {
        StandingsOutcome::Unchanged
    } else {
        StandingsOutcome::Changed(standings)
    }
}

/// Keeps the last published standings so each recompute can report rank
/// changes against it. Must only be driven by one caller at a time.
#[derive(Debug, Default)]
pub struct RankingEngine {
    previous: Vec<StandingsEntry>,
}

impl RankingEngine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn compute_standings(
        &mut self,
        current_agent_ids: &[AgentID],
        snapshot: &ProgressSnapshot,
    ) -> StandingsOutcome {
        let outcome = compute_standings(current_agent_ids, snapshot, &self.previous);
        if let StandingsOutcome::Changed(standings) = &outcome {
            self.previous = standings.clone();
        }
        outcome
    }

    pub fn previous(&self) -> &[StandingsEntry] {
        &self.previous
    }
}
