use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, PoisonError, RwLock};

use pitlane_core::progress::{LapNumber, ProgressRecord, SequenceNumber};
use pitlane_core::track::WaypointIndex;
use pitlane_core::AgentID;
use thiserror::Error;

/// Session-wide source of progress sequence numbers. The first number handed
/// out is 1; 0 is left for agents that haven't reported yet.
#[derive(Debug, Default)]
pub struct SequenceCounter {
    last: AtomicU64,
}

impl SequenceCounter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn next(&self) -> SequenceNumber {
        self.last.fetch_add(1, Ordering::SeqCst) + 1
    }

    pub fn last_issued(&self) -> SequenceNumber {
        self.last.load(Ordering::SeqCst)
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AggregatorError {
    #[error("agent {0} is not part of this session")]
    UnknownAgent(AgentID),
}

// Latest progress per agent. The table's keys are fixed to the session's
// roster. Writers draw their sequence number under the write lock, so the
// order of sequence numbers is the order in which records landed in the
// table, and a snapshot taken under the read lock is a state the table
// really was in.
pub struct ProgressAggregator {
    counter: Arc<SequenceCounter>,
    table: RwLock<HashMap<AgentID, Option<ProgressRecord>>>,
}

impl ProgressAggregator {
    pub fn new<'a, I>(agent_ids: I, counter: Arc<SequenceCounter>) -> Self
    where
        I: IntoIterator<Item = &'a AgentID>,
    {
        let table = agent_ids.into_iter().map(|id| (id.clone(), None)).collect();

        Self {
            counter,
            table: RwLock::new(table),
        }
    }

    pub fn record(
        &self,
        agent_id: &str,
        waypoint_index: WaypointIndex,
        lap: LapNumber,
    ) -> Result<ProgressRecord, AggregatorError> {
        let mut table = self.table.write().unwrap_or_else(PoisonError::into_inner);
        let slot = table
            .get_mut(agent_id)
            .ok_or_else(|| AggregatorError::UnknownAgent(agent_id.to_string()))?;

        let record = ProgressRecord {
            waypoint_index,
            lap,
            sequence: self.counter.next(),
        };
        *slot = Some(record);

        Ok(record)
    }

    pub fn snapshot(&self) -> ProgressSnapshot {
        let table = self.table.read().unwrap_or_else(PoisonError::into_inner);
        table
            .iter()
            .filter_map(|(id, record)| record.map(|record| (id.clone(), record)))
            .collect()
    }

    pub fn last_sequence(&self) -> SequenceNumber {
        self.counter.last_issued()
    }
}

/// Owned copy of the aggregator table at one point in time.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ProgressSnapshot {
    records: HashMap<AgentID, ProgressRecord>,
}

impl ProgressSnapshot {
    pub fn get(&self, agent_id: &str) -> Option<&ProgressRecord> {
        self.records.get(agent_id)
    }

    pub fn record_or_baseline(&self, agent_id: &str) -> ProgressRecord {
        self.get(agent_id).copied().unwrap_or_else(ProgressRecord::baseline)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&AgentID, &ProgressRecord)> {
        self.records.iter()
    }
}

impl FromIterator<(AgentID, ProgressRecord)> for ProgressSnapshot {
    fn from_iter<T: IntoIterator<Item = (AgentID, ProgressRecord)>>(iter: T) -> Self {
        Self {
            records: iter.into_iter().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;
    use std::thread;

    use super::*;

    fn ids(names: &[&str]) -> Vec<AgentID> {
        names.iter().map(|name| name.to_string()).collect()
    }

    fn aggregator(names: &[&str]) -> ProgressAggregator {
        ProgressAggregator::new(&ids(names), Arc::new(SequenceCounter::new()))
    }

    #[test]
    fn test_sequence_is_shared_across_agents() {
        let aggregator = aggregator(&["a", "b"]);

        assert_eq!(aggregator.record("a", 1, 1).unwrap().sequence, 1);
        assert_eq!(aggregator.record("b", 1, 1).unwrap().sequence, 2);
        assert_eq!(aggregator.record("a", 2, 1).unwrap().sequence, 3);
        assert_eq!(aggregator.last_sequence(), 3);
    }

    #[test]
    fn test_record_replaces_previous_value() {
        let aggregator = aggregator(&["a"]);
        aggregator.record("a", 1, 1).unwrap();
        aggregator.record("a", 2, 1).unwrap();

        let snapshot = aggregator.snapshot();
        assert_eq!(snapshot.len(), 1);
        assert_eq!(
            snapshot.get("a"),
            Some(&ProgressRecord {
                waypoint_index: 2,
                lap: 1,
                sequence: 2
            })
        );
    }

    #[test]
    fn test_unknown_agent_is_rejected() {
        let aggregator = aggregator(&["a"]);

        assert_eq!(
            aggregator.record("z", 1, 1),
            Err(AggregatorError::UnknownAgent("z".to_string()))
        );
        // a rejected record doesn't burn a sequence number
        assert_eq!(aggregator.last_sequence(), 0);
        assert!(aggregator.snapshot().is_empty());
    }

    #[test]
    fn test_snapshot_is_isolated_from_later_writes() {
        let aggregator = aggregator(&["a", "b"]);
        aggregator.record("a", 1, 1).unwrap();

        let snapshot = aggregator.snapshot();
        aggregator.record("a", 2, 1).unwrap();
        aggregator.record("b", 1, 1).unwrap();

        assert_eq!(snapshot.get("a").map(|r| r.waypoint_index), Some(1));
        assert_eq!(snapshot.get("b"), None);
        assert_eq!(snapshot.record_or_baseline("b"), ProgressRecord::baseline());
    }

    #[test]
    fn test_concurrent_writers_get_unique_increasing_sequences() {
        let names = ["a", "b", "c", "d"];
        let aggregator = Arc::new(aggregator(&names));

        let handles: Vec<_> = names
            .iter()
            .map(|name| {
                let aggregator = Arc::clone(&aggregator);
                let name = name.to_string();
                thread::spawn(move || {
                    (0..500)
                        .map(|i| aggregator.record(&name, i % 7, 1 + i as LapNumber / 7).unwrap())
                        .map(|record| record.sequence)
                        .collect::<Vec<_>>()
                })
            })
            .collect();

        let mut seen = HashSet::new();
        for handle in handles {
            let sequences = handle.join().unwrap();
            assert!(sequences.windows(2).all(|pair| pair[0] < pair[1]));
            for sequence in sequences {
                assert!(seen.insert(sequence), "duplicate sequence {}", sequence);
            }
        }

        assert_eq!(seen.len(), 2000);
        assert_eq!(aggregator.last_sequence(), 2000);
    }

    #[test]
    fn test_snapshots_are_point_in_time() {
        let names = ["a", "b", "c"];
        let aggregator = Arc::new(aggregator(&names));

        let writers: Vec<_> = names
            .iter()
            .map(|name| {
                let aggregator = Arc::clone(&aggregator);
                let name = name.to_string();
                thread::spawn(move || {
                    let records = (0..2000)
                        .map(|i| aggregator.record(&name, i % 5, 1 + i as LapNumber / 5).unwrap())
                        .collect::<Vec<_>>();
                    (name, records)
                })
            })
            .collect();

        let reader = {
            let aggregator = Arc::clone(&aggregator);
            thread::spawn(move || (0..500).map(|_| aggregator.snapshot()).collect::<Vec<_>>())
        };

        let history: HashMap<AgentID, Vec<ProgressRecord>> = writers
            .into_iter()
            .map(|handle| handle.join().unwrap())
            .collect();

        // every agent in a snapshot shows its latest record as of the newest
        // sequence number that snapshot contains
        for snapshot in reader.join().unwrap() {
            let newest = match snapshot.iter().map(|(_, record)| record.sequence).max() {
                Some(newest) => newest,
                None => continue,
            };
            for (id, records) in &history {
                let expected = records.iter().rev().find(|record| record.sequence <= newest);
                assert_eq!(snapshot.get(id), expected, "snapshot mixes two moments");
            }
        }
    }
}
