use std::io;

use thiserror::Error;

use crate::track::WaypointIndex;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum InvalidTrackError {
    #[error("a track needs at least 2 waypoints, got {count}")]
    TooFewWaypoints { count: usize },
    // a zero-length segment would need an infinite speed to traverse
    #[error("waypoint {index} sits on top of the waypoint before it")]
    ZeroLengthSegment { index: WaypointIndex },
    #[error("waypoint {index} does not have a finite position")]
    NonFinitePosition { index: WaypointIndex },
    #[error("the segment ending at waypoint {index} is too long to measure")]
    UnboundedSegment { index: WaypointIndex },
    #[error("the last waypoint does not return to the first")]
    OpenCircuit,
}

#[derive(Error, Debug)]
pub enum TrackLoadError {
    #[error("could not read track file: {0}")]
    Io(#[from] io::Error),
    #[error("could not parse track file: {0}")]
    Parse(#[from] serde_yaml::Error),
    #[error(transparent)]
    Invalid(#[from] InvalidTrackError),
}
