use std::fs;
use std::path::Path;

use glam::DVec2;
use serde::{Deserialize, Serialize};

use crate::error::{InvalidTrackError, TrackLoadError};

pub mod circuits;

pub type WaypointIndex = usize;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SegmentKind {
    Straight,
    Turn,
}

impl Default for SegmentKind {
    fn default() -> Self {
        SegmentKind::Straight
    }
}

// A discrete point on the circuit. `segment_kind` describes the stretch of
// track that ends at this waypoint.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Waypoint {
    pub position: DVec2,
    #[serde(default)]
    pub segment_kind: SegmentKind,
    #[serde(default)]
    pub label: Option<String>,
}

impl Waypoint {
    pub fn new(x: f64, y: f64, segment_kind: SegmentKind) -> Self {
        Self {
            position: DVec2::new(x, y),
            segment_kind,
            label: None,
        }
    }

    pub fn straight(x: f64, y: f64) -> Self {
        Self::new(x, y, SegmentKind::Straight)
    }

    pub fn turn(x: f64, y: f64) -> Self {
        Self::new(x, y, SegmentKind::Turn)
    }

    pub fn with_label(mut self, label: &str) -> Self {
        self.label = Some(label.to_string());
        self
    }
}

/// One traversal step between two consecutive waypoints.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Segment {
    pub from: WaypointIndex,
    pub to: WaypointIndex,
    pub length: f64,
    pub kind: SegmentKind,
}

/// Immutable, validated waypoint sequence. The last waypoint closes the lap,
/// so a lap is `waypoint_count() - 1` segments long.
#[derive(Clone, Debug, PartialEq)]
pub struct Track {
    waypoints: Vec<Waypoint>,
}

#[derive(Deserialize)]
struct TrackFile {
    waypoints: Vec<Waypoint>,
}

impl Track {
    pub fn new(waypoints: Vec<Waypoint>) -> Result<Self, InvalidTrackError> {
        if waypoints.len() < 2 {
            return Err(InvalidTrackError::TooFewWaypoints {
                count: waypoints.len(),
            });
        }

        if let Some(index) = waypoints.iter().position(|waypoint| !waypoint.position.is_finite()) {
            return Err(InvalidTrackError::NonFinitePosition { index });
        }

        if let Some(index) =
            (1..waypoints.len()).find(|&i| waypoints[i - 1].position == waypoints[i].position)
        {
            return Err(InvalidTrackError::ZeroLengthSegment { index });
        }

        let track = Self { waypoints };
        if let Some(segment) = track.segments().find(|segment| !segment.length.is_finite()) {
            return Err(InvalidTrackError::UnboundedSegment { index: segment.to });
        }
        if !track.is_closed() {
            return Err(InvalidTrackError::OpenCircuit);
        }

        Ok(track)
    }

    pub fn from_yaml_str(document: &str) -> Result<Self, TrackLoadError> {
        let file: TrackFile = serde_yaml::from_str(document)?;
        Ok(Self::new(file.waypoints)?)
    }

    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, TrackLoadError> {
        let document = fs::read_to_string(path)?;
        Self::from_yaml_str(&document)
    }

    pub fn waypoint_count(&self) -> usize {
        self.waypoints.len()
    }

    pub fn last_index(&self) -> WaypointIndex {
        self.waypoints.len() - 1
    }

    pub fn waypoints(&self) -> &[Waypoint] {
        &self.waypoints
    }

    pub fn waypoint_at(&self, index: WaypointIndex) -> Option<&Waypoint> {
        self.waypoints.get(index)
    }

    // Euclidean distance from waypoint `from` to waypoint `from + 1`
    pub fn distance_between(&self, from: WaypointIndex) -> Option<f64> {
        let start = self.waypoints.get(from)?;
        let end = self.waypoints.get(from + 1)?;
        Some(start.position.distance(end.position))
    }

    // kind of the segment that ends at waypoint `to`
    pub fn segment_kind(&self, to: WaypointIndex) -> Option<SegmentKind> {
        if to == 0 {
            return None;
        }
        self.waypoints.get(to).map(|waypoint| waypoint.segment_kind)
    }

    pub fn segments(&self) -> impl Iterator<Item = Segment> + '_ {
        self.waypoints
            .windows(2)
            .enumerate()
            .map(|(from, pair)| Segment {
                from,
                to: from + 1,
                length: pair[0].position.distance(pair[1].position),
                kind: pair[1].segment_kind,
            })
    }

    pub fn lap_length(&self) -> f64 {
        self.segments().map(|segment| segment.length).sum()
    }

    pub fn is_closed(&self) -> bool {
        self.waypoints[0]
            .position
            .abs_diff_eq(self.waypoints[self.last_index()].position, 1e-9)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn right_triangle() -> Track {
        Track::new(vec![
            Waypoint::straight(0.0, 0.0),
            Waypoint::turn(3.0, 4.0),
            Waypoint::straight(3.0, 0.0),
            Waypoint::turn(0.0, 0.0),
        ])
        .unwrap()
    }

    #[test]
    fn test_rejects_short_tracks() {
        assert_eq!(
            Track::new(vec![]),
            Err(InvalidTrackError::TooFewWaypoints { count: 0 })
        );
        assert_eq!(
            Track::new(vec![Waypoint::straight(1.0, 1.0)]),
            Err(InvalidTrackError::TooFewWaypoints { count: 1 })
        );
    }

    #[test]
    fn test_rejects_zero_length_segment() {
        let result = Track::new(vec![
            Waypoint::straight(0.0, 0.0),
            Waypoint::turn(5.0, 5.0),
            Waypoint::turn(5.0, 5.0),
        ]);
        assert_eq!(result, Err(InvalidTrackError::ZeroLengthSegment { index: 2 }));
    }

    #[test]
    fn test_geometry_queries() {
        let track = right_triangle();

        assert_eq!(track.waypoint_count(), 4);
        assert_eq!(track.last_index(), 3);
        assert_eq!(track.distance_between(0), Some(5.0));
        assert_eq!(track.distance_between(1), Some(4.0));
        assert_eq!(track.distance_between(2), Some(3.0));
        assert_eq!(track.distance_between(3), None);

        assert_eq!(track.segment_kind(0), None);
        assert_eq!(track.segment_kind(1), Some(SegmentKind::Turn));
        assert_eq!(track.segment_kind(2), Some(SegmentKind::Straight));
        assert_eq!(track.segment_kind(4), None);

        assert_eq!(track.lap_length(), 12.0);
        assert!(track.is_closed());
    }

    #[test]
    fn test_segments_cover_one_lap() {
        let track = right_triangle();
        let segments: Vec<Segment> = track.segments().collect();

        assert_eq!(segments.len(), 3);
        assert_eq!((segments[0].from, segments[0].to), (0, 1));
        assert_eq!(segments[2].to, track.last_index());
        assert_eq!(segments[0].kind, SegmentKind::Turn);
    }

    #[test]
    fn test_rejects_open_track() {
        let result = Track::new(vec![
            Waypoint::straight(0.0, 0.0),
            Waypoint::turn(10.0, 0.0),
            Waypoint::straight(10.0, 10.0),
        ]);
        assert_eq!(result, Err(InvalidTrackError::OpenCircuit));
    }

    #[test]
    fn test_rejects_non_finite_positions() {
        let with = |x: f64| {
            Track::new(vec![
                Waypoint::straight(0.0, 0.0),
                Waypoint::turn(x, 0.0),
                Waypoint::straight(0.0, 0.0),
            ])
        };

        assert_eq!(with(f64::NAN), Err(InvalidTrackError::NonFinitePosition { index: 1 }));
        assert_eq!(with(f64::INFINITY), Err(InvalidTrackError::NonFinitePosition { index: 1 }));
        assert!(with(1e300).is_ok());
    }

    #[test]
    fn test_rejects_segment_longer_than_f64() {
        let result = Track::new(vec![
            Waypoint::straight(-1e308, 0.0),
            Waypoint::turn(1e308, 0.0),
            Waypoint::straight(-1e308, 0.0),
        ]);
        assert_eq!(result, Err(InvalidTrackError::UnboundedSegment { index: 1 }));
    }

    #[test]
    fn test_load_from_yaml() {
        let document = r#"
waypoints:
  - position: [0.0, 0.0]
    label: Start
  - position: [10.0, 0.0]
    segment_kind: turn
  - position: [0.0, 0.0]
    label: Finish
"#;
        let track = Track::from_yaml_str(document).unwrap();

        assert_eq!(track.waypoint_count(), 3);
        assert_eq!(track.segment_kind(1), Some(SegmentKind::Turn));
        assert_eq!(track.segment_kind(2), Some(SegmentKind::Straight));
        assert_eq!(track.waypoint_at(0).unwrap().label.as_deref(), Some("Start"));
    }

    #[test]
    fn test_yaml_with_single_waypoint_is_invalid() {
        let document = "waypoints:\n  - position: [0.0, 0.0]\n";
        assert!(matches!(
            Track::from_yaml_str(document),
            Err(TrackLoadError::Invalid(InvalidTrackError::TooFewWaypoints { count: 1 }))
        ));
    }

    #[test]
    fn test_missing_file_is_io_error() {
        assert!(matches!(
            Track::load("definitely/not/a/track.yaml"),
            Err(TrackLoadError::Io(_))
        ));
    }
}
