use std::collections::HashSet;
use std::time::Duration;

use pitlane_core::agent::Agent;
use pitlane_core::mode::SessionMode;
use pitlane_core::progress::LapNumber;
use pitlane_core::track::{circuits, Track, Waypoint};
use pitlane_core::Settings;

use super::SessionError;
use crate::simulator::SpeedModel;

/// Everything needed to start a session. Nothing here is checked until
/// `SessionController::start`, which refuses to run an invalid plan.
#[derive(Clone, Debug)]
pub struct SessionPlan {
    pub waypoints: Vec<Waypoint>,
    pub agents: Vec<Agent>,
    pub max_laps: LapNumber,
    pub speed_model: SpeedModel,
    pub time_scale: f64,
    pub rng_seed: Option<u64>,
}

impl SessionPlan {
    pub fn for_mode(mode: SessionMode, settings: &Settings) -> Result<Self, SessionError> {
        let waypoints = match &settings.track_file {
            Some(path) => Track::load(path)?.waypoints().to_vec(),
            None => circuits::coda(),
        };

        Ok(Self {
            waypoints,
            agents: mode.roster(settings),
            max_laps: mode.max_laps(settings),
            speed_model: SpeedModel::from_settings(settings),
            time_scale: settings.time_scale,
            rng_seed: settings.rng_seed,
        })
    }

    pub(crate) fn validate(&self) -> Result<Track, SessionError> {
        let track = Track::new(self.waypoints.clone())?;

        if self.max_laps < 1 {
            return Err(SessionError::InvalidLapCount);
        }
        if self.agents.is_empty() {
            return Err(SessionError::EmptyRoster);
        }

        let mut seen = HashSet::new();
        if let Some(duplicate) = self.agents.iter().find(|agent| !seen.insert(&agent.id)) {
            return Err(SessionError::DuplicateAgent(duplicate.id.clone()));
        }

        self.speed_model
            .validate()
            .map_err(SessionError::InvalidSpeedModel)?;
        if !(self.time_scale.is_finite() && self.time_scale >= 0.0) {
            return Err(SessionError::InvalidSpeedModel(
                "time scale must be a non-negative number",
            ));
        }

        if let Some(segment) = track.segments().find(|segment| {
            let secs = self.speed_model.slowest_secs(segment) * self.time_scale;
            Duration::try_from_secs_f64(secs).is_err()
        }) {
            return Err(SessionError::SegmentTooSlow { index: segment.to });
        }

        Ok(track)
    }
}
