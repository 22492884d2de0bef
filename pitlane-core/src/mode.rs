use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::agent::{roster, Agent};
use crate::progress::LapNumber;
use crate::Settings;

#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum SessionMode {
    // the whole field racing each other
    FullRace,
    // a single car doing a short test run
    Practice,
}

impl SessionMode {
    pub fn max_laps(self, settings: &Settings) -> LapNumber {
        match self {
            SessionMode::FullRace => settings.full_race_laps,
            SessionMode::Practice => settings.practice_laps,
        }
    }

    pub fn roster(self, settings: &Settings) -> Vec<Agent> {
        match self {
            SessionMode::FullRace => {
                roster::full_field(Duration::from_millis(settings.start_delay_step_ms))
            }
            SessionMode::Practice => roster::solo(),
        }
    }
}
