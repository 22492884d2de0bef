use config::{Config, ConfigError, Environment, File};
use lazy_static::lazy_static;
use serde::Deserialize;

use crate::mode::SessionMode;
use crate::progress::LapNumber;

#[derive(Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum SpeedModelKind {
    // segment time = length / (base speed * random factor)
    Distance,
    // segment time drawn from a per-kind range, ignoring geometry
    SegmentKind,
}

#[derive(Deserialize, Clone, Debug)]
pub struct Settings {
    pub speed_model: SpeedModelKind,
    pub base_speed: f64,
    pub min_speed_factor: f64,
    pub max_speed_factor: f64,
    pub straight_min_secs: f64,
    pub straight_max_secs: f64,
    pub turn_min_secs: f64,
    pub turn_max_secs: f64,
    // wall-clock seconds per simulated second
    pub time_scale: f64,
    pub full_race_laps: LapNumber,
    pub practice_laps: LapNumber,
    pub start_delay_step_ms: u64,
    #[serde(default)]
    pub rng_seed: Option<u64>,
    #[serde(default)]
    pub track_file: Option<String>,
    pub default_mode: SessionMode,
    pub event_buffer: usize,
}

impl Settings {
    pub fn new() -> Result<Settings, ConfigError> {
        let config = Config::builder()
            .set_default("speed_model", "distance")?
            .set_default("base_speed", 25.0)?
            .set_default("min_speed_factor", 0.7)?
            .set_default("max_speed_factor", 1.3)?
            .set_default("straight_min_secs", 0.6)?
            .set_default("straight_max_secs", 1.5)?
            .set_default("turn_min_secs", 0.7)?
            .set_default("turn_max_secs", 1.5)?
            .set_default("time_scale", 1.0)?
            .set_default("full_race_laps", 50)?
            .set_default("practice_laps", 3)?
            .set_default("start_delay_step_ms", 300)?
            .set_default("default_mode", "full_race")?
            .set_default("event_buffer", 1024)?
            .add_source(File::with_name("config.yaml").required(false))
            .add_source(Environment::with_prefix("PITLANE"))
            .build()?;

        config.try_deserialize()
    }
}

lazy_static! {
    pub static ref GLOBAL_CONFIG: Settings = Settings::new().expect("failed to read config file");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let settings = Settings::new().unwrap();

        assert_eq!(settings.speed_model, SpeedModelKind::Distance);
        assert!(settings.min_speed_factor <= settings.max_speed_factor);
        assert_eq!(settings.full_race_laps, 50);
        assert_eq!(settings.practice_laps, 3);
        assert_eq!(settings.default_mode, SessionMode::FullRace);
        assert_eq!(settings.rng_seed, None);
    }

    #[test]
    fn test_modes_read_settings() {
        let settings = Settings::new().unwrap();

        assert_eq!(SessionMode::Practice.max_laps(&settings), settings.practice_laps);
        assert_eq!(SessionMode::Practice.roster(&settings).len(), 1);
        assert_eq!(SessionMode::FullRace.roster(&settings).len(), 5);
    }
}
