use pitlane_core::track::{Segment, SegmentKind};
use pitlane_core::{Settings, SpeedModelKind};
use rand::Rng;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DurationRange {
    pub min_secs: f64,
    pub max_secs: f64,
}

impl DurationRange {
    pub fn new(min_secs: f64, max_secs: f64) -> Self {
        Self { min_secs, max_secs }
    }

    fn is_valid(&self) -> bool {
        self.min_secs.is_finite()
            && self.max_secs.is_finite()
            && 0.0 <= self.min_secs
            && self.min_secs <= self.max_secs
    }
}

// How long a segment takes, in simulated seconds. One model is picked per
// session; the two are never mixed.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum SpeedModel {
    Distance {
        base_speed: f64,
        min_factor: f64,
        max_factor: f64,
    },
    SegmentKind {
        straight: DurationRange,
        turn: DurationRange,
    },
}

impl SpeedModel {
    pub fn from_settings(settings: &Settings) -> Self {
        match settings.speed_model {
            SpeedModelKind::Distance => SpeedModel::Distance {
                base_speed: settings.base_speed,
                min_factor: settings.min_speed_factor,
                max_factor: settings.max_speed_factor,
            },
            SpeedModelKind::SegmentKind => SpeedModel::SegmentKind {
                straight: DurationRange::new(settings.straight_min_secs, settings.straight_max_secs),
                turn: DurationRange::new(settings.turn_min_secs, settings.turn_max_secs),
            },
        }
    }

    pub fn validate(&self) -> Result<(), &'static str> {
        match *self {
            SpeedModel::Distance {
                base_speed,
                min_factor,
                max_factor,
            } => {
                if !(base_speed.is_finite() && base_speed > 0.0) {
                    return Err("base speed must be a positive number");
                }
                if !(min_factor.is_finite() && max_factor.is_finite()) {
                    return Err("speed factors must be finite");
                }
                if !(0.0 < min_factor && min_factor <= max_factor) {
                    return Err("speed factors must satisfy 0 < min <= max");
                }
                Ok(())
            }
            SpeedModel::SegmentKind { straight, turn } => {
                if !straight.is_valid() || !turn.is_valid() {
                    return Err("segment duration ranges must satisfy 0 <= min <= max");
                }
                Ok(())
            }
        }
    }

    // Upper bound of `segment_secs` for this segment.
    pub fn slowest_secs(&self, segment: &Segment) -> f64 {
        match *self {
            SpeedModel::Distance {
                base_speed,
                min_factor,
                ..
            } => segment.length / (base_speed * min_factor),
            SpeedModel::SegmentKind { straight, turn } => match segment.kind {
                SegmentKind::Straight => straight.max_secs,
                SegmentKind::Turn => turn.max_secs,
            },
        }
    }

    // A fresh draw for every traversal, so the same segment varies lap to lap.
    pub fn segment_secs<R: Rng + ?Sized>(&self, segment: &Segment, rng: &mut R) -> f64 {
        match *self {
            SpeedModel::Distance {
                base_speed,
                min_factor,
                max_factor,
            } => {
                let factor = rng.gen_range(min_factor..=max_factor);
                segment.length / (base_speed * factor)
            }
            SpeedModel::SegmentKind { straight, turn } => {
                let range = match segment.kind {
                    SegmentKind::Straight => straight,
                    SegmentKind::Turn => turn,
                };
                rng.gen_range(range.min_secs..=range.max_secs)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    use super::*;

    fn segment(length: f64, kind: SegmentKind) -> Segment {
        Segment {
            from: 0,
            to: 1,
            length,
            kind,
        }
    }

    #[test]
    fn test_distance_model_scales_with_length() {
        let model = SpeedModel::Distance {
            base_speed: 10.0,
            min_factor: 0.5,
            max_factor: 2.0,
        };
        let mut rng = StdRng::seed_from_u64(7);

        for _ in 0..100 {
            let secs = model.segment_secs(&segment(20.0, SegmentKind::Turn), &mut rng);
            assert!((1.0..=4.0).contains(&secs), "{} out of range", secs);
        }
    }

    #[test]
    fn test_fixed_factor_is_deterministic() {
        let model = SpeedModel::Distance {
            base_speed: 4.0,
            min_factor: 1.0,
            max_factor: 1.0,
        };
        let mut rng = StdRng::seed_from_u64(0);
        assert_eq!(model.segment_secs(&segment(10.0, SegmentKind::Straight), &mut rng), 2.5);
    }

    #[test]
    fn test_segment_kind_model_ignores_length() {
        let model = SpeedModel::SegmentKind {
            straight: DurationRange::new(0.5, 0.5),
            turn: DurationRange::new(2.0, 3.0),
        };
        let mut rng = StdRng::seed_from_u64(1);

        assert_eq!(model.segment_secs(&segment(1000.0, SegmentKind::Straight), &mut rng), 0.5);
        for _ in 0..100 {
            let secs = model.segment_secs(&segment(0.1, SegmentKind::Turn), &mut rng);
            assert!((2.0..=3.0).contains(&secs));
        }
    }

    #[test]
    fn test_slowest_bounds_every_draw() {
        let model = SpeedModel::Distance {
            base_speed: 10.0,
            min_factor: 0.5,
            max_factor: 2.0,
        };
        let mut rng = StdRng::seed_from_u64(11);
        let long = segment(30.0, SegmentKind::Straight);

        assert_eq!(model.slowest_secs(&long), 6.0);
        for _ in 0..100 {
            assert!(model.segment_secs(&long, &mut rng) <= model.slowest_secs(&long));
        }

        let kinds = SpeedModel::SegmentKind {
            straight: DurationRange::new(0.5, 1.0),
            turn: DurationRange::new(2.0, 3.0),
        };
        assert_eq!(kinds.slowest_secs(&segment(1.0, SegmentKind::Turn)), 3.0);
    }

    #[test]
    fn test_validation() {
        let distance = |base_speed, min_factor, max_factor| SpeedModel::Distance {
            base_speed,
            min_factor,
            max_factor,
        };
        assert!(distance(25.0, 0.7, 1.3).validate().is_ok());
        assert!(distance(0.0, 0.7, 1.3).validate().is_err());
        assert!(distance(25.0, 0.0, 1.3).validate().is_err());
        assert!(distance(25.0, 1.3, 0.7).validate().is_err());
        assert!(distance(f64::NAN, 0.7, 1.3).validate().is_err());

        let kinds = |min, max| SpeedModel::SegmentKind {
            straight: DurationRange::new(0.6, 1.5),
            turn: DurationRange::new(min, max),
        };
        assert!(kinds(0.0, 0.0).validate().is_ok());
        assert!(kinds(2.0, 1.0).validate().is_err());
        assert!(kinds(-1.0, 1.0).validate().is_err());
    }
}
