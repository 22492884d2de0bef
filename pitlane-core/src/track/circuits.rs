// Built-in circuits. Coordinates are percentages of the track image the
// display draws underneath, so (0, 0) is its top-left corner.

use super::{SegmentKind, Waypoint};

fn point(x: f64, y: f64, kind: SegmentKind, label: &str) -> Waypoint {
    Waypoint::new(x, y, kind).with_label(label)
}

// The reference circuit: one waypoint per corner.
pub fn coda() -> Vec<Waypoint> {
    use SegmentKind::*;

    vec![
        point(6.0, 50.0, Straight, "Start"),
        point(32.0, 90.0, Turn, "Turn 01"),
        point(32.0, 70.0, Turn, "Turn 02"),
        point(43.0, 59.0, Turn, "Turn 03"),
        point(49.0, 50.0, Turn, "Turn 05"),
        point(54.0, 39.0, Turn, "Turn 06"),
        point(62.0, 44.0, Turn, "Turn 07"),
        point(69.0, 36.0, Turn, "Turn 08"),
        point(72.0, 42.0, Turn, "Turn 09"),
        point(82.0, 39.0, Turn, "Turn 10"),
        point(94.0, 15.0, Turn, "Turn 11"),
        point(38.0, 26.0, Turn, "Turn 12 Apex"),
        point(42.0, 42.0, Turn, "Turn 13 Exit"),
        point(37.0, 41.0, Turn, "Turn 14"),
        point(33.0, 32.0, Turn, "Turn 15"),
        point(35.0, 50.0, Turn, "Turn 16"),
        point(34.0, 54.0, Turn, "Turn 17"),
        point(25.0, 57.0, Turn, "Turn 18"),
        point(18.0, 39.0, Turn, "Turn 19"),
        point(4.0, 47.0, Turn, "Turn 20"),
        point(6.0, 50.0, Straight, "Finish"),
    ]
}

// Same circuit with a short straight after every corner, which gives the
// segment-kind speed model something to tell apart.
pub fn coda_detailed() -> Vec<Waypoint> {
    use SegmentKind::*;

    vec![
        point(6.0, 50.0, Straight, "Start"),
        point(32.0, 90.0, Turn, "Turn 01"),
        point(33.0, 88.0, Straight, "Turn 01 exit"),
        point(32.0, 70.0, Turn, "Turn 02"),
        point(34.0, 70.0, Straight, "Turn 02 exit"),
        point(43.0, 59.0, Turn, "Turn 03"),
        point(44.0, 55.0, Straight, "Turn 04"),
        point(49.0, 50.0, Turn, "Turn 05"),
        point(50.0, 48.0, Straight, "Turn 05 exit"),
        point(54.0, 39.0, Turn, "Turn 06"),
        point(56.0, 39.0, Straight, "Turn 06 exit"),
        point(62.0, 44.0, Turn, "Turn 07"),
        point(64.0, 42.0, Straight, "Turn 07 exit"),
        point(69.0, 36.0, Turn, "Turn 08"),
        point(70.0, 37.0, Straight, "Turn 08 exit"),
        point(72.0, 42.0, Turn, "Turn 09"),
        point(74.0, 42.0, Straight, "Turn 09 exit"),
        point(82.0, 39.0, Turn, "Turn 10"),
        point(84.0, 37.0, Straight, "Turn 10 exit"),
        point(94.0, 15.0, Turn, "Turn 11"),
        point(92.0, 16.0, Straight, "Turn 11 exit"),
        point(38.0, 26.0, Turn, "Turn 12 Apex"),
        point(37.0, 28.0, Straight, "Turn 12 exit"),
        point(42.0, 42.0, Turn, "Turn 13 Exit"),
        point(40.0, 42.0, Straight, "Turn 13 exit"),
        point(37.0, 41.0, Turn, "Turn 14"),
        point(36.0, 39.0, Straight, "Turn 14 exit"),
        point(33.0, 32.0, Turn, "Turn 15"),
        point(32.0, 32.0, Straight, "Turn 15 exit"),
        point(35.0, 50.0, Turn, "Turn 16"),
        point(34.0, 53.0, Straight, "Turn 16 exit"),
        point(34.0, 54.0, Turn, "Turn 17"),
        point(32.0, 56.0, Straight, "Turn 17 exit"),
        point(25.0, 57.0, Turn, "Turn 18"),
        point(23.0, 55.0, Straight, "Turn 18 exit"),
        point(18.0, 39.0, Turn, "Turn 19"),
        point(16.0, 39.0, Straight, "Turn 19 exit"),
        point(4.0, 47.0, Turn, "Turn 20"),
        point(5.0, 49.0, Straight, "Turn 20 exit"),
        point(6.0, 50.0, Straight, "Finish"),
    ]
}
