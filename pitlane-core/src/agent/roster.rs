use std::time::Duration;

use super::Agent;

fn verstappen() -> Agent {
    Agent::new("verstappen", "M. Verstappen", "#0600ef").with_flag("NL")
}

// Five cars, released from the grid one `start_delay_step` apart.
pub fn full_field(start_delay_step: Duration) -> Vec<Agent> {
    vec![
        verstappen(),
        Agent::new("hamilton", "L. Hamilton", "#00d2be").with_flag("GB"),
        Agent::new("leclerc", "C. Leclerc", "#dc0000").with_flag("MC"),
        Agent::new("norris", "L. Norris", "#ff8700").with_flag("GB"),
        Agent::new("sainz", "C. Sainz", "#dc0000").with_flag("ES"),
    ]
    .into_iter()
    .enumerate()
    .map(|(slot, agent)| agent.with_start_delay(start_delay_step * slot as u32))
    .collect()
}

// A lone car for test runs.
pub fn solo() -> Vec<Agent> {
    vec![verstappen()]
}
