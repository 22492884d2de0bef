use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::AgentID;

pub mod roster;

// Static description of one competitor; everything the display needs to draw
// it, plus how long it waits on the grid before setting off.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Agent {
    pub id: AgentID,
    pub display_name: String,
    pub display_color: String,
    #[serde(default)]
    pub flag: Option<String>,
    #[serde(default, with = "serde_millis")]
    pub start_delay: Duration,
}

impl Agent {
    pub fn new(id: &str, display_name: &str, display_color: &str) -> Self {
        Self {
            id: id.to_string(),
            display_name: display_name.to_string(),
            display_color: display_color.to_string(),
            flag: None,
            start_delay: Duration::ZERO,
        }
    }

    pub fn with_flag(mut self, flag: &str) -> Self {
        self.flag = Some(flag.to_string());
        self
    }

    pub fn with_start_delay(mut self, start_delay: Duration) -> Self {
        self.start_delay = start_delay;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_optional_fields_default() {
        let agent: Agent = serde_yaml::from_str(
            "id: norris\ndisplay_name: L. Norris\ndisplay_color: \"#ff8700\"\n",
        )
        .unwrap();

        assert_eq!(agent.flag, None);
        assert_eq!(agent.start_delay, Duration::ZERO);
    }

    #[test]
    fn test_start_delay_is_milliseconds() {
        let agent: Agent = serde_yaml::from_str(
            "id: sainz\ndisplay_name: C. Sainz\ndisplay_color: \"#dc0000\"\nstart_delay: 1200\n",
        )
        .unwrap();

        assert_eq!(agent.start_delay, Duration::from_millis(1200));
    }
}
