pub mod agent;
pub mod error;
pub mod events;
pub mod mode;
pub mod progress;
mod settings;
pub mod standings;
pub mod track;

pub use settings::{Settings, SpeedModelKind, GLOBAL_CONFIG};

pub type AgentID = String;
