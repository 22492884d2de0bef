pub mod aggregator;
pub mod ranking;
pub mod session;
pub mod simulator;
