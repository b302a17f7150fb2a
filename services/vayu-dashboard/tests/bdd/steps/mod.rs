//! BDD step definitions for the dashboard client

pub mod aggregation_steps;
pub mod control_steps;
