pub mod metrics;
pub mod workflow;
pub mod workflow_version;
