pub mod act;
pub mod metrics;
pub mod pg;
pub mod workflow;
