pub mod project;
pub mod user;
pub mod workflow;
pub mod workflow_history;
