pub mod authentication;
pub mod license;
pub mod workflow;
