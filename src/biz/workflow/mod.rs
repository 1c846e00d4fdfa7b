pub mod controller;
pub mod finder;
pub mod history_store;
pub mod metrics;
pub mod ops;
pub mod version_ce;
