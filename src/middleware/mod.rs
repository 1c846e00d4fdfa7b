pub mod metrics_mw;
pub mod request_id;
