mod access_control_test;
mod user_cache_test;
mod workflow_history_test;
