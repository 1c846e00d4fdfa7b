pub fn get_env_var(key: &str, default: &str) -> String {
  std::env::var(key).unwrap_or_else(|e| {
    tracing::debug!(
      "failed to read environment variable:{}:{}, using default value: {}",
      e,
      key,
      default
    );
    default.to_owned()
  })
}

/// Optionally get an environment variable.
/// if value is empty, return None.
pub fn get_env_var_opt(key: &str) -> Option<String> {
  match std::env::var(key) {
    Ok(val) => {
      if val.is_empty() {
        None
      } else {
        Some(val)
      }
    },
    Err(e) => {
      tracing::debug!("failed to read environment variable: {}:{}, None set", e, key);
      None
    },
  }
}

/// Reads a comma separated environment variable. Blank entries are dropped and
/// every entry is trimmed.
pub fn get_env_var_list(key: &str) -> Vec<String> {
  get_env_var_opt(key)
    .map(|val| split_list(&val))
    .unwrap_or_default()
}

fn split_list(value: &str) -> Vec<String> {
  value
    .split(',')
    .map(str::trim)
    .filter(|item| !item.is_empty())
    .map(ToOwned::to_owned)
    .collect()
}
