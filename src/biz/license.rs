use std::collections::HashSet;

use crate::config::config::LicenseSetting;

/// License feature that hands workflow versioning over to licensed history.
pub const WORKFLOW_HISTORY_FEATURE: &str = "feat:workflowHistory";

#[cfg_attr(test, mockall::automock)]
pub trait LicenseState: Send + Sync {
  fn is_licensed(&self, feature: &str) -> bool;

  fn is_workflow_history_licensed(&self) -> bool {
    self.is_licensed(WORKFLOW_HISTORY_FEATURE)
  }
}

/// License state backed by the feature list in the configuration.
#[derive(Debug, Clone, Default)]
pub struct ConfigLicenseState {
  features: HashSet<String>,
}

impl ConfigLicenseState {
  pub fn new(setting: &LicenseSetting) -> Self {
    Self {
      features: setting.features.iter().cloned().collect(),
    }
  }
}

impl LicenseState for ConfigLicenseState {
  fn is_licensed(&self, feature: &str) -> bool {
    self.features.contains(feature)
  }
}
