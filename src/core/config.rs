/// Engine configuration, loaded from RON.

use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;
use thiserror::Error;

use crate::core::backstory::{DistributionError, SiblingDistribution, SiblingWeight};
use crate::core::outcome::RecordPolicy;
use crate::core::retry::RetryPolicy;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("RON deserialization error: {0}")]
    Ron(#[from] ron::error::SpannedError),
    #[error("sibling distribution: {0}")]
    Siblings(#[from] DistributionError),
}

/// Tunables for a [`LifeSimEngine`](crate::core::pipeline::LifeSimEngine).
///
/// Every field may be omitted from the RON file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub max_attempts: u32,
    pub attempt_timeout_ms: Option<u64>,
    pub record_policy: RecordPolicy,
    pub sibling_weights: Vec<SiblingWeight>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            max_attempts: RetryPolicy::DEFAULT_MAX_ATTEMPTS,
            attempt_timeout_ms: None,
            record_policy: RecordPolicy::default(),
            sibling_weights: SiblingDistribution::DEFAULT_WEIGHTS.to_vec(),
        }
    }
}

impl EngineConfig {
    pub fn load_from_ron(path: &Path) -> Result<EngineConfig, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::parse_ron(&contents)
    }

    pub fn parse_ron(input: &str) -> Result<EngineConfig, ConfigError> {
        Ok(ron::from_str(input)?)
    }

    pub fn retry_policy(&self) -> RetryPolicy {
        let policy = RetryPolicy::new(self.max_attempts);
        match self.attempt_timeout_ms {
            Some(ms) => policy.with_timeout(Duration::from_millis(ms)),
            None => policy,
        }
    }

    pub fn sibling_distribution(&self) -> Result<SiblingDistribution, ConfigError> {
        Ok(SiblingDistribution::new(self.sibling_weights.clone())?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_ron_gives_defaults() {
        let config = EngineConfig::parse_ron("()").unwrap();
        assert_eq!(config, EngineConfig::default());
        assert_eq!(config.retry_policy(), RetryPolicy::default());
    }

    #[test]
    fn parses_all_fields() {
        let config = EngineConfig::parse_ron(
            r#"(
                max_attempts: 5,
                attempt_timeout_ms: Some(30000),
                record_policy: RejectResponse,
                sibling_weights: [(count: 0, weight: 1), (count: 2, weight: 3)],
            )"#,
        )
        .unwrap();
        assert_eq!(config.max_attempts, 5);
        assert_eq!(config.record_policy, RecordPolicy::RejectResponse);
        let policy = config.retry_policy();
        assert_eq!(policy.max_attempts, 5);
        assert_eq!(policy.attempt_timeout, Some(Duration::from_secs(30)));
        let dist = config.sibling_distribution().unwrap();
        assert_eq!(dist.entries().len(), 2);
    }

    #[test]
    fn rejects_bad_ron() {
        assert!(matches!(
            EngineConfig::parse_ron("(max_attempts: \"three\")"),
            Err(ConfigError::Ron(_))
        ));
    }

    #[test]
    fn zero_weights_fail_distribution() {
        let config = EngineConfig::parse_ron("(sibling_weights: [(count: 1, weight: 0)])").unwrap();
        assert!(matches!(
            config.sibling_distribution(),
            Err(ConfigError::Siblings(_))
        ));
    }

    #[test]
    fn shipped_config_loads() {
        let path = std::path::PathBuf::from("data/engine.ron");
        let config = EngineConfig::load_from_ron(&path).unwrap();
        assert_eq!(config.max_attempts, 3);
        assert!(config.sibling_distribution().is_ok());
    }
}
