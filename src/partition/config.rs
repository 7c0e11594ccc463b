//! Partition solver configuration.

use serde::{Deserialize, Serialize};

use crate::error::{Result, TsptwError};

/// Configuration for [`PartitionSolver`](super::PartitionSolver).
///
/// # Examples
///
/// ```
/// use u_tsptw::partition::PartitionConfig;
///
/// let config = PartitionConfig::default()
///     .with_p(20)
///     .with_max_split_attempts(500)
///     .with_return_to_start(true);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PartitionConfig {
    /// Largest node set solved directly without further splitting.
    pub p: usize,

    /// Pivot draws tried on one set before solving it directly.
    pub max_split_attempts: usize,

    /// Clock value at the start node.
    pub start_time: i64,

    /// Add the travel time from the last visit back to the start node.
    pub return_to_start: bool,
}

impl Default for PartitionConfig {
    fn default() -> Self {
        Self {
            p: 30,
            max_split_attempts: 10,
            start_time: 0,
            return_to_start: false,
        }
    }
}

impl PartitionConfig {
    pub fn with_p(mut self, p: usize) -> Self {
        self.p = p;
        self
    }

    pub fn with_max_split_attempts(mut self, n: usize) -> Self {
        self.max_split_attempts = n;
        self
    }

    pub fn with_start_time(mut self, t: i64) -> Self {
        self.start_time = t;
        self
    }

    pub fn with_return_to_start(mut self, enabled: bool) -> Self {
        self.return_to_start = enabled;
        self
    }

    /// Validates the configuration.
    pub fn validate(&self) -> Result<()> {
        if self.p == 0 {
            return Err(TsptwError::InvalidConfig("p must be at least 1".into()));
        }
        if self.max_split_attempts == 0 {
            return Err(TsptwError::InvalidConfig(
                "max_split_attempts must be at least 1".into(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        let c = PartitionConfig::default();
        assert_eq!(c.p, 30);
        assert_eq!(c.max_split_attempts, 10);
        assert!(!c.return_to_start);
        assert!(c.validate().is_ok());
    }

    #[test]
    fn test_rejects_zero_p() {
        let err = PartitionConfig::default().with_p(0).validate().unwrap_err();
        assert!(matches!(err, TsptwError::InvalidConfig(_)));
    }

    #[test]
    fn test_rejects_zero_attempts() {
        assert!(PartitionConfig::default()
            .with_max_split_attempts(0)
            .validate()
            .is_err());
    }

    #[test]
    fn test_serde_roundtrip() {
        let c = PartitionConfig::default().with_p(12).with_start_time(40);
        let json = serde_json::to_string(&c).expect("serialize");
        let back: PartitionConfig = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(back, c);
    }
}
