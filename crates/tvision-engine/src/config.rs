//! Engine configuration.

use std::time::Duration;

/// Engine configuration.
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// Delay between poll iterations of a generation job
    pub poll_interval: Duration,
    /// Optional cap on poll iterations per attempt (None = poll until the
    /// remote job terminates)
    pub max_polls: Option<u32>,
    /// Status event channel capacity
    pub event_capacity: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            poll_interval: Duration::from_secs(10),
            max_polls: None,
            event_capacity: 64,
        }
    }
}

impl EngineConfig {
    /// Create config from environment variables.
    pub fn from_env() -> Self {
        Self {
            poll_interval: Duration::from_secs(
                std::env::var("TVISION_POLL_INTERVAL_SECS")
                    .ok()
                    .and_then(|s| s.parse().ok())
                    .unwrap_or(10),
            ),
            // 0 (or unset) means poll forever
            max_polls: std::env::var("TVISION_MAX_POLLS")
                .ok()
                .and_then(|s| s.parse::<u32>().ok())
                .filter(|&n| n > 0),
            event_capacity: std::env::var("TVISION_EVENT_CAPACITY")
                .ok()
                .and_then(|s| s.parse::<usize>().ok())
                .filter(|&n| n > 0)
                .unwrap_or(64),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = EngineConfig::default();
        assert_eq!(config.poll_interval, Duration::from_secs(10));
        assert_eq!(config.max_polls, None);
        assert_eq!(config.event_capacity, 64);
    }
}
