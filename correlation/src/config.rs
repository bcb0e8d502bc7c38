//! Engine configuration.

use std::time::Duration;

/// Default time a request waits for its reply.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(5);

/// Highest request id the wire can carry.
pub const MAX_REQUEST_ID: u8 = u8::MAX;

/// Settings for a correlation [`Engine`](crate::Engine).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EngineConfig {
    /// Deadline used when a request does not name its own.
    pub default_timeout: Duration,
    /// Ids are handed out from `1..=max_request_id` per reply type tag.
    pub max_request_id: u8,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            default_timeout: DEFAULT_TIMEOUT,
            max_request_id: MAX_REQUEST_ID,
        }
    }
}

impl EngineConfig {
    /// Short deadline for tests.
    #[must_use]
    pub const fn for_testing() -> Self {
        Self {
            default_timeout: Duration::from_millis(50),
            max_request_id: MAX_REQUEST_ID,
        }
    }

    #[must_use]
    pub const fn with_max_request_id(mut self, max_request_id: u8) -> Self {
        self.max_request_id = max_request_id;
        self
    }

    #[must_use]
    pub const fn with_default_timeout(mut self, timeout: Duration) -> Self {
        self.default_timeout = timeout;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_covers_every_wire_id() {
        let config = EngineConfig::default();
        assert_eq!(config.max_request_id, 255);
        assert_eq!(config.default_timeout, Duration::from_secs(5));
    }

    #[test]
    fn builders() {
        let config = EngineConfig::for_testing().with_max_request_id(2);
        assert_eq!(config.max_request_id, 2);
        assert_eq!(config.default_timeout, Duration::from_millis(50));
        let config = config.with_default_timeout(Duration::from_secs(1));
        assert_eq!(config.default_timeout, Duration::from_secs(1));
    }
}
