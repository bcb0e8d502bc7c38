//! Connection configuration.

use correlation::EngineConfig;
use wire::Limits;

/// Default number of packets a slow listener may fall behind by.
pub const DEFAULT_LISTENER_CAPACITY: usize = 256;

/// Settings for a [`Connection`](crate::Connection).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ConnectionConfig {
    /// Framing and decoding limits for both directions.
    pub limits: Limits,
    pub engine: EngineConfig,
    /// Answer the host's keep-alive automatically.
    pub keep_alive: bool,
    /// Packets buffered per listener before it starts lagging.
    pub listener_capacity: usize,
}

impl Default for ConnectionConfig {
    fn default() -> Self {
        Self {
            limits: Limits::default(),
            engine: EngineConfig::default(),
            keep_alive: true,
            listener_capacity: DEFAULT_LISTENER_CAPACITY,
        }
    }
}

impl ConnectionConfig {
    #[must_use]
    pub fn for_testing() -> Self {
        Self {
            limits: Limits::for_testing(),
            engine: EngineConfig::for_testing(),
            keep_alive: true,
            listener_capacity: 16,
        }
    }

    /// Use the large-packet size byte encoding.
    #[must_use]
    pub fn with_large_packets(mut self) -> Self {
        self.limits = Limits::large_packets().with_padding(self.limits.padding);
        self
    }

    #[must_use]
    pub const fn without_keep_alive(mut self) -> Self {
        self.keep_alive = false;
        self
    }
}
