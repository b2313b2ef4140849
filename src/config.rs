//! Plugin configuration
//!
//! Read from the `plugins.macos-permissions` section of `tauri.conf.json`:
//!
//! ```json
//! {
//!   "plugins": {
//!     "macos-permissions": {
//!       "pollIntervalMs": 500,
//!       "eventTarget": "main",
//!       "dispatchQueueCapacity": 64
//!     }
//!   }
//! }
//! ```

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Lower bound for the PhotoKit polling interval
pub const MIN_POLL_INTERVAL_MS: u64 = 100;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PluginConfig {
    /// How often observers re-read PhotoKit status
    pub poll_interval_ms: u64,

    /// Webview label that receives change events; all webviews when unset
    pub event_target: Option<String>,

    /// Change notices buffered between observers and the dispatcher
    pub dispatch_queue_capacity: usize,
}

impl Default for PluginConfig {
    fn default() -> Self {
        Self {
            poll_interval_ms: 1000,
            event_target: None,
            dispatch_queue_capacity: 64,
        }
    }
}

impl PluginConfig {
    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms.max(MIN_POLL_INTERVAL_MS))
    }

    /// `tokio::sync::mpsc::channel` panics on zero capacity
    pub fn queue_capacity(&self) -> usize {
        self.dispatch_queue_capacity.max(1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_when_section_is_empty() {
        let config: PluginConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(config, PluginConfig::default());
        assert_eq!(config.poll_interval(), Duration::from_secs(1));
        assert_eq!(config.event_target, None);
    }

    #[test]
    fn test_camel_case_fields() {
        let config: PluginConfig = serde_json::from_str(
            r#"{"pollIntervalMs": 250, "eventTarget": "main", "dispatchQueueCapacity": 8}"#,
        )
        .unwrap();
        assert_eq!(config.poll_interval(), Duration::from_millis(250));
        assert_eq!(config.event_target.as_deref(), Some("main"));
        assert_eq!(config.queue_capacity(), 8);
    }

    #[test]
    fn test_limits_are_clamped() {
        let config = PluginConfig {
            poll_interval_ms: 5,
            event_target: None,
            dispatch_queue_capacity: 0,
        };
        assert_eq!(
            config.poll_interval(),
            Duration::from_millis(MIN_POLL_INTERVAL_MS)
        );
        assert_eq!(config.queue_capacity(), 1);
    }
}
