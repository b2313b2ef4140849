//! Listener records and change events
//!
//! Plain data carried between the registry, the observers and the frontend.

use crate::permissions::{PhotoKitAccessLevel, PhotoKitAuthorizationStatus};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Event name the frontend listens on
pub const PHOTOKIT_PERMISSION_CHANGED: &str = "photokit-permission-changed";

/// One registered intent to observe an access level
///
/// Field names stay snake_case to match the `ListenerInfo` interface of the
/// JavaScript API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListenerRecord {
    /// Process-unique listener id
    pub id: String,

    /// Access level being observed
    pub access_level: PhotoKitAccessLevel,

    /// Unix timestamp (seconds) of registration
    pub created_at: u64,

    /// Always `true` for records handed out by the registry
    pub active: bool,
}

impl ListenerRecord {
    /// Create a fresh record registered now
    pub fn new(access_level: PhotoKitAccessLevel) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            access_level,
            created_at: Utc::now().timestamp().max(0) as u64,
            active: true,
        }
    }
}

/// Payload of [`PHOTOKIT_PERMISSION_CHANGED`]
///
/// Scoped to an access level, not to a listener: every listener on the level
/// shares the one event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PermissionStatusChangeEvent {
    pub new_status: PhotoKitAuthorizationStatus,
    pub access_level: PhotoKitAccessLevel,
    /// Unix timestamp (milliseconds) of the status read
    pub timestamp: u64,
}

impl PermissionStatusChangeEvent {
    pub fn new(new_status: PhotoKitAuthorizationStatus, access_level: PhotoKitAccessLevel) -> Self {
        Self {
            new_status,
            access_level,
            timestamp: Utc::now().timestamp_millis().max(0) as u64,
        }
    }
}

/// Queued by an observer when it sees the level's status move
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChangeNotice {
    pub access_level: PhotoKitAccessLevel,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_creation() {
        let record = ListenerRecord::new(PhotoKitAccessLevel::Read);

        assert!(Uuid::parse_str(&record.id).is_ok());
        assert_eq!(record.access_level, PhotoKitAccessLevel::Read);
        assert!(record.active);
        assert!(record.created_at > 0);
    }

    #[test]
    fn test_record_ids_differ() {
        let a = ListenerRecord::new(PhotoKitAccessLevel::AddOnly);
        let b = ListenerRecord::new(PhotoKitAccessLevel::AddOnly);
        assert_ne!(a.id, b.id);
    }

    #[test]
    fn test_record_json_matches_frontend_interface() {
        let record = ListenerRecord::new(PhotoKitAccessLevel::ReadWrite);
        let json = serde_json::to_value(&record).unwrap();

        assert_eq!(json["access_level"], "readWrite");
        assert_eq!(json["active"], true);
        assert!(json["created_at"].is_u64());
        assert!(json["id"].is_string());
    }

    #[test]
    fn test_change_event_payload() {
        let event = PermissionStatusChangeEvent::new(
            PhotoKitAuthorizationStatus::Limited,
            PhotoKitAccessLevel::Read,
        );
        assert!(event.timestamp > 0);

        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["new_status"], "limited");
        assert_eq!(json["access_level"], "read");
    }
}
