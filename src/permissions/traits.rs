//! Permission trait definitions
//!
//! Platform-agnostic types for capabilities and their authorization states,
//! plus the provider trait each platform implements.

use crate::utils::PermissionResult;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// A privacy-guarded capability outside of PhotoKit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Capability {
    Accessibility,
    FullDiskAccess,
    ScreenRecording,
    Microphone,
    Camera,
    InputMonitoring,
}

impl Capability {
    /// All capabilities, in display order
    pub const ALL: [Capability; 6] = [
        Capability::Accessibility,
        Capability::FullDiskAccess,
        Capability::ScreenRecording,
        Capability::Microphone,
        Capability::Camera,
        Capability::InputMonitoring,
    ];

    /// Anchor of the System Settings privacy pane for this capability
    pub fn settings_pane(self) -> &'static str {
        match self {
            Capability::Accessibility => "Privacy_Accessibility",
            Capability::FullDiskAccess => "Privacy_AllFiles",
            Capability::ScreenRecording => "Privacy_ScreenCapture",
            Capability::Microphone => "Privacy_Microphone",
            Capability::Camera => "Privacy_Camera",
            Capability::InputMonitoring => "Privacy_ListenEvent",
        }
    }

    /// Whether `request` waits for the user instead of returning right away
    pub fn has_blocking_prompt(self) -> bool {
        matches!(self, Capability::Microphone | Capability::Camera)
    }
}

/// Authorization state of a [`Capability`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum PermissionStatus {
    /// The user has granted access
    Granted,
    /// The user has denied access
    Denied,
    /// The user has not been asked yet
    NotDetermined,
    /// Access is blocked by policy (parental controls, MDM)
    Restricted,
    /// The running OS has no API for this capability
    Unsupported,
}

impl PermissionStatus {
    pub fn is_granted(self) -> bool {
        self == PermissionStatus::Granted
    }

    /// Status from an `AVAuthorizationStatus` value, `None` when the capture
    /// API is missing on this OS.
    ///
    /// Values newer than this crate read as `NotDetermined`.
    pub fn from_capture_authorization(raw: Option<isize>) -> Self {
        match raw {
            None => PermissionStatus::Unsupported,
            Some(1) => PermissionStatus::Restricted,
            Some(2) => PermissionStatus::Denied,
            Some(3) => PermissionStatus::Granted,
            Some(_) => PermissionStatus::NotDetermined,
        }
    }
}

/// PhotoKit access level
///
/// Each level is a separate authorization domain; a process can hold a
/// different status for each one at the same time. Native values follow
/// `PHAccessLevel`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum PhotoKitAccessLevel {
    /// Read photos and videos without modifying them
    Read,
    /// Read, modify and delete photos and videos
    ReadWrite,
    /// Add new assets without seeing existing ones
    AddOnly,
}

impl PhotoKitAccessLevel {
    /// All access levels
    pub const ALL: [PhotoKitAccessLevel; 3] = [
        PhotoKitAccessLevel::Read,
        PhotoKitAccessLevel::ReadWrite,
        PhotoKitAccessLevel::AddOnly,
    ];

    /// `PHAccessLevel` value
    pub fn to_native_value(self) -> isize {
        match self {
            PhotoKitAccessLevel::Read => 1,
            PhotoKitAccessLevel::ReadWrite => 2,
            PhotoKitAccessLevel::AddOnly => 3,
        }
    }

    pub fn from_native_value(value: isize) -> Option<Self> {
        match value {
            1 => Some(PhotoKitAccessLevel::Read),
            2 => Some(PhotoKitAccessLevel::ReadWrite),
            3 => Some(PhotoKitAccessLevel::AddOnly),
            _ => None,
        }
    }
}

/// PhotoKit authorization status, matching `PHAuthorizationStatus`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum PhotoKitAuthorizationStatus {
    NotDetermined,
    Restricted,
    Denied,
    Authorized,
    /// The user picked a subset of the library
    Limited,
}

impl PhotoKitAuthorizationStatus {
    /// `PHAuthorizationStatus` value
    pub fn to_native_value(self) -> isize {
        match self {
            PhotoKitAuthorizationStatus::NotDetermined => 0,
            PhotoKitAuthorizationStatus::Restricted => 1,
            PhotoKitAuthorizationStatus::Denied => 2,
            PhotoKitAuthorizationStatus::Authorized => 3,
            PhotoKitAuthorizationStatus::Limited => 4,
        }
    }

    pub fn from_native_value(value: isize) -> Option<Self> {
        match value {
            0 => Some(PhotoKitAuthorizationStatus::NotDetermined),
            1 => Some(PhotoKitAuthorizationStatus::Restricted),
            2 => Some(PhotoKitAuthorizationStatus::Denied),
            3 => Some(PhotoKitAuthorizationStatus::Authorized),
            4 => Some(PhotoKitAuthorizationStatus::Limited),
            _ => None,
        }
    }

    /// Full or limited access both count as authorized
    pub fn is_authorized(self) -> bool {
        matches!(
            self,
            PhotoKitAuthorizationStatus::Authorized | PhotoKitAuthorizationStatus::Limited
        )
    }
}

/// Source of live permission state
///
/// Implementations never cache: every call reflects the OS state at the time
/// of the call. `request` and `request_photokit` may wait for the user to
/// answer a system dialog, so callers must not hold locks across them.
#[async_trait]
pub trait PermissionProvider: Send + Sync {
    /// Current status of a capability. Never prompts.
    fn check(&self, capability: Capability) -> PermissionResult<PermissionStatus>;

    /// Ask for a capability.
    ///
    /// Microphone and Camera resolve once the user answers. The other
    /// capabilities open a dialog or System Settings and return the status
    /// as it is right after that; callers poll `check` afterwards.
    async fn request(&self, capability: Capability) -> PermissionResult<PermissionStatus>;

    /// Current PhotoKit status for an access level. Never prompts.
    fn check_photokit(
        &self,
        level: PhotoKitAccessLevel,
    ) -> PermissionResult<PhotoKitAuthorizationStatus>;

    /// Ask for PhotoKit access, resolving once the user answers
    async fn request_photokit(
        &self,
        level: PhotoKitAccessLevel,
    ) -> PermissionResult<PhotoKitAuthorizationStatus>;

    /// Whether the access-level PhotoKit API exists on this OS
    fn photokit_available(&self) -> bool;

    /// Number of image assets in the photo library
    fn photos_count(&self) -> PermissionResult<u64>;
}

/// Provider backed by the running platform's APIs
pub fn system_provider() -> Arc<dyn PermissionProvider> {
    #[cfg(target_os = "macos")]
    {
        Arc::new(super::macos::MacPermissions::new())
    }

    #[cfg(not(target_os = "macos"))]
    {
        Arc::new(super::generic::GenericPermissions)
    }
}
