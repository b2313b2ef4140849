//! macOS permission provider
//!
//! Uses ApplicationServices, CoreGraphics and IOKit for the system-level
//! permissions, and AVFoundation/Photos through the Objective-C runtime.

pub mod photokit;
pub mod system;

use crate::permissions::traits::{
    Capability, PermissionProvider, PermissionStatus, PhotoKitAccessLevel,
    PhotoKitAuthorizationStatus,
};
use crate::utils::{PermissionError, PermissionResult};
use async_trait::async_trait;

fn status_from_bool(granted: bool) -> PermissionStatus {
    if granted {
        PermissionStatus::Granted
    } else {
        PermissionStatus::Denied
    }
}

fn media_type(capability: Capability) -> &'static str {
    match capability {
        Capability::Camera => system::MEDIA_TYPE_VIDEO,
        _ => system::MEDIA_TYPE_AUDIO,
    }
}

/// Provider backed by the live macOS APIs
#[derive(Default)]
pub struct MacPermissions;

impl MacPermissions {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl PermissionProvider for MacPermissions {
    fn check(&self, capability: Capability) -> PermissionResult<PermissionStatus> {
        match capability {
            Capability::Accessibility => Ok(status_from_bool(system::has_accessibility_permission())),
            Capability::FullDiskAccess => Ok(status_from_bool(system::has_full_disk_access())),
            Capability::ScreenRecording => {
                Ok(status_from_bool(system::has_screen_recording_permission()))
            }
            Capability::Microphone | Capability::Camera => {
                Ok(system::media_authorization_status(media_type(capability)))
            }
            Capability::InputMonitoring => Ok(system::input_monitoring_status()),
        }
    }

    async fn request(&self, capability: Capability) -> PermissionResult<PermissionStatus> {
        tracing::info!("Requesting {:?} permission", capability);

        match capability {
            Capability::Accessibility => {
                system::request_accessibility_permission();
            }
            Capability::FullDiskAccess | Capability::InputMonitoring => {
                system::open_privacy_pane(capability)?;
            }
            Capability::ScreenRecording => {
                system::request_screen_recording_permission();
            }
            Capability::Microphone | Capability::Camera => {
                if self.check(capability)? == PermissionStatus::Unsupported {
                    return Ok(PermissionStatus::Unsupported);
                }
                let rx = system::request_media_access(media_type(capability))?;
                let granted = rx.await.map_err(|_| {
                    PermissionError::RequestFailed(
                        "AVFoundation dropped the completion handler".to_string(),
                    )
                })?;
                tracing::info!("{:?} permission answered: granted={}", capability, granted);
            }
        }

        self.check(capability)
    }

    fn check_photokit(
        &self,
        level: PhotoKitAccessLevel,
    ) -> PermissionResult<PhotoKitAuthorizationStatus> {
        photokit::authorization_status(level)
    }

    async fn request_photokit(
        &self,
        level: PhotoKitAccessLevel,
    ) -> PermissionResult<PhotoKitAuthorizationStatus> {
        tracing::info!("Requesting PhotoKit {:?} access", level);
        let rx = photokit::request_authorization(level)?;
        let status = photokit::await_authorization(rx).await?;
        tracing::info!("PhotoKit {:?} access answered: {:?}", level, status);
        Ok(status)
    }

    fn photokit_available(&self) -> bool {
        photokit::is_available()
    }

    fn photos_count(&self) -> PermissionResult<u64> {
        photokit::photos_count()
    }
}
