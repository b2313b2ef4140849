//! Non-macOS permission provider
//!
//! Other platforms have no equivalent privacy gates, so every capability
//! reports as granted and requests return immediately.

use super::traits::{
    Capability, PermissionProvider, PermissionStatus, PhotoKitAccessLevel,
    PhotoKitAuthorizationStatus,
};
use crate::utils::PermissionResult;
use async_trait::async_trait;

pub struct GenericPermissions;

#[async_trait]
impl PermissionProvider for GenericPermissions {
    fn check(&self, _capability: Capability) -> PermissionResult<PermissionStatus> {
        Ok(PermissionStatus::Granted)
    }

    async fn request(&self, capability: Capability) -> PermissionResult<PermissionStatus> {
        tracing::debug!("{:?} needs no permission on this platform", capability);
        Ok(PermissionStatus::Granted)
    }

    fn check_photokit(
        &self,
        _level: PhotoKitAccessLevel,
    ) -> PermissionResult<PhotoKitAuthorizationStatus> {
        Ok(PhotoKitAuthorizationStatus::Authorized)
    }

    async fn request_photokit(
        &self,
        _level: PhotoKitAccessLevel,
    ) -> PermissionResult<PhotoKitAuthorizationStatus> {
        Ok(PhotoKitAuthorizationStatus::Authorized)
    }

    fn photokit_available(&self) -> bool {
        true
    }

    fn photos_count(&self) -> PermissionResult<u64> {
        Ok(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_everything_is_granted() {
        let provider = GenericPermissions;
        for capability in Capability::ALL {
            assert_eq!(provider.check(capability), Ok(PermissionStatus::Granted));
            assert_eq!(
                provider.request(capability).await,
                Ok(PermissionStatus::Granted)
            );
        }
        for level in PhotoKitAccessLevel::ALL {
            assert!(provider.check_photokit(level).unwrap().is_authorized());
        }
        assert_eq!(provider.photos_count(), Ok(0));
    }
}
