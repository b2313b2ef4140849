//! PhotoKit bridge
//!
//! Talks to `PHPhotoLibrary` and `PHAsset` through the Objective-C runtime.
//! The access-level API appeared in macOS 11; on older systems every call
//! fails with `PlatformUnsupported`.

use crate::permissions::traits::{PhotoKitAccessLevel, PhotoKitAuthorizationStatus};
use crate::utils::{PermissionError, PermissionResult};
use block2::RcBlock;
use objc2::rc::autoreleasepool;
use objc2::runtime::{AnyClass, AnyObject};
use objc2::{msg_send, sel};
use parking_lot::Mutex;
use tokio::sync::oneshot;

/// `PHAssetMediaTypeImage`
const ASSET_MEDIA_TYPE_IMAGE: isize = 1;

fn photo_library_class() -> PermissionResult<&'static AnyClass> {
    let class = AnyClass::get("PHPhotoLibrary")
        .ok_or_else(|| PermissionError::PlatformUnsupported("PHPhotoLibrary".to_string()))?;

    if class
        .class_method(sel!(authorizationStatusForAccessLevel:))
        .is_none()
    {
        return Err(PermissionError::PlatformUnsupported(
            "PhotoKit access levels require macOS 11".to_string(),
        ));
    }

    Ok(class)
}

/// Whether the access-level API can be called
pub fn is_available() -> bool {
    photo_library_class().is_ok()
}

fn status_from_raw(raw: isize) -> PermissionResult<PhotoKitAuthorizationStatus> {
    PhotoKitAuthorizationStatus::from_native_value(raw).ok_or_else(|| {
        PermissionError::QueryFailed(format!("unknown PHAuthorizationStatus {raw}"))
    })
}

/// `PHPhotoLibrary authorizationStatusForAccessLevel:`
pub fn authorization_status(
    level: PhotoKitAccessLevel,
) -> PermissionResult<PhotoKitAuthorizationStatus> {
    let class = photo_library_class()?;
    let raw: isize =
        unsafe { msg_send![class, authorizationStatusForAccessLevel: level.to_native_value()] };
    status_from_raw(raw)
}

/// `PHPhotoLibrary requestAuthorizationForAccessLevel:handler:`
///
/// Shows the system dialog when the status is not determined yet; otherwise
/// the handler fires right away with the current status.
pub fn request_authorization(
    level: PhotoKitAccessLevel,
) -> PermissionResult<oneshot::Receiver<isize>> {
    let class = photo_library_class()?;
    let (tx, rx) = oneshot::channel();
    let tx = Mutex::new(Some(tx));

    let handler = RcBlock::new(move |status: isize| {
        if let Some(tx) = tx.lock().take() {
            let _ = tx.send(status);
        }
    });

    unsafe {
        let _: () = msg_send![
            class,
            requestAuthorizationForAccessLevel: level.to_native_value(),
            handler: &*handler
        ];
    }

    Ok(rx)
}

/// Wait for a pending request and decode the status it reported
pub async fn await_authorization(
    rx: oneshot::Receiver<isize>,
) -> PermissionResult<PhotoKitAuthorizationStatus> {
    let raw = rx.await.map_err(|_| {
        PermissionError::RequestFailed("PhotoKit dropped the authorization handler".to_string())
    })?;
    status_from_raw(raw)
}

/// Count image assets in the library
pub fn photos_count() -> PermissionResult<u64> {
    let status = authorization_status(PhotoKitAccessLevel::Read)?;
    if !status.is_authorized() {
        return Err(PermissionError::PermissionDenied(format!(
            "photo library read access is {status:?}"
        )));
    }

    let asset_class = AnyClass::get("PHAsset")
        .ok_or_else(|| PermissionError::PlatformUnsupported("PHAsset".to_string()))?;

    autoreleasepool(|_| {
        let options: *const AnyObject = std::ptr::null();
        let result: *mut AnyObject = unsafe {
            msg_send![
                asset_class,
                fetchAssetsWithMediaType: ASSET_MEDIA_TYPE_IMAGE,
                options: options
            ]
        };
        if result.is_null() {
            return Err(PermissionError::QueryFailed(
                "PHAsset fetch returned nil".to_string(),
            ));
        }

        let count: usize = unsafe { msg_send![result, count] };
        Ok(count as u64)
    })
}
