//! macOS permission handling
//!
//! Accessibility, Full Disk Access, Screen Recording, Input Monitoring and
//! the AVFoundation capture devices.

use crate::permissions::traits::{Capability, PermissionStatus};
use crate::utils::{PermissionError, PermissionResult};
use block2::RcBlock;
use core_foundation::base::TCFType;
use core_foundation::boolean::CFBoolean;
use core_foundation::dictionary::CFDictionary;
use core_foundation::string::CFString;
use core_graphics::access::ScreenCaptureAccess;
use objc2::msg_send;
use objc2::runtime::{AnyClass, Bool};
use objc2_foundation::NSString;
use parking_lot::Mutex;
use std::ffi::c_void;
use tokio::sync::oneshot;

/// `AVMediaTypeAudio`
pub const MEDIA_TYPE_AUDIO: &str = "soun";
/// `AVMediaTypeVideo`
pub const MEDIA_TYPE_VIDEO: &str = "vide";

/// `kIOHIDRequestTypeListenEvent`
const HID_REQUEST_LISTEN_EVENT: u32 = 1;

/// Directories only readable with Full Disk Access
const FULL_DISK_ACCESS_PROBES: [&str; 2] = ["Library/Containers/com.apple.stocks", "Library/Safari"];

#[link(name = "ApplicationServices", kind = "framework")]
extern "C" {
    fn AXIsProcessTrusted() -> bool;
    fn AXIsProcessTrustedWithOptions(options: *const c_void) -> bool;
    static kAXTrustedCheckOptionPrompt: *const c_void;
}

#[link(name = "IOKit", kind = "framework")]
extern "C" {
    fn IOHIDCheckAccess(request: u32) -> u32;
}

/// Check if accessibility permission is granted
pub fn has_accessibility_permission() -> bool {
    unsafe { AXIsProcessTrusted() }
}

/// Request accessibility permission
///
/// Shows the system prompt pointing the user at System Settings. Returns
/// whether the process is trusted right now, which is almost always `false`
/// on the first call.
pub fn request_accessibility_permission() -> bool {
    unsafe {
        let key = CFString::wrap_under_get_rule(kAXTrustedCheckOptionPrompt as *const _);
        let options = CFDictionary::from_CFType_pairs(&[(key, CFBoolean::true_value())]);
        AXIsProcessTrustedWithOptions(options.as_concrete_TypeRef() as *const c_void)
    }
}

/// Check Full Disk Access by probing directories it protects
pub fn has_full_disk_access() -> bool {
    let Some(home_dir) = dirs::home_dir() else {
        tracing::warn!("No home directory, assuming Full Disk Access is missing");
        return false;
    };

    FULL_DISK_ACCESS_PROBES
        .iter()
        .any(|probe| std::fs::read_dir(home_dir.join(probe)).is_ok())
}

/// Check if screen recording permission is granted
pub fn has_screen_recording_permission() -> bool {
    ScreenCaptureAccess.preflight()
}

/// Request screen recording permission
///
/// The dialog is shown by the system; the return value is the state before
/// the user has answered.
pub fn request_screen_recording_permission() -> bool {
    ScreenCaptureAccess.request()
}

/// Input Monitoring status from IOKit
pub fn input_monitoring_status() -> PermissionStatus {
    match unsafe { IOHIDCheckAccess(HID_REQUEST_LISTEN_EVENT) } {
        0 => PermissionStatus::Granted,
        1 => PermissionStatus::Denied,
        _ => PermissionStatus::NotDetermined,
    }
}

/// Open the System Settings privacy pane for a capability
pub fn open_privacy_pane(capability: Capability) -> PermissionResult<()> {
    let url = format!(
        "x-apple.systempreferences:com.apple.preference.security?{}",
        capability.settings_pane()
    );

    let output = std::process::Command::new("open")
        .arg(&url)
        .output()
        .map_err(|e| PermissionError::RequestFailed(format!("failed to run open: {e}")))?;

    if !output.status.success() {
        tracing::warn!("Failed to open {:?} preferences: {}", capability, output.status);
        return Err(PermissionError::RequestFailed(format!(
            "open {url} exited with {}",
            output.status
        )));
    }

    Ok(())
}

fn capture_device_class() -> PermissionResult<&'static AnyClass> {
    AnyClass::get("AVCaptureDevice")
        .ok_or_else(|| PermissionError::PlatformUnsupported("AVCaptureDevice".to_string()))
}

/// `AVCaptureDevice authorizationStatusForMediaType:`
///
/// `Unsupported` when AVFoundation has no `AVCaptureDevice`.
pub fn media_authorization_status(media_type: &str) -> PermissionStatus {
    let Ok(class) = capture_device_class() else {
        tracing::debug!("AVCaptureDevice unavailable, {} access unsupported", media_type);
        return PermissionStatus::from_capture_authorization(None);
    };

    let media_type = NSString::from_str(media_type);
    let raw: isize = unsafe { msg_send![class, authorizationStatusForMediaType: &*media_type] };
    if !(0..=3).contains(&raw) {
        tracing::warn!("Unknown AVAuthorizationStatus {}", raw);
    }

    PermissionStatus::from_capture_authorization(Some(raw))
}

/// `AVCaptureDevice requestAccessForMediaType:completionHandler:`
///
/// The returned receiver resolves with the user's answer. The block is
/// released before this returns so the caller can await on any thread.
pub fn request_media_access(media_type: &str) -> PermissionResult<oneshot::Receiver<bool>> {
    let class = capture_device_class()?;
    let (tx, rx) = oneshot::channel();
    let tx = Mutex::new(Some(tx));

    let handler = RcBlock::new(move |granted: Bool| {
        if let Some(tx) = tx.lock().take() {
            let _ = tx.send(granted.as_bool());
        }
    });

    let media_type = NSString::from_str(media_type);
    unsafe {
        let _: () = msg_send![
            class,
            requestAccessForMediaType: &*media_type,
            completionHandler: &*handler
        ];
    }

    Ok(rx)
}
