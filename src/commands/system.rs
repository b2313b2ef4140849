//! System permission commands
//!
//! One check/request pair per capability, plus generic variants taking the
//! capability as an argument. The per-capability checks answer with a `bool`
//! so the frontend can gate features directly.

use super::PermissionsState;
use crate::permissions::{Capability, PermissionStatus};
use crate::utils::ErrorResponse;
use tauri::State;

async fn request(state: &PermissionsState, capability: Capability) -> Result<(), ErrorResponse> {
    let status = state.provider.request(capability).await?;
    tracing::debug!("{:?} permission after request: {:?}", capability, status);
    Ok(())
}

/// Check if accessibility permission is granted
#[tauri::command]
pub async fn check_accessibility_permission(
    state: State<'_, PermissionsState>,
) -> Result<bool, ErrorResponse> {
    Ok(state.is_granted(Capability::Accessibility))
}

/// Show the accessibility prompt
#[tauri::command]
pub async fn request_accessibility_permission(
    state: State<'_, PermissionsState>,
) -> Result<(), ErrorResponse> {
    request(&state, Capability::Accessibility).await
}

/// Check if full disk access is granted
#[tauri::command]
pub async fn check_full_disk_access_permission(
    state: State<'_, PermissionsState>,
) -> Result<bool, ErrorResponse> {
    Ok(state.is_granted(Capability::FullDiskAccess))
}

/// Open the Full Disk Access pane in System Settings
#[tauri::command]
pub async fn request_full_disk_access_permission(
    state: State<'_, PermissionsState>,
) -> Result<(), ErrorResponse> {
    request(&state, Capability::FullDiskAccess).await
}

/// Check if screen recording permission is granted
#[tauri::command]
pub async fn check_screen_recording_permission(
    state: State<'_, PermissionsState>,
) -> Result<bool, ErrorResponse> {
    Ok(state.is_granted(Capability::ScreenRecording))
}

/// Request screen recording permission
#[tauri::command]
pub async fn request_screen_recording_permission(
    state: State<'_, PermissionsState>,
) -> Result<(), ErrorResponse> {
    request(&state, Capability::ScreenRecording).await
}

/// Check if microphone permission is granted
#[tauri::command]
pub async fn check_microphone_permission(
    state: State<'_, PermissionsState>,
) -> Result<bool, ErrorResponse> {
    Ok(state.is_granted(Capability::Microphone))
}

/// Request microphone permission; resolves once the user answers
#[tauri::command]
pub async fn request_microphone_permission(
    state: State<'_, PermissionsState>,
) -> Result<(), ErrorResponse> {
    request(&state, Capability::Microphone).await
}

/// Check if camera permission is granted
#[tauri::command]
pub async fn check_camera_permission(
    state: State<'_, PermissionsState>,
) -> Result<bool, ErrorResponse> {
    Ok(state.is_granted(Capability::Camera))
}

/// Request camera permission; resolves once the user answers
#[tauri::command]
pub async fn request_camera_permission(
    state: State<'_, PermissionsState>,
) -> Result<(), ErrorResponse> {
    request(&state, Capability::Camera).await
}

/// Check if input monitoring permission is granted
#[tauri::command]
pub async fn check_input_monitoring_permission(
    state: State<'_, PermissionsState>,
) -> Result<bool, ErrorResponse> {
    Ok(state.is_granted(Capability::InputMonitoring))
}

/// Open the Input Monitoring pane in System Settings
#[tauri::command]
pub async fn request_input_monitoring_permission(
    state: State<'_, PermissionsState>,
) -> Result<(), ErrorResponse> {
    request(&state, Capability::InputMonitoring).await
}

/// Detailed status of any capability
#[tauri::command]
pub async fn check_permission(
    state: State<'_, PermissionsState>,
    capability: Capability,
) -> Result<PermissionStatus, ErrorResponse> {
    Ok(state.provider.check(capability)?)
}

/// Request any capability and return its status afterwards
#[tauri::command]
pub async fn request_permission(
    state: State<'_, PermissionsState>,
    capability: Capability,
) -> Result<PermissionStatus, ErrorResponse> {
    Ok(state.provider.request(capability).await?)
}
