//! PhotoKit commands
//!
//! Status checks and requests per access level, listener management, and
//! the library photo count.

use super::PermissionsState;
use crate::listener::ListenerRecord;
use crate::permissions::{PhotoKitAccessLevel, PhotoKitAuthorizationStatus};
use crate::utils::{ErrorResponse, PermissionError};
use tauri::State;

/// Check PhotoKit permission for an access level.
///
/// Read failures are reported as `notDetermined`.
#[tauri::command]
pub async fn check_photokit_permission(
    state: State<'_, PermissionsState>,
    access_level: PhotoKitAccessLevel,
) -> Result<PhotoKitAuthorizationStatus, ErrorResponse> {
    Ok(state.photokit_status(access_level))
}

/// Request PhotoKit permission, showing the system dialog if needed
#[tauri::command]
pub async fn request_photokit_permission(
    state: State<'_, PermissionsState>,
    access_level: PhotoKitAccessLevel,
) -> Result<PhotoKitAuthorizationStatus, ErrorResponse> {
    // Only the provider is touched here; the registry lock is never held
    // while the dialog is up
    let provider = state.provider.clone();
    Ok(provider.request_photokit(access_level).await?)
}

/// Register a listener; `photokit-permission-changed` fires when the
/// level's status changes
#[tauri::command]
pub async fn register_photokit_permission_listener(
    state: State<'_, PermissionsState>,
    access_level: PhotoKitAccessLevel,
) -> Result<String, ErrorResponse> {
    Ok(state.registry.register(access_level)?)
}

/// Unregister a listener by id
#[tauri::command]
pub async fn unregister_photokit_permission_listener(
    state: State<'_, PermissionsState>,
    listener_id: String,
) -> Result<(), ErrorResponse> {
    Ok(state.registry.unregister(&listener_id)?)
}

/// All registered listeners, oldest first
#[tauri::command]
pub async fn get_photokit_permission_listeners(
    state: State<'_, PermissionsState>,
) -> Result<Vec<ListenerRecord>, ErrorResponse> {
    Ok(state.registry.list())
}

/// Number of photos in the library; needs read access
#[tauri::command]
pub async fn get_photos_count(state: State<'_, PermissionsState>) -> Result<u64, ErrorResponse> {
    let provider = state.provider.clone();

    let count = tauri::async_runtime::spawn_blocking(move || provider.photos_count())
        .await
        .map_err(|e| PermissionError::QueryFailed(format!("photo count task failed: {e}")))??;

    Ok(count)
}
