//! tauri-plugin-macos-permissions - macOS privacy permissions for Tauri apps.
//!
//! Checks and requests Accessibility, Full Disk Access, Screen Recording,
//! Microphone, Camera, Input Monitoring and PhotoKit access from the
//! frontend, and emits `photokit-permission-changed` events while PhotoKit
//! listeners are registered.

pub mod commands;
pub mod config;
pub mod listener;
pub mod permissions;
pub mod utils;

use commands::PermissionsState;
use config::PluginConfig;
use listener::{ChangeDispatcher, ListenerRegistry, PollingObserverFactory, TauriEventSink};
use std::sync::Arc;
use tauri::plugin::{Builder, TauriPlugin};
use tauri::{Manager, RunEvent, Runtime};
use tokio::sync::mpsc;

pub use listener::{ListenerRecord, PermissionStatusChangeEvent, PHOTOKIT_PERMISSION_CHANGED};
pub use permissions::{
    Capability, PermissionProvider, PermissionStatus, PhotoKitAccessLevel,
    PhotoKitAuthorizationStatus,
};
pub use utils::{ErrorResponse, PermissionError, PermissionResult};

/// Initialize the plugin
pub fn init<R: Runtime>() -> TauriPlugin<R, Option<PluginConfig>> {
    Builder::<R, Option<PluginConfig>>::new("macos-permissions")
        .invoke_handler(tauri::generate_handler![
            // System commands
            commands::system::check_accessibility_permission,
            commands::system::request_accessibility_permission,
            commands::system::check_full_disk_access_permission,
            commands::system::request_full_disk_access_permission,
            commands::system::check_screen_recording_permission,
            commands::system::request_screen_recording_permission,
            commands::system::check_microphone_permission,
            commands::system::request_microphone_permission,
            commands::system::check_camera_permission,
            commands::system::request_camera_permission,
            commands::system::check_input_monitoring_permission,
            commands::system::request_input_monitoring_permission,
            commands::system::check_permission,
            commands::system::request_permission,
            // PhotoKit commands
            commands::photokit::check_photokit_permission,
            commands::photokit::request_photokit_permission,
            commands::photokit::register_photokit_permission_listener,
            commands::photokit::unregister_photokit_permission_listener,
            commands::photokit::get_photokit_permission_listeners,
            commands::photokit::get_photos_count,
        ])
        .setup(|app, api| {
            let config = api.config().clone().unwrap_or_default();
            let provider = permissions::system_provider();

            let (notice_tx, notice_rx) = mpsc::channel(config.queue_capacity());
            let factory = Arc::new(PollingObserverFactory::new(
                provider.clone(),
                config.poll_interval(),
                tauri::async_runtime::handle().inner().clone(),
            ));
            let registry = Arc::new(ListenerRegistry::new(factory, notice_tx));

            let sink = Arc::new(TauriEventSink::new(app.clone(), config.event_target.clone()));
            let dispatcher = ChangeDispatcher::new(&registry, provider.clone(), sink, notice_rx);
            tauri::async_runtime::spawn(dispatcher.run());

            app.manage(PermissionsState::new(provider, registry));

            tracing::info!(
                "macos-permissions plugin ready (poll interval {}ms, event target {:?})",
                config.poll_interval().as_millis(),
                config.event_target
            );
            Ok(())
        })
        .on_event(|app, event| {
            if let RunEvent::Exit = event {
                if let Some(state) = app.try_state::<PermissionsState>() {
                    state.registry.clear();
                }
            }
        })
        .build()
}
