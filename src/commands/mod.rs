//! Tauri command handlers
//!
//! This module contains all the IPC command handlers that can be called
//! from the frontend via Tauri's invoke system. Every command is async so
//! Tauri runs it on its async runtime instead of the main thread.

pub mod photokit;
pub mod system;

use crate::listener::ListenerRegistry;
use crate::permissions::{
    Capability, PermissionProvider, PhotoKitAccessLevel, PhotoKitAuthorizationStatus,
};
use std::sync::Arc;

/// Plugin state shared by every command
pub struct PermissionsState {
    pub provider: Arc<dyn PermissionProvider>,
    pub registry: Arc<ListenerRegistry>,
}

impl PermissionsState {
    pub fn new(provider: Arc<dyn PermissionProvider>, registry: Arc<ListenerRegistry>) -> Self {
        Self { provider, registry }
    }

    /// Whether `capability` is granted; query errors count as not granted
    pub fn is_granted(&self, capability: Capability) -> bool {
        match self.provider.check(capability) {
            Ok(status) => status.is_granted(),
            Err(e) => {
                tracing::warn!("Failed to check {:?} permission: {}", capability, e);
                false
            }
        }
    }

    /// PhotoKit status for `level`; query errors read as `NotDetermined`
    pub fn photokit_status(&self, level: PhotoKitAccessLevel) -> PhotoKitAuthorizationStatus {
        self.provider.check_photokit(level).unwrap_or_else(|e| {
            tracing::warn!("Failed to check PhotoKit {:?} status: {}", level, e);
            PhotoKitAuthorizationStatus::NotDetermined
        })
    }
}
