//! Platform-specific permission implementations
//!
//! This module provides the permission query facade for each platform.

pub mod traits;

#[cfg(target_os = "macos")]
pub mod macos;

#[cfg(not(target_os = "macos"))]
pub mod generic;

pub use traits::{
    system_provider, Capability, PermissionProvider, PermissionStatus, PhotoKitAccessLevel,
    PhotoKitAuthorizationStatus,
};
