//! Test doubles for the listener subsystem

use super::dispatch::EventSink;
use super::observer::{ChangeNotifier, ObserverFactory, ObserverHandle};
use super::state::PermissionStatusChangeEvent;
use crate::permissions::{
    Capability, PermissionProvider, PermissionStatus, PhotoKitAccessLevel,
    PhotoKitAuthorizationStatus,
};
use crate::utils::{PermissionError, PermissionResult};
use async_trait::async_trait;
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;

/// Install a test subscriber once so `tracing` output shows up on failure
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter("tauri_plugin_macos_permissions=debug")
        .with_test_writer()
        .try_init();
}

/// Provider with settable PhotoKit state
pub struct MockProvider {
    photokit: Mutex<HashMap<PhotoKitAccessLevel, PhotoKitAuthorizationStatus>>,
    statuses: Mutex<HashMap<Capability, PermissionStatus>>,
    photokit_reads: AtomicUsize,
    available: AtomicBool,
    failing: AtomicBool,
}

impl Default for MockProvider {
    fn default() -> Self {
        Self {
            photokit: Mutex::new(HashMap::new()),
            statuses: Mutex::new(HashMap::new()),
            photokit_reads: AtomicUsize::new(0),
            available: AtomicBool::new(true),
            failing: AtomicBool::new(false),
        }
    }
}

impl MockProvider {
    pub fn set_photokit_status(
        &self,
        level: PhotoKitAccessLevel,
        status: PhotoKitAuthorizationStatus,
    ) {
        self.photokit.lock().insert(level, status);
    }

    pub fn set_photokit_available(&self, available: bool) {
        self.available.store(available, Ordering::SeqCst);
    }

    pub fn set_status(&self, capability: Capability, status: PermissionStatus) {
        self.statuses.lock().insert(capability, status);
    }

    /// PhotoKit status reads so far
    pub fn photokit_reads(&self) -> usize {
        self.photokit_reads.load(Ordering::SeqCst)
    }

    /// Make every status read fail
    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }
}

#[async_trait]
impl PermissionProvider for MockProvider {
    fn check(&self, capability: Capability) -> PermissionResult<PermissionStatus> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(PermissionError::QueryFailed("mock failure".to_string()));
        }
        Ok(self
            .statuses
            .lock()
            .get(&capability)
            .copied()
            .unwrap_or(PermissionStatus::NotDetermined))
    }

    async fn request(&self, _capability: Capability) -> PermissionResult<PermissionStatus> {
        Ok(PermissionStatus::Granted)
    }

    fn check_photokit(
        &self,
        level: PhotoKitAccessLevel,
    ) -> PermissionResult<PhotoKitAuthorizationStatus> {
        self.photokit_reads.fetch_add(1, Ordering::SeqCst);
        if self.failing.load(Ordering::SeqCst) {
            return Err(PermissionError::QueryFailed("mock failure".to_string()));
        }
        Ok(self
            .photokit
            .lock()
            .get(&level)
            .copied()
            .unwrap_or(PhotoKitAuthorizationStatus::NotDetermined))
    }

    async fn request_photokit(
        &self,
        level: PhotoKitAccessLevel,
    ) -> PermissionResult<PhotoKitAuthorizationStatus> {
        self.set_photokit_status(level, PhotoKitAuthorizationStatus::Authorized);
        Ok(PhotoKitAuthorizationStatus::Authorized)
    }

    fn photokit_available(&self) -> bool {
        self.available.load(Ordering::SeqCst)
    }

    fn photos_count(&self) -> PermissionResult<u64> {
        Ok(0)
    }
}

/// Factory that tracks live observers and keeps their notifiers around so
/// tests can fire changes by hand
#[derive(Default)]
pub struct MockObserverFactory {
    live: Arc<Mutex<HashMap<PhotoKitAccessLevel, usize>>>,
    started: AtomicUsize,
    notifiers: Mutex<HashMap<PhotoKitAccessLevel, ChangeNotifier>>,
    refuse: Mutex<Option<PermissionError>>,
}

impl MockObserverFactory {
    /// Live observers for a level right now
    pub fn live(&self, level: PhotoKitAccessLevel) -> usize {
        self.live.lock().get(&level).copied().unwrap_or(0)
    }

    /// Observers started over the factory's lifetime
    pub fn started(&self) -> usize {
        self.started.load(Ordering::SeqCst)
    }

    /// Fail every following `start` with `error`
    pub fn refuse_with(&self, error: PermissionError) {
        *self.refuse.lock() = Some(error);
    }

    /// Fire the OS callback of the most recent observer for `level`,
    /// even if that observer has been torn down since
    pub fn fire(&self, level: PhotoKitAccessLevel) -> bool {
        self.notifiers
            .lock()
            .get(&level)
            .map(|notifier| notifier.notify())
            .unwrap_or(false)
    }
}

impl ObserverFactory for MockObserverFactory {
    fn start(
        &self,
        level: PhotoKitAccessLevel,
        notifier: ChangeNotifier,
    ) -> PermissionResult<ObserverHandle> {
        if let Some(error) = self.refuse.lock().clone() {
            return Err(error);
        }

        self.started.fetch_add(1, Ordering::SeqCst);
        *self.live.lock().entry(level).or_insert(0) += 1;
        self.notifiers.lock().insert(level, notifier);

        let live = self.live.clone();
        Ok(ObserverHandle::new(level, move || {
            if let Some(count) = live.lock().get_mut(&level) {
                *count -= 1;
            }
        }))
    }
}

/// Sink that records every emitted event
#[derive(Default)]
pub struct RecordingSink {
    events: Mutex<Vec<PermissionStatusChangeEvent>>,
    fail: AtomicBool,
}

impl RecordingSink {
    pub fn events(&self) -> Vec<PermissionStatusChangeEvent> {
        self.events.lock().clone()
    }

    pub fn set_failing(&self, fail: bool) {
        self.fail.store(fail, Ordering::SeqCst);
    }
}

impl EventSink for RecordingSink {
    fn emit(&self, event: &PermissionStatusChangeEvent) -> PermissionResult<()> {
        if self.fail.load(Ordering::SeqCst) {
            return Err(PermissionError::EventEmitFailed("mock sink".to_string()));
        }
        self.events.lock().push(event.clone());
        Ok(())
    }
}
