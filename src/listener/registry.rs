//! PhotoKit listener registry
//!
//! Owns every listener record and one observer per observed access level.
//! All bookkeeping happens under a single lock; the OS observers never touch
//! it directly, they only push notices into the dispatch queue.

use super::observer::{ChangeNotifier, ObserverFactory, ObserverHandle};
use super::state::{ChangeNotice, ListenerRecord};
use crate::permissions::PhotoKitAccessLevel;
use crate::utils::{PermissionError, PermissionResult};
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::mpsc;

#[derive(Default)]
struct RegistryInner {
    /// Records in registration order
    records: Vec<ListenerRecord>,

    /// Exactly one entry per level with at least one record
    observers: HashMap<PhotoKitAccessLevel, ObserverHandle>,
}

impl RegistryInner {
    fn count_for(&self, level: PhotoKitAccessLevel) -> usize {
        self.records
            .iter()
            .filter(|record| record.access_level == level)
            .count()
    }
}

/// Process-wide registry of PhotoKit permission listeners
pub struct ListenerRegistry {
    inner: Mutex<RegistryInner>,
    factory: Arc<dyn ObserverFactory>,
    notices: mpsc::Sender<ChangeNotice>,
}

impl ListenerRegistry {
    /// Create an empty registry whose observers feed `notices`
    pub fn new(factory: Arc<dyn ObserverFactory>, notices: mpsc::Sender<ChangeNotice>) -> Self {
        Self {
            inner: Mutex::new(RegistryInner::default()),
            factory,
            notices,
        }
    }

    /// Register a listener for `level` and return its id.
    ///
    /// Starts the level's observer if this is its first listener. If the
    /// observer cannot be created nothing is recorded.
    pub fn register(&self, level: PhotoKitAccessLevel) -> PermissionResult<String> {
        let mut inner = self.inner.lock();

        if !inner.observers.contains_key(&level) {
            let notifier = ChangeNotifier::new(level, self.notices.clone());
            let handle = self.factory.start(level, notifier).map_err(|e| {
                tracing::warn!("Failed to start PhotoKit observer for {:?}: {}", level, e);
                e
            })?;
            inner.observers.insert(level, handle);
            tracing::info!("Started PhotoKit observer for {:?}", level);
        }

        let record = ListenerRecord::new(level);
        let id = record.id.clone();
        inner.records.push(record);

        tracing::info!(
            "Registered PhotoKit listener {} for {:?} ({} on level)",
            id,
            level,
            inner.count_for(level)
        );
        Ok(id)
    }

    /// Remove a listener, stopping its level's observer if it was the last.
    pub fn unregister(&self, listener_id: &str) -> PermissionResult<()> {
        let mut inner = self.inner.lock();

        let index = inner
            .records
            .iter()
            .position(|record| record.id == listener_id)
            .ok_or_else(|| PermissionError::NotFound(listener_id.to_string()))?;
        let record = inner.records.remove(index);
        let level = record.access_level;

        if inner.count_for(level) == 0 {
            // Dropping the handle stops the observer
            inner.observers.remove(&level);
            tracing::info!("Stopped PhotoKit observer for {:?}", level);
        }

        tracing::info!("Unregistered PhotoKit listener {}", listener_id);
        Ok(())
    }

    /// Snapshot of all listeners in registration order
    pub fn list(&self) -> Vec<ListenerRecord> {
        self.inner.lock().records.clone()
    }

    /// Remove every listener and stop every observer; returns how many
    /// listeners were removed
    pub fn clear(&self) -> usize {
        let mut inner = self.inner.lock();
        let removed = inner.records.len();
        inner.records.clear();
        inner.observers.clear();

        if removed > 0 {
            tracing::info!("Cleared {} PhotoKit listeners", removed);
        }
        removed
    }

    /// Number of listeners on `level`
    pub fn listener_count(&self, level: PhotoKitAccessLevel) -> usize {
        self.inner.lock().count_for(level)
    }

    /// Whether anyone still listens on `level`
    pub fn has_listeners(&self, level: PhotoKitAccessLevel) -> bool {
        self.listener_count(level) > 0
    }

    /// Whether an observer is live for `level`
    pub fn is_observing(&self, level: PhotoKitAccessLevel) -> bool {
        self.inner.lock().observers.contains_key(&level)
    }

    /// Number of live observers across all levels
    pub fn observer_count(&self) -> usize {
        self.inner.lock().observers.len()
    }
}
