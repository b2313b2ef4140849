//! Change dispatch
//!
//! Drains the notices queued by observers and turns each one into a single
//! `photokit-permission-changed` event. Running this off the observer's
//! callback thread keeps OS callbacks from ever waiting on the registry lock.

use super::registry::ListenerRegistry;
use super::state::{ChangeNotice, PermissionStatusChangeEvent, PHOTOKIT_PERMISSION_CHANGED};
use crate::permissions::PermissionProvider;
use crate::utils::{PermissionError, PermissionResult};
use std::sync::{Arc, Weak};
use tauri::{AppHandle, Emitter, Runtime};
use tokio::sync::mpsc;

/// Where change events are delivered
pub trait EventSink: Send + Sync {
    fn emit(&self, event: &PermissionStatusChangeEvent) -> PermissionResult<()>;
}

/// Emits change events to the app's webviews
pub struct TauriEventSink<R: Runtime> {
    app: AppHandle<R>,
    /// Webview label to target; `None` broadcasts to every webview
    target: Option<String>,
}

impl<R: Runtime> TauriEventSink<R> {
    pub fn new(app: AppHandle<R>, target: Option<String>) -> Self {
        Self { app, target }
    }
}

impl<R: Runtime> EventSink for TauriEventSink<R> {
    fn emit(&self, event: &PermissionStatusChangeEvent) -> PermissionResult<()> {
        let result = match &self.target {
            Some(label) => self
                .app
                .emit_to(label.as_str(), PHOTOKIT_PERMISSION_CHANGED, event.clone()),
            None => self.app.emit(PHOTOKIT_PERMISSION_CHANGED, event.clone()),
        };
        result.map_err(|e| PermissionError::EventEmitFailed(e.to_string()))
    }
}

/// Consumer side of the observer notice queue
///
/// Holds the registry weakly: once the registry is gone its observers and
/// their senders go with it, and `run` returns.
pub struct ChangeDispatcher {
    registry: Weak<ListenerRegistry>,
    provider: Arc<dyn PermissionProvider>,
    sink: Arc<dyn EventSink>,
    notices: mpsc::Receiver<ChangeNotice>,
}

impl ChangeDispatcher {
    pub fn new(
        registry: &Arc<ListenerRegistry>,
        provider: Arc<dyn PermissionProvider>,
        sink: Arc<dyn EventSink>,
        notices: mpsc::Receiver<ChangeNotice>,
    ) -> Self {
        Self {
            registry: Arc::downgrade(registry),
            provider,
            sink,
            notices,
        }
    }

    /// Handle notices until every sender is gone
    pub async fn run(mut self) {
        tracing::debug!("PhotoKit change dispatcher started");
        while let Some(notice) = self.notices.recv().await {
            self.handle(notice);
        }
        tracing::debug!("PhotoKit change dispatcher stopped");
    }

    /// Handle whatever is queued right now without waiting; returns the
    /// number of events emitted
    pub fn drain_pending(&mut self) -> usize {
        let mut emitted = 0;
        while let Ok(notice) = self.notices.try_recv() {
            if self.handle(notice).is_some() {
                emitted += 1;
            }
        }
        emitted
    }

    /// Re-read the level's status and emit one event for it.
    ///
    /// A notice for a level nobody listens on any more (the last listener
    /// left while the notice was queued) is dropped. The dispatcher never
    /// starts or stops observers.
    pub fn handle(&self, notice: ChangeNotice) -> Option<PermissionStatusChangeEvent> {
        let level = notice.access_level;
        let listening = self
            .registry
            .upgrade()
            .is_some_and(|registry| registry.has_listeners(level));
        if !listening {
            tracing::debug!("Dropping {:?} change notice, no listeners left", level);
            return None;
        }

        let status = match self.provider.check_photokit(level) {
            Ok(status) => status,
            Err(e) => {
                tracing::warn!("Failed to read PhotoKit {:?} status: {}", level, e);
                return None;
            }
        };

        let event = PermissionStatusChangeEvent::new(status, level);
        tracing::debug!("PhotoKit {:?} status is now {:?}", level, status);
        if let Err(e) = self.sink.emit(&event) {
            tracing::warn!("Failed to emit {}: {}", PHOTOKIT_PERMISSION_CHANGED, e);
            return None;
        }

        Some(event)
    }
}
