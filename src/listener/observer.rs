//! PhotoKit status observers
//!
//! An observer watches one access level and pushes a [`ChangeNotice`] into
//! the dispatch queue whenever the status moves. The registry owns exactly
//! one [`ObserverHandle`] per observed level; dropping the handle stops the
//! observer.

use super::state::ChangeNotice;
use crate::permissions::{PermissionProvider, PhotoKitAccessLevel};
use crate::utils::{PermissionError, PermissionResult};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc::{self, error::TrySendError};
use tokio::time::MissedTickBehavior;

/// Callback side of the dispatch queue, bound to one access level
///
/// Safe to call from any thread. Never blocks: when the queue is full the
/// notice is dropped, which is fine because delivery is best-effort and a
/// queued notice for the level already triggers a fresh status read.
#[derive(Clone)]
pub struct ChangeNotifier {
    level: PhotoKitAccessLevel,
    tx: mpsc::Sender<ChangeNotice>,
}

impl ChangeNotifier {
    pub fn new(level: PhotoKitAccessLevel, tx: mpsc::Sender<ChangeNotice>) -> Self {
        Self { level, tx }
    }

    pub fn level(&self) -> PhotoKitAccessLevel {
        self.level
    }

    /// Queue a notice, returning whether it was accepted
    pub fn notify(&self) -> bool {
        match self.tx.try_send(ChangeNotice {
            access_level: self.level,
        }) {
            Ok(()) => true,
            Err(TrySendError::Full(_)) => {
                tracing::warn!("Dispatch queue full, dropping {:?} change notice", self.level);
                false
            }
            Err(TrySendError::Closed(_)) => {
                tracing::debug!("Dispatch queue closed, dropping {:?} change notice", self.level);
                false
            }
        }
    }

    /// Whether the dispatcher has gone away
    pub fn is_closed(&self) -> bool {
        self.tx.is_closed()
    }
}

/// Live OS observer for one access level; stops when dropped
pub struct ObserverHandle {
    level: PhotoKitAccessLevel,
    stop: Option<Box<dyn FnOnce() + Send>>,
}

impl ObserverHandle {
    pub fn new(level: PhotoKitAccessLevel, stop: impl FnOnce() + Send + 'static) -> Self {
        Self {
            level,
            stop: Some(Box::new(stop)),
        }
    }

    pub fn level(&self) -> PhotoKitAccessLevel {
        self.level
    }
}

impl Drop for ObserverHandle {
    fn drop(&mut self) {
        if let Some(stop) = self.stop.take() {
            stop();
            tracing::debug!("Stopped PhotoKit observer for {:?}", self.level);
        }
    }
}

/// Creates OS observers for the registry
pub trait ObserverFactory: Send + Sync {
    /// Start observing `level`, reporting changes through `notifier`.
    ///
    /// Fails with `PlatformUnsupported` when the OS cannot observe PhotoKit
    /// at all, or `ObserverCreationFailed` when it refuses this observer.
    fn start(
        &self,
        level: PhotoKitAccessLevel,
        notifier: ChangeNotifier,
    ) -> PermissionResult<ObserverHandle>;
}

/// Observer that re-reads the level's status on a fixed interval
///
/// PhotoKit posts no notification for authorization changes, so polling the
/// status is the only reliable signal.
pub struct PollingObserverFactory {
    provider: Arc<dyn PermissionProvider>,
    interval: Duration,
    runtime: tokio::runtime::Handle,
}

impl PollingObserverFactory {
    pub fn new(
        provider: Arc<dyn PermissionProvider>,
        interval: Duration,
        runtime: tokio::runtime::Handle,
    ) -> Self {
        Self {
            provider,
            interval,
            runtime,
        }
    }
}

impl ObserverFactory for PollingObserverFactory {
    fn start(
        &self,
        level: PhotoKitAccessLevel,
        notifier: ChangeNotifier,
    ) -> PermissionResult<ObserverHandle> {
        if !self.provider.photokit_available() {
            return Err(PermissionError::PlatformUnsupported(
                "PhotoKit access levels are not available".to_string(),
            ));
        }

        let initial = self
            .provider
            .check_photokit(level)
            .map_err(|e| PermissionError::ObserverCreationFailed(e.to_string()))?;

        let provider = self.provider.clone();
        let interval = self.interval;
        let task = self.runtime.spawn(async move {
            let mut last = initial;
            let mut ticker = tokio::time::interval(interval);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
            // The first tick completes immediately
            ticker.tick().await;

            loop {
                ticker.tick().await;
                if notifier.is_closed() {
                    tracing::debug!("Dispatch queue closed, stopping {:?} polling", level);
                    break;
                }

                let status = match provider.check_photokit(level) {
                    Ok(status) => status,
                    Err(e) => {
                        tracing::warn!("Failed to poll PhotoKit {:?} status: {}", level, e);
                        continue;
                    }
                };
                if status == last {
                    continue;
                }

                tracing::debug!("PhotoKit {:?} status changed: {:?} -> {:?}", level, last, status);
                last = status;
                notifier.notify();
            }
        });

        tracing::info!(
            "Polling PhotoKit {:?} status every {}ms",
            level,
            interval.as_millis()
        );
        Ok(ObserverHandle::new(level, move || task.abort()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::listener::test_support::MockProvider;
    use crate::permissions::PhotoKitAuthorizationStatus;

    #[test]
    fn test_notifier_drops_when_full() {
        let (tx, mut rx) = mpsc::channel(1);
        let notifier = ChangeNotifier::new(PhotoKitAccessLevel::Read, tx);

        assert!(notifier.notify());
        assert!(!notifier.notify());
        assert_eq!(
            rx.try_recv().unwrap(),
            ChangeNotice {
                access_level: PhotoKitAccessLevel::Read
            }
        );
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn test_notifier_reports_closed_queue() {
        let (tx, rx) = mpsc::channel(4);
        let notifier = ChangeNotifier::new(PhotoKitAccessLevel::AddOnly, tx);
        drop(rx);

        assert!(notifier.is_closed());
        assert!(!notifier.notify());
    }

    #[test]
    fn test_handle_runs_stop_once_on_drop() {
        let stops = Arc::new(std::sync::atomic::AtomicUsize::new(0));
        let counter = stops.clone();
        let handle = ObserverHandle::new(PhotoKitAccessLevel::Read, move || {
            counter.fetch_add(1, std::sync::atomic::Ordering::SeqCst);
        });
        assert_eq!(handle.level(), PhotoKitAccessLevel::Read);

        drop(handle);
        assert_eq!(stops.load(std::sync::atomic::Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_polling_refuses_without_photokit() {
        let provider = Arc::new(MockProvider::default());
        provider.set_photokit_available(false);
        let factory = PollingObserverFactory::new(
            provider,
            Duration::from_millis(10),
            tokio::runtime::Handle::current(),
        );
        let (tx, _rx) = mpsc::channel(4);

        let result = factory.start(
            PhotoKitAccessLevel::Read,
            ChangeNotifier::new(PhotoKitAccessLevel::Read, tx),
        );
        assert!(matches!(
            result,
            Err(PermissionError::PlatformUnsupported(_))
        ));
    }

    #[tokio::test(start_paused = true)]
    async fn test_polling_stops_once_dispatcher_is_gone() {
        let provider = Arc::new(MockProvider::default());
        let factory = PollingObserverFactory::new(
            provider.clone(),
            Duration::from_millis(100),
            tokio::runtime::Handle::current(),
        );
        let (tx, rx) = mpsc::channel(8);
        let _handle = factory
            .start(
                PhotoKitAccessLevel::Read,
                ChangeNotifier::new(PhotoKitAccessLevel::Read, tx),
            )
            .unwrap();

        tokio::time::sleep(Duration::from_millis(250)).await;
        assert!(provider.photokit_reads() >= 2);

        // No status change follows, the closed queue alone ends the task
        drop(rx);
        tokio::time::sleep(Duration::from_millis(150)).await;
        let reads = provider.photokit_reads();
        tokio::time::sleep(Duration::from_millis(1000)).await;
        assert_eq!(provider.photokit_reads(), reads);
    }

    #[tokio::test(start_paused = true)]
    async fn test_polling_notifies_on_status_change_only() {
        let provider = Arc::new(MockProvider::default());
        let factory = PollingObserverFactory::new(
            provider.clone(),
            Duration::from_millis(100),
            tokio::runtime::Handle::current(),
        );
        let (tx, mut rx) = mpsc::channel(8);
        let handle = factory
            .start(
                PhotoKitAccessLevel::ReadWrite,
                ChangeNotifier::new(PhotoKitAccessLevel::ReadWrite, tx),
            )
            .unwrap();

        tokio::time::sleep(Duration::from_millis(350)).await;
        assert!(rx.try_recv().is_err());

        provider.set_photokit_status(
            PhotoKitAccessLevel::ReadWrite,
            PhotoKitAuthorizationStatus::Authorized,
        );
        tokio::time::sleep(Duration::from_millis(150)).await;
        assert_eq!(
            rx.try_recv().unwrap().access_level,
            PhotoKitAccessLevel::ReadWrite
        );

        tokio::time::sleep(Duration::from_millis(300)).await;
        assert!(rx.try_recv().is_err());

        drop(handle);
        provider.set_photokit_status(
            PhotoKitAccessLevel::ReadWrite,
            PhotoKitAuthorizationStatus::Denied,
        );
        tokio::time::sleep(Duration::from_millis(300)).await;
        assert!(rx.try_recv().is_err());
    }
}
