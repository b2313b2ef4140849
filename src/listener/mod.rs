//! PhotoKit permission listeners
//!
//! This module implements the listener architecture:
//! - ListenerRegistry to track listeners and one observer per access level
//! - ObserverFactory trait for the OS-side status observers
//! - ChangeDispatcher to turn observer notices into frontend events

pub mod dispatch;
pub mod observer;
pub mod registry;
pub mod state;

#[cfg(test)]
pub(crate) mod test_support;

pub use dispatch::{ChangeDispatcher, EventSink, TauriEventSink};
pub use observer::{ChangeNotifier, ObserverFactory, ObserverHandle, PollingObserverFactory};
pub use registry::ListenerRegistry;
pub use state::{ChangeNotice, ListenerRecord, PermissionStatusChangeEvent, PHOTOKIT_PERMISSION_CHANGED};
