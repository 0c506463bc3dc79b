//! Active camera selection
//!
//! Policy is last-writer-wins: every added camera becomes the selection, even
//! when one is already selected. Removing the selected camera clears the
//! selection; it does not fall back to an earlier camera.
//!
//! Subscribers are called synchronously, in registration order, on the
//! thread that delivered the provider event. The selection lock is released
//! before they run, so a subscriber may call [`CameraSelector::current`].

use crate::camera::{CameraHandle, CameraId};
use parking_lot::{ReentrantMutex, RwLock};
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tokio::sync::watch;
use tracing::{debug, info};

/// Notification emitted on every selection change
#[derive(Clone)]
pub enum SelectionEvent {
    /// The handle became the active camera
    Selected(Arc<dyn CameraHandle>),
    /// The active camera went away; nothing is selected now
    Cleared(CameraId),
}

impl SelectionEvent {
    pub fn camera_id(&self) -> CameraId {
        match self {
            SelectionEvent::Selected(handle) => handle.id(),
            SelectionEvent::Cleared(id) => id.clone(),
        }
    }
}

impl fmt::Debug for SelectionEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SelectionEvent::Selected(handle) => f.debug_tuple("Selected").field(&handle.id()).finish(),
            SelectionEvent::Cleared(id) => f.debug_tuple("Cleared").field(id).finish(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

type Subscriber = Arc<dyn Fn(&SelectionEvent) + Send + Sync>;

pub struct CameraSelector {
    current: RwLock<Option<Arc<dyn CameraHandle>>>,
    subscribers: RwLock<Vec<(SubscriptionId, Subscriber)>>,
    next_subscription: AtomicU64,
    // Serializes update + emission so subscribers observe delivery order
    dispatch: ReentrantMutex<()>,
    watch_tx: watch::Sender<Option<CameraId>>,
}

impl Default for CameraSelector {
    fn default() -> Self {
        Self::new()
    }
}

impl CameraSelector {
    pub fn new() -> Self {
        let (watch_tx, _) = watch::channel(None);
        Self {
            current: RwLock::new(None),
            subscribers: RwLock::new(Vec::new()),
            next_subscription: AtomicU64::new(0),
            dispatch: ReentrantMutex::new(()),
            watch_tx,
        }
    }

    /// The active camera, if any. A snapshot: the next event may replace it.
    pub fn current(&self) -> Option<Arc<dyn CameraHandle>> {
        self.current.read().clone()
    }

    pub fn is_selected(&self) -> bool {
        self.current.read().is_some()
    }

    /// Make `handle` the active camera and notify subscribers
    pub fn on_camera_added(&self, handle: &Arc<dyn CameraHandle>) {
        let _dispatch = self.dispatch.lock();
        let previous = self.current.write().replace(handle.clone());

        match previous {
            Some(prev) if prev.id() != handle.id() => info!(
                "Camera {} ({}) selected, replacing {}",
                handle.id(),
                handle.label(),
                prev.id()
            ),
            _ => info!("Camera {} ({}) selected", handle.id(), handle.label()),
        }

        self.watch_tx.send_replace(Some(handle.id()));
        self.emit(&SelectionEvent::Selected(handle.clone()));
    }

    /// Drop the selection if `id` is the active camera
    pub fn on_camera_removed(&self, id: &CameraId) {
        let _dispatch = self.dispatch.lock();
        let cleared = {
            let mut current = self.current.write();
            if current.as_ref().map_or(false, |c| &c.id() == id) {
                *current = None;
                true
            } else {
                false
            }
        };
        if !cleared {
            debug!("Camera {} removed, selection unchanged", id);
            return;
        }

        info!("Selected camera {} removed, selection cleared", id);
        self.watch_tx.send_replace(None);
        self.emit(&SelectionEvent::Cleared(id.clone()));
    }

    /// Register a callback for selection events
    pub fn subscribe<F>(&self, callback: F) -> SubscriptionId
    where
        F: Fn(&SelectionEvent) + Send + Sync + 'static,
    {
        let id = SubscriptionId(self.next_subscription.fetch_add(1, Ordering::Relaxed));
        self.subscribers.write().push((id, Arc::new(callback)));
        id
    }

    /// Returns false if the subscription was already gone
    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        let mut subscribers = self.subscribers.write();
        let before = subscribers.len();
        subscribers.retain(|(sid, _)| *sid != id);
        subscribers.len() != before
    }

    /// Follow the selected camera id from async code
    pub fn watch(&self) -> watch::Receiver<Option<CameraId>> {
        self.watch_tx.subscribe()
    }

    fn emit(&self, event: &SelectionEvent) {
        let subscribers: Vec<Subscriber> = self
            .subscribers
            .read()
            .iter()
            .map(|(_, callback)| callback.clone())
            .collect();
        for callback in subscribers {
            callback(event);
        }
    }
}
