//! Registry of cameras announced by the provider
//!
//! Holds weak references only: the provider decides when a camera dies.

use crate::camera::{CameraHandle, CameraId};
use parking_lot::RwLock;
use std::sync::{Arc, Weak};
use tracing::{debug, warn};

type AddedHook = Arc<dyn Fn(&Arc<dyn CameraHandle>) + Send + Sync>;

#[derive(Default)]
pub struct CameraRegistry {
    cameras: RwLock<Vec<(CameraId, Weak<dyn CameraHandle>)>>,
    hooks: RwLock<Vec<AddedHook>>,
}

impl CameraRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a newly announced camera and notify subscribers.
    ///
    /// A repeated identifier replaces the stored reference in place, keeping
    /// its original position. Entries whose camera has been dropped are pruned.
    pub fn on_camera_added(&self, handle: &Arc<dyn CameraHandle>) {
        let id = handle.id();
        {
            let mut cameras = self.cameras.write();
            cameras.retain(|(_, known)| known.strong_count() > 0);
            match cameras.iter_mut().find(|(known, _)| *known == id) {
                Some(slot) => {
                    warn!("Camera {} announced twice, replacing previous handle", id);
                    slot.1 = Arc::downgrade(handle);
                }
                None => cameras.push((id.clone(), Arc::downgrade(handle))),
            }
        }
        debug!("Registered camera {} ({})", id, handle.label());

        let hooks: Vec<AddedHook> = self.hooks.read().clone();
        for hook in hooks {
            hook(handle);
        }
    }

    /// Forget a camera; returns false if it was unknown
    pub fn on_camera_removed(&self, id: &CameraId) -> bool {
        let mut cameras = self.cameras.write();
        let before = cameras.len();
        cameras.retain(|(known, _)| known != id);
        let removed = cameras.len() != before;
        if removed {
            debug!("Unregistered camera {}", id);
        }
        removed
    }

    /// Snapshot of live cameras in insertion order
    pub fn known_cameras(&self) -> Vec<Arc<dyn CameraHandle>> {
        self.cameras
            .read()
            .iter()
            .filter_map(|(_, handle)| handle.upgrade())
            .collect()
    }

    pub fn get(&self, id: &CameraId) -> Option<Arc<dyn CameraHandle>> {
        self.cameras
            .read()
            .iter()
            .find(|(known, _)| known == id)
            .and_then(|(_, handle)| handle.upgrade())
    }

    /// Call `hook` synchronously for every later addition, after hooks registered earlier
    pub fn subscribe<F>(&self, hook: F)
    where
        F: Fn(&Arc<dyn CameraHandle>) + Send + Sync + 'static,
    {
        self.hooks.write().push(Arc::new(hook));
    }

    /// Number of live cameras
    pub fn len(&self) -> usize {
        self.cameras
            .read()
            .iter()
            .filter(|(_, handle)| handle.strong_count() > 0)
            .count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
