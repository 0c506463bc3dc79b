//! Camera handles and the provider interface
//!
//! The camera framework owns camera objects. This crate only sees them as
//! [`CameraHandle`]s announced through a [`CameraProvider`].

use crate::error::VisionError;
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;
use tracing::{debug, info};

/// Stable identifier of a camera, assigned by the provider
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct CameraId(String);

impl CameraId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CameraId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for CameraId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

/// A camera known to the provider
pub trait CameraHandle: Send + Sync {
    fn id(&self) -> CameraId;

    /// Human-readable name, used in logs only
    fn label(&self) -> String;
}

impl fmt::Debug for dyn CameraHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CameraHandle")
            .field("id", &self.id())
            .field("label", &self.label())
            .finish()
    }
}

/// Receives provider notifications. Called on the provider's dispatch
/// context, so implementations must not block.
pub trait CameraListener: Send + Sync {
    fn camera_added(&self, handle: &Arc<dyn CameraHandle>);

    fn camera_removed(&self, _id: &CameraId) {}
}

/// Source of camera add/remove notifications
pub trait CameraProvider: Send + Sync {
    fn subscribe(&self, listener: Arc<dyn CameraListener>);
}

/// Plain camera descriptor
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocalCamera {
    id: CameraId,
    label: String,
}

impl LocalCamera {
    pub fn new(id: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            id: CameraId::new(id),
            label: label.into(),
        }
    }
}

impl CameraHandle for LocalCamera {
    fn id(&self) -> CameraId {
        self.id.clone()
    }

    fn label(&self) -> String {
        self.label.clone()
    }
}

/// In-process provider that owns its cameras and dispatches synchronously.
///
/// Listeners subscribing late are first replayed the cameras already present,
/// in the order they were added.
#[derive(Default)]
pub struct LocalCameraProvider {
    cameras: RwLock<Vec<Arc<dyn CameraHandle>>>,
    listeners: RwLock<Vec<Arc<dyn CameraListener>>>,
}

impl LocalCameraProvider {
    pub fn new() -> Self {
        Self::default()
    }

    /// Announce a camera. Identifiers must be unique among present cameras.
    pub fn add(&self, handle: Arc<dyn CameraHandle>) -> Result<(), VisionError> {
        let id = handle.id();
        let listeners = {
            let mut cameras = self.cameras.write();
            if cameras.iter().any(|c| c.id() == id) {
                return Err(VisionError::Camera(format!("Camera {} is already present", id)));
            }
            cameras.push(handle.clone());
            self.listeners_snapshot()
        };
        info!("Camera {} ({}) added", id, handle.label());

        for listener in listeners {
            listener.camera_added(&handle);
        }
        Ok(())
    }

    /// Withdraw a camera; returns false if it was not present
    pub fn remove(&self, id: &CameraId) -> bool {
        let listeners = {
            let mut cameras = self.cameras.write();
            let before = cameras.len();
            cameras.retain(|c| &c.id() != id);
            if cameras.len() == before {
                return false;
            }
            self.listeners_snapshot()
        };
        info!("Camera {} removed", id);

        for listener in listeners {
            listener.camera_removed(id);
        }
        true
    }

    pub fn cameras(&self) -> Vec<Arc<dyn CameraHandle>> {
        self.cameras.read().clone()
    }

    // Taken under the cameras lock so each listener sees every camera exactly
    // once, either through replay or through the add that follows it.
    fn listeners_snapshot(&self) -> Vec<Arc<dyn CameraListener>> {
        self.listeners.read().clone()
    }
}

impl CameraProvider for LocalCameraProvider {
    fn subscribe(&self, listener: Arc<dyn CameraListener>) {
        let present = {
            let cameras = self.cameras.read();
            self.listeners.write().push(listener.clone());
            cameras.clone()
        };
        debug!("Listener subscribed, replaying {} camera(s)", present.len());
        for handle in &present {
            listener.camera_added(handle);
        }
    }
}
