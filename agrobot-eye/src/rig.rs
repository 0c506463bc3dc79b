//! Wiring between a camera provider, the registry and the selector

use crate::camera::{CameraHandle, CameraId, CameraListener, CameraProvider};
use crate::registry::CameraRegistry;
use crate::selector::CameraSelector;
use std::sync::Arc;

/// Registry and selector fed from one provider. Every event reaches the
/// registry before the selector.
#[derive(Clone, Default)]
pub struct CameraRig {
    registry: Arc<CameraRegistry>,
    selector: Arc<CameraSelector>,
}

impl CameraRig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Subscribe the rig to `provider`
    pub fn attach(&self, provider: &dyn CameraProvider) {
        provider.subscribe(Arc::new(RigListener {
            registry: self.registry.clone(),
            selector: self.selector.clone(),
        }));
    }

    pub fn registry(&self) -> &Arc<CameraRegistry> {
        &self.registry
    }

    pub fn selector(&self) -> &Arc<CameraSelector> {
        &self.selector
    }
}

struct RigListener {
    registry: Arc<CameraRegistry>,
    selector: Arc<CameraSelector>,
}

impl CameraListener for RigListener {
    fn camera_added(&self, handle: &Arc<dyn CameraHandle>) {
        self.registry.on_camera_added(handle);
        self.selector.on_camera_added(handle);
    }

    fn camera_removed(&self, id: &CameraId) {
        self.registry.on_camera_removed(id);
        self.selector.on_camera_removed(id);
    }
}
