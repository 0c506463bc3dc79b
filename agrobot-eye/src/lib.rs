//! agrobot-eye: camera registry and selection for agrobot
//!
//! Cameras are owned by an external provider framework. This crate tracks the
//! ones it announces, chooses the active one, and tells subscribers about it.

pub mod camera;
pub mod registry;
pub mod selector;
pub mod rig;
pub mod session;
pub mod error;

pub use camera::{CameraHandle, CameraId, CameraListener, CameraProvider, LocalCamera, LocalCameraProvider};
pub use registry::CameraRegistry;
pub use selector::{CameraSelector, SelectionEvent, SubscriptionId};
pub use rig::CameraRig;
pub use session::RobotSession;
pub use error::VisionError;
