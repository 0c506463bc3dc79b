//! Error types for agrobot-eye

use agrobot_core::Error as CoreError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum VisionError {
    #[error("Camera error: {0}")]
    Camera(String),

    #[error("No robot identity configured")]
    MissingRobotId,

    #[error("Configuration error: {0}")]
    Config(#[from] CoreError),
}
