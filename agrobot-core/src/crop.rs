//! Crop margins applied to camera frames

use serde::{Deserialize, Serialize};

/// Pixel margins discarded from each edge of a frame
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Crop {
    pub left: u32,
    pub right: u32,
    pub up: u32,
    pub down: u32,
}

/// Rectangle retained after cropping, in source-frame pixels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CropRegion {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl Crop {
    pub fn horizontal(&self) -> u64 {
        self.left as u64 + self.right as u64
    }

    pub fn vertical(&self) -> u64 {
        self.up as u64 + self.down as u64
    }

    /// Retained region of a `width` x `height` frame, `None` if nothing is left
    pub fn region(&self, width: u32, height: u32) -> Option<CropRegion> {
        if self.horizontal() >= width as u64 || self.vertical() >= height as u64 {
            return None;
        }
        Some(CropRegion {
            x: self.left,
            y: self.up,
            width: width - self.left - self.right,
            height: height - self.up - self.down,
        })
    }
}
