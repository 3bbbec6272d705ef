use image::{imageops::FilterType, DynamicImage};

/// Fixed input dimensions of a classifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InputSize {
    pub width: u32,
    pub height: u32,
}

impl InputSize {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    pub fn square(side: u32) -> Self {
        Self::new(side, side)
    }
}

/// A rectangle in upright image coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CropRegion {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

/// Largest region centered in a `source_width` x `source_height` image
/// whose aspect ratio matches `target`.
pub fn center_crop_region(source_width: u32, source_height: u32, target: InputSize) -> CropRegion {
    let (sw, sh) = (source_width as u64, source_height as u64);
    let (tw, th) = (target.width.max(1) as u64, target.height.max(1) as u64);

    let (width, height) = if sw * th > sh * tw {
        // source is wider than the target ratio
        (((sh * tw) / th).clamp(1, sw), sh)
    } else {
        (sw, ((sw * th) / tw).clamp(1, sh))
    };

    CropRegion {
        x: ((sw - width) / 2) as u32,
        y: ((sh - height) / 2) as u32,
        width: width as u32,
        height: height as u32,
    }
}

pub fn crop_and_scale(image: &DynamicImage, region: CropRegion, target: InputSize) -> DynamicImage {
    image
        .crop_imm(region.x, region.y, region.width, region.height)
        .resize_exact(target.width, target.height, FilterType::Triangle)
}
