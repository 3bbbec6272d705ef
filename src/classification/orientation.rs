use image::DynamicImage;

/// The eight canonical EXIF orientations.
///
/// Each variant names what was done to the stored pixels relative to the
/// upright scene, so [`Orientation::apply`] undoes it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Orientation {
    #[default]
    Normal,
    Mirrored,
    Rotated180,
    Rotated180Mirrored,
    Rotated90Mirrored,
    Rotated90,
    Rotated270Mirrored,
    Rotated270,
}

impl Orientation {
    pub const ALL: [Orientation; 8] = [
        Orientation::Normal,
        Orientation::Mirrored,
        Orientation::Rotated180,
        Orientation::Rotated180Mirrored,
        Orientation::Rotated90Mirrored,
        Orientation::Rotated90,
        Orientation::Rotated270Mirrored,
        Orientation::Rotated270,
    ];

    /// Resolves an EXIF tag 0x0112 value (1..=8).
    pub fn from_exif(code: u32) -> Option<Self> {
        match code {
            1 => Some(Orientation::Normal),
            2 => Some(Orientation::Mirrored),
            3 => Some(Orientation::Rotated180),
            4 => Some(Orientation::Rotated180Mirrored),
            5 => Some(Orientation::Rotated90Mirrored),
            6 => Some(Orientation::Rotated90),
            7 => Some(Orientation::Rotated270Mirrored),
            8 => Some(Orientation::Rotated270),
            _ => None,
        }
    }

    /// Resolves a UIKit `UIImage.Orientation` raw value (0..=7), whose
    /// numbering differs from EXIF.
    pub fn from_ui_code(code: u32) -> Option<Self> {
        match code {
            0 => Some(Orientation::Normal),
            1 => Some(Orientation::Rotated180),
            2 => Some(Orientation::Rotated270),
            3 => Some(Orientation::Rotated90),
            4 => Some(Orientation::Mirrored),
            5 => Some(Orientation::Rotated180Mirrored),
            6 => Some(Orientation::Rotated90Mirrored),
            7 => Some(Orientation::Rotated270Mirrored),
            _ => None,
        }
    }

    pub fn exif_code(self) -> u32 {
        match self {
            Orientation::Normal => 1,
            Orientation::Mirrored => 2,
            Orientation::Rotated180 => 3,
            Orientation::Rotated180Mirrored => 4,
            Orientation::Rotated90Mirrored => 5,
            Orientation::Rotated90 => 6,
            Orientation::Rotated270Mirrored => 7,
            Orientation::Rotated270 => 8,
        }
    }

    /// True when turning the image upright swaps width and height.
    pub fn swaps_axes(self) -> bool {
        matches!(
            self,
            Orientation::Rotated90Mirrored
                | Orientation::Rotated90
                | Orientation::Rotated270Mirrored
                | Orientation::Rotated270
        )
    }

    pub fn upright_size(self, width: u32, height: u32) -> (u32, u32) {
        if self.swaps_axes() {
            (height, width)
        } else {
            (width, height)
        }
    }

    pub fn apply(self, image: &DynamicImage) -> DynamicImage {
        match self {
            Orientation::Normal => image.clone(),
            Orientation::Mirrored => image.fliph(),
            Orientation::Rotated180 => image.rotate180(),
            Orientation::Rotated180Mirrored => image.flipv(),
            Orientation::Rotated90Mirrored => image.rotate90().fliph(),
            Orientation::Rotated90 => image.rotate90(),
            Orientation::Rotated270Mirrored => image.rotate270().fliph(),
            Orientation::Rotated270 => image.rotate270(),
        }
    }
}
