use crate::classification::error::ClassificationError;
use crate::classification::orientation::Orientation;
use crate::classification::sample::ImageSample;
use std::io::Cursor;

/// Reads EXIF tag 0x0112 from encoded image bytes. Photos without EXIF
/// data, or without the tag, count as upright.
pub fn read_exif_orientation(bytes: &[u8]) -> u32 {
    let mut cursor = Cursor::new(bytes);
    exif::Reader::new()
        .read_from_container(&mut cursor)
        .ok()
        .and_then(|exif| {
            exif.get_field(exif::Tag::Orientation, exif::In::PRIMARY)
                .and_then(|field| field.value.get_uint(0))
        })
        .unwrap_or_else(|| Orientation::Normal.exif_code())
}

pub fn decode_sample(bytes: &[u8]) -> Result<ImageSample, ClassificationError> {
    let image = image::load_from_memory(bytes)
        .map_err(|e| ClassificationError::ImageDecodeFailed(e.to_string()))?;

    Ok(ImageSample::with_orientation_code(
        image,
        read_exif_orientation(bytes),
    ))
}
