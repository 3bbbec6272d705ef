use image::RgbImage;
use tract_onnx::prelude::*;

/// NCHW float tensor, each channel normalized as `(v / 255 - mean) / std`.
pub fn image_to_tensor(image: &RgbImage, mean: [f32; 3], std: [f32; 3]) -> Tensor {
    let (width, height) = image.dimensions();

    let tensor = tract_ndarray::Array4::from_shape_fn(
        (1, 3, height as usize, width as usize),
        |(_, c, y, x)| {
            let pixel = image.get_pixel(x as u32, y as u32);
            (pixel[c] as f32 / 255.0 - mean[c]) / std[c]
        },
    );

    tensor.into_tensor()
}

pub fn softmax(logits: &[f32]) -> Vec<f32> {
    let max = logits.iter().copied().fold(f32::NEG_INFINITY, f32::max);
    let exps: Vec<f32> = logits.iter().map(|v| (v - max).exp()).collect();
    let sum: f32 = exps.iter().sum();

    exps.into_iter().map(|v| v / sum).collect()
}
