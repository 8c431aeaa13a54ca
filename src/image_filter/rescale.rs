//! # 缩放模块
//!
//! ## 设计思路
//!
//! 裁剪后的表面需要缩放回源图尺寸；常见情况下尺寸已经一致，直接原样返回。
//! 马赛克滤镜也复用这里的缩小/放大能力。
//!
//! ## 实现思路
//!
//! 1. 优先使用 `fast_image_resize`（`F32x4` 像素；表面已是预乘 alpha，因此关闭库内的 alpha 处理）。
//! 2. 失败时回退 `image::imageops::resize`；`image` 对 f32 按 0~1 钳制，因此回退路径先归一化再还原。

use fast_image_resize as fr;
use image::imageops::FilterType;
use image::{ImageBuffer, Rgba32FImage};

use super::config::RescaleFilter;
use super::surface::{Extent, FilterSurface, SAMPLE_BYTES, Sample};
use super::ImageError;

const CHANNEL_MAX: f32 = 255.0;

impl RescaleFilter {
    fn to_fast_alg(self) -> fr::ResizeAlg {
        match self {
            RescaleFilter::Nearest => fr::ResizeAlg::Nearest,
            RescaleFilter::Box => fr::ResizeAlg::Convolution(fr::FilterType::Box),
            RescaleFilter::Bilinear => fr::ResizeAlg::Convolution(fr::FilterType::Bilinear),
            RescaleFilter::CatmullRom => fr::ResizeAlg::Convolution(fr::FilterType::CatmullRom),
            RescaleFilter::Lanczos3 => fr::ResizeAlg::Convolution(fr::FilterType::Lanczos3),
        }
    }

    fn to_image_filter(self) -> FilterType {
        match self {
            RescaleFilter::Nearest => FilterType::Nearest,
            RescaleFilter::Box | RescaleFilter::Bilinear => FilterType::Triangle,
            RescaleFilter::CatmullRom => FilterType::CatmullRom,
            RescaleFilter::Lanczos3 => FilterType::Lanczos3,
        }
    }
}

/// 把表面缩放到精确的 `width x height`。
///
/// 原点按同样比例缩放（锚定在原点的表面缩放后仍在原点）。
pub fn rescale_surface(
    surface: FilterSurface,
    width: u32,
    height: u32,
    filter: RescaleFilter,
) -> Result<FilterSurface, ImageError> {
    let extent = surface.extent();
    if extent.size() == (width, height) {
        return Ok(surface);
    }

    let scale_x = width as f64 / extent.width as f64;
    let scale_y = height as f64 / extent.height as f64;
    let target = Extent::new(
        (extent.x as f64 * scale_x).round() as i64,
        (extent.y as f64 * scale_y).round() as i64,
        width,
        height,
    );

    log::debug!(
        "🧩 表面缩放：{}x{} -> {}x{}（filter={:?}）",
        extent.width,
        extent.height,
        width,
        height,
        filter
    );

    let samples = resize_samples(&surface, width, height, filter)?;
    FilterSurface::new(target, samples)
}

/// 缩放采样数据，不关心原点。
pub(crate) fn resize_samples(
    surface: &FilterSurface,
    width: u32,
    height: u32,
    filter: RescaleFilter,
) -> Result<Vec<Sample>, ImageError> {
    let extent = surface.extent();
    if extent.is_empty() || width == 0 || height == 0 {
        return Err(ImageError::Processing(format!(
            "无法缩放空表面：{}x{} -> {}x{}",
            extent.width, extent.height, width, height
        )));
    }

    if extent.size() == (width, height) {
        return Ok(surface.samples().to_vec());
    }

    match resize_with_fast_image_resize(surface, width, height, filter) {
        Ok(samples) => Ok(samples),
        Err(err) => {
            log::warn!(
                "⚠️ fast_image_resize 缩放失败，回退 image::imageops::resize：{}",
                err
            );
            resize_with_image(surface, width, height, filter)
        }
    }
}

fn resize_with_fast_image_resize(
    surface: &FilterSurface,
    width: u32,
    height: u32,
    filter: RescaleFilter,
) -> Result<Vec<Sample>, ImageError> {
    let extent = surface.extent();
    let bytes = bytemuck::cast_slice::<Sample, u8>(surface.samples()).to_vec();

    let src_image = fr::images::Image::from_vec_u8(
        extent.width,
        extent.height,
        bytes,
        fr::PixelType::F32x4,
    )
    .map_err(|e| ImageError::Processing(format!("构建源表面缓冲失败：{}", e)))?;

    let mut dst_image = fr::images::Image::new(width, height, fr::PixelType::F32x4);

    let mut resizer = fr::Resizer::new();
    let options = fr::ResizeOptions::new()
        .resize_alg(filter.to_fast_alg())
        .use_alpha(false);

    resizer
        .resize(&src_image, &mut dst_image, Some(&options))
        .map_err(|e| ImageError::Processing(format!("fast_image_resize 执行失败：{}", e)))?;

    let out = dst_image.into_vec();
    let expected = width as usize * height as usize * SAMPLE_BYTES as usize;
    if out.len() != expected {
        return Err(ImageError::Processing("fast_image_resize 输出缓冲长度异常".to_string()));
    }

    Ok(out
        .chunks_exact(SAMPLE_BYTES as usize)
        .map(bytemuck::pod_read_unaligned::<Sample>)
        .collect())
}

fn resize_with_image(
    surface: &FilterSurface,
    width: u32,
    height: u32,
    filter: RescaleFilter,
) -> Result<Vec<Sample>, ImageError> {
    let extent = surface.extent();
    let normalized: Vec<f32> = surface
        .samples()
        .iter()
        .flat_map(|sample| sample.map(|c| c / CHANNEL_MAX))
        .collect();

    let src: Rgba32FImage = ImageBuffer::from_raw(extent.width, extent.height, normalized)
        .ok_or_else(|| ImageError::Processing("构建回退缩放缓冲失败".to_string()))?;

    let dst = image::imageops::resize(&src, width, height, filter.to_image_filter());

    Ok(dst
        .pixels()
        .map(|p| p.0.map(|c| c * CHANNEL_MAX))
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn gradient_surface(width: u32, height: u32) -> FilterSurface {
        let samples = (0..height)
            .flat_map(|y| (0..width).map(move |x| [(x * 8) as f32, (y * 8) as f32, 64.0, 255.0]))
            .collect();
        FilterSurface::new(Extent::at_origin(width, height), samples).expect("valid surface")
    }

    #[test]
    fn same_size_is_passthrough() {
        let surface = gradient_surface(6, 4);
        let rescaled = rescale_surface(surface.clone(), 6, 4, RescaleFilter::Lanczos3)
            .expect("rescale should succeed");
        assert_eq!(rescaled, surface);
    }

    #[test]
    fn rescale_hits_exact_target_size() {
        let surface = gradient_surface(10, 6);
        let rescaled = rescale_surface(surface, 25, 3, RescaleFilter::Bilinear)
            .expect("rescale should succeed");
        assert_eq!(rescaled.extent(), Extent::at_origin(25, 3));
        assert_eq!(rescaled.samples().len(), 75);
    }

    #[test]
    fn nearest_upscale_only_copies_existing_samples() {
        let surface = gradient_surface(3, 3);
        let originals: Vec<Sample> = surface.samples().to_vec();
        let samples = resize_samples(&surface, 9, 9, RescaleFilter::Nearest).expect("resize should succeed");
        assert!(samples.iter().all(|s| originals.contains(s)));
    }

    #[test]
    fn fallback_path_preserves_channel_range() {
        let surface = gradient_surface(4, 4);
        let samples = resize_with_image(&surface, 2, 2, RescaleFilter::Nearest).expect("fallback should succeed");
        assert_eq!(samples.len(), 4);
        assert!(samples.iter().all(|s| (s[3] - 255.0).abs() < 1e-3 && (s[2] - 64.0).abs() < 1e-3));
    }

    #[test]
    fn empty_target_is_processing_error() {
        let surface = gradient_surface(4, 4);
        let result = resize_samples(&surface, 0, 4, RescaleFilter::Box);
        assert!(matches!(result, Err(ImageError::Processing(_))));
    }
}
