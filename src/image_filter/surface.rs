//! # 滤镜表面（filter input surface）
//!
//! ## 设计思路
//!
//! 滤镜在浮点表面上工作，表面携带自己的 `Extent`（带符号原点 + 宽高）。
//! 模糊会把表面向四周外扩，原点变为负数；裁剪时用同一坐标系取回
//! “锚定在源图原点、尺寸等于源图”的矩形，外扩边缘直接丢弃而非混合。
//!
//! ## 实现思路
//!
//! - 采样值为预乘 alpha 的 RGBA，范围 0~255：透明像素的颜色不会在卷积中渗入可见区域。
//! - `from_source` 负责预乘；`rasterize` 还原为直通 alpha，四舍五入并钳制到 u8，NaN 视为 0。
//!   量化后 alpha 为 0 的像素输出 `[0, 0, 0, 0]`。

use image::RgbaImage;

use super::{ImageError, SourceImage};

/// 单个采样：预乘后的 `[r, g, b, a]`，取值 0.0~255.0。
pub type Sample = [f32; 4];

/// 每个采样占用的字节数。
pub const SAMPLE_BYTES: u64 = std::mem::size_of::<Sample>() as u64;

/// 表面的包围矩形。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Extent {
    pub x: i64,
    pub y: i64,
    pub width: u32,
    pub height: u32,
}

impl Extent {
    pub fn new(x: i64, y: i64, width: u32, height: u32) -> Self {
        Self { x, y, width, height }
    }

    pub fn at_origin(width: u32, height: u32) -> Self {
        Self::new(0, 0, width, height)
    }

    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    pub fn pixel_count(&self) -> u64 {
        self.width as u64 * self.height as u64
    }

    /// 按 `[f32; 4]` 估算的内存占用。
    pub fn surface_bytes(&self) -> u64 {
        self.pixel_count().saturating_mul(SAMPLE_BYTES)
    }

    pub fn right(&self) -> i64 {
        self.x + self.width as i64
    }

    pub fn bottom(&self) -> i64 {
        self.y + self.height as i64
    }

    pub fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    /// 四边各外扩 `margin` 像素。
    pub fn outset(&self, margin: u32) -> Self {
        let grow = margin.saturating_mul(2);
        Self {
            x: self.x - margin as i64,
            y: self.y - margin as i64,
            width: self.width.saturating_add(grow),
            height: self.height.saturating_add(grow),
        }
    }

    /// 两个矩形的交集，无交集返回 `None`。
    pub fn intersection(&self, other: &Extent) -> Option<Extent> {
        let left = self.x.max(other.x);
        let top = self.y.max(other.y);
        let right = self.right().min(other.right());
        let bottom = self.bottom().min(other.bottom());

        if right <= left || bottom <= top {
            return None;
        }

        Some(Extent::new(left, top, (right - left) as u32, (bottom - top) as u32))
    }

    pub fn contains(&self, other: &Extent) -> bool {
        other.x >= self.x
            && other.y >= self.y
            && other.right() <= self.right()
            && other.bottom() <= self.bottom()
    }
}

/// 浮点滤镜表面，按行主序存储。
#[derive(Debug, Clone, PartialEq)]
pub struct FilterSurface {
    extent: Extent,
    samples: Vec<Sample>,
}

impl FilterSurface {
    pub fn new(extent: Extent, samples: Vec<Sample>) -> Result<Self, ImageError> {
        let expected = usize::try_from(extent.pixel_count())
            .map_err(|_| ImageError::Processing("表面像素数溢出".to_string()))?;

        if samples.len() != expected {
            return Err(ImageError::Processing(format!(
                "表面采样数与尺寸不符：{}（期望 {}）",
                samples.len(),
                expected
            )));
        }

        Ok(Self { extent, samples })
    }

    /// 把源图解释为原点处的滤镜输入表面。
    pub fn from_source(source: &SourceImage) -> Result<Self, ImageError> {
        let (width, height) = source.dimensions();
        if width == 0 || height == 0 {
            return Err(ImageError::InvalidInput(format!(
                "源图尺寸为 {}x{}",
                width, height
            )));
        }

        let samples = source
            .as_rgba()
            .pixels()
            .map(|p| premultiply(p.0))
            .collect();

        Self::new(Extent::at_origin(width, height), samples)
    }

    pub fn extent(&self) -> Extent {
        self.extent
    }

    pub fn samples(&self) -> &[Sample] {
        &self.samples
    }

    pub fn into_samples(self) -> Vec<Sample> {
        self.samples
    }

    /// 第 `row` 行（相对表面顶部）。
    pub fn row(&self, row: u32) -> &[Sample] {
        let width = self.extent.width as usize;
        let start = row as usize * width;
        &self.samples[start..start + width]
    }

    /// 按绝对坐标读取采样，越界返回 `None`。
    pub fn sample_at(&self, x: i64, y: i64) -> Option<Sample> {
        if x < self.extent.x || y < self.extent.y || x >= self.extent.right() || y >= self.extent.bottom() {
            return None;
        }
        let col = (x - self.extent.x) as usize;
        let row = (y - self.extent.y) as usize;
        Some(self.samples[row * self.extent.width as usize + col])
    }

    /// 裁剪到 `rect` 与当前表面的交集。
    pub fn cropped(&self, rect: Extent) -> Result<FilterSurface, ImageError> {
        let target = self.extent.intersection(&rect).ok_or_else(|| {
            ImageError::Processing(format!(
                "裁剪区域 {:?} 与表面 {:?} 无交集",
                rect, self.extent
            ))
        })?;

        if target == self.extent {
            return Ok(self.clone());
        }

        let col = (target.x - self.extent.x) as usize;
        let first_row = (target.y - self.extent.y) as u32;
        let mut samples = Vec::with_capacity(target.pixel_count() as usize);
        for row in first_row..first_row + target.height {
            samples.extend_from_slice(&self.row(row)[col..col + target.width as usize]);
        }

        Self::new(target, samples)
    }

    /// 栅格化为 RGBA8 位图。
    pub fn rasterize(&self) -> Result<RgbaImage, ImageError> {
        let bytes: Vec<u8> = self
            .samples
            .iter()
            .flat_map(|sample| unpremultiply(*sample))
            .collect();

        RgbaImage::from_raw(self.extent.width, self.extent.height, bytes)
            .ok_or_else(|| ImageError::Processing("栅格化输出缓冲长度异常".to_string()))
    }
}

fn premultiply([r, g, b, a]: [u8; 4]) -> Sample {
    let alpha = a as f32 / 255.0;
    [r as f32 * alpha, g as f32 * alpha, b as f32 * alpha, a as f32]
}

fn unpremultiply([r, g, b, a]: Sample) -> [u8; 4] {
    let alpha = quantize(a);
    if alpha == 0 {
        return [0, 0, 0, 0];
    }
    let scale = 255.0 / a;
    [quantize(r * scale), quantize(g * scale), quantize(b * scale), alpha]
}

fn quantize(value: f32) -> u8 {
    if value.is_nan() {
        return 0;
    }
    value.round().clamp(0.0, 255.0) as u8
}

#[cfg(test)]
mod tests {
    use super::*;

    fn numbered_surface(width: u32, height: u32) -> FilterSurface {
        let samples = (0..width * height)
            .map(|i| [i as f32, 0.0, 0.0, 255.0])
            .collect();
        FilterSurface::new(Extent::at_origin(width, height), samples).expect("valid surface")
    }

    #[test]
    fn outset_grows_every_side() {
        let grown = Extent::at_origin(400, 300).outset(30);
        assert_eq!(grown, Extent::new(-30, -30, 460, 360));
        assert!(grown.contains(&Extent::at_origin(400, 300)));
    }

    #[test]
    fn intersection_handles_disjoint_and_overlap() {
        let a = Extent::new(-2, -2, 6, 6);
        let b = Extent::at_origin(3, 3);
        assert_eq!(a.intersection(&b), Some(Extent::at_origin(3, 3)));
        assert_eq!(a.intersection(&Extent::new(10, 10, 2, 2)), None);
    }

    #[test]
    fn crop_picks_origin_anchored_region() {
        let samples = (0..16).map(|i| [i as f32, 0.0, 0.0, 255.0]).collect();
        let surface = FilterSurface::new(Extent::new(-1, -1, 4, 4), samples).expect("valid surface");

        let cropped = surface.cropped(Extent::at_origin(2, 2)).expect("crop should succeed");
        assert_eq!(cropped.extent(), Extent::at_origin(2, 2));
        let firsts: Vec<f32> = cropped.samples().iter().map(|s| s[0]).collect();
        assert_eq!(firsts, vec![5.0, 6.0, 9.0, 10.0]);
    }

    #[test]
    fn crop_outside_surface_is_processing_error() {
        let surface = numbered_surface(2, 2);
        let result = surface.cropped(Extent::new(5, 5, 1, 1));
        assert!(matches!(result, Err(ImageError::Processing(_))));
    }

    #[test]
    fn sample_at_uses_absolute_coordinates() {
        let samples = (0..4).map(|i| [i as f32, 0.0, 0.0, 0.0]).collect();
        let surface = FilterSurface::new(Extent::new(-1, -1, 2, 2), samples).expect("valid surface");
        assert_eq!(surface.sample_at(-1, -1).map(|s| s[0]), Some(0.0));
        assert_eq!(surface.sample_at(0, 0).map(|s| s[0]), Some(3.0));
        assert_eq!(surface.sample_at(1, 0), None);
    }

    #[test]
    fn rasterize_rounds_and_clamps() {
        let samples = vec![[-3.0, 254.6, 300.0, f32::NAN], [0.49, 0.5, 127.5, 255.0]];
        let surface = FilterSurface::new(Extent::at_origin(2, 1), samples).expect("valid surface");
        let raster = surface.rasterize().expect("rasterize should succeed");
        assert_eq!(raster.get_pixel(0, 0).0, [0, 0, 0, 0]);
        assert_eq!(raster.get_pixel(1, 0).0, [0, 1, 128, 255]);
    }

    #[test]
    fn from_source_premultiplies_and_rasterize_restores() {
        let source = SourceImage::from_rgba(image::RgbaImage::from_fn(3, 1, |x, _| match x {
            0 => image::Rgba([200, 100, 50, 255]),
            1 => image::Rgba([200, 100, 50, 51]),
            _ => image::Rgba([255, 0, 0, 0]),
        }));
        let surface = FilterSurface::from_source(&source).expect("valid source");

        assert_eq!(surface.samples()[0], [200.0, 100.0, 50.0, 255.0]);
        let half = surface.samples()[1];
        assert!((half[0] - 40.0).abs() < 1e-4 && (half[1] - 20.0).abs() < 1e-4);
        assert_eq!(surface.samples()[2], [0.0, 0.0, 0.0, 0.0]);

        let raster = surface.rasterize().expect("rasterize should succeed");
        assert_eq!(raster.get_pixel(0, 0).0, [200, 100, 50, 255]);
        assert_eq!(raster.get_pixel(1, 0).0, [200, 100, 50, 51]);
        assert_eq!(raster.get_pixel(2, 0).0, [0, 0, 0, 0]);
    }

    #[test]
    fn translucent_colors_survive_premultiply_roundtrip() {
        for alpha in 1..=255u8 {
            for value in [0u8, 1, 17, 128, 254, 255] {
                let color = [value, 255 - value, value / 2, alpha];
                let surface = FilterSurface::from_source(&SourceImage::filled(1, 1, color))
                    .expect("valid source");
                let raster = surface.rasterize().expect("rasterize should succeed");
                assert_eq!(raster.get_pixel(0, 0).0, color);
            }
        }
    }

    #[test]
    fn sample_count_mismatch_is_rejected() {
        let result = FilterSurface::new(Extent::at_origin(2, 2), vec![[0.0; 4]; 3]);
        assert!(matches!(result, Err(ImageError::Processing(_))));
    }

    #[test]
    fn zero_sized_source_is_invalid_input() {
        let result = FilterSurface::from_source(&SourceImage::filled(0, 5, [0, 0, 0, 255]));
        assert!(matches!(result, Err(ImageError::InvalidInput(_))));
    }
}
