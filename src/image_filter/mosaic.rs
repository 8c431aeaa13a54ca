//! # 马赛克滤镜
//!
//! 以 `scale` 的栅格化比例渲染：先按面积平均缩小，再用最近邻放大回原尺寸，
//! 中间丢失的像素会形成方块。范围不变。

use super::config::RescaleFilter;
use super::filter::ImageFilter;
use super::rescale::resize_samples;
use super::surface::{Extent, FilterSurface};
use super::{FilterConfig, ImageError};

#[derive(Debug, Clone)]
pub struct MosaicFilter {
    scale: f32,
    minification: RescaleFilter,
}

impl MosaicFilter {
    pub fn new(scale: f32, config: &FilterConfig) -> Result<Self, ImageError> {
        if !scale.is_finite() || scale <= 0.0 {
            return Err(ImageError::InvalidInput(format!(
                "马赛克缩放率必须为正的有限值：{}",
                scale
            )));
        }

        let scale = if scale > 1.0 {
            log::debug!("马赛克缩放率 {} 大于 1，按 1 处理", scale);
            1.0
        } else {
            scale
        };

        Ok(Self {
            scale,
            minification: config.mosaic_minification_filter,
        })
    }

    pub fn scale(&self) -> f32 {
        self.scale
    }

    /// 缩小阶段的目标尺寸，每边至少 1 像素。
    pub fn reduced_size(&self, width: u32, height: u32) -> (u32, u32) {
        let shrink = |len: u32| ((len as f64 * self.scale as f64).round() as u32).clamp(1, len.max(1));
        (shrink(width), shrink(height))
    }
}

impl ImageFilter for MosaicFilter {
    fn name(&self) -> &'static str {
        "mosaic"
    }

    fn is_identity(&self) -> bool {
        self.scale >= 1.0
    }

    fn output_extent(&self, input: Extent) -> Extent {
        input
    }

    fn apply(&self, input: &FilterSurface) -> Result<FilterSurface, ImageError> {
        let extent = input.extent();
        if extent.is_empty() {
            return Err(ImageError::InvalidInput(format!("滤镜输入表面为空：{:?}", extent)));
        }

        let (reduced_width, reduced_height) = self.reduced_size(extent.width, extent.height);
        if (reduced_width, reduced_height) == extent.size() {
            return Ok(input.clone());
        }

        let reduced = FilterSurface::new(
            Extent::new(extent.x, extent.y, reduced_width, reduced_height),
            resize_samples(input, reduced_width, reduced_height, self.minification)?,
        )?;

        let restored = resize_samples(&reduced, extent.width, extent.height, RescaleFilter::Nearest)?;
        FilterSurface::new(extent, restored)
    }
}
