//! # 滤镜流水线
//!
//! ## 设计思路
//!
//! 把“源图 → 滤镜表面 → 滤镜 → 裁剪 → 缩放 → 栅格化”集中管理，并在关键节点增加资源上限控制。
//! 流水线本身无状态：只持有一份不可变配置，每次调用都新建滤镜实例。
//!
//! ## 实现思路
//!
//! 1. 校验源图尺寸（0 宽/高 → `InvalidInput`）与像素上限
//! 2. 按参数新建滤镜；恒等参数（半径 0、缩放率 1）直接复制源图
//! 3. 源图转换为原点处的预乘滤镜表面；先按外扩后的范围估算内存，超限直接拒绝
//! 4. 应用滤镜（模糊输出范围大于输入）
//! 5. 裁剪回“锚定源图原点、尺寸等于源图”的矩形
//! 6. 缩放到源图尺寸（通常是空操作）
//! 7. 栅格化为 RGBA8，并校验输出尺寸与源图一致

use std::time::Instant;

use super::filter::FilterKind;
use super::rescale::rescale_surface;
use super::surface::{Extent, FilterSurface};
use super::{FilterConfig, FilteredImage, ImageError, SourceImage};

/// 有界滤镜流水线：输出范围恒等于输入范围。
#[derive(Debug, Clone, Default)]
pub struct FilterPipeline {
    config: FilterConfig,
}

impl FilterPipeline {
    /// # 示例
    /// ```rust
    /// use image_processor::image_filter::{FilterConfig, FilterPipeline, SourceImage};
    ///
    /// let pipeline = FilterPipeline::new(FilterConfig::default());
    /// let output = pipeline.apply(&SourceImage::placeholder(64), 10.0)?;
    /// assert_eq!(output.dimensions(), (64, 64));
    /// # Ok::<(), image_processor::image_filter::ImageError>(())
    /// ```
    pub fn new(config: FilterConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &FilterConfig {
        &self.config
    }

    /// 高斯模糊，参数为模糊半径。
    pub fn apply(&self, source: &SourceImage, radius: f32) -> Result<FilteredImage, ImageError> {
        self.apply_filter(source, FilterKind::GaussianBlur, radius)
    }

    /// 马赛克，参数为栅格化缩放率。
    pub fn apply_mosaic(&self, source: &SourceImage, scale: f32) -> Result<FilteredImage, ImageError> {
        self.apply_filter(source, FilterKind::Mosaic, scale)
    }

    /// 处理主入口：对源图应用指定滤镜。
    pub fn apply_filter(
        &self,
        source: &SourceImage,
        kind: FilterKind,
        parameter: f32,
    ) -> Result<FilteredImage, ImageError> {
        let total_start = Instant::now();
        let (width, height) = source.dimensions();
        self.validate_source(width, height)?;

        let filter = kind.build(parameter, &self.config)?;
        if filter.is_identity() {
            log::debug!("滤镜 {}({}) 为恒等变换，直接复制源图", filter.name(), parameter);
            return Ok(FilteredImage::new(source.as_rgba().clone()));
        }

        let surface_start = Instant::now();
        let surface = FilterSurface::from_source(source)?;
        let input_extent = surface.extent();
        let surface_elapsed = surface_start.elapsed();

        self.validate_surface_budget(filter.output_extent(input_extent))?;

        let filter_start = Instant::now();
        let filtered = filter.apply(&surface)?;
        let filter_elapsed = filter_start.elapsed();

        let crop_start = Instant::now();
        let cropped = filtered.cropped(Extent::at_origin(width, height))?;
        let crop_elapsed = crop_start.elapsed();

        let rescale_start = Instant::now();
        let rescaled = rescale_surface(cropped, width, height, self.config.rescale_filter)?;
        let rescale_elapsed = rescale_start.elapsed();

        let raster_start = Instant::now();
        let raster = rescaled.rasterize()?;
        let raster_elapsed = raster_start.elapsed();

        if raster.dimensions() != (width, height) {
            return Err(ImageError::Processing(format!(
                "输出尺寸 {}x{} 与源图 {}x{} 不一致",
                raster.width(),
                raster.height(),
                width,
                height
            )));
        }

        log::debug!(
            "滤镜阶段耗时 - surface={}µs filter={}µs crop={}µs rescale={}µs rasterize={}µs",
            surface_elapsed.as_micros(),
            filter_elapsed.as_micros(),
            crop_elapsed.as_micros(),
            rescale_elapsed.as_micros(),
            raster_elapsed.as_micros()
        );
        log::info!(
            "✅ 滤镜处理完成 - {}({}) {}x{} filtered={}x{} total={}ms",
            filter.name(),
            parameter,
            width,
            height,
            filtered.extent().width,
            filtered.extent().height,
            total_start.elapsed().as_millis()
        );

        Ok(FilteredImage::new(raster))
    }

    fn validate_source(&self, width: u32, height: u32) -> Result<(), ImageError> {
        if width == 0 || height == 0 {
            return Err(ImageError::InvalidInput(format!(
                "源图尺寸为 {}x{}",
                width, height
            )));
        }

        let pixels = width as u64 * height as u64;
        if pixels > self.config.max_source_pixels {
            return Err(ImageError::Processing(format!(
                "源图像素过大：{} 像素（限制：{} 像素）",
                pixels, self.config.max_source_pixels
            )));
        }

        Ok(())
    }

    fn validate_surface_budget(&self, extent: Extent) -> Result<(), ImageError> {
        let estimated = extent.surface_bytes();
        if estimated > self.config.max_surface_bytes {
            return Err(ImageError::Processing(format!(
                "滤镜表面预计内存过大：{:.2} MB（限制：{:.2} MB）",
                estimated as f64 / 1024.0 / 1024.0,
                self.config.max_surface_bytes as f64 / 1024.0 / 1024.0
            )));
        }
        Ok(())
    }
}
