//! # 配置模块
//!
//! ## 设计思路
//!
//! 将所有“可调策略”集中到 `FilterConfig`，保证运行时行为可观测、可调整、可测试。
//! 其中性能档位（quality / balanced / speed）作为高层语义，映射到底层参数组合。
//!
//! ## 实现思路
//!
//! - `Default` 提供生产可用的平衡配置。
//! - `FilterQualityProfile` 负责档位字符串解析与反向输出。
//! - `apply_performance_profile` 将档位转换为具体参数。
//! - `infer_performance_profile` 用于从当前配置反推档位。
//! - 配置文件为 JSON，缺失字段回落到默认值（`#[serde(default)]`）。

use std::path::Path;

use serde::{Deserialize, Serialize};

use super::ImageError;

/// 占位底图的边长（像素）。
pub const DEFAULT_IMAGE_SIZE: u32 = 400;

/// 马赛克默认缩放率：缩小到 10% 再放大。
pub const DEFAULT_MOSAIC_SCALE: f32 = 0.1;

/// 缩放阶段使用的采样滤镜。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RescaleFilter {
    Nearest,
    Box,
    Bilinear,
    CatmullRom,
    Lanczos3,
}

/// 滤镜流水线配置。
///
/// 字段覆盖了加载、表面预算、卷积核与缩放四个阶段。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FilterConfig {
    /// 读取原始文件时允许的最大体积（字节）。
    pub max_file_size: u64,
    /// 源图像素上限（`width * height`）。
    pub max_source_pixels: u64,
    /// 单个滤镜表面允许的内存上限（按 `[f32; 4]` 估算，字节）。
    ///
    /// 模糊会把表面外扩半径大小，这里约束的是外扩后的尺寸。
    pub max_surface_bytes: u64,
    /// 高斯核半宽 = `ceil(sigma * kernel_sigma_extent)`。
    pub kernel_sigma_extent: f32,
    /// 高斯核半宽上限，超过则视为滤镜构造失败。
    pub max_kernel_radius: u32,
    /// 裁剪后缩放回原尺寸所用滤镜。
    pub rescale_filter: RescaleFilter,
    /// 马赛克缩放率（栅格化比例）。
    pub mosaic_scale: f32,
    /// 马赛克缩小阶段所用滤镜，放大阶段固定最近邻。
    pub mosaic_minification_filter: RescaleFilter,
    /// 滑块下限（仅供前端与扫描命令使用，流水线不做钳制）。
    pub slider_min: f32,
    /// 滑块上限。
    pub slider_max: f32,
    /// 占位底图边长。
    pub image_size: u32,
}

impl Default for FilterConfig {
    fn default() -> Self {
        Self {
            max_file_size: 50 * 1024 * 1024,
            max_source_pixels: 40_000_000,
            max_surface_bytes: 768 * 1024 * 1024,
            kernel_sigma_extent: 3.0,
            max_kernel_radius: 1024,
            rescale_filter: RescaleFilter::Bilinear,
            mosaic_scale: DEFAULT_MOSAIC_SCALE,
            mosaic_minification_filter: RescaleFilter::Box,
            slider_min: 0.0,
            slider_max: 20.0,
            image_size: DEFAULT_IMAGE_SIZE,
        }
    }
}

/// 滤镜质量档位（面向产品/用户语义）。
///
/// - `Quality`：卷积核覆盖 4σ，缩放用 Catmull-Rom
/// - `Balanced`：3σ + 双线性
/// - `Speed`：2σ + 最近邻
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterQualityProfile {
    Quality,
    Balanced,
    Speed,
}

impl FilterQualityProfile {
    /// 从外部字符串解析档位。
    ///
    /// # 示例
    /// ```rust
    /// use image_processor::image_filter::FilterQualityProfile;
    ///
    /// let p = FilterQualityProfile::parse("balanced")?;
    /// assert_eq!(p.as_str(), "balanced");
    /// # Ok::<(), image_processor::image_filter::ImageError>(())
    /// ```
    pub fn parse(profile: &str) -> Result<Self, ImageError> {
        match profile.trim().to_lowercase().as_str() {
            "quality" => Ok(Self::Quality),
            "balanced" => Ok(Self::Balanced),
            "speed" => Ok(Self::Speed),
            other => Err(ImageError::InvalidFormat(format!(
                "未知性能档位：{}（可选：quality / balanced / speed）",
                other
            ))),
        }
    }

    /// 将档位输出为稳定字符串。
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Quality => "quality",
            Self::Balanced => "balanced",
            Self::Speed => "speed",
        }
    }
}

impl FilterConfig {
    /// 基于当前参数反推性能档位。
    pub fn infer_performance_profile(&self) -> FilterQualityProfile {
        if self.kernel_sigma_extent >= 4.0 && self.rescale_filter == RescaleFilter::CatmullRom {
            return FilterQualityProfile::Quality;
        }

        if self.kernel_sigma_extent <= 2.0 || self.rescale_filter == RescaleFilter::Nearest {
            return FilterQualityProfile::Speed;
        }

        FilterQualityProfile::Balanced
    }

    /// 应用指定性能档位到实际参数。
    pub fn apply_performance_profile(&mut self, profile: FilterQualityProfile) {
        match profile {
            FilterQualityProfile::Quality => {
                self.kernel_sigma_extent = 4.0;
                self.rescale_filter = RescaleFilter::CatmullRom;
                self.mosaic_minification_filter = RescaleFilter::Bilinear;
            }
            FilterQualityProfile::Balanced => {
                self.kernel_sigma_extent = 3.0;
                self.rescale_filter = RescaleFilter::Bilinear;
                self.mosaic_minification_filter = RescaleFilter::Box;
            }
            FilterQualityProfile::Speed => {
                self.kernel_sigma_extent = 2.0;
                self.rescale_filter = RescaleFilter::Nearest;
                self.mosaic_minification_filter = RescaleFilter::Nearest;
            }
        }
    }

    /// 校验配置取值范围。
    pub fn validate(&self) -> Result<(), ImageError> {
        if !self.kernel_sigma_extent.is_finite() || !(1.0..=8.0).contains(&self.kernel_sigma_extent) {
            return Err(ImageError::InvalidFormat(
                "kernel_sigma_extent 必须在 1.0~8.0 之间".to_string(),
            ));
        }
        if self.max_kernel_radius == 0 {
            return Err(ImageError::InvalidFormat("max_kernel_radius 不能为 0".to_string()));
        }
        if self.max_source_pixels == 0 || self.max_surface_bytes == 0 {
            return Err(ImageError::InvalidFormat(
                "max_source_pixels / max_surface_bytes 不能为 0".to_string(),
            ));
        }
        if !self.mosaic_scale.is_finite() || self.mosaic_scale <= 0.0 || self.mosaic_scale > 1.0 {
            return Err(ImageError::InvalidFormat("mosaic_scale 必须在 (0, 1] 之间".to_string()));
        }
        if !self.slider_min.is_finite() || !self.slider_max.is_finite() || self.slider_min > self.slider_max {
            return Err(ImageError::InvalidFormat(
                "slider_min 不能大于 slider_max".to_string(),
            ));
        }
        if self.image_size == 0 {
            return Err(ImageError::InvalidFormat("image_size 不能为 0".to_string()));
        }
        Ok(())
    }

    /// 从 JSON 文本解析配置，缺失字段使用默认值。
    pub fn from_json_str(content: &str) -> Result<Self, ImageError> {
        let config: Self = serde_json::from_str(content)
            .map_err(|e| ImageError::InvalidFormat(format!("解析配置失败：{}", e)))?;
        config.validate()?;
        Ok(config)
    }

    /// 从 JSON 文件加载配置。
    pub fn from_json_file(path: &Path) -> Result<Self, ImageError> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            ImageError::FileSystem(format!("无法读取配置文件 {}：{}", path.display(), e))
        })?;
        log::info!("⚙️ 已加载配置文件：{}", path.display());
        Self::from_json_str(&content)
    }
}
