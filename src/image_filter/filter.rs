//! # 滤镜抽象
//!
//! ## 设计思路
//!
//! 滤镜对象是“有参数的一次性对象”：每次调用都按参数重新构造，
//! 不在多次调用之间复用同一实例再修改参数。
//! `FilterKind` 只描述“用哪种滤镜”，真正的滤镜实例由 `build` 新建。

use serde::{Deserialize, Serialize};

use super::blur::GaussianBlurFilter;
use super::mosaic::MosaicFilter;
use super::surface::{Extent, FilterSurface};
use super::{FilterConfig, ImageError};

/// 作用于滤镜表面的滤镜。
pub trait ImageFilter: Send + Sync {
    /// 稳定名称，用于日志。
    fn name(&self) -> &'static str;

    /// 当前参数下滤镜不改变任何像素（流水线据此直接复制源图）。
    fn is_identity(&self) -> bool {
        false
    }

    /// 给定输入范围时输出表面的范围。
    fn output_extent(&self, input: Extent) -> Extent;

    /// 应用滤镜，返回新表面，不修改输入。
    fn apply(&self, input: &FilterSurface) -> Result<FilterSurface, ImageError>;
}

/// 可选滤镜种类。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FilterKind {
    /// 参数为模糊半径（σ）。
    GaussianBlur,
    /// 参数为栅格化缩放率。
    Mosaic,
}

impl FilterKind {
    pub fn parse(kind: &str) -> Result<Self, ImageError> {
        match kind.trim().to_lowercase().as_str() {
            "gaussian_blur" | "blur" => Ok(Self::GaussianBlur),
            "mosaic" => Ok(Self::Mosaic),
            other => Err(ImageError::InvalidFormat(format!(
                "未知滤镜：{}（可选：gaussian_blur / mosaic）",
                other
            ))),
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::GaussianBlur => "gaussian_blur",
            Self::Mosaic => "mosaic",
        }
    }

    /// 按参数新建滤镜实例。
    ///
    /// 参数无法构造滤镜时返回 `InvalidInput`。
    pub fn build(self, parameter: f32, config: &FilterConfig) -> Result<Box<dyn ImageFilter>, ImageError> {
        match self {
            Self::GaussianBlur => Ok(Box::new(GaussianBlurFilter::new(parameter, config)?)),
            Self::Mosaic => Ok(Box::new(MosaicFilter::new(parameter, config)?)),
        }
    }
}
