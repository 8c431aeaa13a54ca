//! # 高斯模糊滤镜（可分离两遍）
//!
//! ## 设计思路
//!
//! - 模糊半径即 σ；核半宽 `ceil(σ * kernel_sigma_extent)`，输出表面向四周外扩同样宽度。
//! - 源图以外的采样钳制到最近的边缘像素，纯色图在任意半径下保持不变。
//! - 半径 0 得到单位核 `[1.0]`，结果与输入逐像素一致。
//! - 负半径按 0 处理；非有限值或核过大视为滤镜构造失败。
//!
//! ## 实现思路
//!
//! 先对每一行做水平卷积（输出宽度已外扩），再对外扩后的每一列做垂直卷积。

use super::filter::ImageFilter;
use super::surface::{Extent, FilterSurface, Sample};
use super::{FilterConfig, ImageError};

/// 小于该 σ 时直接使用单位核，避免 `exp(-x² / 2σ²)` 的 0/0。
const MIN_SIGMA: f64 = 1e-3;

/// 高斯模糊。
#[derive(Debug, Clone)]
pub struct GaussianBlurFilter {
    radius: f32,
    half_width: u32,
    kernel: Vec<f32>,
}

impl GaussianBlurFilter {
    pub fn new(radius: f32, config: &FilterConfig) -> Result<Self, ImageError> {
        if !radius.is_finite() {
            return Err(ImageError::InvalidInput(format!("模糊半径不是有限值：{}", radius)));
        }

        let sigma = if radius < 0.0 {
            log::debug!("负模糊半径 {} 按 0 处理", radius);
            0.0
        } else {
            radius as f64
        };

        let half_width = kernel_half_width(sigma, config)?;
        let kernel = gaussian_kernel_1d(sigma, half_width);

        Ok(Self {
            radius: radius.max(0.0),
            half_width,
            kernel,
        })
    }

    /// 生效半径（负值已归零）。
    pub fn radius(&self) -> f32 {
        self.radius
    }

    pub fn half_width(&self) -> u32 {
        self.half_width
    }

    pub fn kernel(&self) -> &[f32] {
        &self.kernel
    }
}

impl ImageFilter for GaussianBlurFilter {
    fn name(&self) -> &'static str {
        "gaussian_blur"
    }

    fn is_identity(&self) -> bool {
        self.half_width == 0
    }

    fn output_extent(&self, input: Extent) -> Extent {
        input.outset(self.half_width)
    }

    fn apply(&self, input: &FilterSurface) -> Result<FilterSurface, ImageError> {
        let extent = input.extent();
        if extent.is_empty() {
            return Err(ImageError::InvalidInput(format!("滤镜输入表面为空：{:?}", extent)));
        }

        let margin = self.half_width as usize;
        let width = extent.width as usize;
        let height = extent.height as usize;
        let out_width = width + 2 * margin;
        let out_height = height + 2 * margin;
        // 输出第 j 个位置、第 t 个抽头对应源索引 j + t - 2 * margin
        let bias = 2 * margin as isize;

        let mut horizontal = Vec::with_capacity(out_width * height);
        for row in 0..extent.height {
            let src = input.row(row);
            for col in 0..out_width {
                horizontal.push(weighted_sum(&self.kernel, |tap| {
                    src[clamp_index((col + tap) as isize - bias, width)]
                }));
            }
        }

        let mut output = Vec::with_capacity(out_width * out_height);
        for row in 0..out_height {
            for col in 0..out_width {
                output.push(weighted_sum(&self.kernel, |tap| {
                    horizontal[clamp_index((row + tap) as isize - bias, height) * out_width + col]
                }));
            }
        }

        FilterSurface::new(self.output_extent(extent), output)
    }
}

fn kernel_half_width(sigma: f64, config: &FilterConfig) -> Result<u32, ImageError> {
    if sigma < MIN_SIGMA {
        return Ok(0);
    }

    let half_width = (sigma * config.kernel_sigma_extent as f64).ceil();
    if half_width > config.max_kernel_radius as f64 {
        return Err(ImageError::InvalidInput(format!(
            "模糊半径过大：核半宽 {}（限制：{}）",
            half_width, config.max_kernel_radius
        )));
    }

    Ok(half_width as u32)
}

/// 归一化的一维高斯核，长度 `2 * half_width + 1`。
pub fn gaussian_kernel_1d(sigma: f64, half_width: u32) -> Vec<f32> {
    if half_width == 0 || sigma < MIN_SIGMA {
        return vec![1.0];
    }

    let center = half_width as f64;
    let denom = 2.0 * sigma * sigma;
    let weights: Vec<f64> = (0..=2 * half_width)
        .map(|i| {
            let x = i as f64 - center;
            (-(x * x) / denom).exp()
        })
        .collect();
    let sum: f64 = weights.iter().sum();

    weights.into_iter().map(|w| (w / sum) as f32).collect()
}

fn clamp_index(index: isize, len: usize) -> usize {
    index.clamp(0, len as isize - 1) as usize
}

fn weighted_sum<F>(kernel: &[f32], sample: F) -> Sample
where
    F: Fn(usize) -> Sample,
{
    let mut acc = [0.0f32; 4];
    for (tap, &weight) in kernel.iter().enumerate() {
        let value = sample(tap);
        for (channel, component) in acc.iter_mut().zip(value) {
            *channel += weight * component;
        }
    }
    acc
}
