//! # 加载与保存模块
//!
//! ## 设计思路
//!
//! 流水线核心不做任何 I/O；本模块只服务于二进制入口与测试：
//! 把文件/字节转换为 `SourceImage`，把 `FilteredImage` 写回磁盘。
//! 校验尽量前置，尽快失败，减少不必要内存与 CPU 消耗。
//!
//! ## 实现思路
//!
//! - 文件：存在性 + metadata 体积限制 + 读取。
//! - 字节：签名（magic bytes）校验 → 仅读 header 获取宽高 → 像素上限 → 完整解码。
//! - 保存：按扩展名推断格式。

use std::io::Cursor;
use std::path::Path;

use image::{GenericImageView, ImageReader};

use super::{FilterConfig, FilteredImage, ImageError, SourceImage};

/// 从本地路径加载源图。
pub fn load_source_from_file(path: &Path, config: &FilterConfig) -> Result<SourceImage, ImageError> {
    log::info!("📁 开始读取本地图片 - 路径: {}", path.display());

    if !path.exists() {
        return Err(ImageError::FileSystem(format!("文件不存在：{}", path.display())));
    }

    let metadata = std::fs::metadata(path)
        .map_err(|e| ImageError::FileSystem(format!("无法读取文件信息：{}", e)))?;

    if metadata.len() > config.max_file_size {
        return Err(ImageError::Processing(format!(
            "文件过大：{:.2} MB（限制：{:.2} MB）",
            metadata.len() as f64 / 1024.0 / 1024.0,
            config.max_file_size as f64 / 1024.0 / 1024.0
        )));
    }

    let bytes = std::fs::read(path)
        .map_err(|e| ImageError::FileSystem(format!("无法读取图片文件：{}", e)))?;

    load_source_from_bytes(&bytes, config)
}

/// 从内存字节加载源图。
pub fn load_source_from_bytes(bytes: &[u8], config: &FilterConfig) -> Result<SourceImage, ImageError> {
    validate_image_signature(bytes)?;

    let (header_width, header_height) = inspect_dimensions_from_memory(bytes)?;
    validate_pixel_limits(config, header_width, header_height)?;

    let decoded = image::load_from_memory(bytes)
        .map_err(|e| ImageError::Decode(format!("图片解码失败：{}", e)))?;

    let (width, height) = decoded.dimensions();
    validate_pixel_limits(config, width, height)?;

    log::info!("✅ 图片解码成功 - 尺寸: {}x{} 色彩: {:?}", width, height, decoded.color());

    Ok(SourceImage::from_dynamic(decoded))
}

/// 保存滤镜输出，格式由扩展名决定。
pub fn save_filtered(image: &FilteredImage, path: &Path) -> Result<(), ImageError> {
    image
        .as_rgba()
        .save(path)
        .map_err(|e| ImageError::Encode(format!("保存图片失败 {}：{}", path.display(), e)))?;

    log::info!("💾 已保存 {}x{} -> {}", image.width(), image.height(), path.display());
    Ok(())
}

/// 仅通过内存中的图片头信息读取宽高。
///
/// 用于在完整解码前做像素限制检查。
fn inspect_dimensions_from_memory(bytes: &[u8]) -> Result<(u32, u32), ImageError> {
    let reader = ImageReader::new(Cursor::new(bytes))
        .with_guessed_format()
        .map_err(|e| ImageError::InvalidFormat(format!("无法识别图片格式：{}", e)))?;

    reader
        .into_dimensions()
        .map_err(|e| ImageError::InvalidFormat(format!("无法读取图片尺寸：{}", e)))
}

fn validate_pixel_limits(config: &FilterConfig, width: u32, height: u32) -> Result<(), ImageError> {
    let pixels = width as u64 * height as u64;

    if pixels > config.max_source_pixels {
        return Err(ImageError::Processing(format!(
            "图片像素过大：{} 像素（限制：{} 像素）",
            pixels, config.max_source_pixels
        )));
    }

    Ok(())
}

/// 通过文件签名（magic bytes）校验输入是否为图片。
fn validate_image_signature(bytes: &[u8]) -> Result<(), ImageError> {
    if bytes.is_empty() {
        return Err(ImageError::InvalidFormat("图片内容为空".to_string()));
    }

    let kind = infer::get(bytes)
        .ok_or_else(|| ImageError::InvalidFormat("无法识别图片类型".to_string()))?;

    if kind.matcher_type() != infer::MatcherType::Image {
        return Err(ImageError::InvalidFormat(format!(
            "文件签名不是图片类型：{}",
            kind.mime_type()
        )));
    }

    Ok(())
}
