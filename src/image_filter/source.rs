//! # 源图与输出模型
//!
//! ## 设计思路
//!
//! 将“调用方拥有的输入”和“每次调用新分配的输出”解耦：
//! - `SourceImage` 表示不可变源图，流水线只读
//! - `FilteredImage` 表示一次滤镜调用的结果，尺寸恒等于源图

use image::{DynamicImage, Rgba, RgbaImage};

/// 不可变源图（RGBA8）。
///
/// 允许表示 0 尺寸图像，是否合法由流水线判定。
#[derive(Debug, Clone, PartialEq)]
pub struct SourceImage {
    pixels: RgbaImage,
}

impl SourceImage {
    pub fn from_rgba(pixels: RgbaImage) -> Self {
        Self { pixels }
    }

    /// 任意色彩格式统一转换为 RGBA8。
    pub fn from_dynamic(image: DynamicImage) -> Self {
        Self {
            pixels: image.into_rgba8(),
        }
    }

    /// 纯色源图。
    pub fn filled(width: u32, height: u32, color: [u8; 4]) -> Self {
        Self {
            pixels: RgbaImage::from_pixel(width, height, Rgba(color)),
        }
    }

    /// 占位底图：`size x size` 纯黑不透明方块。
    pub fn placeholder(size: u32) -> Self {
        Self::filled(size, size, [0, 0, 0, 255])
    }

    pub fn width(&self) -> u32 {
        self.pixels.width()
    }

    pub fn height(&self) -> u32 {
        self.pixels.height()
    }

    pub fn dimensions(&self) -> (u32, u32) {
        self.pixels.dimensions()
    }

    pub fn as_rgba(&self) -> &RgbaImage {
        &self.pixels
    }
}

/// 滤镜输出（RGBA8），每次调用新分配，不做缓存与复用。
#[derive(Debug, Clone, PartialEq)]
pub struct FilteredImage {
    pixels: RgbaImage,
}

impl FilteredImage {
    pub(crate) fn new(pixels: RgbaImage) -> Self {
        Self { pixels }
    }

    pub fn width(&self) -> u32 {
        self.pixels.width()
    }

    pub fn height(&self) -> u32 {
        self.pixels.height()
    }

    pub fn dimensions(&self) -> (u32, u32) {
        self.pixels.dimensions()
    }

    pub fn as_rgba(&self) -> &RgbaImage {
        &self.pixels
    }

    pub fn into_rgba(self) -> RgbaImage {
        self.pixels
    }

    /// 把输出当作下一次调用的源图（例如叠加多次滤镜）。
    pub fn to_source(&self) -> SourceImage {
        SourceImage::from_rgba(self.pixels.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{GrayImage, Luma};

    #[test]
    fn placeholder_is_opaque_black_square() {
        let source = SourceImage::placeholder(400);
        assert_eq!(source.dimensions(), (400, 400));
        assert!(source.as_rgba().pixels().all(|p| p.0 == [0, 0, 0, 255]));
    }

    #[test]
    fn dynamic_gray_is_expanded_to_rgba() {
        let gray = GrayImage::from_pixel(3, 2, Luma([120]));
        let source = SourceImage::from_dynamic(DynamicImage::ImageLuma8(gray));
        assert_eq!(source.dimensions(), (3, 2));
        assert_eq!(source.as_rgba().get_pixel(2, 1).0, [120, 120, 120, 255]);
    }

    #[test]
    fn zero_sized_source_is_representable() {
        let source = SourceImage::filled(0, 0, [0, 0, 0, 0]);
        assert_eq!(source.dimensions(), (0, 0));
    }
}
