//! # 图片滤镜模块（image_filter）
//!
//! ## 设计思路
//!
//! 该模块把“源图 → 滤镜 → 裁剪 → 缩放 → 栅格化”按职责拆分为多个子模块，避免单文件膨胀与耦合。
//!
//! - `service`：承载底图、配置与当前显示输出（`ImageProcessingService`）
//! - `pipeline`：编排整条处理流水线（`FilterPipeline`）
//! - `filter`：滤镜抽象与种类（`ImageFilter` / `FilterKind`）
//! - `blur` / `mosaic`：具体滤镜
//! - `surface`：滤镜表面与范围（`FilterSurface` / `Extent`）
//! - `rescale`：缩放（fast_image_resize + image 回退）
//! - `loader`：文件/字节加载与保存
//! - `config/error/source`：配置、错误、输入输出模型
//!
//! ## 新同事快速上手
//!
//! ```text
//! 滑块 / CLI
//!    ↓
//! service.rs（配置快照 + 保留上一张输出）
//!    ↓
//! pipeline.rs（统一编排 + 阶段耗时日志）
//!    ├─ surface.rs（源图 → 浮点表面，裁剪，栅格化）
//!    ├─ filter.rs → blur.rs / mosaic.rs（每次新建滤镜）
//!    └─ rescale.rs（缩放回源图尺寸）
//!    ↓
//! FilteredImage → DisplaySurface
//! ```

pub mod blur;
mod config;
mod error;
pub mod filter;
pub mod loader;
pub mod mosaic;
mod pipeline;
pub mod rescale;
mod service;
mod source;
pub mod surface;

pub use config::{DEFAULT_IMAGE_SIZE, DEFAULT_MOSAIC_SCALE, FilterConfig, FilterQualityProfile, RescaleFilter};
pub use error::ImageError;
pub use filter::{FilterKind, ImageFilter};
pub use pipeline::FilterPipeline;
pub use service::{DisplaySurface, ImageProcessingService};
pub use source::{FilteredImage, SourceImage};
pub use surface::{Extent, FilterSurface};
