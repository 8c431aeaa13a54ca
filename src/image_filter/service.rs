//! # 服务层（可注入状态）
//!
//! ## 设计思路
//!
//! `ImageProcessingService` 承载原先散落在界面控制器里的状态：底图、配置、当前显示的输出。
//! 底图与配置都是实例字段并显式传入流水线，不再依赖全局单例。
//! 好处：
//! 1. 生命周期清晰（由调用方统一管理）
//! 2. 测试可创建独立实例，减少共享状态副作用
//!
//! ## 实现思路
//!
//! - 配置通过 `RwLock<FilterConfig>` 支持运行时切档；单次渲染使用同一配置快照。
//! - 每次渲染都新建 `FilterPipeline`，滤镜实例也随之新建。
//! - 渲染成功才替换已显示输出并通知显示面；失败时保留上一张输出。

use std::sync::{Arc, Mutex, RwLock};

use super::filter::FilterKind;
use super::{FilterConfig, FilterPipeline, FilterQualityProfile, FilteredImage, ImageError, SourceImage};

/// 显示面：接收新的滤镜输出并负责渲染，何时渲染由实现决定。
pub trait DisplaySurface: Send + Sync {
    fn present(&self, image: Arc<FilteredImage>);
}

/// 图片处理服务状态。
pub struct ImageProcessingService {
    base_image: SourceImage,
    config: RwLock<FilterConfig>,
    displayed: Mutex<Option<Arc<FilteredImage>>>,
    display: Option<Arc<dyn DisplaySurface>>,
}

impl ImageProcessingService {
    /// 使用默认配置创建服务。
    ///
    /// # 示例
    /// ```rust
    /// use image_processor::image_filter::{ImageProcessingService, SourceImage};
    ///
    /// let service = ImageProcessingService::new(SourceImage::placeholder(32));
    /// let output = service.on_slider_changed(4.0)?;
    /// assert_eq!(output.dimensions(), (32, 32));
    /// # Ok::<(), image_processor::image_filter::ImageError>(())
    /// ```
    pub fn new(base_image: SourceImage) -> Self {
        Self::with_config(base_image, FilterConfig::default())
    }

    /// 使用自定义配置创建服务。
    pub fn with_config(base_image: SourceImage, config: FilterConfig) -> Self {
        Self {
            base_image,
            config: RwLock::new(config),
            displayed: Mutex::new(None),
            display: None,
        }
    }

    /// 挂接显示面。
    pub fn with_display(mut self, display: Arc<dyn DisplaySurface>) -> Self {
        self.display = Some(display);
        self
    }

    pub fn base_image(&self) -> &SourceImage {
        &self.base_image
    }

    /// 获取配置快照。
    pub fn config_snapshot(&self) -> Result<FilterConfig, ImageError> {
        self.config
            .read()
            .map(|cfg| cfg.clone())
            .map_err(|_| ImageError::Processing("配置读取锁已中毒".to_string()))
    }

    /// 当前显示中的输出（最近一次成功渲染）。
    pub fn displayed(&self) -> Result<Option<Arc<FilteredImage>>, ImageError> {
        self.displayed
            .lock()
            .map(|guard| guard.clone())
            .map_err(|_| ImageError::Processing("显示输出锁已中毒".to_string()))
    }

    /// 滑块值变化：按新半径重新模糊底图。
    pub fn on_slider_changed(&self, value: f32) -> Result<Arc<FilteredImage>, ImageError> {
        self.render(FilterKind::GaussianBlur, value)
    }

    /// 马赛克按钮：按配置中的缩放率渲染。
    pub fn apply_mosaic(&self) -> Result<Arc<FilteredImage>, ImageError> {
        let scale = self.config_snapshot()?.mosaic_scale;
        self.render(FilterKind::Mosaic, scale)
    }

    /// 对底图渲染一次指定滤镜。
    pub fn render(&self, kind: FilterKind, parameter: f32) -> Result<Arc<FilteredImage>, ImageError> {
        let config = self.config_snapshot()?;
        let pipeline = FilterPipeline::new(config);

        let output = match pipeline.apply_filter(&self.base_image, kind, parameter) {
            Ok(output) => Arc::new(output),
            Err(err) => {
                log::warn!(
                    "⚠️ 渲染失败，保留上一张输出 - {}({}) stage={} code={} {}",
                    kind.as_str(),
                    parameter,
                    err.stage(),
                    err.code(),
                    err
                );
                return Err(err);
            }
        };

        {
            let mut guard = self
                .displayed
                .lock()
                .map_err(|_| ImageError::Processing("显示输出锁已中毒".to_string()))?;
            *guard = Some(Arc::clone(&output));
        }

        if let Some(display) = &self.display {
            display.present(Arc::clone(&output));
        }

        Ok(output)
    }

    /// 设置性能档位。
    pub fn set_performance_profile(&self, profile: &str) -> Result<(), ImageError> {
        let profile = FilterQualityProfile::parse(profile)?;
        let mut config = self
            .config
            .write()
            .map_err(|_| ImageError::Processing("配置写入锁已中毒".to_string()))?;
        config.apply_performance_profile(profile);

        log::info!(
            "⚙️ 已切换滤镜性能档位：{:?}（kernel_sigma_extent={}, rescale={:?}, mosaic_min={:?}）",
            profile,
            config.kernel_sigma_extent,
            config.rescale_filter,
            config.mosaic_minification_filter
        );

        Ok(())
    }

    /// 获取当前生效性能档位（字符串）。
    pub fn get_performance_profile(&self) -> Result<String, ImageError> {
        let config = self
            .config
            .read()
            .map_err(|_| ImageError::Processing("配置读取锁已中毒".to_string()))?;
        Ok(config.infer_performance_profile().as_str().to_string())
    }
}
