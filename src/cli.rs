//! # 命令行入口
//!
//! 代替原先的界面层：`blur` 对应拖动滑块，`mosaic` 对应马赛克按钮，
//! `sweep` 把滑块从头拖到尾（或逐级降低马赛克缩放率），每一步输出一张图。

use std::fs;
use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand, ValueEnum};
use serde::{Deserialize, Serialize};

use crate::error::AppError;
use crate::image_filter::loader::{load_source_from_file, save_filtered};
use crate::image_filter::{FilterConfig, FilterKind, FilterQualityProfile, ImageProcessingService, SourceImage};

#[derive(Debug, Parser)]
#[command(name = "image-processor", version, about = "Gaussian blur / mosaic filter pipeline")]
pub struct Cli {
    /// JSON config file; missing fields fall back to defaults
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Performance profile: quality, balanced or speed
    #[arg(long, global = true)]
    pub profile: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Blur the image with the given radius
    Blur {
        #[arg(long, allow_negative_numbers = true)]
        radius: f32,
        /// Source image (defaults to the placeholder square)
        #[arg(short, long)]
        input: Option<PathBuf>,
        #[arg(short, long)]
        output: PathBuf,
    },
    /// Pixelate the image at a reduced rasterization scale
    Mosaic {
        /// Rasterization scale in (0, 1]; defaults to the configured value
        #[arg(long)]
        scale: Option<f32>,
        #[arg(short, long)]
        input: Option<PathBuf>,
        #[arg(short, long)]
        output: PathBuf,
    },
    /// Render every step of a slider drag (blur) or mosaic ramp into a directory
    Sweep {
        #[arg(value_enum)]
        filter: SweepFilter,
        #[arg(short, long)]
        input: Option<PathBuf>,
        #[arg(long)]
        output_dir: PathBuf,
        #[arg(long, default_value_t = 10)]
        steps: u32,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum SweepFilter {
    Blur,
    Mosaic,
}

impl SweepFilter {
    fn kind(self) -> FilterKind {
        match self {
            Self::Blur => FilterKind::GaussianBlur,
            Self::Mosaic => FilterKind::Mosaic,
        }
    }
}

/// `sweep` 输出目录中的 `manifest.json`。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SweepManifest {
    pub filter: FilterKind,
    pub width: u32,
    pub height: u32,
    pub frames: Vec<SweepFrame>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SweepFrame {
    pub index: u32,
    pub parameter: f32,
    pub file: String,
}

pub const MANIFEST_FILE: &str = "manifest.json";

pub fn run(cli: Cli) -> Result<(), AppError> {
    let mut config = match &cli.config {
        Some(path) => FilterConfig::from_json_file(path)?,
        None => FilterConfig::default(),
    };
    if let Some(profile) = &cli.profile {
        config.apply_performance_profile(FilterQualityProfile::parse(profile)?);
    }

    match cli.command {
        Command::Blur { radius, input, output } => {
            let service = build_service(input.as_deref(), config)?;
            let image = service.on_slider_changed(radius)?;
            save_filtered(&image, &output)?;
        }
        Command::Mosaic { scale, input, output } => {
            if let Some(scale) = scale {
                config.mosaic_scale = scale;
            }
            let service = build_service(input.as_deref(), config)?;
            let image = service.apply_mosaic()?;
            save_filtered(&image, &output)?;
        }
        Command::Sweep {
            filter,
            input,
            output_dir,
            steps,
        } => {
            let service = build_service(input.as_deref(), config)?;
            let manifest = sweep(&service, filter, steps, &output_dir)?;
            log::info!(
                "✅ 扫描完成 - {} 帧 -> {}",
                manifest.frames.len(),
                output_dir.display()
            );
        }
    }

    Ok(())
}

fn build_service(input: Option<&Path>, config: FilterConfig) -> Result<ImageProcessingService, AppError> {
    let source = match input {
        Some(path) => load_source_from_file(path, &config)?,
        None => SourceImage::placeholder(config.image_size),
    };
    Ok(ImageProcessingService::with_config(source, config))
}

/// 扫描参数：blur 从滑块下限到上限，mosaic 从 1.0 降到配置缩放率，共 `steps + 1` 个点。
pub fn sweep_parameters(filter: SweepFilter, config: &FilterConfig, steps: u32) -> Vec<f32> {
    let steps = steps.max(1);
    let (from, to) = match filter {
        SweepFilter::Blur => (config.slider_min, config.slider_max),
        SweepFilter::Mosaic => (1.0, config.mosaic_scale),
    };

    (0..=steps)
        .map(|i| from + (to - from) * i as f32 / steps as f32)
        .collect()
}

/// 依次渲染每个参数并写出 PNG 与清单。
pub fn sweep(
    service: &ImageProcessingService,
    filter: SweepFilter,
    steps: u32,
    output_dir: &Path,
) -> Result<SweepManifest, AppError> {
    fs::create_dir_all(output_dir)
        .map_err(|e| AppError::Storage(format!("创建输出目录 '{}' 失败: {}", output_dir.display(), e)))?;

    let config = service.config_snapshot()?;
    let kind = filter.kind();
    let (width, height) = service.base_image().dimensions();
    let mut frames = Vec::new();

    for (index, parameter) in sweep_parameters(filter, &config, steps).into_iter().enumerate() {
        let index = index as u32;
        let image = service.render(kind, parameter)?;
        let file = format!("{}_{:03}.png", kind.as_str(), index);
        save_filtered(&image, &output_dir.join(&file))?;
        frames.push(SweepFrame { index, parameter, file });
    }

    let manifest = SweepManifest {
        filter: kind,
        width,
        height,
        frames,
    };
    fs::write(output_dir.join(MANIFEST_FILE), serde_json::to_string_pretty(&manifest)?)?;

    Ok(manifest)
}
