//! # 错误模型模块
//!
//! ## 设计思路
//!
//! 使用单一错误枚举承载滤镜链路中的所有错误来源，避免字符串拼接式错误处理。
//! 通过 `thiserror` 保持人类可读错误，同时让调用侧可按分支匹配。
//!
//! 两类核心错误：
//! - `InvalidInput`：源图为空尺寸、滤镜参数无法构造滤镜。调用方自行决定跳过渲染或显示占位图。
//! - `Processing`：其余处理期失败（资源上限、缓冲异常等），只影响本次调用。
//!
//! 其余分支只出现在文件加载/保存边界上。

/// 图片滤镜统一错误类型。
///
/// 该类型会在二进制入口被上转为 `AppError`。
#[derive(Debug, thiserror::Error)]
pub enum ImageError {
    #[error("输入无效：{0}")]
    InvalidInput(String),

    #[error("处理失败：{0}")]
    Processing(String),

    #[error("格式错误：{0}")]
    InvalidFormat(String),

    #[error("解码错误：{0}")]
    Decode(String),

    #[error("编码错误：{0}")]
    Encode(String),

    #[error("文件错误：{0}")]
    FileSystem(String),
}

impl ImageError {
    /// 稳定错误码，供日志与外部调用方匹配。
    pub fn code(&self) -> &'static str {
        match self {
            Self::InvalidInput(_) => "E_INVALID_INPUT",
            Self::Processing(_) => "E_PROCESSING",
            Self::InvalidFormat(_) => "E_INVALID_FORMAT",
            Self::Decode(_) => "E_DECODE",
            Self::Encode(_) => "E_ENCODE",
            Self::FileSystem(_) => "E_FILE_SYSTEM",
        }
    }

    /// 错误所属阶段：`filter` 为流水线本身，`io` 为加载/保存边界。
    pub fn stage(&self) -> &'static str {
        match self {
            Self::InvalidInput(_) | Self::Processing(_) => "filter",
            Self::InvalidFormat(_) | Self::Decode(_) | Self::Encode(_) | Self::FileSystem(_) => "io",
        }
    }
}
