//! # 图片处理工具 — 库入口
//!
//! ## 架构总览
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────┐
//! │              前端（滑块 / 马赛克按钮 / CLI）              │
//! └───────┬──────────────────────────────────────────────────┘
//!         ↕ Result<T, AppError>
//! ┌───────┼──────────────────────────────────────────────────┐
//! │       ↕            后端 (Rust)                           │
//! │                                                          │
//! │  ┌─ error ────── AppError (统一错误类型)                  │
//! │  │                                                       │
//! │  ├─ cli ──────── blur / mosaic / sweep 子命令             │
//! │  │                                                       │
//! │  └─ image_filter                                         │
//! │      ├─ service     底图·配置·当前输出                    │
//! │      ├─ pipeline    表面→滤镜→裁剪→缩放→栅格化             │
//! │      ├─ blur/mosaic 每次新建的滤镜实例                    │
//! │      └─ loader      文件加载与保存                        │
//! └──────────────────────────────────────────────────────────┘
//! ```
//!
//! ## 模块职责
//!
//! | 模块 | 职责 |
//! |------|------|
//! | [`error`] | 统一错误类型 `AppError`，命令行入口的返回类型 |
//! | [`image_filter`] | 有界滤镜流水线：输出尺寸恒等于源图尺寸 |
//! | [`cli`] | 命令行参数解析与子命令执行 |

pub mod cli;
pub mod error;
pub mod image_filter;
