//! Statuspage Tray - 菜单栏状态页监控工具
//!
//! 这是一个用Rust编写的菜单栏状态页监控工具，支持：
//! - 轮询多个 statuspage 约定的状态端点
//! - 四级严重级别映射与最差级别聚合
//! - JSON设置文件（缺失时自动创建）
//! - 托盘渲染与平台副作用的trait注入
//! - 结构化日志记录

pub mod app;
pub mod cli;
pub mod controller;
pub mod error;
pub mod logging;
pub mod menu;
pub mod profile;
pub mod settings;
pub mod severity;

// 重新导出主要类型
pub use controller::{FailurePolicy, RefreshReport, StatusController};
pub use error::StatusTrayError;
pub use profile::{HttpStatusFetcher, ServiceProfile, StatusFetcher};
pub use settings::{ProfileDefinition, Settings};
pub use severity::{Icon, Severity};

/// 应用程序版本信息
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// 应用程序名称
pub const APP_NAME: &str = env!("CARGO_PKG_NAME");

/// 应用程序描述
pub const APP_DESCRIPTION: &str = env!("CARGO_PKG_DESCRIPTION");
