//! 设置管理模块
//!
//! 提供JSON设置文件解析、验证和缺失文件自动创建功能

pub mod loader;
pub mod types;

// 重新导出主要类型
pub use loader::{get_default_settings_path, JsonSettingsLoader, SettingsLoader};
pub use types::{validate_settings, ProfileDefinition, Settings};
