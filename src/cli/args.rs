//! 命令行参数定义
//!
//! 使用clap定义应用程序的命令行接口

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// Statuspage Tray - 菜单栏状态页监控工具
#[derive(Parser, Debug, Clone)]
#[command(
    name = "statuspage-tray",
    version = crate::VERSION,
    about = crate::APP_DESCRIPTION,
    long_about = None
)]
pub struct Args {
    /// 设置文件路径
    #[arg(
        short,
        long,
        value_name = "FILE",
        help = "设置文件路径",
        env = "STATUSPAGE_TRAY_CONFIG"
    )]
    pub config: Option<PathBuf>,

    /// 日志级别
    #[arg(
        short,
        long,
        value_enum,
        default_value = "info",
        help = "日志级别",
        env = "STATUSPAGE_TRAY_LOG_LEVEL"
    )]
    pub log_level: LogLevel,

    /// 子命令
    #[command(subcommand)]
    pub command: Commands,
}

/// 日志级别枚举
#[derive(ValueEnum, Clone, Debug, PartialEq)]
pub enum LogLevel {
    /// 调试级别
    Debug,
    /// 信息级别
    Info,
    /// 警告级别
    Warn,
    /// 错误级别
    Error,
}

impl From<LogLevel> for log::LevelFilter {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Debug => log::LevelFilter::Debug,
            LogLevel::Info => log::LevelFilter::Info,
            LogLevel::Warn => log::LevelFilter::Warn,
            LogLevel::Error => log::LevelFilter::Error,
        }
    }
}

impl std::fmt::Display for LogLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LogLevel::Debug => write!(f, "debug"),
            LogLevel::Info => write!(f, "info"),
            LogLevel::Warn => write!(f, "warn"),
            LogLevel::Error => write!(f, "error"),
        }
    }
}

/// 子命令定义
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// 启动状态监控主循环
    Run {
        /// 刷新间隔（秒），覆盖设置文件中的值
        #[arg(
            short,
            long,
            value_name = "SECONDS",
            help = "刷新间隔（秒）",
            env = "STATUSPAGE_TRAY_INTERVAL"
        )]
        interval: Option<u64>,

        /// 任一端点失败即中止整个刷新过程
        #[arg(long, help = "任一端点失败即中止整个刷新过程")]
        fail_fast: bool,

        /// 隔离失败端点并继续聚合其余档案
        #[arg(
            long,
            conflicts_with = "fail_fast",
            help = "隔离失败端点并继续聚合其余档案"
        )]
        isolate: bool,
    },

    /// 执行一次性刷新并输出各档案状态
    Check {
        /// 输出格式
        #[arg(short, long, value_enum, default_value = "text", help = "输出格式")]
        format: OutputFormat,

        /// 单次请求超时时间（秒），覆盖设置文件中的值
        #[arg(short, long, value_name = "SECONDS", help = "单次请求超时时间（秒）")]
        timeout: Option<u64>,
    },

    /// 验证设置文件
    Validate {
        /// 设置文件路径（默认使用全局--config或默认路径）
        #[arg(value_name = "FILE", help = "设置文件路径")]
        settings_path: Option<PathBuf>,
    },

    /// 初始化设置文件
    Init {
        /// 设置文件路径（默认使用全局--config或默认路径）
        #[arg(value_name = "FILE", help = "设置文件路径")]
        settings_path: Option<PathBuf>,

        /// 是否覆盖现有文件
        #[arg(short, long, help = "覆盖现有文件")]
        force: bool,
    },

    /// 显示版本信息
    Version {
        /// 输出格式
        #[arg(short, long, value_enum, default_value = "text", help = "输出格式")]
        format: OutputFormat,
    },
}

/// 输出格式枚举
#[derive(ValueEnum, Clone, Debug, PartialEq)]
pub enum OutputFormat {
    /// 文本格式
    Text,
    /// JSON格式
    Json,
}

impl Args {
    /// 获取设置文件路径
    pub fn get_settings_path(&self) -> PathBuf {
        if let Some(config) = self.config.clone() {
            config
        } else {
            crate::settings::get_default_settings_path()
        }
    }
}
