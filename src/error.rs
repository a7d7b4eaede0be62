//! 错误处理模块
//!
//! 定义应用程序的统一错误类型

use thiserror::Error;

/// Statuspage Tray 应用程序的主要错误类型
#[derive(Error, Debug)]
pub enum StatusTrayError {
    /// 配置相关错误
    #[error("配置错误: {0}")]
    Config(#[from] ConfigError),

    /// 状态抓取相关错误
    #[error("状态抓取错误: {0}")]
    Fetch(#[from] FetchError),

    /// 严重级别相关错误
    #[error("严重级别错误: {0}")]
    Severity(#[from] SeverityError),

    /// 控制器尚未加载任何监控档案
    #[error("控制器尚未初始化，请先加载监控档案")]
    NotInitialized,

    /// IO错误
    #[error("IO错误: {0}")]
    Io(#[from] std::io::Error),

    /// JSON序列化/反序列化错误
    #[error("JSON错误: {0}")]
    Json(#[from] serde_json::Error),

    /// 其他错误
    #[error("其他错误: {0}")]
    Other(#[from] anyhow::Error),
}

/// 配置错误类型
#[derive(Error, Debug)]
pub enum ConfigError {
    /// 设置文件解析错误
    #[error("设置文件解析失败: {0}")]
    ParseError(String),

    /// 设置验证错误
    #[error("设置验证失败: {0}")]
    ValidationError(String),

    /// 环境变量替换错误
    #[error("环境变量替换失败: {var}")]
    EnvVarError { var: String },

    /// 设置文件读写错误
    #[error("设置文件读写失败: {0}")]
    Io(#[from] std::io::Error),
}

/// 状态抓取错误类型
#[derive(Error, Debug)]
pub enum FetchError {
    /// HTTP传输错误（连接拒绝、超时、DNS、TLS等）
    #[error("HTTP请求失败: {0}")]
    RequestError(#[from] reqwest::Error),

    /// 响应体解码错误（非JSON、缺少status.indicator字段或取值非法）
    #[error("响应体解码失败: {0}")]
    DecodeError(String),
}

/// 严重级别错误类型
#[derive(Error, Debug)]
pub enum SeverityError {
    /// 厂商状态码不在四个合法取值之内
    #[error("非法的厂商状态码 '{value}'，合法取值: none/minor/major/critical")]
    InvalidVendorStatus { value: String },

    /// 对空序列求最差严重级别
    #[error("严重级别序列为空，无法求最差级别")]
    EmptyInput,
}

/// 结果类型别名
pub type Result<T> = std::result::Result<T, StatusTrayError>;
