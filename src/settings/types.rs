//! 设置数据结构定义
//!
//! 定义设置文件的结构体和验证逻辑

use serde::{Deserialize, Serialize};

/// 单个监控档案的原始定义
///
/// name 和 hostname 两个字段都必须存在且非空，任何一条定义非法
/// 都会使整次加载失败，不做跳过处理。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProfileDefinition {
    /// 显示名称
    pub name: String,
    /// 原始主机名，协议前缀和末尾斜杠在档案构造时归一化
    pub hostname: String,
}

/// 主设置结构
///
/// 设置文件只要求 `profiles` 键存在（可以为空数组），其余键都有
/// 默认值，`{"profiles":[]}` 是一份合法的最小设置。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    /// 监控档案定义列表，顺序决定菜单显示顺序
    pub profiles: Vec<ProfileDefinition>,
    /// 自动刷新间隔（秒）
    #[serde(default = "default_refresh_interval")]
    pub refresh_interval_seconds: u64,
    /// 单次请求超时时间（秒）
    #[serde(default = "default_request_timeout")]
    pub request_timeout_seconds: u64,
    /// 刷新失败策略：true为整体中止，false为隔离失败档案继续聚合
    #[serde(default = "default_fail_fast")]
    pub fail_fast: bool,
    /// 日志级别
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            profiles: Vec::new(),
            refresh_interval_seconds: default_refresh_interval(),
            request_timeout_seconds: default_request_timeout(),
            fail_fast: default_fail_fast(),
            log_level: default_log_level(),
        }
    }
}

// 默认值函数
fn default_refresh_interval() -> u64 {
    60
}
fn default_request_timeout() -> u64 {
    10
}
fn default_fail_fast() -> bool {
    true
}
fn default_log_level() -> String {
    "info".to_string()
}

/// 设置验证函数
///
/// # 参数
/// * `settings` - 要验证的设置
///
/// # 返回
/// * `Result<(), String>` - 验证结果，错误时返回错误信息
pub fn validate_settings(settings: &Settings) -> Result<(), String> {
    if settings.refresh_interval_seconds == 0 {
        return Err("刷新间隔不能为0".to_string());
    }

    if settings.request_timeout_seconds == 0 {
        return Err("请求超时时间不能为0".to_string());
    }

    let valid_log_levels = ["debug", "info", "warn", "error"];
    if !valid_log_levels.contains(&settings.log_level.as_str()) {
        return Err(format!(
            "无效的日志级别: {}，支持的级别: {:?}",
            settings.log_level, valid_log_levels
        ));
    }

    // 任何一条非法定义都使整次加载失败
    for definition in &settings.profiles {
        if definition.name.trim().is_empty() {
            return Err("档案缺少必填字段 name 或其值为空".to_string());
        }
        if definition.hostname.trim().is_empty() {
            return Err(format!("档案 {} 缺少必填字段 hostname 或其值为空", definition.name));
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_test_settings() -> Settings {
        Settings {
            profiles: vec![
                ProfileDefinition {
                    name: "GitHub".to_string(),
                    hostname: "https://www.githubstatus.com".to_string(),
                },
                ProfileDefinition {
                    name: "Dropbox".to_string(),
                    hostname: "status.dropbox.com".to_string(),
                },
            ],
            ..Settings::default()
        }
    }

    #[test]
    fn test_settings_serialization() {
        let settings = create_test_settings();

        let serialized = serde_json::to_string_pretty(&settings).expect("序列化失败");
        assert!(!serialized.is_empty());

        let deserialized: Settings = serde_json::from_str(&serialized).expect("反序列化失败");
        assert_eq!(settings, deserialized);
    }

    #[test]
    fn test_minimal_settings_parse_with_defaults() {
        // 只有profiles键的最小设置是合法的
        let settings: Settings = serde_json::from_str(r#"{"profiles":[]}"#).unwrap();
        assert!(settings.profiles.is_empty());
        assert_eq!(settings.refresh_interval_seconds, 60);
        assert_eq!(settings.request_timeout_seconds, 10);
        assert!(settings.fail_fast);
        assert_eq!(settings.log_level, "info");
    }

    #[test]
    fn test_missing_hostname_is_parse_error() {
        let result: Result<Settings, _> =
            serde_json::from_str(r#"{"profiles":[{"name":"A"}]}"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_settings_validation() {
        let settings = create_test_settings();
        assert!(validate_settings(&settings).is_ok());
    }

    #[test]
    fn test_settings_validation_empty_profiles_is_legal() {
        // 零档案是合法配置，聚合级别由控制器处理
        let settings = Settings::default();
        assert!(validate_settings(&settings).is_ok());
    }

    #[test]
    fn test_settings_validation_empty_name() {
        let mut settings = create_test_settings();
        settings.profiles[0].name = "  ".to_string();

        let result = validate_settings(&settings);
        assert!(result.is_err());
        assert!(result.unwrap_err().contains("name"));
    }

    #[test]
    fn test_settings_validation_empty_hostname() {
        let mut settings = create_test_settings();
        settings.profiles[1].hostname = String::new();

        let result = validate_settings(&settings);
        assert!(result.is_err());
        assert!(result.unwrap_err().contains("hostname"));
    }

    #[test]
    fn test_settings_validation_zero_interval() {
        let mut settings = create_test_settings();
        settings.refresh_interval_seconds = 0;

        let result = validate_settings(&settings);
        assert!(result.is_err());
        assert!(result.unwrap_err().contains("刷新间隔"));
    }

    #[test]
    fn test_settings_validation_invalid_log_level() {
        let mut settings = create_test_settings();
        settings.log_level = "verbose".to_string();

        let result = validate_settings(&settings);
        assert!(result.is_err());
        assert!(result.unwrap_err().contains("日志级别"));
    }
}
