//! 设置加载器实现
//!
//! 提供JSON设置文件解析、环境变量替换和缺失文件自动创建功能

use crate::error::{ConfigError, Result};
use crate::settings::types::{validate_settings, Settings};
use async_trait::async_trait;
use regex::Regex;
use std::path::Path;
use tracing::info;

/// 缺失设置文件时写入的零档案模板
const DEFAULT_SETTINGS_JSON: &str = r#"{
  "profiles": []
}
"#;

/// 设置加载器trait，定义加载接口
#[async_trait]
pub trait SettingsLoader: Send + Sync {
    /// 从文件加载设置
    ///
    /// 文件不存在时写入零档案模板后按模板内容加载，而不是报错。
    ///
    /// # 参数
    /// * `path` - 设置文件路径
    ///
    /// # 返回
    /// * `Result<Settings>` - 加载的设置或错误
    async fn load_from_file<P: AsRef<Path> + Send>(&self, path: P) -> Result<Settings>;

    /// 从字符串加载设置
    ///
    /// # 参数
    /// * `content` - 设置文件内容
    ///
    /// # 返回
    /// * `Result<Settings>` - 加载的设置或错误
    async fn load_from_string(&self, content: &str) -> Result<Settings>;

    /// 验证设置
    ///
    /// # 参数
    /// * `settings` - 要验证的设置
    ///
    /// # 返回
    /// * `Result<()>` - 验证结果
    fn validate(&self, settings: &Settings) -> Result<()>;
}

/// JSON设置加载器实现
#[derive(Debug, Clone)]
pub struct JsonSettingsLoader {
    /// 是否启用环境变量替换
    enable_env_substitution: bool,
}

impl JsonSettingsLoader {
    /// 创建新的JSON设置加载器
    ///
    /// # 参数
    /// * `enable_env_substitution` - 是否启用环境变量替换
    pub fn new(enable_env_substitution: bool) -> Self {
        Self {
            enable_env_substitution,
        }
    }

    /// 替换字符串中的环境变量
    ///
    /// 匹配 `${VAR_NAME}` 格式，缺失的变量视为配置错误。
    fn substitute_env_vars(&self, content: &str) -> Result<String> {
        if !self.enable_env_substitution {
            return Ok(content.to_string());
        }

        let env_var_regex = Regex::new(r"\$\{([A-Za-z_][A-Za-z0-9_]*)\}")
            .map_err(|e| ConfigError::ParseError(format!("正则表达式错误: {e}")))?;

        let mut result = content.to_string();

        for captures in env_var_regex.captures_iter(content) {
            let full_match = &captures[0];
            let var_name = &captures[1];

            match std::env::var(var_name) {
                Ok(value) => {
                    result = result.replace(full_match, &value);
                }
                Err(_) => {
                    return Err(ConfigError::EnvVarError {
                        var: var_name.to_string(),
                    }
                    .into());
                }
            }
        }

        Ok(result)
    }

    /// 解析JSON内容
    fn parse_json(&self, content: &str) -> Result<Settings> {
        let processed_content = self.substitute_env_vars(content)?;

        let settings: Settings = serde_json::from_str(&processed_content)
            .map_err(|e| ConfigError::ParseError(format!("JSON解析失败: {e}")))?;

        Ok(settings)
    }

    /// 缺失文件时创建零档案模板
    async fn create_default_file(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(ConfigError::Io)?;
        }
        tokio::fs::write(path, DEFAULT_SETTINGS_JSON)
            .await
            .map_err(ConfigError::Io)?;

        info!("设置文件不存在，已创建零档案模板: {}", path.display());
        Ok(())
    }
}

#[async_trait]
impl SettingsLoader for JsonSettingsLoader {
    async fn load_from_file<P: AsRef<Path> + Send>(&self, path: P) -> Result<Settings> {
        let path = path.as_ref();

        if !path.exists() {
            self.create_default_file(path).await?;
        }

        let content = tokio::fs::read_to_string(path)
            .await
            .map_err(|e| ConfigError::ParseError(format!("读取文件失败: {e}")))?;

        let settings = self.parse_json(&content)?;
        self.validate(&settings)?;

        info!(
            "成功加载设置文件: {}，档案数量: {}",
            path.display(),
            settings.profiles.len()
        );

        Ok(settings)
    }

    async fn load_from_string(&self, content: &str) -> Result<Settings> {
        let settings = self.parse_json(content)?;
        self.validate(&settings)?;
        Ok(settings)
    }

    fn validate(&self, settings: &Settings) -> Result<()> {
        validate_settings(settings).map_err(|e| ConfigError::ValidationError(e).into())
    }
}

/// 获取默认设置文件路径
///
/// 当前目录存在 settings.json 时优先使用（便于开发调试），否则
/// 使用用户配置目录下的 statuspage-tray/settings.json。
pub fn get_default_settings_path() -> std::path::PathBuf {
    if std::path::Path::new("settings.json").exists() {
        std::path::PathBuf::from("settings.json")
    } else {
        dirs::config_dir()
            .map(|config_dir| config_dir.join("statuspage-tray").join("settings.json"))
            .unwrap_or_else(|| std::path::PathBuf::from("settings.json"))
    }
}

/// 获取默认设置模板内容
pub fn default_settings_template() -> &'static str {
    DEFAULT_SETTINGS_JSON
}
