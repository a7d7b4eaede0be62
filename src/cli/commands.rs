//! 命令处理逻辑
//!
//! 实现各种CLI命令的处理逻辑

use crate::cli::args::{Args, Commands, OutputFormat};
use crate::controller::{FailurePolicy, StatusController};
use crate::error::{ConfigError, Result};
use crate::profile::{HttpStatusFetcher, ServiceProfile};
use crate::settings::loader::default_settings_template;
use crate::settings::{JsonSettingsLoader, SettingsLoader};
use async_trait::async_trait;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

/// 命令处理器trait
#[async_trait]
pub trait Command: Send + Sync {
    /// 执行命令
    async fn execute(&self, args: &Args) -> Result<()>;
}

/// 版本命令
pub struct VersionCommand;

#[async_trait]
impl Command for VersionCommand {
    async fn execute(&self, args: &Args) -> Result<()> {
        if let Commands::Version { format } = &args.command {
            match format {
                OutputFormat::Json => {
                    let version_info = serde_json::json!({
                        "name": crate::APP_NAME,
                        "version": crate::VERSION,
                        "description": crate::APP_DESCRIPTION
                    });
                    println!("{}", serde_json::to_string_pretty(&version_info)?);
                }
                OutputFormat::Text => {
                    println!("{} v{}", crate::APP_NAME, crate::VERSION);
                    println!("{}", crate::APP_DESCRIPTION);
                }
            }
        }
        Ok(())
    }
}

/// 初始化命令
pub struct InitCommand;

#[async_trait]
impl Command for InitCommand {
    async fn execute(&self, args: &Args) -> Result<()> {
        if let Commands::Init {
            settings_path,
            force,
        } = &args.command
        {
            let path = settings_path
                .clone()
                .unwrap_or_else(|| args.get_settings_path());
            self.create_settings_file(&path, *force).await
        } else {
            Ok(())
        }
    }
}

impl InitCommand {
    /// 创建设置文件
    async fn create_settings_file(&self, settings_path: &Path, force: bool) -> Result<()> {
        if settings_path.exists() && !force {
            eprintln!("设置文件已存在: {}", settings_path.display());
            eprintln!("使用 --force 参数覆盖现有文件");
            return Ok(());
        }

        if let Some(parent) = settings_path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }

        tokio::fs::write(settings_path, default_settings_template()).await?;

        println!("设置文件已创建: {}", settings_path.display());
        println!("请编辑设置文件以添加要监控的状态页");

        Ok(())
    }
}

/// 验证命令
pub struct ValidateCommand;

#[async_trait]
impl Command for ValidateCommand {
    async fn execute(&self, args: &Args) -> Result<()> {
        if let Commands::Validate { settings_path } = &args.command {
            let path = settings_path
                .clone()
                .unwrap_or_else(|| args.get_settings_path());

            if !path.exists() {
                return Err(ConfigError::ParseError(format!(
                    "设置文件不存在: {}",
                    path.display()
                ))
                .into());
            }

            let loader = JsonSettingsLoader::new(true);
            let settings = loader.load_from_file(&path).await?;

            println!("设置文件验证通过: {}", path.display());
            println!("档案数量: {}", settings.profiles.len());
            for definition in &settings.profiles {
                let profile = ServiceProfile::new(&definition.name, &definition.hostname);
                println!("  {} -> {}", profile.name(), profile.status_uri());
            }
        }
        Ok(())
    }
}

/// 一次性检测命令
pub struct CheckCommand;

#[async_trait]
impl Command for CheckCommand {
    async fn execute(&self, args: &Args) -> Result<()> {
        if let Commands::Check { format, timeout } = &args.command {
            let settings_path = args.get_settings_path();
            let loader = JsonSettingsLoader::new(true);
            let settings = loader.load_from_file(&settings_path).await?;

            let timeout_secs = timeout.unwrap_or(settings.request_timeout_seconds);
            let fetcher = Arc::new(HttpStatusFetcher::new(Duration::from_secs(timeout_secs))?);
            let mut controller = StatusController::new(
                fetcher,
                FailurePolicy::from_fail_fast(settings.fail_fast),
            );
            controller.load_profiles(&settings.profiles)?;

            let report = controller.refresh_all().await?;

            match format {
                OutputFormat::Json => {
                    println!("{}", serde_json::to_string_pretty(&report)?);
                }
                OutputFormat::Text => {
                    for outcome in &report.outcomes {
                        match (outcome.severity, &outcome.error) {
                            (Some(severity), _) => {
                                println!("{}: {}", outcome.name, severity);
                            }
                            (None, Some(error)) => {
                                println!("{}: 抓取失败 ({})", outcome.name, error);
                            }
                            (None, None) => {
                                println!("{}: 未知", outcome.name);
                            }
                        }
                    }
                    println!("聚合级别: {}", report.aggregate);
                    if report.degraded {
                        println!("警告: 部分档案抓取失败，监控处于降级状态");
                    }
                }
            }
        }
        Ok(())
    }
}
