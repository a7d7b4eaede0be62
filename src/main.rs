//! Statuspage Tray 主程序入口
//!
//! 菜单栏状态页监控工具

use anyhow::{Context, Result};
use clap::Parser;
use statuspage_tray::app::App;
use statuspage_tray::cli::args::{Args, Commands};
use statuspage_tray::cli::commands::{
    CheckCommand, Command, InitCommand, ValidateCommand, VersionCommand,
};
use statuspage_tray::controller::{FailurePolicy, StatusController};
use statuspage_tray::logging::{LogConfig, LoggingSystem};
use statuspage_tray::menu::{LogPlatform, LogRenderer, PlatformActions};
use statuspage_tray::profile::HttpStatusFetcher;
use statuspage_tray::settings::{JsonSettingsLoader, SettingsLoader};
use std::sync::Arc;
use std::time::Duration;
use tokio::signal;
use tokio::sync::{broadcast, mpsc};
use tracing::{error, info};

#[tokio::main]
async fn main() -> Result<()> {
    // 解析命令行参数
    let args = Args::parse();

    // 初始化日志系统
    let log_config = LogConfig {
        level: args.log_level.clone().into(),
        console: true,
        json_format: false,
        ..Default::default()
    };

    let _logging_system =
        LoggingSystem::setup_logging(log_config).context("初始化日志系统失败")?;

    info!("Statuspage Tray v{} 启动", statuspage_tray::VERSION);

    // 执行命令
    if let Err(e) = execute_command(&args).await {
        error!("命令执行失败: {}", e);
        std::process::exit(1);
    }

    Ok(())
}

/// 执行CLI命令
async fn execute_command(args: &Args) -> Result<()> {
    match &args.command {
        Commands::Run {
            interval,
            fail_fast,
            isolate,
        } => run_monitor(args, *interval, *fail_fast, *isolate).await,
        Commands::Check { .. } => {
            let command = CheckCommand;
            command.execute(args).await.map_err(|e| anyhow::anyhow!(e))
        }
        Commands::Validate { .. } => {
            let command = ValidateCommand;
            command.execute(args).await.map_err(|e| anyhow::anyhow!(e))
        }
        Commands::Init { .. } => {
            let command = InitCommand;
            command.execute(args).await.map_err(|e| anyhow::anyhow!(e))
        }
        Commands::Version { .. } => {
            let command = VersionCommand;
            command.execute(args).await.map_err(|e| anyhow::anyhow!(e))
        }
    }
}

/// 启动状态监控主循环
///
/// 加载设置、构造控制器并进入周期刷新循环。设置或启动刷新失败
/// 时应用不会进入Ready状态。
///
/// # 参数
///
/// * `args` - 命令行参数，包含设置文件路径
/// * `interval` - 可选的刷新间隔覆盖值（秒）
/// * `fail_fast` - 强制使用整体中止策略
/// * `isolate` - 强制使用隔离继续策略
async fn run_monitor(
    args: &Args,
    interval: Option<u64>,
    fail_fast: bool,
    isolate: bool,
) -> Result<()> {
    let settings_path = args.get_settings_path();
    let loader = JsonSettingsLoader::new(true);
    let platform: Arc<dyn PlatformActions> = Arc::new(LogPlatform);

    // 加载设置；配置错误时请求协作方打开设置文件供用户修正
    let settings = match loader.load_from_file(&settings_path).await {
        Ok(settings) => settings,
        Err(e) => {
            if let Err(open_err) = platform.open_path(&settings_path) {
                error!("请求打开设置文件失败: {}", open_err);
            }
            return Err(anyhow::anyhow!(e)).with_context(|| {
                format!("加载设置文件失败: {}", settings_path.display())
            });
        }
    };

    // 命令行参数覆盖设置文件中的值
    let refresh_interval = interval.unwrap_or(settings.refresh_interval_seconds);
    let policy = if isolate {
        FailurePolicy::IsolateAndContinue
    } else if fail_fast {
        FailurePolicy::FailFast
    } else {
        FailurePolicy::from_fail_fast(settings.fail_fast)
    };

    info!(
        "设置加载完成，档案数量: {}，失败策略: {:?}",
        settings.profiles.len(),
        policy
    );

    // 构造抓取器和控制器
    let fetcher = Arc::new(
        HttpStatusFetcher::new(Duration::from_secs(settings.request_timeout_seconds))
            .context("创建HTTP状态抓取器失败")?,
    );
    let mut controller = StatusController::new(fetcher, policy);
    controller
        .load_profiles(&settings.profiles)
        .context("加载监控档案失败")?;

    // 菜单动作通道；真实托盘协作方持有发送端推送点击事件
    let (_action_tx, action_rx) = mpsc::channel(16);
    let (shutdown_tx, shutdown_rx) = broadcast::channel(1);

    // 设置Ctrl+C信号处理
    let shutdown_tx_clone = shutdown_tx.clone();
    tokio::spawn(async move {
        match signal::ctrl_c().await {
            Ok(()) => {
                info!("收到中断信号，正在停止监控...");
                let _ = shutdown_tx_clone.send(());
            }
            Err(err) => {
                error!("监听中断信号失败: {}", err);
            }
        }
    });

    let app = App::new(
        controller,
        settings_path,
        loader,
        Arc::new(LogRenderer),
        platform,
        Duration::from_secs(refresh_interval),
    );

    app.run(action_rx, shutdown_rx)
        .await
        .map_err(|e| anyhow::anyhow!(e))
}
