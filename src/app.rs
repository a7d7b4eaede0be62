//! 应用运行时模块
//!
//! 单任务协作模型：周期定时器和菜单动作在同一个select循环中
//! 依次处理，互不并发。档案集合在重载时整体替换，不会与进行中
//! 的刷新交错。

use crate::controller::StatusController;
use crate::error::Result;
use crate::menu::{MenuAction, PlatformActions, TrayRenderer};
use crate::settings::{JsonSettingsLoader, SettingsLoader};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{broadcast, mpsc};
use tokio::time::interval;
use tracing::{debug, error, info, warn};

/// 应用运行时
///
/// 控制器作为唯一属主对象显式传入，不依赖任何环境全局状态。
pub struct App {
    /// 聚合控制器
    controller: StatusController,
    /// 设置文件路径
    settings_path: PathBuf,
    /// 设置加载器
    loader: JsonSettingsLoader,
    /// 托盘渲染协作方
    renderer: Arc<dyn TrayRenderer>,
    /// 平台副作用协作方
    platform: Arc<dyn PlatformActions>,
    /// 自动刷新间隔
    refresh_interval: Duration,
}

impl App {
    /// 创建新的应用运行时
    ///
    /// # 参数
    /// * `controller` - 已构造的聚合控制器
    /// * `settings_path` - 设置文件路径
    /// * `loader` - 设置加载器
    /// * `renderer` - 托盘渲染协作方
    /// * `platform` - 平台副作用协作方
    /// * `refresh_interval` - 自动刷新间隔
    pub fn new(
        controller: StatusController,
        settings_path: PathBuf,
        loader: JsonSettingsLoader,
        renderer: Arc<dyn TrayRenderer>,
        platform: Arc<dyn PlatformActions>,
        refresh_interval: Duration,
    ) -> Self {
        Self {
            controller,
            settings_path,
            loader,
            renderer,
            platform,
            refresh_interval,
        }
    }

    /// 运行主循环
    ///
    /// 启动时立即执行一次刷新，之后由周期定时器和菜单动作驱动。
    /// 启动刷新失败会直接返回错误（快速失败策略下应用无法进入
    /// Ready状态）；循环内的刷新失败只记录日志，界面保留上一次
    /// 的状态。
    ///
    /// # 参数
    /// * `action_rx` - 菜单动作接收器（托盘协作方的点击事件）
    /// * `shutdown_rx` - 关闭信号接收器
    pub async fn run(
        mut self,
        mut action_rx: mpsc::Receiver<MenuAction>,
        mut shutdown_rx: broadcast::Receiver<()>,
    ) -> Result<()> {
        // 启动时的初次刷新，失败则无法进入Ready状态
        self.refresh_and_render().await?;
        info!("状态监控已启动，刷新间隔: {:?}", self.refresh_interval);

        let mut ticker = interval(self.refresh_interval);
        // 第一个tick立即完成，对应刚刚执行过的初次刷新
        ticker.tick().await;

        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    debug!("周期刷新触发");
                    if let Err(e) = self.refresh_and_render().await {
                        warn!("周期刷新失败，保留上一次状态: {}", e);
                    }
                }
                action = action_rx.recv() => {
                    match action {
                        Some(action) => {
                            if !self.handle_action(action).await? {
                                break;
                            }
                        }
                        None => {
                            info!("菜单动作通道已关闭，退出主循环");
                            break;
                        }
                    }
                }
                _ = shutdown_rx.recv() => {
                    info!("收到关闭信号，正在停止监控...");
                    break;
                }
            }
        }

        info!("状态监控已停止");
        Ok(())
    }

    /// 处理单个菜单动作
    ///
    /// # 返回
    /// * `Result<bool>` - false表示应退出主循环
    async fn handle_action(&mut self, action: MenuAction) -> Result<bool> {
        match action {
            MenuAction::Refresh => {
                info!("手动刷新触发");
                if let Err(e) = self.refresh_and_render().await {
                    warn!("手动刷新失败，保留上一次状态: {}", e);
                }
            }
            MenuAction::ReloadSettings => {
                self.reload_settings().await;
            }
            MenuAction::EditSettings => {
                if let Err(e) = self.platform.open_path(&self.settings_path) {
                    warn!("请求打开设置文件失败: {}", e);
                }
            }
            MenuAction::OpenBrowser(url) => {
                if let Err(e) = self.platform.open_url(&url) {
                    warn!("请求打开浏览器失败: {}", e);
                }
            }
            MenuAction::Quit => {
                info!("收到退出动作");
                return Ok(false);
            }
            MenuAction::Separator => {
                debug!("忽略分隔线动作");
            }
        }
        Ok(true)
    }

    /// 重新读取设置并整体替换档案集合
    ///
    /// 配置错误时保留先前状态，并请求协作方打开设置文件供用户
    /// 手动修正。间隔、超时等运行时参数在重启后生效，重载只替换
    /// 档案集合。
    async fn reload_settings(&mut self) {
        info!("重新加载设置: {}", self.settings_path.display());

        let settings = match self.loader.load_from_file(&self.settings_path).await {
            Ok(settings) => settings,
            Err(e) => {
                error!("设置加载失败，保留先前状态: {}", e);
                if let Err(open_err) = self.platform.open_path(&self.settings_path) {
                    warn!("请求打开设置文件失败: {}", open_err);
                }
                return;
            }
        };

        if settings.refresh_interval_seconds != self.refresh_interval.as_secs() {
            info!(
                "刷新间隔已变更为 {} 秒，重启后生效",
                settings.refresh_interval_seconds
            );
        }

        if let Err(e) = self.controller.load_profiles(&settings.profiles) {
            error!("档案加载失败，保留先前状态: {}", e);
            if let Err(open_err) = self.platform.open_path(&self.settings_path) {
                warn!("请求打开设置文件失败: {}", open_err);
            }
            return;
        }

        if let Err(e) = self.refresh_and_render().await {
            warn!("重载后的刷新失败: {}", e);
        }
    }

    /// 执行一次刷新过程并通知渲染协作方
    async fn refresh_and_render(&mut self) -> Result<()> {
        self.controller.refresh_all().await?;
        self.render()
    }

    /// 把当前聚合图标和菜单状态推给渲染协作方
    fn render(&self) -> Result<()> {
        let entries = self.controller.menu_entries()?;
        self.renderer
            .render(self.controller.aggregate_icon(), &entries)
    }
}
