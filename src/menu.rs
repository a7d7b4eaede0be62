//! 菜单模型模块
//!
//! 定义对外暴露的菜单条目模型和渲染协作方接口。原生托盘渲染、
//! 打开浏览器/编辑器等平台副作用都通过这里的trait注入。

use crate::error::Result;
use crate::severity::Icon;
use std::path::Path;
use tracing::{debug, info};

/// 菜单条目被点击后触发的动作
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MenuAction {
    /// 在默认浏览器中打开指定URL
    OpenBrowser(String),
    /// 手动触发一次刷新
    Refresh,
    /// 在外部编辑器中打开设置文件
    EditSettings,
    /// 重新读取设置并整体替换活动档案集合
    ReloadSettings,
    /// 退出进程
    Quit,
    /// 分隔线，无动作
    Separator,
}

/// 单个菜单条目
///
/// 控制器向渲染协作方输出的就是按顺序排列的条目列表。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MenuEntry {
    /// 显示标签
    pub label: String,
    /// 条目图标；控制条目没有图标
    pub icon: Option<Icon>,
    /// 点击动作
    pub action: MenuAction,
}

impl MenuEntry {
    /// 创建新的菜单条目
    pub fn new(label: impl Into<String>, icon: Option<Icon>, action: MenuAction) -> Self {
        Self {
            label: label.into(),
            icon,
            action,
        }
    }

    /// 创建分隔线条目
    pub fn separator() -> Self {
        Self {
            label: String::new(),
            icon: None,
            action: MenuAction::Separator,
        }
    }
}

/// 构建固定的控制条目序列
///
/// 顺序固定：Refresh、Edit Preferences、Reload Preferences、Quit。
pub fn control_entries() -> Vec<MenuEntry> {
    vec![
        MenuEntry::new("Refresh", None, MenuAction::Refresh),
        MenuEntry::new("Edit Preferences", None, MenuAction::EditSettings),
        MenuEntry::new("Reload Preferences", None, MenuAction::ReloadSettings),
        MenuEntry::new("Quit", None, MenuAction::Quit),
    ]
}

/// 托盘渲染协作方trait
///
/// 接收聚合图标和有序菜单条目列表，负责原生渲染。
pub trait TrayRenderer: Send + Sync {
    /// 渲染当前托盘状态
    ///
    /// # 参数
    /// * `icon` - 聚合图标
    /// * `entries` - 有序菜单条目列表
    fn render(&self, icon: Icon, entries: &[MenuEntry]) -> Result<()>;
}

/// 平台副作用协作方trait
pub trait PlatformActions: Send + Sync {
    /// 在默认浏览器中打开URL
    fn open_url(&self, url: &str) -> Result<()>;

    /// 在外部编辑器中打开文件
    fn open_path(&self, path: &Path) -> Result<()>;
}

/// 日志渲染器
///
/// 无头运行时的默认实现，把托盘状态写进结构化日志。
pub struct LogRenderer;

impl TrayRenderer for LogRenderer {
    fn render(&self, icon: Icon, entries: &[MenuEntry]) -> Result<()> {
        info!("托盘图标: {}", icon.path());
        for entry in entries {
            if entry.action == MenuAction::Separator {
                debug!("菜单条目: ----------------");
            } else {
                debug!(
                    "菜单条目: {} (图标: {:?})",
                    entry.label,
                    entry.icon.map(|i| i.path())
                );
            }
        }
        Ok(())
    }
}

/// 日志平台副作用实现
///
/// 无头运行时的默认实现，只记录动作不产生真实副作用。
pub struct LogPlatform;

impl PlatformActions for LogPlatform {
    fn open_url(&self, url: &str) -> Result<()> {
        info!("请求在浏览器中打开: {}", url);
        Ok(())
    }

    fn open_path(&self, path: &Path) -> Result<()> {
        info!("请求在编辑器中打开: {}", path.display());
        Ok(())
    }
}
