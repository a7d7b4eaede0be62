//! 聚合控制器模块
//!
//! 持有活动监控档案集合，执行刷新过程并计算最差严重级别，
//! 对外重建菜单/图标状态

use crate::error::{ConfigError, Result, StatusTrayError};
use crate::menu::{control_entries, MenuEntry};
use crate::profile::{ServiceProfile, StatusFetcher};
use crate::settings::ProfileDefinition;
use crate::severity::{self, Icon, Severity};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::sync::Arc;
use tracing::{debug, info, warn};
use uuid::Uuid;

/// 刷新失败策略
///
/// 任何一个端点出错时，整个刷新过程是中止还是隔离失败档案继续。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailurePolicy {
    /// 第一个错误即中止整个刷新过程，上一次的聚合状态原样保留
    FailFast,
    /// 失败档案标记为过期，其余档案继续聚合，并对外暴露降级指示
    IsolateAndContinue,
}

impl FailurePolicy {
    /// 从设置的fail_fast开关推导策略
    pub fn from_fail_fast(fail_fast: bool) -> Self {
        if fail_fast {
            FailurePolicy::FailFast
        } else {
            FailurePolicy::IsolateAndContinue
        }
    }
}

/// 单个档案在一次刷新中的结果
#[derive(Debug, Clone, Serialize)]
pub struct ProfileOutcome {
    /// 档案名称
    pub name: String,
    /// 本次观测到的严重级别；抓取失败时为空
    pub severity: Option<Severity>,
    /// 错误信息（如果有）
    pub error: Option<String>,
}

/// 一次完整刷新过程的报告
#[derive(Debug, Clone, Serialize)]
pub struct RefreshReport {
    /// 刷新ID
    pub id: Uuid,
    /// 刷新时间戳
    pub timestamp: DateTime<Utc>,
    /// 聚合严重级别
    pub aggregate: Severity,
    /// 本次刷新是否有档案失败（仅隔离策略下可能为true）
    pub degraded: bool,
    /// 各档案结果，按菜单顺序排列
    pub outcomes: Vec<ProfileOutcome>,
}

/// 聚合控制器
///
/// 状态机只有两个逻辑状态：尚未成功加载过档案集合（Uninitialized），
/// 和持有活动档案集合（Ready）。加载失败不会破坏先前的Ready状态。
pub struct StatusController {
    /// 状态抓取器
    fetcher: Arc<dyn StatusFetcher>,
    /// 刷新失败策略
    policy: FailurePolicy,
    /// 活动档案集合；None表示尚未初始化
    profiles: Option<Vec<ServiceProfile>>,
    /// 最近一次计算出的聚合严重级别
    aggregate: Severity,
    /// 最近一次刷新是否处于降级状态
    degraded: bool,
}

impl StatusController {
    /// 创建新的聚合控制器
    ///
    /// # 参数
    /// * `fetcher` - 状态抓取器
    /// * `policy` - 刷新失败策略
    pub fn new(fetcher: Arc<dyn StatusFetcher>, policy: FailurePolicy) -> Self {
        Self {
            fetcher,
            policy,
            profiles: None,
            aggregate: Severity::None,
            degraded: false,
        }
    }

    /// 判断控制器是否已持有活动档案集合
    pub fn is_ready(&self) -> bool {
        self.profiles.is_some()
    }

    /// 获取当前刷新失败策略
    pub fn policy(&self) -> FailurePolicy {
        self.policy
    }

    /// 获取最近一次计算出的聚合严重级别
    pub fn aggregate_severity(&self) -> Severity {
        self.aggregate
    }

    /// 获取当前应显示的聚合图标
    ///
    /// 降级状态下显示独立的过期图标，而不是掩盖成某个严重级别。
    pub fn aggregate_icon(&self) -> Icon {
        if self.degraded {
            Icon::Stale
        } else {
            self.aggregate.icon()
        }
    }

    /// 加载档案定义并整体替换活动集合
    ///
    /// 先验证所有定义，任何一条非法都返回配置错误且不发生状态
    /// 转换（先前的Ready集合原样保留）。重名档案后写覆盖前写，
    /// 但保留首次出现的位置，菜单顺序与设置文件顺序一致。
    ///
    /// # 参数
    /// * `definitions` - 档案定义列表
    ///
    /// # 返回
    /// * `Result<()>` - 加载结果
    pub fn load_profiles(&mut self, definitions: &[ProfileDefinition]) -> Result<()> {
        for definition in definitions {
            if definition.name.trim().is_empty() {
                return Err(ConfigError::ValidationError(
                    "档案缺少必填字段 name 或其值为空".to_string(),
                )
                .into());
            }
            if definition.hostname.trim().is_empty() {
                return Err(ConfigError::ValidationError(format!(
                    "档案 {} 缺少必填字段 hostname 或其值为空",
                    definition.name
                ))
                .into());
            }
        }

        let mut fresh: Vec<ServiceProfile> = Vec::with_capacity(definitions.len());
        for definition in definitions {
            let profile = ServiceProfile::new(&definition.name, &definition.hostname);
            if let Some(existing) = fresh.iter_mut().find(|p| p.name() == definition.name) {
                *existing = profile;
            } else {
                fresh.push(profile);
            }
        }

        info!("档案集合已整体替换，档案数量: {}", fresh.len());
        self.profiles = Some(fresh);
        Ok(())
    }

    /// 对所有活动档案执行一次刷新过程
    ///
    /// 按菜单顺序逐个串行刷新，归约出最差严重级别并更新聚合
    /// 图标状态。零档案时聚合级别直接取正常，不会对空序列求最差。
    ///
    /// # 返回
    /// * `Result<RefreshReport>` - 刷新报告；未初始化时返回 `NotInitialized`
    pub async fn refresh_all(&mut self) -> Result<RefreshReport> {
        let profiles = self
            .profiles
            .as_mut()
            .ok_or(StatusTrayError::NotInitialized)?;

        let pass_id = Uuid::new_v4();
        debug!("开始刷新过程 {}，档案数量: {}", pass_id, profiles.len());

        let mut outcomes: Vec<ProfileOutcome> = Vec::with_capacity(profiles.len());
        let mut degraded = false;

        for profile in profiles.iter_mut() {
            match profile.refresh(self.fetcher.as_ref()).await {
                Ok(current) => {
                    outcomes.push(ProfileOutcome {
                        name: profile.name().to_string(),
                        severity: Some(current),
                        error: None,
                    });
                }
                Err(e) => match self.policy {
                    FailurePolicy::FailFast => {
                        warn!("档案 {} 刷新失败，中止整个刷新过程: {}", profile.name(), e);
                        return Err(e);
                    }
                    FailurePolicy::IsolateAndContinue => {
                        warn!("档案 {} 刷新失败，已隔离并继续: {}", profile.name(), e);
                        degraded = true;
                        outcomes.push(ProfileOutcome {
                            name: profile.name().to_string(),
                            severity: None,
                            error: Some(e.to_string()),
                        });
                    }
                },
            }
        }

        let observed: Vec<Severity> = outcomes.iter().filter_map(|o| o.severity).collect();
        let aggregate = if outcomes.is_empty() {
            // 零档案配置：聚合级别取正常
            Severity::None
        } else if observed.is_empty() {
            // 本次全部失败，保留上一次的聚合级别
            self.aggregate
        } else {
            severity::worst(observed.iter().copied())?
        };

        self.aggregate = aggregate;
        self.degraded = degraded;

        let report = RefreshReport {
            id: pass_id,
            timestamp: Utc::now(),
            aggregate,
            degraded,
            outcomes,
        };

        info!(
            "刷新过程 {} 完成，聚合级别: {}{}",
            pass_id,
            aggregate,
            if degraded { "（监控降级）" } else { "" }
        );

        Ok(report)
    }

    /// 重建有序菜单条目列表
    ///
    /// 档案条目按配置顺序排列，之后是分隔线和固定控制条目。
    ///
    /// # 返回
    /// * `Result<Vec<MenuEntry>>` - 菜单条目；未初始化时返回 `NotInitialized`
    pub fn menu_entries(&self) -> Result<Vec<MenuEntry>> {
        let profiles = self
            .profiles
            .as_ref()
            .ok_or(StatusTrayError::NotInitialized)?;

        let mut entries: Vec<MenuEntry> = profiles.iter().map(|p| p.menu_entry()).collect();
        entries.push(MenuEntry::separator());
        entries.extend(control_entries());
        Ok(entries)
    }

    /// 获取活动档案的只读视图
    pub fn profiles(&self) -> Option<&[ServiceProfile]> {
        self.profiles.as_deref()
    }
}
