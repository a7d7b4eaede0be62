//! 监控档案模块
//!
//! 提供单个监控目标的主机名归一化、URI推导和状态刷新功能

pub mod fetcher;

pub use fetcher::{HttpStatusFetcher, StatusFetcher};

use crate::error::Result;
use crate::menu::{MenuAction, MenuEntry};
use crate::severity::{Icon, Severity};
use serde::{Deserialize, Serialize};

/// 请求协议
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Scheme {
    /// 明文HTTP
    Http,
    /// HTTPS（默认）
    Https,
}

impl Scheme {
    /// 获取协议字符串
    pub fn as_str(&self) -> &'static str {
        match self {
            Scheme::Http => "http",
            Scheme::Https => "https",
        }
    }
}

impl std::fmt::Display for Scheme {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// 单个监控档案
///
/// 构造本身不做任何I/O，初次抓取由控制器在加载后统一触发。
#[derive(Debug, Clone)]
pub struct ServiceProfile {
    /// 显示名称，在活动集合内唯一
    name: String,
    /// 请求协议，构造时从配置的主机名推导一次
    scheme: Scheme,
    /// 归一化之后的主机名
    host: String,
    /// 最近一次成功观测到的严重级别；首次抓取前为空
    current_severity: Option<Severity>,
    /// 最近一次刷新是否失败
    stale: bool,
}

impl ServiceProfile {
    /// 创建新的监控档案
    ///
    /// 主机名按以下顺序归一化：
    /// 1. 去掉末尾的一个 `/`（如果存在）；
    /// 2. `https://` 前缀表示HTTPS协议并剥离前缀；
    ///    `http://` 前缀表示HTTP协议并剥离前缀；
    ///    都没有时默认HTTPS且字符串保持不变。
    ///
    /// # 参数
    /// * `name` - 显示名称
    /// * `hostname` - 配置的原始主机名
    pub fn new(name: impl Into<String>, hostname: &str) -> Self {
        let trimmed = hostname.strip_suffix('/').unwrap_or(hostname);

        let (scheme, host) = if let Some(rest) = trimmed.strip_prefix("https://") {
            (Scheme::Https, rest)
        } else if let Some(rest) = trimmed.strip_prefix("http://") {
            (Scheme::Http, rest)
        } else {
            (Scheme::Https, trimmed)
        };

        Self {
            name: name.into(),
            scheme,
            host: host.to_string(),
            current_severity: None,
            stale: false,
        }
    }

    /// 获取显示名称
    pub fn name(&self) -> &str {
        &self.name
    }

    /// 获取请求协议
    pub fn scheme(&self) -> Scheme {
        self.scheme
    }

    /// 获取归一化之后的主机名
    pub fn host(&self) -> &str {
        &self.host
    }

    /// 获取最近一次成功观测到的严重级别
    pub fn current_severity(&self) -> Option<Severity> {
        self.current_severity
    }

    /// 判断档案数据是否过期（最近一次刷新失败或从未成功）
    pub fn is_stale(&self) -> bool {
        self.stale || self.current_severity.is_none()
    }

    /// 获取基础URI，同时用于状态查询和"在浏览器中打开"动作
    pub fn base_uri(&self) -> String {
        format!("{}://{}", self.scheme, self.host)
    }

    /// 获取状态端点URI，路径后缀固定不可配置
    pub fn status_uri(&self) -> String {
        format!("{}/api/v2/status.json", self.base_uri())
    }

    /// 刷新当前严重级别
    ///
    /// 抓取失败时标记档案过期并原样向上传播错误，由控制器根据
    /// 失败策略决定整个刷新过程是否继续。
    ///
    /// # 参数
    /// * `fetcher` - 状态抓取器
    ///
    /// # 返回
    /// * `Result<Severity>` - 刷新后的严重级别
    pub async fn refresh(&mut self, fetcher: &dyn StatusFetcher) -> Result<Severity> {
        match fetcher.fetch(&self.status_uri()).await {
            Ok(severity) => {
                self.current_severity = Some(severity);
                self.stale = false;
                Ok(severity)
            }
            Err(e) => {
                self.stale = true;
                Err(e)
            }
        }
    }

    /// 获取当前应显示的图标
    ///
    /// 数据过期或尚未完成首次抓取时显示降级图标。
    pub fn icon(&self) -> Icon {
        if self.is_stale() {
            Icon::Stale
        } else {
            // is_stale 已排除 None 的情况
            self.current_severity
                .map(|s| s.icon())
                .unwrap_or(Icon::Stale)
        }
    }

    /// 生成对应的菜单条目
    pub fn menu_entry(&self) -> MenuEntry {
        MenuEntry::new(
            self.name.clone(),
            Some(self.icon()),
            MenuAction::OpenBrowser(self.base_uri()),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hostname_normalization_https_with_trailing_slash() {
        let profile = ServiceProfile::new("A", "https://example.com/");
        assert_eq!(profile.scheme(), Scheme::Https);
        assert_eq!(profile.host(), "example.com");
    }

    #[test]
    fn test_hostname_normalization_http_prefix() {
        let profile = ServiceProfile::new("A", "http://example.com");
        assert_eq!(profile.scheme(), Scheme::Http);
        assert_eq!(profile.host(), "example.com");
    }

    #[test]
    fn test_hostname_normalization_defaults_to_https() {
        let profile = ServiceProfile::new("A", "example.com");
        assert_eq!(profile.scheme(), Scheme::Https);
        assert_eq!(profile.host(), "example.com");
    }

    #[test]
    fn test_hostname_normalization_bare_host_with_trailing_slash() {
        let profile = ServiceProfile::new("A", "example.com/");
        assert_eq!(profile.scheme(), Scheme::Https);
        assert_eq!(profile.host(), "example.com");
    }

    #[test]
    fn test_hostname_normalization_strips_single_trailing_slash() {
        // 只去掉末尾的一个斜杠
        let profile = ServiceProfile::new("A", "https://example.com//");
        assert_eq!(profile.host(), "example.com/");
    }

    #[test]
    fn test_hostname_keeps_path_remainder() {
        let profile = ServiceProfile::new("A", "https://status.example.com/internal");
        assert_eq!(profile.host(), "status.example.com/internal");
        assert_eq!(profile.base_uri(), "https://status.example.com/internal");
    }

    #[test]
    fn test_status_uri_formation() {
        let profile = ServiceProfile::new("A", "example.com");
        assert_eq!(profile.base_uri(), "https://example.com");
        assert_eq!(
            profile.status_uri(),
            "https://example.com/api/v2/status.json"
        );
    }

    #[test]
    fn test_new_profile_is_stale_until_first_refresh() {
        let profile = ServiceProfile::new("A", "example.com");
        assert!(profile.current_severity().is_none());
        assert!(profile.is_stale());
        assert_eq!(profile.icon(), Icon::Stale);
    }

    #[test]
    fn test_menu_entry_shape() {
        let profile = ServiceProfile::new("GitHub", "https://www.githubstatus.com");
        let entry = profile.menu_entry();
        assert_eq!(entry.label, "GitHub");
        assert_eq!(entry.icon, Some(Icon::Stale));
        assert_eq!(
            entry.action,
            MenuAction::OpenBrowser("https://www.githubstatus.com".to_string())
        );
    }

    #[tokio::test]
    async fn test_refresh_updates_severity_and_clears_stale() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("GET", "/api/v2/status.json")
            .with_status(200)
            .with_body(r#"{"status":{"indicator":"major"}}"#)
            .create_async()
            .await;

        let fetcher = HttpStatusFetcher::new(std::time::Duration::from_secs(5)).unwrap();
        let mut profile = ServiceProfile::new("A", &server.url());

        let severity = profile.refresh(&fetcher).await.unwrap();
        assert_eq!(severity, Severity::Major);
        assert_eq!(profile.current_severity(), Some(Severity::Major));
        assert!(!profile.is_stale());
        assert_eq!(profile.icon(), Icon::Major);
    }

    #[tokio::test]
    async fn test_refresh_failure_marks_profile_stale() {
        let fetcher = HttpStatusFetcher::new(std::time::Duration::from_secs(1)).unwrap();
        let mut profile = ServiceProfile::new("A", "http://127.0.0.1:1");

        let result = profile.refresh(&fetcher).await;
        assert!(result.is_err());
        assert!(profile.is_stale());
        assert_eq!(profile.icon(), Icon::Stale);
    }
}
