//! 严重级别模型
//!
//! 定义四级严重级别、厂商状态码映射和图标选择

use crate::error::SeverityError;
use serde::{Deserialize, Serialize};

/// 严重级别枚举，按严重程度升序排列
///
/// 排序关系 `None < Minor < Major < Critical` 同时用于单个档案的
/// 图标选择和聚合时的最差级别归约。
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// 一切正常
    None,
    /// 轻微故障
    Minor,
    /// 严重故障
    Major,
    /// 重大故障
    Critical,
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Severity::None => write!(f, "正常"),
            Severity::Minor => write!(f, "轻微"),
            Severity::Major => write!(f, "严重"),
            Severity::Critical => write!(f, "重大"),
        }
    }
}

impl Severity {
    /// 从厂商状态码解析严重级别
    ///
    /// 只接受 none/minor/major/critical 四个取值，不做大小写折叠
    /// 或模糊匹配，其他任何输入都返回错误而不是静默降级。
    ///
    /// # 参数
    /// * `code` - 厂商状态码字符串
    ///
    /// # 返回
    /// * `Result<Severity, SeverityError>` - 解析结果
    pub fn from_vendor_code(code: &str) -> Result<Self, SeverityError> {
        match code {
            "none" => Ok(Severity::None),
            "minor" => Ok(Severity::Minor),
            "major" => Ok(Severity::Major),
            "critical" => Ok(Severity::Critical),
            other => Err(SeverityError::InvalidVendorStatus {
                value: other.to_string(),
            }),
        }
    }

    /// 获取对应的厂商状态码
    pub fn vendor_code(&self) -> &'static str {
        match self {
            Severity::None => "none",
            Severity::Minor => "minor",
            Severity::Major => "major",
            Severity::Critical => "critical",
        }
    }

    /// 获取对应的托盘图标
    pub fn icon(&self) -> Icon {
        match self {
            Severity::None => Icon::None,
            Severity::Minor => Icon::Minor,
            Severity::Major => Icon::Major,
            Severity::Critical => Icon::Critical,
        }
    }

    /// 判断是否存在故障
    pub fn is_incident(&self) -> bool {
        !matches!(self, Severity::None)
    }
}

/// 托盘图标枚举
///
/// 四个级别各对应一个图标，另有一个表示监控降级（档案抓取失败
/// 或尚未完成首次抓取）的独立图标。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Icon {
    /// 正常
    None,
    /// 轻微故障
    Minor,
    /// 严重故障
    Major,
    /// 重大故障
    Critical,
    /// 监控降级/数据过期
    Stale,
}

impl Icon {
    /// 获取图标资源路径
    pub fn path(&self) -> &'static str {
        match self {
            Icon::None => "icons/check-mark-button.png",
            Icon::Minor => "icons/exclamation-mark.png",
            Icon::Major => "icons/warning.png",
            Icon::Critical => "icons/collision.png",
            Icon::Stale => "icons/question-mark.png",
        }
    }
}

/// 求一组严重级别中的最差级别
///
/// # 参数
/// * `severities` - 严重级别序列
///
/// # 返回
/// * `Result<Severity, SeverityError>` - 最差级别；空序列返回 `EmptyInput`
///
/// 调用方必须保证序列非空，或自行处理零档案的场景（控制器在
/// 零档案时直接使用 `Severity::None`，不会走到这里）。
pub fn worst<I>(severities: I) -> Result<Severity, SeverityError>
where
    I: IntoIterator<Item = Severity>,
{
    severities
        .into_iter()
        .max()
        .ok_or(SeverityError::EmptyInput)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_severity_ordering() {
        assert!(Severity::None < Severity::Minor);
        assert!(Severity::Minor < Severity::Major);
        assert!(Severity::Major < Severity::Critical);
    }

    #[test]
    fn test_from_vendor_code_roundtrip() {
        // 四个合法取值各自往返一次
        for code in ["none", "minor", "major", "critical"] {
            let severity = Severity::from_vendor_code(code).unwrap();
            assert_eq!(severity.vendor_code(), code);
        }
    }

    #[test]
    fn test_from_vendor_code_rejects_unknown() {
        for code in ["degraded", "NONE", "Minor", "", "critical "] {
            let result = Severity::from_vendor_code(code);
            assert!(matches!(
                result,
                Err(SeverityError::InvalidVendorStatus { .. })
            ));
        }
    }

    #[test]
    fn test_severity_display() {
        assert_eq!(Severity::None.to_string(), "正常");
        assert_eq!(Severity::Minor.to_string(), "轻微");
        assert_eq!(Severity::Major.to_string(), "严重");
        assert_eq!(Severity::Critical.to_string(), "重大");
    }

    #[test]
    fn test_is_incident() {
        assert!(!Severity::None.is_incident());
        assert!(Severity::Minor.is_incident());
        assert!(Severity::Major.is_incident());
        assert!(Severity::Critical.is_incident());
    }

    #[test]
    fn test_icon_mapping() {
        assert_eq!(Severity::None.icon(), Icon::None);
        assert_eq!(Severity::Minor.icon(), Icon::Minor);
        assert_eq!(Severity::Major.icon(), Icon::Major);
        assert_eq!(Severity::Critical.icon(), Icon::Critical);
    }

    #[test]
    fn test_icon_paths() {
        assert_eq!(Icon::None.path(), "icons/check-mark-button.png");
        assert_eq!(Icon::Critical.path(), "icons/collision.png");
        assert_eq!(Icon::Stale.path(), "icons/question-mark.png");
    }

    #[test]
    fn test_worst_returns_maximum() {
        let result = worst([Severity::Minor, Severity::Critical, Severity::None]).unwrap();
        assert_eq!(result, Severity::Critical);

        let result = worst([Severity::None]).unwrap();
        assert_eq!(result, Severity::None);
    }

    #[test]
    fn test_worst_is_order_independent() {
        // max归约满足交换律和结合律
        let a = worst([Severity::Major, Severity::Minor]).unwrap();
        let b = worst([Severity::Minor, Severity::Major]).unwrap();
        assert_eq!(a, b);

        let left = worst([
            worst([Severity::None, Severity::Minor]).unwrap(),
            Severity::Major,
        ])
        .unwrap();
        let right = worst([
            Severity::None,
            worst([Severity::Minor, Severity::Major]).unwrap(),
        ])
        .unwrap();
        assert_eq!(left, right);
    }

    #[test]
    fn test_worst_rejects_empty_input() {
        let result = worst([]);
        assert!(matches!(result, Err(SeverityError::EmptyInput)));
    }

    #[test]
    fn test_severity_serialization() {
        let json = serde_json::to_string(&Severity::Critical).unwrap();
        assert_eq!(json, "\"critical\"");

        let severity: Severity = serde_json::from_str("\"minor\"").unwrap();
        assert_eq!(severity, Severity::Minor);
    }
}
