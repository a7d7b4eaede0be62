//! HTTP状态抓取器实现
//!
//! 负责请求 statuspage 约定的状态端点并解码严重级别

use crate::error::{FetchError, Result};
use crate::severity::Severity;
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, warn};

/// 状态端点响应的信封结构
///
/// 厂商端点通常会返回更多字段，这里只关心 `status.indicator`。
#[derive(Debug, Deserialize)]
struct StatusEnvelope {
    status: StatusBody,
}

#[derive(Debug, Deserialize)]
struct StatusBody {
    indicator: String,
}

/// 状态抓取器trait，定义抓取接口
#[async_trait]
pub trait StatusFetcher: Send + Sync {
    /// 请求状态端点并解码当前严重级别
    ///
    /// # 参数
    /// * `status_uri` - 完整的状态端点URL
    ///
    /// # 返回
    /// * `Result<Severity>` - 解码出的严重级别
    async fn fetch(&self, status_uri: &str) -> Result<Severity>;
}

/// 基于reqwest的HTTP状态抓取器
pub struct HttpStatusFetcher {
    /// HTTP客户端
    client: Client,
}

impl HttpStatusFetcher {
    /// 创建新的HTTP状态抓取器
    ///
    /// # 参数
    /// * `timeout` - 单次请求的超时时间
    ///
    /// # 返回
    /// * `Result<Self>` - 抓取器实例
    pub fn new(timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(format!("{}/{}", crate::APP_NAME, crate::VERSION))
            .build()
            .map_err(FetchError::RequestError)?;

        Ok(Self { client })
    }

    /// 解码响应体
    ///
    /// 响应体必须是JSON，且 `status.indicator` 字段取值必须是四个
    /// 合法厂商状态码之一，任何其他形态都视为解码失败。
    fn decode_body(body: &str) -> std::result::Result<Severity, FetchError> {
        let envelope: StatusEnvelope = serde_json::from_str(body)
            .map_err(|e| FetchError::DecodeError(format!("解析状态信封失败: {e}")))?;

        Severity::from_vendor_code(&envelope.status.indicator)
            .map_err(|e| FetchError::DecodeError(e.to_string()))
    }
}

#[async_trait]
impl StatusFetcher for HttpStatusFetcher {
    async fn fetch(&self, status_uri: &str) -> Result<Severity> {
        debug!("请求状态端点: {}", status_uri);

        let response = self
            .client
            .get(status_uri)
            .send()
            .await
            .map_err(FetchError::RequestError)?;

        let status_code = response.status();
        if status_code.as_u16() != 200 {
            // 非200响应只告警不中断，格式良好的响应体仍然接受
            warn!("状态端点返回非200状态码: {} ({})", status_uri, status_code);
        }

        let body = response.text().await.map_err(FetchError::RequestError)?;
        let severity = Self::decode_body(&body)?;

        debug!("状态端点 {} 当前级别: {}", status_uri, severity);
        Ok(severity)
    }
}
