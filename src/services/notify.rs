//! 结果推送 - 业务能力层
//!
//! 把运行摘要推送到 webhook。未配置地址时静默跳过，
//! 推送失败只告警，不影响运行结果。

use anyhow::Result;
use reqwest::Client;
use serde_json::json;
use tracing::{debug, info, warn};

/// 投递结果的 webhook 推送器
#[derive(Debug, Clone)]
pub struct Notifier {
    webhook_url: Option<String>,
    client: Client,
}

impl Notifier {
    pub fn new(webhook_url: Option<String>) -> Self {
        Self {
            webhook_url,
            client: Client::new(),
        }
    }

    /// 推送一条文本消息
    pub async fn push(&self, text: &str) {
        let Some(url) = &self.webhook_url else {
            debug!("未配置推送地址，跳过消息推送");
            return;
        };
        match self.try_push(url, text).await {
            Ok(()) => info!("✓ 投递结果已推送"),
            Err(e) => warn!("⚠️ 推送投递结果失败: {}", e),
        }
    }

    async fn try_push(&self, url: &str, text: &str) -> Result<()> {
        let body = json!({
            "msgtype": "text",
            "text": { "content": text },
        });
        self.client
            .post(url)
            .json(&body)
            .send()
            .await?
            .error_for_status()?;
        Ok(())
    }
}
