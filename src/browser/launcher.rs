//! 浏览器启动与初始页面创建

use std::time::Duration;

use anyhow::{Context, Result};
use chromiumoxide::browser::{Browser, BrowserConfig};
use chromiumoxide::cdp::browser_protocol::page::AddScriptToEvaluateOnNewDocumentParams;
use chromiumoxide::handler::viewport::Viewport;
use chromiumoxide::Page;
use futures::StreamExt;
use tokio::task::JoinHandle;
use tokio::time::sleep;
use tracing::debug;

use crate::infrastructure::session_registry::DeviceProfile;

/// 补充的反检测脚本，在每个新文档加载前注入
const STEALTH_SCRIPT: &str = r#"
Object.defineProperty(navigator, 'webdriver', { get: () => undefined });
Object.defineProperty(navigator, 'languages', { get: () => ['zh-CN', 'zh'] });
Object.defineProperty(navigator, 'plugins', { get: () => [1, 2, 3] });
"#;

/// 启动独立的浏览器实例并创建初始页面
///
/// 返回的后台任务负责排空 CDP 事件流，会话关闭时一并中止。
pub async fn launch(
    device: DeviceProfile,
    headless: bool,
) -> Result<(Browser, Page, JoinHandle<()>)> {
    let (width, height) = device.viewport();
    let mut builder = BrowserConfig::builder()
        .viewport(Viewport {
            width,
            height,
            device_scale_factor: Some(device.scale_factor()),
            emulating_mobile: device.is_mobile(),
            is_landscape: width >= height,
            has_touch: device.is_mobile(),
        })
        .arg(format!("--user-agent={}", device.user_agent()))
        .arg(format!("--window-size={},{}", width, height))
        .arg("--disable-blink-features=AutomationControlled");
    if !headless {
        builder = builder.with_head();
    }
    let config = builder
        .build()
        .map_err(|e| anyhow::anyhow!("浏览器配置构建失败: {}", e))?;

    let (browser, mut handler) = Browser::launch(config).await.context("启动浏览器失败")?;
    debug!("浏览器进程已启动");

    // 在后台排空 CDP 事件流
    let handler_task = tokio::spawn(async move {
        while let Some(event) = handler.next().await {
            if event.is_err() {
                break;
            }
        }
    });

    // 短暂等待浏览器状态同步
    sleep(Duration::from_millis(300)).await;

    let page = browser
        .new_page("about:blank")
        .await
        .context("创建页面失败")?;
    page.enable_stealth_mode_with_agent(device.user_agent())
        .await
        .context("启用隐身模式失败")?;
    let stealth = AddScriptToEvaluateOnNewDocumentParams::builder()
        .source(STEALTH_SCRIPT)
        .build()
        .map_err(|e| anyhow::anyhow!("构造注入脚本失败: {}", e))?;
    page.evaluate_on_new_document(stealth)
        .await
        .context("注入反检测脚本失败")?;
    debug!("初始页面已创建 (视口 {}x{})", width, height);

    Ok((browser, page, handler_task))
}
