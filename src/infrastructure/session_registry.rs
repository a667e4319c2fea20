//! 会话注册表 - 基础设施层
//!
//! 持有各平台的浏览器资源，平台之间互不共享。打开与关闭是显式
//! 的生命周期操作：同一平台最多一个活跃会话，释放时各项资源独立
//! 处理，单项失败只记录不传播。

use std::collections::HashMap;

use chromiumoxide::{Browser, Page};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::browser::launcher;
use crate::error::{EngineError, EngineResult};
use crate::models::PlatformId;

/// 设备画像，决定视口与 UA
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeviceProfile {
    Desktop,
    Mobile,
}

impl DeviceProfile {
    pub fn viewport(&self) -> (u32, u32) {
        match self {
            DeviceProfile::Desktop => (1920, 1080),
            DeviceProfile::Mobile => (375, 812),
        }
    }

    pub fn scale_factor(&self) -> f64 {
        match self {
            DeviceProfile::Desktop => 1.0,
            DeviceProfile::Mobile => 3.0,
        }
    }

    pub fn is_mobile(&self) -> bool {
        matches!(self, DeviceProfile::Mobile)
    }

    pub fn user_agent(&self) -> &'static str {
        match self {
            DeviceProfile::Desktop => {
                "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36 \
                 (KHTML, like Gecko) Chrome/135.0.0.0 Safari/537.36"
            }
            DeviceProfile::Mobile => {
                "Mozilla/5.0 (iPhone; CPU iPhone OS 13_2_3 like Mac OS X) AppleWebKit/605.1.15 \
                 (KHTML, like Gecko) Version/13.0.3 Mobile/15E148 Safari/604.1"
            }
        }
    }
}

/// 单个平台的浏览器会话资源
pub struct PlatformSession {
    pub platform: PlatformId,
    pub browser: Browser,
    pub page: Page,
    pub device: DeviceProfile,
    /// CDP 事件排空任务，关闭会话时中止
    handler_task: JoinHandle<()>,
}

/// 平台会话注册表
///
/// 会话表只由 open / close 两个入口修改，其他组件拿到的是
/// 只读引用，不会越过注册表触碰别的平台的资源。
#[derive(Default)]
pub struct SessionRegistry {
    sessions: HashMap<PlatformId, PlatformSession>,
}

impl SessionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// 为平台创建并登记会话
    ///
    /// 已存在未关闭的会话时报错，必须先 close。
    pub async fn open(
        &mut self,
        platform: PlatformId,
        device: DeviceProfile,
        headless: bool,
    ) -> EngineResult<&PlatformSession> {
        if self.sessions.contains_key(&platform) {
            return Err(EngineError::session_already_open(platform.as_str()));
        }

        info!("[{}] 正在启动浏览器实例...", platform);
        let (browser, page, handler_task) = launcher::launch(device, headless)
            .await
            .map_err(EngineError::launch_failed)?;

        let session = PlatformSession {
            platform,
            browser,
            page,
            device,
            handler_task,
        };
        info!("[{}] ✓ 浏览器会话已就绪", platform);
        Ok(self.sessions.entry(platform).or_insert(session))
    }

    /// 查询平台的活跃会话
    pub fn get(&self, platform: PlatformId) -> Option<&PlatformSession> {
        self.sessions.get(&platform)
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }

    /// 释放平台的全部资源
    ///
    /// 页面、浏览器、事件任务逐项释放，失败只记录。调用后该平台
    /// 的资源句柄不再存在于注册表中。
    pub async fn close(&mut self, platform: PlatformId) {
        let Some(session) = self.sessions.remove(&platform) else {
            debug!("[{}] 没有需要关闭的会话", platform);
            return;
        };
        let PlatformSession {
            page,
            mut browser,
            handler_task,
            ..
        } = session;

        if let Err(e) = page.close().await {
            warn!("[{}] 关闭页面失败: {}", platform, e);
        }
        if let Err(e) = browser.close().await {
            warn!("[{}] 关闭浏览器失败: {}", platform, e);
        }
        if let Err(e) = browser.wait().await {
            debug!("[{}] 等待浏览器进程退出失败: {}", platform, e);
        }
        handler_task.abort();
        info!("[{}] 浏览器资源已释放", platform);
    }

    /// 关闭所有已登记的会话
    pub async fn close_all(&mut self) {
        let ids: Vec<PlatformId> = self.sessions.keys().copied().collect();
        for id in &ids {
            self.close(*id).await;
        }
        if !ids.is_empty() {
            info!("所有平台的浏览器实例已关闭 ({} 个)", ids.len());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn desktop_profile_matches_production_values() {
        let (w, h) = DeviceProfile::Desktop.viewport();
        assert_eq!((w, h), (1920, 1080));
        assert!(DeviceProfile::Desktop.user_agent().contains("Chrome"));
    }

    #[test]
    fn mobile_profile_uses_touch_viewport() {
        let (w, h) = DeviceProfile::Mobile.viewport();
        assert_eq!((w, h), (375, 812));
        assert!(DeviceProfile::Mobile.user_agent().contains("iPhone"));
    }

    #[test]
    fn empty_registry_has_no_sessions() {
        let registry = SessionRegistry::new();
        assert!(registry.is_empty());
        assert_eq!(registry.len(), 0);
        assert!(registry.get(PlatformId::Liepin).is_none());
    }
}
