//! 登录认证 - 业务能力层
//!
//! 每个平台的登录都走同一个状态机：优先复用持久化 Cookie，
//! 失效时回退扫码登录。状态只朝 Authenticated 或终态失败单向
//! 推进，扫码等待有硬上限，不会无限挂起。

use std::fmt;
use std::fs;
use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use chromiumoxide::cdp::browser_protocol::network::{
    CookieParam, GetCookiesParams, SetCookiesParams, TimeSinceEpoch,
};
use chromiumoxide::Page;
use tracing::{debug, error, info, warn};

use crate::config::Config;
use crate::models::CookieRecord;
use crate::platforms::{LoginProbe, PlatformProfile};
use crate::services::selector;
use crate::utils::wait::poll_until;

/// 认证状态，单次运行内单向推进
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthState {
    /// 尚未尝试登录
    Unauthenticated,
    /// 已注入持久化 Cookie，等待探测
    CookieLoaded,
    /// 登录探测通过，可以开始投递
    Authenticated,
    /// Cookie 探测失败，需要扫码
    Expired,
    /// 扫码等待超时，当前平台的运行到此为止
    TimedOut,
}

impl fmt::Display for AuthState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            AuthState::Unauthenticated => "未登录",
            AuthState::CookieLoaded => "已加载Cookie",
            AuthState::Authenticated => "已登录",
            AuthState::Expired => "Cookie已失效",
            AuthState::TimedOut => "扫码超时",
        };
        f.write_str(text)
    }
}

/// Cookie 持久化存取
///
/// 文件只在会话开始时读取一次，只在登录成功后整体重写。
#[derive(Debug, Clone)]
pub struct CredentialStore {
    path: PathBuf,
}

impl CredentialStore {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    /// 读取持久化 Cookie，文件不存在或为空数组时返回 None
    pub fn load(&self) -> Result<Option<Vec<CookieRecord>>> {
        if !self.path.exists() {
            return Ok(None);
        }
        let text = fs::read_to_string(&self.path)
            .with_context(|| format!("读取 Cookie 文件 {} 失败", self.path.display()))?;
        let records: Vec<CookieRecord> = serde_json::from_str(&text)
            .with_context(|| format!("解析 Cookie 文件 {} 失败", self.path.display()))?;
        if records.is_empty() {
            Ok(None)
        } else {
            Ok(Some(records))
        }
    }

    /// 覆盖写入完整的 Cookie 集合
    pub fn save(&self, records: &[CookieRecord]) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("创建目录 {} 失败", parent.display()))?;
        }
        let text = serde_json::to_string_pretty(records)?;
        fs::write(&self.path, text)
            .with_context(|| format!("写入 Cookie 文件 {} 失败", self.path.display()))?;
        Ok(())
    }
}

/// 登录控制器
pub struct AuthController {
    qr_poll: Duration,
    qr_wait: Duration,
}

impl AuthController {
    pub fn new(config: &Config) -> Self {
        Self {
            qr_poll: config.qr_poll(),
            qr_wait: config.qr_wait(),
        }
    }

    /// 为平台建立已登录会话
    ///
    /// 返回 Authenticated 或 TimedOut，TimedOut 只终止当前平台。
    pub async fn login(
        &self,
        page: &Page,
        profile: &PlatformProfile,
        store: &CredentialStore,
    ) -> Result<AuthState> {
        info!("[{}] 正在打开站点并检查登录状态...", profile.name);
        page.goto(profile.home_url)
            .await
            .with_context(|| format!("打开 {} 首页失败", profile.name))?;
        page.wait_for_navigation().await.ok();

        let mut state = AuthState::Unauthenticated;
        if let Some(records) = store.load()? {
            info!(
                "[{}] 发现已保存的 Cookie ({} 条)，尝试复用...",
                profile.name,
                records.len()
            );
            self.inject_cookies(page, &records).await?;
            page.reload().await?;
            page.wait_for_navigation().await.ok();
            state = AuthState::CookieLoaded;
        }

        if self.probe_logged_in(page, profile).await {
            info!("[{}] ✓ Cookie 有效，已登录", profile.name);
            return Ok(AuthState::Authenticated);
        }
        if state == AuthState::CookieLoaded {
            warn!("[{}] Cookie 已失效，转入扫码登录", profile.name);
            state = AuthState::Expired;
        }
        debug!("[{}] 当前认证状态: {}", profile.name, state);

        self.scan_login(page, profile, store).await
    }

    /// 扫码登录流程，轮询探测直到成功或超时
    async fn scan_login(
        &self,
        page: &Page,
        profile: &PlatformProfile,
        store: &CredentialStore,
    ) -> Result<AuthState> {
        if let Some(login_url) = profile.login_url {
            page.goto(login_url)
                .await
                .with_context(|| format!("打开 {} 登录页失败", profile.name))?;
            page.wait_for_navigation().await.ok();
        }

        // 部分平台默认展示账号密码面板，需要先切到扫码面板
        if let Some(qr_switch) = &profile.qr_switch {
            if let Some(button) = selector::resolve_first(page, qr_switch).await {
                if button.click().await.is_ok() {
                    debug!("[{}] 已切换到扫码登录面板", profile.name);
                }
            }
        }

        info!(
            "[{}] 请使用 App 扫码登录，等待上限 {} 分钟...",
            profile.name,
            self.qr_wait.as_secs() / 60
        );
        let ok = poll_until(self.qr_poll, self.qr_wait, || {
            self.probe_logged_in(page, profile)
        })
        .await;

        if !ok {
            error!(
                "[{}] ❌ 扫码登录超时（{} 秒内未完成），跳过该平台",
                profile.name,
                self.qr_wait.as_secs()
            );
            return Ok(AuthState::TimedOut);
        }

        info!("[{}] ✓ 扫码登录成功", profile.name);
        // 登录成功立即持久化，覆盖旧 Cookie；写盘失败不影响登录结果
        match self.export_cookies(page).await {
            Ok(records) => match store.save(&records) {
                Ok(()) => info!("[{}] Cookie 已保存 ({} 条)", profile.name, records.len()),
                Err(e) => warn!("[{}] ⚠️ 保存 Cookie 失败: {:#}", profile.name, e),
            },
            Err(e) => warn!("[{}] ⚠️ 导出 Cookie 失败: {:#}", profile.name, e),
        }
        Ok(AuthState::Authenticated)
    }

    /// 平台相关的登录探测
    async fn probe_logged_in(&self, page: &Page, profile: &PlatformProfile) -> bool {
        match &profile.login_probe {
            LoginProbe::UrlContains(marker) => page
                .url()
                .await
                .ok()
                .flatten()
                .is_some_and(|url| url.contains(marker)),
            LoginProbe::Selector(cascade) => selector::resolve(page, cascade).await.is_some(),
        }
    }

    /// 把持久化 Cookie 注入当前会话
    async fn inject_cookies(&self, page: &Page, records: &[CookieRecord]) -> Result<()> {
        let mut params = Vec::with_capacity(records.len());
        for record in records {
            let mut builder = CookieParam::builder()
                .name(&record.name)
                .value(&record.value);
            if let Some(domain) = &record.domain {
                builder = builder.domain(domain);
            }
            if let Some(path) = &record.path {
                builder = builder.path(path);
            }
            if let Some(expires) = record.expires {
                builder = builder.expires(TimeSinceEpoch::new(expires));
            }
            if let Some(secure) = record.secure {
                builder = builder.secure(secure);
            }
            if let Some(http_only) = record.http_only {
                builder = builder.http_only(http_only);
            }
            let param = builder
                .build()
                .map_err(|e| anyhow::anyhow!("构造 Cookie 参数失败: {}", e))?;
            params.push(param);
        }
        page.execute(SetCookiesParams::new(params))
            .await
            .context("注入 Cookie 失败")?;
        Ok(())
    }

    /// 导出当前会话的全部 Cookie
    ///
    /// CDP 返回结构的字段命名与持久化格式一致，经 JSON 转一道即可。
    async fn export_cookies(&self, page: &Page) -> Result<Vec<CookieRecord>> {
        let response = page
            .execute(GetCookiesParams::default())
            .await
            .context("读取会话 Cookie 失败")?;
        let value = serde_json::to_value(&response.result.cookies)?;
        let records: Vec<CookieRecord> = serde_json::from_value(value)?;
        Ok(records)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(name: &str) -> CookieRecord {
        CookieRecord {
            name: name.to_string(),
            value: "v".to_string(),
            domain: Some(".example.com".to_string()),
            path: Some("/".to_string()),
            expires: None,
            secure: None,
            http_only: Some(true),
        }
    }

    #[test]
    fn missing_file_loads_as_none() {
        let dir = tempfile::tempdir().unwrap();
        let store = CredentialStore::new(dir.path().join("cookie.json"));
        assert!(store.load().unwrap().is_none());
    }

    #[test]
    fn empty_array_loads_as_none() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cookie.json");
        fs::write(&path, "[]").unwrap();
        let store = CredentialStore::new(path);
        assert!(store.load().unwrap().is_none());
    }

    #[test]
    fn save_then_load_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let store = CredentialStore::new(dir.path().join("liepin").join("cookie.json"));
        store.save(&[record("token"), record("sid")]).unwrap();

        let loaded = store.load().unwrap().unwrap();
        assert_eq!(loaded.len(), 2);
        assert_eq!(loaded[0].name, "token");
        assert_eq!(loaded[0].http_only, Some(true));
    }

    #[test]
    fn save_overwrites_previous_credential() {
        let dir = tempfile::tempdir().unwrap();
        let store = CredentialStore::new(dir.path().join("cookie.json"));
        store.save(&[record("old")]).unwrap();
        store.save(&[record("new")]).unwrap();

        let loaded = store.load().unwrap().unwrap();
        assert_eq!(loaded.len(), 1);
        assert_eq!(loaded[0].name, "new");
    }

    #[test]
    fn auth_state_display_is_readable() {
        assert_eq!(AuthState::TimedOut.to_string(), "扫码超时");
        assert_eq!(AuthState::Authenticated.to_string(), "已登录");
    }
}
