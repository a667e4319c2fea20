use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use serde::Deserialize;
use tracing::{info, warn};

use crate::models::PlatformId;

/// 程序配置文件
#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct Config {
    /// 投递关键词列表
    pub keywords: Vec<String>,
    /// 目标城市
    pub city: String,
    /// 期望薪资区间，格式由各平台自行解释
    pub salary: Option<String>,
    /// 每个关键词最多翻页数
    pub max_page: u32,
    /// 单页跳转失败的最大重试次数
    pub max_retries_per_page: u32,
    /// 投递按钮交互的最大重试次数
    pub submit_max_retries: u32,
    /// 扫码登录等待上限（秒）
    pub qr_wait_secs: u64,
    /// 扫码登录轮询间隔（秒）
    pub qr_poll_secs: u64,
    /// 是否无头模式运行浏览器
    pub headless: bool,
    /// Cookie 与黑名单数据文件目录
    pub data_dir: String,
    /// 投递结果推送的 webhook 地址
    pub bot_webhook_url: Option<String>,
    /// 打招呼内容
    pub greeting: String,
    /// 平台级覆盖配置
    pub platform: HashMap<String, PlatformTuning>,
}

/// 单个平台的覆盖项，缺省继承全局配置
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default)]
pub struct PlatformTuning {
    pub max_page: Option<u32>,
    pub keywords: Option<Vec<String>>,
    pub salary: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            keywords: vec!["Java".to_string()],
            city: "上海".to_string(),
            salary: None,
            max_page: 10,
            max_retries_per_page: 3,
            submit_max_retries: 10,
            qr_wait_secs: 20 * 60,
            qr_poll_secs: 2,
            headless: false,
            data_dir: "data".to_string(),
            bot_webhook_url: None,
            greeting: "您好，我对这个岗位很感兴趣，期待与您进一步沟通！".to_string(),
            platform: HashMap::new(),
        }
    }
}

impl Config {
    /// 加载配置：存在 config.toml 时读取，再叠加环境变量覆盖
    pub fn load() -> Self {
        let config = match Self::from_file(Path::new("config.toml")) {
            Ok(Some(config)) => {
                info!("已加载配置文件: config.toml");
                config
            }
            Ok(None) => Self::default(),
            Err(e) => {
                warn!("⚠️ 配置文件解析失败，使用默认配置: {:#}", e);
                Self::default()
            }
        };
        config.apply_env()
    }

    /// 从 TOML 文件读取配置，文件不存在返回 None
    pub fn from_file(path: &Path) -> Result<Option<Self>> {
        if !path.exists() {
            return Ok(None);
        }
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("读取配置文件 {} 失败", path.display()))?;
        let config = toml::from_str(&text)
            .with_context(|| format!("解析配置文件 {} 失败", path.display()))?;
        Ok(Some(config))
    }

    /// 叠加环境变量覆盖
    pub fn apply_env(self) -> Self {
        Self {
            city: std::env::var("JOB_CITY").unwrap_or(self.city),
            max_page: std::env::var("JOB_MAX_PAGE").ok().and_then(|v| v.parse().ok()).unwrap_or(self.max_page),
            qr_wait_secs: std::env::var("JOB_QR_WAIT_SECS").ok().and_then(|v| v.parse().ok()).unwrap_or(self.qr_wait_secs),
            headless: std::env::var("JOB_HEADLESS").ok().and_then(|v| v.parse().ok()).unwrap_or(self.headless),
            data_dir: std::env::var("JOB_DATA_DIR").unwrap_or(self.data_dir),
            bot_webhook_url: std::env::var("JOB_BOT_WEBHOOK").ok().or(self.bot_webhook_url),
            ..self
        }
    }

    fn tuning(&self, id: PlatformId) -> Option<&PlatformTuning> {
        self.platform.get(id.as_str())
    }

    /// 平台生效的最大页数
    pub fn max_page_for(&self, id: PlatformId) -> u32 {
        self.tuning(id)
            .and_then(|t| t.max_page)
            .unwrap_or(self.max_page)
            .max(1)
    }

    /// 平台生效的关键词列表
    pub fn keywords_for(&self, id: PlatformId) -> Vec<String> {
        self.tuning(id)
            .and_then(|t| t.keywords.clone())
            .unwrap_or_else(|| self.keywords.clone())
    }

    /// 平台生效的薪资筛选
    pub fn salary_for(&self, id: PlatformId) -> Option<String> {
        self.tuning(id)
            .and_then(|t| t.salary.clone())
            .or_else(|| self.salary.clone())
    }

    /// 平台 Cookie 文件路径
    pub fn cookie_path(&self, id: PlatformId) -> PathBuf {
        Path::new(&self.data_dir).join(id.as_str()).join("cookie.json")
    }

    /// 平台黑名单文件路径
    pub fn blacklist_path(&self, id: PlatformId) -> PathBuf {
        Path::new(&self.data_dir).join(id.as_str()).join("data.json")
    }

    pub fn qr_wait(&self) -> Duration {
        Duration::from_secs(self.qr_wait_secs)
    }

    pub fn qr_poll(&self) -> Duration {
        Duration::from_secs(self.qr_poll_secs.max(1))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_toml_with_platform_override() {
        let config: Config = toml::from_str(
            r#"
            keywords = ["Rust", "后端"]
            city = "北京"
            max_page = 8

            [platform.zhilian]
            max_page = 50

            [platform.liepin]
            keywords = ["Rust"]
            salary = "30$50"
            "#,
        )
        .unwrap();

        assert_eq!(config.keywords.len(), 2);
        assert_eq!(config.max_page_for(PlatformId::Zhilian), 50);
        assert_eq!(config.max_page_for(PlatformId::Job51), 8);
        assert_eq!(config.keywords_for(PlatformId::Liepin), vec!["Rust"]);
        assert_eq!(
            config.keywords_for(PlatformId::Job51),
            vec!["Rust", "后端"]
        );
        assert_eq!(config.salary_for(PlatformId::Liepin).as_deref(), Some("30$50"));
        assert_eq!(config.salary_for(PlatformId::Zhilian), None);
    }

    #[test]
    fn default_bounds_are_deliberate() {
        let config = Config::default();
        assert_eq!(config.max_page, 10);
        assert_eq!(config.max_retries_per_page, 3);
        assert_eq!(config.submit_max_retries, 10);
        assert_eq!(config.qr_wait_secs, 1200);
        assert_eq!(config.qr_poll_secs, 2);
    }

    #[test]
    fn data_paths_are_per_platform() {
        let config = Config::default();
        assert_eq!(
            config.cookie_path(PlatformId::Liepin),
            PathBuf::from("data/liepin/cookie.json")
        );
        assert_eq!(
            config.blacklist_path(PlatformId::Job51),
            PathBuf::from("data/job51/data.json")
        );
    }

    #[test]
    fn max_page_never_below_one() {
        let config: Config = toml::from_str("max_page = 0").unwrap();
        assert_eq!(config.max_page_for(PlatformId::Liepin), 1);
    }
}
