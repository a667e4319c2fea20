//! 应用编排 - 编排层
//!
//! 平台之间严格串行：每个平台独占一个浏览器会话，并发会话会
//! 带来共享驱动方面的风险，这里刻意避免。

use tracing::info;

use crate::config::Config;
use crate::infrastructure::SessionRegistry;
use crate::models::PlatformId;
use crate::orchestrator::platform_runner::{run_platform, RunOutcome, RunResult};
use crate::services::notify::Notifier;

/// 应用主结构
pub struct App {
    config: Config,
    registry: SessionRegistry,
    notifier: Notifier,
}

impl App {
    /// 初始化应用
    pub fn initialize(config: Config) -> Self {
        let notifier = Notifier::new(config.bot_webhook_url.clone());
        Self {
            config,
            registry: SessionRegistry::new(),
            notifier,
        }
    }

    /// 依次运行各平台
    ///
    /// 单个平台的失败不影响后续平台，全部跑完后兜底清理会话表。
    pub async fn run(&mut self, platforms: &[PlatformId]) -> Vec<RunResult> {
        log_startup(&self.config, platforms);

        let mut results = Vec::with_capacity(platforms.len());
        for &id in platforms {
            let result = run_platform(&mut self.registry, &self.notifier, &self.config, id).await;
            results.push(result);
        }

        // 正常流程里每个平台结束时已释放，这里兜底再清一遍
        self.registry.close_all().await;
        log_final(&results);
        results
    }
}

// ========== 日志辅助函数 ==========

fn log_startup(config: &Config, platforms: &[PlatformId]) {
    info!("{}", "=".repeat(60));
    info!("🚀 程序启动 - 多平台自动投递模式");
    info!(
        "📋 将执行的招聘平台: {:?}",
        platforms.iter().map(|p| p.as_str()).collect::<Vec<_>>()
    );
    info!("🔍 关键词: {:?}, 城市: {}", config.keywords, config.city);
    info!("{}", "=".repeat(60));
}

fn log_final(results: &[RunResult]) {
    info!("\n{}", "=".repeat(60));
    info!("📊 全部平台处理完成");
    for result in results {
        let mark = match result.outcome {
            RunOutcome::Completed => "✅",
            RunOutcome::DailyLimit => "📛",
            RunOutcome::AuthTimedOut | RunOutcome::Failed => "❌",
        };
        info!(
            "{} [{}] {:?}，投递 {} 个岗位",
            mark,
            result.platform.display_name(),
            result.outcome,
            result.submitted
        );
    }
    info!("{}", "=".repeat(60));
}
