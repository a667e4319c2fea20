//! 单平台运行器 - 编排层
//!
//! 负责一个平台的完整生命周期：开会话、登录、逐关键词遍历投递、
//! 汇总上报、释放资源。运行中的任何异常都在本模块边界内消化，
//! 上报与资源释放在每条退出路径上都会执行。

use anyhow::Result;
use tracing::{error, info, warn};

use crate::config::Config;
use crate::infrastructure::{DeviceProfile, SessionRegistry};
use crate::models::{BlacklistSet, PlatformId};
use crate::platforms::{self, PlatformProfile};
use crate::services::auth::{AuthController, AuthState, CredentialStore};
use crate::services::notify::Notifier;
use crate::workflow::pagination::{PaginationWalker, WalkEnd};
use crate::workflow::run_ctx::RunCtx;
use crate::workflow::submission::{PageOutcome, RetryPolicy, SubmissionPipeline};

/// 单平台运行的最终走向
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunOutcome {
    /// 正常跑完
    Completed,
    /// 扫码登录超时
    AuthTimedOut,
    /// 当日投递上限提前结束
    DailyLimit,
    /// 访问验证或未分类异常
    Failed,
}

/// 单平台运行结果，交给编排层决定后续动作
#[derive(Debug, Clone)]
pub struct RunResult {
    pub platform: PlatformId,
    pub outcome: RunOutcome,
    pub submitted: usize,
}

/// 运行一个平台
///
/// 不向外抛错：无论内部如何结束，本函数都会完成汇总上报与
/// 会话释放，然后返回结果，编排层总是继续下一个平台。
pub async fn run_platform(
    registry: &mut SessionRegistry,
    notifier: &Notifier,
    config: &Config,
    id: PlatformId,
) -> RunResult {
    let profile = platforms::profile_for(id);
    info!("{}", "=".repeat(60));
    info!("🚀 开始处理 [{}] 平台", profile.name);
    info!("{}", "=".repeat(60));

    let blacklist = load_blacklist(config, id);
    let mut ctx = RunCtx::new(id, blacklist, config.greeting.clone());

    let outcome = match run_inner(registry, config, &profile, &mut ctx).await {
        Ok(outcome) => outcome,
        Err(e) => {
            error!("[{}] ❌ 运行发生未分类异常: {:#}", profile.name, e);
            RunOutcome::Failed
        }
    };

    // 回写归一化后的黑名单
    if let Err(e) = ctx.blacklist.save(&config.blacklist_path(id)) {
        warn!("[{}] ⚠️ 保存黑名单失败: {:#}", profile.name, e);
    }

    // 汇总与释放放在运行边界上，任何退出路径都会走到这里
    let submitted = ctx.report.submitted_count();
    let summary = ctx.report.finalize(id, notifier).await;
    info!("{}", summary);
    registry.close(id).await;

    RunResult {
        platform: id,
        outcome,
        submitted,
    }
}

/// 平台运行主体，认证通过后逐关键词遍历投递
async fn run_inner(
    registry: &mut SessionRegistry,
    config: &Config,
    profile: &PlatformProfile,
    ctx: &mut RunCtx,
) -> Result<RunOutcome> {
    let session = registry
        .open(profile.id, DeviceProfile::Desktop, config.headless)
        .await?;

    let store = CredentialStore::new(config.cookie_path(profile.id));
    let auth = AuthController::new(config);
    match auth.login(&session.page, profile, &store).await? {
        AuthState::Authenticated => {}
        AuthState::TimedOut => return Ok(RunOutcome::AuthTimedOut),
        other => {
            warn!("[{}] 登录未完成，当前状态: {}", profile.name, other);
            return Ok(RunOutcome::Failed);
        }
    }

    // 投递流程只会在认证通过后进入
    let pipeline = SubmissionPipeline::new(RetryPolicy {
        max_attempts: config.submit_max_retries.max(1),
        ..RetryPolicy::default()
    });
    let city_code = platforms::city_code(profile.id, &config.city)
        .map(str::to_string)
        .or_else(|| Some(config.city.clone()));

    let mut outcome = RunOutcome::Completed;
    'keywords: for keyword in config.keywords_for(profile.id) {
        info!("[{}] 开始投递关键词:【{}】", profile.name, keyword);
        let mut walker = PaginationWalker::new(
            &keyword,
            city_code.clone(),
            config.salary_for(profile.id),
            config.max_page_for(profile.id),
            config.max_retries_per_page,
        );

        while let Some(ready) = walker.next_page(&session.page, profile).await? {
            info!(
                "[{}] 正在投递【{}】第【{}】页...",
                profile.name, keyword, ready.page_no
            );
            let page_outcome = pipeline
                .process(&session.browser, &session.page, profile, ctx)
                .await?;
            if page_outcome == PageOutcome::DailyLimit {
                outcome = RunOutcome::DailyLimit;
                break 'keywords;
            }
        }

        if !walker.skipped_pages().is_empty() {
            warn!(
                "[{}] 以下页面多次加载失败被跳过: {:?}",
                profile.name,
                walker.skipped_pages()
            );
        }
        match walker.end_reason() {
            Some(WalkEnd::DailyLimit) => {
                outcome = RunOutcome::DailyLimit;
                break 'keywords;
            }
            Some(WalkEnd::Verification) => {
                outcome = RunOutcome::Failed;
                break 'keywords;
            }
            _ => {}
        }
        info!("[{}]【{}】关键词投递完成", profile.name, keyword);
    }
    Ok(outcome)
}

/// 加载平台黑名单，失败时退回空名单并继续运行
fn load_blacklist(config: &Config, id: PlatformId) -> BlacklistSet {
    match BlacklistSet::load(&config.blacklist_path(id)) {
        Ok(blacklist) => blacklist,
        Err(e) => {
            warn!("[{}] ⚠️ 加载黑名单失败，使用空名单: {:#}", id, e);
            BlacklistSet::default()
        }
    }
}
