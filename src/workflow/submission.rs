//! 岗位投递流水线 - 流程层
//!
//! 处理当前结果页上的全部岗位：抽取、过滤、去重、选中、投递。
//! 每条岗位恰好落下一条投递记录，单条失败不会影响同页的其他
//! 岗位。过滤检查在任何投递动作之前强制执行。

use std::time::Duration;

use anyhow::{Context, Result};
use chromiumoxide::{Browser, Element, Page};
use tokio::time::sleep;
use tracing::{debug, info, warn};

use crate::error::EngineError;
use crate::models::{Listing, SubmissionRecord};
use crate::platforms::{PlatformProfile, SubmitMode, TabGreeting};
use crate::services::filter::FilterEngine;
use crate::services::selector::{self, SelectorCascade};
use crate::utils::wait::poll_until;
use crate::workflow::run_ctx::RunCtx;

/// 投递按钮交互的重试参数
#[derive(Debug, Clone, Copy)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub pause: Duration,
    /// 每连续失败多少次做一次整页刷新
    pub reload_every: u32,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 10,
            pause: Duration::from_secs(3),
            reload_every: 3,
        }
    }
}

/// 当前页处理完后的走向
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageOutcome {
    /// 继续下一页
    Continue,
    /// 投递后平台提示达到当日上限
    DailyLimit,
}

/// 岗位投递流水线
pub struct SubmissionPipeline {
    retry: RetryPolicy,
}

impl SubmissionPipeline {
    pub fn new(retry: RetryPolicy) -> Self {
        Self { retry }
    }

    /// 处理当前页面上的所有岗位
    pub async fn process(
        &self,
        browser: &Browser,
        page: &Page,
        profile: &PlatformProfile,
        ctx: &mut RunCtx,
    ) -> Result<PageOutcome> {
        let Some(cards) = selector::resolve(page, &profile.card).await else {
            warn!("[{}] 当前页没有找到岗位卡片", profile.name);
            return Ok(PageOutcome::Continue);
        };
        info!(
            "[{}] 找到 {} 个岗位卡片 (选择器: {})",
            profile.name,
            cards.count(),
            cards.selector
        );

        match &profile.submit {
            SubmitMode::ChatPerListing {
                chat_button,
                dialog,
                input,
                close,
            } => {
                self.process_chat_mode(
                    page,
                    profile,
                    ctx,
                    &cards.items,
                    chat_button,
                    dialog,
                    input,
                    close,
                )
                .await
            }
            SubmitMode::BatchSelect {
                checkbox,
                submit,
                popup_close,
                tab_greeting,
            } => {
                self.process_batch_mode(
                    browser,
                    page,
                    profile,
                    ctx,
                    &cards.items,
                    checkbox,
                    submit,
                    popup_close,
                    tab_greeting.as_ref(),
                )
                .await
            }
        }
    }

    /// 过滤与去重检查，不通过时落一条 Skipped 记录
    fn admit(&self, profile: &PlatformProfile, ctx: &mut RunCtx, listing: &Listing) -> bool {
        if let Some(reason) = FilterEngine::skip_reason(listing, &ctx.blacklist) {
            debug!("[{}] 过滤岗位 {}: {}", profile.name, listing.title, reason);
            ctx.report
                .record(SubmissionRecord::skipped(listing.clone(), reason.to_string()));
            return false;
        }
        if !ctx.dedupe.insert(listing) {
            debug!(
                "[{}] 本次运行已处理过:【{}】{}",
                profile.name, listing.company, listing.title
            );
            ctx.report
                .record(SubmissionRecord::skipped(listing.clone(), "本次运行已投递"));
            return false;
        }
        true
    }

    // ========== 逐条打招呼模式 ==========

    #[allow(clippy::too_many_arguments)]
    async fn process_chat_mode(
        &self,
        page: &Page,
        profile: &PlatformProfile,
        ctx: &mut RunCtx,
        cards: &[Element],
        chat_button: &SelectorCascade,
        dialog: &SelectorCascade,
        input: &SelectorCascade,
        close: &SelectorCascade,
    ) -> Result<PageOutcome> {
        for card in cards {
            let Some(listing) = extract_listing(card, profile).await else {
                debug!("[{}] 岗位卡片字段抽取失败，跳过", profile.name);
                continue;
            };
            if !self.admit(profile, ctx, &listing) {
                continue;
            }

            match self
                .chat_submit(page, ctx, card, chat_button, dialog, input, close)
                .await
            {
                Ok(()) => {
                    info!(
                        "[{}] ✓ 已打招呼:【{}】的【{}】岗位",
                        profile.name, listing.company, listing.title
                    );
                    ctx.report.record(SubmissionRecord::submitted(listing));
                }
                Err(e) => {
                    warn!(
                        "[{}] ⚠️ 投递失败:【{}】的【{}】岗位: {:#}",
                        profile.name, listing.company, listing.title, e
                    );
                    ctx.report
                        .record(SubmissionRecord::failed(listing, format!("{:#}", e)));
                }
            }
            // 操作间隔，避免过快触发风控
            sleep(Duration::from_secs(1)).await;
        }
        Ok(PageOutcome::Continue)
    }

    /// 单条岗位的聊天打招呼
    async fn chat_submit(
        &self,
        page: &Page,
        ctx: &RunCtx,
        card: &Element,
        chat_button: &SelectorCascade,
        dialog: &SelectorCascade,
        input: &SelectorCascade,
        close: &SelectorCascade,
    ) -> Result<()> {
        card.scroll_into_view().await.ok();
        hover(card).await;

        let button = match selector::resolve_first(card, chat_button).await {
            Some(button) => button,
            None => return Err(EngineError::target_missing(chat_button.target()).into()),
        };
        layered_click(&button).await.context("聊一聊入口点击失败")?;

        // 等待聊天窗口出现
        let opened = poll_until(
            Duration::from_millis(500),
            Duration::from_secs(5),
            || async move { selector::resolve(page, dialog).await.is_some() },
        )
        .await;
        if !opened {
            return Err(EngineError::dialog_missing(dialog.target()).into());
        }

        let input_el = match selector::resolve_first(page, input).await {
            Some(input_el) => input_el,
            None => return Err(EngineError::target_missing(input.target()).into()),
        };
        input_el.click().await.ok();
        input_el
            .type_str(&ctx.greeting)
            .await
            .context("输入打招呼内容失败")?;
        input_el.press_key("Enter").await.context("发送消息失败")?;
        sleep(Duration::from_secs(1)).await;

        if let Some(close_el) = selector::resolve_first(page, close).await {
            close_el.click().await.ok();
            debug!("已关闭聊天窗口");
        }
        Ok(())
    }

    // ========== 批量投递模式 ==========

    #[allow(clippy::too_many_arguments)]
    async fn process_batch_mode(
        &self,
        browser: &Browser,
        page: &Page,
        profile: &PlatformProfile,
        ctx: &mut RunCtx,
        cards: &[Element],
        checkbox: &SelectorCascade,
        submit: &SelectorCascade,
        popup_close: &SelectorCascade,
        tab_greeting: Option<&TabGreeting>,
    ) -> Result<PageOutcome> {
        let mut picked: Vec<Listing> = Vec::new();
        for card in cards {
            let Some(listing) = extract_listing(card, profile).await else {
                continue;
            };
            if !self.admit(profile, ctx, &listing) {
                continue;
            }
            let Some(check) = selector::resolve_first(card, checkbox).await else {
                warn!("[{}] 未找到选中控件:【{}】", profile.name, listing.title);
                ctx.report
                    .record(SubmissionRecord::failed(listing, "未找到选中控件"));
                continue;
            };
            check.scroll_into_view().await.ok();
            if let Err(e) = layered_click(&check).await {
                ctx.report
                    .record(SubmissionRecord::failed(listing, format!("勾选失败: {:#}", e)));
                continue;
            }
            info!("[{}] 选中:【{}】| {}", profile.name, listing.company, listing.title);
            picked.push(listing);
        }

        if picked.is_empty() {
            info!("[{}] 本页没有可投递的岗位", profile.name);
            return Ok(PageOutcome::Continue);
        }

        page.evaluate("window.scrollTo({ top: 0, behavior: 'smooth' })")
            .await
            .ok();
        sleep(Duration::from_secs(1)).await;

        match self.click_batch_submit(page, profile, submit).await {
            Ok(()) => {}
            Err(e) => {
                warn!("[{}] ❌ 批量投递失败: {:#}", profile.name, e);
                for listing in picked {
                    ctx.report
                        .record(SubmissionRecord::failed(listing, format!("{:#}", e)));
                }
                return Ok(PageOutcome::Continue);
            }
        }

        // 投递动作可能立刻撞上当日上限
        if let Some(probe) = &profile.daily_limit_probe {
            if probe.hit(page).await {
                info!("[{}] 投递后提示已达当日上限", profile.name);
                for listing in picked {
                    ctx.report
                        .record(SubmissionRecord::skipped(listing, "今日投递已达上限"));
                }
                return Ok(PageOutcome::DailyLimit);
            }
        }

        self.close_result_popup(page, popup_close).await;
        if let Some(greet) = tab_greeting {
            self.greet_in_new_tab(browser, page, greet, &ctx.greeting).await;
        }

        for listing in picked {
            info!(
                "[{}] ✓ 已投递:【{}】的【{}】岗位",
                profile.name, listing.company, listing.title
            );
            ctx.report.record(SubmissionRecord::submitted(listing));
        }
        Ok(PageOutcome::Continue)
    }

    /// 批量投递按钮交互，带完整重试策略
    async fn click_batch_submit(
        &self,
        page: &Page,
        profile: &PlatformProfile,
        submit: &SelectorCascade,
    ) -> Result<()> {
        for attempt in 1..=self.retry.max_attempts {
            if let Some(matched) = selector::resolve(page, submit).await {
                // 命中多个按钮时第二个才是投递，第一个通常是收藏或全选
                let button = matched.items.get(1).unwrap_or(&matched.items[0]);
                button.scroll_into_view().await.ok();
                match layered_click(button).await {
                    Ok(()) => {
                        info!(
                            "[{}] ✓ 批量投递按钮已点击 (尝试 {}/{})",
                            profile.name, attempt, self.retry.max_attempts
                        );
                        sleep(Duration::from_secs(2)).await;
                        return Ok(());
                    }
                    Err(e) => warn!(
                        "[{}] 批量投递点击失败 (尝试 {}/{}): {:#}",
                        profile.name, attempt, self.retry.max_attempts, e
                    ),
                }
            } else {
                warn!(
                    "[{}] 未找到批量投递按钮 (尝试 {}/{})",
                    profile.name, attempt, self.retry.max_attempts
                );
            }

            if attempt % self.retry.reload_every == 0 {
                info!("[{}] 连续失败，刷新页面后重试", profile.name);
                page.reload().await.ok();
                page.wait_for_navigation().await.ok();
            }
            sleep(self.retry.pause).await;
        }
        Err(EngineError::click_failed(submit.target(), self.retry.max_attempts).into())
    }

    /// 关闭投递结果弹窗，找不到就当作没有弹出
    async fn close_result_popup(&self, page: &Page, popup_close: &SelectorCascade) {
        sleep(Duration::from_secs(2)).await;
        if let Some(close) = selector::resolve_first(page, popup_close).await {
            if close.click().await.is_ok() {
                debug!("已关闭投递结果弹窗");
            }
        }
    }

    /// 投递弹出的新标签页里的打招呼
    ///
    /// 严格嵌套的同步交接：切过去、发送、关闭、切回来，任何一步
    /// 失败只告警，不影响本页投递结果。
    async fn greet_in_new_tab(
        &self,
        browser: &Browser,
        origin: &Page,
        greet: &TabGreeting,
        greeting: &str,
    ) {
        match self.try_greet_in_new_tab(browser, origin, greet, greeting).await {
            Ok(true) => info!("✓ 已在新标签页完成打招呼"),
            Ok(false) => debug!("投递后没有弹出新标签页"),
            Err(e) => warn!("⚠️ 新标签页打招呼失败: {:#}", e),
        }
    }

    async fn try_greet_in_new_tab(
        &self,
        browser: &Browser,
        origin: &Page,
        greet: &TabGreeting,
        greeting: &str,
    ) -> Result<bool> {
        sleep(Duration::from_secs(1)).await;
        let pages = browser.pages().await.context("枚举标签页失败")?;
        let Some(tab) = pages
            .into_iter()
            .find(|p| p.target_id() != origin.target_id())
        else {
            return Ok(false);
        };

        tab.bring_to_front().await.ok();
        if let Some(button) = selector::resolve_first(&tab, &greet.contact_button).await {
            button.click().await.ok();
            sleep(Duration::from_millis(500)).await;
        }
        if let Some(input) = selector::resolve_first(&tab, &greet.input).await {
            input.click().await.ok();
            input
                .type_str(greeting)
                .await
                .context("输入打招呼内容失败")?;
            if let Some(send) = selector::resolve_first(&tab, &greet.send_button).await {
                send.click().await.ok();
            }
            sleep(Duration::from_secs(1)).await;
        }

        tab.close().await.ok();
        origin.bring_to_front().await.ok();
        Ok(true)
    }
}

// ========== 交互辅助 ==========

/// 从岗位卡片抽取字段，标题或公司缺失视作抽取失败
async fn extract_listing(card: &Element, profile: &PlatformProfile) -> Option<Listing> {
    let title = field_text(card, &profile.title_field).await?;
    let company = field_text(card, &profile.company_field).await?;
    let salary = match &profile.salary_field {
        Some(cascade) => field_text(card, cascade).await,
        None => None,
    };
    let recruiter = match &profile.recruiter_field {
        Some(cascade) => field_text(card, cascade).await,
        None => None,
    };
    Some(Listing {
        title,
        company,
        recruiter,
        salary,
    })
}

/// 取级联首个命中元素的文本并压缩空白
async fn field_text(card: &Element, cascade: &SelectorCascade) -> Option<String> {
    let element = selector::resolve_first(card, cascade).await?;
    let text = element.inner_text().await.ok().flatten()?;
    let cleaned = squash_whitespace(&text);
    if cleaned.is_empty() {
        None
    } else {
        Some(cleaned)
    }
}

/// 把换行和连续空白压成单个空格
fn squash_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// 分层点击：原生点击、脚本点击、合成鼠标事件，依次尝试
pub(crate) async fn layered_click(element: &Element) -> Result<()> {
    if element.click().await.is_ok() {
        return Ok(());
    }
    debug!("原生点击失败，改用脚本点击");
    if element
        .call_js_fn("function() { this.click(); }", false)
        .await
        .is_ok()
    {
        return Ok(());
    }
    debug!("脚本点击失败，改派发合成鼠标事件");
    element
        .call_js_fn(
            r#"function() {
                for (const type of ['mousedown', 'mouseup', 'click']) {
                    this.dispatchEvent(new MouseEvent(type, { bubbles: true, cancelable: true, view: window }));
                }
            }"#,
            false,
        )
        .await
        .context("合成鼠标事件派发失败")?;
    Ok(())
}

/// 向元素派发悬停事件，唤出悬停后才显示的入口
async fn hover(element: &Element) {
    let hovered = element
        .call_js_fn(
            r#"function() {
                for (const type of ['mouseenter', 'mouseover']) {
                    this.dispatchEvent(new MouseEvent(type, { bubbles: true, cancelable: true, view: window }));
                }
            }"#,
            false,
        )
        .await;
    if hovered.is_err() {
        debug!("悬停事件派发失败，继续后续交互");
    }
    sleep(Duration::from_millis(300)).await;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn squash_whitespace_flattens_newlines() {
        assert_eq!(squash_whitespace("Java 开发\n【上海】 "), "Java 开发 【上海】");
        assert_eq!(squash_whitespace("  \n "), "");
    }

    #[test]
    fn default_retry_policy_matches_config_defaults() {
        let retry = RetryPolicy::default();
        assert_eq!(retry.max_attempts, 10);
        assert_eq!(retry.reload_every, 3);
    }
}
