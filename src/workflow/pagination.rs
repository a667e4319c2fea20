//! 结果页遍历 - 流程层
//!
//! 有界翻页：每一页的跳转重试有上限，整个遍历的跳转总次数也有
//! 上限。跳转失败的页面记录后跳过，遍历继续；出现日投递上限或
//! 访问验证时立即终止当前平台的遍历。一次 walk 固定从第 1 页
//! 开始，不支持中途续走。

use std::time::Duration;

use anyhow::Result;
use chromiumoxide::Page;
use regex::Regex;
use tokio::time::sleep;
use tracing::{debug, info, warn};

use crate::error::EngineError;
use crate::platforms::{PagingMode, PlatformProfile};
use crate::services::selector;
use crate::workflow::submission::layered_click;

/// 遍历结束的原因
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WalkEnd {
    /// 翻到了配置的最大页数
    MaxPageReached,
    /// 找不到可用的下一页控件
    NoNextControl,
    /// 平台提示当日投递已达上限
    DailyLimit,
    /// 出现反爬验证页
    Verification,
}

/// 页面就绪事件
#[derive(Debug, Clone, Copy)]
pub struct PageReady {
    pub page_no: u32,
    /// 本页用掉的跳转尝试次数
    pub attempts: u32,
}

/// 跳转次数预算，整个遍历共享
///
/// 上限是 max_page 乘以单页重试上限，任何路径都不会超出。
#[derive(Debug)]
pub struct WalkBudget {
    cap: u32,
    used: u32,
}

impl WalkBudget {
    pub fn new(max_page: u32, max_retries_per_page: u32) -> Self {
        Self {
            cap: max_page.saturating_mul(max_retries_per_page),
            used: 0,
        }
    }

    /// 申请一次跳转尝试，预算耗尽返回 false
    pub fn try_take(&mut self) -> bool {
        if self.used >= self.cap {
            return false;
        }
        self.used += 1;
        true
    }

    pub fn used(&self) -> u32 {
        self.used
    }

    pub fn cap(&self) -> u32 {
        self.cap
    }
}

enum Visit {
    Ready { attempts: u32 },
    Skipped,
    End(WalkEnd),
}

enum NavOutcome {
    Done,
    NoNext,
}

/// 分页遍历器
pub struct PaginationWalker {
    keyword: String,
    city_code: Option<String>,
    salary: Option<String>,
    max_page: u32,
    max_retries: u32,
    budget: WalkBudget,
    next_no: u32,
    skipped: Vec<u32>,
    end: Option<WalkEnd>,
}

impl PaginationWalker {
    pub fn new(
        keyword: &str,
        city_code: Option<String>,
        salary: Option<String>,
        max_page: u32,
        max_retries_per_page: u32,
    ) -> Self {
        Self {
            keyword: keyword.to_string(),
            city_code,
            salary,
            max_page,
            max_retries: max_retries_per_page.max(1),
            budget: WalkBudget::new(max_page, max_retries_per_page.max(1)),
            next_no: 1,
            skipped: Vec::new(),
            end: None,
        }
    }

    /// 遍历结束的原因，遍历途中为 None
    pub fn end_reason(&self) -> Option<WalkEnd> {
        self.end
    }

    /// 因加载失败被跳过的页码
    pub fn skipped_pages(&self) -> &[u32] {
        &self.skipped
    }

    /// 已消耗的跳转尝试次数
    pub fn attempts_used(&self) -> u32 {
        self.budget.used()
    }

    /// 推进到下一张就绪的结果页
    ///
    /// 返回 None 表示遍历结束，原因见 end_reason。
    pub async fn next_page(
        &mut self,
        page: &Page,
        profile: &PlatformProfile,
    ) -> Result<Option<PageReady>> {
        loop {
            if self.end.is_some() {
                return Ok(None);
            }
            if self.next_no > self.max_page {
                self.end = Some(WalkEnd::MaxPageReached);
                debug!("[{}] 已到达最大页数 {}", profile.name, self.max_page);
                return Ok(None);
            }
            let page_no = self.next_no;
            self.next_no += 1;

            match self.visit(page, profile, page_no).await? {
                Visit::Ready { attempts } => {
                    debug!(
                        "[{}] 第 {} 页就绪 (跳转尝试 {} 次，累计 {}/{})",
                        profile.name,
                        page_no,
                        attempts,
                        self.budget.used(),
                        self.budget.cap()
                    );
                    if page_no == 1 {
                        self.shrink_from_pager(page, profile).await;
                    }
                    return Ok(Some(PageReady { page_no, attempts }));
                }
                Visit::Skipped => {
                    warn!("[{}] 第 {} 页多次加载失败，跳过", profile.name, page_no);
                    self.skipped.push(page_no);
                }
                Visit::End(reason) => {
                    debug!("[{}] 遍历终止: {:?}", profile.name, reason);
                    self.end = Some(reason);
                    return Ok(None);
                }
            }
        }
    }

    /// 进入某一页并等待内容就绪，带递增退避的有界重试
    async fn visit(
        &mut self,
        page: &Page,
        profile: &PlatformProfile,
        page_no: u32,
    ) -> Result<Visit> {
        for attempt in 1..=self.max_retries {
            if !self.budget.try_take() {
                return Ok(Visit::Skipped);
            }
            if attempt > 1 {
                let backoff = Duration::from_secs((attempt as u64 - 1) * 2);
                debug!(
                    "[{}] 第 {} 页重试前等待 {:?} 并刷新页面",
                    profile.name, page_no, backoff
                );
                sleep(backoff).await;
                page.reload().await.ok();
                page.wait_for_navigation().await.ok();
            }

            match self.navigate(page, profile, page_no).await {
                Ok(NavOutcome::Done) => {}
                Ok(NavOutcome::NoNext) => return Ok(Visit::End(WalkEnd::NoNextControl)),
                Err(e) => {
                    warn!(
                        "[{}] 第 {} 页跳转失败 (尝试 {}/{}): {:#}",
                        profile.name, page_no, attempt, self.max_retries, e
                    );
                    continue;
                }
            }

            self.close_popup(page, profile).await;

            if let Some(probe) = &profile.verify_probe {
                if probe.hit(page).await {
                    warn!("[{}] 出现访问验证页", profile.name);
                    return Ok(Visit::End(WalkEnd::Verification));
                }
            }
            if let Some(probe) = &profile.daily_limit_probe {
                if probe.hit(page).await {
                    info!("[{}] 今日投递已达上限", profile.name);
                    return Ok(Visit::End(WalkEnd::DailyLimit));
                }
            }

            if selector::resolve(page, &profile.card).await.is_some() {
                return Ok(Visit::Ready { attempts: attempt });
            }
            warn!(
                "[{}] 第 {} 页岗位卡片未加载 (尝试 {}/{})",
                profile.name, page_no, attempt, self.max_retries
            );
        }
        Ok(Visit::Skipped)
    }

    /// 按平台的翻页方式进入目标页
    ///
    /// 每个关键词的第 1 页总是直接构造搜索 URL 进入。
    async fn navigate(
        &self,
        page: &Page,
        profile: &PlatformProfile,
        page_no: u32,
    ) -> Result<NavOutcome> {
        if page_no == 1 || matches!(profile.paging, PagingMode::UrlParam) {
            let url = profile.search_url(
                &self.keyword,
                self.city_code.as_deref(),
                self.salary.as_deref(),
                page_no,
            );
            page.goto(&url)
                .await
                .map_err(|e| EngineError::navigation_failed(&url, e))?;
            page.wait_for_navigation().await.ok();
            return Ok(NavOutcome::Done);
        }

        match &profile.paging {
            // 第 1 页之外不会再走到这个分支
            PagingMode::UrlParam => Ok(NavOutcome::Done),
            PagingMode::NextButton(cascade) => {
                let Some(button) = selector::resolve_first(page, cascade).await else {
                    info!("[{}] 未找到可用的下一页按钮，结束翻页", profile.name);
                    return Ok(NavOutcome::NoNext);
                };
                if let Ok(Some(_)) = button.attribute("disabled").await {
                    info!("[{}] 下一页按钮已禁用，结束翻页", profile.name);
                    return Ok(NavOutcome::NoNext);
                }
                layered_click(&button).await?;
                page.wait_for_navigation().await.ok();
                sleep(Duration::from_secs(2)).await;
                Ok(NavOutcome::Done)
            }
            PagingMode::JumpInput { input, confirm } => {
                let Some(input_el) = selector::resolve_first(page, input).await else {
                    info!("[{}] 未找到跳页输入框，结束翻页", profile.name);
                    return Ok(NavOutcome::NoNext);
                };
                input_el.scroll_into_view().await.ok();
                input_el.click().await.ok();
                input_el
                    .call_js_fn("function() { this.value = ''; }", false)
                    .await
                    .ok();
                input_el.type_str(page_no.to_string()).await?;

                let Some(confirm_el) = selector::resolve_first(page, confirm).await else {
                    info!("[{}] 未找到跳页按钮，结束翻页", profile.name);
                    return Ok(NavOutcome::NoNext);
                };
                layered_click(&confirm_el).await?;
                page.wait_for_navigation().await.ok();
                sleep(Duration::from_secs(2)).await;
                Ok(NavOutcome::Done)
            }
        }
    }

    /// 关闭结果页上的订阅等干扰弹窗
    async fn close_popup(&self, page: &Page, profile: &PlatformProfile) {
        let Some(cascade) = &profile.popup_close else {
            return;
        };
        if let Some(button) = selector::resolve_first(page, cascade).await {
            if button.click().await.is_ok() {
                debug!("[{}] 已关闭干扰弹窗", profile.name);
                sleep(Duration::from_millis(500)).await;
            }
        }
    }

    /// 从分页控件探测真实总页数，只会收紧上限
    async fn shrink_from_pager(&mut self, page: &Page, profile: &PlatformProfile) {
        let Some(pager) = &profile.pager else {
            return;
        };
        let Some(matched) = selector::resolve(page, pager).await else {
            return;
        };
        let Ok(number) = Regex::new(r"\d+") else {
            return;
        };
        let mut detected = 0u32;
        for item in &matched.items {
            if let Ok(Some(text)) = item.inner_text().await {
                for hit in number.find_iter(&text) {
                    if let Ok(n) = hit.as_str().parse::<u32>() {
                        detected = detected.max(n);
                    }
                }
            }
        }
        if detected >= 1 && detected < self.max_page {
            info!(
                "[{}] 检测到实际总页数 {}，收紧翻页上限",
                profile.name, detected
            );
            self.max_page = detected;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn budget_caps_total_attempts() {
        let mut budget = WalkBudget::new(5, 3);
        assert_eq!(budget.cap(), 15);
        for _ in 0..15 {
            assert!(budget.try_take());
        }
        assert!(!budget.try_take());
        assert_eq!(budget.used(), 15);
    }

    #[test]
    fn zero_pages_means_zero_attempts() {
        let mut budget = WalkBudget::new(0, 3);
        assert!(!budget.try_take());
    }

    #[test]
    fn fresh_walker_starts_at_page_one() {
        let walker = PaginationWalker::new("java", None, None, 5, 3);
        assert_eq!(walker.next_no, 1);
        assert!(walker.end_reason().is_none());
        assert!(walker.skipped_pages().is_empty());
        assert_eq!(walker.attempts_used(), 0);
    }

    #[test]
    fn retries_floor_at_one() {
        let walker = PaginationWalker::new("java", None, None, 5, 0);
        assert_eq!(walker.max_retries, 1);
        assert_eq!(walker.budget.cap(), 5);
    }
}
