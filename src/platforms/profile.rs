//! 平台画像
//!
//! 把各招聘平台之间的差异收敛成数据：站点地址、选择器级联、
//! 探测方式、翻页与投递方式。运行逻辑由 workflow 层统一承担，
//! 新增平台只需要提供一份画像。

use chromiumoxide::Page;
use url::form_urlencoded::byte_serialize;

use crate::models::PlatformId;
use crate::services::selector::{self, SelectorCascade};

/// 登录状态的探测方式
#[derive(Debug, Clone)]
pub enum LoginProbe {
    /// 登录后当前 URL 会包含的标识
    UrlContains(&'static str),
    /// 登录后才会出现的页面元素
    Selector(SelectorCascade),
}

/// 翻页方式
#[derive(Debug, Clone)]
pub enum PagingMode {
    /// 搜索 URL 直接携带页码参数
    UrlParam,
    /// 点击下一页控件翻页
    NextButton(SelectorCascade),
    /// 通过跳页输入框翻页
    JumpInput {
        input: SelectorCascade,
        confirm: SelectorCascade,
    },
}

/// 新标签页中的打招呼交互
#[derive(Debug, Clone)]
pub struct TabGreeting {
    pub contact_button: SelectorCascade,
    pub input: SelectorCascade,
    pub send_button: SelectorCascade,
}

/// 投递方式
#[derive(Debug, Clone)]
pub enum SubmitMode {
    /// 逐条岗位打开聊天窗口打招呼
    ChatPerListing {
        chat_button: SelectorCascade,
        dialog: SelectorCascade,
        input: SelectorCascade,
        close: SelectorCascade,
    },
    /// 勾选岗位后批量投递
    ///
    /// 勾选永远逐条进行，整页全选会绕过过滤检查，不提供。
    BatchSelect {
        checkbox: SelectorCascade,
        submit: SelectorCascade,
        popup_close: SelectorCascade,
        /// 投递后弹出新标签页时，切换过去完成打招呼
        tab_greeting: Option<TabGreeting>,
    },
}

/// 在级联命中元素的文本里查找关键字的探测
#[derive(Debug, Clone)]
pub struct TextProbe {
    pub cascade: SelectorCascade,
    pub keyword: &'static str,
}

impl TextProbe {
    pub fn new(cascade: SelectorCascade, keyword: &'static str) -> Self {
        Self { cascade, keyword }
    }

    /// 探测是否命中，元素缺失或取文本失败都算未命中
    pub async fn hit(&self, page: &Page) -> bool {
        let Some(matched) = selector::resolve(page, &self.cascade).await else {
            return false;
        };
        for element in &matched.items {
            if let Ok(Some(text)) = element.inner_text().await {
                if text.contains(self.keyword) {
                    return true;
                }
            }
        }
        false
    }
}

/// 搜索结果页 URL 的构造参数
#[derive(Debug, Clone)]
pub struct SearchSpec {
    pub base_url: &'static str,
    pub keyword_param: &'static str,
    /// 城市编码会写入的参数名，部分平台要求重复多个
    pub city_params: &'static [&'static str],
    pub salary_param: Option<&'static str>,
    /// 页码参数，走跳页控件的平台没有
    pub page_param: Option<&'static str>,
    /// 首页的页码值
    pub page_origin: u32,
}

impl SearchSpec {
    /// 构造搜索页 URL，页码从 1 起
    pub fn build(
        &self,
        keyword: &str,
        city_code: Option<&str>,
        salary: Option<&str>,
        page_no: u32,
    ) -> String {
        let mut url = String::from(self.base_url);
        let mut first = !url.contains('?');
        let mut push = |url: &mut String, key: &str, value: &str| {
            url.push(if first { '?' } else { '&' });
            first = false;
            url.push_str(key);
            url.push('=');
            url.push_str(&byte_serialize(value.as_bytes()).collect::<String>());
        };

        push(&mut url, self.keyword_param, keyword);
        if let Some(code) = city_code {
            for param in self.city_params {
                push(&mut url, param, code);
            }
        }
        if let (Some(param), Some(salary)) = (self.salary_param, salary) {
            push(&mut url, param, salary);
        }
        if let Some(param) = self.page_param {
            let value = self.page_origin + page_no.saturating_sub(1);
            push(&mut url, param, &value.to_string());
        }
        url
    }
}

/// 一个招聘平台的静态画像
#[derive(Debug, Clone)]
pub struct PlatformProfile {
    pub id: PlatformId,
    /// 日志里使用的平台名
    pub name: &'static str,
    pub home_url: &'static str,
    /// 独立登录页，没有时在首页完成登录
    pub login_url: Option<&'static str>,
    pub login_probe: LoginProbe,
    /// 登录页切换到扫码面板的入口
    pub qr_switch: Option<SelectorCascade>,
    pub search: SearchSpec,
    pub paging: PagingMode,
    /// 岗位卡片，也作为结果页的内容就绪探测
    pub card: SelectorCascade,
    pub title_field: SelectorCascade,
    pub company_field: SelectorCascade,
    pub salary_field: Option<SelectorCascade>,
    pub recruiter_field: Option<SelectorCascade>,
    /// 分页控件，用于探测真实页数
    pub pager: Option<SelectorCascade>,
    pub submit: SubmitMode,
    /// 当日投递达到上限的提示
    pub daily_limit_probe: Option<TextProbe>,
    /// 反爬验证页提示
    pub verify_probe: Option<TextProbe>,
    /// 结果页干扰弹窗的关闭按钮
    pub popup_close: Option<SelectorCascade>,
}

impl PlatformProfile {
    /// 构造某一页的搜索 URL
    pub fn search_url(
        &self,
        keyword: &str,
        city_code: Option<&str>,
        salary: Option<&str>,
        page_no: u32,
    ) -> String {
        self.search.build(keyword, city_code, salary, page_no)
    }
}
