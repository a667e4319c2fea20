//! 前程无忧平台画像
//!
//! 勾选岗位后批量投递，翻页走页面上的跳页输入框。
//! 搜索接口会触发访问验证页，需要在遍历时探测。

use crate::models::PlatformId;
use crate::platforms::profile::{
    LoginProbe, PagingMode, PlatformProfile, SearchSpec, SubmitMode, TextProbe,
};
use crate::services::selector::SelectorCascade;

pub fn profile() -> PlatformProfile {
    PlatformProfile {
        id: PlatformId::Job51,
        name: "51job",
        home_url: "https://www.51job.com",
        login_url: Some(
            "https://login.51job.com/login.php?lang=c&url=https://www.51job.com/&qrlogin=2",
        ),
        // 登录后页头出现用户名区域
        login_probe: LoginProbe::Selector(SelectorCascade::new(
            "uname",
            &["a.uname", "[class*='uname']", "a[href*='my51job']"],
        )),
        qr_switch: Some(SelectorCascade::new(
            "qr-switch",
            &["i[class*='passIcon']", "[class*='qrcode-switch']"],
        )),
        search: SearchSpec {
            base_url: "https://we.51job.com/pc/search",
            keyword_param: "keyword",
            city_params: &["jobArea"],
            salary_param: Some("salary"),
            page_param: None,
            page_origin: 1,
        },
        paging: PagingMode::JumpInput {
            input: SelectorCascade::new(
                "jump-page-input",
                &["#jump_page", "input[id*='jump']", "input[class*='jump']"],
            ),
            confirm: SelectorCascade::new(
                "jump-page-confirm",
                &[
                    "span.jumpPage",
                    "[class*='jumpPage']",
                    ".bottom-page span[class*='jump']",
                ],
            ),
        },
        card: SelectorCascade::new(
            "job-card",
            &[
                ".joblist .joblist-item",
                "div[class*='joblist-item']",
                "div[class*='job-list'] [class*='item']",
            ],
        ),
        title_field: SelectorCascade::new(
            "job-title",
            &["[class*='jname']", ".jname", "[class*='job-name']"],
        ),
        company_field: SelectorCascade::new(
            "company-name",
            &["[class*='cname']", ".cname", "[class*='company-name']"],
        ),
        salary_field: Some(SelectorCascade::new(
            "job-salary",
            &["[class*='sal']", "[class*='salary']"],
        )),
        recruiter_field: Some(SelectorCascade::new(
            "recruiter-name",
            &[".er", "[class*='recruiter']"],
        )),
        pager: None,
        submit: SubmitMode::BatchSelect {
            checkbox: SelectorCascade::new(
                "select-checkbox",
                &["div.ick", "[class*='ick']", "input[type='checkbox']"],
            ),
            submit: SelectorCascade::new(
                "batch-submit",
                &[
                    "button.p_but",
                    "button[class*='p_but']",
                    "div.tabs_in button",
                ],
            ),
            popup_close: SelectorCascade::new(
                "result-popup-close",
                &[
                    "[class*='van-popup__close-icon']",
                    ".el-dialog__header button i",
                    "button[class*='close']",
                ],
            ),
            tab_greeting: None,
        },
        daily_limit_probe: None,
        verify_probe: Some(TextProbe::new(
            SelectorCascade::new("waf-title", &["p.waf-nc-title", "[class*='waf-nc']"]),
            "验证",
        )),
        popup_close: None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn search_url_has_no_page_param() {
        let profile = profile();
        let url = profile.search_url("运维", Some("020000"), Some("25"), 3);
        assert!(url.contains("keyword=%E8%BF%90%E7%BB%B4"));
        assert!(url.contains("jobArea=020000"));
        assert!(url.contains("salary=25"));
        assert!(!url.contains("page"));
    }

    #[test]
    fn paging_uses_jump_input() {
        assert!(matches!(profile().paging, PagingMode::JumpInput { .. }));
    }
}
