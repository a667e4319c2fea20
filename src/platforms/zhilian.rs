//! 智联招聘平台画像
//!
//! 整页勾选后批量投递，投递动作会弹出新标签页，需要切换过去
//! 打招呼再切回来。当日投递上限由页面提示探测。

use crate::models::PlatformId;
use crate::platforms::profile::{
    LoginProbe, PagingMode, PlatformProfile, SearchSpec, SubmitMode, TabGreeting, TextProbe,
};
use crate::services::selector::SelectorCascade;

pub fn profile() -> PlatformProfile {
    PlatformProfile {
        id: PlatformId::Zhilian,
        name: "智联招聘",
        home_url: "https://www.zhaopin.com/",
        login_url: Some("https://passport.zhaopin.com/login"),
        // 登录后跳转到个人中心域名
        login_probe: LoginProbe::UrlContains("i.zhaopin.com"),
        qr_switch: Some(SelectorCascade::new(
            "qr-switch",
            &[
                ".zppp-panel-normal-bar__img",
                "div[class*='scan']",
                "button[class*='scan-btn']",
            ],
        )),
        search: SearchSpec {
            base_url: "https://sou.zhaopin.com/",
            keyword_param: "kw",
            city_params: &["jl"],
            salary_param: Some("sl"),
            page_param: Some("p"),
            page_origin: 1,
        },
        paging: PagingMode::UrlParam,
        card: SelectorCascade::new(
            "job-card",
            &[
                ".positionlist .joblist-box__item",
                "div[class*='joblist-box__item']",
                "div[class*='position-card']",
            ],
        ),
        title_field: SelectorCascade::new(
            "job-title",
            &[
                "[class*='jobinfo__name']",
                "[class*='job-name']",
                "a[class*='name']",
            ],
        ),
        company_field: SelectorCascade::new(
            "company-name",
            &[
                "[class*='companyinfo__name']",
                "[class*='company-name']",
                "[class*='cname']",
            ],
        ),
        salary_field: Some(SelectorCascade::new(
            "job-salary",
            &["[class*='jobinfo__salary']", "[class*='salary']"],
        )),
        recruiter_field: None,
        pager: None,
        submit: SubmitMode::BatchSelect {
            // 整页全选会绕过黑名单过滤，这里只逐条勾选
            checkbox: SelectorCascade::new(
                "select-checkbox",
                &[
                    "input[type='checkbox']",
                    "i[class*='checkbox']",
                    "[class*='check']",
                ],
            ),
            submit: SelectorCascade::new(
                "batch-submit",
                &[
                    "button.betch__button",
                    "button[class*='batch']",
                    "button[class*='apply']",
                ],
            ),
            popup_close: SelectorCascade::new(
                "result-popup-close",
                &[
                    "img[title='close-icon']",
                    "div[class*='deliver-dialog'] [class*='close']",
                ],
            ),
            tab_greeting: Some(TabGreeting {
                contact_button: SelectorCascade::new(
                    "contact-button",
                    &["[class*='contact']", "button[class*='message']"],
                ),
                input: SelectorCascade::new(
                    "message-input",
                    &[
                        ".message-input",
                        ".chat-input",
                        "input[placeholder*='请输入']",
                        "textarea",
                    ],
                ),
                send_button: SelectorCascade::new(
                    "send-button",
                    &[".send-btn", "button[class*='send']"],
                ),
            }),
        },
        daily_limit_probe: Some(TextProbe::new(
            SelectorCascade::new(
                "apply-workflow",
                &[".a-job-apply-workflow", "div[class*='apply-workflow']"],
            ),
            "达到上限",
        )),
        verify_probe: None,
        popup_close: None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn search_url_carries_page_from_one() {
        let profile = profile();
        let url = profile.search_url("java", Some("538"), None, 2);
        assert!(url.contains("kw=java"));
        assert!(url.contains("jl=538"));
        assert!(url.ends_with("p=2"));
    }

    #[test]
    fn batch_mode_greets_in_new_tab() {
        match profile().submit {
            SubmitMode::BatchSelect { tab_greeting, .. } => assert!(tab_greeting.is_some()),
            _ => panic!("智联应当是批量投递模式"),
        }
    }
}
