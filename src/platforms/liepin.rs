//! 猎聘平台画像
//!
//! 逐条岗位悬停唤出聊一聊入口，在聊天窗口里完成打招呼。
//! 搜索页 URL 携带页码参数，城市编码要求重复写入多个参数。

use crate::models::PlatformId;
use crate::platforms::profile::{
    LoginProbe, PagingMode, PlatformProfile, SearchSpec, SubmitMode,
};
use crate::services::selector::SelectorCascade;

pub fn profile() -> PlatformProfile {
    PlatformProfile {
        id: PlatformId::Liepin,
        name: "猎聘",
        home_url: "https://www.liepin.com/",
        login_url: None,
        // 登录后会跳转到 c 域名
        login_probe: LoginProbe::UrlContains("c.liepin.com"),
        qr_switch: Some(SelectorCascade::new(
            "login-switch",
            &[
                ".jsc-login-switch-tab",
                "div[class*='login-switch']",
                "div[class*='qr-code-tab']",
            ],
        )),
        search: SearchSpec {
            base_url: "https://www.liepin.com/zhaopin/",
            keyword_param: "key",
            city_params: &["city", "dq", "dqs"],
            salary_param: Some("salary"),
            page_param: Some("currentPage"),
            page_origin: 0,
        },
        paging: PagingMode::NextButton(SelectorCascade::new(
            "next-page",
            &[
                "li[title='下一页']",
                ".list-pagination-box li[title='下一页']",
                "li[class*='next']",
                "a[class*='next']",
            ],
        )),
        card: SelectorCascade::new(
            "job-card",
            &[
                ".job-card-pc-container",
                "div[class*='job-card']",
                "div[class*='job-item']",
                "li[class*='job-card']",
            ],
        ),
        title_field: SelectorCascade::new(
            "job-title",
            &[
                ".job-title-box .ellipsis-1",
                "[class*='job-title']",
                "[class*='jobname']",
            ],
        ),
        company_field: SelectorCascade::new(
            "company-name",
            &[
                ".company-name",
                "[class*='company-name']",
                "[class*='comp-name']",
            ],
        ),
        salary_field: Some(SelectorCascade::new(
            "job-salary",
            &[".job-salary", "[class*='salary']"],
        )),
        recruiter_field: Some(SelectorCascade::new(
            "recruiter-name",
            &[
                ".recruiter-info-box .recruiter-name",
                "[class*='recruiter-name']",
                "[class*='hr-name']",
            ],
        )),
        pager: Some(SelectorCascade::new(
            "pager",
            &[
                ".list-pagination-box li",
                "div[class*='pagination'] li",
                "ul[class*='pagination'] li",
            ],
        )),
        submit: SubmitMode::ChatPerListing {
            chat_button: SelectorCascade::new(
                "chat-button",
                &[
                    "button.ant-btn-primary.ant-btn-round",
                    "button[class*='ant-btn'][class*='primary']",
                    "button[class*='chat']",
                    ".chat-btn",
                ],
            ),
            dialog: SelectorCascade::new(
                "chat-dialog",
                &[
                    ".__im_basic__header",
                    "div[class*='im'] div[class*='header']",
                    "div[class*='chat-header']",
                ],
            ),
            input: SelectorCascade::new(
                "chat-input",
                &[
                    ".__im_basic__textarea",
                    "textarea[class*='im']",
                    "div[class*='chat'] textarea",
                ],
            ),
            close: SelectorCascade::new(
                "chat-close",
                &[
                    ".__im_basic__close",
                    "div[class*='im'] [class*='close']",
                    "div[class*='chat'] [class*='close']",
                ],
            ),
        },
        daily_limit_probe: None,
        verify_probe: None,
        popup_close: Some(SelectorCascade::new(
            "subscribe-close",
            &[
                ".subscribe-close-btn",
                "button[class*='close']",
                "i[class*='close']",
            ],
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn search_url_repeats_city_code() {
        let profile = profile();
        let url = profile.search_url("Java", Some("020"), None, 1);
        assert!(url.contains("key=Java"));
        assert!(url.contains("city=020"));
        assert!(url.contains("dq=020"));
        assert!(url.contains("dqs=020"));
        assert!(url.contains("currentPage=0"));
    }
}
