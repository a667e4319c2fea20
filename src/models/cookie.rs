//! Cookie 持久化结构

use serde::{Deserialize, Serialize};

/// 持久化的单条 Cookie
///
/// 磁盘格式是浏览器导出的 JSON 数组，字段命名与 CDP 保持一致，
/// 可选字段缺省时不写入文件。
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CookieRecord {
    pub name: String,
    pub value: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub domain: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expires: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub secure: Option<bool>,
    #[serde(default, rename = "httpOnly", skip_serializing_if = "Option::is_none")]
    pub http_only: Option<bool>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deserialize_full_record() {
        let json = r#"{
            "name": "token",
            "value": "abc",
            "domain": ".liepin.com",
            "path": "/",
            "expires": 1767196800.0,
            "secure": true,
            "httpOnly": true
        }"#;
        let rec: CookieRecord = serde_json::from_str(json).unwrap();
        assert_eq!(rec.name, "token");
        assert_eq!(rec.domain.as_deref(), Some(".liepin.com"));
        assert_eq!(rec.http_only, Some(true));
    }

    #[test]
    fn deserialize_minimal_record() {
        let rec: CookieRecord =
            serde_json::from_str(r#"{ "name": "sid", "value": "1" }"#).unwrap();
        assert!(rec.domain.is_none());
        assert!(rec.expires.is_none());
    }

    #[test]
    fn serialize_skips_absent_fields() {
        let rec = CookieRecord {
            name: "sid".to_string(),
            value: "1".to_string(),
            domain: None,
            path: None,
            expires: None,
            secure: None,
            http_only: None,
        };
        let json = serde_json::to_string(&rec).unwrap();
        assert!(!json.contains("domain"));
        assert!(!json.contains("httpOnly"));
    }

    #[test]
    fn extra_cdp_fields_are_ignored() {
        // 浏览器导出的 Cookie 带有 size / session 等额外字段
        let json = r#"{
            "name": "sid",
            "value": "1",
            "domain": ".51job.com",
            "path": "/",
            "size": 6,
            "session": true,
            "sameSite": "Lax",
            "priority": "Medium"
        }"#;
        let rec: CookieRecord = serde_json::from_str(json).unwrap();
        assert_eq!(rec.domain.as_deref(), Some(".51job.com"));
    }
}
