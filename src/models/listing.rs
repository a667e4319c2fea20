//! 岗位条目

/// 结果页上抓取的单条岗位信息
///
/// 只在当前页面有效，翻页后即失效，不做跨页保留。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Listing {
    pub title: String,
    pub company: String,
    pub recruiter: Option<String>,
    pub salary: Option<String>,
}

impl Listing {
    /// 运行期去重键，大小写不敏感
    pub fn dedupe_key(&self) -> (String, String) {
        (self.company.to_lowercase(), self.title.to_lowercase())
    }

    /// 日志与报告里的展示形式
    pub fn describe(&self) -> String {
        let mut text = format!("【{} {}", self.company, self.title);
        if let Some(salary) = &self.salary {
            text.push(' ');
            text.push_str(salary);
        }
        if let Some(recruiter) = &self.recruiter {
            text.push(' ');
            text.push_str(recruiter);
        }
        text.push('】');
        text
    }
}
