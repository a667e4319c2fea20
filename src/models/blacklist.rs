//! 黑名单数据
//!
//! 每个平台维护一份独立的黑名单文件，运行开始时加载一次，
//! 运行期间只读，结束时整体回写。

use std::collections::HashSet;
use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::info;

/// 黑名单文件的磁盘结构，字段名与既有数据文件保持一致
#[derive(Debug, Default, Serialize, Deserialize)]
struct BlacklistFile {
    #[serde(default, rename = "blackCompanies")]
    black_companies: Vec<String>,
    #[serde(default, rename = "blackJobs")]
    black_jobs: Vec<String>,
    #[serde(default, rename = "blackRecruiters")]
    black_recruiters: Vec<String>,
}

/// 运行期黑名单集合，加载时统一转为小写
#[derive(Debug, Default, Clone)]
pub struct BlacklistSet {
    pub companies: HashSet<String>,
    pub job_titles: HashSet<String>,
    pub recruiters: HashSet<String>,
}

impl BlacklistSet {
    /// 从 JSON 文件加载黑名单，文件不存在时创建空骨架
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            if let Some(parent) = path.parent() {
                fs::create_dir_all(parent)
                    .with_context(|| format!("创建目录 {} 失败", parent.display()))?;
            }
            let empty = serde_json::to_string_pretty(&BlacklistFile::default())?;
            fs::write(path, empty).with_context(|| format!("创建数据文件 {} 失败", path.display()))?;
            info!("创建数据文件: {}", path.display());
            return Ok(Self::default());
        }

        let text = fs::read_to_string(path)
            .with_context(|| format!("读取黑名单文件 {} 失败", path.display()))?;
        let file: BlacklistFile = serde_json::from_str(&text)
            .with_context(|| format!("解析黑名单文件 {} 失败", path.display()))?;
        let set = Self::from_file(file);
        info!(
            "已加载黑名单数据 - 公司: {}, 岗位: {}, 招聘者: {}",
            set.companies.len(),
            set.job_titles.len(),
            set.recruiters.len()
        );
        Ok(set)
    }

    /// 回写黑名单文件，输出已归一化的小写词条
    pub fn save(&self, path: &Path) -> Result<()> {
        let mut file = BlacklistFile {
            black_companies: self.companies.iter().cloned().collect(),
            black_jobs: self.job_titles.iter().cloned().collect(),
            black_recruiters: self.recruiters.iter().cloned().collect(),
        };
        file.black_companies.sort();
        file.black_jobs.sort();
        file.black_recruiters.sort();
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("创建目录 {} 失败", parent.display()))?;
        }
        let text = serde_json::to_string_pretty(&file)?;
        fs::write(path, text).with_context(|| format!("保存黑名单文件 {} 失败", path.display()))?;
        Ok(())
    }

    fn from_file(file: BlacklistFile) -> Self {
        fn normalize(entries: Vec<String>) -> HashSet<String> {
            entries
                .into_iter()
                .map(|s| s.trim().to_lowercase())
                .filter(|s| !s.is_empty())
                .collect()
        }
        Self {
            companies: normalize(file.black_companies),
            job_titles: normalize(file.black_jobs),
            recruiters: normalize(file.black_recruiters),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_normalizes_to_lowercase() {
        let file: BlacklistFile = serde_json::from_str(
            r#"{
                "blackCompanies": ["Acme", " 外包公司 "],
                "blackJobs": ["销售"],
                "blackRecruiters": []
            }"#,
        )
        .unwrap();
        let set = BlacklistSet::from_file(file);
        assert!(set.companies.contains("acme"));
        assert!(set.companies.contains("外包公司"));
        assert!(set.job_titles.contains("销售"));
        assert!(set.recruiters.is_empty());
    }

    #[test]
    fn missing_fields_default_to_empty() {
        let file: BlacklistFile = serde_json::from_str(r#"{ "blackCompanies": ["x"] }"#).unwrap();
        let set = BlacklistSet::from_file(file);
        assert_eq!(set.companies.len(), 1);
        assert!(set.job_titles.is_empty());
        assert!(set.recruiters.is_empty());
    }

    #[test]
    fn load_creates_skeleton_when_absent() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("liepin").join("data.json");
        let set = BlacklistSet::load(&path).unwrap();
        assert!(set.companies.is_empty());
        assert!(path.exists());
        // 骨架文件可以再次被正常加载
        let again = BlacklistSet::load(&path).unwrap();
        assert!(again.job_titles.is_empty());
    }

    #[test]
    fn save_then_load_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("data.json");
        let mut set = BlacklistSet::default();
        set.companies.insert("acme".to_string());
        set.job_titles.insert("销售".to_string());
        set.save(&path).unwrap();

        let loaded = BlacklistSet::load(&path).unwrap();
        assert!(loaded.companies.contains("acme"));
        assert!(loaded.job_titles.contains("销售"));
    }
}
