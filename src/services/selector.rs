//! 选择器级联解析 - 业务能力层
//!
//! 目标站点的页面结构经常在没有任何通知的情况下变动，单一选择器
//! 很快就会失效。同一个逻辑目标的多个候选选择器按优先级排成级联，
//! 逐个尝试，取第一个命中的候选。没有命中不是异常，而是一个正常
//! 的、可上报的数据。

use chromiumoxide::{Element, Page};
use tracing::debug;

/// 同一逻辑目标的候选选择器级联，按声明顺序尝试
#[derive(Debug, Clone)]
pub struct SelectorCascade {
    /// 逻辑目标名称，用于日志诊断
    target: &'static str,
    candidates: Vec<String>,
}

impl SelectorCascade {
    pub fn new(target: &'static str, candidates: &[&str]) -> Self {
        Self {
            target,
            candidates: candidates.iter().map(|s| s.to_string()).collect(),
        }
    }

    pub fn target(&self) -> &'static str {
        self.target
    }

    pub fn candidates(&self) -> &[String] {
        &self.candidates
    }
}

/// 级联命中结果，记录命中的候选下标便于诊断
#[derive(Debug)]
pub struct CascadeMatch<T> {
    /// 命中的候选在级联中的下标
    pub index: usize,
    /// 命中的选择器表达式
    pub selector: String,
    /// 命中的元素，至少一个
    pub items: Vec<T>,
}

impl<T> CascadeMatch<T> {
    pub fn count(&self) -> usize {
        self.items.len()
    }

    pub fn into_first(mut self) -> T {
        self.items.swap_remove(0)
    }
}

/// 可以被级联查询的作用域：整页，或某个元素的内部
#[allow(async_fn_in_trait)]
pub trait CascadeScope {
    type Item;

    /// 查询一个候选选择器下的全部元素，查询出错视作没有命中
    async fn find_all(&self, selector: &str) -> Vec<Self::Item>;
}

impl CascadeScope for Page {
    type Item = Element;

    async fn find_all(&self, selector: &str) -> Vec<Element> {
        self.find_elements(selector).await.unwrap_or_default()
    }
}

impl CascadeScope for Element {
    type Item = Element;

    async fn find_all(&self, selector: &str) -> Vec<Element> {
        self.find_elements(selector).await.unwrap_or_default()
    }
}

/// 按声明顺序解析级联，返回第一个非空命中
pub async fn resolve<S: CascadeScope>(
    scope: &S,
    cascade: &SelectorCascade,
) -> Option<CascadeMatch<S::Item>> {
    for (index, selector) in cascade.candidates.iter().enumerate() {
        let items = scope.find_all(selector).await;
        if !items.is_empty() {
            debug!(
                "级联 [{}] 第 {} 个候选命中: {} ({} 个元素)",
                cascade.target,
                index,
                selector,
                items.len()
            );
            return Some(CascadeMatch {
                index,
                selector: selector.clone(),
                items,
            });
        }
    }
    debug!(
        "级联 [{}] 全部 {} 个候选均未命中",
        cascade.target,
        cascade.candidates.len()
    );
    None
}

/// 解析级联并取首个命中元素
pub async fn resolve_first<S: CascadeScope>(
    scope: &S,
    cascade: &SelectorCascade,
) -> Option<S::Item> {
    resolve(scope, cascade).await.map(CascadeMatch::into_first)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    /// 用选择器到节点列表的映射模拟一个 DOM 作用域
    struct FakeDom {
        nodes: HashMap<&'static str, Vec<&'static str>>,
    }

    impl FakeDom {
        fn new(entries: &[(&'static str, &[&'static str])]) -> Self {
            let mut nodes = HashMap::new();
            for (selector, found) in entries {
                nodes.insert(*selector, found.to_vec());
            }
            Self { nodes }
        }
    }

    impl CascadeScope for FakeDom {
        type Item = &'static str;

        async fn find_all(&self, selector: &str) -> Vec<&'static str> {
            self.nodes.get(selector).cloned().unwrap_or_default()
        }
    }

    #[tokio::test]
    async fn first_matching_candidate_wins() {
        let dom = FakeDom::new(&[("b", &["节点1", "节点2"]), ("c", &["节点3"])]);
        let cascade = SelectorCascade::new("card", &["a", "b", "c"]);

        let matched = resolve(&dom, &cascade).await.unwrap();
        assert_eq!(matched.index, 1);
        assert_eq!(matched.selector, "b");
        assert_eq!(matched.count(), 2);
    }

    #[tokio::test]
    async fn fallback_candidate_reports_its_index_and_count() {
        let dom = FakeDom::new(&[(".fallback-class", &["唯一节点"])]);
        let cascade =
            SelectorCascade::new("next-page", &["#id-that-does-not-exist", ".fallback-class"]);

        let matched = resolve(&dom, &cascade).await.unwrap();
        assert_eq!(matched.index, 1);
        assert_eq!(matched.count(), 1);
    }

    #[tokio::test]
    async fn absence_is_none_not_error() {
        let dom = FakeDom::new(&[]);
        let cascade = SelectorCascade::new("card", &["a", "b"]);
        assert!(resolve(&dom, &cascade).await.is_none());
    }

    #[tokio::test]
    async fn resolve_first_returns_leading_item() {
        let dom = FakeDom::new(&[("a", &["第一", "第二"])]);
        let cascade = SelectorCascade::new("card", &["a"]);
        assert_eq!(resolve_first(&dom, &cascade).await, Some("第一"));
    }
}
