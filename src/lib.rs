//! # Auto Job Submit
//!
//! 一个用于多平台自动投递简历的 Rust 应用程序
//!
//! ## 架构设计
//!
//! 本系统采用严格的四层架构：
//!
//! ### ① 基础设施层（Infrastructure）
//! - `browser/` - 浏览器启动与页面创建
//! - `infrastructure/` - `SessionRegistry`，持有各平台的浏览器会话资源，
//!   同一平台最多一个活跃会话，释放在任何退出路径上都会执行
//!
//! ### ② 业务能力层（Services）
//! - `services/` - 描述"我能做什么"，互相不感知流程
//! - `selector` - 选择器级联解析，页面结构变动时的兜底能力
//! - `auth` - 登录状态机，Cookie 复用与扫码回退
//! - `filter` - 黑名单过滤，投递前的强制检查
//! - `report` / `notify` - 投递记录汇总与结果推送
//!
//! ### ③ 流程层（Workflow）
//! - `workflow/` - 定义"一个平台一次运行"的处理流程
//! - `PaginationWalker` - 有界翻页遍历，失败页跳过
//! - `SubmissionPipeline` - 抽取、过滤、去重、投递
//!
//! ### ④ 编排层（Orchestration）
//! - `orchestrator/` - 平台严格串行执行，单平台失败不影响其他平台
//!
//! 平台之间的差异收敛在 `platforms/` 的静态画像里，新增平台只需
//! 登记一份画像，不需要改动运行逻辑。

pub mod browser;
pub mod config;
pub mod error;
pub mod infrastructure;
pub mod logger;
pub mod models;
pub mod orchestrator;
pub mod platforms;
pub mod services;
pub mod utils;
pub mod workflow;

// 重新导出常用类型
pub use config::Config;
pub use error::{EngineError, EngineResult};
pub use infrastructure::{DeviceProfile, PlatformSession, SessionRegistry};
pub use models::{BlacklistSet, Listing, Outcome, PlatformId, SubmissionRecord};
pub use orchestrator::{App, RunOutcome, RunResult};
pub use platforms::{profile_for, PlatformProfile};
pub use services::{AuthController, AuthState, CredentialStore, FilterEngine, SelectorCascade};
pub use workflow::{PaginationWalker, SubmissionPipeline};
