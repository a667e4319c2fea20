use std::fmt;

/// 引擎错误类型
#[derive(Debug)]
pub enum EngineError {
    /// 会话资源相关错误
    Session(SessionError),
    /// 页面跳转错误
    Navigation(NavigationError),
    /// 页面交互错误
    Interaction(InteractionError),
}

impl fmt::Display for EngineError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EngineError::Session(e) => write!(f, "会话错误: {}", e),
            EngineError::Navigation(e) => write!(f, "跳转错误: {}", e),
            EngineError::Interaction(e) => write!(f, "交互错误: {}", e),
        }
    }
}

impl std::error::Error for EngineError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            EngineError::Session(e) => Some(e),
            EngineError::Navigation(e) => Some(e),
            EngineError::Interaction(e) => Some(e),
        }
    }
}

/// 会话资源相关错误
#[derive(Debug)]
pub enum SessionError {
    /// 平台会话已存在，必须先关闭
    AlreadyOpen {
        platform: String,
    },
    /// 浏览器启动失败
    LaunchFailed {
        source: Box<dyn std::error::Error + Send + Sync>,
    },
}

impl fmt::Display for SessionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SessionError::AlreadyOpen { platform } => {
                write!(f, "平台 {} 的会话已存在，需要先关闭才能重新打开", platform)
            }
            SessionError::LaunchFailed { source } => {
                write!(f, "浏览器启动失败: {}", source)
            }
        }
    }
}

impl std::error::Error for SessionError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            SessionError::LaunchFailed { source } => {
                Some(source.as_ref() as &(dyn std::error::Error + 'static))
            }
            _ => None,
        }
    }
}

/// 页面跳转错误
#[derive(Debug)]
pub enum NavigationError {
    /// 导航到目标 URL 失败
    LoadFailed {
        url: String,
        source: Box<dyn std::error::Error + Send + Sync>,
    },
}

impl fmt::Display for NavigationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NavigationError::LoadFailed { url, source } => {
                write!(f, "导航到 {} 失败: {}", url, source)
            }
        }
    }
}

impl std::error::Error for NavigationError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            NavigationError::LoadFailed { source, .. } => {
                Some(source.as_ref() as &(dyn std::error::Error + 'static))
            }
        }
    }
}

/// 页面交互错误
#[derive(Debug)]
pub enum InteractionError {
    /// 目标控件在所有候选选择器下都未找到
    TargetMissing {
        target: String,
    },
    /// 点击重试耗尽仍未成功
    ClickFailed {
        target: String,
        attempts: u32,
    },
    /// 预期的对话框未出现
    DialogMissing {
        target: String,
    },
}

impl fmt::Display for InteractionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InteractionError::TargetMissing { target } => {
                write!(f, "未找到目标控件: {}", target)
            }
            InteractionError::ClickFailed { target, attempts } => {
                write!(f, "控件 {} 点击重试 {} 次仍失败", target, attempts)
            }
            InteractionError::DialogMissing { target } => {
                write!(f, "对话框未出现: {}", target)
            }
        }
    }
}

impl std::error::Error for InteractionError {}

// ========== 便捷构造函数 ==========

impl EngineError {
    /// 创建会话重复打开错误
    pub fn session_already_open(platform: impl Into<String>) -> Self {
        EngineError::Session(SessionError::AlreadyOpen {
            platform: platform.into(),
        })
    }

    /// 创建浏览器启动失败错误
    pub fn launch_failed(source: impl Into<Box<dyn std::error::Error + Send + Sync>>) -> Self {
        EngineError::Session(SessionError::LaunchFailed {
            source: source.into(),
        })
    }

    /// 创建导航失败错误
    pub fn navigation_failed(
        url: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        EngineError::Navigation(NavigationError::LoadFailed {
            url: url.into(),
            source: Box::new(source),
        })
    }

    /// 创建目标控件缺失错误
    pub fn target_missing(target: impl Into<String>) -> Self {
        EngineError::Interaction(InteractionError::TargetMissing {
            target: target.into(),
        })
    }

    /// 创建点击重试耗尽错误
    pub fn click_failed(target: impl Into<String>, attempts: u32) -> Self {
        EngineError::Interaction(InteractionError::ClickFailed {
            target: target.into(),
            attempts,
        })
    }

    /// 创建对话框缺失错误
    pub fn dialog_missing(target: impl Into<String>) -> Self {
        EngineError::Interaction(InteractionError::DialogMissing {
            target: target.into(),
        })
    }
}

// ========== Result 类型别名 ==========

/// 引擎结果类型
pub type EngineResult<T> = Result<T, EngineError>;
