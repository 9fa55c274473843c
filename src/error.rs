use std::fmt;

/// 求解流程的阶段错误
///
/// 五类错误一一对应流程的降级点：导航、附件提取、LLM 网关、
/// 答案解析、结果提交。任何一类都只会被记录到 `SolveResult.log`
/// 或内联 error 字段中，不会中断流程。
/// 能逃出整个流程的只有意料之外的编程错误（应视为 bug）。
#[derive(Debug, Clone)]
pub enum StageError {
    /// 导航错误（超时或网络失败）
    Navigation { url: String, message: String },
    /// 附件提取错误（单个附件下载或解码失败）
    Extraction { url: String, message: String },
    /// LLM 网关错误（网络 / 鉴权 / 配额）
    Gateway { model: String, message: String },
    /// 答案解析错误
    Parse { message: String },
    /// 提交错误（POST 失败或响应无法读取）
    Submission { url: String, message: String },
}

impl fmt::Display for StageError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StageError::Navigation { url, message } => {
                write!(f, "导航错误 ({}): {}", url, message)
            }
            StageError::Extraction { url, message } => {
                write!(f, "附件提取错误 ({}): {}", url, message)
            }
            StageError::Gateway { model, message } => {
                write!(f, "LLM网关错误 (模型: {}): {}", model, message)
            }
            StageError::Parse { message } => write!(f, "答案解析错误: {}", message),
            StageError::Submission { url, message } => {
                write!(f, "提交错误 ({}): {}", url, message)
            }
        }
    }
}

impl std::error::Error for StageError {}

// ========== 便捷构造函数 ==========

impl StageError {
    /// 创建导航错误
    pub fn navigation(url: impl Into<String>, message: impl Into<String>) -> Self {
        StageError::Navigation {
            url: url.into(),
            message: message.into(),
        }
    }

    /// 创建附件提取错误
    pub fn extraction(url: impl Into<String>, message: impl Into<String>) -> Self {
        StageError::Extraction {
            url: url.into(),
            message: message.into(),
        }
    }

    /// 创建 LLM 网关错误
    pub fn gateway(model: impl Into<String>, message: impl Into<String>) -> Self {
        StageError::Gateway {
            model: model.into(),
            message: message.into(),
        }
    }

    /// 创建答案解析错误
    pub fn parse(message: impl Into<String>) -> Self {
        StageError::Parse {
            message: message.into(),
        }
    }

    /// 创建提交错误
    pub fn submission(url: impl Into<String>, message: impl Into<String>) -> Self {
        StageError::Submission {
            url: url.into(),
            message: message.into(),
        }
    }

    /// 错误描述（不含阶段前缀，用于嵌入结果 JSON）
    pub fn message(&self) -> &str {
        match self {
            StageError::Navigation { message, .. }
            | StageError::Extraction { message, .. }
            | StageError::Gateway { message, .. }
            | StageError::Parse { message }
            | StageError::Submission { message, .. } => message,
        }
    }
}
