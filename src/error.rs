use thiserror::Error;

/// 引擎边界外的错误 (配置、报告输出、非法候选)；匹配失败不是错误
#[derive(Debug, Error)]
pub enum CartError {
    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Invalid candidate: {0}")]
    InvalidCandidate(String),
}

pub type CartResult<T> = Result<T, CartError>;

/// 检索协作方错误
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SearchError {
    /// 临时失败：按零结果处理
    #[error("search failed: {0}")]
    Transient(String),

    /// 验证码 / 风控拦截：停止后续检索
    #[error("bot block: {0}")]
    Blocked(String),
}

/// 加购协作方错误
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("add to cart failed: {0}")]
pub struct CartActionError(pub String);
