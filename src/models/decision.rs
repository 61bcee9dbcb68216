use super::candidate::Candidate;
use serde::{Deserialize, Serialize};
use std::fmt;

/// 单条结果状态；Failed 只由加购协作方设置
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MatchStatus {
    Added,
    NeedsReview,
    SkippedNoMatch,
    Failed,
}

impl MatchStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            MatchStatus::Added => "ADDED",
            MatchStatus::NeedsReview => "NEEDS_REVIEW",
            MatchStatus::SkippedNoMatch => "SKIPPED_NO_MATCH",
            MatchStatus::Failed => "FAILED",
        }
    }
}

impl fmt::Display for MatchStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 置信度档位：胜出者是怎么选出来的
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Confidence {
    ExactSize,
    NextSizeUp,
    UndersizedFallback,
    TextOnly,
    None,
}

impl Confidence {
    pub fn as_str(self) -> &'static str {
        match self {
            Confidence::ExactSize => "EXACT_SIZE",
            Confidence::NextSizeUp => "NEXT_SIZE_UP",
            Confidence::UndersizedFallback => "UNDERSIZED_FALLBACK",
            Confidence::TextOnly => "TEXT_ONLY",
            Confidence::None => "NONE",
        }
    }
}

impl fmt::Display for Confidence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 一个请求的最终匹配结果
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Decision {
    pub status: MatchStatus,
    pub chosen: Option<Candidate>,
    pub confidence: Confidence,
    pub used_alternate: bool,
}

impl Decision {
    pub fn no_match() -> Self {
        Self {
            status: MatchStatus::SkippedNoMatch,
            chosen: None,
            confidence: Confidence::None,
            used_alternate: false,
        }
    }

    /// 加购失败：保留已选商品，仅状态改为 Failed
    pub fn into_failed(self) -> Self {
        Self {
            status: MatchStatus::Failed,
            ..self
        }
    }

    pub fn is_undersized(&self) -> bool {
        self.confidence == Confidence::UndersizedFallback
    }
}
