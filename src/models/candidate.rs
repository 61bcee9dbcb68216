use super::unit::Size;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// 检索协作方返回的原始结果 (未校验)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawCandidate {
    pub title: String,
    /// 商品链接，加购协作方使用；引擎不解读
    #[serde(alias = "locator")]
    pub url: String,
    #[serde(default)]
    pub price: Option<String>,
    /// 卡片上单独给出的规格文本，如 "12 oz"
    #[serde(default)]
    pub size_text: Option<String>,
    #[serde(default)]
    pub image_url: Option<String>,
    /// Pickup / Delivery / Shipping
    #[serde(default)]
    pub fulfillment: Option<String>,
}

/// 已校验、已打分的候选商品
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Candidate {
    pub title: String,
    pub locator: String,
    pub price: Option<String>,
    pub size_text: Option<String>,
    pub image_url: Option<String>,
    pub fulfillment: Option<String>,
    pub parsed_size: Option<Size>,
    /// [0,1]，检索词与标题的相似度
    pub relevance_score: f64,
}

/// 检索词 -> 该词的完整候选集 (保序)
///
/// 词按小写去空白后的形式作为键，查找大小写不敏感。
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CandidateSets {
    sets: IndexMap<String, Vec<Candidate>>,
}

impl CandidateSets {
    pub fn new() -> Self {
        Self::default()
    }

    fn key(term: &str) -> String {
        term.split_whitespace()
            .collect::<Vec<_>>()
            .join(" ")
            .to_lowercase()
    }

    /// 同一个词重复插入时覆盖为最新的完整结果集
    pub fn insert(&mut self, term: &str, candidates: Vec<Candidate>) {
        self.sets.insert(Self::key(term), candidates);
    }

    pub fn get(&self, term: &str) -> Option<&[Candidate]> {
        self.sets.get(&Self::key(term)).map(Vec::as_slice)
    }
}
