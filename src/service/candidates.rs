use crate::error::{CartError, CartResult};
use crate::models::{Candidate, RawCandidate};
use crate::service::{relevance, size};
use indexmap::IndexSet;

/// 边界校验：标题和链接都不能为空
pub fn validate(raw: RawCandidate) -> CartResult<RawCandidate> {
    let title = raw.title.trim();
    let url = raw.url.trim();
    if title.is_empty() {
        return Err(CartError::InvalidCandidate(format!("empty title (url={})", url)));
    }
    if url.is_empty() {
        return Err(CartError::InvalidCandidate(format!("empty url (title={})", title)));
    }
    Ok(RawCandidate {
        title: title.to_string(),
        url: url.to_string(),
        ..raw
    })
}

/// 将某个检索词的原始结果转换为打分后的候选集
///
/// 非法结果丢弃并记录 warn；同一链接只保留第一次出现。
pub fn build_candidates(term: &str, raws: Vec<RawCandidate>) -> Vec<Candidate> {
    let mut seen_locators: IndexSet<String> = IndexSet::new();
    let mut candidates = Vec::with_capacity(raws.len());

    for raw in raws {
        let raw = match validate(raw) {
            Ok(raw) => raw,
            Err(e) => {
                tracing::warn!("Dropping search result for '{}': {}", term, e);
                continue;
            }
        };
        if !seen_locators.insert(raw.url.clone()) {
            continue;
        }

        let parsed_size = size::parse_candidate_size(&raw.title, raw.size_text.as_deref());
        let relevance_score = relevance::score(term, &raw.title);

        candidates.push(Candidate {
            title: raw.title,
            locator: raw.url,
            price: raw.price,
            size_text: raw.size_text,
            image_url: raw.image_url,
            fulfillment: raw.fulfillment,
            parsed_size,
            relevance_score,
        });
    }

    candidates
}
