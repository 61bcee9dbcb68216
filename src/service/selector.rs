//! 选品：相关度下限过滤后，按 "最接近且不小于目标尺寸" 策略选出至多一个胜出者。
//!
//! 档位优先级：
//! 1. 相关度低于下限的候选永不返回
//! 2. 有目标尺寸且存在同域尺寸的候选：
//!    a. 尺寸相等 (相对容差内) -> EXACT_SIZE，取相关度最高
//!    b. 比目标大的里取最小的 -> NEXT_SIZE_UP，同尺寸取相关度最高
//!    c. 全都比目标小 -> UNDERSIZED_FALLBACK，取相关度最高，需复核
//! 3. 没有可比较尺寸 -> TEXT_ONLY，取相关度最高
//! 4. 主检索词没有结果时，用备选词的候选集重跑一遍
//!
//! 所有比较都是全序并带显式的平局规则，最后按候选在结果集中的位置决胜。

use crate::config::MatchConfig;
use crate::models::{Candidate, CandidateSets, Confidence, Decision, MatchStatus, NormalizedRequest, Size};
use std::cmp::Ordering;

/// 通过下限的候选及其在结果集中的位置
#[derive(Debug, Clone, Copy)]
struct Ranked<'a> {
    index: usize,
    candidate: &'a Candidate,
}

impl Ranked<'_> {
    fn relevance(&self) -> f64 {
        self.candidate.relevance_score
    }
}

/// 相关度降序，再按位置升序
fn by_relevance(a: &Ranked<'_>, b: &Ranked<'_>) -> Ordering {
    b.relevance()
        .total_cmp(&a.relevance())
        .then_with(|| a.index.cmp(&b.index))
}

#[derive(Debug, Clone, Default)]
pub struct Selector {
    config: MatchConfig,
}

impl Selector {
    pub fn new(config: MatchConfig) -> Self {
        Self { config }
    }

    /// 对一个请求做出最终决定：先主检索词，再备选词，都没有则 SKIPPED_NO_MATCH
    pub fn select(&self, request: &NormalizedRequest, candidates_by_term: &CandidateSets) -> Decision {
        if let Some(decision) = self.select_for_term(request, &request.search_term, candidates_by_term, false) {
            return decision;
        }

        if let Some(alternate) = &request.alternate_term {
            if let Some(decision) = self.select_for_term(request, alternate, candidates_by_term, true) {
                tracing::debug!("'{}' matched via alternate '{}'", request.raw_text, alternate);
                return decision;
            }
        }

        tracing::debug!("'{}' has no candidate above the relevance floor", request.raw_text);
        Decision::no_match()
    }

    fn select_for_term(
        &self,
        request: &NormalizedRequest,
        term: &str,
        candidates_by_term: &CandidateSets,
        used_alternate: bool,
    ) -> Option<Decision> {
        let candidates = candidates_by_term.get(term)?;
        let (winner, confidence) = self.pick(request.target(), candidates)?;
        Some(self.decide(winner.clone(), confidence, used_alternate))
    }

    /// 单个候选集上的一次选择，纯函数
    pub fn pick<'a>(
        &self,
        target: Option<Size>,
        candidates: &'a [Candidate],
    ) -> Option<(&'a Candidate, Confidence)> {
        let survivors: Vec<Ranked<'a>> = candidates
            .iter()
            .enumerate()
            .filter(|(_, c)| {
                c.relevance_score.is_finite() && c.relevance_score >= self.config.relevance_floor
            })
            .map(|(index, candidate)| Ranked { index, candidate })
            .collect();

        if survivors.is_empty() {
            return None;
        }

        if let Some(target) = target {
            if let Some(picked) = self.pick_by_size(target, &survivors) {
                return Some(picked);
            }
        }

        survivors
            .iter()
            .min_by(|a, b| by_relevance(a, b))
            .map(|r| (r.candidate, Confidence::TextOnly))
    }

    fn pick_by_size<'a>(
        &self,
        target: Size,
        survivors: &[Ranked<'a>],
    ) -> Option<(&'a Candidate, Confidence)> {
        let sized: Vec<(Ranked<'a>, f64)> = survivors
            .iter()
            .filter_map(|r| {
                r.candidate
                    .parsed_size
                    .filter(|s| s.same_domain(target.domain))
                    .map(|s| (*r, s.magnitude))
            })
            .collect();

        if sized.is_empty() {
            return None;
        }

        let tolerance = target.magnitude.abs() * self.config.size_tolerance;

        let exact = sized
            .iter()
            .filter(|(_, size)| (size - target.magnitude).abs() <= tolerance)
            .min_by(|a, b| by_relevance(&a.0, &b.0));
        if let Some((r, _)) = exact {
            return Some((r.candidate, Confidence::ExactSize));
        }

        let next_up = sized
            .iter()
            .filter(|(_, size)| *size > target.magnitude)
            .min_by(|a, b| a.1.total_cmp(&b.1).then_with(|| by_relevance(&a.0, &b.0)));
        if let Some((r, _)) = next_up {
            return Some((r.candidate, Confidence::NextSizeUp));
        }

        // 全部偏小：相关度优先，其次取较大的
        sized
            .iter()
            .min_by(|a, b| {
                b.0.relevance()
                    .total_cmp(&a.0.relevance())
                    .then_with(|| b.1.total_cmp(&a.1))
                    .then_with(|| a.0.index.cmp(&b.0.index))
            })
            .map(|(r, _)| (r.candidate, Confidence::UndersizedFallback))
    }

    fn decide(&self, chosen: Candidate, confidence: Confidence, used_alternate: bool) -> Decision {
        let status = match confidence {
            Confidence::UndersizedFallback => MatchStatus::NeedsReview,
            Confidence::TextOnly if chosen.relevance_score < self.config.review_threshold => {
                MatchStatus::NeedsReview
            }
            _ => MatchStatus::Added,
        };

        tracing::debug!(
            "Selected '{}' ({}, relevance {:.2}) -> {}",
            chosen.title,
            confidence,
            chosen.relevance_score,
            status
        );

        Decision {
            status,
            chosen: Some(chosen),
            confidence,
            used_alternate,
        }
    }
}
