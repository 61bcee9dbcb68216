use super::decision::{Decision, MatchStatus};
use super::request::NormalizedRequest;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// 单行输出：(raw_text, request, decision) 三元组
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchOutcome {
    pub raw_text: String,
    pub request: NormalizedRequest,
    pub decision: Decision,
}

impl MatchOutcome {
    pub fn new(request: NormalizedRequest, decision: Decision) -> Self {
        Self {
            raw_text: request.raw_text.clone(),
            request,
            decision,
        }
    }
}

/// 报告中的一行 (扁平化，便于 JSON/CSV 输出)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ItemReport {
    pub raw: String,
    pub query: String,
    pub alt_query: Option<String>,
    pub status: MatchStatus,
    pub confidence: String,
    pub used_alternate: bool,
    pub chosen_title: Option<String>,
    pub chosen_url: Option<String>,
    pub chosen_size: Option<String>,
    pub chosen_price: Option<String>,
    pub relevance: Option<f64>,
    pub undersized: bool,
}

impl From<&MatchOutcome> for ItemReport {
    fn from(outcome: &MatchOutcome) -> Self {
        let chosen = outcome.decision.chosen.as_ref();
        Self {
            raw: outcome.raw_text.clone(),
            query: outcome.request.search_term.clone(),
            alt_query: outcome.request.alternate_term.clone(),
            status: outcome.decision.status,
            confidence: outcome.decision.confidence.to_string(),
            used_alternate: outcome.decision.used_alternate,
            chosen_title: chosen.map(|c| c.title.clone()),
            chosen_url: chosen.map(|c| c.locator.clone()),
            chosen_size: chosen.and_then(|c| c.parsed_size).map(|s| s.to_string()),
            chosen_price: chosen.and_then(|c| c.price.clone()),
            relevance: chosen.map(|c| c.relevance_score),
            undersized: outcome.decision.is_undersized(),
        }
    }
}

/// 按状态计数的运行汇总
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunSummary {
    pub total: usize,
    pub added: usize,
    pub needs_review: usize,
    pub skipped: usize,
    pub failed: usize,
}

impl RunSummary {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, status: MatchStatus) {
        self.total += 1;
        match status {
            MatchStatus::Added => self.added += 1,
            MatchStatus::NeedsReview => self.needs_review += 1,
            MatchStatus::SkippedNoMatch => self.skipped += 1,
            MatchStatus::Failed => self.failed += 1,
        }
    }

    pub fn from_outcomes(outcomes: &[MatchOutcome]) -> Self {
        outcomes.iter().fold(Self::new(), |mut acc, o| {
            acc.record(o.decision.status);
            acc
        })
    }
}

/// 一次运行的完整报告
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunReport {
    pub timestamp: DateTime<Utc>,
    pub dry_run: bool,
    pub summary: RunSummary,
    pub items: Vec<ItemReport>,
}

impl RunReport {
    pub fn build(outcomes: &[MatchOutcome], dry_run: bool) -> Self {
        Self {
            timestamp: Utc::now(),
            dry_run,
            summary: RunSummary::from_outcomes(outcomes),
            items: outcomes.iter().map(ItemReport::from).collect(),
        }
    }

    /// 控制台摘要
    pub fn summary_text(&self) -> String {
        let s = &self.summary;
        let mut lines = vec![
            format!("Run: {}  (dry_run={})", self.timestamp.to_rfc3339(), self.dry_run),
            format!(
                "Total: {}  Added: {}  Skipped: {}  Failed: {}  Review: {}",
                s.total, s.added, s.skipped, s.failed, s.needs_review
            ),
            String::new(),
        ];

        for (i, item) in self.items.iter().enumerate() {
            let mut tag = item.status.to_string();
            if item.undersized {
                tag.push_str(" (undersized)");
            }
            if item.used_alternate {
                tag.push_str(" (alt)");
            }
            lines.push(format!("  {}. [{}] {}", i + 1, tag, item.raw));
            lines.push(format!(
                "     -> {}  {}",
                item.chosen_title.as_deref().unwrap_or("-"),
                item.chosen_price.as_deref().unwrap_or("")
            ));
        }

        lines.join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Confidence, MeasurementDomain};

    fn outcome(raw: &str, status: MatchStatus) -> MatchOutcome {
        let request = NormalizedRequest {
            raw_text: raw.to_string(),
            search_term: raw.to_string(),
            alternate_term: None,
            quantity: None,
            unit: None,
            target_quantity: None,
            target_domain: MeasurementDomain::Unknown,
        };
        let decision = Decision {
            status,
            chosen: None,
            confidence: Confidence::None,
            used_alternate: false,
        };
        MatchOutcome::new(request, decision)
    }

    #[test]
    fn summary_counts_every_status() {
        let outcomes = vec![
            outcome("honey", MatchStatus::Added),
            outcome("flour", MatchStatus::Added),
            outcome("saffron", MatchStatus::SkippedNoMatch),
            outcome("butter", MatchStatus::NeedsReview),
            outcome("yeast", MatchStatus::Failed),
        ];

        let summary = RunSummary::from_outcomes(&outcomes);
        assert_eq!(summary.total, 5);
        assert_eq!(summary.added, 2);
        assert_eq!(summary.skipped, 1);
        assert_eq!(summary.needs_review, 1);
        assert_eq!(summary.failed, 1);
    }

    #[test]
    fn summary_text_lists_items_in_order() {
        let outcomes = vec![
            outcome("honey", MatchStatus::Added),
            outcome("saffron", MatchStatus::SkippedNoMatch),
        ];
        let report = RunReport::build(&outcomes, true);
        let text = report.summary_text();

        assert!(text.contains("Total: 2  Added: 1  Skipped: 1"));
        let honey = text.find("[ADDED] honey").expect("honey line");
        let saffron = text.find("[SKIPPED_NO_MATCH] saffron").expect("saffron line");
        assert!(honey < saffron);
    }
}
