use crate::models::{CandidateSets, MatchOutcome, NormalizedRequest, RawCandidate, RunSummary};
use crate::service::{build_candidates, Normalizer, Selector};
use axum::{
    extract::{Json, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use indexmap::IndexMap;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// 共享状态：归一化器 + 选品器 (均无可变状态)
#[derive(Debug, Clone)]
pub struct AppState {
    pub normalizer: Normalizer,
    pub selector: Arc<Selector>,
}

/// 请求体: 清单原始行
#[derive(Debug, Deserialize)]
pub struct NormalizeRequest {
    pub lines: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct NormalizeResponse {
    pub requests: Vec<NormalizedRequest>,
}

/// 单行 + 调用方已检索到的各检索词结果
#[derive(Debug, Deserialize)]
pub struct BatchMatchItem {
    pub raw_text: String,
    #[serde(default)]
    pub candidates: IndexMap<String, Vec<RawCandidate>>,
}

#[derive(Debug, Deserialize)]
pub struct BatchMatchRequest {
    pub items: Vec<BatchMatchItem>,
}

/// 响应体
#[derive(Debug, Serialize)]
pub struct BatchMatchResponse {
    pub success: bool,
    pub message: String,
    pub summary: RunSummary,
    pub decisions: Vec<MatchOutcome>,
}

/// 健康检查
pub async fn health_check() -> &'static str {
    "OK"
}

/// 批量归一化
pub async fn normalize_lines(
    State(state): State<AppState>,
    Json(req): Json<NormalizeRequest>,
) -> Json<NormalizeResponse> {
    let requests = req
        .lines
        .iter()
        .map(|line| state.normalizer.normalize(line))
        .collect();
    Json(NormalizeResponse { requests })
}

fn match_item(state: &AppState, item: &BatchMatchItem) -> MatchOutcome {
    let request = state.normalizer.normalize(&item.raw_text);

    let mut sets = CandidateSets::new();
    for (term, raws) in &item.candidates {
        sets.insert(term, build_candidates(term, raws.clone()));
    }

    let decision = state.selector.select(&request, &sets);
    MatchOutcome::new(request, decision)
}

/// 批量选品：各行互相独立，rayon 并行，输出保持输入顺序
pub async fn batch_match(
    State(state): State<AppState>,
    Json(req): Json<BatchMatchRequest>,
) -> Response {
    let worker_state = state.clone();
    let decisions = tokio::task::spawn_blocking(move || {
        req.items
            .par_iter()
            .map(|item| match_item(&worker_state, item))
            .collect::<Vec<_>>()
    })
    .await;

    batch_response(decisions)
}

fn batch_response(decisions: Result<Vec<MatchOutcome>, tokio::task::JoinError>) -> Response {
    match decisions {
        Ok(decisions) => {
            let summary = RunSummary::from_outcomes(&decisions);
            tracing::info!(
                "Batch matched {} items: added {}, review {}, skipped {}",
                summary.total,
                summary.added,
                summary.needs_review,
                summary.skipped
            );
            let response = BatchMatchResponse {
                success: true,
                message: format!(
                    "Matched {} items: {} added, {} need review, {} skipped",
                    summary.total, summary.added, summary.needs_review, summary.skipped
                ),
                summary,
                decisions,
            };
            (StatusCode::OK, Json(response)).into_response()
        }
        Err(e) => {
            tracing::error!("Batch match worker failed: {}", e);
            let response = BatchMatchResponse {
                success: false,
                message: format!("Error: {}", e),
                summary: RunSummary::new(),
                decisions: Vec::new(),
            };
            (StatusCode::INTERNAL_SERVER_ERROR, Json(response)).into_response()
        }
    }
}
