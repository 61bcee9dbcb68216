use crate::config::{AppConfig, PipelineConfig};
use crate::error::{CartActionError, CartResult, SearchError};
use crate::export::write_json;
use crate::models::{
    Candidate, CandidateSets, Decision, MatchOutcome, MatchStatus, RawCandidate, RunReport,
};
use crate::service::candidates::build_candidates;
use crate::service::normalizer::Normalizer;
use crate::service::selector::Selector;
use futures::stream::{self, StreamExt};
use std::future::Future;
use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};

/// 检索协作方：按检索词返回原始结果
pub trait SearchProvider {
    fn search(
        &self,
        term: &str,
        limit: usize,
    ) -> impl Future<Output = Result<Vec<RawCandidate>, SearchError>> + Send;
}

/// 加购协作方：Ok(false) 表示未能确认加购成功
pub trait CartAction {
    fn add_to_cart(&self, locator: &str) -> impl Future<Output = Result<bool, CartActionError>> + Send;
}

/// 不做任何加购，只用于 dry run
#[derive(Debug, Clone, Copy, Default)]
pub struct DryRunCart;

impl CartAction for DryRunCart {
    async fn add_to_cart(&self, _locator: &str) -> Result<bool, CartActionError> {
        Ok(true)
    }
}

/// 清单 -> 归一化 -> 检索 -> 选品 -> (可选) 加购
///
/// 每行互相独立，按 `concurrency` 并发处理，输出保持输入顺序。
pub struct MatchPipeline<P, C> {
    provider: P,
    cart: C,
    normalizer: Normalizer,
    selector: Selector,
    config: PipelineConfig,
}

impl<P: SearchProvider, C: CartAction> MatchPipeline<P, C> {
    pub fn new(provider: P, cart: C, config: &AppConfig) -> Self {
        Self {
            provider,
            cart,
            normalizer: Normalizer::new(config.matching.max_query_words),
            selector: Selector::new(config.matching),
            config: config.pipeline.clone(),
        }
    }

    pub fn provider(&self) -> &P {
        &self.provider
    }

    pub async fn run(&self, lines: &[String]) -> Vec<MatchOutcome> {
        let total = lines.len();
        let blocked_flag = AtomicBool::new(false);
        let blocked = &blocked_flag;
        tracing::info!("Processing {} list items", total);

        let outcomes: Vec<MatchOutcome> = stream::iter(lines.iter().enumerate())
            .map(|(idx, raw)| self.process_line(idx, total, raw, blocked))
            .buffered(self.config.concurrency.max(1))
            .collect()
            .await;

        outcomes
    }

    pub async fn run_report(&self, lines: &[String]) -> RunReport {
        let outcomes = self.run(lines).await;
        RunReport::build(&outcomes, self.config.dry_run)
    }

    /// 运行并把 JSON 报告写到 `pipeline.report_path`
    pub async fn run_and_write(&self, lines: &[String]) -> CartResult<RunReport> {
        let report = self.run_report(lines).await;
        tracing::info!("\n{}", report.summary_text());
        write_json(&report, Path::new(&self.config.report_path))?;
        Ok(report)
    }

    async fn process_line(
        &self,
        idx: usize,
        total: usize,
        raw: &str,
        blocked: &AtomicBool,
    ) -> MatchOutcome {
        let request = self.normalizer.normalize(raw);
        tracing::info!("[{}/{}] {} -> query: '{}'", idx + 1, total, raw, request.search_term);

        if request.search_term.is_empty() && request.alternate_term.is_none() {
            tracing::warn!("[{}/{}] nothing to search after cleanup, skipping", idx + 1, total);
            return MatchOutcome::new(request, Decision::no_match());
        }

        if blocked.load(Ordering::SeqCst) {
            tracing::warn!("[{}/{}] SKIP: bot block active", idx + 1, total);
            return MatchOutcome::new(request, Decision::no_match());
        }

        let mut sets = CandidateSets::new();
        let mut decision = Decision::no_match();

        // 主检索词清洗后为空时直接走备选词
        if !request.search_term.is_empty() {
            match self.fetch(&request.search_term).await {
                Ok(candidates) => sets.insert(&request.search_term, candidates),
                Err(e) => {
                    tracing::warn!("[{}/{}] {}; aborting remaining searches", idx + 1, total, e);
                    blocked.store(true, Ordering::SeqCst);
                    return MatchOutcome::new(request, Decision::no_match().into_failed());
                }
            }
            decision = self.selector.select(&request, &sets);
        }

        if decision.status == MatchStatus::SkippedNoMatch {
            if let Some(alternate) = &request.alternate_term {
                tracing::info!("[{}/{}] no match, trying alt: '{}'", idx + 1, total, alternate);
                match self.fetch(alternate).await {
                    Ok(candidates) => {
                        sets.insert(alternate, candidates);
                        decision = self.selector.select(&request, &sets);
                    }
                    Err(e) => {
                        tracing::warn!("[{}/{}] {}; aborting remaining searches", idx + 1, total, e);
                        blocked.store(true, Ordering::SeqCst);
                        return MatchOutcome::new(request, Decision::no_match().into_failed());
                    }
                }
            }
        }

        let decision = self.act(decision).await;
        match &decision.chosen {
            Some(c) => tracing::info!(
                "[{}/{}] {} ({}): {}",
                idx + 1,
                total,
                decision.status,
                decision.confidence,
                c.title
            ),
            None => tracing::info!("[{}/{}] {}", idx + 1, total, decision.status),
        }

        MatchOutcome::new(request, decision)
    }

    /// 临时失败按零结果处理；只有拦截错误会向上返回
    async fn fetch(&self, term: &str) -> Result<Vec<Candidate>, SearchError> {
        match self.provider.search(term, self.config.search_limit).await {
            Ok(mut raws) => {
                raws.truncate(self.config.search_limit);
                Ok(build_candidates(term, raws))
            }
            Err(SearchError::Transient(msg)) => {
                tracing::warn!("Search for '{}' failed, treating as no results: {}", term, msg);
                Ok(Vec::new())
            }
            Err(e) => Err(e),
        }
    }

    /// 只对 ADDED 执行加购；dry run 时不调用协作方
    async fn act(&self, decision: Decision) -> Decision {
        if self.config.dry_run || decision.status != MatchStatus::Added {
            return decision;
        }
        let Some(locator) = decision.chosen.as_ref().map(|c| c.locator.clone()) else {
            return decision;
        };

        match self.cart.add_to_cart(&locator).await {
            Ok(true) => decision,
            Ok(false) => {
                tracing::warn!("Could not confirm add to cart for {}", locator);
                decision.into_failed()
            }
            Err(e) => {
                tracing::warn!("{} ({})", e, locator);
                decision.into_failed()
            }
        }
    }
}
