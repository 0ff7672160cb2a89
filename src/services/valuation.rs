use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use futures::stream;
use futures::StreamExt;

use crate::errors::{FetchError, RefreshError};
use crate::models::holding::{Holding, PortfolioSummary};
use crate::services::fund_data::QuoteSource;

const DEFAULT_CONCURRENCY: usize = 8;

/// 刷新过程中的渲染回调。单只成功带完整持仓，单只失败只带代码，
/// 一轮刷新的总览恰好发出一次。
#[async_trait]
pub trait Presenter: Send + Sync {
    async fn render_holding(&self, holding: &Holding);
    async fn render_holding_failed(&self, code: &str, error: &FetchError);
    async fn render_summary(&self, summary: &PortfolioSummary);
}

/// 估值聚合器：并发抓取所有持仓的估值，容忍单只失败，汇总组合总览。
pub struct ValuationAggregator {
    source: Arc<dyn QuoteSource>,
    cycle: AtomicU64,
    concurrency: usize,
}

impl ValuationAggregator {
    pub fn new(source: Arc<dyn QuoteSource>) -> Self {
        Self::with_concurrency(source, DEFAULT_CONCURRENCY)
    }

    pub fn with_concurrency(source: Arc<dyn QuoteSource>, concurrency: usize) -> Self {
        Self {
            source,
            cycle: AtomicU64::new(0),
            concurrency: concurrency.max(1),
        }
    }

    /// 刷新一轮：逐只并发抓取，完成顺序不定，全部结束后恰好发出一次总览。
    ///
    /// 成功的持仓写回估值并计入累计市值/累计成本；失败的持仓保持原值，
    /// 不计入任何累计（不会按 0 填充）。期间若有新一轮刷新启动，本轮立即
    /// 失效：不再写回、不发总览，返回 Superseded。
    pub async fn refresh(
        &self,
        holdings: &mut [Holding],
        presenter: &dyn Presenter,
    ) -> Result<PortfolioSummary, RefreshError> {
        let token = self.cycle.fetch_add(1, Ordering::SeqCst) + 1;

        let fetches: Vec<_> = holdings
            .iter()
            .enumerate()
            .map(|(idx, h)| {
                let code = h.code.clone();
                let source = Arc::clone(&self.source);
                async move { (idx, source.fetch_one(&code).await) }
            })
            .collect();
        let mut completed = stream::iter(fetches).buffer_unordered(self.concurrency);

        let mut total_value = 0.0_f64;
        let mut total_cost = 0.0_f64;

        // 累加只发生在这个单消费者循环里；完成计数由流耗尽保证，
        // 与提交顺序无关。
        while let Some((idx, result)) = completed.next().await {
            if self.cycle.load(Ordering::SeqCst) != token {
                log::info!("第{}轮刷新已被取代，丢弃剩余结果", token);
                return Err(RefreshError::Superseded(token));
            }
            match result {
                Ok(quote) => {
                    let holding = &mut holdings[idx];
                    holding.apply_quote(&quote);
                    total_value += holding.value;
                    total_cost += holding.hold_cost();
                    presenter.render_holding(holding).await;
                }
                Err(err) => {
                    log::warn!("{}", err);
                    presenter.render_holding_failed(err.code(), &err).await;
                }
            }
        }

        if self.cycle.load(Ordering::SeqCst) != token {
            return Err(RefreshError::Superseded(token));
        }

        let summary = PortfolioSummary::from_totals(total_value, total_cost);
        presenter.render_summary(&summary).await;
        Ok(summary)
    }
}
