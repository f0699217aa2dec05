//! 취소 가능한 점수 계산 서비스.
//!
//! 표시 계층이 종목을 선택할 때마다 평가를 블로킹 스레드에서 실행합니다.
//! 새로운 선택이 들어오면 이전 작업의 토큰을 취소하고, 늦게 끝난 이전 결과는
//! 적용하지 않고 버립니다.
//!
//! # 사용 예시
//!
//! ```rust,ignore
//! let service = ScoreService::new(Evaluator::default(), ScoreCache::new());
//! match service.select(history, today).await? {
//!     Some(eval) => render(&eval),
//!     None => {} // 더 새로운 선택에 의해 대체됨
//! }
//! ```

use std::sync::Arc;

use chrono::NaiveDate;
use iceberg_core::PriceHistory;
use tokio::sync::Mutex;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use crate::cache::{CacheKey, ScoreCache};
use crate::error::{AnalysisError, AnalysisResult};
use crate::evaluator::{Evaluation, Evaluator};

/// 진행 중인 선택 상태.
#[derive(Debug)]
struct InFlight {
    generation: u64,
    token: CancellationToken,
}

/// 점수 계산 서비스.
#[derive(Clone)]
pub struct ScoreService {
    evaluator: Arc<Evaluator>,
    cache: ScoreCache,
    inflight: Arc<Mutex<InFlight>>,
}

impl ScoreService {
    /// 새 서비스 인스턴스 생성.
    pub fn new(evaluator: Evaluator, cache: ScoreCache) -> Self {
        Self {
            evaluator: Arc::new(evaluator),
            cache,
            inflight: Arc::new(Mutex::new(InFlight {
                generation: 0,
                token: CancellationToken::new(),
            })),
        }
    }

    pub fn cache(&self) -> &ScoreCache {
        &self.cache
    }

    /// 현재 선택 세대.
    pub async fn generation(&self) -> u64 {
        self.inflight.lock().await.generation
    }

    /// 진행 중인 작업을 취소합니다.
    pub async fn cancel(&self) {
        self.inflight.lock().await.token.cancel();
    }

    /// 종목을 선택하고 평가합니다.
    ///
    /// 완료 전에 다른 선택이 들어오면 `Ok(None)`을 반환합니다.
    pub async fn select(
        &self,
        history: Arc<PriceHistory>,
        as_of: NaiveDate,
    ) -> AnalysisResult<Option<Arc<Evaluation>>> {
        let (generation, token) = self.begin().await;
        let key = CacheKey::new(history.ticker(), as_of, history.version());

        if let Some(hit) = self.cache.get(&key).await {
            debug!(ticker = %key.ticker, %as_of, "캐시 적중");
            let inflight = self.inflight.lock().await;
            return Ok((inflight.generation == generation).then_some(hit));
        }

        let evaluator = Arc::clone(&self.evaluator);
        let job_history = Arc::clone(&history);
        let handle =
            tokio::task::spawn_blocking(move || evaluator.evaluate(&job_history, as_of));

        let evaluation = tokio::select! {
            _ = token.cancelled() => {
                debug!(ticker = %key.ticker, generation, "평가 취소됨");
                return Ok(None);
            }
            joined = handle => joined.map_err(|e| AnalysisError::Task(e.to_string()))??,
        };

        Ok(self.publish(generation, key, Arc::new(evaluation)).await)
    }

    /// 새 가격 수신 후 해당 기준일 캐시를 무효화하고 다시 평가합니다.
    pub async fn refresh(
        &self,
        history: Arc<PriceHistory>,
        as_of: NaiveDate,
    ) -> AnalysisResult<Option<Arc<Evaluation>>> {
        self.cache.invalidate_date(history.ticker(), as_of).await;
        self.select(history, as_of).await
    }

    async fn begin(&self) -> (u64, CancellationToken) {
        let mut inflight = self.inflight.lock().await;
        inflight.token.cancel();
        inflight.generation += 1;
        inflight.token = CancellationToken::new();
        (inflight.generation, inflight.token.clone())
    }

    /// 세대가 여전히 최신일 때만 결과를 캐시에 넣고 반환합니다.
    ///
    /// 비교부터 반환까지 선택 잠금을 유지하므로 그 사이에 새 선택이 시작될 수 없습니다.
    async fn publish(
        &self,
        generation: u64,
        key: CacheKey,
        evaluation: Arc<Evaluation>,
    ) -> Option<Arc<Evaluation>> {
        let inflight = self.inflight.lock().await;
        if inflight.generation != generation || inflight.token.is_cancelled() {
            warn!(
                ticker = %key.ticker,
                as_of = %key.as_of,
                generation,
                current = inflight.generation,
                "오래된 평가 결과 폐기"
            );
            return None;
        }
        self.cache.insert(key, Arc::clone(&evaluation)).await;
        Some(evaluation)
    }
}
