//! 평가 결과 캐시.
//!
//! 키는 `(종목, 기준일, 이력 버전)`입니다. 과거 일봉은 저장 후 변하지 않으므로
//! 새 가격 수신 시에는 해당 기준일 항목만 무효화합니다. 더 새로운 이력 버전이
//! 저장되면 같은 종목의 이전 버전 항목은 모두 제거됩니다.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::NaiveDate;
use tokio::sync::RwLock;
use tracing::debug;

use crate::evaluator::Evaluation;

/// 캐시 키.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey {
    pub ticker: String,
    pub as_of: NaiveDate,
    pub version: u64,
}

impl CacheKey {
    pub fn new(ticker: &str, as_of: NaiveDate, version: u64) -> Self {
        Self {
            ticker: ticker.to_uppercase(),
            as_of,
            version,
        }
    }
}

/// 스레드 안전한 평가 결과 캐시.
#[derive(Debug, Clone, Default)]
pub struct ScoreCache {
    entries: Arc<RwLock<HashMap<CacheKey, Arc<Evaluation>>>>,
}

impl ScoreCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn get(&self, key: &CacheKey) -> Option<Arc<Evaluation>> {
        self.entries.read().await.get(key).cloned()
    }

    /// 항목을 저장하고 같은 종목의 이전 버전 항목을 제거합니다.
    ///
    /// 이미 더 새로운 버전이 있으면 저장하지 않습니다.
    pub async fn insert(&self, key: CacheKey, evaluation: Arc<Evaluation>) {
        let mut entries = self.entries.write().await;
        let newest = entries
            .keys()
            .filter(|k| k.ticker == key.ticker)
            .map(|k| k.version)
            .max();
        if newest.is_some_and(|v| v > key.version) {
            debug!(ticker = %key.ticker, version = key.version, "이전 버전 결과 저장 생략");
            return;
        }

        let before = entries.len();
        entries.retain(|k, _| !(k.ticker == key.ticker && k.version < key.version));
        let purged = before - entries.len();
        if purged > 0 {
            debug!(ticker = %key.ticker, version = key.version, purged, "이전 버전 캐시 제거");
        }
        entries.insert(key, evaluation);
    }

    /// 한 종목의 특정 기준일 항목(모든 버전)을 제거합니다.
    ///
    /// 다른 기준일 항목은 유지됩니다. 제거된 개수를 반환합니다.
    pub async fn invalidate_date(&self, ticker: &str, as_of: NaiveDate) -> usize {
        let ticker = ticker.to_uppercase();
        let mut entries = self.entries.write().await;
        let before = entries.len();
        entries.retain(|key, _| !(key.ticker == ticker && key.as_of == as_of));
        let removed = before - entries.len();
        debug!(%ticker, %as_of, removed, "캐시 무효화");
        removed
    }

    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.entries.read().await.is_empty()
    }

    pub async fn clear(&self) {
        self.entries.write().await.clear();
    }
}
