//! 일봉 가격 데이터 타입.
//!
//! 이 모듈은 가격 이력 관련 타입을 정의합니다:
//! - `PriceBar` - 하루치 OHLCV 데이터
//! - `PriceHistory` - 한 종목의 검증된 일봉 시퀀스

use chrono::NaiveDate;
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::error::DataError;

/// 하루치 OHLCV 데이터.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceBar {
    /// 거래일
    pub date: NaiveDate,
    /// 시가
    pub open: Decimal,
    /// 고가
    pub high: Decimal,
    /// 저가
    pub low: Decimal,
    /// 종가
    pub close: Decimal,
    /// 거래량
    pub volume: Decimal,
}

impl PriceBar {
    /// 새 일봉을 생성합니다.
    pub fn new(
        date: NaiveDate,
        open: Decimal,
        high: Decimal,
        low: Decimal,
        close: Decimal,
        volume: Decimal,
    ) -> Self {
        Self {
            date,
            open,
            high,
            low,
            close,
            volume,
        }
    }

    /// 종가만으로 일봉을 생성합니다 (시가/고가/저가 = 종가, 거래량 0).
    pub fn from_close(date: NaiveDate, close: Decimal) -> Self {
        Self::new(date, close, close, close, close, Decimal::ZERO)
    }

    /// 종가를 f64로 반환합니다.
    pub fn close_f64(&self) -> f64 {
        self.close.to_f64().unwrap_or(f64::NAN)
    }

    fn validate(&self) -> Result<(), DataError> {
        for (field, value) in [
            ("open", self.open),
            ("high", self.high),
            ("low", self.low),
            ("close", self.close),
        ] {
            if value <= Decimal::ZERO {
                return Err(DataError::NonPositivePrice {
                    date: self.date,
                    field,
                    value: value.to_string(),
                });
            }
            match value.to_f64() {
                Some(v) if v.is_finite() => {}
                _ => {
                    return Err(DataError::NonFinite {
                        date: self.date,
                        field,
                    })
                }
            }
        }

        if self.volume < Decimal::ZERO {
            return Err(DataError::NegativeVolume {
                date: self.date,
                value: self.volume.to_string(),
            });
        }

        Ok(())
    }
}

/// 한 종목의 검증된 일봉 이력.
///
/// 날짜는 엄격한 오름차순이며 중복이 없습니다. 생성 이후에는 변경되지 않으며,
/// 새로운 데이터를 받으면 `version`이 증가한 새 인스턴스를 만들어야 합니다.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PriceHistory {
    ticker: String,
    bars: Vec<PriceBar>,
    version: u64,
}

impl PriceHistory {
    /// 가격 이력을 검증하고 생성합니다.
    ///
    /// # 에러
    ///
    /// - 빈 이력
    /// - 0 이하 가격, 유한하지 않은 값, 음수 거래량
    /// - 날짜 역순 또는 중복
    pub fn new(ticker: impl Into<String>, bars: Vec<PriceBar>) -> Result<Self, DataError> {
        if bars.is_empty() {
            return Err(DataError::Empty);
        }

        for bar in &bars {
            bar.validate()?;
        }

        for pair in bars.windows(2) {
            if pair[1].date <= pair[0].date {
                return Err(DataError::NonMonotonicDate {
                    previous: pair[0].date,
                    current: pair[1].date,
                });
            }
        }

        Ok(Self {
            ticker: ticker.into().to_uppercase(),
            bars,
            version: 0,
        })
    }

    /// 이력 버전을 지정합니다 (캐시 키에 사용).
    pub fn with_version(mut self, version: u64) -> Self {
        self.version = version;
        self
    }

    /// 종목 코드
    pub fn ticker(&self) -> &str {
        &self.ticker
    }

    /// 이력 버전
    pub fn version(&self) -> u64 {
        self.version
    }

    /// 전체 일봉
    pub fn bars(&self) -> &[PriceBar] {
        &self.bars
    }

    /// 일봉 개수
    pub fn len(&self) -> usize {
        self.bars.len()
    }

    /// 비어 있는지 여부 (검증된 이력은 항상 false)
    pub fn is_empty(&self) -> bool {
        self.bars.is_empty()
    }

    /// 첫 거래일
    pub fn first_date(&self) -> Option<NaiveDate> {
        self.bars.first().map(|b| b.date)
    }

    /// 마지막 거래일
    pub fn last_date(&self) -> Option<NaiveDate> {
        self.bars.last().map(|b| b.date)
    }

    /// 기준일(포함)까지의 일봉을 반환합니다.
    pub fn up_to(&self, as_of: NaiveDate) -> &[PriceBar] {
        let end = self.bars.partition_point(|b| b.date <= as_of);
        &self.bars[..end]
    }

    /// 기준일 당일 또는 그 이전 가장 가까운 거래일의 일봉.
    pub fn bar_on_or_before(&self, date: NaiveDate) -> Option<&PriceBar> {
        self.up_to(date).last()
    }

    /// 종가 시퀀스를 f64로 반환합니다.
    pub fn closes(bars: &[PriceBar]) -> Vec<f64> {
        bars.iter().map(PriceBar::close_f64).collect()
    }

    /// CSV 텍스트에서 가격 이력을 파싱합니다.
    ///
    /// 헤더 행이 필요하며 `date`(또는 `trade_date`), `close` 컬럼은 필수입니다.
    /// `open`, `high`, `low`, `volume`이 없으면 종가/0으로 채웁니다.
    /// 날짜는 `YYYY-MM-DD` 형식입니다.
    pub fn from_csv_str(ticker: impl Into<String>, content: &str) -> Result<Self, DataError> {
        let mut lines = content
            .lines()
            .enumerate()
            .filter(|(_, line)| !line.trim().is_empty());

        let (_, header) = lines.next().ok_or(DataError::Empty)?;
        let columns: Vec<String> = header
            .split(',')
            .map(|c| c.trim().to_lowercase())
            .collect();

        let find = |names: &[&str]| columns.iter().position(|c| names.contains(&c.as_str()));
        let date_idx = find(&["date", "trade_date"]).ok_or_else(|| DataError::Parse {
            line: 1,
            message: "date 컬럼이 없습니다".to_string(),
        })?;
        let close_idx = find(&["close"]).ok_or_else(|| DataError::Parse {
            line: 1,
            message: "close 컬럼이 없습니다".to_string(),
        })?;
        let open_idx = find(&["open"]);
        let high_idx = find(&["high"]);
        let low_idx = find(&["low"]);
        let volume_idx = find(&["volume"]);

        let mut bars = Vec::new();
        for (idx, line) in lines {
            let line_no = idx + 1;
            let fields: Vec<&str> = line.split(',').map(str::trim).collect();

            let get = |i: usize| {
                fields.get(i).copied().ok_or_else(|| DataError::Parse {
                    line: line_no,
                    message: format!("{}번째 컬럼이 없습니다", i + 1),
                })
            };
            let parse_decimal = |i: usize| -> Result<Decimal, DataError> {
                let raw = get(i)?;
                Decimal::from_str(raw).map_err(|e| DataError::Parse {
                    line: line_no,
                    message: format!("숫자 변환 실패 '{}': {}", raw, e),
                })
            };

            let date_raw = get(date_idx)?;
            let date = NaiveDate::parse_from_str(date_raw, "%Y-%m-%d").map_err(|e| {
                DataError::Parse {
                    line: line_no,
                    message: format!("날짜 변환 실패 '{}': {}", date_raw, e),
                }
            })?;

            let close = parse_decimal(close_idx)?;
            let open = open_idx.map(parse_decimal).transpose()?.unwrap_or(close);
            let high = high_idx.map(parse_decimal).transpose()?.unwrap_or(close);
            let low = low_idx.map(parse_decimal).transpose()?.unwrap_or(close);
            let volume = volume_idx
                .map(parse_decimal)
                .transpose()?
                .unwrap_or(Decimal::ZERO);

            bars.push(PriceBar::new(date, open, high, low, close, volume));
        }

        Self::new(ticker, bars)
    }
}
