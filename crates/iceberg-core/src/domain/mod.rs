//! 점수 엔진을 위한 도메인 모델.

mod price;
mod score_type;

pub use price::*;
pub use score_type::*;
