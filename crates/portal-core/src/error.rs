//! 저장소 계층의 에러 타입.
//!
//! 영속성 협력자(데이터베이스, 인메모리 저장소 등)가 반환하는 에러를 정의합니다.

use thiserror::Error;

/// 저장소 에러.
#[derive(Debug, Error)]
pub enum StoreError {
    /// 백엔드 연결 또는 쿼리 실패
    #[error("저장소 백엔드 에러: {0}")]
    Backend(String),

    /// 고유 제약 조건 위반
    #[error("고유 제약 조건 위반: {0}")]
    UniqueViolation(String),

    /// 백엔드 응답 시간 초과
    #[error("저장소 응답 시간 초과")]
    Timeout,
}

/// 저장소 작업을 위한 Result 타입.
pub type StoreResult<T> = Result<T, StoreError>;
