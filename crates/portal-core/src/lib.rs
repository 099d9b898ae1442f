//! # Portal Core
//!
//! 관리자 포털의 핵심 도메인 모델과 저장소 계약을 제공합니다.
//!
//! 이 크레이트는 인증 서브시스템 전반에서 사용되는 기본 타입을 제공합니다:
//! - 사용자, 역할, 클레임 도메인 모델
//! - 토큰 페어 DTO
//! - 영속성 계층과의 경계 (저장소 trait)
//! - 테스트 및 로컬 구성을 위한 인메모리 저장소
//! - 설정 관리
//! - 로깅 인프라

pub mod config;
pub mod domain;
pub mod error;
pub mod logging;
pub mod memory;

pub use self::config::*;
pub use domain::*;
pub use error::*;
pub use logging::*;
pub use memory::MemoryStore;
