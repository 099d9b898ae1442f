//! # Portal Auth
//!
//! 관리자 포털의 인증 및 토큰 수명 주기.
//!
//! # 구성 요소
//!
//! - [`CredentialVerifier`]: Argon2id 비밀번호 해싱/검증, [`check_password_strength`]
//! - [`ClaimsResolver`]: 역할에 바인딩된 권한 이름 조회
//! - [`TokenIssuer`]: HS256 Access Token 발급, 만료 토큰 검증
//! - [`RefreshTokenManager`]: 고유한 불투명 Refresh Token 생성, 만료 정책
//! - [`AuthService`]: 로그인 / 회원가입 / 토큰 갱신 흐름
//!
//! # 사용 예시
//!
//! ```rust,ignore
//! let config = AppConfig::load_default()?;
//! let store = Arc::new(MemoryStore::new());
//! let auth = AuthService::from_config(&config, store.clone(), store)?;
//!
//! let pair = auth.authenticate(&LoginRequest::new("alice", "Str0ng!pass")).await?;
//! let renewed = auth.refresh(&pair).await?;
//! ```

mod claims;
mod error;
mod jwt;
mod password;
mod refresh;
mod service;

pub use claims::ClaimsResolver;
pub use error::{AuthError, AuthResult, ConflictField, ErrorResponse};
pub use jwt::{AccessClaims, Principal, TokenIssuer};
pub use password::{
    check_password_strength, CredentialVerifier, PasswordRule, MIN_PASSWORD_LEN,
    SPECIAL_CHARACTERS,
};
pub use refresh::{RefreshTokenManager, REFRESH_TOKEN_BYTES};
pub use service::AuthService;
