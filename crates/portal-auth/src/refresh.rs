//! Refresh Token 생성 및 만료 정책.

use base64::{engine::general_purpose::STANDARD, Engine};
use chrono::{DateTime, Duration, Utc};
use portal_core::{AuthConfig, UserRepository};
use rand::{rngs::OsRng, RngCore};
use tracing::warn;

use crate::error::{AuthError, AuthResult};

/// Refresh Token 원본 바이트 길이 (512비트 엔트로피)
pub const REFRESH_TOKEN_BYTES: usize = 64;

/// Refresh Token 관리자.
///
/// 생성된 토큰은 현재 저장된 모든 Refresh Token과 겹치지 않음을 확인한 뒤
/// 반환합니다. 충돌 시 최대 `max_attempts`회까지 다시 생성합니다.
#[derive(Debug, Clone)]
pub struct RefreshTokenManager {
    ttl: Duration,
    max_attempts: u32,
}

impl RefreshTokenManager {
    pub fn new(ttl: Duration, max_attempts: u32) -> Self {
        Self {
            ttl,
            max_attempts: max_attempts.max(1),
        }
    }

    /// 인증 설정에서 관리자 생성.
    pub fn from_config(config: &AuthConfig) -> Self {
        Self::new(config.refresh_token_ttl(), config.refresh_token_max_attempts)
    }

    /// Refresh Token 유효 기간.
    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// 발급 시각 기준 만료 시각.
    pub fn expiry_from(&self, issued_at: DateTime<Utc>) -> DateTime<Utc> {
        issued_at + self.ttl
    }

    /// OS CSPRNG로 고유한 Refresh Token 생성.
    pub async fn generate_refresh_token(&self, users: &dyn UserRepository) -> AuthResult<String> {
        self.generate_with(&mut OsRng, users).await
    }

    /// 주어진 난수 생성기로 고유한 Refresh Token 생성.
    ///
    /// 64바이트를 표준 base64로 인코딩합니다 (88자).
    ///
    /// # Errors
    ///
    /// - `AuthError::TokenGeneration`: 모든 시도에서 기존 토큰과 충돌
    /// - `AuthError::Store`: 고유성 확인 중 저장소 에러
    pub async fn generate_with<R>(&self, rng: &mut R, users: &dyn UserRepository) -> AuthResult<String>
    where
        R: RngCore + Send,
    {
        let mut bytes = [0u8; REFRESH_TOKEN_BYTES];

        for attempt in 1..=self.max_attempts {
            rng.fill_bytes(&mut bytes);
            let token = STANDARD.encode(bytes);

            if !users.refresh_token_exists(&token).await? {
                return Ok(token);
            }

            warn!(attempt, max_attempts = self.max_attempts, "Refresh Token 충돌, 재생성");
        }

        Err(AuthError::TokenGeneration {
            attempts: self.max_attempts,
        })
    }
}
