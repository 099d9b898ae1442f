//! 설정 관리.
//!
//! 이 모듈은 인증 서브시스템의 설정을 정의하고 관리합니다.
//! 서명 키는 코드에 하드코딩하지 않고 설정으로 주입합니다.

use chrono::Duration;
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use std::path::Path;
use uuid::Uuid;

/// 회원가입 시 부여되는 기본 역할 ID.
pub const DEFAULT_ROLE_ID: Uuid = Uuid::from_u128(0x6AB6245F_68DF_4927_9FE4_E9FFCED547D0);

/// HS256 서명 키의 최소 길이 (바이트)
pub const MIN_SECRET_LEN: usize = 32;

/// 애플리케이션 설정.
#[derive(Debug, Deserialize)]
pub struct AppConfig {
    /// 인증/토큰 설정
    pub auth: AuthConfig,
    /// 비밀번호 해싱 설정
    #[serde(default)]
    pub password: PasswordConfig,
    /// 로깅 설정
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// 인증 및 토큰 수명 설정.
#[derive(Debug, Deserialize)]
pub struct AuthConfig {
    /// Access Token 서명 키 (HS256)
    pub jwt_secret: SecretString,
    /// Access Token 수명 (초)
    #[serde(default = "default_access_ttl")]
    pub access_token_ttl_secs: i64,
    /// Refresh Token 수명 (일)
    #[serde(default = "default_refresh_ttl")]
    pub refresh_token_ttl_days: i64,
    /// Refresh Token 고유성 재시도 최대 횟수
    #[serde(default = "default_max_attempts")]
    pub refresh_token_max_attempts: u32,
    /// 회원가입 시 부여할 역할
    #[serde(default = "default_role_id")]
    pub default_role_id: Uuid,
    /// 갱신 시 Refresh Token 만료 시각도 연장할지 여부
    #[serde(default)]
    pub extend_refresh_expiry_on_rotation: bool,
}

fn default_access_ttl() -> i64 {
    10
}
fn default_refresh_ttl() -> i64 {
    5
}
fn default_max_attempts() -> u32 {
    8
}
fn default_role_id() -> Uuid {
    DEFAULT_ROLE_ID
}

impl AuthConfig {
    /// 서명 키만 지정하고 나머지는 기본값을 사용합니다.
    pub fn new(jwt_secret: impl Into<String>) -> Self {
        Self {
            jwt_secret: SecretString::from(jwt_secret.into()),
            access_token_ttl_secs: default_access_ttl(),
            refresh_token_ttl_days: default_refresh_ttl(),
            refresh_token_max_attempts: default_max_attempts(),
            default_role_id: DEFAULT_ROLE_ID,
            extend_refresh_expiry_on_rotation: false,
        }
    }

    /// Access Token 수명.
    pub fn access_token_ttl(&self) -> Duration {
        Duration::seconds(self.access_token_ttl_secs)
    }

    /// Refresh Token 수명.
    pub fn refresh_token_ttl(&self) -> Duration {
        Duration::days(self.refresh_token_ttl_days)
    }

    /// 설정 값 검증.
    pub fn validate(&self) -> Result<(), config::ConfigError> {
        let secret_len = self.jwt_secret.expose_secret().len();
        if secret_len < MIN_SECRET_LEN {
            return Err(config::ConfigError::Message(format!(
                "auth.jwt_secret는 최소 {}바이트 이상이어야 합니다 (현재 {}바이트)",
                MIN_SECRET_LEN, secret_len
            )));
        }
        if self.access_token_ttl_secs <= 0 {
            return Err(config::ConfigError::Message(
                "auth.access_token_ttl_secs는 0보다 커야 합니다".to_string(),
            ));
        }
        if self.refresh_token_ttl_days <= 0 {
            return Err(config::ConfigError::Message(
                "auth.refresh_token_ttl_days는 0보다 커야 합니다".to_string(),
            ));
        }
        if self.refresh_token_max_attempts == 0 {
            return Err(config::ConfigError::Message(
                "auth.refresh_token_max_attempts는 1 이상이어야 합니다".to_string(),
            ));
        }
        Ok(())
    }
}

/// Argon2id 비용 파라미터.
#[derive(Debug, Clone, Deserialize)]
pub struct PasswordConfig {
    /// 메모리 비용 (KiB)
    pub memory_kib: u32,
    /// 반복 횟수
    pub iterations: u32,
    /// 병렬도
    pub parallelism: u32,
}

impl Default for PasswordConfig {
    fn default() -> Self {
        // argon2 크레이트 기본값 (OWASP 권장치)
        Self {
            memory_kib: 19 * 1024,
            iterations: 2,
            parallelism: 1,
        }
    }
}

/// 로깅 설정.
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// 로그 레벨
    pub level: String,
    /// 로그 형식 (pretty, json, compact)
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "pretty".to_string(),
        }
    }
}

impl AppConfig {
    /// 파일과 환경 변수에서 설정을 로드합니다.
    ///
    /// 파일이 없으면 환경 변수만 사용합니다. 환경 변수는
    /// `PORTAL_AUTH__JWT_SECRET`처럼 `PORTAL` 접두사와 `__` 구분자를 사용합니다.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, config::ConfigError> {
        let builder = config::Config::builder()
            // 파일에서 로드
            .add_source(config::File::from(path.as_ref()).required(false))
            // 환경 변수로 오버라이드
            .add_source(
                config::Environment::with_prefix("PORTAL")
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            );

        let config: AppConfig = builder.build()?.try_deserialize()?;
        config.auth.validate()?;
        Ok(config)
    }

    /// `.env`를 읽은 뒤 기본 경로에서 설정을 로드합니다.
    pub fn load_default() -> Result<Self, config::ConfigError> {
        // .env 파일은 선택 사항
        let _ = dotenvy::dotenv();
        Self::load("config/default.toml")
    }
}
