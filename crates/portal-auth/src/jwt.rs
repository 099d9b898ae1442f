//! Access Token 발급 및 검증.
//!
//! HS256으로 서명된 단기 Access Token을 발급합니다. 토큰은 자체 검증 가능하며
//! 서명 키를 가진 쪽은 저장소 조회 없이 서명과 만료를 확인할 수 있습니다.

use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{
    decode, encode, errors::ErrorKind, Algorithm, DecodingKey, EncodingKey, Header, Validation,
};
use portal_core::{AuthConfig, Role, User};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{AuthError, AuthResult};

/// Access Token 페이로드.
///
/// 클레임 목록은 문자열로 이중 인코딩하지 않고 JSON 배열 그대로 담습니다.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessClaims {
    /// Subject - 사용자 ID
    pub sub: String,
    /// 역할 이름
    pub role: String,
    /// 사용자 이름
    pub name: String,
    /// 역할에 바인딩된 권한 이름
    #[serde(rename = "myClaims", default)]
    pub my_claims: Vec<String>,
    /// Issued At (Unix timestamp)
    pub iat: i64,
    /// Expiration (Unix timestamp)
    pub exp: i64,
    /// JWT ID
    pub jti: String,
}

impl AccessClaims {
    fn new(user: &User, role: &Role, claims: &[String], issued_at: DateTime<Utc>, ttl: Duration) -> Self {
        Self {
            sub: user.id.to_string(),
            role: role.name.clone(),
            name: user.username.clone(),
            my_claims: claims.to_vec(),
            iat: issued_at.timestamp(),
            exp: (issued_at + ttl).timestamp(),
            jti: uuid::Uuid::new_v4().to_string(),
        }
    }
}

/// 검증된 토큰에서 추출한 신원 정보.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Principal {
    /// 사용자 이름
    pub username: String,
    /// 역할 이름
    pub role: String,
    /// 권한 이름
    pub claims: Vec<String>,
}

impl From<AccessClaims> for Principal {
    fn from(claims: AccessClaims) -> Self {
        Self {
            username: claims.name,
            role: claims.role,
            claims: claims.my_claims,
        }
    }
}

/// Access Token 발급기.
///
/// 서명 키는 생성 시점에 주입되며 이후에는 인코딩/디코딩 키 형태로만 보관됩니다.
#[derive(Clone)]
pub struct TokenIssuer {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    algorithm: Algorithm,
    access_ttl: Duration,
}

impl TokenIssuer {
    /// 서명 키와 Access Token 수명으로 발급기 생성.
    pub fn new(secret: &SecretString, access_ttl: Duration) -> Self {
        let key = secret.expose_secret().as_bytes();
        Self {
            encoding_key: EncodingKey::from_secret(key),
            decoding_key: DecodingKey::from_secret(key),
            algorithm: Algorithm::HS256,
            access_ttl,
        }
    }

    /// 인증 설정에서 발급기 생성.
    pub fn from_config(config: &AuthConfig) -> Self {
        Self::new(&config.jwt_secret, config.access_token_ttl())
    }

    /// Access Token 수명.
    pub fn access_ttl(&self) -> Duration {
        self.access_ttl
    }

    /// Access Token 발급.
    ///
    /// # Arguments
    ///
    /// * `user` - 토큰 주체
    /// * `role` - 사용자의 역할
    /// * `claims` - 역할에서 조회한 권한 이름
    pub fn issue_access_token(&self, user: &User, role: &Role, claims: &[String]) -> AuthResult<String> {
        self.issue_access_token_at(user, role, claims, Utc::now())
    }

    /// 지정한 발급 시각으로 Access Token 발급.
    pub fn issue_access_token_at(
        &self,
        user: &User,
        role: &Role,
        claims: &[String],
        issued_at: DateTime<Utc>,
    ) -> AuthResult<String> {
        let payload = AccessClaims::new(user, role, claims, issued_at, self.access_ttl);
        let token = encode(&Header::new(self.algorithm), &payload, &self.encoding_key)?;

        debug!(user_id = %user.id, role = %role.name, claims = claims.len(), "Access Token 발급");
        Ok(token)
    }

    /// Access Token 디코딩 및 전체 검증 (서명 + 만료).
    ///
    /// 토큰 수명이 짧으므로 만료 허용 오차(leeway)는 두지 않습니다.
    pub fn decode_access_token(&self, token: &str) -> AuthResult<AccessClaims> {
        let mut validation = Validation::new(self.algorithm);
        validation.leeway = 0;
        validation.validate_aud = false;

        decode::<AccessClaims>(token, &self.decoding_key, &validation)
            .map(|data| data.claims)
            .map_err(|e| match e.kind() {
                ErrorKind::ExpiredSignature => AuthError::TokenExpired,
                _ => AuthError::InvalidToken,
            })
    }

    /// 만료된 Access Token 검증.
    ///
    /// 갱신 요청 전용입니다. 서명과 알고리즘만 확인하고 만료는 검사하지 않습니다.
    /// issuer/audience 검증도 하지 않습니다.
    ///
    /// # Errors
    ///
    /// - `AuthError::InvalidToken`: 서명 불일치, 형식 오류, 헤더 알고리즘 불일치
    pub fn validate_expired_token(&self, token: &str) -> AuthResult<Principal> {
        let mut validation = Validation::new(self.algorithm);
        validation.validate_exp = false;
        validation.validate_aud = false;

        let data = decode::<AccessClaims>(token, &self.decoding_key, &validation).map_err(|e| {
            debug!(error_kind = ?e.kind(), "만료 토큰 검증 실패");
            AuthError::InvalidToken
        })?;

        if data.header.alg != self.algorithm {
            return Err(AuthError::InvalidToken);
        }

        Ok(Principal::from(data.claims))
    }
}
