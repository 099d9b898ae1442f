//! 사용자 도메인 모델.
//!
//! 평문 비밀번호는 요청 DTO에만 존재하며 [`User`]에는 저장되지 않습니다.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// 사용자 레코드.
///
/// `password_hash`는 생성 시점에 평문 비밀번호에서 유도된 PHC 문자열입니다.
/// `refresh_token`과 `refresh_token_expiry`는 인증/갱신 흐름에서만 변경됩니다.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    /// 사용자 ID
    pub id: Uuid,
    /// 사용자 이름 (고유)
    pub username: String,
    /// 이메일 (고유)
    pub email: String,
    /// 이름
    #[serde(default)]
    pub first_name: String,
    /// 성
    #[serde(default)]
    pub last_name: String,
    /// 비밀번호 해시 (PHC 형식)
    #[serde(skip_serializing, default)]
    pub password_hash: String,
    /// 역할 ID
    pub role_id: Uuid,
    /// 현재 발급된 Refresh Token
    #[serde(skip_serializing)]
    pub refresh_token: Option<String>,
    /// Refresh Token 만료 시각
    #[serde(skip_serializing)]
    pub refresh_token_expiry: Option<DateTime<Utc>>,
}

impl User {
    /// 새 사용자 생성.
    ///
    /// 토큰 상태가 비어 있는 사용자를 생성합니다. ID는 새로 발급됩니다.
    pub fn new(
        username: impl Into<String>,
        email: impl Into<String>,
        password_hash: impl Into<String>,
        role_id: Uuid,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            username: username.into(),
            email: email.into(),
            first_name: String::new(),
            last_name: String::new(),
            password_hash: password_hash.into(),
            role_id,
            refresh_token: None,
            refresh_token_expiry: None,
        }
    }

    /// 이름과 성을 설정합니다.
    pub fn with_names(mut self, first_name: impl Into<String>, last_name: impl Into<String>) -> Self {
        self.first_name = first_name.into();
        self.last_name = last_name.into();
        self
    }

    /// 로그인 식별자(사용자 이름 또는 이메일)와 일치하는지 확인.
    pub fn matches_identifier(&self, identifier: &str) -> bool {
        self.username == identifier || self.email == identifier
    }

    /// Refresh Token이 주어진 시각 기준으로 유효한지 확인.
    ///
    /// 만료 시각이 없거나 `now` 이하이면 유효하지 않습니다.
    pub fn refresh_token_valid_at(&self, now: DateTime<Utc>) -> bool {
        matches!(self.refresh_token_expiry, Some(expiry) if expiry > now)
    }

    /// 프로필 변경 사항을 적용합니다.
    ///
    /// 비밀번호 해시, Refresh Token, 만료 시각은 절대 변경하지 않습니다.
    pub fn apply_profile_update(&mut self, update: ProfileUpdate) {
        self.first_name = update.first_name;
        self.last_name = update.last_name;
        self.username = update.username;
        self.email = update.email;
        self.role_id = update.role_id;
    }
}

/// 프로필 수정 요청.
///
/// 자격증명이나 토큰 필드는 포함하지 않습니다.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileUpdate {
    pub first_name: String,
    pub last_name: String,
    pub username: String,
    pub email: String,
    pub role_id: Uuid,
}

/// 회원가입 / 사용자 추가 요청.
#[derive(Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    pub username: String,
    pub email: String,
    pub password: String,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
}

impl RegisterRequest {
    pub fn new(
        username: impl Into<String>,
        password: impl Into<String>,
        email: impl Into<String>,
    ) -> Self {
        Self {
            username: username.into(),
            email: email.into(),
            password: password.into(),
            first_name: String::new(),
            last_name: String::new(),
        }
    }
}

impl std::fmt::Debug for RegisterRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RegisterRequest")
            .field("username", &self.username)
            .field("email", &self.email)
            .field("password", &"[REDACTED]")
            .finish()
    }
}

/// 로그인 요청.
///
/// `identifier`는 사용자 이름 또는 이메일입니다.
#[derive(Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    #[serde(alias = "username")]
    pub identifier: String,
    pub password: String,
}

impl LoginRequest {
    pub fn new(identifier: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            identifier: identifier.into(),
            password: password.into(),
        }
    }
}

impl std::fmt::Debug for LoginRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LoginRequest")
            .field("identifier", &self.identifier)
            .field("password", &"[REDACTED]")
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn sample_user() -> User {
        User::new("alice", "alice@x.com", "$argon2id$v=19$stub", Uuid::new_v4())
    }

    #[test]
    fn test_matches_identifier() {
        let user = sample_user();
        assert!(user.matches_identifier("alice"));
        assert!(user.matches_identifier("alice@x.com"));
        assert!(!user.matches_identifier("Alice"));
    }

    #[test]
    fn test_refresh_token_validity() {
        let now = Utc::now();
        let mut user = sample_user();
        assert!(!user.refresh_token_valid_at(now));

        user.refresh_token_expiry = Some(now + Duration::days(5));
        assert!(user.refresh_token_valid_at(now));

        // 만료 시각과 동일하면 만료로 간주
        user.refresh_token_expiry = Some(now);
        assert!(!user.refresh_token_valid_at(now));
    }

    #[test]
    fn test_profile_update_keeps_credentials() {
        let mut user = sample_user();
        user.refresh_token = Some("opaque".to_string());
        let expiry = Utc::now() + Duration::days(5);
        user.refresh_token_expiry = Some(expiry);

        let new_role = Uuid::new_v4();
        user.apply_profile_update(ProfileUpdate {
            first_name: "Alice".to_string(),
            last_name: "Liddell".to_string(),
            username: "alice2".to_string(),
            email: "alice2@x.com".to_string(),
            role_id: new_role,
        });

        assert_eq!(user.username, "alice2");
        assert_eq!(user.email, "alice2@x.com");
        assert_eq!(user.role_id, new_role);
        assert_eq!(user.password_hash, "$argon2id$v=19$stub");
        assert_eq!(user.refresh_token.as_deref(), Some("opaque"));
        assert_eq!(user.refresh_token_expiry, Some(expiry));
    }

    #[test]
    fn test_serialization_hides_secrets() {
        let mut user = sample_user();
        user.refresh_token = Some("opaque".to_string());
        let json = serde_json::to_string(&user).unwrap();

        assert!(json.contains("\"username\":\"alice\""));
        assert!(!json.contains("argon2"));
        assert!(!json.contains("opaque"));
    }

    #[test]
    fn test_request_debug_redacts_password() {
        let request = RegisterRequest::new("alice", "Str0ng!pass", "alice@x.com");
        let debug = format!("{:?}", request);
        assert!(!debug.contains("Str0ng!pass"));

        let login = LoginRequest::new("alice", "Str0ng!pass");
        assert!(!format!("{:?}", login).contains("Str0ng!pass"));
    }
}
