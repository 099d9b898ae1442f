//! 인증 에러 타입.
//!
//! 각 구성 요소는 [`AuthError`]를 반환하고, 호출자는 [`ErrorResponse`]로 변환해
//! 클라이언트에 전달합니다. 응답 본문에는 서명 키, 해시, 토큰, 내부 에러 원문이
//! 포함되지 않습니다.

use portal_core::StoreError;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::password::PasswordRule;

/// 중복된 필드.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConflictField {
    Username,
    Email,
}

impl std::fmt::Display for ConflictField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConflictField::Username => write!(f, "username"),
            ConflictField::Email => write!(f, "email"),
        }
    }
}

/// 인증 에러.
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error("사용자를 찾을 수 없습니다")]
    NotFound,
    #[error("비밀번호가 올바르지 않습니다")]
    BadCredentials,
    #[error("비밀번호 정책 위반: {}", format_rules(.0))]
    Validation(Vec<PasswordRule>),
    #[error("이미 사용 중인 {0}입니다")]
    Conflict(ConflictField),
    #[error("유효하지 않은 토큰")]
    InvalidToken,
    #[error("토큰이 만료되었습니다")]
    TokenExpired,
    #[error("잘못된 요청")]
    InvalidRequest,
    #[error("역할을 찾을 수 없습니다: {0}")]
    RoleNotFound(Uuid),
    #[error("고유한 Refresh Token 생성 실패 ({attempts}회 시도)")]
    TokenGeneration { attempts: u32 },
    #[error("비밀번호 해싱 실패")]
    PasswordHash,
    #[error("토큰 서명 실패: {0}")]
    TokenSigning(#[from] jsonwebtoken::errors::Error),
    #[error("저장소 에러: {0}")]
    Store(#[from] StoreError),
}

fn format_rules(rules: &[PasswordRule]) -> String {
    rules
        .iter()
        .map(|r| r.message())
        .collect::<Vec<_>>()
        .join(", ")
}

/// 인증 작업을 위한 Result 타입.
pub type AuthResult<T> = Result<T, AuthError>;

impl AuthError {
    /// 안정적인 에러 코드.
    pub fn code(&self) -> &'static str {
        match self {
            AuthError::NotFound => "USER_NOT_FOUND",
            AuthError::BadCredentials => "BAD_CREDENTIALS",
            AuthError::Validation(_) => "WEAK_PASSWORD",
            AuthError::Conflict(ConflictField::Username) => "USERNAME_TAKEN",
            AuthError::Conflict(ConflictField::Email) => "EMAIL_TAKEN",
            AuthError::InvalidToken => "INVALID_TOKEN",
            AuthError::TokenExpired => "TOKEN_EXPIRED",
            AuthError::InvalidRequest => "INVALID_REQUEST",
            AuthError::RoleNotFound(_) => "ROLE_NOT_FOUND",
            AuthError::TokenGeneration { .. } => "TOKEN_GENERATION_FAILED",
            AuthError::PasswordHash => "PASSWORD_HASH_FAILED",
            AuthError::TokenSigning(_) => "TOKEN_SIGNING_FAILED",
            AuthError::Store(_) => "STORE_ERROR",
        }
    }

    /// 클라이언트 입력으로 인한 에러인지 확인합니다.
    ///
    /// 그 외의 에러는 서버 측 문제이며 상세 내용을 노출하지 않습니다.
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            AuthError::NotFound
                | AuthError::BadCredentials
                | AuthError::Validation(_)
                | AuthError::Conflict(_)
                | AuthError::InvalidToken
                | AuthError::TokenExpired
                | AuthError::InvalidRequest
        )
    }
}

/// 클라이언트용 에러 응답.
///
/// ```json
/// {
///   "code": "WEAK_PASSWORD",
///   "message": "비밀번호 정책 위반: ...",
///   "details": ["min_length", "special_character"]
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// 에러 코드
    pub code: String,
    /// 사람이 읽을 수 있는 메시지
    pub message: String,
    /// 위반된 비밀번호 규칙 (정책 위반 시에만)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<Vec<PasswordRule>>,
}

impl From<&AuthError> for ErrorResponse {
    fn from(err: &AuthError) -> Self {
        let message = if err.is_client_error() {
            err.to_string()
        } else {
            "내부 서버 오류".to_string()
        };
        let details = match err {
            AuthError::Validation(rules) => Some(rules.clone()),
            _ => None,
        };

        Self {
            code: err.code().to_string(),
            message,
            details,
        }
    }
}

impl From<AuthError> for ErrorResponse {
    fn from(err: AuthError) -> Self {
        ErrorResponse::from(&err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_conflict_codes() {
        assert_eq!(AuthError::Conflict(ConflictField::Username).code(), "USERNAME_TAKEN");
        assert_eq!(AuthError::Conflict(ConflictField::Email).code(), "EMAIL_TAKEN");
    }

    #[test]
    fn test_validation_response_lists_rules() {
        let err = AuthError::Validation(vec![PasswordRule::MinLength, PasswordRule::SpecialCharacter]);
        let response = ErrorResponse::from(&err);

        assert_eq!(response.code, "WEAK_PASSWORD");
        assert_eq!(
            response.details,
            Some(vec![PasswordRule::MinLength, PasswordRule::SpecialCharacter])
        );

        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json["details"][0], "min_length");
    }

    #[test]
    fn test_internal_errors_are_masked() {
        let err = AuthError::Store(StoreError::Backend(
            "connection to postgres://admin:hunter2@db failed".to_string(),
        ));
        let response = ErrorResponse::from(err);

        assert_eq!(response.code, "STORE_ERROR");
        assert!(!response.message.contains("hunter2"));
        assert!(response.details.is_none());
    }

    #[test]
    fn test_client_errors_keep_message() {
        let response = ErrorResponse::from(AuthError::InvalidRequest);
        assert_eq!(response.message, "잘못된 요청");
        assert!(AuthError::BadCredentials.is_client_error());
        assert!(!AuthError::PasswordHash.is_client_error());
    }
}
