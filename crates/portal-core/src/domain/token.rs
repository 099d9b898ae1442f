//! 토큰 페어 DTO.

use serde::{Deserialize, Serialize};

/// Access Token + Refresh Token 페어.
///
/// 로그인/갱신 응답과 갱신 요청에 동일한 형식으로 사용됩니다.
/// 엔티티로 저장되지 않으며, Refresh Token은 사용자 레코드에 복사됩니다.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenPair {
    /// 서명된 Access Token
    pub access_token: String,
    /// 불투명 Refresh Token
    pub refresh_token: String,
}

impl TokenPair {
    pub fn new(access_token: impl Into<String>, refresh_token: impl Into<String>) -> Self {
        Self {
            access_token: access_token.into(),
            refresh_token: refresh_token.into(),
        }
    }
}

// 토큰 값이 로그에 남지 않도록 길이만 출력
impl std::fmt::Debug for TokenPair {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenPair")
            .field("access_token_len", &self.access_token.len())
            .field("refresh_token_len", &self.refresh_token.len())
            .finish()
    }
}
