//! 역할 클레임 조회.

use std::sync::Arc;

use portal_core::RoleRepository;
use uuid::Uuid;

use crate::error::AuthResult;

/// 역할에 바인딩된 권한 이름을 조회합니다.
///
/// 저장소의 반환 순서와 무관하게 같은 역할이면 같은 토큰 페이로드가 나오도록
/// 이름을 정렬하고 중복을 제거합니다.
#[derive(Clone)]
pub struct ClaimsResolver {
    roles: Arc<dyn RoleRepository>,
}

impl ClaimsResolver {
    pub fn new(roles: Arc<dyn RoleRepository>) -> Self {
        Self { roles }
    }

    /// 역할의 클레임 이름 목록.
    ///
    /// 역할이 없거나 클레임이 없으면 빈 목록을 반환합니다.
    pub async fn resolve_claims(&self, role_id: Uuid) -> AuthResult<Vec<String>> {
        let mut claims = self.roles.resolve_claims(role_id).await?;
        claims.sort();
        claims.dedup();
        Ok(claims)
    }

    /// 하위 역할 저장소.
    pub fn roles(&self) -> &Arc<dyn RoleRepository> {
        &self.roles
    }
}
