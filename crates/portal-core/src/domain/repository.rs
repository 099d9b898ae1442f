//! 영속성 계층 경계.
//!
//! 인증 서브시스템은 사용자/역할 데이터에 이 trait들을 통해서만 접근합니다.
//! CRUD 엔드포인트와 실제 데이터베이스 연동은 이 크레이트의 범위 밖이며,
//! 각 백엔드가 이 trait를 구현합니다.

use async_trait::async_trait;
use uuid::Uuid;

use super::{Role, User};
use crate::error::StoreResult;

// =============================================================================
// UserRepository Trait
// =============================================================================

/// 사용자 저장소 trait.
///
/// # 구현 예시
///
/// ```ignore
/// pub struct PgUserRepository {
///     pool: PgPool,
/// }
///
/// #[async_trait]
/// impl UserRepository for PgUserRepository {
///     async fn find_user_by_identifier(&self, identifier: &str) -> StoreResult<Option<User>> {
///         // SELECT ... WHERE username = $1 OR email = $1
///     }
///
///     // ... 나머지 메서드 구현
/// }
/// ```
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// 사용자 이름 또는 이메일로 사용자 조회.
    async fn find_user_by_identifier(&self, identifier: &str) -> StoreResult<Option<User>>;

    /// 사용자 이름으로만 사용자 조회.
    async fn find_user_by_username(&self, username: &str) -> StoreResult<Option<User>>;

    /// ID로 사용자 조회.
    async fn find_user_by_id(&self, id: Uuid) -> StoreResult<Option<User>>;

    /// 사용자 존재 여부.
    async fn user_exists(&self, id: Uuid) -> StoreResult<bool>;

    /// 사용자 이름 사용 여부.
    async fn username_exists(&self, username: &str) -> StoreResult<bool>;

    /// 이메일 사용 여부.
    async fn email_exists(&self, email: &str) -> StoreResult<bool>;

    /// 주어진 Refresh Token이 이미 어떤 사용자에게 할당되어 있는지 확인.
    async fn refresh_token_exists(&self, token: &str) -> StoreResult<bool>;

    /// 사용자 생성 또는 갱신.
    ///
    /// 같은 ID의 사용자가 있으면 덮어씁니다 (last-writer-wins).
    async fn persist(&self, user: &User) -> StoreResult<()>;
}

// =============================================================================
// RoleRepository Trait
// =============================================================================

/// 역할/클레임 저장소 trait.
#[async_trait]
pub trait RoleRepository: Send + Sync {
    /// 역할에 바인딩된 클레임 이름 조회.
    ///
    /// 역할이 없거나 클레임이 없으면 빈 목록을 반환합니다.
    /// 순서는 저장소가 정의합니다.
    async fn resolve_claims(&self, role_id: Uuid) -> StoreResult<Vec<String>>;

    /// 역할 조회.
    async fn resolve_role(&self, role_id: Uuid) -> StoreResult<Option<Role>>;
}
