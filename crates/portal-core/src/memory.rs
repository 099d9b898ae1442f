//! 인메모리 저장소.
//!
//! 테스트와 로컬 구성을 위한 [`UserRepository`] / [`RoleRepository`] 구현.
//! 데이터베이스의 고유 인덱스처럼 사용자 이름, 이메일, Refresh Token의
//! 고유성을 `persist` 시점에 강제합니다.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;
use tracing::debug;
use uuid::Uuid;

use crate::domain::{Role, RoleRepository, User, UserRepository};
use crate::error::{StoreError, StoreResult};

#[derive(Debug, Default)]
struct UserTable {
    rows: HashMap<Uuid, User>,
    /// refresh token -> user id
    refresh_index: HashMap<String, Uuid>,
}

impl UserTable {
    fn conflicts(&self, user: &User) -> Option<&'static str> {
        // 로그인 식별자는 사용자 이름과 이메일을 함께 조회하므로 두 컬럼을 교차 검사
        for other in self.rows.values().filter(|u| u.id != user.id) {
            if other.username == user.username || other.email == user.username {
                return Some("users.username");
            }
            if other.email == user.email || other.username == user.email {
                return Some("users.email");
            }
        }

        match user.refresh_token.as_ref().and_then(|t| self.refresh_index.get(t)) {
            Some(owner) if *owner != user.id => Some("users.refresh_token"),
            _ => None,
        }
    }
}

/// 인메모리 사용자/역할 저장소.
#[derive(Debug, Default)]
pub struct MemoryStore {
    users: RwLock<UserTable>,
    roles: RwLock<HashMap<Uuid, Role>>,
}

impl MemoryStore {
    /// 빈 저장소 생성.
    pub fn new() -> Self {
        Self::default()
    }

    /// 역할을 등록하거나 교체합니다.
    pub async fn insert_role(&self, role: Role) {
        self.roles.write().await.insert(role.id, role);
    }

    /// 저장된 사용자 수.
    pub async fn user_count(&self) -> usize {
        self.users.read().await.rows.len()
    }
}

#[async_trait]
impl UserRepository for MemoryStore {
    async fn find_user_by_identifier(&self, identifier: &str) -> StoreResult<Option<User>> {
        let table = self.users.read().await;
        // 사용자 이름 일치 우선, 없으면 이메일
        let by_username = table.rows.values().find(|u| u.username == identifier);
        Ok(by_username
            .or_else(|| table.rows.values().find(|u| u.matches_identifier(identifier)))
            .cloned())
    }

    async fn find_user_by_username(&self, username: &str) -> StoreResult<Option<User>> {
        let table = self.users.read().await;
        Ok(table.rows.values().find(|u| u.username == username).cloned())
    }

    async fn find_user_by_id(&self, id: Uuid) -> StoreResult<Option<User>> {
        Ok(self.users.read().await.rows.get(&id).cloned())
    }

    async fn user_exists(&self, id: Uuid) -> StoreResult<bool> {
        Ok(self.users.read().await.rows.contains_key(&id))
    }

    async fn username_exists(&self, username: &str) -> StoreResult<bool> {
        let table = self.users.read().await;
        Ok(table.rows.values().any(|u| u.username == username))
    }

    async fn email_exists(&self, email: &str) -> StoreResult<bool> {
        let table = self.users.read().await;
        Ok(table.rows.values().any(|u| u.email == email))
    }

    async fn refresh_token_exists(&self, token: &str) -> StoreResult<bool> {
        Ok(self.users.read().await.refresh_index.contains_key(token))
    }

    async fn persist(&self, user: &User) -> StoreResult<()> {
        let mut table = self.users.write().await;

        if let Some(column) = table.conflicts(user) {
            return Err(StoreError::UniqueViolation(column.to_string()));
        }

        let previous = table.rows.insert(user.id, user.clone());
        if let Some(old_token) = previous.and_then(|p| p.refresh_token) {
            table.refresh_index.remove(&old_token);
        }
        if let Some(token) = &user.refresh_token {
            table.refresh_index.insert(token.clone(), user.id);
        }

        debug!(user_id = %user.id, "사용자 저장");
        Ok(())
    }
}

#[async_trait]
impl RoleRepository for MemoryStore {
    async fn resolve_claims(&self, role_id: Uuid) -> StoreResult<Vec<String>> {
        Ok(self
            .roles
            .read()
            .await
            .get(&role_id)
            .map(Role::claim_names)
            .unwrap_or_default())
    }

    async fn resolve_role(&self, role_id: Uuid) -> StoreResult<Option<Role>> {
        Ok(self.roles.read().await.get(&role_id).cloned())
    }
}
