//! 역할 및 클레임 모델.
//!
//! 역할은 클레임(권한 이름)의 묶음이며, 각 클레임은 정확히 하나의 역할에 속합니다.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// 권한 클레임.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Claim {
    /// 클레임 ID
    pub id: Uuid,
    /// 권한 이름 (예: "users.read")
    pub name: String,
    /// 소속 역할 ID
    pub role_id: Uuid,
}

/// 역할.
///
/// `claims`는 저장소가 반환한 삽입 순서를 유지합니다.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Role {
    /// 역할 ID
    pub id: Uuid,
    /// 역할 이름
    pub name: String,
    /// 이 역할이 소유한 클레임 목록
    #[serde(default)]
    pub claims: Vec<Claim>,
}

impl Role {
    /// 클레임이 없는 새 역할 생성.
    pub fn new(id: Uuid, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            claims: Vec::new(),
        }
    }

    /// 클레임 이름을 추가합니다.
    pub fn with_claim(mut self, name: impl Into<String>) -> Self {
        self.claims.push(Claim {
            id: Uuid::new_v4(),
            name: name.into(),
            role_id: self.id,
        });
        self
    }

    /// 클레임 이름 목록 (삽입 순서).
    pub fn claim_names(&self) -> Vec<String> {
        self.claims.iter().map(|c| c.name.clone()).collect()
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name)
    }
}
