//! 인증 흐름 조정자.
//!
//! 로그인, 회원가입, 토큰 갱신 흐름을 순서대로 실행하고 각 단계의 실패를
//! [`AuthError`]로 반환합니다.
//!
//! # 흐름
//!
//! - **authenticate**: 식별자로 조회 → 비밀번호 검증 → Access/Refresh Token 발급 → 저장
//! - **register**: 강도 검사 → 사용자 이름 중복 → 이메일 중복 → 해싱 후 저장
//! - **refresh**: 만료 토큰 검증 → 사용자 조회 → Refresh Token/만료 확인 → 재발급
//!
//! 요청 간 공유되는 가변 상태는 저장소뿐이며, 같은 사용자에 대한 동시 갱신은
//! 저장소에서 last-writer-wins로 처리됩니다.

use std::sync::Arc;

use chrono::Utc;
use portal_core::{
    AppConfig, AuthConfig, LoginRequest, PasswordConfig, ProfileUpdate, RegisterRequest,
    RoleRepository, TokenPair, User, UserRepository,
};
use tracing::{info, warn, Instrument};
use uuid::Uuid;

use crate::claims::ClaimsResolver;
use crate::error::{AuthError, AuthResult, ConflictField};
use crate::jwt::TokenIssuer;
use crate::password::{check_password_strength, CredentialVerifier};
use crate::refresh::RefreshTokenManager;

/// 인증 서비스.
///
/// `Send + Sync`이므로 `Arc`로 감싸 요청 간에 공유합니다.
#[derive(Clone)]
pub struct AuthService {
    users: Arc<dyn UserRepository>,
    claims: ClaimsResolver,
    credentials: CredentialVerifier,
    issuer: TokenIssuer,
    refresh: RefreshTokenManager,
    default_role_id: Uuid,
    extend_expiry_on_rotation: bool,
}

impl AuthService {
    /// 인증/비밀번호 설정과 저장소로 서비스 생성.
    pub fn new(
        auth: &AuthConfig,
        password: &PasswordConfig,
        users: Arc<dyn UserRepository>,
        roles: Arc<dyn RoleRepository>,
    ) -> AuthResult<Self> {
        Ok(Self {
            users,
            claims: ClaimsResolver::new(roles),
            credentials: CredentialVerifier::new(password)?,
            issuer: TokenIssuer::from_config(auth),
            refresh: RefreshTokenManager::from_config(auth),
            default_role_id: auth.default_role_id,
            extend_expiry_on_rotation: auth.extend_refresh_expiry_on_rotation,
        })
    }

    /// 애플리케이션 설정으로 서비스 생성.
    pub fn from_config(
        config: &AppConfig,
        users: Arc<dyn UserRepository>,
        roles: Arc<dyn RoleRepository>,
    ) -> AuthResult<Self> {
        Self::new(&config.auth, &config.password, users, roles)
    }

    /// Access Token 발급기.
    pub fn issuer(&self) -> &TokenIssuer {
        &self.issuer
    }

    // =========================================================================
    // 로그인
    // =========================================================================

    /// 자격증명을 확인하고 토큰 페어를 발급합니다.
    ///
    /// # Errors
    ///
    /// - `AuthError::NotFound`: 식별자에 해당하는 사용자 없음
    /// - `AuthError::BadCredentials`: 비밀번호 불일치
    pub async fn authenticate(&self, request: &LoginRequest) -> AuthResult<TokenPair> {
        let span = portal_core::auth_span!("authenticate", request.identifier);

        async {
            let Some(mut user) = self.users.find_user_by_identifier(&request.identifier).await? else {
                warn!(reason = "unknown_user", "로그인 실패");
                return Err(AuthError::NotFound);
            };

            if !self.credentials.verify_password(&request.password, &user.password_hash) {
                warn!(user_id = %user.id, reason = "bad_password", "로그인 실패");
                return Err(AuthError::BadCredentials);
            }

            let access_token = self.issue_access_token(&user).await?;
            let refresh_token = self.refresh.generate_refresh_token(self.users.as_ref()).await?;

            user.refresh_token = Some(refresh_token.clone());
            user.refresh_token_expiry = Some(self.refresh.expiry_from(Utc::now()));
            self.users.persist(&user).await?;

            info!(user_id = %user.id, "로그인 성공");
            Ok(TokenPair::new(access_token, refresh_token))
        }
        .instrument(span)
        .await
    }

    // =========================================================================
    // 회원가입
    // =========================================================================

    /// 기본 역할로 사용자를 등록합니다.
    ///
    /// 비밀번호 강도는 먼저 계산하지만, 사용자 이름 중복 > 이메일 중복 >
    /// 강도 위반 순서로 보고합니다.
    ///
    /// # Errors
    ///
    /// - `AuthError::Conflict`: 사용자 이름 또는 이메일 중복
    /// - `AuthError::Validation`: 비밀번호 정책 위반 (위반 규칙 전체)
    pub async fn register(&self, request: RegisterRequest) -> AuthResult<User> {
        let span = portal_core::auth_span!("register", request.username);
        self.create_user(request, self.default_role_id)
            .instrument(span)
            .await
    }

    /// 관리자가 역할을 지정해 사용자를 추가합니다.
    ///
    /// 검증 순서는 [`register`](Self::register)와 같습니다.
    pub async fn add_user(&self, request: RegisterRequest, role_id: Uuid) -> AuthResult<User> {
        let span = portal_core::auth_span!("add_user", request.username);
        self.create_user(request, role_id).instrument(span).await
    }

    async fn create_user(&self, request: RegisterRequest, role_id: Uuid) -> AuthResult<User> {
        let violations = check_password_strength(&request.password);

        // 로그인 식별자는 두 컬럼을 함께 조회하므로 교차 검사
        if self.users.username_exists(&request.username).await?
            || self.users.email_exists(&request.username).await?
        {
            warn!(reason = "username_taken", "사용자 생성 거부");
            return Err(AuthError::Conflict(ConflictField::Username));
        }
        if self.users.email_exists(&request.email).await?
            || self.users.username_exists(&request.email).await?
        {
            warn!(reason = "email_taken", "사용자 생성 거부");
            return Err(AuthError::Conflict(ConflictField::Email));
        }
        if !violations.is_empty() {
            warn!(reason = "weak_password", violations = violations.len(), "사용자 생성 거부");
            return Err(AuthError::Validation(violations));
        }

        let password_hash = self.credentials.hash_password(&request.password)?;
        let user = User::new(request.username, request.email, password_hash, role_id)
            .with_names(request.first_name, request.last_name);
        self.users.persist(&user).await?;

        info!(user_id = %user.id, role_id = %role_id, "사용자 생성");
        Ok(user)
    }

    // =========================================================================
    // 토큰 갱신
    // =========================================================================

    /// 만료된 Access Token과 Refresh Token으로 새 토큰 페어를 발급합니다.
    ///
    /// 새 Refresh Token 값만 저장하며, 만료 시각은 기본적으로 유지합니다.
    /// (`extend_refresh_expiry_on_rotation` 설정 시 새로 계산)
    ///
    /// # Errors
    ///
    /// - `AuthError::InvalidToken`: Access Token 서명/알고리즘 불일치
    /// - `AuthError::InvalidRequest`: 사용자 없음, Refresh Token 불일치, 만료
    pub async fn refresh(&self, request: &TokenPair) -> AuthResult<TokenPair> {
        let span = portal_core::auth_span!("refresh");

        async {
            let principal = self.issuer.validate_expired_token(&request.access_token)?;

            let Some(mut user) = self.users.find_user_by_username(&principal.username).await? else {
                warn!(username = %principal.username, reason = "unknown_user", "토큰 갱신 거부");
                return Err(AuthError::InvalidRequest);
            };

            if user.refresh_token.as_deref() != Some(request.refresh_token.as_str()) {
                warn!(user_id = %user.id, reason = "token_mismatch", "토큰 갱신 거부");
                return Err(AuthError::InvalidRequest);
            }

            let now = Utc::now();
            if !user.refresh_token_valid_at(now) {
                warn!(user_id = %user.id, reason = "expired", "토큰 갱신 거부");
                return Err(AuthError::InvalidRequest);
            }

            let access_token = self.issue_access_token(&user).await?;
            let refresh_token = self.refresh.generate_refresh_token(self.users.as_ref()).await?;

            user.refresh_token = Some(refresh_token.clone());
            if self.extend_expiry_on_rotation {
                user.refresh_token_expiry = Some(self.refresh.expiry_from(now));
            }
            self.users.persist(&user).await?;

            info!(user_id = %user.id, "토큰 갱신");
            Ok(TokenPair::new(access_token, refresh_token))
        }
        .instrument(span)
        .await
    }

    // =========================================================================
    // 프로필 / 클레임
    // =========================================================================

    /// 프로필을 수정합니다.
    ///
    /// 비밀번호 해시와 토큰 상태는 변경하지 않습니다.
    ///
    /// # Errors
    ///
    /// - `AuthError::NotFound`: 사용자 없음
    /// - `AuthError::Conflict`: 바꾸려는 사용자 이름 또는 이메일을 다른 사용자가 사용 중
    pub async fn update_profile(&self, user_id: Uuid, update: ProfileUpdate) -> AuthResult<User> {
        if !self.users.user_exists(user_id).await? {
            return Err(AuthError::NotFound);
        }
        let mut user = self
            .users
            .find_user_by_id(user_id)
            .await?
            .ok_or(AuthError::NotFound)?;

        // 생성 시와 같은 순서: 사용자 이름 > 이메일
        if update.username != user.username
            && self.taken_by_other(&update.username, user_id).await?
        {
            warn!(user_id = %user_id, reason = "username_taken", "프로필 수정 거부");
            return Err(AuthError::Conflict(ConflictField::Username));
        }
        if update.email != user.email
            && self.taken_by_other(&update.email, user_id).await?
        {
            warn!(user_id = %user_id, reason = "email_taken", "프로필 수정 거부");
            return Err(AuthError::Conflict(ConflictField::Email));
        }

        user.apply_profile_update(update);
        self.users.persist(&user).await?;

        info!(user_id = %user.id, "프로필 수정");
        Ok(user)
    }

    /// 역할의 클레임 이름 목록 (정렬됨).
    pub async fn list_claims(&self, role_id: Uuid) -> AuthResult<Vec<String>> {
        self.claims.resolve_claims(role_id).await
    }

    /// 값이 다른 사용자의 사용자 이름 또는 이메일인지 확인.
    async fn taken_by_other(&self, value: &str, owner: Uuid) -> AuthResult<bool> {
        Ok(self
            .users
            .find_user_by_identifier(value)
            .await?
            .is_some_and(|other| other.id != owner))
    }

    async fn issue_access_token(&self, user: &User) -> AuthResult<String> {
        let role = self
            .claims
            .roles()
            .resolve_role(user.role_id)
            .await?
            .ok_or(AuthError::RoleNotFound(user.role_id))?;
        let claims = self.claims.resolve_claims(role.id).await?;

        self.issuer.issue_access_token(user, &role, &claims)
    }
}
