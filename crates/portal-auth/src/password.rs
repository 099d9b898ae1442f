//! 비밀번호 해싱 및 강도 정책.
//!
//! Argon2id 기반 비밀번호 해싱/검증과 비밀번호 강도 검사.

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Algorithm, Argon2, Params, Version,
};
use portal_core::PasswordConfig;
use serde::{Deserialize, Serialize};

use crate::error::{AuthError, AuthResult};

/// 최소 비밀번호 길이 (문자 수)
pub const MIN_PASSWORD_LEN: usize = 8;

/// 특수문자로 인정되는 문자 집합.
pub const SPECIAL_CHARACTERS: &str = "!@#$%^&*()_+=[]{};':\"\\|,.<>/?";

/// 비밀번호 강도 규칙.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PasswordRule {
    /// 최소 8자 이상
    MinLength,
    /// 영문 소문자, 대문자, 숫자를 각각 1개 이상 포함
    CharacterMix,
    /// [`SPECIAL_CHARACTERS`] 중 1개 이상 포함
    SpecialCharacter,
}

impl PasswordRule {
    /// 규칙 위반 메시지.
    pub fn message(&self) -> &'static str {
        match self {
            PasswordRule::MinLength => "비밀번호는 최소 8자 이상이어야 합니다",
            PasswordRule::CharacterMix => {
                "비밀번호에 영문 대문자, 소문자, 숫자가 각각 1개 이상 포함되어야 합니다"
            }
            PasswordRule::SpecialCharacter => "비밀번호에 특수문자가 1개 이상 포함되어야 합니다",
        }
    }
}

/// 비밀번호 강도 검사.
///
/// 모든 규칙을 독립적으로 검사하여 위반된 규칙을 전부 반환합니다.
/// 빈 목록이면 정책을 만족합니다.
///
/// # 요구사항
///
/// - 최소 8자 이상 (유니코드 스칼라 값 기준)
/// - 영문 소문자, 대문자, 숫자 각 1개 이상 (ASCII)
/// - 특수문자 1개 이상
pub fn check_password_strength(password: &str) -> Vec<PasswordRule> {
    let mut violations = Vec::new();

    if password.chars().count() < MIN_PASSWORD_LEN {
        violations.push(PasswordRule::MinLength);
    }

    let has_lower = password.chars().any(|c| c.is_ascii_lowercase());
    let has_upper = password.chars().any(|c| c.is_ascii_uppercase());
    let has_digit = password.chars().any(|c| c.is_ascii_digit());
    if !(has_lower && has_upper && has_digit) {
        violations.push(PasswordRule::CharacterMix);
    }

    if !password.chars().any(|c| SPECIAL_CHARACTERS.contains(c)) {
        violations.push(PasswordRule::SpecialCharacter);
    }

    violations
}

/// 자격증명 검증기.
///
/// 해시마다 새 솔트를 생성하고 PHC 문자열에 솔트와 파라미터를 함께 저장합니다.
#[derive(Clone)]
pub struct CredentialVerifier {
    argon2: Argon2<'static>,
}

impl Default for CredentialVerifier {
    fn default() -> Self {
        Self {
            argon2: Argon2::default(),
        }
    }
}

impl CredentialVerifier {
    /// 설정된 비용 파라미터로 검증기 생성.
    pub fn new(config: &PasswordConfig) -> AuthResult<Self> {
        let params = Params::new(config.memory_kib, config.iterations, config.parallelism, None)
            .map_err(|_| AuthError::PasswordHash)?;

        Ok(Self {
            argon2: Argon2::new(Algorithm::Argon2id, Version::V0x13, params),
        })
    }

    /// 비밀번호 해싱.
    ///
    /// # Returns
    ///
    /// PHC 형식의 해시 문자열 (솔트 포함)
    ///
    /// ```rust,ignore
    /// let hash = verifier.hash_password("my_secure_password")?;
    /// // "$argon2id$v=19$m=19456,t=2,p=1$..."
    /// ```
    pub fn hash_password(&self, password: &str) -> AuthResult<String> {
        let salt = SaltString::generate(&mut OsRng);

        let hash = self
            .argon2
            .hash_password(password.as_bytes(), &salt)
            .map_err(|_| AuthError::PasswordHash)?;

        Ok(hash.to_string())
    }

    /// 비밀번호 검증.
    ///
    /// 해시에 기록된 파라미터로 검증하며, 비교는 상수 시간으로 수행됩니다.
    /// 해시 형식이 잘못된 경우에도 에러 대신 `false`를 반환합니다.
    pub fn verify_password(&self, password: &str, hash: &str) -> bool {
        match PasswordHash::new(hash) {
            Ok(parsed) => self
                .argon2
                .verify_password(password.as_bytes(), &parsed)
                .is_ok(),
            Err(_) => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn fast_verifier() -> CredentialVerifier {
        CredentialVerifier::new(&PasswordConfig {
            memory_kib: 256,
            iterations: 1,
            parallelism: 1,
        })
        .unwrap()
    }

    #[test]
    fn test_hash_and_verify_password() {
        let verifier = fast_verifier();
        let password = "Str0ng!pass";
        let hash = verifier.hash_password(password).unwrap();

        // 해시 형식 확인 (argon2id)
        assert!(hash.starts_with("$argon2id$"));

        assert!(verifier.verify_password(password, &hash));
        assert!(!verifier.verify_password("Str0ng!pasS", &hash));
    }

    #[test]
    fn test_same_password_different_hashes() {
        let verifier = fast_verifier();
        let hash1 = verifier.hash_password("Password1!").unwrap();
        let hash2 = verifier.hash_password("Password1!").unwrap();

        // 같은 비밀번호라도 솔트가 다르므로 해시가 다름
        assert_ne!(hash1, hash2);

        assert!(verifier.verify_password("Password1!", &hash1));
        assert!(verifier.verify_password("Password1!", &hash2));
    }

    #[test]
    fn test_verify_uses_embedded_params() {
        let hash = fast_verifier().hash_password("Password1!").unwrap();
        assert!(CredentialVerifier::default().verify_password("Password1!", &hash));
    }

    #[test]
    fn test_malformed_hash_is_false() {
        let verifier = fast_verifier();
        assert!(!verifier.verify_password("password", "not-a-valid-hash"));
        assert!(!verifier.verify_password("password", ""));
    }

    #[test]
    fn test_invalid_params_rejected() {
        let result = CredentialVerifier::new(&PasswordConfig {
            memory_kib: 1,
            iterations: 0,
            parallelism: 1,
        });
        assert!(matches!(result, Err(AuthError::PasswordHash)));
    }

    #[test]
    fn test_strength_accepts_strong_password() {
        assert!(check_password_strength("Str0ng!pass").is_empty());
        assert!(check_password_strength("Complex!Pass99").is_empty());
    }

    #[test]
    fn test_strength_reports_every_violation() {
        assert_eq!(
            check_password_strength("weak"),
            vec![
                PasswordRule::MinLength,
                PasswordRule::CharacterMix,
                PasswordRule::SpecialCharacter
            ]
        );
        assert_eq!(
            check_password_strength(""),
            vec![
                PasswordRule::MinLength,
                PasswordRule::CharacterMix,
                PasswordRule::SpecialCharacter
            ]
        );
        assert_eq!(
            check_password_strength("Sh0rt!"),
            vec![PasswordRule::MinLength]
        );
        assert_eq!(
            check_password_strength("alllowercase1!"),
            vec![PasswordRule::CharacterMix]
        );
        assert_eq!(
            check_password_strength("NoSpecial123"),
            vec![PasswordRule::SpecialCharacter]
        );
    }

    #[test]
    fn test_dash_is_not_special() {
        assert_eq!(
            check_password_strength("Pass-word12"),
            vec![PasswordRule::SpecialCharacter]
        );
    }

    #[test]
    fn test_length_counts_characters() {
        // 멀티바이트 문자 4개 + "Aa1!" = 8자
        assert!(!check_password_strength("한글패스Aa1!").contains(&PasswordRule::MinLength));
        assert!(check_password_strength("한글Aa1!").contains(&PasswordRule::MinLength));
    }

    proptest! {
        #[test]
        fn prop_strength_matches_rules(password in "[ -~]{0,16}") {
            let violations = check_password_strength(&password);

            let long_enough = password.chars().count() >= MIN_PASSWORD_LEN;
            let mixed = password.chars().any(|c| c.is_ascii_lowercase())
                && password.chars().any(|c| c.is_ascii_uppercase())
                && password.chars().any(|c| c.is_ascii_digit());
            let special = password.chars().any(|c| SPECIAL_CHARACTERS.contains(c));

            prop_assert_eq!(violations.is_empty(), long_enough && mixed && special);
            prop_assert_eq!(violations.contains(&PasswordRule::MinLength), !long_enough);
            prop_assert_eq!(violations.contains(&PasswordRule::CharacterMix), !mixed);
            prop_assert_eq!(violations.contains(&PasswordRule::SpecialCharacter), !special);
        }
    }
}
