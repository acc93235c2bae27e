use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use thiserror::Error;

pub const MIN_PASSWORD_LEN: usize = 8;
pub const MAX_PASSWORD_LEN: usize = 26;

#[derive(Debug, Error)]
pub enum PasswordError {
    #[error("Password hashing failed: {0}")]
    Hash(String),

    #[error("Stored password hash is unreadable: {0}")]
    CorruptHash(String),
}

/// Hash a plaintext password into an argon2 PHC string with a random salt.
pub fn hash_password(plain: &str) -> Result<String, PasswordError> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(plain.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| PasswordError::Hash(e.to_string()))
}

/// Check `plain` against a stored PHC string. The digest comparison inside
/// argon2 is constant time.
pub fn verify_password(plain: &str, phc: &str) -> Result<bool, PasswordError> {
    let parsed = PasswordHash::new(phc).map_err(|e| PasswordError::CorruptHash(e.to_string()))?;
    Ok(Argon2::default().verify_password(plain.as_bytes(), &parsed).is_ok())
}

/// Strength rules for new passwords: length bounds plus one each of
/// lowercase, uppercase, digit and symbol. Returns every violated rule.
pub fn password_strength_violations(plain: &str) -> Vec<String> {
    let mut violations = Vec::new();
    let len = plain.chars().count();

    if len < MIN_PASSWORD_LEN {
        violations.push(format!("must be at least {} characters long", MIN_PASSWORD_LEN));
    }
    if len > MAX_PASSWORD_LEN {
        violations.push(format!("must be at most {} characters long", MAX_PASSWORD_LEN));
    }
    if !plain.chars().any(|c| c.is_lowercase()) {
        violations.push("must contain a lowercase letter".to_string());
    }
    if !plain.chars().any(|c| c.is_uppercase()) {
        violations.push("must contain an uppercase letter".to_string());
    }
    if !plain.chars().any(|c| c.is_ascii_digit()) {
        violations.push("must contain a digit".to_string());
    }
    if !plain.chars().any(|c| !c.is_alphanumeric() && !c.is_whitespace()) {
        violations.push("must contain a symbol".to_string());
    }

    violations
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hash_then_verify() {
        let phc = hash_password("Sup3r$ecret").unwrap();
        assert!(phc.starts_with("$argon2"));
        assert!(verify_password("Sup3r$ecret", &phc).unwrap());
        assert!(!verify_password("sup3r$ecret", &phc).unwrap());
    }

    #[test]
    fn same_password_gets_distinct_salts() {
        let a = hash_password("Sup3r$ecret").unwrap();
        let b = hash_password("Sup3r$ecret").unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn corrupt_hash_is_an_error_not_a_mismatch() {
        assert!(matches!(
            verify_password("anything", "plaintext-in-db"),
            Err(PasswordError::CorruptHash(_))
        ));
    }

    #[test]
    fn strength_rules() {
        assert!(password_strength_violations("Sup3r$ecret").is_empty());
        assert_eq!(password_strength_violations("Ab1$").len(), 1);
        assert_eq!(password_strength_violations("password").len(), 3);
        assert!(password_strength_violations(&"Aa1$".repeat(7))
            .iter()
            .any(|v| v.contains("at most")));
    }
}
