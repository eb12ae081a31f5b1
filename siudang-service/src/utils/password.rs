use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use secrecy::{ExposeSecret, Secret};
use service_core::error::AppError;

/// Plaintext password as submitted in a form; never printed.
#[derive(Debug)]
pub struct Password(Secret<String>);

impl Password {
    pub fn new(password: String) -> Self {
        Self(Secret::new(password))
    }

    fn expose(&self) -> &str {
        self.0.expose_secret()
    }
}

/// Argon2id PHC string as stored in `users.password`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PasswordHashString(String);

impl PasswordHashString {
    pub fn new(hash: String) -> Self {
        Self(hash)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

/// Hash with Argon2id and a fresh random salt.
pub fn hash_password(password: &Password) -> Result<PasswordHashString, AppError> {
    let salt = SaltString::generate(&mut OsRng);

    let hash = Argon2::default()
        .hash_password(password.expose().as_bytes(), &salt)
        .map_err(|e| AppError::InternalError(anyhow::anyhow!("Failed to hash password: {}", e)))?
        .to_string();

    Ok(PasswordHashString::new(hash))
}

/// Check a password against a stored hash.
///
/// Stored values that are not PHC strings (rows written before passwords
/// moved to argon2) never verify.
pub fn verify_password(password: &Password, stored: &str) -> bool {
    let parsed = match PasswordHash::new(stored) {
        Ok(parsed) => parsed,
        Err(e) => {
            tracing::warn!(error = %e, "Stored password hash is not a PHC string");
            return false;
        }
    };

    Argon2::default()
        .verify_password(password.expose().as_bytes(), &parsed)
        .is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hash_is_argon2_phc() {
        let hash = hash_password(&Password::new("udangvaname".to_string())).unwrap();
        assert!(hash.as_str().starts_with("$argon2id$"));
    }

    #[test]
    fn verifies_correct_password_only() {
        let password = Password::new("udangvaname".to_string());
        let hash = hash_password(&password).unwrap();

        assert!(verify_password(&password, hash.as_str()));
        assert!(!verify_password(&Password::new("udangwindu".to_string()), hash.as_str()));
    }

    #[test]
    fn salts_differ_between_hashes() {
        let password = Password::new("udangvaname".to_string());
        let first = hash_password(&password).unwrap();
        let second = hash_password(&password).unwrap();
        assert_ne!(first, second);
    }

    #[test]
    fn legacy_hash_formats_never_verify() {
        let password = Password::new("udangvaname".to_string());
        assert!(!verify_password(&password, "pbkdf2:sha256:600000$abc$def"));
        assert!(!verify_password(&password, ""));
    }

    #[test]
    fn debug_output_hides_plaintext() {
        let password = Password::new("udangvaname".to_string());
        assert!(!format!("{:?}", password).contains("udangvaname"));
    }
}
