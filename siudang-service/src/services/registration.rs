//! Pending sign-ups waiting for their emailed code.
//!
//! Each attempt lives under a server-issued token with its own expiry and
//! attempt limit. The session only carries the token.

use chrono::{DateTime, Duration, Utc};
use dashmap::DashMap;
use std::sync::Arc;
use thiserror::Error;
use uuid::Uuid;

use crate::utils::otp::{hash_otp, otp_matches};
use crate::utils::PasswordHashString;

#[derive(Debug, Clone)]
struct RegistrationAttempt {
    email: String,
    password_hash: PasswordHashString,
    otp_hash: String,
    expires_at: DateTime<Utc>,
    failed_attempts: u32,
}

/// A verified sign-up, ready to be written to the user store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingUser {
    pub email: String,
    pub password_hash: PasswordHashString,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum OtpRejection {
    #[error("Sesi pendaftaran tidak ditemukan. Silakan daftar ulang.")]
    Missing,
    #[error("Kode OTP sudah kedaluwarsa. Silakan daftar ulang.")]
    Expired,
    #[error("Terlalu banyak percobaan. Silakan daftar ulang.")]
    TooManyAttempts,
    #[error("OTP salah. Coba lagi!")]
    Mismatch,
}

impl OtpRejection {
    /// Whether the attempt is gone and the user must start over.
    pub fn is_terminal(&self) -> bool {
        !matches!(self, Self::Mismatch)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Missing => "missing",
            Self::Expired => "expired",
            Self::TooManyAttempts => "too_many_attempts",
            Self::Mismatch => "mismatch",
        }
    }
}

#[derive(Clone)]
pub struct RegistrationStore {
    attempts: Arc<DashMap<Uuid, RegistrationAttempt>>,
    ttl: Duration,
    max_attempts: u32,
}

impl RegistrationStore {
    pub fn new(expiry_seconds: i64, max_attempts: u32) -> Self {
        Self {
            attempts: Arc::new(DashMap::new()),
            ttl: Duration::seconds(expiry_seconds),
            max_attempts,
        }
    }

    /// Record a new attempt and return its token.
    pub fn begin(&self, email: &str, password_hash: PasswordHashString, code: &str) -> Uuid {
        self.begin_at(email, password_hash, code, Utc::now())
    }

    pub fn begin_at(
        &self,
        email: &str,
        password_hash: PasswordHashString,
        code: &str,
        now: DateTime<Utc>,
    ) -> Uuid {
        self.purge_expired(now);

        let token = Uuid::new_v4();
        self.attempts.insert(
            token,
            RegistrationAttempt {
                email: email.to_string(),
                password_hash,
                otp_hash: hash_otp(code),
                expires_at: now + self.ttl,
                failed_attempts: 0,
            },
        );
        token
    }

    pub fn verify(&self, token: Uuid, code: &str) -> Result<PendingUser, OtpRejection> {
        self.verify_at(token, code, Utc::now())
    }

    /// Check a submitted code. A match leaves the attempt in place until
    /// [`complete`](Self::complete), so a failed user insert can be retried.
    pub fn verify_at(
        &self,
        token: Uuid,
        code: &str,
        now: DateTime<Utc>,
    ) -> Result<PendingUser, OtpRejection> {
        let mut attempt = self.attempts.get_mut(&token).ok_or(OtpRejection::Missing)?;

        if now > attempt.expires_at {
            drop(attempt);
            self.attempts.remove(&token);
            return Err(OtpRejection::Expired);
        }

        if otp_matches(code, &attempt.otp_hash) {
            return Ok(PendingUser {
                email: attempt.email.clone(),
                password_hash: attempt.password_hash.clone(),
            });
        }

        attempt.failed_attempts += 1;
        if attempt.failed_attempts >= self.max_attempts {
            drop(attempt);
            self.attempts.remove(&token);
            return Err(OtpRejection::TooManyAttempts);
        }
        Err(OtpRejection::Mismatch)
    }

    /// Forget an attempt once the user exists or the sign-up is abandoned.
    pub fn complete(&self, token: Uuid) {
        self.attempts.remove(&token);
    }

    pub fn purge_expired(&self, now: DateTime<Utc>) {
        self.attempts.retain(|_, attempt| attempt.expires_at >= now);
    }

    pub fn pending_count(&self) -> usize {
        self.attempts.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store() -> RegistrationStore {
        RegistrationStore::new(300, 3)
    }

    fn hash() -> PasswordHashString {
        PasswordHashString::new("$argon2id$stub".to_string())
    }

    #[test]
    fn correct_code_yields_pending_user() {
        let store = store();
        let now = Utc::now();
        let token = store.begin_at("petambak@siudang.id", hash(), "123456", now);

        let pending = store.verify_at(token, "123456", now).unwrap();
        assert_eq!(pending.email, "petambak@siudang.id");
        assert_eq!(pending.password_hash, hash());

        store.complete(token);
        assert_eq!(store.verify_at(token, "123456", now), Err(OtpRejection::Missing));
    }

    #[test]
    fn wrong_code_counts_against_limit() {
        let store = store();
        let now = Utc::now();
        let token = store.begin_at("a@siudang.id", hash(), "123456", now);

        assert_eq!(store.verify_at(token, "000000", now), Err(OtpRejection::Mismatch));
        assert_eq!(store.verify_at(token, "111111", now), Err(OtpRejection::Mismatch));
        assert_eq!(
            store.verify_at(token, "222222", now),
            Err(OtpRejection::TooManyAttempts)
        );
        assert_eq!(store.verify_at(token, "123456", now), Err(OtpRejection::Missing));
    }

    #[test]
    fn expired_attempt_is_rejected_and_removed() {
        let store = store();
        let now = Utc::now();
        let token = store.begin_at("a@siudang.id", hash(), "123456", now);

        let later = now + Duration::seconds(301);
        assert_eq!(store.verify_at(token, "123456", later), Err(OtpRejection::Expired));
        assert_eq!(store.pending_count(), 0);
    }

    #[test]
    fn new_attempts_purge_stale_ones() {
        let store = store();
        let now = Utc::now();
        store.begin_at("old@siudang.id", hash(), "123456", now);
        store.begin_at("new@siudang.id", hash(), "654321", now + Duration::seconds(600));
        assert_eq!(store.pending_count(), 1);
    }

    #[test]
    fn only_mismatch_keeps_the_attempt() {
        assert!(!OtpRejection::Mismatch.is_terminal());
        assert!(OtpRejection::Expired.is_terminal());
        assert!(OtpRejection::TooManyAttempts.is_terminal());
    }
}
