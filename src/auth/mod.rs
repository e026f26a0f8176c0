use std::sync::Arc;

use argon2::{Argon2, PasswordHash, PasswordHasher, PasswordVerifier};
use argon2::password_hash::{SaltString, rand_core::OsRng};
use chrono::{Duration, Utc};
use cookie::{Cookie, SameSite};
use sqlx::SqlitePool;

use crate::{
    domain::Admin,
    error::{AppError, Result},
    repository::AdminRepository,
};

pub mod csrf;
pub mod session;

use session::{Session, SessionStore};
pub use csrf::CsrfService;

pub const SESSION_COOKIE: &str = "session";

pub struct AuthService {
    session_store: SessionStore,
    admin_repo: Arc<dyn AdminRepository>,
    session_duration_hours: i64,
    secure_cookies: bool,
}

impl AuthService {
    pub fn new(
        pool: SqlitePool,
        admin_repo: Arc<dyn AdminRepository>,
        session_duration_hours: i64,
        secure_cookies: bool,
    ) -> Self {
        Self {
            session_store: SessionStore::new(pool),
            admin_repo,
            session_duration_hours,
            secure_cookies,
        }
    }

    pub async fn verify_password(password: &str, hash: &str) -> Result<bool> {
        let parsed_hash = PasswordHash::new(hash)
            .map_err(|e| AppError::Internal(format!("Invalid password hash: {}", e)))?;

        let argon2 = Argon2::default();

        Ok(argon2.verify_password(password.as_bytes(), &parsed_hash).is_ok())
    }

    pub async fn hash_password(password: &str) -> Result<String> {
        let salt = SaltString::generate(&mut OsRng);
        let argon2 = Argon2::default();

        let password_hash = argon2
            .hash_password(password.as_bytes(), &salt)
            .map_err(|e| AppError::Internal(format!("Password hashing failed: {}", e)))?;

        Ok(password_hash.to_string())
    }

    /// Checks credentials and opens a session. `Ok(None)` means the username
    /// or the password was wrong; callers must not tell the two apart.
    pub async fn login(&self, username: &str, password: &str) -> Result<Option<(Admin, Session, String)>> {
        let Some(admin) = self.admin_repo.find_by_username(username).await? else {
            return Ok(None);
        };

        if !Self::verify_password(password, &admin.password_hash).await? {
            return Ok(None);
        }

        let (session, token) = self.create_session(admin.id).await?;
        Ok(Some((admin, session, token)))
    }

    pub async fn create_session(&self, admin_id: i64) -> Result<(Session, String)> {
        let token = generate_token();
        let expires_at = Utc::now() + Duration::hours(self.session_duration_hours);

        let session = self.session_store
            .create(admin_id, &token, expires_at)
            .await?;

        Ok((session, token))
    }

    pub async fn validate_session(&self, token: &str) -> Result<Option<Session>> {
        self.session_store.find_by_token(token).await
    }

    pub async fn invalidate_session(&self, token: &str) -> Result<()> {
        self.session_store.delete_by_token(token).await
    }

    pub async fn cleanup_expired_sessions(&self) -> Result<u64> {
        self.session_store.cleanup_expired().await
    }

    /// Creates the account if `username` is unknown. Returns true when an
    /// admin was inserted.
    pub async fn ensure_admin(&self, username: &str, password: &str) -> Result<bool> {
        if self.admin_repo.find_by_username(username).await?.is_some() {
            return Ok(false);
        }

        let hash = Self::hash_password(password).await?;
        let admin = self.admin_repo.create(username, &hash).await?;
        tracing::info!("Created admin account '{}' (id {})", admin.username, admin.id);
        Ok(true)
    }

    /// Sets a new password and drops every open session of that admin.
    pub async fn reset_password(&self, username: &str, password: &str) -> Result<()> {
        let admin = self.admin_repo
            .find_by_username(username)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Admin '{}' not found", username)))?;

        let hash = Self::hash_password(password).await?;
        self.admin_repo.update_password(admin.id, &hash).await?;

        let dropped = self.session_store.delete_by_admin(admin.id).await?;
        tracing::info!("Password reset for '{}', {} session(s) closed", username, dropped);
        Ok(())
    }

    pub fn create_session_cookie(&self, token: &str) -> Cookie<'static> {
        Cookie::build((SESSION_COOKIE, token.to_string()))
            .path("/")
            .same_site(SameSite::Lax)
            .http_only(true)
            .secure(self.secure_cookies)
            .max_age(cookie::time::Duration::hours(self.session_duration_hours))
            .build()
    }

    pub fn create_logout_cookie() -> Cookie<'static> {
        Cookie::build((SESSION_COOKIE, ""))
            .path("/")
            .same_site(SameSite::Lax)
            .http_only(true)
            .max_age(cookie::time::Duration::seconds(0))
            .build()
    }
}

fn generate_token() -> String {
    use rand::RngCore;
    let mut bytes = [0u8; 32];
    rand::thread_rng().fill_bytes(&mut bytes);
    hex::encode(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn password_hash_round_trip() {
        let hash = AuthService::hash_password("cas2025").await.unwrap();
        assert_ne!(hash, "cas2025");
        assert!(AuthService::verify_password("cas2025", &hash).await.unwrap());
        assert!(!AuthService::verify_password("CAS2025", &hash).await.unwrap());
    }

    #[tokio::test]
    async fn malformed_hash_is_an_error() {
        assert!(AuthService::verify_password("x", "not-a-phc-string").await.is_err());
    }

    #[test]
    fn session_tokens_are_random_hex() {
        let a = generate_token();
        let b = generate_token();
        assert_eq!(a.len(), 64);
        assert_ne!(a, b);
    }
}
