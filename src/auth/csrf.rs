use hmac::{Hmac, Mac};
use sha2::Sha256;
use subtle::ConstantTimeEq;

use crate::error::{AppError, Result};

type HmacSha256 = Hmac<Sha256>;

/// Stateless CSRF tokens: HMAC-SHA256 of the session id under the app secret.
/// Nothing is stored; a token is valid for exactly one session.
pub struct CsrfService {
    mac: HmacSha256,
}

impl CsrfService {
    pub fn new(secret: &str) -> Result<Self> {
        let mac = HmacSha256::new_from_slice(secret.as_bytes())
            .map_err(|e| AppError::Internal(format!("Invalid CSRF secret: {}", e)))?;
        Ok(Self { mac })
    }

    pub fn generate_token(&self, session_id: &str) -> String {
        let mut mac = self.mac.clone();
        mac.update(session_id.as_bytes());
        hex::encode(mac.finalize().into_bytes())
    }

    pub fn validate_token(&self, session_id: &str, token: &str) -> bool {
        let expected = self.generate_token(session_id);
        expected.as_bytes().ct_eq(token.as_bytes()).into()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_token_generation() {
        let csrf = CsrfService::new("secret").unwrap();
        let token = csrf.generate_token("session-a");
        assert_eq!(token.len(), 64);
        assert_eq!(token, csrf.generate_token("session-a"));
    }

    #[test]
    fn test_token_is_bound_to_session_and_secret() {
        let csrf = CsrfService::new("secret").unwrap();
        let token = csrf.generate_token("session-a");

        assert!(csrf.validate_token("session-a", &token));
        assert!(!csrf.validate_token("session-b", &token));
        assert!(!CsrfService::new("other").unwrap().validate_token("session-a", &token));
        assert!(!csrf.validate_token("session-a", ""));
    }
}
