use crate::models::user::Claims;
use anyhow::{Context, Result};
use chrono::Utc;
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use tracing::debug;
use uuid::Uuid;

/// Issues and validates bearer tokens
///
/// Tokens are HS256 JWTs carrying only the user id and an expiry. Role is
/// never embedded; the access gate re-resolves it from the user store on
/// every request.
pub struct TokenIssuer {
    secret: String,
    ttl_hours: i64,
}

impl TokenIssuer {
    pub fn new(secret: String, ttl_hours: i64) -> Self {
        Self { secret, ttl_hours }
    }

    /// Issue a token bound to `user_id`, returning it with its lifetime in seconds
    pub fn issue(&self, user_id: Uuid) -> Result<(String, usize)> {
        let expiration = Utc::now()
            .checked_add_signed(chrono::Duration::hours(self.ttl_hours))
            .context("Invalid expiry timestamp")?
            .timestamp() as usize;

        let claims = Claims {
            sub: user_id.to_string(),
            exp: expiration,
        };

        debug!(user_id = %user_id, ttl_hours = self.ttl_hours, "Issuing token");

        let token = encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(self.secret.as_bytes()),
        )
        .context("Failed to sign token")?;

        Ok((token, (self.ttl_hours * 3600) as usize))
    }

    /// Validate a token and return the user id it is bound to
    pub fn validate(&self, token: &str) -> Result<Uuid> {
        let decoded = decode::<Claims>(
            token,
            &DecodingKey::from_secret(self.secret.as_bytes()),
            &Validation::default(),
        )
        .context("Invalid or expired token")?;

        let user_id =
            Uuid::parse_str(&decoded.claims.sub).context("Token subject is not a user id")?;

        Ok(user_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_issue_and_validate() {
        let issuer = TokenIssuer::new("test-secret-key-12345".to_string(), 24);
        let user_id = Uuid::new_v4();

        let (token, expires_in) = issuer.issue(user_id).unwrap();
        assert!(!token.is_empty());
        assert_eq!(expires_in, 24 * 3600);

        assert_eq!(issuer.validate(&token).unwrap(), user_id);
    }

    #[test]
    fn test_garbage_token_rejected() {
        let issuer = TokenIssuer::new("test-secret-key-12345".to_string(), 24);
        assert!(issuer.validate("invalid.token.here").is_err());
    }

    #[test]
    fn test_different_secrets_reject() {
        let issuer1 = TokenIssuer::new("secret1".to_string(), 24);
        let issuer2 = TokenIssuer::new("secret2".to_string(), 24);

        let (token, _) = issuer1.issue(Uuid::new_v4()).unwrap();
        assert!(issuer2.validate(&token).is_err());
    }

    #[test]
    fn test_expired_token_rejected() {
        // Negative TTL produces an already-expired token
        let issuer = TokenIssuer::new("test-secret-key-12345".to_string(), -1);
        let (token, _) = issuer.issue(Uuid::new_v4()).unwrap();
        assert!(issuer.validate(&token).is_err());
    }
}
