use std::sync::Arc;

use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::{config::Config, models::User};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub email: String,
    pub iat: i64,
    pub exp: i64,
}

struct Keys {
    header: Header,
    encoding: EncodingKey,
    decoding: DecodingKey,
    validation: Validation,
}

/// Signs and verifies session tokens with a shared HMAC secret.
#[derive(Clone)]
pub struct TokenKeys(Arc<Keys>);

impl TokenKeys {
    pub fn new(secret: &[u8], algorithm: Algorithm) -> Self {
        let mut validation = Validation::new(algorithm);
        validation.leeway = 0;
        validation.set_required_spec_claims(&["exp"]);

        TokenKeys(Arc::new(Keys {
            header: Header::new(algorithm),
            encoding: EncodingKey::from_secret(secret),
            decoding: DecodingKey::from_secret(secret),
            validation,
        }))
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(config.jwt_secret.as_bytes(), config.jwt_algorithm)
    }

    pub fn issue(&self, user: &User, ttl: time::Duration) -> anyhow::Result<String> {
        let now = OffsetDateTime::now_utc();
        let claims = Claims {
            email: user.email.clone(),
            iat: now.unix_timestamp(),
            exp: (now + ttl).unix_timestamp(),
        };
        Ok(encode(&self.0.header, &claims, &self.0.encoding)?)
    }

    /// Fails on a bad signature, a malformed token or a passed expiry.
    pub fn verify(&self, token: &str) -> Result<Claims, jsonwebtoken::errors::Error> {
        decode::<Claims>(token, &self.0.decoding, &self.0.validation).map(|data| data.claims)
    }
}

#[cfg(test)]
mod tests {
    use uuid::Uuid;

    use super::*;
    use crate::models::{Gender, PrivacySettings};

    fn user(email: &str) -> User {
        User {
            id: Uuid::now_v7(),
            email: email.to_string(),
            hashed_password: String::new(),
            name: "A".to_string(),
            gender: Gender::M,
            bio: String::new(),
            joined_at: OffsetDateTime::now_utc(),
            num_of_visitors: 0,
            privacy: PrivacySettings::default(),
        }
    }

    #[test]
    fn issued_token_verifies() {
        let keys = TokenKeys::new(b"secret", Algorithm::HS256);
        let token = keys.issue(&user("a@x.com"), time::Duration::minutes(60)).unwrap();
        let claims = keys.verify(&token).unwrap();
        assert_eq!(claims.email, "a@x.com");
        assert_eq!(claims.exp - claims.iat, 3600);
    }

    #[test]
    fn expired_token_is_rejected() {
        let keys = TokenKeys::new(b"secret", Algorithm::HS256);
        let token = keys.issue(&user("a@x.com"), time::Duration::seconds(-5)).unwrap();
        assert!(keys.verify(&token).is_err());
    }

    #[test]
    fn other_secret_is_rejected() {
        let keys = TokenKeys::new(b"secret", Algorithm::HS256);
        let token = keys.issue(&user("a@x.com"), time::Duration::minutes(5)).unwrap();
        assert!(TokenKeys::new(b"other", Algorithm::HS256).verify(&token).is_err());
        assert!(keys.verify("not.a.token").is_err());
    }
}
