//! JWT token service

use chrono::{Duration, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};

use crate::db::models::User;
use crate::utils::{AppError, AppResult};

const ISSUER: &str = "tienda-server";
const AUDIENCE: &str = "tienda-api";

/// Token claims
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// User id (stringified, per RFC 7519 `sub`)
    pub sub: String,
    pub username: String,
    pub is_admin: bool,
    /// "access" or "refresh"
    pub token_type: String,
    pub exp: i64,
    pub iat: i64,
    pub iss: String,
    pub aud: String,
}

impl Claims {
    pub fn user_id(&self) -> AppResult<i64> {
        self.sub
            .parse()
            .map_err(|_| AppError::invalid_token("Malformed subject claim"))
    }
}

/// Issues and validates HS256 tokens.
pub struct JwtService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    access_ttl: Duration,
    refresh_ttl: Duration,
}

impl JwtService {
    pub fn new(secret: &[u8], access_ttl_minutes: i64) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_issuer(&[ISSUER]);
        validation.set_audience(&[AUDIENCE]);

        Self {
            encoding_key: EncodingKey::from_secret(secret),
            decoding_key: DecodingKey::from_secret(secret),
            validation,
            access_ttl: Duration::minutes(access_ttl_minutes),
            refresh_ttl: Duration::days(7),
        }
    }

    pub fn generate_access_token(&self, user: &User) -> AppResult<String> {
        self.generate(user, "access", self.access_ttl)
    }

    pub fn generate_refresh_token(&self, user: &User) -> AppResult<String> {
        self.generate(user, "refresh", self.refresh_ttl)
    }

    fn generate(&self, user: &User, token_type: &str, ttl: Duration) -> AppResult<String> {
        let now = Utc::now();
        let claims = Claims {
            sub: user.id.to_string(),
            username: user.username.clone(),
            is_admin: user.is_admin,
            token_type: token_type.to_string(),
            exp: (now + ttl).timestamp(),
            iat: now.timestamp(),
            iss: ISSUER.to_string(),
            aud: AUDIENCE.to_string(),
        };

        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|e| AppError::internal(format!("Failed to sign token: {e}")))
    }

    /// Validate signature, expiry, issuer and audience, and check the
    /// token is of the expected type.
    pub fn verify_token(&self, token: &str, expected_type: &str) -> AppResult<Claims> {
        let data = decode::<Claims>(token, &self.decoding_key, &self.validation).map_err(|e| {
            match e.kind() {
                jsonwebtoken::errors::ErrorKind::ExpiredSignature => AppError::token_expired(),
                _ => AppError::invalid_token(e.to_string()),
            }
        })?;

        if data.claims.token_type != expected_type {
            return Err(AppError::invalid_token(format!(
                "Expected {expected_type} token"
            )));
        }

        Ok(data.claims)
    }
}

/// Generate a random signing secret when none is configured.
/// Tokens then only stay valid for the lifetime of the process.
pub fn generate_secret() -> AppResult<Vec<u8>> {
    use ring::rand::{SecureRandom, SystemRandom};

    let rng = SystemRandom::new();
    let mut secret = vec![0u8; 64];
    rng.fill(&mut secret)
        .map_err(|_| AppError::internal("Failed to generate signing secret"))?;
    Ok(secret)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDateTime;

    fn test_user(is_admin: bool) -> User {
        User {
            id: 42,
            username: "ana".to_string(),
            email: "ana@example.com".to_string(),
            password_hash: String::new(),
            is_admin,
            created_at: NaiveDateTime::default(),
        }
    }

    #[test]
    fn test_round_trip_access_token() {
        let service = JwtService::new(b"test-secret", 30);
        let token = service.generate_access_token(&test_user(true)).unwrap();
        let claims = service.verify_token(&token, "access").unwrap();
        assert_eq!(claims.user_id().unwrap(), 42);
        assert_eq!(claims.username, "ana");
        assert!(claims.is_admin);
    }

    #[test]
    fn test_token_type_is_enforced() {
        let service = JwtService::new(b"test-secret", 30);
        let refresh = service.generate_refresh_token(&test_user(false)).unwrap();
        assert!(service.verify_token(&refresh, "access").is_err());
        assert!(service.verify_token(&refresh, "refresh").is_ok());
    }

    #[test]
    fn test_wrong_secret_rejected() {
        let service = JwtService::new(b"secret-a", 30);
        let other = JwtService::new(b"secret-b", 30);
        let token = service.generate_access_token(&test_user(false)).unwrap();
        assert!(other.verify_token(&token, "access").is_err());
    }
}
