use argon2::password_hash::{rand_core::OsRng, PasswordHash, SaltString};
use argon2::{Argon2, PasswordHasher, PasswordVerifier};
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use uuid::Uuid;

use crate::config;
use crate::db::models::Role;

#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub gym_id: Uuid,
    pub user_id: Uuid,
    pub name: String,
    pub role: Role,
    pub exp: i64,
    pub iat: i64,
}

impl Claims {
    pub fn new(gym_id: Uuid, user_id: Uuid, name: String, role: Role) -> Self {
        let now = Utc::now();
        let expiry_hours = config::config().security.jwt_expiry_hours;
        let exp = (now + Duration::hours(expiry_hours as i64)).timestamp();

        Self {
            gym_id,
            user_id,
            name,
            role,
            exp,
            iat: now.timestamp(),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum JwtError {
    #[error("JWT generation error: {0}")]
    TokenGeneration(String),
    #[error("Invalid JWT token: {0}")]
    InvalidToken(String),
    #[error("JWT secret not configured")]
    InvalidSecret,
}

pub fn generate_jwt(claims: &Claims) -> Result<String, JwtError> {
    let secret = &config::config().security.jwt_secret;
    if secret.is_empty() {
        return Err(JwtError::InvalidSecret);
    }

    encode(
        &Header::default(),
        claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .map_err(|e| JwtError::TokenGeneration(e.to_string()))
}

pub fn verify_jwt(token: &str) -> Result<Claims, JwtError> {
    let secret = &config::config().security.jwt_secret;
    if secret.is_empty() {
        return Err(JwtError::InvalidSecret);
    }

    let token_data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::default(),
    )
    .map_err(|e| JwtError::InvalidToken(e.to_string()))?;

    Ok(token_data.claims)
}

#[derive(Debug, thiserror::Error)]
pub enum PasswordError {
    #[error("Failed to hash password: {0}")]
    Hash(String),
    #[error("invalid credentials")]
    InvalidCredentials,
}

/// Hash a plaintext password with Argon2id using a random salt.
pub fn hash_password(password: &str) -> Result<String, PasswordError> {
    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();

    let password_hash = argon2
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| PasswordError::Hash(e.to_string()))?;

    Ok(password_hash.to_string())
}

/// Verify a plaintext password against a stored Argon2 hash string.
pub fn verify_password(password: &str, hash: &str) -> Result<(), PasswordError> {
    let parsed_hash =
        PasswordHash::new(hash).map_err(|e| PasswordError::Hash(e.to_string()))?;

    Argon2::default()
        .verify_password(password.as_bytes(), &parsed_hash)
        .map_err(|_| PasswordError::InvalidCredentials)?;

    Ok(())
}

/// Hex SHA-256 digest for short-lived OTP values. Not used for passwords;
/// those go through Argon2.
pub fn digest(input: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(input.as_bytes());
    format!("{:x}", hasher.finalize())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn jwt_round_trip() {
        // Development config carries a non-empty fallback secret
        let gym_id = Uuid::new_v4();
        let claims = Claims::new(gym_id, gym_id, "Owner".to_string(), Role::Admin);
        let token = generate_jwt(&claims).unwrap();

        let decoded = verify_jwt(&token).unwrap();
        assert_eq!(decoded.gym_id, gym_id);
        assert_eq!(decoded.role, Role::Admin);
    }

    #[test]
    fn tampered_token_is_rejected() {
        let gym_id = Uuid::new_v4();
        let claims = Claims::new(gym_id, gym_id, "Owner".to_string(), Role::Admin);
        let mut token = generate_jwt(&claims).unwrap();
        token.push('x');
        assert!(verify_jwt(&token).is_err());
    }

    #[test]
    fn password_hash_round_trip() {
        let hash = hash_password("correct horse battery").unwrap();
        assert!(verify_password("correct horse battery", &hash).is_ok());
        assert!(matches!(
            verify_password("wrong password", &hash),
            Err(PasswordError::InvalidCredentials)
        ));
    }

    #[test]
    fn password_hashes_are_salted() {
        let a = hash_password("same input").unwrap();
        let b = hash_password("same input").unwrap();
        // Random salt: equal inputs never produce equal hashes
        assert_ne!(a, b);
        assert!(verify_password("same input", &a).is_ok());
        assert!(verify_password("same input", &b).is_ok());
    }

    #[test]
    fn garbage_hash_is_rejected_not_panicked() {
        assert!(matches!(
            verify_password("anything", "not-a-phc-string"),
            Err(PasswordError::Hash(_))
        ));
    }

    #[test]
    fn digest_is_stable_and_hex() {
        let a = digest("secret");
        let b = digest("secret");
        assert_eq!(a, b);
        assert_eq!(a.len(), 64);
        assert_ne!(a, digest("other"));
    }
}
