//! Authentication service

use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};
use chrono::{Duration, Utc};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use redis::AsyncCommands;
use redis::aio::ConnectionManager;
use serde::{Deserialize, Serialize};
use sqlx::PgPool;

use crate::{
    config::{Config, JwtConfig},
    constants::{REFRESH_TOKEN_LENGTH, roles},
    db::repositories::UserRepository,
    error::{AppError, AppResult},
    models::User,
    utils::{generate_secure_token, hash_string, normalize_email, sanitize_string},
};

/// JWT claims structure
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String, // user_id
    pub email: String,
    pub role: String,
    pub exp: i64,
    pub iat: i64,
}

/// Tokens handed out on login and refresh
#[derive(Debug)]
pub struct IssuedTokens {
    pub access_token: String,
    pub refresh_token: String,
    pub expires_in: i64,
}

/// Authentication service
pub struct AuthService;

impl AuthService {
    /// Register a new user
    pub async fn register(pool: &PgPool, name: &str, email: &str, password: &str) -> AppResult<User> {
        let email = normalize_email(email);

        if UserRepository::find_by_email(pool, &email).await?.is_some() {
            return Err(AppError::AlreadyExists("Email already registered".to_string()));
        }

        let password_hash = Self::hash_password(password)?;

        let user = UserRepository::create(
            pool,
            &sanitize_string(name),
            &email,
            &password_hash,
            roles::USER,
            true,
        )
        .await?;

        tracing::info!(user_id = user.id, "User registered");

        Ok(user)
    }

    /// Login with email and password
    pub async fn login(
        pool: &PgPool,
        redis: ConnectionManager,
        config: &Config,
        email: &str,
        password: &str,
    ) -> AppResult<(User, IssuedTokens)> {
        let user = UserRepository::find_by_email(pool, &normalize_email(email))
            .await?
            .ok_or(AppError::InvalidCredentials)?;

        if !Self::verify_password(password, &user.password_hash)? {
            return Err(AppError::InvalidCredentials);
        }

        if !user.is_active {
            return Err(AppError::InactiveUser);
        }

        let tokens = Self::issue_tokens(redis, &user, &config.jwt).await?;

        tracing::info!(user_id = user.id, "User logged in");

        Ok((user, tokens))
    }

    /// Exchange a refresh token for a new token pair
    pub async fn refresh_token(
        pool: &PgPool,
        mut redis: ConnectionManager,
        config: &Config,
        refresh_token: &str,
    ) -> AppResult<IssuedTokens> {
        let token_hash = hash_string(refresh_token);
        let key = refresh_key(&token_hash);

        // Rotation: the presented token is consumed whether or not the rest succeeds
        let user_id: Option<i64> = redis.get_del(&key).await?;
        let user_id = user_id.ok_or(AppError::InvalidToken)?;
        redis
            .srem::<_, _, ()>(sessions_key(user_id), &token_hash)
            .await?;

        let user = UserRepository::find_by_id(pool, user_id)
            .await?
            .ok_or(AppError::InvalidToken)?;

        if !user.is_active {
            return Err(AppError::InactiveUser);
        }

        Self::issue_tokens(redis, &user, &config.jwt).await
    }

    /// Logout: drop one refresh token, or every session of the user
    pub async fn logout(
        mut redis: ConnectionManager,
        user_id: i64,
        refresh_token: Option<&str>,
        all_sessions: bool,
    ) -> AppResult<()> {
        let sessions = sessions_key(user_id);

        if all_sessions {
            let hashes: Vec<String> = redis.smembers(&sessions).await?;
            for hash in &hashes {
                redis.del::<_, ()>(refresh_key(hash)).await?;
            }
            redis.del::<_, ()>(&sessions).await?;
            tracing::info!(user_id, sessions = hashes.len(), "Logged out of all sessions");
        } else if let Some(token) = refresh_token {
            let hash = hash_string(token);
            redis.del::<_, ()>(refresh_key(&hash)).await?;
            redis.srem::<_, _, ()>(&sessions, &hash).await?;
        }

        Ok(())
    }

    /// Get user by ID
    pub async fn get_user_by_id(pool: &PgPool, user_id: i64) -> AppResult<Option<User>> {
        UserRepository::find_by_id(pool, user_id).await
    }

    /// Verify JWT token and extract claims
    pub fn verify_token(token: &str, secret: &str) -> AppResult<Claims> {
        let token_data = decode::<Claims>(
            token,
            &DecodingKey::from_secret(secret.as_bytes()),
            &Validation::default(),
        )?;

        Ok(token_data.claims)
    }

    /// Hash password using Argon2
    pub fn hash_password(password: &str) -> AppResult<String> {
        let salt = SaltString::generate(&mut OsRng);
        let argon2 = Argon2::default();

        let hash = argon2
            .hash_password(password.as_bytes(), &salt)
            .map_err(|e| AppError::Internal(anyhow::anyhow!("Password hashing failed: {}", e)))?
            .to_string();

        Ok(hash)
    }

    /// Verify password against hash
    pub fn verify_password(password: &str, hash: &str) -> AppResult<bool> {
        let parsed_hash = PasswordHash::new(hash)
            .map_err(|e| AppError::Internal(anyhow::anyhow!("Invalid password hash: {}", e)))?;

        Ok(Argon2::default()
            .verify_password(password.as_bytes(), &parsed_hash)
            .is_ok())
    }

    /// Generate access token
    pub fn generate_access_token(user: &User, jwt: &JwtConfig) -> AppResult<(String, i64)> {
        let now = Utc::now();
        let expires_at = now + Duration::minutes(jwt.expiry_minutes);
        let expires_in = jwt.expiry_minutes * 60;

        let claims = Claims {
            sub: user.id.to_string(),
            email: user.email.clone(),
            role: user.role.clone(),
            exp: expires_at.timestamp(),
            iat: now.timestamp(),
        };

        let token = encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(jwt.secret.as_bytes()),
        )
        .map_err(|e| AppError::Internal(anyhow::anyhow!("Token generation failed: {}", e)))?;

        Ok((token, expires_in))
    }

    /// Create an access token and store a fresh refresh token
    async fn issue_tokens(
        mut redis: ConnectionManager,
        user: &User,
        jwt: &JwtConfig,
    ) -> AppResult<IssuedTokens> {
        let (access_token, expires_in) = Self::generate_access_token(user, jwt)?;

        let refresh_token = generate_secure_token(REFRESH_TOKEN_LENGTH);
        let token_hash = hash_string(&refresh_token);
        let expiry = (jwt.refresh_token_expiry_days * 24 * 60 * 60).max(1) as u64;

        redis
            .set_ex::<_, _, ()>(refresh_key(&token_hash), user.id, expiry)
            .await?;
        let sessions = sessions_key(user.id);
        redis.sadd::<_, _, ()>(&sessions, &token_hash).await?;
        redis.expire::<_, ()>(&sessions, expiry as i64).await?;

        Ok(IssuedTokens {
            access_token,
            refresh_token,
            expires_in,
        })
    }
}

/// Redis key holding the owner of a refresh token
fn refresh_key(token_hash: &str) -> String {
    format!("refresh_token:{}", token_hash)
}

/// Redis set of a user's live refresh token hashes
fn sessions_key(user_id: i64) -> String {
    format!("user_sessions:{}", user_id)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user() -> User {
        let stamp = chrono::DateTime::from_timestamp(1_700_000_000, 0).unwrap();
        User {
            id: 42,
            name: "Ana Torres".to_string(),
            email: "ana@example.com".to_string(),
            password_hash: String::new(),
            role: roles::USER.to_string(),
            is_active: true,
            created_at: stamp,
            updated_at: stamp,
        }
    }

    fn jwt() -> JwtConfig {
        JwtConfig {
            secret: "test-secret".to_string(),
            expiry_minutes: 30,
            refresh_token_expiry_days: 7,
        }
    }

    #[test]
    fn test_access_token_round_trip() {
        let (token, expires_in) = AuthService::generate_access_token(&user(), &jwt()).unwrap();
        assert_eq!(expires_in, 1800);

        let claims = AuthService::verify_token(&token, "test-secret").unwrap();
        assert_eq!(claims.sub, "42");
        assert_eq!(claims.email, "ana@example.com");
        assert_eq!(claims.role, "user");
        assert_eq!(claims.exp - claims.iat, 1800);
    }

    #[test]
    fn test_token_with_wrong_secret_is_rejected() {
        let (token, _) = AuthService::generate_access_token(&user(), &jwt()).unwrap();
        assert!(matches!(
            AuthService::verify_token(&token, "other-secret"),
            Err(AppError::InvalidToken)
        ));
    }

    #[test]
    fn test_expired_token_is_reported() {
        let mut config = jwt();
        config.expiry_minutes = -10;
        let (token, _) = AuthService::generate_access_token(&user(), &config).unwrap();
        assert!(matches!(
            AuthService::verify_token(&token, "test-secret"),
            Err(AppError::TokenExpired)
        ));
    }

    #[test]
    fn test_password_hash_verifies() {
        let hash = AuthService::hash_password("Secret123").unwrap();
        assert!(AuthService::verify_password("Secret123", &hash).unwrap());
        assert!(!AuthService::verify_password("secret123", &hash).unwrap());
    }

    #[test]
    fn test_redis_keys() {
        assert_eq!(refresh_key("abc"), "refresh_token:abc");
        assert_eq!(sessions_key(7), "user_sessions:7");
    }
}
