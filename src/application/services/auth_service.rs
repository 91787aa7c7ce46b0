use crate::domain::entities::{LoginRequest, LoginResponse, Session, User};
use crate::domain::ports::session_repository::SessionRepository;
use crate::domain::ports::user_repository::UserRepository;
use crate::infrastructure::http::middleware::error::{ApiError, ApiResult};
use crate::shared::utils::email_validator::validate_and_normalize_email;
use crate::shared::utils::token::generate_session_token;
use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2, ParamsBuilder,
};
use std::sync::Arc;

/// Hash password using Argon2id with parameters:
/// - m_cost = 19456 KiB (19 MiB)
/// - t_cost = 2 iterations
/// - p_cost = 1 thread
pub fn hash_password(password: &str) -> ApiResult<String> {
    let salt = SaltString::generate(&mut OsRng);

    let params = ParamsBuilder::new()
        .m_cost(19456)
        .t_cost(2)
        .p_cost(1)
        .build()
        .map_err(|_| ApiError::Internal("Failed to build Argon2 params".to_string()))?;

    let argon2 = Argon2::new(argon2::Algorithm::Argon2id, argon2::Version::V0x13, params);

    let hash = argon2.hash_password(password.as_bytes(), &salt)?;
    Ok(hash.to_string())
}

pub fn verify_password(password: &str, hash: &str) -> ApiResult<bool> {
    let parsed_hash = PasswordHash::new(hash)
        .map_err(|_| ApiError::Internal("Invalid password hash format".to_string()))?;

    Ok(Argon2::default()
        .verify_password(password.as_bytes(), &parsed_hash)
        .is_ok())
}

#[derive(Clone)]
pub struct AuthService {
    user_repo: Arc<dyn UserRepository>,
    session_repo: Arc<dyn SessionRepository>,
    session_duration_hours: i64,
}

impl AuthService {
    pub fn new(
        user_repo: Arc<dyn UserRepository>,
        session_repo: Arc<dyn SessionRepository>,
        session_duration_hours: i64,
    ) -> Self {
        Self {
            user_repo,
            session_repo,
            session_duration_hours,
        }
    }

    pub async fn login(&self, request: LoginRequest) -> ApiResult<LoginResponse> {
        let email = validate_and_normalize_email(&request.email)?;

        // Same error for unknown user, passwordless user and wrong password
        let user = self
            .user_repo
            .get_user_by_email(&email)
            .await?
            .ok_or(ApiError::Unauthorized)?;
        let hash = user.password_hash.as_deref().ok_or(ApiError::Unauthorized)?;
        if !verify_password(&request.password, hash)? {
            tracing::warn!("Failed login for {}", email);
            return Err(ApiError::Unauthorized);
        }

        let session = Session::new(
            user.id.clone(),
            generate_session_token(),
            self.session_duration_hours,
        );
        self.session_repo.create_session(&session).await?;

        tracing::info!("User {} logged in", user.id);

        Ok(LoginResponse {
            token: session.token,
            expires_at: session.expires_at,
            user,
        })
    }

    pub async fn logout(&self, token: &str) -> ApiResult<()> {
        self.session_repo.delete_session(token).await
    }

    /// Resolve a bearer token to its user. Expired sessions are removed.
    pub async fn validate_session(&self, token: &str) -> ApiResult<User> {
        let session = self
            .session_repo
            .get_session_by_token(token)
            .await?
            .ok_or(ApiError::Unauthorized)?;

        if session.is_expired() {
            self.session_repo.delete_session(token).await?;
            return Err(ApiError::Unauthorized);
        }

        self.user_repo
            .get_user_by_id(&session.user_id)
            .await?
            .ok_or(ApiError::Unauthorized)
    }

    pub async fn cleanup_expired_sessions(&self) -> ApiResult<u64> {
        self.session_repo.delete_expired_sessions().await
    }
}
