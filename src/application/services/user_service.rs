use crate::application::services::auth_service::hash_password;
use crate::domain::entities::{CreateUserRequest, User, UserRole};
use crate::domain::ports::user_repository::UserRepository;
use crate::infrastructure::http::middleware::error::{ApiError, ApiResult};
use crate::shared::utils::email_validator::validate_and_normalize_email;
use std::sync::Arc;

#[derive(Clone)]
pub struct UserService {
    user_repo: Arc<dyn UserRepository>,
}

impl UserService {
    pub fn new(user_repo: Arc<dyn UserRepository>) -> Self {
        Self { user_repo }
    }

    /// Admins create users; only super-admins may hand out admin roles.
    pub async fn create_user(&self, actor_id: &str, request: CreateUserRequest) -> ApiResult<User> {
        let actor = self
            .user_repo
            .get_user_by_id(actor_id)
            .await?
            .ok_or(ApiError::Unauthorized)?;
        if !actor.role.is_staff_admin() {
            return Err(ApiError::Forbidden("Only admins can create users".to_string()));
        }
        if request.role != UserRole::User && !actor.role.is_super_admin() {
            return Err(ApiError::Forbidden(
                "Only super-admins can grant admin roles".to_string(),
            ));
        }

        let user = self.register(request).await?;
        tracing::info!("User {} created by {}", user.id, actor.id);
        Ok(user)
    }

    /// Insert without an acting identity. Used by bootstrap.
    pub async fn register(&self, request: CreateUserRequest) -> ApiResult<User> {
        request.validate().map_err(ApiError::BadRequest)?;
        let email = validate_and_normalize_email(&request.email)?;

        if self.user_repo.get_user_by_email(&email).await?.is_some() {
            return Err(ApiError::Conflict("Email already exists".to_string()));
        }

        let mut user = User::new(
            email,
            request.name.trim().to_string(),
            request.role,
            request.department,
        );
        user.primary_phone = request.primary_phone;
        user.telegram_id = request.telegram_id.map(|id| id.trim().to_string());
        user.password_hash = match request.password {
            Some(ref password) => Some(hash_password(password)?),
            None => None,
        };

        self.user_repo.create_user(&user).await?;
        Ok(user)
    }

    pub async fn get_user(&self, id: &str) -> ApiResult<User> {
        self.user_repo
            .get_user_by_id(id)
            .await?
            .ok_or_else(|| ApiError::NotFound(format!("User {} not found", id)))
    }

    pub async fn get_user_by_email(&self, email: &str) -> ApiResult<Option<User>> {
        let email = validate_and_normalize_email(email)?;
        self.user_repo.get_user_by_email(&email).await
    }

    pub async fn list_users(&self, page: i64, limit: i64) -> ApiResult<(Vec<User>, i64)> {
        if page < 1 || limit < 1 {
            return Err(ApiError::BadRequest(
                "Page and limit must be positive integers".to_string(),
            ));
        }
        let limit = limit.min(100);
        self.user_repo.list_users(limit, (page - 1) * limit).await
    }
}
