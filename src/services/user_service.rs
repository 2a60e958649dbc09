//! User service

use sqlx::PgPool;

use crate::{
    db::repositories::UserRepository,
    error::{AppError, AppResult},
    models::{User, UserCounts},
    services::AuthService,
    utils::{normalize_email, sanitize_string, validation::validate_role},
};

/// Profile changes a user may make to their own account
#[derive(Debug, Default)]
pub struct ProfileUpdate<'a> {
    pub name: Option<&'a str>,
    pub email: Option<&'a str>,
    pub current_password: Option<&'a str>,
    pub new_password: Option<&'a str>,
    pub role: Option<&'a str>,
    pub is_active: Option<bool>,
}

/// Fields an admin sets when creating an account
#[derive(Debug)]
pub struct NewUser<'a> {
    pub name: &'a str,
    pub email: &'a str,
    pub password: &'a str,
    pub role: &'a str,
    pub is_active: bool,
}

/// User service for business logic
pub struct UserService;

impl UserService {
    /// Get user by ID
    pub async fn get_user_by_id(pool: &PgPool, id: i64) -> AppResult<User> {
        UserRepository::find_by_id(pool, id)
            .await?
            .ok_or_else(|| AppError::NotFound("User not found".to_string()))
    }

    /// Get a user as seen by the requester: self or admin only
    pub async fn get_visible_user(
        pool: &PgPool,
        requester_id: i64,
        requester_is_admin: bool,
        id: i64,
    ) -> AppResult<User> {
        if requester_id != id && !requester_is_admin {
            return Err(AppError::Forbidden(
                "Cannot view other users' profiles".to_string(),
            ));
        }
        Self::get_user_by_id(pool, id).await
    }

    /// List users with pagination
    pub async fn list_users(
        pool: &PgPool,
        page: u32,
        per_page: u32,
        search: Option<&str>,
        role: Option<&str>,
        is_active: Option<bool>,
    ) -> AppResult<(Vec<User>, i64)> {
        let offset = (page.saturating_sub(1) as i64) * per_page as i64;
        let limit = per_page as i64;

        if let Some(role) = role {
            validate_role(role).map_err(|e| AppError::Validation(e.to_string()))?;
        }

        UserRepository::list(pool, offset, limit, search, role, is_active).await
    }

    /// Update the requester's own profile.
    ///
    /// Role and active flag are admin-only; a password change needs the current password.
    pub async fn update_own_profile(
        pool: &PgPool,
        requester: &User,
        update: ProfileUpdate<'_>,
    ) -> AppResult<User> {
        if !requester.is_admin() && (update.role.is_some() || update.is_active.is_some()) {
            return Err(AppError::Forbidden(
                "Only administrators can change role or active status".to_string(),
            ));
        }

        let password_hash = match update.new_password {
            Some(new_password) => {
                let current = update.current_password.ok_or_else(|| {
                    AppError::Validation("Current password required".to_string())
                })?;
                if !AuthService::verify_password(current, &requester.password_hash)? {
                    return Err(AppError::InvalidCredentials);
                }
                Some(AuthService::hash_password(new_password)?)
            }
            None => None,
        };

        let user = Self::apply_profile(
            pool,
            requester.id,
            update.name,
            update.email,
            password_hash.as_deref(),
        )
        .await?;

        if update.role.is_some() || update.is_active.is_some() {
            return Self::set_access(pool, requester.id, user.id, update.role, update.is_active)
                .await;
        }

        Ok(user)
    }

    /// Create a user with any role (admin)
    pub async fn create_user(pool: &PgPool, new_user: NewUser<'_>) -> AppResult<User> {
        validate_role(new_user.role).map_err(|e| AppError::Validation(e.to_string()))?;

        let email = normalize_email(new_user.email);
        if UserRepository::find_by_email(pool, &email).await?.is_some() {
            return Err(AppError::AlreadyExists("Email already registered".to_string()));
        }

        let password_hash = AuthService::hash_password(new_user.password)?;
        let user = UserRepository::create(
            pool,
            &sanitize_string(new_user.name),
            &email,
            &password_hash,
            new_user.role,
            new_user.is_active,
        )
        .await?;

        tracing::info!(user_id = user.id, role = %user.role, "User created by admin");

        Ok(user)
    }

    /// Update any user (admin)
    pub async fn update_user(
        pool: &PgPool,
        admin_id: i64,
        id: i64,
        update: ProfileUpdate<'_>,
    ) -> AppResult<User> {
        Self::get_user_by_id(pool, id).await?;

        let password_hash = update
            .new_password
            .map(AuthService::hash_password)
            .transpose()?;

        let user =
            Self::apply_profile(pool, id, update.name, update.email, password_hash.as_deref())
                .await?;

        if update.role.is_some() || update.is_active.is_some() {
            return Self::set_access(pool, admin_id, id, update.role, update.is_active).await;
        }

        Ok(user)
    }

    /// Activate or deactivate an account (admin)
    pub async fn set_active(pool: &PgPool, admin_id: i64, id: i64, active: bool) -> AppResult<User> {
        Self::get_user_by_id(pool, id).await?;
        Self::set_access(pool, admin_id, id, None, Some(active)).await
    }

    /// Delete an account (admin); reservations and penalties cascade
    pub async fn delete_user(pool: &PgPool, admin_id: i64, id: i64) -> AppResult<()> {
        if admin_id == id {
            return Err(AppError::InvalidInput(
                "You cannot delete your own account".to_string(),
            ));
        }

        if !UserRepository::delete(pool, id).await? {
            return Err(AppError::NotFound("User not found".to_string()));
        }

        tracing::info!(user_id = id, admin_id, "User deleted");

        Ok(())
    }

    /// Account counts (admin)
    pub async fn counts(pool: &PgPool) -> AppResult<UserCounts> {
        UserRepository::counts(pool).await
    }

    async fn apply_profile(
        pool: &PgPool,
        id: i64,
        name: Option<&str>,
        email: Option<&str>,
        password_hash: Option<&str>,
    ) -> AppResult<User> {
        let email = email.map(normalize_email);
        if let Some(email) = email.as_deref() {
            if let Some(existing) = UserRepository::find_by_email(pool, email).await? {
                if existing.id != id {
                    return Err(AppError::AlreadyExists("Email already registered".to_string()));
                }
            }
        }

        let name = name.map(sanitize_string);
        UserRepository::update(pool, id, name.as_deref(), email.as_deref(), password_hash).await
    }

    async fn set_access(
        pool: &PgPool,
        admin_id: i64,
        id: i64,
        role: Option<&str>,
        is_active: Option<bool>,
    ) -> AppResult<User> {
        if let Some(role) = role {
            validate_role(role).map_err(|e| AppError::Validation(e.to_string()))?;
        }
        if admin_id == id && is_active == Some(false) {
            return Err(AppError::InvalidInput(
                "You cannot deactivate your own account".to_string(),
            ));
        }

        let user = UserRepository::update_access(pool, id, role, is_active).await?;

        tracing::info!(
            user_id = id,
            admin_id,
            role = %user.role,
            is_active = user.is_active,
            "User access updated"
        );

        Ok(user)
    }
}
