//! Authentication handlers.

use actix_web::{HttpResponse, web};
use std::sync::Arc;

use quill_core::domain::{User, mask_email, validation};
use quill_core::error::{DomainError, RepoError};
use quill_core::ports::{PasswordService, TokenService};
use quill_shared::dto::{AuthResponse, LoginRequest, RegisterUserRequest};

use super::views;
use crate::middleware::error::{AppError, AppResult};
use crate::state::AppState;

const USER_EXISTS: &str = "User already exists";

/// Argon2 runs on the blocking pool, off the actix worker.
async fn hash_password(service: &Arc<dyn PasswordService>, password: String) -> AppResult<String> {
    let service = Arc::clone(service);
    let hash = web::block(move || service.hash(&password))
        .await
        .map_err(|e| AppError::Internal(e.to_string()))??;

    Ok(hash)
}

async fn verify_password(
    service: &Arc<dyn PasswordService>,
    password: String,
    hash: String,
) -> AppResult<bool> {
    let service = Arc::clone(service);
    let matches = web::block(move || service.verify(&password, &hash))
        .await
        .map_err(|e| AppError::Internal(e.to_string()))??;

    Ok(matches)
}

/// POST /api/auth/signup
pub async fn register(
    state: web::Data<AppState>,
    token_service: web::Data<Arc<dyn TokenService>>,
    password_service: web::Data<Arc<dyn PasswordService>>,
    body: web::Json<RegisterUserRequest>,
) -> AppResult<HttpResponse> {
    let req = body.into_inner();
    let email = req.email.trim().to_string();

    validation::validate_credentials(&email, &req.password)?;

    if state.users.find_by_email(&email).await?.is_some() {
        tracing::debug!(user_email = %mask_email(&email), "Signup for existing email");
        return Err(DomainError::Duplicate(USER_EXISTS.to_string()).into());
    }

    let password_hash = hash_password(&password_service, req.password).await?;

    // A concurrent signup can still trip the unique index.
    let user = state
        .users
        .insert(User::new(email, password_hash))
        .await
        .map_err(|e| match e {
            RepoError::Constraint(_) => DomainError::Duplicate(USER_EXISTS.to_string()).into(),
            other => AppError::from(other),
        })?;

    let token = token_service.generate_token(user.id, &user.email)?;
    tracing::info!(user_id = %user.id, "User registered");

    Ok(HttpResponse::Created().json(AuthResponse {
        token,
        user: views::user(&user.summary()),
    }))
}

/// POST /api/auth/login
pub async fn login(
    state: web::Data<AppState>,
    token_service: web::Data<Arc<dyn TokenService>>,
    password_service: web::Data<Arc<dyn PasswordService>>,
    body: web::Json<LoginRequest>,
) -> AppResult<HttpResponse> {
    let req = body.into_inner();
    let email = req.email.trim();

    // Unknown email and wrong password produce the same response.
    let Some(user) = state.users.find_by_email(email).await? else {
        tracing::debug!(user_email = %mask_email(email), "Login for unknown email");
        return Err(AppError::invalid_credentials());
    };

    if !verify_password(&password_service, req.password, user.password_hash.clone()).await? {
        tracing::debug!(user_id = %user.id, "Login with wrong password");
        return Err(AppError::invalid_credentials());
    }

    let token = token_service.generate_token(user.id, &user.email)?;
    tracing::info!(user_id = %user.id, "User logged in");

    Ok(HttpResponse::Ok().json(AuthResponse {
        token,
        user: views::user(&user.summary()),
    }))
}
