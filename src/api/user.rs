use actix_web::{HttpResponse, Responder, web};
use serde::{Deserialize, Serialize};
use sqlx::MySqlPool;
use utoipa::{IntoParams, ToSchema};

use crate::{
    auth::{auth::AuthUser, password::hash_password},
    error::ApiError,
    guards::user::{ResetPassword, UserInput, check_new_user, check_password_reset, check_user_update},
    model::user::User,
    store::{self, attendance::ResetCounts},
    utils::email_filter,
};

#[derive(Deserialize, IntoParams, ToSchema)]
pub struct UserFilter {
    /// Only users holding this position
    #[schema(example = "Backend Engineer")]
    pub position: Option<String>,
}

#[derive(Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateUserResponse {
    pub user: User,
    /// Present when the start date moved and older history was dropped
    pub deleted_attendance: Option<u64>,
    pub deleted_leaves: Option<u64>,
}

async fn load_user(pool: &MySqlPool, id: u64) -> Result<User, ApiError> {
    store::users::find_by_id(pool, id)
        .await?
        .ok_or_else(|| ApiError::NotFound("User not found".into()))
}

fn already_exists() -> ApiError {
    ApiError::Conflict("User already exists".into())
}

/// Current user's profile
#[utoipa::path(
    get,
    path = "/api/users/me",
    responses(
        (status = 200, description = "Current user", body = User),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "User not found"),
        (status = 500, description = "Internal server error")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "User"
)]
pub async fn me(auth: AuthUser, pool: web::Data<MySqlPool>) -> actix_web::Result<impl Responder> {
    let user = load_user(pool.get_ref(), auth.user_id).await?;
    Ok(HttpResponse::Ok().json(user))
}

/// Add a user
#[utoipa::path(
    post,
    path = "/api/users",
    request_body = UserInput,
    responses(
        (status = 201, description = "User created", body = User),
        (status = 400, description = "Missing or invalid fields", body = Object, example = json!({
            "error": "Phone number must be 10 digits"
        })),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden"),
        (status = 409, description = "Email already registered", body = Object, example = json!({
            "error": "User already exists"
        })),
        (status = 500, description = "Internal server error")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "User"
)]
pub async fn create_user(
    auth: AuthUser,
    body: web::Json<UserInput>,
    pool: web::Data<MySqlPool>,
) -> actix_web::Result<impl Responder> {
    auth.require_admin()?;

    let (profile, password) = check_new_user(&body)?;

    if !email_filter::is_email_available(&profile.email, pool.get_ref())
        .await
        .map_err(ApiError::from)?
    {
        return Err(already_exists().into());
    }

    let hash = hash_password(&password).map_err(ApiError::from)?;

    // The unique key still decides when two creates race
    let id = match store::users::insert(pool.get_ref(), &profile, &hash).await {
        Ok(id) => id,
        Err(e) if store::is_unique_violation(&e) => return Err(already_exists().into()),
        Err(e) => return Err(ApiError::from(e).into()),
    };
    email_filter::insert(&profile.email);

    let user = load_user(pool.get_ref(), id).await?;
    tracing::info!(user_id = id, role = %user.role, "User created");

    Ok(HttpResponse::Created().json(user))
}

/// List users, newest first
#[utoipa::path(
    get,
    path = "/api/users",
    params(UserFilter),
    responses(
        (status = 200, description = "Users", body = Vec<User>),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden"),
        (status = 500, description = "Internal server error")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "User"
)]
pub async fn list_users(
    auth: AuthUser,
    query: web::Query<UserFilter>,
    pool: web::Data<MySqlPool>,
) -> actix_web::Result<impl Responder> {
    auth.require_admin()?;

    let position = query.position.as_deref().map(str::trim).filter(|p| !p.is_empty());
    let users = store::users::list(pool.get_ref(), position)
        .await
        .map_err(ApiError::from)?;

    Ok(HttpResponse::Ok().json(users))
}

/// Edit a user. Moving the start date drops attendance and leave before it.
#[utoipa::path(
    put,
    path = "/api/users/{id}",
    params(
        ("id" = u64, Path, description = "User id")
    ),
    request_body = UserInput,
    responses(
        (status = 200, description = "User updated", body = UpdateUserResponse),
        (status = 400, description = "Missing or invalid fields"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden"),
        (status = 404, description = "User not found"),
        (status = 409, description = "Email taken by another user"),
        (status = 500, description = "Internal server error")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "User"
)]
pub async fn update_user(
    auth: AuthUser,
    path: web::Path<u64>,
    body: web::Json<UserInput>,
    pool: web::Data<MySqlPool>,
) -> actix_web::Result<impl Responder> {
    auth.require_admin()?;

    let id = path.into_inner();
    let existing = load_user(pool.get_ref(), id).await?;
    let profile = check_user_update(&body)?;

    let email_changed = existing.email != profile.email;
    if email_changed
        && !email_filter::is_email_available(&profile.email, pool.get_ref())
            .await
            .map_err(ApiError::from)?
    {
        return Err(already_exists().into());
    }

    match store::users::update(pool.get_ref(), id, &profile).await {
        Ok(_) => {}
        Err(e) if store::is_unique_violation(&e) => return Err(already_exists().into()),
        Err(e) => return Err(ApiError::from(e).into()),
    }

    if email_changed {
        email_filter::remove(&existing.email);
        email_filter::insert(&profile.email);
    }

    let reset = if existing.start_date != profile.start_date {
        let counts = store::attendance::reset_history(pool.get_ref(), id, profile.start_date)
            .await
            .map_err(ApiError::from)?;
        tracing::info!(
            user_id = id,
            new_start = %profile.start_date,
            attendance = counts.attendance,
            leaves = counts.leaves,
            "Start date moved, history reset"
        );
        Some(counts)
    } else {
        None
    };

    let user = load_user(pool.get_ref(), id).await?;

    Ok(HttpResponse::Ok().json(UpdateUserResponse {
        user,
        deleted_attendance: reset.map(|ResetCounts { attendance, .. }| attendance),
        deleted_leaves: reset.map(|ResetCounts { leaves, .. }| leaves),
    }))
}

/// Remove a user together with their attendance and leave
#[utoipa::path(
    delete,
    path = "/api/users/{id}",
    params(
        ("id" = u64, Path, description = "User id")
    ),
    responses(
        (status = 200, description = "User deleted", body = Object, example = json!({
            "message": "User deleted successfully"
        })),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden"),
        (status = 404, description = "User not found"),
        (status = 500, description = "Internal server error")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "User"
)]
pub async fn delete_user(
    auth: AuthUser,
    path: web::Path<u64>,
    pool: web::Data<MySqlPool>,
) -> actix_web::Result<impl Responder> {
    auth.require_admin()?;

    let user = load_user(pool.get_ref(), path.into_inner()).await?;
    store::users::delete(pool.get_ref(), user.id)
        .await
        .map_err(ApiError::from)?;
    email_filter::remove(&user.email);

    tracing::info!(user_id = user.id, "User deleted");

    Ok(HttpResponse::Ok().json(serde_json::json!({
        "message": "User deleted successfully"
    })))
}

/// Set a new password. Admins may reset any account.
#[utoipa::path(
    post,
    path = "/api/users/reset-password",
    request_body = ResetPassword,
    responses(
        (status = 200, description = "Password reset", body = Object, example = json!({
            "message": "Password reset successfully"
        })),
        (status = 400, description = "Passwords differ or are too weak", body = Object, example = json!({
            "error": "Passwords do not match"
        })),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden"),
        (status = 404, description = "User not found"),
        (status = 500, description = "Internal server error")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "User"
)]
pub async fn reset_password(
    auth: AuthUser,
    body: web::Json<ResetPassword>,
    pool: web::Data<MySqlPool>,
) -> actix_web::Result<impl Responder> {
    check_password_reset(&body)?;
    auth.require_self_or_admin(&body.email)?;

    let email = body.email.trim().to_lowercase();
    let user = store::users::find_by_email(pool.get_ref(), &email)
        .await
        .map_err(ApiError::from)?
        .ok_or_else(|| ApiError::NotFound("User not found".into()))?;

    let hash = hash_password(&body.new_password).map_err(ApiError::from)?;
    store::users::update_password(pool.get_ref(), &user.email, &hash)
        .await
        .map_err(ApiError::from)?;

    tracing::info!(user_id = user.id, by = auth.user_id, "Password reset");

    Ok(HttpResponse::Ok().json(serde_json::json!({
        "message": "Password reset successfully"
    })))
}
