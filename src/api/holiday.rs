use actix_web::{HttpResponse, Responder, web};
use chrono::Local;
use serde::Deserialize;
use sqlx::MySqlPool;
use utoipa::{IntoParams, ToSchema};

use crate::{
    auth::auth::AuthUser,
    error::ApiError,
    guards::holiday::{HolidayInput, check_create, check_update},
    model::holiday::Holiday,
    store::{self, holidays::HolidayScope},
    utils::holiday_cache,
};

#[derive(Deserialize, IntoParams, ToSchema)]
pub struct HolidayQuery {
    /// `upcoming` (default), `past`, anything else lists all
    #[serde(default, rename = "type")]
    #[param(value_type = Option<String>, example = "upcoming")]
    pub scope: HolidayScope,
}

async fn load_holiday(pool: &MySqlPool, id: u64) -> Result<Holiday, ApiError> {
    store::holidays::find_by_id(pool, id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Holiday not found".into()))
}

/// Add a company holiday
#[utoipa::path(
    post,
    path = "/api/attendance/admin/holidays",
    request_body = HolidayInput,
    responses(
        (status = 201, description = "Holiday created", body = Holiday),
        (status = 400, description = "Missing fields, past or inverted range, or weekend", body = Object, example = json!({
            "error": "Weekends are already holidays"
        })),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden"),
        (status = 500, description = "Internal server error")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Holiday"
)]
pub async fn create_holiday(
    auth: AuthUser,
    body: web::Json<HolidayInput>,
    pool: web::Data<MySqlPool>,
) -> actix_web::Result<impl Responder> {
    auth.require_admin()?;

    let draft = check_create(&body, Local::now().date_naive())?;
    let id = store::holidays::insert(pool.get_ref(), &draft)
        .await
        .map_err(ApiError::from)?;
    holiday_cache::invalidate().await;

    let holiday = load_holiday(pool.get_ref(), id).await?;
    tracing::info!(holiday_id = id, name = %holiday.name, "Holiday created");

    Ok(HttpResponse::Created().json(holiday))
}

/// List holidays, ascending by start date
#[utoipa::path(
    get,
    path = "/api/attendance/admin/holidays",
    params(HolidayQuery),
    responses(
        (status = 200, description = "Holidays", body = Vec<Holiday>),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden"),
        (status = 500, description = "Internal server error")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Holiday"
)]
pub async fn list_holidays(
    auth: AuthUser,
    query: web::Query<HolidayQuery>,
    pool: web::Data<MySqlPool>,
) -> actix_web::Result<impl Responder> {
    auth.require_admin()?;

    let holidays =
        store::holidays::list_scoped(pool.get_ref(), query.scope, Local::now().date_naive())
            .await
            .map_err(ApiError::from)?;

    Ok(HttpResponse::Ok().json(holidays))
}

/// Edit a holiday that has not ended yet
#[utoipa::path(
    put,
    path = "/api/attendance/admin/holidays/{id}",
    params(
        ("id" = u64, Path, description = "Holiday id")
    ),
    request_body = HolidayInput,
    responses(
        (status = 200, description = "Holiday updated", body = Holiday),
        (status = 400, description = "Past holiday, missing fields, past or inverted range", body = Object, example = json!({
            "error": "Cannot edit past holidays"
        })),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden"),
        (status = 404, description = "Holiday not found"),
        (status = 500, description = "Internal server error")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Holiday"
)]
pub async fn update_holiday(
    auth: AuthUser,
    path: web::Path<u64>,
    body: web::Json<HolidayInput>,
    pool: web::Data<MySqlPool>,
) -> actix_web::Result<impl Responder> {
    auth.require_admin()?;

    let id = path.into_inner();
    let existing = load_holiday(pool.get_ref(), id).await?;
    let draft = check_update(&existing, &body, Local::now().date_naive())?;

    store::holidays::update(pool.get_ref(), id, &draft)
        .await
        .map_err(ApiError::from)?;
    holiday_cache::invalidate().await;

    let holiday = load_holiday(pool.get_ref(), id).await?;
    tracing::info!(holiday_id = id, "Holiday updated");

    Ok(HttpResponse::Ok().json(holiday))
}

/// Remove a holiday
#[utoipa::path(
    delete,
    path = "/api/attendance/admin/holidays/{id}",
    params(
        ("id" = u64, Path, description = "Holiday id")
    ),
    responses(
        (status = 200, description = "Holiday deleted", body = Object, example = json!({
            "message": "Holiday deleted successfully"
        })),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden"),
        (status = 500, description = "Internal server error")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Holiday"
)]
pub async fn delete_holiday(
    auth: AuthUser,
    path: web::Path<u64>,
    pool: web::Data<MySqlPool>,
) -> actix_web::Result<impl Responder> {
    auth.require_admin()?;

    let id = path.into_inner();
    let removed = store::holidays::delete(pool.get_ref(), id)
        .await
        .map_err(ApiError::from)?;
    holiday_cache::invalidate().await;

    tracing::info!(holiday_id = id, removed, "Holiday deleted");

    Ok(HttpResponse::Ok().json(serde_json::json!({
        "message": "Holiday deleted successfully"
    })))
}
