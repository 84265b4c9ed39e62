use actix_web::{HttpResponse, Responder, web};
use chrono::Local;
use sqlx::MySqlPool;

use crate::{
    auth::auth::AuthUser,
    error::ApiError,
    guards::leave::{ApplyLeave, check_leave_conflicts, validate_leave_request},
    model::leave_application::{LeaveApplication, LeaveStatus},
    store,
    utils::holiday_cache,
};

/// Apply for leave; accepted applications are approved immediately
#[utoipa::path(
    post,
    path = "/api/attendance/leave",
    request_body = ApplyLeave,
    responses(
        (status = 201, description = "Leave approved", body = LeaveApplication),
        (status = 400, description = "Missing fields, past or inverted range, or a conflict", body = Object, example = json!({
            "error": "Attendance already marked for some dates in this range"
        })),
        (status = 401, description = "Unauthorized"),
        (status = 500, description = "Internal server error")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Leave"
)]
pub async fn apply_leave(
    auth: AuthUser,
    body: web::Json<ApplyLeave>,
    pool: web::Data<MySqlPool>,
) -> actix_web::Result<impl Responder> {
    let today = Local::now().date_naive();
    let range = validate_leave_request(&body, today)?;

    let attendance =
        store::attendance::in_range(pool.get_ref(), auth.user_id, range.start_date, range.end_date)
            .await
            .map_err(ApiError::from)?;
    let leaves = store::leaves::approved_overlapping(
        pool.get_ref(),
        auth.user_id,
        range.start_date,
        range.end_date,
    )
    .await
    .map_err(ApiError::from)?;
    let holidays = holiday_cache::all_holidays(pool.get_ref())
        .await
        .map_err(ApiError::from)?;

    check_leave_conflicts(&range, &attendance, &leaves, &holidays)?;

    let id = store::leaves::insert(pool.get_ref(), auth.user_id, &range, LeaveStatus::Approved)
        .await
        .map_err(ApiError::from)?;

    let leave = store::leaves::find_by_id(pool.get_ref(), id)
        .await
        .map_err(ApiError::from)?
        .ok_or_else(|| ApiError::Internal(format!("leave {id} missing after insert")))?;

    tracing::info!(
        user_id = auth.user_id,
        leave_id = id,
        start = %range.start_date,
        end = %range.end_date,
        "Leave approved"
    );

    Ok(HttpResponse::Created().json(leave))
}
