use actix_web::{HttpResponse, Responder, web};
use chrono::{Local, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::MySqlPool;
use utoipa::{IntoParams, ToSchema};

use crate::{
    auth::auth::AuthUser,
    config::Config,
    error::ApiError,
    guards::attendance::{MarkContext, MarkError, TimePeriod, check_mark},
    model::{attendance::AttendanceRecord, user::User},
    reconcile::{
        LeaveEntry, reconcile,
        stats::{AttendanceStats, best_and_worst},
    },
    store::{self, attendance::ResetCounts},
    utils::holiday_cache,
};

#[derive(Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
#[schema(example = json!({
    "message": "Attendance marked successfully",
    "timePeriod": "morning"
}))]
pub struct MarkResponse {
    pub message: String,
    pub time_period: TimePeriod,
}

#[derive(Serialize, ToSchema)]
pub struct HistoryResponse {
    pub attendance: Vec<AttendanceRecord>,
    pub leaves: Vec<LeaveEntry>,
    pub stats: AttendanceStats,
}

#[derive(Serialize, ToSchema)]
pub struct UserAttendanceResponse {
    pub user: User,
    pub attendance: Vec<AttendanceRecord>,
    pub leaves: Vec<LeaveEntry>,
    pub stats: AttendanceStats,
}

#[derive(Clone, Serialize, ToSchema)]
pub struct UserSummary {
    #[serde(flatten)]
    pub user: User,
    pub stats: AttendanceStats,
}

#[derive(Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SummaryResponse {
    pub users: Vec<UserSummary>,
    pub best_performer: Option<UserSummary>,
    pub worst_performer: Option<UserSummary>,
}

#[derive(Deserialize, IntoParams, ToSchema)]
pub struct SummaryQuery {
    /// Only users holding this position
    #[schema(example = "Backend Engineer")]
    pub position: Option<String>,
}

#[derive(Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ResetAttendance {
    #[schema(example = 7)]
    pub user_id: u64,
    #[schema(example = "2026-11-02", value_type = String, format = "date")]
    pub new_start_date: NaiveDate,
}

#[derive(Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ResetResponse {
    pub message: String,
    pub deleted_attendance: u64,
    pub deleted_leaves: u64,
}

/// Stored rows for one user, reconciled against the current local time.
struct UserReport {
    attendance: Vec<AttendanceRecord>,
    leaves: Vec<LeaveEntry>,
    stats: AttendanceStats,
}

async fn build_report(pool: &MySqlPool, config: &Config, user: &User) -> Result<UserReport, ApiError> {
    let attendance = store::attendance::for_user(pool, user.id).await?;
    let leaves = store::leaves::for_user(pool, user.id).await?;
    let holidays = holiday_cache::all_holidays(pool).await?;

    let reconciliation = reconcile(
        user.start_date,
        Local::now().naive_local(),
        &config.marking_window,
        &attendance,
        &leaves,
        &holidays,
    );

    Ok(UserReport {
        stats: reconciliation.stats,
        leaves: reconciliation.merged_leaves(user.id, leaves),
        attendance,
    })
}

/// A duplicate key means a concurrent mark for the same day won the race.
fn mark_insert_error(e: sqlx::Error) -> actix_web::Error {
    if store::is_unique_violation(&e) {
        MarkError::AlreadyMarked.into()
    } else {
        ApiError::from(e).into()
    }
}

async fn load_user(pool: &MySqlPool, id: u64) -> Result<User, ApiError> {
    store::users::find_by_id(pool, id)
        .await?
        .ok_or_else(|| ApiError::NotFound("User not found".into()))
}

/// Mark the caller present for today
#[utoipa::path(
    post,
    path = "/api/attendance/mark",
    responses(
        (status = 200, description = "Attendance marked", body = MarkResponse),
        (status = 400, description = "Outside the marking window, before start date, already marked, on leave, weekend or holiday", body = Object, example = json!({
            "error": "Attendance already marked for today"
        })),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "User not found"),
        (status = 500, description = "Internal server error")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Attendance"
)]
pub async fn mark_attendance(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    config: web::Data<Config>,
) -> actix_web::Result<impl Responder> {
    let now = Local::now().naive_local();
    let today = now.date();

    let user = load_user(pool.get_ref(), auth.user_id).await?;
    let today_record = store::attendance::on_date(pool.get_ref(), user.id, today)
        .await
        .map_err(ApiError::from)?;
    let leaves = store::leaves::approved_overlapping(pool.get_ref(), user.id, today, today)
        .await
        .map_err(ApiError::from)?;
    let holidays = holiday_cache::all_holidays(pool.get_ref())
        .await
        .map_err(ApiError::from)?;

    let time_period = check_mark(
        now,
        &config.marking_window,
        &MarkContext {
            start_date: user.start_date,
            today_record: today_record.as_ref(),
            leaves: &leaves,
            holidays: &holidays,
        },
    )?;

    store::attendance::insert_present(pool.get_ref(), user.id, today, Utc::now())
        .await
        .map_err(mark_insert_error)?;

    tracing::info!(user_id = user.id, %today, %time_period, "Attendance marked");

    Ok(HttpResponse::Ok().json(MarkResponse {
        message: "Attendance marked successfully".into(),
        time_period,
    }))
}

/// Caller's own attendance, merged leave list and stats
#[utoipa::path(
    get,
    path = "/api/attendance/history",
    responses(
        (status = 200, description = "Attendance history", body = HistoryResponse),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "User not found"),
        (status = 500, description = "Internal server error")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Attendance"
)]
pub async fn history(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    config: web::Data<Config>,
) -> actix_web::Result<impl Responder> {
    let user = load_user(pool.get_ref(), auth.user_id).await?;
    let report = build_report(pool.get_ref(), &config, &user).await?;

    Ok(HttpResponse::Ok().json(HistoryResponse {
        attendance: report.attendance,
        leaves: report.leaves,
        stats: report.stats,
    }))
}

/// Any user's attendance, merged leave list and stats
#[utoipa::path(
    get,
    path = "/api/attendance/admin/user/{id}",
    params(
        ("id" = u64, Path, description = "User id")
    ),
    responses(
        (status = 200, description = "User attendance", body = UserAttendanceResponse),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden"),
        (status = 404, description = "User not found"),
        (status = 500, description = "Internal server error")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Attendance"
)]
pub async fn admin_user_attendance(
    auth: AuthUser,
    path: web::Path<u64>,
    pool: web::Data<MySqlPool>,
    config: web::Data<Config>,
) -> actix_web::Result<impl Responder> {
    auth.require_admin()?;

    let user = load_user(pool.get_ref(), path.into_inner()).await?;
    let report = build_report(pool.get_ref(), &config, &user).await?;

    Ok(HttpResponse::Ok().json(UserAttendanceResponse {
        user,
        attendance: report.attendance,
        leaves: report.leaves,
        stats: report.stats,
    }))
}

/// Stats for every user, with best and worst performer
#[utoipa::path(
    get,
    path = "/api/attendance/admin/summary",
    params(SummaryQuery),
    responses(
        (status = 200, description = "Attendance summary", body = SummaryResponse),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden"),
        (status = 500, description = "Internal server error")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Attendance"
)]
pub async fn admin_summary(
    auth: AuthUser,
    query: web::Query<SummaryQuery>,
    pool: web::Data<MySqlPool>,
    config: web::Data<Config>,
) -> actix_web::Result<impl Responder> {
    auth.require_admin()?;

    let position = query.position.as_deref().map(str::trim).filter(|p| !p.is_empty());
    let users = store::users::list(pool.get_ref(), position)
        .await
        .map_err(ApiError::from)?;

    let mut summaries = Vec::with_capacity(users.len());
    for user in users {
        let report = build_report(pool.get_ref(), &config, &user).await?;
        summaries.push(UserSummary {
            user,
            stats: report.stats,
        });
    }

    let (best_performer, worst_performer) =
        match best_and_worst(&summaries, |s| s.stats.attendance_percentage) {
            Some((best, worst)) => (Some(best.clone()), Some(worst.clone())),
            None => (None, None),
        };

    Ok(HttpResponse::Ok().json(SummaryResponse {
        users: summaries,
        best_performer,
        worst_performer,
    }))
}

/// Delete a user's attendance and leave history before a new start date
#[utoipa::path(
    post,
    path = "/api/attendance/admin/reset-attendance",
    request_body = ResetAttendance,
    responses(
        (status = 200, description = "History reset", body = ResetResponse),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden"),
        (status = 404, description = "User not found"),
        (status = 500, description = "Internal server error")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Attendance"
)]
pub async fn reset_attendance(
    auth: AuthUser,
    body: web::Json<ResetAttendance>,
    pool: web::Data<MySqlPool>,
) -> actix_web::Result<impl Responder> {
    auth.require_admin()?;

    let user = load_user(pool.get_ref(), body.user_id).await?;
    let ResetCounts { attendance, leaves } =
        store::attendance::reset_history(pool.get_ref(), user.id, body.new_start_date)
            .await
            .map_err(ApiError::from)?;

    tracing::info!(
        user_id = user.id,
        new_start = %body.new_start_date,
        attendance,
        leaves,
        "Attendance history reset"
    );

    Ok(HttpResponse::Ok().json(ResetResponse {
        message: "Attendance history reset successfully".into(),
        deleted_attendance: attendance,
        deleted_leaves: leaves,
    }))
}
