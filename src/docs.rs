use crate::api::attendance::{
    HistoryResponse, MarkResponse, ResetAttendance, ResetResponse, SummaryQuery, SummaryResponse,
    UserAttendanceResponse, UserSummary,
};
use crate::api::holiday::HolidayQuery;
use crate::api::user::{UpdateUserResponse, UserFilter};
use crate::guards::attendance::TimePeriod;
use crate::guards::holiday::HolidayInput;
use crate::guards::leave::ApplyLeave;
use crate::guards::user::{ResetPassword, UserInput};
use crate::model::{
    attendance::{AttendanceRecord, AttendanceStatus},
    holiday::Holiday,
    leave_application::{LeaveApplication, LeaveStatus},
    role::Role,
    user::User,
};
use crate::models::{LoginReqDto, LoginResponse};
use crate::reconcile::{LeaveEntry, LeaveEntryId, stats::AttendanceStats};
use crate::store::holidays::HolidayScope;
use utoipa::Modify;
use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{OpenApi, openapi};

pub struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "bearer_auth",
            SecurityScheme::Http(
                HttpBuilder::new()
                    .scheme(HttpAuthScheme::Bearer)
                    .bearer_format("JWT")
                    .build(),
            ),
        );
    }
}

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Attendance Tracker API",
        version = "1.0.0",
        description = r#"
## Attendance Tracker

Employees mark attendance once per working day inside a fixed window and
apply for leave. Admins manage users and company holidays and review
attendance across the organization.

### Key Features
- **Attendance**
  - Daily marking between the configured opening and closing hours
  - History with a merged leave list and per-user statistics
- **Leave**
  - Self-service leave, approved on submission
- **Holidays**
  - Company-wide closures excluded from working days
- **Users**
  - Admin-managed accounts, password reset

### Working days
A day counts when it is on or after the user's start date, not a weekend
and not inside a holiday. A past working day with neither attendance nor
approved leave is reported as *failed to mark*.

### Security
All `/api` endpoints require a **JWT Bearer** access token from `/auth/login`.
"#,
    ),
    paths(
        crate::auth::handlers::login,
        crate::auth::handlers::refresh_token,
        crate::auth::handlers::logout,

        crate::api::attendance::mark_attendance,
        crate::api::attendance::history,
        crate::api::attendance::admin_user_attendance,
        crate::api::attendance::admin_summary,
        crate::api::attendance::reset_attendance,

        crate::api::leave::apply_leave,

        crate::api::holiday::create_holiday,
        crate::api::holiday::list_holidays,
        crate::api::holiday::update_holiday,
        crate::api::holiday::delete_holiday,

        crate::api::user::me,
        crate::api::user::create_user,
        crate::api::user::list_users,
        crate::api::user::update_user,
        crate::api::user::delete_user,
        crate::api::user::reset_password
    ),
    components(
        schemas(
            LoginReqDto,
            LoginResponse,
            Role,
            User,
            UserInput,
            UserFilter,
            UpdateUserResponse,
            ResetPassword,
            AttendanceRecord,
            AttendanceStatus,
            AttendanceStats,
            TimePeriod,
            MarkResponse,
            HistoryResponse,
            UserAttendanceResponse,
            UserSummary,
            SummaryQuery,
            SummaryResponse,
            ResetAttendance,
            ResetResponse,
            LeaveStatus,
            LeaveApplication,
            LeaveEntry,
            LeaveEntryId,
            ApplyLeave,
            Holiday,
            HolidayInput,
            HolidayQuery,
            HolidayScope
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Auth", description = "Login and token rotation"),
        (name = "Attendance", description = "Attendance marking and reporting APIs"),
        (name = "Leave", description = "Leave application APIs"),
        (name = "Holiday", description = "Company holiday management APIs"),
        (name = "User", description = "User management APIs"),
    )
)]
pub struct ApiDoc;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn document_lists_every_route() {
        let doc = ApiDoc::openapi();
        for path in [
            "/auth/login",
            "/api/attendance/mark",
            "/api/attendance/history",
            "/api/attendance/admin/summary",
            "/api/attendance/admin/holidays/{id}",
            "/api/users/reset-password",
        ] {
            assert!(doc.paths.paths.contains_key(path), "missing {path}");
        }
        let schemes = doc.components.unwrap().security_schemes;
        assert!(schemes.contains_key("bearer_auth"));
    }
}
