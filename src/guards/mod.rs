//! Validation rules applied before anything is written.
//!
//! Guards are pure: handlers load whatever records a rule needs and pass
//! them in, so every rule can be exercised without a database.

pub mod attendance;
pub mod holiday;
pub mod leave;
pub mod user;

/// Guard failures are caller mistakes: 400 with the message as `error`.
macro_rules! bad_request_error {
    ($($ty:ty),+ $(,)?) => {
        $(
            impl actix_web::ResponseError for $ty {
                fn status_code(&self) -> actix_web::http::StatusCode {
                    actix_web::http::StatusCode::BAD_REQUEST
                }

                fn error_response(&self) -> actix_web::HttpResponse {
                    actix_web::HttpResponse::BadRequest()
                        .json(serde_json::json!({ "error": self.to_string() }))
                }
            }
        )+
    };
}

bad_request_error!(
    attendance::MarkError,
    leave::LeaveError,
    holiday::HolidayError,
    user::UserError,
);

#[cfg(test)]
mod tests {
    use actix_web::{ResponseError, http::StatusCode};

    use super::attendance::MarkError;

    #[test]
    fn guard_errors_are_bad_requests() {
        let err = MarkError::AlreadyMarked;
        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(err.error_response().status(), StatusCode::BAD_REQUEST);
    }
}
