use crate::{auth::jwt::verify_token, config::Config, model::role::Role, models::TokenType};
use actix_web::{
    FromRequest, HttpMessage, HttpRequest,
    dev::Payload,
    error::{ErrorForbidden, ErrorInternalServerError, ErrorUnauthorized},
    web::Data,
};
use futures::future::{Ready, ready};

/// Identity carried by a verified access token.
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub user_id: u64,
    pub email: String,
    pub role: Role,
}

fn authenticate(req: &HttpRequest) -> actix_web::Result<AuthUser> {
    // Set by the auth middleware on protected scopes
    if let Some(user) = req.extensions().get::<AuthUser>() {
        return Ok(user.clone());
    }

    let token = req
        .headers()
        .get("Authorization")
        .and_then(|h| h.to_str().ok())
        .and_then(|h| h.strip_prefix("Bearer "))
        .ok_or_else(|| ErrorUnauthorized("Missing token"))?;

    let config = req
        .app_data::<Data<Config>>()
        .ok_or_else(|| ErrorInternalServerError("Config missing"))?;

    let claims = verify_token(token, &config.jwt_secret).map_err(|_| ErrorUnauthorized("Invalid token"))?;

    if claims.token_type != TokenType::Access {
        return Err(ErrorUnauthorized("Invalid token"));
    }

    Ok(AuthUser {
        user_id: claims.user_id,
        email: claims.sub,
        role: claims.role,
    })
}

impl FromRequest for AuthUser {
    type Error = actix_web::Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
        ready(authenticate(req))
    }
}

impl AuthUser {
    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }

    pub fn require_admin(&self) -> actix_web::Result<()> {
        if self.is_admin() {
            Ok(())
        } else {
            Err(ErrorForbidden("Unauthorized access"))
        }
    }

    /// Admins may act on any account, everyone else only on their own.
    pub fn require_self_or_admin(&self, email: &str) -> actix_web::Result<()> {
        if self.is_admin() || self.email.eq_ignore_ascii_case(email.trim()) {
            Ok(())
        } else {
            Err(ErrorForbidden("Unauthorized access"))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user(role: Role) -> AuthUser {
        AuthUser {
            user_id: 1,
            email: "asha@company.com".into(),
            role,
        }
    }

    #[test]
    fn employees_cannot_pass_admin_checks() {
        assert!(user(Role::Employee).require_admin().is_err());
        assert!(user(Role::Admin).require_admin().is_ok());
    }

    #[test]
    fn self_service_matches_own_email_only() {
        let employee = user(Role::Employee);
        assert!(employee.require_self_or_admin(" Asha@Company.com").is_ok());
        assert!(employee.require_self_or_admin("someone@company.com").is_err());
        assert!(user(Role::Admin).require_self_or_admin("someone@company.com").is_ok());
    }
}
