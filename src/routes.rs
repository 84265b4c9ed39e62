use crate::{
    api::{attendance, holiday, leave, user},
    auth::{handlers, middleware::auth_middleware},
    config::Config,
};
use actix_governor::{
    Governor, GovernorConfigBuilder, PeerIpKeyExtractor, governor::middleware::NoOpMiddleware,
};
use actix_web::{middleware::from_fn, web};
use std::sync::Arc;

// Per-route-group limiter. A zero rate falls back to one request per minute.
fn build_limiter(requests_per_min: u32) -> Governor<PeerIpKeyExtractor, NoOpMiddleware> {
    let requests_per_min = requests_per_min.max(1);
    let per_ms = (60_000 / requests_per_min as u64).max(1);
    let cfg = GovernorConfigBuilder::default()
        .per_millisecond(per_ms)
        .burst_size(requests_per_min)
        .key_extractor(PeerIpKeyExtractor)
        .finish()
        .expect("period and burst size are non-zero");
    Governor::new(&cfg)
}

pub fn configure(cfg: &mut web::ServiceConfig, config: &Config) {
    let login_limiter = Arc::new(build_limiter(config.rate_login_per_min));
    let refresh_limiter = Arc::new(build_limiter(config.rate_refresh_per_min));
    let protected_limiter = Arc::new(build_limiter(config.rate_protected_per_min));

    // Public routes
    cfg.service(
        web::scope("/auth")
            .service(
                web::resource("/login")
                    .wrap(login_limiter.clone())
                    .route(web::post().to(handlers::login)),
            )
            .service(
                web::resource("/refresh")
                    .wrap(refresh_limiter.clone())
                    .route(web::post().to(handlers::refresh_token)),
            )
            .service(
                web::resource("/logout")
                    .wrap(login_limiter.clone())
                    .route(web::post().to(handlers::logout)),
            ),
    );

    // Protected routes
    cfg.service(
        web::scope(&config.api_prefix)
            .wrap(from_fn(auth_middleware))
            .wrap(protected_limiter)
            .service(
                web::scope("/users")
                    // /users
                    .service(
                        web::resource("")
                            .route(web::get().to(user::list_users))
                            .route(web::post().to(user::create_user)),
                    )
                    // before /{id} so it is not taken for an id
                    .service(web::resource("/me").route(web::get().to(user::me)))
                    .service(
                        web::resource("/reset-password")
                            .route(web::post().to(user::reset_password)),
                    )
                    // /users/{id}
                    .service(
                        web::resource("/{id}")
                            .route(web::put().to(user::update_user))
                            .route(web::delete().to(user::delete_user)),
                    ),
            )
            .service(
                web::scope("/attendance")
                    .service(
                        web::resource("/mark").route(web::post().to(attendance::mark_attendance)),
                    )
                    .service(web::resource("/leave").route(web::post().to(leave::apply_leave)))
                    .service(web::resource("/history").route(web::get().to(attendance::history)))
                    // /attendance/admin/...
                    .service(
                        web::scope("/admin")
                            .service(
                                web::resource("/user/{id}")
                                    .route(web::get().to(attendance::admin_user_attendance)),
                            )
                            .service(
                                web::resource("/summary")
                                    .route(web::get().to(attendance::admin_summary)),
                            )
                            .service(
                                web::resource("/reset-attendance")
                                    .route(web::post().to(attendance::reset_attendance)),
                            )
                            .service(
                                web::resource("/holidays")
                                    .route(web::get().to(holiday::list_holidays))
                                    .route(web::post().to(holiday::create_holiday)),
                            )
                            .service(
                                web::resource("/holidays/{id}")
                                    .route(web::put().to(holiday::update_holiday))
                                    .route(web::delete().to(holiday::delete_holiday)),
                            ),
                    ),
            ),
    );
}

// LOGIN
//  ├─ access_token (15 min)
//  └─ refresh_token (7 days)

// API REQUEST
//  └─ Authorization: Bearer access_token

// ACCESS EXPIRED
//  └─ POST /auth/refresh with refresh_token
//       └─ returns a new token pair, the old refresh token is revoked
