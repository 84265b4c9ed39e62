//! Creates the first Admin account from `ADMIN_*` environment variables.
//!
//! Runs migrations first. Does nothing when an Admin already exists, so it
//! is safe to run on every deploy.

use std::env;

use anyhow::{Context, Result, bail};
use attendance_tracker::{
    auth::password::hash_password,
    db::{init_db, run_migrations},
    guards::user::{UserInput, check_new_user},
    store,
};
use chrono::{Local, NaiveDate};
use dotenvy::dotenv;
use tracing::info;

fn var(key: &str) -> Option<String> {
    env::var(key)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn admin_input() -> Result<UserInput> {
    let start_date = match var("ADMIN_START_DATE") {
        Some(raw) => Some(
            NaiveDate::parse_from_str(&raw, "%Y-%m-%d")
                .with_context(|| format!("ADMIN_START_DATE {raw:?} is not YYYY-MM-DD"))?,
        ),
        None => Some(Local::now().date_naive()),
    };

    Ok(UserInput {
        name: var("ADMIN_NAME").or_else(|| Some("Administrator".into())),
        email: var("ADMIN_EMAIL"),
        phone: var("ADMIN_PHONE"),
        password: var("ADMIN_PASSWORD"),
        role: Some("Admin".into()),
        position: var("ADMIN_POSITION").or_else(|| Some("Administrator".into())),
        start_date,
    })
}

#[actix_web::main]
async fn main() -> Result<()> {
    dotenv().ok();
    tracing_subscriber::fmt().with_target(false).init();

    let database_url = env::var("DATABASE_URL").context("DATABASE_URL must be set")?;
    let pool = init_db(&database_url)
        .await
        .context("failed to connect to the database")?;
    run_migrations(&pool).await.context("failed to run migrations")?;

    let admins = store::users::count_admins(&pool).await?;
    if admins > 0 {
        info!(admins, "Admin already provisioned, nothing to do");
        return Ok(());
    }

    let input = admin_input()?;
    let (profile, password) = match check_new_user(&input) {
        Ok(checked) => checked,
        Err(e) => bail!("invalid ADMIN_* settings: {e} (ADMIN_EMAIL, ADMIN_PHONE and ADMIN_PASSWORD are required)"),
    };

    let hash = hash_password(&password).map_err(|e| anyhow::anyhow!("failed to hash password: {e}"))?;
    let id = store::users::insert(&pool, &profile, &hash)
        .await
        .context("failed to insert admin")?;

    info!(user_id = id, email = %profile.email, "Admin provisioned");
    Ok(())
}
