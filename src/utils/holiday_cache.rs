use std::{sync::Arc, time::Duration};

use moka::future::Cache;
use once_cell::sync::Lazy;
use sqlx::MySqlPool;

use crate::{model::holiday::Holiday, store};

const ALL: &str = "all";

/// Every holiday, ascending by start date. Writes invalidate it; the TTL only
/// bounds how long a list loaded concurrently with a write can linger.
static HOLIDAY_CACHE: Lazy<Cache<&'static str, Arc<Vec<Holiday>>>> = Lazy::new(|| {
    Cache::builder()
        .max_capacity(1)
        .time_to_live(Duration::from_secs(300))
        .build()
});

pub async fn all_holidays(pool: &MySqlPool) -> Result<Arc<Vec<Holiday>>, sqlx::Error> {
    if let Some(holidays) = HOLIDAY_CACHE.get(ALL).await {
        return Ok(holidays);
    }

    let holidays = Arc::new(store::holidays::list_all(pool).await?);
    HOLIDAY_CACHE.insert(ALL, holidays.clone()).await;
    tracing::debug!(count = holidays.len(), "Holiday cache refreshed");
    Ok(holidays)
}

pub async fn invalidate() {
    HOLIDAY_CACHE.invalidate(ALL).await;
}
