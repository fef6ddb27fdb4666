use anyhow::Result;
use futures_util::StreamExt;
use moka::future::Cache;
use once_cell::sync::Lazy;
use sqlx::MySqlPool;
use std::time::Duration;

/// Usernames known to be taken. Registration consults this before hitting
/// the users table; a miss falls through to the database.
static TAKEN_USERNAMES: Lazy<Cache<String, ()>> = Lazy::new(|| {
    Cache::builder()
        .max_capacity(100_000)
        .time_to_live(Duration::from_secs(86_400))
        .build()
});

pub async fn mark_taken(username: &str) {
    TAKEN_USERNAMES.insert(username.to_lowercase(), ()).await;
}

pub async fn is_taken(username: &str) -> bool {
    TAKEN_USERNAMES.get(&username.to_lowercase()).await.is_some()
}

/// Preloads recently active usernames so the common collisions hit memory.
pub async fn warmup(pool: &MySqlPool, days: u32) -> Result<()> {
    let mut stream = sqlx::query_scalar::<_, String>(
        r#"
        SELECT username
        FROM users
        WHERE last_login_at >= NOW() - INTERVAL ? DAY
        "#,
    )
    .bind(days)
    .fetch(pool);

    let mut total = 0usize;
    while let Some(row) = stream.next().await {
        mark_taken(&row?).await;
        total += 1;
    }

    log::info!("Username cache warmup complete: {total} users (last {days} days)");

    Ok(())
}
