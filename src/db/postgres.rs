use sqlx::{postgres::PgPoolOptions, PgPool};

use crate::{
    error::AppResult,
    models::{Catalog, CatalogEntry, UsernameTable},
};

/// Creates a PostgreSQL connection pool
///
/// The pool is only used at startup to read the static tables, so it stays small.
pub async fn create_pool(database_url: &str) -> anyhow::Result<PgPool> {
    let pool = PgPoolOptions::new()
        .max_connections(5)
        .connect(database_url)
        .await?;

    Ok(pool)
}

/// Applies the embedded schema migrations
pub async fn run_migrations(pool: &PgPool) -> anyhow::Result<()> {
    sqlx::migrate!("./migrations").run(pool).await?;
    Ok(())
}

/// Loads the recommendable titles, ordered by id
pub async fn load_catalog(pool: &PgPool) -> AppResult<Catalog> {
    let entries: Vec<CatalogEntry> = sqlx::query_as(
        r#"
        SELECT anime_id, title, image_url
        FROM anime
        ORDER BY anime_id
        "#,
    )
    .fetch_all(pool)
    .await?;

    tracing::info!(titles = entries.len(), "Loaded catalog from database");

    Ok(Catalog::new(entries))
}

/// Loads the username → internal id table
pub async fn load_usernames(pool: &PgPool) -> AppResult<UsernameTable> {
    let rows: Vec<(String, String)> = sqlx::query_as(
        r#"
        SELECT username, uid
        FROM mal_users
        ORDER BY username
        "#,
    )
    .fetch_all(pool)
    .await?;

    tracing::info!(users = rows.len(), "Loaded username table from database");

    Ok(UsernameTable::new(rows))
}
