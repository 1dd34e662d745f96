//! Schema initializer
//!
//! Order matters: `reviews` references `businesses`.

use sqlx::PgPool;

const CREATE_BUSINESSES: &str = r#"
    CREATE TABLE IF NOT EXISTS businesses (
        business_id BIGSERIAL PRIMARY KEY,
        owner_id INTEGER NOT NULL,
        name VARCHAR(50) NOT NULL,
        street_address VARCHAR(100) NOT NULL,
        city VARCHAR(50) NOT NULL,
        state VARCHAR(2) NOT NULL,
        zip_code INTEGER NOT NULL
    )
"#;

const CREATE_REVIEWS: &str = r#"
    CREATE TABLE IF NOT EXISTS reviews (
        review_id BIGSERIAL PRIMARY KEY,
        business_id BIGINT NOT NULL REFERENCES businesses(business_id) ON DELETE CASCADE,
        user_id INTEGER NOT NULL,
        stars INTEGER NOT NULL,
        review_text VARCHAR(1000) NOT NULL DEFAULT '',
        CONSTRAINT reviews_user_business_key UNIQUE (user_id, business_id)
    )
"#;

/// Create both tables if absent.
///
/// A failure on `businesses` is returned; a failure on `reviews` is logged
/// and swallowed so the business routes still come up.
pub async fn initialize(pool: &PgPool) -> Result<(), sqlx::Error> {
    tracing::info!("Initializing schema...");

    sqlx::query(CREATE_BUSINESSES).execute(pool).await?;

    if let Err(e) = sqlx::query(CREATE_REVIEWS).execute(pool).await {
        tracing::error!(error = %e, "Failed to create reviews table");
        return Ok(());
    }

    tracing::info!("Schema ready");
    Ok(())
}
