//! Schema bootstrap
//!
//! Every statement is idempotent, so this runs on each startup.

use sqlx::PgPool;

use super::DbError;

/// Create tables and indexes if absent
pub async fn run(pool: &PgPool) -> Result<(), DbError> {
    tracing::info!("Running migrations...");

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS bills (
            id UUID PRIMARY KEY,
            bill_no TEXT NOT NULL UNIQUE,
            date TEXT NOT NULL,
            customer_name TEXT NOT NULL,
            line_items JSON NOT NULL,
            total DOUBLE PRECISION NOT NULL,
            amount_in_words TEXT NOT NULL
        )
        "#,
    )
    .execute(pool)
    .await?;

    // Older schemas used JSONB, which does not keep the submitted text
    sqlx::query(
        r#"
        DO $$
        BEGIN
            IF EXISTS (
                SELECT 1 FROM information_schema.columns
                WHERE table_name = 'bills'
                  AND column_name = 'line_items'
                  AND data_type = 'jsonb'
            ) THEN
                ALTER TABLE bills ALTER COLUMN line_items TYPE JSON USING line_items::json;
            END IF;
        END
        $$
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS rate_cards (
            id UUID PRIMARY KEY,
            name TEXT NOT NULL,
            created_date TEXT NOT NULL
        )
        "#,
    )
    .execute(pool)
    .await?;

    // Items never outlive their card
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS rate_card_items (
            id SERIAL PRIMARY KEY,
            rate_card_id UUID NOT NULL REFERENCES rate_cards(id) ON DELETE CASCADE,
            sr_no INTEGER NOT NULL,
            description TEXT NOT NULL,
            labor_work TEXT NOT NULL,
            material_specs TEXT NOT NULL,
            rate_with_material TEXT NOT NULL,
            display_order INTEGER NOT NULL,
            UNIQUE (rate_card_id, sr_no)
        )
        "#,
    )
    .execute(pool)
    .await?;

    create_indexes(pool).await?;

    tracing::info!("Migrations complete");
    Ok(())
}

async fn create_indexes(pool: &PgPool) -> Result<(), DbError> {
    sqlx::query(
        r#"CREATE INDEX IF NOT EXISTS idx_bills_bill_no_c ON bills (bill_no COLLATE "C" DESC)"#,
    )
    .execute(pool)
    .await?;
    sqlx::query(
        "CREATE INDEX IF NOT EXISTS idx_rate_card_items_order ON rate_card_items(rate_card_id, display_order)",
    )
    .execute(pool)
    .await?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    #[ignore = "requires database"]
    async fn migrations_are_idempotent() {
        let url = std::env::var("DATABASE_URL").expect("DATABASE_URL required");
        let pool = crate::db::create_pool(&url).await.expect("pool");
        run(&pool).await.expect("first run");
        run(&pool).await.expect("second run");
    }
}
