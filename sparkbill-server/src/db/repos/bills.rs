//! Bill repository
//!
//! Line items live in a JSON column bound as text, so Postgres keeps the
//! submitted bytes (JSONB would reorder keys and renormalise numbers). Ordering
//! by `bill_no` uses the "C" collation so it is byte-wise lexicographic on
//! every server ("9" sorts after "10" ascending, before it descending).

use once_cell::sync::Lazy;
use serde_json::value::RawValue;
use sqlx::types::Json;
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use crate::db::DbError;
use crate::models::{Bill, BillField, BillInput, LineItems};

static BILL_COLUMNS: Lazy<String> = Lazy::new(BillField::column_list);

/// Bill record from database
#[derive(Debug, Clone, FromRow)]
struct BillRow {
    id: Uuid,
    bill_no: String,
    date: String,
    customer_name: String,
    line_items: Json<Box<RawValue>>,
    total: f64,
    amount_in_words: String,
}

impl From<BillRow> for Bill {
    fn from(r: BillRow) -> Self {
        Self {
            id: r.id,
            bill_no: r.bill_no,
            date: r.date,
            customer_name: r.customer_name,
            line_items: LineItems::from_raw_unchecked(r.line_items.0),
            total: r.total,
            amount_in_words: r.amount_in_words,
        }
    }
}

/// Bill repository
pub struct BillRepo<'a> {
    pool: &'a PgPool,
}

impl<'a> BillRepo<'a> {
    pub fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// All bills, `bill_no` descending.
    pub async fn list(&self) -> Result<Vec<Bill>, DbError> {
        let sql = format!(
            r#"SELECT {} FROM bills ORDER BY bill_no COLLATE "C" DESC"#,
            *BILL_COLUMNS
        );
        let rows: Vec<BillRow> = sqlx::query_as(&sql).fetch_all(self.pool).await?;
        Ok(rows.into_iter().map(Bill::from).collect())
    }

    /// The lexicographically greatest bill number, if any bill exists.
    pub async fn greatest_bill_no(&self) -> Result<Option<String>, DbError> {
        let row: Option<(String,)> =
            sqlx::query_as(r#"SELECT bill_no FROM bills ORDER BY bill_no COLLATE "C" DESC LIMIT 1"#)
                .fetch_optional(self.pool)
                .await?;
        Ok(row.map(|r| r.0))
    }

    pub async fn get(&self, id: Uuid) -> Result<Option<Bill>, DbError> {
        let sql = format!("SELECT {} FROM bills WHERE id = $1", *BILL_COLUMNS);
        let row: Option<BillRow> = sqlx::query_as(&sql)
            .bind(id)
            .fetch_optional(self.pool)
            .await?;
        Ok(row.map(Bill::from))
    }

    /// Insert a new bill. A duplicate `bill_no` fails on the unique constraint.
    pub async fn create(&self, input: BillInput) -> Result<Bill, DbError> {
        let sql = format!(
            "INSERT INTO bills ({cols}) VALUES ($1, $2, $3, $4, $5::json, $6, $7) RETURNING {cols}",
            cols = *BILL_COLUMNS
        );
        let row: BillRow = sqlx::query_as(&sql)
            .bind(Uuid::new_v4())
            .bind(&input.bill_no)
            .bind(&input.date)
            .bind(&input.customer_name)
            .bind(input.line_items.get())
            .bind(input.total)
            .bind(&input.amount_in_words)
            .fetch_one(self.pool)
            .await?;
        Ok(row.into())
    }

    /// Replace every field of an existing bill. `None` if no such bill.
    pub async fn replace(&self, id: Uuid, input: BillInput) -> Result<Option<Bill>, DbError> {
        let sql = format!(
            "UPDATE bills SET {} = $2, {} = $3, {} = $4, {} = $5::json, {} = $6, {} = $7 \
             WHERE id = $1 RETURNING {}",
            BillField::BillNo.column(),
            BillField::Date.column(),
            BillField::CustomerName.column(),
            BillField::LineItems.column(),
            BillField::Total.column(),
            BillField::AmountInWords.column(),
            *BILL_COLUMNS
        );
        let row: Option<BillRow> = sqlx::query_as(&sql)
            .bind(id)
            .bind(&input.bill_no)
            .bind(&input.date)
            .bind(&input.customer_name)
            .bind(input.line_items.get())
            .bind(input.total)
            .bind(&input.amount_in_words)
            .fetch_optional(self.pool)
            .await?;
        Ok(row.map(Bill::from))
    }

    /// Delete by id. Returns whether a row was removed.
    pub async fn delete(&self, id: Uuid) -> Result<bool, DbError> {
        let result = sqlx::query("DELETE FROM bills WHERE id = $1")
            .bind(id)
            .execute(self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn pool() -> PgPool {
        let url = std::env::var("DATABASE_URL").expect("DATABASE_URL required");
        let pool = crate::db::create_pool(&url).await.expect("pool");
        crate::db::migrations::run(&pool).await.expect("migrations");
        pool
    }

    fn input(bill_no: &str) -> BillInput {
        BillInput {
            bill_no: bill_no.to_owned(),
            date: "2024-03-01".into(),
            customer_name: "Repo Test".into(),
            line_items: LineItems::from_json("[]").unwrap(),
            total: 0.0,
            amount_in_words: "Zero Rupees Only".into(),
        }
    }

    #[tokio::test]
    #[ignore = "requires database"]
    async fn duplicate_bill_no_is_rejected() {
        let pool = pool().await;
        let repo = BillRepo::new(&pool);
        let bill_no = format!("repo-{}", Uuid::new_v4());

        let first = repo.create(input(&bill_no)).await.expect("first insert");
        let err = repo.create(input(&bill_no)).await.unwrap_err();
        assert!(err.to_string().contains("duplicate key"));

        assert!(repo.delete(first.id).await.unwrap());
    }

    #[tokio::test]
    #[ignore = "requires database"]
    async fn list_orders_bill_numbers_bytewise() {
        let pool = pool().await;
        let repo = BillRepo::new(&pool);
        let tag = Uuid::new_v4();
        let nine = repo.create(input(&format!("9-{tag}"))).await.unwrap();
        let ten = repo.create(input(&format!("10-{tag}"))).await.unwrap();

        let listed = repo.list().await.unwrap();
        let pos = |id: Uuid| listed.iter().position(|b| b.id == id).unwrap();
        assert!(pos(nine.id) < pos(ten.id), "\"9\" sorts above \"10\" descending");

        repo.delete(nine.id).await.unwrap();
        repo.delete(ten.id).await.unwrap();
    }

    #[tokio::test]
    #[ignore = "requires database"]
    async fn greatest_bill_no_uses_byte_order() {
        let pool = pool().await;
        let repo = BillRepo::new(&pool);
        // '~' is the highest printable ASCII byte, above every letter and digit
        let top = format!("~~~{}", Uuid::new_v4());
        let bill = repo.create(input(&top)).await.unwrap();

        assert_eq!(repo.greatest_bill_no().await.unwrap(), Some(top));

        repo.delete(bill.id).await.unwrap();
    }

    #[tokio::test]
    #[ignore = "requires database"]
    async fn line_items_survive_storage_verbatim() {
        let pool = pool().await;
        let repo = BillRepo::new(&pool);
        let raw = r#"[{"description":"Wiring","srNo":1, "qty":2,"rate":150.50,"amount":301.00,"unit":"m"}]"#;
        let mut bill = input(&format!("repo-{}", Uuid::new_v4()));
        bill.line_items = LineItems::from_json(raw).unwrap();

        let created = repo.create(bill.clone()).await.unwrap();
        assert_eq!(created.line_items.get(), raw);
        let fetched = repo.get(created.id).await.unwrap().unwrap();
        assert_eq!(fetched.line_items.get(), raw);

        let replaced_raw = r#"[{"srNo":2,"amount":10.0,"description":"Socket","qty":1,"rate":10.0}]"#;
        bill.line_items = LineItems::from_json(replaced_raw).unwrap();
        let replaced = repo.replace(created.id, bill).await.unwrap().unwrap();
        assert_eq!(replaced.line_items.get(), replaced_raw);

        repo.delete(created.id).await.unwrap();
    }
}
