//! Rate card item repository
//!
//! Every query is scoped by `rate_card_id`, so an item id that belongs to
//! another card behaves like a missing item.

use once_cell::sync::Lazy;
use sqlx::{FromRow, PgConnection, PgPool, Postgres, QueryBuilder};
use uuid::Uuid;

use crate::db::DbError;
use crate::models::{FieldValue, RateCardItem, RateCardItemCreate, RateCardItemField, RateCardItemUpdate};

pub(super) static ITEM_COLUMNS: Lazy<String> = Lazy::new(RateCardItemField::column_list);

#[derive(Debug, Clone, FromRow)]
pub(super) struct ItemRow {
    pub id: i32,
    pub rate_card_id: Uuid,
    pub sr_no: i32,
    pub description: String,
    pub labor_work: String,
    pub material_specs: String,
    pub rate_with_material: String,
    pub display_order: i32,
}

impl From<ItemRow> for RateCardItem {
    fn from(r: ItemRow) -> Self {
        Self {
            id: r.id,
            rate_card_id: r.rate_card_id,
            sr_no: r.sr_no,
            description: r.description,
            labor_work: r.labor_work,
            material_specs: r.material_specs,
            rate_with_material: r.rate_with_material,
            display_order: r.display_order,
        }
    }
}

/// Insert one item with an explicit display order
pub(super) async fn insert_item(
    conn: &mut PgConnection,
    rate_card_id: Uuid,
    item: &RateCardItemCreate,
    display_order: i32,
) -> Result<RateCardItem, DbError> {
    let sql = format!(
        "INSERT INTO rate_card_items \
         (rate_card_id, sr_no, description, labor_work, material_specs, rate_with_material, display_order) \
         VALUES ($1, $2, $3, $4, $5, $6, $7) RETURNING {}",
        *ITEM_COLUMNS
    );
    let row: ItemRow = sqlx::query_as(&sql)
        .bind(rate_card_id)
        .bind(item.sr_no)
        .bind(&item.description)
        .bind(&item.labor_work)
        .bind(&item.material_specs)
        .bind(&item.rate_with_material)
        .bind(display_order)
        .fetch_one(conn)
        .await?;
    Ok(row.into())
}

/// Rate card item repository
pub struct ItemRepo<'a> {
    pool: &'a PgPool,
}

impl<'a> ItemRepo<'a> {
    pub fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Items of one card in display order.
    pub async fn list(&self, rate_card_id: Uuid) -> Result<Vec<RateCardItem>, DbError> {
        let sql = format!(
            "SELECT {} FROM rate_card_items WHERE rate_card_id = $1 \
             ORDER BY display_order, sr_no, id",
            *ITEM_COLUMNS
        );
        let rows: Vec<ItemRow> = sqlx::query_as(&sql)
            .bind(rate_card_id)
            .fetch_all(self.pool)
            .await?;
        Ok(rows.into_iter().map(RateCardItem::from).collect())
    }

    pub async fn get(&self, rate_card_id: Uuid, id: i32) -> Result<Option<RateCardItem>, DbError> {
        let sql = format!(
            "SELECT {} FROM rate_card_items WHERE id = $1 AND rate_card_id = $2",
            *ITEM_COLUMNS
        );
        let row: Option<ItemRow> = sqlx::query_as(&sql)
            .bind(id)
            .bind(rate_card_id)
            .fetch_optional(self.pool)
            .await?;
        Ok(row.map(RateCardItem::from))
    }

    /// Create an item under an existing card.
    ///
    /// The parent check and the insert run in one transaction. A missing
    /// `display_order` lands after the card's current last item.
    pub async fn create(
        &self,
        rate_card_id: Uuid,
        item: RateCardItemCreate,
    ) -> Result<RateCardItem, DbError> {
        let mut tx = self.pool.begin().await?;

        let card_exists: (bool,) =
            sqlx::query_as("SELECT EXISTS(SELECT 1 FROM rate_cards WHERE id = $1)")
                .bind(rate_card_id)
                .fetch_one(&mut *tx)
                .await?;
        if !card_exists.0 {
            return Err(DbError::NotFound {
                resource: "rate card",
                id: rate_card_id.to_string(),
            });
        }

        let display_order = match item.display_order {
            Some(order) => order,
            None => {
                let max: (Option<i32>,) = sqlx::query_as(
                    "SELECT MAX(display_order) FROM rate_card_items WHERE rate_card_id = $1",
                )
                .bind(rate_card_id)
                .fetch_one(&mut *tx)
                .await?;
                max.0.map_or(1, |m| m.saturating_add(1))
            }
        };

        let created = insert_item(&mut tx, rate_card_id, &item, display_order).await?;
        tx.commit().await?;
        Ok(created)
    }

    /// Apply only the fields present in `patch`. `None` if no such item.
    pub async fn update(
        &self,
        rate_card_id: Uuid,
        id: i32,
        patch: RateCardItemUpdate,
    ) -> Result<Option<RateCardItem>, DbError> {
        let changes = patch.changes();
        if changes.is_empty() {
            return self.get(rate_card_id, id).await;
        }

        let mut qb = QueryBuilder::<Postgres>::new("UPDATE rate_card_items SET ");
        {
            let mut set = qb.separated(", ");
            for (field, value) in changes {
                set.push(field.column());
                set.push_unseparated(" = ");
                match value {
                    FieldValue::Int(v) => set.push_bind_unseparated(v),
                    FieldValue::Text(v) => set.push_bind_unseparated(v),
                };
            }
        }
        qb.push(" WHERE id = ");
        qb.push_bind(id);
        qb.push(" AND rate_card_id = ");
        qb.push_bind(rate_card_id);
        qb.push(" RETURNING ");
        qb.push(ITEM_COLUMNS.as_str());

        let row = qb
            .build_query_as::<ItemRow>()
            .fetch_optional(self.pool)
            .await?;
        Ok(row.map(RateCardItem::from))
    }

    pub async fn delete(&self, rate_card_id: Uuid, id: i32) -> Result<bool, DbError> {
        let result = sqlx::query("DELETE FROM rate_card_items WHERE id = $1 AND rate_card_id = $2")
            .bind(id)
            .bind(rate_card_id)
            .execute(self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}

#[cfg(test)]
mod tests {
    #[tokio::test]
    #[ignore = "requires database"]
    async fn partial_update_touches_only_given_columns() {
        use super::*;
        use crate::db::repos::RateCardRepo;
        use crate::db::store::NewRateCard;
        use crate::models::RateCardName;

        let url = std::env::var("DATABASE_URL").expect("DATABASE_URL required");
        let pool = crate::db::create_pool(&url).await.expect("pool");
        crate::db::migrations::run(&pool).await.expect("migrations");

        let card = RateCardRepo::new(&pool)
            .create(NewRateCard {
                name: RateCardName::new("Patch test").unwrap(),
                created_date: "2024-01-01".into(),
                items: vec![],
            })
            .await
            .unwrap();

        let repo = ItemRepo::new(&pool);
        let item = repo
            .create(
                card.id,
                RateCardItemCreate {
                    sr_no: 1,
                    description: "Point".into(),
                    labor_work: "₹100".into(),
                    material_specs: "-".into(),
                    rate_with_material: "-".into(),
                    display_order: None,
                },
            )
            .await
            .unwrap();
        assert_eq!(item.display_order, 1);

        let patch = RateCardItemUpdate {
            display_order: Some(7),
            ..Default::default()
        };
        let updated = repo.update(card.id, item.id, patch).await.unwrap().unwrap();
        assert_eq!(updated.display_order, 7);
        assert_eq!(updated.description, item.description);

        RateCardRepo::new(&pool).delete(card.id).await.unwrap();
    }
}
