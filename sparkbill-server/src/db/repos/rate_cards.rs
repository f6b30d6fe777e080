//! Rate card repository
//!
//! Cards are listed with their items in two queries (cards, then all items
//! grouped in memory) - no N+1. Deleting a card relies on
//! `ON DELETE CASCADE` to remove its items atomically.

use std::collections::HashMap;

use once_cell::sync::Lazy;
use sqlx::{FromRow, PgPool, Postgres, QueryBuilder, Transaction};
use uuid::Uuid;

use super::items::{insert_item, ItemRow, ITEM_COLUMNS};
use crate::db::store::NewRateCard;
use crate::db::DbError;
use crate::models::{RateCard, RateCardField, RateCardItem, RateCardUpdate};

static CARD_COLUMNS: Lazy<String> = Lazy::new(RateCardField::column_list);

#[derive(Debug, Clone, FromRow)]
struct RateCardRow {
    id: Uuid,
    name: String,
    created_date: String,
}

impl RateCardRow {
    fn with_items(self, items: Vec<RateCardItem>) -> RateCard {
        RateCard {
            id: self.id,
            name: self.name,
            created_date: self.created_date,
            items,
        }
    }
}

/// Rate card repository
pub struct RateCardRepo<'a> {
    pool: &'a PgPool,
}

impl<'a> RateCardRepo<'a> {
    pub fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// All cards, newest first, each with items in display order.
    pub async fn list(&self) -> Result<Vec<RateCard>, DbError> {
        let sql = format!(
            "SELECT {} FROM rate_cards ORDER BY created_date DESC, name ASC, id ASC",
            *CARD_COLUMNS
        );
        let cards: Vec<RateCardRow> = sqlx::query_as(&sql).fetch_all(self.pool).await?;

        let sql = format!(
            "SELECT {} FROM rate_card_items ORDER BY rate_card_id, display_order, sr_no, id",
            *ITEM_COLUMNS
        );
        let items: Vec<ItemRow> = sqlx::query_as(&sql).fetch_all(self.pool).await?;

        let mut by_card: HashMap<Uuid, Vec<RateCardItem>> = HashMap::new();
        for item in items {
            by_card
                .entry(item.rate_card_id)
                .or_default()
                .push(item.into());
        }

        Ok(cards
            .into_iter()
            .map(|c| {
                let items = by_card.remove(&c.id).unwrap_or_default();
                c.with_items(items)
            })
            .collect())
    }

    pub async fn get(&self, id: Uuid) -> Result<Option<RateCard>, DbError> {
        let sql = format!("SELECT {} FROM rate_cards WHERE id = $1", *CARD_COLUMNS);
        let Some(card) = sqlx::query_as::<_, RateCardRow>(&sql)
            .bind(id)
            .fetch_optional(self.pool)
            .await?
        else {
            return Ok(None);
        };

        let items = super::ItemRepo::new(self.pool).list(id).await?;
        Ok(Some(card.with_items(items)))
    }

    pub async fn exists(&self, id: Uuid) -> Result<bool, DbError> {
        let exists: (bool,) = sqlx::query_as("SELECT EXISTS(SELECT 1 FROM rate_cards WHERE id = $1)")
            .bind(id)
            .fetch_one(self.pool)
            .await?;
        Ok(exists.0)
    }

    /// Create a card together with its initial items (atomic).
    pub async fn create(&self, card: NewRateCard) -> Result<RateCard, DbError> {
        let mut tx = self.pool.begin().await?;
        let created = insert_card(&mut tx, card).await?;
        tx.commit().await?;
        Ok(created)
    }

    /// Create `card` only if no rate card exists yet.
    ///
    /// The emptiness check and the inserts share one transaction. The table
    /// lock conflicts with itself, so concurrent callers run one at a time and
    /// the second sees the first's card.
    pub async fn create_if_empty(&self, card: NewRateCard) -> Result<Option<RateCard>, DbError> {
        let mut tx = self.pool.begin().await?;

        sqlx::query("LOCK TABLE rate_cards IN SHARE ROW EXCLUSIVE MODE")
            .execute(&mut *tx)
            .await?;

        let any: (bool,) = sqlx::query_as("SELECT EXISTS(SELECT 1 FROM rate_cards)")
            .fetch_one(&mut *tx)
            .await?;
        if any.0 {
            return Ok(None);
        }

        let created = insert_card(&mut tx, card).await?;
        tx.commit().await?;
        Ok(Some(created))
    }

    /// Apply a partial update. `None` if no such card.
    pub async fn update(&self, id: Uuid, patch: RateCardUpdate) -> Result<Option<RateCard>, DbError> {
        let changes = patch.changes();
        if changes.is_empty() {
            return self.get(id).await;
        }

        let mut qb = QueryBuilder::<Postgres>::new("UPDATE rate_cards SET ");
        {
            let mut set = qb.separated(", ");
            for (field, value) in changes {
                set.push(field.column());
                set.push_unseparated(" = ");
                set.push_bind_unseparated(value);
            }
        }
        qb.push(" WHERE id = ");
        qb.push_bind(id);

        let updated = qb.build().execute(self.pool).await?;
        if updated.rows_affected() == 0 {
            return Ok(None);
        }
        self.get(id).await
    }

    /// Delete a card and, through the foreign key, all of its items.
    pub async fn delete(&self, id: Uuid) -> Result<bool, DbError> {
        let result = sqlx::query("DELETE FROM rate_cards WHERE id = $1")
            .bind(id)
            .execute(self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}

async fn insert_card(
    tx: &mut Transaction<'_, Postgres>,
    card: NewRateCard,
) -> Result<RateCard, DbError> {
    let sql = format!(
        "INSERT INTO rate_cards ({cols}) VALUES ($1, $2, $3) RETURNING {cols}",
        cols = *CARD_COLUMNS
    );
    let row: RateCardRow = sqlx::query_as(&sql)
        .bind(Uuid::new_v4())
        .bind(card.name.as_str())
        .bind(&card.created_date)
        .fetch_one(&mut **tx)
        .await?;

    let mut items = Vec::with_capacity(card.items.len());
    let mut next_order = 1;
    for item in card.items {
        let display_order = item.display_order.unwrap_or(next_order);
        next_order = next_order.max(display_order.saturating_add(1));
        items.push(insert_item(&mut **tx, row.id, &item, display_order).await?);
    }
    crate::models::rate_card::sort_for_display(&mut items);

    Ok(row.with_items(items))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{RateCardItemCreate, RateCardName};

    fn seed_card(name: &str) -> NewRateCard {
        NewRateCard {
            name: RateCardName::new(name).unwrap(),
            created_date: "2024-01-01".into(),
            items: vec![],
        }
    }

    #[tokio::test]
    #[ignore = "requires database"]
    async fn concurrent_create_if_empty_inserts_once() {
        let url = std::env::var("DATABASE_URL").expect("DATABASE_URL required");
        let pool = crate::db::create_pool(&url).await.expect("pool");
        crate::db::migrations::run(&pool).await.expect("migrations");

        let first = RateCardRepo::new(&pool);
        let second = RateCardRepo::new(&pool);
        let (a, b) = tokio::join!(
            first.create_if_empty(seed_card("Concurrent A")),
            second.create_if_empty(seed_card("Concurrent B")),
        );
        let created: Vec<RateCard> = [a.unwrap(), b.unwrap()].into_iter().flatten().collect();
        assert!(created.len() <= 1, "seeded {} times", created.len());

        for card in created {
            first.delete(card.id).await.unwrap();
        }
    }

    #[tokio::test]
    #[ignore = "requires database"]
    async fn delete_cascades_to_items() {
        let url = std::env::var("DATABASE_URL").expect("DATABASE_URL required");
        let pool = crate::db::create_pool(&url).await.expect("pool");
        crate::db::migrations::run(&pool).await.expect("migrations");

        let repo = RateCardRepo::new(&pool);
        let card = repo
            .create(NewRateCard {
                name: RateCardName::new("Cascade test").unwrap(),
                created_date: "2024-01-01".into(),
                items: vec![RateCardItemCreate {
                    sr_no: 1,
                    description: "Point".into(),
                    labor_work: "₹100".into(),
                    material_specs: "-".into(),
                    rate_with_material: "-".into(),
                    display_order: None,
                }],
            })
            .await
            .expect("create");
        let item_id = card.items[0].id;

        assert!(repo.delete(card.id).await.unwrap());
        let orphan = super::super::ItemRepo::new(&pool)
            .get(card.id, item_id)
            .await
            .unwrap();
        assert!(orphan.is_none());
    }
}
