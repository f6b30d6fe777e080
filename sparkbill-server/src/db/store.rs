//! Storage traits used by the HTTP layer
//!
//! [`PgStore`] is the production backend; [`crate::db::MemoryStore`] keeps
//! the same semantics in process for tests and database-less development.

use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use super::repos::{BillRepo, ItemRepo, RateCardRepo};
use super::DbError;
use crate::models::{
    Bill, BillInput, RateCard, RateCardItem, RateCardItemCreate, RateCardItemUpdate,
    RateCardName, RateCardUpdate,
};

/// A rate card ready to insert
#[derive(Debug, Clone)]
pub struct NewRateCard {
    pub name: RateCardName,
    pub created_date: String,
    pub items: Vec<RateCardItemCreate>,
}

#[async_trait]
pub trait BillStore: Send + Sync {
    /// All bills, `bill_no` descending (byte-wise)
    async fn list_bills(&self) -> Result<Vec<Bill>, DbError>;

    /// Greatest `bill_no` in the same ordering as `list_bills`
    async fn greatest_bill_no(&self) -> Result<Option<String>, DbError>;

    async fn get_bill(&self, id: Uuid) -> Result<Option<Bill>, DbError>;

    async fn create_bill(&self, input: BillInput) -> Result<Bill, DbError>;

    /// Full replacement; `None` if the bill does not exist
    async fn replace_bill(&self, id: Uuid, input: BillInput) -> Result<Option<Bill>, DbError>;

    /// `false` if the bill does not exist
    async fn delete_bill(&self, id: Uuid) -> Result<bool, DbError>;
}

#[async_trait]
pub trait RateCardStore: Send + Sync {
    async fn list_rate_cards(&self) -> Result<Vec<RateCard>, DbError>;

    async fn get_rate_card(&self, id: Uuid) -> Result<Option<RateCard>, DbError>;

    async fn rate_card_exists(&self, id: Uuid) -> Result<bool, DbError>;

    async fn create_rate_card(&self, card: NewRateCard) -> Result<RateCard, DbError>;

    /// Insert `card` only when no rate card exists; `None` when skipped
    async fn seed_rate_card(&self, card: NewRateCard) -> Result<Option<RateCard>, DbError>;

    async fn update_rate_card(
        &self,
        id: Uuid,
        patch: RateCardUpdate,
    ) -> Result<Option<RateCard>, DbError>;

    /// Removes the card and all of its items
    async fn delete_rate_card(&self, id: Uuid) -> Result<bool, DbError>;

    async fn list_items(&self, rate_card_id: Uuid) -> Result<Vec<RateCardItem>, DbError>;

    async fn get_item(&self, rate_card_id: Uuid, id: i32) -> Result<Option<RateCardItem>, DbError>;

    /// Fails with [`DbError::NotFound`] if the card does not exist
    async fn create_item(
        &self,
        rate_card_id: Uuid,
        item: RateCardItemCreate,
    ) -> Result<RateCardItem, DbError>;

    async fn update_item(
        &self,
        rate_card_id: Uuid,
        id: i32,
        patch: RateCardItemUpdate,
    ) -> Result<Option<RateCardItem>, DbError>;

    async fn delete_item(&self, rate_card_id: Uuid, id: i32) -> Result<bool, DbError>;
}

/// Everything the HTTP layer needs
pub trait Store: BillStore + RateCardStore {}

impl<T: BillStore + RateCardStore> Store for T {}

/// PostgreSQL-backed store
#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl BillStore for PgStore {
    async fn list_bills(&self) -> Result<Vec<Bill>, DbError> {
        BillRepo::new(&self.pool).list().await
    }

    async fn greatest_bill_no(&self) -> Result<Option<String>, DbError> {
        BillRepo::new(&self.pool).greatest_bill_no().await
    }

    async fn get_bill(&self, id: Uuid) -> Result<Option<Bill>, DbError> {
        BillRepo::new(&self.pool).get(id).await
    }

    async fn create_bill(&self, input: BillInput) -> Result<Bill, DbError> {
        BillRepo::new(&self.pool).create(input).await
    }

    async fn replace_bill(&self, id: Uuid, input: BillInput) -> Result<Option<Bill>, DbError> {
        BillRepo::new(&self.pool).replace(id, input).await
    }

    async fn delete_bill(&self, id: Uuid) -> Result<bool, DbError> {
        BillRepo::new(&self.pool).delete(id).await
    }
}

#[async_trait]
impl RateCardStore for PgStore {
    async fn list_rate_cards(&self) -> Result<Vec<RateCard>, DbError> {
        RateCardRepo::new(&self.pool).list().await
    }

    async fn get_rate_card(&self, id: Uuid) -> Result<Option<RateCard>, DbError> {
        RateCardRepo::new(&self.pool).get(id).await
    }

    async fn rate_card_exists(&self, id: Uuid) -> Result<bool, DbError> {
        RateCardRepo::new(&self.pool).exists(id).await
    }

    async fn create_rate_card(&self, card: NewRateCard) -> Result<RateCard, DbError> {
        RateCardRepo::new(&self.pool).create(card).await
    }

    async fn seed_rate_card(&self, card: NewRateCard) -> Result<Option<RateCard>, DbError> {
        RateCardRepo::new(&self.pool).create_if_empty(card).await
    }

    async fn update_rate_card(
        &self,
        id: Uuid,
        patch: RateCardUpdate,
    ) -> Result<Option<RateCard>, DbError> {
        RateCardRepo::new(&self.pool).update(id, patch).await
    }

    async fn delete_rate_card(&self, id: Uuid) -> Result<bool, DbError> {
        RateCardRepo::new(&self.pool).delete(id).await
    }

    async fn list_items(&self, rate_card_id: Uuid) -> Result<Vec<RateCardItem>, DbError> {
        ItemRepo::new(&self.pool).list(rate_card_id).await
    }

    async fn get_item(&self, rate_card_id: Uuid, id: i32) -> Result<Option<RateCardItem>, DbError> {
        ItemRepo::new(&self.pool).get(rate_card_id, id).await
    }

    async fn create_item(
        &self,
        rate_card_id: Uuid,
        item: RateCardItemCreate,
    ) -> Result<RateCardItem, DbError> {
        ItemRepo::new(&self.pool).create(rate_card_id, item).await
    }

    async fn update_item(
        &self,
        rate_card_id: Uuid,
        id: i32,
        patch: RateCardItemUpdate,
    ) -> Result<Option<RateCardItem>, DbError> {
        ItemRepo::new(&self.pool).update(rate_card_id, id, patch).await
    }

    async fn delete_item(&self, rate_card_id: Uuid, id: i32) -> Result<bool, DbError> {
        ItemRepo::new(&self.pool).delete(rate_card_id, id).await
    }
}
