//! In-process store
//!
//! Mirrors the PostgreSQL constraints: unique `bill_no`, unique `sr_no` per
//! card, cascade delete of items, byte-wise `bill_no` ordering. The lock is
//! only held for the synchronous body of each call.

use std::collections::{BTreeMap, HashMap};
use std::sync::{Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;
use uuid::Uuid;

use super::store::{BillStore, NewRateCard, RateCardStore};
use super::DbError;
use crate::models::rate_card::sort_for_display;
use crate::models::{
    Bill, BillInput, RateCard, RateCardItem, RateCardItemCreate, RateCardItemUpdate,
    RateCardUpdate,
};

const BILL_NO_CONSTRAINT: &str = "bills_bill_no_key";
const SR_NO_CONSTRAINT: &str = "rate_card_items_rate_card_id_sr_no_key";

#[derive(Debug, Clone)]
struct CardRow {
    id: Uuid,
    name: String,
    created_date: String,
}

#[derive(Debug, Default)]
struct Tables {
    bills: HashMap<Uuid, Bill>,
    rate_cards: HashMap<Uuid, CardRow>,
    items: BTreeMap<i32, RateCardItem>,
    last_item_id: i32,
}

impl Tables {
    fn bill_no_taken(&self, bill_no: &str, except: Option<Uuid>) -> bool {
        self.bills
            .values()
            .any(|b| b.bill_no == bill_no && Some(b.id) != except)
    }

    fn sr_no_taken(&self, rate_card_id: Uuid, sr_no: i32, except: Option<i32>) -> bool {
        self.items.values().any(|i| {
            i.rate_card_id == rate_card_id && i.sr_no == sr_no && Some(i.id) != except
        })
    }

    fn items_of(&self, rate_card_id: Uuid) -> Vec<RateCardItem> {
        let mut items: Vec<RateCardItem> = self
            .items
            .values()
            .filter(|i| i.rate_card_id == rate_card_id)
            .cloned()
            .collect();
        sort_for_display(&mut items);
        items
    }

    fn card(&self, id: Uuid) -> Option<RateCard> {
        self.rate_cards.get(&id).map(|c| RateCard {
            id: c.id,
            name: c.name.clone(),
            created_date: c.created_date.clone(),
            items: self.items_of(c.id),
        })
    }

    fn insert_item(
        &mut self,
        rate_card_id: Uuid,
        item: &RateCardItemCreate,
        display_order: i32,
    ) -> Result<RateCardItem, DbError> {
        if self.sr_no_taken(rate_card_id, item.sr_no, None) {
            return Err(DbError::UniqueViolation {
                constraint: SR_NO_CONSTRAINT,
            });
        }
        self.last_item_id += 1;
        let created = RateCardItem {
            id: self.last_item_id,
            rate_card_id,
            sr_no: item.sr_no,
            description: item.description.clone(),
            labor_work: item.labor_work.clone(),
            material_specs: item.material_specs.clone(),
            rate_with_material: item.rate_with_material.clone(),
            display_order,
        };
        self.items.insert(created.id, created.clone());
        Ok(created)
    }

    /// Insert a card and its items, all or nothing.
    fn insert_card(&mut self, card: NewRateCard) -> Result<RateCard, DbError> {
        let mut seen = Vec::with_capacity(card.items.len());
        for item in &card.items {
            if seen.contains(&item.sr_no) {
                return Err(DbError::UniqueViolation {
                    constraint: SR_NO_CONSTRAINT,
                });
            }
            seen.push(item.sr_no);
        }

        let row = CardRow {
            id: Uuid::new_v4(),
            name: card.name.into_string(),
            created_date: card.created_date,
        };
        self.rate_cards.insert(row.id, row.clone());

        let mut items = Vec::with_capacity(card.items.len());
        let mut next_order = 1;
        for item in &card.items {
            let display_order = item.display_order.unwrap_or(next_order);
            next_order = next_order.max(display_order.saturating_add(1));
            items.push(self.insert_item(row.id, item, display_order)?);
        }
        sort_for_display(&mut items);

        Ok(RateCard {
            id: row.id,
            name: row.name,
            created_date: row.created_date,
            items,
        })
    }
}

/// Store kept entirely in memory
#[derive(Debug, Default)]
pub struct MemoryStore {
    tables: Mutex<Tables>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn tables(&self) -> MutexGuard<'_, Tables> {
        self.tables.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Number of stored rate card items across all cards
    pub fn item_count(&self) -> usize {
        self.tables().items.len()
    }
}

#[async_trait]
impl BillStore for MemoryStore {
    async fn list_bills(&self) -> Result<Vec<Bill>, DbError> {
        let mut bills: Vec<Bill> = self.tables().bills.values().cloned().collect();
        bills.sort_by(|a, b| b.bill_no.cmp(&a.bill_no));
        Ok(bills)
    }

    async fn greatest_bill_no(&self) -> Result<Option<String>, DbError> {
        Ok(self
            .tables()
            .bills
            .values()
            .map(|b| b.bill_no.as_str())
            .max()
            .map(str::to_owned))
    }

    async fn get_bill(&self, id: Uuid) -> Result<Option<Bill>, DbError> {
        Ok(self.tables().bills.get(&id).cloned())
    }

    async fn create_bill(&self, input: BillInput) -> Result<Bill, DbError> {
        let mut tables = self.tables();
        if tables.bill_no_taken(&input.bill_no, None) {
            return Err(DbError::UniqueViolation {
                constraint: BILL_NO_CONSTRAINT,
            });
        }
        let bill = input.into_bill(Uuid::new_v4());
        tables.bills.insert(bill.id, bill.clone());
        Ok(bill)
    }

    async fn replace_bill(&self, id: Uuid, input: BillInput) -> Result<Option<Bill>, DbError> {
        let mut tables = self.tables();
        if !tables.bills.contains_key(&id) {
            return Ok(None);
        }
        if tables.bill_no_taken(&input.bill_no, Some(id)) {
            return Err(DbError::UniqueViolation {
                constraint: BILL_NO_CONSTRAINT,
            });
        }
        let bill = input.into_bill(id);
        tables.bills.insert(id, bill.clone());
        Ok(Some(bill))
    }

    async fn delete_bill(&self, id: Uuid) -> Result<bool, DbError> {
        Ok(self.tables().bills.remove(&id).is_some())
    }
}

#[async_trait]
impl RateCardStore for MemoryStore {
    async fn list_rate_cards(&self) -> Result<Vec<RateCard>, DbError> {
        let tables = self.tables();
        let mut rows: Vec<&CardRow> = tables.rate_cards.values().collect();
        rows.sort_by(|a, b| {
            b.created_date
                .cmp(&a.created_date)
                .then_with(|| a.name.cmp(&b.name))
                .then_with(|| a.id.cmp(&b.id))
        });
        Ok(rows.into_iter().filter_map(|r| tables.card(r.id)).collect())
    }

    async fn get_rate_card(&self, id: Uuid) -> Result<Option<RateCard>, DbError> {
        Ok(self.tables().card(id))
    }

    async fn rate_card_exists(&self, id: Uuid) -> Result<bool, DbError> {
        Ok(self.tables().rate_cards.contains_key(&id))
    }

    async fn create_rate_card(&self, card: NewRateCard) -> Result<RateCard, DbError> {
        self.tables().insert_card(card)
    }

    async fn seed_rate_card(&self, card: NewRateCard) -> Result<Option<RateCard>, DbError> {
        let mut tables = self.tables();
        if !tables.rate_cards.is_empty() {
            return Ok(None);
        }
        tables.insert_card(card).map(Some)
    }

    async fn update_rate_card(
        &self,
        id: Uuid,
        patch: RateCardUpdate,
    ) -> Result<Option<RateCard>, DbError> {
        let mut tables = self.tables();
        let Some(row) = tables.rate_cards.get_mut(&id) else {
            return Ok(None);
        };
        if let Some(name) = patch.name {
            row.name = name;
        }
        if let Some(created_date) = patch.created_date {
            row.created_date = created_date;
        }
        Ok(tables.card(id))
    }

    async fn delete_rate_card(&self, id: Uuid) -> Result<bool, DbError> {
        let mut tables = self.tables();
        if tables.rate_cards.remove(&id).is_none() {
            return Ok(false);
        }
        tables.items.retain(|_, i| i.rate_card_id != id);
        Ok(true)
    }

    async fn list_items(&self, rate_card_id: Uuid) -> Result<Vec<RateCardItem>, DbError> {
        Ok(self.tables().items_of(rate_card_id))
    }

    async fn get_item(&self, rate_card_id: Uuid, id: i32) -> Result<Option<RateCardItem>, DbError> {
        Ok(self
            .tables()
            .items
            .get(&id)
            .filter(|i| i.rate_card_id == rate_card_id)
            .cloned())
    }

    async fn create_item(
        &self,
        rate_card_id: Uuid,
        item: RateCardItemCreate,
    ) -> Result<RateCardItem, DbError> {
        let mut tables = self.tables();
        if !tables.rate_cards.contains_key(&rate_card_id) {
            return Err(DbError::NotFound {
                resource: "rate card",
                id: rate_card_id.to_string(),
            });
        }
        let display_order = match item.display_order {
            Some(order) => order,
            None => tables
                .items
                .values()
                .filter(|i| i.rate_card_id == rate_card_id)
                .map(|i| i.display_order)
                .max()
                .map_or(1, |m| m.saturating_add(1)),
        };
        tables.insert_item(rate_card_id, &item, display_order)
    }

    async fn update_item(
        &self,
        rate_card_id: Uuid,
        id: i32,
        patch: RateCardItemUpdate,
    ) -> Result<Option<RateCardItem>, DbError> {
        let mut tables = self.tables();
        let Some(current) = tables
            .items
            .get(&id)
            .filter(|i| i.rate_card_id == rate_card_id)
            .cloned()
        else {
            return Ok(None);
        };

        let mut updated = current;
        patch.apply(&mut updated);
        if tables.sr_no_taken(rate_card_id, updated.sr_no, Some(id)) {
            return Err(DbError::UniqueViolation {
                constraint: SR_NO_CONSTRAINT,
            });
        }
        tables.items.insert(id, updated.clone());
        Ok(Some(updated))
    }

    async fn delete_item(&self, rate_card_id: Uuid, id: i32) -> Result<bool, DbError> {
        let mut tables = self.tables();
        let owned = tables
            .items
            .get(&id)
            .is_some_and(|i| i.rate_card_id == rate_card_id);
        if owned {
            tables.items.remove(&id);
        }
        Ok(owned)
    }
}
