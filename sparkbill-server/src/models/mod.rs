//! Wire types, naming translation and input validation
//!
//! Request bodies are rejected by serde before a handler runs when a
//! required field is missing or mistyped. Everything else that can be
//! checked without storage is checked here.

pub mod validation;
pub mod naming;
pub mod bill;
pub mod rate_card;
pub mod words;

pub use validation::ValidationError;
pub use naming::{BillField, RateCardField, RateCardItemField};
pub use bill::{next_bill_number, Bill, BillInput, LineItem, LineItems, NextBillNumber};
pub use rate_card::{
    FieldValue, RateCard, RateCardCreate, RateCardItem, RateCardItemCreate, RateCardItemUpdate,
    RateCardName, RateCardUpdate,
};
pub use words::amount_in_words;
