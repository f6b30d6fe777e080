//! Bill payloads and the next-bill-number rule

use std::fmt;

use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::value::RawValue;
use serde_json::Number;
use uuid::Uuid;

/// Shape every entry of `lineItems` must have.
///
/// Only used to validate incoming payloads; the stored text is [`LineItems`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LineItem {
    pub sr_no: i64,
    pub description: String,
    pub qty: Number,
    pub rate: Number,
    pub amount: Number,
}

/// The `lineItems` array exactly as the client sent it.
///
/// Deserializing checks that the text is an array of [`LineItem`], then keeps
/// the original bytes so key order, number formatting and extra keys survive.
#[derive(Clone)]
pub struct LineItems(Box<RawValue>);

impl LineItems {
    /// Validate `json` as a line-item array and keep it verbatim.
    pub fn from_json(json: impl Into<String>) -> Result<Self, serde_json::Error> {
        let raw = RawValue::from_string(json.into())?;
        Self::validated(raw)
    }

    /// Wrap text that was validated before it was stored.
    pub(crate) fn from_raw_unchecked(raw: Box<RawValue>) -> Self {
        Self(raw)
    }

    fn validated(raw: Box<RawValue>) -> Result<Self, serde_json::Error> {
        serde_json::from_str::<Vec<LineItem>>(raw.get())?;
        Ok(Self(raw))
    }

    /// The stored JSON text
    pub fn get(&self) -> &str {
        self.0.get()
    }
}

impl fmt::Debug for LineItems {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("LineItems").field(&self.get()).finish()
    }
}

impl PartialEq for LineItems {
    fn eq(&self, other: &Self) -> bool {
        self.get() == other.get()
    }
}

impl Serialize for LineItems {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.0.serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for LineItems {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = Box::<RawValue>::deserialize(deserializer)?;
        Self::validated(raw).map_err(D::Error::custom)
    }
}

/// Bill as stored and returned
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Bill {
    pub id: Uuid,
    pub bill_no: String,
    pub date: String,
    pub customer_name: String,
    pub line_items: LineItems,
    pub total: f64,
    pub amount_in_words: String,
}

/// Body of `POST /api/bills` and `PUT /api/bills/{id}`.
///
/// Updates are full replacements, so both share every required field. The
/// caller is trusted: `total` and each `amount` are stored as given.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BillInput {
    pub bill_no: String,
    pub date: String,
    pub customer_name: String,
    pub line_items: LineItems,
    pub total: f64,
    pub amount_in_words: String,
}

impl BillInput {
    pub fn into_bill(self, id: Uuid) -> Bill {
        Bill {
            id,
            bill_no: self.bill_no,
            date: self.date,
            customer_name: self.customer_name,
            line_items: self.line_items,
            total: self.total,
            amount_in_words: self.amount_in_words,
        }
    }
}

/// Response of `GET /api/bills-next-number`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NextBillNumber {
    pub next_number: String,
}

/// Propose the number after `latest`, the lexicographically greatest bill
/// number on record.
///
/// No bills, or a greatest number that is not an integer, restarts at "1".
/// The result is not zero-padded: "007" becomes "8".
pub fn next_bill_number(latest: Option<&str>) -> String {
    latest
        .and_then(|no| no.trim().parse::<i64>().ok())
        .and_then(|n| n.checked_add(1))
        .map(|n| n.to_string())
        .unwrap_or_else(|| "1".to_string())
}
