//! Rate cards and their ordered items

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::naming::{RateCardField, RateCardItemField};
use super::ValidationError;

/// Maximum length for rate card names
const MAX_RATE_CARD_NAME_LEN: usize = 200;

/// One priced service entry of a rate card.
///
/// Cost fields are free text ("₹250", "-", "Quoted Separately").
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RateCardItem {
    pub id: i32,
    pub rate_card_id: Uuid,
    pub sr_no: i32,
    pub description: String,
    pub labor_work: String,
    pub material_specs: String,
    pub rate_with_material: String,
    pub display_order: i32,
}

/// A named, dated price list
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RateCard {
    pub id: Uuid,
    pub name: String,
    pub created_date: String,
    pub items: Vec<RateCardItem>,
}

/// Body of `POST /api/rate-cards/{id}/items`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RateCardItemCreate {
    pub sr_no: i32,
    pub description: String,
    pub labor_work: String,
    pub material_specs: String,
    pub rate_with_material: String,
    /// Defaults to one past the card's current maximum
    #[serde(default)]
    pub display_order: Option<i32>,
}

/// Body of `PUT /api/rate-cards/{id}/items/{itemId}`.
///
/// Absent and `null` fields are left unchanged.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RateCardItemUpdate {
    #[serde(default)]
    pub sr_no: Option<i32>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub labor_work: Option<String>,
    #[serde(default)]
    pub material_specs: Option<String>,
    #[serde(default)]
    pub rate_with_material: Option<String>,
    #[serde(default)]
    pub display_order: Option<i32>,
}

/// Value assigned to a single column by a partial update
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    Int(i32),
    Text(String),
}

impl RateCardItemUpdate {
    /// Fields present in the patch, keyed by their mapping entry.
    pub fn changes(&self) -> Vec<(RateCardItemField, FieldValue)> {
        let ints = [
            (RateCardItemField::SrNo, self.sr_no),
            (RateCardItemField::DisplayOrder, self.display_order),
        ];
        let texts = [
            (RateCardItemField::Description, &self.description),
            (RateCardItemField::LaborWork, &self.labor_work),
            (RateCardItemField::MaterialSpecs, &self.material_specs),
            (RateCardItemField::RateWithMaterial, &self.rate_with_material),
        ];

        ints.into_iter()
            .filter_map(|(field, v)| v.map(|v| (field, FieldValue::Int(v))))
            .chain(
                texts
                    .into_iter()
                    .filter_map(|(field, v)| v.clone().map(|v| (field, FieldValue::Text(v)))),
            )
            .collect()
    }

    /// Apply the patch to an in-memory item
    pub fn apply(&self, item: &mut RateCardItem) {
        for (field, value) in self.changes() {
            match (field, value) {
                (RateCardItemField::SrNo, FieldValue::Int(v)) => item.sr_no = v,
                (RateCardItemField::DisplayOrder, FieldValue::Int(v)) => item.display_order = v,
                (RateCardItemField::Description, FieldValue::Text(v)) => item.description = v,
                (RateCardItemField::LaborWork, FieldValue::Text(v)) => item.labor_work = v,
                (RateCardItemField::MaterialSpecs, FieldValue::Text(v)) => item.material_specs = v,
                (RateCardItemField::RateWithMaterial, FieldValue::Text(v)) => {
                    item.rate_with_material = v
                }
                _ => {}
            }
        }
    }
}

/// Body of `POST /api/rate-cards`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RateCardCreate {
    pub name: String,
    #[serde(default)]
    pub created_date: Option<String>,
    #[serde(default)]
    pub items: Vec<RateCardItemCreate>,
}

/// Body of `PUT /api/rate-cards/{id}`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RateCardUpdate {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub created_date: Option<String>,
}

impl RateCardUpdate {
    pub fn changes(&self) -> Vec<(RateCardField, String)> {
        [
            (RateCardField::Name, &self.name),
            (RateCardField::CreatedDate, &self.created_date),
        ]
        .into_iter()
        .filter_map(|(field, v)| v.clone().map(|v| (field, v)))
        .collect()
    }
}

/// Validated rate card name (non-blank, trimmed)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RateCardName(String);

impl RateCardName {
    pub fn new(s: &str) -> Result<Self, ValidationError> {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Err(ValidationError::Empty { field: "name" });
        }
        if trimmed.chars().count() > MAX_RATE_CARD_NAME_LEN {
            return Err(ValidationError::TooLong {
                field: "name",
                max: MAX_RATE_CARD_NAME_LEN,
            });
        }
        Ok(Self(trimmed.to_owned()))
    }

    /// Name known to be valid at compile time
    pub(crate) fn from_static(s: &'static str) -> Self {
        Self(s.to_owned())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

/// Today's date as stored in `created_date`
pub fn today() -> String {
    chrono::Local::now().format("%Y-%m-%d").to_string()
}

/// Sort items into presentation order
pub fn sort_for_display(items: &mut [RateCardItem]) {
    items.sort_by_key(|i| (i.display_order, i.sr_no, i.id));
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(id: i32, sr_no: i32, display_order: i32) -> RateCardItem {
        RateCardItem {
            id,
            rate_card_id: Uuid::nil(),
            sr_no,
            description: format!("item {id}"),
            labor_work: "-".into(),
            material_specs: "-".into(),
            rate_with_material: "-".into(),
            display_order,
        }
    }

    #[test]
    fn patch_with_only_display_order() {
        let patch: RateCardItemUpdate = serde_json::from_str(r#"{"displayOrder": 9}"#).unwrap();
        assert_eq!(
            patch.changes(),
            vec![(RateCardItemField::DisplayOrder, FieldValue::Int(9))]
        );

        let mut target = item(1, 1, 1);
        let before = target.clone();
        patch.apply(&mut target);
        assert_eq!(target.display_order, 9);
        assert_eq!(target.description, before.description);
        assert_eq!(target.sr_no, before.sr_no);
    }

    #[test]
    fn null_fields_are_ignored() {
        let patch: RateCardItemUpdate =
            serde_json::from_str(r#"{"laborWork": null, "materialSpecs": "MCB"}"#).unwrap();
        let changes = patch.changes();
        assert_eq!(changes.len(), 1);
        assert_eq!(changes[0].0.column(), "material_specs");
    }

    #[test]
    fn empty_patch() {
        let patch: RateCardItemUpdate = serde_json::from_str("{}").unwrap();
        assert!(patch.changes().is_empty());
    }

    #[test]
    fn create_requires_descriptive_fields() {
        let raw = r#"{"srNo": 1, "description": "x", "laborWork": "-", "materialSpecs": "-"}"#;
        assert!(serde_json::from_str::<RateCardItemCreate>(raw).is_err());
    }

    #[test]
    fn display_sort_uses_order_then_serial() {
        let mut items = vec![item(1, 1, 3), item(2, 2, 1), item(3, 3, 1)];
        sort_for_display(&mut items);
        let ids: Vec<i32> = items.iter().map(|i| i.id).collect();
        assert_eq!(ids, vec![2, 3, 1]);
    }

    #[test]
    fn rate_card_name_rules() {
        assert_eq!(RateCardName::new("  Standard ").unwrap().as_str(), "Standard");
        assert!(matches!(
            RateCardName::new("   ").unwrap_err(),
            ValidationError::Empty { .. }
        ));
        assert!(matches!(
            RateCardName::new(&"a".repeat(201)).unwrap_err(),
            ValidationError::TooLong { max: 200, .. }
        ));
    }
}
