//! External (camelCase) to storage column (snake_case) mapping
//!
//! Each entity gets exactly one table, declared through `field_map!`. Every
//! externally visible field has one column counterpart and lookups work in
//! both directions. Partial updates and SELECT lists are built from these
//! tables so the write and read paths cannot drift apart.

macro_rules! field_map {
    (
        $(#[$meta:meta])*
        $vis:vis enum $name:ident {
            $($variant:ident => ($external:literal, $column:literal)),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        $vis enum $name {
            $($variant),+
        }

        impl $name {
            /// Every mapped field, in declaration order
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            /// Field name in JSON payloads
            pub const fn external(self) -> &'static str {
                match self {
                    $($name::$variant => $external),+
                }
            }

            /// Column name in storage
            pub const fn column(self) -> &'static str {
                match self {
                    $($name::$variant => $column),+
                }
            }

            /// Comma separated column list for SELECT / RETURNING clauses
            pub fn column_list() -> String {
                Self::ALL
                    .iter()
                    .map(|f| f.column())
                    .collect::<Vec<_>>()
                    .join(", ")
            }
        }
    };
}

field_map! {
    /// Bill fields
    pub enum BillField {
        Id => ("id", "id"),
        BillNo => ("billNo", "bill_no"),
        Date => ("date", "date"),
        CustomerName => ("customerName", "customer_name"),
        LineItems => ("lineItems", "line_items"),
        Total => ("total", "total"),
        AmountInWords => ("amountInWords", "amount_in_words"),
    }
}

field_map! {
    /// Rate card fields (`items` is a relation, not a column)
    pub enum RateCardField {
        Id => ("id", "id"),
        Name => ("name", "name"),
        CreatedDate => ("createdDate", "created_date"),
    }
}

field_map! {
    /// Rate card item fields
    pub enum RateCardItemField {
        Id => ("id", "id"),
        RateCardId => ("rateCardId", "rate_card_id"),
        SrNo => ("srNo", "sr_no"),
        Description => ("description", "description"),
        LaborWork => ("laborWork", "labor_work"),
        MaterialSpecs => ("materialSpecs", "material_specs"),
        RateWithMaterial => ("rateWithMaterial", "rate_with_material"),
        DisplayOrder => ("displayOrder", "display_order"),
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeSet;

    use serde_json::Value;
    use uuid::Uuid;

    use super::*;
    use crate::models::{Bill, LineItems, RateCard, RateCardItem};

    fn keys(value: &Value) -> BTreeSet<String> {
        value
            .as_object()
            .expect("object")
            .keys()
            .cloned()
            .collect()
    }

    fn externals(fields: impl Iterator<Item = &'static str>) -> BTreeSet<String> {
        fields.map(str::to_owned).collect()
    }

    fn sample_item() -> RateCardItem {
        RateCardItem {
            id: 1,
            rate_card_id: Uuid::nil(),
            sr_no: 1,
            description: "Fan point".into(),
            labor_work: "₹250".into(),
            material_specs: "-".into(),
            rate_with_material: "₹750".into(),
            display_order: 1,
        }
    }

    #[test]
    fn each_field_maps_both_ways() {
        assert_eq!(BillField::CustomerName.external(), "customerName");
        assert_eq!(BillField::CustomerName.column(), "customer_name");
        assert_eq!(RateCardItemField::RateWithMaterial.external(), "rateWithMaterial");
        assert_eq!(RateCardItemField::RateWithMaterial.column(), "rate_with_material");
    }

    #[test]
    fn column_list_follows_declaration_order() {
        assert_eq!(RateCardField::column_list(), "id, name, created_date");
    }

    #[test]
    fn bill_serialization_matches_table() {
        let bill = Bill {
            id: Uuid::nil(),
            bill_no: "001".into(),
            date: "2024-01-01".into(),
            customer_name: "A".into(),
            line_items: LineItems::from_json(
                r#"[{"srNo":1,"description":"x","qty":1,"rate":2,"amount":2}]"#,
            )
            .unwrap(),
            total: 2.0,
            amount_in_words: "Two Rupees Only".into(),
        };
        let value = serde_json::to_value(&bill).unwrap();
        assert_eq!(keys(&value), externals(BillField::ALL.iter().map(|f| f.external())));
    }

    #[test]
    fn rate_card_item_serialization_matches_table() {
        let value = serde_json::to_value(sample_item()).unwrap();
        assert_eq!(
            keys(&value),
            externals(RateCardItemField::ALL.iter().map(|f| f.external()))
        );
    }

    #[test]
    fn rate_card_serialization_matches_table_plus_items() {
        let card = RateCard {
            id: Uuid::nil(),
            name: "Standard".into(),
            created_date: "2024-01-01".into(),
            items: vec![sample_item()],
        };
        let value = serde_json::to_value(&card).unwrap();
        let mut expected = externals(RateCardField::ALL.iter().map(|f| f.external()));
        expected.insert("items".into());
        assert_eq!(keys(&value), expected);
    }
}
