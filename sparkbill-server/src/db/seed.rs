//! Default reference data
//!
//! One rate card with the eight standard service entries, inserted only when
//! no rate card exists yet. Running the seed again is a no-op.

use super::store::{NewRateCard, Store};
use super::DbError;
use crate::models::rate_card::today;
use crate::models::{RateCardItemCreate, RateCardName};

/// Name of the seeded rate card
pub const DEFAULT_RATE_CARD_NAME: &str = "Standard Rate Card";

/// (description, labor work, material specs, rate with material)
const DEFAULT_ITEMS: [(&str, &str, &str, &str); 8] = [
    (
        "Standard Lighting/Fan Point Fitting & Wiring (Tube Light, Fan, Light Point)",
        "₹250",
        "Vinay Adora Switches, Polycab/Patel Wires/Cables",
        "₹750",
    ),
    (
        "Computer/Power Board Wiring Point (1 Point)",
        "₹200",
        "Vinay Adora Switches, Polycab/Patel Wires/Cables",
        "₹600",
    ),
    (
        "A.C. (Air Conditioner) Power Point",
        "₹300",
        "Heavy Duty Wire/Socket, MCB",
        "₹900",
    ),
    ("Ceiling Fan Fitting (Labor Only)", "₹150", "-", "-"),
    (
        "Ceiling Fan Fitting with Dimmer (Supply & Install)",
        "-",
        "Supply of Standard Dimmer/Regulator",
        "₹500",
    ),
    (
        "Fan Down Hook/J-Hook Fitting (Supply & Install)",
        "-",
        "Supply of Standard J-Hook/Down Rod Set",
        "₹250",
    ),
    ("Dome/LED Light Fitting (Labor Only)", "₹100", "-", "-"),
    (
        "Distribution Board (DB) Point/Wiring",
        "Quoted Separately",
        "Based on Circuit Load & Size",
        "Quoted Separately",
    ),
];

/// What a seed run did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SeedOutcome {
    Inserted { items: usize },
    Skipped,
}

/// The default rate card, serial numbers 1..=8 shown in serial order.
pub fn default_rate_card() -> NewRateCard {
    let items = DEFAULT_ITEMS
        .iter()
        .zip(1..)
        .map(|(&(description, labor_work, material_specs, rate), sr_no)| RateCardItemCreate {
            sr_no,
            description: description.to_owned(),
            labor_work: labor_work.to_owned(),
            material_specs: material_specs.to_owned(),
            rate_with_material: rate.to_owned(),
            display_order: Some(sr_no),
        })
        .collect();

    NewRateCard {
        name: RateCardName::from_static(DEFAULT_RATE_CARD_NAME),
        created_date: today(),
        items,
    }
}

/// Insert the default rate card unless one already exists.
pub async fn run(store: &dyn Store) -> Result<SeedOutcome, DbError> {
    match store.seed_rate_card(default_rate_card()).await? {
        Some(card) => {
            tracing::info!(items = card.items.len(), "Seeded default rate card");
            Ok(SeedOutcome::Inserted {
                items: card.items.len(),
            })
        }
        None => {
            tracing::info!("Rate cards already exist. Skipping seed.");
            Ok(SeedOutcome::Skipped)
        }
    }
}
