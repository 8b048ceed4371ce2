//! The bill allocation engine.
//!
//! Pure functions turning a snapshot of participants, dishes and charges into
//! what each person owes. None of them fail: empty rosters, zero bills and
//! dishes nobody shared all resolve to zero contributions. Signs are never
//! validated, so negative prices reduce totals.

use super::bill::{Charges, Dish, Percent, TipBasis, TipMode};
use rust_decimal::Decimal;
use serde::Serialize;
use std::collections::HashMap;

/// The factor converting a base price into a tax-and-tip-inclusive price.
pub fn compute_multiplier(tax: Percent, tip: Percent, basis: TipBasis) -> Decimal {
    match basis {
        TipBasis::AfterTax => (Decimal::ONE + tax.fraction()) * (Decimal::ONE + tip.fraction()),
        TipBasis::BeforeTax => Decimal::ONE + tax.fraction() + tip.fraction(),
    }
}

/// One participant's share of the bill.
#[derive(Debug, Serialize, PartialEq, Clone)]
pub struct PersonTotal {
    pub participant: String,
    pub total: Decimal,
}

/// Per-person amounts, in roster order.
#[derive(Debug, Serialize, PartialEq, Clone, Default)]
#[serde(transparent)]
pub struct Allocation {
    totals: Vec<PersonTotal>,
}

impl Allocation {
    /// Everyone in `participants` owing zero.
    pub fn zeroed<S: AsRef<str>>(participants: &[S]) -> Self {
        Self {
            totals: participants
                .iter()
                .map(|p| PersonTotal {
                    participant: p.as_ref().to_string(),
                    total: Decimal::ZERO,
                })
                .collect(),
        }
    }

    pub fn get(&self, participant: &str) -> Option<Decimal> {
        self.totals
            .iter()
            .find(|t| t.participant == participant)
            .map(|t| t.total)
    }

    pub fn totals(&self) -> &[PersonTotal] {
        &self.totals
    }

    pub fn len(&self) -> usize {
        self.totals.len()
    }

    pub fn is_empty(&self) -> bool {
        self.totals.is_empty()
    }

    /// Sum of every participant's amount.
    pub fn grand_total(&self) -> Decimal {
        self.totals.iter().map(|t| t.total).sum()
    }
}

/// Splits one flat bill evenly across all participants.
pub fn allocate_even<S: AsRef<str>>(
    total_bill: Decimal,
    charges: &Charges,
    basis: TipBasis,
    participants: &[S],
) -> Allocation {
    let mut allocation = Allocation::zeroed(participants);
    if total_bill <= Decimal::ZERO || participants.is_empty() {
        return allocation;
    }

    let total_with_charges = match charges.tip_mode {
        TipMode::Percent => {
            total_bill * compute_multiplier(charges.tax_percent, charges.tip_percent, basis)
        }
        // A fixed tip is never taxed and ignores the basis
        TipMode::Amount => total_bill + charges.tax_percent.of(total_bill) + charges.tip_amount,
    };
    let per_person = total_with_charges / Decimal::from(participants.len());

    for entry in allocation.totals.iter_mut() {
        entry.total = per_person;
    }
    allocation
}

/// Splits each dish among its sharers and accumulates per participant.
///
/// In fixed-tip mode the tip is spread over dishes in proportion to their
/// price, not to how many people shared them.
///
/// Prices and charges are expected within the limits of
/// [`crate::domain::bill::validate_amount`]; outside them `Decimal`
/// arithmetic can overflow.
pub fn allocate_by_dish<S: AsRef<str>>(
    dishes: &[Dish],
    charges: &Charges,
    basis: TipBasis,
    participants: &[S],
) -> Allocation {
    let mut allocation = Allocation::zeroed(participants);
    let index: HashMap<&str, usize> = participants
        .iter()
        .enumerate()
        .map(|(i, p)| (p.as_ref(), i))
        .collect();

    let multiplier = compute_multiplier(charges.tax_percent, charges.tip_percent, basis);
    let subtotal_all = dish_subtotal(dishes);

    for dish in dishes {
        if dish.shared_by.is_empty() {
            continue;
        }

        let dish_total = match charges.tip_mode {
            TipMode::Percent => dish.price * multiplier,
            TipMode::Amount => {
                let tip_share = if subtotal_all > Decimal::ZERO {
                    dish.price / subtotal_all * charges.tip_amount
                } else {
                    Decimal::ZERO
                };
                dish.price + charges.tax_percent.of(dish.price) + tip_share
            }
        };
        let portion = dish_total / Decimal::from(dish.shared_by.len());

        for sharer in &dish.shared_by {
            match index.get(sharer.as_str()) {
                Some(&i) => allocation.totals[i].total += portion,
                None => tracing::warn!(dish = %dish.name, sharer = %sharer, "sharer is not a participant; portion dropped"),
            }
        }
    }
    allocation
}

/// Sum of every dish price, shared or not.
pub fn dish_subtotal(dishes: &[Dish]) -> Decimal {
    dishes.iter().map(|d| d.price).sum()
}

/// Aggregate view of the whole bill.
#[derive(Debug, Serialize, PartialEq, Clone, Copy, Default)]
pub struct Breakdown {
    pub subtotal: Decimal,
    pub tax_amount: Decimal,
    pub tip_amount: Decimal,
    pub total: Decimal,
}

impl Breakdown {
    pub fn round_dp(&self, dp: u32) -> Self {
        Self {
            subtotal: round_money(self.subtotal, dp),
            tax_amount: round_money(self.tax_amount, dp),
            tip_amount: round_money(self.tip_amount, dp),
            total: round_money(self.total, dp),
        }
    }
}

pub fn breakdown(subtotal: Decimal, charges: &Charges, basis: TipBasis) -> Breakdown {
    let tax_amount = charges.tax_percent.of(subtotal);
    let tip_amount = match (charges.tip_mode, basis) {
        (TipMode::Amount, _) => charges.tip_amount,
        (TipMode::Percent, TipBasis::AfterTax) => charges.tip_percent.of(subtotal + tax_amount),
        (TipMode::Percent, TipBasis::BeforeTax) => charges.tip_percent.of(subtotal),
    };

    Breakdown {
        subtotal,
        tax_amount,
        tip_amount,
        total: subtotal + tax_amount + tip_amount,
    }
}

/// Rounds half away from zero, the way amounts are shown to people.
pub fn round_money(amount: Decimal, dp: u32) -> Decimal {
    amount.round_dp_with_strategy(dp, rust_decimal::RoundingStrategy::MidpointAwayFromZero)
}
