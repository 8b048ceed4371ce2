use crate::error::{Result, TallyError};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Largest magnitude accepted for a price, a bill total, a fixed tip, or the
/// sum of all dish prices.
pub const MAX_AMOUNT: Decimal = dec!(1000000000);

/// Largest magnitude accepted for a tax or tip rate.
pub const MAX_PERCENT: Decimal = dec!(10000);

/// Money carries at most this many decimal places.
pub const MONEY_SCALE: u32 = 4;

/// Checks that `amount` fits the money limits. `what` names the value in
/// the error message.
///
/// Only the magnitude and the number of decimal places are checked; the
/// sign is not. Within these limits no allocation can overflow `Decimal`.
pub fn validate_amount(what: &str, amount: Decimal) -> Result<Decimal> {
    if amount.abs() > MAX_AMOUNT {
        return Err(TallyError::ValidationError(format!(
            "{what} {amount} is larger than {MAX_AMOUNT}"
        )));
    }
    if amount.normalize().scale() > MONEY_SCALE {
        return Err(TallyError::ValidationError(format!(
            "{what} {amount} has more than {MONEY_SCALE} decimal places"
        )));
    }
    Ok(amount)
}

/// A percentage such as a tax or tip rate, stored as written (`18` means 18%).
///
/// Wraps `rust_decimal::Decimal` so rates can't be mixed up with money. The
/// sign is not validated.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Percent(pub Decimal);

impl Percent {
    pub const ZERO: Self = Self(Decimal::ZERO);

    pub fn new(value: Decimal) -> Self {
        Self(value)
    }

    pub fn validate(self, what: &str) -> Result<Self> {
        if self.0.abs() > MAX_PERCENT {
            return Err(TallyError::ValidationError(format!(
                "{what} {self} is larger than {MAX_PERCENT}%"
            )));
        }
        Ok(self)
    }

    /// The rate as a fraction of one (`18` becomes `0.18`).
    pub fn fraction(&self) -> Decimal {
        self.0 / Decimal::ONE_HUNDRED
    }

    /// Applies the rate to `amount`.
    pub fn of(&self, amount: Decimal) -> Decimal {
        amount * self.fraction()
    }
}

impl fmt::Display for Percent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}%", self.0)
    }
}

#[derive(Debug, Serialize, Deserialize, PartialEq, Eq, Clone, Copy, Default)]
#[serde(rename_all = "lowercase")]
pub enum SplitMode {
    /// Each dish is split among the people who shared it.
    #[default]
    Dishes,
    /// One flat bill split evenly across everyone.
    Even,
}

#[derive(Debug, Serialize, Deserialize, PartialEq, Eq, Clone, Copy, Default)]
#[serde(rename_all = "lowercase")]
pub enum TipMode {
    #[default]
    Percent,
    Amount,
}

/// Whether the tip percentage is applied to the subtotal plus tax, or to the
/// subtotal alone.
#[derive(Debug, Serialize, Deserialize, PartialEq, Eq, Clone, Copy, Default)]
#[serde(rename_all = "kebab-case")]
pub enum TipBasis {
    #[default]
    AfterTax,
    BeforeTax,
}

/// Tax and tip parameters for one split mode.
///
/// Both the tip percentage and the fixed tip amount are retained; `tip_mode`
/// selects which one is used at calculation time.
#[derive(Debug, Serialize, Deserialize, PartialEq, Clone, Copy)]
#[serde(default)]
pub struct Charges {
    pub tax_percent: Percent,
    pub tip_percent: Percent,
    pub tip_mode: TipMode,
    pub tip_amount: Decimal,
}

impl Charges {
    pub fn percent(tax: Decimal, tip: Decimal) -> Self {
        Self {
            tax_percent: Percent(tax),
            tip_percent: Percent(tip),
            tip_mode: TipMode::Percent,
            tip_amount: Decimal::ZERO,
        }
    }

    pub fn fixed_tip(tax: Decimal, tip_amount: Decimal) -> Self {
        Self {
            tax_percent: Percent(tax),
            tip_percent: Percent::ZERO,
            tip_mode: TipMode::Amount,
            tip_amount,
        }
    }

    pub fn validate(&self) -> Result<()> {
        self.tax_percent.validate("tax percent")?;
        self.tip_percent.validate("tip percent")?;
        validate_amount("tip amount", self.tip_amount)?;
        Ok(())
    }
}

impl Default for Charges {
    fn default() -> Self {
        Self::percent(dec!(5), dec!(15))
    }
}

/// An itemized line on the bill.
///
/// `shared_by` holds participant names in the order they were toggled on.
#[derive(Debug, Serialize, Deserialize, PartialEq, Clone, Default)]
pub struct Dish {
    pub name: String,
    pub price: Decimal,
    #[serde(default)]
    pub shared_by: Vec<String>,
}

impl Dish {
    pub fn new(name: impl Into<String>, price: Decimal) -> Self {
        Self {
            name: name.into(),
            price,
            shared_by: Vec::new(),
        }
    }

    pub fn shared_by<I, S>(mut self, people: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.shared_by = people.into_iter().map(Into::into).collect();
        self
    }

    pub fn is_shared_by(&self, person: &str) -> bool {
        self.shared_by.iter().any(|p| p == person)
    }

    /// Adds `person` as a sharer if absent, removes them otherwise.
    /// Returns whether they share the dish afterwards.
    pub fn toggle(&mut self, person: &str) -> bool {
        match self.shared_by.iter().position(|p| p == person) {
            Some(index) => {
                self.shared_by.remove(index);
                false
            }
            None => {
                self.shared_by.push(person.to_string());
                true
            }
        }
    }

    pub fn remove_sharer(&mut self, person: &str) {
        self.shared_by.retain(|p| p != person);
    }
}
