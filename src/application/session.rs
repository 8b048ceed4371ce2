use crate::domain::allocation::{
    Allocation, Breakdown, allocate_by_dish, allocate_even, breakdown, dish_subtotal,
};
use crate::domain::bill::{
    Charges, Dish, Percent, SplitMode, TipBasis, TipMode, validate_amount,
};
use crate::error::{Result, TallyError};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::Serialize;

/// Computed results for the current state of a [`Session`].
#[derive(Debug, Serialize, PartialEq, Clone, Default)]
pub struct Summary {
    pub totals: Allocation,
    pub grand_total: Decimal,
    pub breakdown: Breakdown,
}

/// The single owned snapshot of a bill being split.
///
/// Holds the roster, the dishes and both modes' configuration. Every
/// mutating method recomputes the [`Summary`] before returning, so
/// [`Session::summary`] never observes stale totals.
///
/// Prices, charges and the even-mode bill are checked against the limits in
/// [`crate::domain::bill`] before they are stored, so recomputation never
/// overflows.
#[derive(Debug, Clone)]
pub struct Session {
    people: Vec<String>,
    dishes: Vec<Dish>,
    split_mode: SplitMode,
    tip_basis: TipBasis,
    dish_charges: Charges,
    even_charges: Charges,
    total_bill: Decimal,
    suggestions: Vec<String>,
    summary: Summary,
}

impl Default for Session {
    /// The lunch a fresh calculator opens with: Alex and Sam sharing a
    /// pizza, with a soda for Alex.
    fn default() -> Self {
        let mut session = Self::new();
        session.people = vec!["Alex".to_string(), "Sam".to_string()];
        session.dishes = vec![
            Dish::new("Pizza", dec!(20)).shared_by(["Alex", "Sam"]),
            Dish::new("Soda", dec!(3)).shared_by(["Alex"]),
        ];
        session.recompute();
        session
    }
}

impl Session {
    /// An empty roster and dish list with default charges.
    pub fn new() -> Self {
        Self {
            people: Vec::new(),
            dishes: Vec::new(),
            split_mode: SplitMode::default(),
            tip_basis: TipBasis::default(),
            dish_charges: Charges::default(),
            even_charges: Charges::default(),
            total_bill: Decimal::ZERO,
            suggestions: Vec::new(),
            summary: Summary::default(),
        }
    }

    pub fn people(&self) -> &[String] {
        &self.people
    }

    pub fn dishes(&self) -> &[Dish] {
        &self.dishes
    }

    pub fn split_mode(&self) -> SplitMode {
        self.split_mode
    }

    pub fn tip_basis(&self) -> TipBasis {
        self.tip_basis
    }

    pub fn dish_charges(&self) -> &Charges {
        &self.dish_charges
    }

    pub fn even_charges(&self) -> &Charges {
        &self.even_charges
    }

    pub fn total_bill(&self) -> Decimal {
        self.total_bill
    }

    pub fn suggestions(&self) -> &[String] {
        &self.suggestions
    }

    pub fn summary(&self) -> &Summary {
        &self.summary
    }

    /// The charges of whichever split mode is selected.
    pub fn active_charges(&self) -> &Charges {
        match self.split_mode {
            SplitMode::Dishes => &self.dish_charges,
            SplitMode::Even => &self.even_charges,
        }
    }

    fn active_charges_mut(&mut self) -> &mut Charges {
        match self.split_mode {
            SplitMode::Dishes => &mut self.dish_charges,
            SplitMode::Even => &mut self.even_charges,
        }
    }

    /// Adds a participant. Names are trimmed; empty names and exact
    /// duplicates are ignored. Returns whether the roster changed.
    pub fn add_participant(&mut self, name: &str) -> bool {
        let name = name.trim();
        if name.is_empty() || self.people.iter().any(|p| p == name) {
            return false;
        }
        self.people.push(name.to_string());
        self.recompute();
        true
    }

    /// Removes a participant from the roster and from every dish they shared.
    pub fn remove_participant(&mut self, name: &str) {
        self.people.retain(|p| p != name);
        for dish in self.dishes.iter_mut() {
            dish.remove_sharer(name);
        }
        self.recompute();
    }

    /// Appends a blank dish and returns its index.
    pub fn add_dish(&mut self) -> usize {
        self.push_dish(Dish::default())
    }

    /// Appends `dish` with its sharers and returns its index.
    ///
    /// Every sharer must already be a participant; repeated names are kept
    /// once. The price must fit the money limits.
    pub fn add_shared_dish(&mut self, mut dish: Dish) -> Result<usize> {
        self.validate_price(self.dishes.len(), dish.price)?;
        let mut sharers: Vec<String> = Vec::with_capacity(dish.shared_by.len());
        for sharer in dish.shared_by.drain(..) {
            if !self.people.contains(&sharer) {
                return Err(TallyError::UnknownParticipant(sharer));
            }
            if !sharers.contains(&sharer) {
                sharers.push(sharer);
            }
        }
        dish.shared_by = sharers;
        Ok(self.push_dish(dish))
    }

    fn push_dish(&mut self, dish: Dish) -> usize {
        self.dishes.push(dish);
        self.recompute();
        self.dishes.len() - 1
    }

    pub fn clear_dishes(&mut self) {
        self.dishes.clear();
        self.recompute();
    }

    /// Removes the dish at `index`; out-of-range indices are ignored.
    pub fn remove_dish(&mut self, index: usize) -> Option<Dish> {
        if index >= self.dishes.len() {
            return None;
        }
        let removed = self.dishes.remove(index);
        self.recompute();
        Some(removed)
    }

    pub fn set_dish_price(&mut self, index: usize, price: Decimal) -> Result<()> {
        if index >= self.dishes.len() {
            return Err(TallyError::UnknownDish(index));
        }
        self.validate_price(index, price)?;
        let dish = self
            .dishes
            .get_mut(index)
            .ok_or(TallyError::UnknownDish(index))?;
        dish.price = price;
        self.recompute();
        Ok(())
    }

    /// Checks `price` for the dish at `index`, or for a new dish when `index`
    /// is past the end, together with every other dish's price.
    fn validate_price(&self, index: usize, price: Decimal) -> Result<()> {
        validate_amount("price", price)?;
        let others: Decimal = self
            .dishes
            .iter()
            .enumerate()
            .filter(|(i, _)| *i != index)
            .map(|(_, d)| d.price.abs())
            .sum();
        validate_amount("sum of dish prices", others + price.abs())?;
        Ok(())
    }

    /// Adds `person` to the dish's sharers, or removes them if already
    /// there. Returns whether they share the dish afterwards.
    pub fn toggle_sharer(&mut self, index: usize, person: &str) -> Result<bool> {
        if !self.people.iter().any(|p| p == person) {
            return Err(TallyError::UnknownParticipant(person.to_string()));
        }
        let dish = self
            .dishes
            .get_mut(index)
            .ok_or(TallyError::UnknownDish(index))?;
        let shared = dish.toggle(person);
        self.recompute();
        Ok(shared)
    }

    pub fn set_split_mode(&mut self, mode: SplitMode) {
        self.split_mode = mode;
        self.recompute();
    }

    pub fn set_tip_basis(&mut self, basis: TipBasis) {
        self.tip_basis = basis;
        self.recompute();
    }

    pub fn set_dish_charges(&mut self, charges: Charges) -> Result<()> {
        charges.validate()?;
        self.dish_charges = charges;
        self.recompute();
        Ok(())
    }

    pub fn set_even_charges(&mut self, charges: Charges) -> Result<()> {
        charges.validate()?;
        self.even_charges = charges;
        self.recompute();
        Ok(())
    }

    pub fn set_total_bill(&mut self, total_bill: Decimal) -> Result<()> {
        self.total_bill = validate_amount("total bill", total_bill)?;
        self.recompute();
        Ok(())
    }

    pub fn set_tax_percent(&mut self, tax: Percent) -> Result<()> {
        self.active_charges_mut().tax_percent = tax.validate("tax percent")?;
        self.recompute();
        Ok(())
    }

    pub fn set_tip_percent(&mut self, tip: Percent) -> Result<()> {
        self.active_charges_mut().tip_percent = tip.validate("tip percent")?;
        self.recompute();
        Ok(())
    }

    pub fn set_tip_amount(&mut self, amount: Decimal) -> Result<()> {
        self.active_charges_mut().tip_amount = validate_amount("tip amount", amount)?;
        self.recompute();
        Ok(())
    }

    pub fn set_tip_mode(&mut self, mode: TipMode) {
        self.active_charges_mut().tip_mode = mode;
        self.recompute();
    }

    /// Replaces the pending dish-name suggestions.
    pub fn set_suggestions(&mut self, suggestions: Vec<String>) {
        self.suggestions = suggestions;
    }

    /// Turns a pending suggestion into a price-0 dish nobody shares yet.
    /// Returns the new dish index, or `None` if `name` wasn't suggested.
    pub fn accept_suggestion(&mut self, name: &str) -> Option<usize> {
        let position = self.suggestions.iter().position(|s| s == name)?;
        let name = self.suggestions.remove(position);
        Some(self.push_dish(Dish::new(name, Decimal::ZERO)))
    }

    /// Accepts every pending suggestion in order.
    pub fn accept_all_suggestions(&mut self) -> usize {
        let pending = std::mem::take(&mut self.suggestions);
        let accepted = pending.len();
        self.dishes
            .extend(pending.into_iter().map(|name| Dish::new(name, Decimal::ZERO)));
        self.recompute();
        accepted
    }

    fn recompute(&mut self) {
        let (totals, subtotal) = match self.split_mode {
            SplitMode::Dishes => (
                allocate_by_dish(&self.dishes, &self.dish_charges, self.tip_basis, &self.people),
                dish_subtotal(&self.dishes),
            ),
            SplitMode::Even => (
                allocate_even(self.total_bill, &self.even_charges, self.tip_basis, &self.people),
                self.total_bill,
            ),
        };
        let breakdown = breakdown(subtotal, self.active_charges(), self.tip_basis);

        self.summary = Summary {
            grand_total: totals.grand_total(),
            totals,
            breakdown,
        };
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::bill::MAX_AMOUNT;

    #[test]
    fn test_default_lunch() {
        let session = Session::default();
        assert_eq!(session.people(), ["Alex", "Sam"]);
        assert_eq!(session.dishes().len(), 2);

        // 5% tax, 15% tip after tax: multiplier 1.2075
        let summary = session.summary();
        assert_eq!(summary.totals.get("Alex"), Some(dec!(15.6975)));
        assert_eq!(summary.totals.get("Sam"), Some(dec!(12.075)));
        assert_eq!(summary.grand_total, dec!(27.7725));
        assert_eq!(summary.breakdown.total, dec!(27.7725));
    }

    #[test]
    fn test_add_participant_trims_and_dedupes() {
        let mut session = Session::default();
        assert!(session.add_participant("  Jordan  "));
        assert!(!session.add_participant("Jordan"));
        assert!(!session.add_participant("   "));
        // Comparison is case-sensitive
        assert!(session.add_participant("alex"));

        assert_eq!(session.people(), ["Alex", "Sam", "Jordan", "alex"]);
        assert_eq!(session.summary().totals.get("Jordan"), Some(Decimal::ZERO));
    }

    #[test]
    fn test_remove_participant_cascades() {
        let mut session = Session::default();
        session.remove_participant("Alex");

        assert_eq!(session.people(), ["Sam"]);
        assert!(session.dishes().iter().all(|d| !d.is_shared_by("Alex")));
        assert_eq!(session.summary().totals.get("Alex"), None);
        // Sam now carries the whole pizza; the soda has no sharers left
        assert_eq!(session.summary().totals.get("Sam"), Some(dec!(24.15)));
    }

    #[test]
    fn test_remove_unknown_participant_is_noop() {
        let mut session = Session::default();
        session.remove_participant("Nobody");
        assert_eq!(session.people().len(), 2);
    }

    #[test]
    fn test_dish_lifecycle() {
        let mut session = Session::default();
        let index = session.add_dish();
        assert_eq!(index, 2);
        assert_eq!(session.dishes()[2], Dish::default());

        session.set_dish_price(index, dec!(10)).unwrap();
        session.toggle_sharer(index, "Sam").unwrap();
        session.set_dish_charges(Charges::percent(dec!(0), dec!(0))).unwrap();
        assert_eq!(session.summary().totals.get("Sam"), Some(dec!(20)));

        let removed = session.remove_dish(0).unwrap();
        assert_eq!(removed.name, "Pizza");
        assert_eq!(session.dishes()[0].name, "Soda");
        assert_eq!(session.summary().totals.get("Sam"), Some(dec!(10)));

        assert!(session.remove_dish(42).is_none());
    }

    #[test]
    fn test_add_shared_dish() {
        let mut session = Session::default();
        session.clear_dishes();
        assert_eq!(session.summary().grand_total, Decimal::ZERO);

        let dish = Dish::new("Salad", dec!(12)).shared_by(["Sam", "Alex", "Sam"]);
        let index = session.add_shared_dish(dish).unwrap();
        assert_eq!(session.dishes()[index].shared_by, vec!["Sam", "Alex"]);

        let stray = Dish::new("Pie", dec!(4)).shared_by(["Alex", "Ghost"]);
        assert!(matches!(
            session.add_shared_dish(stray),
            Err(TallyError::UnknownParticipant(name)) if name == "Ghost"
        ));
        assert_eq!(session.dishes().len(), 1);
    }

    #[test]
    fn test_out_of_range_price_rejected() {
        let mut session = Session::default();
        let near_max = Decimal::MAX - dec!(1);

        let huge = Dish::new("Caviar", near_max).shared_by(["Alex"]);
        assert!(matches!(
            session.add_shared_dish(huge),
            Err(TallyError::ValidationError(_))
        ));
        assert!(matches!(
            session.set_dish_price(0, near_max),
            Err(TallyError::ValidationError(_))
        ));
        assert!(matches!(
            session.set_dish_price(7, dec!(1)),
            Err(TallyError::UnknownDish(7))
        ));

        // Each price fits alone but together they exceed the limit
        let half = MAX_AMOUNT / dec!(2);
        session.set_dish_price(0, half).unwrap();
        let second = Dish::new("Truffles", half + dec!(10)).shared_by(["Sam"]);
        assert!(matches!(
            session.add_shared_dish(second),
            Err(TallyError::ValidationError(msg)) if msg.starts_with("sum of dish prices")
        ));

        // Rejected updates leave the session as it was
        assert_eq!(session.dishes().len(), 2);
        assert_eq!(session.dishes()[0].price, half);
        assert_eq!(session.summary().totals.get("Sam"), Some(half / dec!(2) * dec!(1.2075)));
    }

    #[test]
    fn test_out_of_range_charges_rejected() {
        let mut session = Session::default();
        session.set_split_mode(SplitMode::Even);

        assert!(session.set_total_bill(Decimal::MAX).is_err());
        assert!(session.set_total_bill(dec!(-25)).is_ok());
        assert!(session.set_tax_percent(Percent::new(Decimal::MAX)).is_err());
        assert!(session.set_tip_percent(Percent::new(dec!(-20000))).is_err());
        assert!(session.set_tip_amount(dec!(0.123456)).is_err());
        assert!(
            session
                .set_even_charges(Charges::fixed_tip(dec!(5), Decimal::MAX))
                .is_err()
        );

        assert_eq!(session.total_bill(), dec!(-25));
        assert_eq!(session.even_charges(), &Charges::default());
    }

    #[test]
    fn test_toggle_sharer() {
        let mut session = Session::default();
        assert!(!session.toggle_sharer(0, "Sam").unwrap());
        assert_eq!(session.dishes()[0].shared_by, vec!["Alex"]);
        assert!(session.toggle_sharer(0, "Sam").unwrap());
        assert_eq!(session.dishes()[0].shared_by, vec!["Alex", "Sam"]);

        assert!(matches!(
            session.toggle_sharer(9, "Sam"),
            Err(TallyError::UnknownDish(9))
        ));
        assert!(matches!(
            session.toggle_sharer(0, "Ghost"),
            Err(TallyError::UnknownParticipant(_))
        ));
    }

    #[test]
    fn test_even_mode_retains_dish_charges() {
        let mut session = Session::default();
        session.set_split_mode(SplitMode::Even);
        session.set_tax_percent(Percent::new(dec!(10))).unwrap();
        session.set_tip_percent(Percent::new(dec!(18))).unwrap();
        session.set_total_bill(dec!(100)).unwrap();

        assert_eq!(session.summary().totals.get("Alex"), Some(dec!(64.9)));
        assert_eq!(session.summary().breakdown.total, dec!(129.8));
        assert_eq!(session.dish_charges(), &Charges::default());

        session.set_split_mode(SplitMode::Dishes);
        assert_eq!(session.summary().totals.get("Sam"), Some(dec!(12.075)));
    }

    #[test]
    fn test_tip_basis_switch_recomputes() {
        let mut session = Session::default();
        session
            .set_dish_charges(Charges::percent(dec!(10), dec!(18)))
            .unwrap();
        assert_eq!(session.summary().totals.get("Alex"), Some(dec!(16.874)));

        session.set_tip_basis(TipBasis::BeforeTax);
        assert_eq!(session.summary().totals.get("Alex"), Some(dec!(16.64)));
        assert_eq!(session.summary().totals.get("Sam"), Some(dec!(12.8)));
    }

    #[test]
    fn test_fixed_tip_setters() {
        let mut session = Session::default();
        session.set_tax_percent(Percent::new(dec!(10))).unwrap();
        session.set_tip_mode(TipMode::Amount);
        session.set_tip_amount(dec!(5)).unwrap();

        let summary = session.summary();
        assert_eq!(summary.breakdown.tip_amount, dec!(5));
        assert_eq!(summary.breakdown.total, dec!(30.3));
        let diff = (summary.grand_total - dec!(30.3)).abs();
        assert!(diff < dec!(0.000000001));
    }

    #[test]
    fn test_accept_suggestion() {
        let mut session = Session::default();
        session.set_suggestions(vec!["Nachos".to_string(), "Tacos".to_string()]);

        assert_eq!(session.accept_suggestion("Tacos"), Some(2));
        assert_eq!(session.suggestions(), ["Nachos"]);
        assert_eq!(session.dishes()[2], Dish::new("Tacos", Decimal::ZERO));
        assert_eq!(session.accept_suggestion("Tacos"), None);

        assert_eq!(session.accept_all_suggestions(), 1);
        assert!(session.suggestions().is_empty());
        assert_eq!(session.dishes().len(), 4);
        // Price-0 dishes leave the totals untouched
        assert_eq!(session.summary().grand_total, dec!(27.7725));
    }
}
