//! Shopping cart contents.
//!
//! A cart is an ordered list of item snapshots. The same item may appear
//! more than once; there is no quantity field.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::id::{GuestId, ItemId};
use super::portfolio::PortfolioItem;
use super::price::saturating_sum;

/// The locally held cart for one guest.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Cart {
    items: Vec<PortfolioItem>,
}

impl Cart {
    #[must_use]
    pub const fn new() -> Self {
        Self { items: Vec::new() }
    }

    #[must_use]
    pub const fn from_items(items: Vec<PortfolioItem>) -> Self {
        Self { items }
    }

    #[must_use]
    pub fn items(&self) -> &[PortfolioItem] {
        &self.items
    }

    #[must_use]
    pub fn into_items(self) -> Vec<PortfolioItem> {
        self.items
    }

    /// Append a snapshot of the item. Duplicates are allowed.
    pub fn push(&mut self, item: PortfolioItem) {
        self.items.push(item);
    }

    /// Remove the first entry with the given id.
    pub fn remove_first(&mut self, id: &ItemId) -> Option<PortfolioItem> {
        let pos = self.items.iter().position(|item| &item.id == id)?;
        Some(self.items.remove(pos))
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Number of entries, counting duplicates.
    #[must_use]
    pub fn count(&self) -> usize {
        self.items.len()
    }

    /// Sum of each entry's numeric price, capped at [`Decimal::MAX`].
    #[must_use]
    pub fn total(&self) -> Decimal {
        saturating_sum(self.items.iter().map(|item| item.price.amount()))
    }
}

/// A guest's cart as mirrored in the remote store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartSnapshot {
    pub guest_id: GuestId,
    pub items: Vec<PortfolioItem>,
    pub updated_at: DateTime<Utc>,
}

impl CartSnapshot {
    /// A mirrored cart counts as active while it holds at least one entry.
    #[must_use]
    pub fn is_active(&self) -> bool {
        !self.items.is_empty()
    }
}

#[cfg(test)]
#[allow(clippy::indexing_slicing)]
mod tests {
    use proptest::prelude::*;

    use super::*;
    use crate::types::price::{DisplayPrice, parse_leading_numeric};

    fn item(id: &str, price: &str) -> PortfolioItem {
        PortfolioItem {
            id: ItemId::new(id),
            title: id.to_owned(),
            category: "Macrame".to_owned(),
            image_url: String::new(),
            description: String::new(),
            price: DisplayPrice::new(price),
        }
    }

    #[test]
    fn test_total_sums_numeric_prices() {
        let cart = Cart::from_items(vec![item("1", "$85"), item("2", "$35")]);
        assert_eq!(cart.total(), Decimal::from(120));
        assert_eq!(cart.count(), 2);
    }

    #[test]
    fn test_unparseable_price_counts_as_zero() {
        let cart = Cart::from_items(vec![item("1", "$85"), item("2", "ask me")]);
        assert_eq!(cart.total(), Decimal::from(85));
    }

    #[test]
    fn test_remove_first_only_removes_one_duplicate() {
        let mut cart = Cart::from_items(vec![item("1", "$85"), item("2", "$5"), item("1", "$85")]);
        let removed = cart.remove_first(&ItemId::new("1"));
        assert!(removed.is_some());
        let ids: Vec<_> = cart.items().iter().map(|i| i.id.as_str()).collect();
        assert_eq!(ids, ["2", "1"]);
    }

    #[test]
    fn test_remove_absent_is_noop() {
        let mut cart = Cart::from_items(vec![item("1", "$85")]);
        assert!(cart.remove_first(&ItemId::new("nope")).is_none());
        assert_eq!(cart.count(), 1);
    }

    #[test]
    fn test_total_caps_instead_of_overflowing() {
        let huge = "$79228162514264337593543950335";
        let cart = Cart::from_items(vec![item("1", huge), item("2", huge)]);
        assert_eq!(cart.total(), Decimal::MAX);
    }

    #[derive(Debug, Clone)]
    enum Op {
        Add(usize),
        Remove(usize),
    }

    const PRICES: [&str; 5] = ["$85", "$35", "From $40.50", "ask me", "$0.99"];

    fn op() -> impl Strategy<Value = Op> {
        prop_oneof![
            (0..PRICES.len()).prop_map(Op::Add),
            (0..PRICES.len()).prop_map(Op::Remove),
        ]
    }

    proptest! {
        #[test]
        fn prop_count_and_total_follow_surviving_entries(ops in prop::collection::vec(op(), 0..40)) {
            let mut cart = Cart::new();
            let mut model: Vec<usize> = Vec::new();

            for op in ops {
                match op {
                    Op::Add(i) => {
                        cart.push(item(&i.to_string(), PRICES[i]));
                        model.push(i);
                    }
                    Op::Remove(i) => {
                        let removed = cart.remove_first(&ItemId::new(i.to_string()));
                        let pos = model.iter().position(|&m| m == i);
                        prop_assert_eq!(removed.is_some(), pos.is_some());
                        if let Some(pos) = pos {
                            model.remove(pos);
                        }
                    }
                }
            }

            let expected: Decimal = model
                .iter()
                .map(|&i| parse_leading_numeric(PRICES[i]))
                .sum();
            prop_assert_eq!(cart.count(), model.len());
            prop_assert_eq!(cart.total(), expected);
            let ids: Vec<String> = model.iter().map(ToString::to_string).collect();
            let cart_ids: Vec<String> = cart.items().iter().map(|i| i.id.as_str().to_owned()).collect();
            prop_assert_eq!(cart_ids, ids);
        }
    }
}
