//! Sibling ordering.
//!
//! Entries with an explicit `order` come first, ascending. Entries without
//! one follow in declaration order. The sort is stable, so equal weights
//! also keep declaration order and sorting is idempotent.

use std::borrow::Borrow;

use crate::descriptor::RouteDescriptor;

/// Sort key: ordered entries before unordered ones, then by weight.
pub fn order_key(order: Option<i64>) -> (bool, i64) {
    match order {
        Some(weight) => (false, weight),
        None => (true, 0),
    }
}

/// Sort a sibling set in place. `items` must be in declaration order.
pub fn sort_siblings<D: Borrow<RouteDescriptor>>(items: &mut [D]) {
    items.sort_by_key(|d| order_key(d.borrow().order));
}
