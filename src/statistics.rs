//! Aggregate statistics over a filtered set of expenses.
//!
//! The statistics always describe the entire filtered set, not the page of it
//! that is returned to the client.

use std::collections::BTreeMap;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::models::{DatabaseID, Expense};

/// Summary figures for a set of expenses.
///
/// The field names mirror the `<field>__sum`/`<field>__count` spelling that
/// clients of the original API expect. The frequency fields are omitted from
/// the JSON when the set is empty; `price__sum` is always present, as `null`
/// for an empty set.
#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
pub struct Statistics {
    /// The sum of the prices of all expenses in the set.
    #[serde(rename = "price__sum")]
    pub price_sum: Option<Decimal>,

    /// The category that appears most often.
    #[serde(
        rename = "category",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub most_frequent_category: Option<DatabaseID>,

    /// How many expenses are filed under the most frequent category.
    #[serde(
        rename = "category__count",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub category_count: Option<u64>,

    /// The priority that appears most often.
    #[serde(
        rename = "priority",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub most_frequent_priority: Option<DatabaseID>,

    /// How many expenses carry the most frequent priority.
    #[serde(
        rename = "priority__count",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub priority_count: Option<u64>,

    /// The place that appears most often.
    #[serde(rename = "place", default, skip_serializing_if = "Option::is_none")]
    pub most_frequent_place: Option<String>,

    /// How many expenses happened at the most frequent place.
    #[serde(
        rename = "place__count",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub place_count: Option<u64>,
}

/// Compute the summary figures for `expenses`.
///
/// Expenses without a category or priority do not form a group of their own,
/// so a set where no expense has a category reports no most frequent
/// category. Ties are broken towards the smallest key: the lowest ID, or the
/// lexicographically first place name.
pub fn compute_statistics(expenses: &[Expense]) -> Statistics {
    if expenses.is_empty() {
        return Statistics::default();
    }

    let price_sum = expenses.iter().map(|expense| expense.price).sum();

    let (most_frequent_category, category_count) =
        most_frequent(expenses.iter().filter_map(|expense| expense.category_id)).unzip();
    let (most_frequent_priority, priority_count) =
        most_frequent(expenses.iter().filter_map(|expense| expense.priority_id)).unzip();
    let (most_frequent_place, place_count) =
        most_frequent(expenses.iter().map(|expense| expense.place.clone())).unzip();

    Statistics {
        price_sum: Some(price_sum),
        most_frequent_category,
        category_count,
        most_frequent_priority,
        priority_count,
        most_frequent_place,
        place_count,
    }
}

/// Find the most common key, breaking ties towards the smallest key.
fn most_frequent<K: Ord>(keys: impl Iterator<Item = K>) -> Option<(K, u64)> {
    let mut counts: BTreeMap<K, u64> = BTreeMap::new();

    for key in keys {
        *counts.entry(key).or_insert(0) += 1;
    }

    let mut best: Option<(K, u64)> = None;

    // Ascending key order, so on equal counts the smallest key sticks.
    for (key, count) in counts {
        let replace = match &best {
            None => true,
            Some((_, best_count)) => count > *best_count,
        };

        if replace {
            best = Some((key, count));
        }
    }

    best
}
