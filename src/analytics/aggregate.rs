//! Group-and-count derivations over a filtered order set

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap, HashSet};

use super::DateRange;
use crate::dataset::OrderRecord;

/// Orders placed on one calendar day
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DailyOrderCount {
    pub date: NaiveDate,
    pub orders: u64,
}

/// Orders placed in one product category
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryOrderCount {
    pub category: String,
    pub orders: u64,
}

/// Distinct customers located in one state
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StateCustomerCount {
    pub state: String,
    pub customers: u64,
}

/// Count orders per purchase day, ascending by date.
///
/// Days without orders are absent; see [`densify_daily_counts`].
pub fn daily_order_counts<'a, I>(records: I) -> Vec<DailyOrderCount>
where
    I: IntoIterator<Item = &'a OrderRecord>,
{
    let mut per_day: BTreeMap<NaiveDate, u64> = BTreeMap::new();
    for record in records {
        *per_day.entry(record.purchase_date()).or_insert(0) += 1;
    }

    per_day
        .into_iter()
        .map(|(date, orders)| DailyOrderCount { date, orders })
        .collect()
}

/// Count orders per product category, ascending by category name.
///
/// Records without a category belong to no group.
pub fn category_order_counts<'a, I>(records: I) -> Vec<CategoryOrderCount>
where
    I: IntoIterator<Item = &'a OrderRecord>,
{
    let mut per_category: BTreeMap<&str, u64> = BTreeMap::new();
    for category in records
        .into_iter()
        .filter_map(|r| r.product_category.as_deref())
    {
        *per_category.entry(category).or_insert(0) += 1;
    }

    per_category
        .into_iter()
        .map(|(category, orders)| CategoryOrderCount {
            category: category.to_string(),
            orders,
        })
        .collect()
}

/// Count distinct customers per state, descending by count.
///
/// A customer with several orders from the same state counts once there.
/// Ties are ordered by state code so the output is deterministic.
pub fn state_customer_counts<'a, I>(records: I) -> Vec<StateCustomerCount>
where
    I: IntoIterator<Item = &'a OrderRecord>,
{
    let pairs: HashSet<(&str, &str)> = records
        .into_iter()
        .map(|r| (r.customer_id.as_str(), r.customer_state.as_str()))
        .collect();

    let mut per_state: HashMap<&str, u64> = HashMap::new();
    for (_, state) in pairs {
        *per_state.entry(state).or_insert(0) += 1;
    }

    let mut counts: Vec<StateCustomerCount> = per_state
        .into_iter()
        .map(|(state, customers)| StateCustomerCount {
            state: state.to_string(),
            customers,
        })
        .collect();
    counts.sort_by(|a, b| b.customers.cmp(&a.customers).then_with(|| a.state.cmp(&b.state)));
    counts
}

/// Zero-fill every day of `range` missing from `counts`
pub fn densify_daily_counts(
    counts: &[DailyOrderCount],
    range: &DateRange,
) -> Vec<DailyOrderCount> {
    let known: HashMap<NaiveDate, u64> = counts.iter().map(|c| (c.date, c.orders)).collect();

    range
        .days()
        .map(|date| DailyOrderCount {
            date,
            orders: known.get(&date).copied().unwrap_or(0),
        })
        .collect()
}

/// The `n` categories with the most orders, highest first
pub fn best_categories(counts: &[CategoryOrderCount], n: usize) -> Vec<CategoryOrderCount> {
    let mut ranked = counts.to_vec();
    ranked.sort_by(|a, b| b.orders.cmp(&a.orders).then_with(|| a.category.cmp(&b.category)));
    ranked.truncate(n);
    ranked
}

/// The `n` categories with the fewest orders, lowest first
pub fn worst_categories(counts: &[CategoryOrderCount], n: usize) -> Vec<CategoryOrderCount> {
    let mut ranked = counts.to_vec();
    ranked.sort_by(|a, b| a.orders.cmp(&b.orders).then_with(|| a.category.cmp(&b.category)));
    ranked.truncate(n);
    ranked
}

/// Leading `n` rows of an already ranked state table
pub fn top_states(counts: &[StateCustomerCount], n: usize) -> Vec<StateCustomerCount> {
    counts.iter().take(n).cloned().collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::parse_timestamp;

    fn record(customer: &str, state: &str, category: Option<&str>, ts: &str) -> OrderRecord {
        OrderRecord {
            order_id: None,
            customer_id: customer.to_string(),
            customer_state: state.to_string(),
            product_category: category.map(str::to_string),
            purchased_at: parse_timestamp(ts).unwrap(),
        }
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn category(name: &str, orders: u64) -> CategoryOrderCount {
        CategoryOrderCount {
            category: name.to_string(),
            orders,
        }
    }

    fn mixed() -> Vec<OrderRecord> {
        vec![
            record("A", "SP", Some("toys"), "2017-01-01 08:00:00"),
            record("B", "RJ", Some("books"), "2017-01-01 09:00:00"),
            record("C", "RJ", Some("toys"), "2017-01-03 10:00:00"),
            record("A", "SP", Some("garden"), "2017-01-03 11:00:00"),
            record("A", "MG", Some("toys"), "2017-01-05 12:00:00"),
            record("D", "MG", Some("books"), "2017-01-05 13:00:00"),
            record("E", "MG", Some("toys"), "2017-01-06 14:00:00"),
        ]
    }

    #[test]
    fn test_three_record_scenario() {
        let records = vec![
            record("A", "SP", Some("toys"), "2017-01-01 10:00:00"),
            record("B", "SP", Some("toys"), "2017-01-01 15:00:00"),
            record("A", "SP", Some("toys"), "2017-01-02 09:00:00"),
        ];

        assert_eq!(
            daily_order_counts(&records),
            vec![
                DailyOrderCount {
                    date: date(2017, 1, 1),
                    orders: 2
                },
                DailyOrderCount {
                    date: date(2017, 1, 2),
                    orders: 1
                },
            ]
        );
        assert_eq!(category_order_counts(&records), vec![category("toys", 3)]);
        assert_eq!(
            state_customer_counts(&records),
            vec![StateCustomerCount {
                state: "SP".to_string(),
                customers: 2
            }]
        );
    }

    #[test]
    fn test_daily_counts_are_sparse_and_sum_to_len() {
        let records = mixed();
        let daily = daily_order_counts(&records);

        let dates: Vec<NaiveDate> = daily.iter().map(|d| d.date).collect();
        assert_eq!(
            dates,
            vec![date(2017, 1, 1), date(2017, 1, 3), date(2017, 1, 5), date(2017, 1, 6)]
        );
        assert_eq!(daily.iter().map(|d| d.orders).sum::<u64>(), records.len() as u64);
    }

    #[test]
    fn test_category_counts_sum_to_len() {
        let records = mixed();
        let categories = category_order_counts(&records);

        assert_eq!(
            categories,
            vec![category("books", 2), category("garden", 1), category("toys", 4)]
        );
        assert_eq!(
            categories.iter().map(|c| c.orders).sum::<u64>(),
            records.len() as u64
        );
    }

    #[test]
    fn test_missing_category_is_not_counted() {
        let records = vec![
            record("A", "SP", None, "2017-01-01 10:00:00"),
            record("B", "SP", Some("toys"), "2017-01-01 11:00:00"),
        ];
        assert_eq!(category_order_counts(&records), vec![category("toys", 1)]);
    }

    #[test]
    fn test_state_counts_dedupe_customer_state_pairs() {
        let records = mixed();
        let states = state_customer_counts(&records);

        let distinct_pairs: HashSet<(&str, &str)> = records
            .iter()
            .map(|r| (r.customer_id.as_str(), r.customer_state.as_str()))
            .collect();
        assert_eq!(
            states.iter().map(|s| s.customers).sum::<u64>(),
            distinct_pairs.len() as u64
        );

        let rows: Vec<(&str, u64)> = states
            .iter()
            .map(|s| (s.state.as_str(), s.customers))
            .collect();
        assert_eq!(rows, vec![("MG", 3), ("RJ", 2), ("SP", 1)]);
    }

    #[test]
    fn test_state_counts_sorted_descending() {
        let records = mixed();
        let states = state_customer_counts(&records);
        assert!(states.windows(2).all(|w| w[0].customers >= w[1].customers));
    }

    #[test]
    fn test_customer_in_two_states_counts_in_each() {
        let records = vec![
            record("A", "SP", Some("toys"), "2017-01-01 10:00:00"),
            record("A", "RJ", Some("toys"), "2017-01-02 10:00:00"),
        ];
        let states = state_customer_counts(&records);
        assert_eq!(states.len(), 2);
        assert!(states.iter().all(|s| s.customers == 1));
        assert_eq!(states[0].state, "RJ");
    }

    #[test]
    fn test_empty_input_yields_empty_tables() {
        let records: Vec<OrderRecord> = Vec::new();
        assert!(daily_order_counts(&records).is_empty());
        assert!(category_order_counts(&records).is_empty());
        assert!(state_customer_counts(&records).is_empty());
    }

    #[test]
    fn test_densify_fills_gaps_and_preserves_sum() {
        let records = mixed();
        let daily = daily_order_counts(&records);
        let range = DateRange::new(date(2016, 12, 31), date(2017, 1, 6));

        let dense = densify_daily_counts(&daily, &range);
        assert_eq!(dense.len(), 7);
        assert_eq!(dense[0].orders, 0);
        assert_eq!(dense[1].orders, 2);
        assert_eq!(dense[2].orders, 0);
        assert_eq!(
            dense.iter().map(|d| d.orders).sum::<u64>(),
            daily.iter().map(|d| d.orders).sum::<u64>()
        );
    }

    #[test]
    fn test_best_and_worst_categories() {
        let counts = vec![
            category("a", 5),
            category("b", 1),
            category("c", 9),
            category("d", 5),
            category("e", 2),
        ];

        let best = best_categories(&counts, 3);
        assert_eq!(best, vec![category("c", 9), category("a", 5), category("d", 5)]);

        let worst = worst_categories(&counts, 2);
        assert_eq!(worst, vec![category("b", 1), category("e", 2)]);

        assert_eq!(best_categories(&counts, 10).len(), 5);
    }

    #[test]
    fn test_top_states_takes_leading_rows() {
        let records = mixed();
        let states = state_customer_counts(&records);
        let top = top_states(&states, 2);
        assert_eq!(top.len(), 2);
        assert_eq!(top[0].state, "MG");
    }
}
