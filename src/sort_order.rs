use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, warn};

/// Largest `sortOrder` still trusted when looking for the current tail
pub const MAX_VALID_SORT_ORDER: i64 = 1_000_000_000;

pub const ROOT_TASK_SORT_ORDER: SortOrderPolicy = SortOrderPolicy {
    gap: 10_000,
    base: 10_000,
};

pub const SUBTASK_SORT_ORDER: SortOrderPolicy = SortOrderPolicy {
    gap: 1_000,
    base: 1_000,
};

/// Distance between two subtasks created by the same batch
pub const BATCH_SORT_ORDER_SPACING: i64 = 100;

/// How to place a new item after its siblings: `gap` after the current
/// maximum, or at `base` when no sibling has a usable value.
#[derive(Deserialize, Serialize, PartialEq, Eq, Debug, Clone, Copy)]
pub struct SortOrderPolicy {
    pub gap: i64,
    pub base: i64,
}

/// `sortOrder` exactly as the API returned it.
///
/// TickTick data sometimes carries nulls, strings or out of range numbers
/// here, so the value is kept raw and validated when used.
#[derive(Deserialize, Serialize, PartialEq, Debug, Clone, Default)]
#[serde(transparent)]
pub struct RawSortOrder(pub Value);

impl RawSortOrder {
    /// The value as an integer if it is a number within `0..=MAX_VALID_SORT_ORDER`
    pub fn valid(&self) -> Option<i64> {
        let Value::Number(number) = &self.0 else {
            return None;
        };
        match number.as_i64() {
            Some(value) => (0..=MAX_VALID_SORT_ORDER).contains(&value).then_some(value),
            None => {
                let float = number.as_f64()?;
                (0.0..=MAX_VALID_SORT_ORDER as f64)
                    .contains(&float)
                    .then_some(float.trunc() as i64)
            }
        }
    }

    pub fn is_null(&self) -> bool {
        self.0.is_null()
    }
}

impl From<i64> for RawSortOrder {
    fn from(value: i64) -> Self {
        RawSortOrder(Value::from(value))
    }
}

/// Anything taking part in a sibling ordering
pub trait Sortable {
    fn sort_id(&self) -> &str;
    fn raw_sort_order(&self) -> &RawSortOrder;
}

/// Sort order placing a new item after every sibling.
///
/// Invalid sibling values are ignored, so a single corrupt entry cannot push
/// every later insertion out of range.
pub fn next_sort_order<'a, S, I>(siblings: I, policy: SortOrderPolicy) -> i64
where
    S: Sortable + 'a,
    I: IntoIterator<Item = &'a S>,
{
    let mut max_sort_order: Option<i64> = None;
    let mut siblings_count = 0;
    for sibling in siblings {
        siblings_count += 1;
        let raw_sort_order = sibling.raw_sort_order();
        match raw_sort_order.valid() {
            Some(sort_order) => {
                max_sort_order = Some(max_sort_order.map_or(sort_order, |max| max.max(sort_order)))
            }
            None if raw_sort_order.is_null() => {
                debug!("Sibling {} has no sortOrder", sibling.sort_id())
            }
            None => warn!(
                "Sibling {} has unreasonable sortOrder: {}",
                sibling.sort_id(),
                raw_sort_order.0
            ),
        }
    }

    match max_sort_order {
        Some(max_sort_order) => {
            let next_sort_order = max_sort_order.saturating_add(policy.gap);
            debug!(
                "Max existing valid sort order among {siblings_count} siblings: {max_sort_order}, next will be: {next_sort_order}"
            );
            next_sort_order
        }
        None => {
            debug!(
                "No valid sort order among {siblings_count} siblings, starting with {}",
                policy.base
            );
            policy.base
        }
    }
}

/// `count` sort orders starting at `base`, `spacing` apart
pub fn batch_sort_orders(base: i64, spacing: i64, count: usize) -> Vec<i64> {
    (0..count as i64)
        .map(|index| base.saturating_add(index.saturating_mul(spacing)))
        .collect()
}
