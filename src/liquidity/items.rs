//! Recurring and one-off cash-flow items

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::month::MonthKey;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ItemType {
    Income,
    Expense,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Frequency {
    Monthly,
    Quarterly,
    Yearly,
    Once,
}

impl Frequency {
    /// Whether the item recurs `months_since_start` months after its first month
    pub fn recurs_after(&self, months_since_start: i64) -> bool {
        match self {
            Frequency::Monthly => true,
            Frequency::Quarterly => months_since_start % 3 == 0,
            Frequency::Yearly => months_since_start % 12 == 0,
            Frequency::Once => months_since_start == 0,
        }
    }
}

/// Per-month deviation from an item's default schedule
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemOverride {
    /// Replaces the default amount for this month
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub amount: Option<f64>,

    /// Removes the item from this month entirely
    #[serde(default)]
    pub disabled: bool,
}

impl ItemOverride {
    pub fn amount(amount: f64) -> Self {
        Self {
            amount: Some(amount),
            disabled: false,
        }
    }

    pub fn disabled() -> Self {
        Self {
            amount: None,
            disabled: true,
        }
    }
}

/// An income or expense entry of a liquidity plan
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LiquidityItem {
    pub id: String,

    #[serde(default)]
    pub name: String,

    #[serde(rename = "type")]
    pub item_type: ItemType,

    pub default_amount: f64,

    pub frequency: Frequency,

    pub start_month: MonthKey,

    /// Last month the item applies (inclusive)
    #[serde(default)]
    pub end_month: Option<MonthKey>,

    #[serde(default)]
    pub overrides: BTreeMap<MonthKey, ItemOverride>,
}

impl LiquidityItem {
    pub fn new(
        id: impl Into<String>,
        item_type: ItemType,
        default_amount: f64,
        frequency: Frequency,
        start_month: MonthKey,
    ) -> Self {
        Self {
            id: id.into(),
            name: String::new(),
            item_type,
            default_amount,
            frequency,
            start_month,
            end_month: None,
            overrides: BTreeMap::new(),
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn with_end_month(mut self, end_month: MonthKey) -> Self {
        self.end_month = Some(end_month);
        self
    }

    pub fn with_override(mut self, month: MonthKey, item_override: ItemOverride) -> Self {
        self.overrides.insert(month, item_override);
        self
    }

    /// Amount booked in `month`, or `None` if the item does not apply
    ///
    /// An override only takes effect in months the schedule is active.
    pub fn amount_in_month(&self, month: &MonthKey) -> Option<f64> {
        if !item_active_in_month(self, month) {
            return None;
        }

        match self.overrides.get(month) {
            Some(o) if o.disabled => None,
            Some(o) => Some(o.amount.unwrap_or(self.default_amount)),
            None => Some(self.default_amount),
        }
    }
}

/// Whether the item's schedule lands on `month`, ignoring overrides
pub fn item_active_in_month(item: &LiquidityItem, month: &MonthKey) -> bool {
    if *month < item.start_month {
        return false;
    }
    if matches!(item.end_month, Some(end) if *month > end) {
        return false;
    }

    item.frequency.recurs_after(month.months_since(&item.start_month))
}
