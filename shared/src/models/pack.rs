//! Pack Model

use serde::{Deserialize, Serialize};

use crate::units::{WeightUnit, convert_weight};

/// Pack entity
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct Pack {
    pub id: i64,
    pub user_id: i64,
    pub trip_id: Option<i64>,
    pub title: String,
    pub removed: bool,
    pub created_at: i64,
}

/// Item placed in a pack
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct PackItem {
    pub pack_id: i64,
    pub item_id: i64,
    pub quantity: f64,
    pub worn: bool,
    pub checked: bool,
    pub sort_order: i32,
}

/// Pack item joined with the item fields needed for display and totals
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct PackItemView {
    pub item_id: i64,
    pub name: String,
    pub quantity: f64,
    pub worn: bool,
    pub checked: bool,
    pub sort_order: i32,
    pub weight: Option<f64>,
    pub unit: Option<String>,
    /// Item flag or its item-category flag
    pub consumable: bool,
    pub category_name: Option<String>,
}

/// Weight totals of a pack, in one unit
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PackWeightSummary {
    pub unit: WeightUnit,
    pub total: f64,
    pub worn: f64,
    pub consumable: f64,
    /// Total minus worn and consumable weight
    pub base: f64,
}

impl PackWeightSummary {
    /// Sum the items' weights in `unit`.
    ///
    /// Weight counts `quantity` times. Items without a weight count as zero
    /// and items without a unit are taken as grams. A worn consumable counts
    /// as worn only, and base weight is what is neither worn nor consumable.
    pub fn compute(items: &[PackItemView], unit: WeightUnit) -> Self {
        let mut summary = Self {
            unit,
            total: 0.0,
            worn: 0.0,
            consumable: 0.0,
            base: 0.0,
        };
        for item in items {
            let Some(weight) = item.weight else {
                continue;
            };
            let from = item
                .unit
                .as_deref()
                .and_then(WeightUnit::parse_token)
                .unwrap_or(WeightUnit::G);
            let value = convert_weight(weight * item.quantity, from, unit);

            summary.total += value;
            if item.worn {
                summary.worn += value;
            } else if item.consumable {
                summary.consumable += value;
            } else {
                summary.base += value;
            }
        }
        summary
    }
}

/// Pack with its items and weight totals
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PackDetail {
    #[serde(flatten)]
    pub pack: Pack,
    pub items: Vec<PackItemView>,
    pub summary: PackWeightSummary,
}

/// One item of a pack create/replace payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PackItemInput {
    pub item_id: i64,
    pub quantity: Option<f64>,
    #[serde(default)]
    pub worn: bool,
    #[serde(default)]
    pub checked: bool,
    #[serde(default)]
    pub sort_order: i32,
}

/// Create / replace pack payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PackInput {
    pub title: String,
    pub trip_id: Option<i64>,
    #[serde(default)]
    pub items: Vec<PackItemInput>,
}

/// Toggle the checked flag of a pack item
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PackItemToggle {
    pub checked: bool,
}

/// Assign (or unassign with `None`) a pack to a trip
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PackAssign {
    pub trip_id: Option<i64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn view(weight: Option<f64>, unit: Option<&str>, quantity: f64, worn: bool, consumable: bool) -> PackItemView {
        PackItemView {
            item_id: 1,
            name: "item".into(),
            quantity,
            worn,
            checked: false,
            sort_order: 0,
            weight,
            unit: unit.map(str::to_string),
            consumable,
            category_name: None,
        }
    }

    #[test]
    fn test_summary_splits_worn_consumable_base() {
        let items = vec![
            view(Some(1.0), Some("kg"), 1.0, false, false),
            view(Some(500.0), Some("g"), 1.0, true, false),
            view(Some(100.0), Some("g"), 3.0, false, true),
        ];
        let s = PackWeightSummary::compute(&items, WeightUnit::G);
        assert!((s.total - 1800.0).abs() < 1e-9);
        assert!((s.worn - 500.0).abs() < 1e-9);
        assert!((s.consumable - 300.0).abs() < 1e-9);
        assert!((s.base - 1000.0).abs() < 1e-9);
    }

    #[test]
    fn test_summary_missing_unit_is_grams() {
        let items = vec![
            view(Some(453.59237), None, 1.0, false, false),
            view(None, Some("oz"), 2.0, false, false),
        ];
        let s = PackWeightSummary::compute(&items, WeightUnit::Lb);
        assert!((s.total - 1.0).abs() < 1e-9);
        assert_eq!(s.unit, WeightUnit::Lb);
    }

    #[test]
    fn test_summary_worn_consumable_counts_once() {
        let items = vec![view(Some(16.0), Some("oz"), 1.0, true, true)];
        let s = PackWeightSummary::compute(&items, WeightUnit::Lb);
        assert!((s.worn - 1.0).abs() < 1e-9);
        assert_eq!(s.consumable, 0.0);
        assert!((s.total - 1.0).abs() < 1e-9);
    }
}
