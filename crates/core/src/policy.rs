use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

pub const DEFAULT_SINGLE_INSTANCE_CATEGORIES: &[&str] = &[
    "cafe",
    "fast_food",
    "food_court",
    "ice_cream",
    "restaurant",
    "bakery",
    "spa",
    "internet_cafe",
    "zoo",
    "aquarium",
    "karaoke",
];

pub const DEFAULT_FOOD_CATEGORIES: &[&str] = &[
    "cafe",
    "fast_food",
    "food_court",
    "ice_cream",
    "restaurant",
    "bakery",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InstanceTier {
    /// Consumable venues: at most one pick per zone, only during coverage.
    Single,
    Multi,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MealTier {
    Food,
    NonFood,
}

/// Category classification table. Categories not listed in a set fall into
/// the `Multi` / `NonFood` tier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CategoryPolicy {
    pub single_instance: BTreeSet<String>,
    pub food: BTreeSet<String>,
}

impl Default for CategoryPolicy {
    fn default() -> Self {
        Self {
            single_instance: to_set(DEFAULT_SINGLE_INSTANCE_CATEGORIES),
            food: to_set(DEFAULT_FOOD_CATEGORIES),
        }
    }
}

impl CategoryPolicy {
    pub fn new(single_instance: &[&str], food: &[&str]) -> Self {
        Self {
            single_instance: to_set(single_instance),
            food: to_set(food),
        }
    }

    pub fn instance_tier(&self, category: &str) -> InstanceTier {
        if self.single_instance.contains(category) {
            InstanceTier::Single
        } else {
            InstanceTier::Multi
        }
    }

    pub fn meal_tier(&self, category: &str) -> MealTier {
        if self.food.contains(category) {
            MealTier::Food
        } else {
            MealTier::NonFood
        }
    }

    pub fn is_single_instance(&self, category: &str) -> bool {
        self.instance_tier(category) == InstanceTier::Single
    }

    pub fn is_food(&self, category: &str) -> bool {
        self.meal_tier(category) == MealTier::Food
    }
}

fn to_set(values: &[&str]) -> BTreeSet<String> {
    values.iter().map(|v| v.to_string()).collect()
}
