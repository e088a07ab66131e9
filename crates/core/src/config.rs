use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::error::{PlanError, PlanResult};
use crate::models::ZoneId;
use crate::policy::CategoryPolicy;

pub const DEFAULT_ZONE_IDS: &[ZoneId] = &[14, 25, 22];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MealWindow {
    /// Hours after the start hour at which a meal is wanted.
    pub offset_hours: u8,
    pub earliest_hour: u8,
    pub latest_hour: u8,
    pub window_hours: u8,
}

impl Default for MealWindow {
    fn default() -> Self {
        Self {
            offset_hours: 3,
            earliest_hour: 12,
            latest_hour: 14,
            window_hours: 1,
        }
    }
}

impl MealWindow {
    pub fn meal_hour(&self, start_hour: u8) -> i32 {
        (i32::from(start_hour) + i32::from(self.offset_hours))
            .clamp(i32::from(self.earliest_hour), i32::from(self.latest_hour))
    }

    pub fn contains(&self, meal_hour: i32, clock: i32) -> bool {
        clock >= meal_hour && clock <= meal_hour + i32::from(self.window_hours)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlannerConfig {
    pub default_zone_ids: Vec<ZoneId>,
    pub nearest_zone_count: usize,
    pub single_instance_cap: usize,
    pub multi_instance_cap: usize,
    pub meal: MealWindow,
    pub categories: CategoryPolicy,
}

impl Default for PlannerConfig {
    fn default() -> Self {
        Self {
            default_zone_ids: DEFAULT_ZONE_IDS.to_vec(),
            nearest_zone_count: 3,
            single_instance_cap: 1,
            multi_instance_cap: 3,
            meal: MealWindow::default(),
            categories: CategoryPolicy::default(),
        }
    }
}

impl PlannerConfig {
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let raw = fs::read_to_string(path.as_ref()).with_context(|| {
            format!("failed reading planner config at {}", path.as_ref().display())
        })?;
        let config: Self = serde_json::from_str(&raw).context("invalid planner config json")?;
        config.validate()?;
        Ok(config)
    }

    pub fn with_default_zones(mut self, zone_ids: Vec<ZoneId>) -> Self {
        self.default_zone_ids = zone_ids;
        self
    }

    pub fn validate(&self) -> PlanResult<()> {
        if self.nearest_zone_count == 0 {
            return Err(PlanError::config("nearest_zone_count must be at least 1"));
        }
        if self.single_instance_cap == 0 || self.multi_instance_cap == 0 {
            return Err(PlanError::config("per-category caps must be at least 1"));
        }
        if self.meal.earliest_hour > self.meal.latest_hour || self.meal.latest_hour > 23 {
            return Err(PlanError::config(
                "meal window bounds must be ordered hours within 0-23",
            ));
        }
        Ok(())
    }

    pub fn cap_for(&self, category: &str) -> usize {
        if self.categories.is_single_instance(category) {
            self.single_instance_cap
        } else {
            self.multi_instance_cap
        }
    }
}
