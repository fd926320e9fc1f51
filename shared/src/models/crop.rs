//! Crop models

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A crop planted on a farm
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Crop {
    pub id: Uuid,
    pub farm_id: Uuid,
    pub name: String,
    pub variety: String,
    /// Planted area in acres
    pub area: Decimal,
    pub planting_date: NaiveDate,
    pub expected_harvest_date: NaiveDate,
    pub status: CropStatus,
}

/// Input for creating or replacing a crop
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CropInput {
    pub farm_id: Uuid,
    pub name: String,
    pub variety: String,
    pub area: Decimal,
    pub planting_date: NaiveDate,
    pub expected_harvest_date: NaiveDate,
    #[serde(default)]
    pub status: CropStatus,
}

impl Crop {
    pub fn from_input(id: Uuid, input: CropInput) -> Self {
        Self {
            id,
            farm_id: input.farm_id,
            name: input.name,
            variety: input.variety,
            area: input.area,
            planting_date: input.planting_date,
            expected_harvest_date: input.expected_harvest_date,
            status: input.status,
        }
    }

    /// Harvested crops no longer count towards the active total
    pub fn is_active(&self) -> bool {
        self.status != CropStatus::Harvested
    }

    /// Days between planting and expected harvest
    pub fn growing_days(&self) -> i64 {
        (self.expected_harvest_date - self.planting_date).num_days()
    }
}

/// Growth stage of a crop
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "snake_case")]
pub enum CropStatus {
    #[default]
    Planted,
    Growing,
    Ready,
    Harvested,
}

impl std::fmt::Display for CropStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CropStatus::Planted => write!(f, "Planted"),
            CropStatus::Growing => write!(f, "Growing"),
            CropStatus::Ready => write!(f, "Ready"),
            CropStatus::Harvested => write!(f, "Harvested"),
        }
    }
}
