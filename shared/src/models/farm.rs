//! Farm models

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::types::ParseEnumError;

/// A farm, the root record every crop, task and ledger entry points at
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Farm {
    pub id: Uuid,
    pub name: String,
    pub location: String,
    /// Size in acres
    pub size: Decimal,
    pub soil_type: SoilType,
    pub created_at: DateTime<Utc>,
}

/// Input for creating or replacing a farm
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FarmInput {
    pub name: String,
    pub location: String,
    pub size: Decimal,
    pub soil_type: SoilType,
}

impl Farm {
    /// Build a farm from form input; the store supplies id and timestamp
    pub fn from_input(id: Uuid, input: FarmInput, created_at: DateTime<Utc>) -> Self {
        Self {
            id,
            name: input.name,
            location: input.location,
            size: input.size,
            soil_type: input.soil_type,
            created_at,
        }
    }
}

/// Dominant soil type of a farm
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "snake_case")]
pub enum SoilType {
    Clay,
    Sandy,
    #[default]
    Loamy,
    Silty,
}

impl SoilType {
    pub const ALL: [SoilType; 4] = [
        SoilType::Clay,
        SoilType::Sandy,
        SoilType::Loamy,
        SoilType::Silty,
    ];
}

impl std::fmt::Display for SoilType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SoilType::Clay => write!(f, "Clay"),
            SoilType::Sandy => write!(f, "Sandy"),
            SoilType::Loamy => write!(f, "Loamy"),
            SoilType::Silty => write!(f, "Silty"),
        }
    }
}

impl std::str::FromStr for SoilType {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|soil| soil.to_string().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| ParseEnumError::new("soil type", s))
    }
}
