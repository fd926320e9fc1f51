//! Expense and revenue ledger models

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::types::ParseEnumError;

/// Anything with a dated monetary amount that can be bucketed by month
pub trait LedgerEntry {
    fn amount(&self) -> Decimal;
    fn date(&self) -> NaiveDate;
}

/// Money spent on a farm, optionally attributed to one crop
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Expense {
    pub id: Uuid,
    pub farm_id: Uuid,
    pub crop_id: Option<Uuid>,
    /// Currency amount, two decimal places
    pub amount: Decimal,
    pub category: ExpenseCategory,
    pub description: String,
    pub date: NaiveDate,
}

/// Input for creating or replacing an expense
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExpenseInput {
    pub farm_id: Uuid,
    pub crop_id: Option<Uuid>,
    pub amount: Decimal,
    pub category: ExpenseCategory,
    #[serde(default)]
    pub description: String,
    pub date: NaiveDate,
}

impl Expense {
    pub fn from_input(id: Uuid, input: ExpenseInput) -> Self {
        Self {
            id,
            farm_id: input.farm_id,
            crop_id: input.crop_id,
            amount: input.amount,
            category: input.category,
            description: input.description,
            date: input.date,
        }
    }
}

impl LedgerEntry for Expense {
    fn amount(&self) -> Decimal {
        self.amount
    }

    fn date(&self) -> NaiveDate {
        self.date
    }
}

/// Income from a farm, e.g. a harvest sale
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Revenue {
    pub id: Uuid,
    pub farm_id: Uuid,
    pub crop_id: Option<Uuid>,
    pub amount: Decimal,
    pub description: String,
    pub date: NaiveDate,
}

/// Input for creating or replacing a revenue entry
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RevenueInput {
    pub farm_id: Uuid,
    pub crop_id: Option<Uuid>,
    pub amount: Decimal,
    #[serde(default)]
    pub description: String,
    pub date: NaiveDate,
}

impl Revenue {
    pub fn from_input(id: Uuid, input: RevenueInput) -> Self {
        Self {
            id,
            farm_id: input.farm_id,
            crop_id: input.crop_id,
            amount: input.amount,
            description: input.description,
            date: input.date,
        }
    }
}

impl LedgerEntry for Revenue {
    fn amount(&self) -> Decimal {
        self.amount
    }

    fn date(&self) -> NaiveDate {
        self.date
    }
}

/// Expense categories offered by the expense form
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum ExpenseCategory {
    Seeds,
    Fertilizer,
    Equipment,
    Labor,
    Fuel,
    Maintenance,
    Other,
}

impl ExpenseCategory {
    pub const ALL: [ExpenseCategory; 7] = [
        ExpenseCategory::Seeds,
        ExpenseCategory::Fertilizer,
        ExpenseCategory::Equipment,
        ExpenseCategory::Labor,
        ExpenseCategory::Fuel,
        ExpenseCategory::Maintenance,
        ExpenseCategory::Other,
    ];
}

impl std::fmt::Display for ExpenseCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ExpenseCategory::Seeds => write!(f, "Seeds"),
            ExpenseCategory::Fertilizer => write!(f, "Fertilizer"),
            ExpenseCategory::Equipment => write!(f, "Equipment"),
            ExpenseCategory::Labor => write!(f, "Labor"),
            ExpenseCategory::Fuel => write!(f, "Fuel"),
            ExpenseCategory::Maintenance => write!(f, "Maintenance"),
            ExpenseCategory::Other => write!(f, "Other"),
        }
    }
}

impl std::str::FromStr for ExpenseCategory {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|category| category.to_string().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| ParseEnumError::new("expense category", s))
    }
}
