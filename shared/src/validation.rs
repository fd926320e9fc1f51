//! Validation utilities for farm dashboard records
//!
//! Each check returns a static message; the store attaches the field name.

use chrono::NaiveDate;
use rust_decimal::Decimal;

use crate::models::{CropInput, ExpenseInput, FarmInput, FarmTaskInput, RevenueInput};

/// Field name and message of the first failed check
pub type FieldError = (&'static str, &'static str);

// ============================================================================
// Field Validations
// ============================================================================

/// Validate a required text field
pub fn validate_required(value: &str) -> Result<(), &'static str> {
    if value.trim().is_empty() {
        return Err("Field is required");
    }
    Ok(())
}

/// Validate an acreage (farm size or crop area) is strictly positive
pub fn validate_acreage(acres: Decimal) -> Result<(), &'static str> {
    if acres <= Decimal::ZERO {
        return Err("Acreage must be greater than zero");
    }
    Ok(())
}

/// Validate a currency amount: non-negative with at most two decimal places
pub fn validate_amount(amount: Decimal) -> Result<(), &'static str> {
    if amount < Decimal::ZERO {
        return Err("Amount cannot be negative");
    }
    if amount.normalize().scale() > 2 {
        return Err("Amount must have at most two decimal places");
    }
    Ok(())
}

/// Validate the expected harvest does not precede planting
pub fn validate_harvest_window(
    planting_date: NaiveDate,
    expected_harvest_date: NaiveDate,
) -> Result<(), &'static str> {
    if expected_harvest_date < planting_date {
        return Err("Expected harvest date cannot be before planting date");
    }
    Ok(())
}

// ============================================================================
// Record Validations
// ============================================================================

fn field(name: &'static str, result: Result<(), &'static str>) -> Result<(), FieldError> {
    result.map_err(|message| (name, message))
}

pub fn validate_farm(input: &FarmInput) -> Result<(), FieldError> {
    field("name", validate_required(&input.name))?;
    field("location", validate_required(&input.location))?;
    field("size", validate_acreage(input.size))
}

pub fn validate_crop(input: &CropInput) -> Result<(), FieldError> {
    field("name", validate_required(&input.name))?;
    field("area", validate_acreage(input.area))?;
    field(
        "expected_harvest_date",
        validate_harvest_window(input.planting_date, input.expected_harvest_date),
    )
}

pub fn validate_task(input: &FarmTaskInput) -> Result<(), FieldError> {
    field("title", validate_required(&input.title))
}

pub fn validate_expense(input: &ExpenseInput) -> Result<(), FieldError> {
    field("amount", validate_amount(input.amount))
}

pub fn validate_revenue(input: &RevenueInput) -> Result<(), FieldError> {
    field("amount", validate_amount(input.amount))
}
