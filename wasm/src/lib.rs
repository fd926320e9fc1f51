//! WebAssembly module for the Farm Dashboard
//!
//! Exposes the derived views and static weather data to the browser. Records go
//! in and results come out as JSON strings; dates are `YYYY-MM-DD`.

use chrono::NaiveDate;
use serde::Serialize;
use uuid::Uuid;
use wasm_bindgen::prelude::*;

// Re-export shared types for use in JavaScript
pub use shared::models::*;
pub use shared::types::*;

fn parse_json<T: serde::de::DeserializeOwned>(what: &str, json: &str) -> Result<T, String> {
    serde_json::from_str(json).map_err(|e| format!("Invalid {} JSON: {}", what, e))
}

fn parse_date(value: &str) -> Result<NaiveDate, String> {
    value
        .trim()
        .parse::<NaiveDate>()
        .map_err(|e| format!("Invalid date '{}': {}", value, e))
}

fn parse_farm_id(value: &str) -> Result<Uuid, String> {
    Uuid::parse_str(value.trim()).map_err(|e| format!("Invalid farm id: {}", e))
}

fn to_json<T: Serialize + ?Sized>(value: &T) -> Result<String, String> {
    serde_json::to_string(value).map_err(|e| format!("Failed to serialize result: {}", e))
}

fn js_error(message: String) -> JsValue {
    JsValue::from_str(&message)
}

// ============================================================================
// Views
// ============================================================================

fn upcoming_tasks_json(tasks_json: &str, today: &str) -> Result<String, String> {
    let tasks: Vec<FarmTask> = parse_json("tasks", tasks_json)?;
    to_json(&shared::upcoming_tasks(&tasks, parse_date(today)?))
}

fn overdue_tasks_json(tasks_json: &str, today: &str) -> Result<String, String> {
    let tasks: Vec<FarmTask> = parse_json("tasks", tasks_json)?;
    to_json(&shared::overdue_tasks(&tasks, parse_date(today)?))
}

fn total_expenses_string(expenses_json: &str) -> Result<String, String> {
    let expenses: Vec<Expense> = parse_json("expenses", expenses_json)?;
    Ok(shared::total_expenses(&expenses).to_string())
}

fn expenses_by_category_json(expenses_json: &str) -> Result<String, String> {
    let expenses: Vec<Expense> = parse_json("expenses", expenses_json)?;
    to_json(&shared::expenses_by_category(&expenses))
}

fn recent_expenses_json(expenses_json: &str, limit: usize) -> Result<String, String> {
    let expenses: Vec<Expense> = parse_json("expenses", expenses_json)?;
    to_json(&shared::recent_expenses(&expenses, limit))
}

fn monthly_expenses_json(expenses_json: &str) -> Result<String, String> {
    let expenses: Vec<Expense> = parse_json("expenses", expenses_json)?;
    to_json(&shared::monthly_expenses_by_category(&expenses))
}

fn revenue_vs_expenses_json(revenues_json: &str, expenses_json: &str) -> Result<String, String> {
    let revenues: Vec<Revenue> = parse_json("revenues", revenues_json)?;
    let expenses: Vec<Expense> = parse_json("expenses", expenses_json)?;
    to_json(&shared::revenue_vs_expenses(&revenues, &expenses))
}

fn dashboard_summary_json(snapshot_json: &str, today: &str) -> Result<String, String> {
    let snapshot: StoreSnapshot = parse_json("snapshot", snapshot_json)?;
    to_json(&shared::dashboard_summary(&snapshot, parse_date(today)?))
}

fn search_farms_json(farms_json: &str, query: &str) -> Result<String, String> {
    let farms: Vec<Farm> = parse_json("farms", farms_json)?;
    to_json(&shared::search_farms(&farms, query))
}

fn farm_dependents_json(snapshot_json: &str, farm_id: &str) -> Result<String, String> {
    let snapshot: StoreSnapshot = parse_json("snapshot", snapshot_json)?;
    to_json(&shared::farm_dependents(&snapshot, parse_farm_id(farm_id)?))
}

fn crops_for_farm_json(crops_json: &str, farm_id: &str) -> Result<String, String> {
    let crops: Vec<Crop> = parse_json("crops", crops_json)?;
    to_json(&shared::crops_for_farm(&crops, parse_farm_id(farm_id)?))
}

#[wasm_bindgen(js_name = upcomingTasks)]
pub fn upcoming_tasks(tasks_json: &str, today: &str) -> Result<String, JsValue> {
    upcoming_tasks_json(tasks_json, today).map_err(js_error)
}

#[wasm_bindgen(js_name = overdueTasks)]
pub fn overdue_tasks(tasks_json: &str, today: &str) -> Result<String, JsValue> {
    overdue_tasks_json(tasks_json, today).map_err(js_error)
}

/// Sum of all expenses as a decimal string
#[wasm_bindgen(js_name = totalExpenses)]
pub fn total_expenses(expenses_json: &str) -> Result<String, JsValue> {
    total_expenses_string(expenses_json).map_err(js_error)
}

#[wasm_bindgen(js_name = expensesByCategory)]
pub fn expenses_by_category(expenses_json: &str) -> Result<String, JsValue> {
    expenses_by_category_json(expenses_json).map_err(js_error)
}

#[wasm_bindgen(js_name = recentExpenses)]
pub fn recent_expenses(expenses_json: &str, limit: usize) -> Result<String, JsValue> {
    recent_expenses_json(expenses_json, limit).map_err(js_error)
}

#[wasm_bindgen(js_name = monthlyExpensesByCategory)]
pub fn monthly_expenses_by_category(expenses_json: &str) -> Result<String, JsValue> {
    monthly_expenses_json(expenses_json).map_err(js_error)
}

#[wasm_bindgen(js_name = revenueVsExpenses)]
pub fn revenue_vs_expenses(revenues_json: &str, expenses_json: &str) -> Result<String, JsValue> {
    revenue_vs_expenses_json(revenues_json, expenses_json).map_err(js_error)
}

#[wasm_bindgen(js_name = dashboardSummary)]
pub fn dashboard_summary(snapshot_json: &str, today: &str) -> Result<String, JsValue> {
    dashboard_summary_json(snapshot_json, today).map_err(js_error)
}

#[wasm_bindgen(js_name = searchFarms)]
pub fn search_farms(farms_json: &str, query: &str) -> Result<String, JsValue> {
    search_farms_json(farms_json, query).map_err(js_error)
}

/// Counts of records that still reference a farm, shown before deleting it
#[wasm_bindgen(js_name = farmDependents)]
pub fn farm_dependents(snapshot_json: &str, farm_id: &str) -> Result<String, JsValue> {
    farm_dependents_json(snapshot_json, farm_id).map_err(js_error)
}

/// Crops planted on one farm, in insertion order
#[wasm_bindgen(js_name = cropsForFarm)]
pub fn crops_for_farm(crops_json: &str, farm_id: &str) -> Result<String, JsValue> {
    crops_for_farm_json(crops_json, farm_id).map_err(js_error)
}

// ============================================================================
// Validation
// ============================================================================

fn validate_record(kind: &str, json: &str) -> Result<(), String> {
    let result = match kind {
        "farm" => shared::validate_farm(&parse_json("farm", json)?),
        "crop" => shared::validate_crop(&parse_json("crop", json)?),
        "task" => shared::validate_task(&parse_json("task", json)?),
        "expense" => shared::validate_expense(&parse_json("expense", json)?),
        "revenue" => shared::validate_revenue(&parse_json("revenue", json)?),
        other => return Err(format!("Unknown record kind: {}", other)),
    };
    result.map_err(|(field, message)| format!("{}: {}", field, message))
}

/// Check a form before it is saved. Rejects with "field: message".
#[wasm_bindgen(js_name = validateRecord)]
pub fn validate(kind: &str, json: &str) -> Result<(), JsValue> {
    validate_record(kind, json).map_err(js_error)
}

// ============================================================================
// Weather
// ============================================================================

#[derive(Serialize)]
struct RegionOption {
    key: &'static str,
    name: &'static str,
}

fn regions_json() -> Result<String, String> {
    let options: Vec<RegionOption> = Region::ALL
        .iter()
        .map(|region| RegionOption {
            key: region.key(),
            name: region.display_name(),
        })
        .collect();
    to_json(&options)
}

fn fallback_weather_json(region: &str, today: &str) -> Result<String, String> {
    let region: Region = region.parse().map_err(|e: UnsupportedRegion| e.to_string())?;
    to_json(&region.fallback_snapshot(parse_date(today)?))
}

/// Region keys and display names for the region picker
#[wasm_bindgen]
pub fn regions() -> Result<String, JsValue> {
    regions_json().map_err(js_error)
}

/// Static weather for a region, shown before the first live refresh completes
#[wasm_bindgen(js_name = fallbackWeather)]
pub fn fallback_weather(region: &str, today: &str) -> Result<String, JsValue> {
    fallback_weather_json(region, today).map_err(js_error)
}

/// Browser-local date as `YYYY-MM-DD`
#[wasm_bindgen]
pub fn today() -> String {
    let now = js_sys::Date::new_0();
    format!(
        "{:04}-{:02}-{:02}",
        now.get_full_year(),
        now.get_month() + 1,
        now.get_date()
    )
}
