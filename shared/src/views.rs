//! Derived views over the dashboard collections
//!
//! Read-only projections recomputed on every render: task windows, expense
//! rollups and monthly chart series. Every function is total; empty input
//! yields an empty or zero result. Time-dependent views take `today` explicitly
//! so the window moves as the caller's clock moves.

use std::collections::{BTreeMap, BTreeSet};

use chrono::{Days, NaiveDate};
use rust_decimal::Decimal;
use serde::Serialize;
use uuid::Uuid;

use crate::models::{
    Crop, Expense, ExpenseCategory, Farm, FarmTask, LedgerEntry, StoreSnapshot,
};
use crate::types::MonthKey;

/// Width of the upcoming-task window in days
pub const UPCOMING_WINDOW_DAYS: u64 = 7;

/// Number of expenses shown in the "recent expenses" card
pub const RECENT_EXPENSES_LIMIT: usize = 5;

pub const UNKNOWN_FARM: &str = "Unknown Farm";
pub const GENERAL_CROP: &str = "General";

// ============================================================================
// Tasks
// ============================================================================

/// Pending tasks due strictly after `today` and strictly before `today + 7 days`,
/// earliest first. Tasks sharing a due date keep their input order.
pub fn upcoming_tasks(tasks: &[FarmTask], today: NaiveDate) -> Vec<&FarmTask> {
    let horizon = today
        .checked_add_days(Days::new(UPCOMING_WINDOW_DAYS))
        .unwrap_or(NaiveDate::MAX);

    let mut upcoming: Vec<&FarmTask> = tasks
        .iter()
        .filter(|task| !task.completed() && task.due_date > today && task.due_date < horizon)
        .collect();
    // sort_by_key is stable
    upcoming.sort_by_key(|task| task.due_date);
    upcoming
}

/// Pending tasks due before `today`, in input order
pub fn overdue_tasks(tasks: &[FarmTask], today: NaiveDate) -> Vec<&FarmTask> {
    tasks
        .iter()
        .filter(|task| !task.completed() && task.due_date < today)
        .collect()
}

/// Tasks not yet completed
pub fn pending_tasks(tasks: &[FarmTask]) -> Vec<&FarmTask> {
    tasks.iter().filter(|task| !task.completed()).collect()
}

// ============================================================================
// Expenses
// ============================================================================

/// Total spent on a category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CategoryTotal {
    pub category: ExpenseCategory,
    pub total: Decimal,
}

pub fn total_expenses(expenses: &[Expense]) -> Decimal {
    expenses.iter().map(|expense| expense.amount).sum()
}

/// Per-category sums, in order of each category's first appearance.
/// Categories without expenses do not appear.
pub fn expenses_by_category(expenses: &[Expense]) -> Vec<CategoryTotal> {
    let mut totals: Vec<CategoryTotal> = Vec::new();
    for expense in expenses {
        match totals.iter_mut().find(|t| t.category == expense.category) {
            Some(entry) => entry.total += expense.amount,
            None => totals.push(CategoryTotal {
                category: expense.category,
                total: expense.amount,
            }),
        }
    }
    totals
}

/// The last `limit` expenses recorded, newest first
pub fn recent_expenses(expenses: &[Expense], limit: usize) -> Vec<&Expense> {
    expenses.iter().rev().take(limit).collect()
}

// ============================================================================
// Monthly series
// ============================================================================

/// A named line or bar series aligned to `MonthlySeries::months`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NamedSeries {
    pub name: String,
    pub data: Vec<Decimal>,
}

/// Chart-ready series over a month axis
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct MonthlySeries {
    /// Axis labels, "Mon YYYY", in chronological order
    pub months: Vec<String>,
    pub series: Vec<NamedSeries>,
}

impl MonthlySeries {
    /// Value of a series at a month label, if both exist
    pub fn value(&self, series: &str, month: &str) -> Option<Decimal> {
        let month_index = self.months.iter().position(|m| m == month)?;
        self.series
            .iter()
            .find(|s| s.name == series)
            .and_then(|s| s.data.get(month_index).copied())
    }

    pub fn is_empty(&self) -> bool {
        self.months.is_empty()
    }
}

/// Sum of amounts per calendar month
pub fn monthly_totals<T: LedgerEntry>(entries: &[T]) -> BTreeMap<MonthKey, Decimal> {
    let mut totals = BTreeMap::new();
    for entry in entries {
        *totals.entry(MonthKey::of(entry.date())).or_insert(Decimal::ZERO) += entry.amount();
    }
    totals
}

fn month_labels(axis: &[MonthKey]) -> Vec<String> {
    axis.iter().map(MonthKey::label).collect()
}

/// One series per expense category (first-appearance order) across every month
/// that has any expense. Months without spending in a category are 0.
pub fn monthly_expenses_by_category(expenses: &[Expense]) -> MonthlySeries {
    let axis: Vec<MonthKey> = expenses
        .iter()
        .map(|expense| MonthKey::of(expense.date))
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect();

    let mut categories: Vec<ExpenseCategory> = Vec::new();
    let mut data: Vec<Vec<Decimal>> = Vec::new();
    for expense in expenses {
        let row = match categories.iter().position(|c| *c == expense.category) {
            Some(row) => row,
            None => {
                categories.push(expense.category);
                data.push(vec![Decimal::ZERO; axis.len()]);
                categories.len() - 1
            }
        };
        if let Ok(column) = axis.binary_search(&MonthKey::of(expense.date)) {
            data[row][column] += expense.amount;
        }
    }

    MonthlySeries {
        months: month_labels(&axis),
        series: categories
            .into_iter()
            .zip(data)
            .map(|(category, data)| NamedSeries {
                name: category.to_string(),
                data,
            })
            .collect(),
    }
}

pub const REVENUE_SERIES: &str = "Revenue";
pub const EXPENSES_SERIES: &str = "Expenses";

/// Revenue and expense totals over the union of their months
pub fn revenue_vs_expenses<R: LedgerEntry, E: LedgerEntry>(
    revenues: &[R],
    expenses: &[E],
) -> MonthlySeries {
    let revenue = monthly_totals(revenues);
    let spent = monthly_totals(expenses);

    let axis: Vec<MonthKey> = revenue
        .keys()
        .chain(spent.keys())
        .copied()
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect();

    let align = |totals: &BTreeMap<MonthKey, Decimal>| -> Vec<Decimal> {
        axis.iter()
            .map(|month| totals.get(month).copied().unwrap_or(Decimal::ZERO))
            .collect()
    };

    MonthlySeries {
        months: month_labels(&axis),
        series: vec![
            NamedSeries {
                name: REVENUE_SERIES.to_string(),
                data: align(&revenue),
            },
            NamedSeries {
                name: EXPENSES_SERIES.to_string(),
                data: align(&spent),
            },
        ],
    }
}

// ============================================================================
// Dashboard
// ============================================================================

/// Headline numbers of the overview tab
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DashboardSummary {
    pub total_farms: usize,
    pub active_crops: usize,
    pub pending_tasks: usize,
    pub upcoming_tasks: usize,
    pub overdue_tasks: usize,
    pub total_expenses: Decimal,
    pub total_revenue: Decimal,
}

pub fn dashboard_summary(snapshot: &StoreSnapshot, today: NaiveDate) -> DashboardSummary {
    DashboardSummary {
        total_farms: snapshot.farms.len(),
        active_crops: snapshot.crops.iter().filter(|crop| crop.is_active()).count(),
        pending_tasks: pending_tasks(&snapshot.tasks).len(),
        upcoming_tasks: upcoming_tasks(&snapshot.tasks, today).len(),
        overdue_tasks: overdue_tasks(&snapshot.tasks, today).len(),
        total_expenses: total_expenses(&snapshot.expenses),
        total_revenue: snapshot.revenues.iter().map(|r| r.amount).sum(),
    }
}

/// Farms whose name, location or soil type contains `query`, ignoring case.
/// A blank query matches every farm.
pub fn search_farms<'a>(farms: &'a [Farm], query: &str) -> Vec<&'a Farm> {
    let query = query.trim().to_lowercase();
    if query.is_empty() {
        return farms.iter().collect();
    }
    farms
        .iter()
        .filter(|farm| {
            farm.name.to_lowercase().contains(&query)
                || farm.location.to_lowercase().contains(&query)
                || farm.soil_type.to_string().to_lowercase().contains(&query)
        })
        .collect()
}

pub fn farm_name(farms: &[Farm], farm_id: Uuid) -> &str {
    farms
        .iter()
        .find(|farm| farm.id == farm_id)
        .map(|farm| farm.name.as_str())
        .unwrap_or(UNKNOWN_FARM)
}

/// Crop name for display; unattributed or unknown crops read "General"
pub fn crop_name(crops: &[Crop], crop_id: Option<Uuid>) -> &str {
    crop_id
        .and_then(|id| crops.iter().find(|crop| crop.id == id))
        .map(|crop| crop.name.as_str())
        .unwrap_or(GENERAL_CROP)
}

pub fn crops_for_farm(crops: &[Crop], farm_id: Uuid) -> Vec<&Crop> {
    crops.iter().filter(|crop| crop.farm_id == farm_id).collect()
}

/// Records that would be orphaned if a farm were deleted
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct FarmDependents {
    pub crops: usize,
    pub tasks: usize,
    pub expenses: usize,
    pub revenues: usize,
}

impl FarmDependents {
    pub fn total(&self) -> usize {
        self.crops + self.tasks + self.expenses + self.revenues
    }

    pub fn is_empty(&self) -> bool {
        self.total() == 0
    }
}

pub fn farm_dependents(snapshot: &StoreSnapshot, farm_id: Uuid) -> FarmDependents {
    FarmDependents {
        crops: snapshot.crops.iter().filter(|c| c.farm_id == farm_id).count(),
        tasks: snapshot.tasks.iter().filter(|t| t.farm_id == farm_id).count(),
        expenses: snapshot.expenses.iter().filter(|e| e.farm_id == farm_id).count(),
        revenues: snapshot.revenues.iter().filter(|r| r.farm_id == farm_id).count(),
    }
}
