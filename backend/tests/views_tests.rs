//! Derived view property-based and unit tests
//!
//! Covers:
//! - Category totals add up to the overall expense total
//! - Upcoming and overdue task windows and ordering
//! - Monthly series alignment and chronological month axis

use std::collections::{BTreeMap, BTreeSet};

use chrono::{Days, NaiveDate};
use proptest::prelude::*;
use rust_decimal::Decimal;
use shared::{
    dashboard_summary, expenses_by_category, monthly_expenses_by_category, overdue_tasks,
    revenue_vs_expenses, total_expenses, upcoming_tasks, Expense, ExpenseCategory, FarmTask,
    MonthKey, Revenue, StoreSnapshot, TaskPriority, TaskStatus, EXPENSES_SERIES, REVENUE_SERIES,
};
use uuid::Uuid;

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn base_date() -> NaiveDate {
    date(2024, 1, 1)
}

fn task(due_date: NaiveDate, status: TaskStatus) -> FarmTask {
    FarmTask {
        id: Uuid::new_v4(),
        farm_id: Uuid::new_v4(),
        crop_id: None,
        title: "Check irrigation".to_string(),
        description: String::new(),
        due_date,
        priority: TaskPriority::Medium,
        status,
    }
}

fn expense(amount: Decimal, category: ExpenseCategory, date: NaiveDate) -> Expense {
    Expense {
        id: Uuid::new_v4(),
        farm_id: Uuid::new_v4(),
        crop_id: None,
        amount,
        category,
        description: "Supplies".to_string(),
        date,
    }
}

fn revenue(amount: Decimal, date: NaiveDate) -> Revenue {
    Revenue {
        id: Uuid::new_v4(),
        farm_id: Uuid::new_v4(),
        crop_id: None,
        amount,
        description: "Market sale".to_string(),
        date,
    }
}

// ============================================================================
// Property Test Strategies
// ============================================================================

/// Amounts in cents between 0 and 100,000.00
fn amount_strategy() -> impl Strategy<Value = Decimal> {
    (0i64..=10_000_000).prop_map(|cents| Decimal::new(cents, 2))
}

/// Dates spread over roughly three years from 2024-01-01
fn date_strategy() -> impl Strategy<Value = NaiveDate> {
    (0u64..1100).prop_map(|offset| base_date() + Days::new(offset))
}

fn category_strategy() -> impl Strategy<Value = ExpenseCategory> {
    prop::sample::select(ExpenseCategory::ALL.to_vec())
}

fn status_strategy() -> impl Strategy<Value = TaskStatus> {
    prop::sample::select(vec![
        TaskStatus::NotStarted,
        TaskStatus::InProgress,
        TaskStatus::Completed,
        TaskStatus::OnHold,
    ])
}

fn expenses_strategy() -> impl Strategy<Value = Vec<Expense>> {
    prop::collection::vec(
        (amount_strategy(), category_strategy(), date_strategy())
            .prop_map(|(amount, category, date)| expense(amount, category, date)),
        0..40,
    )
}

fn revenues_strategy() -> impl Strategy<Value = Vec<Revenue>> {
    prop::collection::vec(
        (amount_strategy(), date_strategy()).prop_map(|(amount, date)| revenue(amount, date)),
        0..40,
    )
}

/// Tasks due within a month either side of `today`
fn tasks_strategy() -> impl Strategy<Value = Vec<FarmTask>> {
    prop::collection::vec(
        (0u64..60, status_strategy()).prop_map(|(offset, status)| {
            task(date(2024, 3, 11) + Days::new(offset), status)
        }),
        0..40,
    )
}

// ============================================================================
// Property-Based Tests
// ============================================================================

proptest! {
    /// Category totals partition the overall total
    #[test]
    fn test_category_totals_sum_to_total(expenses in expenses_strategy()) {
        let by_category = expenses_by_category(&expenses);
        let sum: Decimal = by_category.iter().map(|c| c.total).sum();
        prop_assert_eq!(sum, total_expenses(&expenses));

        let unique: BTreeSet<_> = by_category.iter().map(|c| c.category.to_string()).collect();
        prop_assert_eq!(unique.len(), by_category.len(), "Each category appears once");
    }

    /// Upcoming tasks are pending, inside the 7-day window, earliest first
    #[test]
    fn test_upcoming_tasks_window(tasks in tasks_strategy(), day in 0u64..60) {
        let today = date(2024, 3, 11) + Days::new(day);
        let horizon = today + Days::new(7);
        let upcoming = upcoming_tasks(&tasks, today);

        for task in &upcoming {
            prop_assert!(!task.completed());
            prop_assert!(task.due_date > today && task.due_date < horizon);
        }
        for pair in upcoming.windows(2) {
            prop_assert!(pair[0].due_date <= pair[1].due_date);
        }

        let expected = tasks
            .iter()
            .filter(|t| !t.completed() && t.due_date > today && t.due_date < horizon)
            .count();
        prop_assert_eq!(upcoming.len(), expected);
    }

    /// Overdue tasks are pending and due before today; never also upcoming
    #[test]
    fn test_overdue_tasks_disjoint_from_upcoming(tasks in tasks_strategy(), day in 0u64..60) {
        let today = date(2024, 3, 11) + Days::new(day);
        let overdue = overdue_tasks(&tasks, today);
        let upcoming: BTreeSet<Uuid> = upcoming_tasks(&tasks, today).iter().map(|t| t.id).collect();

        for task in &overdue {
            prop_assert!(!task.completed());
            prop_assert!(task.due_date < today);
            prop_assert!(!upcoming.contains(&task.id));
        }
    }

    /// Every expense lands in exactly one cell of the category-by-month grid
    #[test]
    fn test_monthly_category_grid_matches_input(expenses in expenses_strategy()) {
        let grid = monthly_expenses_by_category(&expenses);

        let grand_total: Decimal = grid.series.iter().flat_map(|s| s.data.iter()).sum();
        prop_assert_eq!(grand_total, total_expenses(&expenses));

        for series in &grid.series {
            prop_assert_eq!(series.data.len(), grid.months.len());
        }

        let mut cells: BTreeMap<(String, String), Decimal> = BTreeMap::new();
        for e in &expenses {
            *cells
                .entry((e.category.to_string(), MonthKey::of(e.date).label()))
                .or_default() += e.amount;
        }
        for series in &grid.series {
            for month in &grid.months {
                let expected = cells
                    .get(&(series.name.clone(), month.clone()))
                    .copied()
                    .unwrap_or(Decimal::ZERO);
                prop_assert_eq!(grid.value(&series.name, month), Some(expected));
            }
        }

        let expected_axis: Vec<String> = expenses
            .iter()
            .map(|e| MonthKey::of(e.date))
            .collect::<BTreeSet<_>>()
            .iter()
            .map(MonthKey::label)
            .collect();
        prop_assert_eq!(&grid.months, &expected_axis);
    }

    /// Revenue and expense series line up with per-month sums over the union axis
    #[test]
    fn test_revenue_vs_expenses_alignment(
        revenues in revenues_strategy(),
        expenses in expenses_strategy()
    ) {
        let chart = revenue_vs_expenses(&revenues, &expenses);

        let mut expected: BTreeMap<MonthKey, (Decimal, Decimal)> = BTreeMap::new();
        for r in &revenues {
            expected.entry(MonthKey::of(r.date)).or_default().0 += r.amount;
        }
        for e in &expenses {
            expected.entry(MonthKey::of(e.date)).or_default().1 += e.amount;
        }

        prop_assert_eq!(chart.months.len(), expected.len());
        for (month, (earned, spent)) in &expected {
            let label = month.label();
            prop_assert_eq!(chart.value(REVENUE_SERIES, &label), Some(*earned));
            prop_assert_eq!(chart.value(EXPENSES_SERIES, &label), Some(*spent));
        }
    }
}

// ============================================================================
// Unit Tests: Task Windows
// ============================================================================

#[cfg(test)]
mod task_window_tests {
    use super::*;

    #[test]
    fn test_dashboard_scenario() {
        let today = date(2024, 4, 10);
        let tasks = vec![
            task(date(2024, 4, 10), TaskStatus::NotStarted),
            task(date(2024, 4, 12), TaskStatus::NotStarted),
            task(date(2024, 4, 8), TaskStatus::InProgress),
            task(date(2024, 4, 5), TaskStatus::Completed),
            task(date(2024, 4, 20), TaskStatus::NotStarted),
        ];

        let upcoming = upcoming_tasks(&tasks, today);
        assert_eq!(upcoming.len(), 1);
        assert_eq!(upcoming[0].due_date, date(2024, 4, 12));

        let overdue = overdue_tasks(&tasks, today);
        assert_eq!(overdue.len(), 1);
        assert_eq!(overdue[0].due_date, date(2024, 4, 8));
    }

    #[test]
    fn test_window_bounds_are_exclusive() {
        let today = date(2024, 4, 10);
        let tasks = vec![
            task(date(2024, 4, 11), TaskStatus::NotStarted),
            task(date(2024, 4, 16), TaskStatus::NotStarted),
            task(date(2024, 4, 17), TaskStatus::NotStarted),
        ];
        let due: Vec<_> = upcoming_tasks(&tasks, today).iter().map(|t| t.due_date).collect();
        assert_eq!(due, vec![date(2024, 4, 11), date(2024, 4, 16)]);
    }
}

// ============================================================================
// Unit Tests: Dashboard Summary
// ============================================================================

#[cfg(test)]
mod summary_tests {
    use super::*;

    #[test]
    fn test_summary_counts_and_totals() {
        let snapshot = StoreSnapshot {
            tasks: vec![
                task(date(2024, 4, 12), TaskStatus::NotStarted),
                task(date(2024, 4, 1), TaskStatus::OnHold),
                task(date(2024, 4, 1), TaskStatus::Completed),
            ],
            expenses: vec![
                expense(Decimal::new(25000, 2), ExpenseCategory::Seeds, date(2024, 1, 10)),
                expense(Decimal::new(120000, 2), ExpenseCategory::Equipment, date(2024, 1, 20)),
            ],
            revenues: vec![revenue(Decimal::new(85000, 2), date(2024, 1, 28))],
            ..StoreSnapshot::default()
        };

        let summary = dashboard_summary(&snapshot, date(2024, 4, 10));
        assert_eq!(summary.pending_tasks, 2);
        assert_eq!(summary.upcoming_tasks, 1);
        assert_eq!(summary.overdue_tasks, 1);
        assert_eq!(summary.total_expenses, Decimal::new(145000, 2));
        assert_eq!(summary.total_revenue, Decimal::new(85000, 2));
    }

    #[test]
    fn test_empty_snapshot_summary() {
        let summary = dashboard_summary(&StoreSnapshot::default(), date(2024, 4, 10));
        assert_eq!(summary.total_farms, 0);
        assert_eq!(summary.total_expenses, Decimal::ZERO);
    }
}
