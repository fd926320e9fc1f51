//! In-memory store for farms, crops, tasks, expenses and revenues
//!
//! The store is owned by the application context. Readers take a
//! [`StoreSnapshot`]; writers append, replace by id or remove by id. Deleting a
//! farm does not touch the records that reference it.

use chrono::{Days, NaiveDate, Utc};
use rust_decimal::Decimal;
use shared::{
    validate_crop, validate_expense, validate_farm, validate_revenue, validate_task, Crop,
    CropInput, CropStatus, Expense, ExpenseCategory, ExpenseInput, Farm, FarmDependents,
    FarmInput, FarmTask, FarmTaskInput, FieldError, Revenue, RevenueInput, SoilType,
    StoreSnapshot, TaskPriority, TaskStatus,
};
use uuid::Uuid;

use crate::error::{AppError, AppResult};

/// A record addressable by id within its collection
trait Record {
    const KIND: &'static str;
    fn id(&self) -> Uuid;
}

impl Record for Farm {
    const KIND: &'static str = "Farm";
    fn id(&self) -> Uuid {
        self.id
    }
}

impl Record for Crop {
    const KIND: &'static str = "Crop";
    fn id(&self) -> Uuid {
        self.id
    }
}

impl Record for FarmTask {
    const KIND: &'static str = "Task";
    fn id(&self) -> Uuid {
        self.id
    }
}

impl Record for Expense {
    const KIND: &'static str = "Expense";
    fn id(&self) -> Uuid {
        self.id
    }
}

impl Record for Revenue {
    const KIND: &'static str = "Revenue";
    fn id(&self) -> Uuid {
        self.id
    }
}

fn position<T: Record>(items: &[T], id: Uuid) -> AppResult<usize> {
    items
        .iter()
        .position(|item| item.id() == id)
        .ok_or_else(|| AppError::NotFound(T::KIND.to_string()))
}

fn replace<T: Record + Clone>(items: &mut [T], record: T) -> AppResult<T> {
    let index = position(items, record.id())?;
    items[index] = record.clone();
    tracing::info!("{} {} updated", T::KIND, record.id());
    Ok(record)
}

fn remove<T: Record>(items: &mut Vec<T>, id: Uuid) -> AppResult<T> {
    let index = position(items, id)?;
    let removed = items.remove(index);
    tracing::info!("{} {} deleted", T::KIND, id);
    Ok(removed)
}

fn append<T: Record + Clone>(items: &mut Vec<T>, record: T) -> T {
    tracing::info!("{} {} added", T::KIND, record.id());
    items.push(record.clone());
    record
}

fn check(result: Result<(), FieldError>) -> AppResult<()> {
    result.map_err(|(field, message)| AppError::validation(field, message))
}

/// In-memory collections backing the dashboard
#[derive(Debug, Clone, Default)]
pub struct FarmStore {
    farms: Vec<Farm>,
    crops: Vec<Crop>,
    tasks: Vec<FarmTask>,
    expenses: Vec<Expense>,
    revenues: Vec<Revenue>,
}

impl FarmStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Owned copy of every collection for derived views
    pub fn snapshot(&self) -> StoreSnapshot {
        StoreSnapshot {
            farms: self.farms.clone(),
            crops: self.crops.clone(),
            tasks: self.tasks.clone(),
            expenses: self.expenses.clone(),
            revenues: self.revenues.clone(),
        }
    }

    pub fn farms(&self) -> &[Farm] {
        &self.farms
    }

    pub fn crops(&self) -> &[Crop] {
        &self.crops
    }

    pub fn tasks(&self) -> &[FarmTask] {
        &self.tasks
    }

    pub fn expenses(&self) -> &[Expense] {
        &self.expenses
    }

    pub fn revenues(&self) -> &[Revenue] {
        &self.revenues
    }

    // ========================================================================
    // Farms
    // ========================================================================

    pub fn add_farm(&mut self, input: FarmInput) -> AppResult<Farm> {
        check(validate_farm(&input))?;
        let farm = Farm::from_input(Uuid::new_v4(), input, Utc::now());
        Ok(append(&mut self.farms, farm))
    }

    /// Replace a farm's fields, keeping its id and creation time
    pub fn update_farm(&mut self, id: Uuid, input: FarmInput) -> AppResult<Farm> {
        check(validate_farm(&input))?;
        let created_at = self.farms[position(&self.farms, id)?].created_at;
        replace(&mut self.farms, Farm::from_input(id, input, created_at))
    }

    /// Remove a farm. Its crops, tasks and ledger entries stay, pointing at a
    /// farm that no longer exists.
    pub fn remove_farm(&mut self, id: Uuid) -> AppResult<Farm> {
        let farm = remove(&mut self.farms, id)?;
        let dependents = self.dependents(id);
        if !dependents.is_empty() {
            tracing::warn!(
                "Farm {} deleted with {} dependent records left orphaned",
                id,
                dependents.total()
            );
        }
        Ok(farm)
    }

    /// Records that reference a farm, counted in place
    pub fn dependents(&self, farm_id: Uuid) -> FarmDependents {
        FarmDependents {
            crops: self.crops.iter().filter(|c| c.farm_id == farm_id).count(),
            tasks: self.tasks.iter().filter(|t| t.farm_id == farm_id).count(),
            expenses: self.expenses.iter().filter(|e| e.farm_id == farm_id).count(),
            revenues: self.revenues.iter().filter(|r| r.farm_id == farm_id).count(),
        }
    }

    // ========================================================================
    // Crops
    // ========================================================================

    pub fn add_crop(&mut self, input: CropInput) -> AppResult<Crop> {
        check(validate_crop(&input))?;
        Ok(append(&mut self.crops, Crop::from_input(Uuid::new_v4(), input)))
    }

    pub fn update_crop(&mut self, id: Uuid, input: CropInput) -> AppResult<Crop> {
        check(validate_crop(&input))?;
        replace(&mut self.crops, Crop::from_input(id, input))
    }

    pub fn remove_crop(&mut self, id: Uuid) -> AppResult<Crop> {
        remove(&mut self.crops, id)
    }

    // ========================================================================
    // Tasks
    // ========================================================================

    pub fn add_task(&mut self, input: FarmTaskInput) -> AppResult<FarmTask> {
        check(validate_task(&input))?;
        Ok(append(&mut self.tasks, FarmTask::from_input(Uuid::new_v4(), input)))
    }

    pub fn update_task(&mut self, id: Uuid, input: FarmTaskInput) -> AppResult<FarmTask> {
        check(validate_task(&input))?;
        replace(&mut self.tasks, FarmTask::from_input(id, input))
    }

    pub fn remove_task(&mut self, id: Uuid) -> AppResult<FarmTask> {
        remove(&mut self.tasks, id)
    }

    /// Flip a task between completed and not started
    pub fn toggle_task(&mut self, id: Uuid) -> AppResult<FarmTask> {
        let index = position(&self.tasks, id)?;
        let task = &mut self.tasks[index];
        task.status = task.status.toggled();
        tracing::info!("Task {} marked {}", id, task.status);
        Ok(task.clone())
    }

    pub fn set_task_status(&mut self, id: Uuid, status: TaskStatus) -> AppResult<FarmTask> {
        let index = position(&self.tasks, id)?;
        self.tasks[index].status = status;
        tracing::info!("Task {} marked {}", id, status);
        Ok(self.tasks[index].clone())
    }

    // ========================================================================
    // Expenses and revenues
    // ========================================================================

    pub fn add_expense(&mut self, input: ExpenseInput) -> AppResult<Expense> {
        check(validate_expense(&input))?;
        Ok(append(&mut self.expenses, Expense::from_input(Uuid::new_v4(), input)))
    }

    pub fn update_expense(&mut self, id: Uuid, input: ExpenseInput) -> AppResult<Expense> {
        check(validate_expense(&input))?;
        replace(&mut self.expenses, Expense::from_input(id, input))
    }

    pub fn remove_expense(&mut self, id: Uuid) -> AppResult<Expense> {
        remove(&mut self.expenses, id)
    }

    pub fn add_revenue(&mut self, input: RevenueInput) -> AppResult<Revenue> {
        check(validate_revenue(&input))?;
        Ok(append(&mut self.revenues, Revenue::from_input(Uuid::new_v4(), input)))
    }

    pub fn update_revenue(&mut self, id: Uuid, input: RevenueInput) -> AppResult<Revenue> {
        check(validate_revenue(&input))?;
        replace(&mut self.revenues, Revenue::from_input(id, input))
    }

    pub fn remove_revenue(&mut self, id: Uuid) -> AppResult<Revenue> {
        remove(&mut self.revenues, id)
    }

    // ========================================================================
    // Sample data
    // ========================================================================

    /// Store seeded with the demo records shown on first load.
    /// Task due dates are relative to `today`; everything else is fixed.
    pub fn with_sample_data(today: NaiveDate) -> Self {
        let green_valley = Farm {
            id: Uuid::new_v4(),
            name: "Green Valley Farm".to_string(),
            location: "California, USA".to_string(),
            size: Decimal::from(150),
            soil_type: SoilType::Loamy,
            created_at: ymd(2023, 1, 15).and_hms_opt(0, 0, 0).unwrap_or_default().and_utc(),
        };
        let sunrise = Farm {
            id: Uuid::new_v4(),
            name: "Sunrise Acres".to_string(),
            location: "Texas, USA".to_string(),
            size: Decimal::from(200),
            soil_type: SoilType::Clay,
            created_at: ymd(2023, 3, 20).and_hms_opt(0, 0, 0).unwrap_or_default().and_utc(),
        };

        let tomatoes = Crop {
            id: Uuid::new_v4(),
            farm_id: green_valley.id,
            name: "Tomatoes".to_string(),
            variety: "Cherry Tomatoes".to_string(),
            area: Decimal::from(25),
            planting_date: ymd(2024, 1, 15),
            expected_harvest_date: ymd(2024, 4, 15),
            status: CropStatus::Growing,
        };
        let corn = Crop {
            id: Uuid::new_v4(),
            farm_id: green_valley.id,
            name: "Corn".to_string(),
            variety: "Sweet Corn".to_string(),
            area: Decimal::from(50),
            planting_date: ymd(2024, 2, 1),
            expected_harvest_date: ymd(2024, 6, 1),
            status: CropStatus::Planted,
        };

        let tasks = vec![
            FarmTask {
                id: Uuid::new_v4(),
                farm_id: green_valley.id,
                crop_id: Some(tomatoes.id),
                title: "Water Tomatoes".to_string(),
                description: "Daily watering of cherry tomato plants".to_string(),
                due_date: today,
                priority: TaskPriority::High,
                status: TaskStatus::NotStarted,
            },
            FarmTask {
                id: Uuid::new_v4(),
                farm_id: green_valley.id,
                crop_id: Some(corn.id),
                title: "Fertilize Corn".to_string(),
                description: "Apply organic fertilizer to corn field".to_string(),
                due_date: today.checked_add_days(Days::new(2)).unwrap_or(today),
                priority: TaskPriority::Medium,
                status: TaskStatus::NotStarted,
            },
        ];

        let expenses = vec![
            Expense {
                id: Uuid::new_v4(),
                farm_id: green_valley.id,
                crop_id: Some(tomatoes.id),
                amount: Decimal::new(25000, 2),
                category: ExpenseCategory::Seeds,
                description: "Cherry tomato seeds".to_string(),
                date: ymd(2024, 1, 10),
            },
            Expense {
                id: Uuid::new_v4(),
                farm_id: green_valley.id,
                crop_id: None,
                amount: Decimal::new(120000, 2),
                category: ExpenseCategory::Equipment,
                description: "Irrigation system upgrade".to_string(),
                date: ymd(2024, 1, 20),
            },
        ];

        let revenues = vec![
            Revenue {
                id: Uuid::new_v4(),
                farm_id: green_valley.id,
                crop_id: None,
                amount: Decimal::new(85000, 2),
                description: "Farmers market sales".to_string(),
                date: ymd(2024, 1, 28),
            },
            Revenue {
                id: Uuid::new_v4(),
                farm_id: green_valley.id,
                crop_id: Some(tomatoes.id),
                amount: Decimal::new(320000, 2),
                description: "Cherry tomato harvest sale".to_string(),
                date: ymd(2024, 4, 20),
            },
        ];

        Self {
            farms: vec![green_valley, sunrise],
            crops: vec![tomatoes, corn],
            tasks,
            expenses,
            revenues,
        }
    }
}

fn ymd(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).unwrap_or_default()
}
