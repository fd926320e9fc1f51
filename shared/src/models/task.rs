//! Farm task models

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A scheduled piece of farm work
///
/// Completion is carried by `status` alone; `completed()` is a projection of it,
/// so a task can never be both "Completed" and pending.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FarmTask {
    pub id: Uuid,
    pub farm_id: Uuid,
    pub crop_id: Option<Uuid>,
    pub title: String,
    pub description: String,
    pub due_date: NaiveDate,
    pub priority: TaskPriority,
    pub status: TaskStatus,
}

/// Input for creating or replacing a task
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FarmTaskInput {
    pub farm_id: Uuid,
    pub crop_id: Option<Uuid>,
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub due_date: NaiveDate,
    #[serde(default)]
    pub priority: TaskPriority,
    #[serde(default)]
    pub status: TaskStatus,
}

impl FarmTask {
    pub fn from_input(id: Uuid, input: FarmTaskInput) -> Self {
        Self {
            id,
            farm_id: input.farm_id,
            crop_id: input.crop_id,
            title: input.title,
            description: input.description,
            due_date: input.due_date,
            priority: input.priority,
            status: input.status,
        }
    }

    pub fn completed(&self) -> bool {
        self.status.is_completed()
    }
}

/// Task urgency
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
#[serde(rename_all = "snake_case")]
pub enum TaskPriority {
    Low,
    #[default]
    Medium,
    High,
}

impl std::fmt::Display for TaskPriority {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TaskPriority::Low => write!(f, "Low"),
            TaskPriority::Medium => write!(f, "Medium"),
            TaskPriority::High => write!(f, "High"),
        }
    }
}

/// Task progress
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    #[default]
    NotStarted,
    InProgress,
    Completed,
    OnHold,
}

impl TaskStatus {
    pub fn is_completed(&self) -> bool {
        matches!(self, TaskStatus::Completed)
    }

    /// Status after a completion toggle. Reopening a task always lands on `NotStarted`.
    pub fn toggled(&self) -> Self {
        match self {
            TaskStatus::Completed => TaskStatus::NotStarted,
            _ => TaskStatus::Completed,
        }
    }
}

impl std::fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TaskStatus::NotStarted => write!(f, "Not Started"),
            TaskStatus::InProgress => write!(f, "In Progress"),
            TaskStatus::Completed => write!(f, "Completed"),
            TaskStatus::OnHold => write!(f, "On Hold"),
        }
    }
}
