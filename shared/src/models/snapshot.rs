//! Point-in-time copy of every dashboard collection

use serde::{Deserialize, Serialize};

use super::{Crop, Expense, Farm, FarmTask, Revenue};

/// Owned copy of the store's collections, in insertion order
///
/// Derived views are computed over a snapshot, never over the live store.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct StoreSnapshot {
    pub farms: Vec<Farm>,
    pub crops: Vec<Crop>,
    pub tasks: Vec<FarmTask>,
    pub expenses: Vec<Expense>,
    pub revenues: Vec<Revenue>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::TaskStatus;

    #[test]
    fn test_missing_collections_default_to_empty() {
        let snapshot: StoreSnapshot = serde_json::from_str(r#"{ "farms": [] }"#).unwrap();
        assert_eq!(snapshot, StoreSnapshot::default());
    }

    #[test]
    fn test_task_wire_format() {
        let snapshot: StoreSnapshot = serde_json::from_value(serde_json::json!({
            "tasks": [{
                "id": "6f1c1f4e-8a3b-4f1e-9a57-1d2a3b4c5d01",
                "farm_id": "6f1c1f4e-8a3b-4f1e-9a57-1d2a3b4c5d00",
                "crop_id": null,
                "title": "Water Tomatoes",
                "description": "",
                "due_date": "2024-04-10",
                "priority": "high",
                "status": "in_progress"
            }]
        }))
        .unwrap();

        let task = &snapshot.tasks[0];
        assert_eq!(task.status, TaskStatus::InProgress);
        assert!(!task.completed());
    }
}
