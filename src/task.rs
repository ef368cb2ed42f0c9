use serde::{Deserialize, Serialize};
use serde_with::{serde_as, DefaultOnNull};

use crate::sort_order::{RawSortOrder, Sortable};

/// TickTick task status: 0 = Normal (active), 2 = Completed
pub const TICKTICK_TASK_STATUS_COMPLETED: i32 = 2;

#[derive(Debug, Serialize, Deserialize, PartialEq, Clone)]
#[serde(rename_all = "camelCase")]
pub struct TickTickChecklistItem {
    pub id: String,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub status: Option<i32>,
    #[serde(default)]
    pub sort_order: RawSortOrder,
    #[serde(default)]
    pub start_date: Option<String>,
    #[serde(default)]
    pub is_all_day: Option<bool>,
    #[serde(default)]
    pub time_zone: Option<String>,
    #[serde(default)]
    pub completed_time: Option<String>,
}

#[serde_as]
#[derive(Debug, Serialize, Deserialize, PartialEq, Clone)]
#[serde(rename_all = "camelCase")]
pub struct TickTickTask {
    pub id: String,
    pub project_id: String,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub parent_id: Option<String>,
    #[serde(default)]
    pub content: Option<String>,
    #[serde(default)]
    pub desc: Option<String>,
    #[serde(default)]
    pub start_date: Option<String>,
    #[serde(default)]
    pub due_date: Option<String>,
    #[serde(default)]
    pub time_zone: Option<String>,
    #[serde(default)]
    pub is_all_day: Option<bool>,
    /// 0 = None, 1 = Low, 3 = Medium, 5 = High
    #[serde(default)]
    pub priority: Option<i32>,
    #[serde(default)]
    pub status: Option<i32>,
    #[serde(default)]
    pub completed_time: Option<String>,
    #[serde(default)]
    pub sort_order: RawSortOrder,
    #[serde_as(as = "DefaultOnNull")]
    #[serde(default)]
    pub items: Vec<TickTickChecklistItem>,
    #[serde(default)]
    pub tags: Option<Vec<String>>,
}

impl TickTickTask {
    pub fn is_root(&self) -> bool {
        self.parent_id
            .as_deref()
            .map_or(true, |parent_id| parent_id.is_empty())
    }

    pub fn is_completed(&self) -> bool {
        self.status == Some(TICKTICK_TASK_STATUS_COMPLETED)
    }
}

impl Sortable for TickTickTask {
    fn sort_id(&self) -> &str {
        &self.id
    }

    fn raw_sort_order(&self) -> &RawSortOrder {
        &self.sort_order
    }
}

impl Sortable for TickTickChecklistItem {
    fn sort_id(&self) -> &str {
        &self.id
    }

    fn raw_sort_order(&self) -> &RawSortOrder {
        &self.sort_order
    }
}

/// Request body for creating a task via TickTick API
#[derive(Serialize, Debug, Clone, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct CreateTaskRequest {
    pub title: String,
    pub project_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub desc: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub due_date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub time_zone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub priority: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_all_day: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sort_order: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<String>>,
}

impl CreateTaskRequest {
    pub fn new(title: impl Into<String>, project_id: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            project_id: project_id.into(),
            ..Default::default()
        }
    }
}

/// Request body for updating a task via TickTick API
#[derive(Serialize, Debug, Clone, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct UpdateTaskRequest {
    pub id: String,
    pub project_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub priority: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub due_date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_all_day: Option<bool>,
}

impl UpdateTaskRequest {
    pub fn new(task_id: impl Into<String>, project_id: impl Into<String>) -> Self {
        Self {
            id: task_id.into(),
            project_id: project_id.into(),
            ..Default::default()
        }
    }
}

/// Content of one subtask, as given to a batch creation
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Default)]
pub struct SubtaskDraft {
    pub title: String,
    #[serde(default)]
    pub content: Option<String>,
    #[serde(default)]
    pub priority: Option<i32>,
}

impl SubtaskDraft {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Default::default()
        }
    }
}

/// Request body for creating a subtask, a task with a `parentId`
#[derive(Serialize, Debug, Clone, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct CreateSubtaskRequest {
    pub title: String,
    pub project_id: String,
    pub parent_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub priority: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sort_order: Option<i64>,
}

impl CreateSubtaskRequest {
    pub fn new(
        title: impl Into<String>,
        parent_id: impl Into<String>,
        project_id: impl Into<String>,
    ) -> Self {
        Self {
            title: title.into(),
            project_id: project_id.into(),
            parent_id: parent_id.into(),
            ..Default::default()
        }
    }

    pub fn from_draft(draft: SubtaskDraft, parent_id: &str, project_id: &str) -> Self {
        Self {
            title: draft.title,
            project_id: project_id.to_string(),
            parent_id: parent_id.to_string(),
            content: draft.content,
            priority: draft.priority,
            sort_order: None,
        }
    }
}
