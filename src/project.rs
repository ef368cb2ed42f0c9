use serde::{Deserialize, Serialize};
use serde_with::{serde_as, DefaultOnNull};

use crate::{sort_order::RawSortOrder, task::TickTickTask};

pub static DEFAULT_PROJECT_COLOR: &str = "#F18181";
pub static DEFAULT_PROJECT_VIEW_MODE: &str = "list";
pub static DEFAULT_PROJECT_KIND: &str = "TASK";

#[derive(Debug, Serialize, Deserialize, PartialEq, Clone)]
#[serde(rename_all = "camelCase")]
pub struct TickTickProject {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub color: Option<String>,
    #[serde(default)]
    pub view_mode: Option<String>,
    #[serde(default)]
    pub kind: Option<String>,
    #[serde(default)]
    pub group_id: Option<String>,
    #[serde(default)]
    pub sort_order: RawSortOrder,
    #[serde(default)]
    pub closed: Option<bool>,
    #[serde(default)]
    pub permission: Option<String>,
}

/// Kanban column of a project
#[derive(Debug, Serialize, Deserialize, PartialEq, Clone)]
#[serde(rename_all = "camelCase")]
pub struct TickTickColumn {
    pub id: String,
    #[serde(default)]
    pub project_id: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub sort_order: RawSortOrder,
}

/// Payload of `GET /project/{id}/data`
#[serde_as]
#[derive(Debug, Serialize, Deserialize, PartialEq, Clone, Default)]
#[serde(rename_all = "camelCase")]
pub struct TickTickProjectData {
    #[serde(default)]
    pub project: Option<TickTickProject>,
    #[serde_as(as = "DefaultOnNull")]
    #[serde(default)]
    pub tasks: Vec<TickTickTask>,
    #[serde_as(as = "DefaultOnNull")]
    #[serde(default)]
    pub columns: Vec<TickTickColumn>,
}

impl TickTickProjectData {
    /// Tasks without a parent, the siblings of a new top level task
    pub fn root_tasks(&self) -> impl Iterator<Item = &TickTickTask> {
        self.tasks.iter().filter(|task| task.is_root())
    }
}

/// Request body for creating a project via TickTick API
#[derive(Serialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CreateProjectRequest {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub view_mode: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
}

impl CreateProjectRequest {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            color: Some(DEFAULT_PROJECT_COLOR.to_string()),
            view_mode: Some(DEFAULT_PROJECT_VIEW_MODE.to_string()),
            kind: Some(DEFAULT_PROJECT_KIND.to_string()),
        }
    }

    pub fn color(mut self, color: impl Into<String>) -> Self {
        self.color = Some(color.into());
        self
    }

    pub fn view_mode(mut self, view_mode: impl Into<String>) -> Self {
        self.view_mode = Some(view_mode.into());
        self
    }

    pub fn kind(mut self, kind: impl Into<String>) -> Self {
        self.kind = Some(kind.into());
        self
    }
}

/// Request body for updating a project via TickTick API
#[derive(Serialize, Debug, Clone, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProjectRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub view_mode: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
}
