//! Sewing project entities owned by the project store

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Project {
    pub id: i64,
    pub name: String,
    pub description: String,
    pub budget: Option<f64>,
    pub status: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct ChecklistItem {
    pub id: i64,
    pub project_id: i64,
    pub title: String,
    pub notes: String,
    pub checked: bool,
    pub created_at: DateTime<Utc>,
}

/// A pattern the user pinned to a project
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct SavedPattern {
    pub id: i64,
    pub project_id: i64,
    pub source: String,
    pub title: String,
    pub url: String,
    pub image_url: Option<String>,
    pub price: Option<String>,
    pub saved_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct ProjectMaterial {
    pub id: i64,
    pub project_id: i64,
    pub name: String,
    pub quantity: String,
    pub notes: String,
    pub purchased: bool,
    pub created_at: DateTime<Utc>,
}

/// A project with everything attached to it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectDetail {
    #[serde(flatten)]
    pub project: Project,
    pub patterns: Vec<SavedPattern>,
    pub materials: Vec<ProjectMaterial>,
    pub checklist: Vec<ChecklistItem>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct NewProject {
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub budget: Option<f64>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct NewChecklistItem {
    pub title: String,
    #[serde(default)]
    pub notes: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct NewSavedPattern {
    #[serde(default)]
    pub source: String,
    #[serde(default)]
    pub title: String,
    pub url: String,
    pub image_url: Option<String>,
    pub price: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct NewProjectMaterial {
    pub name: String,
    #[serde(default)]
    pub quantity: String,
    #[serde(default)]
    pub notes: String,
}
