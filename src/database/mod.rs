use std::path::Path;
use std::str::FromStr;

use chrono::Utc;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::{Sqlite, SqlitePool, migrate::MigrateDatabase};
use tracing::info;

use crate::error::{Error, Result};
use crate::models::{
    ChecklistItem, NewChecklistItem, NewProject, NewProjectMaterial, NewSavedPattern, Project,
    ProjectDetail, ProjectMaterial, SavedPattern,
};

/// SQLite-backed store for sewing projects and everything attached to them.
#[derive(Clone)]
pub struct Database {
    pool: SqlitePool,
}

impl Database {
    pub async fn new(db_url: &str) -> Result<Self> {
        if !Sqlite::database_exists(db_url).await.unwrap_or(false) {
            if let Some(dir) = db_url
                .strip_prefix("sqlite:")
                .and_then(|path| Path::new(path.trim_start_matches("//")).parent())
                .filter(|dir| !dir.as_os_str().is_empty())
            {
                tokio::fs::create_dir_all(dir).await?;
            }
            info!("Creating database file");
            Sqlite::create_database(db_url).await?;
        }

        let options = SqliteConnectOptions::from_str(db_url)?.foreign_keys(true);
        let pool = SqlitePoolOptions::new().connect_with(options).await?;

        Self::migrate(pool).await
    }

    /// Private in-memory database, pinned to a single connection so it lives
    /// as long as the pool.
    pub async fn in_memory() -> Result<Self> {
        let options = SqliteConnectOptions::from_str("sqlite::memory:")?.foreign_keys(true);
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect_with(options)
            .await?;

        Self::migrate(pool).await
    }

    async fn migrate(pool: SqlitePool) -> Result<Self> {
        info!("Running database migrations");
        sqlx::migrate!("./migrations").run(&pool).await?;

        info!("Database initialized successfully");
        Ok(Self { pool })
    }

    // ── Projects ────────────────────────────────────────────────────────────

    pub async fn list_projects(&self) -> Result<Vec<Project>> {
        let projects = sqlx::query_as::<_, Project>(
            "SELECT * FROM projects ORDER BY created_at DESC, id DESC",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(projects)
    }

    pub async fn create_project(&self, new: &NewProject) -> Result<Project> {
        let name = required("name", &new.name)?;

        let project = sqlx::query_as::<_, Project>(
            r"
            INSERT INTO projects (name, description, budget, status, created_at)
            VALUES (?, ?, ?, 'active', ?)
            RETURNING *
            ",
        )
        .bind(name)
        .bind(&new.description)
        .bind(new.budget)
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await?;

        info!("Created project {} '{}'", project.id, project.name);
        Ok(project)
    }

    /// A project with its saved patterns, materials and checklist.
    pub async fn get_project(&self, project_id: i64) -> Result<ProjectDetail> {
        let project = self.find_project(project_id).await?;

        Ok(ProjectDetail {
            patterns: self.list_saved_patterns(project_id).await?,
            materials: self.list_materials(project_id).await?,
            checklist: self.list_checklist(project_id).await?,
            project,
        })
    }

    /// Removes the project and, through the foreign keys, everything under it.
    pub async fn delete_project(&self, project_id: i64) -> Result<()> {
        sqlx::query("DELETE FROM projects WHERE id = ?")
            .bind(project_id)
            .execute(&self.pool)
            .await?;

        info!("Deleted project {}", project_id);
        Ok(())
    }

    async fn find_project(&self, project_id: i64) -> Result<Project> {
        sqlx::query_as::<_, Project>("SELECT * FROM projects WHERE id = ?")
            .bind(project_id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| Error::NotFound(format!("project {project_id}")))
    }

    // ── Checklist ───────────────────────────────────────────────────────────

    pub async fn list_checklist(&self, project_id: i64) -> Result<Vec<ChecklistItem>> {
        let items = sqlx::query_as::<_, ChecklistItem>(
            "SELECT * FROM checklist_items WHERE project_id = ? ORDER BY created_at, id",
        )
        .bind(project_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(items)
    }

    pub async fn add_checklist_item(
        &self,
        project_id: i64,
        new: &NewChecklistItem,
    ) -> Result<ChecklistItem> {
        let title = required("title", &new.title)?;
        self.find_project(project_id).await?;

        let item = sqlx::query_as::<_, ChecklistItem>(
            r"
            INSERT INTO checklist_items (project_id, title, notes, checked, created_at)
            VALUES (?, ?, ?, 0, ?)
            RETURNING *
            ",
        )
        .bind(project_id)
        .bind(title)
        .bind(&new.notes)
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await?;

        Ok(item)
    }

    pub async fn toggle_checklist_item(&self, project_id: i64, item_id: i64) -> Result<ChecklistItem> {
        sqlx::query_as::<_, ChecklistItem>(
            r"
            UPDATE checklist_items SET checked = NOT checked
            WHERE id = ? AND project_id = ?
            RETURNING *
            ",
        )
        .bind(item_id)
        .bind(project_id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| Error::NotFound(format!("checklist item {item_id}")))
    }

    pub async fn delete_checklist_item(&self, project_id: i64, item_id: i64) -> Result<()> {
        sqlx::query("DELETE FROM checklist_items WHERE id = ? AND project_id = ?")
            .bind(item_id)
            .bind(project_id)
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    // ── Saved patterns ──────────────────────────────────────────────────────

    pub async fn list_saved_patterns(&self, project_id: i64) -> Result<Vec<SavedPattern>> {
        let patterns = sqlx::query_as::<_, SavedPattern>(
            "SELECT * FROM saved_patterns WHERE project_id = ? ORDER BY saved_at DESC, id DESC",
        )
        .bind(project_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(patterns)
    }

    pub async fn save_pattern(&self, project_id: i64, new: &NewSavedPattern) -> Result<SavedPattern> {
        let url = required("url", &new.url)?;
        self.find_project(project_id).await?;

        let pattern = sqlx::query_as::<_, SavedPattern>(
            r"
            INSERT INTO saved_patterns (project_id, source, title, url, image_url, price, saved_at)
            VALUES (?, ?, ?, ?, ?, ?, ?)
            RETURNING *
            ",
        )
        .bind(project_id)
        .bind(&new.source)
        .bind(&new.title)
        .bind(url)
        .bind(&new.image_url)
        .bind(&new.price)
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await?;

        info!("Saved pattern '{}' to project {}", pattern.title, project_id);
        Ok(pattern)
    }

    pub async fn delete_saved_pattern(&self, project_id: i64, pattern_id: i64) -> Result<()> {
        sqlx::query("DELETE FROM saved_patterns WHERE id = ? AND project_id = ?")
            .bind(pattern_id)
            .bind(project_id)
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    // ── Project materials ───────────────────────────────────────────────────

    pub async fn list_materials(&self, project_id: i64) -> Result<Vec<ProjectMaterial>> {
        let materials = sqlx::query_as::<_, ProjectMaterial>(
            "SELECT * FROM project_materials WHERE project_id = ? ORDER BY created_at, id",
        )
        .bind(project_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(materials)
    }

    pub async fn add_material(
        &self,
        project_id: i64,
        new: &NewProjectMaterial,
    ) -> Result<ProjectMaterial> {
        let name = required("name", &new.name)?;
        self.find_project(project_id).await?;

        let material = sqlx::query_as::<_, ProjectMaterial>(
            r"
            INSERT INTO project_materials (project_id, name, quantity, notes, purchased, created_at)
            VALUES (?, ?, ?, ?, 0, ?)
            RETURNING *
            ",
        )
        .bind(project_id)
        .bind(name)
        .bind(&new.quantity)
        .bind(&new.notes)
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await?;

        Ok(material)
    }

    pub async fn toggle_material_purchased(
        &self,
        project_id: i64,
        material_id: i64,
    ) -> Result<ProjectMaterial> {
        sqlx::query_as::<_, ProjectMaterial>(
            r"
            UPDATE project_materials SET purchased = NOT purchased
            WHERE id = ? AND project_id = ?
            RETURNING *
            ",
        )
        .bind(material_id)
        .bind(project_id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| Error::NotFound(format!("material {material_id}")))
    }

    pub async fn delete_material(&self, project_id: i64, material_id: i64) -> Result<()> {
        sqlx::query("DELETE FROM project_materials WHERE id = ? AND project_id = ?")
            .bind(material_id)
            .bind(project_id)
            .execute(&self.pool)
            .await?;

        Ok(())
    }
}

fn required<'a>(field: &str, value: &'a str) -> Result<&'a str> {
    let value = value.trim();
    if value.is_empty() {
        return Err(Error::invalid(format!("{field} must not be empty")));
    }
    Ok(value)
}
