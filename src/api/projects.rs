//! Project CRUD handlers

use super::{ApiResult, Deleted};
use crate::database::Database;
use crate::models::{
    ChecklistItem, NewChecklistItem, NewProject, NewProjectMaterial, NewSavedPattern, Project,
    ProjectDetail, ProjectMaterial, SavedPattern,
};

pub async fn list_projects(db: &Database) -> ApiResult<Vec<Project>> {
    Ok(db.list_projects().await?)
}

pub async fn create_project(db: &Database, new: &NewProject) -> ApiResult<Project> {
    Ok(db.create_project(new).await?)
}

pub async fn get_project(db: &Database, project_id: i64) -> ApiResult<ProjectDetail> {
    Ok(db.get_project(project_id).await?)
}

pub async fn delete_project(db: &Database, project_id: i64) -> ApiResult<Deleted> {
    db.delete_project(project_id).await?;
    Ok(Deleted { deleted: project_id })
}

pub async fn list_checklist(db: &Database, project_id: i64) -> ApiResult<Vec<ChecklistItem>> {
    Ok(db.list_checklist(project_id).await?)
}

pub async fn add_checklist_item(
    db: &Database,
    project_id: i64,
    new: &NewChecklistItem,
) -> ApiResult<ChecklistItem> {
    Ok(db.add_checklist_item(project_id, new).await?)
}

pub async fn toggle_checklist_item(
    db: &Database,
    project_id: i64,
    item_id: i64,
) -> ApiResult<ChecklistItem> {
    Ok(db.toggle_checklist_item(project_id, item_id).await?)
}

pub async fn delete_checklist_item(db: &Database, project_id: i64, item_id: i64) -> ApiResult<Deleted> {
    db.delete_checklist_item(project_id, item_id).await?;
    Ok(Deleted { deleted: item_id })
}

pub async fn list_saved_patterns(db: &Database, project_id: i64) -> ApiResult<Vec<SavedPattern>> {
    Ok(db.list_saved_patterns(project_id).await?)
}

pub async fn save_pattern(
    db: &Database,
    project_id: i64,
    new: &NewSavedPattern,
) -> ApiResult<SavedPattern> {
    Ok(db.save_pattern(project_id, new).await?)
}

pub async fn delete_saved_pattern(
    db: &Database,
    project_id: i64,
    pattern_id: i64,
) -> ApiResult<Deleted> {
    db.delete_saved_pattern(project_id, pattern_id).await?;
    Ok(Deleted { deleted: pattern_id })
}

pub async fn list_materials(db: &Database, project_id: i64) -> ApiResult<Vec<ProjectMaterial>> {
    Ok(db.list_materials(project_id).await?)
}

pub async fn add_material(
    db: &Database,
    project_id: i64,
    new: &NewProjectMaterial,
) -> ApiResult<ProjectMaterial> {
    Ok(db.add_material(project_id, new).await?)
}

pub async fn toggle_material_purchased(
    db: &Database,
    project_id: i64,
    material_id: i64,
) -> ApiResult<ProjectMaterial> {
    Ok(db.toggle_material_purchased(project_id, material_id).await?)
}

pub async fn delete_material(db: &Database, project_id: i64, material_id: i64) -> ApiResult<Deleted> {
    db.delete_material(project_id, material_id).await?;
    Ok(Deleted { deleted: material_id })
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqwest::StatusCode;

    #[tokio::test]
    async fn missing_rows_are_404_and_bad_input_400() {
        let db = Database::in_memory().await.unwrap();

        assert_eq!(get_project(&db, 1).await.unwrap_err().status, StatusCode::NOT_FOUND);

        let err = create_project(&db, &NewProject::default()).await.unwrap_err();
        assert_eq!(err.status, StatusCode::BAD_REQUEST);

        let project = create_project(
            &db,
            &NewProject {
                name: "Bodice".into(),
                ..Default::default()
            },
        )
        .await
        .unwrap();
        assert_eq!(
            toggle_material_purchased(&db, project.id, 5).await.unwrap_err().status,
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            delete_project(&db, project.id).await.unwrap(),
            Deleted { deleted: project.id }
        );
    }
}
