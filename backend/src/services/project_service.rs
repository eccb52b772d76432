//! Project business logic service.
//!
//! CRUD over a user's saved string-art plans plus the instruction export.

use crate::api::common::PaginationFilter;
use crate::database::models::{CreateProject, Project, UpdateProject};
use crate::errors::{ServiceError, ServiceResult};
use crate::repositories::project_repository::ProjectRepository;
use chrono::Utc;
use serde::Serialize;
use sqlx::SqlitePool;
use std::fmt::Write;
use uuid::Uuid;
use validator::Validate;

/// Supported export formats. Unknown names fall back to the raw plan.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Json,
    Txt,
}

impl ExportFormat {
    pub fn parse(value: Option<&str>) -> Self {
        match value.map(str::trim) {
            None | Some("") | Some("txt") => ExportFormat::Txt,
            _ => ExportFormat::Json,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ExportContent {
    pub content: String,
}

pub struct ProjectService<'a> {
    pool: &'a SqlitePool,
}

impl<'a> ProjectService<'a> {
    pub fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    /// Lists a page of the user's projects together with their total count.
    pub async fn list(
        &self,
        user_id: &str,
        pagination: &PaginationFilter,
    ) -> ServiceResult<(Vec<Project>, u64)> {
        let repo = ProjectRepository::new(self.pool);
        let total = repo.count_by_user(user_id).await?;
        let projects = repo
            .list_by_user(user_id, pagination.limit(), pagination.offset())
            .await?;

        Ok((projects, total.max(0) as u64))
    }

    pub async fn create(&self, user_id: &str, input: CreateProject) -> ServiceResult<Project> {
        input.validate()?;

        let now = Utc::now();
        let project = Project {
            id: Uuid::now_v7().to_string(),
            user_id: user_id.to_string(),
            title: input.title,
            shape: input.shape,
            size_inches: input.size_inches,
            nail_count: input.nail_count,
            nail_style: input.nail_style,
            nail_diameter_mm: input.nail_diameter_mm,
            layer_mode: input.layer_mode,
            layer_count: input.layer_count,
            image_remote_url: input.image_remote_url,
            string_plan_json: input.string_plan_json,
            status: input.status,
            created_at: now,
            updated_at: now,
        };

        ProjectRepository::new(self.pool).create(&project).await?;
        tracing::debug!("Created project {} for {}", project.id, user_id);

        Ok(project)
    }

    /// Retrieves a project owned by `user_id`.
    ///
    /// # Errors
    /// Returns `ServiceError::NotFound` if it is missing or owned by someone else
    pub async fn get(&self, id: &str, user_id: &str) -> ServiceResult<Project> {
        ProjectRepository::new(self.pool)
            .get(id, user_id)
            .await?
            .ok_or_else(|| ServiceError::not_found("Project", id))
    }

    pub async fn update(
        &self,
        id: &str,
        user_id: &str,
        update: UpdateProject,
    ) -> ServiceResult<Project> {
        update.validate()?;

        let repo = ProjectRepository::new(self.pool);
        if !repo.update(id, user_id, &update, Utc::now()).await? {
            return Err(ServiceError::not_found("Project", id));
        }

        self.get(id, user_id).await
    }

    /// Deletes the project if the user owns it. Deleting a missing project
    /// is not an error.
    pub async fn delete(&self, id: &str, user_id: &str) -> ServiceResult<()> {
        let deleted = ProjectRepository::new(self.pool).delete(id, user_id).await?;
        if deleted == 0 {
            tracing::debug!("Delete of project {} matched nothing", id);
        }
        Ok(())
    }

    pub async fn export(
        &self,
        id: &str,
        user_id: &str,
        format: ExportFormat,
    ) -> ServiceResult<ExportContent> {
        let project = self.get(id, user_id).await?;

        let content = match format {
            ExportFormat::Json => project.string_plan_json,
            ExportFormat::Txt => build_instructions(&project),
        };

        Ok(ExportContent { content })
    }
}

/// Printable instruction header for a project.
fn build_instructions(project: &Project) -> String {
    let mut out = String::new();
    // Writing into a String cannot fail.
    let _ = writeln!(out, "ThreadCraft Instructions");
    let _ = writeln!(out, "Project: {}", project.title);
    let _ = writeln!(
        out,
        "Shape: {} | Size: {:.0}\" | Nails: {} | Layers: {}",
        project.shape.to_uppercase(),
        project.size_inches,
        project.nail_count,
        project.layer_count
    );
    let _ = writeln!(
        out,
        "Mounting: {} ({:.1}mm diameter)",
        project.nail_style.replace('_', " ").to_uppercase(),
        project.nail_diameter_mm
    );
    out.push_str("================================================\n");
    out.push_str("\n(Full step-by-step list requires string_plan_json parsing)\n");
    out
}
