//! Database repository for string-art projects.
//!
//! Every query is scoped by owner: a project belonging to another user is
//! indistinguishable from one that does not exist.

use crate::database::models::{Project, UpdateProject};
use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use sqlx::{QueryBuilder, Sqlite, SqlitePool};

const PROJECT_COLUMNS: &str = r#"
    id, user_id, title, shape, size_inches, nail_count, nail_style,
    nail_diameter_mm, layer_mode, layer_count, image_remote_url,
    string_plan_json, status, created_at, updated_at
"#;

pub struct ProjectRepository<'a> {
    pool: &'a SqlitePool,
}

impl<'a> ProjectRepository<'a> {
    pub fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn count_by_user(&self, user_id: &str) -> Result<i64> {
        let total = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM projects WHERE user_id = ?")
            .bind(user_id)
            .fetch_one(self.pool)
            .await
            .context("Failed to count projects")?;

        Ok(total)
    }

    /// Lists a page of the user's projects, most recently updated first.
    pub async fn list_by_user(&self, user_id: &str, limit: i64, offset: i64) -> Result<Vec<Project>> {
        let query = format!(
            "SELECT {} FROM projects WHERE user_id = ? ORDER BY updated_at DESC LIMIT ? OFFSET ?",
            PROJECT_COLUMNS
        );

        let projects = sqlx::query_as::<_, Project>(&query)
            .bind(user_id)
            .bind(limit)
            .bind(offset)
            .fetch_all(self.pool)
            .await
            .context("Failed to list projects")?;

        Ok(projects)
    }

    pub async fn create(&self, project: &Project) -> Result<()> {
        let query = format!(
            "INSERT INTO projects ({}) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
            PROJECT_COLUMNS
        );

        sqlx::query(&query)
            .bind(&project.id)
            .bind(&project.user_id)
            .bind(&project.title)
            .bind(&project.shape)
            .bind(project.size_inches)
            .bind(project.nail_count)
            .bind(&project.nail_style)
            .bind(project.nail_diameter_mm)
            .bind(project.layer_mode)
            .bind(project.layer_count)
            .bind(&project.image_remote_url)
            .bind(&project.string_plan_json)
            .bind(&project.status)
            .bind(project.created_at)
            .bind(project.updated_at)
            .execute(self.pool)
            .await
            .context("Failed to insert project")?;

        Ok(())
    }

    pub async fn get(&self, id: &str, user_id: &str) -> Result<Option<Project>> {
        let query = format!(
            "SELECT {} FROM projects WHERE id = ? AND user_id = ?",
            PROJECT_COLUMNS
        );

        let project = sqlx::query_as::<_, Project>(&query)
            .bind(id)
            .bind(user_id)
            .fetch_optional(self.pool)
            .await
            .context("Failed to fetch project")?;

        Ok(project)
    }

    /// Applies the supplied fields and bumps `updated_at`.
    ///
    /// # Returns
    /// `true` if a project owned by `user_id` was updated
    pub async fn update(
        &self,
        id: &str,
        user_id: &str,
        update: &UpdateProject,
        now: DateTime<Utc>,
    ) -> Result<bool> {
        let mut builder = QueryBuilder::<Sqlite>::new("UPDATE projects SET updated_at = ");
        builder.push_bind(now);

        if let Some(title) = &update.title {
            builder.push(", title = ").push_bind(title.clone());
        }
        if let Some(shape) = &update.shape {
            builder.push(", shape = ").push_bind(shape.clone());
        }
        if let Some(size_inches) = update.size_inches {
            builder.push(", size_inches = ").push_bind(size_inches);
        }
        if let Some(nail_count) = update.nail_count {
            builder.push(", nail_count = ").push_bind(nail_count);
        }
        if let Some(nail_style) = &update.nail_style {
            builder.push(", nail_style = ").push_bind(nail_style.clone());
        }
        if let Some(nail_diameter_mm) = update.nail_diameter_mm {
            builder.push(", nail_diameter_mm = ").push_bind(nail_diameter_mm);
        }
        if let Some(layer_mode) = update.layer_mode {
            builder.push(", layer_mode = ").push_bind(layer_mode);
        }
        if let Some(layer_count) = update.layer_count {
            builder.push(", layer_count = ").push_bind(layer_count);
        }
        if let Some(image_remote_url) = &update.image_remote_url {
            builder
                .push(", image_remote_url = ")
                .push_bind(image_remote_url.clone());
        }
        if let Some(string_plan_json) = &update.string_plan_json {
            builder
                .push(", string_plan_json = ")
                .push_bind(string_plan_json.clone());
        }
        if let Some(status) = &update.status {
            builder.push(", status = ").push_bind(status.clone());
        }

        builder
            .push(" WHERE id = ")
            .push_bind(id.to_string())
            .push(" AND user_id = ")
            .push_bind(user_id.to_string());

        let result = builder
            .build()
            .execute(self.pool)
            .await
            .context("Failed to update project")?;

        Ok(result.rows_affected() > 0)
    }

    pub async fn delete(&self, id: &str, user_id: &str) -> Result<u64> {
        let result = sqlx::query("DELETE FROM projects WHERE id = ? AND user_id = ?")
            .bind(id)
            .bind(user_id)
            .execute(self.pool)
            .await
            .context("Failed to delete project")?;

        Ok(result.rows_affected())
    }
}
