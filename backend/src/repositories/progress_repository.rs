//! Database repository for per-project progress and its markers.

use crate::database::models::{Marker, ProgressRow};
use anyhow::{Context, Result};
use sqlx::SqlitePool;

pub struct ProgressRepository<'a> {
    pool: &'a SqlitePool,
}

impl<'a> ProgressRepository<'a> {
    pub fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn get(&self, project_id: &str, user_id: &str) -> Result<Option<ProgressRow>> {
        let row = sqlx::query_as::<_, ProgressRow>(
            r#"
            SELECT current_step, total_steps, last_updated, completed_at
            FROM project_progress
            WHERE project_id = ? AND user_id = ?
            "#,
        )
        .bind(project_id)
        .bind(user_id)
        .fetch_optional(self.pool)
        .await
        .context("Failed to fetch project progress")?;

        Ok(row)
    }

    /// Markers of a project ordered by step.
    pub async fn markers(&self, project_id: &str) -> Result<Vec<Marker>> {
        let markers = sqlx::query_as::<_, Marker>(
            r#"
            SELECT id, step, label, note, created_at
            FROM progress_markers
            WHERE project_id = ?
            ORDER BY step, created_at
            "#,
        )
        .bind(project_id)
        .fetch_all(self.pool)
        .await
        .context("Failed to fetch progress markers")?;

        Ok(markers)
    }

    /// Upserts the progress row and replaces the marker set in one transaction.
    pub async fn save(
        &self,
        project_id: &str,
        user_id: &str,
        row: &ProgressRow,
        markers: &[Marker],
    ) -> Result<()> {
        let mut tx = self
            .pool
            .begin()
            .await
            .context("Failed to begin progress transaction")?;

        sqlx::query(
            r#"
            INSERT INTO project_progress
                (project_id, user_id, current_step, total_steps, last_updated, completed_at)
            VALUES (?, ?, ?, ?, ?, ?)
            ON CONFLICT (project_id) DO UPDATE SET
                current_step = excluded.current_step,
                total_steps = excluded.total_steps,
                last_updated = excluded.last_updated,
                completed_at = excluded.completed_at
            "#,
        )
        .bind(project_id)
        .bind(user_id)
        .bind(row.current_step)
        .bind(row.total_steps)
        .bind(row.last_updated)
        .bind(row.completed_at)
        .execute(&mut *tx)
        .await
        .context("Failed to upsert project progress")?;

        sqlx::query("DELETE FROM progress_markers WHERE project_id = ?")
            .bind(project_id)
            .execute(&mut *tx)
            .await
            .context("Failed to clear progress markers")?;

        for marker in markers {
            sqlx::query(
                r#"
                INSERT INTO progress_markers (id, project_id, step, label, note, created_at)
                VALUES (?, ?, ?, ?, ?, ?)
                "#,
            )
            .bind(&marker.id)
            .bind(project_id)
            .bind(marker.step)
            .bind(&marker.label)
            .bind(&marker.note)
            .bind(marker.created_at)
            .execute(&mut *tx)
            .await
            .with_context(|| format!("Failed to insert progress marker {}", marker.id))?;
        }

        tx.commit()
            .await
            .context("Failed to commit progress transaction")?;

        Ok(())
    }
}
