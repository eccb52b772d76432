//! Progress business logic service.

use crate::database::models::{Marker, Progress, ProgressRow, UpdateProgress};
use crate::errors::{ServiceError, ServiceResult};
use crate::repositories::progress_repository::ProgressRepository;
use crate::repositories::project_repository::ProjectRepository;
use chrono::Utc;
use sqlx::SqlitePool;
use std::collections::HashSet;
use uuid::Uuid;
use validator::Validate;

pub struct ProgressService<'a> {
    pool: &'a SqlitePool,
}

impl<'a> ProgressService<'a> {
    pub fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    /// Returns stored progress, or an empty one if nothing has been saved.
    pub async fn get(&self, project_id: &str, user_id: &str) -> ServiceResult<Progress> {
        let repo = ProgressRepository::new(self.pool);

        let Some(row) = repo.get(project_id, user_id).await? else {
            return Ok(Progress {
                project_id: project_id.to_string(),
                current_step: 0,
                total_steps: 0,
                last_updated: Utc::now(),
                completed_at: None,
                markers: Vec::new(),
            });
        };

        let markers = repo.markers(project_id).await?;

        Ok(Progress {
            project_id: project_id.to_string(),
            current_step: row.current_step,
            total_steps: row.total_steps,
            last_updated: row.last_updated,
            completed_at: row.completed_at,
            markers,
        })
    }

    /// Saves progress for a project the user owns, replacing all markers.
    ///
    /// Marker ids only need to be unique within the project.
    ///
    /// # Errors
    /// Returns `ServiceError::NotFound` if the project is not the user's and
    /// `ServiceError::Validation` if the body repeats a marker id
    pub async fn put(
        &self,
        project_id: &str,
        user_id: &str,
        update: UpdateProgress,
    ) -> ServiceResult<Progress> {
        update.validate()?;

        if ProjectRepository::new(self.pool)
            .get(project_id, user_id)
            .await?
            .is_none()
        {
            return Err(ServiceError::not_found("Project", project_id));
        }

        let now = Utc::now();
        let row = ProgressRow {
            current_step: update.current_step,
            total_steps: update.total_steps,
            last_updated: now,
            completed_at: update.completed_at,
        };

        let markers: Vec<Marker> = update
            .markers
            .into_iter()
            .map(|marker| Marker {
                id: marker
                    .id
                    .filter(|id| !id.is_empty())
                    .unwrap_or_else(|| Uuid::now_v7().to_string()),
                step: marker.step,
                label: marker.label,
                note: marker.note,
                created_at: marker.created_at.unwrap_or(now),
            })
            .collect();

        let mut seen = HashSet::new();
        if let Some(marker) = markers.iter().find(|m| !seen.insert(m.id.as_str())) {
            return Err(ServiceError::invalid_field(
                "markers",
                format!("duplicate marker id '{}'", marker.id),
            ));
        }

        ProgressRepository::new(self.pool)
            .save(project_id, user_id, &row, &markers)
            .await?;

        self.get(project_id, user_id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::models::{CreateProject, CreateUser, MarkerInput};
    use crate::database::test_pool;
    use crate::repositories::user_repository::UserRepository;
    use crate::services::project_service::ProjectService;

    async fn seed(pool: &SqlitePool) -> String {
        for id in ["u1", "u2"] {
            UserRepository::create_user(
                pool,
                &CreateUser {
                    id: id.to_string(),
                    email: format!("{}@example.com", id),
                    name: id.to_string(),
                    password_hash: "hash".to_string(),
                    created_at: Utc::now(),
                },
            )
            .await
            .unwrap();
        }

        ProjectService::new(pool)
            .create("u1", CreateProject::default())
            .await
            .unwrap()
            .id
    }

    fn marker(step: i64, label: &str) -> MarkerInput {
        MarkerInput {
            step,
            label: label.to_string(),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_missing_progress_is_empty() {
        let pool = test_pool().await;
        let project_id = seed(&pool).await;

        let progress = ProgressService::new(&pool).get(&project_id, "u1").await.unwrap();

        assert_eq!(progress.project_id, project_id);
        assert_eq!(progress.current_step, 0);
        assert_eq!(progress.total_steps, 0);
        assert!(progress.completed_at.is_none());
        assert!(progress.markers.is_empty());
    }

    #[tokio::test]
    async fn test_put_replaces_markers_and_orders_by_step() {
        let pool = test_pool().await;
        let project_id = seed(&pool).await;
        let service = ProgressService::new(&pool);

        service
            .put(
                &project_id,
                "u1",
                UpdateProgress {
                    current_step: 3,
                    total_steps: 10,
                    markers: vec![marker(1, "old")],
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        let progress = service
            .put(
                &project_id,
                "u1",
                UpdateProgress {
                    current_step: 7,
                    total_steps: 10,
                    completed_at: None,
                    markers: vec![marker(9, "late"), marker(2, "early")],
                },
            )
            .await
            .unwrap();

        assert_eq!(progress.current_step, 7);
        let labels: Vec<&str> = progress.markers.iter().map(|m| m.label.as_str()).collect();
        assert_eq!(labels, vec!["early", "late"]);
        assert!(progress.markers.iter().all(|m| !m.id.is_empty()));

        let reread = service.get(&project_id, "u1").await.unwrap();
        assert_eq!(reread.markers, progress.markers);
    }

    fn marker_with_id(id: &str, step: i64) -> MarkerInput {
        MarkerInput {
            id: Some(id.to_string()),
            ..marker(step, id)
        }
    }

    #[tokio::test]
    async fn test_marker_ids_are_scoped_to_their_project() {
        let pool = test_pool().await;
        let first = seed(&pool).await;
        let second = ProjectService::new(&pool)
            .create("u2", CreateProject::default())
            .await
            .unwrap()
            .id;
        let service = ProgressService::new(&pool);

        for (project_id, user_id) in [(&first, "u1"), (&second, "u2")] {
            let progress = service
                .put(
                    project_id,
                    user_id,
                    UpdateProgress {
                        markers: vec![marker_with_id("m1", 1)],
                        ..Default::default()
                    },
                )
                .await
                .unwrap();
            assert_eq!(progress.markers[0].id, "m1");
        }

        let first_progress = service.get(&first, "u1").await.unwrap();
        assert_eq!(first_progress.markers.len(), 1);
        assert_eq!(first_progress.markers[0].id, "m1");
    }

    #[tokio::test]
    async fn test_repeated_marker_id_is_rejected() {
        let pool = test_pool().await;
        let project_id = seed(&pool).await;
        let service = ProgressService::new(&pool);

        let result = service
            .put(
                &project_id,
                "u1",
                UpdateProgress {
                    markers: vec![marker_with_id("dup", 1), marker_with_id("dup", 2)],
                    ..Default::default()
                },
            )
            .await;

        assert!(matches!(result, Err(ServiceError::Validation { .. })));
        assert!(service.get(&project_id, "u1").await.unwrap().markers.is_empty());
    }

    #[tokio::test]
    async fn test_put_on_foreign_project_is_not_found() {
        let pool = test_pool().await;
        let project_id = seed(&pool).await;

        let result = ProgressService::new(&pool)
            .put(&project_id, "u2", UpdateProgress::default())
            .await;

        assert!(matches!(result, Err(ServiceError::NotFound { .. })));
    }

    #[tokio::test]
    async fn test_negative_steps_are_rejected() {
        let pool = test_pool().await;
        let project_id = seed(&pool).await;

        let result = ProgressService::new(&pool)
            .put(
                &project_id,
                "u1",
                UpdateProgress {
                    current_step: -1,
                    ..Default::default()
                },
            )
            .await;

        assert!(matches!(result, Err(ServiceError::Validation { .. })));
    }
}
