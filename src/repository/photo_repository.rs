use async_trait::async_trait;
use sqlx::SqlitePool;

use crate::{
    domain::{NewPhoto, Photo, PhotoDetails},
    error::{AppError, Result},
    repository::PhotoRepository,
};

pub struct SqlitePhotoRepository {
    pool: SqlitePool,
}

impl SqlitePhotoRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl PhotoRepository for SqlitePhotoRepository {
    async fn create(&self, photo: NewPhoto) -> Result<Photo> {
        let details = photo.details;
        let result = sqlx::query(
            r#"
            INSERT INTO photos (filename, title, description, date, author)
            VALUES (?, ?, ?, ?, ?)
            "#
        )
        .bind(&photo.filename)
        .bind(&details.title)
        .bind(&details.description)
        .bind(details.date)
        .bind(&details.author)
        .execute(&self.pool)
        .await?;

        self.find_by_id(result.last_insert_rowid()).await?.ok_or_else(|| {
            AppError::Database("Failed to retrieve created photo".to_string())
        })
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<Photo>> {
        let photo = sqlx::query_as::<_, Photo>(
            r#"
            SELECT id, filename, title, description, date, author
            FROM photos
            WHERE id = ?
            "#
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(photo)
    }

    async fn list(&self, limit: Option<i64>) -> Result<Vec<Photo>> {
        // SQLite treats a negative LIMIT as "no limit".
        let photos = sqlx::query_as::<_, Photo>(
            r#"
            SELECT id, filename, title, description, date, author
            FROM photos
            ORDER BY date DESC, id DESC
            LIMIT ?
            "#
        )
        .bind(limit.unwrap_or(-1))
        .fetch_all(&self.pool)
        .await?;

        Ok(photos)
    }

    async fn count(&self) -> Result<i64> {
        let count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM photos")
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }

    async fn update(&self, id: i64, details: PhotoDetails) -> Result<Photo> {
        let result = sqlx::query(
            r#"
            UPDATE photos
            SET title = ?, description = ?, date = ?, author = ?
            WHERE id = ?
            "#
        )
        .bind(&details.title)
        .bind(&details.description)
        .bind(details.date)
        .bind(&details.author)
        .bind(id)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("Photo {} not found", id)));
        }

        self.find_by_id(id).await?.ok_or_else(|| {
            AppError::Database("Failed to retrieve updated photo".to_string())
        })
    }

    async fn delete(&self, id: i64) -> Result<bool> {
        let result = sqlx::query("DELETE FROM photos WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
