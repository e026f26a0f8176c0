use async_trait::async_trait;
use sqlx::{QueryBuilder, Sqlite, SqlitePool};

use crate::{
    domain::{News, NewsDraft, NewsFilter},
    error::{AppError, Result},
    repository::NewsRepository,
};

const NEWS_COLUMNS: &str = "id, title, content, date, activity_type, author";

pub struct SqliteNewsRepository {
    pool: SqlitePool,
}

impl SqliteNewsRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

/// Escape LIKE wildcards so the needle matches literally (paired with `ESCAPE '\'`).
fn escape_like(needle: &str) -> String {
    let mut escaped = String::with_capacity(needle.len());
    for c in needle.chars() {
        if matches!(c, '\\' | '%' | '_') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

#[async_trait]
impl NewsRepository for SqliteNewsRepository {
    async fn create(&self, draft: NewsDraft) -> Result<News> {
        let result = sqlx::query(
            r#"
            INSERT INTO news (title, content, date, activity_type, author)
            VALUES (?, ?, ?, ?, ?)
            "#
        )
        .bind(&draft.title)
        .bind(&draft.content)
        .bind(draft.date)
        .bind(&draft.activity_type)
        .bind(&draft.author)
        .execute(&self.pool)
        .await?;

        self.find_by_id(result.last_insert_rowid()).await?.ok_or_else(|| {
            AppError::Database("Failed to retrieve created news".to_string())
        })
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<News>> {
        let news = sqlx::query_as::<_, News>(
            &format!("SELECT {} FROM news WHERE id = ?", NEWS_COLUMNS)
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(news)
    }

    async fn list(&self, filter: &NewsFilter, limit: Option<i64>) -> Result<Vec<News>> {
        let mut query: QueryBuilder<Sqlite> = QueryBuilder::new(
            format!("SELECT {} FROM news WHERE 1 = 1", NEWS_COLUMNS)
        );

        if let Some(activity_type) = &filter.activity_type {
            query
                .push(" AND activity_type LIKE ")
                .push_bind(format!("%{}%", escape_like(activity_type)))
                .push(" ESCAPE '\\'");
        }

        if let Some(date) = filter.date {
            query.push(" AND date = ").push_bind(date);
        }

        query.push(" ORDER BY date DESC, id DESC");

        if let Some(limit) = limit {
            query.push(" LIMIT ").push_bind(limit);
        }

        let news = query
            .build_query_as::<News>()
            .fetch_all(&self.pool)
            .await?;

        Ok(news)
    }

    async fn count(&self) -> Result<i64> {
        let count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM news")
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }

    async fn update(&self, id: i64, draft: NewsDraft) -> Result<News> {
        let result = sqlx::query(
            r#"
            UPDATE news
            SET title = ?, content = ?, date = ?, activity_type = ?, author = ?
            WHERE id = ?
            "#
        )
        .bind(&draft.title)
        .bind(&draft.content)
        .bind(draft.date)
        .bind(&draft.activity_type)
        .bind(&draft.author)
        .bind(id)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("News {} not found", id)));
        }

        self.find_by_id(id).await?.ok_or_else(|| {
            AppError::Database("Failed to retrieve updated news".to_string())
        })
    }

    async fn delete(&self, id: i64) -> Result<bool> {
        let result = sqlx::query("DELETE FROM news WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
