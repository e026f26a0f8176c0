use async_trait::async_trait;
use crate::domain::*;
use crate::error::Result;

pub mod admin_repository;
pub mod news_repository;
pub mod photo_repository;

pub use admin_repository::SqliteAdminRepository;
pub use news_repository::SqliteNewsRepository;
pub use photo_repository::SqlitePhotoRepository;

#[async_trait]
pub trait AdminRepository: Send + Sync {
    async fn create(&self, username: &str, password_hash: &str) -> Result<Admin>;
    async fn find_by_id(&self, id: i64) -> Result<Option<Admin>>;
    async fn find_by_username(&self, username: &str) -> Result<Option<Admin>>;
    async fn update_password(&self, id: i64, password_hash: &str) -> Result<()>;
}

#[async_trait]
pub trait NewsRepository: Send + Sync {
    async fn create(&self, draft: NewsDraft) -> Result<News>;
    async fn find_by_id(&self, id: i64) -> Result<Option<News>>;
    /// Newest first. `limit = None` returns every match.
    async fn list(&self, filter: &NewsFilter, limit: Option<i64>) -> Result<Vec<News>>;
    async fn count(&self) -> Result<i64>;
    async fn update(&self, id: i64, draft: NewsDraft) -> Result<News>;
    /// Returns false when no row had that id.
    async fn delete(&self, id: i64) -> Result<bool>;
}

#[async_trait]
pub trait PhotoRepository: Send + Sync {
    async fn create(&self, photo: NewPhoto) -> Result<Photo>;
    async fn find_by_id(&self, id: i64) -> Result<Option<Photo>>;
    /// Newest first. `limit = None` returns every photo.
    async fn list(&self, limit: Option<i64>) -> Result<Vec<Photo>>;
    async fn count(&self) -> Result<i64>;
    async fn update(&self, id: i64, details: PhotoDetails) -> Result<Photo>;
    async fn delete(&self, id: i64) -> Result<bool>;
}
