pub mod validation;

use std::sync::Arc;
use sqlx::SqlitePool;

use crate::auth::{AuthService, CsrfService};
use crate::config::Settings;
use crate::email::EmailSender;
use crate::error::Result;
use crate::repository::*;
use crate::web::uploads::UploadStore;

/// Everything a handler may touch, wired once at startup.
pub struct ServiceContext {
    pub admin_repo: Arc<dyn AdminRepository>,
    pub news_repo: Arc<dyn NewsRepository>,
    pub photo_repo: Arc<dyn PhotoRepository>,
    pub auth_service: Arc<AuthService>,
    pub csrf_service: Arc<CsrfService>,
    pub uploads: UploadStore,
    pub email_sender: Arc<dyn EmailSender>,
}

impl ServiceContext {
    pub fn new(
        db_pool: SqlitePool,
        settings: &Settings,
        email_sender: Arc<dyn EmailSender>,
    ) -> Result<Self> {
        let admin_repo: Arc<dyn AdminRepository> =
            Arc::new(SqliteAdminRepository::new(db_pool.clone()));
        let news_repo = Arc::new(SqliteNewsRepository::new(db_pool.clone()));
        let photo_repo = Arc::new(SqlitePhotoRepository::new(db_pool.clone()));

        let auth_service = Arc::new(AuthService::new(
            db_pool,
            admin_repo.clone(),
            settings.auth.session_duration_hours,
            settings.auth.secure_cookies,
        ));
        let csrf_service = Arc::new(CsrfService::new(&settings.auth.session_secret)?);

        Ok(Self {
            admin_repo,
            news_repo,
            photo_repo,
            auth_service,
            csrf_service,
            uploads: UploadStore::new(&settings.uploads.dir),
            email_sender,
        })
    }
}
