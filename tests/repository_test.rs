mod common;

use std::sync::Arc;

use cas_site::{
    auth::AuthService,
    domain::{NewPhoto, NewsDraft, NewsFilter, PhotoDetails},
    error::AppError,
    repository::{
        AdminRepository, NewsRepository, PhotoRepository, SqliteAdminRepository,
        SqliteNewsRepository, SqlitePhotoRepository,
    },
};
use chrono::{Duration, NaiveDate, Utc};

fn date(s: &str) -> NaiveDate {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
}

fn draft(title: &str, activity_type: &str, day: &str) -> NewsDraft {
    NewsDraft {
        title: title.to_string(),
        content: format!("Contenido de {}", title),
        date: date(day),
        activity_type: activity_type.to_string(),
        author: "Admin".to_string(),
    }
}

fn details(title: &str, day: &str) -> PhotoDetails {
    PhotoDetails {
        title: title.to_string(),
        description: "Descripción".to_string(),
        date: date(day),
        author: "Admin".to_string(),
    }
}

#[tokio::test]
async fn test_news_crud() -> anyhow::Result<()> {
    let pool = common::test_pool().await;
    let repo = SqliteNewsRepository::new(pool.clone());

    // Create
    let news = repo.create(draft("Campeonato", "Deportes", "2025-03-01")).await?;
    assert!(news.id > 0);
    assert_eq!(news.title, "Campeonato");
    assert_eq!(news.date, date("2025-03-01"));

    // Find by ID
    let found = repo.find_by_id(news.id).await?;
    assert_eq!(found, Some(news.clone()));
    assert!(repo.find_by_id(news.id + 100).await?.is_none());

    // Update replaces every field
    let updated = repo
        .update(news.id, draft("Campeonato final", "Evento", "2025-03-02"))
        .await?;
    assert_eq!(updated.id, news.id);
    assert_eq!(updated.title, "Campeonato final");
    assert_eq!(updated.activity_type, "Evento");
    assert_eq!(updated.date, date("2025-03-02"));

    let missing = repo.update(9999, draft("x", "y", "2025-01-01")).await;
    assert!(matches!(missing, Err(AppError::NotFound(_))));

    // Delete
    assert_eq!(repo.count().await?, 1);
    assert!(repo.delete(news.id).await?);
    assert!(!repo.delete(news.id).await?);
    assert!(repo.find_by_id(news.id).await?.is_none());
    assert_eq!(repo.count().await?, 0);

    Ok(())
}

#[tokio::test]
async fn test_news_listing_order_and_limit() -> anyhow::Result<()> {
    let pool = common::test_pool().await;
    let repo = SqliteNewsRepository::new(pool);

    let older = repo.create(draft("Antigua", "Cultura", "2025-01-10")).await?;
    let first_same_day = repo.create(draft("Mañana", "Salud", "2025-02-01")).await?;
    let second_same_day = repo.create(draft("Tarde", "Salud", "2025-02-01")).await?;
    let newest = repo.create(draft("Nueva", "Deportes", "2025-03-01")).await?;
    repo.create(draft("Extra", "Cultura", "2024-12-01")).await?;

    let all = repo.list(&NewsFilter::default(), None).await?;
    let ids: Vec<i64> = all.iter().map(|n| n.id).collect();
    assert_eq!(ids[..4], [newest.id, second_same_day.id, first_same_day.id, older.id]);
    assert_eq!(all.len(), 5);

    let home = repo.list(&NewsFilter::default(), Some(4)).await?;
    assert_eq!(home.len(), 4);
    assert_eq!(home[0].id, newest.id);

    Ok(())
}

#[tokio::test]
async fn test_news_filters() -> anyhow::Result<()> {
    let pool = common::test_pool().await;
    let repo = SqliteNewsRepository::new(pool);

    repo.create(draft("Partido", "Deportes", "2025-03-01")).await?;
    repo.create(draft("Torneo", "deportes juveniles", "2025-03-02")).await?;
    repo.create(draft("Concierto", "Cultura", "2025-03-01")).await?;
    repo.create(draft("Rebaja", "Oferta 100%", "2025-03-03")).await?;

    let by_type = NewsFilter {
        activity_type: Some("DEPORTE".to_string()),
        date: None,
    };
    let found = repo.list(&by_type, None).await?;
    assert_eq!(found.len(), 2);
    assert!(found.iter().all(|n| n.activity_type.to_lowercase().contains("deporte")));

    let by_date = NewsFilter {
        activity_type: None,
        date: Some(date("2025-03-01")),
    };
    let found = repo.list(&by_date, None).await?;
    assert_eq!(found.len(), 2);
    assert!(found.iter().all(|n| n.date == date("2025-03-01")));

    let both = NewsFilter {
        activity_type: Some("cultura".to_string()),
        date: Some(date("2025-03-01")),
    };
    let found = repo.list(&both, None).await?;
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].title, "Concierto");

    // Wildcards in the needle match literally
    let percent = NewsFilter {
        activity_type: Some("%".to_string()),
        date: None,
    };
    let found = repo.list(&percent, None).await?;
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].title, "Rebaja");

    let underscore = NewsFilter {
        activity_type: Some("_".to_string()),
        date: None,
    };
    assert!(repo.list(&underscore, None).await?.is_empty());

    Ok(())
}

#[tokio::test]
async fn test_photo_crud() -> anyhow::Result<()> {
    let pool = common::test_pool().await;
    let repo = SqlitePhotoRepository::new(pool);

    let photo = repo
        .create(NewPhoto {
            filename: "abc.png".to_string(),
            details: details("Salida", "2025-02-10"),
        })
        .await?;
    assert_eq!(photo.filename, "abc.png");
    assert_eq!(photo.title, "Salida");

    let later = repo
        .create(NewPhoto {
            filename: "def.jpg".to_string(),
            details: details("Aniversario", "2025-03-10"),
        })
        .await?;

    let listed = repo.list(None).await?;
    assert_eq!(listed.iter().map(|p| p.id).collect::<Vec<_>>(), vec![later.id, photo.id]);
    assert_eq!(repo.list(Some(1)).await?.len(), 1);
    assert_eq!(repo.count().await?, 2);

    // Metadata edits keep the stored file
    let updated = repo.update(photo.id, details("Salida al cerro", "2025-02-11")).await?;
    assert_eq!(updated.filename, "abc.png");
    assert_eq!(updated.title, "Salida al cerro");
    assert_eq!(updated.date, date("2025-02-11"));

    assert!(matches!(
        repo.update(9999, details("x", "2025-01-01")).await,
        Err(AppError::NotFound(_))
    ));

    // Stored filenames are unique
    let duplicate = repo
        .create(NewPhoto {
            filename: "abc.png".to_string(),
            details: details("Copia", "2025-02-10"),
        })
        .await;
    assert!(duplicate.is_err());

    assert!(repo.delete(photo.id).await?);
    assert!(repo.find_by_id(photo.id).await?.is_none());
    assert!(!repo.delete(photo.id).await?);

    Ok(())
}

#[tokio::test]
async fn test_admin_accounts_and_sessions() -> anyhow::Result<()> {
    let pool = common::test_pool().await;
    let admin_repo = Arc::new(SqliteAdminRepository::new(pool.clone()));
    let auth = AuthService::new(pool.clone(), admin_repo.clone(), 24, false);

    assert!(auth.ensure_admin("admin", "cas2025").await?);
    assert!(!auth.ensure_admin("admin", "otra").await?);

    let admin = admin_repo.find_by_username("admin").await?.unwrap();
    assert_ne!(admin.password_hash, "cas2025");
    assert!(matches!(
        admin_repo.create("admin", "hash").await,
        Err(AppError::BadRequest(_))
    ));

    // Wrong password and unknown user look the same
    assert!(auth.login("admin", "wrong").await?.is_none());
    assert!(auth.login("nadie", "cas2025").await?.is_none());

    let (logged_in, session, token) = auth.login("admin", "cas2025").await?.unwrap();
    assert_eq!(logged_in.id, admin.id);
    assert_eq!(session.admin_id, admin.id);
    let lifetime = session.expires_at - Utc::now();
    assert!(lifetime > Duration::hours(23) && lifetime <= Duration::hours(24));
    let validated = auth.validate_session(&token).await?.unwrap();
    assert_eq!(validated.id, session.id);
    assert_eq!(validated.expires_at.timestamp(), session.expires_at.timestamp());

    // A reset closes existing sessions and swaps the password
    auth.reset_password("admin", "nueva-clave").await?;
    assert!(auth.validate_session(&token).await?.is_none());
    assert!(auth.login("admin", "cas2025").await?.is_none());
    assert!(auth.login("admin", "nueva-clave").await?.is_some());

    Ok(())
}

#[tokio::test]
async fn test_expired_sessions_are_rejected_and_cleaned() -> anyhow::Result<()> {
    let pool = common::test_pool().await;
    let admin_repo = Arc::new(SqliteAdminRepository::new(pool.clone()));
    let expired = AuthService::new(pool.clone(), admin_repo, -1, false);

    expired.ensure_admin("admin", "cas2025").await?;
    let (_, _, token) = expired.login("admin", "cas2025").await?.unwrap();

    assert!(expired.validate_session(&token).await?.is_none());
    assert_eq!(expired.cleanup_expired_sessions().await?, 1);
    assert_eq!(expired.cleanup_expired_sessions().await?, 0);

    Ok(())
}

#[tokio::test]
async fn test_logout_invalidates_token() -> anyhow::Result<()> {
    let pool = common::test_pool().await;
    let admin_repo = Arc::new(SqliteAdminRepository::new(pool.clone()));
    let auth = AuthService::new(pool, admin_repo, 24, false);

    auth.ensure_admin("admin", "cas2025").await?;
    let (_, _, token) = auth.login("admin", "cas2025").await?.unwrap();

    auth.invalidate_session(&token).await?;
    assert!(auth.validate_session(&token).await?.is_none());

    Ok(())
}
