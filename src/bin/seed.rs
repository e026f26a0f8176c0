use std::sync::Arc;

use chrono::{Duration, Utc};
use clap::Parser;
use sqlx::sqlite::SqlitePoolOptions;

use cas_site::{
    auth::AuthService,
    config::Settings,
    domain::{NewsDraft, DEFAULT_AUTHOR},
    repository::{NewsRepository, SqliteAdminRepository, SqliteNewsRepository},
    MIGRATOR,
};

/// Prepare a CAS site database: admin account and optional demo content.
#[derive(Debug, Parser)]
#[command(name = "seed")]
struct Args {
    /// Database URL (defaults to the configured one)
    #[arg(long, env = "DATABASE_URL")]
    database_url: Option<String>,

    /// Admin username to ensure
    #[arg(long)]
    username: Option<String>,

    /// Admin password used when creating or resetting
    #[arg(long)]
    password: Option<String>,

    /// Overwrite the password of an existing admin
    #[arg(long)]
    reset_password: bool,

    /// Insert a handful of sample news items
    #[arg(long)]
    demo: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let args = Args::parse();
    let settings = Settings::new().unwrap_or_default();

    let database_url = args.database_url.unwrap_or(settings.database.url.clone());
    let username = args.username.unwrap_or(settings.auth.admin_username.clone());
    let password = args.password.unwrap_or(settings.auth.admin_password.clone());

    println!("Connecting to {}", database_url);
    let db_pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect(&database_url)
        .await?;

    println!("Running migrations...");
    MIGRATOR.run(&db_pool).await?;

    let admin_repo = Arc::new(SqliteAdminRepository::new(db_pool.clone()));
    let auth_service = AuthService::new(
        db_pool.clone(),
        admin_repo,
        settings.auth.session_duration_hours,
        settings.auth.secure_cookies,
    );

    if auth_service.ensure_admin(&username, &password).await? {
        println!("Created admin '{}'", username);
    } else if args.reset_password {
        auth_service.reset_password(&username, &password).await?;
        println!("Reset password for admin '{}'", username);
    } else {
        println!("Admin '{}' already exists (use --reset-password to change it)", username);
    }

    if args.demo {
        let news_repo = SqliteNewsRepository::new(db_pool.clone());
        let today = Utc::now().date_naive();
        let samples = [
            ("Campeonato de baby fútbol", "Inscripciones abiertas para todas las categorías.", "Deportes", 0),
            ("Taller de pintura", "Sesiones los sábados en la sede.", "Cultura", 7),
            ("Operativo de salud", "Controles preventivos gratuitos para socios.", "Salud", 14),
        ];

        for (title, content, activity_type, days_ago) in samples {
            let news = news_repo.create(NewsDraft {
                title: title.to_string(),
                content: content.to_string(),
                date: today - Duration::days(days_ago),
                activity_type: activity_type.to_string(),
                author: DEFAULT_AUTHOR.to_string(),
            }).await?;
            println!("  Added news #{} '{}'", news.id, news.title);
        }
    }

    println!("Done.");
    Ok(())
}
