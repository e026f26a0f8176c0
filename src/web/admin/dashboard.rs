use askama::Template;
use axum::{
    extract::State,
    response::IntoResponse,
    Extension,
};
use axum_extra::extract::CookieJar;

use crate::{
    domain::{News, NewsFilter, Photo},
    error::Result,
    web::{
        flash::{self, Flash},
        middleware::{csrf_token, CurrentAdmin, SessionInfo},
        state::AppState,
        templates::HtmlTemplate,
    },
};

const RECENT_LIMIT: i64 = 5;

#[derive(Template)]
#[template(path = "admin/dashboard.html")]
pub struct DashboardTemplate {
    pub flashes: Vec<Flash>,
    pub csrf_token: String,
    pub username: String,
    pub news_count: i64,
    pub photo_count: i64,
    pub recent_news: Vec<News>,
    pub recent_photos: Vec<Photo>,
}

// GET /admin
pub async fn dashboard(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentAdmin>,
    Extension(session): Extension<SessionInfo>,
    jar: CookieJar,
) -> Result<impl IntoResponse> {
    let context = &state.service_context;

    let news_count = context.news_repo.count().await?;
    let photo_count = context.photo_repo.count().await?;
    let recent_news = context.news_repo
        .list(&NewsFilter::default(), Some(RECENT_LIMIT))
        .await?;
    let recent_photos = context.photo_repo.list(Some(RECENT_LIMIT)).await?;

    let (jar, flashes) = flash::take(jar);
    Ok((jar, HtmlTemplate(DashboardTemplate {
        flashes,
        csrf_token: csrf_token(&state, &session),
        username: current.admin.username,
        news_count,
        photo_count,
        recent_news,
        recent_photos,
    })))
}
