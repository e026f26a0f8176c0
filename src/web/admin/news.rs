use askama::Template;
use axum::{
    extract::{Path, State},
    response::{IntoResponse, Response},
    Extension, Form,
};
use axum_extra::extract::CookieJar;

use crate::{
    domain::News,
    error::{AppError, Result},
    service::validation::{today, NewsForm},
    web::{
        admin::CsrfForm,
        flash::{self, Flash},
        middleware::{csrf_token, verify_csrf, CurrentAdmin, SessionInfo},
        state::AppState,
        templates::HtmlTemplate,
    },
};

const ADD_NEWS_PATH: &str = "/admin/news/add";

fn edit_path(id: i64) -> String {
    format!("/admin/news/{}/edit", id)
}

async fn load_news(state: &AppState, id: i64) -> Result<News> {
    state.service_context.news_repo
        .find_by_id(id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Noticia {} no encontrada", id)))
}

#[derive(Template)]
#[template(path = "admin/add_news.html")]
pub struct AddNewsTemplate {
    pub flashes: Vec<Flash>,
    pub csrf_token: String,
}

// GET /admin/news/add
pub async fn add_news_page(
    State(state): State<AppState>,
    Extension(session): Extension<SessionInfo>,
    jar: CookieJar,
) -> impl IntoResponse {
    let (jar, flashes) = flash::take(jar);
    (jar, HtmlTemplate(AddNewsTemplate {
        flashes,
        csrf_token: csrf_token(&state, &session),
    }))
}

// POST /admin/news/add
pub async fn create_news(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentAdmin>,
    Extension(session): Extension<SessionInfo>,
    jar: CookieJar,
    Form(form): Form<NewsForm>,
) -> Result<Response> {
    verify_csrf(&state, &session, &form.csrf_token)?;

    let draft = match form.into_draft(today()) {
        Ok(draft) => draft,
        Err(e) => return Ok(flash::redirect(jar, e.into(), ADD_NEWS_PATH)),
    };

    let news = state.service_context.news_repo.create(draft).await?;
    tracing::info!("Admin '{}' created news {}", current.admin.username, news.id);

    Ok(flash::redirect(jar, Flash::success("Noticia creada."), "/admin"))
}

#[derive(Template)]
#[template(path = "admin/edit_news.html")]
pub struct EditNewsTemplate {
    pub flashes: Vec<Flash>,
    pub csrf_token: String,
    pub n: News,
}

// GET /admin/news/:id/edit
pub async fn edit_news_page(
    State(state): State<AppState>,
    Extension(session): Extension<SessionInfo>,
    Path(news_id): Path<i64>,
    jar: CookieJar,
) -> Result<impl IntoResponse> {
    let n = load_news(&state, news_id).await?;

    let (jar, flashes) = flash::take(jar);
    Ok((jar, HtmlTemplate(EditNewsTemplate {
        flashes,
        csrf_token: csrf_token(&state, &session),
        n,
    })))
}

// POST /admin/news/:id/edit
pub async fn update_news(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentAdmin>,
    Extension(session): Extension<SessionInfo>,
    Path(news_id): Path<i64>,
    jar: CookieJar,
    Form(form): Form<NewsForm>,
) -> Result<Response> {
    verify_csrf(&state, &session, &form.csrf_token)?;
    let existing = load_news(&state, news_id).await?;

    let draft = match form.into_draft(existing.date) {
        Ok(draft) => draft,
        Err(e) => return Ok(flash::redirect(jar, e.into(), &edit_path(news_id))),
    };

    state.service_context.news_repo.update(news_id, draft).await?;
    tracing::info!("Admin '{}' updated news {}", current.admin.username, news_id);

    Ok(flash::redirect(jar, Flash::success("Noticia actualizada."), "/admin"))
}

// POST /admin/news/:id/delete
pub async fn delete_news(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentAdmin>,
    Extension(session): Extension<SessionInfo>,
    Path(news_id): Path<i64>,
    jar: CookieJar,
    Form(form): Form<CsrfForm>,
) -> Result<Response> {
    verify_csrf(&state, &session, &form.csrf_token)?;

    if !state.service_context.news_repo.delete(news_id).await? {
        return Err(AppError::NotFound(format!("Noticia {} no encontrada", news_id)));
    }
    tracing::info!("Admin '{}' deleted news {}", current.admin.username, news_id);

    Ok(flash::redirect(jar, Flash::info("Noticia eliminada."), "/admin"))
}
