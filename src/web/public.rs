use askama::Template;
use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Form, Json,
};
use axum_extra::extract::CookieJar;
use serde_json::json;

use crate::{
    domain::{News, NewsFilter, Photo},
    email::OutgoingEmail,
    error::Result,
    service::validation::{ContactForm, NewsQuery},
    web::{
        flash::{self, Flash},
        state::AppState,
        templates::HtmlTemplate,
    },
};

const HOME_NEWS_LIMIT: i64 = 4;

#[derive(Template)]
#[template(path = "index.html")]
pub struct IndexTemplate {
    pub flashes: Vec<Flash>,
    pub news_list: Vec<News>,
}

pub async fn index(
    State(state): State<AppState>,
    jar: CookieJar,
) -> Result<impl IntoResponse> {
    let news_list = state.service_context.news_repo
        .list(&NewsFilter::default(), Some(HOME_NEWS_LIMIT))
        .await?;

    let (jar, flashes) = flash::take(jar);
    Ok((jar, HtmlTemplate(IndexTemplate { flashes, news_list })))
}

#[derive(Template)]
#[template(path = "news.html")]
pub struct NewsTemplate {
    pub flashes: Vec<Flash>,
    pub all_news: Vec<News>,
    pub activity_type: String,
    pub date_str: String,
}

// GET /news?type=&date=
pub async fn news(
    State(state): State<AppState>,
    Query(query): Query<NewsQuery>,
    jar: CookieJar,
) -> Result<impl IntoResponse> {
    let (filter, warning) = query.to_filter();

    let all_news = state.service_context.news_repo
        .list(&filter, None)
        .await?;

    let (jar, mut flashes) = flash::take(jar);
    if let Some(warning) = warning {
        flashes.push(Flash::from(warning));
    }

    Ok((jar, HtmlTemplate(NewsTemplate {
        flashes,
        all_news,
        activity_type: query.activity_type.trim().to_string(),
        date_str: query.date.trim().to_string(),
    })))
}

#[derive(Template)]
#[template(path = "gallery.html")]
pub struct GalleryTemplate {
    pub flashes: Vec<Flash>,
    pub photos: Vec<Photo>,
}

pub async fn gallery(
    State(state): State<AppState>,
    jar: CookieJar,
) -> Result<impl IntoResponse> {
    let photos = state.service_context.photo_repo.list(None).await?;

    let (jar, flashes) = flash::take(jar);
    Ok((jar, HtmlTemplate(GalleryTemplate { flashes, photos })))
}

#[derive(Template)]
#[template(path = "contact.html")]
pub struct ContactTemplate {
    pub flashes: Vec<Flash>,
}

pub async fn contact_page(jar: CookieJar) -> impl IntoResponse {
    let (jar, flashes) = flash::take(jar);
    (jar, HtmlTemplate(ContactTemplate { flashes }))
}

// POST /contact
pub async fn contact_submit(
    State(state): State<AppState>,
    jar: CookieJar,
    Form(form): Form<ContactForm>,
) -> Response {
    let submission = match form.into_submission() {
        Ok(submission) => submission,
        Err(e) => return flash::redirect(jar, e.into(), "/contact"),
    };

    let email = OutgoingEmail::contact(&submission, &state.settings.mail.recipients);

    let outcome = match state.service_context.email_sender.send(&email).await {
        Ok(()) => Flash::success("Mensaje enviado correctamente. ¡Gracias!"),
        Err(e) => {
            tracing::error!("Contact form delivery failed: {}", e);
            Flash::danger("No se pudo enviar el mensaje. Revisa la configuración de correo.")
        }
    };

    flash::redirect(jar, outcome, "/contact")
}

pub async fn health_check() -> impl IntoResponse {
    (StatusCode::OK, Json(json!({
        "status": "healthy",
        "timestamp": chrono::Utc::now().to_rfc3339()
    })))
}
