use askama::Template;
use axum::{
    extract::State,
    response::{IntoResponse, Response},
    Form,
};
use axum_extra::extract::CookieJar;
use serde::Deserialize;

use crate::{
    auth::{AuthService, SESSION_COOKIE},
    error::Result,
    web::{
        flash::{self, Flash},
        middleware::LOGIN_PATH,
        state::AppState,
        templates::HtmlTemplate,
    },
};

#[derive(Template)]
#[template(path = "admin/login.html")]
pub struct LoginTemplate {
    pub flashes: Vec<Flash>,
}

#[derive(Debug, Default, Deserialize)]
pub struct LoginForm {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
}

// GET /admin/login
pub async fn login_page(jar: CookieJar) -> impl IntoResponse {
    let (jar, flashes) = flash::take(jar);
    (jar, HtmlTemplate(LoginTemplate { flashes }))
}

// POST /admin/login
pub async fn login_handler(
    State(state): State<AppState>,
    jar: CookieJar,
    Form(credentials): Form<LoginForm>,
) -> Result<Response> {
    let auth_service = &state.service_context.auth_service;

    match auth_service.login(&credentials.username, &credentials.password).await? {
        Some((admin, session, token)) => {
            tracing::info!(
                "Admin '{}' logged in, session valid until {}",
                admin.username, session.expires_at
            );
            let jar = jar.add(auth_service.create_session_cookie(&token));
            Ok(flash::redirect(jar, Flash::success("Bienvenido al panel."), "/admin"))
        }
        None => {
            tracing::warn!("Failed login attempt for '{}'", credentials.username);
            let (jar, mut flashes) = flash::take(jar);
            flashes.push(Flash::danger("Credenciales inválidas."));
            Ok((jar, HtmlTemplate(LoginTemplate { flashes })).into_response())
        }
    }
}

// GET /admin/logout
pub async fn logout_handler(
    State(state): State<AppState>,
    jar: CookieJar,
) -> Result<Response> {
    if let Some(cookie) = jar.get(SESSION_COOKIE) {
        state.service_context.auth_service
            .invalidate_session(cookie.value())
            .await?;
    }

    let jar = jar.add(AuthService::create_logout_cookie());
    Ok(flash::redirect(jar, Flash::info("Sesión cerrada."), LOGIN_PATH))
}
