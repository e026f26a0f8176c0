use axum::{
    extract::{Request, State},
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};
use axum_extra::extract::CookieJar;

use crate::{
    auth::SESSION_COOKIE,
    domain::Admin,
    error::{AppError, Result},
    web::state::AppState,
};

pub const LOGIN_PATH: &str = "/admin/login";

#[derive(Clone)]
pub struct CurrentAdmin {
    pub admin: Admin,
}

#[derive(Clone)]
pub struct SessionInfo {
    pub session_id: String,
}

/// Guard for the admin panel. Anything short of a live session that belongs
/// to an existing admin is sent to the login page.
pub async fn require_admin(
    State(state): State<AppState>,
    jar: CookieJar,
    mut request: Request,
    next: Next,
) -> Response {
    let Some(session_cookie) = jar.get(SESSION_COOKIE) else {
        return Redirect::to(LOGIN_PATH).into_response();
    };

    let context = &state.service_context;

    let session = match context.auth_service.validate_session(session_cookie.value()).await {
        Ok(Some(session)) => session,
        Ok(None) => return Redirect::to(LOGIN_PATH).into_response(),
        Err(e) => return e.into_response(),
    };

    let admin = match context.admin_repo.find_by_id(session.admin_id).await {
        Ok(Some(admin)) => admin,
        Ok(None) => {
            tracing::warn!("Session {} refers to missing admin {}", session.id, session.admin_id);
            return Redirect::to(LOGIN_PATH).into_response();
        }
        Err(e) => return e.into_response(),
    };

    request.extensions_mut().insert(CurrentAdmin { admin });
    request.extensions_mut().insert(SessionInfo { session_id: session.id });

    next.run(request).await
}

/// Rejects state-changing admin requests whose form token does not belong to
/// the current session.
pub fn verify_csrf(state: &AppState, session: &SessionInfo, token: &str) -> Result<()> {
    if state.service_context.csrf_service.validate_token(&session.session_id, token) {
        Ok(())
    } else {
        tracing::warn!("Rejected request with invalid CSRF token");
        Err(AppError::Forbidden)
    }
}

pub fn csrf_token(state: &AppState, session: &SessionInfo) -> String {
    state.service_context.csrf_service.generate_token(&session.session_id)
}
