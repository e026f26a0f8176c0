use askama::Template;
use axum::{
    extract::{multipart::Field, Multipart, Path, State},
    response::{IntoResponse, Response},
    Extension, Form,
};
use axum_extra::extract::CookieJar;

use crate::{
    domain::{NewPhoto, Photo},
    error::{AppError, Result},
    service::validation::{today, FormError, PhotoForm},
    web::{
        admin::CsrfForm,
        flash::{self, Flash},
        middleware::{csrf_token, verify_csrf, CurrentAdmin, SessionInfo},
        state::AppState,
        templates::HtmlTemplate,
        uploads::allowed_extension,
    },
};

const ADD_PHOTO_PATH: &str = "/admin/photos/add";

fn edit_path(id: i64) -> String {
    format!("/admin/photos/{}/edit", id)
}

async fn load_photo(state: &AppState, id: i64) -> Result<Photo> {
    state.service_context.photo_repo
        .find_by_id(id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Foto {} no encontrada", id)))
}

async fn field_text(field: Field<'_>) -> Result<String> {
    field
        .text()
        .await
        .map_err(|e| AppError::BadRequest(format!("Invalid form field: {}", e)))
}

struct UploadedFile {
    filename: String,
    data: Vec<u8>,
}

/// Splits the add-photo multipart body into its text fields and the image.
/// A file input left empty by the browser counts as no file.
async fn parse_photo_upload(mut multipart: Multipart) -> Result<(PhotoForm, Option<UploadedFile>)> {
    let mut form = PhotoForm::default();
    let mut upload = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::BadRequest(format!("Invalid multipart payload: {}", e)))?
    {
        let name = field.name().unwrap_or("").to_string();

        match name.as_str() {
            "photo" => {
                let filename = field.file_name().unwrap_or("").to_string();
                let data = field
                    .bytes()
                    .await
                    .map_err(|e| AppError::BadRequest(format!("Failed to read upload: {}", e)))?;
                if !filename.is_empty() {
                    upload = Some(UploadedFile {
                        filename,
                        data: data.to_vec(),
                    });
                }
            }
            "title" => form.title = field_text(field).await?,
            "description" => form.description = field_text(field).await?,
            "date" => form.date = field_text(field).await?,
            "author" => form.author = field_text(field).await?,
            "csrf_token" => form.csrf_token = field_text(field).await?,
            _ => {
                let _ = field.bytes().await;
            }
        }
    }

    Ok((form, upload))
}

#[derive(Template)]
#[template(path = "admin/add_photo.html")]
pub struct AddPhotoTemplate {
    pub flashes: Vec<Flash>,
    pub csrf_token: String,
}

// GET /admin/photos/add
pub async fn add_photo_page(
    State(state): State<AppState>,
    Extension(session): Extension<SessionInfo>,
    jar: CookieJar,
) -> impl IntoResponse {
    let (jar, flashes) = flash::take(jar);
    (jar, HtmlTemplate(AddPhotoTemplate {
        flashes,
        csrf_token: csrf_token(&state, &session),
    }))
}

// POST /admin/photos/add
pub async fn create_photo(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentAdmin>,
    Extension(session): Extension<SessionInfo>,
    jar: CookieJar,
    multipart: Multipart,
) -> Result<Response> {
    let (form, upload) = parse_photo_upload(multipart).await?;
    verify_csrf(&state, &session, &form.csrf_token)?;

    let Some(upload) = upload.filter(|u| allowed_extension(&u.filename).is_some()) else {
        return Ok(flash::redirect(jar, FormError::InvalidFile.into(), ADD_PHOTO_PATH));
    };

    // Validate everything before the first byte hits the disk.
    let details = match form.into_details(today()) {
        Ok(details) => details,
        Err(e) => return Ok(flash::redirect(jar, e.into(), ADD_PHOTO_PATH)),
    };

    let context = &state.service_context;
    let filename = context.uploads.save(&upload.filename, &upload.data).await?;

    let photo = match context.photo_repo.create(NewPhoto { filename: filename.clone(), details }).await {
        Ok(photo) => photo,
        Err(e) => {
            if let Err(remove_err) = context.uploads.remove(&filename).await {
                tracing::warn!("Could not remove orphaned upload {}: {}", filename, remove_err);
            }
            return Err(e);
        }
    };
    tracing::info!(
        "Admin '{}' uploaded photo {} as {}",
        current.admin.username, photo.id, photo.filename
    );

    Ok(flash::redirect(jar, Flash::success("Foto subida a la galería."), "/admin"))
}

#[derive(Template)]
#[template(path = "admin/edit_photo.html")]
pub struct EditPhotoTemplate {
    pub flashes: Vec<Flash>,
    pub csrf_token: String,
    pub p: Photo,
}

// GET /admin/photos/:id/edit
pub async fn edit_photo_page(
    State(state): State<AppState>,
    Extension(session): Extension<SessionInfo>,
    Path(photo_id): Path<i64>,
    jar: CookieJar,
) -> Result<impl IntoResponse> {
    let p = load_photo(&state, photo_id).await?;

    let (jar, flashes) = flash::take(jar);
    Ok((jar, HtmlTemplate(EditPhotoTemplate {
        flashes,
        csrf_token: csrf_token(&state, &session),
        p,
    })))
}

// POST /admin/photos/:id/edit
pub async fn update_photo(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentAdmin>,
    Extension(session): Extension<SessionInfo>,
    Path(photo_id): Path<i64>,
    jar: CookieJar,
    Form(form): Form<PhotoForm>,
) -> Result<Response> {
    verify_csrf(&state, &session, &form.csrf_token)?;
    let existing = load_photo(&state, photo_id).await?;

    let details = match form.into_details(existing.date) {
        Ok(details) => details,
        Err(e) => return Ok(flash::redirect(jar, e.into(), &edit_path(photo_id))),
    };

    state.service_context.photo_repo.update(photo_id, details).await?;
    tracing::info!("Admin '{}' updated photo {}", current.admin.username, photo_id);

    Ok(flash::redirect(jar, Flash::success("Foto actualizada."), "/admin"))
}

// POST /admin/photos/:id/delete
pub async fn delete_photo(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentAdmin>,
    Extension(session): Extension<SessionInfo>,
    Path(photo_id): Path<i64>,
    jar: CookieJar,
    Form(form): Form<CsrfForm>,
) -> Result<Response> {
    verify_csrf(&state, &session, &form.csrf_token)?;
    let photo = load_photo(&state, photo_id).await?;
    let context = &state.service_context;

    // The row goes regardless; a file that cannot be removed stays orphaned.
    if let Err(e) = context.uploads.remove(&photo.filename).await {
        tracing::warn!("Could not remove {} for photo {}: {}", photo.filename, photo.id, e);
    }

    context.photo_repo.delete(photo.id).await?;
    tracing::info!("Admin '{}' deleted photo {}", current.admin.username, photo.id);

    Ok(flash::redirect(jar, Flash::info("Foto eliminada."), "/admin"))
}
