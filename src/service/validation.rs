//! Form parsing and normalization. Every default the site applies to
//! submitted data (author, date, contact placeholders) is decided here so
//! handlers only deal with clean values.

use chrono::{NaiveDate, Utc};
use serde::Deserialize;
use thiserror::Error;
use validator::Validate;

use crate::domain::{NewsDraft, NewsFilter, PhotoDetails, DEFAULT_AUTHOR};

pub const DATE_FORMAT: &str = "%Y-%m-%d";
pub const ANONYMOUS_NAME: &str = "Anónimo";
pub const MISSING_EMAIL: &str = "sin-correo@ejemplo.com";

/// User-facing validation failures. `Display` is the message shown on the page.
#[derive(Debug, Clone, Copy, Error, PartialEq, Eq)]
pub enum FormError {
    #[error("Completa los campos obligatorios.")]
    MissingFields,
    #[error("Fecha inválida.")]
    InvalidDate,
    #[error("Formato de fecha inválido (AAAA-MM-DD).")]
    InvalidFilterDate,
    #[error("Archivo no válido. (png, jpg, jpeg, gif, webp)")]
    InvalidFile,
    #[error("Por favor, escribe un mensaje.")]
    EmptyMessage,
}

fn not_blank(value: &str) -> Result<(), validator::ValidationError> {
    if value.trim().is_empty() {
        return Err(validator::ValidationError::new("blank"));
    }
    Ok(())
}

/// Submission day used when a form leaves the date blank.
pub fn today() -> NaiveDate {
    Utc::now().date_naive()
}

pub fn parse_date(value: &str) -> Result<NaiveDate, FormError> {
    NaiveDate::parse_from_str(value.trim(), DATE_FORMAT).map_err(|_| FormError::InvalidDate)
}

/// Blank means "keep `fallback`"; anything else must be a valid date.
fn date_or(value: &str, fallback: NaiveDate) -> Result<NaiveDate, FormError> {
    if value.trim().is_empty() {
        Ok(fallback)
    } else {
        parse_date(value)
    }
}

fn author_or_default(author: &str) -> String {
    let author = author.trim();
    if author.is_empty() {
        DEFAULT_AUTHOR.to_string()
    } else {
        author.to_string()
    }
}

#[derive(Debug, Default, Clone, Deserialize, Validate)]
pub struct NewsForm {
    #[serde(default)]
    #[validate(custom(function = "not_blank"))]
    pub title: String,
    #[serde(default)]
    #[validate(custom(function = "not_blank"))]
    pub content: String,
    #[serde(default)]
    #[validate(custom(function = "not_blank"))]
    pub activity_type: String,
    #[serde(default)]
    pub date: String,
    #[serde(default)]
    pub author: String,
    #[serde(default)]
    pub csrf_token: String,
}

impl NewsForm {
    /// `fallback_date` is today when creating and the stored date when editing.
    pub fn into_draft(self, fallback_date: NaiveDate) -> Result<NewsDraft, FormError> {
        self.validate().map_err(|_| FormError::MissingFields)?;
        let date = date_or(&self.date, fallback_date)?;

        Ok(NewsDraft {
            title: self.title.trim().to_string(),
            content: self.content,
            date,
            activity_type: self.activity_type.trim().to_string(),
            author: author_or_default(&self.author),
        })
    }
}

/// Text fields of the photo forms. The file itself travels separately.
#[derive(Debug, Default, Clone, Deserialize, Validate)]
pub struct PhotoForm {
    #[serde(default)]
    #[validate(custom(function = "not_blank"))]
    pub title: String,
    #[serde(default)]
    #[validate(custom(function = "not_blank"))]
    pub description: String,
    #[serde(default)]
    pub date: String,
    #[serde(default)]
    pub author: String,
    #[serde(default)]
    pub csrf_token: String,
}

impl PhotoForm {
    pub fn into_details(self, fallback_date: NaiveDate) -> Result<PhotoDetails, FormError> {
        self.validate().map_err(|_| FormError::MissingFields)?;
        let date = date_or(&self.date, fallback_date)?;

        Ok(PhotoDetails {
            title: self.title.trim().to_string(),
            description: self.description,
            date,
            author: author_or_default(&self.author),
        })
    }
}

#[derive(Debug, Default, Clone, Deserialize, Validate)]
pub struct ContactForm {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    #[validate(custom(function = "not_blank"))]
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContactSubmission {
    pub name: String,
    pub email: String,
    pub message: String,
}

impl ContactForm {
    pub fn into_submission(self) -> Result<ContactSubmission, FormError> {
        self.validate().map_err(|_| FormError::EmptyMessage)?;

        let name = match self.name.trim() {
            "" => ANONYMOUS_NAME.to_string(),
            name => name.to_string(),
        };
        let email = match self.email.trim() {
            "" => MISSING_EMAIL.to_string(),
            email => email.to_string(),
        };

        Ok(ContactSubmission {
            name,
            email,
            message: self.message,
        })
    }
}

#[derive(Debug, Default, Clone, Deserialize)]
pub struct NewsQuery {
    #[serde(default, rename = "type")]
    pub activity_type: String,
    #[serde(default)]
    pub date: String,
}

impl NewsQuery {
    /// Builds the listing filter. A malformed date is dropped from the filter
    /// and reported as a warning instead of failing the request.
    pub fn to_filter(&self) -> (NewsFilter, Option<FormError>) {
        let activity_type = match self.activity_type.trim() {
            "" => None,
            value => Some(value.to_string()),
        };

        let (date, warning) = match self.date.trim() {
            "" => (None, None),
            value => match parse_date(value) {
                Ok(date) => (Some(date), None),
                Err(_) => (None, Some(FormError::InvalidFilterDate)),
            },
        };

        (NewsFilter { activity_type, date }, warning)
    }
}
