use chrono::NaiveDate;
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, sqlx::FromRow)]
pub struct Photo {
    pub id: i64,
    pub filename: String,
    pub title: String,
    pub description: String,
    pub date: NaiveDate,
    pub author: String,
}

/// Editable metadata of a photo. The stored image itself never changes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PhotoDetails {
    pub title: String,
    pub description: String,
    pub date: NaiveDate,
    pub author: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewPhoto {
    pub filename: String,
    pub details: PhotoDetails,
}
