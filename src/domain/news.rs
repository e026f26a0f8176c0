use chrono::NaiveDate;
use serde::Serialize;

pub const DEFAULT_AUTHOR: &str = "Admin";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, sqlx::FromRow)]
pub struct News {
    pub id: i64,
    pub title: String,
    pub content: String,
    pub date: NaiveDate,
    pub activity_type: String,
    pub author: String,
}

/// Normalized field values for creating or replacing a news item.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewsDraft {
    pub title: String,
    pub content: String,
    pub date: NaiveDate,
    pub activity_type: String,
    pub author: String,
}

/// Public listing filter. Empty fields match everything.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NewsFilter {
    /// Case-insensitive substring of `activity_type`.
    pub activity_type: Option<String>,
    pub date: Option<NaiveDate>,
}
