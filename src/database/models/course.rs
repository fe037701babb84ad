use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Course {
    pub id: i64,
    pub title: String,
    pub description: Option<String>,
    pub credits: i32,
    pub instructor: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
