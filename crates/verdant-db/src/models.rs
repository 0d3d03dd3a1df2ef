//! Database row types — these map directly to SQLite rows.
//! Distinct from verdant-types API models to keep the DB layer independent.

use chrono::{DateTime, Utc};

pub struct UserRow {
    pub id: String,
    pub username: String,
    pub email: String,
    pub password: String,
    pub created_at: String,
}

pub struct SessionRow {
    pub token: String,
    pub user_id: String,
    pub created_at: String,
    pub expires_at: String,
}

pub struct PlantRow {
    pub id: String,
    pub user_id: String,
    pub name: String,
    pub species: String,
    pub last_watered: String,
    pub image_url: String,
    pub created_at: String,
}

pub struct CareEventRow {
    pub id: String,
    pub plant_id: String,
    pub user_id: String,
    pub kind: String,
    pub event_at: String,
    pub note: Option<String>,
}

pub struct ForumPostRow {
    pub id: String,
    pub author_id: String,
    pub author_username: String,
    pub title: String,
    pub content: String,
    pub created_at: String,
}

/// Insert shape for a plant; the initial care event is derived from it.
pub struct NewPlant<'a> {
    pub id: &'a str,
    pub user_id: &'a str,
    pub name: &'a str,
    pub species: &'a str,
    pub last_watered: DateTime<Utc>,
    pub image_url: &'a str,
    pub created_at: DateTime<Utc>,
}
