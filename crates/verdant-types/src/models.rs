use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Plant {
    pub id: Uuid,
    pub name: String,
    pub species: String,
    pub last_watered: DateTime<Utc>,
    pub image_url: String,
    pub created_at: DateTime<Utc>,
}

/// A timestamped record of an action taken on a plant. The only kind
/// recorded today is a watering.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CareEvent {
    pub id: Uuid,
    pub kind: String,
    pub event_at: DateTime<Utc>,
    pub note: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ForumPost {
    pub id: Uuid,
    pub author_id: Uuid,
    pub author_username: String,
    pub title: String,
    pub content: String,
    pub created_at: DateTime<Utc>,
}
