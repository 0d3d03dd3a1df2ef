use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::{CareEvent, ForumPost, Plant};

// -- Auth forms --

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RegisterForm {
    pub username: String,
    pub email: String,
    pub password: String,
    pub confirm: String,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LoginForm {
    pub email: String,
    pub password: String,
}

// -- Plant forms --

/// Shared by the add and edit forms; `last_watered` arrives as `YYYY-MM-DD`.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PlantForm {
    pub name: String,
    pub species: String,
    pub last_watered: String,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct WaterForm {
    pub note: Option<String>,
}

/// Checkbox selection from the list page; the field repeats once per id.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DeleteSelectedForm {
    #[serde(default)]
    pub plant_ids: Vec<String>,
}

// -- Forum forms --

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct NewPostForm {
    pub title: String,
    pub content: String,
}

// -- View-models --
//
// GET pages hand the external template layer a JSON view-model; mutating
// routes answer with redirects only.

/// A plant as shown on the list and detail pages. `days_since_watered` is
/// whole days, truncated, and may be negative for future-dated waterings.
#[derive(Debug, Clone, Serialize)]
pub struct PlantView {
    pub id: Uuid,
    pub name: String,
    pub species: String,
    pub last_watered: chrono::DateTime<chrono::Utc>,
    pub image_url: String,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub days_since_watered: i64,
}

#[derive(Debug, Serialize)]
pub struct PlantListPage {
    pub username: String,
    pub notice: Option<String>,
    pub plants: Vec<PlantView>,
}

#[derive(Debug, Serialize)]
pub struct AddPlantPage {
    pub species: Vec<String>,
    pub notice: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct EditPlantPage {
    pub plant: Plant,
    pub species: Vec<String>,
    pub notice: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct PlantDetailPage {
    pub plant: PlantView,
    pub events: Vec<CareEvent>,
}

#[derive(Debug, Serialize)]
pub struct ForumPage {
    /// Present when the viewer carries a valid session; the forum itself is
    /// readable without one.
    pub username: Option<String>,
    pub posts: Vec<ForumPost>,
}

#[derive(Debug, Serialize)]
pub struct NewPostPage {
    pub username: String,
    pub notice: Option<String>,
}

/// Register and login pages carry nothing but the flash-equivalent notice.
#[derive(Debug, Serialize)]
pub struct AuthPage {
    pub notice: Option<String>,
}
