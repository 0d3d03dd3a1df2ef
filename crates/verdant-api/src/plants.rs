use axum::{
    Extension, Form, Json,
    extract::{Path, Query, State},
    response::{IntoResponse, Redirect},
};
use axum_extra::extract::Form as MultiForm;
use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use tracing::{error, warn};
use uuid::Uuid;

use verdant_db::models::{NewPlant, PlantRow};
use verdant_types::api::{
    AddPlantPage, DeleteSelectedForm, EditPlantPage, PlantDetailPage, PlantForm, PlantListPage,
    PlantView, WaterForm,
};
use verdant_types::models::{CareEvent, Plant};

use crate::auth::{AppState, NoticeQuery};
use crate::error::{ApiError, with_notice};
use crate::middleware::CurrentUser;
use crate::species;
use crate::{parse_db_time, parse_id};

pub async fn list_plants(
    State(state): State<AppState>,
    Query(query): Query<NoticeQuery>,
    Extension(user): Extension<CurrentUser>,
) -> Result<impl IntoResponse, ApiError> {
    // Run blocking DB reads off the async runtime
    let db = state.clone();
    let uid = user.id.to_string();
    let rows = tokio::task::spawn_blocking(move || db.db.get_plants_for_user(&uid))
        .await
        .map_err(|e| { error!("spawn_blocking join error: {}", e); anyhow::anyhow!(e) })??;

    let now = chrono::Utc::now();
    let plants = rows.into_iter().map(|row| plant_view(row, now)).collect();

    Ok(Json(PlantListPage {
        username: user.username,
        notice: query.notice,
        plants,
    }))
}

pub async fn add_plant_page(Query(query): Query<NoticeQuery>) -> Json<AddPlantPage> {
    Json(AddPlantPage {
        species: species::species_list(),
        notice: query.notice,
    })
}

pub async fn add_plant(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Form(form): Form<PlantForm>,
) -> Result<impl IntoResponse, ApiError> {
    if form.name.trim().is_empty() {
        return Err(ApiError::Validation {
            message: "Give the plant a name".into(),
            back: "/add".into(),
        });
    }
    let last_watered = parse_watered_date(&form.last_watered, "/add".into())?;

    let plant_id = Uuid::new_v4();
    let event_id = Uuid::new_v4();
    let image_url = species::image_for(form.species.trim());
    let now = chrono::Utc::now();

    let db = state.clone();
    let uid = user.id.to_string();
    let name = form.name.trim().to_string();
    let species = form.species.trim().to_string();
    tokio::task::spawn_blocking(move || {
        let pid = plant_id.to_string();
        let eid = event_id.to_string();
        db.db.create_plant(
            &NewPlant {
                id: &pid,
                user_id: &uid,
                name: &name,
                species: &species,
                last_watered,
                image_url,
                created_at: now,
            },
            &eid,
        )
    })
    .await
    .map_err(|e| { error!("spawn_blocking join error: {}", e); anyhow::anyhow!(e) })??;

    Ok(Redirect::to("/"))
}

pub async fn edit_plant_page(
    State(state): State<AppState>,
    Path(plant_id): Path<Uuid>,
    Query(query): Query<NoticeQuery>,
    Extension(user): Extension<CurrentUser>,
) -> Result<impl IntoResponse, ApiError> {
    let db = state.clone();
    let pid = plant_id.to_string();
    let uid = user.id.to_string();
    let row = tokio::task::spawn_blocking(move || db.db.get_plant_for_user(&pid, &uid))
        .await
        .map_err(|e| { error!("spawn_blocking join error: {}", e); anyhow::anyhow!(e) })??
        .ok_or(ApiError::NotFoundOrForbidden)?;

    Ok(Json(EditPlantPage {
        plant: plant_model(row),
        species: species::species_list(),
        notice: query.notice,
    }))
}

pub async fn edit_plant(
    State(state): State<AppState>,
    Path(plant_id): Path<Uuid>,
    Extension(user): Extension<CurrentUser>,
    Form(form): Form<PlantForm>,
) -> Result<impl IntoResponse, ApiError> {
    if form.name.trim().is_empty() {
        return Err(ApiError::Validation {
            message: "Give the plant a name".into(),
            back: format!("/edit/{}", plant_id),
        });
    }
    let last_watered = parse_watered_date(&form.last_watered, format!("/edit/{}", plant_id))?;

    // The image follows the (possibly changed) species.
    let image_url = species::image_for(form.species.trim());

    let db = state.clone();
    let pid = plant_id.to_string();
    let uid = user.id.to_string();
    let name = form.name.trim().to_string();
    let species = form.species.trim().to_string();
    let changed = tokio::task::spawn_blocking(move || {
        db.db.update_plant(&pid, &uid, &name, &species, last_watered, image_url)
    })
    .await
    .map_err(|e| { error!("spawn_blocking join error: {}", e); anyhow::anyhow!(e) })??;

    if !changed {
        return Err(ApiError::NotFoundOrForbidden);
    }
    Ok(Redirect::to("/"))
}

pub async fn water_plant(
    State(state): State<AppState>,
    Path(plant_id): Path<Uuid>,
    Extension(user): Extension<CurrentUser>,
    Form(form): Form<WaterForm>,
) -> Result<impl IntoResponse, ApiError> {
    let note = form.note.map(|n| n.trim().to_string()).filter(|n| !n.is_empty());
    let now = chrono::Utc::now();
    let event_id = Uuid::new_v4();

    let db = state.clone();
    let pid = plant_id.to_string();
    let uid = user.id.to_string();
    let watered = tokio::task::spawn_blocking(move || {
        let eid = event_id.to_string();
        db.db.water_plant(&pid, &uid, &eid, now, note.as_deref())
    })
    .await
    .map_err(|e| { error!("spawn_blocking join error: {}", e); anyhow::anyhow!(e) })??;

    if !watered {
        return Err(ApiError::NotFoundOrForbidden);
    }
    Ok(Redirect::to("/"))
}

pub async fn delete_plant(
    State(state): State<AppState>,
    Path(plant_id): Path<Uuid>,
    Extension(user): Extension<CurrentUser>,
) -> Result<impl IntoResponse, ApiError> {
    let db = state.clone();
    let pid = plant_id.to_string();
    let uid = user.id.to_string();
    let deleted = tokio::task::spawn_blocking(move || db.db.delete_plant(&pid, &uid))
        .await
        .map_err(|e| { error!("spawn_blocking join error: {}", e); anyhow::anyhow!(e) })??;

    if !deleted {
        return Err(ApiError::NotFoundOrForbidden);
    }
    Ok(Redirect::to("/"))
}

/// Checkbox bulk delete. Unparseable ids and plants the caller does not own
/// are skipped; the redirect notice reports how many were actually removed.
pub async fn delete_selected_plants(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    MultiForm(form): MultiForm<DeleteSelectedForm>,
) -> Result<impl IntoResponse, ApiError> {
    let ids: Vec<String> = form
        .plant_ids
        .iter()
        .filter_map(|raw| raw.parse::<Uuid>().ok().map(|id| id.to_string()))
        .collect();

    let db = state.clone();
    let uid = user.id.to_string();
    let deleted = tokio::task::spawn_blocking(move || {
        let mut deleted = 0usize;
        for id in &ids {
            match db.db.delete_plant(id, &uid) {
                Ok(true) => deleted += 1,
                Ok(false) => {}
                Err(e) => warn!("bulk delete failed for plant {}: {:#}", id, e),
            }
        }
        deleted
    })
    .await
    .map_err(|e| { error!("spawn_blocking join error: {}", e); ApiError::Database(anyhow::anyhow!(e)) })?;

    Ok(Redirect::to(&with_notice("/", &format!("Deleted {} plants", deleted))))
}

pub async fn plant_detail(
    State(state): State<AppState>,
    Path(plant_id): Path<Uuid>,
    Extension(user): Extension<CurrentUser>,
) -> Result<impl IntoResponse, ApiError> {
    let db = state.clone();
    let pid = plant_id.to_string();
    let uid = user.id.to_string();
    let (plant, events) = tokio::task::spawn_blocking(move || {
        let plant = db.db.get_plant_for_user(&pid, &uid)?;
        let events = match &plant {
            Some(p) => db.db.get_care_events_for_plant(&p.id)?,
            None => vec![],
        };
        Ok::<_, anyhow::Error>((plant, events))
    })
    .await
    .map_err(|e| { error!("spawn_blocking join error: {}", e); anyhow::anyhow!(e) })??;

    let row = plant.ok_or(ApiError::NotFoundOrForbidden)?;

    let events = events
        .into_iter()
        .map(|row| CareEvent {
            id: parse_id(&row.id),
            kind: row.kind,
            event_at: parse_db_time(&row.event_at, "care event"),
            note: row.note,
        })
        .collect();

    let now = chrono::Utc::now();
    Ok(Json(PlantDetailPage { plant: plant_view(row, now), events }))
}

/// Form dates arrive as `YYYY-MM-DD`; they denote midnight UTC.
fn parse_watered_date(raw: &str, back: String) -> Result<DateTime<Utc>, ApiError> {
    let date = NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d").map_err(|_| ApiError::Validation {
        message: "Enter the last-watered date as YYYY-MM-DD".into(),
        back,
    })?;
    Ok(date.and_time(NaiveTime::MIN).and_utc())
}

fn plant_view(row: PlantRow, now: DateTime<Utc>) -> PlantView {
    let last_watered = parse_db_time(&row.last_watered, "plant last_watered");
    PlantView {
        id: parse_id(&row.id),
        name: row.name,
        species: row.species,
        last_watered,
        image_url: row.image_url,
        created_at: parse_db_time(&row.created_at, "plant created_at"),
        days_since_watered: (now - last_watered).num_days(),
    }
}

fn plant_model(row: PlantRow) -> Plant {
    Plant {
        id: parse_id(&row.id),
        name: row.name,
        species: row.species,
        last_watered: parse_db_time(&row.last_watered, "plant last_watered"),
        image_url: row.image_url,
        created_at: parse_db_time(&row.created_at, "plant created_at"),
    }
}
