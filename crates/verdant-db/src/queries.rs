use crate::Database;
use crate::models::{CareEventRow, ForumPostRow, NewPlant, PlantRow, SessionRow, UserRow};
use anyhow::Result;
use chrono::{DateTime, SecondsFormat, Utc};
use rusqlite::Connection;

/// The only care-event kind recorded today.
pub const WATER_KIND: &str = "water";

impl Database {
    // -- Users --

    pub fn create_user(&self, id: &str, username: &str, email: &str, password_hash: &str) -> Result<()> {
        self.with_conn_mut(|conn| {
            conn.execute(
                "INSERT INTO users (id, username, email, password) VALUES (?1, ?2, ?3, ?4)",
                (id, username, email, password_hash),
            )?;
            Ok(())
        })
    }

    pub fn get_user_by_email(&self, email: &str) -> Result<Option<UserRow>> {
        self.with_conn(|conn| query_user_by_email(conn, email))
    }

    pub fn get_user_by_id(&self, id: &str) -> Result<Option<UserRow>> {
        self.with_conn(|conn| query_user_by_id(conn, id))
    }

    // -- Sessions --

    pub fn create_session(&self, token: &str, user_id: &str, expires_at: DateTime<Utc>) -> Result<()> {
        self.with_conn_mut(|conn| {
            conn.execute(
                "INSERT INTO sessions (token, user_id, expires_at) VALUES (?1, ?2, ?3)",
                (token, user_id, to_db_time(expires_at)),
            )?;
            Ok(())
        })
    }

    pub fn get_session(&self, token: &str) -> Result<Option<SessionRow>> {
        self.with_conn(|conn| {
            let row = conn
                .query_row(
                    "SELECT token, user_id, created_at, expires_at FROM sessions WHERE token = ?1",
                    [token],
                    |row| {
                        Ok(SessionRow {
                            token: row.get(0)?,
                            user_id: row.get(1)?,
                            created_at: row.get(2)?,
                            expires_at: row.get(3)?,
                        })
                    },
                )
                .optional()?;
            Ok(row)
        })
    }

    pub fn delete_session(&self, token: &str) -> Result<()> {
        self.with_conn_mut(|conn| {
            conn.execute("DELETE FROM sessions WHERE token = ?1", [token])?;
            Ok(())
        })
    }

    // -- Plants --

    /// Insert a plant together with its initial watering event, atomically.
    /// The event is dated at the submitted last-watered time, not at insert time.
    pub fn create_plant(&self, plant: &NewPlant, event_id: &str) -> Result<()> {
        self.with_conn_mut(|conn| {
            let tx = conn.unchecked_transaction()?;
            tx.execute(
                "INSERT INTO plants (id, user_id, name, species, last_watered, image_url, created_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
                (
                    plant.id,
                    plant.user_id,
                    plant.name,
                    plant.species,
                    to_db_time(plant.last_watered),
                    plant.image_url,
                    to_db_time(plant.created_at),
                ),
            )?;
            tx.execute(
                "INSERT INTO care_events (id, plant_id, user_id, kind, event_at, note)
                 VALUES (?1, ?2, ?3, ?4, ?5, NULL)",
                (event_id, plant.id, plant.user_id, WATER_KIND, to_db_time(plant.last_watered)),
            )?;
            tx.commit()?;
            Ok(())
        })
    }

    pub fn get_plants_for_user(&self, user_id: &str) -> Result<Vec<PlantRow>> {
        self.with_conn(|conn| query_plants_for_user(conn, user_id))
    }

    pub fn get_plant_for_user(&self, plant_id: &str, user_id: &str) -> Result<Option<PlantRow>> {
        self.with_conn(|conn| {
            let row = conn
                .query_row(
                    "SELECT id, user_id, name, species, last_watered, image_url, created_at
                     FROM plants WHERE id = ?1 AND user_id = ?2",
                    (plant_id, user_id),
                    map_plant_row,
                )
                .optional()?;
            Ok(row)
        })
    }

    /// Overwrite the editable fields. Ownership is enforced in the WHERE
    /// clause; returns false when the plant is missing or foreign.
    pub fn update_plant(
        &self,
        plant_id: &str,
        user_id: &str,
        name: &str,
        species: &str,
        last_watered: DateTime<Utc>,
        image_url: &str,
    ) -> Result<bool> {
        self.with_conn_mut(|conn| {
            let changed = conn.execute(
                "UPDATE plants SET name = ?1, species = ?2, last_watered = ?3, image_url = ?4
                 WHERE id = ?5 AND user_id = ?6",
                (name, species, to_db_time(last_watered), image_url, plant_id, user_id),
            )?;
            Ok(changed > 0)
        })
    }

    /// Bump `last_watered` and append the matching care event atomically.
    /// Returns false without writing anything when the plant is not owned
    /// by `user_id`.
    pub fn water_plant(
        &self,
        plant_id: &str,
        user_id: &str,
        event_id: &str,
        watered_at: DateTime<Utc>,
        note: Option<&str>,
    ) -> Result<bool> {
        self.with_conn_mut(|conn| {
            let tx = conn.unchecked_transaction()?;
            let changed = tx.execute(
                "UPDATE plants SET last_watered = ?1 WHERE id = ?2 AND user_id = ?3",
                (to_db_time(watered_at), plant_id, user_id),
            )?;
            if changed == 0 {
                return Ok(false);
            }
            tx.execute(
                "INSERT INTO care_events (id, plant_id, user_id, kind, event_at, note)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
                (event_id, plant_id, user_id, WATER_KIND, to_db_time(watered_at), note),
            )?;
            tx.commit()?;
            Ok(true)
        })
    }

    /// Delete a plant and all of its care events in one transaction, so a
    /// crash can never strand orphaned events. Returns false when the plant
    /// is missing or owned by someone else.
    pub fn delete_plant(&self, plant_id: &str, user_id: &str) -> Result<bool> {
        self.with_conn_mut(|conn| {
            let tx = conn.unchecked_transaction()?;
            let owned: Option<String> = tx
                .query_row(
                    "SELECT id FROM plants WHERE id = ?1 AND user_id = ?2",
                    (plant_id, user_id),
                    |row| row.get(0),
                )
                .optional()?;
            if owned.is_none() {
                return Ok(false);
            }
            tx.execute("DELETE FROM care_events WHERE plant_id = ?1", [plant_id])?;
            tx.execute("DELETE FROM plants WHERE id = ?1", [plant_id])?;
            tx.commit()?;
            Ok(true)
        })
    }

    // -- Care events --

    pub fn get_care_events_for_plant(&self, plant_id: &str) -> Result<Vec<CareEventRow>> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare(
                "SELECT id, plant_id, user_id, kind, event_at, note
                 FROM care_events WHERE plant_id = ?1
                 ORDER BY event_at DESC",
            )?;

            let rows = stmt
                .query_map([plant_id], |row| {
                    Ok(CareEventRow {
                        id: row.get(0)?,
                        plant_id: row.get(1)?,
                        user_id: row.get(2)?,
                        kind: row.get(3)?,
                        event_at: row.get(4)?,
                        note: row.get(5)?,
                    })
                })?
                .collect::<std::result::Result<Vec<_>, _>>()?;

            Ok(rows)
        })
    }

    // -- Forum posts --

    pub fn create_forum_post(
        &self,
        id: &str,
        author_id: &str,
        author_username: &str,
        title: &str,
        content: &str,
        created_at: DateTime<Utc>,
    ) -> Result<()> {
        self.with_conn_mut(|conn| {
            conn.execute(
                "INSERT INTO forum_posts (id, author_id, author_username, title, content, created_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
                (id, author_id, author_username, title, content, to_db_time(created_at)),
            )?;
            Ok(())
        })
    }

    pub fn get_forum_posts(&self) -> Result<Vec<ForumPostRow>> {
        self.with_conn(query_forum_posts)
    }
}

fn to_db_time(t: DateTime<Utc>) -> String {
    t.to_rfc3339_opts(SecondsFormat::Micros, true)
}

fn query_user_by_email(conn: &Connection, email: &str) -> Result<Option<UserRow>> {
    let mut stmt =
        conn.prepare("SELECT id, username, email, password, created_at FROM users WHERE email = ?1")?;

    let row = stmt
        .query_row([email], |row| {
            Ok(UserRow {
                id: row.get(0)?,
                username: row.get(1)?,
                email: row.get(2)?,
                password: row.get(3)?,
                created_at: row.get(4)?,
            })
        })
        .optional()?;

    Ok(row)
}

fn query_user_by_id(conn: &Connection, id: &str) -> Result<Option<UserRow>> {
    let mut stmt =
        conn.prepare("SELECT id, username, email, password, created_at FROM users WHERE id = ?1")?;

    let row = stmt
        .query_row([id], |row| {
            Ok(UserRow {
                id: row.get(0)?,
                username: row.get(1)?,
                email: row.get(2)?,
                password: row.get(3)?,
                created_at: row.get(4)?,
            })
        })
        .optional()?;

    Ok(row)
}

fn query_plants_for_user(conn: &Connection, user_id: &str) -> Result<Vec<PlantRow>> {
    // Newest-created-first; created_at is written as fixed-width RFC 3339 so
    // the lexicographic ORDER BY matches chronological order.
    let mut stmt = conn.prepare(
        "SELECT id, user_id, name, species, last_watered, image_url, created_at
         FROM plants WHERE user_id = ?1
         ORDER BY created_at DESC",
    )?;

    let rows = stmt
        .query_map([user_id], map_plant_row)?
        .collect::<std::result::Result<Vec<_>, _>>()?;

    Ok(rows)
}

fn map_plant_row(row: &rusqlite::Row) -> std::result::Result<PlantRow, rusqlite::Error> {
    Ok(PlantRow {
        id: row.get(0)?,
        user_id: row.get(1)?,
        name: row.get(2)?,
        species: row.get(3)?,
        last_watered: row.get(4)?,
        image_url: row.get(5)?,
        created_at: row.get(6)?,
    })
}

fn query_forum_posts(conn: &Connection) -> Result<Vec<ForumPostRow>> {
    let mut stmt = conn.prepare(
        "SELECT id, author_id, author_username, title, content, created_at
         FROM forum_posts
         ORDER BY created_at DESC",
    )?;

    let rows = stmt
        .query_map([], |row| {
            Ok(ForumPostRow {
                id: row.get(0)?,
                author_id: row.get(1)?,
                author_username: row.get(2)?,
                title: row.get(3)?,
                content: row.get(4)?,
                created_at: row.get(5)?,
            })
        })?
        .collect::<std::result::Result<Vec<_>, _>>()?;

    Ok(rows)
}

/// Extension trait for optional query results
trait OptionalExt<T> {
    fn optional(self) -> Result<Option<T>>;
}

impl<T> OptionalExt<T> for std::result::Result<T, rusqlite::Error> {
    fn optional(self) -> Result<Option<T>> {
        match self {
            Ok(val) => Ok(Some(val)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }
}
