//! libSQL implementation of every workflow repository.
//!
//! A single connection is shared behind an async mutex so multi-statement
//! operations (deselection) run as one transaction without interleaving.

use std::path::Path;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use libsql::{params, Connection, Row, Value};
use tokio::sync::Mutex;
use tracing::info;

use super::migrations;
use super::RepositoryError;
use crate::workflows::feedback::{FeedbackRecord, FeedbackRepository};
use crate::workflows::registration::{
    Applicant, ApplicantId, ApplicantRepository, Card, CardId, CardRepository,
    DeselectedApplicant,
};

const APPLICANT_COLUMNS: &str = "id, name, uid, department, occupation, email, \
     schedule_meeting, selected, meeting_date, meeting_time";

const DESELECTED_COLUMNS: &str = "user_id, name, uid, department, occupation, email, \
     schedule_meeting, selected, meeting_date, meeting_time, reason, deselected_at";

pub struct LibSqlStore {
    _db: libsql::Database,
    conn: Mutex<Connection>,
}

impl LibSqlStore {
    /// Open (or create) a database file and bring its schema up to date.
    pub async fn open(path: &Path) -> Result<Self, RepositoryError> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|err| {
                RepositoryError::Unavailable(format!("cannot create database directory: {err}"))
            })?;
        }

        let store = Self::build(path).await?;
        info!(path = %path.display(), "record store opened");
        Ok(store)
    }

    /// Volatile store, used when no database path is configured and in tests.
    pub async fn in_memory() -> Result<Self, RepositoryError> {
        Self::build(Path::new(":memory:")).await
    }

    async fn build(path: &Path) -> Result<Self, RepositoryError> {
        let db = libsql::Builder::new_local(path).build().await?;
        let conn = db.connect()?;
        migrations::run_migrations(&conn).await?;

        Ok(Self {
            _db: db,
            conn: Mutex::new(conn),
        })
    }
}

fn optional_text(value: &Option<String>) -> Value {
    match value {
        Some(text) => Value::Text(text.clone()),
        None => Value::Null,
    }
}

fn flag(value: bool) -> i64 {
    i64::from(value)
}

fn row_to_applicant(row: &Row) -> Result<Applicant, RepositoryError> {
    Ok(Applicant {
        id: ApplicantId(row.get::<String>(0)?),
        name: row.get::<String>(1)?,
        uid: row.get::<String>(2)?,
        department: row.get::<String>(3)?,
        occupation: row.get::<String>(4)?,
        email: row.get::<String>(5)?,
        schedule_meeting: row.get::<i64>(6)? != 0,
        selected: row.get::<i64>(7)? != 0,
        meeting_date: optional_column(row, 8)?,
        meeting_time: optional_column(row, 9)?,
    })
}

fn row_to_deselected(row: &Row) -> Result<DeselectedApplicant, RepositoryError> {
    let stamp = row.get::<String>(11)?;
    let deselected_at = DateTime::parse_from_rfc3339(&stamp)
        .map_err(|err| RepositoryError::Corrupt(format!("deselected_at '{stamp}': {err}")))?
        .with_timezone(&Utc);

    Ok(DeselectedApplicant {
        user_id: ApplicantId(row.get::<String>(0)?),
        name: row.get::<String>(1)?,
        uid: row.get::<String>(2)?,
        department: row.get::<String>(3)?,
        occupation: row.get::<String>(4)?,
        email: row.get::<String>(5)?,
        schedule_meeting: row.get::<i64>(6)? != 0,
        selected: row.get::<i64>(7)? != 0,
        meeting_date: optional_column(row, 8)?,
        meeting_time: optional_column(row, 9)?,
        reason: row.get::<String>(10)?,
        deselected_at,
    })
}

fn optional_column(row: &Row, index: i32) -> Result<Option<String>, RepositoryError> {
    match row.get_value(index)? {
        Value::Null => Ok(None),
        Value::Text(text) => Ok(Some(text)),
        other => Err(RepositoryError::Corrupt(format!(
            "column {index}: expected text, found {other:?}"
        ))),
    }
}

fn likes_from(row: &Row) -> Result<u64, RepositoryError> {
    let likes = row.get::<i64>(0)?;
    u64::try_from(likes)
        .map_err(|_| RepositoryError::Corrupt(format!("negative like count {likes}")))
}

#[async_trait]
impl FeedbackRepository for LibSqlStore {
    async fn insert(&self, record: FeedbackRecord) -> Result<FeedbackRecord, RepositoryError> {
        let ratings = serde_json::to_string(&record.ratings)
            .map_err(|err| RepositoryError::Corrupt(format!("ratings: {err}")))?;

        let conn = self.conn.lock().await;
        conn.execute(
            "INSERT INTO feedback (id, ratings, coordinator_name, coordinator_rating, team_name, email)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![
                record.id.0.clone(),
                ratings,
                record.coordinator_name.clone(),
                record.coordinator_rating.clone(),
                record.team_name.clone(),
                record.email.clone()
            ],
        )
        .await?;

        Ok(record)
    }
}

#[async_trait]
impl ApplicantRepository for LibSqlStore {
    async fn insert(&self, applicant: Applicant) -> Result<Applicant, RepositoryError> {
        let conn = self.conn.lock().await;

        let mut existing = conn
            .query(
                "SELECT 1 FROM users WHERE uid = ?1",
                params![applicant.uid.clone()],
            )
            .await?;
        let taken = existing.next().await?.is_some();
        drop(existing);
        if taken {
            return Err(RepositoryError::Conflict);
        }

        conn.execute(
            &format!(
                "INSERT INTO users ({APPLICANT_COLUMNS}) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)"
            ),
            vec![
                Value::Text(applicant.id.0.clone()),
                Value::Text(applicant.name.clone()),
                Value::Text(applicant.uid.clone()),
                Value::Text(applicant.department.clone()),
                Value::Text(applicant.occupation.clone()),
                Value::Text(applicant.email.clone()),
                Value::Integer(flag(applicant.schedule_meeting)),
                Value::Integer(flag(applicant.selected)),
                optional_text(&applicant.meeting_date),
                optional_text(&applicant.meeting_time),
            ],
        )
        .await?;

        Ok(applicant)
    }

    async fn fetch(&self, id: &ApplicantId) -> Result<Option<Applicant>, RepositoryError> {
        let conn = self.conn.lock().await;
        let mut rows = conn
            .query(
                &format!("SELECT {APPLICANT_COLUMNS} FROM users WHERE id = ?1"),
                params![id.0.clone()],
            )
            .await?;

        match rows.next().await? {
            Some(row) => Ok(Some(row_to_applicant(&row)?)),
            None => Ok(None),
        }
    }

    async fn list(&self) -> Result<Vec<Applicant>, RepositoryError> {
        let conn = self.conn.lock().await;
        let mut rows = conn
            .query(
                &format!("SELECT {APPLICANT_COLUMNS} FROM users ORDER BY registered_at, rowid"),
                (),
            )
            .await?;

        let mut applicants = Vec::new();
        while let Some(row) = rows.next().await? {
            applicants.push(row_to_applicant(&row)?);
        }
        Ok(applicants)
    }

    async fn update(&self, applicant: Applicant) -> Result<(), RepositoryError> {
        let conn = self.conn.lock().await;
        let changed = conn
            .execute(
                "UPDATE users SET name = ?2, uid = ?3, department = ?4, occupation = ?5, email = ?6,
                 schedule_meeting = ?7, selected = ?8, meeting_date = ?9, meeting_time = ?10
                 WHERE id = ?1",
                vec![
                    Value::Text(applicant.id.0.clone()),
                    Value::Text(applicant.name.clone()),
                    Value::Text(applicant.uid.clone()),
                    Value::Text(applicant.department.clone()),
                    Value::Text(applicant.occupation.clone()),
                    Value::Text(applicant.email.clone()),
                    Value::Integer(flag(applicant.schedule_meeting)),
                    Value::Integer(flag(applicant.selected)),
                    optional_text(&applicant.meeting_date),
                    optional_text(&applicant.meeting_time),
                ],
            )
            .await?;

        if changed == 0 {
            Err(RepositoryError::NotFound)
        } else {
            Ok(())
        }
    }

    async fn archive(
        &self,
        id: &ApplicantId,
        reason: &str,
        at: DateTime<Utc>,
    ) -> Result<Option<DeselectedApplicant>, RepositoryError> {
        let conn = self.conn.lock().await;
        let tx = conn.transaction().await?;

        let mut rows = tx
            .query(
                &format!("SELECT {APPLICANT_COLUMNS} FROM users WHERE id = ?1"),
                params![id.0.clone()],
            )
            .await?;
        let applicant = match rows.next().await? {
            Some(row) => row_to_applicant(&row)?,
            None => {
                drop(rows);
                tx.rollback().await?;
                return Ok(None);
            }
        };
        drop(rows);

        let archived = DeselectedApplicant::archive(applicant, reason.to_string(), at);
        tx.execute(
            &format!(
                "INSERT INTO deselected_users ({DESELECTED_COLUMNS})
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12)"
            ),
            vec![
                Value::Text(archived.user_id.0.clone()),
                Value::Text(archived.name.clone()),
                Value::Text(archived.uid.clone()),
                Value::Text(archived.department.clone()),
                Value::Text(archived.occupation.clone()),
                Value::Text(archived.email.clone()),
                Value::Integer(flag(archived.schedule_meeting)),
                Value::Integer(flag(archived.selected)),
                optional_text(&archived.meeting_date),
                optional_text(&archived.meeting_time),
                Value::Text(archived.reason.clone()),
                Value::Text(archived.deselected_at.to_rfc3339()),
            ],
        )
        .await?;
        tx.execute("DELETE FROM users WHERE id = ?1", params![id.0.clone()])
            .await?;
        tx.commit().await?;

        Ok(Some(archived))
    }

    async fn deselected(&self) -> Result<Vec<DeselectedApplicant>, RepositoryError> {
        let conn = self.conn.lock().await;
        let mut rows = conn
            .query(
                &format!(
                    "SELECT {DESELECTED_COLUMNS} FROM deselected_users ORDER BY deselected_at, rowid"
                ),
                (),
            )
            .await?;

        let mut archived = Vec::new();
        while let Some(row) = rows.next().await? {
            archived.push(row_to_deselected(&row)?);
        }
        Ok(archived)
    }
}

#[async_trait]
impl CardRepository for LibSqlStore {
    async fn likes(&self, id: &CardId) -> Result<Option<u64>, RepositoryError> {
        let conn = self.conn.lock().await;
        let mut rows = conn
            .query("SELECT likes FROM cards WHERE id = ?1", params![id.0.clone()])
            .await?;

        match rows.next().await? {
            Some(row) => Ok(Some(likes_from(&row)?)),
            None => Ok(None),
        }
    }

    async fn increment_likes(&self, id: &CardId) -> Result<Option<u64>, RepositoryError> {
        let conn = self.conn.lock().await;
        let mut rows = conn
            .query(
                "UPDATE cards SET likes = likes + 1 WHERE id = ?1 RETURNING likes",
                params![id.0.clone()],
            )
            .await?;

        match rows.next().await? {
            Some(row) => Ok(Some(likes_from(&row)?)),
            None => Ok(None),
        }
    }

    async fn upsert(&self, card: Card) -> Result<(), RepositoryError> {
        let likes = i64::try_from(card.likes)
            .map_err(|_| RepositoryError::Corrupt(format!("like count {} too large", card.likes)))?;

        let conn = self.conn.lock().await;
        conn.execute(
            "INSERT INTO cards (id, title, content, image, alt, likes)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)
             ON CONFLICT(id) DO UPDATE SET
                title = excluded.title,
                content = excluded.content,
                image = excluded.image,
                alt = excluded.alt,
                likes = excluded.likes",
            params![
                card.id.0.clone(),
                card.title.clone(),
                card.content.clone(),
                card.image.clone(),
                card.alt.clone(),
                likes
            ],
        )
        .await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::workflows::feedback::FeedbackId;
    use crate::workflows::registration::Registration;
    use std::sync::Arc;

    fn applicant(id: &str, uid: &str) -> Applicant {
        Applicant::register(
            ApplicantId(id.to_string()),
            Registration {
                name: "Grace".to_string(),
                uid: uid.to_string(),
                department: "Mathematics".to_string(),
                occupation: "Student".to_string(),
                email: format!("{uid}@example.org"),
                schedule_meeting: false,
                selected: false,
            },
        )
    }

    fn card(id: &str, likes: u64) -> Card {
        Card {
            id: CardId(id.to_string()),
            title: "Chess".to_string(),
            content: "Weekly tournaments".to_string(),
            image: "/img/chess.png".to_string(),
            alt: "chess board".to_string(),
            likes,
        }
    }

    #[tokio::test]
    async fn applicant_round_trip_and_unique_uid() {
        let store = LibSqlStore::in_memory().await.expect("store opens");

        ApplicantRepository::insert(&store, applicant("a-1", "u1"))
            .await
            .expect("first insert");
        let duplicate = ApplicantRepository::insert(&store, applicant("a-2", "u1")).await;
        assert!(matches!(duplicate, Err(RepositoryError::Conflict)));

        let listed = store.list().await.expect("list");
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].id, ApplicantId("a-1".to_string()));
    }

    #[tokio::test]
    async fn update_persists_schedule_and_detects_missing_rows() {
        let store = LibSqlStore::in_memory().await.expect("store opens");
        let mut stored = ApplicantRepository::insert(&store, applicant("a-1", "u1"))
            .await
            .expect("insert");

        stored.schedule("2026-11-02".to_string(), "14:00".to_string());
        store.update(stored.clone()).await.expect("update");
        let fetched = store
            .fetch(&stored.id)
            .await
            .expect("fetch")
            .expect("present");
        assert_eq!(fetched, stored);

        let ghost = applicant("ghost", "u404");
        assert!(matches!(
            store.update(ghost).await,
            Err(RepositoryError::NotFound)
        ));
    }

    #[tokio::test]
    async fn meeting_columns_distinguish_null_from_bad_values() {
        let store = LibSqlStore::in_memory().await.expect("store opens");
        let stored = ApplicantRepository::insert(&store, applicant("a-1", "u1"))
            .await
            .expect("insert");

        let fetched = store
            .fetch(&stored.id)
            .await
            .expect("fetch")
            .expect("present");
        assert_eq!(fetched.meeting_date, None);
        assert_eq!(fetched.meeting_time, None);

        store
            .conn
            .lock()
            .await
            .execute(
                "UPDATE users SET meeting_date = X'01' WHERE id = ?1",
                params!["a-1"],
            )
            .await
            .expect("raw update");
        assert!(matches!(
            store.fetch(&stored.id).await,
            Err(RepositoryError::Corrupt(_))
        ));
    }

    #[tokio::test]
    async fn archive_moves_applicant_atomically() {
        let store = LibSqlStore::in_memory().await.expect("store opens");
        let stored = ApplicantRepository::insert(&store, applicant("a-1", "u1"))
            .await
            .expect("insert");

        let archived = store
            .archive(&stored.id, "withdrew", Utc::now())
            .await
            .expect("archive")
            .expect("applicant existed");

        assert_eq!(archived.snapshot(), stored);
        assert!(store.fetch(&stored.id).await.expect("fetch").is_none());
        let listed = store.deselected().await.expect("deselected");
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].reason, "withdrew");
        assert_eq!(listed[0].snapshot(), stored);

        let again = store
            .archive(&stored.id, "withdrew", Utc::now())
            .await
            .expect("archive runs");
        assert!(again.is_none());
        assert_eq!(store.deselected().await.expect("deselected").len(), 1);
    }

    #[tokio::test]
    async fn deselected_uid_can_register_again() {
        let store = LibSqlStore::in_memory().await.expect("store opens");
        ApplicantRepository::insert(&store, applicant("a-1", "u1"))
            .await
            .expect("insert");
        store
            .archive(&ApplicantId("a-1".to_string()), "gap year", Utc::now())
            .await
            .expect("archive");

        ApplicantRepository::insert(&store, applicant("a-2", "u1"))
            .await
            .expect("uid free again");
    }

    #[tokio::test]
    async fn increment_likes_is_atomic_per_call() {
        let store = Arc::new(LibSqlStore::in_memory().await.expect("store opens"));
        store.upsert(card("c1", 5)).await.expect("seed");

        let mut handles = Vec::new();
        for _ in 0..10 {
            let store = store.clone();
            handles.push(tokio::spawn(async move {
                store
                    .increment_likes(&CardId("c1".to_string()))
                    .await
                    .expect("increment")
            }));
        }
        for handle in handles {
            handle.await.expect("task joins");
        }

        let likes = store
            .likes(&CardId("c1".to_string()))
            .await
            .expect("likes");
        assert_eq!(likes, Some(15));
    }

    #[tokio::test]
    async fn unknown_card_is_never_created() {
        let store = LibSqlStore::in_memory().await.expect("store opens");
        let id = CardId("nope".to_string());

        assert_eq!(store.increment_likes(&id).await.expect("runs"), None);
        assert_eq!(store.likes(&id).await.expect("runs"), None);
    }

    #[tokio::test]
    async fn upsert_replaces_existing_card() {
        let store = LibSqlStore::in_memory().await.expect("store opens");
        store.upsert(card("c1", 2)).await.expect("seed");
        store.upsert(card("c1", 9)).await.expect("reseed");

        assert_eq!(
            store.likes(&CardId("c1".to_string())).await.expect("likes"),
            Some(9)
        );
    }

    #[tokio::test]
    async fn feedback_insert_keeps_ratings() {
        let store = LibSqlStore::in_memory().await.expect("store opens");
        let record = FeedbackRecord {
            id: FeedbackId("f-1".to_string()),
            ratings: vec!["5".to_string(), "2".to_string()],
            coordinator_name: "Noor".to_string(),
            coordinator_rating: "4".to_string(),
            team_name: "Media".to_string(),
            email: "noor@example.org".to_string(),
        };

        let stored = FeedbackRepository::insert(&store, record.clone())
            .await
            .expect("insert");
        assert_eq!(stored, record);

        let conn = store.conn.lock().await;
        let mut rows = conn
            .query("SELECT ratings FROM feedback WHERE id = 'f-1'", ())
            .await
            .expect("query");
        let row = rows.next().await.expect("row").expect("present");
        assert_eq!(row.get::<String>(0).expect("text"), r#"["5","2"]"#);
    }
}
