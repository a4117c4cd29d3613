//! libSQL backend: async `Database` trait implementation.
//!
//! Supports local file and in-memory databases. `libsql::Connection` is
//! `Send + Sync` and safe for concurrent async use.

use std::path::Path;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use libsql::{Connection, Database as LibSqlDatabase, Value, params};
use tracing::info;
use uuid::Uuid;

use crate::auth::{Role, Session};
use crate::error::DatabaseError;
use crate::onboarding::model::{
    CONFIG_ID, ComponentId, OnboardingConfig, Profile, ProfileFieldUpdate, Progress, Step,
};
use crate::store::migrations;
use crate::store::traits::{Database, ProfileCounts};

/// Column list shared by every profile query, in `row_to_profile` order.
const PROFILE_COLUMNS: &str =
    "id, email, role, onboarding_completed, about_me, address, birthdate, created_at";

/// libSQL database backend.
pub struct LibSqlBackend {
    #[allow(dead_code)]
    db: Arc<LibSqlDatabase>,
    conn: Connection,
}

impl LibSqlBackend {
    /// Open (or create) a local database file and run migrations.
    pub async fn new_local(path: &Path) -> Result<Self, DatabaseError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| {
                DatabaseError::Pool(format!("Failed to create database directory: {e}"))
            })?;
        }

        let db = libsql::Builder::new_local(path)
            .build()
            .await
            .map_err(|e| DatabaseError::Pool(format!("Failed to open libSQL database: {e}")))?;

        let conn = db
            .connect()
            .map_err(|e| DatabaseError::Pool(format!("Failed to create connection: {e}")))?;

        let backend = Self {
            db: Arc::new(db),
            conn,
        };
        backend.run_migrations().await?;
        info!(path = %path.display(), "Database opened");
        Ok(backend)
    }

    /// Create an in-memory database (for tests).
    pub async fn new_memory() -> Result<Self, DatabaseError> {
        let db = libsql::Builder::new_local(":memory:")
            .build()
            .await
            .map_err(|e| {
                DatabaseError::Pool(format!("Failed to create in-memory database: {e}"))
            })?;

        let conn = db
            .connect()
            .map_err(|e| DatabaseError::Pool(format!("Failed to create connection: {e}")))?;

        let backend = Self {
            db: Arc::new(db),
            conn,
        };
        backend.run_migrations().await?;
        Ok(backend)
    }

    fn conn(&self) -> &Connection {
        &self.conn
    }
}

// ── Helper functions ────────────────────────────────────────────────

/// Parse an RFC 3339 or SQLite datetime string into DateTime<Utc>.
fn parse_datetime(s: &str) -> DateTime<Utc> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return dt.with_timezone(&Utc);
    }
    if let Ok(ndt) = chrono::NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S%.f") {
        return ndt.and_utc();
    }
    if let Ok(ndt) = chrono::NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S") {
        return ndt.and_utc();
    }
    DateTime::<Utc>::MIN_UTC
}

/// Map a libsql Row to a Profile.
///
/// Column order matches PROFILE_COLUMNS:
/// 0:id, 1:email, 2:role, 3:onboarding_completed, 4:about_me,
/// 5:address, 6:birthdate, 7:created_at
fn row_to_profile(row: &libsql::Row) -> Result<Profile, libsql::Error> {
    let id_str: String = row.get(0)?;
    let email: String = row.get(1)?;
    let role_str: String = row.get(2)?;
    let completed: i64 = row.get(3)?;
    let about_me: Option<String> = row.get::<String>(4).ok();
    let address_json: Option<String> = row.get::<String>(5).ok();
    let birthdate_str: Option<String> = row.get::<String>(6).ok();
    let created_str: String = row.get(7)?;

    Ok(Profile {
        id: Uuid::parse_str(&id_str).unwrap_or_else(|_| Uuid::nil()),
        email,
        role: role_str.parse().unwrap_or_default(),
        onboarding_completed: completed != 0,
        about_me,
        address: address_json.and_then(|s| serde_json::from_str(&s).ok()),
        birthdate: birthdate_str.and_then(|s| NaiveDate::parse_from_str(&s, "%Y-%m-%d").ok()),
        created_at: parse_datetime(&created_str),
    })
}

fn row_to_progress(row: &libsql::Row) -> Result<Progress, libsql::Error> {
    let user_id_str: String = row.get(0)?;
    let step1: i64 = row.get(1)?;
    let step2: i64 = row.get(2)?;
    let step3: i64 = row.get(3)?;

    Ok(Progress {
        user_id: Uuid::parse_str(&user_id_str).unwrap_or_else(|_| Uuid::nil()),
        step1_completed: step1 != 0,
        step2_completed: step2 != 0,
        step3_completed: step3 != 0,
    })
}

fn row_to_session(row: &libsql::Row) -> Result<Session, libsql::Error> {
    let token: String = row.get(0)?;
    let user_id_str: String = row.get(1)?;
    let email: String = row.get(2)?;
    let created_str: String = row.get(3)?;

    Ok(Session {
        token,
        user_id: Uuid::parse_str(&user_id_str).unwrap_or_else(|_| Uuid::nil()),
        email,
        created_at: parse_datetime(&created_str),
    })
}

/// Deserialize a component-list JSON column.
fn parse_components(json: &str, column: &str) -> Result<Vec<ComponentId>, DatabaseError> {
    serde_json::from_str(json)
        .map_err(|e| DatabaseError::Serialization(format!("Bad {column} value: {e}")))
}

#[async_trait]
impl Database for LibSqlBackend {
    async fn run_migrations(&self) -> Result<(), DatabaseError> {
        migrations::run_migrations(self.conn()).await
    }

    // ── Sessions ────────────────────────────────────────────────────

    async fn insert_session(
        &self,
        token: &str,
        user_id: Uuid,
        email: &str,
    ) -> Result<(), DatabaseError> {
        self.conn()
            .execute(
                "INSERT INTO sessions (token, user_id, email, created_at) VALUES (?1, ?2, ?3, ?4)",
                params![token, user_id.to_string(), email, Utc::now().to_rfc3339()],
            )
            .await
            .map_err(|e| DatabaseError::Query(format!("Failed to insert session: {e}")))?;
        Ok(())
    }

    async fn get_session(&self, token: &str) -> Result<Option<Session>, DatabaseError> {
        let mut rows = self
            .conn()
            .query(
                "SELECT token, user_id, email, created_at FROM sessions WHERE token = ?1",
                params![token],
            )
            .await
            .map_err(|e| DatabaseError::Query(format!("Failed to query session: {e}")))?;

        let row = rows
            .next()
            .await
            .map_err(|e| DatabaseError::Query(format!("Failed to read session row: {e}")))?;

        match row {
            Some(row) => {
                let session = row_to_session(&row)
                    .map_err(|e| DatabaseError::Query(format!("Bad session row: {e}")))?;
                Ok(Some(session))
            }
            None => Ok(None),
        }
    }

    async fn delete_session(&self, token: &str) -> Result<(), DatabaseError> {
        self.conn()
            .execute("DELETE FROM sessions WHERE token = ?1", params![token])
            .await
            .map_err(|e| DatabaseError::Query(format!("Failed to delete session: {e}")))?;
        Ok(())
    }

    // ── Profiles ────────────────────────────────────────────────────

    async fn upsert_profile_identity(&self, id: Uuid, email: &str) -> Result<(), DatabaseError> {
        self.conn()
            .execute(
                "INSERT INTO profiles (id, email, created_at) VALUES (?1, ?2, ?3)
                 ON CONFLICT(id) DO UPDATE SET email = excluded.email",
                params![id.to_string(), email, Utc::now().to_rfc3339()],
            )
            .await
            .map_err(|e| DatabaseError::Query(format!("Failed to upsert profile: {e}")))?;
        Ok(())
    }

    async fn get_profile(&self, id: Uuid) -> Result<Option<Profile>, DatabaseError> {
        let mut rows = self
            .conn()
            .query(
                &format!("SELECT {PROFILE_COLUMNS} FROM profiles WHERE id = ?1"),
                params![id.to_string()],
            )
            .await
            .map_err(|e| DatabaseError::Query(format!("Failed to query profile: {e}")))?;

        let row = rows
            .next()
            .await
            .map_err(|e| DatabaseError::Query(format!("Failed to read profile row: {e}")))?;

        match row {
            Some(row) => {
                let profile = row_to_profile(&row)
                    .map_err(|e| DatabaseError::Query(format!("Bad profile row: {e}")))?;
                Ok(Some(profile))
            }
            None => Ok(None),
        }
    }

    async fn find_profile_by_email(&self, email: &str) -> Result<Option<Profile>, DatabaseError> {
        let mut rows = self
            .conn()
            .query(
                &format!("SELECT {PROFILE_COLUMNS} FROM profiles WHERE email = ?1 LIMIT 1"),
                params![email],
            )
            .await
            .map_err(|e| DatabaseError::Query(format!("Failed to query profile by email: {e}")))?;

        let row = rows
            .next()
            .await
            .map_err(|e| DatabaseError::Query(format!("Failed to read profile row: {e}")))?;

        match row {
            Some(row) => {
                let profile = row_to_profile(&row)
                    .map_err(|e| DatabaseError::Query(format!("Bad profile row: {e}")))?;
                Ok(Some(profile))
            }
            None => Ok(None),
        }
    }

    async fn list_profiles(&self) -> Result<Vec<Profile>, DatabaseError> {
        let mut rows = self
            .conn()
            .query(
                &format!("SELECT {PROFILE_COLUMNS} FROM profiles ORDER BY created_at DESC, id"),
                (),
            )
            .await
            .map_err(|e| DatabaseError::Query(format!("Failed to list profiles: {e}")))?;

        let mut profiles = Vec::new();
        while let Some(row) = rows
            .next()
            .await
            .map_err(|e| DatabaseError::Query(format!("Failed to read profile row: {e}")))?
        {
            profiles.push(
                row_to_profile(&row)
                    .map_err(|e| DatabaseError::Query(format!("Bad profile row: {e}")))?,
            );
        }
        Ok(profiles)
    }

    async fn update_profile_fields(
        &self,
        id: Uuid,
        update: &ProfileFieldUpdate,
    ) -> Result<(), DatabaseError> {
        if update.is_empty() {
            return Ok(());
        }

        let about_me: Value = match &update.about_me {
            Some(text) => text.clone().into(),
            None => Value::Null,
        };
        let address: Value = match &update.address {
            Some(address) => serde_json::to_string(address)
                .map_err(|e| DatabaseError::Serialization(format!("Bad address: {e}")))?
                .into(),
            None => Value::Null,
        };
        let birthdate: Value = match update.birthdate {
            Some(date) => date.format("%Y-%m-%d").to_string().into(),
            None => Value::Null,
        };

        // Single statement; absent fields keep their current value.
        let affected = self
            .conn()
            .execute(
                "UPDATE profiles SET
                     about_me = COALESCE(?2, about_me),
                     address = COALESCE(?3, address),
                     birthdate = COALESCE(?4, birthdate)
                 WHERE id = ?1",
                vec![Value::from(id.to_string()), about_me, address, birthdate],
            )
            .await
            .map_err(|e| DatabaseError::Query(format!("Failed to update profile fields: {e}")))?;

        if affected == 0 {
            return Err(DatabaseError::NotFound {
                entity: "profile".to_string(),
                id: id.to_string(),
            });
        }
        Ok(())
    }

    async fn set_role(&self, id: Uuid, role: Role) -> Result<(), DatabaseError> {
        let affected = self
            .conn()
            .execute(
                "UPDATE profiles SET role = ?2 WHERE id = ?1",
                params![id.to_string(), role.as_str()],
            )
            .await
            .map_err(|e| DatabaseError::Query(format!("Failed to set role: {e}")))?;

        if affected == 0 {
            return Err(DatabaseError::NotFound {
                entity: "profile".to_string(),
                id: id.to_string(),
            });
        }
        Ok(())
    }

    async fn set_onboarding_completed(
        &self,
        id: Uuid,
        completed: bool,
    ) -> Result<(), DatabaseError> {
        let affected = self
            .conn()
            .execute(
                "UPDATE profiles SET onboarding_completed = ?2 WHERE id = ?1",
                params![id.to_string(), i64::from(completed)],
            )
            .await
            .map_err(|e| DatabaseError::Query(format!("Failed to set completion flag: {e}")))?;

        if affected == 0 {
            return Err(DatabaseError::NotFound {
                entity: "profile".to_string(),
                id: id.to_string(),
            });
        }
        Ok(())
    }

    async fn profile_counts(&self) -> Result<ProfileCounts, DatabaseError> {
        let mut rows = self
            .conn()
            .query(
                "SELECT COUNT(*),
                        COALESCE(SUM(onboarding_completed), 0),
                        COALESCE(SUM(role = 'admin'), 0)
                 FROM profiles",
                (),
            )
            .await
            .map_err(|e| DatabaseError::Query(format!("Failed to count profiles: {e}")))?;

        let row = rows
            .next()
            .await
            .map_err(|e| DatabaseError::Query(format!("Failed to read counts: {e}")))?
            .ok_or_else(|| DatabaseError::Query("Count query returned no row".to_string()))?;

        let total: i64 = row
            .get(0)
            .map_err(|e| DatabaseError::Query(format!("Bad count row: {e}")))?;
        let completed: i64 = row
            .get(1)
            .map_err(|e| DatabaseError::Query(format!("Bad count row: {e}")))?;
        let admins: i64 = row
            .get(2)
            .map_err(|e| DatabaseError::Query(format!("Bad count row: {e}")))?;

        Ok(ProfileCounts {
            total: u64::try_from(total).unwrap_or(0),
            onboarding_completed: u64::try_from(completed).unwrap_or(0),
            admins: u64::try_from(admins).unwrap_or(0),
        })
    }

    // ── Onboarding progress ─────────────────────────────────────────

    async fn get_progress(&self, user_id: Uuid) -> Result<Option<Progress>, DatabaseError> {
        let mut rows = self
            .conn()
            .query(
                "SELECT user_id, step1_completed, step2_completed, step3_completed
                 FROM user_onboarding WHERE user_id = ?1",
                params![user_id.to_string()],
            )
            .await
            .map_err(|e| DatabaseError::Query(format!("Failed to query progress: {e}")))?;

        let row = rows
            .next()
            .await
            .map_err(|e| DatabaseError::Query(format!("Failed to read progress row: {e}")))?;

        match row {
            Some(row) => {
                let progress = row_to_progress(&row)
                    .map_err(|e| DatabaseError::Query(format!("Bad progress row: {e}")))?;
                Ok(Some(progress))
            }
            None => Ok(None),
        }
    }

    async fn ensure_progress(&self, user_id: Uuid) -> Result<(), DatabaseError> {
        self.conn()
            .execute(
                "INSERT INTO user_onboarding (user_id) VALUES (?1)
                 ON CONFLICT(user_id) DO NOTHING",
                params![user_id.to_string()],
            )
            .await
            .map_err(|e| DatabaseError::Query(format!("Failed to ensure progress row: {e}")))?;
        Ok(())
    }

    async fn mark_step(&self, user_id: Uuid, step: Step, done: bool) -> Result<(), DatabaseError> {
        // Column name comes from the closed Step enum, never from input.
        let sql = format!(
            "UPDATE user_onboarding SET {} = ?2 WHERE user_id = ?1",
            step.column()
        );
        let affected = self
            .conn()
            .execute(&sql, params![user_id.to_string(), i64::from(done)])
            .await
            .map_err(|e| DatabaseError::Query(format!("Failed to mark step: {e}")))?;

        if affected == 0 {
            return Err(DatabaseError::NotFound {
                entity: "progress".to_string(),
                id: user_id.to_string(),
            });
        }
        Ok(())
    }

    async fn reset_progress(&self, user_id: Uuid) -> Result<(), DatabaseError> {
        self.conn()
            .execute(
                "UPDATE user_onboarding
                 SET step1_completed = 0, step2_completed = 0, step3_completed = 0
                 WHERE user_id = ?1",
                params![user_id.to_string()],
            )
            .await
            .map_err(|e| DatabaseError::Query(format!("Failed to reset progress: {e}")))?;
        Ok(())
    }

    // ── Onboarding config ───────────────────────────────────────────

    async fn get_config(&self) -> Result<Option<OnboardingConfig>, DatabaseError> {
        let mut rows = self
            .conn()
            .query(
                "SELECT id, step2_components, step3_components FROM onboarding_config LIMIT 1",
                (),
            )
            .await
            .map_err(|e| DatabaseError::Query(format!("Failed to query config: {e}")))?;

        let row = rows
            .next()
            .await
            .map_err(|e| DatabaseError::Query(format!("Failed to read config row: {e}")))?;

        let Some(row) = row else {
            return Ok(None);
        };

        let id: String = row
            .get(0)
            .map_err(|e| DatabaseError::Query(format!("Bad config row: {e}")))?;
        let step2_json: String = row
            .get(1)
            .map_err(|e| DatabaseError::Query(format!("Bad config row: {e}")))?;
        let step3_json: String = row
            .get(2)
            .map_err(|e| DatabaseError::Query(format!("Bad config row: {e}")))?;

        Ok(Some(OnboardingConfig {
            id,
            step2_components: parse_components(&step2_json, "step2_components")?,
            step3_components: parse_components(&step3_json, "step3_components")?,
        }))
    }

    async fn put_config(&self, config: &OnboardingConfig) -> Result<(), DatabaseError> {
        let step2_json = serde_json::to_string(&config.step2_components)
            .map_err(|e| DatabaseError::Serialization(format!("Bad step2_components: {e}")))?;
        let step3_json = serde_json::to_string(&config.step3_components)
            .map_err(|e| DatabaseError::Serialization(format!("Bad step3_components: {e}")))?;

        let id = if config.id.is_empty() {
            CONFIG_ID
        } else {
            config.id.as_str()
        };

        self.conn()
            .execute(
                "INSERT INTO onboarding_config (id, step2_components, step3_components)
                 VALUES (?1, ?2, ?3)
                 ON CONFLICT(id) DO UPDATE SET
                     step2_components = excluded.step2_components,
                     step3_components = excluded.step3_components",
                params![id, step2_json, step3_json],
            )
            .await
            .map_err(|e| DatabaseError::Query(format!("Failed to write config: {e}")))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::onboarding::model::{Address, ComponentId};

    async fn backend() -> LibSqlBackend {
        LibSqlBackend::new_memory().await.unwrap()
    }

    #[tokio::test]
    async fn session_lifecycle() {
        let db = backend().await;
        let user_id = Uuid::new_v4();

        db.insert_session("tok-1", user_id, "a@example.com")
            .await
            .unwrap();

        let session = db.get_session("tok-1").await.unwrap().unwrap();
        assert_eq!(session.user_id, user_id);
        assert_eq!(session.email, "a@example.com");

        assert!(db.get_session("tok-unknown").await.unwrap().is_none());

        db.delete_session("tok-1").await.unwrap();
        assert!(db.get_session("tok-1").await.unwrap().is_none());

        // Deleting again is a no-op.
        db.delete_session("tok-1").await.unwrap();
    }

    #[tokio::test]
    async fn profile_identity_upsert_preserves_submitted_fields() {
        let db = backend().await;
        let id = Uuid::new_v4();

        db.upsert_profile_identity(id, "a@example.com").await.unwrap();
        db.update_profile_fields(
            id,
            &ProfileFieldUpdate {
                about_me: Some("hi".to_string()),
                ..Default::default()
            },
        )
        .await
        .unwrap();

        // Re-running the identity upsert must not clobber about_me.
        db.upsert_profile_identity(id, "new@example.com").await.unwrap();

        let profile = db.get_profile(id).await.unwrap().unwrap();
        assert_eq!(profile.email, "new@example.com");
        assert_eq!(profile.about_me.as_deref(), Some("hi"));
        assert_eq!(profile.role, Role::User);
        assert!(!profile.onboarding_completed);
    }

    #[tokio::test]
    async fn update_fields_writes_only_present_fields() {
        let db = backend().await;
        let id = Uuid::new_v4();
        db.upsert_profile_identity(id, "a@example.com").await.unwrap();

        let update = ProfileFieldUpdate {
            address: Some(Address {
                street: "123 Main St".to_string(),
                city: "New York".to_string(),
                state: "NY".to_string(),
                zip: "10001".to_string(),
            }),
            birthdate: NaiveDate::from_ymd_opt(1990, 4, 12),
            ..Default::default()
        };
        db.update_profile_fields(id, &update).await.unwrap();

        let profile = db.get_profile(id).await.unwrap().unwrap();
        assert!(profile.about_me.is_none());
        assert_eq!(profile.address.unwrap().city, "New York");
        assert_eq!(profile.birthdate, NaiveDate::from_ymd_opt(1990, 4, 12));
    }

    #[tokio::test]
    async fn update_fields_missing_profile_is_not_found() {
        let db = backend().await;
        let err = db
            .update_profile_fields(
                Uuid::new_v4(),
                &ProfileFieldUpdate {
                    about_me: Some("hi".to_string()),
                    ..Default::default()
                },
            )
            .await
            .unwrap_err();
        assert!(matches!(err, DatabaseError::NotFound { .. }));
    }

    #[tokio::test]
    async fn find_by_email() {
        let db = backend().await;
        let id = Uuid::new_v4();
        db.upsert_profile_identity(id, "find@example.com").await.unwrap();

        let found = db.find_profile_by_email("find@example.com").await.unwrap();
        assert_eq!(found.unwrap().id, id);
        assert!(db.find_profile_by_email("nope@example.com").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn counts_track_roles_and_completion() {
        let db = backend().await;
        assert_eq!(
            db.profile_counts().await.unwrap(),
            ProfileCounts {
                total: 0,
                onboarding_completed: 0,
                admins: 0
            }
        );

        let a = Uuid::new_v4();
        let b = Uuid::new_v4();
        let c = Uuid::new_v4();
        for (id, email) in [(a, "a@x.com"), (b, "b@x.com"), (c, "c@x.com")] {
            db.upsert_profile_identity(id, email).await.unwrap();
        }
        db.set_role(a, Role::Admin).await.unwrap();
        db.set_onboarding_completed(a, true).await.unwrap();
        db.set_onboarding_completed(b, true).await.unwrap();

        assert_eq!(
            db.profile_counts().await.unwrap(),
            ProfileCounts {
                total: 3,
                onboarding_completed: 2,
                admins: 1
            }
        );
    }

    #[tokio::test]
    async fn progress_lifecycle() {
        let db = backend().await;
        let user_id = Uuid::new_v4();

        assert!(db.get_progress(user_id).await.unwrap().is_none());

        db.ensure_progress(user_id).await.unwrap();
        let progress = db.get_progress(user_id).await.unwrap().unwrap();
        assert!(!progress.step1_completed);
        assert!(!progress.step2_completed);
        assert!(!progress.step3_completed);

        db.mark_step(user_id, Step::One, true).await.unwrap();
        db.mark_step(user_id, Step::Two, true).await.unwrap();
        let progress = db.get_progress(user_id).await.unwrap().unwrap();
        assert!(progress.step1_completed);
        assert!(progress.step2_completed);
        assert!(!progress.step3_completed);

        // ensure_progress on an existing row must not reset flags.
        db.ensure_progress(user_id).await.unwrap();
        let progress = db.get_progress(user_id).await.unwrap().unwrap();
        assert!(progress.step1_completed);

        db.reset_progress(user_id).await.unwrap();
        db.reset_progress(user_id).await.unwrap();
        let progress = db.get_progress(user_id).await.unwrap().unwrap();
        assert!(!progress.step1_completed);
        assert!(!progress.step2_completed);
        assert!(!progress.step3_completed);
    }

    #[tokio::test]
    async fn config_roundtrip_and_overwrite() {
        let db = backend().await;
        assert!(db.get_config().await.unwrap().is_none());

        let config = OnboardingConfig {
            id: CONFIG_ID.to_string(),
            step2_components: vec![ComponentId::AboutMe, ComponentId::Address],
            step3_components: vec![ComponentId::Birthdate],
        };
        db.put_config(&config).await.unwrap();

        let read = db.get_config().await.unwrap().unwrap();
        assert_eq!(read.step2_components, config.step2_components);
        assert_eq!(read.step3_components, config.step3_components);

        let updated = OnboardingConfig {
            id: CONFIG_ID.to_string(),
            step2_components: vec![ComponentId::Birthdate],
            step3_components: Vec::new(),
        };
        db.put_config(&updated).await.unwrap();

        let read = db.get_config().await.unwrap().unwrap();
        assert_eq!(read.step2_components, vec![ComponentId::Birthdate]);
        assert!(read.step3_components.is_empty());
    }

    #[tokio::test]
    async fn local_file_database_persists_across_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("data").join("onboard.db");

        let id = Uuid::new_v4();
        {
            let db = LibSqlBackend::new_local(&path).await.unwrap();
            db.upsert_profile_identity(id, "disk@example.com").await.unwrap();
        }

        let db = LibSqlBackend::new_local(&path).await.unwrap();
        let profile = db.get_profile(id).await.unwrap().unwrap();
        assert_eq!(profile.email, "disk@example.com");
    }

    #[tokio::test]
    async fn profiles_listed_newest_first() {
        let db = backend().await;
        let first = Uuid::new_v4();
        let second = Uuid::new_v4();
        db.upsert_profile_identity(first, "first@x.com").await.unwrap();
        tokio::time::sleep(std::time::Duration::from_millis(5)).await;
        db.upsert_profile_identity(second, "second@x.com").await.unwrap();

        let profiles = db.list_profiles().await.unwrap();
        assert_eq!(profiles.len(), 2);
        assert_eq!(profiles[0].email, "second@x.com");
        assert_eq!(profiles[1].email, "first@x.com");
    }
}
