use std::str::FromStr;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use uuid::Uuid;

use super::{prepare_user, PlanStore, StoreError, UserStore};
use crate::models::{FastingPlan, NewUser, PlanChanges, PlanId, PlanInput, User};
use crate::password;

const CREATE_PLANS: &str = r#"
CREATE TABLE IF NOT EXISTS fasting_plans (
    seq INTEGER PRIMARY KEY AUTOINCREMENT,
    id TEXT NOT NULL UNIQUE,
    name TEXT NOT NULL,
    duration REAL NOT NULL,
    description TEXT NOT NULL,
    is_premium INTEGER NOT NULL DEFAULT 0,
    created_at TEXT NOT NULL,
    updated_at TEXT NOT NULL
)
"#;

const CREATE_USERS: &str = r#"
CREATE TABLE IF NOT EXISTS users (
    seq INTEGER PRIMARY KEY AUTOINCREMENT,
    id TEXT NOT NULL UNIQUE,
    name TEXT NOT NULL,
    email TEXT NOT NULL UNIQUE,
    password_hash TEXT NOT NULL,
    created_at TEXT NOT NULL,
    updated_at TEXT NOT NULL
)
"#;

const PLAN_COLUMNS: &str = "id, name, duration, description, is_premium, created_at, updated_at";
const USER_COLUMNS: &str = "id, name, email, password_hash, created_at, updated_at";

pub struct SqliteStore {
    pool: SqlitePool,
}

#[derive(sqlx::FromRow)]
struct PlanRow {
    id: String,
    name: String,
    duration: f64,
    description: String,
    is_premium: bool,
    created_at: String,
    updated_at: String,
}

impl TryFrom<PlanRow> for FastingPlan {
    type Error = StoreError;

    fn try_from(row: PlanRow) -> Result<Self, Self::Error> {
        Ok(FastingPlan {
            id: parse_uuid(&row.id)?.into(),
            name: row.name,
            duration: row.duration,
            description: row.description,
            is_premium: row.is_premium,
            created_at: parse_timestamp(&row.created_at)?,
            updated_at: parse_timestamp(&row.updated_at)?,
        })
    }
}

#[derive(sqlx::FromRow)]
struct UserRow {
    id: String,
    name: String,
    email: String,
    password_hash: String,
    created_at: String,
    updated_at: String,
}

impl TryFrom<UserRow> for User {
    type Error = StoreError;

    fn try_from(row: UserRow) -> Result<Self, Self::Error> {
        Ok(User {
            id: parse_uuid(&row.id)?,
            name: row.name,
            email: row.email,
            password_hash: row.password_hash,
            created_at: parse_timestamp(&row.created_at)?,
            updated_at: parse_timestamp(&row.updated_at)?,
        })
    }
}

fn parse_uuid(raw: &str) -> Result<Uuid, StoreError> {
    Uuid::parse_str(raw).map_err(|e| StoreError::Corrupt(format!("id {raw:?}: {e}")))
}

fn parse_timestamp(raw: &str) -> Result<DateTime<Utc>, StoreError> {
    DateTime::parse_from_rfc3339(raw)
        .map(|ts| ts.with_timezone(&Utc))
        .map_err(|e| StoreError::Corrupt(format!("timestamp {raw:?}: {e}")))
}

impl SqliteStore {
    /// Open (creating if missing) the database at `url` and ensure the tables exist.
    pub async fn connect(url: &str) -> Result<Self, StoreError> {
        let options = SqliteConnectOptions::from_str(url)?.create_if_missing(true);

        // Every connection to an in-memory database sees its own empty database,
        // so those get exactly one connection that is never recycled.
        let in_memory = url.contains(":memory:") || url.contains("mode=memory");
        let pool_options = if in_memory {
            SqlitePoolOptions::new()
                .max_connections(1)
                .idle_timeout(None)
                .max_lifetime(None)
        } else {
            SqlitePoolOptions::new().max_connections(5)
        };
        let pool = pool_options.connect_with(options).await?;

        sqlx::query(CREATE_PLANS).execute(&pool).await?;
        sqlx::query(CREATE_USERS).execute(&pool).await?;

        Ok(Self { pool })
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }
}

#[async_trait]
impl PlanStore for SqliteStore {
    async fn list(&self) -> Result<Vec<FastingPlan>, StoreError> {
        let rows: Vec<PlanRow> =
            sqlx::query_as(&format!("SELECT {PLAN_COLUMNS} FROM fasting_plans ORDER BY seq"))
                .fetch_all(&self.pool)
                .await?;
        rows.into_iter().map(FastingPlan::try_from).collect()
    }

    async fn insert(&self, input: PlanInput) -> Result<FastingPlan, StoreError> {
        let plan = input.validate()?.into_plan(PlanId::new(), Utc::now());

        sqlx::query(
            r#"
            INSERT INTO fasting_plans (id, name, duration, description, is_premium, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(plan.id.to_string())
        .bind(&plan.name)
        .bind(plan.duration)
        .bind(&plan.description)
        .bind(plan.is_premium)
        .bind(plan.created_at.to_rfc3339())
        .bind(plan.updated_at.to_rfc3339())
        .execute(&self.pool)
        .await?;

        Ok(plan)
    }

    async fn update(
        &self,
        id: PlanId,
        changes: PlanChanges,
    ) -> Result<Option<FastingPlan>, StoreError> {
        let patch = changes.validate()?;

        let row: Option<PlanRow> = sqlx::query_as(&format!(
            r#"
            UPDATE fasting_plans
            SET name = COALESCE(?, name),
                duration = COALESCE(?, duration),
                description = COALESCE(?, description),
                is_premium = COALESCE(?, is_premium),
                updated_at = ?
            WHERE id = ?
            RETURNING {PLAN_COLUMNS}
            "#
        ))
        .bind(patch.name)
        .bind(patch.duration)
        .bind(patch.description)
        .bind(patch.is_premium)
        .bind(Utc::now().to_rfc3339())
        .bind(id.to_string())
        .fetch_optional(&self.pool)
        .await?;

        row.map(FastingPlan::try_from).transpose()
    }

    async fn delete(&self, id: PlanId) -> Result<Option<FastingPlan>, StoreError> {
        let row: Option<PlanRow> = sqlx::query_as(&format!(
            "DELETE FROM fasting_plans WHERE id = ? RETURNING {PLAN_COLUMNS}"
        ))
        .bind(id.to_string())
        .fetch_optional(&self.pool)
        .await?;

        row.map(FastingPlan::try_from).transpose()
    }
}

#[async_trait]
impl UserStore for SqliteStore {
    async fn insert_user(&self, user: NewUser) -> Result<User, StoreError> {
        let user = prepare_user(user, Utc::now())?;

        let result = sqlx::query(
            r#"
            INSERT INTO users (id, name, email, password_hash, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(user.id.to_string())
        .bind(&user.name)
        .bind(&user.email)
        .bind(&user.password_hash)
        .bind(user.created_at.to_rfc3339())
        .bind(user.updated_at.to_rfc3339())
        .execute(&self.pool)
        .await;

        match result {
            Ok(_) => Ok(user),
            Err(sqlx::Error::Database(e)) if e.is_unique_violation() => {
                Err(StoreError::DuplicateEmail(user.email))
            }
            Err(e) => Err(e.into()),
        }
    }

    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, StoreError> {
        let row: Option<UserRow> =
            sqlx::query_as(&format!("SELECT {USER_COLUMNS} FROM users WHERE email = ?"))
                .bind(email.trim())
                .fetch_optional(&self.pool)
                .await?;

        row.map(User::try_from).transpose()
    }

    async fn change_password(
        &self,
        id: Uuid,
        password: &str,
    ) -> Result<Option<User>, StoreError> {
        let password_hash = password::hash(password)?;

        let row: Option<UserRow> = sqlx::query_as(&format!(
            "UPDATE users SET password_hash = ?, updated_at = ? WHERE id = ? RETURNING {USER_COLUMNS}"
        ))
        .bind(password_hash)
        .bind(Utc::now().to_rfc3339())
        .bind(id.to_string())
        .fetch_optional(&self.pool)
        .await?;

        row.map(User::try_from).transpose()
    }
}
