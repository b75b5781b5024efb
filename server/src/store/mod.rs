//! Record store: fasting plans plus the (currently unused) user accounts.
//!
//! Handlers only ever see the [`PlanStore`] trait object held in
//! [`crate::AppState`]. The concrete backend is picked from the database URL
//! at startup by [`connect`], and the returned [`Database`] is closed again
//! when the server shuts down.

mod memory;
mod sqlite;

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use thiserror::Error;
use tracing::info;
use uuid::Uuid;

use crate::models::{FastingPlan, InvalidPlanId, NewUser, PlanChanges, PlanId, PlanInput, User};
use crate::password;
use crate::schema::ValidationError;

pub use memory::MemoryStore;
pub use sqlite::SqliteStore;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("validation failed: {0}")]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    InvalidId(#[from] InvalidPlanId),

    #[error("email already registered: {0}")]
    DuplicateEmail(String),

    #[error("password hashing failed: {0}")]
    PasswordHash(String),

    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("corrupt stored value: {0}")]
    Corrupt(String),

    #[error("unsupported database url: {0}")]
    UnsupportedUrl(String),
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PlanStore: Send + Sync {
    /// All plans in insertion order.
    async fn list(&self) -> Result<Vec<FastingPlan>, StoreError>;

    async fn insert(&self, input: PlanInput) -> Result<FastingPlan, StoreError>;

    /// Returns the post-update record, or `None` if no plan has this id.
    async fn update(
        &self,
        id: PlanId,
        changes: PlanChanges,
    ) -> Result<Option<FastingPlan>, StoreError>;

    /// Returns the removed record, or `None` if no plan has this id.
    async fn delete(&self, id: PlanId) -> Result<Option<FastingPlan>, StoreError>;
}

#[async_trait]
pub trait UserStore: Send + Sync {
    async fn insert_user(&self, user: NewUser) -> Result<User, StoreError>;

    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, StoreError>;

    /// Re-hashes and stores a new password. `None` if the user does not exist.
    async fn change_password(&self, id: Uuid, password: &str)
        -> Result<Option<User>, StoreError>;
}

/// Pre-persist step for new users: trim, check required fields, hash the password.
pub(crate) fn prepare_user(user: NewUser, now: DateTime<Utc>) -> Result<User, StoreError> {
    let name = user.name.trim().to_string();
    let email = user.email.trim().to_string();
    if name.is_empty() {
        return Err(ValidationError::Required { field: "name" }.into());
    }
    if email.is_empty() {
        return Err(ValidationError::Required { field: "email" }.into());
    }
    if user.password.is_empty() {
        return Err(ValidationError::Required { field: "password" }.into());
    }

    Ok(User {
        id: Uuid::new_v4(),
        name,
        email,
        password_hash: password::hash(&user.password)?,
        created_at: now,
        updated_at: now,
    })
}

/// Handle to an opened store, shared by the HTTP layer.
#[derive(Clone)]
pub struct Database {
    pub plans: Arc<dyn PlanStore>,
    pub users: Arc<dyn UserStore>,
    pool: Option<sqlx::SqlitePool>,
}

impl Database {
    pub fn in_memory() -> Self {
        let store = Arc::new(MemoryStore::new());
        Self {
            plans: store.clone(),
            users: store,
            pool: None,
        }
    }

    fn sqlite(store: SqliteStore) -> Self {
        let pool = store.pool().clone();
        let store = Arc::new(store);
        Self {
            plans: store.clone(),
            users: store,
            pool: Some(pool),
        }
    }

    pub async fn close(self) {
        if let Some(pool) = self.pool {
            pool.close().await;
            info!("database pool closed");
        }
    }
}

/// Open the store named by `url`: `memory` / `memory://`, or any `sqlite:` URL.
pub async fn connect(url: &str) -> Result<Database, StoreError> {
    if url == "memory" || url.starts_with("memory://") {
        info!("using in-memory store");
        return Ok(Database::in_memory());
    }
    if url.starts_with("sqlite:") {
        let store = SqliteStore::connect(url).await?;
        info!("connected to sqlite store");
        return Ok(Database::sqlite(store));
    }
    Err(StoreError::UnsupportedUrl(url.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn new_user(name: &str, email: &str, password: &str) -> NewUser {
        NewUser {
            name: name.to_string(),
            email: email.to_string(),
            password: password.to_string(),
        }
    }

    #[test]
    fn prepare_user_hashes_and_trims() {
        let user = prepare_user(new_user(" Ada ", " ada@example.com ", "pw"), Utc::now()).unwrap();
        assert_eq!(user.name, "Ada");
        assert_eq!(user.email, "ada@example.com");
        assert_ne!(user.password_hash, "pw");
        assert!(user.matches_password("pw").unwrap());
    }

    #[test]
    fn prepare_user_requires_every_field() {
        let err = prepare_user(new_user("Ada", "  ", "pw"), Utc::now()).unwrap_err();
        assert!(matches!(
            err,
            StoreError::Validation(ValidationError::Required { field: "email" })
        ));
        let err = prepare_user(new_user("Ada", "a@b.c", ""), Utc::now()).unwrap_err();
        assert!(matches!(
            err,
            StoreError::Validation(ValidationError::Required { field: "password" })
        ));
    }

    #[tokio::test]
    async fn connect_picks_backend_from_url() {
        assert!(connect("memory").await.is_ok());
        let db = connect("sqlite::memory:").await.unwrap();
        assert!(db.plans.list().await.unwrap().is_empty());
        db.close().await;

        assert!(matches!(
            connect("mongodb://localhost/fasting").await,
            Err(StoreError::UnsupportedUrl(_))
        ));
    }
}
