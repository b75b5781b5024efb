use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::{prepare_user, PlanStore, StoreError, UserStore};
use crate::models::{FastingPlan, NewUser, PlanChanges, PlanId, PlanInput, User};
use crate::password;

/// Process-local collections. Vectors keep insertion order for listing.
#[derive(Default)]
pub struct MemoryStore {
    plans: RwLock<Vec<FastingPlan>>,
    users: RwLock<Vec<User>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl PlanStore for MemoryStore {
    async fn list(&self) -> Result<Vec<FastingPlan>, StoreError> {
        Ok(self.plans.read().await.clone())
    }

    async fn insert(&self, input: PlanInput) -> Result<FastingPlan, StoreError> {
        let plan = input.validate()?.into_plan(PlanId::new(), Utc::now());
        self.plans.write().await.push(plan.clone());
        Ok(plan)
    }

    async fn update(
        &self,
        id: PlanId,
        changes: PlanChanges,
    ) -> Result<Option<FastingPlan>, StoreError> {
        let patch = changes.validate()?;
        let mut plans = self.plans.write().await;
        let Some(plan) = plans.iter_mut().find(|plan| plan.id == id) else {
            return Ok(None);
        };
        patch.apply(plan, Utc::now());
        Ok(Some(plan.clone()))
    }

    async fn delete(&self, id: PlanId) -> Result<Option<FastingPlan>, StoreError> {
        let mut plans = self.plans.write().await;
        Ok(plans
            .iter()
            .position(|plan| plan.id == id)
            .map(|index| plans.remove(index)))
    }
}

#[async_trait]
impl UserStore for MemoryStore {
    async fn insert_user(&self, user: NewUser) -> Result<User, StoreError> {
        let user = prepare_user(user, Utc::now())?;
        let mut users = self.users.write().await;
        if users.iter().any(|existing| existing.email == user.email) {
            return Err(StoreError::DuplicateEmail(user.email));
        }
        users.push(user.clone());
        Ok(user)
    }

    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, StoreError> {
        let email = email.trim();
        Ok(self
            .users
            .read()
            .await
            .iter()
            .find(|user| user.email == email)
            .cloned())
    }

    async fn change_password(
        &self,
        id: Uuid,
        password: &str,
    ) -> Result<Option<User>, StoreError> {
        let password_hash = password::hash(password)?;
        let mut users = self.users.write().await;
        let Some(user) = users.iter_mut().find(|user| user.id == id) else {
            return Ok(None);
        };
        user.password_hash = password_hash;
        user.updated_at = Utc::now();
        Ok(Some(user.clone()))
    }
}
