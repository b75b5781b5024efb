//! Records held by the store and the payloads that create or change them.
//!
//! Write payloads (`PlanInput`, `PlanChanges`) keep their fields as raw JSON
//! values. Casting and required-field checks happen in the store's write path
//! (see [`crate::schema`]), not at extraction time.

use std::{fmt, str::FromStr};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;
use uuid::Uuid;

use crate::password;
use crate::store::StoreError;

/// Store-assigned identifier of a fasting plan.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PlanId(Uuid);

impl PlanId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn as_uuid(&self) -> Uuid {
        self.0
    }
}

impl Default for PlanId {
    fn default() -> Self {
        Self::new()
    }
}

impl From<Uuid> for PlanId {
    fn from(id: Uuid) -> Self {
        Self(id)
    }
}

impl fmt::Display for PlanId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

#[derive(Debug, Error)]
#[error("malformed fasting plan id: {0:?}")]
pub struct InvalidPlanId(pub String);

impl FromStr for PlanId {
    type Err = InvalidPlanId;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s)
            .map(Self)
            .map_err(|_| InvalidPlanId(s.to_string()))
    }
}

/// A fasting plan as persisted and returned by the API.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FastingPlan {
    pub id: PlanId,
    pub name: String,
    /// Hours.
    pub duration: f64,
    pub description: String,
    pub is_premium: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Create payload. Built from a JSON object only (see [`crate::schema`]);
/// unknown fields are ignored and `null` counts as absent.
#[derive(Clone, Debug, Default)]
pub struct PlanInput {
    pub name: Option<Value>,
    pub duration: Option<Value>,
    pub description: Option<Value>,
    pub is_premium: Option<Value>,
}

/// Update payload. Only the fields present are applied.
#[derive(Clone, Debug, Default)]
pub struct PlanChanges {
    pub name: Option<Value>,
    pub duration: Option<Value>,
    pub description: Option<Value>,
    pub is_premium: Option<Value>,
}

/// Plan fields after the create path has cast and checked them.
#[derive(Clone, Debug, PartialEq)]
pub struct PlanFields {
    pub name: String,
    pub duration: f64,
    pub description: String,
    pub is_premium: bool,
}

impl PlanFields {
    pub fn into_plan(self, id: PlanId, now: DateTime<Utc>) -> FastingPlan {
        FastingPlan {
            id,
            name: self.name,
            duration: self.duration,
            description: self.description,
            is_premium: self.is_premium,
            created_at: now,
            updated_at: now,
        }
    }
}

/// Cast update values; `None` leaves the stored field untouched.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct PlanPatch {
    pub name: Option<String>,
    pub duration: Option<f64>,
    pub description: Option<String>,
    pub is_premium: Option<bool>,
}

impl PlanPatch {
    pub fn apply(self, plan: &mut FastingPlan, now: DateTime<Utc>) {
        if let Some(name) = self.name {
            plan.name = name;
        }
        if let Some(duration) = self.duration {
            plan.duration = duration;
        }
        if let Some(description) = self.description {
            plan.description = description;
        }
        if let Some(is_premium) = self.is_premium {
            plan.is_premium = is_premium;
        }
        plan.updated_at = now;
    }
}

/// An account record. No endpoint reads or writes users yet.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    pub fn matches_password(&self, candidate: &str) -> Result<bool, StoreError> {
        password::verify(candidate, &self.password_hash)
    }
}

/// Registration data carrying a plain-text password.
#[derive(Clone, Deserialize)]
pub struct NewUser {
    pub name: String,
    pub email: String,
    pub password: String,
}

impl fmt::Debug for NewUser {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NewUser")
            .field("name", &self.name)
            .field("email", &self.email)
            .finish_non_exhaustive()
    }
}
