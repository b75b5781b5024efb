use tracing::debug;
use uuid::Uuid;

use crate::api::PlanApi;
use crate::error::ApiError;
use crate::http::Transport;
use crate::types::{FastingPlan, Message};
use crate::ui::form::PlanFormData;

pub const FETCH_ERROR: &str = "Error fetching plans";

/// The plan list with its per-row edit state.
///
/// Holds no cache: every mutation is followed by a full refetch.
#[derive(Debug)]
pub struct PlanList {
    plans: Vec<FastingPlan>,
    loading: bool,
    error: Option<String>,
    editing: Option<(Uuid, PlanFormData)>,
}

impl Default for PlanList {
    fn default() -> Self {
        Self::new()
    }
}

impl PlanList {
    /// Starts in the loading state, as before the first fetch.
    pub fn new() -> Self {
        Self {
            plans: Vec::new(),
            loading: true,
            error: None,
            editing: None,
        }
    }

    pub fn plans(&self) -> &[FastingPlan] {
        &self.plans
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Replaces the list with the server's. On failure the error text is set
    /// and the previous rows are kept.
    pub fn refresh<T: Transport>(&mut self, api: &PlanApi<T>) {
        self.loading = true;
        match api.list_plans() {
            Ok(plans) => {
                self.plans = plans;
                self.error = None;
            }
            Err(_) => self.error = Some(FETCH_ERROR.to_string()),
        }
        self.loading = false;

        if let Some((id, _)) = &self.editing {
            if !self.plans.iter().any(|plan| plan.id == *id) {
                debug!(%id, "edited plan is gone, leaving edit mode");
                self.editing = None;
            }
        }
    }

    /// Opens the row editor seeded with the plan's values. Only one row is
    /// edited at a time. Returns false if the id is not in the list.
    pub fn begin_edit(&mut self, id: Uuid) -> bool {
        match self.plans.iter().find(|plan| plan.id == id) {
            Some(plan) => {
                self.editing = Some((id, PlanFormData::from_plan(plan)));
                true
            }
            None => false,
        }
    }

    pub fn cancel_edit(&mut self) {
        self.editing = None;
    }

    pub fn editing_id(&self) -> Option<Uuid> {
        self.editing.as_ref().map(|(id, _)| *id)
    }

    pub fn edit_data_mut(&mut self) -> Option<&mut PlanFormData> {
        self.editing.as_mut().map(|(_, data)| data)
    }

    /// Sends the edited row, then refetches. The editor stays open on failure.
    pub fn save_edit<T: Transport>(&mut self, api: &PlanApi<T>) -> Result<FastingPlan, ApiError> {
        let Some((id, data)) = &self.editing else {
            return Err(ApiError::InvalidInput("no plan is being edited".to_string()));
        };
        let updated = api.update_plan(*id, &data.to_update()?)?;
        self.editing = None;
        self.refresh(api);
        Ok(updated)
    }

    /// Deletes immediately, then refetches.
    pub fn delete<T: Transport>(&mut self, api: &PlanApi<T>, id: Uuid) -> Result<Message, ApiError> {
        let message = api.delete_plan(id)?;
        self.refresh(api);
        Ok(message)
    }
}
