use crate::api::PlanApi;
use crate::error::ApiError;
use crate::http::Transport;
use crate::types::FastingPlan;
use crate::ui::form::PlanForm;
use crate::ui::list::PlanList;

/// The page: a create form above the plan list.
#[derive(Debug, Default)]
pub struct PlanBoard {
    pub form: PlanForm,
    pub list: PlanList,
}

impl PlanBoard {
    pub fn new() -> Self {
        Self::default()
    }

    /// First fetch of the list.
    pub fn mount<T: Transport>(&mut self, api: &PlanApi<T>) {
        self.list.refresh(api);
    }

    /// Submits the form and, once the plan exists, refreshes the list.
    pub fn submit_form<T: Transport>(&mut self, api: &PlanApi<T>) -> Result<FastingPlan, ApiError> {
        let plan = self.form.submit(api)?;
        self.list.refresh(api);
        Ok(plan)
    }
}
