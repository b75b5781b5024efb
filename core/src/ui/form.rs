use crate::api::PlanApi;
use crate::error::ApiError;
use crate::http::Transport;
use crate::types::{FastingPlan, NewPlan, PlanUpdate};

/// Editable field values, as typed by the user.
///
/// `duration` stays text until submit so a half-typed value never has to
/// round-trip through a float.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PlanFormData {
    pub name: String,
    pub duration: String,
    pub description: String,
    pub is_premium: bool,
}

impl PlanFormData {
    pub fn from_plan(plan: &FastingPlan) -> Self {
        Self {
            name: plan.name.clone(),
            duration: plan.duration.to_string(),
            description: plan.description.clone(),
            is_premium: plan.is_premium,
        }
    }

    pub fn to_new_plan(&self) -> Result<NewPlan, ApiError> {
        Ok(NewPlan {
            name: required("name", &self.name)?,
            duration: parse_duration(&self.duration)?,
            description: required("description", &self.description)?,
            is_premium: self.is_premium,
        })
    }

    /// Every field is sent; the row editor always holds the full record.
    pub fn to_update(&self) -> Result<PlanUpdate, ApiError> {
        let plan = self.to_new_plan()?;
        Ok(PlanUpdate {
            name: Some(plan.name),
            duration: Some(plan.duration),
            description: Some(plan.description),
            is_premium: Some(plan.is_premium),
        })
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }
}

fn required(field: &str, value: &str) -> Result<String, ApiError> {
    let value = value.trim();
    if value.is_empty() {
        return Err(ApiError::InvalidInput(format!("{field} is required")));
    }
    Ok(value.to_string())
}

fn parse_duration(text: &str) -> Result<f64, ApiError> {
    let text = required("duration", text)?;
    match text.parse::<f64>() {
        Ok(hours) if hours.is_finite() => Ok(hours),
        _ => Err(ApiError::InvalidInput(format!(
            "duration must be a number of hours, got {text:?}"
        ))),
    }
}

/// The create form.
#[derive(Debug, Default)]
pub struct PlanForm {
    data: PlanFormData,
}

impl PlanForm {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn data(&self) -> &PlanFormData {
        &self.data
    }

    pub fn data_mut(&mut self) -> &mut PlanFormData {
        &mut self.data
    }

    /// Creates the plan. The form is cleared only when the server accepted it.
    pub fn submit<T: Transport>(&mut self, api: &PlanApi<T>) -> Result<FastingPlan, ApiError> {
        let input = self.data.to_new_plan()?;
        let plan = api.create_plan(&input)?;
        self.data.clear();
        Ok(plan)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::PlanClient;
    use crate::error::ErrorCode;
    use crate::http::{HttpRequest, HttpResponse, TransportError};
    use crate::ui::tests::plan_json;
    use uuid::Uuid;

    fn filled() -> PlanFormData {
        PlanFormData {
            name: "  16:8 ".to_string(),
            duration: "16".to_string(),
            description: "skip breakfast".to_string(),
            is_premium: false,
        }
    }

    #[test]
    fn to_new_plan_trims_and_parses() {
        let plan = filled().to_new_plan().unwrap();
        assert_eq!(plan.name, "16:8");
        assert_eq!(plan.duration, 16.0);
        assert!(!plan.is_premium);
    }

    #[test]
    fn missing_fields_are_rejected_locally() {
        let mut data = filled();
        data.description = "   ".to_string();
        let err = data.to_new_plan().unwrap_err();
        assert_eq!(err.code(), ErrorCode::InvalidInput);

        let mut data = filled();
        data.duration = "sixteen".to_string();
        assert!(matches!(data.to_new_plan(), Err(ApiError::InvalidInput(_))));
    }

    #[test]
    fn to_update_sends_every_field() {
        let update = filled().to_update().unwrap();
        assert_eq!(update.name.as_deref(), Some("16:8"));
        assert_eq!(update.duration, Some(16.0));
        assert_eq!(update.is_premium, Some(false));
    }

    #[test]
    fn submit_clears_on_success() {
        let id = Uuid::new_v4();
        let api = PlanApi::new(PlanClient::new("http://test/fasting"), |req: HttpRequest| {
            assert!(req.body.as_deref().unwrap().contains("\"name\":\"16:8\""));
            Ok::<_, TransportError>(HttpResponse {
                status: 201,
                headers: Vec::new(),
                body: plan_json(id, "16:8"),
            })
        });
        let mut form = PlanForm::new();
        *form.data_mut() = filled();

        let created = form.submit(&api).unwrap();
        assert_eq!(created.id, id);
        assert_eq!(form.data(), &PlanFormData::default());
    }

    #[test]
    fn submit_keeps_values_on_failure() {
        let api = PlanApi::new(PlanClient::new("http://test/fasting"), |_req: HttpRequest| {
            Ok::<_, TransportError>(HttpResponse {
                status: 500,
                headers: Vec::new(),
                body: r#"{"message":"Error creating fasting plan."}"#.to_string(),
            })
        });
        let mut form = PlanForm::new();
        *form.data_mut() = filled();

        assert!(form.submit(&api).is_err());
        assert_eq!(form.data().name, "  16:8 ");
    }

    #[test]
    fn invalid_form_sends_nothing() {
        let api = PlanApi::new(
            PlanClient::new("http://test/fasting"),
            |_req: HttpRequest| -> Result<HttpResponse, TransportError> {
                panic!("no request expected")
            },
        );
        let mut form = PlanForm::new();
        let err = form.submit(&api).unwrap_err();
        assert_eq!(err.code(), ErrorCode::InvalidInput);
    }
}
